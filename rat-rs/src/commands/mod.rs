//! Command implementations

pub mod anim;
