//! Parser and encoder for RAT vertex animation files
//!
//! RAT is a lossy codec for baked per-vertex 3D animation. Positions are
//! quantized to one byte per axis against a single animation-wide bounding
//! box, and every frame after the first is stored as per-vertex deltas packed
//! at the smallest signed bit width that holds them. Oversized animations can
//! be split into budget-bounded chunk files and reassembled later.
//!
//! # Usage
//!
//! ```no_run
//! use rat_anim::{RatAnimation, CompressOptions, Vec3, compress};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Compress two frames of a one-vertex animation.
//! let frames = vec![
//!     vec![Vec3::new(0.0, 0.0, 0.0)],
//!     vec![Vec3::new(1.0, 0.5, 0.0)],
//! ];
//! let animation = compress(&frames, &CompressOptions::default())?;
//! animation.save("bounce.rat")?;
//!
//! // Play it back.
//! let animation = RatAnimation::load("bounce.rat")?;
//! let mut cursor = animation.create_cursor();
//! cursor.decode_to(&animation, 1)?;
//! let positions = cursor.dequantized(&animation);
//! # let _ = positions;
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod bitstream;
pub mod cursor;
pub mod encoder;
pub mod error;
pub mod header;
pub(crate) mod io_ext;
pub mod quantize;
pub mod types;
mod writer;

pub use animation::RatAnimation;
pub use cursor::FrameCursor;
pub use encoder::{CompressOptions, compress};
pub use error::{RatError, Result};
pub use header::{HEADER_SIZE, RAT_MAGIC, RatHeader};
pub use types::{BoundingBox, Vec3};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
