//! Core types shared across the RAT codec

use std::io::{self, Read, Write};

use crate::io_ext::{ReadExt, WriteExt};

/// 3D vector type used for vertex positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
    /// Z coordinate
    pub z: f32,
}

impl Vec3 {
    /// Creates a new 3D vector
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector at origin (0, 0, 0)
    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Returns the component for the given axis (0 = x, 1 = y, 2 = z)
    pub fn axis(&self, axis: usize) -> f32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Reads a Vec3 from a reader
    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let x = reader.read_f32_le()?;
        let y = reader.read_f32_le()?;
        let z = reader.read_f32_le()?;
        Ok(Self::new(x, y, z))
    }

    /// Writes a Vec3 to a writer
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_f32_le(self.x)?;
        writer.write_f32_le(self.y)?;
        writer.write_f32_le(self.z)?;
        Ok(())
    }
}

/// Axis-aligned bounding box covering every vertex of every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates a new bounding box
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates a default bounding box at origin with no size
    pub fn zero() -> Self {
        Self::new(Vec3::origin(), Vec3::origin())
    }

    /// Computes the single bounding box covering every vertex across all frames
    ///
    /// Returns `None` when the frame set holds no vertices at all.
    pub fn from_frames(frames: &[Vec<Vec3>]) -> Option<Self> {
        let first = frames.iter().flat_map(|f| f.iter()).next()?;
        let mut bounds = Self::new(*first, *first);
        for v in frames.iter().flat_map(|f| f.iter()) {
            bounds.min.x = bounds.min.x.min(v.x);
            bounds.min.y = bounds.min.y.min(v.y);
            bounds.min.z = bounds.min.z.min(v.z);
            bounds.max.x = bounds.max.x.max(v.x);
            bounds.max.y = bounds.max.y.max(v.y);
            bounds.max.z = bounds.max.z.max(v.z);
        }
        Some(bounds)
    }

    /// Returns the (min, max) pair for the given axis (0 = x, 1 = y, 2 = z)
    pub fn axis(&self, axis: usize) -> (f32, f32) {
        (self.min.axis(axis), self.max.axis(axis))
    }

    /// Reads a BoundingBox from a reader
    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let min = Vec3::read(reader)?;
        let max = Vec3::read(reader)?;
        Ok(Self::new(min, max))
    }

    /// Writes a BoundingBox to a writer
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.min.write(writer)?;
        self.max.write(writer)?;
        Ok(())
    }
}
