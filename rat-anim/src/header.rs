//! The fixed 64-byte RAT file header
//!
//! The header layout is a binary contract with the native playback engine and
//! must match it byte for byte. Every integer is little-endian; the layout is
//! spelled out field by field instead of relying on struct layout attributes:
//!
//! | offset | size | field                       |
//! |--------|------|-----------------------------|
//! | 0      | 4    | magic `"RAT3"`              |
//! | 4      | 4    | vertex_count                |
//! | 8      | 4    | frame_count                 |
//! | 12     | 4    | index_count                 |
//! | 16     | 4    | delta_offset                |
//! | 20     | 4    | bit_widths_offset           |
//! | 24     | 4    | mesh_filename_offset        |
//! | 28     | 4    | mesh_filename_length        |
//! | 32     | 24   | bounds (min xyz, max xyz)   |
//! | 56     | 1    | is_first_frame_raw          |
//! | 57     | 3    | reserved (zero)             |
//! | 60     | 4    | raw_first_frame_offset      |

use std::io::{Read, Write};

use crate::error::{RatError, Result};
use crate::io_ext::{ReadExt, WriteExt};
use crate::types::BoundingBox;

/// Magic signature for RAT animation files ("RAT3")
pub const RAT_MAGIC: [u8; 4] = *b"RAT3";

/// Size of the serialized header in bytes
pub const HEADER_SIZE: u32 = 64;

/// Parsed RAT file header
#[derive(Debug, Clone, PartialEq)]
pub struct RatHeader {
    /// Number of vertices per frame
    pub vertex_count: u32,
    /// Total frames in the whole animation (not just this chunk)
    pub frame_count: u32,
    /// Index count of the companion mesh
    pub index_count: u32,
    /// Byte offset of the delta word stream
    pub delta_offset: u32,
    /// Byte offset of the bit-width tables
    pub bit_widths_offset: u32,
    /// Byte offset of the mesh data filename
    pub mesh_filename_offset: u32,
    /// Byte length of the mesh data filename (no terminator)
    pub mesh_filename_length: u32,
    /// Animation-wide bounding box
    pub bounds: BoundingBox,
    /// Whether an unquantized copy of frame 0 is stored
    pub is_first_frame_raw: bool,
    /// Byte offset of the raw first frame, 0 when absent
    pub raw_first_frame_offset: u32,
}

impl RatHeader {
    /// Parses the header from a reader
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != RAT_MAGIC {
            return Err(RatError::InvalidMagic {
                expected: String::from_utf8_lossy(&RAT_MAGIC).to_string(),
                found: String::from_utf8_lossy(&magic).to_string(),
            });
        }

        let vertex_count = reader.read_u32_le()?;
        let frame_count = reader.read_u32_le()?;
        let index_count = reader.read_u32_le()?;
        let delta_offset = reader.read_u32_le()?;
        let bit_widths_offset = reader.read_u32_le()?;
        let mesh_filename_offset = reader.read_u32_le()?;
        let mesh_filename_length = reader.read_u32_le()?;
        let bounds = BoundingBox::read(reader)?;

        let raw_flag = reader.read_u8()?;
        let is_first_frame_raw = match raw_flag {
            0 => false,
            1 => true,
            other => {
                return Err(RatError::ParseError(format!(
                    "invalid raw-first-frame flag: {other}"
                )));
            }
        };
        let mut reserved = [0u8; 3];
        reader.read_exact(&mut reserved)?;
        let raw_first_frame_offset = reader.read_u32_le()?;

        Ok(Self {
            vertex_count,
            frame_count,
            index_count,
            delta_offset,
            bit_widths_offset,
            mesh_filename_offset,
            mesh_filename_length,
            bounds,
            is_first_frame_raw,
            raw_first_frame_offset,
        })
    }

    /// Writes the header to a writer
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&RAT_MAGIC)?;
        writer.write_u32_le(self.vertex_count)?;
        writer.write_u32_le(self.frame_count)?;
        writer.write_u32_le(self.index_count)?;
        writer.write_u32_le(self.delta_offset)?;
        writer.write_u32_le(self.bit_widths_offset)?;
        writer.write_u32_le(self.mesh_filename_offset)?;
        writer.write_u32_le(self.mesh_filename_length)?;
        self.bounds.write(writer)?;
        writer.write_u8(u8::from(self.is_first_frame_raw))?;
        writer.write_all(&[0u8; 3])?;
        writer.write_u32_le(self.raw_first_frame_offset)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec3;
    use std::io::Cursor;

    fn sample_header() -> RatHeader {
        RatHeader {
            vertex_count: 100,
            frame_count: 60,
            index_count: 294,
            delta_offset: 64 + 600 + 13,
            bit_widths_offset: 64,
            mesh_filename_offset: 64 + 600,
            mesh_filename_length: 13,
            bounds: BoundingBox::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0)),
            is_first_frame_raw: false,
            raw_first_frame_offset: 0,
        }
    }

    #[test]
    fn test_header_size() {
        let mut buf = Vec::new();
        sample_header().write(&mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE as usize);
    }

    #[test]
    fn test_field_offsets() {
        let mut buf = Vec::new();
        sample_header().write(&mut buf).unwrap();

        assert_eq!(&buf[0..4], b"RAT3");
        assert_eq!(u32::from_le_bytes(buf[4..8].try_into().unwrap()), 100);
        assert_eq!(u32::from_le_bytes(buf[8..12].try_into().unwrap()), 60);
        assert_eq!(u32::from_le_bytes(buf[12..16].try_into().unwrap()), 294);
        assert_eq!(u32::from_le_bytes(buf[20..24].try_into().unwrap()), 64);
        assert_eq!(f32::from_le_bytes(buf[32..36].try_into().unwrap()), -1.0);
        assert_eq!(f32::from_le_bytes(buf[52..56].try_into().unwrap()), 3.0);
        assert_eq!(buf[56], 0);
        assert_eq!(&buf[57..60], &[0, 0, 0]);
        assert_eq!(u32::from_le_bytes(buf[60..64].try_into().unwrap()), 0);
    }

    #[test]
    fn test_round_trip() {
        let header = sample_header();
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();

        let mut cursor = Cursor::new(buf);
        let parsed = RatHeader::parse(&mut cursor).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_invalid_magic() {
        let mut buf = Vec::new();
        sample_header().write(&mut buf).unwrap();
        buf[0..4].copy_from_slice(b"ABCD");

        let mut cursor = Cursor::new(buf);
        let err = RatHeader::parse(&mut cursor).unwrap_err();
        match err {
            RatError::InvalidMagic { expected, found } => {
                assert_eq!(expected, "RAT3");
                assert_eq!(found, "ABCD");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_header() {
        let mut buf = Vec::new();
        sample_header().write(&mut buf).unwrap();
        buf.truncate(40);

        let mut cursor = Cursor::new(buf);
        assert!(matches!(
            RatHeader::parse(&mut cursor).unwrap_err(),
            RatError::Io(_)
        ));
    }
}
