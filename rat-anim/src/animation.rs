//! In-memory representation of a RAT animation and its file layout
//!
//! The on-disk body order is: header, bit-width tables (x, y, z), quantized
//! first frame, mesh data filename, optional raw first frame, then delta
//! words running to end of file. The header carries explicit byte offsets to
//! each block, so readers never have to infer positions.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::cursor::FrameCursor;
use crate::error::{RatError, Result};
use crate::header::{HEADER_SIZE, RatHeader};
use crate::io_ext::{ReadExt, WriteExt};
use crate::types::{BoundingBox, Vec3};

/// A compressed vertex animation
///
/// Immutable once built or loaded; any number of [`FrameCursor`]s may decode
/// from the same animation concurrently, each owning its own position buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct RatAnimation {
    /// Number of vertices per frame
    pub vertex_count: u32,
    /// Total frames in the whole animation (not just this chunk)
    pub frame_count: u32,
    /// Index count of the companion mesh
    pub index_count: u32,
    /// Animation-wide bounding box shared by every frame
    pub bounds: BoundingBox,
    /// Filename of the companion mesh data file (UTF-8)
    pub mesh_data_filename: String,
    /// Frame 0, quantized to one byte per axis
    pub first_frame: Vec<[u8; 3]>,
    /// Unquantized frame 0, stored only when first-frame precision matters
    pub raw_first_frame: Option<Vec<Vec3>>,
    /// Bits (including sign) per delta on the x axis, one entry per vertex
    pub bit_widths_x: Vec<u8>,
    /// Bits per delta on the y axis
    pub bit_widths_y: Vec<u8>,
    /// Bits per delta on the z axis
    pub bit_widths_z: Vec<u8>,
    /// Bit-packed deltas for frames 1.., frame-major then vertex-major
    pub delta_stream: Vec<u32>,
}

impl RatAnimation {
    /// Size in bytes of everything except the delta stream
    ///
    /// This is the payload duplicated into every chunk file of a size-split
    /// animation: header, bit-width tables, quantized first frame, filename
    /// and the optional raw first frame.
    pub fn static_payload_size(&self) -> u32 {
        let n = self.vertex_count;
        let raw = if self.raw_first_frame.is_some() {
            n * 12
        } else {
            0
        };
        HEADER_SIZE + n * 3 + n * 3 + self.mesh_data_filename.len() as u32 + raw
    }

    /// Builds the header matching this animation's layout
    pub fn header(&self) -> RatHeader {
        let n = self.vertex_count;
        let bit_widths_offset = HEADER_SIZE;
        let mesh_filename_offset = bit_widths_offset + n * 6;
        let filename_end = mesh_filename_offset + self.mesh_data_filename.len() as u32;
        let raw_first_frame_offset = if self.raw_first_frame.is_some() {
            filename_end
        } else {
            0
        };
        RatHeader {
            vertex_count: n,
            frame_count: self.frame_count,
            index_count: self.index_count,
            delta_offset: self.static_payload_size(),
            bit_widths_offset,
            mesh_filename_offset,
            mesh_filename_length: self.mesh_data_filename.len() as u32,
            bounds: self.bounds,
            is_first_frame_raw: self.raw_first_frame.is_some(),
            raw_first_frame_offset,
        }
    }

    /// Bits consumed by one frame's worth of deltas
    ///
    /// Summed from the stored per-vertex widths on every call; the per-frame
    /// cost is constant across the animation.
    pub fn bits_per_frame(&self) -> u64 {
        self.bit_widths_x
            .iter()
            .zip(&self.bit_widths_y)
            .zip(&self.bit_widths_z)
            .map(|((x, y), z)| u64::from(*x) + u64::from(*y) + u64::from(*z))
            .sum()
    }

    /// Frames materializable from the delta words actually present
    ///
    /// For a fully assembled animation this equals `frame_count`; for a lone
    /// chunk of a size-split animation it reports how far a cursor can decode
    /// before running out of stream.
    pub fn frame_capacity(&self) -> u32 {
        if self.frame_count <= 1 {
            return self.frame_count;
        }
        let bits = self.bits_per_frame();
        if bits == 0 {
            return self.frame_count;
        }
        let decodable = (self.delta_stream.len() as u64 * 32) / bits;
        let capacity = decodable.saturating_add(1);
        self.frame_count.min(u32::try_from(capacity).unwrap_or(u32::MAX))
    }

    /// Creates a cursor positioned at frame 0
    pub fn create_cursor(&self) -> FrameCursor {
        FrameCursor::new(self)
    }

    /// Validates structural invariants of the animation
    pub fn validate(&self) -> Result<()> {
        if self.frame_count == 0 {
            return Err(RatError::ValidationError(
                "animation must have at least one frame".to_string(),
            ));
        }
        if self.vertex_count == 0 {
            return Err(RatError::ValidationError(
                "animation must have at least one vertex".to_string(),
            ));
        }
        let n = self.vertex_count as usize;
        for (name, len) in [
            ("first frame", self.first_frame.len()),
            ("x bit widths", self.bit_widths_x.len()),
            ("y bit widths", self.bit_widths_y.len()),
            ("z bit widths", self.bit_widths_z.len()),
        ] {
            if len != n {
                return Err(RatError::ValidationError(format!(
                    "{name} holds {len} entries, expected {n}"
                )));
            }
        }
        if let Some(raw) = &self.raw_first_frame {
            if raw.len() != n {
                return Err(RatError::ValidationError(format!(
                    "raw first frame holds {} entries, expected {n}",
                    raw.len()
                )));
            }
        }
        for &width in self
            .bit_widths_x
            .iter()
            .chain(&self.bit_widths_y)
            .chain(&self.bit_widths_z)
        {
            if width == 0 || width > 32 {
                return Err(RatError::InvalidBitWidth(width));
            }
        }
        for axis in 0..3 {
            let (min, max) = self.bounds.axis(axis);
            if max < min {
                return Err(RatError::ValidationError(format!(
                    "bounding box axis {axis} inverted: min {min} > max {max}"
                )));
            }
            if max == min {
                log::warn!("degenerate bounding box on axis {axis} (min == max == {min})");
            }
        }
        Ok(())
    }

    /// Parses an animation from a reader
    ///
    /// Malformed input (bad magic, truncation, inconsistent counts) is
    /// surfaced as an error, never silently recovered.
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let header = RatHeader::parse(reader)?;
        if header.frame_count == 0 || header.vertex_count == 0 {
            return Err(RatError::ValidationError(format!(
                "header declares {} vertices and {} frames, both must be nonzero",
                header.vertex_count, header.frame_count
            )));
        }

        let n = header.vertex_count as usize;
        let static_end = u64::from(header.delta_offset);
        if static_end > file_len {
            return Err(RatError::Truncated {
                expected: static_end,
                actual: file_len,
            });
        }

        // Bit-width tables, one block per axis.
        reader.seek(SeekFrom::Start(u64::from(header.bit_widths_offset)))?;
        let mut bit_widths_x = vec![0u8; n];
        let mut bit_widths_y = vec![0u8; n];
        let mut bit_widths_z = vec![0u8; n];
        reader.read_exact(&mut bit_widths_x)?;
        reader.read_exact(&mut bit_widths_y)?;
        reader.read_exact(&mut bit_widths_z)?;

        // Quantized first frame sits directly after the bit widths.
        let mut first_frame = Vec::with_capacity(n);
        for _ in 0..n {
            let mut q = [0u8; 3];
            reader.read_exact(&mut q)?;
            first_frame.push(q);
        }

        reader.seek(SeekFrom::Start(u64::from(header.mesh_filename_offset)))?;
        let mut name_bytes = vec![0u8; header.mesh_filename_length as usize];
        reader.read_exact(&mut name_bytes)?;
        let mesh_data_filename = String::from_utf8(name_bytes)
            .map_err(|_| RatError::ParseError("mesh filename is not valid UTF-8".to_string()))?;

        let raw_first_frame = if header.is_first_frame_raw {
            reader.seek(SeekFrom::Start(u64::from(header.raw_first_frame_offset)))?;
            let mut raw = Vec::with_capacity(n);
            for _ in 0..n {
                raw.push(Vec3::read(reader)?);
            }
            Some(raw)
        } else {
            None
        };

        // Delta stream runs from its offset to end of file.
        reader.seek(SeekFrom::Start(u64::from(header.delta_offset)))?;
        let delta_bytes = file_len - u64::from(header.delta_offset);
        if delta_bytes % 4 != 0 {
            return Err(RatError::ParseError(format!(
                "delta stream is {delta_bytes} bytes, not a whole number of 32-bit words"
            )));
        }
        let word_count = (delta_bytes / 4) as usize;
        let mut delta_stream = Vec::with_capacity(word_count);
        for _ in 0..word_count {
            delta_stream.push(reader.read_u32_le()?);
        }

        let animation = Self {
            vertex_count: header.vertex_count,
            frame_count: header.frame_count,
            index_count: header.index_count,
            bounds: header.bounds,
            mesh_data_filename,
            first_frame,
            raw_first_frame,
            bit_widths_x,
            bit_widths_y,
            bit_widths_z,
            delta_stream,
        };
        animation.validate()?;
        log::debug!(
            "parsed RAT animation: {} vertices, {} frames, {} delta words",
            animation.vertex_count,
            animation.frame_count,
            animation.delta_stream.len()
        );
        Ok(animation)
    }

    /// Loads an animation from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::parse(&mut reader)
    }

    /// Writes the animation with the given delta words as its stream
    ///
    /// The chunked writer reuses this to emit each chunk file with the full
    /// static payload but only a slice of the stream.
    pub(crate) fn write_with_deltas<W: Write>(&self, writer: &mut W, deltas: &[u32]) -> Result<()> {
        self.header().write(writer)?;
        writer.write_all(&self.bit_widths_x)?;
        writer.write_all(&self.bit_widths_y)?;
        writer.write_all(&self.bit_widths_z)?;
        for q in &self.first_frame {
            writer.write_all(q)?;
        }
        writer.write_all(self.mesh_data_filename.as_bytes())?;
        if let Some(raw) = &self.raw_first_frame {
            for v in raw {
                v.write(writer)?;
            }
        }
        for &word in deltas {
            writer.write_u32_le(word)?;
        }
        Ok(())
    }

    /// Writes the complete single-file layout to a writer
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.validate()?;
        self.write_with_deltas(writer, &self.delta_stream)
    }

    /// Saves the animation to a single file, regardless of size
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_with_deltas(&mut writer, &self.delta_stream)?;
        writer.flush()?;
        Ok(())
    }
}
