//! Size-bounded file output and multi-file reassembly
//!
//! Distribution channels cap individual file sizes, so an animation whose
//! serialized form exceeds a byte budget is split into chunk files. Every
//! chunk repeats the full static payload (header, bit widths, first frame,
//! filename, optional raw frame) and carries a word-aligned slice of the
//! delta stream; the header's total frame count lets a consumer of a lone
//! chunk know how much of the animation it is missing. [`RatAnimation::assemble`]
//! is the inverse, stitching chunk streams back together after checking the
//! static payloads agree.

use std::path::{Path, PathBuf};

use crate::animation::RatAnimation;
use crate::error::{RatError, Result};

/// Builds the chunk filename `{stem}_part{NN}of{MM}{.ext}`
fn chunk_path(path: &Path, part: usize, total: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_part{part:02}of{total:02}.{}", ext.to_string_lossy()),
        None => format!("{stem}_part{part:02}of{total:02}"),
    };
    path.with_file_name(name)
}

impl RatAnimation {
    /// Serialized size of the single-file layout in bytes
    pub fn file_size(&self) -> u64 {
        u64::from(self.static_payload_size()) + self.delta_stream.len() as u64 * 4
    }

    /// Saves the animation, splitting into chunk files to honor `byte_budget`
    ///
    /// When everything fits, a single file is written at `path` and returned
    /// alone. Otherwise the delta stream is sliced across
    /// `{stem}_part{NN}of{MM}.{ext}` files, each at most `byte_budget` bytes,
    /// and the paths are returned in part order. A budget too small to hold
    /// the static payload plus one delta word fails with
    /// [`RatError::BudgetExceeded`] before any file is created.
    pub fn save_chunked<P: AsRef<Path>>(&self, path: P, byte_budget: u64) -> Result<Vec<PathBuf>> {
        self.validate()?;
        let path = path.as_ref();
        let static_size = u64::from(self.static_payload_size());

        if self.file_size() <= byte_budget {
            self.save(path)?;
            return Ok(vec![path.to_path_buf()]);
        }
        // Every chunk must carry the static payload and at least one word of
        // stream, otherwise splitting cannot make progress. An animation with
        // no stream at all cannot be split either.
        if self.delta_stream.is_empty() || static_size + 4 > byte_budget {
            return Err(RatError::BudgetExceeded {
                budget: byte_budget,
                required: static_size + if self.delta_stream.is_empty() { 0 } else { 4 },
            });
        }

        let words_per_chunk = ((byte_budget - static_size) / 4) as usize;
        let total_words = self.delta_stream.len();
        let num_files = total_words.div_ceil(words_per_chunk);
        log::info!(
            "splitting {} byte animation into {num_files} chunks of at most {byte_budget} bytes",
            self.file_size()
        );

        let mut paths = Vec::with_capacity(num_files);
        for (index, slice) in self.delta_stream.chunks(words_per_chunk).enumerate() {
            let chunk = chunk_path(path, index + 1, num_files);
            let file = std::fs::File::create(&chunk)?;
            let mut writer = std::io::BufWriter::new(file);
            self.write_with_deltas(&mut writer, slice)?;
            std::io::Write::flush(&mut writer)?;
            paths.push(chunk);
        }
        Ok(paths)
    }

    /// Reassembles a split animation from its chunk files
    ///
    /// `paths` must be given in part order; the shared static payload of
    /// every chunk is checked against the first before the delta streams are
    /// concatenated. Disagreement fails with [`RatError::ChunkMismatch`].
    pub fn assemble<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let Some((first, rest)) = paths.split_first() else {
            return Err(RatError::ChunkMismatch(
                "no chunk files given".to_string(),
            ));
        };
        let mut assembled = Self::load(first)?;
        for path in rest {
            let chunk = Self::load(path)?;
            let same_static = chunk.vertex_count == assembled.vertex_count
                && chunk.frame_count == assembled.frame_count
                && chunk.index_count == assembled.index_count
                && chunk.bounds == assembled.bounds
                && chunk.mesh_data_filename == assembled.mesh_data_filename
                && chunk.first_frame == assembled.first_frame
                && chunk.raw_first_frame == assembled.raw_first_frame
                && chunk.bit_widths_x == assembled.bit_widths_x
                && chunk.bit_widths_y == assembled.bit_widths_y
                && chunk.bit_widths_z == assembled.bit_widths_z;
            if !same_static {
                return Err(RatError::ChunkMismatch(format!(
                    "chunk {} does not belong to the same animation",
                    path.as_ref().display()
                )));
            }
            assembled.delta_stream.extend_from_slice(&chunk.delta_stream);
        }
        assembled.validate()?;
        Ok(assembled)
    }
}
