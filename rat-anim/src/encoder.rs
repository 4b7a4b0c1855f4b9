//! Compression of raw vertex frames into a [`RatAnimation`]
//!
//! Encoding is two passes over the quantized frames. The first pass finds,
//! per vertex and per axis, the largest absolute delta between consecutive
//! frames and derives the smallest signed width that holds it. The second
//! pass replays the animation against a running reconstruction and emits one
//! delta field per vertex axis per frame into the bit stream. Without a width
//! cap the derived widths hold every delta exactly and the reconstruction
//! tracks the quantized input bit for bit; with a cap, deltas are clamped to
//! the representable range and the error stays bounded because each frame is
//! encoded against what the decoder will actually have.

use crate::animation::RatAnimation;
use crate::bitstream::BitWriter;
use crate::error::{RatError, Result};
use crate::quantize::quantize_position;
use crate::types::{BoundingBox, Vec3};

/// Widest delta field the encoder ever emits
///
/// Quantized components live in 0..=255, so consecutive-frame deltas span
/// -255..=255 and always fit in 9 signed bits.
pub const MAX_DELTA_BITS: u8 = 9;

/// Options controlling compression
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// Filename of the companion mesh data file, stored verbatim
    pub mesh_data_filename: String,
    /// Index count of the companion mesh, carried through to the header
    pub index_count: u32,
    /// Store an unquantized copy of frame 0 alongside the quantized one
    pub keep_raw_first_frame: bool,
    /// Cap on per-vertex delta widths, in `1..=8`
    ///
    /// `None` keeps the lossless per-delta encoding. Capping trades exact
    /// delta reproduction for a smaller stream; deltas wider than the cap are
    /// clamped, and the encoder compensates on later frames.
    pub bit_width_cap: Option<u8>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            mesh_data_filename: String::new(),
            index_count: 0,
            keep_raw_first_frame: false,
            bit_width_cap: None,
        }
    }
}

/// Smallest signed two's-complement width holding `max_abs` and its negation
pub(crate) fn delta_bit_width(max_abs: u32) -> u8 {
    let mut bits = 1u8;
    while bits < MAX_DELTA_BITS && (1u32 << (bits - 1)) <= max_abs {
        bits += 1;
    }
    bits
}

/// Compresses vertex frames into a RAT animation
///
/// Every frame must hold the same, nonzero number of vertices. Positions are
/// quantized against the single bounding box of the whole animation, so the
/// per-axis error bound is one quantization step.
pub fn compress(frames: &[Vec<Vec3>], options: &CompressOptions) -> Result<RatAnimation> {
    if frames.is_empty() {
        return Err(RatError::ValidationError(
            "cannot compress an empty frame list".to_string(),
        ));
    }
    let vertex_count = frames[0].len();
    if vertex_count == 0 {
        return Err(RatError::ValidationError(
            "frames hold no vertices".to_string(),
        ));
    }
    for (frame, positions) in frames.iter().enumerate() {
        if positions.len() != vertex_count {
            return Err(RatError::FrameSizeMismatch {
                frame,
                expected: vertex_count,
                actual: positions.len(),
            });
        }
    }
    if let Some(cap) = options.bit_width_cap {
        if cap == 0 || cap >= MAX_DELTA_BITS {
            return Err(RatError::InvalidBitWidth(cap));
        }
    }

    // from_frames only fails on an empty vertex set, checked above.
    let bounds = BoundingBox::from_frames(frames).ok_or_else(|| {
        RatError::ValidationError("frames hold no vertices".to_string())
    })?;

    let quantized: Vec<Vec<[u8; 3]>> = frames
        .iter()
        .map(|positions| {
            positions
                .iter()
                .map(|v| quantize_position(*v, &bounds))
                .collect()
        })
        .collect();

    // Pass 1: widest delta seen per vertex per axis.
    let mut max_abs = vec![[0u32; 3]; vertex_count];
    for pair in quantized.windows(2) {
        for (vertex, abs) in max_abs.iter_mut().enumerate() {
            for axis in 0..3 {
                let delta =
                    i32::from(pair[1][vertex][axis]) - i32::from(pair[0][vertex][axis]);
                abs[axis] = abs[axis].max(delta.unsigned_abs());
            }
        }
    }

    let width_for = |abs: u32| match options.bit_width_cap {
        Some(cap) => delta_bit_width(abs).min(cap),
        None => delta_bit_width(abs),
    };
    let bit_widths_x: Vec<u8> = max_abs.iter().map(|abs| width_for(abs[0])).collect();
    let bit_widths_y: Vec<u8> = max_abs.iter().map(|abs| width_for(abs[1])).collect();
    let bit_widths_z: Vec<u8> = max_abs.iter().map(|abs| width_for(abs[2])).collect();

    // Pass 2: emit deltas against the reconstruction the decoder will build.
    // Without a cap the clamp never fires and the reconstruction equals the
    // quantized input exactly.
    let mut writer = BitWriter::new();
    let mut recon = quantized[0].clone();
    for target in &quantized[1..] {
        for (vertex, positions) in target.iter().enumerate() {
            let widths = [
                bit_widths_x[vertex],
                bit_widths_y[vertex],
                bit_widths_z[vertex],
            ];
            for axis in 0..3 {
                let width = widths[axis];
                let lo = -(1i32 << (width - 1));
                let hi = (1i32 << (width - 1)) - 1;
                let delta =
                    (i32::from(positions[axis]) - i32::from(recon[vertex][axis])).clamp(lo, hi);
                writer.write(delta as u32, width)?;
                recon[vertex][axis] = recon[vertex][axis].wrapping_add(delta as u8);
            }
        }
    }

    let animation = RatAnimation {
        vertex_count: vertex_count as u32,
        frame_count: frames.len() as u32,
        index_count: options.index_count,
        bounds,
        mesh_data_filename: options.mesh_data_filename.clone(),
        first_frame: quantized[0].clone(),
        raw_first_frame: options.keep_raw_first_frame.then(|| frames[0].clone()),
        bit_widths_x,
        bit_widths_y,
        bit_widths_z,
        delta_stream: writer.finish(),
    };
    log::debug!(
        "compressed {} frames x {} vertices into {} delta words",
        animation.frame_count,
        animation.vertex_count,
        animation.delta_stream.len()
    );
    animation.validate()?;
    Ok(animation)
}
