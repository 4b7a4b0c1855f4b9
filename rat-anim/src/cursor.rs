//! Stateful frame decoding
//!
//! A [`FrameCursor`] owns the quantized position buffer for one playback
//! position. The delta stream only moves forward, so seeking backward resets
//! the cursor to frame 0 and replays; seeking forward materializes every
//! intermediate frame on the way. The cursor holds no reference into the
//! animation, so any number of cursors can decode from a shared
//! [`RatAnimation`] at once.

use crate::animation::RatAnimation;
use crate::bitstream::{BitReader, sign_extend};
use crate::error::Result;
use crate::quantize::dequantize_position;
use crate::types::Vec3;

/// Decoding position within an animation
#[derive(Debug, Clone)]
pub struct FrameCursor {
    positions: Vec<[u8; 3]>,
    frame: u32,
}

impl FrameCursor {
    /// Creates a cursor materialized at frame 0
    pub fn new(animation: &RatAnimation) -> Self {
        Self {
            positions: animation.first_frame.clone(),
            frame: 0,
        }
    }

    /// Frame the cursor currently holds
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Quantized positions of the current frame
    pub fn positions(&self) -> &[[u8; 3]] {
        &self.positions
    }

    /// Advances (or rewinds) the cursor to `target`
    ///
    /// Targets past the last frame are clamped to it. A backward seek resets
    /// to frame 0 and replays forward. Fails with
    /// [`EndOfStream`](crate::RatError::EndOfStream) when the delta stream
    /// ends before the target frame, as it does on a lone chunk of a
    /// size-split animation; the cursor keeps the last fully decoded frame.
    pub fn decode_to(&mut self, animation: &RatAnimation, target: u32) -> Result<()> {
        let target = target.min(animation.frame_count.saturating_sub(1));
        if target < self.frame {
            self.positions.copy_from_slice(&animation.first_frame);
            self.frame = 0;
        }
        if target == self.frame {
            return Ok(());
        }

        let mut reader = BitReader::new(&animation.delta_stream);
        reader.seek(animation.bits_per_frame() * u64::from(self.frame));
        while self.frame < target {
            self.decode_next(animation, &mut reader)?;
        }
        Ok(())
    }

    /// Applies one frame's worth of deltas from the reader
    fn decode_next(&mut self, animation: &RatAnimation, reader: &mut BitReader<'_>) -> Result<()> {
        // Check the whole frame fits before touching the buffer, so a short
        // stream never leaves the cursor half-updated.
        let needed = animation.bits_per_frame();
        if reader.bit_position() + needed > reader.bit_len() {
            return Err(crate::error::RatError::EndOfStream {
                needed: u32::try_from(needed).unwrap_or(u32::MAX),
                offset: reader.bit_position(),
                available: reader.bit_len(),
            });
        }
        for (vertex, position) in self.positions.iter_mut().enumerate() {
            let widths = [
                animation.bit_widths_x[vertex],
                animation.bit_widths_y[vertex],
                animation.bit_widths_z[vertex],
            ];
            for axis in 0..3 {
                let raw = reader.read(widths[axis])?;
                let delta = sign_extend(raw, widths[axis]);
                position[axis] = position[axis].wrapping_add(delta as u8);
            }
        }
        self.frame += 1;
        Ok(())
    }

    /// Current frame as float positions
    ///
    /// At frame 0 of an animation carrying a raw first frame this returns the
    /// stored originals; everywhere else the quantized positions are mapped
    /// back through the animation bounds.
    pub fn dequantized(&self, animation: &RatAnimation) -> Vec<Vec3> {
        if self.frame == 0 {
            if let Some(raw) = &animation.raw_first_frame {
                return raw.clone();
            }
        }
        self.positions
            .iter()
            .map(|&q| dequantize_position(q, &animation.bounds))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{CompressOptions, compress};
    use crate::error::RatError;

    fn sliding_frames(frame_count: usize) -> Vec<Vec<Vec3>> {
        (0..frame_count)
            .map(|frame| {
                (0..4)
                    .map(|vertex| {
                        Vec3::new(
                            frame as f32 + vertex as f32 * 10.0,
                            (frame * vertex) as f32,
                            -(frame as f32),
                        )
                    })
                    .collect()
            })
            .collect()
    }

    fn quantized_input(frames: &[Vec<Vec3>], anim: &RatAnimation) -> Vec<Vec<[u8; 3]>> {
        frames
            .iter()
            .map(|positions| {
                positions
                    .iter()
                    .map(|v| crate::quantize::quantize_position(*v, &anim.bounds))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_forward_decode_matches_input() {
        let frames = sliding_frames(8);
        let anim = compress(&frames, &CompressOptions::default()).unwrap();
        let expected = quantized_input(&frames, &anim);

        let mut cursor = anim.create_cursor();
        for (frame, positions) in expected.iter().enumerate() {
            cursor.decode_to(&anim, frame as u32).unwrap();
            assert_eq!(cursor.frame(), frame as u32);
            assert_eq!(cursor.positions(), positions.as_slice());
        }
    }

    #[test]
    fn test_backward_seek_replays_from_start() {
        let frames = sliding_frames(8);
        let anim = compress(&frames, &CompressOptions::default()).unwrap();
        let expected = quantized_input(&frames, &anim);

        let mut cursor = anim.create_cursor();
        cursor.decode_to(&anim, 7).unwrap();
        cursor.decode_to(&anim, 2).unwrap();
        assert_eq!(cursor.frame(), 2);
        assert_eq!(cursor.positions(), expected[2].as_slice());
    }

    #[test]
    fn test_jump_matches_step_by_step() {
        let frames = sliding_frames(10);
        let anim = compress(&frames, &CompressOptions::default()).unwrap();

        let mut jumper = anim.create_cursor();
        jumper.decode_to(&anim, 9).unwrap();

        let mut stepper = anim.create_cursor();
        for frame in 0..=9 {
            stepper.decode_to(&anim, frame).unwrap();
        }
        assert_eq!(jumper.positions(), stepper.positions());
    }

    #[test]
    fn test_target_clamped_to_last_frame() {
        let frames = sliding_frames(5);
        let anim = compress(&frames, &CompressOptions::default()).unwrap();

        let mut cursor = anim.create_cursor();
        cursor.decode_to(&anim, 1000).unwrap();
        assert_eq!(cursor.frame(), 4);
    }

    #[test]
    fn test_truncated_stream_errors() {
        let frames = sliding_frames(6);
        let mut anim = compress(&frames, &CompressOptions::default()).unwrap();
        anim.delta_stream.truncate(anim.delta_stream.len() / 2);

        let mut cursor = anim.create_cursor();
        let err = cursor.decode_to(&anim, 5).unwrap_err();
        assert!(matches!(err, RatError::EndOfStream { .. }));
        assert!(cursor.frame() < 5);
    }

    #[test]
    fn test_dequantized_within_one_step() {
        let frames = sliding_frames(6);
        let anim = compress(&frames, &CompressOptions::default()).unwrap();
        let step = crate::quantize::quantization_step(&anim.bounds);

        let mut cursor = anim.create_cursor();
        for (frame, positions) in frames.iter().enumerate() {
            cursor.decode_to(&anim, frame as u32).unwrap();
            for (decoded, original) in cursor.dequantized(&anim).iter().zip(positions) {
                assert!((decoded.x - original.x).abs() <= step.x);
                assert!((decoded.y - original.y).abs() <= step.y);
                assert!((decoded.z - original.z).abs() <= step.z);
            }
        }
    }

    #[test]
    fn test_raw_first_frame_returned_exactly() {
        let frames = sliding_frames(3);
        let options = CompressOptions {
            keep_raw_first_frame: true,
            ..CompressOptions::default()
        };
        let anim = compress(&frames, &options).unwrap();

        let mut cursor = anim.create_cursor();
        assert_eq!(cursor.dequantized(&anim), frames[0]);

        // Off frame 0 the raw copy no longer applies.
        cursor.decode_to(&anim, 1).unwrap();
        assert_ne!(cursor.frame(), 0);
        cursor.decode_to(&anim, 0).unwrap();
        assert_eq!(cursor.dequantized(&anim), frames[0]);
    }
}
