//! Mapping between float positions and the 8-bit-per-axis quantized space
//!
//! Quantization is normalized against the single animation-wide bounding box,
//! never per frame, so quantized values stay comparable across frames and the
//! delta encoder can work directly on the quantized bytes.

use crate::types::{BoundingBox, Vec3};

/// Width of the quantized range per axis (inclusive maximum value)
pub const QUANT_MAX: f32 = 255.0;

/// Effective range for an axis, substituting a unit range for degenerate axes
///
/// When `max == min` every value on the axis quantizes to 0 and dequantizes
/// back to the minimum, so the substitution only avoids a division by zero.
#[inline]
fn axis_range(min: f32, max: f32) -> f32 {
    if max > min { max - min } else { 1.0 }
}

/// Quantizes a single component into the 0-255 range
///
/// Values outside `[min, max]` are a caller error; the codec does not clamp.
#[inline]
pub fn quantize(value: f32, min: f32, max: f32) -> u8 {
    (QUANT_MAX * (value - min) / axis_range(min, max)).round() as u8
}

/// Maps a quantized component back into the original range
#[inline]
pub fn dequantize(q: u8, min: f32, max: f32) -> f32 {
    min + (q as f32 / QUANT_MAX) * (max - min)
}

/// Quantizes a position against the animation bounding box
pub fn quantize_position(v: Vec3, bounds: &BoundingBox) -> [u8; 3] {
    [
        quantize(v.x, bounds.min.x, bounds.max.x),
        quantize(v.y, bounds.min.y, bounds.max.y),
        quantize(v.z, bounds.min.z, bounds.max.z),
    ]
}

/// Dequantizes a position against the animation bounding box
pub fn dequantize_position(q: [u8; 3], bounds: &BoundingBox) -> Vec3 {
    Vec3::new(
        dequantize(q[0], bounds.min.x, bounds.max.x),
        dequantize(q[1], bounds.min.y, bounds.max.y),
        dequantize(q[2], bounds.min.z, bounds.max.z),
    )
}

/// One quantization step per axis, the worst-case round-trip error bound
pub fn quantization_step(bounds: &BoundingBox) -> Vec3 {
    Vec3::new(
        (bounds.max.x - bounds.min.x) / QUANT_MAX,
        (bounds.max.y - bounds.min.y) / QUANT_MAX,
        (bounds.max.z - bounds.min.z) / QUANT_MAX,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(quantize(-1.0, -1.0, 1.0), 0);
        assert_eq!(quantize(1.0, -1.0, 1.0), 255);
        assert_eq!(quantize(0.0, -1.0, 1.0), 128); // 127.5 rounds up
    }

    #[test]
    fn test_degenerate_axis() {
        // Flat axis: everything lands on the minimum.
        assert_eq!(quantize(5.0, 5.0, 5.0), 0);
        assert_eq!(dequantize(0, 5.0, 5.0), 5.0);
    }

    #[test]
    fn test_round_trip_error_within_one_step() {
        let min = -10.0;
        let max = 30.0;
        let step = (max - min) / QUANT_MAX;
        let mut v = min;
        while v <= max {
            let q = quantize(v, min, max);
            let back = dequantize(q, min, max);
            assert!(
                (back - v).abs() <= step,
                "value {v} round-tripped to {back}, off by more than {step}"
            );
            v += 0.37;
        }
    }

    #[test]
    fn test_position_round_trip() {
        let bounds = BoundingBox::new(Vec3::new(0.0, -1.0, 10.0), Vec3::new(255.0, 1.0, 10.0));
        let v = Vec3::new(42.0, 0.5, 10.0);
        let q = quantize_position(v, &bounds);
        assert_eq!(q, [42, 191, 0]);

        let back = dequantize_position(q, &bounds);
        let step = quantization_step(&bounds);
        assert!((back.x - v.x).abs() <= step.x);
        assert!((back.y - v.y).abs() <= step.y);
        assert_eq!(back.z, 10.0);
    }
}
