//! Bit-granular packing into 32-bit words
//!
//! The delta stream stores one variable-width field per vertex axis per frame,
//! so storage has to be addressable at single-bit granularity while staying a
//! plain `u32` array on disk. [`BitWriter`] packs fields MSB-first into a word
//! accumulator, splitting fields that straddle a word boundary; [`BitReader`]
//! is the exact mirror image.

use crate::error::{RatError, Result};

/// Mask selecting the low `bits` bits of a word
#[inline]
fn low_mask(bits: u8) -> u32 {
    if bits >= 32 { u32::MAX } else { (1u32 << bits) - 1 }
}

/// Sign-extends a `bits`-wide two's-complement field to a full `i32`
///
/// The top bit of the field is the sign bit; when set, all higher bits of the
/// result are filled with ones.
#[inline]
pub fn sign_extend(value: u32, bits: u8) -> i32 {
    if bits == 0 || bits >= 32 {
        return value as i32;
    }
    if value & (1 << (bits - 1)) != 0 {
        (value | (u32::MAX << bits)) as i32
    } else {
        value as i32
    }
}

/// Packs variable-width unsigned fields MSB-first into 32-bit words
#[derive(Debug, Default)]
pub struct BitWriter {
    words: Vec<u32>,
    acc: u32,
    /// Bits already occupied in `acc`, counted from the MSB side
    used: u8,
}

impl BitWriter {
    /// Creates an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bits written so far
    pub fn bit_len(&self) -> u64 {
        self.words.len() as u64 * 32 + self.used as u64
    }

    /// Appends the low `bits` bits of `value`, most significant bit first
    ///
    /// Bit counts outside `1..=32` are a contract violation and are rejected.
    pub fn write(&mut self, value: u32, bits: u8) -> Result<()> {
        if bits == 0 || bits > 32 {
            return Err(RatError::InvalidBitWidth(bits));
        }
        let value = value & low_mask(bits);
        let remaining = 32 - self.used;
        if bits <= remaining {
            self.acc |= value << (remaining - bits);
            self.used += bits;
            if self.used == 32 {
                self.words.push(self.acc);
                self.acc = 0;
                self.used = 0;
            }
        } else {
            // Field straddles the word boundary: top part completes the
            // current word, the spill starts a fresh accumulator.
            let spill = bits - remaining;
            self.acc |= value >> spill;
            self.words.push(self.acc);
            self.acc = (value & low_mask(spill)) << (32 - spill);
            self.used = spill;
        }
        Ok(())
    }

    /// Flushes any partial trailing word and returns the packed words
    pub fn finish(mut self) -> Vec<u32> {
        if self.used > 0 {
            self.words.push(self.acc);
        }
        self.words
    }
}

/// Reads variable-width unsigned fields MSB-first from packed 32-bit words
#[derive(Debug)]
pub struct BitReader<'a> {
    words: &'a [u32],
    pos: u64,
}

impl<'a> BitReader<'a> {
    /// Creates a reader positioned at the first bit of `words`
    pub fn new(words: &'a [u32]) -> Self {
        Self { words, pos: 0 }
    }

    /// Current bit offset from the start of the stream
    pub fn bit_position(&self) -> u64 {
        self.pos
    }

    /// Total bits available in the stream
    pub fn bit_len(&self) -> u64 {
        self.words.len() as u64 * 32
    }

    /// Repositions the reader at an absolute bit offset
    pub fn seek(&mut self, bit_offset: u64) {
        self.pos = bit_offset;
    }

    /// Reads the next `bits` bits as an unsigned value
    ///
    /// Reading 0 bits returns 0 without advancing. Reading past the end of
    /// the word array fails with [`RatError::EndOfStream`].
    pub fn read(&mut self, bits: u8) -> Result<u32> {
        if bits == 0 {
            return Ok(0);
        }
        if bits > 32 {
            return Err(RatError::InvalidBitWidth(bits));
        }
        let end = self.pos + bits as u64;
        if end > self.bit_len() {
            return Err(RatError::EndOfStream {
                needed: bits as u32,
                offset: self.pos,
                available: self.bit_len(),
            });
        }

        let word = (self.pos / 32) as usize;
        let offset = (self.pos % 32) as u8;
        let avail = 32 - offset;
        let value = if bits <= avail {
            (self.words[word] >> (avail - bits)) & low_mask(bits)
        } else {
            let spill = bits - avail;
            let hi = (self.words[word] & low_mask(avail)) << spill;
            let lo = self.words[word + 1] >> (32 - spill);
            hi | lo
        };
        self.pos = end;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_packing() {
        let mut writer = BitWriter::new();
        writer.write(0b101, 3).unwrap();
        writer.write(0b01, 2).unwrap();
        let words = writer.finish();

        // 10101 packed from the most significant bit down
        assert_eq!(words, vec![0b10101 << 27]);
    }

    #[test]
    fn test_word_boundary_split() {
        let mut writer = BitWriter::new();
        writer.write(0, 30).unwrap();
        writer.write(0b1111, 4).unwrap();
        let words = writer.finish();

        // Top two field bits complete word 0, the spill leads word 1.
        assert_eq!(words, vec![0b11, 0b11 << 30]);
    }

    #[test]
    fn test_full_word_writes() {
        let mut writer = BitWriter::new();
        writer.write(0xDEAD_BEEF, 32).unwrap();
        writer.write(0x1234_5678, 32).unwrap();
        assert_eq!(writer.finish(), vec![0xDEAD_BEEF, 0x1234_5678]);
    }

    #[test]
    fn test_value_masked_to_width() {
        let mut writer = BitWriter::new();
        writer.write(0xFFFF_FFFF, 4).unwrap();
        assert_eq!(writer.finish(), vec![0b1111 << 28]);
    }

    #[test]
    fn test_invalid_bit_counts() {
        let mut writer = BitWriter::new();
        assert!(matches!(
            writer.write(0, 0),
            Err(RatError::InvalidBitWidth(0))
        ));
        assert!(matches!(
            writer.write(0, 33),
            Err(RatError::InvalidBitWidth(33))
        ));
    }

    #[test]
    fn test_reader_mirrors_writer() {
        let mut writer = BitWriter::new();
        let fields: [(u32, u8); 7] = [
            (1, 1),
            (0x1FF, 9),
            (0, 3),
            (0xDEAD_BEEF, 32),
            (0b101, 3),
            (127, 8),
            (1, 2),
        ];
        for &(value, bits) in &fields {
            writer.write(value, bits).unwrap();
        }
        let words = writer.finish();

        let mut reader = BitReader::new(&words);
        for &(value, bits) in &fields {
            assert_eq!(reader.read(bits).unwrap(), value & low_mask(bits));
        }
    }

    #[test]
    fn test_read_zero_bits() {
        let words = [0xFFFF_FFFF];
        let mut reader = BitReader::new(&words);
        assert_eq!(reader.read(0).unwrap(), 0);
        assert_eq!(reader.bit_position(), 0);
    }

    #[test]
    fn test_read_past_end() {
        let words = [0u32];
        let mut reader = BitReader::new(&words);
        reader.read(30).unwrap();
        let err = reader.read(5).unwrap_err();
        assert!(matches!(
            err,
            RatError::EndOfStream {
                needed: 5,
                offset: 30,
                available: 32,
            }
        ));
    }

    #[test]
    fn test_seek() {
        let mut writer = BitWriter::new();
        writer.write(0b111, 3).unwrap();
        writer.write(0b0101, 4).unwrap();
        let words = writer.finish();

        let mut reader = BitReader::new(&words);
        reader.seek(3);
        assert_eq!(reader.read(4).unwrap(), 0b0101);
    }

    #[test]
    fn test_sign_extend() {
        assert_eq!(sign_extend(0b1, 1), -1);
        assert_eq!(sign_extend(0b0, 1), 0);
        assert_eq!(sign_extend(0b1111_1111, 8), -1);
        assert_eq!(sign_extend(0b0111_1111, 8), 127);
        assert_eq!(sign_extend(0b1_0000_0000, 9), -256);
        assert_eq!(sign_extend(0b1_1111_1111, 9), -1);
        assert_eq!(sign_extend(255, 9), 255);
    }
}
