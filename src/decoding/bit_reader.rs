/// Reads bits from a byte slice, most significant bit of each byte first.
///
/// This is the counterpart of [`crate::encoding::bit_writer::BitWriter`].
pub struct BitReader<'s> {
    idx: usize, //index counts bits already read
    source: &'s [u8],
}

#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum GetBitsError {
    TooManyBits {
        num_requested_bits: usize,
        limit: u8,
    },
    NotEnoughRemainingBits {
        requested: usize,
        remaining: usize,
    },
}

#[cfg(feature = "std")]
impl std::error::Error for GetBitsError {}

impl core::fmt::Display for GetBitsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GetBitsError::TooManyBits {
                num_requested_bits,
                limit,
            } => {
                write!(
                    f,
                    "Cant serve this request. The reader is limited to {} bits, requested {} bits",
                    limit, num_requested_bits,
                )
            }
            GetBitsError::NotEnoughRemainingBits {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "Can't read {} bits, only have {} bits left",
                    requested, remaining,
                )
            }
        }
    }
}

impl<'s> BitReader<'s> {
    pub fn new(source: &'s [u8]) -> BitReader<'s> {
        BitReader { idx: 0, source }
    }

    pub fn bits_left(&self) -> usize {
        self.source.len() * 8 - self.idx
    }

    pub fn bits_read(&self) -> usize {
        self.idx
    }

    /// Number of bytes touched so far, counting a partially read byte as read.
    pub fn bytes_consumed(&self) -> usize {
        (self.idx + 7) / 8
    }

    pub fn get_bit(&mut self) -> Result<bool, GetBitsError> {
        if self.idx >= self.source.len() * 8 {
            return Err(GetBitsError::NotEnoughRemainingBits {
                requested: 1,
                remaining: 0,
            });
        }
        let byte = self.source[self.idx / 8];
        let bit = (byte >> (7 - (self.idx % 8))) & 1 == 1;
        self.idx += 1;
        Ok(bit)
    }

    /// Reads `n` bits and returns them in the low bits of the result, the
    /// first bit read being the most significant.
    pub fn get_bits(&mut self, n: usize) -> Result<u64, GetBitsError> {
        if n > 64 {
            return Err(GetBitsError::TooManyBits {
                num_requested_bits: n,
                limit: 64,
            });
        }
        if self.bits_left() < n {
            return Err(GetBitsError::NotEnoughRemainingBits {
                requested: n,
                remaining: self.bits_left(),
            });
        }

        let mut value = 0u64;
        let mut remaining = n;
        while remaining > 0 {
            let bit_offset = self.idx % 8;
            let available_in_byte = 8 - bit_offset;
            let take = available_in_byte.min(remaining);

            // drop the bits already read, then the bits we don't need yet
            let byte = self.source[self.idx / 8] << bit_offset;
            let chunk = byte >> (8 - take);

            value = (value << take) | u64::from(chunk);
            self.idx += take;
            remaining -= take;
        }

        Ok(value)
    }

    /// Skips to the start of the next byte, unless already aligned.
    pub fn align_to_byte(&mut self) {
        self.idx = self.bytes_consumed() * 8;
    }
}

#[cfg(test)]
mod tests {
    use super::{BitReader, GetBitsError};

    #[test]
    fn basic_test() {
        let x = [0b1000_0001u8];
        let mut br = BitReader::new(&x);
        assert_eq!(br.get_bit(), Ok(true));
        for _ in 0..6 {
            assert_eq!(br.get_bit(), Ok(false));
        }
        assert_eq!(br.get_bit(), Ok(true));
        assert_eq!(
            br.get_bit(),
            Err(GetBitsError::NotEnoughRemainingBits {
                requested: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn get_bits_across_bytes() {
        let x = [0b0001_1011, 0b1100_0011, 0xFF];
        let mut br = BitReader::new(&x);
        assert_eq!(br.get_bits(5), Ok(3));
        assert_eq!(br.get_bits(1), Ok(0));
        assert_eq!(br.get_bits(6), Ok(0b11_1100));
        assert_eq!(br.bits_read(), 12);
        assert_eq!(br.bits_left(), 12);
        assert_eq!(br.get_bits(12), Ok(0b0011_1111_1111));
        assert_eq!(br.bits_left(), 0);
    }

    #[test]
    fn full_width_read() {
        let x = [0x80, 0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x23, 0x45, 0x67];
        let mut br = BitReader::new(&x);
        assert_eq!(br.get_bits(8), Ok(0x80));
        assert_eq!(br.get_bits(64), Ok(0xDEAD_BEEF_0123_4567));
        assert_eq!(br.get_bits(0), Ok(0));
    }

    #[test]
    fn refuses_to_overread() {
        let x = [0xAB];
        let mut br = BitReader::new(&x);
        assert_eq!(br.get_bits(3), Ok(0b101));
        assert_eq!(
            br.get_bits(6),
            Err(GetBitsError::NotEnoughRemainingBits {
                requested: 6,
                remaining: 5
            })
        );
        // a failed read doesn't move the cursor
        assert_eq!(br.bits_read(), 3);
        assert_eq!(
            br.get_bits(65),
            Err(GetBitsError::TooManyBits {
                num_requested_bits: 65,
                limit: 64
            })
        );
    }

    #[test]
    fn align_to_byte_skips_partial_byte() {
        let x = [0xFF, 0x0F];
        let mut br = BitReader::new(&x);
        br.align_to_byte();
        assert_eq!(br.bits_read(), 0);
        br.get_bit().unwrap();
        assert_eq!(br.bytes_consumed(), 1);
        br.align_to_byte();
        assert_eq!(br.bits_read(), 8);
        assert_eq!(br.get_bits(8), Ok(0x0F));
        br.align_to_byte();
        assert_eq!(br.bits_read(), 16);
    }
}
