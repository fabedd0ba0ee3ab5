//! Use [BitWriter] to write an arbitrary amount of bits into a buffer.
use alloc::vec::Vec;

/// An interface for writing an arbitrary number of bits into a buffer.
///
/// Bits are packed most significant bit first, the way they are read back by
/// [`crate::decoding::bit_reader::BitReader`].
#[derive(Debug, Default)]
pub struct BitWriter {
    /// The buffer that's filled with complete bytes
    output: Vec<u8>,
    /// Bits that don't make up a complete byte yet, in the low `queue_bits` bits.
    /// Anything above that is stale and gets shifted out.
    queue: u64,
    /// Count of valid bits in the queue, always below 8 between calls
    queue_bits: usize,
    /// The number of bits that have been written so far
    bit_idx: usize,
}

impl BitWriter {
    /// Initialize a new writer. Write new bits into the buffer with `write_bits`, and
    /// obtain the output using `dump`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Like [`BitWriter::new`], reserving room for `bytes` bytes of output.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            output: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Write the lowest `num_bits` of `bits`, starting with the most significant of them.
    ///
    /// # Panics
    /// If `num_bits` is bigger than 64.
    pub fn write_bits(&mut self, bits: u64, num_bits: usize) {
        assert!(num_bits <= 64, "can't write more than 64 bits at once");
        // keep the queue (below 8 bits) plus the new bits inside the u64
        if num_bits > 56 {
            self.write_bits(bits >> 32, num_bits - 32);
            self.write_bits(bits & 0xFFFF_FFFF, 32);
            return;
        }
        if num_bits == 0 {
            return;
        }

        let mask = (1u64 << num_bits) - 1;
        self.queue = (self.queue << num_bits) | (bits & mask);
        self.queue_bits += num_bits;
        self.bit_idx += num_bits;

        while self.queue_bits >= 8 {
            self.output.push((self.queue >> (self.queue_bits - 8)) as u8);
            self.queue_bits -= 8;
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(u64::from(bit), 1);
    }

    /// Number of bits written so far.
    pub fn bits_written(&self) -> usize {
        self.bit_idx
    }

    /// Returns how many bits are missing for an even amount of bytes.
    pub fn misaligned(&self) -> usize {
        let misaligned = self.bit_idx % 8;
        if misaligned == 0 {
            0
        } else {
            8 - misaligned
        }
    }

    /// Fills up the current byte with zero bits.
    pub fn pad_to_byte(&mut self) {
        let missing = self.misaligned();
        self.write_bits(0, missing);
    }

    /// Returns the populated buffer, zero-padding the last byte.
    ///
    /// This function consumes the writer, so it cannot be used after dumping.
    pub fn dump(mut self) -> Vec<u8> {
        self.pad_to_byte();
        debug_assert_eq!(self.queue_bits, 0);
        self.output
    }
}
