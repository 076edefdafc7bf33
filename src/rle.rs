//! Bit-level run-length codec.
//!
//! Unlike byte-granularity RLE, this operates on the input's individual
//! bits, which pays off after BWT+MTF: the reordered buffer is dominated by
//! long runs of zero bits rather than repeated bytes.

use crate::bitstream::{BitReader, BitWriter};
use crate::{Codec, Error};

pub struct Rle;

const MAX_RUN: usize = 8;

fn to_bits(input: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(input.len() * 8);
    for &byte in input {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1 != 0);
        }
    }
    bits
}

impl Codec for Rle {
    fn encode(&self, input: &[u8]) -> Result<Vec<u8>, Error> {
        let bits = to_bits(input);
        let mut writer = BitWriter::new();
        let mut i = 0;
        while i < bits.len() {
            let bit = bits[i];
            let mut run = 1usize;
            while run < MAX_RUN && i + run < bits.len() && bits[i + run] == bit {
                run += 1;
            }
            writer.write_bits(bit as u64, 1);
            writer.write_bits((run - 1) as u64, 3);
            i += run;
        }
        let (blocks, pad) = writer.finalize();
        let mut out = Vec::with_capacity(1 + blocks.len());
        out.push(pad);
        out.extend_from_slice(&blocks);
        Ok(out)
    }

    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, Error> {
        let &pad = input.first().ok_or(Error::Truncated)?;
        let blocks = &input[1..];
        let total_bits = (blocks.len() * 8)
            .checked_sub(pad as usize)
            .ok_or_else(|| Error::Corrupt("RLE pad_bits exceeds block stream length".into()))?;

        let mut reader = BitReader::new(blocks);
        let mut out_bits = Vec::with_capacity(total_bits);
        let mut consumed = 0usize;
        while consumed < total_bits {
            let block = reader.read_bits(4)?;
            let payload = (block >> 3) & 1 != 0;
            let count = (block & 0b111) + 1;
            out_bits.extend(std::iter::repeat_n(payload, count as usize));
            consumed += 4;
        }

        if out_bits.len() % 8 != 0 {
            return Err(Error::Corrupt("RLE reconstructed bit count is not a multiple of 8".into()));
        }
        let mut out = vec![0u8; out_bits.len() / 8];
        for (byte, chunk) in out.iter_mut().zip(out_bits.chunks(8)) {
            for &bit in chunk {
                *byte = (*byte << 1) | bit as u8;
            }
        }
        Ok(out)
    }
}
