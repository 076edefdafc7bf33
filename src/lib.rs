//! # packrat
//!
//! A file-compression toolkit: three codecs (RLE, LZW, Huffman) and two
//! pre-compression reordering transforms (BWT, MTF), composed through a
//! small pipeline.
//!
//! * `bitstream` packs/unpacks arbitrary bit-width values over a byte buffer.
//! * `rle`, `huffman`, `lzw` are the terminal codecs.
//! * `bwt`, `mtf` are reversible reordering transforms applied before a codec.
//! * `pipeline` composes an ordered list of transforms with a codec.
//!
//! ## Buffer Example
//!
//! ```rs
//! use packrat::huffman;
//! let test_data = "the quick brown fox".as_bytes();
//! let compressed = huffman::encode(test_data).expect("compression failed");
//! let expanded = huffman::decode(&compressed).expect("expansion failed");
//! assert_eq!(test_data,expanded.as_slice());
//! ```

pub mod bitstream;
pub mod mtf;
pub mod bwt;
pub mod rle;
pub mod huffman;
pub mod lzw;
pub mod pipeline;

/// Errors produced by the codec and transform core.
///
/// The core never touches the filesystem; `Io` exists only so the CLI
/// layer can fold its own file-handling errors into the same type.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("truncated input: expected more bits than remained")]
    Truncated,
    #[error("corrupt input: {0}")]
    Corrupt(String),
    #[error("dictionary exceeded max_entries with overflow policy Abort")]
    OutOfMemory,
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A reversible, length-preserving or self-framing reordering applied before
/// a codec. `forward` is infallible by construction (every byte buffer has a
/// transform); `inverse` can fail if the framing is corrupt.
pub trait Transform {
    fn forward(&self, input: &[u8]) -> Vec<u8>;
    fn inverse(&self, input: &[u8]) -> Result<Vec<u8>, Error>;
}

/// A terminal compressor/decompressor.
pub trait Codec {
    fn encode(&self, input: &[u8]) -> Result<Vec<u8>, Error>;
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, Error>;
}
