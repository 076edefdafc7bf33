//! Ordered composition of transforms with a terminal codec.
//!
//! The pipeline owns no buffers beyond the ones passed between stages and
//! knows nothing about any particular transform or codec; it only dispatches
//! through `Transform` and `Codec`, so adding either never touches this file.

use crate::{Codec, Error, Transform};

pub struct Pipeline<'a> {
    transforms: &'a [Box<dyn Transform>],
    codec: &'a dyn Codec,
}

impl<'a> Pipeline<'a> {
    pub fn new(transforms: &'a [Box<dyn Transform>], codec: &'a dyn Codec) -> Self {
        Self { transforms, codec }
    }

    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>, Error> {
        let mut x = input.to_vec();
        for t in self.transforms {
            x = t.forward(&x);
        }
        self.codec.encode(&x)
    }

    pub fn decompress(&self, blob: &[u8]) -> Result<Vec<u8>, Error> {
        let mut x = self.codec.decode(blob)?;
        for t in self.transforms.iter().rev() {
            x = t.inverse(&x)?;
        }
        Ok(x)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bwt::Bwt;
    use crate::huffman::Huffman;
    use crate::mtf::Mtf;
    use crate::rle::Rle;

    #[test]
    fn no_transforms_is_plain_codec() {
        let codec = Rle;
        let pipeline = Pipeline::new(&[], &codec);
        let data = b"banana";
        let compressed = pipeline.compress(data).unwrap();
        assert_eq!(pipeline.decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn bwt_mtf_huffman_round_trips() {
        let transforms: Vec<Box<dyn Transform>> = vec![Box::new(Bwt), Box::new(Mtf)];
        let codec = Huffman;
        let pipeline = Pipeline::new(&transforms, &codec);
        for data in [&b"banana"[..], b"", b"the quick brown fox jumps over the lazy dog"] {
            let compressed = pipeline.compress(data).unwrap();
            assert_eq!(pipeline.decompress(&compressed).unwrap(), data);
        }
    }

    #[test]
    fn transform_order_is_reversed_on_decompress() {
        let transforms: Vec<Box<dyn Transform>> = vec![Box::new(Bwt), Box::new(Mtf)];
        let codec = Rle;
        let pipeline = Pipeline::new(&transforms, &codec);
        let data = b"abababababababab";
        let compressed = pipeline.compress(data).unwrap();
        assert_eq!(pipeline.decompress(&compressed).unwrap(), data);
    }
}
