//! LZW dictionary codec.
//!
//! Codes are emitted with a one-byte length prefix rather than a fixed
//! width, so the stream stays one byte per code while codes are small and
//! grows only as the dictionary does. The dictionary itself is a trie keyed
//! on `(parent_code, next_byte)`, so entries never store their full byte
//! sequence.

use std::collections::HashMap;

use crate::{Codec, Error};

/// Policy applied once the dictionary reaches `Options::max_entries`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Fail compression/decompression with `Error::OutOfMemory`.
    Abort,
    /// Stop growing the dictionary but keep emitting codes from what exists.
    StopStore,
    /// Ignore `max_entries`; the dictionary grows without bound.
    Unlimited,
}

#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub max_entries: usize,
    pub overflow: OverflowPolicy,
}

impl Options {
    pub const fn small() -> Self {
        Self { max_entries: 1_000, overflow: OverflowPolicy::Abort }
    }
    pub const fn medium() -> Self {
        Self { max_entries: 10_000, overflow: OverflowPolicy::Abort }
    }
    pub const fn large() -> Self {
        Self { max_entries: 100_000, overflow: OverflowPolicy::Abort }
    }
    pub const fn xl() -> Self {
        Self { max_entries: 1_000_000, overflow: OverflowPolicy::Abort }
    }
}

pub const STD_OPTIONS: Options = Options::medium();

impl Default for Options {
    fn default() -> Self {
        STD_OPTIONS
    }
}

/// One dictionary entry: the byte it adds and the code it extends, or
/// `None` for the 256 single-byte entries the dictionary starts with.
struct Link {
    parent: Option<u32>,
    byte: u8,
}

struct Dictionary {
    links: Vec<Link>,
    children: HashMap<(u32, u8), u32>,
    max_entries: usize,
    overflow: OverflowPolicy,
}

impl Dictionary {
    fn new(options: &Options) -> Self {
        let mut links = Vec::with_capacity(options.max_entries.max(256));
        for b in 0..256u32 {
            links.push(Link { parent: None, byte: b as u8 });
        }
        log::debug!("create LZW dictionary with max_entries={}", options.max_entries);
        Self { links, children: HashMap::new(), max_entries: options.max_entries, overflow: options.overflow }
    }

    fn len(&self) -> u32 {
        self.links.len() as u32
    }

    fn lookup_child(&self, parent: u32, byte: u8) -> Option<u32> {
        self.children.get(&(parent, byte)).copied()
    }

    fn string_of(&self, code: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut cur = code;
        loop {
            let link = &self.links[cur as usize];
            bytes.push(link.byte);
            match link.parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        bytes.reverse();
        bytes
    }

    /// Inserts `parent+byte` as a new entry, honoring `max_entries`/`overflow`.
    fn try_insert(&mut self, parent: u32, byte: u8) -> Result<(), Error> {
        if self.links.len() >= self.max_entries {
            return match self.overflow {
                OverflowPolicy::Abort => {
                    log::error!("LZW dictionary exceeded max_entries={} with Abort policy", self.max_entries);
                    Err(Error::OutOfMemory)
                }
                OverflowPolicy::StopStore => Ok(()),
                OverflowPolicy::Unlimited => {
                    self.push(parent, byte);
                    Ok(())
                }
            };
        }
        self.push(parent, byte);
        Ok(())
    }

    fn push(&mut self, parent: u32, byte: u8) {
        let code = self.links.len() as u32;
        log::trace!("add {} linking to {}.{}", code, parent, byte);
        self.links.push(Link { parent: Some(parent), byte });
        self.children.insert((parent, byte), code);
    }
}

/// Minimal big-endian byte encoding of `code`; always at least one byte.
fn encode_code(code: u32) -> Vec<u8> {
    if code == 0 {
        return vec![0];
    }
    let mut bytes = Vec::new();
    let mut c = code;
    while c > 0 {
        bytes.push((c & 0xFF) as u8);
        c >>= 8;
    }
    bytes.reverse();
    bytes
}

fn emit_code(out: &mut Vec<u8>, code: u32) {
    let bytes = encode_code(code);
    out.push(bytes.len() as u8);
    out.extend(bytes);
}

#[derive(Default)]
pub struct Lzw {
    pub options: Options,
}

impl Lzw {
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

impl Codec for Lzw {
    fn encode(&self, input: &[u8]) -> Result<Vec<u8>, Error> {
        if self.options.max_entries == 0 {
            return Err(Error::InvalidOption("max_entries must be greater than 0".into()));
        }
        let mut dict = Dictionary::new(&self.options);
        let mut out = Vec::new();
        let mut current: Option<u32> = None;

        log::debug!("entering loop over {} input bytes", input.len());
        for &c in input {
            current = match current {
                None => Some(c as u32),
                Some(cc) => match dict.lookup_child(cc, c) {
                    Some(child) => Some(child),
                    None => {
                        emit_code(&mut out, cc);
                        dict.try_insert(cc, c)?;
                        Some(c as u32)
                    }
                },
            };
        }
        if let Some(cc) = current {
            emit_code(&mut out, cc);
        }
        log::debug!("LZW compression finished with dictionary size {}", dict.len());
        Ok(out)
    }

    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, Error> {
        let mut dict = Dictionary::new(&self.options);
        let mut out = Vec::new();
        let mut prev: Option<(u32, Vec<u8>)> = None;
        let mut pos = 0usize;

        log::debug!("enter main LZW decode loop");
        while pos < input.len() {
            let len = input[pos] as usize;
            if len == 0 {
                log::error!("LZW code_len is zero at byte offset {}", pos);
                return Err(Error::Corrupt("LZW code_len is zero".into()));
            }
            pos += 1;
            if pos + len > input.len() {
                return Err(Error::Truncated);
            }
            let code = input[pos..pos + len].iter().fold(0u32, |acc, &b| (acc << 8) | b as u32);
            pos += len;
            log::trace!("code: {}", code);

            let dict_size = dict.len();
            let string = if code < dict_size {
                dict.string_of(code)
            } else if code == dict_size {
                match &prev {
                    Some((_, prev_string)) => {
                        let mut s = prev_string.clone();
                        s.push(prev_string[0]);
                        s
                    }
                    None => {
                        log::error!("LZW KwK case encountered with no previous code");
                        return Err(Error::Corrupt("LZW KwK case with no previous code".into()));
                    }
                }
            } else {
                log::error!("LZW code {} exceeds dictionary size {}", code, dict_size);
                return Err(Error::Corrupt(format!("LZW code {} exceeds dictionary size {}", code, dict_size)));
            };

            if let Some((prev_code, _)) = prev {
                dict.try_insert(prev_code, string[0])?;
            }

            out.extend_from_slice(&string);
            prev = Some((code, string));
        }
        log::debug!("LZW decompression finished with dictionary size {}", dict.len());
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip_various_inputs() {
        let lzw = Lzw::default();
        for data in [
            &b""[..],
            b"a",
            b"aaaaaaaaaaaaaaaaaaaa",
            b"TOBEORNOTTOBEORTOBEORNOT",
            b"the quick brown fox jumps over the lazy dog",
            b"\x00\x01\x02\xff\xfe\x00\x00",
        ] {
            let encoded = lzw.encode(data).unwrap();
            assert_eq!(lzw.decode(&encoded).unwrap(), data);
        }
    }

    #[test]
    fn classic_example_round_trips() {
        let lzw = Lzw::default();
        let data = b"TOBEORNOTTOBEORTOBEORNOT";
        let encoded = lzw.encode(data).unwrap();
        assert_eq!(lzw.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn overflow_abort_fails_on_large_distinct_input() {
        let lzw = Lzw::new(Options { max_entries: 1_000, overflow: OverflowPolicy::Abort });
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 256) as u8).chain(0..=255).collect();
        let result = lzw.encode(&data);
        assert!(matches!(result, Err(Error::OutOfMemory)));
    }

    #[test]
    fn overflow_stop_store_still_round_trips() {
        let lzw = Lzw::new(Options { max_entries: 300, overflow: OverflowPolicy::StopStore });
        let data: Vec<u8> = (0..5_000u32).map(|i| (i % 250) as u8).collect();
        let encoded = lzw.encode(&data).unwrap();
        assert_eq!(lzw.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn unlimited_ignores_max_entries() {
        let lzw = Lzw::new(Options { max_entries: 10, overflow: OverflowPolicy::Unlimited });
        let data: Vec<u8> = (0..2_000u32).map(|i| (i % 200) as u8).collect();
        let encoded = lzw.encode(&data).unwrap();
        assert_eq!(lzw.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn zero_max_entries_is_invalid_option() {
        let lzw = Lzw::new(Options { max_entries: 0, overflow: OverflowPolicy::Abort });
        assert!(matches!(lzw.encode(b"abc"), Err(Error::InvalidOption(_))));
    }

    #[test]
    fn zero_code_len_is_corrupt() {
        let lzw = Lzw::default();
        assert!(matches!(lzw.decode(&[0]), Err(Error::Corrupt(_))));
    }

    #[test]
    fn presets_have_increasing_capacity() {
        assert!(Options::small().max_entries < Options::medium().max_entries);
        assert!(Options::medium().max_entries < Options::large().max_entries);
        assert!(Options::large().max_entries < Options::xl().max_entries);
    }
}
