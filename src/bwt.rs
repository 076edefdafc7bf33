//! Burrows-Wheeler Transform.
//!
//! The forward transform sorts the cyclic rotations of the input and keeps
//! the last column, using a suffix-array-induced-sort (SA-IS) instead of a
//! naive O(n^2 log n) rotation sort. The inverse reconstructs the original
//! string in O(n) from the transform and the row index of the original
//! string, using the standard rank/cumulative-count walk.

use crate::{Error, Transform};

pub struct Bwt;

impl Transform for Bwt {
    fn forward(&self, input: &[u8]) -> Vec<u8> {
        encode_frame(input)
    }

    fn inverse(&self, input: &[u8]) -> Result<Vec<u8>, Error> {
        decode_frame(input)
    }
}

/// Computes the sorted order of the *cyclic rotations* of `input` and
/// derives `T[i] = input[(SA[i] - 1) mod n]` plus the EOF row `p` where
/// `SA[p] == 0`.
///
/// A suffix array of `input` alone sorts suffixes, not rotations: two
/// rotations that agree on their first `n - i` bytes need the comparison to
/// continue by wrapping back to the start of `input`, but a plain suffix
/// array would instead terminate the shorter one there and call it smaller.
/// Doubling the input before running SA-IS and keeping only the suffixes
/// starting in the first half sidesteps this: those suffixes are `2n - i`
/// bytes long, so any two rotations that tie on their first `n` bytes keep
/// comparing against the real wrapped-around bytes instead of the end of
/// the buffer.
fn transform(input: &[u8]) -> (Vec<u8>, usize) {
    let n = input.len();
    if n == 0 {
        return (Vec::new(), 0);
    }
    if n == 1 {
        return (input.to_vec(), 0);
    }
    let mut doubled = Vec::with_capacity(2 * n);
    doubled.extend_from_slice(input);
    doubled.extend_from_slice(input);
    let symbols: Vec<usize> = doubled.iter().map(|&b| b as usize).collect();
    let sa = sa_is(&symbols, 255);

    let mut t = Vec::with_capacity(n);
    let mut eof_index = 0;
    for &row in sa.iter().filter(|&&row| row < n) {
        if row == 0 {
            eof_index = t.len();
            t.push(input[n - 1]);
        } else {
            t.push(input[row - 1]);
        }
    }
    (t, eof_index)
}

/// Encodes the EOF index as its minimal big-endian byte representation
/// (empty for index 0).
fn encode_index(mut index: usize) -> Vec<u8> {
    if index == 0 {
        return Vec::new();
    }
    let mut bytes = Vec::new();
    while index > 0 {
        bytes.push((index & 0xFF) as u8);
        index >>= 8;
    }
    bytes.reverse();
    bytes
}

fn decode_index(bytes: &[u8]) -> usize {
    bytes.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize)
}

/// Finds a byte value absent from `slice`, using a 256-bit presence set
/// (constant-size auxiliary space, independent of `slice.len()`).
fn find_delimiter(slice: &[u8]) -> u8 {
    let mut present = [false; 256];
    for &b in slice {
        present[b as usize] = true;
    }
    present.iter().position(|&p| !p).expect("slice of <=255 bytes cannot cover all 256 values") as u8
}

fn encode_frame(input: &[u8]) -> Vec<u8> {
    let (t, eof_index) = transform(input);
    let idx_bytes = encode_index(eof_index);
    let delimiter = find_delimiter(&idx_bytes);
    let mut out = Vec::with_capacity(2 + idx_bytes.len() + t.len());
    out.push(delimiter);
    out.extend_from_slice(&idx_bytes);
    out.push(delimiter);
    out.extend_from_slice(&t);
    out
}

fn decode_frame(frame: &[u8]) -> Result<Vec<u8>, Error> {
    if frame.is_empty() {
        return Err(Error::Corrupt("BWT frame missing delimiter".into()));
    }
    let delimiter = frame[0];
    let rest = &frame[1..];
    let second = rest
        .iter()
        .position(|&b| b == delimiter)
        .ok_or_else(|| Error::Corrupt("BWT frame missing second delimiter".into()))?;
    let idx_bytes = &rest[..second];
    let t = &rest[second + 1..];
    let eof_index = decode_index(idx_bytes);
    inverse_transform(t, eof_index)
}

fn inverse_transform(t: &[u8], eof_index: usize) -> Result<Vec<u8>, Error> {
    let n = t.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if eof_index >= n {
        return Err(Error::Corrupt(format!("BWT EOF index {} out of range for length {}", eof_index, n)));
    }
    let mut counts = [0usize; 256];
    for &b in t {
        counts[b as usize] += 1;
    }
    let mut c = [0usize; 256];
    let mut running = 0usize;
    for b in 0..256 {
        c[b] = running;
        running += counts[b];
    }
    let mut rank = vec![0usize; n];
    let mut seen = [0usize; 256];
    for i in 0..n {
        rank[i] = seen[t[i] as usize];
        seen[t[i] as usize] += 1;
    }

    let mut s = vec![0u8; n];
    let mut i = eof_index;
    for k in (0..n).rev() {
        s[k] = t[i];
        i = c[t[i] as usize] + rank[i];
    }
    Ok(s)
}

// ---------------------------------------------------------------------
// SA-IS: linear-time suffix array construction.
//
// `sa_is(s, upper)` returns the suffix array of `s` where `s` contains
// symbols in `0..=upper`; the end of the string is treated as a symbol
// smaller than every real one (the usual "virtual sentinel" of suffix
// array constructions). `transform` above feeds this the doubled input so
// the result sorts rotations rather than plain suffixes.
// ---------------------------------------------------------------------

fn sa_naive(s: &[usize]) -> Vec<usize> {
    let n = s.len();
    let mut sa: Vec<usize> = (0..n).collect();
    sa.sort_by(|&a, &b| s[a..].cmp(&s[b..]));
    sa
}

fn sa_is(s: &[usize], upper: usize) -> Vec<usize> {
    let n = s.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0];
    }
    if n == 2 {
        return if s[0] < s[1] { vec![0, 1] } else { vec![1, 0] };
    }
    if n < 10 {
        return sa_naive(s);
    }

    // `ls[i]` is true iff suffix i is "S-type": smaller than suffix i+1,
    // with the end of the string acting as the smallest possible suffix.
    let mut ls = vec![false; n];
    for i in (0..n - 1).rev() {
        ls[i] = if s[i] == s[i + 1] { ls[i + 1] } else { s[i] < s[i + 1] };
    }

    let mut sum_l = vec![0usize; upper + 1];
    let mut sum_s = vec![0usize; upper + 1];
    for i in 0..n {
        if !ls[i] {
            sum_s[s[i]] += 1;
        } else {
            sum_l[s[i] + 1] += 1;
        }
    }
    for i in 0..=upper {
        sum_s[i] += sum_l[i];
        if i < upper {
            sum_l[i + 1] += sum_s[i];
        }
    }

    let mut lms_map = vec![usize::MAX; n + 1];
    let mut m = 0usize;
    for i in 1..n {
        if !ls[i - 1] && ls[i] {
            lms_map[i] = m;
            m += 1;
        }
    }
    let mut lms = Vec::with_capacity(m);
    for i in 1..n {
        if !ls[i - 1] && ls[i] {
            lms.push(i);
        }
    }

    let mut sa = vec![usize::MAX; n];
    induce(s, &ls, &sum_s, &sum_l, &lms, &mut sa);

    if m > 0 {
        let mut sorted_lms = Vec::with_capacity(m);
        for &v in sa.iter() {
            if v != usize::MAX && lms_map[v] != usize::MAX {
                sorted_lms.push(v);
            }
        }

        let mut rec_s = vec![0usize; m];
        let mut rec_upper = 0usize;
        rec_s[lms_map[sorted_lms[0]]] = 0;
        for i in 1..m {
            let (mut l, mut r) = (sorted_lms[i - 1], sorted_lms[i]);
            let end_l = if lms_map[l] + 1 < m { lms[lms_map[l] + 1] } else { n };
            let end_r = if lms_map[r] + 1 < m { lms[lms_map[r] + 1] } else { n };
            let mut same = end_l - l == end_r - r;
            if same {
                while l < end_l {
                    if s[l] != s[r] {
                        break;
                    }
                    l += 1;
                    r += 1;
                }
                if l == n || s[l] != s[r] {
                    same = false;
                }
            }
            if !same {
                rec_upper += 1;
            }
            rec_s[lms_map[sorted_lms[i]]] = rec_upper;
        }

        let rec_sa = sa_is(&rec_s, rec_upper);
        for i in 0..m {
            sorted_lms[i] = lms[rec_sa[i]];
        }
        induce(s, &ls, &sum_s, &sum_l, &sorted_lms, &mut sa);
    }

    sa
}

/// Two-pass induced sort: seed with the given LMS positions (bucketed by
/// first symbol only), then induce L-type suffixes left-to-right and
/// S-type suffixes right-to-left.
fn induce(
    s: &[usize],
    ls: &[bool],
    sum_s: &[usize],
    sum_l: &[usize],
    lms: &[usize],
    sa: &mut [usize],
) {
    let n = s.len();
    for slot in sa.iter_mut() {
        *slot = usize::MAX;
    }

    let mut buf = sum_s.to_vec();
    for &d in lms {
        if d == n {
            continue;
        }
        sa[buf[s[d]]] = d;
        buf[s[d]] += 1;
    }

    buf.copy_from_slice(sum_l);
    sa[buf[s[n - 1]]] = n - 1;
    buf[s[n - 1]] += 1;
    for i in 0..n {
        let v = sa[i];
        if v != usize::MAX && v >= 1 && !ls[v - 1] {
            sa[buf[s[v - 1]]] = v - 1;
            buf[s[v - 1]] += 1;
        }
    }

    buf.copy_from_slice(sum_l);
    for i in (0..n).rev() {
        let v = sa[i];
        if v != usize::MAX && v >= 1 && ls[v - 1] {
            buf[s[v - 1] + 1] -= 1;
            sa[buf[s[v - 1] + 1]] = v - 1;
        }
    }
}
