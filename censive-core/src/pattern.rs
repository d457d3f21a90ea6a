use core::cmp;

use memchr::{memchr, memchr2, memchr3, memmem};

/// A small set of characters compiled into literal searchers.
///
/// Every member is a single `char`. Members that are ASCII are found with
/// `memchr` (up to three per pass), while every other member gets its own
/// `memmem` finder over its UTF-8 encoding. Because the search is literal,
/// any character may be used as a separator or quote without escaping.
///
/// Patterns are built once, when a `Dialect` is built, and reused for every
/// scan after that.
#[derive(Clone, Debug)]
pub struct Pattern {
    chars: Vec<char>,
    bytes: Vec<u8>,
    seqs: Vec<(memmem::Finder<'static>, usize)>,
}

impl Pattern {
    /// Compile a pattern matching any one of the given characters.
    ///
    /// Duplicate characters are ignored.
    pub fn new(chars: &[char]) -> Pattern {
        let mut pat = Pattern { chars: vec![], bytes: vec![], seqs: vec![] };
        for &c in chars {
            if pat.chars.contains(&c) {
                continue;
            }
            pat.chars.push(c);
            if c.is_ascii() {
                pat.bytes.push(c as u8);
            } else {
                let mut buf = [0; 4];
                let needle = c.encode_utf8(&mut buf).as_bytes();
                let finder = memmem::Finder::new(needle).into_owned();
                pat.seqs.push((finder, needle.len()));
            }
        }
        pat
    }

    /// Returns true if `c` is a member of this pattern.
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// If `haystack` starts with a member of this pattern, return the
    /// encoded length of that member.
    pub fn matches_at(&self, haystack: &str) -> Option<usize> {
        haystack
            .chars()
            .next()
            .filter(|&c| self.contains(c))
            .map(char::len_utf8)
    }

    /// Find the leftmost member in `haystack`.
    ///
    /// On success, this returns the byte offset of the match and the encoded
    /// length of the member found there.
    pub fn find(&self, haystack: &str) -> Option<(usize, usize)> {
        let hay = haystack.as_bytes();
        let mut best: Option<(usize, usize)> = None;
        // Each pass after the first only needs to look in front of the best
        // match so far, which keeps every search bounded by the first hit.
        for group in self.bytes.chunks(3) {
            let limit = best.map_or(hay.len(), |(i, _)| i);
            let found = match *group {
                [a] => memchr(a, &hay[..limit]),
                [a, b] => memchr2(a, b, &hay[..limit]),
                [a, b, c] => memchr3(a, b, c, &hay[..limit]),
                _ => None,
            };
            if let Some(i) = found {
                best = Some((i, 1));
            }
        }
        for &(ref finder, len) in &self.seqs {
            let limit = best.map_or(hay.len(), |(i, _)| {
                cmp::min(hay.len(), i + len - 1)
            });
            if let Some(i) = finder.find(&hay[..limit]) {
                best = Some((i, len));
            }
        }
        best
    }

    /// Count the occurrences of members of this pattern in `haystack`.
    pub fn count(&self, mut haystack: &str) -> usize {
        let mut n = 0;
        while let Some((i, len)) = self.find(haystack) {
            n += 1;
            haystack = &haystack[i + len..];
        }
        n
    }
}
