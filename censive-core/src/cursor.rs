use crate::pattern::Pattern;

/// A saved cursor offset.
///
/// Passing it back to `Cursor::rollback` restores the cursor exactly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Checkpoint(usize);

/// A position in an immutable text buffer.
///
/// Every operation either moves the offset forward over text it returns, or
/// leaves the offset alone. Offsets are byte offsets and always fall on
/// character boundaries.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `text`.
    pub fn new(text: &'a str) -> Cursor<'a> {
        Cursor { text, pos: 0 }
    }

    /// Create a cursor at byte offset `pos` of `text`.
    ///
    /// # Panics
    ///
    /// If `pos` is past the end of `text` or not on a character boundary.
    pub fn at(text: &'a str, pos: usize) -> Cursor<'a> {
        assert!(text.is_char_boundary(pos), "cursor offset off boundary");
        Cursor { text, pos }
    }

    /// The whole buffer this cursor moves over.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The current byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// The text from the current offset to the end of the buffer.
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Returns true if the cursor is at the end of the buffer.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// The character at the current offset.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character just after the one at the current offset.
    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Move past one character and return it.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Move past `c` if it is the character at the current offset.
    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// If `pat` matches at the current offset, move past the match and
    /// return it.
    pub fn consume_match(&mut self, pat: &Pattern) -> Option<&'a str> {
        let len = pat.matches_at(self.rest())?;
        let start = self.pos;
        self.pos += len;
        Some(&self.text[start..self.pos])
    }

    /// Move to the end of the first match of `pat` ahead, and return all of
    /// the text traversed, including the match.
    ///
    /// If `pat` never matches, the cursor doesn't move.
    pub fn consume_until(&mut self, pat: &Pattern) -> Option<&'a str> {
        let (i, len) = pat.find(self.rest())?;
        let start = self.pos;
        self.pos += i + len;
        Some(&self.text[start..self.pos])
    }

    /// Move to the start of the first match of `pat` ahead, or to the end of
    /// the buffer if there is none, and return the text traversed.
    pub fn consume_before(&mut self, pat: &Pattern) -> &'a str {
        let rest = self.rest();
        let end = pat.find(rest).map_or(rest.len(), |(i, _)| i);
        self.pos += end;
        &rest[..end]
    }

    /// Save the current offset.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    /// Restore an offset saved by `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.0;
    }
}

/// Count the `\n` bytes in `text`.
pub fn count_newlines(text: &str) -> u64 {
    memchr::memchr_iter(b'\n', text.as_bytes()).count() as u64
}

#[cfg(test)]
mod tests {
    use super::{count_newlines, Cursor};
    use crate::pattern::Pattern;

    #[test]
    fn peek_and_bump() {
        let mut cur = Cursor::new("aé");
        assert_eq!(cur.peek(), Some('a'));
        assert_eq!(cur.peek_second(), Some('é'));
        assert_eq!(cur.bump(), Some('a'));
        assert_eq!(cur.offset(), 1);
        assert_eq!(cur.bump(), Some('é'));
        assert_eq!(cur.offset(), 3);
        assert!(cur.is_eof());
        assert_eq!(cur.bump(), None);
    }

    #[test]
    fn consume_match_is_anchored() {
        let comma = Pattern::new(&[',']);
        let mut cur = Cursor::new("a,b");
        assert_eq!(cur.consume_match(&comma), None);
        assert_eq!(cur.offset(), 0);
        cur.bump();
        assert_eq!(cur.consume_match(&comma), Some(","));
        assert_eq!(cur.offset(), 2);
    }

    #[test]
    fn consume_until_includes_match() {
        let quote = Pattern::new(&['"']);
        let mut cur = Cursor::new("abc\"def");
        assert_eq!(cur.consume_until(&quote), Some("abc\""));
        assert_eq!(cur.rest(), "def");
        assert_eq!(cur.consume_until(&quote), None);
        assert_eq!(cur.rest(), "def");
    }

    #[test]
    fn consume_before_stops_in_front() {
        let ends = Pattern::new(&[',', '\n']);
        let mut cur = Cursor::new("ab,cd\nef");
        assert_eq!(cur.consume_before(&ends), "ab");
        assert_eq!(cur.peek(), Some(','));
        assert_eq!(cur.consume_before(&ends), "");
        cur.bump();
        assert_eq!(cur.consume_before(&ends), "cd");
        cur.bump();
        assert_eq!(cur.consume_before(&ends), "ef");
        assert!(cur.is_eof());
    }

    #[test]
    fn checkpoint_rollback() {
        let ends = Pattern::new(&['\n']);
        let mut cur = Cursor::new("abc\ndef");
        cur.bump();
        let cp = cur.checkpoint();
        cur.consume_until(&ends);
        assert_eq!(cur.offset(), 4);
        cur.rollback(cp);
        assert_eq!(cur.offset(), 1);
        assert_eq!(cur.rest(), "bc\ndef");
    }

    #[test]
    fn newlines() {
        assert_eq!(count_newlines("a\nb\r\nc\r"), 2);
        assert_eq!(count_newlines(""), 0);
    }
}
