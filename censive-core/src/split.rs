use crate::cursor::Cursor;
use crate::dialect::Dialect;

/// A one-way switch around a speculative parse.
///
/// Each attempt runs against a checkpoint. If the attempt gives up, the
/// cursor is rolled back to the checkpoint and the speculation is disabled
/// for good, so every later attempt returns `None` without running.
#[derive(Clone, Debug)]
pub struct Speculation {
    disabled: bool,
}

impl Default for Speculation {
    fn default() -> Speculation {
        Speculation::new()
    }
}

impl Speculation {
    /// Create a new speculation that is enabled.
    pub fn new() -> Speculation {
        Speculation { disabled: false }
    }

    /// Create a speculation that never runs.
    pub fn disabled() -> Speculation {
        Speculation { disabled: true }
    }

    /// Returns true if attempts still run.
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Run `attempt` against `cur`.
    ///
    /// When `attempt` returns `None`, the cursor is restored to where it
    /// was before the call and this speculation is disabled.
    pub fn attempt<'a, T, F>(
        &mut self,
        cur: &mut Cursor<'a>,
        attempt: F,
    ) -> Option<T>
    where
        F: FnOnce(&mut Cursor<'a>) -> Option<T>,
    {
        if self.disabled {
            return None;
        }
        let checkpoint = cur.checkpoint();
        match attempt(cur) {
            Some(value) => Some(value),
            None => {
                cur.rollback(checkpoint);
                self.disabled = true;
                None
            }
        }
    }
}

/// Splits whole lines on the separator without running the lexer.
///
/// This only works for lines where every quote is part of a plain
/// `"cell"` wrapper. For such lines the result is exactly what the lexer
/// would produce; for any other line the splitter gives up.
#[derive(Clone, Copy, Debug)]
pub struct LineSplitter<'d> {
    dialect: &'d Dialect,
}

impl<'d> LineSplitter<'d> {
    /// Create a splitter for the given dialect.
    pub fn new(dialect: &'d Dialect) -> LineSplitter<'d> {
        LineSplitter { dialect }
    }

    /// Consume one line from `cur`, including its terminator, and pass each
    /// of its cells to `emit`.
    ///
    /// This returns `None` as soon as it finds a cell whose quoting it
    /// can't handle. Cells already passed to `emit` must then be discarded
    /// by the caller. The cursor is expected to be at the start of a row
    /// that is not at the end of the buffer.
    pub fn split_line<'a, F>(
        &self,
        cur: &mut Cursor<'a>,
        mut emit: F,
    ) -> Option<()>
    where
        F: FnMut(&'a str),
    {
        let d = self.dialect;
        let line = cur.consume_before(&d.line_end);
        if d.quotes.find(line).is_none() {
            for cell in line.split(d.separator()) {
                emit(d.finish(cell));
            }
        } else {
            for cell in line.split(d.separator()) {
                emit(d.finish(self.unwrap(cell)?));
            }
        }
        cur.consume_char('\r');
        cur.consume_char('\n');
        Some(())
    }

    /// Strip a plain `"..."` wrapper from a cell, if that's the only way
    /// quotes appear in it.
    fn unwrap<'a>(&self, cell: &'a str) -> Option<&'a str> {
        let d = self.dialect;
        match d.quotes.count(cell) {
            0 => Some(cell),
            2 => {
                let q = d.quote();
                let qlen = q.len_utf8();
                if cell.len() >= 2 * qlen
                    && cell.starts_with(q)
                    && cell.ends_with(q)
                {
                    Some(&cell[qlen..cell.len() - qlen])
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LineSplitter, Speculation};
    use crate::cursor::Cursor;
    use crate::dialect::{Dialect, DialectBuilder};

    fn split(dialect: &Dialect, data: &str) -> (Option<Vec<String>>, usize) {
        let splitter = LineSplitter::new(dialect);
        let mut cur = Cursor::new(data);
        let mut cells = vec![];
        let res =
            splitter.split_line(&mut cur, |c| cells.push(c.to_string()));
        (res.map(|()| cells), cur.offset())
    }

    #[test]
    fn plain_line() {
        let d = Dialect::default();
        assert_eq!(
            split(&d, "a,b,c\nx"),
            (Some(vec!["a".into(), "b".into(), "c".into()]), 6)
        );
    }

    #[test]
    fn keeps_empty_cells() {
        let d = Dialect::default();
        let (cells, _) = split(&d, ",a,,b,\r\n");
        assert_eq!(cells.unwrap(), vec!["", "a", "", "b", ""]);
    }

    #[test]
    fn empty_line() {
        let d = Dialect::default();
        assert_eq!(split(&d, "\r\nx"), (Some(vec!["".into()]), 2));
    }

    #[test]
    fn crlf_and_cr() {
        let d = Dialect::default();
        assert_eq!(split(&d, "a\r\nb").1, 3);
        assert_eq!(split(&d, "a\rb").1, 2);
        assert_eq!(split(&d, "a\n\rb").1, 2);
        assert_eq!(split(&d, "a").1, 1);
    }

    #[test]
    fn simple_quotes() {
        let d = Dialect::default();
        let (cells, _) = split(&d, "\"a\",b,\"\"\n");
        assert_eq!(cells.unwrap(), vec!["a", "b", ""]);
    }

    #[test]
    fn strip() {
        let d = DialectBuilder::new().strip(true).build().unwrap();
        let (cells, _) = split(&d, " a ,\" b \"\n");
        assert_eq!(cells.unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn gives_up_on_hard_quoting() {
        let d = DialectBuilder::new().excel(true).build().unwrap();
        for line in &[
            "\"a,b\"\n",
            "\"a\"\"b\"\n",
            "a\"b\n",
            "\"\n",
            " \"a\"\n",
            "=\"0123\"\n",
            "\"multi\nline\"\n",
        ] {
            assert_eq!(split(&d, line).0, None, "line {:?}", line);
        }
    }

    #[test]
    fn speculation_rolls_back_and_disables() {
        let d = Dialect::default();
        let splitter = LineSplitter::new(&d);
        let mut guess = Speculation::new();
        let mut cur = Cursor::new("a,b\n\"c,d\"\ne,f\n");

        let mut cells = vec![];
        let got = guess.attempt(&mut cur, |cur| {
            splitter.split_line(cur, |c| cells.push(c))
        });
        assert_eq!(got, Some(()));
        assert_eq!(cells, vec!["a", "b"]);
        assert_eq!(cur.offset(), 4);

        let got =
            guess.attempt(&mut cur, |cur| splitter.split_line(cur, |_| {}));
        assert_eq!(got, None);
        assert_eq!(cur.offset(), 4);
        assert!(!guess.is_enabled());

        // Disabled for good, even for lines it could handle.
        cur.consume_until(d.line_end());
        let got =
            guess.attempt(&mut cur, |cur| splitter.split_line(cur, |_| {}));
        assert_eq!(got, None);
        assert_eq!(cur.rest(), "e,f\n");
    }
}
