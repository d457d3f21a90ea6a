use crate::dialect::{Dialect, OutputMode};

/// How much quoting a piece of text needs.
///
/// The variants are ordered, so the needs of several pieces of text combine
/// with `max`.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Quoting {
    /// The text can be written as is.
    None,
    /// The text holds a separator or line terminator, but no quote, so it
    /// only needs to be wrapped in quotes.
    Quote,
    /// The text holds a quote, so it must be wrapped in quotes and every
    /// quote inside it doubled.
    QuoteAndEscape,
}

/// Serializes rows according to a dialect's output options.
#[derive(Clone, Copy, Debug)]
pub struct Quoter<'d> {
    dialect: &'d Dialect,
}

impl<'d> Quoter<'d> {
    /// Create a quoter for the given dialect.
    pub fn new(dialect: &'d Dialect) -> Quoter<'d> {
        Quoter { dialect }
    }

    /// Decide how much quoting `text` needs.
    pub fn classify(&self, text: &str) -> Quoting {
        let d = self.dialect;
        match d.specials.find(text) {
            None => Quoting::None,
            Some((i, len)) => {
                let rest = &text[i..];
                if rest.starts_with(d.quote())
                    || d.quotes.find(&rest[len..]).is_some()
                {
                    Quoting::QuoteAndEscape
                } else {
                    Quoting::Quote
                }
            }
        }
    }

    /// Decide how much quoting a whole row needs.
    ///
    /// This is the classification of all of the row's cells concatenated,
    /// computed without building the concatenation.
    pub fn classify_row<S: AsRef<str>>(&self, cells: &[S]) -> Quoting {
        let mut row = Quoting::None;
        for cell in cells {
            row = row.max(self.classify(cell.as_ref()));
            if row == Quoting::QuoteAndEscape {
                break;
            }
        }
        row
    }

    /// Append one serialized row, followed by the row terminator, to `out`.
    pub fn write_row<S: AsRef<str>>(&self, cells: &[S], out: &mut String) {
        let d = self.dialect;
        let mut cells = cells;
        if d.drop_trailing_empty() {
            while let Some((last, init)) = cells.split_last() {
                if !last.as_ref().is_empty() {
                    break;
                }
                cells = init;
            }
        }
        let row = match d.output_mode() {
            OutputMode::Full => Quoting::QuoteAndEscape,
            OutputMode::Compact => self.classify_row(cells),
        };
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                out.push(d.separator());
            }
            let cell = cell.as_ref();
            if d.excel() && is_zero_padded_number(cell) {
                out.push('=');
                self.write_quoted(cell, out);
                continue;
            }
            let quoting = match (d.output_mode(), row) {
                (OutputMode::Full, _) => Quoting::QuoteAndEscape,
                (OutputMode::Compact, Quoting::None) => Quoting::None,
                (OutputMode::Compact, Quoting::Quote) => {
                    if d.cell_end.find(cell).is_some() {
                        Quoting::Quote
                    } else {
                        Quoting::None
                    }
                }
                (OutputMode::Compact, Quoting::QuoteAndEscape) => {
                    self.classify(cell)
                }
            };
            match quoting {
                Quoting::None => out.push_str(cell),
                Quoting::Quote => self.write_quoted(cell, out),
                Quoting::QuoteAndEscape => self.write_escaped(cell, out),
            }
        }
        out.push_str(d.row_terminator());
    }

    fn write_quoted(&self, cell: &str, out: &mut String) {
        let q = self.dialect.quote();
        out.push(q);
        out.push_str(cell);
        out.push(q);
    }

    fn write_escaped(&self, mut cell: &str, out: &mut String) {
        let q = self.dialect.quote();
        out.push(q);
        while let Some((i, len)) = self.dialect.quotes.find(cell) {
            out.push_str(&cell[..i + len]);
            out.push(q);
            cell = &cell[i + len..];
        }
        out.push_str(cell);
        out.push(q);
    }
}

/// Returns true for a `0` followed by one or more ASCII digits, which a
/// spreadsheet would otherwise import as a number and lose the zero.
fn is_zero_padded_number(cell: &str) -> bool {
    let bytes = cell.as_bytes();
    bytes.len() >= 2
        && bytes[0] == b'0'
        && bytes[1..].iter().all(|b| b.is_ascii_digit())
}
