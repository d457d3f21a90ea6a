use std::borrow::Cow;

use crate::cursor::Cursor;
use crate::dialect::Dialect;
use crate::error::{ParseError, ParseErrorKind};

/// What the previous token left behind for the next read.
///
/// The lexer itself holds no state between reads. Instead, each call to
/// `Lexer::next_token` takes the continuation returned by the call before it
/// (or `Continuation::None` at the start of the buffer).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Continuation {
    /// Nothing is pending.
    None,
    /// A separator was just consumed. If the row ends right here, there is
    /// still one empty cell to report.
    Separator,
    /// A `\r` was just consumed. A `\n` right after it belongs to the same
    /// line terminator.
    CarriageReturn,
    /// A `\n` was just consumed.
    LineFeed,
}

impl Default for Continuation {
    fn default() -> Continuation {
        Continuation::None
    }
}

impl Continuation {
    /// Returns true if the token that produced this continuation ended a
    /// row.
    pub fn ends_row(&self) -> bool {
        match *self {
            Continuation::CarriageReturn | Continuation::LineFeed => true,
            Continuation::None | Continuation::Separator => false,
        }
    }
}

/// A single item produced by the lexer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token<'a> {
    /// The value of one cell.
    ///
    /// This borrows from the buffer unless unescaping had to build a new
    /// string.
    Cell(Cow<'a, str>),
    /// A line terminator was consumed.
    EndOfRow,
    /// There is nothing left in the buffer.
    EndOfStream,
}

/// A quote-aware tokenizer.
///
/// The states of the tokenizer are implicit in the call structure: a read
/// begins ready for a cell, moves into a quoted cell when it sees a quote,
/// and inspects the character after each closing quote to decide whether
/// the cell is complete.
#[derive(Clone, Copy, Debug)]
pub struct Lexer<'d> {
    dialect: &'d Dialect,
}

impl<'d> Lexer<'d> {
    /// Create a lexer for the given dialect.
    pub fn new(dialect: &'d Dialect) -> Lexer<'d> {
        Lexer { dialect }
    }

    /// Read exactly one token from `cur`.
    ///
    /// `cont` must be the continuation returned with the previous token, or
    /// `Continuation::None` when starting fresh at the beginning of a row.
    /// The continuation returned alongside the token must be passed to the
    /// next call.
    ///
    /// # Errors
    ///
    /// On malformed input, the cursor is left somewhere inside the bad cell
    /// and the error records the offset of the problem.
    pub fn next_token<'a>(
        &self,
        cur: &mut Cursor<'a>,
        cont: Continuation,
    ) -> Result<(Token<'a>, Continuation), ParseError> {
        let d = self.dialect;
        match cont {
            Continuation::Separator => match cur.peek() {
                None | Some('\r') | Some('\n') => {
                    return Ok((empty_cell(), Continuation::None));
                }
                Some(_) => {}
            },
            Continuation::CarriageReturn => {
                cur.consume_char('\n');
            }
            Continuation::LineFeed | Continuation::None => {}
        }
        let c = match cur.peek() {
            None => return Ok((Token::EndOfStream, Continuation::None)),
            Some(c) => c,
        };
        if c == '\r' {
            cur.bump();
            return Ok((Token::EndOfRow, Continuation::CarriageReturn));
        }
        if c == '\n' {
            cur.bump();
            return Ok((Token::EndOfRow, Continuation::LineFeed));
        }
        if d.is_separator(c) {
            cur.bump();
            return Ok((empty_cell(), Continuation::Separator));
        }
        let (cell, next) = if d.is_quote(c) {
            self.quoted(cur)?
        } else if d.excel()
            && c == '='
            && cur.peek_second().map_or(false, |c| d.is_quote(c))
        {
            cur.bump();
            self.quoted(cur)?
        } else {
            self.unquoted(cur)?
        };
        Ok((Token::Cell(self.finish(cell)), next))
    }

    /// Read a quoted cell. The cursor must be on the opening quote.
    fn quoted<'a>(
        &self,
        cur: &mut Cursor<'a>,
    ) -> Result<(Cow<'a, str>, Continuation), ParseError> {
        let d = self.dialect;
        let open = cur.offset();
        let qlen = d.quote().len_utf8();
        cur.bump();
        let mut cell = Cow::Borrowed("");
        loop {
            let chunk = match cur.consume_until(&d.quotes) {
                Some(chunk) => chunk,
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnclosedQuote,
                        open,
                    ));
                }
            };
            append(&mut cell, &chunk[..chunk.len() - qlen]);
            match cur.peek() {
                Some(c) if d.is_quote(c) => {
                    cur.bump();
                    cell.to_mut().push(c);
                }
                Some(c) if d.is_separator(c) => {
                    cur.bump();
                    return Ok((cell, Continuation::Separator));
                }
                None | Some('\r') | Some('\n') => {
                    return Ok((cell, Continuation::None));
                }
                Some(_) if d.relax() => {
                    // The quote we just passed wasn't a closing quote.
                    cell.to_mut().push(d.quote());
                    if !self.quote_before_line_end(cur) {
                        append(&mut cell, cur.consume_before(&d.cell_end));
                        return Ok((cell, self.after_cell(cur)));
                    }
                }
                Some(_) => {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidCharacterAfterQuote,
                        cur.offset(),
                    ));
                }
            }
        }
    }

    /// Read an unquoted cell. The cursor must be on its first character.
    fn unquoted<'a>(
        &self,
        cur: &mut Cursor<'a>,
    ) -> Result<(Cow<'a, str>, Continuation), ParseError> {
        let d = self.dialect;
        let start = cur.offset();
        cur.consume_before(&d.specials);
        if cur.peek().map_or(false, |c| d.is_quote(c)) {
            if !d.relax() && !d.excel() {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedCharacter,
                    cur.offset(),
                ));
            }
            cur.consume_before(&d.cell_end);
        }
        let cell = &cur.text()[start..cur.offset()];
        Ok((Cow::Borrowed(cell), self.after_cell(cur)))
    }

    /// Consume the separator ending a cell, if there is one.
    fn after_cell(&self, cur: &mut Cursor<'_>) -> Continuation {
        if cur.consume_char(self.dialect.separator()) {
            Continuation::Separator
        } else {
            Continuation::None
        }
    }

    /// Returns true if another quote comes up before the next line
    /// terminator. Separators in between are kept as part of the cell.
    fn quote_before_line_end(&self, cur: &Cursor<'_>) -> bool {
        let rest = cur.rest();
        match self.dialect.quotes.find(rest) {
            None => false,
            Some((q, _)) => self.dialect.line_end.find(&rest[..q]).is_none(),
        }
    }

    fn finish<'a>(&self, cell: Cow<'a, str>) -> Cow<'a, str> {
        if !self.dialect.strip() {
            return cell;
        }
        match cell {
            Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
            Cow::Owned(s) => {
                let trimmed = s.trim();
                if trimmed.len() == s.len() {
                    Cow::Owned(s)
                } else {
                    Cow::Owned(trimmed.to_string())
                }
            }
        }
    }
}

fn empty_cell<'a>() -> Token<'a> {
    Token::Cell(Cow::Borrowed(""))
}

/// Append `text` to `cell`, borrowing for as long as possible.
fn append<'a>(cell: &mut Cow<'a, str>, text: &'a str) {
    let empty = match *cell {
        Cow::Borrowed(s) => s.is_empty(),
        Cow::Owned(_) => false,
    };
    if empty {
        *cell = Cow::Borrowed(text);
    } else if !text.is_empty() {
        cell.to_mut().push_str(text);
    }
}
