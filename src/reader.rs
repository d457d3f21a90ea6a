use std::fmt;
use std::io;
use std::slice;

use censive_core::{
    count_newlines, Continuation, Cursor, Dialect, Lexer, LineSplitter,
    Speculation, Token,
};
use tracing::debug;

use crate::config::Config;
use crate::error::{new_parse_error, Result};
use crate::row::Row;
use crate::writer::Writer;

/// Builds a CSV reader with various configuration knobs.
///
/// This builder can be used to tweak the separator, the quote character and
/// the tolerances of the parser. Once a `Reader` is built, its configuration
/// cannot be changed.
///
/// # Example
///
/// ```
/// use censive::ReaderBuilder;
///
/// # fn example() -> censive::Result<()> {
/// let mut rdr = ReaderBuilder::new()
///     .separator(';')
///     .relax(true)
///     .from_string("a;\"b\"c\"\n")?;
/// let row = rdr.next_row()?.unwrap();
/// assert_eq!(row, vec!["a", "b\"c"]);
/// # Ok(()) }
/// # example().unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct ReaderBuilder {
    config: Config,
    fast_path: bool,
}

impl Default for ReaderBuilder {
    fn default() -> ReaderBuilder {
        ReaderBuilder { config: Config::default(), fast_path: true }
    }
}

impl ReaderBuilder {
    /// Create a new builder for configuring CSV parsing.
    pub fn new() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Create a builder from a complete configuration.
    ///
    /// The writing options of `config` are carried along, but have no effect
    /// on parsing.
    pub fn from_config(config: Config) -> ReaderBuilder {
        ReaderBuilder { config, fast_path: true }
    }

    /// Build a reader over the given text.
    ///
    /// This fails only when the configuration is invalid.
    pub fn from_string<S: Into<String>>(&self, text: S) -> Result<Reader> {
        let dialect = self.config.dialect()?;
        Ok(Reader::new(dialect, text.into(), self.fast_path))
    }

    /// Build a reader over everything `rdr` yields.
    ///
    /// The whole input is read into memory first. Input that isn't valid
    /// UTF-8 is reported as an I/O error of kind `InvalidData`.
    pub fn from_reader<R: io::Read>(&self, mut rdr: R) -> Result<Reader> {
        let dialect = self.config.dialect()?;
        let mut text = String::new();
        rdr.read_to_string(&mut text)?;
        Ok(Reader::new(dialect, text, self.fast_path))
    }

    /// The character that separates cells.
    ///
    /// The default is `,`.
    pub fn separator(&mut self, separator: char) -> &mut ReaderBuilder {
        self.config.separator = separator;
        self
    }

    /// The character that wraps cells holding special characters.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut ReaderBuilder {
        self.config.quote = quote;
        self
    }

    /// Accept quotes that don't follow the strict quoting rules.
    ///
    /// When enabled, a quote inside an unquoted cell is kept literally, and a
    /// quote that closes a quoted cell but is followed by more text is kept
    /// literally too. So `,"Fo"o,` reads as a cell `Fo"o` instead of failing.
    ///
    /// This is disabled by default.
    pub fn relax(&mut self, yes: bool) -> &mut ReaderBuilder {
        self.config.relax = yes;
        self
    }

    /// Read spreadsheet literals.
    ///
    /// When enabled, a cell written as `="0123"` reads as `0123`. A cell
    /// that starts with `=` without a quote after it, such as `=B2+B3`, is
    /// kept as is.
    ///
    /// This is disabled by default.
    pub fn excel(&mut self, yes: bool) -> &mut ReaderBuilder {
        self.config.excel = yes;
        self
    }

    /// Trim leading and trailing whitespace from every cell.
    ///
    /// This is disabled by default.
    pub fn strip(&mut self, yes: bool) -> &mut ReaderBuilder {
        self.config.strip = yes;
        self
    }

    /// Enable or disable the line splitter that reads quote-free lines
    /// without running the tokenizer. Disabling it never changes results.
    #[doc(hidden)]
    pub fn fast_path(&mut self, yes: bool) -> &mut ReaderBuilder {
        self.fast_path = yes;
        self
    }
}

/// A position in the CSV data being read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    byte: u64,
    line: u64,
    row: u64,
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

impl Position {
    /// Returns a new position at the start of the data: byte `0`, line `1`
    /// and row `1`.
    pub fn new() -> Position {
        Position { byte: 0, line: 1, row: 1 }
    }

    /// The byte offset, starting at `0`.
    #[inline]
    pub fn byte(&self) -> u64 {
        self.byte
    }

    /// The line number, starting at `1`.
    #[inline]
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The row number, starting at `1`.
    #[inline]
    pub fn row(&self) -> u64 {
        self.row
    }

    /// Move forward to byte `to` of `text`, counting the lines crossed.
    fn advance(&mut self, text: &str, to: usize) {
        let from = self.byte as usize;
        if to > from {
            self.line += count_newlines(&text[from..to]);
        }
        self.byte = to as u64;
    }
}

/// A CSV reader over an in-memory buffer.
///
/// A reader owns its text and an immutable dialect. Rows can be pulled one
/// at a time with `read_row`, `next_row` or `rows`, or all at once with
/// `parse_all`, which caches the resulting `Document`.
///
/// Quote-free lines are split directly on the separator. The first line
/// that needs real tokenizing turns that shortcut off for the rest of the
/// buffer.
#[derive(Debug)]
pub struct Reader {
    text: String,
    dialect: Dialect,
    /// Where the next row starts.
    offset: usize,
    pos: Position,
    speculation: Speculation,
    fast_path: bool,
    document: Option<Document>,
}

impl Reader {
    /// Create a reader with the default dialect over the given text.
    pub fn from_string<S: Into<String>>(text: S) -> Reader {
        Reader::new(Dialect::default(), text.into(), true)
    }

    fn new(dialect: Dialect, text: String, fast_path: bool) -> Reader {
        Reader {
            text,
            dialect,
            offset: 0,
            pos: Position::new(),
            speculation: initial_speculation(fast_path),
            fast_path,
            document: None,
        }
    }

    /// Read the next row into `row`, returning `false` once the data is
    /// exhausted.
    ///
    /// `row` is cleared first, and its allocations are reused. A row that is
    /// read always has at least one cell: an empty line reads as one empty
    /// cell.
    ///
    /// # Errors
    ///
    /// A parse error aborts reading. Calling this again afterwards reports
    /// the same error.
    pub fn read_row(&mut self, row: &mut Row) -> Result<bool> {
        row.clear();
        let text = self.text.as_str();
        let mut cur = Cursor::at(text, self.offset);
        if cur.is_eof() {
            return Ok(false);
        }

        let was_enabled = self.speculation.is_enabled();
        let splitter = LineSplitter::new(&self.dialect);
        let split = self.speculation.attempt(&mut cur, |cur| {
            splitter.split_line(cur, |cell| row.push_field(cell))
        });
        if split.is_none() {
            row.clear();
            if was_enabled {
                debug!(
                    byte = cur.offset(),
                    row = self.pos.row,
                    "fast path disabled"
                );
            }
            let lexer = Lexer::new(&self.dialect);
            let mut cont = Continuation::None;
            loop {
                let (token, next) = match lexer.next_token(&mut cur, cont) {
                    Ok(token) => token,
                    Err(err) => {
                        let mut pos = self.pos.clone();
                        pos.advance(text, err.offset());
                        return Err(new_parse_error(text, pos, err));
                    }
                };
                cont = next;
                match token {
                    Token::Cell(cell) => row.push_field(&cell),
                    Token::EndOfRow if row.is_empty() => row.push_field(""),
                    Token::EndOfRow => {}
                    Token::EndOfStream => break,
                }
                if cont.ends_row() {
                    if cont == Continuation::CarriageReturn {
                        cur.consume_char('\n');
                    }
                    break;
                }
            }
            if row.is_empty() {
                return Ok(false);
            }
        }

        self.offset = cur.offset();
        self.pos.advance(text, self.offset);
        self.pos.row += 1;
        Ok(true)
    }

    /// Read the next row, or `None` once the data is exhausted.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        let mut row = Row::new();
        if self.read_row(&mut row)? {
            Ok(Some(row))
        } else {
            Ok(None)
        }
    }

    /// Return an iterator over the remaining rows.
    ///
    /// The iterator stops after yielding the first error.
    pub fn rows(&mut self) -> RowsIter<'_> {
        RowsIter { rdr: self, done: false }
    }

    /// Parse the whole buffer into a `Document`.
    ///
    /// The buffer is always parsed from the start, regardless of rows
    /// already read. The document is cached, so later calls return it
    /// without parsing again, until `reset` is called.
    pub fn parse_all(&mut self) -> Result<&Document> {
        let doc = match self.document.take() {
            Some(doc) => doc,
            None => self.parse_document()?,
        };
        Ok(self.document.get_or_insert(doc))
    }

    fn parse_document(&mut self) -> Result<Document> {
        self.rewind();
        let mut rows = vec![];
        let mut stats =
            Stats { bytes: self.text.len() as u64, ..Stats::default() };
        loop {
            let mut row = Row::new();
            if !self.read_row(&mut row)? {
                break;
            }
            stats.add(&row);
            rows.push(row);
        }
        debug!(
            rows = stats.rows,
            columns = stats.columns,
            cells = stats.cells,
            bytes = stats.bytes,
            "parsed document"
        );
        Ok(Document { rows, stats })
    }

    /// Replace the text being read.
    ///
    /// The dialect is kept. Everything else starts over: the position, the
    /// cached document and the fast path.
    pub fn reset<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
        self.document = None;
        self.rewind();
        debug!(bytes = self.text.len(), "reader reset");
    }

    fn rewind(&mut self) {
        self.offset = 0;
        self.pos = Position::new();
        self.speculation = initial_speculation(self.fast_path);
    }

    /// Write every row of the document through `wtr`.
    ///
    /// The rows are written with the writer's own dialect, so this can be
    /// used to convert between dialects.
    pub fn export<W: io::Write>(&mut self, wtr: &mut Writer<W>) -> Result<()> {
        let doc = self.parse_all()?;
        wtr.write_document(doc)?;
        wtr.flush()?;
        Ok(())
    }

    /// The position at which the next row starts.
    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// The dialect this reader parses with.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// The text being read.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true once every row has been read.
    pub fn is_done(&self) -> bool {
        self.offset >= self.text.len()
    }
}

fn initial_speculation(fast_path: bool) -> Speculation {
    if fast_path {
        Speculation::new()
    } else {
        Speculation::disabled()
    }
}

/// An iterator over the rows of a reader.
///
/// The iterator yields `Row`s, owning their data.
pub struct RowsIter<'r> {
    rdr: &'r mut Reader,
    done: bool,
}

impl<'r> Iterator for RowsIter<'r> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        if self.done {
            return None;
        }
        match self.rdr.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Every row of a buffer, along with a few statistics about it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Document {
    rows: Vec<Row>,
    stats: Stats,
}

impl Document {
    /// The rows, in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at index `i`, if there is one.
    pub fn get(&self, i: usize) -> Option<&Row> {
        self.rows.get(i)
    }

    /// Return an iterator over the rows.
    pub fn iter(&self) -> slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Statistics about the rows.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Take the rows, dropping the statistics.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a Document {
    type IntoIter = slice::Iter<'a, Row>;
    type Item = &'a Row;

    fn into_iter(self) -> slice::Iter<'a, Row> {
        self.iter()
    }
}

/// Counts gathered while parsing a document.
///
/// The `Display` impl prints one right-aligned count per line:
///
/// ```text
///  3 rows
///  2 columns
///  6 cells
/// 32 bytes
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// The number of rows.
    pub rows: u64,
    /// The largest number of cells seen in one row.
    pub columns: u64,
    /// The number of cells across all rows.
    pub cells: u64,
    /// The length of the text, in bytes.
    pub bytes: u64,
}

impl Stats {
    fn add(&mut self, row: &Row) {
        let width = row.len() as u64;
        self.rows += 1;
        self.cells += width;
        if width > self.columns {
            self.columns = width;
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let wide = self.bytes.to_string().len();
        writeln!(f, "{:>wide$} rows", self.rows, wide = wide)?;
        writeln!(f, "{:>wide$} columns", self.columns, wide = wide)?;
        writeln!(f, "{:>wide$} cells", self.cells, wide = wide)?;
        writeln!(f, "{:>wide$} bytes", self.bytes, wide = wide)
    }
}

#[cfg(test)]
mod tests {
    use censive_core::ParseErrorKind;

    use super::{Position, Reader, ReaderBuilder, Stats};
    use crate::row::Row;

    fn rows(rdr: &mut Reader) -> Vec<Vec<String>> {
        rdr.rows()
            .map(|r| r.unwrap().iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn read_rows_one_at_a_time() {
        let mut rdr = Reader::from_string("a,b\nc,d\n");
        let mut row = Row::new();
        assert!(rdr.read_row(&mut row).unwrap());
        assert_eq!(row, vec!["a", "b"]);
        assert!(rdr.read_row(&mut row).unwrap());
        assert_eq!(row, vec!["c", "d"]);
        assert!(!rdr.read_row(&mut row).unwrap());
        assert!(row.is_empty());
        assert!(rdr.is_done());
    }

    #[test]
    fn no_trailing_terminator() {
        let mut rdr = Reader::from_string("a,b\nc,");
        assert_eq!(rows(&mut rdr), vec![vec!["a", "b"], vec!["c", ""]]);
    }

    #[test]
    fn empty_input() {
        let mut rdr = Reader::from_string("");
        assert_eq!(rdr.next_row().unwrap(), None);
        let doc = rdr.parse_all().unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.stats().cells, 0);
    }

    #[test]
    fn empty_lines_are_rows() {
        let mut rdr = Reader::from_string("a\n\r\n\rb");
        assert_eq!(
            rows(&mut rdr),
            vec![vec!["a"], vec![""], vec![""], vec!["b"]]
        );
    }

    #[test]
    fn crlf_split_across_fallback() {
        // The quoted cell forces the tokenizer, which must still swallow
        // the `\n` of the `\r\n`.
        let mut rdr = Reader::from_string("\"a\nb\"\r\nc\r\n");
        assert_eq!(rows(&mut rdr), vec![vec!["a\nb"], vec!["c"]]);
    }

    #[test]
    fn fast_path_and_tokenizer_agree() {
        let data = "a, b ,\"c\"\n\"d,e\",f\n\n\"g\"\"h\",i\r\nj,k,l,\n";
        let mut fast = Reader::from_string(data);
        let mut slow = ReaderBuilder::new()
            .fast_path(false)
            .from_string(data)
            .unwrap();
        assert_eq!(rows(&mut fast), rows(&mut slow));
    }

    #[test]
    fn parse_all_is_cached() {
        let mut rdr = Reader::from_string("a,b\nc\n");
        let first = rdr.parse_all().unwrap().clone();
        assert_eq!(first.len(), 2);
        assert!(rdr.is_done());
        let second = rdr.parse_all().unwrap();
        assert_eq!(&first, second);
    }

    #[test]
    fn parse_all_starts_from_the_top() {
        let mut rdr = Reader::from_string("a\nb\nc\n");
        rdr.next_row().unwrap();
        let doc = rdr.parse_all().unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get(0).unwrap(), &vec!["a"]);
    }

    #[test]
    fn reset_starts_over() {
        let mut rdr = Reader::from_string("\"x\"\"\",y\n");
        assert_eq!(rdr.parse_all().unwrap().len(), 1);
        rdr.reset("p,q\nr,s\nt,u\n");
        assert_eq!(rdr.position(), &Position::new());
        let doc = rdr.parse_all().unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.stats().cells, 6);
        assert_eq!(rdr.as_str(), "p,q\nr,s\nt,u\n");
    }

    #[test]
    fn position_tracks_rows_and_lines() {
        let mut rdr = Reader::from_string("a\n\"b\nc\"\nd");
        assert_eq!(rdr.position().row(), 1);
        rdr.next_row().unwrap();
        assert_eq!(rdr.position().byte(), 2);
        assert_eq!(rdr.position().line(), 2);
        assert_eq!(rdr.position().row(), 2);
        rdr.next_row().unwrap();
        assert_eq!(rdr.position().byte(), 8);
        assert_eq!(rdr.position().line(), 4);
        assert_eq!(rdr.position().row(), 3);
    }

    #[test]
    fn error_position() {
        let mut rdr = Reader::from_string("a,b\nc,d\ne,\"f\n");
        assert_eq!(rdr.next_row().unwrap().unwrap(), vec!["a", "b"]);
        assert_eq!(rdr.next_row().unwrap().unwrap(), vec!["c", "d"]);
        let err = rdr.next_row().unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::UnclosedQuote));
        let pos = err.position().unwrap();
        assert_eq!(pos.byte(), 10);
        assert_eq!(pos.line(), 3);
        assert_eq!(pos.row(), 3);
        // Errors are sticky.
        assert!(rdr.next_row().is_err());
    }

    #[test]
    fn rows_iter_stops_after_error() {
        let mut rdr = Reader::from_string("a\n\"b\"c\nd\n");
        let results: Vec<_> = rdr.rows().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn parse_error_leaves_no_document() {
        let mut rdr = Reader::from_string("a\n,\"Fo\"o,\n");
        let err = rdr.parse_all().unwrap_err();
        assert_eq!(
            err.parse_kind(),
            Some(ParseErrorKind::InvalidCharacterAfterQuote)
        );
        assert!(rdr.parse_all().is_err());
    }

    #[test]
    fn from_reader() {
        let rdr = ReaderBuilder::new().from_reader(&b"a;b\n"[..]).unwrap();
        assert_eq!(rdr.as_str(), "a;b\n");

        let err = ReaderBuilder::new().from_reader(&b"a\xFFb\n"[..]).unwrap_err();
        assert!(err.is_io_error());
    }

    #[test]
    fn invalid_config() {
        let err = ReaderBuilder::new().quote(',').from_string("").unwrap_err();
        assert!(err.to_string().starts_with("CSV configuration error"), "{}", err);
    }

    #[test]
    fn stats_display() {
        let stats = Stats { rows: 3, columns: 2, cells: 6, bytes: 39 };
        assert_eq!(
            stats.to_string(),
            " 3 rows\n 2 columns\n 6 cells\n39 bytes\n"
        );
        let stats = Stats { rows: 0, columns: 0, cells: 0, bytes: 0 };
        assert_eq!(stats.to_string(), "0 rows\n0 columns\n0 cells\n0 bytes\n");
    }
}
