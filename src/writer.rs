use std::io;

use censive_core::{Dialect, OutputMode, Quoter};
use tracing::trace;

use crate::config::Config;
use crate::error::Result;
use crate::reader::Document;

/// Builds a CSV writer with various configuration knobs.
///
/// This builder can be used to tweak the separator, the quoting and the row
/// terminator. Once a `Writer` is built, its configuration cannot be
/// changed.
///
/// # Example
///
/// ```
/// use censive::{OutputMode, WriterBuilder};
///
/// # fn example() -> censive::Result<()> {
/// let mut wtr = WriterBuilder::new()
///     .separator('\t')
///     .output_mode(OutputMode::Full)
///     .from_writer(vec![])?;
/// wtr.write_row(&["a", "b"])?;
/// assert_eq!(wtr.into_inner(), b"\"a\"\t\"b\"\n");
/// # Ok(()) }
/// # example().unwrap();
/// ```
#[derive(Clone, Debug, Default)]
pub struct WriterBuilder {
    config: Config,
}

impl WriterBuilder {
    /// Create a new builder for configuring CSV writing.
    pub fn new() -> WriterBuilder {
        WriterBuilder::default()
    }

    /// Create a builder from a complete configuration.
    ///
    /// The reading options of `config` are carried along, but have no effect
    /// on writing.
    pub fn from_config(config: Config) -> WriterBuilder {
        WriterBuilder { config }
    }

    /// Build a CSV writer that writes to `wtr`.
    ///
    /// This fails only when the configuration is invalid.
    pub fn from_writer<W: io::Write>(&self, wtr: W) -> Result<Writer<W>> {
        Ok(Writer::new(self.config.dialect()?, wtr))
    }

    /// The character written between cells.
    ///
    /// The default is `,`.
    pub fn separator(&mut self, separator: char) -> &mut WriterBuilder {
        self.config.separator = separator;
        self
    }

    /// The character used to quote cells.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut WriterBuilder {
        self.config.quote = quote;
        self
    }

    /// Write cells like `0123` as `="0123"` so spreadsheets keep them as
    /// text.
    ///
    /// This is disabled by default.
    pub fn excel(&mut self, yes: bool) -> &mut WriterBuilder {
        self.config.excel = yes;
        self
    }

    /// Leave out the empty cells at the end of every row.
    ///
    /// This is disabled by default.
    pub fn drop_trailing_empty(&mut self, yes: bool) -> &mut WriterBuilder {
        self.config.drop_trailing_empty = yes;
        self
    }

    /// How much quoting to apply.
    ///
    /// The default is `OutputMode::Compact`, which quotes only the cells
    /// that need it.
    pub fn output_mode(&mut self, mode: OutputMode) -> &mut WriterBuilder {
        self.config.output_mode = mode;
        self
    }

    /// The text written after every row.
    ///
    /// The default is `\n`.
    pub fn row_terminator<S: Into<String>>(
        &mut self,
        term: S,
    ) -> &mut WriterBuilder {
        self.config.row_terminator = term.into();
        self
    }
}

/// A CSV writer.
///
/// Each row is serialized into an internal buffer and then handed to the
/// underlying `io::Write` in one call. Wrap the sink in a `BufWriter` if it
/// is unbuffered.
#[derive(Debug)]
pub struct Writer<W: io::Write> {
    wtr: W,
    dialect: Dialect,
    buf: String,
}

impl<W: io::Write> Writer<W> {
    /// Create a writer with the default dialect.
    pub fn from_writer(wtr: W) -> Writer<W> {
        Writer::new(Dialect::default(), wtr)
    }

    fn new(dialect: Dialect, wtr: W) -> Writer<W> {
        Writer { wtr, dialect, buf: String::new() }
    }

    /// Write a single row.
    ///
    /// The row may have any number of cells, including none, in which case
    /// only the row terminator is written.
    pub fn write_row<I, T>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let cells: Vec<T> = row.into_iter().collect();
        self.buf.clear();
        Quoter::new(&self.dialect).write_row(&cells, &mut self.buf);
        trace!(cells = cells.len(), bytes = self.buf.len(), "write row");
        self.wtr.write_all(self.buf.as_bytes())?;
        Ok(())
    }

    /// Write every row of a document.
    pub fn write_document(&mut self, doc: &Document) -> Result<()> {
        for row in doc {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.wtr.flush()
    }

    /// The dialect this writer writes with.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Return a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.wtr
    }

    /// Return a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.wtr
    }

    /// Unwrap this writer, returning the underlying writer.
    ///
    /// Rows are written through as soon as they are serialized, so nothing
    /// is lost. Call `flush` first if the underlying writer buffers.
    pub fn into_inner(self) -> W {
        self.wtr
    }
}
