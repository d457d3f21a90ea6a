use core::str::FromStr;

use crate::error::ConfigError;
use crate::pattern::Pattern;

/// How much quoting the writer applies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum OutputMode {
    /// Quote only the cells that need it.
    ///
    /// This is the default.
    Compact,
    /// Quote every cell, always.
    Full,
}

impl Default for OutputMode {
    fn default() -> OutputMode {
        OutputMode::Compact
    }
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<OutputMode, ConfigError> {
        match s {
            "compact" => Ok(OutputMode::Compact),
            "full" => Ok(OutputMode::Full),
            _ => Err(ConfigError::InvalidValue {
                option: "output_mode".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Parse a character option given as text.
///
/// The value must hold exactly one character.
pub fn one_char(option: &str, value: &str) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(ConfigError::NotOneCharacter {
            option: option.to_string(),
            value: value.to_string(),
        }),
    }
}

/// A builder for a `Dialect`.
///
/// Every option has a default, so `DialectBuilder::new().build()` always
/// succeeds. Once a `Dialect` is built, its configuration cannot change.
#[derive(Clone, Debug)]
pub struct DialectBuilder {
    separator: char,
    quote: char,
    relax: bool,
    excel: bool,
    strip: bool,
    drop_trailing_empty: bool,
    output_mode: OutputMode,
    row_terminator: String,
}

impl Default for DialectBuilder {
    fn default() -> DialectBuilder {
        DialectBuilder {
            separator: ',',
            quote: '"',
            relax: false,
            excel: false,
            strip: false,
            drop_trailing_empty: false,
            output_mode: OutputMode::Compact,
            row_terminator: "\n".to_string(),
        }
    }
}

impl DialectBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> DialectBuilder {
        DialectBuilder::default()
    }

    /// Validate this configuration and build a `Dialect` from it.
    ///
    /// This fails when the separator equals the quote, when either is `\r`
    /// or `\n`, when either is `=` while excel mode is on, or when the row
    /// terminator is empty.
    pub fn build(&self) -> Result<Dialect, ConfigError> {
        if self.separator == self.quote {
            return Err(ConfigError::SameSeparatorAndQuote(self.separator));
        }
        for &(option, ch) in
            &[("separator", self.separator), ("quote", self.quote)]
        {
            let excel_marker = self.excel && ch == '=';
            if ch == '\r' || ch == '\n' || excel_marker {
                return Err(ConfigError::ReservedCharacter { option, ch });
            }
        }
        if self.row_terminator.is_empty() {
            return Err(ConfigError::EmptyTerminator);
        }
        Ok(self.compile())
    }

    /// The character that separates cells.
    ///
    /// The default is `,`.
    pub fn separator(&mut self, separator: char) -> &mut DialectBuilder {
        self.separator = separator;
        self
    }

    /// The character that wraps quoted cells.
    ///
    /// The default is `"`.
    pub fn quote(&mut self, quote: char) -> &mut DialectBuilder {
        self.quote = quote;
        self
    }

    /// Tolerate stray quotes.
    ///
    /// When enabled, a quote inside a quoted cell that isn't doubled and
    /// isn't followed by a separator or line terminator is kept as literal
    /// text, so `,"Fo"o,` reads as `Fo"o`. Quotes inside unquoted cells are
    /// kept as literal text too.
    ///
    /// This is disabled by default.
    pub fn relax(&mut self, yes: bool) -> &mut DialectBuilder {
        self.relax = yes;
        self
    }

    /// Enable the spreadsheet literal convention.
    ///
    /// When enabled, a cell written as `="0123"` reads as `0123`, and a cell
    /// made of a leading zero followed by digits is written in that form.
    ///
    /// This is disabled by default.
    pub fn excel(&mut self, yes: bool) -> &mut DialectBuilder {
        self.excel = yes;
        self
    }

    /// Trim leading and trailing whitespace from every cell that is read.
    ///
    /// This is disabled by default.
    pub fn strip(&mut self, yes: bool) -> &mut DialectBuilder {
        self.strip = yes;
        self
    }

    /// Drop trailing empty cells from every row that is written.
    ///
    /// This is disabled by default.
    pub fn drop_trailing_empty(&mut self, yes: bool) -> &mut DialectBuilder {
        self.drop_trailing_empty = yes;
        self
    }

    /// The quoting applied when writing.
    ///
    /// The default is `OutputMode::Compact`.
    pub fn output_mode(&mut self, mode: OutputMode) -> &mut DialectBuilder {
        self.output_mode = mode;
        self
    }

    /// The text written after every row.
    ///
    /// The default is `\n`.
    pub fn row_terminator<S: Into<String>>(
        &mut self,
        term: S,
    ) -> &mut DialectBuilder {
        self.row_terminator = term.into();
        self
    }

    fn compile(&self) -> Dialect {
        let (sep, quote) = (self.separator, self.quote);
        Dialect {
            separator: sep,
            quote,
            relax: self.relax,
            excel: self.excel,
            strip: self.strip,
            drop_trailing_empty: self.drop_trailing_empty,
            output_mode: self.output_mode,
            row_terminator: self.row_terminator.clone(),
            quotes: Pattern::new(&[quote]),
            cell_end: Pattern::new(&[sep, '\r', '\n']),
            line_end: Pattern::new(&['\r', '\n']),
            specials: Pattern::new(&[sep, quote, '\r', '\n']),
        }
    }
}

/// An immutable, validated set of reading and writing options.
///
/// Besides the options themselves, a dialect carries the search patterns
/// derived from its separator and quote, so no scan ever rebuilds them.
#[derive(Clone, Debug)]
pub struct Dialect {
    separator: char,
    quote: char,
    relax: bool,
    excel: bool,
    strip: bool,
    drop_trailing_empty: bool,
    output_mode: OutputMode,
    row_terminator: String,
    /// The quote character alone.
    pub(crate) quotes: Pattern,
    /// Anything that ends a cell: the separator, `\r` or `\n`.
    pub(crate) cell_end: Pattern,
    /// `\r` or `\n`.
    pub(crate) line_end: Pattern,
    /// Anything that matters to quoting: the separator, the quote, `\r` or
    /// `\n`.
    pub(crate) specials: Pattern,
}

impl Default for Dialect {
    fn default() -> Dialect {
        DialectBuilder::default().compile()
    }
}

impl Dialect {
    /// The character that separates cells.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// The character that wraps quoted cells.
    pub fn quote(&self) -> char {
        self.quote
    }

    /// Whether stray quotes are tolerated.
    pub fn relax(&self) -> bool {
        self.relax
    }

    /// Whether the `="..."` spreadsheet literal convention is on.
    pub fn excel(&self) -> bool {
        self.excel
    }

    /// Whether cells are trimmed of whitespace when read.
    pub fn strip(&self) -> bool {
        self.strip
    }

    /// Whether trailing empty cells are dropped when written.
    pub fn drop_trailing_empty(&self) -> bool {
        self.drop_trailing_empty
    }

    /// The quoting applied when writing.
    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// The text written after every row.
    pub fn row_terminator(&self) -> &str {
        &self.row_terminator
    }

    /// The pattern matching the separator, `\r` and `\n`.
    pub fn cell_end(&self) -> &Pattern {
        &self.cell_end
    }

    /// The pattern matching `\r` and `\n`.
    pub fn line_end(&self) -> &Pattern {
        &self.line_end
    }

    /// The pattern matching the quote alone.
    pub fn quotes(&self) -> &Pattern {
        &self.quotes
    }

    pub(crate) fn is_separator(&self, c: char) -> bool {
        c == self.separator
    }

    pub(crate) fn is_quote(&self, c: char) -> bool {
        c == self.quote
    }

    /// Apply the strip option to a cell.
    pub(crate) fn finish<'a>(&self, cell: &'a str) -> &'a str {
        if self.strip {
            cell.trim()
        } else {
            cell
        }
    }
}
