use core::fmt;

/// The kind of failure the tokenizer ran into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    /// A quoted cell was opened but its closing quote never showed up.
    UnclosedQuote,
    /// A closing quote was followed by something other than a separator or
    /// a line terminator, and relax mode is disabled.
    InvalidCharacterAfterQuote,
    /// A quote appeared inside an unquoted cell, and neither relax nor excel
    /// mode is enabled.
    UnexpectedCharacter,
}

impl ParseErrorKind {
    fn description(&self) -> &'static str {
        match *self {
            ParseErrorKind::UnclosedQuote => "unclosed quote",
            ParseErrorKind::InvalidCharacterAfterQuote => {
                "invalid character after quote"
            }
            ParseErrorKind::UnexpectedCharacter => "unexpected character",
        }
    }
}

/// An error produced while tokenizing.
///
/// The offset is a byte offset into the buffer being parsed. For an
/// unclosed quote it points at the opening quote; for the other kinds it
/// points at the offending character.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    kind: ParseErrorKind,
    offset: usize,
}

impl ParseError {
    /// Create a new parse error of the given kind at the given byte offset.
    pub fn new(kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError { kind, offset }
    }

    /// The kind of this error.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// The byte offset at which this error occurred.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at byte {}", self.kind.description(), self.offset)
    }
}

impl std::error::Error for ParseError {}

/// An invalid dialect configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// The separator and the quote are the same character.
    SameSeparatorAndQuote(char),
    /// An option was set to a character with a fixed meaning: `\r` and `\n`
    /// always end a row, and `=` marks excel literals when excel mode is on.
    ReservedCharacter {
        /// The name of the option.
        option: &'static str,
        /// The character it was set to.
        ch: char,
    },
    /// A character option was given an empty or multi-character value.
    NotOneCharacter {
        /// The name of the option.
        option: String,
        /// The value it was given.
        value: String,
    },
    /// The row terminator used when writing is empty.
    EmptyTerminator,
    /// An option name that isn't recognized.
    UnknownOption(String),
    /// An option value that couldn't be parsed.
    InvalidValue {
        /// The name of the option.
        option: String,
        /// The value it was given.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::SameSeparatorAndQuote(ch) => write!(
                f,
                "separator and quote must differ, but both are {:?}",
                ch
            ),
            ConfigError::ReservedCharacter { option, ch } => {
                write!(
                    f,
                    "{} cannot be the reserved character {:?}",
                    option, ch
                )
            }
            ConfigError::NotOneCharacter { ref option, ref value } => write!(
                f,
                "{} must be exactly one character, but got {:?}",
                option, value
            ),
            ConfigError::EmptyTerminator => {
                write!(f, "row terminator must not be empty")
            }
            ConfigError::UnknownOption(ref name) => {
                write!(f, "unknown option {:?}", name)
            }
            ConfigError::InvalidValue { ref option, ref value } => {
                write!(f, "invalid value {:?} for option {}", value, option)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
