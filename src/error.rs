use std::error;
use std::fmt;
use std::io;
use std::result;

use bstr::{BString, ByteSlice};
use censive_core::{ConfigError, ParseError, ParseErrorKind};

use crate::reader::Position;

/// A type alias for `Result<T, censive::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when reading or writing CSV data.
///
/// Every error is fatal for the operation that produced it. In particular, a
/// parse error ends the read: there is no skipping of bad rows.
#[derive(Debug)]
pub enum Error {
    /// An I/O error that occurred while reading the source or writing to the
    /// sink.
    Io(io::Error),
    /// The data couldn't be tokenized.
    Parse {
        /// Where the error occurred. The byte offset is the one reported by
        /// the tokenizer; the row is the one being read at the time.
        pos: Position,
        /// The underlying tokenizer error.
        err: ParseError,
        /// A few bytes of the data around the error.
        excerpt: BString,
    },
    /// A reader or writer was configured with invalid options.
    Config(ConfigError),
}

/// Build a parse error, taking an excerpt of `text` around the offset.
pub(crate) fn new_parse_error(
    text: &str,
    pos: Position,
    err: ParseError,
) -> Error {
    let bytes = text.as_bytes();
    let start = err.offset().saturating_sub(4).min(bytes.len());
    let end = (start + 7).min(bytes.len());
    let excerpt = BString::from(bytes[start..end].to_vec());
    Error::Parse { pos, err, excerpt }
}

impl Error {
    /// The position of a parse error.
    pub fn position(&self) -> Option<&Position> {
        match *self {
            Error::Parse { ref pos, .. } => Some(pos),
            Error::Io(_) | Error::Config(_) => None,
        }
    }

    /// The kind of a parse error.
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match *self {
            Error::Parse { ref err, .. } => Some(err.kind()),
            Error::Io(_) | Error::Config(_) => None,
        }
    }

    /// Returns true if this is an I/O error.
    pub fn is_io_error(&self) -> bool {
        match *self {
            Error::Io(_) => true,
            _ => false,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Error {
        Error::Config(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::Parse { ref err, .. } => Some(err),
            Error::Config(ref err) => Some(err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::Parse { ref pos, ref err, ref excerpt } => write!(
                f,
                "CSV parse error: row {} (byte {}, line {}): {} near '{}'",
                pos.row(),
                pos.byte(),
                pos.line(),
                err,
                excerpt.to_str_lossy()
            ),
            Error::Config(ref err) => {
                write!(f, "CSV configuration error: {}", err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use censive_core::{ParseError, ParseErrorKind};

    use super::new_parse_error;
    use crate::reader::Position;

    #[test]
    fn excerpt_window() {
        let err = ParseError::new(ParseErrorKind::UnexpectedCharacter, 6);
        let err = new_parse_error("abcdefghijk", Position::new(), err);
        match err {
            super::Error::Parse { ref excerpt, .. } => {
                assert_eq!(excerpt, "cdefghi");
            }
            _ => panic!("expected parse error"),
        }
    }

    #[test]
    fn excerpt_near_edges() {
        let err = ParseError::new(ParseErrorKind::UnclosedQuote, 1);
        let err = new_parse_error("a\"b", Position::new(), err);
        assert!(err.to_string().ends_with("near 'a\"b'"), "{}", err);
    }

    #[test]
    fn excerpt_splitting_utf8_still_displays() {
        // The window starts in the middle of the two byte `é`.
        let err = ParseError::new(ParseErrorKind::UnclosedQuote, 5);
        let err = new_parse_error("éab\"cd", Position::new(), err);
        assert!(err.to_string().contains("near '\u{FFFD}ab\"cd'"), "{}", err);
    }
}
