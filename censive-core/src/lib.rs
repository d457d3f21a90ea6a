/*!
`censive-core` provides the engine behind the `censive` crate: a quote-aware
tokenizer for CSV-like text, a speculative line splitter for the common
quote-free case, and the quoting engine used when writing.

Everything here works on a fully materialized `&str`. Cells are handed out as
slices of that buffer whenever no unescaping is needed.

Most callers want the `censive` crate instead, which assembles rows,
documents and writers on top of this one.

# Example

```
use censive_core::{Continuation, Cursor, Dialect, Lexer, Token};

let dialect = Dialect::default();
let lexer = Lexer::new(&dialect);
let mut cur = Cursor::new("a,\"b,c\"\n");
let mut cont = Continuation::None;
let mut cells = vec![];
loop {
    let (token, next) = lexer.next_token(&mut cur, cont).unwrap();
    cont = next;
    match token {
        Token::Cell(cell) => cells.push(cell.into_owned()),
        Token::EndOfRow | Token::EndOfStream => break,
    }
}
assert_eq!(cells, vec!["a", "b,c"]);
```
*/

#![warn(missing_docs)]

pub use crate::cursor::{count_newlines, Checkpoint, Cursor};
pub use crate::dialect::{one_char, Dialect, DialectBuilder, OutputMode};
pub use crate::error::{ConfigError, ParseError, ParseErrorKind};
pub use crate::lexer::{Continuation, Lexer, Token};
pub use crate::pattern::Pattern;
pub use crate::quote::{Quoter, Quoting};
pub use crate::split::{LineSplitter, Speculation};

mod cursor;
mod dialect;
mod error;
mod lexer;
mod pattern;
mod quote;
mod split;
