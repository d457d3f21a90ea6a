/*!
The `censive` crate reads and writes CSV, including the kinds of CSV that
real files tend to contain: odd separators and quotes, stray quotes inside
cells, and spreadsheet literals such as `="0123"`.

A `Reader` owns the whole text it reads. Rows come out one at a time, or all
at once as a `Document` along with a few `Stats`. A `Writer` serializes rows
to any `io::Write`, quoting only what it has to (or everything, if asked).

# Example

```
use censive::{Reader, Writer};

# fn example() -> censive::Result<()> {
let data = "Name,Age\nAlice,30\n\"Bob, Jr.\",41\n";
let mut rdr = Reader::from_string(data);
let doc = rdr.parse_all()?;
assert_eq!(doc.len(), 3);
assert_eq!(doc.stats().columns, 2);
assert_eq!(doc.get(2).unwrap(), &vec!["Bob, Jr.", "41"]);

let mut wtr = Writer::from_writer(vec![]);
wtr.write_document(doc)?;
assert_eq!(wtr.into_inner(), data.as_bytes());
# Ok(()) }
# example().unwrap();
```

# Configuration

Both `ReaderBuilder` and `WriterBuilder` are backed by a `Config`, which can
also be filled in from text with `Config::set`, or through serde when the
`serde` feature is enabled.

```
use censive::{Config, ReaderBuilder};

# fn example() -> censive::Result<()> {
let mut config = Config::new();
config.set("sep", ";")?;
config.set("excel", "true")?;
let mut rdr = ReaderBuilder::from_config(config).from_string("=\"007\";x\n")?;
assert_eq!(rdr.next_row()?.unwrap(), vec!["007", "x"]);
# Ok(()) }
# example().unwrap();
```
*/

#![deny(missing_docs)]

pub use censive_core::{
    ConfigError, Dialect, DialectBuilder, OutputMode, ParseError,
    ParseErrorKind,
};

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::reader::{
    Document, Position, Reader, ReaderBuilder, RowsIter, Stats,
};
pub use crate::row::{Row, RowIter};
pub use crate::writer::{Writer, WriterBuilder};

mod config;
mod error;
mod reader;
mod row;
mod writer;
