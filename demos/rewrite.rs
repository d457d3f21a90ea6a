// Read CSV on stdin and write it back out on stdout, possibly in another
// dialect. Statistics about the input go to stderr.
//
// Options are given as `key=value`. Plain keys configure the reader, keys
// prefixed with `out.` configure the writer:
//
//   $ cargo run --example rewrite -- sep=';' relax=yes out.excel=yes < in.csv
//
// Set RUST_LOG=censive=debug to see what the reader is doing.
use std::env;
use std::error::Error;
use std::io;
use std::process;

use censive::{Config, ReaderBuilder, WriterBuilder};
use tracing_subscriber::EnvFilter;

fn example() -> Result<(), Box<dyn Error>> {
    let (rconfig, wconfig) = get_configs()?;
    let mut rdr =
        ReaderBuilder::from_config(rconfig).from_reader(io::stdin())?;
    let stdout = io::stdout();
    let mut wtr = WriterBuilder::from_config(wconfig)
        .from_writer(io::BufWriter::new(stdout.lock()))?;
    rdr.export(&mut wtr)?;
    eprint!("{}", rdr.parse_all()?.stats());
    Ok(())
}

fn get_configs() -> Result<(Config, Config), Box<dyn Error>> {
    let mut rconfig = Config::new();
    let mut wconfig = Config::new();
    for arg in env::args().skip(1) {
        let (key, value) = match arg.find('=') {
            Some(i) => (&arg[..i], &arg[i + 1..]),
            None => {
                let msg = format!("expected key=value, got {:?}", arg);
                return Err(From::from(msg));
            }
        };
        if key.starts_with("out.") {
            wconfig.set(&key[4..], value)?;
        } else {
            rconfig.set(key, value)?;
        }
    }
    Ok((rconfig, wconfig))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    if let Err(err) = example() {
        println!("error running example: {}", err);
        process::exit(1);
    }
}
