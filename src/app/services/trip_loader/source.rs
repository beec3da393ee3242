//! Input opening, gzip sniffing and lossy line reading

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::constants::GZIP_MAGIC;
use crate::models::InputSource;
use crate::{Error, Result};

/// Open an input source as a buffered reader
pub fn open_source(input: &InputSource) -> Result<Box<dyn BufRead + Send>> {
    match input {
        InputSource::Stdin => wrap_reader(BufReader::new(io::stdin())),
        InputSource::File(path) => {
            let file = File::open(path).map_err(|e| {
                Error::io(format!("Failed to open input file {}", path.display()), e)
            })?;
            wrap_reader(BufReader::new(file))
        }
    }
}

/// Decompress transparently when the content starts with the gzip magic
pub fn wrap_reader<R>(mut reader: R) -> Result<Box<dyn BufRead + Send>>
where
    R: BufRead + Send + 'static,
{
    let head = reader
        .fill_buf()
        .map_err(|e| Error::io("Failed to read input", e))?;

    if head.starts_with(&GZIP_MAGIC) {
        debug!("Input is gzip compressed");
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Split on `\n`, replacing invalid UTF-8 instead of failing
pub fn lossy_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<String>> {
    reader
        .split(b'\n')
        .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
}
