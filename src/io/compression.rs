use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
};
use std::path::Path;

use anyhow::Context;
use flate2::read::MultiGzDecoder;
use log::*;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression of an input file, detected from its leading bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    None,
    Gz,
}

impl Compression {
    pub fn name(&self) -> &str {
        match self {
            Compression::None => "none",
            Compression::Gz => "gzip",
        }
    }

    /// Peeks at the buffered input without consuming it.
    pub fn detect<R: BufRead>(reader: &mut R) -> std::io::Result<Self> {
        let head = reader.fill_buf()?;
        if head.len() >= GZIP_MAGIC.len() && head[..GZIP_MAGIC.len()] == GZIP_MAGIC {
            Ok(Compression::Gz)
        }
        else {
            Ok(Compression::None)
        }
    }

    /// Wraps the handle in a decoder. Multi-member gzip (bgzip) streams are
    /// read to the end.
    pub fn get_decoder<R: BufRead + 'static>(
        &self,
        handle: R,
    ) -> Box<dyn BufRead> {
        match self {
            Compression::Gz => Box::new(BufReader::new(MultiGzDecoder::new(handle))),
            Compression::None => Box::new(handle),
        }
    }
}

/// Opens a file for buffered reading, transparently decompressing gzip.
pub fn open_maybe_gz<P: AsRef<Path>>(path: P) -> anyhow::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let compression = Compression::detect(&mut reader)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    debug!(
        "Opened {} (compression: {})",
        path.display(),
        compression.name()
    );
    Ok(compression.get_decoder(reader))
}
