//! Single-stream decompression (`.gz`, `.bz2`, `.xz`, `.zst`).

use super::Format;
use crate::error::{Error, IoContext, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Decompress `archive_path` into the file `output`.
pub(super) fn decompress(archive_path: &Path, output: &Path, format: Format) -> Result<()> {
    let file = File::open(archive_path)
        .io_context(|| format!("cannot open {}", archive_path.display()))?;
    let reader = BufReader::new(file);

    let mut decoder: Box<dyn Read> = match format {
        Format::Gz => Box::new(flate2::read::MultiGzDecoder::new(reader)),
        Format::Bz2 => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
        Format::Xz => Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)),
        Format::Zst => Box::new(
            zstd::stream::read::Decoder::new(reader)
                .map_err(|e| Error::Archive(format!("zstd init error: {}", e)))?,
        ),
        other => {
            return Err(Error::UnsupportedFormat(format!(
                "{} is not a single-stream format",
                other
            )));
        }
    };

    let mut out = File::create(output).io_context(|| format!("cannot create {}", output.display()))?;
    std::io::copy(&mut decoder, &mut out).map_err(|e| {
        Error::Archive(format!(
            "{} decompression failed for {}: {}",
            format,
            archive_path.display(),
            e
        ))
    })?;

    Ok(())
}
