//! JSON output: `metadata.json` and other pretty-printed documents.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::{ImageRecord, OutputResult};

/// Write `value` as pretty-printed JSON, replacing any existing file.
/// Parent directories are created as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Write the image listing as a JSON array.
pub fn write_metadata(path: &Path, records: &[ImageRecord]) -> OutputResult<()> {
    write_json(path, records)
}

pub fn read_metadata(path: &Path) -> OutputResult<Vec<ImageRecord>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
