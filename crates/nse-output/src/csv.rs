//! CSV output backend for `y_labels.csv`.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{LabelRow, OutputResult};

/// Streams [`LabelRow`]s to a CSV file with an
/// `image_path,label,category` header.
pub struct LabelWriter {
    inner:    Writer<File>,
    rows:     usize,
    finished: bool,
}

impl LabelWriter {
    pub fn new(path: &Path) -> OutputResult<Self> {
        let mut inner = Writer::from_path(path)?;
        inner.write_record(["image_path", "label", "category"])?;
        Ok(Self { inner, rows: 0, finished: false })
    }

    pub fn write(&mut self, row: &LabelRow) -> OutputResult<()> {
        let label = row.label.to_string();
        self.inner
            .write_record([row.image_path.as_str(), label.as_str(), row.category.as_str()])?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.inner.flush()?;
        Ok(())
    }
}

/// Write all `rows` to `path` in one go.
pub fn write_labels(path: &Path, rows: &[LabelRow]) -> OutputResult<()> {
    let mut w = LabelWriter::new(path)?;
    for row in rows {
        w.write(row)?;
    }
    w.finish()
}

pub fn read_labels(path: &Path) -> OutputResult<Vec<LabelRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    Ok(reader.deserialize().collect::<Result<_, _>>()?)
}
