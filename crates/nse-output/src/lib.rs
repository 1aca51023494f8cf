//! `nse-output`: files the pipeline leaves behind.
//!
//! | Module   | Contents                                                         |
//! |----------|------------------------------------------------------------------|
//! | [`row`]  | `ImageRecord`, `LabelRow`, `BoxReport` and friends               |
//! | [`json`] | `write_json`, `write_metadata` / `read_metadata` (`metadata.json`) |
//! | [`csv`]  | `LabelWriter`, `write_labels` / `read_labels` (`y_labels.csv`)   |
//! | [`npy`]  | `Matrix`, `write_npy` / `read_npy` (`X_features.npy`)            |
//! | [`error`]| `OutputError`, `OutputResult<T>`                                 |

pub mod csv;
pub mod error;
pub mod json;
pub mod npy;
pub mod row;


pub use crate::csv::{LabelWriter, read_labels, write_labels};
pub use error::{OutputError, OutputResult};
pub use json::{read_metadata, write_json, write_metadata};
pub use npy::{Matrix, read_npy, write_npy};
pub use row::{BoxRecord, BoxReport, ImageRecord, LabelRow, PlaceBoxRecord, SubBoxRecord};
