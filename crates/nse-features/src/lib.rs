//! `nse-features`: fixed-length embeddings for the labelled image tree.
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`scan`]       | `scan_categories`: category folders → labelled image list    |
//! | [`preprocess`] | resize, center-crop, normalize → CHW `f32` tensor            |
//! | [`model`]      | `EmbeddingModel` trait, `Batch`, `RemoteModel` HTTP adapter  |
//! | [`extract`]    | `extract_features`, `run_extraction`, `ExtractConfig`        |
//! | [`error`]      | `FeatureError`, `FeatureResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                          |
//! |------------|-------------------------------------------------|
//! | `parallel` | Decodes each batch's images on Rayon's pool.    |

pub mod error;
pub mod extract;
pub mod model;
pub mod preprocess;
pub mod scan;


pub use error::{FeatureError, FeatureResult};
pub use extract::{
    ExtractConfig, ExtractObserver, ExtractStats, FEATURES_FILE, LABELS_FILE, NoopExtractObserver,
    extract_features, run_extraction,
};
pub use model::{Batch, EmbeddingModel, RemoteModel, parse_embeddings};
pub use preprocess::{crop_offset, load_tensor, preprocess, resized_dims};
pub use scan::{CategoryCount, LabelledImage, scan_categories};
