//! `nse-imagery`: street-level photographs for sampled points.
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`client`]   | `ImageryProvider` trait, `StreetViewClient`, `StreetViewConfig`   |
//! | [`download`] | `download_dataset` (Lima), `download_targets` (provinces), stats  |
//! | [`error`]    | `ImageryError`, `ImageryResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                       |
//! |------------|--------------------------------------------------------------|
//! | `parallel` | One Rayon task per NSE level / per `(city, level)` group.    |

pub mod client;
pub mod download;
pub mod error;


pub use client::{ImageryProvider, StreetViewClient, StreetViewConfig, metadata_available};
pub use download::{
    DownloadConfig, DownloadObserver, DownloadOutcome, DownloadStats, LevelStats, METADATA_FILE,
    NoopDownloadObserver, create_label_dirs, download_dataset, download_targets, timestamp,
};
pub use error::{ImageryError, ImageryResult};
