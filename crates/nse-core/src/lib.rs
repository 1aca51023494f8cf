//! `nse-core`: foundational types for the `rust_nse` dataset pipeline.
//!
//! This crate is a dependency of every other `nse-*` crate.  It has no
//! `nse-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `ZoneId`, `DistrictId`                        |
//! | [`geo`]    | `GeoPoint`, validated `BBox`, area approximation        |
//! | [`nse`]    | `NseLevel`, the five socioeconomic classes            |
//! | [`rng`]    | `SampleRng` (per-zone / per-target deterministic RNG)   |
//! | [`error`]  | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod nse;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{AreaClass, BBox, GeoPoint, approx_area_km2};
pub use ids::{DistrictId, NodeId, ZoneId};
pub use nse::NseLevel;
pub use rng::SampleRng;
