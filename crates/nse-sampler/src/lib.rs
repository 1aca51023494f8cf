//! `nse-sampler`: turning zones and street graphs into labelled sample
//! points.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`allocation`] | `allocate_quota`: per-zone sub-quotas                     |
//! | [`sampler`]    | `sample_zone`, `ZoneSample` (drive graph, walk fallback)  |
//! | [`dataset`]    | `Dataset` (points bucketed by NSE level), `SampledPoint`  |
//! | [`driver`]     | `build_dataset`, `SamplerConfig`, reports, `SamplingObserver` |
//! | [`targets`]    | Province `Target` lists, grouping, `sample_target`        |
//! | [`error`]      | `SampleError`, `SampleResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Samples districts on Rayon's thread pool.               |

pub mod allocation;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod sampler;
pub mod targets;

#[cfg(test)]
mod tests;

pub use allocation::allocate_quota;
pub use dataset::{Dataset, SampledPoint};
pub use driver::{
    BuildOutput, DistrictReport, LogObserver, NoopObserver, SamplerConfig, SamplingObserver,
    ZoneReport, build_dataset, sample_district,
};
pub use error::{SampleError, SampleResult};
pub use sampler::{ZoneSample, sample_zone};
pub use targets::{
    DEFAULT_POINTS_PER_TARGET, Target, group_targets, load_targets_csv, load_targets_reader,
    sample_target,
};
