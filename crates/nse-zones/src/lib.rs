//! `nse-zones`: the NSE zone registry and point classifier.
//!
//! # Modules
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`registry`] | `Zone`, `District`, `Registry`, `RegistryBuilder`, `classify` |
//! | [`loader`]   | CSV registry loading with a validation pass, bundled Lima table |
//! | [`lists`]    | Named-box and place-name lists for the registry tools      |
//! | [`error`]    | `ZoneError`, `ZoneResult`                                  |
//!
//! # Quick start
//!
//! ```
//! use nse_core::GeoPoint;
//! use nse_zones::Registry;
//!
//! let reg = Registry::lima().unwrap();
//! let hit = reg.classify(GeoPoint::new(-12.100, -77.040)).unwrap();
//! assert_eq!(hit.district, "San Isidro");
//! ```

pub mod error;
pub mod lists;
pub mod loader;
pub mod registry;

#[cfg(test)]
mod tests;

pub use error::{ZoneError, ZoneResult};
pub use lists::{NamedBox, PlaceEntry, load_named_boxes, load_named_boxes_reader, load_places, load_places_reader};
pub use loader::{
    LoadReport, RejectedZone, load_registry_csv, load_registry_reader, load_registry_strict,
    load_registry_strict_reader,
};
pub use registry::{Classification, District, Registry, RegistryBuilder, Zone};
