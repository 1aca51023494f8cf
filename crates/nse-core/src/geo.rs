//! Geographic coordinate types and the bounding-box area approximation.
//!
//! Coordinates are `f64`: zone boundaries are authored to 3–6 decimal places
//! and compared with closed-interval semantics, so single precision would
//! move points across edges.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Kilometres per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEGREE: f64 = 111.0;

/// Areas above this are "too large" to query efficiently.
pub const TOO_LARGE_KM2: f64 = 200.0;

/// Areas above this (and up to [`TOO_LARGE_KM2`]) are "large".
pub const LARGE_KM2: f64 = 50.0;

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── BBox ──────────────────────────────────────────────────────────────────────

/// An axis-aligned latitude/longitude rectangle.
///
/// Construction through [`BBox::new`] guarantees finite coordinates inside
/// the WGS-84 ranges and `lat_min < lat_max`, `lon_min < lon_max`.  The
/// fields are private so the invariant cannot be broken afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BBox {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

impl BBox {
    /// Validate and build a box from `(lat_min, lat_max, lon_min, lon_max)`,
    /// the column order used by every data file in this repository.
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> CoreResult<Self> {
        if ![lat_min, lat_max, lon_min, lon_max].iter().all(|v| v.is_finite()) {
            return Err(CoreError::NonFinite);
        }
        for (axis, v, lo, hi) in [
            ("latitude", lat_min, -90.0, 90.0),
            ("latitude", lat_max, -90.0, 90.0),
            ("longitude", lon_min, -180.0, 180.0),
            ("longitude", lon_max, -180.0, 180.0),
        ] {
            if !(lo..=hi).contains(&v) {
                return Err(CoreError::OutOfRange { axis, value: v, lo, hi });
            }
        }
        if lat_min >= lat_max {
            return Err(CoreError::Inverted { axis: "latitude", min: lat_min, max: lat_max });
        }
        if lon_min >= lon_max {
            return Err(CoreError::Inverted { axis: "longitude", min: lon_min, max: lon_max });
        }
        Ok(Self { lat_min, lat_max, lon_min, lon_max })
    }

    #[inline] pub fn lat_min(&self) -> f64 { self.lat_min }
    #[inline] pub fn lat_max(&self) -> f64 { self.lat_max }
    #[inline] pub fn lon_min(&self) -> f64 { self.lon_min }
    #[inline] pub fn lon_max(&self) -> f64 { self.lon_max }

    /// Closed-interval containment: points on any edge are inside.
    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        self.lat_min <= p.lat
            && p.lat <= self.lat_max
            && self.lon_min <= p.lon
            && p.lon <= self.lon_max
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.lat_min + self.lat_max) * 0.5,
            (self.lon_min + self.lon_max) * 0.5,
        )
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            lat_min: self.lat_min.min(other.lat_min),
            lat_max: self.lat_max.max(other.lat_max),
            lon_min: self.lon_min.min(other.lon_min),
            lon_max: self.lon_max.max(other.lon_max),
        }
    }

    /// Split into an `n × n` grid, row-major from the south-west corner.
    ///
    /// Returns an empty `Vec` when `n == 0`.
    pub fn subdivide(&self, n: usize) -> Vec<BBox> {
        if n == 0 {
            return Vec::new();
        }
        let lat_step = (self.lat_max - self.lat_min) / n as f64;
        let lon_step = (self.lon_max - self.lon_min) / n as f64;
        let mut out = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                // Snap the last row/column to the parent edge so rounding
                // never leaves a sliver uncovered.
                let lat_hi = if i + 1 == n { self.lat_max } else { self.lat_min + (i + 1) as f64 * lat_step };
                let lon_hi = if j + 1 == n { self.lon_max } else { self.lon_min + (j + 1) as f64 * lon_step };
                out.push(BBox {
                    lat_min: self.lat_min + i as f64 * lat_step,
                    lat_max: lat_hi,
                    lon_min: self.lon_min + j as f64 * lon_step,
                    lon_max: lon_hi,
                });
            }
        }
        out
    }

    /// See [`approx_area_km2`].
    #[inline]
    pub fn area_km2(&self) -> f64 {
        approx_area_km2(self)
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}] x [{:.6}, {:.6}]",
            self.lat_min, self.lat_max, self.lon_min, self.lon_max
        )
    }
}

// ── Area approximation ────────────────────────────────────────────────────────

/// Equirectangular surface-area estimate in km².
///
/// `height = Δlat · 111`, `width = Δlon · 111 · cos(mean latitude)`.
/// Only meaningful for small boxes; used to flag boxes that will be slow
/// to query, never for geodesy.
pub fn approx_area_km2(bbox: &BBox) -> f64 {
    let lat_center = (bbox.lat_min + bbox.lat_max) * 0.5;
    let height_km = (bbox.lat_max - bbox.lat_min).abs() * KM_PER_DEGREE;
    let width_km =
        (bbox.lon_max - bbox.lon_min).abs() * KM_PER_DEGREE * lat_center.to_radians().cos();
    height_km * width_km
}

/// Advisory size class for a bounding box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaClass {
    /// `area ≤ 50 km²`
    Ok,
    /// `50 < area ≤ 200 km²`
    Large,
    /// `area > 200 km²`
    TooLarge,
}

impl AreaClass {
    pub fn from_area(km2: f64) -> AreaClass {
        if km2 > TOO_LARGE_KM2 {
            AreaClass::TooLarge
        } else if km2 > LARGE_KM2 {
            AreaClass::Large
        } else {
            AreaClass::Ok
        }
    }

    pub fn of(bbox: &BBox) -> AreaClass {
        AreaClass::from_area(approx_area_km2(bbox))
    }
}

impl fmt::Display for AreaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AreaClass::Ok       => "ok",
            AreaClass::Large    => "large",
            AreaClass::TooLarge => "too large",
        })
    }
}
