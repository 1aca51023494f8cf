//! The zone registry: an ordered list of districts, each an ordered list of
//! NSE-labelled bounding boxes.
//!
//! Districts and zones keep their declaration order.  Nothing here depends on
//! hash-map iteration order, so the first-match tie-break in
//! [`Registry::classify`] is deterministic.

use std::collections::{BTreeMap, HashMap};

use nse_core::{BBox, DistrictId, GeoPoint, NseLevel, ZoneId};

// ── Zone / District ───────────────────────────────────────────────────────────

/// One NSE-labelled rectangle.  Immutable after the registry is built.
#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
    /// Registry-wide, declaration-order index.
    pub id:    ZoneId,
    pub bbox:  BBox,
    pub level: NseLevel,
}

/// A named district and its zones.  Zones may overlap or leave gaps.
#[derive(Clone, Debug, PartialEq)]
pub struct District {
    pub id:    DistrictId,
    pub name:  String,
    pub zones: Vec<Zone>,
}

impl District {
    /// Bounding box covering every zone of the district.
    pub fn extent(&self) -> Option<BBox> {
        let mut it = self.zones.iter().map(|z| z.bbox);
        let first = it.next()?;
        Some(it.fold(first, |acc, b| acc.union(&b)))
    }
}

/// Result of a successful point lookup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Classification<'a> {
    pub district: &'a str,
    pub level:    NseLevel,
    pub zone:     ZoneId,
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Read-only district → zones table.  Build with [`RegistryBuilder`] or load
/// with [`crate::load_registry_csv`].
#[derive(Clone, Debug, Default)]
pub struct Registry {
    districts:  Vec<District>,
    zone_count: usize,
}

impl Registry {
    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    /// District names in registry order.
    pub fn list_districts(&self) -> Vec<&str> {
        self.districts.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn district(&self, name: &str) -> Option<&District> {
        self.districts.iter().find(|d| d.name == name)
    }

    /// Zones of `name` in declared order; empty when the district is unknown.
    pub fn zones_of(&self, name: &str) -> &[Zone] {
        self.district(name).map(|d| d.zones.as_slice()).unwrap_or(&[])
    }

    pub fn district_count(&self) -> usize {
        self.districts.len()
    }

    pub fn zone_count(&self) -> usize {
        self.zone_count
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    /// Iterate `(district, zone)` pairs in registry order.
    pub fn zones(&self) -> impl Iterator<Item = (&District, &Zone)> + '_ {
        self.districts
            .iter()
            .flat_map(|d| d.zones.iter().map(move |z| (d, z)))
    }

    /// Bounding box covering every zone in the registry.  This is the region the
    /// city-wide street graph is fetched for.
    pub fn extent(&self) -> Option<BBox> {
        let mut it = self.zones().map(|(_, z)| z.bbox);
        let first = it.next()?;
        Some(it.fold(first, |acc, b| acc.union(&b)))
    }

    /// Fraction of `name`'s zones carrying each label.
    ///
    /// This counts zones, not area: a tiny "Alto" block weighs the same as
    /// a large "Medio" one.  Use [`Registry::area_distribution`] for the
    /// area-weighted variant.  Empty for an unknown district.
    pub fn distribution(&self, name: &str) -> BTreeMap<NseLevel, f64> {
        self.weighted(name, |_| 1.0)
    }

    /// Fraction of `name`'s total zone area (km², equirectangular
    /// approximation) carrying each label.  Overlapping zones are counted
    /// once per zone.
    pub fn area_distribution(&self, name: &str) -> BTreeMap<NseLevel, f64> {
        self.weighted(name, |z| z.bbox.area_km2())
    }

    fn weighted<F: Fn(&Zone) -> f64>(&self, name: &str, weight: F) -> BTreeMap<NseLevel, f64> {
        let mut out = BTreeMap::new();
        let zones = self.zones_of(name);
        for z in zones {
            *out.entry(z.level).or_insert(0.0) += weight(z);
        }
        let total: f64 = out.values().sum();
        if total > 0.0 {
            for v in out.values_mut() {
                *v /= total;
            }
        }
        out
    }

    /// Return the district/label of the first zone containing `p`.
    ///
    /// Districts are scanned in registry order and zones in declared order;
    /// bounds are inclusive.  When zones overlap, the earliest one wins;
    /// the smaller box is not preferred.
    /// `None` means the point is outside every modelled zone, which is an
    /// ordinary outcome rather than an error.
    pub fn classify(&self, p: GeoPoint) -> Option<Classification<'_>> {
        self.zones()
            .find(|(_, z)| z.bbox.contains(p))
            .map(|(d, z)| Classification {
                district: d.name.as_str(),
                level:    z.level,
                zone:     z.id,
            })
    }
}

// ── RegistryBuilder ───────────────────────────────────────────────────────────

/// Build a [`Registry`] zone by zone.
///
/// A district is created the first time its name is seen; later zones for
/// the same name are appended to it even when other districts were added in
/// between, so the CSV does not need to be grouped.
///
/// Ids are capped by their integer width: at most `u16::MAX` districts and
/// `u32::MAX` zones.  A zone past either cap is not added and
/// [`add_zone`](Self::add_zone) returns [`ZoneId::INVALID`].
///
/// ```
/// use nse_core::{BBox, NseLevel};
/// use nse_zones::RegistryBuilder;
///
/// let mut b = RegistryBuilder::new();
/// b.add_zone("X", BBox::new(0.0, 1.0, 0.0, 1.0).unwrap(), NseLevel::Alto);
/// b.add_zone("X", BBox::new(1.0, 2.0, 1.0, 2.0).unwrap(), NseLevel::Bajo);
/// let reg = b.build();
/// assert_eq!(reg.zones_of("X").len(), 2);
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    districts: Vec<District>,
    by_name:   HashMap<String, usize>,
    next_zone: usize,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_zone(&mut self, district: &str, bbox: BBox, level: NseLevel) -> ZoneId {
        let Some(id) = ZoneId::try_from(self.next_zone).ok().filter(|id| id.is_valid()) else {
            return ZoneId::INVALID;
        };

        let idx = match self.by_name.get(district) {
            Some(&i) => i,
            None => {
                let Some(did) = DistrictId::try_from(self.districts.len()).ok().filter(|d| d.is_valid())
                else {
                    return ZoneId::INVALID;
                };
                self.districts.push(District { id: did, name: district.to_string(), zones: Vec::new() });
                self.by_name.insert(district.to_string(), self.districts.len() - 1);
                self.districts.len() - 1
            }
        };
        self.next_zone += 1;
        self.districts[idx].zones.push(Zone { id, bbox, level });
        id
    }

    pub fn build(self) -> Registry {
        Registry {
            zone_count: self.next_zone,
            districts:  self.districts,
        }
    }
}
