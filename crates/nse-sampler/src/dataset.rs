//! The label-keyed dataset of sampled points.

use serde::ser::{Serialize, SerializeMap, Serializer};

use nse_core::{GeoPoint, NseLevel};

/// One sampled street location.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SampledPoint {
    pub lat:      f64,
    pub lon:      f64,
    pub district: String,
    /// Implied by the bucket a point is serialized under.
    #[serde(skip_serializing)]
    pub level:    NseLevel,
}

impl SampledPoint {
    pub fn new(pos: GeoPoint, district: &str, level: NseLevel) -> Self {
        Self { lat: pos.lat, lon: pos.lon, district: district.to_string(), level }
    }

    pub fn pos(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Sampled points bucketed by NSE level.
///
/// Serializes as a map from label to point list, in level order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    buckets: [Vec<SampledPoint>; NseLevel::COUNT],
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: SampledPoint) {
        self.buckets[point.level.index()].push(point);
    }

    pub fn extend<I: IntoIterator<Item = SampledPoint>>(&mut self, points: I) {
        for p in points {
            self.push(p);
        }
    }

    /// Append every bucket of `other`, keeping its order.
    pub fn merge(&mut self, other: Dataset) {
        for (mine, theirs) in self.buckets.iter_mut().zip(other.buckets) {
            mine.extend(theirs);
        }
    }

    pub fn points(&self, level: NseLevel) -> &[SampledPoint] {
        &self.buckets[level.index()]
    }

    pub fn count(&self, level: NseLevel) -> usize {
        self.buckets[level.index()].len()
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// `(level, points)` for every level, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (NseLevel, &[SampledPoint])> + '_ {
        NseLevel::ALL.into_iter().map(|l| (l, self.points(l)))
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NseLevel::COUNT))?;
        for (level, points) in self.iter() {
            map.serialize_entry(level.label(), points)?;
        }
        map.end()
    }
}
