//! Drawing sample points for one zone.

use std::sync::Arc;

use nse_core::{BBox, GeoPoint, SampleRng};
use nse_spatial::StreetGraph;

/// Points drawn for one zone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZoneSample {
    pub points:        Vec<GeoPoint>,
    /// `true` when the points came from the walk graph because the drive
    /// graph had no nodes in the zone.
    pub used_fallback: bool,
}

impl ZoneSample {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Draw up to `quota` distinct street nodes inside `bbox`.
///
/// 1. Candidates are the `drive` nodes inside `bbox` (closed bounds).  If
///    there are any, `min(quota, candidates)` are drawn uniformly without
///    replacement.
/// 2. Otherwise `walk` is called to obtain the pedestrian graph, and the
///    same draw is made from its nodes inside `bbox`; `used_fallback` is set
///    when this yields points.
/// 3. If neither graph has nodes in the zone, the sample is empty.  This
///    is an expected outcome for zones with no mapped streets.
///
/// `walk` is only invoked on step 2, so callers can hand in a closure over
/// a lazily populated cache.
pub fn sample_zone<W>(
    bbox:  &BBox,
    quota: usize,
    drive: &StreetGraph,
    walk:  W,
    rng:   &mut SampleRng,
) -> ZoneSample
where
    W: FnOnce() -> Option<Arc<StreetGraph>>,
{
    let candidates = drive.positions_in_bbox(bbox);
    if !candidates.is_empty() {
        return ZoneSample {
            points:        rng.sample_without_replacement(&candidates, quota),
            used_fallback: false,
        };
    }

    let Some(walk) = walk() else {
        return ZoneSample::default();
    };
    let candidates = walk.positions_in_bbox(bbox);
    if candidates.is_empty() {
        return ZoneSample::default();
    }
    ZoneSample {
        points:        rng.sample_without_replacement(&candidates, quota),
        used_fallback: true,
    }
}
