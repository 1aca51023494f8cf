//! Splitting a district's quota across its zones.

/// Per-zone sub-quotas for `zones` zones sharing a total of `quota`.
///
/// Every zone gets `max(1, quota / zones)`; the first `quota % zones` zones
/// (declaration order) get one more.  For `quota >= zones` the sub-quotas
/// sum to exactly `quota`.  For `quota < zones` the floor of one per zone
/// applies on top of the remainder, so the total is `zones + quota`: every
/// zone still contributes, at the cost of overshooting the quota.
///
/// ```
/// use nse_sampler::allocate_quota;
///
/// assert_eq!(allocate_quota(10, 3), vec![4, 3, 3]);
/// assert_eq!(allocate_quota(2, 4), vec![2, 2, 1, 1]);
/// ```
pub fn allocate_quota(quota: usize, zones: usize) -> Vec<usize> {
    if zones == 0 {
        return Vec::new();
    }
    let base = (quota / zones).max(1);
    let extra = quota % zones;
    (0..zones).map(|i| base + usize::from(i < extra)).collect()
}
