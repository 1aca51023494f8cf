//! Street-network types and the OSM tag filters that define them.
//!
//! The filters follow the conventional "drive" and "walk" networks: a way
//! is included when it carries a `highway` tag whose value is not in the
//! exclusion list and its access tags do not forbid the mode.

use std::fmt;
use std::str::FromStr;

/// Which street network a graph was built from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NetworkType {
    /// Public drivable streets (primary source of sample points).
    Drive,
    /// Everything a pedestrian can use (fallback when a zone has no drivable
    /// streets, e.g. hillside settlements reached by stairways).
    Walk,
}

const DRIVE_EXCLUDED: &[&str] = &[
    "abandoned", "bridleway", "bus_guideway", "construction", "corridor", "cycleway",
    "elevator", "escalator", "footway", "no", "path", "pedestrian", "planned",
    "platform", "proposed", "raceway", "razed", "service", "steps", "track",
];

const WALK_EXCLUDED: &[&str] = &[
    "abandoned", "bus_guideway", "construction", "cycleway", "motor", "no", "planned",
    "platform", "proposed", "raceway", "razed",
];

const DRIVE_SERVICE_EXCLUDED: &[&str] =
    &["alley", "driveway", "emergency_access", "parking", "parking_aisle", "private"];

impl NetworkType {
    pub fn label(self) -> &'static str {
        match self {
            NetworkType::Drive => "drive",
            NetworkType::Walk  => "walk",
        }
    }

    fn excluded_highways(self) -> &'static [&'static str] {
        match self {
            NetworkType::Drive => DRIVE_EXCLUDED,
            NetworkType::Walk  => WALK_EXCLUDED,
        }
    }

    /// Whether a way with these tags belongs to this network.
    pub fn accepts(self, tags: &[(&str, &str)]) -> bool {
        let tag = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

        let Some(highway) = tag("highway") else {
            return false;
        };
        if tag("area") == Some("yes") || self.excluded_highways().contains(&highway) {
            return false;
        }
        if tag("access") == Some("private") {
            return false;
        }
        match self {
            NetworkType::Drive => {
                tag("motor_vehicle") != Some("no")
                    && tag("motorcar") != Some("no")
                    && !tag("service").is_some_and(|s| DRIVE_SERVICE_EXCLUDED.contains(&s))
            }
            NetworkType::Walk => {
                tag("foot") != Some("no") && tag("service") != Some("private")
            }
        }
    }

    /// Overpass QL tag filter selecting this network's ways.
    pub fn overpass_filter(self) -> String {
        let excluded = self.excluded_highways().join("|");
        let mut f = format!(
            r#"["highway"]["area"!~"yes"]["access"!~"private"]["highway"!~"{excluded}"]"#
        );
        match self {
            NetworkType::Drive => {
                f.push_str(r#"["motor_vehicle"!~"no"]["motorcar"!~"no"]"#);
                f.push_str(&format!(r#"["service"!~"{}"]"#, DRIVE_SERVICE_EXCLUDED.join("|")));
            }
            NetworkType::Walk => {
                f.push_str(r#"["foot"!~"no"]["service"!~"private"]"#);
            }
        }
        f
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NetworkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drive" => Ok(NetworkType::Drive),
            "walk"  => Ok(NetworkType::Walk),
            other   => Err(format!("unknown network type {other:?} (expected drive or walk)")),
        }
    }
}
