//! Socioeconomic level (NSE) classes.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// One of the five NSE classes, ordered from highest to lowest.
///
/// The derived `Ord` follows declaration order, so `BTreeMap<NseLevel, _>`
/// iterates Alto → Bajo.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NseLevel {
    #[cfg_attr(feature = "serde", serde(rename = "Alto"))]
    Alto,
    #[cfg_attr(feature = "serde", serde(rename = "Medio alto"))]
    MedioAlto,
    #[cfg_attr(feature = "serde", serde(rename = "Medio"))]
    Medio,
    #[cfg_attr(feature = "serde", serde(rename = "Medio bajo"))]
    MedioBajo,
    #[cfg_attr(feature = "serde", serde(rename = "Bajo"))]
    Bajo,
}

impl NseLevel {
    pub const COUNT: usize = 5;

    pub const ALL: [NseLevel; NseLevel::COUNT] = [
        NseLevel::Alto,
        NseLevel::MedioAlto,
        NseLevel::Medio,
        NseLevel::MedioBajo,
        NseLevel::Bajo,
    ];

    /// Human-readable label; also the on-disk folder name.
    pub fn label(self) -> &'static str {
        match self {
            NseLevel::Alto      => "Alto",
            NseLevel::MedioAlto => "Medio alto",
            NseLevel::Medio     => "Medio",
            NseLevel::MedioBajo => "Medio bajo",
            NseLevel::Bajo      => "Bajo",
        }
    }

    /// Position in [`NseLevel::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for NseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NseLevel {
    type Err = CoreError;

    /// Case-insensitive; `_` and `-` are accepted in place of the space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c.to_ascii_lowercase() })
            .collect();
        NseLevel::ALL
            .into_iter()
            .find(|l| l.label().to_ascii_lowercase() == norm)
            .ok_or_else(|| CoreError::UnknownLevel(s.to_string()))
    }
}
