//! Index newtypes.
//!
//! Each id is the position of its item in the owning collection
//! (`StreetGraph` nodes, registry zones, registry districts).  `MAX` of the
//! inner integer is reserved as [`NodeId::INVALID`] and friends.

use std::fmt;

macro_rules! index_id {
    ($(#[$doc:meta])* $name:ident($repr:ty), $tag:literal) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub $repr);

        impl $name {
            pub const INVALID: Self = Self(<$repr>::MAX);

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;

            fn try_from(i: usize) -> Result<Self, Self::Error> {
                Ok(Self(<$repr>::try_from(i)?))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "{}"), self.0)
            }
        }
    };
}

index_id! {
    /// A node of a `StreetGraph`.
    NodeId(u32), "n"
}

index_id! {
    /// A zone, numbered across the whole registry in declaration order.
    /// Also the seed offset of the zone's sampling RNG.
    ZoneId(u32), "z"
}

index_id! {
    /// A district, in registry order.
    DistrictId(u16), "d"
}
