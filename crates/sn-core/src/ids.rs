//! Strongly typed, zero-cost identifier wrappers.
//!
//! `NodeId` and `EdgeId` are dense indices allocated by the network builder
//! and index straight into its `Vec`s via `.index()`.  `StreetId` and
//! `AddressId` carry identifiers from the source data (e.g. `OBJECTID`) and
//! are never used as indices.

use std::fmt;

/// Generate a dense index wrapper around `u32`.
macro_rules! index_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(u32::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

/// Generate an external-identifier wrapper around `i64`.
macro_rules! external_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<i64> for $name {
            #[inline]
            fn from(v: i64) -> Self {
                $name(v)
            }
        }
    };
}

index_id! {
    /// Index of a snapped network node (intersection or line endpoint).
    pub struct NodeId;
}

index_id! {
    /// Index of an edge record.  One record per street part; both travel
    /// directions share it.
    pub struct EdgeId;
}

external_id! {
    /// Source identifier of a street geometry (`OBJECTID` in the municipal data).
    pub struct StreetId;
}

external_id! {
    /// Source identifier of a geocoded address record.
    pub struct AddressId;
}
