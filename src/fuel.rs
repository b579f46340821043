//! Fuel types reported by the generation-mix feed and their clean/non-clean
//! classification.

use std::fmt;

use enumset::{EnumSet, EnumSetType, enum_set};
use serde::{Deserialize, Serialize};

use crate::model::GenerationInterval;

/// Generation source tag as reported by the upstream feed.
///
/// The set is closed; an unknown tag in an upstream payload is a decode error.
/// Declaration order doubles as the deterministic tie-break order when fuels
/// with equal shares are listed.
#[derive(EnumSetType, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Gas,
    Coal,
    Biomass,
    Nuclear,
    Hydro,
    Wind,
    Solar,
    Imports,
    Other,
}

/// Fuels counted towards the clean energy percentage.
pub const CLEAN_FUELS: EnumSet<FuelType> = enum_set!(
    FuelType::Biomass | FuelType::Nuclear | FuelType::Hydro | FuelType::Wind | FuelType::Solar
);

impl FuelType {
    /// Whether this fuel counts towards the clean energy percentage.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_charge::fuel::FuelType;
    ///
    /// assert!(FuelType::Wind.is_clean());
    /// assert!(!FuelType::Imports.is_clean());
    /// ```
    pub fn is_clean(self) -> bool {
        CLEAN_FUELS.contains(self)
    }

    /// Lowercase tag used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gas => "gas",
            Self::Coal => "coal",
            Self::Biomass => "biomass",
            Self::Nuclear => "nuclear",
            Self::Hydro => "hydro",
            Self::Wind => "wind",
            Self::Solar => "solar",
            Self::Imports => "imports",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sum of the clean-fuel percentages within one interval.
///
/// Fuels missing from the interval contribute nothing.
pub fn clean_share(interval: &GenerationInterval) -> f64 {
    interval
        .generation_mix
        .iter()
        .filter(|share| share.fuel.is_clean())
        .map(|share| share.percentage)
        .sum()
}
