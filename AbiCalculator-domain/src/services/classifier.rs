use std::ops::{Bound, RangeBounds};

use serde::Serialize;
use thiserror::Error;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::abi::{AbiCategory, RiskInterpretation};

/// Classification failure for a value outside every band
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ClassificationError {
    #[error("ABI value {0} does not fall into any risk band")]
    Unclassified(f64),
}

/// One row of the classification table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBand {
    pub category: AbiCategory,
    pub lower: Bound<f64>,
    pub upper: Bound<f64>,
}

impl RiskBand {
    pub fn contains(&self, value: f64) -> bool {
        (self.lower, self.upper).contains(&value)
    }
}

/// Bands in precedence order; the first band containing a value wins
pub const RISK_BANDS: [RiskBand; 5] = [
    RiskBand {
        category: AbiCategory::CalcifiedVessels,
        lower: Bound::Excluded(1.4),
        upper: Bound::Unbounded,
    },
    RiskBand {
        category: AbiCategory::NormalCirculation,
        lower: Bound::Included(1.0),
        upper: Bound::Included(1.4),
    },
    RiskBand {
        category: AbiCategory::Borderline,
        lower: Bound::Included(0.91),
        upper: Bound::Excluded(1.0),
    },
    RiskBand {
        category: AbiCategory::MildPad,
        lower: Bound::Included(0.61),
        upper: Bound::Included(0.90),
    },
    RiskBand {
        category: AbiCategory::SeverePad,
        lower: Bound::Unbounded,
        upper: Bound::Included(0.60),
    },
];

/// Find the band for an unrounded ABI value
pub fn find_band(value: f64) -> Result<&'static RiskBand, ClassificationError> {
    RISK_BANDS
        .iter()
        .find(|band| band.contains(value))
        .ok_or(ClassificationError::Unclassified(value))
}

/// Classify an unrounded ABI value
///
/// Values in the gaps between 0.60 and 0.61 or between 0.90 and 0.91, and
/// NaN, match no band and are reported as `Unclassified`.
pub fn classify_abi(value: f64) -> Result<RiskInterpretation, ClassificationError> {
    find_band(value).map(|band| RiskInterpretation::from(band.category))
}

/// Serializable description of a band, for legends and documentation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RiskBandSummary {
    /// Lower edge, absent when unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    pub min_inclusive: bool,

    /// Upper edge, absent when unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub max_inclusive: bool,

    pub interpretation: RiskInterpretation,
}

impl From<&RiskBand> for RiskBandSummary {
    fn from(band: &RiskBand) -> Self {
        let (min, min_inclusive) = split_bound(band.lower);
        let (max, max_inclusive) = split_bound(band.upper);
        Self {
            min,
            min_inclusive,
            max,
            max_inclusive,
            interpretation: RiskInterpretation::from(band.category),
        }
    }
}

fn split_bound(bound: Bound<f64>) -> (Option<f64>, bool) {
    match bound {
        Bound::Included(edge) => (Some(edge), true),
        Bound::Excluded(edge) => (Some(edge), false),
        Bound::Unbounded => (None, false),
    }
}

/// The classification table in precedence order
pub fn risk_bands() -> Vec<RiskBandSummary> {
    RISK_BANDS.iter().map(RiskBandSummary::from).collect()
}
