//! Cost calculation over an immutable rate card.
//!
//! The calculator owns its [`RateCard`] from construction onward. It keeps no
//! other state, so a single instance can be shared across threads freely.

use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, EstimateResult};
use crate::models::{Amenity, CostBreakdown, FloorArea, MaterialGrade};

/// Per-square-foot, per-floor rates for each material grade.
pub const MATERIAL_RATES: [(MaterialGrade, u64); 3] = [
    (MaterialGrade::Standard, 1200),
    (MaterialGrade::Premium, 1800),
    (MaterialGrade::Luxury, 2500),
];

/// Flat one-time cost for each amenity.
pub const FEATURE_COSTS: [(Amenity, u64); 4] = [
    (Amenity::Parking, 150_000),
    (Amenity::Elevator, 800_000),
    (Amenity::Garden, 200_000),
    (Amenity::SolarPanels, 500_000),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRate {
    pub grade: MaterialGrade,
    pub rate_per_sq_ft: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCost {
    pub feature: Amenity,
    pub cost: u64,
}

/// The pair of lookup tables an estimate is priced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCard {
    material_rates: Vec<MaterialRate>,
    feature_costs: Vec<FeatureCost>,
}

impl RateCard {
    pub fn new(material_rates: Vec<MaterialRate>, feature_costs: Vec<FeatureCost>) -> Self {
        Self {
            material_rates,
            feature_costs,
        }
    }

    /// The rate card in effect for this build.
    pub fn standard() -> Self {
        Self::new(
            MATERIAL_RATES
                .iter()
                .map(|&(grade, rate_per_sq_ft)| MaterialRate {
                    grade,
                    rate_per_sq_ft,
                })
                .collect(),
            FEATURE_COSTS
                .iter()
                .map(|&(feature, cost)| FeatureCost { feature, cost })
                .collect(),
        )
    }

    pub fn material_rates(&self) -> &[MaterialRate] {
        &self.material_rates
    }

    pub fn feature_costs(&self) -> &[FeatureCost] {
        &self.feature_costs
    }

    /// Rate for a grade given by name. Names are matched exactly.
    pub fn material_rate(&self, grade: &str) -> Option<u64> {
        self.material_rates
            .iter()
            .find(|r| r.grade.as_str() == grade)
            .map(|r| r.rate_per_sq_ft)
    }

    /// Cost of a feature given by name, or `None` if it is not priced.
    pub fn feature_cost(&self, feature: &str) -> Option<u64> {
        self.feature_costs
            .iter()
            .find(|f| f.feature.as_str() == feature)
            .map(|f| f.cost)
    }
}

impl Default for RateCard {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CostCalculator {
    rates: RateCard,
}

impl CostCalculator {
    pub fn new(rates: RateCard) -> Self {
        Self { rates }
    }

    pub fn rate_card(&self) -> &RateCard {
        &self.rates
    }

    /// Price a building.
    ///
    /// `base = floor_area * number_of_floors * rate(material_type)`, plus the
    /// flat cost of every listed feature. Feature names missing from the rate
    /// card add nothing, and a feature listed twice is charged twice.
    ///
    /// The base is multiplied out exactly from hundredths of a square foot.
    /// With the standard rates it is always a whole number of rupees; a custom
    /// rate card that leaves paise over is rounded half up to the rupee.
    ///
    /// Any amount above [`CostBreakdown::MAX_AMOUNT`] is a
    /// [`EstimateError::CostOverflow`].
    ///
    /// Callers are expected to have rejected zero areas and floor counts.
    pub fn calculate<S: AsRef<str>>(
        &self,
        floor_area: FloorArea,
        number_of_floors: u32,
        material_type: &str,
        additional_features: &[S],
    ) -> EstimateResult<CostBreakdown> {
        let rate = self
            .rates
            .material_rate(material_type)
            .ok_or_else(|| EstimateError::UnknownMaterialGrade(material_type.to_string()))?;

        let base_paise = u128::from(floor_area.hundredths())
            .checked_mul(u128::from(number_of_floors))
            .and_then(|area| area.checked_mul(u128::from(rate)))
            .ok_or(EstimateError::CostOverflow)?;
        let base_rupees = base_paise / 100 + u128::from(base_paise % 100 >= 50);
        let base_cost = u64::try_from(base_rupees).map_err(|_| EstimateError::CostOverflow)?;

        let features_cost = additional_features
            .iter()
            .try_fold(0u64, |total, feature| {
                let cost = self.rates.feature_cost(feature.as_ref()).unwrap_or(0);
                total.checked_add(cost)
            })
            .ok_or(EstimateError::CostOverflow)?;

        CostBreakdown::new(base_cost, rate, features_cost).ok_or(EstimateError::CostOverflow)
    }
}
