use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Construction quality tier, each with its own per-square-foot rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MaterialGrade {
    Standard,
    Premium,
    Luxury,
}

impl MaterialGrade {
    pub const ALL: [MaterialGrade; 3] = [Self::Standard, Self::Premium, Self::Luxury];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Premium => "Premium",
            Self::Luxury => "Luxury",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Standard" => Some(Self::Standard),
            "Premium" => Some(Self::Premium),
            "Luxury" => Some(Self::Luxury),
            _ => None,
        }
    }
}

/// Optional building amenity with a flat, one-time cost.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Amenity {
    Parking,
    Elevator,
    Garden,
    #[serde(rename = "Solar Panels")]
    SolarPanels,
}

impl Amenity {
    pub const ALL: [Amenity; 4] = [
        Self::Parking,
        Self::Elevator,
        Self::Garden,
        Self::SolarPanels,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parking => "Parking",
            Self::Elevator => "Elevator",
            Self::Garden => "Garden",
            Self::SolarPanels => "Solar Panels",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Parking" => Some(Self::Parking),
            "Elevator" => Some(Self::Elevator),
            "Garden" => Some(Self::Garden),
            "Solar Panels" => Some(Self::SolarPanels),
            _ => None,
        }
    }
}

/// Built-up area per floor, held exactly in hundredths of a square foot.
///
/// Serializes as a plain JSON number (`2000`, `1500.5`). Areas with more than
/// two decimal places are not representable and fail to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FloorArea(u64);

impl FloorArea {
    /// Above this the square-foot value no longer survives an f64 exactly.
    pub const MAX_HUNDREDTHS: u64 = (1 << 53) - 1;

    pub fn from_hundredths(hundredths: u64) -> Option<Self> {
        (hundredths <= Self::MAX_HUNDREDTHS).then_some(Self(hundredths))
    }

    pub fn from_sq_ft(sq_ft: u64) -> Option<Self> {
        sq_ft.checked_mul(100).and_then(Self::from_hundredths)
    }

    /// Exact conversion from a JSON number.
    ///
    /// Returns `None` for negative or non-finite values, values with more than
    /// two decimal places and values above [`Self::MAX_HUNDREDTHS`].
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let scaled = (value * 100.0).round();
        if scaled > Self::MAX_HUNDREDTHS as f64 {
            return None;
        }
        let hundredths = scaled as u64;
        (hundredths as f64 / 100.0 == value).then_some(Self(hundredths))
    }

    pub fn hundredths(self) -> u64 {
        self.0
    }

    pub fn is_whole(self) -> bool {
        self.0 % 100 == 0
    }

    pub fn whole_sq_ft(self) -> u64 {
        self.0 / 100
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for FloorArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fraction = self.0 % 100;
        if fraction == 0 {
            write!(f, "{}", self.whole_sq_ft())
        } else if fraction % 10 == 0 {
            write!(f, "{}.{}", self.whole_sq_ft(), fraction / 10)
        } else {
            write!(f, "{}.{:02}", self.whole_sq_ft(), fraction)
        }
    }
}

impl Serialize for FloorArea {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() {
            serializer.serialize_u64(self.whole_sq_ft())
        } else {
            serializer.serialize_f64(self.as_f64())
        }
    }
}

impl<'de> Deserialize<'de> for FloorArea {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        FloorArea::from_f64(value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "floor area {} is not a non-negative number with at most two decimal places",
                value
            ))
        })
    }
}

/// Decomposition of an estimate into structural and amenity cost.
///
/// `total_cost` is derived from the other parts and cannot be set on its own.
/// Every amount stays within [`CostBreakdown::MAX_AMOUNT`], so a breakdown
/// always fits a signed 64-bit column.
/// Deserializing a breakdown whose total disagrees with its parts fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "BreakdownFields")]
pub struct CostBreakdown {
    base_cost: u64,
    material_multiplier: u64,
    additional_features_cost: u64,
    total_cost: u64,
}

impl CostBreakdown {
    /// Largest amount, in rupees, any part of a breakdown may hold.
    pub const MAX_AMOUNT: u64 = i64::MAX as u64;

    /// Builds a breakdown, returning `None` if any amount exceeds
    /// [`Self::MAX_AMOUNT`].
    pub fn new(
        base_cost: u64,
        material_multiplier: u64,
        additional_features_cost: u64,
    ) -> Option<Self> {
        let total_cost = base_cost
            .checked_add(additional_features_cost)
            .filter(|total| *total <= Self::MAX_AMOUNT)?;
        if material_multiplier > Self::MAX_AMOUNT {
            return None;
        }
        Some(Self {
            base_cost,
            material_multiplier,
            additional_features_cost,
            total_cost,
        })
    }

    pub fn base_cost(&self) -> u64 {
        self.base_cost
    }

    pub fn material_multiplier(&self) -> u64 {
        self.material_multiplier
    }

    pub fn additional_features_cost(&self) -> u64 {
        self.additional_features_cost
    }

    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BreakdownFields {
    base_cost: u64,
    material_multiplier: u64,
    additional_features_cost: u64,
    total_cost: Option<u64>,
}

impl TryFrom<BreakdownFields> for CostBreakdown {
    type Error = String;

    fn try_from(fields: BreakdownFields) -> Result<Self, Self::Error> {
        let breakdown = CostBreakdown::new(
            fields.base_cost,
            fields.material_multiplier,
            fields.additional_features_cost,
        )
        .ok_or_else(|| "cost breakdown exceeds the supported cost range".to_string())?;

        match fields.total_cost {
            Some(total) if total != breakdown.total_cost => Err(format!(
                "totalCost {} does not equal baseCost + additionalFeaturesCost ({})",
                total, breakdown.total_cost
            )),
            _ => Ok(breakdown),
        }
    }
}

/// Input for a one-off calculation without persistence.
///
/// Fields are optional so that missing values are reported by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateCostInput {
    pub floor_area: Option<f64>,
    pub number_of_floors: Option<f64>,
    pub material_type: Option<String>,
    #[serde(default)]
    pub additional_features: Option<Vec<String>>,
}
