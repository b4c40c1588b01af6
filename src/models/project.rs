use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CostBreakdown, FloorArea};

/// A saved estimate.
///
/// Projects are point-in-time snapshots: `estimated_cost` and
/// `cost_breakdown` are computed once at creation and never recomputed,
/// even if the rate card changes later. There is no update or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub project_name: String,
    pub location: String,
    /// Built-up area per floor in square feet.
    pub floor_area: FloorArea,
    pub number_of_floors: u32,
    pub material_type: String,
    /// Selected amenities in the order they were chosen.
    pub additional_features: Vec<String>,
    /// Equal to `cost_breakdown.total_cost()` at creation time.
    pub estimated_cost: u64,
    pub cost_breakdown: CostBreakdown,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project.
///
/// Every field is optional here so validation can report all missing
/// fields at once instead of failing on the first decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    pub project_name: Option<String>,
    pub location: Option<String>,
    pub floor_area: Option<f64>,
    pub number_of_floors: Option<f64>,
    pub material_type: Option<String>,
    #[serde(default)]
    pub additional_features: Option<Vec<String>>,
}

impl CreateProjectInput {
    /// Convenience constructor for callers holding already-typed values.
    pub fn new(
        project_name: impl Into<String>,
        location: impl Into<String>,
        floor_area: f64,
        number_of_floors: u32,
        material_type: impl Into<String>,
        additional_features: Vec<String>,
    ) -> Self {
        Self {
            project_name: Some(project_name.into()),
            location: Some(location.into()),
            floor_area: Some(floor_area),
            number_of_floors: Some(f64::from(number_of_floors)),
            material_type: Some(material_type.into()),
            additional_features: Some(additional_features),
        }
    }
}
