//! Project service: validation, pricing and persistence of estimates.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use crate::calculator::{CostCalculator, RateCard};
use crate::error::{EstimateError, EstimateResult};
use crate::models::*;
use crate::store::ProjectStore;
use crate::validation::{validate_calculation, validate_project};

/// Entry point for creating, listing and fetching projects.
///
/// Cheap to clone; clones share the store and calculator.
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
    calculator: Arc<CostCalculator>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn ProjectStore>, calculator: CostCalculator) -> Self {
        Self {
            store,
            calculator: Arc::new(calculator),
        }
    }

    /// Service over `store` priced with the standard rate card.
    pub fn with_store(store: impl ProjectStore + 'static) -> Self {
        Self::new(Arc::new(store), CostCalculator::default())
    }

    pub fn rate_card(&self) -> &RateCard {
        self.calculator.rate_card()
    }

    /// Price a building without saving anything.
    pub fn calculate(&self, input: &CalculateCostInput) -> EstimateResult<CostBreakdown> {
        let query = validate_calculation(input)?;
        self.calculator.calculate(
            query.floor_area,
            query.number_of_floors,
            &query.material_type,
            query.additional_features.as_slice(),
        )
    }

    /// Validate, price and persist a new project.
    pub fn create(&self, input: CreateProjectInput) -> EstimateResult<Project> {
        let draft = validate_project(&input)?;
        let query = draft.query;

        let breakdown = self.calculator.calculate(
            query.floor_area,
            query.number_of_floors,
            &query.material_type,
            query.additional_features.as_slice(),
        )?;

        // Storage keeps microseconds; truncate so the returned record equals
        // what a later fetch yields.
        let project = Project {
            id: Uuid::new_v4(),
            project_name: draft.project_name,
            location: draft.location,
            floor_area: query.floor_area,
            number_of_floors: query.number_of_floors,
            material_type: query.material_type,
            additional_features: query.additional_features,
            estimated_cost: breakdown.total_cost(),
            cost_breakdown: breakdown,
            created_at: Utc::now().trunc_subsecs(6),
        };

        self.store.insert_project(&project)?;
        tracing::info!(
            "Created project {} ({}) estimated at {}",
            project.id,
            project.project_name,
            project.estimated_cost
        );

        Ok(project)
    }

    /// All projects, newest first.
    pub fn list(&self) -> EstimateResult<Vec<Project>> {
        Ok(self.store.list_projects()?)
    }

    pub fn get_by_id(&self, id: Uuid) -> EstimateResult<Project> {
        self.store
            .get_project(id)?
            .ok_or(EstimateError::NotFound(id))
    }
}
