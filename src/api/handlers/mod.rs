use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::calculator::RateCard;
use crate::error::EstimateError;
use crate::models::*;
use crate::service::ProjectService;
use crate::validation::decode_input;

// ============================================================
// Error Handling
// ============================================================

/// JSON error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    /// Offending input fields, present only for validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a service error to a status code and body.
///
/// Input problems are returned to the client as-is. Storage failures are
/// logged server-side and replaced with a generic message so that storage
/// internals never reach the client.
fn api_error(e: EstimateError) -> ApiError {
    let status = match &e {
        EstimateError::Validation(_)
        | EstimateError::MalformedRequest(_)
        | EstimateError::UnknownMaterialGrade(_)
        | EstimateError::CostOverflow => StatusCode::BAD_REQUEST,
        EstimateError::NotFound(_) => StatusCode::NOT_FOUND,
        EstimateError::Storage(source) => {
            tracing::error!("Internal error: {:#}", source);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    message: "Internal server error".to_string(),
                    fields: Vec::new(),
                }),
            );
        }
    };

    tracing::warn!("Rejected request: {}", e);
    let fields = e.field_names().into_iter().map(String::from).collect();
    (
        status,
        Json(ErrorResponse {
            message: e.to_string(),
            fields,
        }),
    )
}

/// Read a JSON body, reporting unreadable bodies and mistyped fields in the
/// same shape as any other input error.
fn read_body<T: DeserializeOwned>(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<T, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        api_error(EstimateError::MalformedRequest(rejection.body_text()))
    })?;
    decode_input(body).map_err(api_error)
}

fn parse_project_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        api_error(EstimateError::MalformedRequest(format!(
            "invalid project id '{}'",
            raw
        )))
    })
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Projects
// ============================================================

pub async fn list_projects(
    State(service): State<ProjectService>,
) -> Result<Json<Vec<Project>>, ApiError> {
    service.list().map(Json).map_err(api_error)
}

pub async fn get_project(
    State(service): State<ProjectService>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let id = parse_project_id(&id)?;
    service.get_by_id(id).map(Json).map_err(api_error)
}

pub async fn create_project(
    State(service): State<ProjectService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let input: CreateProjectInput = read_body(payload)?;
    service
        .create(input)
        .map(|p| (StatusCode::CREATED, Json(p)))
        .map_err(api_error)
}

// ============================================================
// Estimation
// ============================================================

pub async fn calculate_cost(
    State(service): State<ProjectService>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CostBreakdown>, ApiError> {
    let input: CalculateCostInput = read_body(payload)?;
    service.calculate(&input).map(Json).map_err(api_error)
}

pub async fn get_rates(State(service): State<ProjectService>) -> Json<RateCard> {
    Json(service.rate_card().clone())
}
