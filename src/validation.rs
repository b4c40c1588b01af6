//! Boundary checks that turn loosely typed inputs into calculator arguments.
//!
//! Every check runs before anything is reported, so a single
//! [`EstimateError::Validation`] names all offending fields.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{EstimateError, EstimateResult, FieldError};
use crate::models::{Amenity, CalculateCostInput, CreateProjectInput, FloorArea, MaterialGrade};

/// Checked arguments for a calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct CostQuery {
    pub floor_area: FloorArea,
    pub number_of_floors: u32,
    pub material_type: String,
    pub additional_features: Vec<String>,
}

/// A project input that passed validation, ready to be priced and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub project_name: String,
    pub location: String,
    pub query: CostQuery,
}

/// Validate input for a standalone calculation.
///
/// Only presence and range are checked here; grade and feature names are
/// left to the calculator, which rejects unknown grades and prices unknown
/// features at zero.
pub fn validate_calculation(input: &CalculateCostInput) -> EstimateResult<CostQuery> {
    let mut errors = Vec::new();

    let floor_area = parse_floor_area(input.floor_area, &mut errors);
    let floors = parse_floor_count(input.number_of_floors, &mut errors);
    let material_type = required_text(input.material_type.as_deref(), "materialType", &mut errors);

    match (floor_area, floors, material_type) {
        (Some(floor_area), Some(floors), Some(material_type)) if errors.is_empty() => {
            Ok(CostQuery {
                floor_area,
                number_of_floors: floors,
                material_type,
                additional_features: input.additional_features.clone().unwrap_or_default(),
            })
        }
        _ => Err(EstimateError::Validation(errors)),
    }
}

/// Validate input for a new project.
///
/// Stricter than [`validate_calculation`]: the material grade and every
/// feature must belong to their fixed enumerations.
pub fn validate_project(input: &CreateProjectInput) -> EstimateResult<ProjectDraft> {
    let mut errors = Vec::new();

    let project_name = required_text(input.project_name.as_deref(), "projectName", &mut errors);
    let location = required_text(input.location.as_deref(), "location", &mut errors);
    let floor_area = parse_floor_area(input.floor_area, &mut errors);
    let floors = parse_floor_count(input.number_of_floors, &mut errors);

    let material_type = required_text(input.material_type.as_deref(), "materialType", &mut errors)
        .and_then(|grade| {
            if MaterialGrade::from_str(&grade).is_some() {
                Some(grade)
            } else {
                errors.push(FieldError::new(
                    "materialType",
                    format!("must be one of {}", grade_names()),
                ));
                None
            }
        });

    let additional_features = input.additional_features.clone().unwrap_or_default();
    let unknown: Vec<&str> = additional_features
        .iter()
        .map(String::as_str)
        .filter(|f| Amenity::from_str(f).is_none())
        .collect();
    if !unknown.is_empty() {
        errors.push(FieldError::new(
            "additionalFeatures",
            format!("contains unknown feature(s): {}", unknown.join(", ")),
        ));
    }

    match (project_name, location, floor_area, floors, material_type) {
        (Some(project_name), Some(location), Some(floor_area), Some(floors), Some(material_type))
            if errors.is_empty() =>
        {
            Ok(ProjectDraft {
                project_name,
                location,
                query: CostQuery {
                    floor_area,
                    number_of_floors: floors,
                    material_type,
                    additional_features,
                },
            })
        }
        _ => Err(EstimateError::Validation(errors)),
    }
}

/// Decode a JSON body into an input type whose fields are all optional.
///
/// When decoding fails, each top-level key is decoded on its own so the error
/// names every field holding a value of the wrong type.
pub fn decode_input<T: DeserializeOwned>(body: Value) -> EstimateResult<T> {
    let Value::Object(fields) = body else {
        return Err(EstimateError::MalformedRequest(
            "request body must be a JSON object".to_string(),
        ));
    };

    let err = match serde_json::from_value::<T>(Value::Object(fields.clone())) {
        Ok(input) => return Ok(input),
        Err(err) => err,
    };

    let mut errors: Vec<FieldError> = fields
        .into_iter()
        .filter_map(|(key, value)| {
            let single = Value::Object(Map::from_iter([(key.clone(), value)]));
            serde_json::from_value::<T>(single)
                .err()
                .map(|_| FieldError::new(key, "has the wrong type"))
        })
        .collect();
    errors.sort_by(|a, b| a.field.cmp(&b.field));

    if errors.is_empty() {
        Err(EstimateError::MalformedRequest(err.to_string()))
    } else {
        Err(EstimateError::Validation(errors))
    }
}

fn required_text(value: Option<&str>, field: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
    }
}

/// Square feet, at least 1, with up to two decimal places kept exactly.
fn parse_floor_area(value: Option<f64>, errors: &mut Vec<FieldError>) -> Option<FloorArea> {
    const FIELD: &str = "floorArea";
    let Some(v) = value else {
        errors.push(FieldError::new(FIELD, "is required"));
        return None;
    };

    let max = FloorArea::MAX_HUNDREDTHS / 100;
    if !v.is_finite() {
        errors.push(FieldError::new(FIELD, "must be a number"));
        None
    } else if v < 1.0 {
        errors.push(FieldError::new(FIELD, "must be at least 1"));
        None
    } else if v > max as f64 {
        errors.push(FieldError::new(FIELD, format!("must be at most {}", max)));
        None
    } else {
        let area = FloorArea::from_f64(v);
        if area.is_none() {
            errors.push(FieldError::new(FIELD, "must have at most two decimal places"));
        }
        area
    }
}

fn parse_floor_count(value: Option<f64>, errors: &mut Vec<FieldError>) -> Option<u32> {
    const FIELD: &str = "numberOfFloors";
    let Some(v) = value else {
        errors.push(FieldError::new(FIELD, "is required"));
        return None;
    };

    if !v.is_finite() || v.fract() != 0.0 {
        errors.push(FieldError::new(FIELD, "must be a whole number"));
        None
    } else if v < 1.0 {
        errors.push(FieldError::new(FIELD, "must be at least 1"));
        None
    } else if v > f64::from(u32::MAX) {
        errors.push(FieldError::new(FIELD, format!("must be at most {}", u32::MAX)));
        None
    } else {
        Some(v as u32)
    }
}

fn grade_names() -> String {
    MaterialGrade::ALL
        .iter()
        .map(|g| g.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_input() -> CreateProjectInput {
        CreateProjectInput::new(
            "Riverside Villa",
            "Pune",
            2000.0,
            2,
            "Premium",
            vec!["Garden".to_string()],
        )
    }

    #[test]
    fn accepts_complete_project() {
        let draft = validate_project(&complete_input()).unwrap();
        assert_eq!(draft.project_name, "Riverside Villa");
        assert_eq!(draft.query.floor_area, FloorArea::from_sq_ft(2000).unwrap());
        assert_eq!(draft.query.number_of_floors, 2);
        assert_eq!(draft.query.additional_features, vec!["Garden"]);
    }

    #[test]
    fn trims_text_fields() {
        let mut input = complete_input();
        input.project_name = Some("  Riverside Villa ".to_string());
        input.location = Some("\tPune\n".to_string());

        let draft = validate_project(&input).unwrap();
        assert_eq!(draft.project_name, "Riverside Villa");
        assert_eq!(draft.location, "Pune");
    }

    #[test]
    fn reports_every_missing_field() {
        let err = validate_project(&CreateProjectInput::default()).unwrap_err();
        assert_eq!(
            err.field_names(),
            vec![
                "projectName",
                "location",
                "floorArea",
                "numberOfFloors",
                "materialType"
            ]
        );
    }

    #[test]
    fn blank_name_counts_as_missing() {
        let mut input = complete_input();
        input.project_name = Some("   ".to_string());
        let err = validate_project(&input).unwrap_err();
        assert_eq!(err.field_names(), vec!["projectName"]);
    }

    #[test]
    fn rejects_zero_area_and_fractional_floor_count() {
        let mut input = complete_input();
        input.floor_area = Some(0.0);
        input.number_of_floors = Some(1.5);
        let err = validate_project(&input).unwrap_err();
        assert_eq!(err.field_names(), vec!["floorArea", "numberOfFloors"]);
    }

    #[test]
    fn accepts_fractional_floor_area() {
        let mut input = complete_input();
        input.floor_area = Some(1500.5);
        let draft = validate_project(&input).unwrap();
        assert_eq!(draft.query.floor_area.hundredths(), 150_050);
    }

    #[test]
    fn rejects_area_finer_than_hundredths() {
        let mut input = complete_input();
        input.floor_area = Some(1500.125);
        let err = validate_project(&input).unwrap_err();
        assert_eq!(err.field_names(), vec!["floorArea"]);
        assert!(err.to_string().contains("two decimal places"));
    }

    #[test]
    fn rejects_unknown_grade_and_features_on_create() {
        let mut input = complete_input();
        input.material_type = Some("Marble".to_string());
        input.additional_features = Some(vec!["Garden".to_string(), "Helipad".to_string()]);
        let err = validate_project(&input).unwrap_err();
        assert_eq!(err.field_names(), vec!["materialType", "additionalFeatures"]);
    }

    #[test]
    fn missing_features_default_to_empty() {
        let mut input = complete_input();
        input.additional_features = None;
        let draft = validate_project(&input).unwrap();
        assert!(draft.query.additional_features.is_empty());
    }

    #[test]
    fn calculation_leaves_grade_and_features_to_calculator() {
        let input = CalculateCostInput {
            floor_area: Some(100.0),
            number_of_floors: Some(1.0),
            material_type: Some("Marble".to_string()),
            additional_features: Some(vec!["Helipad".to_string()]),
        };
        let query = validate_calculation(&input).unwrap();
        assert_eq!(query.material_type, "Marble");
        assert_eq!(query.additional_features, vec!["Helipad"]);
    }

    #[test]
    fn calculation_requires_area_floors_and_grade() {
        let err = validate_calculation(&CalculateCostInput::default()).unwrap_err();
        assert_eq!(
            err.field_names(),
            vec!["floorArea", "numberOfFloors", "materialType"]
        );
    }

    #[test]
    fn decode_names_fields_of_the_wrong_type() {
        let body = serde_json::json!({
            "projectName": "Typo Towers",
            "floorArea": "2000",
            "numberOfFloors": 2,
            "additionalFeatures": "Parking"
        });
        let err = decode_input::<CreateProjectInput>(body).unwrap_err();
        assert!(matches!(err, EstimateError::Validation(_)));
        assert_eq!(err.field_names(), vec!["additionalFeatures", "floorArea"]);
    }

    #[test]
    fn decode_accepts_well_typed_partial_input() {
        let body = serde_json::json!({ "floorArea": 1500.5, "unrelated": true });
        let input: CalculateCostInput = decode_input(body).unwrap();
        assert_eq!(input.floor_area, Some(1500.5));
        assert!(input.material_type.is_none());
    }

    #[test]
    fn decode_rejects_non_object_bodies() {
        let err = decode_input::<CalculateCostInput>(serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, EstimateError::MalformedRequest(_)));
    }

    #[test]
    fn floor_count_above_u32_is_rejected() {
        let input = CalculateCostInput {
            floor_area: Some(10.0),
            number_of_floors: Some(5_000_000_000.0),
            material_type: Some("Standard".to_string()),
            additional_features: None,
        };
        let err = validate_calculation(&input).unwrap_err();
        assert_eq!(err.field_names(), vec!["numberOfFloors"]);
    }
}
