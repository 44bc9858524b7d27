//! Request body validation: shape, field types, then entity constraints.

use crate::error::AppError;
use crate::model::Entity;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// Decodes a JSON object into a typed payload. Type errors surface as validation errors.
pub fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    if !body.is_object() {
        return Err(AppError::Validation("body must be a JSON object".into()));
    }
    serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))
}

pub struct RequestValidator<E>(PhantomData<E>);

impl<E: Entity> RequestValidator<E> {
    /// Full payload for create: every required field present and well-formed.
    pub fn validate_new(body: Value) -> Result<E::New, AppError> {
        let new = parse_body::<E::New>(body)?;
        E::check_new(&new)?;
        Ok(new)
    }

    /// Partial payload for update; field constraints are checked when merged.
    pub fn validate_patch(body: Value) -> Result<E::Patch, AppError> {
        parse_body::<E::Patch>(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, Food};
    use serde_json::json;

    #[test]
    fn rejects_non_objects() {
        for body in [json!([1, 2]), json!("name"), json!(null)] {
            assert!(matches!(
                RequestValidator::<Author>::validate_new(body),
                Err(AppError::Validation(m)) if m == "body must be a JSON object"
            ));
        }
    }

    #[test]
    fn missing_field_names_it() {
        let err = RequestValidator::<Food>::validate_new(json!({"name": "Apple", "type": "fruit"})).unwrap_err();
        assert!(err.to_string().contains("calories"));
    }

    #[test]
    fn constraint_checks_run_after_decoding() {
        assert!(RequestValidator::<Author>::validate_new(json!({"name": ""})).is_err());
        assert!(RequestValidator::<Author>::validate_new(json!({"name": "Octavia"})).is_ok());
    }

    #[test]
    fn patch_accepts_empty_object() {
        assert!(RequestValidator::<Food>::validate_patch(json!({})).is_ok());
        assert!(RequestValidator::<Food>::validate_patch(json!({"calories": "lots"})).is_err());
    }
}
