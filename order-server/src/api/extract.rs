//! Request extractors
//!
//! Rejections are turned into [`AppError`] so every 400 has the same body.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use shared::error::AppError;
use validator::{Validate, ValidationError, ValidationErrors};

/// JSON body that is deserialized and then validated
///
/// Malformed JSON, wrong field types and unknown fields are reported as a
/// single violation; failed validation rules as one violation per rule.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::validation_errors(violation_messages(&errors)))?;
        Ok(Self(value))
    }
}

/// Human-readable messages for every failed rule, sorted by field name
pub fn violation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<(String, Vec<ValidationError>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| (camel_case(field.as_ref()), errs.clone()))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, errs)| errs.iter().map(move |e| describe(field, e)))
        .collect()
}

fn describe(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match error.code.as_ref() {
        "blank" => format!("{field} should not be empty"),
        "required" => format!("{field} is required"),
        "length" => format!("{field} has an invalid length"),
        _ => format!("{field} is invalid"),
    }
}

/// `payment_due_date` → `paymentDueDate`
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
