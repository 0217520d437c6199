//! Validating extractors.
//!
//! [`ValidatedJson`] and [`ValidatedQuery`] decode the request and run the
//! `validator` rules of the target type. Every failure is a 400 whose message
//! follows the `Key: 'Struct.Field' Error:Field validation for 'Field' failed
//! on the 'tag' tag` layout existing clients match on.

use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{StatusCode, request::Parts},
};
use dvdrental_core::AppError;
use serde::de::DeserializeOwned;
use serde_json::{Value, error::Category};
use validator::{Validate, ValidationError, ValidationErrors};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1_048_576;

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::bad_request(anyhow!("body must not be larger than {MAX_BODY_BYTES} bytes"))
            } else {
                AppError::bad_request(anyhow!(rejection.body_text()))
            }
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::bad_request(anyhow!("body must not be empty")));
        }

        let value: T = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::bad_request(anyhow!(describe_json_error(&e))))?;

        validate(&value)?;

        Ok(ValidatedJson(value))
    }
}

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(anyhow!(rejection.body_text())))?;

        validate(&value)?;

        Ok(ValidatedQuery(value))
    }
}

fn validate<T: Validate>(value: &T) -> Result<(), AppError> {
    value
        .validate()
        .map_err(|errors| AppError::bad_request(anyhow!(format_errors(type_name::<T>(), &errors))))
}

fn type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

fn describe_json_error(err: &serde_json::Error) -> String {
    match err.classify() {
        Category::Syntax => format!(
            "body contains badly-formed JSON (at line {} column {})",
            err.line(),
            err.column()
        ),
        Category::Eof => "body contains badly-formed JSON".to_string(),
        Category::Data => {
            let message = err.to_string();
            match message.strip_prefix("unknown field ") {
                Some(rest) => {
                    let key = rest.split(',').next().unwrap_or(rest).trim_matches('`');
                    format!("body contains unknown key \"{key}\"")
                }
                None => format!("body contains incorrect JSON type: {message}"),
            }
        }
        Category::Io => format!("failed to read body: {err}"),
    }
}

/// Renders one line per failed rule, ordered by field name.
pub fn format_errors(struct_name: &str, errors: &ValidationErrors) -> String {
    let mut lines = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let field = pascal_case(&field);
        for error in field_errors {
            lines.push(format!(
                "Key: '{struct_name}.{field}' Error:Field validation for '{field}' failed on the '{}' tag",
                tag(error)
            ));
        }
    }
    lines.sort();
    lines.join("\n")
}

/// Bounds checks report `min` or `max` depending on which side was crossed.
fn tag(error: &ValidationError) -> String {
    match error.code.as_ref() {
        "length" | "range" => {
            let min = error.params.get("min").and_then(Value::as_f64);
            let actual = error.params.get("value").and_then(|value| match value {
                Value::String(s) => Some(s.chars().count() as f64),
                Value::Number(n) => n.as_f64(),
                _ => None,
            });
            match (min, actual) {
                (Some(min), Some(actual)) if actual < min => "min".to_string(),
                (Some(_), None) if !error.params.contains_key("max") => "min".to_string(),
                _ => "max".to_string(),
            }
        }
        code => code.to_string(),
    }
}

fn pascal_case(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
