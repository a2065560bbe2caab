//! # Custom Extractors
//!
//! Helper to extract JSON object bodies with every rejection mapped to
//! [`AppError::BadRequest`].

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// Client-facing message for any body that cannot be decoded.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Decode a JSON object body into `T`, mapping every failure to
/// [`AppError::BadRequest`].
///
/// Handlers take `Result<Json<Value>, JsonRejection>` so that syntax errors,
/// missing fields, wrong types and a missing content type all produce 400
/// rather than axum's default 415/422. Only objects are accepted: serde's
/// derived visitors would otherwise fill a struct from a JSON array in
/// field order.
/// ```ignore
/// async fn handler(body: Result<Json<Value>, JsonRejection>) -> Result<..., AppError> {
///     let req: T = extract_json(body)?;
///     // use req...
/// }
/// ```
pub fn extract_json<T: DeserializeOwned>(
    result: Result<Json<Value>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(value) = result.map_err(|err| reject(err.body_text()))?;
    if !value.is_object() {
        return Err(reject("body is not a JSON object"));
    }
    serde_json::from_value(value).map_err(|err| reject(err.to_string()))
}

fn reject(detail: impl std::fmt::Display) -> AppError {
    tracing::debug!(%detail, "rejected request body");
    AppError::BadRequest(INVALID_BODY_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pair {
        x: i64,
        y: i64,
    }

    fn decode(value: Value) -> Result<Pair, AppError> {
        extract_json(Ok(Json(value)))
    }

    #[test]
    fn object_body_decodes() {
        assert_eq!(decode(json!({"x": 1, "y": 2})).unwrap(), Pair { x: 1, y: 2 });
    }

    #[test]
    fn array_body_is_rejected() {
        let err = decode(json!([1, 2])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == INVALID_BODY_MESSAGE));
    }

    #[test]
    fn scalar_and_null_bodies_are_rejected() {
        for value in [json!(3), json!("x"), Value::Null] {
            assert!(matches!(decode(value), Err(AppError::BadRequest(_))));
        }
    }

    #[test]
    fn missing_field_is_rejected() {
        assert!(matches!(
            decode(json!({"x": 1})),
            Err(AppError::BadRequest(_))
        ));
    }
}
