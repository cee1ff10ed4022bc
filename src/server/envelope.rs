//! The three fixed response shapes of the analysis endpoint.
//!
//! The wire contract is Portuguese and status-tag driven: HTTP 200 covers
//! both domain success and domain failure, and callers distinguish them by
//! the top-level `status` field. Only validation (400) and internal errors
//! (500) change the HTTP status. Every shape is built here so the handler
//! never assembles JSON inline.
//!
//! Anything embedded in an error payload first passes through
//! [`to_safe_value`], a projection onto JSON primitives, arrays, and objects
//! with a string fallback — the response is JSON-serialisable by
//! construction, whatever the input was.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// 200 — the model produced a comparison.
pub fn processed(detalhes: Value) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "processado",
            "resultado": {
                "status": "sucesso",
                "mensagem": "Histórico analisado com sucesso",
                "detalhes": detalhes,
            },
        })),
    )
        .into_response()
}

/// 200 — the request was valid but the document could not be analysed.
/// Echoes the validated payload so the caller can correlate and retry.
pub fn not_processed(motivo: &str, payload: Value) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "nao processado",
            "resultado": {
                "status": "error",
                "mensagem": "Erro ao analisar histórico",
                "motivo": motivo,
            },
            "payload": sanitize(payload),
        })),
    )
        .into_response()
}

/// 400 — the body was not a JSON object or a required field was missing.
pub fn validation_error(msg: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "status": "erro", "msg": msg })),
    )
        .into_response()
}

/// 500 — the fixed internal-error shape, detail as plain text.
pub fn internal_error(detail: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": "erro",
            "msg": "Erro interno",
            "detail": detail,
        })),
    )
        .into_response()
}

/// Project any serialisable value onto JSON, falling back to its debug text
/// when serialisation fails. The result is always embeddable in a response.
pub fn to_safe_value<T: Serialize + std::fmt::Debug>(value: &T) -> Value {
    match serde_json::to_value(value) {
        Ok(v) => sanitize(v),
        Err(_) => Value::String(format!("{value:?}")),
    }
}

/// Recursively rebuild a JSON value over the closed set
/// {null, bool, number, string, array, object}.
///
/// On `serde_json::Value` every node is already in that set, so this is the
/// identity — and therefore idempotent — but routing all error payloads
/// through one projection keeps the guarantee in a single place instead of
/// scattered over the handler.
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize).collect()),
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, sanitize(v))).collect())
        }
        primitive => primitive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::json;

    #[test]
    fn sanitize_is_idempotent_on_nested_input() {
        let input = json!({
            "aluno": "Ana",
            "grade": [{"codigo": "X1", "carga_horaria": 60}, null, true],
            "nested": {"list": [[1, 2], {"k": "v"}]},
        });
        let once = sanitize(input.clone());
        let twice = sanitize(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, input);
    }

    #[derive(Debug)]
    struct Opaque;

    impl Serialize for Opaque {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not representable"))
        }
    }

    #[test]
    fn unserialisable_values_become_text() {
        let projected = to_safe_value(&Opaque);
        assert_eq!(projected, Value::String("Opaque".into()));
    }

    #[test]
    fn serialisable_values_pass_through() {
        let projected = to_safe_value(&vec![1u32, 2, 3]);
        assert_eq!(projected, json!([1, 2, 3]));
    }
}
