//! The analysis route: validation, orchestration, envelope selection.

use crate::analyze;
use crate::server::{envelope, AppState};
use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// A validated analysis request.
///
/// Immutable after validation; `aluno` and `id_analise` are carried opaquely
/// (they only matter for the payload echo on domain failure), while
/// `historico` and `grade` drive the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub aluno: Value,
    pub historico: String,
    pub grade: Value,
    pub id_analise: Value,
}

impl AnalysisRequest {
    /// The payload echo embedded in domain-failure responses, routed through
    /// the serialisable-safe projection.
    pub fn to_payload(&self) -> Value {
        envelope::to_safe_value(self)
    }
}

/// Validate the raw body. The checks mirror the wire contract exactly:
/// a non-object body and each missing/empty required field have fixed
/// Portuguese messages, checked in a fixed order. No deeper validation —
/// no URL scheme check, no curriculum item schema.
fn validate(body: &[u8]) -> Result<AnalysisRequest, &'static str> {
    let data: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(_) => return Err("JSON inválido ou ausente"),
    };
    if !data.is_object() {
        return Err("JSON inválido ou ausente");
    }

    let historico = data
        .get("historico")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if historico.is_empty() {
        return Err("Campo 'historico' é obrigatório");
    }
    if is_blank(data.get("aluno")) {
        return Err("Campo 'aluno' é obrigatório");
    }
    if is_blank(data.get("grade")) {
        return Err("Campo 'grade' é obrigatório");
    }

    Ok(AnalysisRequest {
        aluno: data.get("aluno").cloned().unwrap_or(Value::Null),
        historico: historico.to_string(),
        grade: data.get("grade").cloned().unwrap_or(Value::Null),
        id_analise: data.get("id_analise").cloned().unwrap_or(Value::Null),
    })
}

/// Missing, null, empty string, empty array, and empty object all count as
/// absent, matching the lenient truthiness of the original contract.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
        Some(_) => false,
    }
}

/// `POST /analiseHistorico`
pub async fn analise_historico(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request = match validate(&body) {
        Ok(r) => r,
        Err(msg) => {
            warn!("Rejected request: {}", msg);
            return envelope::validation_error(msg);
        }
    };

    info!("Accepted analysis request for aluno={}", request.aluno);

    match analyze::analyze(&request.historico, &request.grade, &state.config).await {
        Ok(detalhes) => envelope::processed(detalhes),
        Err(e) if e.is_internal() => {
            warn!("Internal failure: {}", e);
            envelope::internal_error(&e.to_string())
        }
        Err(e) => {
            warn!("Analysis not processed: {}", e);
            envelope::not_processed(&e.to_string(), request.to_payload())
        }
    }
}
