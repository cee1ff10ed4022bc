//! Integration tests for the analysis endpoint.
//!
//! The router is driven in-process via tower `oneshot`. The model is an
//! injected [`GenerativeModel`] mock, and document downloads hit a loopback
//! one-shot HTTP server, so no test leaves the machine.

use analise_historico::pipeline::fetch::DocumentPart;
use analise_historico::{AnalysisConfig, AnalysisError, AppState, GenerativeModel};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::util::ServiceExt;

// ── Test doubles ─────────────────────────────────────────────────────────

/// Model that returns a fixed text, recording nothing.
struct FixedModel(String);

#[async_trait]
impl GenerativeModel for FixedModel {
    async fn generate(&self, _: &DocumentPart, _: &str) -> Result<String, AnalysisError> {
        Ok(self.0.clone())
    }
}

/// Model whose transport always fails.
struct FailingModel;

#[async_trait]
impl GenerativeModel for FailingModel {
    async fn generate(&self, _: &DocumentPart, _: &str) -> Result<String, AnalysisError> {
        Err(AnalysisError::Api {
            message: "connection reset by peer".into(),
        })
    }
}

/// Serve `body` once over loopback HTTP and return the base URL.
async fn serve_bytes(body: Vec<u8>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            // Drain the request head before answering.
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let head = format!(
                "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                body.len()
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&body).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}")
}

fn app_with_model(model: Arc<dyn GenerativeModel>) -> axum::Router {
    let config = AnalysisConfig::builder()
        .model_provider(model)
        .build()
        .unwrap();
    analise_historico::router(Arc::new(AppState { config }))
}

async fn post_analysis(app: axum::Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, body.to_string().into_bytes()).await
}

async fn post_raw(app: axum::Router, body: Vec<u8>) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analiseHistorico")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let parsed: Value = serde_json::from_slice(&bytes).expect("response must be JSON");
    (status, parsed)
}

// ── Validation (400) ─────────────────────────────────────────────────────

#[tokio::test]
async fn missing_fields_yield_400_with_portuguese_messages() {
    let cases = [
        (json!({"aluno": "Ana", "grade": [{}]}), "Campo 'historico' é obrigatório"),
        (
            json!({"historico": "http://x/doc.pdf", "grade": [{}]}),
            "Campo 'aluno' é obrigatório",
        ),
        (
            json!({"historico": "http://x/doc.pdf", "aluno": "Ana"}),
            "Campo 'grade' é obrigatório",
        ),
    ];
    for (body, expected) in cases {
        let app = app_with_model(Arc::new(FixedModel("{}".into())));
        let (status, response) = post_analysis(app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["status"], "erro");
        assert_eq!(response["msg"], expected);
    }
}

#[tokio::test]
async fn malformed_body_yields_400() {
    let app = app_with_model(Arc::new(FixedModel("{}".into())));
    let (status, response) = post_raw(app, b"definitely not json".to_vec()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["status"], "erro");
    assert_eq!(response["msg"], "JSON inválido ou ausente");
}

// ── Domain failure (200, nao processado) ─────────────────────────────────

#[tokio::test]
async fn unsupported_extension_is_a_domain_failure() {
    let app = app_with_model(Arc::new(FixedModel("{}".into())));
    let body = json!({
        "aluno": "Ana",
        "historico": "http://transcripts.invalid/notes.txt",
        "grade": [{"codigo": "X1"}],
        "id_analise": "1",
    });
    let (status, response) = post_analysis(app, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "nao processado");
    assert_eq!(response["resultado"]["status"], "error");
    assert!(
        response["resultado"]["motivo"]
            .as_str()
            .unwrap()
            .contains("Tipo de arquivo não suportado"),
        "got: {}",
        response["resultado"]["motivo"]
    );
}

#[tokio::test]
async fn model_transport_failure_echoes_the_payload() {
    let base = serve_bytes(b"%PDF-1.4 fake".to_vec()).await;
    let app = app_with_model(Arc::new(FailingModel));
    let body = json!({
        "aluno": "Ana",
        "historico": format!("{base}/doc.pdf"),
        "grade": [{"codigo": "X1", "nome": "Calc", "carga_horaria": 60}],
        "id_analise": "1",
    });
    let (status, response) = post_analysis(app, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "nao processado");
    assert_eq!(response["resultado"]["status"], "error");
    assert!(response["resultado"]["motivo"]
        .as_str()
        .unwrap()
        .contains("connection reset"));
    // The validated input comes back so the caller can correlate.
    assert_eq!(response["payload"]["aluno"], "Ana");
    assert_eq!(response["payload"]["id_analise"], "1");
    assert_eq!(response["payload"]["grade"][0]["codigo"], "X1");
}

#[tokio::test]
async fn unreachable_document_host_is_a_domain_failure() {
    let app = app_with_model(Arc::new(FixedModel("{}".into())));
    let body = json!({
        "aluno": "Ana",
        // Reserved TLD: guaranteed not to resolve.
        "historico": "http://transcripts.invalid/doc.pdf",
        "grade": [{"codigo": "X1"}],
    });
    let (status, response) = post_analysis(app, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "nao processado");
    assert_eq!(response["resultado"]["status"], "error");
}

// ── Success (200, processado) ────────────────────────────────────────────

#[tokio::test]
async fn successful_analysis_returns_the_model_comparison() {
    let comparison = json!({
        "aluno": {"nome": "Ana", "matricula": "2021001", "curso": "CC", "periodo_ingresso": "2021.1"},
        "comparacao_disciplinas": [{
            "nova_disciplina": {"codigo": "X1", "nome": "Calc", "carga_horaria": 60},
            "disciplina_cursada_equivalente": {
                "codigo": "MAT01", "nome": "Cálculo I", "carga_horaria": 60,
                "creditos": 4, "nota": "8,5", "situacao": "APROVADO"
            },
            "porcentagem_aproveitamento": 100,
            "possivel_dispensa": true,
            "observacao": ""
        }],
    });
    let base = serve_bytes(b"%PDF-1.4 fake".to_vec()).await;
    let app = app_with_model(Arc::new(FixedModel(comparison.to_string())));
    let body = json!({
        "aluno": "Ana",
        "historico": format!("{base}/doc.pdf"),
        "grade": [{"codigo": "X1", "nome": "Calc", "carga_horaria": 60}],
        "id_analise": "1",
    });
    let (status, response) = post_analysis(app, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "processado");
    assert_eq!(response["resultado"]["status"], "sucesso");
    assert_eq!(response["resultado"]["mensagem"], "Histórico analisado com sucesso");
    assert_eq!(response["resultado"]["detalhes"], comparison);
}

#[tokio::test]
async fn fenced_model_output_parses_like_bare_output() {
    let comparison = json!({"comparacao_disciplinas": []});
    let fenced = format!("```json\n{comparison}\n```");
    let base = serve_bytes(b"\xff\xd8\xff fake jpeg".to_vec()).await;
    let app = app_with_model(Arc::new(FixedModel(fenced)));
    let body = json!({
        "aluno": "Ana",
        "historico": format!("{base}/scan.jpg"),
        "grade": [{"codigo": "X1"}],
    });
    let (status, response) = post_analysis(app, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "processado");
    assert_eq!(response["resultado"]["detalhes"], comparison);
}

// ── Internal error (500) ─────────────────────────────────────────────────

#[tokio::test]
async fn non_json_model_output_yields_the_500_envelope() {
    let base = serve_bytes(b"%PDF-1.4 fake".to_vec()).await;
    let app = app_with_model(Arc::new(FixedModel("sorry, I cannot help".into())));
    let body = json!({
        "aluno": "Ana",
        "historico": format!("{base}/doc.pdf"),
        "grade": [{"codigo": "X1"}],
    });
    let (status, response) = post_analysis(app, body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["status"], "erro");
    assert_eq!(response["msg"], "Erro interno");
    assert!(response["detail"].is_string());
}
