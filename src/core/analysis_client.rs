use std::time::Instant;

use anyhow::Context;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use super::config::ApiConfig;
use super::errors::CoreError;
use super::models::{AnalysisResponse, ErrorDetail, UploadContent};
use super::validation::ValidatedUpload;

const RESUME_FIELD: &str = "resume";
const JOB_DESCRIPTION_FIELD: &str = "job_desc";
const UNKNOWN_ERROR: &str = "Unknown error occurred";

pub struct AnalysisClient {
    client: Client,
}

impl AnalysisClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Posts the resume and job description to the analysis service.
    ///
    /// Success bodies are returned untouched, including any `error` the service embedded.
    /// There is no retry and no timeout beyond what the transport imposes.
    pub async fn analyze(
        &self,
        config: &ApiConfig,
        upload: &ValidatedUpload,
        job_description: &str,
    ) -> anyhow::Result<AnalysisResponse> {
        if job_description.trim().is_empty() {
            return Err(
                CoreError::InvalidRequest("job description is required".to_string()).into(),
            );
        }

        let endpoint = config.endpoint()?;
        let form = Form::new()
            .part(RESUME_FIELD, resume_part(upload).await?)
            .text(JOB_DESCRIPTION_FIELD, job_description.to_string());

        debug!(%endpoint, file = upload.file_name(), size = upload.size_bytes(), "posting analysis request");
        let started = Instant::now();
        let response = self.client.post(endpoint.clone()).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<ErrorDetail>(&body) {
                Ok(parsed) => parsed.message(),
                Err(_) => Some(UNKNOWN_ERROR.to_string()),
            };

            let message = detail.unwrap_or_else(|| {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                )
            });
            warn!(%endpoint, status = status.as_u16(), %message, "analysis request failed");

            return Err(CoreError::AnalysisService {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body = response.text().await?;
        let payload = serde_json::from_str::<AnalysisResponse>(&body)
            .context("failed to parse analysis response")?;

        info!(
            %endpoint,
            score = payload.score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis response received"
        );
        Ok(payload)
    }
}

async fn resume_part(upload: &ValidatedUpload) -> anyhow::Result<Part> {
    let candidate = upload.candidate();
    let body = match &candidate.content {
        UploadContent::Memory(bytes) => Body::from(bytes.clone()),
        UploadContent::File(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            Body::wrap_stream(ReaderStream::new(file))
        }
    };

    let mime = mime_guess::from_path(&candidate.file_name).first_or_octet_stream();
    let part = Part::stream_with_length(body, candidate.size_bytes)
        .file_name(candidate.file_name.clone())
        .mime_str(mime.essence_str())?;
    Ok(part)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::{Multipart, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::Router;
    use url::Url;

    use super::*;
    use crate::core::models::UploadCandidate;
    use crate::core::validation::validate_upload;

    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}")).unwrap()
    }

    fn canned(status: StatusCode, body: &'static str) -> Router {
        Router::new().route(
            "/analyze",
            post(move || async move { (status, body).into_response() }),
        )
    }

    fn upload() -> ValidatedUpload {
        validate_upload(UploadCandidate::from_bytes("resume.pdf", b"%PDF-1.4 test".to_vec()))
            .unwrap()
    }

    fn sample() -> AnalysisResponse {
        AnalysisResponse {
            score: 87.5,
            matching_skills: vec!["Rust".to_string(), "SQL".to_string()],
            missing_skills: vec!["Terraform".to_string()],
            missing_qualifications: vec!["5+ years of backend experience".to_string()],
            suggestions: vec!["Lead with measurable outcomes".to_string()],
            raw_ai: Some("{...}".to_string()),
            error: None,
        }
    }

    #[tokio::test]
    async fn success_body_is_returned_unchanged() {
        let json = serde_json::to_string(&sample()).unwrap();
        let router = Router::new().route(
            "/analyze",
            post(move || {
                let json = json.clone();
                async move { (StatusCode::OK, [("content-type", "application/json")], json) }
            }),
        );
        let base = serve(router).await;
        let client = AnalysisClient::new(Client::new());

        let result = client
            .analyze(&ApiConfig::development(base), &upload(), "Senior Rust engineer")
            .await
            .unwrap();

        assert_eq!(result, sample());
    }

    #[tokio::test]
    async fn embedded_error_is_not_interpreted() {
        let router = canned(StatusCode::OK, r#"{"score":0,"matching_skills":[],"missing_skills":[],"missing_qualifications":[],"suggestions":[],"error":"AI quota exhausted"}"#);
        let base = serve(router).await;
        let client = AnalysisClient::new(Client::new());

        let result = client
            .analyze(&ApiConfig::development(base), &upload(), "Data engineer")
            .await
            .unwrap();

        assert_eq!(result.error.as_deref(), Some("AI quota exhausted"));
    }

    #[tokio::test]
    async fn error_detail_becomes_the_message() {
        let base = serve(canned(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail":"model unavailable"}"#,
        ))
        .await;
        let client = AnalysisClient::new(Client::new());

        let err = client
            .analyze(&ApiConfig::development(base), &upload(), "Any role")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "model unavailable");
        assert_eq!(err.downcast_ref::<CoreError>().and_then(CoreError::status), Some(500));
    }

    #[tokio::test]
    async fn non_json_error_body_falls_back_to_unknown_error() {
        let base = serve(canned(StatusCode::BAD_GATEWAY, "<html>upstream down</html>")).await;
        let client = AnalysisClient::new(Client::new());

        let err = client
            .analyze(&ApiConfig::development(base), &upload(), "Any role")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), UNKNOWN_ERROR);
    }

    #[tokio::test]
    async fn validation_error_list_is_flattened() {
        let base = serve(canned(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","job_desc"],"msg":"field required","type":"value_error.missing"}]}"#,
        ))
        .await;
        let client = AnalysisClient::new(Client::new());

        let err = client
            .analyze(&ApiConfig::development(base), &upload(), "Any role")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "field required");
        assert_eq!(err.downcast_ref::<CoreError>().and_then(CoreError::status), Some(422));
    }

    #[tokio::test]
    async fn json_error_without_detail_reports_status() {
        let base = serve(canned(StatusCode::BAD_REQUEST, r#"{"message":"nope"}"#)).await;
        let client = AnalysisClient::new(Client::new());

        let err = client
            .analyze(&ApiConfig::development(base), &upload(), "Any role")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "HTTP 400: Bad Request");
    }

    #[tokio::test]
    async fn blank_description_never_reaches_the_network() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/analyze",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    StatusCode::OK
                }),
            )
            .with_state(Arc::clone(&hits));
        let base = serve(router).await;
        let client = AnalysisClient::new(Client::new());

        let err = client
            .analyze(&ApiConfig::development(base), &upload(), "   ")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("job description is required"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn production_posts_to_api_path_with_multipart_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Jane Doe.docx");
        tokio::fs::write(&path, b"PK docx bytes").await.unwrap();
        let upload = validate_upload(UploadCandidate::from_path(&path).await.unwrap()).unwrap();

        let router = Router::new().route(
            "/api/analyze",
            post(|mut multipart: Multipart| async move {
                let mut fields = Vec::new();
                while let Some(field) = multipart.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_string();
                    let file_name = field.file_name().map(str::to_string);
                    let data = field.bytes().await.unwrap();
                    fields.push((name, file_name, String::from_utf8_lossy(&data).to_string()));
                }

                let ok = fields
                    == vec![
                        (
                            "resume".to_string(),
                            Some("Jane Doe.docx".to_string()),
                            "PK docx bytes".to_string(),
                        ),
                        ("job_desc".to_string(), None, "Platform engineer".to_string()),
                    ];
                let score = if ok { 100 } else { 0 };
                (
                    StatusCode::OK,
                    [("content-type", "application/json")],
                    format!(
                        r#"{{"score":{score},"matching_skills":[],"missing_skills":[],"missing_qualifications":[],"suggestions":[]}}"#
                    ),
                )
            }),
        );
        let origin = serve(router).await;
        let client = AnalysisClient::new(Client::new());

        let result = client
            .analyze(&ApiConfig::production(origin), &upload, "Platform engineer")
            .await
            .unwrap();

        assert_eq!(result.score, 100.0);
    }
}
