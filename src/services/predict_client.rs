use crate::config::{endpoint, ClientConfig};
use crate::error::AppError;
use crate::models::health_types::{HealthReport, ProbeOutcome};
use crate::models::prediction_types::{LatestPredictions, PredictionResponse, PredictionResult};
use crate::services::api_base::ApiSession;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;

/// HTTP side of the client: one health probe, one predict upload, and the
/// backend's "latest prediction" lookup. Every call is a single attempt.
#[derive(Clone)]
pub struct PredictClient {
    http: reqwest::Client,
    upload_field: String,
    health_timeout: Duration,
}

impl PredictClient {
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| AppError {
            kind: crate::error::ErrorKind::Internal,
            message: format!("Failed to build HTTP client: {}", e),
        })?;

        Ok(Self {
            http,
            upload_field: config.upload_field.clone(),
            health_timeout: config.health_timeout,
        })
    }

    /// Probe `<base>/health` under a deadline. When the deadline wins the
    /// request future is dropped, so a late response can never be observed.
    pub async fn probe_health(&self, base: &str) -> ProbeOutcome {
        let url = endpoint(base, "health");
        log::debug!("Probing {}", url);

        match tokio::time::timeout(self.health_timeout, self.fetch_health(&url)).await {
            Ok(Ok(report)) => ProbeOutcome::Healthy(report),
            Ok(Err(e)) => ProbeOutcome::Failed(e.message),
            Err(_) => ProbeOutcome::Failed(format!(
                "Health check timed out after {}s",
                self.health_timeout.as_secs_f64()
            )),
        }
    }

    async fn fetch_health(&self, url: &str) -> Result<HealthReport, AppError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::new(
                crate::error::ErrorKind::HealthCheckFailed,
                format!("Health check failed: {}", status.as_u16()),
            ));
        }
        let body = response.bytes().await?;
        // Liveness is the status code; the body is informational only.
        Ok(serde_json::from_slice(&body).unwrap_or_default())
    }

    /// Probe the session's active base and feed the outcome back into it.
    ///
    /// If the outcome switched the session to its fallback base, that base is
    /// checked once too, so an unreachable fallback is reported up front.
    /// Returns the last outcome.
    pub async fn check_health(&self, session: &mut ApiSession) -> ProbeOutcome {
        let generation = session.generation();
        let outcome = self.probe_once(session).await;
        if session.generation() == generation {
            return outcome;
        }
        self.probe_once(session).await
    }

    async fn probe_once(&self, session: &mut ApiSession) -> ProbeOutcome {
        let generation = session.generation();
        let base = session.active_base().to_string();
        let outcome = self.probe_health(&base).await;

        match &outcome {
            ProbeOutcome::Healthy(report) => log::info!(
                "Backend {} is up ({})",
                base,
                report.status.as_deref().unwrap_or("ok")
            ),
            ProbeOutcome::Failed(reason) => log::error!("Health check error: {}", reason),
        }

        session.apply_probe(generation, outcome.clone());
        if let Some(warning) = session.warning() {
            log::warn!("{}", warning);
        }
        outcome
    }

    /// Upload one image to `<base>/predict`.
    pub async fn predict(&self, base: &str, file_path: &Path) -> Result<PredictionResult, AppError> {
        let bytes = tokio::fs::read(file_path).await.map_err(|e| AppError {
            kind: crate::error::ErrorKind::Io,
            message: format!("Failed to read {}: {}", file_path.display(), e),
        })?;
        let file_name = file_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime_for(file_path))?;
        let form = Form::new().part(self.upload_field.clone(), part);

        let url = endpoint(base, "predict");
        log::info!("Sending {} to {} as field '{}'", file_name, url, self.upload_field);

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();
        log::debug!("Response status: {}", status);
        let body = response.bytes().await?;

        parse_predict_response(status, &body)
    }

    /// Fetch the last prediction the backend stored, if any.
    pub async fn latest(&self, base: &str) -> Result<Option<PredictionResult>, AppError> {
        let url = endpoint(base, "predictions");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(AppError::request_failed(format!(
                "Failed to get latest predictions: {} {}",
                status.as_u16(),
                backend_message(&body)
            )
            .trim_end()
            .to_string()));
        }

        let latest: LatestPredictions =
            serde_json::from_slice(&body).map_err(|_| AppError::invalid_response())?;
        if !latest.success {
            log::info!(
                "{}",
                latest.message.as_deref().unwrap_or("No predictions available yet")
            );
            return Ok(None);
        }
        latest.predictions.map(Some).ok_or_else(AppError::invalid_response)
    }
}

/// Validate a `/predict` reply. Only `success: true` with a `prediction`
/// object is usable; anything else is an error, never a partial result.
pub fn parse_predict_response(status: StatusCode, body: &[u8]) -> Result<PredictionResult, AppError> {
    if !status.is_success() {
        return Err(AppError::request_failed(
            format!(
                "Failed to get prediction: {} {}",
                status.as_u16(),
                backend_message(body)
            )
            .trim_end()
            .to_string(),
        ));
    }

    let response: PredictionResponse =
        serde_json::from_slice(body).map_err(|_| AppError::invalid_response())?;

    match response {
        PredictionResponse {
            success: true,
            prediction: Some(prediction),
            ..
        } => Ok(prediction),
        PredictionResponse { error, .. } => {
            if let Some(e) = error {
                log::error!("Prediction failed: {}", e);
            }
            Err(AppError::invalid_response())
        }
    }
}

/// Best-effort human message out of an error body: its `error` string, or
/// the JSON itself, or nothing when the body isn't JSON.
fn backend_message(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(json) => match json.get("error").and_then(|e| e.as_str()) {
            Some(msg) => msg.to_string(),
            None => json.to_string(),
        },
        Err(_) => String::new(),
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}
