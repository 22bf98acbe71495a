use crate::config::ClientConfig;
use crate::error::{AppError, ErrorKind};
use crate::models::health_types::ProbeOutcome;
use crate::services::api_base::ApiSession;
use crate::services::predict_client::PredictClient;

/// Probe the configured backend once and report which base a prediction
/// would go to. A failed probe is reported as `HealthCheckFailed`.
pub async fn check_backend(config: &ClientConfig) -> Result<(), AppError> {
    let client = PredictClient::new(config)?;
    let mut session = ApiSession::new(config);
    let configured = session.active_base().to_string();

    let outcome = client.check_health(&mut session).await;

    println!("Configured API: {}", configured);
    println!("Active API:     {}", session.active_base());
    if let Some(warning) = session.warning() {
        eprintln!("Warning: {}", warning);
    }

    match outcome {
        ProbeOutcome::Healthy(report) => {
            println!("Status:         {}", report.status.as_deref().unwrap_or("ok"));
            if let Some(message) = report.message {
                println!("Message:        {}", message);
            }
            if let Some(version) = report.version {
                println!("Version:        {}", version);
            }
            Ok(())
        }
        ProbeOutcome::Failed(reason) => Err(AppError::new(ErrorKind::HealthCheckFailed, reason)),
    }
}
