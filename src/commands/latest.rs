use crate::config::ClientConfig;
use crate::error::AppError;
use crate::services::api_base::ApiSession;
use crate::services::chart_render;
use crate::services::normalize;
use crate::services::predict_client::PredictClient;

/// Show the last prediction the backend stored, without uploading anything.
pub async fn show_latest(config: &ClientConfig, skip_health: bool) -> Result<(), AppError> {
    let client = PredictClient::new(config)?;
    let mut session = ApiSession::new(config);
    if !skip_health {
        client.check_health(&mut session).await;
        if let Some(warning) = session.warning() {
            eprintln!("Warning: {}", warning);
        }
    }

    println!("Using API: {}", session.active_base());
    match client.latest(session.active_base()).await? {
        Some(result) => {
            print!("{}", chart_render::render_text(&normalize::chart_entries(&result), false));
            println!(
                "{}",
                chart_render::render_top_prediction(&normalize::top_prediction(&result))
            );
        }
        None => print!("{}", chart_render::render_text(&[], false)),
    }
    Ok(())
}
