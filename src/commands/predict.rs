use crate::config::ClientConfig;
use crate::error::AppError;
use crate::services::api_base::ApiSession;
use crate::services::chart_render;
use crate::services::predict_client::PredictClient;
use crate::services::upload_controller::UploadController;
use std::path::{Path, PathBuf};

/// Probe the backend, then upload each image in turn and chart the result.
///
/// Images are submitted one at a time; a new selection replaces the previous
/// one and its preview. Returns the last failure, if any, after every image
/// has been tried.
pub async fn predict_images(
    config: &ClientConfig,
    images: &[PathBuf],
    skip_health: bool,
) -> Result<(), AppError> {
    let client = PredictClient::new(config)?;
    let mut session = ApiSession::new(config);
    log::info!("API base: {}", session.active_base());

    if !skip_health {
        client.check_health(&mut session).await;
        if let Some(warning) = session.warning() {
            eprintln!("Warning: {}", warning);
        }
    }

    let mut controller = UploadController::new();
    let mut last_error = None;

    for (index, image) in images.iter().enumerate() {
        controller.select_file(image.clone());
        let path = controller.begin_submit()?;
        println!("{}", path.display());
        println!("Using API: {}", session.active_base());
        print!("{}", chart_render::render_text(controller.predictions(), controller.is_loading()));

        match client.predict(session.active_base(), &path).await {
            Ok(result) => {
                controller.finish_success(&result);
                print!("{}", chart_render::render_text(controller.predictions(), false));
                if let Some(top) = controller.top_prediction() {
                    println!("{}", chart_render::render_top_prediction(top));
                }
                if let Err(e) = write_outputs(config, &controller, (images.len() > 1).then_some(index)) {
                    eprintln!("Error: {}", e);
                    last_error = Some(e);
                }
            }
            Err(e) => {
                log::error!("Upload error: {}", e);
                controller.finish_failure(e.clone());
                eprintln!("Error: {}", e);
                last_error = Some(e);
            }
        }
        println!();
    }

    match last_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Write the PNG chart and result state for the current success, if asked.
/// With several images each output is suffixed by the image's 1-based
/// position and file stem, so equal file names in different folders don't
/// overwrite each other.
fn write_outputs(
    config: &ClientConfig,
    controller: &UploadController,
    index: Option<usize>,
) -> Result<(), AppError> {
    let suffix = index.map(|i| {
        let stem = controller
            .selected_file()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        format!("{}-{}", i + 1, stem)
    });
    let target_for = |path: &PathBuf| match &suffix {
        Some(suffix) => suffixed(path, suffix),
        None => path.clone(),
    };

    if let Some(png) = &config.png_path {
        let target = target_for(png);
        if controller.predictions().is_empty() {
            log::info!("No predictions to draw; skipping {}", target.display());
        } else {
            chart_render::write_png(controller.predictions(), &target)?;
            log::info!("Chart written to {}", target.display());
        }
    }

    if let Some(save) = &config.save_path {
        let target = target_for(save);
        if let Some(state) = controller.navigation_state() {
            let json = serde_json::to_string_pretty(&state)?;
            std::fs::write(&target, json).map_err(|e| AppError {
                kind: crate::error::ErrorKind::Io,
                message: format!("Failed to save result {}: {}", target.display(), e),
            })?;
            log::info!("Result saved to {}", target.display());
        }
    }
    Ok(())
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let base = path.file_stem().unwrap_or_default().to_string_lossy();
    let name = match path.extension() {
        Some(ext) => format!("{}-{}.{}", base, suffix, ext.to_string_lossy()),
        None => format!("{}-{}", base, suffix),
    };
    path.with_file_name(name)
}
