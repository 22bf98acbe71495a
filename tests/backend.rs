use actix_web::{web, App, HttpResponse, HttpServer};
use image::{Rgb, RgbImage};
use leaf_lens_lib::commands::{predict, show};
use leaf_lens_lib::config::ClientConfig;
use leaf_lens_lib::error::ErrorKind;
use leaf_lens_lib::models::health_types::ProbeOutcome;
use leaf_lens_lib::services::api_base::ApiSession;
use leaf_lens_lib::services::predict_client::PredictClient;
use leaf_lens_lib::services::upload_controller::UploadController;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How the fake classifier behaves.
#[derive(Clone, Copy)]
enum Backend {
    Healthy,
    Broken,
    SlowHealth,
    BadShape,
}

async fn health(backend: web::Data<Backend>) -> HttpResponse {
    match **backend {
        Backend::Broken => HttpResponse::ServiceUnavailable().finish(),
        Backend::SlowHealth => {
            actix_web::rt::time::sleep(Duration::from_secs(3)).await;
            HttpResponse::Ok().json(json!({"status": "healthy"}))
        }
        _ => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "message": "Leaf Disease Detection API is running",
            "version": "2.0"
        })),
    }
}

async fn classify(backend: web::Data<Backend>, body: web::Bytes) -> HttpResponse {
    match **backend {
        Backend::Broken => HttpResponse::InternalServerError()
            .json(json!({"error": "Prediction failed: boom"})),
        Backend::BadShape => HttpResponse::Ok().json(json!({"success": false, "error": "no model"})),
        _ => {
            let text = String::from_utf8_lossy(&body);
            if !text.contains("name=\"file\"") {
                return HttpResponse::BadRequest().json(json!({"error": "No file provided"}));
            }
            // Raw body so the class order on the wire is exactly this.
            HttpResponse::Ok().content_type("application/json").body(
                r#"{"success": true, "model_source": "Hugging Face", "prediction": {
                    "predicted_class": "Tomato___Late_blight",
                    "confidence": 0.8123,
                    "all_predictions": {
                        "Tomato___healthy": 0.05,
                        "Tomato___Late_blight": 0.8123,
                        "Tomato___Early_blight": 0.05,
                        "Potato___Late_blight": 0.04,
                        "Tomato___Leaf_Mold": 0.03,
                        "Apple___scab": 0.0177
                    }
                }}"#,
            )
        }
    }
}

async fn latest(backend: web::Data<Backend>) -> HttpResponse {
    match **backend {
        Backend::Healthy => HttpResponse::Ok().json(json!({
            "success": true,
            "predictions": {
                "predicted_class": "Apple___scab",
                "confidence": 0.6,
                "all_predictions": {"Apple___scab": 0.6, "Apple___healthy": 0.4}
            }
        })),
        _ => HttpResponse::Ok().json(json!({"success": false, "message": "No predictions available yet"})),
    }
}

fn start(backend: Backend) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(backend))
            .route("/health", web::get().to(health))
            .route("/predict", web::post().to(classify))
            .route("/predictions", web::get().to(latest))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let port = server.addrs()[0].port();
    actix_web::rt::spawn(server.run());
    format!("http://127.0.0.1:{}", port)
}

fn closed_port() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn leaf_image(dir: &Path) -> PathBuf {
    let path = dir.join("leaf.png");
    RgbImage::from_pixel(32, 32, Rgb([40, 150, 60])).save(&path).unwrap();
    path
}

fn config_for(base: &str, fallback: &str) -> ClientConfig {
    let mut config = ClientConfig::new(Some(base));
    config.fallback_base = fallback.to_string();
    config.health_timeout = Duration::from_millis(500);
    config
}

#[actix_web::test]
async fn test_health_probe_clears_warning() {
    let base = start(Backend::Healthy);
    let config = config_for(&base, &base);
    let client = PredictClient::new(&config).unwrap();
    let mut session = ApiSession::new(&config);

    match client.check_health(&mut session).await {
        ProbeOutcome::Healthy(report) => assert_eq!(report.status.as_deref(), Some("healthy")),
        other => panic!("expected healthy, got {:?}", other),
    }
    assert!(session.warning().is_none());
    assert_eq!(session.active_base(), base);
}

#[actix_web::test]
async fn test_loopback_failure_falls_back_and_predicts() {
    let broken = start(Backend::Broken);
    let healthy = start(Backend::Healthy);
    let config = config_for(&broken, &healthy);
    let client = PredictClient::new(&config).unwrap();
    let mut session = ApiSession::new(&config);

    // The fallback is checked right after the switch; it is up, so the
    // warning about the dead loopback base is cleared again.
    let outcome = client.check_health(&mut session).await;
    assert!(matches!(outcome, ProbeOutcome::Healthy(_)));
    assert_eq!(session.active_base(), healthy);
    assert_eq!(session.generation(), 1);
    assert!(session.warning().is_none());

    let dir = tempfile::tempdir().unwrap();
    let mut controller = UploadController::new();
    controller.select_file(leaf_image(dir.path()));
    let path = controller.begin_submit().unwrap();
    let result = client.predict(session.active_base(), &path).await.unwrap();
    controller.finish_success(&result);

    let names: Vec<&str> = controller.predictions().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Tomato - Late blight",
            "Tomato - healthy",
            "Tomato - Early blight",
            "Potato - Late blight",
            "Tomato - Leaf Mold"
        ]
    );
    let top = controller.top_prediction().unwrap();
    assert_eq!(top.class, "Tomato - Late blight");
    assert_eq!(top.confidence, 0.8123);
}

#[actix_web::test]
async fn test_unreachable_fallback_is_reported() {
    let broken = start(Backend::Broken);
    let fallback = closed_port();
    let config = config_for(&broken, &fallback);
    let client = PredictClient::new(&config).unwrap();
    let mut session = ApiSession::new(&config);

    let outcome = client.check_health(&mut session).await;
    assert!(matches!(outcome, ProbeOutcome::Failed(_)));
    assert_eq!(session.active_base(), fallback);
    assert_eq!(session.generation(), 1);
    let warning = session.warning().unwrap();
    assert!(warning.contains(&fallback), "{}", warning);
    assert!(!warning.contains("Falling back"), "{}", warning);
}

#[actix_web::test]
async fn test_slow_health_times_out() {
    let slow = start(Backend::SlowHealth);
    let mut config = config_for(&slow, &slow);
    config.health_timeout = Duration::from_millis(200);
    let client = PredictClient::new(&config).unwrap();

    match client.probe_health(&slow).await {
        ProbeOutcome::Failed(reason) => assert!(reason.contains("timed out"), "{}", reason),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[actix_web::test]
async fn test_error_status_surfaces_backend_message() {
    let broken = start(Backend::Broken);
    let config = config_for(&broken, &broken);
    let client = PredictClient::new(&config).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let err = client.predict(&broken, &leaf_image(dir.path())).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RequestFailed);
    assert_eq!(err.message, "Failed to get prediction: 500 Prediction failed: boom");
}

#[actix_web::test]
async fn test_wrong_upload_field_is_rejected_by_backend() {
    let base = start(Backend::Healthy);
    let mut config = config_for(&base, &base);
    config.upload_field = "image".to_string();
    let client = PredictClient::new(&config).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let err = client.predict(&base, &leaf_image(dir.path())).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RequestFailed);
    assert!(err.message.ends_with("400 No file provided"));
}

#[actix_web::test]
async fn test_bad_shape_never_populates_chart() {
    let base = start(Backend::BadShape);
    let config = config_for(&base, &base);
    let client = PredictClient::new(&config).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut controller = UploadController::new();
    controller.select_file(leaf_image(dir.path()));
    let path = controller.begin_submit().unwrap();
    match client.predict(&base, &path).await {
        Ok(result) => controller.finish_success(&result),
        Err(e) => controller.finish_failure(e),
    }

    assert!(controller.predictions().is_empty());
    assert_eq!(controller.error().unwrap().kind, ErrorKind::InvalidResponseShape);
    assert!(!controller.is_loading());
}

#[actix_web::test]
async fn test_network_failure_resets_loading() {
    let base = closed_port();
    let config = config_for(&base, &base);
    let client = PredictClient::new(&config).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut controller = UploadController::new();
    controller.select_file(leaf_image(dir.path()));
    let path = controller.begin_submit().unwrap();
    let err = client.predict(&base, &path).await.unwrap_err();
    controller.finish_failure(err);

    assert_eq!(controller.error().unwrap().kind, ErrorKind::RequestFailed);
    assert!(!controller.is_loading());
    assert!(controller.predictions().is_empty());
    assert!(controller.can_submit());
}

#[actix_web::test]
async fn test_latest_predictions() {
    let healthy = start(Backend::Healthy);
    let empty = start(Backend::BadShape);
    let config = config_for(&healthy, &healthy);
    let client = PredictClient::new(&config).unwrap();

    let result = client.latest(&healthy).await.unwrap().unwrap();
    assert_eq!(result.predicted_class, "Apple___scab");
    assert!(client.latest(&empty).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_predict_command_saves_result_view() {
    let base = start(Backend::Healthy);
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(&base, &base);
    config.save_path = Some(dir.path().join("result.json"));
    config.png_path = Some(dir.path().join("chart.png"));

    predict::predict_images(&config, &[leaf_image(dir.path())], false)
        .await
        .unwrap();

    let state = show::load_state(&dir.path().join("result.json")).unwrap();
    assert_eq!(state.predictions.len(), 5);
    assert!(state.preview.starts_with("data:image/jpeg;base64,"));
    assert_eq!(state.top_prediction.unwrap().class, "Tomato - Late blight");

    let chart = image::open(dir.path().join("chart.png")).unwrap();
    assert!(chart.height() > 0);
}

#[actix_web::test]
async fn test_undecodable_image_result_can_be_shown() {
    let base = start(Backend::Healthy);
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("leaf.heic");
    std::fs::write(&image, b"ftypheic but not really").unwrap();
    let mut config = config_for(&base, &base);
    config.save_path = Some(dir.path().join("result.json"));

    predict::predict_images(&config, &[image], true).await.unwrap();

    let state = show::load_state(&dir.path().join("result.json")).unwrap();
    assert!(state.preview.starts_with("file://"));
    assert_eq!(state.predictions.len(), 5);

    let view = show::render_view(Some(&state));
    assert!(!view.contains(show::NO_DATA), "{}", view);
    assert!(view.contains("Top Prediction: Tomato - Late blight"));
    assert!(view.contains(&format!("Preview: {}", state.preview)));
}

#[actix_web::test]
async fn test_same_file_names_get_separate_outputs() {
    let base = start(Backend::Healthy);
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a");
    let second = dir.path().join("b");
    std::fs::create_dir_all(&first).unwrap();
    std::fs::create_dir_all(&second).unwrap();
    let images = [leaf_image(&first), leaf_image(&second)];

    let mut config = config_for(&base, &base);
    config.save_path = Some(dir.path().join("r.json"));
    predict::predict_images(&config, &images, true).await.unwrap();

    assert!(show::load_state(&dir.path().join("r-1-leaf.json")).is_some());
    assert!(show::load_state(&dir.path().join("r-2-leaf.json")).is_some());
    assert!(!dir.path().join("r.json").exists());
}
