pub mod health_types;
pub mod prediction_types;
pub mod upload_types;
