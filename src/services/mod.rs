pub mod api_base;
pub mod chart_render;
pub mod normalize;
pub mod predict_client;
pub mod preview_service;
pub mod upload_controller;
