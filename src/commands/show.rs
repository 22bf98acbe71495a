use crate::models::prediction_types::NavigationState;
use crate::services::chart_render;
use std::fmt::Write;
use std::path::Path;

pub const NO_DATA: &str = "No prediction data found.";

/// Read saved result state. Anything missing or malformed reads as `None`;
/// the view never fails on bad input.
pub fn load_state(path: &Path) -> Option<NavigationState> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::debug!("No result state at {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            log::debug!("Unreadable result state {}: {}", path.display(), e);
            None
        }
    }
}

/// Render the result view for saved state, or the "no data" placeholder.
pub fn render_view(state: Option<&NavigationState>) -> String {
    let mut out = String::new();
    let state = match state {
        Some(s) if !s.preview.is_empty() => s,
        _ => {
            let _ = writeln!(out, "{}", NO_DATA);
            let _ = writeln!(out, "Go back: leaf-lens predict <image>");
            return out;
        }
    };

    if state.preview.starts_with("data:") {
        let _ = writeln!(out, "Preview: {} bytes (embedded)", state.preview.len());
    } else {
        let _ = writeln!(out, "Preview: {}", state.preview);
    }
    if let Some(top) = &state.top_prediction {
        let _ = writeln!(out, "{}", chart_render::render_top_prediction(top));
    }
    out.push_str(&chart_render::render_text(&state.predictions, false));
    let _ = writeln!(out, "Upload another: leaf-lens predict <image>");
    out
}

pub fn show_result(path: &Path) {
    print!("{}", render_view(load_state(path).as_ref()));
}
