use crate::error::AppError;
use crate::models::prediction_types::{ChartEntry, TopPrediction};
use image::codecs::png::{CompressionType, PngEncoder};
use image::{ColorType, ImageEncoder};
use std::fmt::Write;
use std::path::Path;

pub const CHART_TITLE: &str = "Top 5 Matching Diseases";
pub const EMPTY_PLACEHOLDER: &str = "No predictions yet. Upload an image to get started.";
pub const LOADING_INDICATOR: &str = "Predicting...";

const BAR_WIDTH: usize = 40;
const TICKS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

// PNG layout
const PNG_WIDTH: u32 = 480;
const PNG_ROW: u32 = 48;
const PNG_BAR: u32 = 32;
const PNG_PAD: u32 = 16;
const BAR_COLOR: [u8; 3] = [0x19, 0x87, 0x54];
const GRID_COLOR: [u8; 3] = [0xdd, 0xdd, 0xdd];

/// Axis tick label: whole percent.
pub fn format_tick(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

/// Value readout next to a bar: two decimals.
pub fn format_readout(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Fraction of the fixed `[0,1]` axis a bar covers. Out-of-range values are
/// clamped for drawing only.
fn bar_fraction(probability: f64) -> f64 {
    if probability.is_nan() {
        return 0.0;
    }
    probability.clamp(0.0, 1.0)
}

/// Render a horizontal bar chart as terminal text.
///
/// With no entries this prints the progress indicator while `loading`, or
/// the placeholder otherwise; no axis is drawn.
pub fn render_text(entries: &[ChartEntry], loading: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", CHART_TITLE);

    if entries.is_empty() {
        let _ = writeln!(out, "{}", if loading { LOADING_INDICATOR } else { EMPTY_PLACEHOLDER });
        return out;
    }

    let label_width = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);

    for entry in entries {
        let filled = (bar_fraction(entry.probability) * BAR_WIDTH as f64).round() as usize;
        let _ = writeln!(
            out,
            "{:<label_width$} |{}{}| {:>7}",
            entry.name,
            "█".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            format_readout(entry.probability),
        );
    }

    // Tick labels positioned under the bar area.
    let mut axis = vec![b' '; BAR_WIDTH + 6];
    for tick in TICKS {
        let label = format_tick(tick);
        let center = 1 + (tick * BAR_WIDTH as f64).round() as usize;
        let start = center.saturating_sub(label.len() / 2).min(axis.len() - label.len());
        axis[start..start + label.len()].copy_from_slice(label.as_bytes());
    }
    let _ = writeln!(
        out,
        "{:<label_width$} {}",
        "",
        String::from_utf8_lossy(&axis).trim_end()
    );
    out
}

pub fn render_top_prediction(top: &TopPrediction) -> String {
    format!(
        "Top Prediction: {}\nConfidence: {}",
        top.class,
        format_readout(top.confidence)
    )
}

/// Draw the bars as a PNG: one row per entry, bar length on the fixed
/// `[0,1]` scale, light gridlines at each tick.
pub fn render_png(entries: &[ChartEntry]) -> Result<Vec<u8>, AppError> {
    if entries.is_empty() {
        return Err("Nothing to draw: no predictions".into());
    }

    let height = PNG_PAD * 2 + PNG_ROW * entries.len() as u32;
    let plot_width = PNG_WIDTH - PNG_PAD * 2;
    let mut raw = vec![255u8; (PNG_WIDTH * height * 4) as usize];

    let mut put = |x: u32, y: u32, rgb: [u8; 3]| {
        let idx = ((y * PNG_WIDTH + x) * 4) as usize;
        raw[idx..idx + 3].copy_from_slice(&rgb);
        raw[idx + 3] = 255;
    };

    for tick in TICKS {
        let x = PNG_PAD + ((plot_width - 1) as f64 * tick).round() as u32;
        for y in PNG_PAD..height - PNG_PAD {
            put(x, y, GRID_COLOR);
        }
    }

    for (row, entry) in entries.iter().enumerate() {
        let bar_len = (plot_width as f64 * bar_fraction(entry.probability)).round() as u32;
        let top = PNG_PAD + row as u32 * PNG_ROW + (PNG_ROW - PNG_BAR) / 2;
        for y in top..top + PNG_BAR {
            for x in PNG_PAD..PNG_PAD + bar_len {
                put(x, y, BAR_COLOR);
            }
        }
    }

    let mut png_bytes = Vec::with_capacity(raw.len() / 4);
    PngEncoder::new_with_quality(
        &mut png_bytes,
        CompressionType::Fast,
        image::codecs::png::FilterType::NoFilter,
    )
    .write_image(&raw, PNG_WIDTH, height, ColorType::Rgba8.into())?;

    Ok(png_bytes)
}

pub fn write_png(entries: &[ChartEntry], path: &Path) -> Result<(), AppError> {
    let bytes = render_png(entries)?;
    std::fs::write(path, bytes).map_err(|e| AppError {
        kind: crate::error::ErrorKind::Io,
        message: format!("Failed to write chart {}: {}", path.display(), e),
    })
}
