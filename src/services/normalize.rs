use crate::config::TOP_K;
use crate::models::prediction_types::{ChartEntry, ClassScores, PredictionResult, TopPrediction};

/// Turn a raw model class name like `Tomato___Late_blight` into
/// `Tomato - Late blight`.
pub fn relabel(class_name: &str) -> String {
    class_name.replace("___", " - ").replace('_', " ")
}

/// Top `limit` classes by descending probability, relabeled for display.
/// Ties keep the order the backend sent them in.
pub fn top_entries(scores: &ClassScores, limit: usize) -> Vec<ChartEntry> {
    let mut ranked: Vec<(&str, f64)> = scores.iter().collect();
    // sort_by is stable; total_cmp keeps NaN from poisoning the order.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(limit)
        .map(|(name, probability)| ChartEntry {
            name: relabel(name),
            probability,
        })
        .collect()
}

pub fn chart_entries(result: &PredictionResult) -> Vec<ChartEntry> {
    top_entries(&result.all_predictions, TOP_K)
}

pub fn top_prediction(result: &PredictionResult) -> TopPrediction {
    TopPrediction {
        class: relabel(&result.predicted_class),
        confidence: result.confidence,
    }
}
