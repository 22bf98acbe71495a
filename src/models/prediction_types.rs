use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Body returned by `POST /predict`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PredictionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub prediction: Option<PredictionResult>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PredictionResult {
    pub predicted_class: String,
    pub confidence: f64,
    pub all_predictions: ClassScores,
}

/// Class name to probability, kept in the order the backend sent them.
///
/// The order matters: it is what breaks ties when ranking, so this is a
/// list of pairs rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassScores(pub Vec<(String, f64)>);

impl ClassScores {
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, p)| (name.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ClassScores {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        ClassScores(iter.into_iter().map(|(n, p)| (n.into(), p)).collect())
    }
}

impl<'de> Deserialize<'de> for ClassScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = ClassScores;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of class name to probability")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut scores = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, probability)) = map.next_entry::<String, f64>()? {
                    scores.push((name, probability));
                }
                Ok(ClassScores(scores))
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

impl Serialize for ClassScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(n, p)| (n, p)))
    }
}

/// One display-ready bar.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChartEntry {
    pub name: String,
    pub probability: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TopPrediction {
    pub class: String,
    pub confidence: f64,
}

/// Everything the result view needs, written by `predict --save` and read
/// back by `show`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub predictions: Vec<ChartEntry>,
    pub preview: String,
    #[serde(default)]
    pub top_prediction: Option<TopPrediction>,
}

/// Body returned by `GET /predictions`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LatestPredictions {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub predictions: Option<PredictionResult>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
