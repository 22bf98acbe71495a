use crate::config::ClientConfig;
use crate::models::health_types::ProbeOutcome;

/// Loopback bases are a development-time signal: if one is unreachable we
/// assume a dev server that isn't running and switch to the remote default.
pub fn looks_local(base: &str) -> bool {
    base.contains("localhost") || base.contains("127.0.0.1")
}

/// Session-scoped view of which backend is in use. Lives for one run of the
/// client and is never persisted.
#[derive(Debug, Clone)]
pub struct ApiSession {
    active_base: String,
    fallback_base: String,
    warning: Option<String>,
    generation: u64,
}

impl ApiSession {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            active_base: config.api_base.clone(),
            fallback_base: config.fallback_base.clone(),
            warning: None,
            generation: 0,
        }
    }

    pub fn active_base(&self) -> &str {
        &self.active_base
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Generation a probe must be tagged with for its outcome to count.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply a finished probe. Outcomes tagged with an older generation are
    /// dropped; returns whether the outcome was applied.
    pub fn apply_probe(&mut self, generation: u64, outcome: ProbeOutcome) -> bool {
        if generation != self.generation {
            log::debug!(
                "Discarding stale health probe (generation {} != {})",
                generation,
                self.generation
            );
            return false;
        }

        match outcome {
            ProbeOutcome::Healthy(_) => {
                self.warning = None;
            }
            ProbeOutcome::Failed(reason) => {
                let original = self.active_base.clone();
                if looks_local(&original) && original != self.fallback_base {
                    self.active_base = self.fallback_base.clone();
                    self.generation += 1;
                    self.warning = Some(format!(
                        "Can't reach backend at {}. Falling back to {}. {}",
                        original, self.fallback_base, reason
                    ));
                } else {
                    self.warning = Some(format!("Can't reach backend at {}. {}", original, reason));
                }
            }
        }
        true
    }
}
