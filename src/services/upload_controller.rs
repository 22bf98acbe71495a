use crate::error::{AppError, ErrorKind};
use crate::models::prediction_types::{ChartEntry, NavigationState, PredictionResult, TopPrediction};
use crate::models::upload_types::{Preview, UploadPhase};
use crate::services::{normalize, preview_service};
use std::path::{Path, PathBuf};

/// Transient upload state for one session: the selected file, its local
/// preview, the in-flight flag, and whatever came back last.
///
/// Only this type mutates the state, and only in response to discrete
/// events (select, submit, completion).
#[derive(Debug)]
pub struct UploadController {
    phase: UploadPhase,
    selected_file: Option<PathBuf>,
    preview: Option<Preview>,
    predictions: Vec<ChartEntry>,
    top_prediction: Option<TopPrediction>,
    error: Option<AppError>,
    next_preview_id: u64,
    live_previews: usize,
}

impl Default for UploadController {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadController {
    pub fn new() -> Self {
        Self {
            phase: UploadPhase::Idle,
            selected_file: None,
            preview: None,
            predictions: Vec::new(),
            top_prediction: None,
            error: None,
            next_preview_id: 1,
            live_previews: 0,
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn predictions(&self) -> &[ChartEntry] {
        &self.predictions
    }

    pub fn top_prediction(&self) -> Option<&TopPrediction> {
        self.top_prediction.as_ref()
    }

    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == UploadPhase::Submitting
    }

    /// Previews created and not yet revoked. Never more than one.
    pub fn live_previews(&self) -> usize {
        self.live_previews
    }

    /// Select a file, replacing any previous selection and its preview.
    ///
    /// Any file is accepted. A preview that can't be generated just leaves
    /// the selection without one.
    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if self.is_loading() {
            log::warn!("Ignoring selection of {} while a request is in flight", path.display());
            return;
        }

        self.revoke_preview();

        if !preview_service::is_image_file(&path) {
            log::info!("{} does not look like an image; the backend will decide", path.display());
        }

        match preview_service::generate_preview(&path) {
            Ok(uri) => {
                let id = self.next_preview_id;
                self.next_preview_id += 1;
                self.live_previews += 1;
                log::debug!("Created preview #{} for {}", id, path.display());
                self.preview = Some(Preview { id, uri });
            }
            Err(e) => log::warn!("No preview for {}: {}", path.display(), e),
        }

        self.selected_file = Some(path);
        self.phase = UploadPhase::FileSelected;
    }

    /// Drop the selection and its preview.
    pub fn clear(&mut self) {
        if self.is_loading() {
            return;
        }
        self.revoke_preview();
        self.selected_file = None;
        self.predictions.clear();
        self.top_prediction = None;
        self.error = None;
        self.phase = UploadPhase::Idle;
    }

    fn revoke_preview(&mut self) {
        if let Some(old) = self.preview.take() {
            self.live_previews -= 1;
            log::debug!("Revoked preview #{}", old.id);
        }
    }

    pub fn can_submit(&self) -> bool {
        self.selected_file.is_some() && !self.is_loading()
    }

    /// Enter `Submitting` and hand back the file to upload. Earlier
    /// predictions and errors are cleared before the request starts.
    pub fn begin_submit(&mut self) -> Result<PathBuf, AppError> {
        let Some(path) = self.selected_file.clone() else {
            let err = AppError::no_file_selected();
            self.error = Some(err.clone());
            return Err(err);
        };
        if self.is_loading() {
            return Err(AppError::new(ErrorKind::Internal, "A prediction is already in progress"));
        }

        self.phase = UploadPhase::Submitting;
        self.predictions.clear();
        self.top_prediction = None;
        self.error = None;
        Ok(path)
    }

    pub fn finish_success(&mut self, result: &PredictionResult) {
        self.predictions = normalize::chart_entries(result);
        self.top_prediction = Some(normalize::top_prediction(result));
        self.error = None;
        self.phase = UploadPhase::Success;
    }

    pub fn finish_failure(&mut self, err: AppError) {
        self.predictions.clear();
        self.top_prediction = None;
        self.error = Some(err);
        self.phase = UploadPhase::Failed;
    }

    /// Snapshot for the result view. `None` until a prediction succeeded.
    /// Without a decoded preview the image is referenced by its file URI.
    pub fn navigation_state(&self) -> Option<NavigationState> {
        if self.phase != UploadPhase::Success {
            return None;
        }
        let preview = match (&self.preview, &self.selected_file) {
            (Some(p), _) => p.uri.clone(),
            (None, Some(path)) => preview_service::file_uri(path),
            (None, None) => return None,
        };
        Some(NavigationState {
            predictions: self.predictions.clone(),
            preview,
            top_prediction: self.top_prediction.clone(),
        })
    }
}
