use serde::Serialize;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    FileSelected,
    Submitting,
    Success,
    Failed,
}

/// In-memory preview of the selected file. Never leaves the machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub id: u64,
    pub uri: String,
}
