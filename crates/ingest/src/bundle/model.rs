use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::status::BundleStatus;

/// One uploaded artifact (file or archive) with its own status lifecycle.
///
/// Created by the intake path with `status = Stored`; mutated exclusively
/// by the pipeline as processing advances. `id`, `original_name`,
/// `stored_path` and `created_at` never change after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    /// Opaque unique identifier, assigned at creation.
    pub id: String,
    /// Display filename of the uploaded artifact.
    pub original_name: String,
    /// Absolute location of the originally saved artifact.
    pub stored_path: PathBuf,
    /// Extraction root, set once top-level extraction succeeds.
    pub extracted_path: Option<PathBuf>,
    pub status: BundleStatus,
    pub created_at: NaiveDateTime,
    /// Human-readable failure detail; present only when `status = Failed`.
    pub message: Option<String>,
}

impl Bundle {
    /// Create a freshly stored bundle record.
    pub fn stored(id: String, original_name: String, stored_path: PathBuf) -> Self {
        Self {
            id,
            original_name,
            stored_path,
            extracted_path: None,
            status: BundleStatus::Stored,
            created_at: chrono::Local::now().naive_local(),
            message: None,
        }
    }
}
