use serde::{Deserialize, Serialize};

/// Processing state of a bundle.
///
/// Transitions run `Stored → Extracted → Parsed`, with `Failed` reachable
/// from any in-progress step. `Parsed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BundleStatus {
    /// Uploaded artifact is on disk, nothing else has happened yet.
    Stored,
    /// Top-level extraction succeeded; parsing is underway.
    Extracted,
    /// The full walk completed without an unrecoverable error.
    Parsed,
    /// An unrecoverable error stopped the run; see the bundle's message.
    Failed,
}

impl BundleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleStatus::Stored => "Stored",
            BundleStatus::Extracted => "Extracted",
            BundleStatus::Parsed => "Parsed",
            BundleStatus::Failed => "Failed",
        }
    }

    /// No transition leaves `Parsed` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BundleStatus::Parsed | BundleStatus::Failed)
    }
}

impl std::fmt::Display for BundleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
