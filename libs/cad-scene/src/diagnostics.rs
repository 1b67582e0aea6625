//! # Diagnostics
//!
//! Recoverable conditions observed while converting and tessellating.
//! Each entry is logged when recorded and kept for the caller.

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A bounding box was void and replaced by a micro box.
    VoidGeometry,
    /// A value was dropped from the scene tree.
    SkippedValue,
}

/// A recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// Name of the slot the value occupied
    pub slot: Option<String>,
}

impl Diagnostic {
    pub fn void_geometry(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            kind: DiagnosticKind::VoidGeometry,
            message,
            slot: None,
        }
    }

    pub fn skipped_value(message: String, slot: Option<String>) -> Self {
        Self {
            severity: Severity::Info,
            kind: DiagnosticKind::SkippedValue,
            message,
            slot,
        }
    }
}

/// Thread safe diagnostics sink.
///
/// # Example
///
/// ```rust
/// use cad_scene::{Diagnostic, Diagnostics, DiagnosticKind};
///
/// let diagnostics = Diagnostics::new();
/// diagnostics.push(Diagnostic::void_geometry("empty compound".to_string()));
/// assert_eq!(diagnostics.count(DiagnosticKind::VoidGeometry), 1);
/// ```
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and records a diagnostic.
    pub fn push(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => log::warn!("{}", diagnostic.message),
            Severity::Info => log::info!("{}", diagnostic.message),
        }
        self.lock().push(diagnostic);
    }

    /// Snapshot of all entries, in recording order.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Number of entries of one kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.lock().iter().filter(|d| d.kind == kind).count()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Moves every entry of `other` into this sink.
    pub fn absorb(&self, other: Diagnostics) {
        let moved = other.into_entries();
        self.lock().extend(moved);
    }

    /// Consumes the sink.
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Poisoned locks are recovered
    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
