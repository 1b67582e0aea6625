//! Progress reporting for long conversions.
//!
//! Marks: [`CACHE_HIT`] when dispatch reuses an instance,
//! [`TESSELLATED`] after each instance mesh.

use std::io::Write;
use std::sync::Mutex;

/// Emitted when a shape resolves to an existing instance.
pub const CACHE_HIT: char = '-';

/// Emitted after an instance was meshed.
pub const TESSELLATED: char = '+';

/// Observer of pipeline progress. Called from tessellation workers, hence
/// `Sync`.
pub trait Progress: Sync {
    fn update(&self, mark: char);
}

/// Prints marks to stdout without newlines.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn update(&self, mark: char) {
        let mut stdout = std::io::stdout().lock();
        // Progress output is best effort
        let _ = write!(stdout, "{mark}");
        let _ = stdout.flush();
    }
}

/// Collects marks in memory.
///
/// # Example
///
/// ```rust
/// use cad_scene::progress::{Progress, RecordedProgress};
///
/// let progress = RecordedProgress::default();
/// progress.update('+');
/// assert_eq!(progress.marks(), "+");
/// ```
#[derive(Debug, Default)]
pub struct RecordedProgress {
    marks: Mutex<String>,
}

impl RecordedProgress {
    pub fn marks(&self) -> String {
        self.marks
            .lock()
            .map(|m| m.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Progress for RecordedProgress {
    fn update(&self, mark: char) {
        match self.marks.lock() {
            Ok(mut marks) => marks.push(mark),
            Err(poisoned) => poisoned.into_inner().push(mark),
        }
    }
}
