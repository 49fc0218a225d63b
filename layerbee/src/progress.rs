//! Learner progress: completed modules, logged prints, solved problems and
//! printer setup.

use crate::errors::Result;
use crate::storage::{load_json, save_json, KeyValueStore, PROGRESS_KEY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Number of course modules.
pub const TOTAL_MODULES: u32 = 5;

/// Persisted learner progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Completed module ids, in completion order.
    #[serde(default)]
    pub completed: Vec<String>,
    /// Number of prints the learner logged.
    #[serde(default)]
    pub prints_logged: u32,
    /// Number of problems solved with the tutor.
    #[serde(default)]
    pub problems_solved: u32,
    /// Printer model; empty if never set.
    #[serde(default)]
    pub printer_type: String,
    /// Slicer name; empty if never set.
    #[serde(default)]
    pub slicer: String,
}

impl Progress {
    /// Whole-course completion in percent, rounded.
    #[must_use]
    pub fn percent_complete(&self) -> u32 {
        let done = u32::try_from(self.completed.len())
            .unwrap_or(u32::MAX)
            .min(TOTAL_MODULES);
        done * 100 / TOTAL_MODULES
    }

    /// Returns true if `module_id` is completed.
    #[must_use]
    pub fn is_completed(&self, module_id: &str) -> bool {
        self.completed.iter().any(|m| m == module_id)
    }
}

/// Read-only view of progress used by the tutor.
pub trait ProgressSource: Send + Sync {
    /// Returns the current progress. Never fails; unreadable data reads as
    /// empty progress.
    fn load(&self) -> Progress;
}

/// Reads and updates [`Progress`] in a [`KeyValueStore`].
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker").finish_non_exhaustive()
    }
}

impl ProgressTracker {
    /// Creates a tracker over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads progress.
    ///
    /// # Errors
    ///
    /// Fails if the store fails or holds invalid JSON.
    pub fn get(&self) -> Result<Progress> {
        Ok(load_json(self.store.as_ref(), PROGRESS_KEY)?.unwrap_or_default())
    }

    /// Writes progress.
    ///
    /// # Errors
    ///
    /// Fails if the store fails.
    pub fn save(&self, progress: &Progress) -> Result<()> {
        save_json(self.store.as_ref(), PROGRESS_KEY, progress)
    }

    /// Marks a module completed. Returns false if it already was.
    ///
    /// # Errors
    ///
    /// Fails if the store fails.
    pub fn mark_module_complete(&self, module_id: &str) -> Result<bool> {
        let mut progress = self.get()?;
        if progress.is_completed(module_id) {
            return Ok(false);
        }
        progress.completed.push(module_id.to_string());
        self.save(&progress)?;
        info!(module = module_id, "Module marked as complete");
        Ok(true)
    }

    /// Increments the logged print count.
    ///
    /// # Errors
    ///
    /// Fails if the store fails.
    pub fn log_print(&self) -> Result<u32> {
        self.update(|p| {
            p.prints_logged += 1;
            p.prints_logged
        })
    }

    /// Increments the solved problem count.
    ///
    /// # Errors
    ///
    /// Fails if the store fails.
    pub fn log_problem_solved(&self) -> Result<u32> {
        self.update(|p| {
            p.problems_solved += 1;
            p.problems_solved
        })
    }

    /// Saves the learner's printer and slicer.
    ///
    /// # Errors
    ///
    /// Fails if the store fails.
    pub fn save_setup(&self, printer_type: &str, slicer: &str) -> Result<()> {
        self.update(|p| {
            p.printer_type = printer_type.trim().to_string();
            p.slicer = slicer.trim().to_string();
        })
    }

    fn update<T>(&self, f: impl FnOnce(&mut Progress) -> T) -> Result<T> {
        let mut progress = self.get()?;
        let out = f(&mut progress);
        self.save(&progress)?;
        Ok(out)
    }
}

impl ProgressSource for ProgressTracker {
    fn load(&self) -> Progress {
        self.get().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read progress, starting fresh");
            Progress::default()
        })
    }
}

/// Module id for a page path, used when a learner reaches the end of a
/// module page.
#[must_use]
pub fn module_id_for_path(path: &str) -> Option<&'static str> {
    ["basics", "workflow", "troubleshoot", "advanced", "business"]
        .into_iter()
        .find(|id| path.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn tracker() -> ProgressTracker {
        ProgressTracker::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_empty_progress() {
        let progress = tracker().get().unwrap();
        assert_eq!(progress, Progress::default());
        assert_eq!(progress.percent_complete(), 0);
    }

    #[test]
    fn test_mark_module_complete_is_idempotent() {
        let t = tracker();
        assert!(t.mark_module_complete("basics").unwrap());
        assert!(!t.mark_module_complete("basics").unwrap());
        assert!(t.mark_module_complete("workflow").unwrap());

        assert_eq!(t.get().unwrap().completed, vec!["basics", "workflow"]);
    }

    #[test]
    fn test_percent_complete() {
        let mut p = Progress::default();
        p.completed = vec!["a".into()];
        assert_eq!(p.percent_complete(), 20);
        p.completed = vec!["a".into(), "b".into(), "c".into()];
        assert_eq!(p.percent_complete(), 60);
        p.completed = (0..5).map(|i| i.to_string()).collect();
        assert_eq!(p.percent_complete(), 100);
    }

    #[test]
    fn test_counters() {
        let t = tracker();
        assert_eq!(t.log_print().unwrap(), 1);
        assert_eq!(t.log_print().unwrap(), 2);
        assert_eq!(t.log_problem_solved().unwrap(), 1);

        let p = t.get().unwrap();
        assert_eq!(p.prints_logged, 2);
        assert_eq!(p.problems_solved, 1);
    }

    #[test]
    fn test_save_setup() {
        let t = tracker();
        t.save_setup(" Bambu A1 mini ", "Bambu Studio").unwrap();
        let p = t.get().unwrap();
        assert_eq!(p.printer_type, "Bambu A1 mini");
        assert_eq!(p.slicer, "Bambu Studio");
    }

    #[test]
    fn test_browser_field_names() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                PROGRESS_KEY,
                r#"{"completed":["basics"],"printsLogged":3,"printerType":"Ender 3"}"#,
            )
            .unwrap();
        let p = ProgressTracker::new(store).get().unwrap();
        assert_eq!(p.prints_logged, 3);
        assert_eq!(p.printer_type, "Ender 3");
        assert_eq!(p.slicer, "");
    }

    #[test]
    fn test_corrupt_progress_loads_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(PROGRESS_KEY, "{oops").unwrap();
        let t = ProgressTracker::new(store);
        assert!(t.get().is_err());
        assert_eq!(t.load(), Progress::default());
    }

    #[test]
    fn test_module_id_for_path() {
        assert_eq!(module_id_for_path("/modules/basics.html"), Some("basics"));
        assert_eq!(module_id_for_path("/modules/troubleshooting.html"), Some("troubleshoot"));
        assert_eq!(module_id_for_path("/index.html"), None);
    }
}
