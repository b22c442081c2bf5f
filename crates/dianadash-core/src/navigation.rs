//! Page navigation seam.
//!
//! Navigation policy lives in `Dashboard` and `PageGuard`; the `Navigator`
//! only performs the move.

use std::sync::RwLock;

use tracing::info;

/// Redirect target for unauthenticated, expired, or rejected sessions
pub const LOGIN_PATH: &str = "/login";

pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;

    fn navigate(&self, path: &str);
}

/// Navigator that only records where it was sent.
#[derive(Debug)]
pub struct MemoryNavigator {
    path: RwLock<String>,
    history: RwLock<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: RwLock::new(path.into()),
            history: RwLock::new(Vec::new()),
        }
    }

    /// Every path passed to `navigate`, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history
            .read()
            .map(|h| h.clone())
            .unwrap_or_default()
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.path.read().map(|p| p.clone()).unwrap_or_default()
    }

    fn navigate(&self, path: &str) {
        info!(to = path, "Navigating");
        if let Ok(mut current) = self.path.write() {
            *current = path.to_string();
        }
        if let Ok(mut history) = self.history.write() {
            history.push(path.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_navigator_records_moves() {
        let nav = MemoryNavigator::new("/dashboard");
        assert_eq!(nav.current_path(), "/dashboard");
        assert!(nav.history().is_empty());

        nav.navigate(LOGIN_PATH);
        assert_eq!(nav.current_path(), "/login");
        assert_eq!(nav.history(), vec!["/login".to_string()]);
    }
}
