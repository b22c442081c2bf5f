use std::sync::Mutex;

use dianadash_core::Navigator;
use tracing::info;

/// Terminal stand-in for browser navigation: a redirect is reported to the
/// user instead of loading a page.
pub struct ConsoleNavigator {
    path: Mutex<String>,
}

impl ConsoleNavigator {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Mutex::new(path.into()),
        }
    }
}

impl Navigator for ConsoleNavigator {
    fn current_path(&self) -> String {
        self.path.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn navigate(&self, path: &str) {
        info!(to = path, "Redirect");
        eprintln!("→ Redirected to {} (run `dianadash login`)", path);
        if let Ok(mut current) = self.path.lock() {
            *current = path.to_string();
        }
    }
}
