//! UI navigation boundary
//!
//! The coordinator reads the current route to skip refresh on public pages
//! and, after an unrecoverable refresh failure, sends the user to login.

use std::sync::Mutex;

/// Access to the presentation layer's current location
pub trait Navigator: Send + Sync {
    /// Path of the currently displayed route, e.g. `/dashboard`
    fn current_route(&self) -> String;

    /// Navigate to `route`
    fn redirect_to(&self, route: &str);
}

/// In-memory navigator that records every redirect
///
/// Used by the CLI, which has no real router, and by tests that need to
/// count login redirects.
#[derive(Debug)]
pub struct MemoryNavigator {
    route: Mutex<String>,
    redirects: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: Mutex::new(route.into()),
            redirects: Mutex::new(Vec::new()),
        }
    }

    /// Change the current route without recording a redirect
    pub fn set_route(&self, route: impl Into<String>) {
        *self.route.lock().unwrap_or_else(|e| e.into_inner()) = route.into();
    }

    /// Every redirect performed so far, oldest first
    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/dashboard")
    }
}

impl Navigator for MemoryNavigator {
    fn current_route(&self) -> String {
        self.route.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn redirect_to(&self, route: &str) {
        tracing::info!(route = %route, "Navigating");
        self.redirects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(route.to_string());
        self.set_route(route);
    }
}
