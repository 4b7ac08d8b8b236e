// Kit configuration.
// Holds the host app's installed version, lookup endpoint settings, and the configured app ID.

use std::time::Duration;

use crate::error::{ReleaseNotesError, Result};

/// Public App Store lookup host.
pub const DEFAULT_LOOKUP_BASE: &str = "https://itunes.apple.com/";

/// Upper bound on a single lookup request, after which it resolves as `MalformedData`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings fixed at construction time.
#[derive(Debug, Clone)]
pub struct KitConfig {
    /// Scheme and host the `/lookup` path is resolved against.
    pub lookup_base: String,
    /// Transport deadline for the lookup request.
    pub timeout: Duration,
    /// Short version string of the installed host app (e.g. "2.4.1").
    pub installed_version: String,
}

impl KitConfig {
    pub fn new(installed_version: impl Into<String>) -> Self {
        Self {
            lookup_base: DEFAULT_LOOKUP_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            installed_version: installed_version.into(),
        }
    }

    /// Point lookups at a different host (mirrors, test servers).
    pub fn with_lookup_base(mut self, base: impl Into<String>) -> Self {
        self.lookup_base = base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The app whose release notes are looked up. Unset until `set_app`.
#[derive(Debug, Clone, Default)]
pub struct AppConfiguration {
    app_id: Option<String>,
}

impl AppConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_app(&mut self, app_id: impl Into<String>) {
        self.app_id = Some(app_id.into());
    }

    pub fn is_configured(&self) -> bool {
        self.app_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// The configured app ID, or `NotConfigured` when unset or empty.
    pub fn app_id(&self) -> Result<&str> {
        match self.app_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ReleaseNotesError::NotConfigured),
        }
    }
}
