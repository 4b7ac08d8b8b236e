// Release notes service.
// Resolves lookup records from the local cache, falling back to the lookup API.

use tracing::{debug, info, instrument, warn};

use crate::cache::{CACHED_LOOKUP_KEY, LAST_SHOWN_KEY, PreferenceStore};
use crate::config::{AppConfiguration, KitConfig};
use crate::error::{ReleaseNotesError, Result};
use crate::gate::GateState;
use crate::lookup::{LookupClient, LookupEnvelope, LookupRecord};

/// Fetches, caches, and presents release notes for one configured app.
///
/// One instance is constructed at startup and configured once with
/// [`configure`](Self::configure). The lookup API is rate limited per caller IP,
/// so every read consults the cache first.
pub struct ReleaseNotesKit<S> {
    pub(crate) config: KitConfig,
    pub(crate) app: AppConfiguration,
    pub(crate) store: S,
    pub(crate) client: LookupClient,
    pub(crate) state: GateState,
    pub(crate) last_attempt: GateState,
}

impl<S: PreferenceStore> ReleaseNotesKit<S> {
    /// Create an unconfigured kit over the given store.
    pub fn new(config: KitConfig, store: S) -> Result<Self> {
        let client = LookupClient::new(&config)?;
        Ok(Self {
            config,
            app: AppConfiguration::new(),
            store,
            client,
            state: GateState::default(),
            last_attempt: GateState::default(),
        })
    }

    /// Set the app ID whose release notes are looked up.
    pub fn set_app(&mut self, app_id: impl Into<String>) {
        let app_id = app_id.into();
        if self.app.is_configured() {
            warn!(%app_id, "app ID configured more than once, replacing");
        }
        self.app.set_app(app_id);
    }

    /// Set the app ID and prime the cache for it.
    pub async fn configure(&mut self, app_id: impl Into<String>) {
        self.set_app(app_id);
        self.warm_up().await;
    }

    /// Prime the cache for the configured app. Failures are logged, not returned.
    pub async fn warm_up(&self) {
        match self.resolve(true).await {
            Ok(record) => debug!(version = ?record.current_version, "release notes ready"),
            Err(e) => warn!(error = %e, "release notes warm-up failed"),
        }
    }

    /// Forget the cached lookup and the last-shown marker.
    pub fn reset(&self) -> Result<()> {
        self.store.remove(CACHED_LOOKUP_KEY)?;
        self.store.remove(LAST_SHOWN_KEY)?;
        info!("cleared cached release notes");
        Ok(())
    }

    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    pub fn app(&self) -> &AppConfiguration {
        &self.app
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn installed_version(&self) -> &str {
        &self.config.installed_version
    }

    /// Return the cached record, or fetch a fresh one.
    ///
    /// Without `precondition` any decodable cached record is returned as is.
    /// With it, the cached record is only trusted when its version equals the
    /// installed version and its app ID equals the configured one; a record
    /// without an app ID compares as "0".
    pub async fn resolve(&self, precondition: bool) -> Result<LookupRecord> {
        let Some(cached) = self.cached_record() else {
            debug!("no usable cached lookup, fetching");
            return self.fetch().await;
        };

        if !precondition {
            debug!("returning cached lookup without freshness check");
            return Ok(cached);
        }

        let version_matches =
            cached.current_version.as_deref() == Some(self.installed_version());
        let app_matches = self
            .app
            .app_id()
            .is_ok_and(|app_id| cached.comparable_app_id() == app_id);

        if version_matches && app_matches {
            debug!("cached lookup matches installed version and app ID");
            Ok(cached)
        } else {
            debug!(
                cached_version = ?cached.current_version,
                cached_app_id = %cached.comparable_app_id(),
                version_matches,
                app_matches,
                "cached lookup is stale, fetching"
            );
            self.fetch().await
        }
    }

    /// First record of the cached response. Unreadable or empty entries count as a miss.
    fn cached_record(&self) -> Option<LookupRecord> {
        let bytes = self.store.data(CACHED_LOOKUP_KEY)?;
        match LookupEnvelope::from_slice(&bytes) {
            Ok(envelope) => envelope.into_first(),
            Err(e) => {
                debug!(error = %e, "ignoring undecodable cached lookup");
                None
            }
        }
    }

    /// Look up the configured app and overwrite the cache with the response.
    ///
    /// Any non-empty body replaces the cached entry before it is decoded, so
    /// an unparseable response also discards the previous cache.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<LookupRecord> {
        let app_id = self.app.app_id()?;
        let url = self.client.lookup_url(app_id)?;
        let bytes = self.client.get_bytes(url).await?;

        if let Err(e) = self.store.set_data(CACHED_LOOKUP_KEY, &bytes) {
            warn!(error = %e, "failed to cache lookup response");
        }

        let record = LookupEnvelope::from_slice(&bytes)?
            .into_first()
            .ok_or(ReleaseNotesError::NoResults)?;
        info!(app_id, version = ?record.current_version, "fetched release notes");
        Ok(record)
    }
}
