// App Store lookup HTTP client.
// Builds lookup requests and returns raw response bodies.

use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::{debug, instrument};
use url::Url;

use crate::config::KitConfig;
use crate::error::{ReleaseNotesError, Result};

const LOOKUP_PATH: &str = "lookup";

/// Lookup API client. Performs a single GET per call; no retries.
#[derive(Debug, Clone)]
pub struct LookupClient {
    client: Client,
    base: String,
}

impl LookupClient {
    /// Create a client for the configured lookup host.
    pub fn new(config: &KitConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("whatsnew/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ReleaseNotesError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base: config.lookup_base.clone(),
        })
    }

    /// Build `<base>/lookup?id=<app_id>`. A path prefix on the base is kept.
    pub fn lookup_url(&self, app_id: &str) -> Result<Url> {
        let mut url =
            Url::parse(&self.base).map_err(|e| ReleaseNotesError::MalformedUrl(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| {
                ReleaseNotesError::MalformedUrl(format!(
                    "{} cannot be used as a base URL",
                    self.base
                ))
            })?
            .pop_if_empty()
            .push(LOOKUP_PATH);
        url.set_fragment(None);
        url.query_pairs_mut().clear().append_pair("id", app_id);
        Ok(url)
    }

    /// GET the lookup URL and return the body.
    ///
    /// Transport failures (including the request deadline) and empty bodies
    /// are both reported as `MalformedData`. The status code is not checked:
    /// any non-empty body is handed back for the caller to decode.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn get_bytes(&self, url: Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ReleaseNotesError::MalformedData(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ReleaseNotesError::MalformedData(e.to_string()))?;
        debug!(%status, len = body.len(), "lookup response");

        if body.is_empty() {
            return Err(ReleaseNotesError::MalformedData(format!(
                "empty response body (HTTP {})",
                status
            )));
        }

        Ok(body.to_vec())
    }
}
