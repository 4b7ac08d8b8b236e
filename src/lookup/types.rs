// App Store lookup response types.
// Defines the envelope and per-app record decoded from the lookup API and the cache.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{ReleaseNotesError, Result};

/// Layout of `currentVersionReleaseDate` when it carries a numeric offset.
const RELEASE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Top-level lookup response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupEnvelope {
    pub result_count: u64,
    pub results: Vec<LookupRecord>,
}

impl LookupEnvelope {
    /// Decode an envelope from raw response bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| ReleaseNotesError::ParsingFailure(e.to_string()))
    }

    /// Consume the envelope, yielding its first record.
    pub fn into_first(self) -> Option<LookupRecord> {
        self.results.into_iter().next()
    }
}

/// Metadata for one app as returned by the lookup API.
///
/// Every field is optional; a missing field stays `None` and is only given a
/// default when rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    #[serde(rename = "artistId", skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u64>,
    #[serde(rename = "artworkUrl60", skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(rename = "trackCensoredName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "artistViewUrl", skip_serializing_if = "Option::is_none")]
    pub app_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "sellerName", skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    #[serde(rename = "minimumOsVersion", skip_serializing_if = "Option::is_none")]
    pub minimum_os_version: Option<String>,
    #[serde(rename = "version", skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
    #[serde(
        rename = "currentVersionReleaseDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_version_release_date: Option<String>,
    #[serde(rename = "releaseNotes", skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
}

impl LookupRecord {
    /// App identifier as compared against the configured app ID.
    /// A record without an identifier compares as "0".
    pub fn comparable_app_id(&self) -> String {
        self.app_id.unwrap_or(0).to_string()
    }

    /// Parsed release timestamp of the current version, if present and well-formed.
    pub fn release_date(&self) -> Option<DateTime<FixedOffset>> {
        self.current_version_release_date
            .as_deref()
            .and_then(parse_release_date)
    }
}

/// Parse a `yyyy-MM-dd'T'HH:mm:ssZ` timestamp. Accepts a literal `Z` or a numeric offset.
pub fn parse_release_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, RELEASE_DATE_FORMAT))
        .ok()
}
