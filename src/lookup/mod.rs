// App Store lookup module.
// Provides the HTTP client and response types for the public lookup API.

pub mod client;
pub mod types;

pub use client::LookupClient;
pub use types::{LookupEnvelope, LookupRecord, parse_release_date};
