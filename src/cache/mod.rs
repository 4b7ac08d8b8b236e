// Cache module for local key-value storage.
// Stores raw lookup responses and the last-shown marker between launches.

pub mod paths;
pub mod store;

pub use paths::cache_dir;
pub use store::{CACHED_LOOKUP_KEY, FileStore, LAST_SHOWN_KEY, MemoryStore, PreferenceStore};
