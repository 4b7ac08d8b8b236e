//! Fetch an app's App Store "What's New" notes, cache them, and present them
//! once per installed version.
//!
//! ```no_run
//! use whatsnew::{FileStore, KitConfig, ReleaseNotesKit, ui::TerminalPresenter};
//!
//! # async fn run() -> whatsnew::Result<()> {
//! let mut kit = ReleaseNotesKit::new(KitConfig::new("2.4.1"), FileStore::from_default_dir()?)?;
//! kit.configure("1525384123").await;
//! kit.present_on_version_change(&mut TerminalPresenter::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod kit;
pub mod lookup;
pub mod ui;

pub use cache::{FileStore, MemoryStore, PreferenceStore};
pub use config::{AppConfiguration, KitConfig};
pub use error::{ReleaseNotesError, Result};
pub use gate::{GateState, PresentOutcome, Presenter};
pub use kit::ReleaseNotesKit;
pub use lookup::{LookupEnvelope, LookupRecord};
