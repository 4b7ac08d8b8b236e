// Command runner.
// Builds the release notes kit from CLI options and dispatches subcommands.

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Result, ensure};
use ratatui::style::Color;
use whatsnew::ui::{PlainPresenter, SheetStyle, TerminalPresenter};
use whatsnew::{FileStore, KitConfig, PresentOutcome, Presenter, ReleaseNotesKit};

use crate::cli::{Cli, Commands};

/// Main application state.
pub struct App {
    kit: ReleaseNotesKit<FileStore>,
    /// App ID to configure before running a command.
    app_id: Option<String>,
    style: SheetStyle,
    /// Write the sheet as text instead of drawing it.
    plain: bool,
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self> {
        let store = match &cli.cache_dir {
            Some(dir) => FileStore::new(dir),
            None => FileStore::from_default_dir()?,
        };

        let config = KitConfig::new(cli.installed_version.clone().unwrap_or_default())
            .with_lookup_base(cli.lookup_url.clone())
            .with_timeout(Duration::from_secs(cli.timeout));

        let kit = ReleaseNotesKit::new(config, store)?;

        Ok(Self {
            kit,
            app_id: cli.app_id.clone(),
            style: SheetStyle {
                title: cli.title.clone(),
                dismiss_label: cli.dismiss_label.clone(),
                accent: Color::Blue,
            },
            plain: cli.plain || !io::stdout().is_terminal(),
        })
    }

    pub async fn run(&mut self, command: Commands) -> Result<()> {
        if let Commands::Reset = command {
            self.kit.reset()?;
            println!("Cleared cached release notes");
            return Ok(());
        }
        if command.needs_installed_version() {
            self.require_installed_version()?;
        }
        self.configure().await;

        match command {
            Commands::Check => {
                let mut presenter = self.presenter();
                let outcome = self.kit.present_on_version_change(&mut presenter).await?;
                println!("{}", describe(&outcome));
            }
            Commands::Show { fresh } => {
                let mut presenter = self.presenter();
                let outcome = self.kit.present(fresh, &mut presenter).await?;
                println!("{}", describe(&outcome));
            }
            Commands::Lookup { fresh } => {
                let record = self.kit.resolve(fresh).await?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            // Configuration has already primed the cache.
            Commands::Prefetch => {
                ensure!(
                    self.kit.app().is_configured(),
                    "--app-id (or WHATSNEW_APP_ID) is required"
                );
            }
            Commands::Reset => {}
        }
        Ok(())
    }

    /// Apply the app ID, warming the cache when the installed version is known.
    async fn configure(&mut self) {
        let Some(app_id) = self.app_id.take() else {
            return;
        };
        if self.kit.installed_version().is_empty() {
            self.kit.set_app(app_id);
        } else {
            self.kit.configure(app_id).await;
        }
    }

    fn presenter(&self) -> Box<dyn Presenter> {
        if self.plain {
            Box::new(PlainPresenter::new(io::stdout()).with_style(self.style.clone()))
        } else {
            Box::new(TerminalPresenter::new(self.style.clone()))
        }
    }

    fn require_installed_version(&self) -> Result<()> {
        ensure!(
            !self.kit.installed_version().is_empty(),
            "--installed-version (or WHATSNEW_INSTALLED_VERSION) is required"
        );
        Ok(())
    }
}

fn describe(outcome: &PresentOutcome) -> String {
    match outcome {
        PresentOutcome::Presented { version } => format!(
            "Showed release notes for version {}",
            version.as_deref().unwrap_or("unknown")
        ),
        PresentOutcome::Suppressed { listed_version } => format!(
            "App Store lists version {}, not the installed one; nothing shown",
            listed_version.as_deref().unwrap_or("unknown")
        ),
        PresentOutcome::AlreadyShown => {
            "Release notes were already shown for this version".to_string()
        }
    }
}
