// Presentation gate.
// Decides whether the release notes sheet is shown and records when it was.

use tracing::{debug, info, warn};

use crate::cache::{LAST_SHOWN_KEY, PreferenceStore};
use crate::error::Result;
use crate::kit::ReleaseNotesKit;
use crate::lookup::LookupRecord;

/// Renders a resolved lookup record. Implementations own the UI context.
pub trait Presenter {
    fn present(&mut self, record: &LookupRecord) -> Result<()>;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, record: &LookupRecord) -> Result<()> {
        (**self).present(record)
    }
}

/// Phase of a presentation attempt.
///
/// `Idle -> Resolving -> {Suppressed, Presenting, Failed} -> Idle`, plus
/// `Presenting -> Failed` when the presenter errors. There is no retry edge:
/// a new attempt starts again from `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GateState {
    #[default]
    Idle,
    Resolving,
    Suppressed,
    Presenting,
    Failed,
}

impl GateState {
    /// Phases an attempt ends in before returning to `Idle`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GateState::Suppressed | GateState::Presenting | GateState::Failed
        )
    }
}

/// Result of a presentation attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentOutcome {
    /// The sheet was shown and the marker updated.
    Presented { version: Option<String> },
    /// The lookup's current version is not the installed one; nothing was shown.
    Suppressed { listed_version: Option<String> },
    /// The sheet was already shown for the installed version.
    AlreadyShown,
}

impl PresentOutcome {
    pub fn was_presented(&self) -> bool {
        matches!(self, PresentOutcome::Presented { .. })
    }
}

impl<S: PreferenceStore> ReleaseNotesKit<S> {
    /// Current gate phase. `Idle` whenever no attempt is running.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Phase the most recent attempt ended in, or `Idle` if none has run.
    pub fn last_attempt(&self) -> GateState {
        self.last_attempt
    }

    fn enter(&mut self, next: GateState) {
        debug!(from = ?self.state, to = ?next, "presentation gate");
        if next.is_terminal() {
            self.last_attempt = next;
        }
        self.state = next;
    }

    /// Version the sheet was last shown for, if ever.
    pub fn last_shown_version(&self) -> Option<String> {
        self.store.string(LAST_SHOWN_KEY)
    }

    /// True when the sheet has never been shown, or was last shown for another version.
    pub fn should_present_on_version_change(&self) -> bool {
        match self.last_shown_version() {
            Some(last) => last != self.installed_version(),
            None => true,
        }
    }

    /// Present the sheet once per installed version.
    pub async fn present_on_version_change<P: Presenter>(
        &mut self,
        presenter: &mut P,
    ) -> Result<PresentOutcome> {
        if !self.should_present_on_version_change() {
            debug!(version = %self.installed_version(), "release notes already shown");
            return Ok(PresentOutcome::AlreadyShown);
        }
        self.present(true, presenter).await
    }

    /// Resolve release notes and hand them to `presenter`.
    ///
    /// With `precondition`, a record whose current version differs from the
    /// installed version is skipped without error: the store lists a version
    /// other than the one running. Errors are returned to the caller as is.
    pub async fn present<P: Presenter>(
        &mut self,
        precondition: bool,
        presenter: &mut P,
    ) -> Result<PresentOutcome> {
        self.enter(GateState::Resolving);
        let outcome = self.resolve_and_present(precondition, presenter).await;
        if let Err(e) = &outcome {
            self.enter(GateState::Failed);
            warn!(kind = e.kind(), error = %e, "release notes presentation failed");
        }
        self.enter(GateState::Idle);
        outcome
    }

    async fn resolve_and_present<P: Presenter>(
        &mut self,
        precondition: bool,
        presenter: &mut P,
    ) -> Result<PresentOutcome> {
        let record = self.resolve(precondition).await?;

        if precondition && record.current_version.as_deref() != Some(self.installed_version()) {
            self.enter(GateState::Suppressed);
            info!(
                listed = ?record.current_version,
                installed = %self.installed_version(),
                "lookup lists a different version, not presenting"
            );
            return Ok(PresentOutcome::Suppressed {
                listed_version: record.current_version,
            });
        }

        self.enter(GateState::Presenting);
        presenter.present(&record)?;
        if let Err(e) = self.store.set_string(LAST_SHOWN_KEY, self.installed_version()) {
            warn!(error = %e, "failed to record last shown version");
        }
        info!(version = ?record.current_version, "presented release notes");

        Ok(PresentOutcome::Presented {
            version: record.current_version,
        })
    }
}
