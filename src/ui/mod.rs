// UI module for presenting release notes.
// Terminal and plain-text presenters for the release notes sheet.

mod sheet;
mod terminal;

use std::io::Write;

pub use sheet::{ReleaseNotesSheet, SheetStyle, draw_sheet, format_release_date};
pub use terminal::TerminalPresenter;

use crate::error::Result;
use crate::gate::Presenter;
use crate::lookup::LookupRecord;

/// Writes the sheet as plain text, for pipes and non-interactive sessions.
pub struct PlainPresenter<W> {
    out: W,
    style: SheetStyle,
}

impl<W: Write> PlainPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            style: SheetStyle::default(),
        }
    }

    pub fn with_style(mut self, style: SheetStyle) -> Self {
        self.style = style;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for PlainPresenter<W> {
    fn present(&mut self, record: &LookupRecord) -> Result<()> {
        let sheet = ReleaseNotesSheet::from_record(record, &self.style);
        self.out.write_all(sheet.to_text().as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
