// Full-screen terminal presenter.
// Shows the release notes sheet in an alternate screen until dismissed.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use crate::error::Result;
use crate::gate::Presenter;
use crate::lookup::LookupRecord;

use super::sheet::{ReleaseNotesSheet, SheetStyle, draw_sheet};

/// Presents the sheet on the controlling terminal and blocks until it is dismissed.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    style: SheetStyle,
}

impl TerminalPresenter {
    pub fn new(style: SheetStyle) -> Self {
        Self { style }
    }

    fn run(&self, terminal: &mut Terminal<impl Backend>, sheet: &ReleaseNotesSheet) -> io::Result<()> {
        let mut view = SheetView::default();
        while !view.dismissed {
            terminal.draw(|frame| draw_sheet(frame, sheet, &self.style, view.scroll))?;
            view.handle_events()?;
        }
        Ok(())
    }
}

impl Presenter for TerminalPresenter {
    fn present(&mut self, record: &LookupRecord) -> Result<()> {
        let sheet = ReleaseNotesSheet::from_record(record, &self.style);

        let mut terminal = setup_terminal()?;
        let result = self.run(&mut terminal, &sheet);
        restore_terminal(&mut terminal)?;

        result.map_err(Into::into)
    }
}

/// Scroll and dismissal state while the sheet is on screen.
#[derive(Debug, Default)]
struct SheetView {
    scroll: u16,
    dismissed: bool,
}

impl SheetView {
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.dismissed = true,
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            _ => {}
        }
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        disable_raw_mode()?;
        return Err(e);
    }
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}
