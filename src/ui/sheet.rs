// Release notes sheet.
// Presentation model and ratatui rendering for the "What's New" modal.

use ratatui::{prelude::*, widgets::*};

use crate::lookup::{LookupRecord, parse_release_date};

/// Display layout for the release date, e.g. "Tuesday, Jan 10, 2023".
const RELEASE_DATE_DISPLAY: &str = "%A, %b %-d, %Y";

/// Text customisations for the sheet.
#[derive(Debug, Clone)]
pub struct SheetStyle {
    pub title: String,
    pub dismiss_label: String,
    pub accent: Color,
}

impl Default for SheetStyle {
    fn default() -> Self {
        Self {
            title: "What's New".to_string(),
            dismiss_label: "Dismiss".to_string(),
            accent: Color::Blue,
        }
    }
}

/// Everything the sheet displays. Missing record fields become empty strings here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNotesSheet {
    pub title: String,
    pub version: String,
    pub released_on: String,
    pub notes: String,
    pub dismiss_label: String,
}

impl ReleaseNotesSheet {
    pub fn from_record(record: &LookupRecord, style: &SheetStyle) -> Self {
        Self {
            title: style.title.clone(),
            version: record.current_version.clone().unwrap_or_default(),
            released_on: format_release_date(
                record.current_version_release_date.as_deref().unwrap_or(""),
            ),
            notes: record.release_notes.clone().unwrap_or_default(),
            dismiss_label: style.dismiss_label.clone(),
        }
    }

    /// Header lines shown above the notes.
    pub fn header_lines(&self) -> [String; 2] {
        [
            format!("Version: {}", self.version),
            format!("Released on {}", self.released_on),
        ]
    }

    /// Plain-text rendering, for non-interactive output.
    pub fn to_text(&self) -> String {
        let [version, released] = self.header_lines();
        let rule = "-".repeat(self.title.chars().count().max(version.chars().count()));
        format!(
            "{}\n{}\n{}\n{}\n\n{}\n",
            self.title, version, released, rule, self.notes
        )
    }
}

/// Reformat a lookup timestamp for display. Unparseable input renders as "".
pub fn format_release_date(raw: &str) -> String {
    parse_release_date(raw)
        .map(|date| date.format(RELEASE_DATE_DISPLAY).to_string())
        .unwrap_or_default()
}

/// Draw the release notes sheet centred over the current frame.
pub fn draw_sheet(frame: &mut Frame, sheet: &ReleaseNotesSheet, style: &SheetStyle, scroll: u16) {
    let area = frame.area();

    // Create centered modal
    let modal_width = area.width.saturating_sub(4).min(80);
    let modal_height = area.height.saturating_sub(2).min(30);
    let modal_x = (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = (area.height.saturating_sub(modal_height)) / 2;

    let modal_area = Rect::new(modal_x, modal_y, modal_width, modal_height);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(style.accent))
        .title(format!(" {} ", sheet.title))
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = outer.inner(modal_area);
    frame.render_widget(outer, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Version and release date
            Constraint::Min(1),    // Notes
            Constraint::Length(1), // Dismiss
        ])
        .split(inner);

    // Header
    let [version, released] = sheet.header_lines();
    let header = Paragraph::new(vec![
        Line::from(Span::styled(version, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(released, Style::default().fg(Color::DarkGray))),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, chunks[0]);

    // Notes
    let notes = Paragraph::new(sheet.notes.as_str())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(notes, chunks[1]);

    // Dismiss control and key hints
    let dismiss = Line::from(vec![
        Span::styled(
            format!(" {} ", sheet.dismiss_label),
            Style::default()
                .fg(Color::White)
                .bg(style.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Enter/Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" = Dismiss  ", Style::default().fg(Color::DarkGray)),
        Span::styled("↑↓", Style::default().fg(Color::Yellow)),
        Span::styled(" = Scroll ", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(
        Paragraph::new(dismiss).alignment(Alignment::Center),
        chunks[2],
    );
}
