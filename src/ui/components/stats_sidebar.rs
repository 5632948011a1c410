use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::state::SessionState;
use crate::ui::theme::Theme;

pub struct StatsSidebar<'a> {
    session: &'a SessionState,
    now: Instant,
    theme: &'a Theme,
}

impl<'a> StatsSidebar<'a> {
    pub fn new(session: &'a SessionState, now: Instant, theme: &'a Theme) -> Self {
        Self {
            session,
            now,
            theme,
        }
    }
}

fn format_elapsed(secs: f64) -> String {
    if secs >= 60.0 {
        let whole = secs as u64;
        format!("{}m {:02}s", whole / 60, whole % 60)
    } else {
        format!("{secs:.1}s")
    }
}

impl Widget for StatsSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let session = self.session;

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(9), Constraint::Length(6)])
            .split(area);

        let elapsed = session.elapsed(self.now).as_secs_f64();
        let progress = session.progress() * 100.0;

        let lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("{}", session.wpm()),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" WPM", Style::default().fg(colors.text_pending())),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Progress: ", Style::default().fg(colors.fg())),
                Span::styled(format!("{progress:.0}%"), Style::default().fg(colors.accent())),
            ]),
            Line::from(vec![
                Span::styled("Misses:   ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{}", session.mistakes()),
                    Style::default().fg(colors.error()),
                ),
            ]),
            Line::from(vec![
                Span::styled("Time:     ", Style::default().fg(colors.fg())),
                Span::styled(format_elapsed(elapsed), Style::default().fg(colors.fg())),
            ]),
        ];

        let block = Block::bordered()
            .title(" Stats ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(lines).block(block).render(sections[0], buf);

        let (title, body, color) = if session.completed() {
            (" Done ", "Hard mode cleared.", colors.success())
        } else if session.error_signal() {
            (" Hard Mode ", "Wrong key. No backspace.", colors.error())
        } else {
            (" Hard Mode ", "Every key counts.", colors.text_pending())
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(Line::from(Span::styled(body, Style::default().fg(color))))
            .block(block)
            .render(sections[1], buf);
    }
}
