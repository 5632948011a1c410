use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::session::state::SessionState;
use crate::ui::layout::centered_box;
use crate::ui::theme::Theme;

pub struct TypingArea<'a> {
    session: &'a SessionState,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(session: &'a SessionState, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharClass {
    Typed,
    Cursor,
    Pending,
}

/// Classifies every phrase index for display. The cursor only shows while the
/// session takes input.
fn classify(session: &SessionState) -> Vec<CharClass> {
    let typed = session.typed_len();
    let show_cursor = session.engaged() && !session.completed();
    (0..session.phrase().len())
        .map(|idx| {
            if idx < typed {
                CharClass::Typed
            } else if idx == typed && show_cursor {
                CharClass::Cursor
            } else {
                CharClass::Pending
            }
        })
        .collect()
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let classes = classify(self.session);

        let spans: Vec<Span> = self
            .session
            .phrase()
            .chars()
            .iter()
            .zip(classes)
            .map(|(&ch, class)| {
                let style = match class {
                    CharClass::Typed => Style::default()
                        .fg(colors.text_typed())
                        .add_modifier(Modifier::BOLD),
                    CharClass::Cursor => Style::default()
                        .fg(colors.text_cursor_fg())
                        .bg(colors.text_cursor_bg()),
                    CharClass::Pending => Style::default().fg(colors.text_pending()),
                };
                Span::styled(ch.to_string(), style)
            })
            .collect();

        let border_color = if self.session.error_signal() {
            colors.border_error()
        } else if self.session.engaged() {
            colors.border_focused()
        } else {
            colors.border()
        };

        let title = if self.session.completed() {
            " SESSION COMPLETE "
        } else {
            " Current Session "
        };

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);

        let paragraph = Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: false });
        paragraph.render(area, buf);

        if !self.session.engaged() {
            let overlay = centered_box(32, 3, inner);
            Clear.render(overlay, buf);
            Paragraph::new("PRESS ENTER TO RESUME")
                .alignment(Alignment::Center)
                .style(
                    Style::default()
                        .fg(colors.fg())
                        .bg(colors.header_bg())
                        .add_modifier(Modifier::BOLD),
                )
                .block(
                    Block::bordered()
                        .border_style(Style::default().fg(colors.accent_dim()))
                        .style(Style::default().bg(colors.header_bg())),
                )
                .render(overlay, buf);
        }
    }
}
