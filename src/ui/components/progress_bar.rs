use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;

/// Single-row phrase progress, `typed / total` printed on the bar.
pub struct ProgressBar<'a> {
    typed: usize,
    total: usize,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(typed: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            typed: typed.min(total),
            total,
            theme,
        }
    }

    fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.typed as f64 / self.total as f64
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let colors = &self.theme.colors;

        let filled_width = (self.ratio() * area.width as f64).round() as u16;
        for x in area.x..area.x + area.width {
            let style = if x < area.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, area.y)].set_style(style);
        }

        let label = format!("{}/{}", self.typed, self.total);
        let label_x = area.x + (area.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, area.y, &label, Style::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_proportionally() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        ProgressBar::new(5, 10, &theme).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].bg, theme.colors.bar_filled());
        assert_eq!(buf[(4, 0)].bg, theme.colors.bar_filled());
        assert_eq!(buf[(5, 0)].bg, theme.colors.bar_empty());
    }

    #[test]
    fn test_empty_total_renders_empty_bar() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        ProgressBar::new(0, 0, &theme).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].bg, theme.colors.bar_empty());
    }
}
