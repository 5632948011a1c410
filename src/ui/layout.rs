use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥90 cols: typing area + stats sidebar
    Narrow, // <90 cols: full-width typing, stats folded into the header
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 90 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_sidebar(&self) -> bool {
        *self == LayoutTier::Wide
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(2),
            ])
            .split(area);

        if tier.show_sidebar() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
                .split(vertical[1]);

            Self {
                header: vertical[0],
                main: horizontal[0],
                sidebar: Some(horizontal[1]),
                footer: vertical[2],
                tier,
            }
        } else {
            Self {
                header: vertical[0],
                main: vertical[1],
                sidebar: None,
                footer: vertical[2],
                tier,
            }
        }
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

/// Fixed-size box centred in `area`, clamped to fit.
pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let left = area.x.saturating_add(area.width.saturating_sub(w) / 2);
    let top = area.y.saturating_add(area.height.saturating_sub(h) / 2);
    Rect::new(left, top, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_layout_has_sidebar() {
        let layout = AppLayout::new(Rect::new(0, 0, 120, 30));
        assert_eq!(layout.tier, LayoutTier::Wide);
        assert!(layout.sidebar.is_some());
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.footer.height, 2);
    }

    #[test]
    fn test_narrow_layout_drops_sidebar() {
        let layout = AppLayout::new(Rect::new(0, 0, 60, 20));
        assert_eq!(layout.tier, LayoutTier::Narrow);
        assert!(layout.sidebar.is_none());
        assert_eq!(layout.main.width, 60);
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let lines = pack_hint_lines(&["[Tab] restart", "[Esc] pause", "[^C] quit"], 30);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  [Tab] restart"));
        assert!(lines.iter().all(|l| l.chars().count() <= 30));
    }

    #[test]
    fn test_centered_box_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        let r = centered_box(40, 4, area);
        assert_eq!(r.width, 20);
        assert_eq!(r.height, 4);
        assert_eq!(r.y, 3);
    }
}
