//! Text tool overlay: a pending string anchored where the user clicked.

use kurbo::Point;

/// Result of a text-tool click.
#[derive(Debug, Clone, PartialEq)]
pub enum TextToggle {
    /// The overlay opened at this point.
    Opened(Point),
    /// The overlay closed; this text should be drawn at `anchor`.
    Committed { anchor: Point, text: String },
    /// The overlay closed with nothing typed.
    Dismissed,
}

/// State of the text-entry overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TextEntry {
    #[default]
    Closed,
    Open { anchor: Point, text: String },
}

impl TextEntry {
    /// Open the overlay at `point`, or close it and hand back what was typed.
    pub fn toggle_at(&mut self, point: Point) -> TextToggle {
        match std::mem::take(self) {
            TextEntry::Closed => {
                *self = TextEntry::Open {
                    anchor: point,
                    text: String::new(),
                };
                TextToggle::Opened(point)
            }
            TextEntry::Open { anchor, text } if !text.trim().is_empty() => {
                TextToggle::Committed { anchor, text }
            }
            TextEntry::Open { .. } => TextToggle::Dismissed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, TextEntry::Open { .. })
    }

    pub fn anchor(&self) -> Option<Point> {
        match self {
            TextEntry::Open { anchor, .. } => Some(*anchor),
            TextEntry::Closed => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            TextEntry::Open { text, .. } => Some(text),
            TextEntry::Closed => None,
        }
    }

    /// Append typed characters. Ignored while closed.
    pub fn push_str(&mut self, typed: &str) {
        if let TextEntry::Open { text, .. } = self {
            text.push_str(typed);
        }
    }

    /// Replace the pending text. Ignored while closed.
    pub fn set_text(&mut self, value: impl Into<String>) {
        if let TextEntry::Open { text, .. } = self {
            *text = value.into();
        }
    }

    pub fn backspace(&mut self) {
        if let TextEntry::Open { text, .. } = self {
            text.pop();
        }
    }

    /// Close without committing.
    pub fn cancel(&mut self) {
        *self = TextEntry::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_click_opens() {
        let mut entry = TextEntry::default();
        let p = Point::new(4.0, 8.0);
        assert_eq!(entry.toggle_at(p), TextToggle::Opened(p));
        assert_eq!(entry.anchor(), Some(p));
        assert_eq!(entry.text(), Some(""));
    }

    #[test]
    fn test_second_click_commits_at_first_anchor() {
        let mut entry = TextEntry::default();
        entry.toggle_at(Point::new(1.0, 2.0));
        entry.push_str("hello");
        entry.push_str("!");
        entry.backspace();

        let result = entry.toggle_at(Point::new(50.0, 50.0));
        assert_eq!(
            result,
            TextToggle::Committed {
                anchor: Point::new(1.0, 2.0),
                text: "hello".to_string(),
            }
        );
        assert!(!entry.is_open());
    }

    #[test]
    fn test_blank_text_is_dismissed() {
        let mut entry = TextEntry::default();
        entry.toggle_at(Point::ZERO);
        entry.set_text("   ");
        assert_eq!(entry.toggle_at(Point::ZERO), TextToggle::Dismissed);
        assert_eq!(entry, TextEntry::Closed);
    }

    #[test]
    fn test_typing_while_closed_is_ignored() {
        let mut entry = TextEntry::default();
        entry.push_str("lost");
        entry.backspace();
        assert_eq!(entry, TextEntry::Closed);
    }
}
