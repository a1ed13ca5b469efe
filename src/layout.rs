//! Responsive layout tiers.
//!
//! The terminal width is mapped to one of four discrete breakpoints,
//! mirroring the narrow/medium/wide/large tiers of a responsive page.
//! Pane arrangement, TOC visibility and scroll allowances all key off
//! the current [`Breakpoint`].

/// A discrete responsive-layout tier derived from terminal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    /// Single pane; articles open as a full-screen overlay.
    Narrow,
    /// Sidebar plus content column; TOC available as a modal.
    Medium,
    /// Sidebar, content and TOC panel side by side.
    Wide,
    /// Same arrangement as [`Breakpoint::Wide`] with wider gutters.
    Large,
}

/// Column thresholds between tiers.
const MEDIUM_MIN_COLS: u16 = 72;
const WIDE_MIN_COLS: u16 = 110;
const LARGE_MIN_COLS: u16 = 150;

impl Breakpoint {
    /// Classify a terminal width in columns.
    pub const fn from_width(cols: u16) -> Self {
        if cols < MEDIUM_MIN_COLS {
            Self::Narrow
        } else if cols < WIDE_MIN_COLS {
            Self::Medium
        } else if cols < LARGE_MIN_COLS {
            Self::Wide
        } else {
            Self::Large
        }
    }

    /// Whether the TOC renders as its own panel at this tier.
    pub const fn has_toc_panel(self) -> bool {
        matches!(self, Self::Wide | Self::Large)
    }

    /// Whether articles open in a full-screen overlay at this tier.
    pub const fn uses_overlay(self) -> bool {
        matches!(self, Self::Narrow)
    }

    /// Rows assumed consumed above the content when deciding which
    /// heading is "current". Narrower tiers stack more chrome above
    /// the article, so the allowance shrinks as the terminal widens.
    pub const fn highlight_allowance(self) -> usize {
        match self {
            Self::Narrow => 6,
            Self::Medium => 5,
            Self::Wide | Self::Large => 4,
        }
    }

    /// Context rows left above a heading after a TOC jump.
    pub const fn scroll_margin(self) -> usize {
        match self {
            Self::Narrow => 4,
            Self::Medium => 3,
            Self::Wide | Self::Large => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_cover_common_terminal_widths() {
        assert_eq!(Breakpoint::from_width(40), Breakpoint::Narrow);
        assert_eq!(Breakpoint::from_width(71), Breakpoint::Narrow);
        assert_eq!(Breakpoint::from_width(72), Breakpoint::Medium);
        assert_eq!(Breakpoint::from_width(80), Breakpoint::Medium);
        assert_eq!(Breakpoint::from_width(110), Breakpoint::Wide);
        assert_eq!(Breakpoint::from_width(149), Breakpoint::Wide);
        assert_eq!(Breakpoint::from_width(150), Breakpoint::Large);
        assert_eq!(Breakpoint::from_width(u16::MAX), Breakpoint::Large);
    }

    #[test]
    fn test_highlight_allowance_shrinks_as_width_grows() {
        assert!(
            Breakpoint::Narrow.highlight_allowance()
                > Breakpoint::Medium.highlight_allowance()
        );
        assert!(
            Breakpoint::Medium.highlight_allowance()
                > Breakpoint::Wide.highlight_allowance()
        );
        assert_eq!(
            Breakpoint::Wide.highlight_allowance(),
            Breakpoint::Large.highlight_allowance()
        );
    }

    #[test]
    fn test_only_wide_tiers_have_a_toc_panel() {
        assert!(!Breakpoint::Narrow.has_toc_panel());
        assert!(!Breakpoint::Medium.has_toc_panel());
        assert!(Breakpoint::Wide.has_toc_panel());
        assert!(Breakpoint::Large.has_toc_panel());
    }

    #[test]
    fn test_only_narrow_uses_the_overlay() {
        assert!(Breakpoint::Narrow.uses_overlay());
        assert!(!Breakpoint::Medium.uses_overlay());
        assert!(!Breakpoint::Wide.uses_overlay());
    }
}
