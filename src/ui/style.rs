//! Theming and color definitions.
//!
//! Styles for rendered article lines and the chrome around them, in a
//! light and a dark variant. The active variant is process-global: it
//! defaults from the terminal's reported background at startup and
//! flips at runtime with the theme toggle.

use std::sync::atomic::{AtomicBool, Ordering};

use ratatui::style::{Color, Modifier, Style};

use crate::document::{InlineStyle, LineType};

/// The persisted/detected color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Light,
    Dark,
}

static LIGHT_BACKGROUND: AtomicBool = AtomicBool::new(false);

/// Set the active color mode.
pub fn set_color_mode(mode: ColorMode) {
    LIGHT_BACKGROUND.store(mode == ColorMode::Light, Ordering::Relaxed);
}

/// The active color mode.
pub fn color_mode() -> ColorMode {
    if is_light_background() {
        ColorMode::Light
    } else {
        ColorMode::Dark
    }
}

/// Whether styles should target a light terminal background.
pub fn is_light_background() -> bool {
    LIGHT_BACKGROUND.load(Ordering::Relaxed)
}

/// Get the style for a given line type.
///
/// Uses semantic ANSI colors that respect the terminal's theme.
pub fn style_for_line_type(line_type: &LineType) -> Style {
    let light_bg = is_light_background();
    match line_type {
        // Headings - bold with distinct colors per level
        LineType::Heading(1) => Style::default()
            .fg(if light_bg {
                Color::Indexed(24)
            } else {
                Color::Cyan
            })
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(2) => Style::default()
            .fg(if light_bg {
                Color::Indexed(22)
            } else {
                Color::Green
            })
            .add_modifier(Modifier::BOLD),
        LineType::Heading(3) => Style::default()
            .fg(if light_bg {
                Color::Indexed(58)
            } else {
                Color::Yellow
            })
            .add_modifier(Modifier::BOLD),
        LineType::Heading(_) => Style::default()
            .fg(if light_bg {
                Color::Indexed(24)
            } else {
                Color::Blue
            })
            .add_modifier(Modifier::BOLD),

        // Code blocks - dimmer, monospace-on-monospace
        LineType::CodeBlock => Style::default()
            .fg(if light_bg {
                Color::Indexed(238)
            } else {
                Color::Indexed(245)
            })
            .add_modifier(Modifier::DIM),

        // Block quotes - italic blue
        LineType::BlockQuote => Style::default()
            .fg(if light_bg {
                Color::Indexed(24)
            } else {
                Color::Blue
            })
            .add_modifier(Modifier::ITALIC),

        LineType::HorizontalRule => Style::default()
            .fg(if light_bg {
                Color::Indexed(245)
            } else {
                Color::DarkGray
            })
            .add_modifier(Modifier::DIM),

        LineType::Table => Style::default().fg(if light_bg {
            Color::Indexed(236)
        } else {
            Color::Gray
        }),

        LineType::Paragraph | LineType::ListItem(_) | LineType::Empty => Style::default(),
    }
}

/// Overlay inline emphasis flags on a line's base style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.code {
        style = style.fg(if is_light_background() {
            Color::Indexed(88)
        } else {
            Color::Indexed(180)
        });
    }
    if inline.link {
        style = style
            .fg(if is_light_background() {
                Color::Indexed(25)
            } else {
                Color::Cyan
            })
            .add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// Category headers in the sidebar.
pub fn category_header_style() -> Style {
    Style::default()
        .fg(if is_light_background() {
            Color::Indexed(24)
        } else {
            Color::Cyan
        })
        .add_modifier(Modifier::BOLD)
}

/// Post descriptions under sidebar titles.
pub fn description_style() -> Style {
    Style::default()
        .fg(if is_light_background() {
            Color::Indexed(243)
        } else {
            Color::Indexed(245)
        })
        .add_modifier(Modifier::DIM)
}

/// The matched substring inside a search result title.
pub fn search_match_style() -> Style {
    Style::default().bg(Color::Yellow).fg(Color::Black)
}

/// The active TOC entry.
pub fn toc_active_style() -> Style {
    Style::default()
        .fg(if is_light_background() {
            Color::Indexed(22)
        } else {
            Color::Green
        })
        .add_modifier(Modifier::BOLD)
}

/// The post-jump pulse on a heading row.
pub fn pulse_style() -> Style {
    Style::default().bg(Color::Yellow).fg(Color::Black)
}

/// Inline error panel text.
pub fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_round_trip() {
        set_color_mode(ColorMode::Light);
        assert!(is_light_background());
        assert_eq!(color_mode(), ColorMode::Light);
        set_color_mode(ColorMode::Dark);
        assert!(!is_light_background());
        assert_eq!(color_mode(), ColorMode::Dark);
    }

    #[test]
    fn test_heading_styles_are_bold() {
        for level in 1..=6 {
            let style = style_for_line_type(&LineType::Heading(level));
            assert!(style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_inline_link_is_underlined() {
        let inline = InlineStyle {
            link: true,
            ..InlineStyle::default()
        };
        let style = style_for_inline(Style::default(), inline);
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
    }
}
