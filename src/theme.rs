use ratatui::style::{Color, Modifier, Style};

// Centralized theme colors. Keep these as small helpers so call sites stay
// free of literal colors.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);

pub fn accent() -> Color {
    Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2)
}

// Backdrop
pub fn backdrop() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM)
}

// Popover panel
pub fn panel_bg() -> Color {
    Color::Black
}
pub fn panel_fg() -> Color {
    Color::White
}
pub fn panel_border() -> Color {
    accent()
}
pub fn panel_muted() -> Color {
    Color::Gray
}

// Buttons inside the panel
pub fn button() -> Style {
    Style::default().fg(panel_fg()).bg(Color::DarkGray)
}
pub fn button_focused() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(accent())
        .add_modifier(Modifier::BOLD)
}

// Tour targets on the demo screen
pub fn target_border() -> Color {
    Color::DarkGray
}
pub fn target_highlight() -> Color {
    accent()
}

pub fn status_bar() -> Style {
    Style::default().fg(Color::Black).bg(Color::Gray)
}
