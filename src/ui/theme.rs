use ratatui::style::Color;

/// Application palette used by rendering code.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    /// Primary background color for the canvas.
    pub base: Color,
    /// Darkest background shade, used for text on highlighted rows.
    pub crust: Color,
    /// Border color.
    pub surface2: Color,
    /// Muted text for titles and hints.
    pub overlay1: Color,
    /// Primary foreground text color.
    pub text: Color,
    /// Secondary text for less prominent content.
    pub subtext0: Color,
    /// Accent for focused input.
    pub sapphire: Color,
    /// Accent for headings.
    pub mauve: Color,
    /// Empty results and success messages.
    pub green: Color,
    /// Counts needing attention.
    pub yellow: Color,
    /// Errors.
    pub red: Color,
    /// Selection highlight.
    pub lavender: Color,
}

/// The dashboard palette (Catppuccin Mocha).
#[must_use]
pub const fn theme() -> Theme {
    Theme {
        base: Color::Rgb(30, 30, 46),        // #1e1e2e
        crust: Color::Rgb(17, 17, 27),       // #11111b
        surface2: Color::Rgb(88, 91, 112),   // #585b70
        overlay1: Color::Rgb(127, 132, 156), // #7f849c
        text: Color::Rgb(205, 214, 244),     // #cdd6f4
        subtext0: Color::Rgb(166, 173, 200), // #a6adc8
        sapphire: Color::Rgb(116, 199, 236), // #74c7ec
        mauve: Color::Rgb(203, 166, 247),    // #cba6f7
        green: Color::Rgb(166, 227, 161),    // #a6e3a1
        yellow: Color::Rgb(249, 226, 175),   // #f9e2af
        red: Color::Rgb(243, 139, 168),      // #f38ba8
        lavender: Color::Rgb(180, 190, 254), // #b4befe
    }
}
