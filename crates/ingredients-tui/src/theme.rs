use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Display box border color
    pub border: Color,
    /// Display box background
    pub display_bg: Color,
    /// Ingredient name on the display
    pub display_fg: Color,
    /// Technique button labels
    pub button: Color,
    /// Strike/error color
    pub error: Color,
    /// Success color
    pub success: Color,
    /// Timer/info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 130, g: 140, b: 170 },
            display_bg: Color::Rgb { r: 35, g: 40, b: 55 },
            display_fg: Color::Rgb { r: 120, g: 255, b: 160 },
            button: Color::Rgb { r: 80, g: 180, b: 255 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 60, g: 60, b: 80 },
            display_bg: Color::Rgb { r: 230, g: 232, b: 242 },
            display_fg: Color::Rgb { r: 20, g: 110, b: 40 },
            button: Color::Rgb { r: 30, g: 100, b: 200 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            border: Color::White,
            display_bg: Color::Black,
            display_fg: Color::Green,
            button: Color::Cyan,
            error: Color::Red,
            success: Color::Green,
            info: Color::White,
            key: Color::Yellow,
        }
    }

    /// Next theme in the cycle, by name
    pub fn next(name: &str) -> (&'static str, Self) {
        match name {
            "dark" => ("light", Self::light()),
            "light" => ("high-contrast", Self::high_contrast()),
            _ => ("dark", Self::dark()),
        }
    }

    /// Look a theme up by its command-line name
    pub fn by_name(name: &str) -> Option<(&'static str, Self)> {
        match name {
            "dark" => Some(("dark", Self::dark())),
            "light" => Some(("light", Self::light())),
            "high-contrast" => Some(("high-contrast", Self::high_contrast())),
            _ => None,
        }
    }
}
