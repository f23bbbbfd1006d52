use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Default text color
    pub fg: Color,
    /// Problem text
    pub problem: Color,
    /// Answer being typed
    pub input: Color,
    /// Timer while plenty of time is left
    pub timer: Color,
    /// Timer in the last ten seconds
    pub timer_low: Color,
    /// Wrong answer / error color
    pub error: Color,
    /// Correct answer color
    pub success: Color,
    /// Secondary text
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
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            problem: Color::Rgb { r: 255, g: 255, b: 255 },
            input: Color::Rgb { r: 80, g: 180, b: 255 },
            timer: Color::Rgb { r: 160, g: 165, b: 185 },
            timer_low: Color::Rgb { r: 255, g: 160, b: 60 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            problem: Color::Rgb { r: 0, g: 0, b: 0 },
            input: Color::Rgb { r: 30, g: 100, b: 200 },
            timer: Color::Rgb { r: 90, g: 90, b: 110 },
            timer_low: Color::Rgb { r: 200, g: 90, b: 0 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}
