use ratatui::style::{Color, Modifier, Style};

use crate::controller::Severity;

/// Colours used by the terminal UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub info: Color,
    pub success: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Green,
            border: Color::DarkGray,
            border_focused: Color::Yellow,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            info: Color::Cyan,
            success: Color::Green,
            error: Color::Red,
        }
    }
}

impl Theme {
    /// Colour of the message bar for a severity
    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Info => self.info,
            Severity::Success => self.success,
            Severity::Error => self.error,
        }
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn hint(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }
}
