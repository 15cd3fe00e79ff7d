use crossterm::style::Color;

/// Semantic colors of the printer
pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

/// Icon set, chosen once from terminal capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icons {
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub progress: &'static str,
    pub arrow: &'static str,
    pub skip: &'static str,
}

impl Icons {
    pub const UNICODE: Icons = Icons {
        success: "✓",
        error: "✗",
        warning: "⚠",
        progress: "●",
        arrow: "↳",
        skip: "○",
    };

    pub const ASCII: Icons = Icons {
        success: "[OK]",
        error: "[FAIL]",
        warning: "[WARN]",
        progress: "[..]",
        arrow: "->",
        skip: "[ ]",
    };

    pub fn for_unicode(unicode: bool) -> Self {
        if unicode {
            Self::UNICODE
        } else {
            Self::ASCII
        }
    }
}
