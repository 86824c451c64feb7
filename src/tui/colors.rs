//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Owner group headers
pub const STEEL_BLUE: Color = Color::Rgb(70, 130, 180);
/// Rows picked up only after escalation
pub const LATE_RED: Color = Color::Rgb(178, 34, 34);
/// Total rows and the footer summary
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Escalation tables
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);
