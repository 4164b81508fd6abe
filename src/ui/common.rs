//! Shared styling utilities for the chartdeck UI.

use eframe::egui::{Color32, Frame, Stroke};

/// Centralized color palette for the dark theme.
///
/// Compile-time constants keep theming consistent across panels without
/// runtime allocation.
pub struct UiColors;

impl UiColors {
    /// Primary background color for main content areas
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Secondary background color for nested components
    pub const INNER_BG: Color32 = Color32::from_rgb(25, 25, 25);

    /// Deepest background color for emphasized content areas
    pub const EXTREME_BG: Color32 = Color32::from_rgb(20, 20, 20);

    /// Border color for component separation
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    /// Primary series / active status color
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    /// Secondary series / inactive status color
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);
}

/// Creates a styled frame with consistent margins and border.
pub fn panel_frame(bg_color: Color32, border_color: Color32) -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, border_color))
        .fill(bg_color)
        .inner_margin(8)
        .outer_margin(2)
}
