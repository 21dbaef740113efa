// ReviewScope - ui/theme.rs
//
// Colour scheme, sentiment colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::core::model::SentimentLabel;
use egui::Color32;

/// Series colour for a sentiment label.
pub fn label_colour(label: SentimentLabel) -> Color32 {
    match label {
        SentimentLabel::Positive => Color32::from_rgb(34, 197, 94), // Green 500
        SentimentLabel::Neutral => Color32::from_rgb(96, 165, 250), // Blue 400
        SentimentLabel::Negative => Color32::from_rgb(239, 68, 68), // Red 500
    }
}

/// Translucent variant for overlapping marks (scatter, density bars).
pub fn label_colour_alpha(label: SentimentLabel, alpha: f32) -> Color32 {
    label_colour(label).gamma_multiply(alpha)
}

/// Word-cloud palette, cycled by frequency rank.
pub const WORDCLOUD_PALETTE: [Color32; 6] = [
    Color32::from_rgb(68, 1, 84),    // Viridis 0
    Color32::from_rgb(59, 82, 139),  // Viridis 1
    Color32::from_rgb(33, 145, 140), // Viridis 2
    Color32::from_rgb(94, 201, 98),  // Viridis 3
    Color32::from_rgb(180, 200, 40), // Viridis 4
    Color32::from_rgb(40, 110, 150), // Viridis 5
];

/// Word-cloud canvas background (always light, like a printed cloud).
pub const WORDCLOUD_BG: Color32 = Color32::WHITE;

/// Warning text colour.
pub const WARNING_TEXT: Color32 = Color32::from_rgb(253, 186, 116); // Orange 300

/// Layout constants.
pub const SIDEBAR_WIDTH: f32 = 270.0;
pub const STATUS_BAR_HEIGHT: f32 = 28.0;
pub const CHART_HEIGHT: f32 = 300.0;
pub const KPI_TILE_HEIGHT: f32 = 64.0;
