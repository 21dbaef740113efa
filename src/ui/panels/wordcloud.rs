// ReviewScope - ui/panels/wordcloud.rs
//
// Word cloud of the selected reviews. The layout is computed in canvas
// coordinates on first draw after a filter change (it needs font metrics)
// and cached in the app state; drawing scales it to the available width.

use crate::app::state::AppState;
use crate::core::wordcloud;
use crate::ui::theme;
use crate::util::constants;
use egui::{Align2, Color32, FontId, Pos2, Sense};

/// Render the word cloud section.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("\u{2601} Word Cloud of Selected Reviews");

    if state.word_frequencies.is_empty() {
        ui.label(egui::RichText::new("No words to show for the current selection.").weak());
        return;
    }

    let (width, height) = (constants::WORDCLOUD_WIDTH, constants::WORDCLOUD_HEIGHT);

    if state.wordcloud_layout.is_none() {
        let placed = wordcloud::layout_words(
            &state.word_frequencies,
            width,
            height,
            height / 4.0,
            |word, size| {
                let galley = ui.fonts(|f| {
                    f.layout_no_wrap(word.to_string(), FontId::proportional(size), Color32::BLACK)
                });
                (galley.size().x, galley.size().y)
            },
        );
        tracing::debug!(
            words = state.word_frequencies.len(),
            placed = placed.len(),
            "Word cloud laid out"
        );
        state.wordcloud_layout = Some(placed);
    }

    let scale = (ui.available_width() / width).min(1.0);
    let (response, painter) =
        ui.allocate_painter(egui::vec2(width * scale, height * scale), Sense::hover());
    let origin = response.rect.min;
    painter.rect_filled(response.rect, 4.0, theme::WORDCLOUD_BG);

    let Some(ref placed) = state.wordcloud_layout else {
        return;
    };

    let mut hovered = None;
    for word in placed {
        let min = origin + egui::vec2(word.bounds.x, word.bounds.y) * scale;
        let colour = theme::WORDCLOUD_PALETTE[word.rank % theme::WORDCLOUD_PALETTE.len()];
        painter.text(
            Pos2::new(min.x, min.y),
            Align2::LEFT_TOP,
            &word.word,
            FontId::proportional(word.font_size * scale),
            colour,
        );

        if let Some(pos) = response.hover_pos() {
            let rect = egui::Rect::from_min_size(
                min,
                egui::vec2(word.bounds.w, word.bounds.h) * scale,
            );
            if rect.contains(pos) {
                hovered = Some(word.rank);
            }
        }
    }

    if let Some(rank) = hovered {
        if let Some(freq) = state.word_frequencies.get(rank) {
            response.on_hover_text_at_pointer(format!("{}: {}", freq.word, freq.count));
        }
    }
}
