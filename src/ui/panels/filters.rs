// ReviewScope - ui/panels/filters.rs
//
// Filter controls sidebar. Every control edits `state.filter_state` and
// triggers one recompute per frame at most.

use crate::app::state::AppState;
use crate::core::model::SentimentLabel;
use crate::ui::theme;

/// Render the filter controls.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("\u{1f50e} Filters");
    ui.separator();

    let mut changed = false;

    if ui.button("Reset Filters").clicked() {
        state.reset_filters();
    }

    ui.add_space(6.0);

    // Sentiment category
    ui.strong("Sentiment Category");
    for &label in SentimentLabel::all() {
        let mut checked = state.filter_state.labels.contains(&label);
        let text = egui::RichText::new(label.label()).color(theme::label_colour(label));
        if ui.checkbox(&mut checked, text).changed() {
            if checked {
                state.filter_state.labels.insert(label);
            } else {
                state.filter_state.labels.remove(&label);
            }
            changed = true;
        }
    }

    ui.separator();

    // Review length
    ui.strong("Review Length");
    let (len_min, len_max) = state.facets.length_bounds;
    let (lo, hi) = &mut state.filter_state.length_range;
    changed |= ui
        .add(egui::Slider::new(lo, len_min..=len_max).text("min"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(hi, len_min..=len_max).text("max"))
        .changed();
    if *lo > *hi {
        std::mem::swap(lo, hi);
    }

    ui.separator();

    // Keyword
    ui.strong("Keyword (optional)");
    let response = ui.text_edit_singleline(&mut state.keyword_input);
    let regex_toggled = ui.checkbox(&mut state.regex_mode, "Regex").changed();
    if response.changed() || regex_toggled {
        state.sync_keyword();
        changed = true;
    }
    if let Some(ref err) = state.keyword_error {
        ui.label(
            egui::RichText::new(err)
                .small()
                .color(theme::WARNING_TEXT),
        );
    }

    ui.separator();

    // Sentiment polarity
    ui.strong("Sentiment Polarity");
    let bounds = state.facets.polarity_bounds;
    let (lo, hi) = &mut state.filter_state.polarity_range;
    let mut polarity_changed = ui.add(polarity_slider(lo, bounds, "min")).changed();
    polarity_changed |= ui.add(polarity_slider(hi, bounds, "max")).changed();
    if polarity_changed {
        state.filter_state.polarity_range =
            snap_polarity_range(state.filter_state.polarity_range, bounds);
        changed = true;
    }

    ui.separator();

    // Genre multi-select
    ui.horizontal(|ui| {
        ui.strong("Genre");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("None").clicked() {
                state.filter_state.genres.clear();
                changed = true;
            }
            if ui.small_button("All").clicked() {
                state.filter_state.genres = state.facets.categories.iter().cloned().collect();
                changed = true;
            }
        });
    });
    if state.facets.categories.is_empty() {
        ui.label(egui::RichText::new("No genre column").weak());
    }
    egui::ScrollArea::vertical()
        .id_salt("genre_list")
        .max_height(160.0)
        .show(ui, |ui| {
            for genre in &state.facets.categories {
                let mut checked = state.filter_state.genres.contains(genre);
                if ui.checkbox(&mut checked, genre.as_str()).changed() {
                    if checked {
                        state.filter_state.genres.insert(genre.clone());
                    } else {
                        state.filter_state.genres.remove(genre);
                    }
                    changed = true;
                }
            }
        });

    ui.separator();

    // Movie title and reviewer
    ui.strong("Movie Title");
    changed |= choice_combo(
        ui,
        "title_combo",
        &state.facets.titles,
        &mut state.filter_state.title,
    );

    ui.add_space(4.0);
    ui.strong("Reviewer");
    changed |= choice_combo(
        ui,
        "author_combo",
        &state.facets.authors,
        &mut state.filter_state.author,
    );

    if changed {
        state.apply_filters();
    }
}

/// Drop-down with an "All" entry followed by every option.
/// Returns true when the selection changed.
fn choice_combo(
    ui: &mut egui::Ui,
    id: &str,
    options: &[String],
    selected: &mut Option<String>,
) -> bool {
    let before = selected.clone();
    let shown = selected.as_deref().unwrap_or("All").to_string();

    egui::ComboBox::from_id_salt(id)
        .selected_text(shown)
        .width(ui.available_width() - 8.0)
        .height(300.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(selected, None, "All");
            for option in options {
                ui.selectable_value(selected, Some(option.clone()), option.as_str());
            }
        });

    *selected != before
}

/// Polarity slider showing two decimals. The stored value is not rounded,
/// so a handle at either end keeps the exact data bound.
fn polarity_slider<'a>(value: &'a mut f64, bounds: (f64, f64), text: &str) -> egui::Slider<'a> {
    egui::Slider::new(value, bounds.0..=bounds.1)
        .text(text)
        .smart_aim(false)
        .custom_formatter(|v, _| format!("{v:.2}"))
}

/// Order the handles and pull any handle within display precision of a data
/// bound onto that bound, so the extreme reviews stay selected.
fn snap_polarity_range(range: (f64, f64), bounds: (f64, f64)) -> (f64, f64) {
    let (mut lo, mut hi) = if range.0 > range.1 {
        (range.1, range.0)
    } else {
        range
    };
    if lo - bounds.0 < POLARITY_SNAP {
        lo = bounds.0;
    }
    if bounds.1 - hi < POLARITY_SNAP {
        hi = bounds.1;
    }
    (lo, hi)
}

/// Half a display step of the two-decimal polarity sliders.
const POLARITY_SNAP: f64 = 0.005;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::apply_filters;
    use crate::core::model::ReviewRecord;

    #[test]
    fn test_snap_keeps_extreme_polarity_selected() {
        let records = vec![
            ReviewRecord::new(0, "meh".into(), -0.2, Some("Drama".into()), None, None),
            ReviewRecord::new(1, "wow".into(), 0.984, Some("Drama".into()), None, None),
        ];
        let facets = crate::core::model::DatasetFacets::from_records(&records);
        let mut filter = crate::core::filter::FilterState::for_facets(&facets);

        // Handle dragged to the end but landing on the rounded value.
        filter.polarity_range = (-0.2, 0.98);
        assert_eq!(apply_filters(&records, &filter), vec![0]);

        filter.polarity_range = snap_polarity_range(filter.polarity_range, facets.polarity_bounds);
        assert_eq!(filter.polarity_range, (-0.2, 0.984));
        assert_eq!(apply_filters(&records, &filter), vec![0, 1]);
    }

    #[test]
    fn test_snap_orders_handles_and_leaves_inner_values() {
        let bounds = (-0.8, 0.9);
        assert_eq!(snap_polarity_range((0.5, -0.3), bounds), (-0.3, 0.5));
        assert_eq!(snap_polarity_range((-0.797, 0.896), bounds), (-0.8, 0.9));
        assert_eq!(snap_polarity_range((-0.7, 0.8), bounds), (-0.7, 0.8));
    }
}
