// ReviewScope - ui/panels/load_summary.rs
//
// Load summary modal window.
// Shows row counts, the label split and any missing optional columns.
// Startup and load warnings are also listed.

use crate::app::state::AppState;
use crate::core::model::SentimentLabel;
use crate::ui::theme;

/// Render the load summary dialog (if state.show_load_summary is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_load_summary {
        return;
    }

    let mut open = true;
    egui::Window::new("Load Summary")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .min_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(ref summary) = state.load_summary {
                // -----------------------------------------------------------------
                // Overall statistics
                // -----------------------------------------------------------------
                ui.strong("Overview");
                egui::Grid::new("load_summary_overview")
                    .num_columns(2)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("File:");
                        ui.label(
                            egui::RichText::new(summary.source.display().to_string())
                                .monospace()
                                .size(11.5),
                        );
                        ui.end_row();

                        ui.label("Rows loaded:");
                        ui.label(summary.rows_loaded.to_string());
                        ui.end_row();

                        ui.label("Row cap:");
                        let cap = if summary.truncated {
                            format!("{} (file has more rows)", summary.max_rows)
                        } else {
                            summary.max_rows.to_string()
                        };
                        ui.label(cap);
                        ui.end_row();

                        ui.label("Rows skipped:");
                        let skip_colour = if summary.rows_skipped > 0 {
                            theme::WARNING_TEXT
                        } else {
                            ui.style().visuals.text_color()
                        };
                        ui.colored_label(skip_colour, summary.rows_skipped.to_string());
                        ui.end_row();

                        for &label in SentimentLabel::all() {
                            ui.colored_label(theme::label_colour(label), format!("{label}:"));
                            ui.label(summary.label_counts[label.index()].to_string());
                            ui.end_row();
                        }

                        ui.label("Duration:");
                        ui.label(format!("{:.2}s", summary.duration.as_secs_f64()));
                        ui.end_row();

                        ui.label("Loaded at:");
                        ui.label(
                            summary
                                .loaded_at
                                .with_timezone(&chrono::Local)
                                .format("%Y-%m-%d %H:%M:%S")
                                .to_string(),
                        );
                        ui.end_row();
                    });

                if !summary.missing_columns.is_empty() {
                    ui.add_space(6.0);
                    ui.colored_label(
                        theme::WARNING_TEXT,
                        format!(
                            "Missing optional columns: {}",
                            summary.missing_columns.join(", ")
                        ),
                    );
                }
            } else {
                ui.label("No dataset has been loaded yet.");
            }

            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(format!(
                    "Lexicon: {} ({} words)",
                    state.lexicon.name,
                    state.lexicon.len()
                ))
                .weak(),
            );

            // -----------------------------------------------------------------
            // Warnings
            // -----------------------------------------------------------------
            if state.warning_count() > 0 {
                ui.add_space(8.0);
                ui.separator();
                ui.strong(format!("Warnings ({})", state.warning_count()));

                egui::ScrollArea::vertical()
                    .id_salt("load_summary_warnings")
                    .max_height(160.0)
                    .show(ui, |ui| {
                        for warn in state.all_warnings() {
                            ui.label(
                                egui::RichText::new(warn)
                                    .color(theme::WARNING_TEXT)
                                    .size(11.5),
                            );
                        }
                    });
            }

            ui.add_space(8.0);
            ui.separator();
            if ui.button("Close").clicked() {
                state.show_load_summary = false;
            }
        });

    if !open {
        state.show_load_summary = false;
    }
}
