// ReviewScope - gui.rs
//
// Top-level eframe::App implementation.
// Wires together all UI panels and manages the load lifecycle.

use crate::app::load::LoadManager;
use crate::app::state::AppState;
use crate::core::dataset::LoadConfig;
use crate::core::model::LoadProgress;
use crate::ui;
use crate::util::constants;
use crate::util::error::{ExportError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Export file format chosen from the File menu.
#[derive(Debug, Clone, Copy)]
enum ExportFormat {
    Csv,
    Json,
}

/// The ReviewScope application.
pub struct ReviewScopeApp {
    pub state: AppState,
    pub load_manager: LoadManager,
}

impl ReviewScopeApp {
    /// Create the application and start loading `initial_load`, if given.
    pub fn new(state: AppState, initial_load: Option<PathBuf>) -> Self {
        let mut app = Self {
            state,
            load_manager: LoadManager::new(),
        };
        if let Some(path) = initial_load {
            app.start_load(path);
        }
        app
    }

    fn start_load(&mut self, path: PathBuf) {
        self.state.load_path = Some(path.clone());
        self.state.load_in_progress = true;
        self.state.rows_read = 0;
        self.state.warnings.clear();
        self.state.status_message = format!("Loading {}...", path.display());
        self.load_manager.start_load(
            path,
            LoadConfig {
                max_rows: self.state.settings.max_rows,
            },
            Arc::clone(&self.state.lexicon),
        );
    }

    /// Apply pending load messages to the state.
    fn handle_progress(&mut self) -> bool {
        let messages = self.load_manager.poll_progress();
        let had_messages = !messages.is_empty();
        for msg in messages {
            match msg {
                LoadProgress::Started { path } => {
                    self.state.status_message = format!("Reading {}...", path.display());
                }
                LoadProgress::RowsRead { rows } => {
                    self.state.rows_read = rows;
                    self.state.status_message = format!("Reading... ({rows} rows)");
                }
                LoadProgress::Scoring { rows } => {
                    self.state.status_message = format!("Scoring sentiment of {rows} reviews...");
                }
                LoadProgress::Warning { message } => {
                    self.state.warnings.push(message);
                }
                LoadProgress::Completed { dataset, summary } => {
                    self.state.load_in_progress = false;
                    let skipped = summary.rows_skipped;
                    let elapsed = summary.duration.as_secs_f64();
                    self.state.set_dataset(*dataset, summary);
                    self.state.status_message = format!(
                        "Loaded {} reviews in {elapsed:.2}s{}",
                        self.state.records().len(),
                        if skipped > 0 {
                            format!(" ({skipped} rows skipped)")
                        } else {
                            String::new()
                        }
                    );
                }
                LoadProgress::Failed { error } => {
                    self.state.load_in_progress = false;
                    self.state.status_message = format!("Load failed: {error}");
                }
                LoadProgress::Cancelled => {
                    self.state.load_in_progress = false;
                    self.state.status_message = "Load cancelled.".to_string();
                }
            }
        }
        // Loader thread gone without a terminal message.
        if self.state.load_in_progress && !self.load_manager.is_running() {
            self.state.load_in_progress = false;
        }
        had_messages
    }

    /// Write the current selection to `dest`.
    fn export_selection(&self, dest: &Path, format: ExportFormat) -> Result<usize> {
        let records = self.state.filtered_records();
        let file = std::fs::File::create(dest).map_err(|e| ExportError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;
        let writer = std::io::BufWriter::new(file);
        let count = match format {
            ExportFormat::Csv => crate::core::export::export_csv(&records, writer, dest)?,
            ExportFormat::Json => crate::core::export::export_json(&records, writer, dest)?,
        };
        tracing::info!(path = %dest.display(), count, ?format, "Export written");
        Ok(count)
    }

    fn export_dialog(&mut self, format: ExportFormat) {
        let (name, ext, file_name) = match format {
            ExportFormat::Csv => ("CSV", "csv", "filtered_reviews.csv"),
            ExportFormat::Json => ("JSON", "json", "filtered_reviews.json"),
        };
        let Some(dest) = rfd::FileDialog::new()
            .add_filter(name, &[ext])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };
        match self.export_selection(&dest, format) {
            Ok(n) => {
                self.state.status_message = format!("Exported {n} reviews to {name}.");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Export failed");
                self.state.status_message = format!("{name} export failed: {e}");
            }
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open CSV\u{2026}").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("CSV", &["csv"])
                            .pick_file()
                        {
                            self.start_load(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    // Export sub-menu, enabled only when the selection is non-empty.
                    let has_rows = !self.state.filtered_indices.is_empty();
                    ui.add_enabled_ui(has_rows, |ui| {
                        ui.menu_button("Export", |ui| {
                            if ui.button("Export CSV\u{2026}").clicked() {
                                self.export_dialog(ExportFormat::Csv);
                                ui.close_menu();
                            }
                            if ui.button("Export JSON\u{2026}").clicked() {
                                self.export_dialog(ExportFormat::Json);
                                ui.close_menu();
                            }
                        });
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Load Summary").clicked() {
                        self.state.show_load_summary = true;
                        ui.close_menu();
                    }
                    if ui.button("Reset Filters").clicked() {
                        self.state.reset_filters();
                        ui.close_menu();
                    }
                    ui.separator();
                    let theme_label = if self.state.dark_mode {
                        "Light Theme"
                    } else {
                        "Dark Theme"
                    };
                    if ui.button(theme_label).clicked() {
                        self.state.dark_mode = !self.state.dark_mode;
                        ui.close_menu();
                    }
                });
                if ui.button("About").clicked() {
                    self.state.show_about = true;
                }
            });
        });
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    if self.state.load_in_progress {
                        ui.spinner();
                    }
                    ui.label(&self.state.status_message);
                    // Cancel button visible only while a load is running
                    if self.state.load_in_progress && ui.small_button("Cancel").clicked() {
                        self.load_manager.cancel_load();
                    }
                    let warning_count = self.state.warning_count();
                    if warning_count > 0
                        && ui
                            .small_button(
                                egui::RichText::new(format!("\u{26a0} {warning_count} warnings"))
                                .color(ui::theme::WARNING_TEXT),
                            )
                            .clicked()
                    {
                        self.state.show_load_summary = true;
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let total = self.state.records().len();
                        if total > 0 {
                            let filtered = self.state.filtered_indices.len();
                            ui.label(format!("{filtered}/{total} reviews"));
                        }
                    });
                });
            });
    }
}

impl eframe::App for ReviewScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.state.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        // Repaint while loading so progress updates appear promptly.
        if self.handle_progress() || self.load_manager.is_running() {
            ctx.request_repaint();
        }

        self.menu_bar(ctx);
        self.status_bar(ctx);

        egui::SidePanel::left("sidebar")
            .default_width(ui::theme::SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("sidebar_filters")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui::panels::filters::render(ui, &mut self.state);
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("dashboard")
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.heading(
                        egui::RichText::new(format!("\u{1f3ac} {}", constants::DASHBOARD_TITLE))
                            .size(26.0),
                    );
                    ui.label(format!(
                        "Explore {} IMDB reviews through interactive sentiment analysis.",
                        self.state.records().len()
                    ));
                    ui.label(
                        "Use the filters in the sidebar to drill into specific genres, \
                         keywords, and emotional profiles.",
                    );
                    ui.add_space(8.0);

                    if self.state.dataset.is_none() {
                        ui.add_space(40.0);
                        ui.vertical_centered(|ui| {
                            ui.label(
                                egui::RichText::new(if self.state.load_in_progress {
                                    format!("Loading... {} rows read", self.state.rows_read)
                                } else {
                                    "No reviews loaded.\nOpen a CSV via File \u{2192} Open CSV."
                                        .to_string()
                                })
                                .size(16.0)
                                .weak(),
                            );
                        });
                        return;
                    }

                    ui::panels::kpis::render(ui, &self.state);
                    ui.separator();
                    ui::panels::charts::render(ui, &self.state);
                    ui.add_space(12.0);
                    ui::panels::wordcloud::render(ui, &mut self.state);
                });
        });

        // Dialogs
        ui::panels::load_summary::render(ctx, &mut self.state);
        ui::panels::about::render(ctx, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::ViewSettings;
    use crate::core::sentiment::Lexicon;
    use std::time::{Duration, Instant};

    fn sample_csv() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("reviews_sample.csv")
    }

    fn wait_for_load(app: &mut ReviewScopeApp) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.state.load_in_progress && Instant::now() < deadline {
            app.handle_progress();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!app.state.load_in_progress, "load did not finish");
    }

    #[test]
    fn test_startup_warnings_survive_initial_load() {
        let mut state = AppState::new(Arc::new(Lexicon::builtin()), ViewSettings::default(), false);
        state
            .startup_warnings
            .push("User lexicon rejected: polarity out of range".to_string());

        let mut app = ReviewScopeApp::new(state, Some(sample_csv()));
        assert_eq!(app.state.startup_warnings.len(), 1);

        wait_for_load(&mut app);
        assert_eq!(app.state.records().len(), 8);
        assert_eq!(app.state.startup_warnings.len(), 1);
        assert!(app.state.warning_count() >= 1);
    }

    #[test]
    fn test_new_load_clears_only_load_warnings() {
        let mut state = AppState::new(Arc::new(Lexicon::builtin()), ViewSettings::default(), false);
        state.startup_warnings.push("Config parse error".to_string());
        state.warnings.push("row 3 skipped".to_string());

        let mut app = ReviewScopeApp::new(state, None);
        app.start_load(sample_csv());
        assert!(app.state.warnings.is_empty());
        assert_eq!(app.state.startup_warnings, vec!["Config parse error"]);
        wait_for_load(&mut app);
    }
}
