// ReviewScope - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and validation
// 3. Logging initialisation (debug mode support)
// 4. Lexicon loading (built-in + user-defined)
// 5. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can use
// `crate::app::...`, `crate::core::...` etc.
pub use reviewscope::app;
pub use reviewscope::core;
pub use reviewscope::platform;
pub use reviewscope::ui;
pub use reviewscope::util;

use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configure fonts for the egui context.
///
/// On Windows, adds Segoe UI Emoji and Segoe UI Symbol from the system font
/// directory as fallbacks so the emoji in headings and KPI captions render.
/// On other platforms the egui defaults are used unchanged.
fn configure_fonts(ctx: &egui::Context) {
    #[cfg(target_os = "windows")]
    {
        let mut fonts = egui::FontDefinitions::default();
        let candidates: &[(&str, &str)] = &[
            ("Segoe UI Emoji", r"C:\Windows\Fonts\seguiemj.ttf"),
            ("Segoe UI Symbol", r"C:\Windows\Fonts\seguisym.ttf"),
        ];

        let mut loaded = 0usize;
        for (name, path) in candidates {
            match std::fs::read(path) {
                Ok(data) => {
                    fonts
                        .font_data
                        .insert((*name).to_owned(), egui::FontData::from_owned(data).into());
                    if let Some(family) = fonts.families.get_mut(&egui::FontFamily::Proportional) {
                        family.push((*name).to_owned());
                    }
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(font = name, error = %e, "Failed to load Windows system font");
                }
            }
        }

        if loaded > 0 {
            ctx.set_fonts(fonts);
        }
    }

    #[cfg(not(target_os = "windows"))]
    let _ = ctx;
}

/// ReviewScope - IMDB movie review sentiment dashboard.
///
/// Loads a sample of reviews from a CSV file, scores their sentiment with a
/// lexicon, and shows filterable KPIs, charts and a word cloud.
#[derive(Parser, Debug)]
#[command(name = "reviewscope", version, about)]
struct Cli {
    /// Review CSV to load (defaults to the configured dataset, then
    /// IMDB_dataset_320.000_reviews.csv in the working directory).
    path: Option<PathBuf>,

    /// Maximum number of data rows to read.
    #[arg(short = 'n', long = "max-rows")]
    max_rows: Option<usize>,

    /// User lexicon TOML merged over the built-in lexicon.
    #[arg(short = 'l', long = "lexicon")]
    lexicon: Option<PathBuf>,

    /// Colour theme.
    #[arg(short = 't', long = "theme", value_parser = ["dark", "light"])]
    theme: Option<String>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Dataset to load at startup: CLI path, then config path, then the default
/// file if it exists in the working directory.
fn initial_dataset(cli_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Option<PathBuf> {
    cli_path.or(config_path).or_else(|| {
        let default = Path::new(util::constants::DEFAULT_DATASET_FILE);
        default.exists().then(|| default.to_path_buf())
    })
}

fn main() {
    let cli = Cli::parse();

    // Config comes first so its [logging] section can shape the subscriber.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (config, mut startup_warnings) = platform::config::load_config(&platform_paths.config_dir);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref().map(Path::new),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config_dir = %platform_paths.config_dir.display(),
        "ReviewScope starting"
    );
    for warning in &startup_warnings {
        tracing::warn!("{}", warning);
    }

    // CLI values override config values.
    let mut max_rows = config.max_rows;
    if let Some(rows) = cli.max_rows {
        let range = util::constants::MIN_MAX_ROWS..=util::constants::ABSOLUTE_MAX_ROWS;
        if range.contains(&rows) {
            max_rows = rows;
        } else {
            let msg = format!(
                "--max-rows {rows} is out of range ({}-{}). Using {max_rows}.",
                range.start(),
                range.end()
            );
            tracing::warn!("{}", msg);
            startup_warnings.push(msg);
        }
    }

    let lexicon_file = cli.lexicon.clone().or_else(|| config.lexicon_file.clone());
    let (lexicon, lexicon_errors) = app::lexicon_mgr::load_lexicon(lexicon_file.as_deref());
    startup_warnings.extend(lexicon_errors.iter().map(|e| e.to_string()));

    let dark_mode = match cli.theme.as_deref() {
        Some("light") => false,
        Some(_) => true,
        None => config.dark_mode,
    };

    let settings = app::state::ViewSettings {
        max_rows,
        histogram_bins: config.histogram_bins,
        wordcloud_max_words: config.wordcloud_max_words,
        extra_stopwords: config.extra_stopwords.clone(),
    };

    let mut state = app::state::AppState::new(Arc::new(lexicon), settings, cli.debug);
    state.dark_mode = dark_mode;
    state.startup_warnings = startup_warnings;

    let initial_load = initial_dataset(cli.path, config.dataset_path);
    if initial_load.is_none() {
        tracing::info!("No dataset given and default file not found; waiting for File > Open");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            configure_fonts(&cc.egui_ctx);
            Ok(Box::new(gui::ReviewScopeApp::new(state, initial_load)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch ReviewScope GUI: {e}");
        std::process::exit(1);
    }
}
