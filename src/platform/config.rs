// ReviewScope - platform/config.rs
//
// Platform configuration directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for ReviewScope configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/reviewscope/ or %APPDATA%\ReviewScope\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file still loads.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub dataset: DatasetSection,
    pub sentiment: SentimentSection,
    pub charts: ChartsSection,
    pub wordcloud: WordCloudSection,
    pub ui: UiSection,
    pub logging: LoggingSection,
}

/// `[dataset]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DatasetSection {
    /// CSV file loaded at startup.
    pub path: Option<String>,
    /// Row cap.
    pub max_rows: Option<usize>,
}

/// `[sentiment]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SentimentSection {
    /// User lexicon TOML merged over the built-in one.
    pub lexicon_file: Option<String>,
}

/// `[charts]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ChartsSection {
    pub histogram_bins: Option<usize>,
}

/// `[wordcloud]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct WordCloudSection {
    pub max_words: Option<usize>,
    pub extra_stopwords: Option<Vec<String>>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Dataset --
    pub dataset_path: Option<PathBuf>,
    pub max_rows: usize,

    // -- Sentiment --
    /// Resolved against the config directory when relative.
    pub lexicon_file: Option<PathBuf>,

    // -- Charts --
    pub histogram_bins: usize,

    // -- Word cloud --
    pub wordcloud_max_words: usize,
    pub extra_stopwords: Vec<String>,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            max_rows: constants::DEFAULT_MAX_ROWS,
            lexicon_file: None,
            histogram_bins: constants::DEFAULT_HISTOGRAM_BINS,
            wordcloud_max_words: constants::DEFAULT_WORDCLOUD_MAX_WORDS,
            extra_stopwords: constants::DEFAULT_EXTRA_STOPWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            dark_mode: true,
            log_level: None,
            log_file: None,
        }
    }
}

fn out_of_range(
    field: &str,
    value: impl ToString,
    expected: String,
    default: impl ToString,
) -> String {
    let err = ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    };
    format!("{err}. Using default ({}).", default.to_string())
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults with one warning so the application
/// still starts but the user is told.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.clone(),
                source: e,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path.clone(),
                source: e,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, config_dir, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

/// Check every field against its named limits, accumulating all problems.
fn validate(raw: RawConfig, config_dir: &Path, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Dataset --
    if let Some(path) = raw.dataset.path.filter(|p| !p.trim().is_empty()) {
        config.dataset_path = Some(PathBuf::from(path));
    }
    if let Some(rows) = raw.dataset.max_rows {
        if (constants::MIN_MAX_ROWS..=constants::ABSOLUTE_MAX_ROWS).contains(&rows) {
            config.max_rows = rows;
        } else {
            warnings.push(out_of_range(
                "dataset.max_rows",
                rows,
                format!("{}-{}", constants::MIN_MAX_ROWS, constants::ABSOLUTE_MAX_ROWS),
                constants::DEFAULT_MAX_ROWS,
            ));
        }
    }

    // -- Sentiment --
    if let Some(file) = raw.sentiment.lexicon_file.filter(|f| !f.trim().is_empty()) {
        let path = PathBuf::from(file);
        config.lexicon_file = Some(if path.is_relative() {
            config_dir.join(path)
        } else {
            path
        });
    }

    // -- Charts --
    if let Some(bins) = raw.charts.histogram_bins {
        if (constants::MIN_HISTOGRAM_BINS..=constants::MAX_HISTOGRAM_BINS).contains(&bins) {
            config.histogram_bins = bins;
        } else {
            warnings.push(out_of_range(
                "charts.histogram_bins",
                bins,
                format!(
                    "{}-{}",
                    constants::MIN_HISTOGRAM_BINS,
                    constants::MAX_HISTOGRAM_BINS
                ),
                constants::DEFAULT_HISTOGRAM_BINS,
            ));
        }
    }

    // -- Word cloud --
    if let Some(words) = raw.wordcloud.max_words {
        if (1..=constants::ABSOLUTE_MAX_WORDCLOUD_WORDS).contains(&words) {
            config.wordcloud_max_words = words;
        } else {
            warnings.push(out_of_range(
                "wordcloud.max_words",
                words,
                format!("1-{}", constants::ABSOLUTE_MAX_WORDCLOUD_WORDS),
                constants::DEFAULT_WORDCLOUD_MAX_WORDS,
            ));
        }
    }
    if let Some(extra) = raw.wordcloud.extra_stopwords {
        config.extra_stopwords = extra
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => warnings.push(out_of_range(
                "ui.theme",
                other,
                "\"dark\" or \"light\"".to_string(),
                "dark",
            )),
        }
    }

    // -- Logging --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(out_of_range(
                "logging.level",
                level,
                "error, warn, info, debug, trace".to_string(),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) {
        fs::write(dir.path().join(constants::CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert_eq!(config.max_rows, constants::DEFAULT_MAX_ROWS);
        assert_eq!(config.histogram_bins, constants::DEFAULT_HISTOGRAM_BINS);
        assert_eq!(config.extra_stopwords, vec!["br".to_string()]);
        assert!(config.dark_mode);
    }

    #[test]
    fn test_valid_values_applied() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
[dataset]
path = "reviews.csv"
max_rows = 500

[sentiment]
lexicon_file = "mine.toml"

[charts]
histogram_bins = 20

[wordcloud]
max_words = 50
extra_stopwords = ["Movie", " film ", ""]

[ui]
theme = "Light"

[logging]
level = "DEBUG"
file = ""
"#,
        );
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.dataset_path, Some(PathBuf::from("reviews.csv")));
        assert_eq!(config.max_rows, 500);
        assert_eq!(config.lexicon_file, Some(dir.path().join("mine.toml")));
        assert_eq!(config.histogram_bins, 20);
        assert_eq!(config.wordcloud_max_words, 50);
        assert_eq!(config.extra_stopwords, vec!["movie", "film"]);
        assert!(!config.dark_mode);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_out_of_range_values_warn_and_default() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
[dataset]
max_rows = 0

[charts]
histogram_bins = 1

[wordcloud]
max_words = 5000

[ui]
theme = "purple"

[logging]
level = "verbose"
"#,
        );
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 5);
        assert!(warnings[0].contains("dataset.max_rows"));
        assert!(warnings.iter().all(|w| w.contains("Using default")));
        assert_eq!(config.max_rows, constants::DEFAULT_MAX_ROWS);
        assert_eq!(config.histogram_bins, constants::DEFAULT_HISTOGRAM_BINS);
        assert_eq!(
            config.wordcloud_max_words,
            constants::DEFAULT_WORDCLOUD_MAX_WORDS
        );
        assert!(config.dark_mode);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_unparseable_file_warns() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[dataset\nmax_rows = ");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));
        assert_eq!(config.max_rows, constants::DEFAULT_MAX_ROWS);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[future]\nsetting = 1\n[charts]\nhistogram_bins = 10\n");
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert_eq!(config.histogram_bins, 10);
    }

    #[test]
    fn test_absolute_lexicon_path_kept() {
        let dir = TempDir::new().unwrap();
        let abs = dir.path().join("abs.toml");
        write_config(
            &dir,
            &format!("[sentiment]\nlexicon_file = '{}'\n", abs.display()),
        );
        let (config, _) = load_config(dir.path());
        assert_eq!(config.lexicon_file, Some(abs));
    }
}
