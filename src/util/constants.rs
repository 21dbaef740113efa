// ReviewScope - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ReviewScope";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ReviewScope";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Window title shown above the dashboard.
pub const DASHBOARD_TITLE: &str = "IMDB Movie Review Sentiment Dashboard";

// =============================================================================
// Dataset ingestion
// =============================================================================

/// Dataset file looked up in the working directory when no path is given.
pub const DEFAULT_DATASET_FILE: &str = "IMDB_dataset_320.000_reviews.csv";

/// Default number of data rows read from the CSV.
pub const DEFAULT_MAX_ROWS: usize = 10_000;

/// Minimum sensible row cap.
pub const MIN_MAX_ROWS: usize = 1;

/// Hard upper bound on the row cap. Every row holds its full review text in
/// memory and is re-filtered on each interaction, so this keeps the UI
/// responsive.
pub const ABSOLUTE_MAX_ROWS: usize = 500_000;

/// Rows read between `LoadProgress::RowsRead` messages.
pub const LOAD_PROGRESS_INTERVAL: usize = 1_000;

/// Name of the required review text column.
pub const COLUMN_REVIEW: &str = "review";

/// Name of the optional genre column.
pub const COLUMN_CATEGORY: &str = "category";

/// Name of the optional movie title column.
pub const COLUMN_TITLE: &str = "original title";

/// Name of the optional reviewer column.
pub const COLUMN_AUTHOR: &str = "author";

/// Maximum number of non-fatal warnings accumulated during a load.
pub const MAX_WARNINGS: usize = 1_000;

// =============================================================================
// Sentiment
// =============================================================================

/// Polarity strictly above this is labelled Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;

/// Polarity strictly below this is labelled Negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Multiplier applied to a sentiment word preceded by a negator.
pub const NEGATION_FACTOR: f64 = -0.5;

/// Number of tokens a pending intensifier or negator stays active for.
pub const MODIFIER_WINDOW: usize = 3;

/// Maximum size of a user lexicon TOML file in bytes.
pub const MAX_LEXICON_FILE_SIZE: u64 = 1024 * 1024; // 1 MB

/// Maximum number of entries a lexicon may hold.
pub const MAX_LEXICON_ENTRIES: usize = 50_000;

// =============================================================================
// Charts
// =============================================================================

/// Default number of histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// Minimum configurable number of histogram bins.
pub const MIN_HISTOGRAM_BINS: usize = 2;

/// Maximum configurable number of histogram bins.
pub const MAX_HISTOGRAM_BINS: usize = 500;

/// Whisker reach of the box plot, in interquartile ranges.
pub const BOX_WHISKER_IQR: f64 = 1.5;

// =============================================================================
// Word cloud
// =============================================================================

/// Default number of words shown in the cloud.
pub const DEFAULT_WORDCLOUD_MAX_WORDS: usize = 200;

/// Maximum configurable number of cloud words.
pub const ABSOLUTE_MAX_WORDCLOUD_WORDS: usize = 1_000;

/// Extra stop-words applied on top of the built-in list. IMDB reviews carry
/// `<br />` line breaks that would otherwise dominate the cloud.
pub const DEFAULT_EXTRA_STOPWORDS: &[&str] = &["br"];

/// Word cloud canvas size in points.
pub const WORDCLOUD_WIDTH: f32 = 800.0;
pub const WORDCLOUD_HEIGHT: f32 = 400.0;

/// Weight of relative frequency in the font size (0 = rank only, 1 = linear).
pub const WORDCLOUD_RELATIVE_SCALING: f32 = 0.5;

/// Smallest font size before a word that does not fit is dropped.
pub const WORDCLOUD_MIN_FONT_SIZE: f32 = 6.0;

/// Font size reduction per failed placement attempt.
pub const WORDCLOUD_FONT_STEP: f32 = 2.0;

/// Angular step of the placement spiral (radians).
pub const WORDCLOUD_SPIRAL_STEP: f32 = 0.35;

/// Upper bound on spiral positions tried per word and font size.
pub const WORDCLOUD_MAX_SPIRAL_STEPS: usize = 4_000;

// =============================================================================
// UI
// =============================================================================

/// Maximum number of load-progress messages processed by the UI per frame.
pub const MAX_LOAD_MESSAGES_PER_FRAME: usize = 200;

/// Number of entries above which an export is refused.
pub const MAX_EXPORT_ROWS: usize = ABSOLUTE_MAX_ROWS;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
