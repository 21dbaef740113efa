// ReviewScope - app/state.rs
//
// Application state management. Holds the loaded dataset, the filter state,
// the current selection and every view derived from it.
// Owned by the eframe::App implementation.

use crate::core::aggregate::DashboardView;
use crate::core::filter::{self, FilterState};
use crate::core::model::{Dataset, DatasetFacets, LoadSummary, ReviewRecord};
use crate::core::sentiment::Lexicon;
use crate::core::wordcloud::{self, PlacedWord, WordFrequency};
use crate::util::constants;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Settings that shape the derived views and the next load.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub max_rows: usize,
    pub histogram_bins: usize,
    pub wordcloud_max_words: usize,
    pub extra_stopwords: Vec<String>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            max_rows: constants::DEFAULT_MAX_ROWS,
            histogram_bins: constants::DEFAULT_HISTOGRAM_BINS,
            wordcloud_max_words: constants::DEFAULT_WORDCLOUD_MAX_WORDS,
            extra_stopwords: constants::DEFAULT_EXTRA_STOPWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Lexicon used to score the next load.
    pub lexicon: Arc<Lexicon>,

    pub settings: ViewSettings,

    /// Stop-words for the word cloud (built-in plus configured extras).
    stopwords: HashSet<String>,

    /// Currently loaded dataset, if any.
    pub dataset: Option<Dataset>,

    /// Summary of the most recent completed load.
    pub load_summary: Option<LoadSummary>,

    /// Distinct values and ranges of the loaded dataset.
    pub facets: DatasetFacets,

    /// Current filter configuration.
    pub filter_state: FilterState,

    /// Text of the keyword box. Compiled into `filter_state` in regex mode.
    pub keyword_input: String,

    /// Whether the keyword box is a regular expression.
    pub regex_mode: bool,

    /// Error from the last regex compile, shown under the keyword box.
    pub keyword_error: Option<String>,

    /// Indices of records matching the current filter (into `dataset.records`).
    pub filtered_indices: Vec<usize>,

    /// Aggregates for the current selection.
    pub view: DashboardView,

    /// Word frequencies for the current selection.
    pub word_frequencies: Vec<WordFrequency>,

    /// Word-cloud layout, computed lazily by the UI (needs font metrics).
    pub wordcloud_layout: Option<Vec<PlacedWord>>,

    /// Path of the load in progress or last requested.
    pub load_path: Option<PathBuf>,

    /// Whether a load is currently in progress.
    pub load_in_progress: bool,

    /// Rows read so far by the load in progress.
    pub rows_read: usize,

    /// Status message for the status bar.
    pub status_message: String,

    /// Config and lexicon warnings from startup. Kept for the whole session.
    pub startup_warnings: Vec<String>,

    /// Non-fatal warnings from the current load. Cleared when a load starts.
    pub warnings: Vec<String>,

    /// Whether to show the load summary dialog.
    pub show_load_summary: bool,

    /// Whether to show the about dialog.
    pub show_about: bool,

    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    pub fn new(lexicon: Arc<Lexicon>, settings: ViewSettings, debug_mode: bool) -> Self {
        let stopwords = wordcloud::stopword_set(&settings.extra_stopwords);
        let facets = DatasetFacets::default();
        Self {
            lexicon,
            settings,
            stopwords,
            dataset: None,
            load_summary: None,
            filter_state: FilterState::for_facets(&facets),
            facets,
            keyword_input: String::new(),
            regex_mode: false,
            keyword_error: None,
            filtered_indices: Vec::new(),
            view: DashboardView::default(),
            word_frequencies: Vec::new(),
            wordcloud_layout: None,
            load_path: None,
            load_in_progress: false,
            rows_read: 0,
            status_message: "Ready. Open a review CSV to begin.".to_string(),
            startup_warnings: Vec::new(),
            warnings: Vec::new(),
            show_load_summary: false,
            show_about: false,
            dark_mode: true,
            debug_mode,
        }
    }

    /// Loaded records, or an empty slice before the first load.
    pub fn records(&self) -> &[ReviewRecord] {
        self.dataset.as_ref().map_or(&[][..], |d| d.records.as_slice())
    }

    /// Install a freshly loaded dataset and select everything in it.
    pub fn set_dataset(&mut self, dataset: Dataset, summary: LoadSummary) {
        self.facets = DatasetFacets::from_records(&dataset.records);
        self.status_message = format!(
            "{} reviews loaded from {}",
            dataset.records.len(),
            dataset.source.display()
        );
        self.dataset = Some(dataset);
        self.load_summary = Some(summary);
        self.reset_filters();
    }

    /// Restore the "everything selected" filter and recompute.
    pub fn reset_filters(&mut self) {
        self.filter_state = FilterState::for_facets(&self.facets);
        self.keyword_input.clear();
        self.keyword_error = None;
        self.apply_filters();
    }

    /// Push the keyword box into the filter, compiling it in regex mode.
    /// An invalid pattern keeps the previous regex and records the error.
    pub fn sync_keyword(&mut self) {
        if self.regex_mode {
            self.filter_state.keyword.clear();
            match self.filter_state.set_keyword_regex(self.keyword_input.trim()) {
                Ok(()) => self.keyword_error = None,
                Err(e) => self.keyword_error = Some(e.to_string()),
            }
        } else {
            self.filter_state.keyword_regex = None;
            self.filter_state.keyword = self.keyword_input.clone();
            self.keyword_error = None;
        }
    }

    /// Recompute the selection and every view derived from it.
    pub fn apply_filters(&mut self) {
        let records = self.dataset.as_ref().map_or(&[][..], |d| d.records.as_slice());
        self.filtered_indices = filter::apply_filters(records, &self.filter_state);
        self.view =
            DashboardView::compute(records, &self.filtered_indices, self.settings.histogram_bins);
        self.word_frequencies = wordcloud::word_frequencies(
            records,
            &self.filtered_indices,
            &self.stopwords,
            self.settings.wordcloud_max_words,
        );
        self.wordcloud_layout = None;

        tracing::debug!(
            selected = self.filtered_indices.len(),
            total = records.len(),
            "Filters applied"
        );
    }

    /// Startup warnings followed by those of the current load.
    pub fn all_warnings(&self) -> impl Iterator<Item = &String> {
        self.startup_warnings.iter().chain(self.warnings.iter())
    }

    pub fn warning_count(&self) -> usize {
        self.startup_warnings.len() + self.warnings.len()
    }

    /// Records in the current selection, in file order.
    pub fn filtered_records(&self) -> Vec<&ReviewRecord> {
        let records = self.records();
        self.filtered_indices
            .iter()
            .filter_map(|&i| records.get(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ColumnPresence, SentimentLabel};

    fn dataset() -> Dataset {
        let records = vec![
            ReviewRecord::new(0, "great movie".into(), 0.8, Some("Drama".into()), None, None),
            ReviewRecord::new(1, "awful movie".into(), -0.9, Some("Horror".into()), None, None),
            ReviewRecord::new(2, "a movie".into(), 0.0, Some("Drama".into()), None, None),
        ];
        Dataset {
            source: PathBuf::from("reviews.csv"),
            records,
            columns: ColumnPresence {
                category: true,
                title: false,
                author: false,
            },
        }
    }

    fn state_with_data() -> AppState {
        let mut state = AppState::new(
            Arc::new(Lexicon::builtin()),
            ViewSettings::default(),
            false,
        );
        state.set_dataset(dataset(), LoadSummary::default());
        state
    }

    #[test]
    fn test_empty_state() {
        let state = AppState::new(
            Arc::new(Lexicon::builtin()),
            ViewSettings::default(),
            false,
        );
        assert!(state.records().is_empty());
        assert!(state.filtered_indices.is_empty());
        assert_eq!(state.view.kpis.total, 0);
    }

    #[test]
    fn test_set_dataset_selects_all() {
        let state = state_with_data();
        assert_eq!(state.filtered_indices, vec![0, 1, 2]);
        assert_eq!(state.view.kpis.total, 3);
        assert_eq!(state.word_frequencies[0].word, "movie");
        assert_eq!(state.facets.categories, vec!["Drama", "Horror"]);
    }

    #[test]
    fn test_apply_and_reset_filters() {
        let mut state = state_with_data();
        state.filter_state.labels = [SentimentLabel::Negative].into_iter().collect();
        state.apply_filters();
        assert_eq!(state.filtered_indices, vec![1]);
        assert_eq!(state.view.kpis.positive_count, 0);
        assert_eq!(state.filtered_records()[0].review, "awful movie");

        state.reset_filters();
        assert_eq!(state.filtered_indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_startup_warnings_listed_first() {
        let mut state = state_with_data();
        state.startup_warnings.push("bad config".to_string());
        state.warnings.push("row 7 skipped".to_string());
        state.warnings.clear();
        state.warnings.push("row 9 skipped".to_string());
        let all: Vec<&String> = state.all_warnings().collect();
        assert_eq!(all, vec!["bad config", "row 9 skipped"]);
        assert_eq!(state.warning_count(), 2);
    }

    #[test]
    fn test_sync_keyword_modes() {
        let mut state = state_with_data();
        state.keyword_input = "GREAT".to_string();
        state.sync_keyword();
        state.apply_filters();
        assert_eq!(state.filtered_indices, vec![0]);

        state.regex_mode = true;
        state.keyword_input = "^a".to_string();
        state.sync_keyword();
        state.apply_filters();
        assert_eq!(state.filtered_indices, vec![1, 2]);

        state.keyword_input = "(".to_string();
        state.sync_keyword();
        assert!(state.keyword_error.is_some());
        state.apply_filters();
        assert_eq!(state.filtered_indices, vec![1, 2]);
    }
}
