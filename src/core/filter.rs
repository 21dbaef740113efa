// ReviewScope - core/filter.rs
//
// Composable filter engine for review records.
// All predicates are AND-combined, so evaluation order never changes the
// result.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{DatasetFacets, ReviewRecord, SentimentLabel};
use crate::util::error::FilterError;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;

/// Complete filter state. All fields are AND-combined when applied.
///
/// Set-valued fields are explicit selections: an empty set passes nothing,
/// exactly like an empty multi-select.
#[derive(Debug, Clone)]
pub struct FilterState {
    /// Sentiment labels to include.
    pub labels: BTreeSet<SentimentLabel>,

    /// Inclusive review-length range, in characters.
    pub length_range: (usize, usize),

    /// Inclusive polarity range.
    pub polarity_range: (f64, f64),

    /// Genres to include. Records without a genre never pass.
    pub genres: BTreeSet<String>,

    /// Exact movie title, or None for all titles.
    pub title: Option<String>,

    /// Exact reviewer, or None for all reviewers.
    pub author: Option<String>,

    /// Case-insensitive substring searched in the review text. Empty = off.
    pub keyword: String,

    /// Compiled keyword regex, used instead of `keyword` when set.
    pub keyword_regex: Option<Regex>,
}

impl FilterState {
    /// The "everything selected" filter for a dataset: all labels, the full
    /// length and polarity ranges, all genres, no title/reviewer, no keyword.
    pub fn for_facets(facets: &DatasetFacets) -> Self {
        Self {
            labels: SentimentLabel::all().iter().copied().collect(),
            length_range: facets.length_bounds,
            polarity_range: facets.polarity_bounds,
            genres: facets.categories.iter().cloned().collect(),
            title: None,
            author: None,
            keyword: String::new(),
            keyword_regex: None,
        }
    }

    /// Set the keyword regex, compiling it case-insensitively.
    /// An empty pattern clears the regex. On error the previous regex is kept.
    pub fn set_keyword_regex(&mut self, pattern: &str) -> Result<(), FilterError> {
        if pattern.is_empty() {
            self.keyword_regex = None;
            return Ok(());
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| FilterError::InvalidRegex {
                pattern: pattern.to_string(),
                source: e,
            })?;
        self.keyword_regex = Some(regex);
        Ok(())
    }

    /// Whether a record passes every predicate.
    ///
    /// `keyword_lower` is `self.keyword` lower-cased once by the caller.
    pub fn matches(&self, record: &ReviewRecord, keyword_lower: &str) -> bool {
        self.matches_label(record)
            && self.matches_length(record)
            && self.matches_polarity(record)
            && self.matches_genre(record)
            && self.matches_title(record)
            && self.matches_author(record)
            && self.matches_keyword(record, keyword_lower)
    }

    fn matches_label(&self, record: &ReviewRecord) -> bool {
        self.labels.contains(&record.label)
    }

    fn matches_length(&self, record: &ReviewRecord) -> bool {
        let (lo, hi) = self.length_range;
        (lo..=hi).contains(&record.review_length)
    }

    fn matches_polarity(&self, record: &ReviewRecord) -> bool {
        let (lo, hi) = self.polarity_range;
        record.polarity >= lo && record.polarity <= hi
    }

    fn matches_genre(&self, record: &ReviewRecord) -> bool {
        record
            .category
            .as_ref()
            .is_some_and(|c| self.genres.contains(c))
    }

    fn matches_title(&self, record: &ReviewRecord) -> bool {
        match self.title {
            Some(ref t) => record.title.as_ref() == Some(t),
            None => true,
        }
    }

    fn matches_author(&self, record: &ReviewRecord) -> bool {
        match self.author {
            Some(ref a) => record.author.as_ref() == Some(a),
            None => true,
        }
    }

    fn matches_keyword(&self, record: &ReviewRecord, keyword_lower: &str) -> bool {
        if let Some(ref regex) = self.keyword_regex {
            return regex.is_match(&record.review);
        }
        keyword_lower.is_empty() || record.review.to_lowercase().contains(keyword_lower)
    }
}

/// Apply filters to a slice of records, returning indices of matching records.
///
/// Returns ascending indices into the original slice. This avoids copying
/// records and lets every chart share one selection.
pub fn apply_filters(records: &[ReviewRecord], filter: &FilterState) -> Vec<usize> {
    let keyword_lower = filter.keyword.to_lowercase();

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| filter.matches(record, &keyword_lower))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(
        id: u64,
        review: &str,
        polarity: f64,
        category: Option<&str>,
        title: Option<&str>,
        author: Option<&str>,
    ) -> ReviewRecord {
        ReviewRecord::new(
            id,
            review.to_string(),
            polarity,
            category.map(String::from),
            title.map(String::from),
            author.map(String::from),
        )
    }

    fn sample() -> Vec<ReviewRecord> {
        vec![
            make_record(0, "Great acting", 0.8, Some("Drama"), Some("Alpha"), Some("ann")),
            make_record(1, "Awful plot, awful pacing", -0.9, Some("Horror"), Some("Beta"), Some("bo")),
            make_record(2, "It exists", 0.0, Some("Drama"), Some("Beta"), Some("ann")),
            make_record(3, "Nice but LONG", 0.3, None, Some("Alpha"), Some("cy")),
            make_record(4, "Meh", -0.05, Some("Comedy"), None, None),
        ]
    }

    fn all_selected(records: &[ReviewRecord]) -> FilterState {
        FilterState::for_facets(&DatasetFacets::from_records(records))
    }

    #[test]
    fn test_default_selection_excludes_only_missing_genre() {
        let records = sample();
        let result = apply_filters(&records, &all_selected(&records));
        assert_eq!(result, vec![0, 1, 2, 4]);
    }

    #[test]
    fn test_label_filter() {
        let records = sample();
        let mut filter = all_selected(&records);
        filter.labels = [SentimentLabel::Neutral].into_iter().collect();
        assert_eq!(apply_filters(&records, &filter), vec![2, 4]);
    }

    #[test]
    fn test_empty_label_selection_passes_nothing() {
        let records = sample();
        let mut filter = all_selected(&records);
        filter.labels.clear();
        assert!(apply_filters(&records, &filter).is_empty());
    }

    #[test]
    fn test_length_range_inclusive() {
        let records = sample();
        let mut filter = all_selected(&records);
        filter.length_range = (9, 12);
        // "Great acting" = 12, "It exists" = 9
        assert_eq!(apply_filters(&records, &filter), vec![0, 2]);
    }

    #[test]
    fn test_polarity_range_inclusive() {
        let records = sample();
        let mut filter = all_selected(&records);
        filter.polarity_range = (-0.05, 0.8);
        assert_eq!(apply_filters(&records, &filter), vec![0, 2, 4]);
    }

    #[test]
    fn test_genre_filter() {
        let records = sample();
        let mut filter = all_selected(&records);
        filter.genres = ["Drama".to_string()].into_iter().collect();
        assert_eq!(apply_filters(&records, &filter), vec![0, 2]);
    }

    #[test]
    fn test_title_and_author_filters() {
        let records = sample();
        let mut filter = all_selected(&records);
        filter.title = Some("Beta".to_string());
        assert_eq!(apply_filters(&records, &filter), vec![1, 2]);
        filter.author = Some("ann".to_string());
        assert_eq!(apply_filters(&records, &filter), vec![2]);
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let records = sample();
        let mut filter = all_selected(&records);
        filter.genres.insert("Nothing".to_string());
        filter.keyword = "AWFUL".to_string();
        assert_eq!(apply_filters(&records, &filter), vec![1]);
    }

    #[test]
    fn test_keyword_spaces_are_significant() {
        let records = sample();
        let mut filter = all_selected(&records);
        filter.keyword = "t ".to_string();
        // "Great acting" and "It exists" have a "t " pair; "Awful plot," does not.
        assert_eq!(apply_filters(&records, &filter), vec![0, 2]);
    }

    #[test]
    fn test_keyword_regex() {
        let records = sample();
        let mut filter = all_selected(&records);
        filter.set_keyword_regex(r"^(great|meh)").unwrap();
        assert_eq!(apply_filters(&records, &filter), vec![0, 4]);
        filter.set_keyword_regex("").unwrap();
        assert!(filter.keyword_regex.is_none());
    }

    #[test]
    fn test_invalid_regex_keeps_previous() {
        let mut filter = FilterState::for_facets(&DatasetFacets::default());
        filter.set_keyword_regex("great").unwrap();
        let result = filter.set_keyword_regex("[invalid");
        assert!(matches!(result, Err(FilterError::InvalidRegex { .. })));
        assert!(filter.keyword_regex.is_some());
    }

    #[test]
    fn test_result_is_subset_of_records() {
        let records = sample();
        let mut filter = all_selected(&records);
        filter.keyword = "a".to_string();
        let result = apply_filters(&records, &filter);
        assert!(result.iter().all(|&i| i < records.len()));
        assert!(result.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_conjunction_is_intersection_of_single_filters() {
        let records = sample();
        let base = all_selected(&records);

        let mut by_label = base.clone();
        by_label.labels = [SentimentLabel::Positive, SentimentLabel::Neutral]
            .into_iter()
            .collect();
        let mut by_author = base.clone();
        by_author.author = Some("ann".to_string());

        let mut combined = by_label.clone();
        combined.author = Some("ann".to_string());

        let a: BTreeSet<usize> = apply_filters(&records, &by_label).into_iter().collect();
        let b: BTreeSet<usize> = apply_filters(&records, &by_author).into_iter().collect();
        let both: Vec<usize> = a.intersection(&b).copied().collect();

        assert_eq!(apply_filters(&records, &combined), both);
        assert_eq!(both, vec![0, 2]);
    }
}
