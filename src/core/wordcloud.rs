// ReviewScope - core/wordcloud.rs
//
// Word frequencies and word-cloud layout for the filtered reviews.
// Text measurement is injected by the caller so this module stays free of
// any UI dependency.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::ReviewRecord;
use crate::util::constants;
use std::collections::{HashMap, HashSet};

/// Built-in English stop-words (lower-case).
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself",
    "him", "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm",
    "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k",
    "let's", "like", "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of",
    "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our", "ours", "ourselves",
    "out", "over", "own", "r", "same", "shall", "shan't", "she", "she'd", "she'll", "she's",
    "should", "shouldn't", "since", "so", "some", "such", "than", "that", "that's", "the",
    "their", "theirs", "them", "themselves", "then", "there", "there's", "therefore", "these",
    "they", "they'd", "they'll", "they're", "they've", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've",
    "were", "weren't", "what", "what's", "when", "when's", "where", "where's", "which", "while",
    "who", "who's", "whom", "why", "why's", "with", "won't", "would", "wouldn't", "www", "you",
    "you'd", "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

// =============================================================================
// Frequencies
// =============================================================================

/// One word of the cloud with its count and relative weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
    /// `count` divided by the count of the most frequent word.
    pub weight: f32,
}

/// Stop-word set: the built-in list plus `extra`, all lower-cased.
pub fn stopword_set(extra: &[String]) -> HashSet<String> {
    STOPWORDS
        .iter()
        .map(|s| s.to_string())
        .chain(extra.iter().map(|s| s.trim().to_lowercase()))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Count words across the selected reviews and keep the `max_words` most
/// frequent, ties broken alphabetically.
pub fn word_frequencies(
    records: &[ReviewRecord],
    indices: &[usize],
    stopwords: &HashSet<String>,
    max_words: usize,
) -> Vec<WordFrequency> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in indices.iter().filter_map(|&i| records.get(i)) {
        for token in tokenize(&record.review) {
            let mut word = token.to_lowercase();
            if word.ends_with("'s") {
                word.truncate(word.len() - 2);
            }
            if word.is_empty()
                || word.chars().all(|c| c.is_ascii_digit())
                || stopwords.contains(&word)
            {
                continue;
            }
            *counts.entry(word).or_default() += 1;
        }
    }

    merge_plurals(&mut counts);

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(max_words);

    let top = ranked.first().map_or(1, |(_, c)| *c).max(1) as f32;
    ranked
        .into_iter()
        .map(|(word, count)| WordFrequency {
            weight: count as f32 / top,
            word,
            count,
        })
        .collect()
}

/// Fold `words` into `word` when both forms occur.
fn merge_plurals(counts: &mut HashMap<String, usize>) {
    let plurals: Vec<String> = counts
        .keys()
        .filter(|w| w.ends_with('s') && !w.ends_with("ss") && w.len() > 1)
        .filter(|w| counts.contains_key(&w[..w.len() - 1]))
        .cloned()
        .collect();

    for plural in plurals {
        if let Some(n) = counts.remove(&plural) {
            *counts.entry(plural[..plural.len() - 1].to_string()).or_default() += n;
        }
    }
}

/// Tokens of at least two word characters; apostrophes allowed after the first.
fn tokenize(text: &str) -> Vec<&str> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut len = 0usize;

    for (i, c) in text.char_indices() {
        match start {
            Some(_) if is_word(c) || c == '\'' => len += 1,
            Some(s) => {
                if len >= 2 {
                    tokens.push(&text[s..i]);
                }
                start = if is_word(c) { Some(i) } else { None };
                len = 1;
            }
            None if is_word(c) => {
                start = Some(i);
                len = 1;
            }
            None => {}
        }
    }
    if let Some(s) = start {
        if len >= 2 {
            tokens.push(&text[s..]);
        }
    }
    tokens
}

// =============================================================================
// Layout
// =============================================================================

/// Axis-aligned box in canvas coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Bounds {
    fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    fn inside(&self, width: f32, height: f32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.x + self.w <= width && self.y + self.h <= height
    }
}

/// A word positioned on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub font_size: f32,
    pub bounds: Bounds,
    /// Position in the frequency ranking, 0 = most frequent.
    pub rank: usize,
}

/// Place `words` (most frequent first) on a `width` x `height` canvas.
///
/// `measure(word, font_size)` returns the rendered `(width, height)`.
/// Each word starts at `max_font * (s * weight + 1 - s)`, capped by the size
/// of the previous word, and walks an Archimedean spiral out from the
/// centre. If no free spot exists the font shrinks; below the minimum size
/// the word is dropped.
pub fn layout_words<F>(
    words: &[WordFrequency],
    width: f32,
    height: f32,
    max_font: f32,
    mut measure: F,
) -> Vec<PlacedWord>
where
    F: FnMut(&str, f32) -> (f32, f32),
{
    let s = constants::WORDCLOUD_RELATIVE_SCALING;
    let (cx, cy) = (width / 2.0, height / 2.0);
    let max_radius = (cx * cx + cy * cy).sqrt();
    let aspect = if width > 0.0 { height / width } else { 1.0 };

    let mut placed: Vec<PlacedWord> = Vec::new();
    let mut size_cap = max_font;

    for (rank, wf) in words.iter().enumerate() {
        let mut font = (max_font * (s * wf.weight + 1.0 - s)).min(size_cap);

        while font >= constants::WORDCLOUD_MIN_FONT_SIZE {
            let (w, h) = measure(&wf.word, font);
            if let Some(bounds) = find_spot(&placed, w, h, width, height, (cx, cy), max_radius, aspect)
            {
                placed.push(PlacedWord {
                    word: wf.word.clone(),
                    font_size: font,
                    bounds,
                    rank,
                });
                size_cap = font;
                break;
            }
            font -= constants::WORDCLOUD_FONT_STEP;
        }
    }
    placed
}

#[allow(clippy::too_many_arguments)]
fn find_spot(
    placed: &[PlacedWord],
    w: f32,
    h: f32,
    width: f32,
    height: f32,
    centre: (f32, f32),
    max_radius: f32,
    aspect: f32,
) -> Option<Bounds> {
    if w > width || h > height {
        return None;
    }
    for step in 0..constants::WORDCLOUD_MAX_SPIRAL_STEPS {
        let angle = step as f32 * constants::WORDCLOUD_SPIRAL_STEP;
        let radius = angle * 2.0;
        if radius > max_radius {
            break;
        }
        let candidate = Bounds {
            x: centre.0 + radius * angle.cos() - w / 2.0,
            y: centre.1 + radius * angle.sin() * aspect - h / 2.0,
            w,
            h,
        };
        if candidate.inside(width, height) && !placed.iter().any(|p| p.bounds.overlaps(&candidate))
        {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(texts: &[&str]) -> Vec<ReviewRecord> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| ReviewRecord::new(i as u64, t.to_string(), 0.0, None, None, None))
            .collect()
    }

    fn all(records: &[ReviewRecord]) -> Vec<usize> {
        (0..records.len()).collect()
    }

    fn measure(word: &str, font: f32) -> (f32, f32) {
        (word.chars().count() as f32 * font * 0.6, font)
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("I didn't like it, 42 times!<br />x"),
            vec!["didn't", "like", "it", "42", "times", "br"]
        );
    }

    #[test]
    fn test_stopwords_and_digits_removed() {
        let recs = records(&["The film was great and the 1999 cast was great<br /><br />"]);
        let stops = stopword_set(&["br".to_string()]);
        let freqs = word_frequencies(&recs, &all(&recs), &stops, 10);
        let words: Vec<&str> = freqs.iter().map(|f| f.word.as_str()).collect();
        assert_eq!(words, vec!["great", "cast", "film"]);
        assert_eq!(freqs[0].count, 2);
        assert_eq!(freqs[0].weight, 1.0);
        assert_eq!(freqs[1].weight, 0.5);
    }

    #[test]
    fn test_possessive_stripped_and_case_folded() {
        let recs = records(&["Nolan's film. NOLAN film"]);
        let freqs = word_frequencies(&recs, &all(&recs), &stopword_set(&[]), 10);
        assert_eq!(freqs[0].word, "film");
        assert_eq!(freqs[1].word, "nolan");
        assert_eq!(freqs[1].count, 2);
    }

    #[test]
    fn test_plural_merge() {
        let recs = records(&["movie movies movies actress"]);
        let freqs = word_frequencies(&recs, &all(&recs), &stopword_set(&[]), 10);
        assert_eq!(freqs.len(), 2);
        assert_eq!(freqs[0].word, "movie");
        assert_eq!(freqs[0].count, 3);
        // "actress" ends in "ss" and is never treated as a plural.
        assert_eq!(freqs[1].word, "actress");
    }

    #[test]
    fn test_max_words_and_tie_order() {
        let recs = records(&["zeta alpha mid mid"]);
        let freqs = word_frequencies(&recs, &all(&recs), &stopword_set(&[]), 2);
        let words: Vec<&str> = freqs.iter().map(|f| f.word.as_str()).collect();
        assert_eq!(words, vec!["mid", "alpha"]);
    }

    #[test]
    fn test_empty_selection() {
        let recs = records(&["something"]);
        assert!(word_frequencies(&recs, &[], &stopword_set(&[]), 10).is_empty());
    }

    #[test]
    fn test_layout_in_bounds_and_non_overlapping() {
        let text = "alpha beta gamma delta epsilon zeta theta iota kappa lambda \
                    alpha beta gamma alpha beta alpha";
        let recs = records(&[text]);
        let freqs = word_frequencies(&recs, &all(&recs), &stopword_set(&[]), 50);
        let placed = layout_words(&freqs, 400.0, 200.0, 60.0, measure);

        assert!(!placed.is_empty());
        assert_eq!(placed[0].word, "alpha");
        for (i, a) in placed.iter().enumerate() {
            assert!(a.bounds.inside(400.0, 200.0), "{} out of bounds", a.word);
            for b in &placed[i + 1..] {
                assert!(!a.bounds.overlaps(&b.bounds), "{} overlaps {}", a.word, b.word);
            }
        }
        // Sizes never grow down the ranking.
        assert!(placed.windows(2).all(|w| w[0].font_size >= w[1].font_size));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let recs = records(&["one two two three three three"]);
        let freqs = word_frequencies(&recs, &all(&recs), &stopword_set(&[]), 10);
        let a = layout_words(&freqs, 300.0, 150.0, 40.0, measure);
        let b = layout_words(&freqs, 300.0, 150.0, 40.0, measure);
        assert_eq!(a, b);
    }

    #[test]
    fn test_layout_drops_words_that_never_fit() {
        let freqs = vec![WordFrequency {
            word: "enormous".to_string(),
            count: 1,
            weight: 1.0,
        }];
        // Even the minimum font is wider than the canvas.
        let placed = layout_words(&freqs, 10.0, 10.0, 40.0, measure);
        assert!(placed.is_empty());
    }
}
