// ReviewScope - core/sentiment.rs
//
// Lexicon-based polarity scoring.
//
// Each sentiment word found in a review contributes its lexicon polarity,
// scaled by any intensifiers ("very", "extremely") and flipped/dampened by a
// preceding negator ("not", "never", "didn't"). The review polarity is the
// mean of those contributions, clamped to [-1, 1].
//
// Core layer: accepts TOML strings, never touches the filesystem.
// I/O is handled by app::lexicon_mgr which feeds content here.

use crate::util::constants;
use crate::util::error::LexiconError;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Built-in lexicon, embedded at compile time.
const BUILTIN_LEXICON: &str = include_str!("../../lexicon/en_sentiment.toml");

/// Pseudo-path used in error messages for the built-in lexicon.
const BUILTIN_LEXICON_PATH: &str = "<builtin>/en_sentiment.toml";

// =============================================================================
// TOML deserialization structures (raw input)
// =============================================================================

/// Raw TOML lexicon as deserialized from a .toml file.
#[derive(Debug, Deserialize, Default)]
pub struct LexiconDefinition {
    #[serde(default)]
    pub meta: LexiconMeta,
    #[serde(default)]
    pub words: HashMap<String, f64>,
    #[serde(default)]
    pub intensifiers: HashMap<String, f64>,
    #[serde(default)]
    pub negation: NegationDef,
}

#[derive(Debug, Deserialize, Default)]
pub struct LexiconMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct NegationDef {
    #[serde(default)]
    pub words: Vec<String>,
}

/// Parse a TOML string into a `LexiconDefinition`.
///
/// `source_path` is used for error messages only (not for I/O).
pub fn parse_lexicon_toml(
    toml_content: &str,
    source_path: &Path,
) -> Result<LexiconDefinition, LexiconError> {
    toml::from_str(toml_content).map_err(|e| LexiconError::TomlParse {
        path: source_path.to_path_buf(),
        source: e,
    })
}

// =============================================================================
// Runtime lexicon
// =============================================================================

/// Validated word tables used at scoring time. Keys are lower-case.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    pub name: String,
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negators: HashSet<String>,
}

impl Lexicon {
    /// The embedded English lexicon.
    ///
    /// The embedded file is validated by the test suite, so a failure here
    /// means a broken build; it is logged and an empty lexicon is returned.
    pub fn builtin() -> Self {
        parse_lexicon_toml(BUILTIN_LEXICON, Path::new(BUILTIN_LEXICON_PATH))
            .and_then(|def| Self::from_definition(def, Path::new(BUILTIN_LEXICON_PATH)))
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Built-in lexicon is invalid");
                Self::default()
            })
    }

    /// Validate a definition and build a lexicon from it.
    ///
    /// Validates:
    /// - every word polarity lies in [-1, 1]
    /// - every intensifier multiplier is finite and positive
    /// - the total entry count is within limits
    pub fn from_definition(def: LexiconDefinition, source_path: &Path) -> Result<Self, LexiconError> {
        let count = def.words.len() + def.intensifiers.len() + def.negation.words.len();
        if count > constants::MAX_LEXICON_ENTRIES {
            return Err(LexiconError::TooManyEntries {
                path: source_path.to_path_buf(),
                count,
                max: constants::MAX_LEXICON_ENTRIES,
            });
        }

        let mut words = HashMap::with_capacity(def.words.len());
        for (word, value) in def.words {
            if !(-1.0..=1.0).contains(&value) {
                return Err(LexiconError::PolarityOutOfRange {
                    path: source_path.to_path_buf(),
                    word,
                    value,
                });
            }
            words.insert(word.to_lowercase(), value);
        }

        let mut intensifiers = HashMap::with_capacity(def.intensifiers.len());
        for (word, value) in def.intensifiers {
            if !value.is_finite() || value <= 0.0 {
                return Err(LexiconError::InvalidIntensifier {
                    path: source_path.to_path_buf(),
                    word,
                    value,
                });
            }
            intensifiers.insert(word.to_lowercase(), value);
        }

        let negators = def
            .negation
            .words
            .into_iter()
            .map(|w| w.to_lowercase())
            .collect();

        Ok(Self {
            name: def.meta.name,
            words,
            intensifiers,
            negators,
        })
    }

    /// Merge another lexicon into this one. Entries in `other` win.
    pub fn merge(&mut self, other: Lexicon) {
        self.words.extend(other.words);
        self.intensifiers.extend(other.intensifiers);
        self.negators.extend(other.negators);
        if !other.name.is_empty() {
            self.name = format!("{} + {}", self.name, other.name);
        }
    }

    /// Number of sentiment words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Polarity of a single word, if it is in the lexicon.
    pub fn word_polarity(&self, word: &str) -> Option<f64> {
        self.words.get(&word.to_lowercase()).copied()
    }

    fn is_negator(&self, word: &str) -> bool {
        self.negators.contains(word) || word.ends_with("n't") || word.ends_with("n\u{2019}t")
    }

    /// Score a text. Returns 0.0 when no sentiment word is found.
    pub fn polarity(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();

        let mut sum = 0.0;
        let mut hits = 0usize;
        let mut modifier = Modifier::default();

        for token in tokenize(&lower) {
            let word = match token {
                Token::Boundary => {
                    modifier = Modifier::default();
                    continue;
                }
                Token::Word(w) => w,
            };

            if let Some(&value) = self.words.get(word) {
                let mut score = value * modifier.intensity;
                if modifier.negated {
                    score *= constants::NEGATION_FACTOR;
                }
                sum += score.clamp(-1.0, 1.0);
                hits += 1;
                modifier = Modifier::default();
            } else if let Some(&factor) = self.intensifiers.get(word) {
                modifier.intensity *= factor;
                modifier.age = Some(0);
            } else if self.is_negator(word) {
                modifier.negated = true;
                modifier.age = Some(0);
            } else if let Some(age) = modifier.age {
                if age + 1 >= constants::MODIFIER_WINDOW {
                    modifier = Modifier::default();
                } else {
                    modifier.age = Some(age + 1);
                }
            }
        }

        if hits == 0 {
            return 0.0;
        }
        (sum / hits as f64).clamp(-1.0, 1.0)
    }
}

/// Pending intensifier/negator state carried to the next sentiment word.
#[derive(Debug, Clone, Copy)]
struct Modifier {
    intensity: f64,
    negated: bool,
    /// Tokens seen since the last modifier; None when no modifier is pending.
    age: Option<usize>,
}

impl Default for Modifier {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            negated: false,
            age: None,
        }
    }
}

// =============================================================================
// Tokenizer
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    /// Sentence punctuation; clears pending modifiers.
    Boundary,
}

/// Split lower-cased text into word tokens and sentence boundaries.
///
/// Words are runs of alphabetic characters and apostrophes, with leading and
/// trailing apostrophes (quotes) trimmed.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        let is_word_char = ch.is_alphabetic() || ch == '\'' || ch == '\u{2019}';
        if is_word_char {
            if start.is_none() {
                start = Some(idx);
            }
            continue;
        }
        if let Some(s) = start.take() {
            push_word(&mut tokens, &text[s..idx]);
        }
        if matches!(ch, '.' | '!' | '?' | ';') {
            tokens.push(Token::Boundary);
        }
    }
    if let Some(s) = start {
        push_word(&mut tokens, &text[s..]);
    }

    tokens
}

fn push_word<'a>(tokens: &mut Vec<Token<'a>>, word: &'a str) {
    let trimmed = word.trim_matches(|c| c == '\'' || c == '\u{2019}');
    if !trimmed.is_empty() {
        tokens.push(Token::Word(trimmed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::SentimentLabel;

    fn lexicon() -> Lexicon {
        Lexicon::builtin()
    }

    #[test]
    fn test_builtin_lexicon_is_valid() {
        let def = parse_lexicon_toml(BUILTIN_LEXICON, Path::new("builtin")).unwrap();
        let lex = Lexicon::from_definition(def, Path::new("builtin")).unwrap();
        assert!(lex.len() > 100);
        assert_eq!(lex.name, "en-reviews");
    }

    #[test]
    fn test_positive_review() {
        let p = lexicon().polarity("A wonderful film with a great cast.");
        assert!(p > 0.1, "polarity {p}");
        assert_eq!(SentimentLabel::from_polarity(p), SentimentLabel::Positive);
    }

    #[test]
    fn test_negative_review() {
        let p = lexicon().polarity("Terrible acting and a boring, awful script.");
        assert!(p < -0.1, "polarity {p}");
    }

    #[test]
    fn test_no_sentiment_words_is_zero() {
        assert_eq!(lexicon().polarity("The film runs for two hours."), 0.0);
        assert_eq!(lexicon().polarity(""), 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        let lex = lexicon();
        assert_eq!(lex.polarity("GOOD"), lex.polarity("good"));
    }

    #[test]
    fn test_negation_flips_and_dampens() {
        let lex = lexicon();
        let good = lex.polarity("good");
        let not_good = lex.polarity("not good");
        assert!((not_good - good * constants::NEGATION_FACTOR).abs() < 1e-9);
        assert!(lex.polarity("It wasn't bad") > 0.0);
    }

    #[test]
    fn test_intensifier_strengthens() {
        let lex = lexicon();
        assert!(lex.polarity("very good") > lex.polarity("good"));
        assert!(lex.polarity("very bad") < lex.polarity("bad"));
    }

    #[test]
    fn test_modifier_cleared_by_sentence_boundary() {
        let lex = lexicon();
        assert_eq!(lex.polarity("Not really. Good."), lex.polarity("good"));
    }

    #[test]
    fn test_modifier_expires_after_window() {
        let lex = lexicon();
        let expired = lex.polarity("not one of the two good");
        assert_eq!(expired, lex.polarity("good"));
    }

    #[test]
    fn test_polarity_is_clamped() {
        let lex = lexicon();
        let p = lex.polarity("absolutely extremely incredibly perfect");
        assert!(p <= 1.0);
        let n = lex.polarity("absolutely extremely incredibly worst");
        assert!(n >= -1.0);
    }

    #[test]
    fn test_quotes_trimmed() {
        let lex = lexicon();
        assert_eq!(lex.polarity("'excellent'"), lex.polarity("excellent"));
    }

    #[test]
    fn test_user_lexicon_overrides() {
        let mut lex = lexicon();
        let user = r#"
            [meta]
            name = "custom"

            [words]
            good = -0.5
            gnarly = 0.9
        "#;
        let def = parse_lexicon_toml(user, Path::new("user.toml")).unwrap();
        lex.merge(Lexicon::from_definition(def, Path::new("user.toml")).unwrap());
        assert_eq!(lex.word_polarity("good"), Some(-0.5));
        assert_eq!(lex.word_polarity("Gnarly"), Some(0.9));
        assert_eq!(lex.name, "en-reviews + custom");
    }

    #[test]
    fn test_out_of_range_polarity_rejected() {
        let def = parse_lexicon_toml("[words]\nsplendid = 1.5\n", Path::new("bad.toml")).unwrap();
        let err = Lexicon::from_definition(def, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, LexiconError::PolarityOutOfRange { .. }));
    }

    #[test]
    fn test_invalid_intensifier_rejected() {
        let def =
            parse_lexicon_toml("[intensifiers]\nvery = 0.0\n", Path::new("bad.toml")).unwrap();
        let err = Lexicon::from_definition(def, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, LexiconError::InvalidIntensifier { .. }));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = parse_lexicon_toml("[words\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, LexiconError::TomlParse { .. }));
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("it's 'great'! didn't-work");
        assert_eq!(
            tokens,
            vec![
                Token::Word("it's"),
                Token::Word("great"),
                Token::Boundary,
                Token::Word("didn't"),
                Token::Word("work"),
            ]
        );
    }
}
