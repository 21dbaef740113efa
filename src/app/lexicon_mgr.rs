// ReviewScope - app/lexicon_mgr.rs
//
// Builds the sentiment lexicon used for scoring: the built-in English
// lexicon embedded in the binary, optionally overridden by a user TOML file.
// User entries replace built-in entries for the same word.

use crate::core::sentiment::{self, Lexicon};
use crate::util::constants;
use crate::util::error::LexiconError;
use std::path::Path;

/// Load the built-in lexicon and merge `user_file` over it.
///
/// A missing, oversized or invalid user file is non-fatal: the error is
/// returned for the caller to report and the built-in lexicon is used alone.
pub fn load_lexicon(user_file: Option<&Path>) -> (Lexicon, Vec<LexiconError>) {
    let mut lexicon = Lexicon::builtin();
    let mut errors = Vec::new();

    tracing::info!(
        name = %lexicon.name,
        words = lexicon.len(),
        "Loaded built-in lexicon"
    );

    if let Some(path) = user_file {
        match load_user_lexicon(path) {
            Ok(user) => {
                tracing::info!(
                    path = %path.display(),
                    words = user.len(),
                    "User lexicon merged over built-in"
                );
                lexicon.merge(user);
            }
            Err(e) => {
                tracing::warn!(error = %e, "User lexicon rejected, using built-in only");
                errors.push(e);
            }
        }
    }

    (lexicon, errors)
}

/// Read, size-check, parse and validate one user lexicon file.
fn load_user_lexicon(path: &Path) -> Result<Lexicon, LexiconError> {
    let metadata = std::fs::metadata(path).map_err(|e| LexiconError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if metadata.len() > constants::MAX_LEXICON_FILE_SIZE {
        return Err(LexiconError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_LEXICON_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| LexiconError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let def = sentiment::parse_lexicon_toml(&content, path)?;
    Lexicon::from_definition(def, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_only() {
        let (lexicon, errors) = load_lexicon(None);
        assert!(errors.is_empty());
        assert!(!lexicon.is_empty());
        assert!(lexicon.word_polarity("great").unwrap() > 0.0);
    }

    #[test]
    fn test_user_file_overrides_builtin() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mine.toml");
        fs::write(
            &path,
            "[meta]\nname = \"mine\"\n[words]\ngreat = -0.2\nbanger = 0.9\n",
        )
        .unwrap();

        let (lexicon, errors) = load_lexicon(Some(&path));
        assert!(errors.is_empty());
        assert_eq!(lexicon.word_polarity("great"), Some(-0.2));
        assert_eq!(lexicon.word_polarity("banger"), Some(0.9));
        assert!(lexicon.name.ends_with("+ mine"));
    }

    #[test]
    fn test_missing_user_file_is_non_fatal() {
        let dir = TempDir::new().unwrap();
        let (lexicon, errors) = load_lexicon(Some(&dir.path().join("absent.toml")));
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LexiconError::Io { .. }));
        assert!(!lexicon.is_empty());
    }

    #[test]
    fn test_invalid_user_file_is_non_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[words]\ngreat = 3.0\n").unwrap();

        let (lexicon, errors) = load_lexicon(Some(&path));
        assert!(matches!(
            errors[0],
            LexiconError::PolarityOutOfRange { .. }
        ));
        assert_eq!(
            lexicon.word_polarity("great"),
            Lexicon::builtin().word_polarity("great")
        );
    }

    #[test]
    fn test_oversized_user_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("huge.toml");
        let padding = "#".repeat(constants::MAX_LEXICON_FILE_SIZE as usize + 1);
        fs::write(&path, padding).unwrap();

        let (_, errors) = load_lexicon(Some(&path));
        assert!(matches!(errors[0], LexiconError::FileTooLarge { .. }));
    }
}
