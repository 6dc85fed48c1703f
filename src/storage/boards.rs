//! Board Resources
//!
//! Static board layouts served to clients on request. Each board is a text
//! resource split into tokens on space, tab, and newline, with every token
//! trimmed afterwards (so carriage returns from files saved on Windows
//! disappear). The split keeps empty tokens, matching the wire payload
//! clients already parse.

use std::fs;
use std::path::PathBuf;

use tracing::warn;

/// The closed set of board identifiers clients may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardKind {
    /// The standard board.
    A,
    /// The variant board with extra safe cells.
    B,
}

impl BoardKind {
    /// Parse a requested identifier. Anything outside the closed set is
    /// `None` and must be answered as an invalid request.
    pub fn parse(requested: &str) -> Option<Self> {
        match requested {
            "A" => Some(BoardKind::A),
            "B" => Some(BoardKind::B),
            _ => None,
        }
    }

    /// File name of the board resource.
    pub fn file_name(self) -> &'static str {
        match self {
            BoardKind::A => "A.txt",
            BoardKind::B => "B.txt",
        }
    }

    fn builtin(self) -> &'static str {
        match self {
            BoardKind::A => include_str!("../../boards/A.txt"),
            BoardKind::B => include_str!("../../boards/B.txt"),
        }
    }
}

/// Board loading errors.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// The named resource does not exist or cannot be read.
    #[error("unknown board resource")]
    UnknownResource,
}

/// Loads board resources, either from a directory or from the copies
/// embedded in the binary.
#[derive(Debug, Clone, Default)]
pub struct BoardLibrary {
    dir: Option<PathBuf>,
}

impl BoardLibrary {
    /// Serve the boards embedded in the binary.
    pub fn builtin() -> Self {
        Self { dir: None }
    }

    /// Serve boards from `<dir>/<kind>.txt`, e.g. for custom layouts.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: Some(dir.into()) }
    }

    /// Load a board as its token sequence.
    pub fn load(&self, kind: BoardKind) -> Result<Vec<String>, BoardError> {
        let raw = match &self.dir {
            Some(dir) => {
                let path = dir.join(kind.file_name());
                fs::read_to_string(&path).map_err(|err| {
                    warn!(path = %path.display(), %err, "board resource unreadable");
                    BoardError::UnknownResource
                })?
            }
            None => kind.builtin().to_string(),
        };
        Ok(tokenize(&raw))
    }
}

/// Split a board resource into tokens: separators are space, tab, and
/// newline; each token is trimmed; empty tokens are kept.
pub fn tokenize(raw: &str) -> Vec<String> {
    raw.split([' ', '\t', '\n'])
        .map(|token| token.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn parse_accepts_only_the_closed_set() {
        assert_eq!(BoardKind::parse("A"), Some(BoardKind::A));
        assert_eq!(BoardKind::parse("B"), Some(BoardKind::B));
        assert_eq!(BoardKind::parse("Z"), None);
        assert_eq!(BoardKind::parse("a"), None);
        assert_eq!(BoardKind::parse(""), None);
    }

    #[test]
    fn tokenize_trims_and_keeps_empties() {
        assert_eq!(tokenize("RR ..\nGG"), vec!["RR", "..", "GG"]);
        // Carriage returns vanish through the trim, double separators leave
        // an empty token in place.
        assert_eq!(tokenize("RR\r\n..  GG"), vec!["RR", "..", "", "GG"]);
    }

    #[test]
    fn builtin_boards_load() {
        let library = BoardLibrary::builtin();
        for kind in [BoardKind::A, BoardKind::B] {
            let tokens = library.load(kind).unwrap();
            assert!(!tokens.is_empty());
            assert!(tokens.contains(&"XX".to_string()), "center cell present");
        }
    }

    #[test]
    fn builtin_matches_resource_file_tokenization() {
        let tokens = BoardLibrary::builtin().load(BoardKind::A).unwrap();
        assert_eq!(tokens, tokenize(include_str!("../../boards/A.txt")));
    }

    #[test]
    fn directory_boards_override_builtin() {
        let dir = tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("A.txt")).unwrap();
        write!(file, "AA BB\nCC").unwrap();

        let library = BoardLibrary::from_dir(dir.path());
        assert_eq!(
            library.load(BoardKind::A).unwrap(),
            vec!["AA", "BB", "CC"]
        );
    }

    #[test]
    fn missing_directory_board_is_unknown_resource() {
        let dir = tempdir().unwrap();
        let library = BoardLibrary::from_dir(dir.path());
        assert!(matches!(
            library.load(BoardKind::B),
            Err(BoardError::UnknownResource)
        ));
    }
}
