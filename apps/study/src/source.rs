//! Fetching the card deck and the notes document from a path or a URL.

use std::fmt;
use std::path::PathBuf;

use flashcard_core::{parse_deck, Card, LoadError};
use reqwest::Client;

/// Fetch errors.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
}

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    /// `http://` and `https://` values are URLs, anything else is a file path.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::Path(PathBuf::from(value))
        }
    }

    /// Short name for user-facing messages: the file name or the URL.
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Url(url) => url.clone(),
        }
    }

    pub async fn fetch_text(&self, client: &Client) -> Result<String, SourceError> {
        match self {
            Self::Path(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                }),
            Self::Url(url) => {
                let response = client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SourceError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.text().await?)
            }
        }
    }

    fn load_error(&self, e: SourceError) -> LoadError {
        LoadError::Fetch {
            source_name: self.name(),
            message: e.to_string(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Fetch and parse the card deck.
pub async fn load_cards(source: &Source, client: &Client) -> Result<Vec<Card>, LoadError> {
    tracing::info!("Loading cards from {}", source);
    let content = source
        .fetch_text(client)
        .await
        .map_err(|e| source.load_error(e))?;
    parse_deck(&content)
}

/// Fetch the raw notes markdown.
pub async fn load_notes(source: &Source, client: &Client) -> Result<String, LoadError> {
    tracing::info!("Loading notes from {}", source);
    source
        .fetch_text(client)
        .await
        .map_err(|e| source.load_error(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_distinguishes_urls() {
        assert_eq!(
            Source::parse("https://example.com/flashcards.json"),
            Source::Url("https://example.com/flashcards.json".to_string())
        );
        assert_eq!(
            Source::parse("data/notes.md"),
            Source::Path(PathBuf::from("data/notes.md"))
        );
    }

    #[test]
    fn name_is_file_name() {
        assert_eq!(Source::parse("data/notes.md").name(), "notes.md");
    }

    #[tokio::test]
    async fn load_cards_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"question": "A", "answer": "1", "category": "X"}}]"#
        )
        .unwrap();

        let source = Source::Path(file.path().to_path_buf());
        let cards = load_cards(&source, &Client::new()).await.unwrap();
        assert_eq!(cards, vec![Card::new("A", "1", "X")]);
    }

    #[tokio::test]
    async fn malformed_cards_are_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let source = Source::Path(file.path().to_path_buf());
        let result = load_cards(&source, &Client::new()).await;
        assert!(matches!(result, Err(LoadError::Malformed(_))));
    }

    #[tokio::test]
    async fn missing_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = Source::Path(dir.path().join("notes.md"));
        let result = load_notes(&source, &Client::new()).await;
        assert!(matches!(
            result,
            Err(LoadError::Fetch { ref source_name, .. }) if source_name == "notes.md"
        ));
    }

    #[tokio::test]
    async fn load_notes_returns_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# Title\n\nbody\n").unwrap();

        let source = Source::Path(file.path().to_path_buf());
        let notes = load_notes(&source, &Client::new()).await.unwrap();
        assert_eq!(notes, "# Title\n\nbody\n");
    }
}
