use crate::util::date::DateError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("YAML parse error")]
  Yaml(#[from] serde_yaml::Error),

  #[error("invalid site link {0:?}: {1}")]
  InvalidLink(String, url::ParseError),

  #[error("site link must be absolute: {0}")]
  RelativeLink(String),

  #[error("invalid `updated` timestamp")]
  InvalidUpdated(#[source] DateError),

  #[error("invalid markdown pattern")]
  Regex(#[from] regex::Error),

  #[error("{0}")]
  Message(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("IO error")]
  Io(#[from] std::io::Error),

  #[error("failed to extract document {path}: {reason}")]
  Extract { path: String, reason: String },

  #[error("malformed date")]
  MalformedDate(#[from] DateError),

  #[error("failed to render RSS feed")]
  Rss(#[from] rss::Error),

  #[error("failed to render Atom feed")]
  Atom(#[from] atom_syndication::Error),

  #[error("Config error {0:?}")]
  Config(#[from] ConfigError),

  #[error("error in emit hook {name}")]
  Hook {
    name: String,
    #[source]
    source: Box<Error>,
  },

  #[error("{0}")]
  Message(String),
}

impl Error {
  pub fn extract(path: impl Into<String>, reason: impl ToString) -> Self {
    Error::Extract {
      path: path.into(),
      reason: reason.to_string(),
    }
  }
}
