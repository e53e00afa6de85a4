use std::path::Path;

use chrono::{DateTime, FixedOffset, Local};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
  error::{ConfigError, Result},
  feed::FeedFormat,
  util::parse_date,
};

const DEFAULT_TITLE: &str = "Sporule";
const DEFAULT_OUTPUT_PATH: &str = "rss.xml";
const DEFAULT_DESCRIPTION: &str = "Sporule is a micro blog site";
const DEFAULT_LINK: &str = "https://www.sporule.com";
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_IMAGE: &str = "https://i.imgur.com/vfh3Une.png";
const DEFAULT_COPYRIGHT: &str = "All rights reserved 2019, Sporule";
const DEFAULT_GENERATOR: &str = "Sporule";
const DEFAULT_AUTHOR_EMAIL: &str = "example@example.com";
const DEFAULT_ROUTE: &str = "/items";
const DEFAULT_MARKDOWN_PATTERN: &str = r"\.md$";

/// The feed options as written in the config file. Every field is
/// optional; missing ones fall back to the defaults on
/// [`FeedConfigFile::resolve`].
#[derive(
  JsonSchema, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq,
)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FeedConfigFile {
  /// The title of the feed
  pub title: Option<String>,
  /// Where the rendered feed is placed among the build outputs
  /// (default: "rss.xml")
  pub output_path: Option<String>,
  /// A description of the feed
  pub description: Option<String>,
  /// The absolute url of the website, without trailing slash
  pub link: Option<String>,
  /// Language code of the feed (default: "en")
  pub language: Option<String>,
  /// Url of the feed logo
  pub image: Option<String>,
  /// Url of the site favicon
  pub favicon: Option<String>,
  pub copyright: Option<String>,
  /// Last updated time of the feed. Defaults to the build time.
  pub updated: Option<String>,
  /// Generator name written into the feed
  pub generator: Option<String>,
  pub author: Option<AuthorConfig>,
  /// Path segment that replaces `posts` in post urls (default: "/items")
  pub route: Option<String>,
  /// Render Atom when true, RSS 2.0 otherwise (default: true)
  pub use_atom: Option<bool>,
  /// Pretty-print the rendered XML (default: true)
  pub pretty: Option<bool>,
  /// Regex selecting which build inputs are markdown posts
  /// (default: "\.md$")
  pub markdown_pattern: Option<String>,
}

#[derive(
  JsonSchema, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq,
)]
#[serde(deny_unknown_fields)]
pub struct AuthorConfig {
  pub name: Option<String>,
  pub email: Option<String>,
  pub link: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
  pub name: String,
  pub email: String,
  pub link: String,
}

/// Resolved feed options. Built once through [`FeedConfigFile::resolve`]
/// and never changed afterwards.
#[derive(Clone, Debug)]
pub struct FeedConfig {
  title: String,
  output_path: String,
  description: String,
  link: String,
  language: String,
  image: String,
  favicon: String,
  copyright: String,
  updated: DateTime<FixedOffset>,
  generator: String,
  author: Author,
  route: String,
  format: FeedFormat,
  pretty: bool,
  markdown_pattern: Regex,
}

macro_rules! impl_config_accessors {
  ($($field:ident: $ty:ty);* $(;)?) => {
    impl FeedConfig {
      $(
        pub fn $field(&self) -> &$ty {
          &self.$field
        }
      )*
    }
  };
}

impl_config_accessors! {
  title: str;
  output_path: str;
  description: str;
  link: str;
  language: str;
  image: str;
  favicon: str;
  copyright: str;
  generator: str;
  author: Author;
  route: str;
  markdown_pattern: Regex;
}

impl FeedConfig {
  pub fn updated(&self) -> DateTime<FixedOffset> {
    self.updated
  }

  pub fn format(&self) -> FeedFormat {
    self.format
  }

  pub fn pretty(&self) -> bool {
    self.pretty
  }

  /// Feed-level id and link: the site link with a trailing slash.
  pub fn home(&self) -> String {
    format!("{}/", self.link)
  }

  pub fn is_markdown(&self, path: &str) -> bool {
    self.markdown_pattern.is_match(path)
  }
}

impl Default for FeedConfig {
  fn default() -> Self {
    // the built-in defaults are known to be valid
    FeedConfigFile::default()
      .resolve()
      .unwrap_or_else(|e| unreachable!("default feed config invalid: {e}"))
  }
}

impl FeedConfigFile {
  pub fn load_from_file(path: &Path) -> Result<Self> {
    let f = std::fs::File::open(path)?;
    let config = serde_yaml::from_reader(f).map_err(ConfigError::from)?;
    Ok(config)
  }

  pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
    Ok(serde_yaml::from_str(input)?)
  }

  /// Resolve into a [`FeedConfig`], using the current time as the
  /// default `updated` timestamp.
  pub fn resolve(self) -> Result<FeedConfig, ConfigError> {
    self.resolve_at(Local::now().fixed_offset())
  }

  pub fn resolve_at(
    self,
    now: DateTime<FixedOffset>,
  ) -> Result<FeedConfig, ConfigError> {
    let link = normalize_link(self.link.as_deref().unwrap_or(DEFAULT_LINK))?;

    let updated = match self.updated.as_deref() {
      Some(updated) => {
        parse_date(updated).map_err(ConfigError::InvalidUpdated)?
      }
      None => now,
    };

    let output_path = self
      .output_path
      .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_owned());
    let output_path = output_path.trim_start_matches('/').to_owned();
    if output_path.is_empty() {
      return Err(ConfigError::Message("outputPath must not be empty".into()));
    }

    let markdown_pattern = Regex::new(
      self
        .markdown_pattern
        .as_deref()
        .unwrap_or(DEFAULT_MARKDOWN_PATTERN),
    )?;

    let AuthorConfig {
      name,
      email,
      link: author_link,
    } = self.author.unwrap_or_default();
    let author = Author {
      name: name.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
      email: email.unwrap_or_else(|| DEFAULT_AUTHOR_EMAIL.to_owned()),
      link: author_link.unwrap_or_else(|| link.clone()),
    };

    let format = match self.use_atom {
      Some(false) => FeedFormat::Rss,
      Some(true) | None => FeedFormat::Atom,
    };

    Ok(FeedConfig {
      title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
      output_path,
      description: self
        .description
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned()),
      language: self
        .language
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
      image: self.image.unwrap_or_else(|| DEFAULT_IMAGE.to_owned()),
      favicon: self.favicon.unwrap_or_else(|| DEFAULT_IMAGE.to_owned()),
      copyright: self
        .copyright
        .unwrap_or_else(|| DEFAULT_COPYRIGHT.to_owned()),
      updated,
      generator: self
        .generator
        .unwrap_or_else(|| DEFAULT_GENERATOR.to_owned()),
      author,
      route: normalize_route(self.route.as_deref().unwrap_or(DEFAULT_ROUTE)),
      format,
      pretty: self.pretty.unwrap_or(true),
      markdown_pattern,
      link,
    })
  }

  pub fn schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(FeedConfigFile)
  }
}

fn normalize_link(link: &str) -> Result<String, ConfigError> {
  let link = link.trim();
  match Url::parse(link) {
    Ok(url) if url.cannot_be_a_base() => {
      Err(ConfigError::RelativeLink(link.to_owned()))
    }
    Ok(_) => Ok(link.trim_end_matches('/').to_owned()),
    Err(url::ParseError::RelativeUrlWithoutBase) => {
      Err(ConfigError::RelativeLink(link.to_owned()))
    }
    Err(e) => Err(ConfigError::InvalidLink(link.to_owned(), e)),
  }
}

// "/items/" => "/items", "items" => "/items", "/" => ""
fn normalize_route(route: &str) -> String {
  let route = route.trim().trim_matches('/');
  if route.is_empty() {
    String::new()
  } else {
    format!("/{route}")
  }
}
