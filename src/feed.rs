mod atom;
mod rss2;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{config::FeedConfig, entry::FeedEntry, error::Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Feed {
  Rss(rss::Channel),
  Atom(atom_syndication::Feed),
}

#[derive(
  JsonSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, Copy,
)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
  /// RSS 2.0
  Rss,
  /// Atom 1.0
  Atom,
}

impl FeedFormat {
  pub fn content_type(self) -> &'static str {
    match self {
      FeedFormat::Rss => "application/rss+xml",
      FeedFormat::Atom => "application/atom+xml",
    }
  }
}

impl std::fmt::Display for FeedFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FeedFormat::Rss => f.write_str("RSS 2.0"),
      FeedFormat::Atom => f.write_str("Atom 1.0"),
    }
  }
}

impl Feed {
  /// Assemble the feed in the configured format. Entries keep the
  /// order they are given in.
  pub fn build(config: &FeedConfig, entries: &[FeedEntry]) -> Self {
    match config.format() {
      FeedFormat::Rss => Feed::Rss(rss2::build_channel(config, entries)),
      FeedFormat::Atom => Feed::Atom(atom::build_feed(config, entries)),
    }
  }

  pub fn format(&self) -> FeedFormat {
    match self {
      Feed::Rss(_) => FeedFormat::Rss,
      Feed::Atom(_) => FeedFormat::Atom,
    }
  }

  pub fn content_type(&self) -> &'static str {
    self.format().content_type()
  }

  pub fn num_entries(&self) -> usize {
    match self {
      Feed::Rss(channel) => channel.items.len(),
      Feed::Atom(feed) => feed.entries.len(),
    }
  }

  pub fn serialize(&self, pretty: bool) -> Result<Vec<u8>> {
    let mut buffer = vec![];

    match self {
      Feed::Rss(channel) => {
        if pretty {
          channel.pretty_write_to(&mut buffer, b' ', 2)?;
        } else {
          channel.write_to(&mut buffer)?;
        }
      }
      Feed::Atom(feed) => {
        let mut conf = atom_syndication::WriteConfig {
          indent_size: None,
          write_document_declaration: true,
        };

        if pretty {
          conf.indent_size = Some(2);
        }

        feed.write_with_config(&mut buffer, conf)?;
      }
    };

    Ok(buffer)
  }

  pub fn render(&self, pretty: bool) -> Result<FeedDocument> {
    Ok(FeedDocument {
      format: self.format(),
      bytes: self.serialize(pretty)?,
    })
  }
}

/// A rendered feed, ready to be written out by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedDocument {
  format: FeedFormat,
  bytes: Vec<u8>,
}

impl FeedDocument {
  pub fn format(&self) -> FeedFormat {
    self.format
  }

  pub fn content_type(&self) -> &'static str {
    self.format.content_type()
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.bytes
  }
}

/// Guess the MIME type of an image from the extension of its url.
fn image_mime_type(url: &str) -> String {
  let path = url.split(['?', '#']).next().unwrap_or(url);
  let extension = path
    .rsplit_once('.')
    .map(|(_, ext)| ext.to_ascii_lowercase())
    .unwrap_or_default();

  let mime = match extension.as_str() {
    "png" => mime::IMAGE_PNG,
    "jpg" | "jpeg" => mime::IMAGE_JPEG,
    "gif" => mime::IMAGE_GIF,
    "svg" => mime::IMAGE_SVG,
    "bmp" => mime::IMAGE_BMP,
    "webp" => return "image/webp".to_owned(),
    _ => mime::APPLICATION_OCTET_STREAM,
  };
  mime.essence_str().to_owned()
}
