mod excerpt;

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde_yaml::Value;

use crate::{
  error::{Error, Result},
  util::{DateError, parse_date},
};

pub use excerpt::{extract_excerpt, first_heading, strip_markdown};

/// One markdown post, as read from the build inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
  pub path: String,
  pub title: String,
  pub excerpt: String,
  pub metadata: BTreeMap<String, String>,
}

impl Document {
  pub fn meta(&self, key: &str) -> Option<&str> {
    self.metadata.get(key).map(String::as_str)
  }

  /// The raw `date` metadata value.
  pub fn date(&self) -> Option<&str> {
    self.meta("date")
  }

  pub fn cover_image(&self) -> Option<&str> {
    self.meta("coverimage").filter(|s| !s.trim().is_empty())
  }

  pub fn pub_date(&self) -> Result<DateTime<FixedOffset>, DateError> {
    match self.date() {
      Some(date) => parse_date(date),
      None => Err(DateError::Missing),
    }
  }
}

/// Turns the raw text of a build input into a [`Document`].
pub trait DocumentExtractor {
  fn extract(&self, path: &str, raw: &[u8]) -> Result<Document>;
}

/// Reads markdown with an optional YAML metadata header:
///
/// ```text
/// ---
/// title: Hello
/// date: 2021-06-01
/// coverimage: /images/hello.png
/// ---
/// Post body...
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownExtractor;

impl DocumentExtractor for MarkdownExtractor {
  fn extract(&self, path: &str, raw: &[u8]) -> Result<Document> {
    let text = std::str::from_utf8(raw).map_err(|e| Error::extract(path, e))?;
    let (header, body) =
      split_header(text).map_err(|e| Error::extract(path, e))?;
    let metadata = match header {
      Some(header) => {
        parse_metadata(header).map_err(|e| Error::extract(path, e))?
      }
      None => BTreeMap::new(),
    };

    let title = metadata
      .get("title")
      .cloned()
      .or_else(|| first_heading(body))
      .unwrap_or_else(|| file_stem(path).to_owned());

    let excerpt = metadata
      .get("excerpt")
      .cloned()
      .unwrap_or_else(|| extract_excerpt(body));

    Ok(Document {
      path: path.to_owned(),
      title,
      excerpt,
      metadata,
    })
  }
}

fn is_delimiter(line: &str) -> bool {
  line.trim_end() == "---"
}

fn is_closing_delimiter(line: &str) -> bool {
  is_delimiter(line) || line.trim_end() == "..."
}

// Returns the metadata header (without delimiters) and the body.
fn split_header(text: &str) -> Result<(Option<&str>, &str), String> {
  let text = text.trim_start_matches('\u{feff}');
  let (first_line, rest) = text.split_once('\n').unwrap_or((text, ""));
  if !is_delimiter(first_line) {
    return Ok((None, text));
  }

  let mut offset = 0;
  for line in rest.split_inclusive('\n') {
    if is_closing_delimiter(line) {
      let header = &rest[..offset];
      let body = &rest[offset + line.len()..];
      return Ok((Some(header), body));
    }
    offset += line.len();
  }

  Err("metadata header is not closed by `---`".into())
}

fn parse_metadata(header: &str) -> Result<BTreeMap<String, String>, String> {
  if header.trim().is_empty() {
    return Ok(BTreeMap::new());
  }

  let value: Value = serde_yaml::from_str(header)
    .map_err(|e| format!("invalid metadata header: {e}"))?;
  let mapping = match value {
    Value::Mapping(mapping) => mapping,
    Value::Null => return Ok(BTreeMap::new()),
    _ => return Err("metadata header is not a key-value mapping".into()),
  };

  let mut metadata = BTreeMap::new();
  for (key, value) in mapping {
    let key = scalar_to_string(&key)
      .ok_or_else(|| "metadata keys must be plain values".to_owned())?;
    // an empty `date:` stays visible to the filter as "null"
    if value.is_null() && key != "date" {
      continue;
    }
    let value = metadata_value(&value)
      .ok_or_else(|| format!("metadata `{key}` must not be a mapping"))?;
    metadata.insert(key, value);
  }
  Ok(metadata)
}

fn metadata_value(value: &Value) -> Option<String> {
  match value {
    Value::Sequence(items) => items
      .iter()
      .map(scalar_to_string)
      .collect::<Option<Vec<_>>>()
      .map(|items| items.join(", ")),
    other => scalar_to_string(other),
  }
}

fn scalar_to_string(value: &Value) -> Option<String> {
  match value {
    Value::Null => Some("null".to_owned()),
    Value::Bool(b) => Some(b.to_string()),
    Value::Number(n) => Some(n.to_string()),
    Value::String(s) => Some(s.clone()),
    Value::Tagged(tagged) => scalar_to_string(&tagged.value),
    Value::Sequence(_) | Value::Mapping(_) => None,
  }
}

fn file_stem(path: &str) -> &str {
  let name = path.rsplit('/').next().unwrap_or(path);
  match name.rsplit_once('.') {
    Some((stem, _ext)) if !stem.is_empty() => stem,
    _ => name,
  }
}
