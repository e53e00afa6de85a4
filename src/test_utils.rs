use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use crate::document::Document;

/// The build instant used across tests: 2024-05-01T12:00:00Z.
pub fn fixed_now() -> DateTime<FixedOffset> {
  DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap()
}

pub fn doc(path: &str, date: &str) -> Document {
  let mut doc = doc_without_date(path);
  doc.metadata.insert("date".into(), date.into());
  doc
}

pub fn doc_without_date(path: &str) -> Document {
  Document {
    path: path.into(),
    title: format!("Title of {path}"),
    excerpt: format!("Excerpt of {path}"),
    metadata: BTreeMap::new(),
  }
}

/// Raw markdown post with a metadata header.
pub fn post(title: &str, date: &str, coverimage: Option<&str>) -> String {
  let mut header = format!("title: {title}\ndate: {date}\n");
  if let Some(cover) = coverimage {
    header.push_str(&format!("coverimage: {cover}\n"));
  }
  format!("---\n{header}---\n\nBody of {title}.\n")
}
