use chrono::{DateTime, FixedOffset, Local};
use tracing::debug;

use crate::{document::Document, util::DateError};

/// Per-build state shared by the pipeline stages.
#[derive(Clone, Debug)]
pub struct BuildContext {
  /// The build instant. Posts dated after it are not published yet.
  now: DateTime<FixedOffset>,
}

impl BuildContext {
  pub fn new() -> Self {
    Self::at(Local::now().fixed_offset())
  }

  pub fn at(now: DateTime<FixedOffset>) -> Self {
    Self { now }
  }

  pub fn now(&self) -> DateTime<FixedOffset> {
    self.now
  }
}

impl Default for BuildContext {
  fn default() -> Self {
    Self::new()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unpublished {
  NoDate(DateError),
  Scheduled(DateTime<FixedOffset>),
}

/// Check whether a document can be published at the build instant.
pub fn check_publishable(
  ctx: &BuildContext,
  doc: &Document,
) -> Result<DateTime<FixedOffset>, Unpublished> {
  let date = doc.pub_date().map_err(Unpublished::NoDate)?;
  if date > ctx.now() {
    return Err(Unpublished::Scheduled(date));
  }
  Ok(date)
}

/// Keep only the documents whose date is present, valid and not in the
/// future. The relative order of the kept documents is unchanged.
pub fn filter_publishable(
  ctx: &BuildContext,
  documents: Vec<Document>,
) -> Vec<Document> {
  let mut documents = documents;
  documents.retain(|doc| match check_publishable(ctx, doc) {
    Ok(_) => true,
    Err(Unpublished::NoDate(e)) => {
      debug!(path = %doc.path, "skipping post: {e}");
      false
    }
    Err(Unpublished::Scheduled(date)) => {
      debug!(path = %doc.path, %date, "skipping post scheduled in the future");
      false
    }
  });
  documents
}
