use std::cmp::Reverse;

use crate::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
  /// Newest first
  #[default]
  Descending,
  Ascending,
}

/// Order documents by publication date.
///
/// Documents with equal dates end up next to each other in no particular
/// order. Unparseable dates are expected to be filtered out beforehand;
/// if any remain they sort as the oldest.
pub fn sort_by_date(
  mut documents: Vec<Document>,
  order: SortOrder,
) -> Vec<Document> {
  match order {
    SortOrder::Descending => {
      documents.sort_unstable_by_key(|doc| Reverse(doc.pub_date().ok()))
    }
    SortOrder::Ascending => {
      documents.sort_unstable_by_key(|doc| doc.pub_date().ok())
    }
  }
  documents
}
