use chrono::{DateTime, FixedOffset};
use tracing::debug;
use url::Url;

use crate::{config::FeedConfig, document::Document, error::Result};

/// The path segment of source posts that gets replaced by the
/// configured route.
const POSTS_SEGMENT: &str = "posts";

/// One item of the rendered feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedEntry {
  pub title: String,
  pub id: String,
  pub link: String,
  pub description: String,
  pub content: String,
  pub date: DateTime<FixedOffset>,
  /// Absolute url of the cover image, if the post has one.
  pub image: Option<String>,
}

impl FeedEntry {
  pub fn from_document(doc: &Document, config: &FeedConfig) -> Result<Self> {
    let date = doc.pub_date()?;
    let path = rewrite_path(&doc.path, config.route());
    let url = format!("{}{}", config.link(), path);

    let image = match doc.cover_image() {
      Some(cover) => Some(resolve_image(cover, config.link())),
      None => {
        debug!(path = %doc.path, "post has no cover image");
        None
      }
    };

    Ok(FeedEntry {
      title: doc.title.to_uppercase(),
      id: url.clone(),
      link: url,
      description: doc.excerpt.clone(),
      content: doc.excerpt.clone(),
      date,
      image,
    })
  }
}

/// Map a source path to the url path of the published post:
/// `posts/hello.md` with route `/items` becomes `/items/hello`.
pub fn rewrite_path(path: &str, route: &str) -> String {
  let path = strip_extension(path);
  let route = route.trim_matches('/');

  let mut segments = Vec::new();
  let mut rewritten = false;
  for segment in path.split('/').filter(|s| !s.is_empty()) {
    if !rewritten && segment == POSTS_SEGMENT {
      rewritten = true;
      if !route.is_empty() {
        segments.push(route);
      }
    } else {
      segments.push(segment);
    }
  }

  format!("/{}", segments.join("/"))
}

fn strip_extension(path: &str) -> &str {
  let name_start = path.rfind('/').map_or(0, |i| i + 1);
  match path[name_start..].rfind('.') {
    Some(dot) if dot > 0 => &path[..name_start + dot],
    _ => path,
  }
}

/// Make a cover image url absolute against the site link. Urls that
/// already carry a scheme are returned as is.
pub fn resolve_image(image: &str, site_link: &str) -> String {
  let image = image.trim();
  if Url::parse(image).is_ok() {
    return image.to_owned();
  }

  if image.starts_with("//") {
    let scheme = site_link.split_once("://").map_or("https", |(s, _)| s);
    return format!("{scheme}:{image}");
  }

  if image.starts_with('/') {
    format!("{site_link}{image}")
  } else {
    format!("{site_link}/{image}")
  }
}
