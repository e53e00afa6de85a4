use rss::{Channel, Enclosure, Guid, Image, Item};

use super::image_mime_type;
use crate::{config::FeedConfig, entry::FeedEntry};

const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

pub(super) fn build_channel(
  config: &FeedConfig,
  entries: &[FeedEntry],
) -> Channel {
  let author = config.author();
  let mut channel = Channel {
    title: config.title().to_owned(),
    link: config.home(),
    description: config.description().to_owned(),
    language: Some(config.language().to_owned()),
    copyright: Some(config.copyright().to_owned()),
    managing_editor: Some(format!("{} ({})", author.email, author.name)),
    generator: Some(config.generator().to_owned()),
    last_build_date: Some(config.updated().to_rfc2822()),
    image: Some(Image {
      url: config.image().to_owned(),
      title: config.title().to_owned(),
      link: config.home(),
      ..Default::default()
    }),
    items: entries.iter().map(build_item).collect(),
    ..Default::default()
  };

  // items carry <content:encoded>
  channel
    .namespaces
    .insert("content".to_owned(), CONTENT_NAMESPACE.to_owned());
  channel
}

fn build_item(entry: &FeedEntry) -> Item {
  Item {
    title: Some(entry.title.clone()),
    link: Some(entry.link.clone()),
    guid: Some(Guid {
      value: entry.id.clone(),
      permalink: true,
    }),
    description: Some(entry.description.clone()),
    content: Some(entry.content.clone()),
    pub_date: Some(entry.date.to_rfc2822()),
    enclosure: entry.image.as_ref().map(|image| Enclosure {
      url: image.clone(),
      mime_type: image_mime_type(image),
      length: "0".to_owned(),
    }),
    ..Default::default()
  }
}
