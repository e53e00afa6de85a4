use atom_syndication::{Content, Entry, Feed, Generator, Link, Person, Text};

use super::image_mime_type;
use crate::{config::FeedConfig, entry::FeedEntry};

pub(super) fn build_feed(config: &FeedConfig, entries: &[FeedEntry]) -> Feed {
  let author = config.author();

  Feed {
    title: Text::plain(config.title().to_owned()),
    subtitle: Some(Text::plain(config.description().to_owned())),
    id: config.home(),
    links: vec![Link {
      href: config.home(),
      ..Default::default()
    }],
    lang: Some(config.language().to_owned()),
    logo: Some(config.image().to_owned()),
    icon: Some(config.favicon().to_owned()),
    rights: Some(Text::plain(config.copyright().to_owned())),
    updated: config.updated(),
    generator: Some(Generator {
      value: config.generator().to_owned(),
      uri: None,
      version: None,
    }),
    authors: vec![Person {
      name: author.name.clone(),
      email: Some(author.email.clone()),
      uri: Some(author.link.clone()),
      ..Default::default()
    }],
    entries: entries.iter().map(build_entry).collect(),
    ..Default::default()
  }
}

fn build_entry(entry: &FeedEntry) -> Entry {
  let mut links = vec![Link {
    href: entry.link.clone(),
    ..Default::default()
  }];

  if let Some(image) = &entry.image {
    links.push(Link {
      href: image.clone(),
      rel: "enclosure".to_owned(),
      mime_type: Some(image_mime_type(image)),
      ..Default::default()
    });
  }

  Entry {
    title: Text::plain(entry.title.clone()),
    id: entry.id.clone(),
    links,
    updated: entry.date,
    published: Some(entry.date),
    summary: Some(Text::plain(entry.description.clone())),
    content: Some(Content {
      value: Some(entry.content.clone()),
      content_type: Some("text".to_owned()),
      ..Default::default()
    }),
    ..Default::default()
  }
}
