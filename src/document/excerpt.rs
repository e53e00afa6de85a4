// Plain-text views of a markdown body, used for post titles and excerpts.

use lazy_static::lazy_static;
use pulldown_cmark::Event::{
  Code, End, HardBreak, Rule, SoftBreak, Start, Text,
};
use pulldown_cmark::{Options, Parser, Tag};
use regex::Regex;

const EXCERPT_MAX_CHARS: usize = 200;

lazy_static! {
  static ref MORE_MARKER: Regex = Regex::new(r"<!--\s*more\s*-->").unwrap();
}

fn parser(markdown: &str) -> Parser<'_, '_> {
  // GFM tables and tasks lists are not enabled.
  let mut options = Options::empty();
  options.insert(Options::ENABLE_STRIKETHROUGH);
  Parser::new_ext(markdown, options)
}

/// Excerpt of a post body.
///
/// Everything before a `<!-- more -->` marker when the body has one,
/// otherwise the first paragraph that carries text.
pub fn extract_excerpt(markdown: &str) -> String {
  if let Some(marker) = MORE_MARKER.find(markdown) {
    let text = strip_markdown(&markdown[..marker.start()]);
    return collapse_whitespace(&text);
  }

  first_paragraph(markdown)
}

/// Text of the first heading in the body, if any.
pub fn first_heading(markdown: &str) -> Option<String> {
  let mut buffer = String::new();
  let mut in_heading = false;

  for event in parser(markdown) {
    match event {
      Start(Tag::Heading(..)) => {
        in_heading = true;
        buffer.clear();
      }
      Text(text) | Code(text) if in_heading => buffer.push_str(&text),
      End(Tag::Heading(..)) => {
        in_heading = false;
        let title = buffer.trim();
        if !title.is_empty() {
          return Some(title.to_owned());
        }
      }
      _ => (),
    }
  }

  None
}

fn first_paragraph(markdown: &str) -> String {
  let mut buffer = String::new();
  let mut in_paragraph = false;
  let mut image_depth = 0usize;

  for event in parser(markdown) {
    match event {
      Start(Tag::Paragraph) => {
        in_paragraph = true;
        buffer.clear();
      }
      End(Tag::Paragraph) => {
        in_paragraph = false;
        if !buffer.trim().is_empty() {
          break;
        }
      }
      // image alt text is not prose
      Start(Tag::Image(..)) => image_depth += 1,
      End(Tag::Image(..)) => image_depth = image_depth.saturating_sub(1),
      Text(text) | Code(text) if in_paragraph && image_depth == 0 => {
        buffer.push_str(&text)
      }
      SoftBreak | HardBreak if in_paragraph => buffer.push(' '),
      _ => (),
    }
  }

  let text = collapse_whitespace(&buffer);
  text.chars().take(EXCERPT_MAX_CHARS).collect()
}

fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// A fork from https://github.com/arranf/strip-markdown

/// Convert markdown into plain text.
#[must_use]
pub fn strip_markdown(markdown: &str) -> String {
  let mut buffer = String::new();

  // For each event we push into the buffer to produce the 'stripped' version.
  for event in parser(markdown) {
    match event {
      // The start and end events don't contain the text inside the tag.
      // That's handled by the `Event::Text` arm.
      Start(tag) => start_tag(&tag, &mut buffer),
      End(tag) => end_tag(&tag, &mut buffer),
      Text(text) => buffer.push_str(&text),
      Code(code) => buffer.push_str(&code),
      SoftBreak | HardBreak | Rule => fresh_line(&mut buffer),
      _ => (),
    }
  }
  buffer
}

fn start_tag(tag: &Tag, buffer: &mut String) {
  match tag {
    Tag::CodeBlock(_) | Tag::List(_) => fresh_line(buffer),
    Tag::Link(_, _, title) => {
      if !title.is_empty() {
        buffer.push_str(title);
      }
    }
    _ => (),
  }
}

fn end_tag(tag: &Tag, buffer: &mut String) {
  match tag {
    Tag::Table(_)
    | Tag::TableHead
    | Tag::TableRow
    | Tag::Heading(..)
    | Tag::BlockQuote
    | Tag::CodeBlock(_)
    | Tag::Paragraph
    | Tag::Item => fresh_line(buffer),
    _ => (),
  }
}

fn fresh_line(buffer: &mut String) {
  buffer.push('\n');
}
