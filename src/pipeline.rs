use tracing::{debug, info, warn};

use crate::{
  config::FeedConfig,
  document::{Document, DocumentExtractor, MarkdownExtractor},
  entry::FeedEntry,
  error::Result,
  feed::{Feed, FeedDocument},
  filter::{BuildContext, filter_publishable},
  host::{Assets, EmitHook},
  sort::{SortOrder, sort_by_date},
};

pub const HOOK_NAME: &str = "markdown-feed";

/// Turns the markdown inputs of a build into one feed file.
pub struct FeedPipeline<E = MarkdownExtractor> {
  config: FeedConfig,
  extractor: E,
}

impl FeedPipeline {
  pub fn new(config: FeedConfig) -> Self {
    Self::with_extractor(config, MarkdownExtractor)
  }
}

impl<E: DocumentExtractor> FeedPipeline<E> {
  pub fn with_extractor(config: FeedConfig, extractor: E) -> Self {
    Self { config, extractor }
  }

  pub fn config(&self) -> &FeedConfig {
    &self.config
  }

  /// Extract every markdown input. Other assets are skipped. The first
  /// extractor failure aborts the build.
  pub fn extract(&self, assets: &Assets) -> Result<Vec<Document>> {
    let mut documents = vec![];
    for (path, raw) in assets.iter() {
      if !self.config.is_markdown(path) {
        continue;
      }
      debug!("extracting {path}");
      documents.push(self.extractor.extract(path, raw)?);
    }
    Ok(documents)
  }

  /// Filter, sort and map the documents into feed entries.
  pub fn entries(
    &self,
    ctx: &BuildContext,
    documents: Vec<Document>,
  ) -> Result<Vec<FeedEntry>> {
    let documents = filter_publishable(ctx, documents);
    let documents = sort_by_date(documents, SortOrder::Descending);
    documents
      .iter()
      .map(|doc| FeedEntry::from_document(doc, &self.config))
      .collect()
  }

  pub fn run(
    &self,
    ctx: &BuildContext,
    assets: &Assets,
  ) -> Result<FeedDocument> {
    let documents = self.extract(assets)?;
    let num_documents = documents.len();
    let entries = self.entries(ctx, documents)?;
    if entries.is_empty() {
      warn!("no publishable posts among {num_documents} markdown inputs");
    }

    let feed = Feed::build(&self.config, &entries);
    let rendered = feed.render(self.config.pretty())?;
    info!(
      "rendered {} feed with {} of {} posts",
      rendered.format(),
      feed.num_entries(),
      num_documents
    );
    Ok(rendered)
  }

  /// Run the pipeline and insert the feed at the configured output path.
  pub fn emit(&self, ctx: &BuildContext, assets: &mut Assets) -> Result<()> {
    let rendered = self.run(ctx, assets)?;
    let output_path = self.config.output_path();
    if assets.insert(output_path, rendered.into_bytes()).is_some() {
      warn!("replaced existing asset at {output_path}");
    }
    info!("emitted feed at {output_path}");
    Ok(())
  }
}

#[async_trait::async_trait]
impl<E> EmitHook for FeedPipeline<E>
where
  E: DocumentExtractor + Send + Sync,
{
  fn name(&self) -> &str {
    HOOK_NAME
  }

  async fn emit(&self, assets: &mut Assets) -> Result<()> {
    Self::emit(self, &BuildContext::new(), assets)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    config::FeedConfigFile,
    error::Error,
    host::Host,
    test_utils::{fixed_now, post},
  };

  fn config(use_atom: bool) -> FeedConfig {
    FeedConfigFile {
      link: Some("https://blog.example.com".into()),
      use_atom: Some(use_atom),
      ..Default::default()
    }
    .resolve_at(fixed_now())
    .unwrap()
  }

  fn site() -> Assets {
    [
      ("posts/future.md", post("Future", "2030-01-01", None)),
      ("posts/old.md", post("Old", "2020-01-01", None)),
      (
        "posts/hello.md",
        post("Hello world", "2021-06-01", Some("/img/hello.png")),
      ),
      ("posts/draft.md", "---\ntitle: Draft\n---\nNo date.\n".to_owned()),
      ("index.html", "<html></html>".to_owned()),
      ("notes.txt", "posts/not-a-post.md".to_owned()),
    ]
    .into_iter()
    .collect()
  }

  struct BrokenExtractor;

  impl DocumentExtractor for BrokenExtractor {
    fn extract(&self, path: &str, _raw: &[u8]) -> Result<Document> {
      Err(Error::extract(path, "unreadable"))
    }
  }

  #[test]
  fn publishes_past_posts_newest_first() {
    let pipeline = FeedPipeline::new(config(true));
    let ctx = BuildContext::at(fixed_now());

    let rendered = pipeline.run(&ctx, &site()).unwrap();
    let feed = atom_syndication::Feed::read_from(rendered.as_bytes()).unwrap();

    let titles: Vec<_> =
      feed.entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["HELLO WORLD", "OLD"]);

    let hello = &feed.entries[0];
    assert_eq!(hello.id, "https://blog.example.com/items/hello");
    assert_eq!(hello.links[0].href, "https://blog.example.com/items/hello");
    assert_eq!(hello.links[1].href, "https://blog.example.com/img/hello.png");
    assert_eq!(feed.entries[1].links.len(), 1);
  }

  #[test]
  fn only_markdown_inputs_are_extracted() {
    let pipeline = FeedPipeline::new(config(true));
    let documents = pipeline.extract(&site()).unwrap();

    let mut paths: Vec<_> =
      documents.iter().map(|d| d.path.as_str()).collect();
    paths.sort_unstable();
    assert_eq!(
      paths,
      vec![
        "posts/draft.md",
        "posts/future.md",
        "posts/hello.md",
        "posts/old.md"
      ]
    );
  }

  #[test]
  fn emits_one_file_and_leaves_other_assets() {
    let pipeline = FeedPipeline::new(config(false));
    let ctx = BuildContext::at(fixed_now());
    let before = site();
    let mut assets = before.clone();

    pipeline.emit(&ctx, &mut assets).unwrap();

    assert_eq!(assets.len(), before.len() + 1);
    for (path, content) in before.iter() {
      assert_eq!(assets.get(path), Some(content));
    }

    let xml = assets.get("rss.xml").unwrap();
    let channel = rss::Channel::read_from(xml).unwrap();
    assert_eq!(channel.items().len(), 2);
    assert_eq!(channel.items()[0].title(), Some("HELLO WORLD"));
  }

  #[test]
  fn format_follows_use_atom() {
    let ctx = BuildContext::at(fixed_now());

    let atom = FeedPipeline::new(config(true)).run(&ctx, &site()).unwrap();
    assert_eq!(atom.content_type(), "application/atom+xml");
    assert!(atom_syndication::Feed::read_from(atom.as_bytes()).is_ok());

    let rss = FeedPipeline::new(config(false)).run(&ctx, &site()).unwrap();
    assert_eq!(rss.content_type(), "application/rss+xml");
    assert!(rss::Channel::read_from(rss.as_bytes()).is_ok());
  }

  #[test]
  fn extractor_failure_is_fatal() {
    let pipeline = FeedPipeline::with_extractor(config(true), BrokenExtractor);
    let ctx = BuildContext::at(fixed_now());
    let mut assets = site();

    let err = pipeline.emit(&ctx, &mut assets).unwrap_err();

    assert!(matches!(err, Error::Extract { .. }));
    assert!(!assets.contains("rss.xml"));
  }

  #[test]
  fn no_posts_gives_an_empty_feed() {
    let pipeline = FeedPipeline::new(config(true));
    let ctx = BuildContext::at(fixed_now());
    let assets: Assets =
      [("index.html", "<html></html>")].into_iter().collect();

    let rendered = pipeline.run(&ctx, &assets).unwrap();
    let feed = atom_syndication::Feed::read_from(rendered.as_bytes()).unwrap();
    assert!(feed.entries.is_empty());
  }

  #[test]
  fn repeated_runs_are_identical() {
    let pipeline = FeedPipeline::new(config(true));
    let ctx = BuildContext::at(fixed_now());

    let first = pipeline.run(&ctx, &site()).unwrap();
    let second = pipeline.run(&ctx, &site()).unwrap();
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn runs_as_emit_hook() {
    let mut host = Host::new();
    host.register(FeedPipeline::new(config(true)));
    let mut assets = site();

    host.emit(&mut assets).await.unwrap();

    assert!(assets.contains("rss.xml"));
  }
}
