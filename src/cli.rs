use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::{
  config::FeedConfigFile,
  host::{Assets, Host},
  pipeline::FeedPipeline,
};

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
  #[clap(subcommand)]
  subcmd: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
  /// Render the feed for a directory of build outputs
  Build(BuildConfig),
  /// Print the JSON schema of the config file
  Schema,
}

#[derive(Parser)]
struct BuildConfig {
  /// Directory holding the markdown posts and other build outputs
  source: PathBuf,
  /// YAML config file with the feed options
  #[clap(long, short, env = "MARKDOWN_FEED_CONFIG")]
  config: Option<PathBuf>,
  /// Directory to write the feed into (default: the source directory)
  #[clap(long, short)]
  dest: Option<PathBuf>,
  /// Whether to compact the XML output (opposite of pretty-print)
  #[clap(long)]
  compact: bool,
  /// Render RSS 2.0 regardless of the config
  #[clap(long, conflicts_with = "atom")]
  rss: bool,
  /// Render Atom 1.0 regardless of the config
  #[clap(long)]
  atom: bool,
  /// Print the feed instead of writing it
  #[clap(long)]
  stdout: bool,
}

impl Cli {
  pub async fn run(self) -> anyhow::Result<()> {
    match self.subcmd {
      SubCommand::Build(build_config) => build_config.run().await,
      SubCommand::Schema => {
        let schema = FeedConfigFile::schema();
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
      }
    }
  }
}

impl BuildConfig {
  fn load_config(&self) -> anyhow::Result<FeedConfigFile> {
    let mut config = match &self.config {
      Some(path) => FeedConfigFile::load_from_file(path).with_context(|| {
        format!("failed to load config from {}", path.display())
      })?,
      None => FeedConfigFile::default(),
    };

    if self.rss {
      config.use_atom = Some(false);
    } else if self.atom {
      config.use_atom = Some(true);
    }
    if self.compact {
      config.pretty = Some(false);
    }
    Ok(config)
  }

  async fn run(self) -> anyhow::Result<()> {
    let config = self.load_config()?.resolve()?;
    let output_path = config.output_path().to_owned();

    let source = self.source.clone();
    let mut assets =
      tokio::task::spawn_blocking(move || Assets::load_dir(&source))
        .await
        .context("asset loader panicked")?
        .with_context(|| {
          format!("failed to read {}", self.source.display())
        })?;

    let mut host = Host::new();
    host.register(FeedPipeline::new(config));
    host.emit(&mut assets).await?;

    if self.stdout {
      let Some(feed) = assets.get(&output_path) else {
        anyhow::bail!("no feed emitted at {output_path}");
      };
      println!("{}", String::from_utf8_lossy(feed));
      return Ok(());
    }

    let dest = self.dest.as_ref().unwrap_or(&self.source);
    let written = assets.write_to(&output_path, dest)?;
    info!("wrote {}", written.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::{fs, io::BufReader, path::Path};

  use super::*;
  use crate::test_utils::post;

  fn site(dir: &Path) {
    fs::create_dir_all(dir.join("posts")).unwrap();
    fs::write(
      dir.join("posts/first.md"),
      post("First", "2020-01-01", None),
    )
    .unwrap();
    fs::write(
      dir.join("posts/second.md"),
      post("Second", "2021-06-01", Some("/img/second.png")),
    )
    .unwrap();
    fs::write(dir.join("index.html"), "<html></html>").unwrap();
    fs::write(dir.join("feed.yml"), "link: https://blog.example.com\n")
      .unwrap();
  }

  fn build_config(source: &Path) -> BuildConfig {
    BuildConfig {
      source: source.to_path_buf(),
      config: Some(source.join("feed.yml")),
      dest: None,
      compact: false,
      rss: false,
      atom: false,
      stdout: false,
    }
  }

  #[tokio::test]
  async fn builds_atom_into_dest() {
    let source = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    site(source.path());

    let mut config = build_config(source.path());
    config.dest = Some(dest.path().to_path_buf());
    config.run().await.unwrap();

    let file = fs::File::open(dest.path().join("rss.xml")).unwrap();
    let feed = atom_syndication::Feed::read_from(BufReader::new(file)).unwrap();
    let titles: Vec<_> =
      feed.entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["SECOND", "FIRST"]);
    assert_eq!(feed.entries[1].id, "https://blog.example.com/items/first");

    // only the feed is written out
    assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 1);
    assert!(!source.path().join("rss.xml").exists());
  }

  #[tokio::test]
  async fn rss_flag_switches_format() {
    let source = tempfile::tempdir().unwrap();
    site(source.path());

    let mut config = build_config(source.path());
    config.rss = true;
    config.compact = true;
    config.run().await.unwrap();

    let xml = fs::read_to_string(source.path().join("rss.xml")).unwrap();
    let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
    assert_eq!(channel.items().len(), 2);
    assert_eq!(channel.items()[0].title(), Some("SECOND"));
    assert!(!xml.contains("\n  <"));
  }

  #[test]
  fn flags_override_config_file() {
    let source = tempfile::tempdir().unwrap();
    site(source.path());
    fs::write(
      source.path().join("feed.yml"),
      "useAtom: false\npretty: true\n",
    )
    .unwrap();

    let mut config = build_config(source.path());
    config.atom = true;
    config.compact = true;
    let file = config.load_config().unwrap();
    assert_eq!(file.use_atom, Some(true));
    assert_eq!(file.pretty, Some(false));

    let config = build_config(source.path());
    assert_eq!(config.load_config().unwrap().use_atom, Some(false));
  }

  #[tokio::test]
  async fn stdout_leaves_source_untouched() {
    let source = tempfile::tempdir().unwrap();
    site(source.path());

    let mut config = build_config(source.path());
    config.stdout = true;
    config.run().await.unwrap();

    assert!(!source.path().join("rss.xml").exists());
  }

  #[tokio::test]
  async fn missing_config_file_fails() {
    let source = tempfile::tempdir().unwrap();
    site(source.path());

    let mut config = build_config(source.path());
    config.config = Some(source.path().join("nope.yml"));
    let err = config.run().await.unwrap_err();
    assert!(err.to_string().contains("nope.yml"));
  }
}
