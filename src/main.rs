use clap::Parser;
use markdown_feed::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt::init();

  let cli = Cli::parse();
  cli.run().await
}
