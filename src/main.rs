use anyhow::Result;
use clap::Parser;
use svg_inliner::cli::{Cli, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.log.as_deref());

  if let Err(error) = cli.execute().await {
    eprintln!("error: {error:#}");
    std::process::exit(1);
  }

  Ok(())
}
