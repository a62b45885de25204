use anyhow::{Context, Result};
use site_feed::config::Config;
use site_feed::feed::http::HttpFeedSource;
use site_feed::rss::render_channel;
use site_feed::{Store, SyncOutcome, Synchronizer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

enum Output {
    Summary,
    Json,
    Rss(PathBuf),
}

struct Args {
    config: PathBuf,
    output: Output,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Args {
            config: PathBuf::from("config.toml"),
            output: Output::Summary,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    parsed.config = args.next().context("--config needs a path")?.into();
                }
                "--rss" => {
                    parsed.output = Output::Rss(args.next().context("--rss needs a path")?.into());
                }
                "--json" => parsed.output = Output::Json,
                other => anyhow::bail!("unknown argument: {}", other),
            }
        }
        Ok(parsed)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("site_feed=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = Config::load(&args.config)?;

    let store = Arc::new(Store::new());
    let synchronizer = Synchronizer::new(
        Arc::new(HttpFeedSource::new()),
        store.clone(),
        config.feed.policy(),
    );

    loop {
        match synchronizer.sync(&config.feed.url).await {
            SyncOutcome::Committed(report) => {
                tracing::debug!(
                    found = report.found,
                    stored = report.stored,
                    dropped = report.dropped,
                    "sync committed"
                );
            }
            SyncOutcome::KeptStale(report) => {
                tracing::debug!(stored = report.stored, "empty feed, kept previous records");
            }
            SyncOutcome::Failed(_) => {}
        }

        emit(&args.output, &config, &store)?;

        let Some(secs) = config.feed.refresh_interval_s else {
            break;
        };
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    Ok(())
}

fn emit(output: &Output, config: &Config, store: &Store) -> Result<()> {
    let records = store.list_all();
    match output {
        Output::Summary => {
            for r in &records {
                println!("{}  {:<32}  {}", r.published_at.format("%Y-%m-%d"), r.id, r.title);
            }
        }
        Output::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Output::Rss(path) => {
            let xml = render_channel(&config.site.channel(), &records);
            std::fs::write(path, xml)
                .with_context(|| format!("Failed to write feed: {}", path.display()))?;
        }
    }
    Ok(())
}
