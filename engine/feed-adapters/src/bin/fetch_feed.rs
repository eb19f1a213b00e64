use anyhow::Context;
use clap::Parser;
use feed_adapters::{FeedEndpoint, FeedsConfig, HttpFeedAdapter};
use feed_core::{DataType, FetchOutcome, LeagueScope, SourceAdapter, SourceId};
use tracing::{error, info};

/// Fetch one (source, data type, league) from a feed endpoint and print it
#[derive(Parser, Debug)]
#[command(name = "fetch-feed")]
struct Args {
    /// Provider: football-data, sofascore or fixturedownload
    #[arg(short, long)]
    source: String,

    /// fixtures, standings, scorers or live
    #[arg(short, long, default_value = "fixtures")]
    data_type: String,

    /// League slug, e.g. premier-league
    #[arg(short, long)]
    league: String,

    /// Feed base URL; defaults to the built-in endpoint for the source
    #[arg(long)]
    base_url: Option<String>,

    /// Auth header as NAME=VALUE
    #[arg(long)]
    auth: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let source: SourceId = args.source.parse().map_err(anyhow::Error::msg)?;
    let data_type: DataType = args.data_type.parse().map_err(anyhow::Error::msg)?;
    let league: LeagueScope = args.league.parse()?;

    let feeds = FeedsConfig::default();
    let mut endpoint = match args.base_url {
        Some(url) => FeedEndpoint::new(url),
        None => feeds.endpoint(source).clone(),
    };
    if let Some(auth) = args.auth {
        let (name, value) =
            auth.split_once('=').context("--auth must look like NAME=VALUE")?;
        endpoint = endpoint.with_auth(name, value);
    }

    let adapter = HttpFeedAdapter::new(source, &endpoint, &feeds)?;
    info!("Probing {}", adapter.url_for(data_type, league));

    match adapter.fetch(data_type, league).await {
        Ok(FetchOutcome::NoData) => info!("Feed reported no data"),
        Ok(FetchOutcome::Records(records)) => {
            info!("Fetched {} records", records.len());
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Err(e) => {
            error!("Fetch failed: {}", e);
            return Err(e.into());
        }
    }
    Ok(())
}
