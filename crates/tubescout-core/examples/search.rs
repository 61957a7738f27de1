//! Keyword search from the command line
//!
//! Run with: YT_API_KEY=... cargo run --example search -p tubescout-core -- "rust async" 100
//!
//! The second argument is the minimum view count (default 0). State is kept
//! in `tubescout.json` in the working directory, so a quota cooldown set by
//! one run blocks the next.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tubescout_core::{ApiError, ApiKeyStore, JsonFileStore, SearchCriteria, TubeScout};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tubescout_core=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let keyword = args.next().unwrap_or_else(|| "rust programming".to_string());
    let min_views = args.next().and_then(|v| v.parse().ok()).unwrap_or(0);

    let store = Arc::new(JsonFileStore::open("tubescout.json")?);
    let api_key = ApiKeyStore::new(store.clone()).require()?;
    let scout = TubeScout::new(store)?;

    let mut criteria = SearchCriteria::keyword(api_key, keyword.as_str());
    criteria.min_views = min_views;
    criteria.per_query_limit = 30;
    criteria.wait_minutes_on_quota = 1;

    println!("Searching for '{}' (min {} views)...\n", keyword, min_views);

    match scout.run_search(&criteria).await {
        Ok(videos) if videos.is_empty() => println!("No results found!"),
        Ok(videos) => {
            for (i, video) in videos.iter().enumerate() {
                println!("{}. {}", i + 1, video.title);
                println!("   Channel: {}", video.channel_title);
                println!("   Views: {}  Duration: {}s", video.views, video.duration_sec);
                println!("   {}", video.url);
                println!();
            }
        }
        Err(ApiError::CooldownActive { wait_minutes }) => {
            println!("Quota cooldown active, try again in {} minute(s).", wait_minutes);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
