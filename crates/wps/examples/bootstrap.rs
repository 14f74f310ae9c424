//! Load settings, install logging, and run a cached export.
//!
//! Try `WPS__CACHE__BACKEND=memory WPS__LOGGING__LEVEL=debug`.

use serde_json::json;
use wps::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load(None)?;
    wps::telemetry::init(&settings.logging)?;

    let ctx = WpsContext::bootstrap(settings).await;
    let posts = ctx.cache().group("posts");

    let rows = match posts.get_opt::<Vec<serde_json::Value>>("recent").await {
        Some(rows) => {
            println!("served from cache");
            rows
        }
        None => {
            let rows = vec![
                json!({"id": 1, "title": "Hello world"}),
                json!({"id": 2, "title": "Second post"}),
            ];
            posts.set("recent", &rows, true, 60).await;
            rows
        }
    };

    let mut exporter = ctx.exporter();
    exporter.format("csv").set_data(rows);
    let download = exporter.download("recent-posts");
    println!("{}:\n{}", download.disposition(), String::from_utf8_lossy(download.body()));

    ctx.shutdown().await;
    Ok(())
}
