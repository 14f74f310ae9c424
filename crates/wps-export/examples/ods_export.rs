use serde_json::json;
use wps_export::{Exporter, OdsWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let posts = vec![
        json!({"id": 1, "title": "Hello world", "status": "publish"}),
        json!({"id": 2, "title": "Draft \u{7} with a bell", "status": "draft"}),
        json!({"id": 3, "title": "Caffè & cornetto", "status": "publish"}),
    ];

    // Through the exporter: the row with a control character is skipped.
    let mut exporter = Exporter::new();
    exporter.format("ods").set_data(posts.clone());
    let download = exporter.download("posts");
    println!(
        "{} ({}, {} bytes)",
        download.filename(),
        download.content_type(),
        download.len()
    );

    // Directly, with one sheet per status.
    let mut writer = OdsWriter::new()?;
    for post in &posts {
        let status = post["status"].as_str().unwrap_or("other");
        writer.set_page(status)?;
        let title = post["title"].as_str().unwrap_or_default();
        if let Err(e) = writer.add_row([post["id"].to_string(), title.to_string()]) {
            println!("skipped post {}: {e}", post["id"]);
        }
    }
    println!("sheets: {}", writer.sheet_count());

    let out = std::env::temp_dir().join("wps-posts-by-status.ods");
    std::fs::write(&out, writer.export()?)?;
    println!("written to {}", out.display());

    Ok(())
}
