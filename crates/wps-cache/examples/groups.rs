use wps_cache::prelude::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let cache = CacheManager::new(MemoryBackend::new(MemoryConfig::default()));

    let posts = cache.group("posts");
    let options = cache.group("options");

    println!("Caching posts:1 and options:blogname");
    posts.set("1", "Hello world", false, 300).await;
    options.set("blogname", "My Blog", false, 0).await;

    // Not forced: the first value stays
    let stored = posts.set("1", "Overwritten?", false, 300).await;
    println!("second non-forced set stored: {stored}");

    let title: String = posts.get("1", String::new()).await;
    println!("posts:1 = {title}");
    assert_eq!(title, "Hello world");

    println!("\nFlushing the posts group...");
    let removed = posts.invalidate_all().await;
    println!("removed {removed} entries");

    assert!(!posts.is_populated().await);
    assert!(options.is_populated().await);

    let blogname: String = options.get("blogname", String::new()).await;
    println!("options:blogname still cached = {blogname}");

    let stats = cache.stats().await;
    println!(
        "\nhits={} misses={} ratio={:.2}",
        stats.hits,
        stats.misses,
        stats.hit_ratio()
    );
}
