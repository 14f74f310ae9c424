use wps_cache::prelude::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    // An unreachable server is not fatal: the cache runs disabled.
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    println!("Connecting to Redis at {redis_url}");

    let mut config = CacheConfig::with_backend(BackendChoice::Redis);
    config.redis = RedisConfig::new(redis_url).pool_size(4).prefix("example");

    let cache = wps_cache::connect(&config).await;
    println!("backend in use: {}", cache.backend_kind());

    cache.set("greeting", "example", "hello", true, 60).await;
    let greeting: Option<String> = cache.get_opt("greeting", "example").await;
    println!("greeting = {greeting:?}");

    println!("group populated: {}", cache.has_group("example").await);
    println!("flushed {} entries", cache.flush_group("example").await);

    let stats = cache.stats().await;
    println!("server hits={} misses={}", stats.hits, stats.misses);

    cache.close().await;
}
