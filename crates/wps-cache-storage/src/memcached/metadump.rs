//! Key enumeration through `lru_crawler metadump`
//!
//! Memcached has no secondary index, so group operations list every key on
//! the server and filter by prefix. Needs memcached 1.4.31 or newer.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

use wps_cache_core::{CacheError, CacheKey, Result};

const METADUMP_COMMAND: &[u8] = b"lru_crawler metadump all\r\n";

/// Pull the decoded `key=` field out of one metadump line
///
/// Lines look like `key=users%231 exp=-1 la=1700000000 cas=7 fetch=no cls=1 size=70`,
/// with the key URI-encoded.
pub(super) fn parse_line(line: &str) -> Option<String> {
    let fields = line.trim().replace(' ', "&");
    url::form_urlencoded::parse(fields.as_bytes())
        .find(|(name, _)| name == "key")
        .map(|(_, value)| value.into_owned())
}

/// Flat keys on the server at `addr` that belong to `group`
pub(super) async fn list_group_keys(
    addr: &str,
    group: &str,
    key_prefix: Option<&str>,
    limit: Duration,
) -> Result<Vec<String>> {
    let prefix = CacheKey::group_prefix(group, key_prefix);
    let keys = list_keys(addr, limit).await?;
    Ok(keys.into_iter().filter(|k| k.starts_with(&prefix)).collect())
}

/// List every key stored on the server at `addr`
pub(super) async fn list_keys(addr: &str, limit: Duration) -> Result<Vec<String>> {
    let stream = timeout(limit, TcpStream::connect(addr))
        .await
        .map_err(|_| CacheError::Timeout)?
        .map_err(|e| CacheError::Connection(e.to_string()))?;
    let (read, mut write) = stream.into_split();

    write
        .write_all(METADUMP_COMMAND)
        .await
        .map_err(|e| CacheError::Connection(e.to_string()))?;

    let mut lines = BufReader::new(read).lines();
    let mut keys = Vec::new();
    loop {
        let line = timeout(limit, lines.next_line())
            .await
            .map_err(|_| CacheError::Timeout)?
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        let Some(line) = line else {
            return Err(CacheError::Backend("metadump ended without END".into()));
        };
        let line = line.trim_end();
        if line == "END" {
            break;
        }
        if line.starts_with("ERROR")
            || line.starts_with("CLIENT_ERROR")
            || line.starts_with("SERVER_ERROR")
            || line.starts_with("BUSY")
        {
            return Err(CacheError::Backend(format!("metadump rejected: {line}")));
        }
        if let Some(key) = parse_line(line) {
            keys.push(key);
        }
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_decodes_key() {
        let line = "key=wps%3Ausers%231 exp=-1 la=1700000000 cas=7 fetch=no cls=1 size=70";
        assert_eq!(parse_line(line).as_deref(), Some("wps:users#1"));
    }

    #[test]
    fn test_parse_line_plus_is_literal_when_encoded() {
        let line = "key=g%23a%2Bb exp=0 la=1 cas=1 fetch=yes cls=1 size=1";
        assert_eq!(parse_line(line).as_deref(), Some("g#a+b"));
    }

    #[test]
    fn test_parse_line_without_key() {
        assert_eq!(parse_line("exp=-1 la=1"), None);
    }

    #[tokio::test]
    async fn test_list_keys_against_fake_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; METADUMP_COMMAND.len()];
            tokio::io::AsyncReadExt::read_exact(&mut socket, &mut buf).await.unwrap();
            assert_eq!(buf, METADUMP_COMMAND);
            socket
                .write_all(b"key=wps%3Ausers%231 exp=-1 la=1 cas=1 fetch=no cls=1 size=5\r\nkey=wps%3Aposts%232 exp=-1 la=1 cas=2 fetch=no cls=1 size=5\r\nEND\r\n")
                .await
                .unwrap();
        });

        let keys = list_keys(&addr, Duration::from_secs(2)).await.unwrap();
        assert_eq!(keys, vec!["wps:users#1".to_string(), "wps:posts#2".to_string()]);
    }

    #[tokio::test]
    async fn test_group_filter_respects_separator() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        // Flat keys: wps:a#1, wps:a%23b#k (group "a#b"), wps:ab#2, other:a#3
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; METADUMP_COMMAND.len()];
            tokio::io::AsyncReadExt::read_exact(&mut socket, &mut buf).await.unwrap();
            socket
                .write_all(
                    b"key=wps%3Aa%231 exp=-1 la=1 cas=1 fetch=no cls=1 size=5\r\n\
                      key=wps%3Aa%2523b%23k exp=-1 la=1 cas=2 fetch=no cls=1 size=5\r\n\
                      key=wps%3Aab%232 exp=-1 la=1 cas=3 fetch=no cls=1 size=5\r\n\
                      key=other%3Aa%233 exp=-1 la=1 cas=4 fetch=no cls=1 size=5\r\n\
                      END\r\n",
                )
                .await
                .unwrap();
        });

        let keys = list_group_keys(&addr, "a", Some("wps"), Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(keys, vec!["wps:a#1".to_string()]);
    }

    #[tokio::test]
    async fn test_group_filter_nested_group() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; METADUMP_COMMAND.len()];
            tokio::io::AsyncReadExt::read_exact(&mut socket, &mut buf).await.unwrap();
            socket
                .write_all(b"key=a%231 exp=-1 la=1 cas=1 fetch=no cls=1 size=5\r\nkey=a%2523b%23k exp=-1 la=1 cas=2 fetch=no cls=1 size=5\r\nEND\r\n")
                .await
                .unwrap();
        });

        let keys = list_group_keys(&addr, "a#b", None, Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(keys, vec!["a%23b#k".to_string()]);
    }

    #[tokio::test]
    async fn test_list_keys_busy_crawler() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"BUSY currently processing crawler request\r\n").await.unwrap();
        });

        let err = list_keys(&addr, Duration::from_secs(2)).await.unwrap_err();
        assert!(matches!(err, CacheError::Backend(_)));
    }
}
