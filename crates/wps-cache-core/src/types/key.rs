//! Key/group addressing

use std::fmt;

/// Separator between group and key in the composed form
pub const GROUP_SEPARATOR: char = '#';

/// Group used when the caller passes an empty group name
pub const DEFAULT_GROUP: &str = "default";

/// A cache address: `key` inside `group`
///
/// Backends store entries in a flat keyspace under [`CacheKey::compose`],
/// which is always `group#key`. `#` and `%` in the group are percent-encoded,
/// so the first `#` of a composed key always ends the group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    key: String,
    group: String,
}

impl CacheKey {
    /// Address `key` in `group`; an empty group becomes [`DEFAULT_GROUP`]
    pub fn new(key: impl Into<String>, group: impl Into<String>) -> Self {
        let group = group.into();
        Self {
            key: key.into(),
            group: if group.is_empty() {
                DEFAULT_GROUP.to_string()
            } else {
                group
            },
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Group name as it appears in composed keys
    pub fn escaped_group(&self) -> String {
        escape_group(&self.group)
    }

    /// Flat key in `group#key` form
    pub fn compose(&self) -> String {
        format!("{}{}{}", escape_group(&self.group), GROUP_SEPARATOR, self.key)
    }

    /// Flat key under an optional namespace prefix (`prefix:group#key`)
    pub fn compose_with(&self, prefix: Option<&str>) -> String {
        match prefix {
            Some(prefix) => format!("{}:{}", prefix, self.compose()),
            None => self.compose(),
        }
    }

    /// Prefix shared by every composed key of `group`
    pub fn group_prefix(group: &str, prefix: Option<&str>) -> String {
        let group = escape_group(if group.is_empty() { DEFAULT_GROUP } else { group });
        match prefix {
            Some(prefix) => format!("{}:{}{}", prefix, group, GROUP_SEPARATOR),
            None => format!("{}{}", group, GROUP_SEPARATOR),
        }
    }

    /// Split a composed key back into its parts
    ///
    /// The group ends at the first separator; keys may contain `#` themselves.
    pub fn parse(composed: &str, prefix: Option<&str>) -> Option<Self> {
        let rest = match prefix {
            Some(prefix) => composed.strip_prefix(prefix)?.strip_prefix(':')?,
            None => composed,
        };
        let (group, key) = rest.split_once(GROUP_SEPARATOR)?;
        Some(Self::new(key, unescape_group(group)?))
    }
}

fn escape_group(group: &str) -> String {
    group.replace('%', "%25").replace(GROUP_SEPARATOR, "%23")
}

fn unescape_group(escaped: &str) -> Option<String> {
    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped;
    while let Some(at) = rest.find('%') {
        out.push_str(&rest[..at]);
        let code = rest.get(at + 1..at + 3)?;
        out.push(match code {
            "25" => '%',
            "23" => GROUP_SEPARATOR,
            _ => return None,
        });
        rest = &rest[at + 3..];
    }
    out.push_str(rest);
    Some(out)
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compose())
    }
}

impl<K: Into<String>, G: Into<String>> From<(K, G)> for CacheKey {
    fn from((key, group): (K, G)) -> Self {
        Self::new(key, group)
    }
}
