//! Query spec parsing.
//!
//! A raw query string is an optional `/n` prefix followed by
//! whitespace-separated `key=value` tokens. Values may be single-quoted
//! to embed spaces and semicolons. Recognized keys are `size`, `name`,
//! and `member`; unknown keys are recorded as warnings and skipped.

use findtype_catalog::TypeCatalog;

use crate::error::QueryError;
use crate::member::{build_member_list, MemberRequirement};

/// A fully parsed query. Immutable once built; only the requirements'
/// `marked` flags mutate, and only inside the containment matcher.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    /// Walk nested composite fields. `/n` turns this off.
    pub recursive: bool,
    /// Exact byte size filter.
    pub size: Option<usize>,
    /// Name pattern, passed verbatim to the catalog search.
    pub name: Option<String>,
    /// Member containment requirements, in query order.
    pub members: Vec<MemberRequirement>,
    /// Unknown option keys encountered while parsing.
    pub warnings: Vec<String>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            recursive: true,
            size: None,
            name: None,
            members: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Split one `key=value` token off the front of `input`.
///
/// Returns the key, the value, and the unconsumed remainder, or `None`
/// when the front of the input is not a well-formed token. A quoted
/// value runs to the matching quote (or end of string if unterminated);
/// an unquoted value runs to the next whitespace.
pub fn scan_option(input: &str) -> Option<(&str, &str, &str)> {
    let s = input.trim_start();
    let eq = s.find('=')?;
    let key = &s[..eq];
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let after = &s[eq + 1..];
    if let Some(quoted) = after.strip_prefix('\'') {
        match quoted.find('\'') {
            Some(end) => Some((key, &quoted[..end], &quoted[end + 1..])),
            None => Some((key, quoted, "")),
        }
    } else {
        match after.find(char::is_whitespace) {
            Some(end) => Some((key, &after[..end], &after[end..])),
            None => Some((key, after, "")),
        }
    }
}

impl QuerySpec {
    /// Parse a raw query string, resolving member requirements against
    /// `catalog`. No partial spec is returned on error.
    pub fn parse(catalog: &TypeCatalog, raw: &str) -> Result<Self, QueryError> {
        let mut spec = QuerySpec::default();
        let mut rest = raw;

        // "/n" counts only at the very front of the raw string.
        if let Some(stripped) = rest.strip_prefix('/') {
            match stripped.strip_prefix('n') {
                Some(tail) => {
                    spec.recursive = false;
                    rest = tail;
                }
                None => {
                    let token = rest.split_whitespace().next().unwrap_or(rest);
                    return Err(QueryError::BadSlash(token.to_string()));
                }
            }
        }

        let mut cursor = rest;
        loop {
            let trimmed = cursor.trim_start();
            if trimmed.is_empty() {
                break;
            }
            if trimmed.starts_with('/') {
                let token = trimmed.split_whitespace().next().unwrap_or(trimmed);
                return Err(QueryError::BadSlash(token.to_string()));
            }

            let (key, value, remainder) = scan_option(trimmed).ok_or(QueryError::BadOption)?;
            match key {
                "size" => {
                    let size = value
                        .parse::<usize>()
                        .map_err(|_| QueryError::BadSize(value.to_string()))?;
                    spec.size = Some(size);
                }
                "name" => spec.name = Some(value.to_string()),
                // A later member= replaces the whole list.
                "member" => spec.members = build_member_list(catalog, value)?,
                other => {
                    log::warn!("ignoring unknown option '{}'", other);
                    spec.warnings.push(format!("unknown option '{}'", other));
                }
            }
            cursor = remainder;
        }

        Ok(spec)
    }
}
