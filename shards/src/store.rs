//! Persisted per-edge caps and their hash-string encoding.
//!
//! FORMAT
//! ======
//! The encoded state is what ends up in a URL fragment:
//!
//! ```text
//! #values=0.2.0.0.3&skills=1.1.1.1.1
//! ```
//!
//! - an optional leading `#`
//! - zero or more entries joined by `&`
//! - each entry is `<page>=<c0>.<c1>.<c2>.<c3>.<c4>`: a page key, then five
//!   unsigned decimal caps in edge order
//!
//! Page keys are 1 to 64 characters of `[A-Za-z0-9_-]`. Encoding writes pages
//! in sorted order, omits pages whose caps are all zero, and never writes the
//! leading `#`. Decoding rejects anything else rather than guessing; a bad
//! fragment means the stored state is corrupt.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::EDGE_COUNT;

const MAX_PAGE_LEN: usize = 64;

/// One cap per outline edge, in edge order.
pub type Caps = [u32; EDGE_COUNT];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("invalid page key: {0:?}")]
    InvalidPage(String),
    #[error("malformed state entry: {0:?}")]
    MalformedEntry(String),
    #[error("page {page:?} has {found} caps, expected {EDGE_COUNT}")]
    WrongCapCount { page: String, found: usize },
    #[error("invalid cap {value:?} for page {page:?}")]
    InvalidCap { page: String, value: String },
    #[error("page {0:?} appears more than once")]
    DuplicatePage(String),
}

/// Validated key naming one pentagon within the shared store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageKey(String);

impl PageKey {
    /// Validate and wrap a page key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPage`] if the key is empty, longer than
    /// 64 bytes, or contains anything but ASCII alphanumerics, `_` and `-`.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_PAGE_LEN
            && raw.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if valid { Ok(Self(raw.to_owned())) } else { Err(StoreError::InvalidPage(raw.to_owned())) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PageKey {
    type Error = StoreError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<PageKey> for String {
    fn from(key: PageKey) -> Self {
        key.0
    }
}

/// Read/write access to locked levels, keyed by page.
pub trait CapStore {
    /// Cap for `edge` on `page`; 0 when nothing is locked.
    fn get(&self, page: &PageKey, edge: usize) -> u32;

    /// Persist `cap` for `edge` on `page`.
    fn set(&mut self, page: &PageKey, edge: usize, cap: u32);

    /// Every edge's cap as `(edge, cap)` pairs in edge order.
    fn locked_shards(&self, page: &PageKey) -> Vec<(usize, u32)> {
        (0..EDGE_COUNT).map(|edge| (edge, self.get(page, edge))).collect()
    }
}

/// In-memory store backing the hash-string state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    pages: BTreeMap<PageKey, Caps>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All caps for `page`, zeros when the page is unknown.
    #[must_use]
    pub fn caps(&self, page: &PageKey) -> Caps {
        self.pages.get(page).copied().unwrap_or_default()
    }

    /// Pages with at least one non-zero cap, in sorted order.
    pub fn pages(&self) -> impl Iterator<Item = &PageKey> {
        self.pages.keys()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Serialize to the hash-string format (without the leading `#`).
    #[must_use]
    pub fn encode(&self) -> String {
        self.pages
            .iter()
            .map(|(page, caps)| {
                let caps: Vec<String> = caps.iter().map(u32::to_string).collect();
                format!("{page}={}", caps.join("."))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parse a hash string, with or without the leading `#`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] describing the first malformed entry.
    pub fn decode(raw: &str) -> Result<Self, StoreError> {
        let body = raw.strip_prefix('#').unwrap_or(raw);
        let mut pages = BTreeMap::new();
        if body.is_empty() {
            return Ok(Self { pages });
        }

        for entry in body.split('&') {
            let (page, caps) = decode_entry(entry)?;
            if pages.insert(page.clone(), caps).is_some() {
                return Err(StoreError::DuplicatePage(page.0));
            }
        }
        pages.retain(|_, caps| caps.iter().any(|&c| c != 0));
        Ok(Self { pages })
    }
}

fn decode_entry(entry: &str) -> Result<(PageKey, Caps), StoreError> {
    let Some((page, caps)) = entry.split_once('=') else {
        return Err(StoreError::MalformedEntry(entry.to_owned()));
    };
    let page = PageKey::parse(page)?;

    let values: Vec<&str> = caps.split('.').collect();
    if values.len() != EDGE_COUNT {
        return Err(StoreError::WrongCapCount { page: page.0, found: values.len() });
    }

    let mut out = Caps::default();
    for (slot, value) in out.iter_mut().zip(values) {
        let digits = !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());
        *slot = match value.parse::<u32>() {
            Ok(cap) if digits => cap,
            _ => return Err(StoreError::InvalidCap { page: page.0.clone(), value: value.to_owned() }),
        };
    }
    Ok((page, out))
}

impl CapStore for MemoryStore {
    fn get(&self, page: &PageKey, edge: usize) -> u32 {
        self.pages.get(page).and_then(|caps| caps.get(edge)).copied().unwrap_or(0)
    }

    fn set(&mut self, page: &PageKey, edge: usize, cap: u32) {
        if edge >= EDGE_COUNT {
            tracing::warn!(%page, edge, cap, "ignoring cap for unknown edge");
            return;
        }
        let caps = self.pages.entry(page.clone()).or_default();
        caps[edge] = cap;
        if caps.iter().all(|&c| c == 0) {
            self.pages.remove(page);
        }
    }
}

impl FromStr for MemoryStore {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Display for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
