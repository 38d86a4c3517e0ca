use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_MAX_SEQUENCE_ITEMS: usize = 100;
pub const DEFAULT_FALLBACK_SEQUENCE_ITEMS: usize = 50;
pub const DEFAULT_MAX_STRING_CHARS: usize = 200;
pub const DEFAULT_FALLBACK_ITEM_CHARS: usize = 100;
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Upper bound accepted for `max_depth`; the walk is recursive.
pub const MAX_DEPTH_CEILING: usize = 512;
pub const DEFAULT_MAX_MAPPING_ENTRIES: usize = 100;
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// Keys that carry runtime state (ORM bookkeeping, logger/client/session
/// handles) and never belong in a report.
pub const DEFAULT_UNSAFE_KEYS: &[&str] = &[
    "_sa_instance_state",
    "__dict__",
    "__weakref__",
    "logger",
    "client",
    "session",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SanitizeLimits {
    pub max_sequence_items: usize,
    /// Items kept when a sequence falls back to per-item text.
    pub fallback_sequence_items: usize,
    pub max_string_chars: usize,
    pub fallback_item_chars: usize,
    pub max_depth: usize,
    pub max_mapping_entries: usize,
    /// Total nodes visited in one pass. Shared containers are visited once
    /// per path, so this bounds graphs that fan out without cycling.
    pub max_nodes: usize,
    /// Off by default: raw input strings pass through untruncated, only
    /// derived renderings are capped.
    pub truncate_passthrough_strings: bool,
    pub unsafe_keys: BTreeSet<String>,
}

impl Default for SanitizeLimits {
    fn default() -> Self {
        Self {
            max_sequence_items: DEFAULT_MAX_SEQUENCE_ITEMS,
            fallback_sequence_items: DEFAULT_FALLBACK_SEQUENCE_ITEMS,
            max_string_chars: DEFAULT_MAX_STRING_CHARS,
            fallback_item_chars: DEFAULT_FALLBACK_ITEM_CHARS,
            max_depth: DEFAULT_MAX_DEPTH,
            max_mapping_entries: DEFAULT_MAX_MAPPING_ENTRIES,
            max_nodes: DEFAULT_MAX_NODES,
            truncate_passthrough_strings: false,
            unsafe_keys: DEFAULT_UNSAFE_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl SanitizeLimits {
    pub fn is_unsafe_key(&self, key: &str) -> bool {
        self.unsafe_keys.contains(key)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.max_depth == 0 {
            return Err(CoreError::InvalidInput(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.max_depth > MAX_DEPTH_CEILING {
            return Err(CoreError::InvalidInput(format!(
                "max_depth ({}) cannot exceed {}",
                self.max_depth, MAX_DEPTH_CEILING
            )));
        }
        if self.max_nodes == 0 {
            return Err(CoreError::InvalidInput(
                "max_nodes must be at least 1".to_string(),
            ));
        }
        if self.fallback_sequence_items > self.max_sequence_items {
            return Err(CoreError::InvalidInput(format!(
                "fallback_sequence_items ({}) cannot exceed max_sequence_items ({})",
                self.fallback_sequence_items, self.max_sequence_items
            )));
        }
        if self.fallback_item_chars > self.max_string_chars {
            return Err(CoreError::InvalidInput(format!(
                "fallback_item_chars ({}) cannot exceed max_string_chars ({})",
                self.fallback_item_chars, self.max_string_chars
            )));
        }
        Ok(())
    }
}
