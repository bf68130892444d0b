//! # Frame Cache
//!
//! Latest value of every tag seen on the line, plus the bookkeeping needed to
//! detect frame boundaries: frame counter, short frame flag and the tags seen
//! since the last regular frame end.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Last value received for a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedValue {
    pub value: String,
    pub timestamp: Option<String>,
}

/// What a frame end marker closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEnd {
    /// A regular frame. Holds the tags evicted because they were absent from it.
    Regular { evicted: Vec<String> },
    /// A short frame burst; nothing advanced.
    Short,
}

#[derive(Debug)]
pub struct FrameCache {
    values: HashMap<String, CachedValue>,
    tags_seen: HashSet<String>,
    frames_read: i64,
    within_short_frame: bool,
}

impl Default for FrameCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCache {
    /// The first frame is assumed incomplete, hence a counter starting at -1.
    pub fn new() -> Self {
        FrameCache {
            values: HashMap::new(),
            tags_seen: HashSet::new(),
            frames_read: -1,
            within_short_frame: false,
        }
    }

    /// Replaces the entry of `tag` and marks it as seen in the current frame.
    pub fn upsert(&mut self, tag: &str, value: String, timestamp: Option<String>) {
        self.values
            .insert(tag.to_string(), CachedValue { value, timestamp });
        if !self.tags_seen.contains(tag) {
            self.tags_seen.insert(tag.to_string());
        }
    }

    pub fn get(&self, tag: &str) -> Option<&CachedValue> {
        self.values.get(tag)
    }

    pub fn enter_short_frame(&mut self) {
        self.within_short_frame = true;
    }

    pub fn within_short_frame(&self) -> bool {
        self.within_short_frame
    }

    /// Handles a frame end marker.
    ///
    /// Inside a short frame only the flag is cleared. Otherwise the counter
    /// advances and every tag not seen since the previous regular frame end is
    /// evicted.
    pub fn end_frame(&mut self) -> FrameEnd {
        if self.within_short_frame {
            self.within_short_frame = false;
            return FrameEnd::Short;
        }

        self.frames_read += 1;
        let tags_seen = std::mem::take(&mut self.tags_seen);
        let mut evicted: Vec<String> = self
            .values
            .keys()
            .filter(|tag| !tags_seen.contains(*tag))
            .cloned()
            .collect();
        evicted.sort();
        for tag in &evicted {
            self.values.remove(tag);
        }
        FrameEnd::Regular { evicted }
    }

    pub fn frames_read(&self) -> i64 {
        self.frames_read
    }

    /// At least one complete frame was read since the counter started.
    pub fn has_read_full_frame(&self) -> bool {
        self.frames_read >= 1
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy of every entry, ordered by tag.
    pub fn entries(&self) -> BTreeMap<String, CachedValue> {
        self.values
            .iter()
            .map(|(tag, value)| (tag.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces() {
        let mut cache = FrameCache::new();
        cache.upsert("PAPP", "00390".into(), None);
        cache.upsert("PAPP", "00400".into(), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("PAPP").unwrap().value, "00400");
    }

    #[test]
    fn test_eviction_of_unseen_tags() {
        let mut cache = FrameCache::new();
        cache.upsert("PAPP", "00390".into(), None);
        cache.upsert("ADPS", "035".into(), None);
        assert_eq!(cache.end_frame(), FrameEnd::Regular { evicted: vec![] });
        assert_eq!(cache.frames_read(), 0);

        cache.upsert("PAPP", "00400".into(), None);
        assert_eq!(
            cache.end_frame(),
            FrameEnd::Regular {
                evicted: vec!["ADPS".to_string()]
            }
        );
        assert_eq!(cache.frames_read(), 1);
        assert!(cache.has_read_full_frame());
        assert!(cache.get("ADPS").is_none());
        assert!(cache.get("PAPP").is_some());
    }

    #[test]
    fn test_short_frame_does_not_advance() {
        let mut cache = FrameCache::new();
        cache.upsert("IINST1", "012".into(), None);
        cache.enter_short_frame();
        assert_eq!(cache.end_frame(), FrameEnd::Short);
        assert!(!cache.within_short_frame());
        assert_eq!(cache.frames_read(), -1);
        assert_eq!(cache.len(), 1);
    }
}
