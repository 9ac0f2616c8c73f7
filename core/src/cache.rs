//! Memoized parsing.
//!
//! A tree depends only on the source text and the parse options, so once
//! parsed it can be handed out to any number of callers. Entries are never
//! evicted. Failed parses are not remembered.

use alloc::sync::Arc;

use hashbrown::HashMap;
use lazy_static::lazy_static;
use parking_lot::Mutex;
use static_assertions::assert_impl_all;

use crate::syntax::{ParseError, ParseOptions, Tree, parse_with_options};

lazy_static! {
    static ref GLOBAL_CACHE: ParseCache = ParseCache::new();
}

pub struct ParseCache {
    options: ParseOptions,
    trees: Mutex<HashMap<String, Arc<Tree>>>,
}

assert_impl_all!(ParseCache: Send, Sync);

impl Default for ParseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseCache {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            trees: Mutex::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Returns the tree for `text`, parsing it on first use.
    ///
    /// The lock is held across the parse, so concurrent first requests for
    /// the same text parse it exactly once and all observe the same tree.
    pub fn get_or_parse(&self, text: &str) -> Result<Arc<Tree>, ParseError> {
        let mut trees = self.trees.lock();
        if let Some(tree) = trees.get(text) {
            tracing::trace!(text, "Parse cache hit");
            return Ok(Arc::clone(tree));
        }
        let tree = Arc::new(parse_with_options(text, &self.options)?);
        trees.insert(text.to_string(), Arc::clone(&tree));
        tracing::debug!(text, entries = trees.len(), "Parse cache miss");
        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.trees.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The process-wide cache, using the default parse options.
pub fn global() -> &'static ParseCache {
    &GLOBAL_CACHE
}

/// Parses `text` through the process-wide cache.
pub fn parse_cached(text: &str) -> Result<Arc<Tree>, ParseError> {
    GLOBAL_CACHE.get_or_parse(text)
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_hit_returns_same_tree() {
        crate::test_utils::init_test_logging();
        let cache = ParseCache::new();
        assert!(cache.is_empty());

        let first = cache.get_or_parse("$a > 1").unwrap();
        let second = cache.get_or_parse("$a > 1").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        let other = cache.get_or_parse("$a > 2").unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = ParseCache::new();
        assert!(cache.get_or_parse("$a >").is_err());
        assert!(cache.get_or_parse("$a >").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_options_apply() {
        let cache = ParseCache::with_options(ParseOptions { max_depth: 3 });
        assert!(cache.get_or_parse("((($a)))").is_err());
        assert!(cache.get_or_parse("$a").is_ok());
    }

    #[test]
    fn test_concurrent_first_use() {
        let cache = ParseCache::new();
        let barrier = Barrier::new(8);
        let trees: Vec<Arc<Tree>> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        cache.get_or_parse("$x in (1, 2, 3)").unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.len(), 1);
        for tree in &trees[1..] {
            assert!(Arc::ptr_eq(&trees[0], tree));
        }
    }
}
