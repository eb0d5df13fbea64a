//! Script cache (SCRIPT LOAD / EVALSHA)

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use shareguard_core::Script;

/// Scripts known to the store, keyed by digest
#[derive(Debug, Default)]
pub struct ScriptCache {
    scripts: RwLock<FxHashMap<String, Script>>,
}

impl ScriptCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache a script and return its digest
    ///
    /// Loading the same source twice is a no-op.
    pub fn load(&self, script: &Script) -> String {
        let digest = script.digest().to_string();
        self.scripts
            .write()
            .entry(digest.clone())
            .or_insert_with(|| script.clone());
        digest
    }

    /// Look up a cached script
    pub fn get(&self, digest: &str) -> Option<Script> {
        self.scripts.read().get(digest).cloned()
    }

    /// True if the digest is cached (SCRIPT EXISTS)
    pub fn contains(&self, digest: &str) -> bool {
        self.scripts.read().contains_key(digest)
    }

    /// Drop every cached script (SCRIPT FLUSH)
    pub fn flush(&self) {
        self.scripts.write().clear();
    }

    /// Number of cached scripts
    pub fn len(&self) -> usize {
        self.scripts.read().len()
    }

    /// True if no script is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(source: &str) -> Script {
        Script::new(source, |_, _, _| Ok(0))
    }

    #[test]
    fn test_load_is_idempotent() {
        let cache = ScriptCache::new();
        let script = noop("return 0");
        let d1 = cache.load(&script);
        let d2 = cache.load(&script);
        assert_eq!(d1, d2);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&d1));
    }

    #[test]
    fn test_flush() {
        let cache = ScriptCache::new();
        let digest = cache.load(&noop("a"));
        cache.load(&noop("b"));
        assert_eq!(cache.len(), 2);
        cache.flush();
        assert!(cache.is_empty());
        assert!(cache.get(&digest).is_none());
    }
}
