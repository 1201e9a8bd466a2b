//! In-memory response cache keyed by a digest of the fully assembled
//! prompt. The cache lives as long as the session that owns it.

use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;

use sha2::{Digest, Sha256};

use super::chat::ChatTurn;
use super::urgency::Urgency;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Digest of (system prompt, history window, question). Every field
/// is length prefixed so content can't slide across a field boundary
/// and collide with a different split of the same bytes.
pub fn fingerprint(system_prompt: &str, history: &[ChatTurn], question: &str) -> Fingerprint {
    let mut hasher = Sha256::new();
    update_field(&mut hasher, system_prompt.as_bytes());
    hasher.update((history.len() as u64).to_le_bytes());
    for turn in history {
        let role = serde_json::to_string(&turn.role).unwrap_or_default();
        update_field(&mut hasher, role.as_bytes());
        update_field(&mut hasher, turn.text.as_bytes());
    }
    update_field(&mut hasher, question.as_bytes());

    let digest = hasher.finalize();
    Fingerprint(
        digest
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>(),
    )
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub text: String,
    pub category: Urgency,
    pub temperature: f64,
}

/// Unbounded by default. With a capacity the least recently used
/// entry is evicted once the cache is full.
#[derive(Debug)]
pub struct ResponseCache {
    entries: LruCache<Fingerprint, CachedResponse>,
    capacity: Option<usize>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    pub fn with_capacity(capacity: Option<usize>) -> Self {
        let entries = match capacity.and_then(NonZeroUsize::new) {
            Some(bound) => LruCache::new(bound),
            // A zero capacity never stores anything so the map stays empty
            None => LruCache::unbounded(),
        };
        Self { entries, capacity }
    }

    /// Marks the entry as most recently used on a hit.
    pub fn lookup(&mut self, key: &Fingerprint) -> Option<CachedResponse> {
        self.entries.get(key).cloned()
    }

    /// Last write wins when the key is already present.
    pub fn store(&mut self, key: Fingerprint, response: CachedResponse) {
        if self.capacity == Some(0) {
            return;
        }
        if let Some((evicted, _)) = self.entries.push(key.clone(), response)
            && evicted != key
        {
            tracing::debug!("Evicting cached response {}", evicted);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::Role;

    fn response(text: &str) -> CachedResponse {
        CachedResponse {
            text: text.to_string(),
            category: Urgency::Casual,
            temperature: 0.9,
        }
    }

    fn key(question: &str) -> Fingerprint {
        fingerprint("system", &[], question)
    }

    #[test]
    fn test_store_then_lookup() {
        let mut cache = ResponseCache::new();
        assert_eq!(cache.lookup(&key("hours?")), None);

        cache.store(key("hours?"), response("9 to 6"));
        assert_eq!(cache.lookup(&key("hours?")), Some(response("9 to 6")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_store_is_idempotent_and_last_write_wins() {
        let mut cache = ResponseCache::new();
        cache.store(key("hours?"), response("9 to 6"));
        cache.store(key("hours?"), response("9 to 6"));
        assert_eq!(cache.len(), 1);

        cache.store(key("hours?"), response("10 to 4"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(&key("hours?")).unwrap().text, "10 to 4");
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let history = vec![ChatTurn::new(Role::User, "hi"), ChatTurn::new(Role::Assistant, "hello")];
        assert_eq!(
            fingerprint("system", &history, "hours?"),
            fingerprint("system", &history, "hours?")
        );
        assert_eq!(fingerprint("system", &history, "hours?").as_str().len(), 64);
    }

    #[test]
    fn test_fingerprint_depends_on_every_field() {
        let history = vec![ChatTurn::new(Role::User, "hi")];
        let base = fingerprint("system", &history, "hours?");
        assert_ne!(base, fingerprint("system", &history, "location?"));
        assert_ne!(base, fingerprint("other system", &history, "hours?"));
        assert_ne!(base, fingerprint("system", &[], "hours?"));
        assert_ne!(
            base,
            fingerprint("system", &[ChatTurn::new(Role::Assistant, "hi")], "hours?")
        );
    }

    #[test]
    fn test_fingerprint_field_boundaries() {
        assert_ne!(fingerprint("ab", &[], "c"), fingerprint("a", &[], "bc"));
        let split = vec![ChatTurn::new(Role::User, "a"), ChatTurn::new(Role::User, "b")];
        let joined = vec![ChatTurn::new(Role::User, "ab")];
        assert_ne!(fingerprint("s", &split, "q"), fingerprint("s", &joined, "q"));
    }

    #[test]
    fn test_fingerprint_ignores_timestamps() {
        let a = vec![ChatTurn::new(Role::User, "hi")];
        let mut b = a.clone();
        b[0].timestamp = b[0].timestamp + chrono::Duration::seconds(30);
        assert_eq!(fingerprint("s", &a, "q"), fingerprint("s", &b, "q"));
    }

    #[test]
    fn test_bounded_cache_evicts_least_recently_used() {
        let mut cache = ResponseCache::with_capacity(Some(2));
        cache.store(key("a"), response("A"));
        cache.store(key("b"), response("B"));
        // Touch "a" so "b" becomes the oldest
        assert!(cache.lookup(&key("a")).is_some());
        cache.store(key("c"), response("C"));

        assert_eq!(cache.len(), 2);
        assert!(cache.lookup(&key("a")).is_some());
        assert!(cache.lookup(&key("b")).is_none());
        assert!(cache.lookup(&key("c")).is_some());
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = ResponseCache::with_capacity(Some(0));
        cache.store(key("a"), response("A"));
        assert!(cache.is_empty());
        assert_eq!(cache.lookup(&key("a")), None);
    }

    #[test]
    fn test_bounded_cache_overwrite_does_not_evict() {
        let mut cache = ResponseCache::with_capacity(Some(2));
        cache.store(key("a"), response("A"));
        cache.store(key("b"), response("B"));
        cache.store(key("a"), response("A2"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup(&key("a")).unwrap().text, "A2");
        assert!(cache.lookup(&key("b")).is_some());
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut cache = ResponseCache::new();
        for i in 0..500 {
            cache.store(key(&i.to_string()), response("x"));
        }
        assert_eq!(cache.len(), 500);
        assert_eq!(cache.capacity(), None);
    }
}
