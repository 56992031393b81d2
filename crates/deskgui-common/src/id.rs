use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Process-wide unique identifier.
///
/// Drawn from a single atomic counter shared by every bus in the process,
/// so ids are never reused, even across different owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UniqueId(u64);

impl UniqueId {
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn next_is_monotonic() {
        let a = UniqueId::next();
        let b = UniqueId::next();
        assert!(b > a);
    }

    #[test]
    fn next_is_unique_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| (0..1000).map(|_| UniqueId::next()).collect::<Vec<_>>()))
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 8000);
    }

    #[test]
    fn display_format() {
        let id = UniqueId(42);
        assert_eq!(id.to_string(), "#42");
        assert_eq!(id.get(), 42);
    }

    #[test]
    fn serialization() {
        let id = UniqueId::next();
        let json = serde_json::to_string(&id).unwrap();
        let back: UniqueId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
