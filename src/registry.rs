use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

/// Name → raw response text, shared by every parser working on one catalog.
///
/// Inserts are last-write-wins. Replacing an entry with different text is
/// reported as a collision; re-registering identical text is not.
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: Mutex<BTreeMap<String, String>>,
    collisions: AtomicUsize,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `text` under `name`, returning whatever was there before.
    pub fn register(&self, name: &str, text: &str) -> Option<String> {
        let previous = self.lock().insert(name.to_string(), text.to_string());

        match &previous {
            Some(old) if old != text => {
                self.collisions.fetch_add(1, Ordering::Relaxed);
                warn!("Response shape {} overwritten by a different body", name);
            }
            Some(_) => debug!("Response shape {} registered again (same body)", name),
            None => debug!("Registered response shape {}", name),
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn collisions(&self) -> usize {
        self.collisions.load(Ordering::Relaxed)
    }

    /// Freeze into a plain map, sorted by name.
    pub fn into_shapes(self) -> BTreeMap<String, String> {
        self.shapes.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    // Poison is ignored: every critical section is a single map call.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.shapes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn last_write_wins() {
        let registry = ShapeRegistry::new();
        assert_eq!(registry.register("GetFiles", "{ \"a\": 1 }"), None);
        assert_eq!(
            registry.register("GetFiles", "{ \"b\": 2 }").as_deref(),
            Some("{ \"a\": 1 }")
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("GetFiles").as_deref(), Some("{ \"b\": 2 }"));
        assert_eq!(registry.collisions(), 1);
    }

    #[test]
    fn identical_body_is_not_a_collision() {
        let registry = ShapeRegistry::new();
        registry.register("GetMe", "{}");
        registry.register("GetMe", "{}");
        assert_eq!(registry.collisions(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_inserts_are_not_lost() {
        let registry = ShapeRegistry::new();
        (0..500).into_par_iter().for_each(|i| {
            registry.register(&format!("Shape{}", i), "{}");
        });
        let shapes = registry.into_shapes();
        assert_eq!(shapes.len(), 500);
        assert!(shapes.contains_key("Shape499"));
    }
}
