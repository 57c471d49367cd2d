use rand::{seq::SliceRandom, Rng};

use crate::{LyricError, Result};

/// Anything that can be catalogued by a unique string identifier.
pub trait Entry {
    /// Kind name used in diagnostics, e.g. `"effect"`.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Closed, ordered catalogue of uniquely identified entries.
///
/// Identifier uniqueness is checked once at construction; lookups and random
/// picks afterwards are infallible.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: Vec<T>,
}

impl<T: Entry> Registry<T> {
    /// Builds a registry, rejecting duplicate identifiers.
    pub fn new(entries: Vec<T>) -> Result<Self> {
        for (index, entry) in entries.iter().enumerate() {
            if entries[..index].iter().any(|other| other.id() == entry.id()) {
                return Err(LyricError::DuplicateId {
                    kind: T::KIND,
                    id: entry.id().to_string(),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Looks an entry up by identifier.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn all(&self) -> &[T] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Picks an entry uniformly at random using the thread-local RNG.
    pub fn pick_random(&self) -> Option<&T> {
        self.pick_random_with(&mut rand::thread_rng())
    }

    /// Picks an entry uniformly at random using the supplied RNG.
    pub fn pick_random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        self.entries.choose(rng)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[derive(Debug, Clone)]
    struct Item(&'static str);

    impl Entry for Item {
        const KIND: &'static str = "item";

        fn id(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Registry::new(vec![Item("a"), Item("b"), Item("a")]).unwrap_err();
        assert!(format!("{err}").contains("duplicate item id `a`"));
    }

    #[test]
    fn looks_up_by_id() {
        let registry = Registry::new(vec![Item("a"), Item("b")]).unwrap();

        assert_eq!(registry.get("b").map(|item| item.0), Some("b"));
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn random_picks_cover_every_entry() {
        let registry = Registry::new(vec![Item("a"), Item("b"), Item("c"), Item("d")]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let seen: HashSet<&str> = (0..200)
            .filter_map(|_| registry.pick_random_with(&mut rng))
            .map(|item| item.0)
            .collect();

        assert_eq!(seen.len(), registry.len());
    }

    #[test]
    fn empty_registry_has_nothing_to_pick() {
        let registry: Registry<Item> = Registry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.pick_random().is_none());
    }
}
