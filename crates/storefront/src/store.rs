//! Cart store: the mutable cart and its persistence.
//!
//! The cart is an ordered list of `{id, qty}` lines, at most one per product
//! id, every qty at least 1. Each mutation writes the whole cart to the
//! key-value store before returning, so an abrupt page close never loses an
//! update that the page already showed.

use cartwheel_core::{CartLine, ProductId};

use crate::storage::{KeyValueStore, StorageError};

/// Storage key of the persisted cart. Bump the suffix when the format changes.
pub const CART_STORAGE_KEY: &str = "cart_v1";

/// The cart for one page session.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    lines: Vec<CartLine>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Build the store from whatever is persisted in `storage`.
    ///
    /// A missing, unreadable or corrupt entry gives an empty cart. Restored
    /// lines are normalised: zero quantities are dropped and repeated ids are
    /// merged into their first occurrence.
    pub fn restore(storage: S) -> Self {
        let lines = match storage.get_item(CART_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => normalize(lines),
                Err(e) => {
                    tracing::debug!(error = %e, "Discarding unreadable persisted cart");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted cart");
                Vec::new()
            }
        };

        tracing::debug!(lines = lines.len(), "Cart restored");
        Self { storage, lines }
    }

    /// Add one unit of `id`, appending a new line if it isn't in the cart.
    pub fn add(&mut self, id: &ProductId) {
        match self.lines.iter_mut().find(|line| &line.id == id) {
            Some(line) => line.qty = line.qty.saturating_add(1),
            None => self.lines.push(CartLine::new(id.clone(), 1)),
        }
        self.persist_or_warn();
    }

    /// Set the quantity of an existing line.
    ///
    /// `qty <= 0` removes the line. Ids not in the cart are ignored.
    pub fn set_quantity(&mut self, id: &ProductId, qty: i64) {
        let Some(index) = self.lines.iter().position(|line| &line.id == id) else {
            return;
        };

        if qty <= 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.qty = u32::try_from(qty).unwrap_or(u32::MAX);
        }
        self.persist_or_warn();
    }

    /// Current quantity of `id` (0 when absent).
    #[must_use]
    pub fn quantity(&self, id: &ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| &line.id == id)
            .map_or(0, |line| line.qty)
    }

    /// Write the full cart to storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be encoded or the backing
    /// store rejects the write. Storage is left untouched on an encoding
    /// failure.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        let value = serde_json::to_string(&self.lines)?;
        self.storage.set_item(CART_STORAGE_KEY, &value)
    }

    /// Read-only view of the cart lines, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The backing store.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn persist_or_warn(&mut self) {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
    }
}

/// Drop zero-qty lines and merge repeated ids, keeping first-seen order.
fn normalize(raw: Vec<CartLine>) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::with_capacity(raw.len());
    for line in raw {
        if line.qty == 0 {
            continue;
        }
        match lines.iter_mut().find(|existing| existing.id == line.id) {
            Some(existing) => existing.qty = existing.qty.saturating_add(line.qty),
            None => lines.push(line),
        }
    }
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};

    fn id(s: &str) -> ProductId {
        ProductId::new(s)
    }

    fn persisted(store: &CartStore<MemoryStorage>) -> Vec<CartLine> {
        let raw = store.storage().get_item(CART_STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// Storage whose writes always fail.
    struct ReadOnlyStorage;

    impl KeyValueStore for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set_item(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_add_counts_calls() {
        let mut store = CartStore::restore(MemoryStorage::new());
        for _ in 0..5 {
            store.add(&id("a"));
        }

        assert_eq!(store.snapshot(), [CartLine::new("a", 5)]);
        assert_eq!(store.quantity(&id("a")), 5);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut store = CartStore::restore(MemoryStorage::new());
        store.add(&id("b"));
        store.add(&id("a"));
        store.add(&id("b"));

        assert_eq!(
            store.snapshot(),
            [CartLine::new("b", 2), CartLine::new("a", 1)]
        );
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let mut store = CartStore::restore(MemoryStorage::new());
        store.add(&id("a"));
        store.add(&id("b"));
        store.add(&id("c"));

        store.set_quantity(&id("a"), 0);
        store.set_quantity(&id("c"), -4);

        assert_eq!(store.snapshot(), [CartLine::new("b", 1)]);
        assert_eq!(persisted(&store), [CartLine::new("b", 1)]);
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut store = CartStore::restore(MemoryStorage::new());
        store.add(&id("a"));

        store.set_quantity(&id("zzz"), 3);

        assert_eq!(store.snapshot(), [CartLine::new("a", 1)]);
        assert_eq!(store.quantity(&id("zzz")), 0);
    }

    #[test]
    fn test_set_quantity_clamps_large_values() {
        let mut store = CartStore::restore(MemoryStorage::new());
        store.add(&id("a"));
        store.set_quantity(&id("a"), i64::MAX);

        assert_eq!(store.quantity(&id("a")), u32::MAX);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let mut store = CartStore::restore(MemoryStorage::new());

        store.add(&id("a"));
        assert_eq!(persisted(&store), [CartLine::new("a", 1)]);

        store.add(&id("a"));
        assert_eq!(persisted(&store), [CartLine::new("a", 2)]);

        store.set_quantity(&id("a"), 7);
        assert_eq!(persisted(&store), [CartLine::new("a", 7)]);
    }

    #[test]
    fn test_persist_then_restore_reproduces_cart() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = CartStore::restore(FileStorage::open(dir.path()).unwrap());
        store.add(&id("x"));
        store.add(&id("y"));
        store.add(&id("x"));
        store.add(&id("z"));
        store.persist().unwrap();
        let before = store.snapshot().to_vec();

        let restored = CartStore::restore(FileStorage::open(dir.path()).unwrap());
        assert_eq!(restored.snapshot(), before.as_slice());
    }

    #[test]
    fn test_restore_corrupt_text_gives_empty_cart() {
        for raw in ["{not json", "{}", "\"cart\"", r#"[{"id":"a","qty":-1}]"#] {
            let store = CartStore::restore(MemoryStorage::with_item(CART_STORAGE_KEY, raw));
            assert!(store.is_empty(), "expected empty cart for {raw}");
        }
    }

    #[test]
    fn test_restore_missing_gives_empty_cart() {
        let store = CartStore::restore(MemoryStorage::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_normalizes_lines() {
        let raw = r#"[{"id":"a","qty":2},{"id":"b","qty":0},{"id":3,"qty":1},{"id":"a","qty":1}]"#;
        let store = CartStore::restore(MemoryStorage::with_item(CART_STORAGE_KEY, raw));

        assert_eq!(
            store.snapshot(),
            [CartLine::new("a", 3), CartLine::new("3", 1)]
        );
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let mut store = CartStore::restore(ReadOnlyStorage);
        store.add(&id("a"));
        store.add(&id("a"));

        assert_eq!(store.snapshot(), [CartLine::new("a", 2)]);
        assert!(store.persist().is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize),
        Set(usize, i64),
    }

    const IDS: [&str; 4] = ["a", "b", "c", "d"];

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..IDS.len()).prop_map(Op::Add),
            (0..IDS.len(), -3_i64..6).prop_map(|(i, qty)| Op::Set(i, qty)),
        ]
    }

    /// Reference cart: a plain list of (id, qty) updated the obvious way.
    fn apply_model(model: &mut Vec<(&'static str, u32)>, op: &Op) {
        match *op {
            Op::Add(i) => {
                let id = IDS[i];
                match model.iter_mut().find(|(line_id, _)| *line_id == id) {
                    Some((_, qty)) => *qty += 1,
                    None => model.push((id, 1)),
                }
            }
            Op::Set(i, qty) => {
                let id = IDS[i];
                let Some(pos) = model.iter().position(|(line_id, _)| *line_id == id) else {
                    return;
                };
                if qty <= 0 {
                    model.remove(pos);
                } else {
                    model[pos].1 = u32::try_from(qty).unwrap();
                }
            }
        }
    }

    proptest! {
        /// Any interleaving of add and set_quantity matches the reference
        /// cart, keeps one line per id with qty >= 1, and restores intact.
        #[test]
        fn prop_mutations_match_model(ops in prop::collection::vec(arb_op(), 0..40)) {
            let mut store = CartStore::restore(MemoryStorage::new());
            let mut model = Vec::new();

            for op in &ops {
                match *op {
                    Op::Add(i) => store.add(&id(IDS[i])),
                    Op::Set(i, qty) => store.set_quantity(&id(IDS[i]), qty),
                }
                apply_model(&mut model, op);
            }

            let expected: Vec<CartLine> =
                model.iter().map(|(line_id, qty)| CartLine::new(*line_id, *qty)).collect();
            prop_assert_eq!(store.snapshot(), expected.as_slice());

            for line in store.snapshot() {
                prop_assert!(line.qty >= 1);
                prop_assert_eq!(
                    store.snapshot().iter().filter(|other| other.id == line.id).count(),
                    1
                );
            }

            let storage = MemoryStorage::with_item(
                CART_STORAGE_KEY,
                &store.storage().get_item(CART_STORAGE_KEY).unwrap().unwrap_or_default(),
            );
            let restored = CartStore::restore(storage);
            prop_assert_eq!(restored.snapshot(), store.snapshot());
        }
    }
}
