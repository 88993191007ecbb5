//! Persisted state of a [`KeyValueHeap`]
//!
//! Only the [`HeapOrder`] is persisted. Entries are not part of the
//! serialized form: a deserialized heap starts out empty, the caller refills
//! it with [`KeyValueHeap::restore_entries`], and the heap property is
//! rebuilt under the persisted order in the same call.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HeapError;
use crate::order::HeapOrder;
use crate::traits::PartialState;
use crate::{is_valid_key, HeapNode, KeyValueHeap};

/// The durable part of a [`KeyValueHeap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeapState {
    pub order: HeapOrder,
}

impl<K: PartialOrd, V> PartialState for KeyValueHeap<K, V> {
    type State = HeapState;

    fn capture_state(&self) -> HeapState {
        HeapState { order: self.order }
    }

    fn from_state(state: HeapState) -> Self {
        KeyValueHeap::new(state.order)
    }

    /// Rebuilds the heap under its current order.
    fn complete_restore(&mut self) {
        self.update_order(self.order, true);
    }
}

impl<K: PartialOrd, V> KeyValueHeap<K, V> {
    /// Loads `entries` into storage as-is and then rebuilds the heap under
    /// the current order.
    ///
    /// This is the second phase of loading a heap whose serialized form
    /// only carried its [`HeapState`].
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InvalidKey`] if any key cannot be ordered against
    /// itself. No entry is loaded in that case.
    ///
    /// ```
    /// use ordered_kv_heap::{HeapOrder, KeyValueHeap};
    ///
    /// let json = serde_json::to_string(&KeyValueHeap::<i32, &str>::new(HeapOrder::Max)).unwrap();
    /// let mut heap: KeyValueHeap<i32, &str> = serde_json::from_str(&json).unwrap();
    /// assert!(heap.is_empty());
    ///
    /// heap.restore_entries([(1, "a"), (9, "i"), (4, "d")]).unwrap();
    /// assert!(heap.check_integrity());
    /// assert_eq!(heap.peek(), Some((&9, &"i")));
    /// ```
    pub fn restore_entries<I>(&mut self, entries: I) -> Result<(), HeapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let nodes: Vec<HeapNode<K, V>> = entries.into_iter().map(HeapNode::from).collect();
        if !nodes.iter().all(|node| is_valid_key(&node.key)) {
            return Err(HeapError::InvalidKey);
        }

        for node in nodes {
            self.reserve_slot();
            self.data.push(node);
        }
        self.complete_restore();
        Ok(())
    }
}

impl<K, V> Serialize for KeyValueHeap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        HeapState { order: self.order }.serialize(serializer)
    }
}

impl<'de, K: PartialOrd, V> Deserialize<'de> for KeyValueHeap<K, V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        HeapState::deserialize(deserializer).map(KeyValueHeap::from_state)
    }
}
