use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Number of slots allocated by the first insertion into a heap built
/// without explicit options.
pub const DEFAULT_MIN_CAPACITY: usize = 4;

/// Selects which end of the key order sits at the root of the heap.
///
/// `Min` uses the natural order of the keys as-is, `Max` inverts it. A heap
/// can switch between the two at runtime with
/// [`update_order`](crate::KeyValueHeap::update_order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeapOrder {
    /// The smallest key is extracted first.
    #[default]
    Min,
    /// The greatest key is extracted first.
    Max,
}

impl HeapOrder {
    /// Compares two keys under this order.
    ///
    /// `Less` means `a` is *better* than `b`, i.e. it belongs closer to the
    /// root. Keys that cannot be ordered against each other compare as
    /// `Equal`.
    ///
    /// ```
    /// use core::cmp::Ordering;
    /// use ordered_kv_heap::HeapOrder;
    ///
    /// assert_eq!(HeapOrder::Min.compare(&1, &2), Ordering::Less);
    /// assert_eq!(HeapOrder::Max.compare(&1, &2), Ordering::Greater);
    /// ```
    #[inline]
    pub fn compare<K: PartialOrd + ?Sized>(self, a: &K, b: &K) -> Ordering {
        let natural = a.partial_cmp(b).unwrap_or(Ordering::Equal);
        match self {
            HeapOrder::Min => natural,
            HeapOrder::Max => natural.reverse(),
        }
    }

    /// Returns `true` if `a` belongs strictly closer to the root than `b`.
    #[inline]
    pub fn is_better<K: PartialOrd + ?Sized>(self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// The opposite order.
    #[must_use]
    pub fn reversed(self) -> HeapOrder {
        match self {
            HeapOrder::Min => HeapOrder::Max,
            HeapOrder::Max => HeapOrder::Min,
        }
    }
}

/// Construction-time settings for a [`KeyValueHeap`](crate::KeyValueHeap).
///
/// Missing fields fall back to their defaults when deserialized, so a config
/// file only needs to name what it changes:
///
/// ```
/// use ordered_kv_heap::{HeapOptions, HeapOrder};
///
/// let options: HeapOptions = serde_json::from_str(r#"{ "order": "max" }"#).unwrap();
/// assert_eq!(options.order, HeapOrder::Max);
/// assert_eq!(options.min_capacity, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeapOptions {
    /// Initial order of the heap.
    pub order: HeapOrder,
    /// Slots allocated by the first insertion. Clamped to at least one.
    pub min_capacity: usize,
}

impl Default for HeapOptions {
    fn default() -> Self {
        HeapOptions {
            order: HeapOrder::Min,
            min_capacity: DEFAULT_MIN_CAPACITY,
        }
    }
}

impl HeapOptions {
    /// Default options with the given order.
    #[must_use]
    pub fn with_order(order: HeapOrder) -> Self {
        HeapOptions {
            order,
            ..HeapOptions::default()
        }
    }
}
