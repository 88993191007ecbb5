//! Property-based tests using proptest
//!
//! Random sequences of keys and operations are checked against a plain
//! sorted `Vec` model.

use ordered_kv_heap::{Enumerable, HeapOrder, KeyValueHeap};
use proptest::prelude::*;

fn order_strategy() -> impl Strategy<Value = HeapOrder> {
    prop_oneof![Just(HeapOrder::Min), Just(HeapOrder::Max)]
}

fn sorted_for(order: HeapOrder, mut keys: Vec<i16>) -> Vec<i16> {
    keys.sort();
    if order == HeapOrder::Max {
        keys.reverse();
    }
    keys
}

fn build(order: HeapOrder, keys: &[i16]) -> KeyValueHeap<i16, usize> {
    KeyValueHeap::from_entries(order, keys.iter().copied().zip(0..)).unwrap()
}

proptest! {
    #[test]
    fn extraction_yields_sorted_keys(order in order_strategy(), keys in prop::collection::vec(any::<i16>(), 0..200)) {
        let mut heap = build(order, &keys);
        let mut extracted = Vec::with_capacity(keys.len());
        while let Ok((key, _)) = heap.extract() {
            extracted.push(key);
        }
        prop_assert_eq!(extracted, sorted_for(order, keys));
    }

    #[test]
    fn heap_property_holds_after_mixed_operations(
        order in order_strategy(),
        ops in prop::collection::vec((any::<bool>(), -20i16..20), 0..300),
    ) {
        let mut heap: KeyValueHeap<i16, ()> = KeyValueHeap::new(order);
        let mut model: Vec<i16> = Vec::new();

        for (should_pop, key) in ops {
            if should_pop {
                let popped = heap.pop().map(|(key, _)| key);
                let expected = match order {
                    HeapOrder::Min => model.iter().copied().min(),
                    HeapOrder::Max => model.iter().copied().max(),
                };
                prop_assert_eq!(popped, expected);
                if let Some(key) = popped {
                    let pos = model.iter().position(|&k| k == key).unwrap();
                    model.swap_remove(pos);
                }
            } else {
                heap.push(key, ()).unwrap();
                model.push(key);
            }
            prop_assert!(heap.check_integrity());
            prop_assert_eq!(heap.len(), model.len());
            prop_assert!(heap.len() <= heap.capacity());
        }
    }

    #[test]
    fn reorder_preserves_entries(order in order_strategy(), keys in prop::collection::vec(-10i16..10, 0..100)) {
        let mut heap = build(order, &keys);
        let mut before = heap.clone().into_vec();
        before.sort();

        heap.update_order(order.reversed(), false);
        prop_assert!(heap.check_integrity());

        let extracted = heap.into_sorted_vec();
        let extracted_keys: Vec<_> = extracted.iter().map(|&(key, _)| key).collect();
        prop_assert_eq!(extracted_keys, sorted_for(order.reversed(), keys));

        let mut after = extracted;
        after.sort();
        prop_assert_eq!(after, before);
    }

    #[test]
    fn find_by_key_matches_linear_scan(
        order in order_strategy(),
        keys in prop::collection::vec(-8i16..8, 0..120),
        probe in -10i16..10,
    ) {
        let heap = build(order, &keys);

        let mut found: Vec<usize> = heap.find_by_key(&probe).unwrap().into_iter().map(|(_, v)| *v).collect();
        found.sort();
        let mut scanned: Vec<usize> = heap.iter().filter(|(k, _)| **k == probe).map(|(_, v)| *v).collect();
        scanned.sort();

        prop_assert_eq!(found, scanned);
    }

    #[test]
    fn enumeration_matches_storage_order(order in order_strategy(), keys in prop::collection::vec(any::<i16>(), 0..100)) {
        let heap = build(order, &keys);
        let mut session = heap.enumerator();
        let enumerated = session.collect_remaining(&heap).unwrap();

        prop_assert_eq!(enumerated.len(), heap.len());
        prop_assert!(enumerated.into_iter().eq(heap.iter()));
    }
}
