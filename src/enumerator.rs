use crate::error::HeapError;
use crate::traits::Enumerable;

/// A change-guarded enumeration session over an [`Enumerable`] container.
///
/// Unlike [`Iter`](crate::Iter), an `Enumerator` holds no borrow of the heap
/// between steps; it only remembers which container it was created for, the
/// generation it was created at and the next storage index. Every call to
/// [`advance`](Enumerator::advance) first checks both against the container
/// it is given. Another container is rejected with
/// [`HeapError::ForeignSource`], and a changed generation with
/// [`HeapError::ConcurrentModification`]. Entries come out in storage order,
/// not sorted order.
///
/// A session cannot be restarted; ask the container for a new one instead.
///
/// # Examples
///
/// ```
/// use ordered_kv_heap::{Enumerable, HeapError, HeapOrder, KeyValueHeap};
///
/// let mut heap = KeyValueHeap::new(HeapOrder::Min);
/// heap.push(3, "c").unwrap();
/// heap.push(1, "a").unwrap();
///
/// let mut session = heap.enumerator();
/// assert_eq!(session.advance(&heap), Ok(Some((&1, &"a"))));
///
/// heap.push(2, "b").unwrap();
/// assert!(matches!(
///     session.advance(&heap),
///     Err(HeapError::ConcurrentModification { .. })
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    instance: u64,
    generation: u64,
    next: usize,
}

impl Enumerator {
    pub(crate) fn new(instance: u64, generation: u64) -> Self {
        Enumerator {
            instance,
            generation,
            next: 0,
        }
    }

    /// Generation of the container this session was started at.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Checks the container is unchanged, then yields its next entry, or
    /// `Ok(None)` once every entry has been produced.
    ///
    /// # Errors
    /// Returns [`HeapError::ForeignSource`] if `source` is not the container
    /// this session was started on, and [`HeapError::ConcurrentModification`]
    /// if it was structurally modified since. The checks run on every call,
    /// including calls made after the end was reached.
    pub fn advance<'h, K, V, C>(&mut self, source: &'h C) -> Result<Option<(&'h K, &'h V)>, HeapError>
    where
        C: Enumerable<K, V> + ?Sized,
    {
        self.check(source.instance(), source.generation())?;
        match source.entry_at(self.next) {
            Some(entry) => {
                self.next += 1;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    /// Drains the rest of the session into a vector.
    ///
    /// # Errors
    /// Same as [`advance`](Enumerator::advance).
    pub fn collect_remaining<'h, K, V, C>(&mut self, source: &'h C) -> Result<Vec<(&'h K, &'h V)>, HeapError>
    where
        C: Enumerable<K, V> + ?Sized,
    {
        let mut out = Vec::new();
        while let Some(entry) = self.advance::<K, V, C>(source)? {
            out.push(entry);
        }
        Ok(out)
    }

    fn check(&self, instance: u64, found: u64) -> Result<(), HeapError> {
        if instance != self.instance {
            tracing::debug!(
                expected = self.instance,
                found = instance,
                "enumeration attempted on another heap"
            );
            return Err(HeapError::ForeignSource {
                expected: self.instance,
                found: instance,
            });
        }
        if found != self.generation {
            tracing::debug!(
                expected = self.generation,
                found,
                position = self.next,
                "enumeration invalidated by mutation"
            );
            return Err(HeapError::ConcurrentModification {
                expected: self.generation,
                found,
            });
        }
        Ok(())
    }
}
