//! # Entity Arena
//!
//! Append-only storage for entities that other entities refer to.
//!
//! Handles are plain indices tagged with the element type, so an NPC handle
//! can never be used to index the resource list. Because elements are never
//! removed, a handle stays valid for the lifetime of the arena even when the
//! backing vector reallocates.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Typed handle to an element stored in an [`Arena`].
pub struct Handle<T> {
    /// Index into the arena.
    index: u32,
    /// Marker for T.
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Creates a handle from a raw index.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self {
            index,
            _phantom: PhantomData,
        }
    }

    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

// Manual impls: derives would wrongly require `T: Clone` etc.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// Append-only arena with stable typed handles.
///
/// # Example
///
/// ```rust,ignore
/// let mut arena: Arena<u32> = Arena::new();
/// let h = arena.insert(42);
/// assert_eq!(arena.get(h), Some(&42));
/// ```
#[derive(Clone, Debug)]
pub struct Arena<T> {
    /// The storage array.
    items: Vec<T>,
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty arena with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of stored elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stores an element and returns its handle.
    ///
    /// Existing handles are unaffected. Handles are `u32` indices, so an
    /// arena holds at most `u32::MAX` elements; debug builds check this.
    pub fn insert(&mut self, value: T) -> Handle<T> {
        debug_assert!(
            self.items.len() < u32::MAX as usize,
            "Arena cannot hold more than u32::MAX elements"
        );
        let index = self.items.len() as u32;
        self.items.push(value);
        Handle::from_index(index)
    }

    /// Gets a reference to an element.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.items.get(handle.index())
    }

    /// Gets a mutable reference to an element.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.items.get_mut(handle.index())
    }

    /// Iterates over all elements with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, v)| (Handle::from_index(i as u32), v))
    }

    /// Iterates mutably over all elements with their handles.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> {
        self.items
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (Handle::from_index(i as u32), v))
    }

    /// Returns the elements as a slice, in insertion order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for Arena<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get() {
        let mut arena: Arena<u32> = Arena::new();

        let h1 = arena.insert(42);
        let h2 = arena.insert(7);
        assert_eq!(arena.get(h1), Some(&42));
        assert_eq!(arena.get(h2), Some(&7));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_handles_survive_reallocation() {
        let mut arena: Arena<String> = Arena::with_capacity(1);
        let first = arena.insert("first".to_string());

        for i in 0..1000 {
            arena.insert(i.to_string());
        }

        assert_eq!(arena.get(first).map(String::as_str), Some("first"));
    }

    #[test]
    fn test_unknown_handle_is_absent() {
        let arena: Arena<u8> = Arena::new();
        assert!(arena.get(Handle::from_index(3)).is_none());
    }

    #[test]
    fn test_iteration_order() {
        let mut arena = Arena::new();
        arena.extend([1, 2, 3]);

        let collected: Vec<_> = arena.iter().map(|(h, v)| (h.index(), *v)).collect();
        assert_eq!(collected, vec![(0, 1), (1, 2), (2, 3)]);
    }
}
