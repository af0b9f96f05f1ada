//! This module defines an owning `Arena` addressed by typed identifiers

use std::{
    fmt::Display,
    hash::Hash,
    marker::PhantomData,
    ops::Index,
    sync::atomic::{self, AtomicU32},
};

/// Arena owning all elements of a single tree.
///
/// Elements are referred to by [`Id<T>`].
/// Removed elements leave an empty slot behind,
/// so identifiers of the remaining elements stay valid.
///
/// Cloning an arena copies all elements.
/// The clone shares the arena tag with the original,
/// hence every [`Id`] valid in the original is valid in the clone,
/// but the two arenas never share any element.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    elements: Vec<Option<T>>,
    id: u32,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            elements: Vec::default(),
            id: Self::new_arena_id(),
        }
    }
}

impl<T> Index<Id<T>> for Arena<T> {
    type Output = T;

    fn index(&self, index: Id<T>) -> &Self::Output {
        if index.arena != self.id {
            panic!("wrong arena")
        }

        match &self.elements[index.offset] {
            Some(element) => element,
            None => panic!("element has been removed"),
        }
    }
}

impl<T> Arena<T> {
    /// Returns the [`Id`] that will be returned by the next call to [`Self::alloc`].
    pub fn next_id(&self) -> Id<T> {
        Id {
            offset: self.elements.len(),
            arena: self.id,
            _phantom: PhantomData,
        }
    }

    /// Allocates an element and returns an [`Id`] pointing to it.
    pub fn alloc(&mut self, element: T) -> Id<T> {
        let result = self.next_id();
        self.elements.push(Some(element));
        result
    }

    /// Return a reference to the element with the given [`Id`].
    ///
    /// Returns `None` if the id belongs to another arena
    /// or if the element has been removed.
    pub fn get(&self, id: Id<T>) -> Option<&T> {
        if id.arena != self.id {
            return None;
        }

        self.elements.get(id.offset)?.as_ref()
    }

    /// Return a mutable reference to the element with the given [`Id`].
    pub fn get_mut(&mut self, id: Id<T>) -> Option<&mut T> {
        if id.arena != self.id {
            return None;
        }

        self.elements.get_mut(id.offset)?.as_mut()
    }

    /// Return whether the arena holds an element with the given [`Id`].
    pub fn contains(&self, id: Id<T>) -> bool {
        self.get(id).is_some()
    }

    /// Remove the element with the given [`Id`] and return it.
    pub fn remove(&mut self, id: Id<T>) -> Option<T> {
        if id.arena != self.id {
            return None;
        }

        self.elements.get_mut(id.offset)?.take()
    }

    /// Return the number of elements currently stored.
    pub fn len(&self) -> usize {
        self.elements.iter().filter(|element| element.is_some()).count()
    }

    /// Return whether the arena holds no element.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return an iterator over all stored elements and their ids.
    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        let arena = self.id;

        self.elements
            .iter()
            .enumerate()
            .filter_map(move |(offset, element)| {
                element.as_ref().map(|element| {
                    (
                        Id {
                            offset,
                            arena,
                            _phantom: PhantomData,
                        },
                        element,
                    )
                })
            })
    }

    /// Construct a new arena identifier.
    ///
    /// Identifiers with the same offset from different arenas compare false for equality.
    fn new_arena_id() -> u32 {
        static ARENA_COUNTER: AtomicU32 = AtomicU32::new(0);
        ARENA_COUNTER.fetch_add(1, atomic::Ordering::SeqCst)
    }
}

#[derive(Debug)]
/// Refers to an element of an [`Arena`].
pub struct Id<T> {
    /// The offset of the element.
    offset: usize,
    /// The id of the arena this element belongs to.
    arena: u32,

    _phantom: PhantomData<fn() -> T>,
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.arena == other.arena
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.offset.hash(state);
        self.arena.hash(state);
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arena
            .cmp(&other.arena)
            .then(self.offset.cmp(&other.offset))
    }
}

impl<T> Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.offset)
    }
}

#[cfg(test)]
mod test {
    use super::Arena;

    #[test]
    fn arena_alloc_and_remove() {
        let mut arena = Arena::<&str>::default();
        let first = arena.alloc("first");
        let second = arena.alloc("second");

        assert_eq!(arena[first], "first");
        assert_eq!(arena.remove(first), Some("first"));
        assert_eq!(arena.get(first), None);
        assert_eq!(arena.get(second), Some(&"second"));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn arena_clone_keeps_ids() {
        let mut arena = Arena::<String>::default();
        let id = arena.alloc("node".to_string());

        let mut clone = arena.clone();
        if let Some(element) = clone.get_mut(id) {
            element.push_str("-changed");
        }

        assert_eq!(arena[id], "node");
        assert_eq!(clone[id], "node-changed");
    }

    #[test]
    fn arena_rejects_foreign_ids() {
        let mut first = Arena::<u32>::default();
        let mut second = Arena::<u32>::default();
        let id = first.alloc(1);
        second.alloc(2);

        assert_eq!(second.get(id), None);
        assert_eq!(second.remove(id), None);
    }

    #[test]
    #[should_panic(expected = "wrong arena")]
    fn arena_index_panics_on_foreign_id() {
        let mut first = Arena::<u32>::default();
        let second = Arena::<u32>::default();
        let id = first.alloc(1);

        let _ = second[id];
    }
}
