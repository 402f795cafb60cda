//! Utilities for treating the backing arena of a tree generically.
//!
//! This module is home for the following items:
//! - [`Storage`], the trait for the append-only list-like arenas that BK-trees keep their nodes in
//! - [`DefaultStorage`], a type definition for the default arena used by trees unless a different one is specified; takes different values depending on feature flags
//!
//! Nodes never leave the arena once added, which means that the index returned by [`try_add`] stays valid for as long as the storage lives. Trees rely on this to link nodes together by index instead of by pointer.
//!
//! [`Storage`]: trait.Storage.html " "
//! [`DefaultStorage`]: type.DefaultStorage.html " "
//! [`try_add`]: trait.Storage.html#method.try_add " "

#[cfg(any(feature = "alloc", feature = "smallvec"))]
mod growable;
mod fixed;


#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Trait for list-like containers which can be the backing arena for trees.
///
/// # Safety
/// There's a number of invariants which have to be followed by the container:
/// - The length of the storage cannot be modified in the container when it's borrowed immutably or not borrowed at all;
/// - `new` and `with_capacity` ***must*** return empty storages, i.e. those which have `len() == 0` and `is_empty() == true`;
/// - it should be impossible for the length of the storage to overflow `usize`;
/// - Calling [`get_unchecked`] or [`get_unchecked_mut`] with `self.len() > index` should *not* cause undefined behavior;
/// - A successful `try_push` must place the element at index `len() - 1` (as measured after the push) and must not move any other element to a different index;
/// - If an element is added at a position, it must be retrieveable in the exact same state as it was inserted until it is modified using a method which explicitly does so.
///
/// Tree structures rely on those invariants for safety.
///
/// [`get_unchecked`]: #tymethod.get_unchecked " "
/// [`get_unchecked_mut`]: #tymethod.get_unchecked_mut " "
pub unsafe trait Storage: Sized {
    /// The type of values in the container.
    type Element;

    /// Creates an empty collection with the specified capacity.
    ///
    /// # Panics
    /// Collections with a fixed capacity should panic if the specified capacity does not match their actual one, and are recommended to override the `new` method to use the correct capacity.
    fn with_capacity(capacity: usize) -> Self;
    /// Appends an element to the back of the collection, giving it back if the collection is full.
    ///
    /// # Errors
    /// Only collections with a fixed capacity are allowed to fail, and only if `len() == capacity()`.
    fn try_push(&mut self, element: Self::Element) -> Result<(), Self::Element>;
    /// Returns the number of elements in the collection, also referred to as its 'length'.
    fn len(&self) -> usize;
    /// Returns a reference to the specified element in the collection, without doing bounds checking.
    ///
    /// # Safety
    /// If the specified index is out of bounds, a dangling reference will be created, causing *immediate undefined behavior*.
    unsafe fn get_unchecked(&self, index: usize) -> &Self::Element;
    /// Returns a *mutable* reference to the specified element in the collection, without doing bounds checking.
    ///
    /// # Safety
    /// If the specified index is out of bounds, a dangling reference will be created, causing *immediate undefined behavior*.
    unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut Self::Element;

    /// Returns a reference to the specified element in the collection, or `None` if the index is out of bounds.
    #[inline]
    fn get(&self, index: usize) -> Option<&Self::Element> {
        if self.contains_key(index) {
            Some(unsafe {
                // SAFETY: we just did a bounds check
                self.get_unchecked(index)
            })
        } else {
            None
        }
    }
    /// Returns a *mutable* reference to the specified element in the collection, or `None` if the index is out of bounds.
    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut Self::Element> {
        if self.contains_key(index) {
            Some(unsafe {
                // SAFETY: we just did a bounds check
                self.get_unchecked_mut(index)
            })
        } else {
            None
        }
    }
    /// Returns `true` if the specified index points to an element of the collection, `false` otherwise.
    ///
    /// If this method returned `true`, calling `get_unchecked`/`get_unchecked_mut` on the same index is guaranteed to be safe.
    #[inline(always)]
    fn contains_key(&self, index: usize) -> bool {
        self.len() > index
    }
    /// Creates a new empty collection. Dynamically-allocated collections created this way do not allocate memory.
    ///
    /// Collections with fixed capacity should override this method to use the correct capacity, as the default implementation calls `Self::with_capacity(0)`.
    #[inline(always)]
    fn new() -> Self {
        Self::with_capacity(0)
    }
    /// Returns `true` if the collection contains no elements, `false` otherwise.
    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Adds an element to the collection, returning the index at which it can be found from now on.
    ///
    /// # Errors
    /// Gives the element back if the collection is full, as described in [`try_push`].
    ///
    /// [`try_push`]: #tymethod.try_push " "
    #[inline]
    fn try_add(&mut self, element: Self::Element) -> Result<usize, Self::Element> {
        self.try_push(element)?;
        Ok(self.len() - 1)
    }
    /// Returns the amount of elements the collection can hold without requiring a memory allocation.
    ///
    /// For collections which have a fixed capacity, this should be equal to the maximum length; the default implementation returns the current length.
    #[inline(always)]
    fn capacity(&self) -> usize {
        self.len()
    }
    /// Reserves capacity for at least additional more elements to be inserted in the given collection. The collection may reserve more space to avoid frequent reallocations. After calling `reserve`, `capacity` will be greater than or equal to `self.len()` + `additional`. Does nothing if capacity is already sufficient.
    ///
    /// For collections which have a fixed capacity, this should first check for the specified amount of elements to reserve for and if it's not zero, either reallocate the collection anew or, if that is not supported, panic. The default implementation does exactly that.
    #[inline(always)]
    fn reserve(&mut self, additional: usize) {
        if self.len() + additional > self.capacity() {
            unimplemented!("this storage type does not support reallocation")
        }
    }
    /// Shrinks the capacity of the collection as much as possible.
    ///
    /// The default implementation does nothing.
    #[inline(always)]
    fn shrink_to_fit(&mut self) {}
}

/// The default storage type used by the trees when a storage type is not provided.
///
/// This is chosen according to the following strategy:
/// - If the `alloc` feature flag is enabled, [`Vec`] is used
/// - Otherwise, an [`ArrayVec`] *with zero-sized backing storage* is used, which means that a fixed-capacity storage has to be named explicitly for the tree to hold anything
///
/// [`Vec`]: https://doc.rust-lang.org/std/vec/struct.Vec.html " "
/// [`ArrayVec`]: https://docs.rs/arrayvec/*/arrayvec/struct.ArrayVec.html " "
pub type DefaultStorage<T> = _DefaultStorage<T>;

#[cfg(feature = "alloc")]
type _DefaultStorage<T> = Vec<T>;

#[cfg(not(feature = "alloc"))]
type _DefaultStorage<T> = arrayvec::ArrayVec<T, 0>;
