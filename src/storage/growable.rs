//! Storages which reallocate instead of running out of space.

#[cfg(feature = "alloc")]
use core::hint;
#[cfg(feature = "alloc")]
use alloc::{collections::VecDeque, vec::Vec};
#[cfg(feature = "smallvec")]
use smallvec::{Array, SmallVec};
use super::Storage;

/// Implements `Storage` for a container which dereferences to a slice and has the usual `Vec`-like inherent methods.
macro_rules! growable_storage {
    ($(#[$attr:meta])* [$($generics:tt)*] $storage:ty => $element:ty) => {
        $(#[$attr])*
        unsafe impl<$($generics)*> Storage for $storage {
            type Element = $element;

            #[inline(always)]
            fn with_capacity(capacity: usize) -> Self {
                <$storage>::with_capacity(capacity)
            }
            #[inline(always)]
            fn try_push(&mut self, element: Self::Element) -> Result<(), Self::Element> {
                self.push(element);
                Ok(())
            }
            #[inline(always)]
            fn len(&self) -> usize {
                <[$element]>::len(self)
            }
            #[inline(always)]
            unsafe fn get_unchecked(&self, index: usize) -> &Self::Element {
                <[$element]>::get_unchecked(self, index)
            }
            #[inline(always)]
            unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut Self::Element {
                <[$element]>::get_unchecked_mut(self, index)
            }

            #[inline(always)]
            fn get(&self, index: usize) -> Option<&Self::Element> {
                <[$element]>::get(self, index)
            }
            #[inline(always)]
            fn get_mut(&mut self, index: usize) -> Option<&mut Self::Element> {
                <[$element]>::get_mut(self, index)
            }
            #[inline(always)]
            fn new() -> Self {
                <$storage>::new()
            }
            #[inline(always)]
            fn capacity(&self) -> usize {
                <$storage>::capacity(self)
            }
            #[inline(always)]
            fn reserve(&mut self, additional: usize) {
                <$storage>::reserve(self, additional)
            }
            #[inline(always)]
            fn shrink_to_fit(&mut self) {
                <$storage>::shrink_to_fit(self)
            }
        }
    };
}

growable_storage!(
    #[cfg(feature = "alloc")]
    [T] Vec<T> => T
);
growable_storage!(
    #[cfg(feature = "smallvec")]
    [A: Array] SmallVec<A> => A::Item
);

/// Nodes are only ever pushed to the back, so a deque behaves exactly like a `Vec` here, just with a different growth pattern.
#[cfg(feature = "alloc")]
unsafe impl<T> Storage for VecDeque<T> {
    type Element = T;

    #[inline(always)]
    fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity(capacity)
    }
    #[inline(always)]
    fn try_push(&mut self, element: Self::Element) -> Result<(), Self::Element> {
        self.push_back(element);
        Ok(())
    }
    #[inline(always)]
    fn len(&self) -> usize {
        Self::len(self)
    }
    #[inline(always)]
    unsafe fn get_unchecked(&self, index: usize) -> &Self::Element {
        // FIXME deques have no unchecked accessors, so this leans on the optimizer to drop the bounds check
        match Self::get(self, index) {
            Some(element) => element,
            None => hint::unreachable_unchecked(),
        }
    }
    #[inline(always)]
    unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut Self::Element {
        match Self::get_mut(self, index) {
            Some(element) => element,
            None => hint::unreachable_unchecked(),
        }
    }

    #[inline(always)]
    fn get(&self, index: usize) -> Option<&Self::Element> {
        Self::get(self, index)
    }
    #[inline(always)]
    fn get_mut(&mut self, index: usize) -> Option<&mut Self::Element> {
        Self::get_mut(self, index)
    }
    #[inline(always)]
    fn new() -> Self {
        Self::new()
    }
    #[inline(always)]
    fn capacity(&self) -> usize {
        Self::capacity(self)
    }
    #[inline(always)]
    fn reserve(&mut self, additional: usize) {
        Self::reserve(self, additional)
    }
    #[inline(always)]
    fn shrink_to_fit(&mut self) {
        Self::shrink_to_fit(self)
    }
}
