use arrayvec::ArrayVec;
use super::Storage;

/// The capacity is part of the type, so a tree over an `ArrayVec` never allocates and reports a full arena through `try_push` instead.
unsafe impl<T, const CAP: usize> Storage for ArrayVec<T, CAP> {
    type Element = T;

    /// # Panics
    /// Panics if `capacity` is anything other than `CAP`.
    #[inline]
    #[track_caller]
    fn with_capacity(capacity: usize) -> Self {
        assert_eq!(
            capacity, CAP,
            "requested capacity does not match the capacity of the array ({})",
            CAP,
        );
        Self::new()
    }
    #[inline]
    fn try_push(&mut self, element: Self::Element) -> Result<(), Self::Element> {
        ArrayVec::try_push(self, element).map_err(|overflow| overflow.element())
    }
    #[inline(always)]
    fn len(&self) -> usize {
        ArrayVec::len(self)
    }
    #[inline(always)]
    unsafe fn get_unchecked(&self, index: usize) -> &Self::Element {
        self.as_slice().get_unchecked(index)
    }
    #[inline(always)]
    unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut Self::Element {
        self.as_mut_slice().get_unchecked_mut(index)
    }

    #[inline(always)]
    fn get(&self, index: usize) -> Option<&Self::Element> {
        self.as_slice().get(index)
    }
    #[inline(always)]
    fn get_mut(&mut self, index: usize) -> Option<&mut Self::Element> {
        self.as_mut_slice().get_mut(index)
    }
    #[inline(always)]
    fn new() -> Self {
        ArrayVec::new()
    }
    #[inline(always)]
    fn capacity(&self) -> usize {
        CAP
    }
    #[inline]
    #[track_caller]
    fn reserve(&mut self, additional: usize) {
        let required = self.len().saturating_add(additional);
        assert!(
            required <= CAP,
            "an ArrayVec cannot grow past {} elements, but {} were requested; use a SmallVec or a Vec for a growable arena",
            CAP,
            required,
        );
    }
}
