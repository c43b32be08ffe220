use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem::size_of;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::ptr::NonNull;

/// The distance in bytes between consecutive cursor positions. Zero-sized
/// values are given a stride of one so that positions remain distinct.
#[inline]
const fn stride<T>() -> usize {
    match size_of::<T>() {
        0 => 1,
        size => size,
    }
}

/// A position within the buffer of a [`Vector`](crate::Vector).
///
/// A cursor is a plain address: comparison, hashing and arithmetic operate on
/// the position alone, and it never owns or borrows the memory it refers to.
/// Any operation which relocates the vector invalidates every cursor issued
/// for it. An insert which does not relocate invalidates the cursors at or
/// after the insertion point. Erasing invalidates the cursors at or after
/// the first erased value, and shrinking invalidates cursors into the removed
/// tail.
///
/// Vector operations which accept a cursor check that it lies within the live
/// range of that vector, and panic otherwise.
pub struct Cursor<T> {
    ptr: *mut T,
}

impl<T> Cursor<T> {
    #[inline]
    pub(crate) const fn new(ptr: *mut T) -> Self {
        Self { ptr }
    }

    /// The address of this position.
    #[inline]
    pub const fn as_ptr(self) -> *mut T {
        self.ptr
    }

    #[inline]
    pub(crate) fn addr(self) -> usize {
        self.ptr as usize
    }

    /// Move the cursor by `count` positions in either direction.
    #[inline]
    pub fn offset(self, count: isize) -> Self {
        let bytes = count.wrapping_mul(stride::<T>() as isize);
        Self::new(self.ptr.cast::<u8>().wrapping_offset(bytes).cast())
    }

    /// The number of positions from `origin` to this cursor.
    #[inline]
    pub fn distance_from(self, origin: Self) -> isize {
        (self.addr().wrapping_sub(origin.addr()) as isize) / stride::<T>() as isize
    }

    /// Access the value at this position.
    ///
    /// # Safety
    /// The cursor must refer to a live value of a vector which has not been
    /// relocated since the cursor was obtained, and the value must not be
    /// mutated for the lifetime `'a`.
    #[inline]
    pub unsafe fn as_ref<'a>(self) -> &'a T {
        if size_of::<T>() == 0 {
            NonNull::<T>::dangling().as_ref()
        } else {
            &*self.ptr
        }
    }

    /// Access the value `count` positions away from this cursor.
    ///
    /// # Safety
    /// The same requirements as [`as_ref`](Self::as_ref) apply to the
    /// resulting position.
    #[inline]
    pub unsafe fn get<'a>(self, count: isize) -> &'a T {
        self.offset(count).as_ref()
    }

    /// Mutably access the value at this position.
    ///
    /// # Safety
    /// The same requirements as [`as_ref`](Self::as_ref) apply, and no other
    /// reference to the value may exist for the lifetime `'a`.
    #[inline]
    pub unsafe fn as_mut<'a>(self) -> &'a mut T {
        if size_of::<T>() == 0 {
            NonNull::<T>::dangling().as_mut()
        } else {
            &mut *self.ptr
        }
    }
}

impl<T> Clone for Cursor<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<T> {}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.ptr).finish()
    }
}

impl<T> PartialEq for Cursor<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<T> Eq for Cursor<T> {}

impl<T> PartialOrd for Cursor<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Cursor<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.addr().cmp(&other.addr())
    }
}

impl<T> Hash for Cursor<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state)
    }
}

impl<T> Add<usize> for Cursor<T> {
    type Output = Self;

    #[inline]
    fn add(self, count: usize) -> Self {
        self.offset(count as isize)
    }
}

impl<T> AddAssign<usize> for Cursor<T> {
    #[inline]
    fn add_assign(&mut self, count: usize) {
        *self = *self + count;
    }
}

impl<T> Sub<usize> for Cursor<T> {
    type Output = Self;

    #[inline]
    fn sub(self, count: usize) -> Self {
        self.offset((count as isize).wrapping_neg())
    }
}

impl<T> SubAssign<usize> for Cursor<T> {
    #[inline]
    fn sub_assign(&mut self, count: usize) {
        *self = *self - count;
    }
}

impl<T> Sub for Cursor<T> {
    type Output = isize;

    #[inline]
    fn sub(self, origin: Self) -> isize {
        self.distance_from(origin)
    }
}
