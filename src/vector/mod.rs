//! The growable contiguous [`Vector`] container.

use core::borrow::{Borrow, BorrowMut};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem::{self, MaybeUninit};
use core::ops::{Deref, DerefMut};
use core::ptr::NonNull;
use core::slice;

use const_default::ConstDefault;

use crate::alloc::{Allocator, AllocatorDefault, Global};
use crate::capability::ArrayAlloc;
use crate::error::{StorageError, UpdateError};
use crate::storage::{utils::grow_capacity, Storage};

pub use self::{cursor::Cursor, into_iter::IntoIter};

mod cursor;
mod into_iter;

#[macro_use]
mod macros;

#[cfg(all(feature = "alloc", feature = "zeroize"))]
/// A `Vector` which zeroizes every buffer it releases.
pub type ZeroizingVector<T> = Vector<T, crate::alloc::ZeroizingAlloc<Global>>;

#[cold]
#[inline(never)]
fn index_panic() -> ! {
    panic!("Invalid element index");
}

/// A contiguous growable sequence of `T`, backed by memory from the
/// allocator `A`.
///
/// The live values always occupy the start of a single allocation owned by the
/// vector. Growth which exceeds the current capacity moves every value into a
/// new allocation of at least `max(needed, 2 * len, 8)` slots, so a series of
/// `N` pushes performs `O(N)` moves in total.
///
/// Fallible operations are provided in `try_` forms returning a
/// [`StorageError`] or [`UpdateError`]. The plain forms panic on failure.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "alloc")] {
/// use vector_alloc::Vector;
///
/// let mut v = Vector::<i32>::new();
/// v.extend([5, 1, 3, 7]);
/// v.insert(v.begin() + 2, 666);
/// assert_eq!(v, [5, 1, 666, 3, 7]);
/// # }
/// ```
pub struct Vector<T, A: Allocator = Global> {
    storage: Storage<T, A>,
}

impl<T, A: AllocatorDefault> Vector<T, A> {
    /// Constructs a new, empty `Vector<T, A>`.
    ///
    /// The vector will not allocate until elements are pushed onto it.
    #[inline]
    pub const fn new() -> Self {
        Self::new_in(A::DEFAULT)
    }

    /// Constructs a new, empty vector with room for exactly `capacity` values.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, A::DEFAULT)
    }

    /// Try to construct a new, empty vector with room for exactly `capacity`
    /// values.
    #[inline]
    pub fn try_with_capacity(capacity: usize) -> Result<Self, StorageError> {
        Self::try_with_capacity_in(capacity, A::DEFAULT)
    }

    /// Constructs a vector holding `count` clones of `value`, in an allocation
    /// of exactly `count` slots.
    #[inline]
    pub fn from_elem(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_elem_in(count, value, A::DEFAULT)
    }

    /// Try to construct a vector holding `count` clones of `value`.
    #[inline]
    pub fn try_from_elem(count: usize, value: T) -> Result<Self, StorageError>
    where
        T: Clone,
    {
        Self::try_from_elem_in(count, value, A::DEFAULT)
    }

    /// Constructs a vector holding clones of the values in `data`.
    #[inline]
    pub fn from_slice(data: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from_slice_in(data, A::DEFAULT)
    }

    /// Try to construct a vector holding clones of the values in `data`.
    #[inline]
    pub fn try_from_slice(data: &[T]) -> Result<Self, StorageError>
    where
        T: Clone,
    {
        Self::try_from_slice_in(data, A::DEFAULT)
    }

    /// Constructs a vector from the values of an array.
    #[inline]
    pub fn from_array<const N: usize>(data: [T; N]) -> Self {
        Self::from_array_in(data, A::DEFAULT)
    }
}

impl<T, A: Allocator> Vector<T, A> {
    /// Constructs a new, empty vector which allocates from `alloc`.
    #[inline]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            storage: Storage::new_in(alloc),
        }
    }

    /// Constructs a new, empty vector in `alloc` with room for exactly
    /// `capacity` values.
    #[inline]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(vec) => vec,
            Err(error) => error.panic(),
        }
    }

    /// Try to construct a new, empty vector in `alloc` with room for exactly
    /// `capacity` values.
    #[inline]
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, StorageError> {
        Ok(Self {
            storage: Storage::with_capacity_in(capacity, alloc)?,
        })
    }

    /// Constructs a vector in `alloc` holding `count` clones of `value`.
    #[inline]
    pub fn from_elem_in(count: usize, value: T, alloc: A) -> Self
    where
        T: Clone,
    {
        match Self::try_from_elem_in(count, value, alloc) {
            Ok(vec) => vec,
            Err(error) => error.panic(),
        }
    }

    /// Try to construct a vector in `alloc` holding `count` clones of `value`.
    ///
    /// If a clone panics, the clones made so far are dropped and the
    /// allocation is released before the panic continues.
    pub fn try_from_elem_in(count: usize, value: T, alloc: A) -> Result<Self, StorageError>
    where
        T: Clone,
    {
        let mut storage = Storage::with_capacity_in(count, alloc)?;
        storage.construct_at_end(count, &value);
        Ok(Self { storage })
    }

    /// Constructs a vector in `alloc` holding clones of the values in `data`.
    #[inline]
    pub fn from_slice_in(data: &[T], alloc: A) -> Self
    where
        T: Clone,
    {
        match Self::try_from_slice_in(data, alloc) {
            Ok(vec) => vec,
            Err(error) => error.panic(),
        }
    }

    /// Try to construct a vector in `alloc` holding clones of the values
    /// in `data`.
    pub fn try_from_slice_in(data: &[T], alloc: A) -> Result<Self, StorageError>
    where
        T: Clone,
    {
        let mut storage = Storage::with_capacity_in(data.len(), alloc)?;
        storage.extend_from_iter(&mut data.iter().cloned());
        Ok(Self { storage })
    }

    /// Constructs a vector in `alloc` from the values of an array.
    pub fn from_array_in<const N: usize>(data: [T; N], alloc: A) -> Self {
        let mut storage = match Storage::with_capacity_in(N, alloc) {
            Ok(storage) => storage,
            Err(error) => error.panic(),
        };
        storage.extend_from_iter(&mut data.into_iter());
        Self { storage }
    }

    /// Constructs a vector in `alloc` from the values of an iterator.
    pub fn from_iter_in<I>(iter: I, alloc: A) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();
        let (min_cap, _) = iter.size_hint();
        let mut vec = Self::with_capacity_in(min_cap, alloc);
        vec.extend(iter);
        vec
    }

    /// Assemble a vector from its raw parts.
    ///
    /// # Safety
    /// `data` and `capacity` must describe an allocation obtained from
    /// `alloc` for exactly `capacity` values of `T`, holding `length` live
    /// values at its start.
    #[inline]
    pub unsafe fn from_raw_parts_in(
        data: NonNull<T>,
        length: usize,
        capacity: usize,
        alloc: A,
    ) -> Self {
        Self {
            storage: Storage::from_raw_parts(data, length, capacity, alloc),
        }
    }

    /// Disassemble the vector into its buffer pointer, length, capacity and
    /// allocator. The caller becomes responsible for the values and the
    /// allocation.
    #[inline]
    pub fn into_raw_parts_with_alloc(self) -> (NonNull<T>, usize, usize, A) {
        self.storage.into_raw_parts()
    }

    /// Access the allocator instance.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.storage.allocator()
    }

    /// The number of values in the vector.
    #[inline]
    pub const fn len(&self) -> usize {
        self.storage.len()
    }

    /// Determine if the vector holds no values.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// The number of values the vector can hold without reallocating.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// A pointer to the start of the buffer.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// A mutable pointer to the start of the buffer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// Extract a slice containing the entire vector.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Extract a mutable slice containing the entire vector.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// The uninitialized slots past the end of the vector.
    #[inline]
    pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
        self.storage.spare_capacity_mut()
    }

    /// Force the length of the vector to `length`.
    ///
    /// # Safety
    /// `length` must not exceed the capacity, and the first `length` slots
    /// must be initialized.
    #[inline]
    pub unsafe fn set_len(&mut self, length: usize) {
        self.storage.set_len(length)
    }

    /// A cursor to the first value.
    #[inline]
    pub fn begin(&self) -> Cursor<T> {
        Cursor::new(self.storage.as_ptr().cast_mut())
    }

    /// A cursor one past the last value.
    #[inline]
    pub fn end(&self) -> Cursor<T> {
        self.begin() + self.len()
    }

    /// A cursor to the value at `index`. An `index` equal to the length
    /// produces the end cursor.
    #[inline]
    pub fn cursor_at(&self, index: usize) -> Cursor<T> {
        if index > self.len() {
            index_panic();
        }
        self.begin() + index
    }

    /// The index of `pos`, or `None` if it is not a position in
    /// `[begin, end]` of this vector.
    pub fn position(&self, pos: Cursor<T>) -> Option<usize> {
        let begin = self.begin();
        let index = pos.distance_from(begin);
        if index < 0 || index as usize > self.len() || begin.offset(index) != pos {
            return None;
        }
        Some(index as usize)
    }

    /// The index of `pos`, which must be a position in `[begin, end]` of
    /// this vector.
    #[inline]
    pub fn index_of(&self, pos: Cursor<T>) -> usize {
        match self.position(pos) {
            Some(index) => index,
            None => index_panic(),
        }
    }

    /// Access the value at `pos`, if it is a live position of this vector.
    #[inline]
    pub fn get_at(&self, pos: Cursor<T>) -> Option<&T> {
        self.position(pos).and_then(|index| self.as_slice().get(index))
    }

    /// Mutably access the value at `pos`, if it is a live position of this
    /// vector.
    #[inline]
    pub fn get_at_mut(&mut self, pos: Cursor<T>) -> Option<&mut T> {
        let index = self.position(pos)?;
        self.as_mut_slice().get_mut(index)
    }

    /// Reserve room for at least `additional` more values, growing by the
    /// amortized rule when a reallocation is needed.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        if let Err(error) = self.try_reserve(additional) {
            error.panic();
        }
    }

    /// Try to reserve room for at least `additional` more values.
    #[inline]
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), StorageError> {
        self._try_reserve(additional, false)
    }

    /// Reserve room for exactly `additional` more values.
    #[inline]
    pub fn reserve_exact(&mut self, additional: usize) {
        if let Err(error) = self.try_reserve_exact(additional) {
            error.panic();
        }
    }

    /// Try to reserve room for exactly `additional` more values.
    #[inline]
    pub fn try_reserve_exact(&mut self, additional: usize) -> Result<(), StorageError> {
        self._try_reserve(additional, true)
    }

    fn _try_reserve(&mut self, additional: usize, exact: bool) -> Result<(), StorageError> {
        let len = self.len();
        let Some(needed) = len.checked_add(additional) else {
            return Err(StorageError::CapacityLimit);
        };
        if needed <= self.capacity() {
            return Ok(());
        }
        let capacity = if exact {
            needed
        } else {
            grow_capacity(len, needed, self.allocator().max_size::<T>())
        };
        self.storage.grow_exact(capacity)
    }

    /// Ensure the total capacity is at least `capacity`, reallocating to
    /// exactly that size if it is not. The capacity is never reduced.
    ///
    /// A reallocation invalidates every cursor and reference into the
    /// vector.
    #[inline]
    pub fn reserve_to(&mut self, capacity: usize) {
        if let Err(error) = self.try_reserve_to(capacity) {
            error.panic();
        }
    }

    /// Try to ensure the total capacity is at least `capacity`. On failure
    /// the vector is unchanged.
    #[inline]
    pub fn try_reserve_to(&mut self, capacity: usize) -> Result<(), StorageError> {
        self.storage.grow_exact(capacity)
    }

    /// Reduce the capacity to `max(min_capacity, len)`.
    #[inline]
    pub fn shrink_to(&mut self, min_capacity: usize) {
        if let Err(error) = self.try_shrink_to(min_capacity) {
            error.panic();
        }
    }

    /// Try to reduce the capacity to `max(min_capacity, len)`.
    #[inline]
    pub fn try_shrink_to(&mut self, min_capacity: usize) -> Result<(), StorageError> {
        self.storage.shrink_to(min_capacity)
    }

    /// Reduce the capacity to the length.
    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.shrink_to(0)
    }

    /// Try to reduce the capacity to the length.
    #[inline]
    pub fn try_shrink_to_fit(&mut self) -> Result<(), StorageError> {
        self.try_shrink_to(0)
    }

    /// Resize the vector to `new_len` values. New slots are filled with
    /// clones of `value`, after reserving exactly `new_len` slots if needed.
    /// When shrinking the trailing values are dropped and the capacity is
    /// unchanged.
    #[inline]
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        if let Err(error) = self.try_resize(new_len, value) {
            error.panic();
        }
    }

    /// Try to resize the vector to `new_len` values.
    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), StorageError>
    where
        T: Clone,
    {
        let len = self.len();
        match new_len.cmp(&len) {
            Ordering::Greater => {
                self.storage.grow_exact(new_len)?;
                self.storage.construct_at_end(new_len - len, &value);
            }
            Ordering::Less => self.truncate(new_len),
            Ordering::Equal => (),
        }
        Ok(())
    }

    /// Resize the vector to `new_len` values, filling new slots with the
    /// results of `f`.
    #[inline]
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        F: FnMut() -> T,
    {
        if let Err(error) = self.try_resize_with(new_len, f) {
            error.panic();
        }
    }

    /// Try to resize the vector to `new_len` values, filling new slots with
    /// the results of `f`.
    pub fn try_resize_with<F>(&mut self, new_len: usize, f: F) -> Result<(), StorageError>
    where
        F: FnMut() -> T,
    {
        let len = self.len();
        match new_len.cmp(&len) {
            Ordering::Greater => {
                self.storage.grow_exact(new_len)?;
                self.storage.extend_with(new_len - len, f);
            }
            Ordering::Less => self.truncate(new_len),
            Ordering::Equal => (),
        }
        Ok(())
    }

    /// Shorten the vector to `length` values, dropping the rest from the
    /// back. Has no effect if the vector is already shorter.
    #[inline]
    pub fn truncate(&mut self, length: usize) {
        self.storage.destruct_at_end(length);
    }

    /// Drop every value. The capacity is unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Append a value to the end of the vector.
    #[inline]
    pub fn push(&mut self, value: T) {
        if let Err(error) = self.try_push(value) {
            error.panic();
        }
    }

    /// Try to append a value to the end of the vector. If more storage could
    /// not be obtained, the value is returned within the error.
    pub fn try_push(&mut self, value: T) -> Result<(), UpdateError<T>> {
        match self.storage.push_within_capacity(value) {
            Ok(()) => Ok(()),
            Err(value) => {
                let len = self.len();
                self.storage
                    .insert_with(len, 1, value, |ins, value| ins.push(value))?;
                Ok(())
            }
        }
    }

    /// Remove and return the last value.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.storage.pop()
    }

    /// Insert `value` before `pos`, returning a cursor to it.
    #[inline]
    pub fn insert(&mut self, pos: Cursor<T>, value: T) -> Cursor<T> {
        match self.try_insert(pos, value) {
            Ok(pos) => pos,
            Err(error) => error.panic(),
        }
    }

    /// Try to insert `value` before `pos`, returning a cursor to it.
    pub fn try_insert(&mut self, pos: Cursor<T>, value: T) -> Result<Cursor<T>, UpdateError<T>> {
        let index = self.index_of(pos);
        self.storage
            .insert_with(index, 1, value, |ins, value| ins.push(value))?;
        Ok(self.begin() + index)
    }

    /// Insert `count` clones of `value` before `pos`, returning a cursor to
    /// the first inserted value. `count` must be positive.
    #[inline]
    pub fn insert_n(&mut self, pos: Cursor<T>, count: usize, value: T) -> Cursor<T>
    where
        T: Clone,
    {
        match self.try_insert_n(pos, count, value) {
            Ok(pos) => pos,
            Err(error) => error.panic(),
        }
    }

    /// Try to insert `count` clones of `value` before `pos`.
    pub fn try_insert_n(
        &mut self,
        pos: Cursor<T>,
        count: usize,
        value: T,
    ) -> Result<Cursor<T>, UpdateError<T>>
    where
        T: Clone,
    {
        assert!(count > 0, "Insert count must be positive");
        let index = self.index_of(pos);
        self.storage.insert_with(index, count, value, |ins, value| {
            ins.push_repeat(&value, count - 1);
            ins.push(value);
        })?;
        Ok(self.begin() + index)
    }

    /// Insert clones of `values` before `pos`, returning a cursor to the
    /// first inserted value.
    #[inline]
    pub fn insert_slice(&mut self, pos: Cursor<T>, values: &[T]) -> Cursor<T>
    where
        T: Clone,
    {
        match self.try_insert_slice(pos, values) {
            Ok(pos) => pos,
            Err(error) => error.panic(),
        }
    }

    /// Try to insert clones of `values` before `pos`.
    pub fn try_insert_slice(
        &mut self,
        pos: Cursor<T>,
        values: &[T],
    ) -> Result<Cursor<T>, StorageError>
    where
        T: Clone,
    {
        let index = self.index_of(pos);
        self.storage
            .insert_with(index, values.len(), values, |ins, values| {
                ins.push_slice(values)
            })
            .map_err(|err| err.error)?;
        Ok(self.begin() + index)
    }

    /// Insert the values produced by `iter` before `pos`, converting each
    /// into `T`, and return a cursor to the first inserted value.
    #[inline]
    pub fn insert_iter<I>(&mut self, pos: Cursor<T>, iter: I) -> Cursor<T>
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        match self.try_insert_iter(pos, iter) {
            Ok(pos) => pos,
            Err(error) => error.panic(),
        }
    }

    /// Try to insert the values produced by `iter` before `pos`.
    ///
    /// Room for the lower bound of the iterator's size hint is opened in a
    /// single step. Any values beyond that bound are appended and then
    /// rotated into place. If the iterator or a conversion panics, or more
    /// storage cannot be obtained, every value inserted by the call is
    /// dropped and the vector is left as it was.
    pub fn try_insert_iter<I>(&mut self, pos: Cursor<T>, iter: I) -> Result<Cursor<T>, StorageError>
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        let index = self.index_of(pos);
        let mut iter = iter.into_iter().map(Into::<T>::into);
        let (lower, _) = iter.size_hint();
        let inserted = self
            .storage
            .insert_with(index, lower, &mut iter, |ins, iter| ins.push_iter(iter))
            .map_err(|err| err.error)?;
        if let Some(item) = iter.next() {
            let len = self.len();
            let mut guard = InsertRollback {
                vec: self,
                index,
                count: inserted,
                len,
            };
            guard.vec.try_push(item).map_err(|err| err.error)?;
            guard.vec.try_extend(&mut iter).map_err(|err| err.error)?;
            let added = guard.vec.len() - len;
            guard.vec.as_mut_slice()[index + inserted..].rotate_right(added);
            guard.complete();
        }
        Ok(self.begin() + index)
    }

    /// Remove and return the value at `index`, shifting the following values
    /// down.
    pub fn remove(&mut self, index: usize) -> T {
        if index >= self.len() {
            index_panic();
        }
        self.storage.remove(index)
    }

    /// Drop the value at `pos`, shifting the following values down. Returns a
    /// cursor to the value which followed it, which is the end cursor when
    /// the last value was erased.
    pub fn erase(&mut self, pos: Cursor<T>) -> Cursor<T> {
        let index = self.index_of(pos);
        if index == self.len() {
            index_panic();
        }
        self.storage.remove_range(index, index + 1);
        self.begin() + index
    }

    /// Drop the values in `[first, last)`, shifting the following values
    /// down, and return a cursor to the value which followed the range.
    pub fn erase_range(&mut self, first: Cursor<T>, last: Cursor<T>) -> Cursor<T> {
        let start = self.index_of(first);
        let end = self.index_of(last);
        if start > end {
            index_panic();
        }
        self.storage.remove_range(start, end);
        self.begin() + start
    }

    /// Replace the contents with `count` clones of `value`.
    pub fn assign(&mut self, count: usize, value: T)
    where
        T: Clone,
    {
        self.clear();
        self.resize(count, value);
    }

    /// Replace the contents with the values produced by `iter`.
    pub fn assign_iter<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.clear();
        self.extend(iter);
    }

    /// Replace the contents with clones of `data`, reusing the current
    /// allocation. Existing values are overwritten with `clone_from`, then
    /// the excess is dropped or the remainder appended.
    pub fn assign_slice(&mut self, data: &[T])
    where
        T: Clone,
    {
        let common = self.len().min(data.len());
        self.as_mut_slice()[..common].clone_from_slice(&data[..common]);
        if data.len() < self.len() {
            self.truncate(data.len());
        } else {
            self.extend_from_slice(&data[common..]);
        }
    }

    /// Replace the contents with clones of the values in `source`.
    ///
    /// When the allocators compare equal, the current allocation is reused.
    /// Otherwise the current allocation is released and the vector adopts a
    /// clone of the source allocator, reserving exactly the source length
    /// before copying.
    pub fn assign_from<A2>(&mut self, source: &Vector<T, A2>)
    where
        T: Clone,
        A: PartialEq<A2>,
        A2: Allocator + Into<A> + Clone,
    {
        if self.allocator() != source.allocator() {
            self.storage = Storage::new_in(source.allocator().clone().into());
            self.reserve_exact(source.len());
        }
        self.assign_slice(source.as_slice());
    }

    /// Move the contents out into a new vector, leaving this one empty with
    /// no allocation.
    #[inline]
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let empty = Self::new_in(self.allocator().clone());
        mem::replace(self, empty)
    }

    /// Replace the contents with those of `other`, taking over its buffer
    /// and allocator. `other` is left empty with no allocation.
    pub fn move_from(&mut self, other: &mut Self) {
        self.clear();
        self.storage.swap(&mut other.storage);
        other.storage.release();
    }

    /// Exchange the contents and allocators of two vectors.
    #[inline]
    pub fn swap_with(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
    }

    /// Append clones of the values in `items`.
    #[inline]
    pub fn extend_from_slice(&mut self, items: &[T])
    where
        T: Clone,
    {
        if let Err(error) = self.try_extend_from_slice(items) {
            error.panic();
        }
    }

    /// Try to append clones of the values in `items`.
    pub fn try_extend_from_slice(&mut self, items: &[T]) -> Result<(), StorageError>
    where
        T: Clone,
    {
        self._try_reserve(items.len(), false)?;
        self.storage.extend_from_iter(&mut items.iter().cloned());
        Ok(())
    }

    fn try_extend(&mut self, iter: &mut impl Iterator<Item = T>) -> Result<(), UpdateError<T>> {
        loop {
            self.storage.extend_from_iter(iter);
            let Some(item) = iter.next() else {
                return Ok(());
            };
            let min_reserve = iter.size_hint().0.saturating_add(1);
            if let Err(error) = self._try_reserve(min_reserve, false) {
                return Err(UpdateError::new(error, item));
            }
            self.try_push(item)?;
        }
    }
}

/// Undoes a range insert which overran its size hint. Values appended past
/// `len` are dropped, then the `count` values placed at `index` are removed.
struct InsertRollback<'a, T, A: Allocator> {
    vec: &'a mut Vector<T, A>,
    index: usize,
    count: usize,
    len: usize,
}

impl<T, A: Allocator> InsertRollback<'_, T, A> {
    #[inline]
    fn complete(self) {
        mem::forget(self);
    }
}

impl<T, A: Allocator> Drop for InsertRollback<'_, T, A> {
    fn drop(&mut self) {
        self.vec.truncate(self.len);
        self.vec
            .storage
            .remove_range(self.index, self.index + self.count);
    }
}

impl<T, A: Allocator> AsRef<[T]> for Vector<T, A> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> AsMut<[T]> for Vector<T, A> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator> Borrow<[T]> for Vector<T, A> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> BorrowMut<[T]> for Vector<T, A> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for Vector<T, A> {
    fn clone(&self) -> Self {
        Self::from_slice_in(self.as_slice(), self.allocator().clone())
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign_slice(source.as_slice());
    }
}

impl<T, A: AllocatorDefault> ConstDefault for Vector<T, A> {
    const DEFAULT: Self = Self::new();
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T, A: AllocatorDefault> Default for Vector<T, A> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> Deref for Vector<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for Vector<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator> Extend<T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut iter = iter.into_iter();
        if let Err(error) = self.try_extend(&mut iter) {
            error.panic();
        }
    }
}

impl<'a, T: Clone + 'a, A: Allocator> Extend<&'a T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned())
    }
}

impl<T, A: AllocatorDefault> FromIterator<T> for Vector<T, A> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_in(iter, A::DEFAULT)
    }
}

impl<T: Hash, A: Allocator> Hash for Vector<T, A> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T, A: Allocator> IntoIterator for Vector<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.storage)
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T: Clone, A: AllocatorDefault> From<&[T]> for Vector<T, A> {
    #[inline]
    fn from(data: &[T]) -> Self {
        Self::from_slice(data)
    }
}

impl<T: Clone, A: AllocatorDefault, const N: usize> From<&[T; N]> for Vector<T, A> {
    #[inline]
    fn from(data: &[T; N]) -> Self {
        Self::from_slice(data)
    }
}

impl<T, A: AllocatorDefault, const N: usize> From<[T; N]> for Vector<T, A> {
    #[inline]
    fn from(data: [T; N]) -> Self {
        Self::from_array(data)
    }
}

#[cfg(feature = "alloc")]
impl<T> From<alloc_crate::vec::Vec<T>> for Vector<T, Global> {
    fn from(vec: alloc_crate::vec::Vec<T>) -> Self {
        let mut vec = mem::ManuallyDrop::new(vec);
        let (length, capacity) = (vec.len(), vec.capacity());
        // SAFETY: the standard vector allocates from the same global heap
        // with the same array layout
        unsafe {
            Self::from_raw_parts_in(
                NonNull::new_unchecked(vec.as_mut_ptr()),
                length,
                capacity,
                Global,
            )
        }
    }
}

#[cfg(feature = "alloc")]
impl<T> From<Vector<T, Global>> for alloc_crate::vec::Vec<T> {
    fn from(vec: Vector<T, Global>) -> Self {
        let (data, length, capacity, _) = vec.into_raw_parts_with_alloc();
        unsafe { alloc_crate::vec::Vec::from_raw_parts(data.as_ptr(), length, capacity) }
    }
}

impl<T, A: Allocator, const N: usize> TryFrom<Vector<T, A>> for [T; N] {
    type Error = Vector<T, A>;

    fn try_from(mut vec: Vector<T, A>) -> Result<Self, Self::Error> {
        if vec.len() != N {
            return Err(vec);
        }
        unsafe {
            vec.set_len(0);
            Ok(vec.as_ptr().cast::<[T; N]>().read())
        }
    }
}

impl<T1, A1, T2, A2> PartialEq<Vector<T2, A2>> for Vector<T1, A1>
where
    A1: Allocator,
    A2: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &Vector<T2, A2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for Vector<T, A> {}

impl<T1, A1, T2> PartialEq<[T2]> for Vector<T1, A1>
where
    A1: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &[T2]) -> bool {
        self.as_slice() == other
    }
}

impl<T1, A1, T2> PartialEq<&[T2]> for Vector<T1, A1>
where
    A1: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &&[T2]) -> bool {
        self.as_slice() == *other
    }
}

impl<T1, A1, T2, const N: usize> PartialEq<[T2; N]> for Vector<T1, A1>
where
    A1: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &[T2; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T1, A1, T2, const N: usize> PartialEq<&[T2; N]> for Vector<T1, A1>
where
    A1: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &&[T2; N]) -> bool {
        self.as_slice() == *other
    }
}

#[cfg(feature = "alloc")]
impl<T1, A1, T2> PartialEq<alloc_crate::vec::Vec<T2>> for Vector<T1, A1>
where
    A1: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &alloc_crate::vec::Vec<T2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

#[cfg(feature = "alloc")]
impl<T1, T2, A2> PartialEq<Vector<T2, A2>> for alloc_crate::vec::Vec<T1>
where
    A2: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &Vector<T2, A2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialOrd, A: Allocator> PartialOrd for Vector<T, A> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: Allocator> Ord for Vector<T, A> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

#[cfg(feature = "std")]
impl<A: Allocator> std::io::Write for Vector<u8, A> {
    #[inline]
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.try_extend_from_slice(buf) {
            Ok(()) => Ok(buf.len()),
            Err(err) => Err(std::io::Error::new(std::io::ErrorKind::OutOfMemory, err)),
        }
    }
}

#[cfg(feature = "zeroize")]
impl<T, A: Allocator> zeroize::Zeroize for Vector<T, crate::alloc::ZeroizingAlloc<A>> {
    #[inline]
    fn zeroize(&mut self) {
        self.storage.release();
    }
}

#[cfg(feature = "zeroize")]
impl<T, A: Allocator> zeroize::ZeroizeOnDrop for Vector<T, crate::alloc::ZeroizingAlloc<A>> {}
