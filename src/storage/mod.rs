//! Backing storage for contiguous collections.
//!
//! A [`Storage`] owns exactly one allocation and three logical cursors over
//! it: the start of the buffer, the end of the live values, and the end of the
//! allocated capacity. Values in `[start, end)` are live, and slots in
//! `[end, capacity)` are allocated but uninitialized.

use core::fmt;
use core::marker::PhantomData;
use core::mem::{self, ManuallyDrop, MaybeUninit};
use core::ptr::{self, NonNull};
use core::slice;

use const_default::ConstDefault;

use crate::alloc::{Allocator, AllocatorDefault, Global};
use crate::capability::ArrayAlloc;
use crate::error::{StorageError, UpdateError};

pub use self::insert::Inserter;

mod insert;
pub(crate) mod utils;

/// An owned, contiguous allocation of `T` together with its live length.
pub struct Storage<T, A: Allocator = Global> {
    data: NonNull<T>,
    length: usize,
    capacity: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T, A: Allocator> Storage<T, A> {
    /// Create an empty storage instance without allocating.
    #[inline]
    pub const fn new_in(alloc: A) -> Self {
        Self {
            data: NonNull::dangling(),
            length: 0,
            capacity: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Allocate room for exactly `capacity` values. The live range starts empty.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, StorageError> {
        let data = alloc.allocate_array::<T>(capacity)?;
        Ok(Self {
            data,
            length: 0,
            capacity,
            alloc,
            _marker: PhantomData,
        })
    }

    /// Assemble a storage instance from its raw parts.
    ///
    /// # Safety
    /// `data` and `capacity` must describe a block obtained from
    /// `alloc.allocate_array`, holding `length` live values at its start.
    #[inline]
    pub unsafe fn from_raw_parts(data: NonNull<T>, length: usize, capacity: usize, alloc: A) -> Self {
        Self {
            data,
            length,
            capacity,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Disassemble this storage instance, transferring ownership of the
    /// allocation and its live values to the caller.
    #[inline]
    pub fn into_raw_parts(self) -> (NonNull<T>, usize, usize, A) {
        let slf = ManuallyDrop::new(self);
        (slf.data, slf.length, slf.capacity, unsafe {
            ptr::read(&slf.alloc)
        })
    }

    /// Access the allocator instance.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// The number of live values.
    #[inline]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Determine if there are no live values.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The number of values which fit without reallocating.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of uninitialized slots following the live values.
    #[inline]
    pub const fn spare(&self) -> usize {
        self.capacity - self.length
    }

    /// The start cursor of the buffer.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// The mutable start cursor of the buffer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_ptr()
    }

    /// The live values.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.data.as_ptr(), self.length) }
    }

    /// The live values, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.data.as_ptr(), self.length) }
    }

    /// The uninitialized slots following the live values.
    #[inline]
    pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
        unsafe {
            slice::from_raw_parts_mut(
                self.data.as_ptr().add(self.length).cast(),
                self.capacity - self.length,
            )
        }
    }

    /// Set the number of live values.
    ///
    /// # Safety
    /// `length` must not exceed the capacity, and the first `length` slots
    /// must hold live values.
    #[inline]
    pub unsafe fn set_len(&mut self, length: usize) {
        debug_assert!(length <= self.capacity);
        self.length = length;
    }

    /// Append `count` clones of `value`.
    ///
    /// The spare capacity must hold at least `count` values. If a clone panics,
    /// the values appended by this call are destroyed and the length is left
    /// unchanged.
    pub fn construct_at_end(&mut self, count: usize, value: &T)
    where
        T: Clone,
    {
        let mut ins = self.inserter_at_end(count);
        ins.push_repeat(value, count);
        ins.complete();
    }

    /// Append `count` values produced by `f`, with the same guarantee as
    /// [`construct_at_end`](Self::construct_at_end).
    pub fn extend_with<F>(&mut self, count: usize, f: F)
    where
        F: FnMut() -> T,
    {
        let mut ins = self.inserter_at_end(count);
        ins.push_with(count, f);
        ins.complete();
    }

    /// Append values from `iter` until the spare capacity is exhausted or the
    /// iterator ends, returning the number of values appended.
    pub fn extend_from_iter(&mut self, iter: &mut impl Iterator<Item = T>) -> usize {
        let spare = self.spare();
        let mut ins = self.inserter_at_end(spare);
        ins.push_iter(iter);
        ins.complete()
    }

    #[inline]
    fn inserter_at_end(&mut self, count: usize) -> Inserter<'_, T, A> {
        assert!(count <= self.spare(), "Insufficient storage capacity");
        let Self {
            data,
            length,
            alloc,
            ..
        } = self;
        unsafe { Inserter::new(alloc, data.as_ptr().add(*length), count, 0, length) }
    }

    /// Destroy live values from the back until `new_len` remain. Has no effect
    /// if `new_len` is not less than the current length.
    pub fn destruct_at_end(&mut self, new_len: usize) {
        let mut end = self.length;
        if new_len >= end {
            return;
        }
        // Hide the values first so a panicking destructor cannot cause a
        // second drop.
        self.length = new_len;
        while end > new_len {
            end -= 1;
            unsafe {
                self.alloc
                    .destroy(NonNull::new_unchecked(self.data.as_ptr().add(end)))
            };
        }
    }

    /// Append `value` if there is a spare slot, otherwise hand it back.
    #[inline]
    pub fn push_within_capacity(&mut self, value: T) -> Result<(), T> {
        if self.length == self.capacity {
            return Err(value);
        }
        unsafe {
            self.alloc
                .construct(NonNull::new_unchecked(self.data.as_ptr().add(self.length)), value)
        };
        self.length += 1;
        Ok(())
    }

    /// Destroy every live value and release the allocation, leaving the
    /// storage empty with no capacity.
    pub fn release(&mut self) {
        self.destruct_at_end(0);
        unsafe { self.alloc.deallocate_array(self.data, self.capacity) };
        self.data = NonNull::dangling();
        self.capacity = 0;
    }

    /// Remove and return the last live value.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.length == 0 {
            return None;
        }
        self.length -= 1;
        Some(unsafe { self.data.as_ptr().add(self.length).read() })
    }

    /// Grow the allocation to exactly `capacity` slots, keeping the live values
    /// in place. Has no effect if the capacity is already sufficient. On
    /// failure the storage is unchanged.
    pub fn grow_exact(&mut self, capacity: usize) -> Result<(), StorageError> {
        if capacity <= self.capacity {
            return Ok(());
        }
        self.data = if self.capacity == 0 {
            self.alloc.allocate_array(capacity)?
        } else {
            unsafe { self.alloc.grow_array(self.data, self.capacity, capacity) }?
        };
        self.capacity = capacity;
        Ok(())
    }

    /// Reduce the allocation to `max(capacity, len)` slots, releasing it
    /// entirely when that is zero. On failure the storage is unchanged.
    pub fn shrink_to(&mut self, capacity: usize) -> Result<(), StorageError> {
        let capacity = capacity.max(self.length);
        if capacity >= self.capacity {
            return Ok(());
        }
        if capacity == 0 {
            unsafe { self.alloc.deallocate_array(self.data, self.capacity) };
            self.data = NonNull::dangling();
        } else {
            self.data = unsafe { self.alloc.shrink_array(self.data, self.capacity, capacity) }?;
        }
        self.capacity = capacity;
        Ok(())
    }

    /// Move the live values into a new allocation of `new_capacity` slots,
    /// opening a gap of `count` slots at `split` which is filled by calling
    /// `fill` with `input`. Returns the number of values written into the gap.
    /// If the allocation fails, `input` is handed back with the error.
    ///
    /// The new buffer is built completely before it replaces the current one.
    /// If allocation fails, or `fill` panics, the current buffer and its values
    /// are untouched and the partially built buffer is released.
    pub fn relocate<V, F>(
        &mut self,
        new_capacity: usize,
        split: usize,
        count: usize,
        input: V,
        fill: F,
    ) -> Result<usize, UpdateError<V>>
    where
        F: FnOnce(&mut Inserter<'_, T, A>, V),
    {
        let len = self.length;
        assert!(split <= len, "Invalid split position");
        assert!(
            len.checked_add(count)
                .is_some_and(|needed| needed <= new_capacity),
            "Insufficient relocation capacity"
        );
        let scratch = match Storage::<T, &A>::with_capacity_in(new_capacity, &self.alloc) {
            Ok(scratch) => scratch,
            Err(error) => return Err(UpdateError::new(error, input)),
        };
        let dst = scratch.data.as_ptr();
        let mut written = 0;
        let inserted = {
            let mut ins =
                unsafe { Inserter::new(&self.alloc, dst.add(split), count, 0, &mut written) };
            fill(&mut ins, input);
            ins.complete()
        };
        // Moving the existing values cannot fail
        unsafe {
            let src = self.data.as_ptr();
            ptr::copy_nonoverlapping(src, dst, split);
            ptr::copy_nonoverlapping(src.add(split), dst.add(split + inserted), len - split);
        }
        let (data, _, capacity, _) = scratch.into_raw_parts();
        let old_data = mem::replace(&mut self.data, data);
        let old_capacity = mem::replace(&mut self.capacity, capacity);
        self.length = len + inserted;
        unsafe { self.alloc.deallocate_array(old_data, old_capacity) };
        Ok(inserted)
    }

    /// Open a gap of `count` slots at `index` and fill it by calling `fill`
    /// with `input`, returning the number of values written.
    ///
    /// When the spare capacity suffices, the values from `index` onward are
    /// shifted back in place and the gap is filled within the current buffer.
    /// Otherwise the storage is relocated into a buffer of at least
    /// `max(len + count, 2 * len, 8)` slots in a single pass. In both cases a
    /// panic in `fill` leaves the live values exactly as they were.
    pub fn insert_with<V, F>(
        &mut self,
        index: usize,
        count: usize,
        input: V,
        fill: F,
    ) -> Result<usize, UpdateError<V>>
    where
        F: FnOnce(&mut Inserter<'_, T, A>, V),
    {
        let len = self.length;
        assert!(index <= len, "Invalid element index");
        if count > self.capacity - len {
            let max_size = self.alloc.max_size::<T>();
            let needed = match len.checked_add(count) {
                Some(needed) if needed <= max_size => needed,
                _ => return Err(UpdateError::new(StorageError::CapacityLimit, input)),
            };
            let new_capacity = utils::grow_capacity(len, needed, max_size);
            return self.relocate(new_capacity, index, count, input, fill);
        }
        let tail_count = len - index;
        let head = unsafe { self.data.as_ptr().add(index) };
        if tail_count > 0 && count > 0 {
            unsafe { ptr::copy(head, head.add(count), tail_count) };
        }
        self.length = index;
        let mut ins =
            unsafe { Inserter::new(&self.alloc, head, count, tail_count, &mut self.length) };
        fill(&mut ins, input);
        Ok(ins.complete())
    }

    /// Remove the value at `index`, shifting the following values down.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.length;
        assert!(index < len, "Invalid element index");
        unsafe {
            let head = self.data.as_ptr().add(index);
            let result = head.read();
            ptr::copy(head.add(1), head, len - index - 1);
            self.length = len - 1;
            result
        }
    }

    /// Destroy the values in `start..end`, newest first, then shift the
    /// following values down to close the gap.
    pub fn remove_range(&mut self, start: usize, end: usize) {
        let len = self.length;
        assert!(start <= end && end <= len, "Invalid element range");
        if start == end {
            return;
        }
        // A panicking destructor leaks the tail rather than dropping twice
        self.length = start;
        unsafe {
            let head = self.data.as_ptr();
            let mut pos = end;
            while pos > start {
                pos -= 1;
                self.alloc.destroy(NonNull::new_unchecked(head.add(pos)));
            }
            ptr::copy(head.add(end), head.add(start), len - end);
        }
        self.length = len - (end - start);
    }

    /// Exchange the buffers, cursors, and allocators of two storage instances.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

impl<T, A: AllocatorDefault> ConstDefault for Storage<T, A> {
    const DEFAULT: Self = Self::new_in(A::DEFAULT);
}

impl<T, A: AllocatorDefault> Default for Storage<T, A> {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<T, A: Allocator + fmt::Debug> fmt::Debug for Storage<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("data", &self.data)
            .field("length", &self.length)
            .field("capacity", &self.capacity)
            .field("alloc", &self.alloc)
            .finish()
    }
}

impl<T, A: Allocator> Drop for Storage<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}

// The storage owns its values and allocator exclusively.
unsafe impl<T: Send, A: Allocator + Send> Send for Storage<T, A> {}

unsafe impl<T: Sync, A: Allocator + Sync> Sync for Storage<T, A> {}
