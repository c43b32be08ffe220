//! Element-level allocator capabilities.
//!
//! [`Allocator`] speaks in bytes and layouts. Containers speak in element
//! counts, and need to construct and destroy values in the memory they
//! obtain. [`ArrayAlloc`] bridges the two with default behavior for every
//! allocator, so that a concrete allocator only ever has to provide the
//! byte-level contract.

use core::alloc::Layout;
use core::mem::size_of;
use core::ptr::{self, NonNull};

use crate::alloc::Allocator;
use crate::error::StorageError;

/// Element-level operations available on every [`Allocator`].
///
/// All methods have a fixed default and the trait is implemented for every
/// allocator type, so it carries no state of its own.
pub trait ArrayAlloc: Allocator {
    /// The maximum number of `T` which may be requested in one allocation.
    ///
    /// This is `isize::MAX` bytes divided by the size of `T`, or `usize::MAX`
    /// for zero-sized types.
    #[inline]
    fn max_size<T>(&self) -> usize {
        match size_of::<T>() {
            0 => usize::MAX,
            t_size => isize::MAX as usize / t_size,
        }
    }

    /// Allocate uninitialized room for exactly `count` values of `T`.
    ///
    /// No allocator call is made when the resulting block would be empty.
    fn allocate_array<T>(&self, count: usize) -> Result<NonNull<T>, StorageError> {
        if count > self.max_size::<T>() {
            return Err(StorageError::CapacityLimit);
        }
        let layout = Layout::array::<T>(count)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        let ptr = self
            .allocate(layout)
            .map_err(|_| StorageError::AllocError(layout))?;
        Ok(ptr.cast())
    }

    /// Release a block obtained from [`allocate_array`](Self::allocate_array).
    ///
    /// # Safety
    /// `ptr` and `count` must match a previous call to `allocate_array` on this
    /// allocator, and the block must not be released twice. Empty blocks
    /// (zero count or zero-sized `T`) are ignored.
    #[inline]
    unsafe fn deallocate_array<T>(&self, ptr: NonNull<T>, count: usize) {
        if count == 0 || size_of::<T>() == 0 {
            return;
        }
        // SAFETY: the same layout was successfully computed when allocating
        let layout = Layout::from_size_align_unchecked(
            size_of::<T>() * count,
            core::mem::align_of::<T>(),
        );
        self.deallocate(ptr.cast(), layout);
    }

    /// Move a block of `old_count` values into a block of `new_count` values,
    /// where `new_count >= old_count`. The first `old_count` slots are carried
    /// over bitwise. On failure the original block is untouched.
    ///
    /// # Safety
    /// `ptr` and `old_count` must match a live block from `allocate_array`
    /// with `old_count > 0`.
    unsafe fn grow_array<T>(
        &self,
        ptr: NonNull<T>,
        old_count: usize,
        new_count: usize,
    ) -> Result<NonNull<T>, StorageError> {
        debug_assert!(old_count > 0 && new_count >= old_count);
        if new_count > self.max_size::<T>() {
            return Err(StorageError::CapacityLimit);
        }
        if size_of::<T>() == 0 {
            return Ok(ptr);
        }
        let old_layout = Layout::array::<T>(old_count)?;
        let new_layout = Layout::array::<T>(new_count)?;
        let ptr = self
            .grow(ptr.cast(), old_layout, new_layout)
            .map_err(|_| StorageError::AllocError(new_layout))?;
        Ok(ptr.cast())
    }

    /// Move a block of `old_count` values into a block of `new_count` values,
    /// where `0 < new_count <= old_count`. On failure the original block is
    /// untouched.
    ///
    /// # Safety
    /// `ptr` and `old_count` must match a live block from `allocate_array`.
    /// Slots past `new_count` must not hold live values.
    unsafe fn shrink_array<T>(
        &self,
        ptr: NonNull<T>,
        old_count: usize,
        new_count: usize,
    ) -> Result<NonNull<T>, StorageError> {
        debug_assert!(new_count > 0 && new_count <= old_count);
        if size_of::<T>() == 0 {
            return Ok(ptr);
        }
        let old_layout = Layout::array::<T>(old_count)?;
        let new_layout = Layout::array::<T>(new_count)?;
        let ptr = self
            .shrink(ptr.cast(), old_layout, new_layout)
            .map_err(|_| StorageError::AllocError(new_layout))?;
        Ok(ptr.cast())
    }

    /// Move `value` into the uninitialized slot at `ptr`.
    ///
    /// # Safety
    /// `ptr` must be valid for writes and properly aligned. Any previous
    /// value at `ptr` is overwritten without being dropped.
    #[inline]
    unsafe fn construct<T>(&self, ptr: NonNull<T>, value: T) {
        ptr.as_ptr().write(value);
    }

    /// Run the destructor of the value at `ptr`, leaving the slot
    /// uninitialized.
    ///
    /// # Safety
    /// `ptr` must point to a live, initialized value which is not used again.
    #[inline]
    unsafe fn destroy<T>(&self, ptr: NonNull<T>) {
        ptr::drop_in_place(ptr.as_ptr());
    }
}

impl<A: Allocator + ?Sized> ArrayAlloc for A {}
