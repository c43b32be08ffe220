//! Raw memory allocation.
//!
//! The byte-level [`Allocator`] contract consumed by [`Storage`](crate::Storage).
//! With the `allocator-api2` feature the contract and the [`Global`] allocator
//! are taken from that crate, so any allocator written against it can back a
//! [`Vector`](crate::Vector).

use core::alloc::Layout;
#[cfg(not(feature = "allocator-api2"))]
use core::fmt;
#[cfg(not(feature = "allocator-api2"))]
use core::ptr;
use core::ptr::NonNull;
#[cfg(feature = "zeroize")]
use core::slice;

#[cfg(all(feature = "alloc", not(feature = "allocator-api2")))]
use alloc_crate::alloc::{alloc as raw_alloc, dealloc as raw_dealloc};

#[cfg(all(feature = "alloc", feature = "allocator-api2"))]
pub use allocator_api2::alloc::Global;
#[cfg(feature = "allocator-api2")]
pub use allocator_api2::alloc::{AllocError, Allocator};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

#[cfg(all(not(test), feature = "alloc"))]
pub use alloc_crate::alloc::handle_alloc_error;

#[cfg(any(test, not(feature = "alloc")))]
/// Custom allocation error handler.
pub fn handle_alloc_error(layout: Layout) -> ! {
    panic!("memory allocation of {} bytes failed", layout.size());
}

/// A well-aligned, non-null pointer for zero-sized allocations.
#[cfg(all(feature = "alloc", not(feature = "allocator-api2")))]
#[inline]
pub(crate) fn layout_dangling(layout: Layout) -> NonNull<u8> {
    // FIXME: use Layout::dangling when stabilized
    // SAFETY: layout alignments are guaranteed to be non-zero.
    unsafe { NonNull::new_unchecked(layout.align() as *mut u8) }
}

/// The allocator could not satisfy a request, either because memory was
/// exhausted or because the layout was unsupported.
#[cfg(not(feature = "allocator-api2"))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllocError;

#[cfg(not(feature = "allocator-api2"))]
impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")
    }
}

#[cfg(all(feature = "std", not(feature = "allocator-api2")))]
impl std::error::Error for AllocError {}

/// A source of raw memory blocks described by a [`Layout`].
///
/// Zero-sized requests are permitted and must return a dangling, aligned
/// pointer without touching any underlying heap.
///
/// # Safety
/// - Blocks returned by an allocator remain valid until they are released
///   through the same allocator (or one of its clones).
/// - Cloning or moving the allocator must not invalidate outstanding blocks.
/// - `deallocate` must never fail or panic.
#[cfg(not(feature = "allocator-api2"))]
pub unsafe trait Allocator {
    /// Try to allocate a block of memory fitting `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

    /// Release a block previously returned by this allocator.
    ///
    /// # Safety
    /// `ptr` must denote a block currently allocated by this allocator, and
    /// `layout` must be the layout it was allocated with.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Try to allocate a zero-filled block of memory fitting `layout`.
    #[inline]
    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let ptr = self.allocate(layout)?;
        // SAFETY: the result of `allocate` is valid for `ptr.len()` bytes
        unsafe { ptr::write_bytes(ptr.cast::<u8>().as_ptr(), 0, ptr.len()) };
        Ok(ptr)
    }

    /// Try to move an allocation into a larger block.
    ///
    /// On failure the original block is left untouched.
    ///
    /// # Safety
    /// `ptr` must denote a block currently allocated by this allocator with
    /// `old_layout`, and `new_layout.size() >= old_layout.size()`.
    unsafe fn grow(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert!(
            new_layout.size() >= old_layout.size(),
            "`new_layout.size()` must be greater than or equal to `old_layout.size()`"
        );
        let new_ptr = self.allocate(new_layout)?;
        let cp_len = old_layout.size();
        if cp_len > 0 {
            ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr().cast(), cp_len);
        }
        self.deallocate(ptr, old_layout);
        Ok(new_ptr)
    }

    /// Try to move an allocation into a smaller block.
    ///
    /// On failure the original block is left untouched.
    ///
    /// # Safety
    /// `ptr` must denote a block currently allocated by this allocator with
    /// `old_layout`, and `new_layout.size() <= old_layout.size()`.
    unsafe fn shrink(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        debug_assert!(
            new_layout.size() <= old_layout.size(),
            "`new_layout.size()` must be smaller than or equal to `old_layout.size()`"
        );
        let new_ptr = self.allocate(new_layout)?;
        let cp_len = new_layout.size();
        if cp_len > 0 {
            ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr().cast(), cp_len);
        }
        self.deallocate(ptr, old_layout);
        Ok(new_ptr)
    }

    /// Obtain a reference to this allocator.
    #[inline(always)]
    fn by_ref(&self) -> &Self
    where
        Self: Sized,
    {
        self
    }
}

#[cfg(not(feature = "allocator-api2"))]
unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        (**self).allocate_zeroed(layout)
    }

    #[inline]
    unsafe fn grow(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        (**self).grow(ptr, old_layout, new_layout)
    }

    #[inline]
    unsafe fn shrink(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<[u8]>, AllocError> {
        (**self).shrink(ptr, old_layout, new_layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }
}

/// Allocators which can be created in a constant context. This allows an
/// empty [`Vector`](crate::Vector) to be built by a `const fn`.
pub trait AllocatorDefault: Allocator + Clone + Default {
    /// The constant initializer for this allocator.
    const DEFAULT: Self;
}

/// The global memory allocator.
///
/// With the `alloc` feature this forwards to the allocator registered with
/// `#[global_allocator]`, or the standard library's default.
#[cfg(any(not(feature = "alloc"), not(feature = "allocator-api2")))]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "alloc", derive(Default, Copy))]
pub struct Global;

#[cfg(all(feature = "alloc", not(feature = "allocator-api2")))]
unsafe impl Allocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let ptr = if layout.size() == 0 {
            layout_dangling(layout)
        } else {
            let Some(ptr) = NonNull::new(unsafe { raw_alloc(layout) }) else {
                return Err(AllocError);
            };
            ptr
        };
        Ok(NonNull::slice_from_raw_parts(ptr, layout.size()))
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() > 0 {
            raw_dealloc(ptr.as_ptr(), layout);
        }
    }
}

#[cfg(not(feature = "alloc"))]
// Without `alloc` there is no heap to forward to. `Global` stays nameable as
// the default allocator type, and any attempt to allocate through it panics.
unsafe impl Allocator for Global {
    fn allocate(&self, _layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        unimplemented!();
    }

    unsafe fn deallocate(&self, _ptr: NonNull<u8>, _layout: Layout) {
        unimplemented!();
    }
}

#[cfg(feature = "alloc")]
impl AllocatorDefault for Global {
    const DEFAULT: Self = Global;
}

#[cfg(feature = "zeroize")]
/// An allocator which forwards to `A`, and zeroizes every block before it is
/// released.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ZeroizingAlloc<A>(pub A);

#[cfg(feature = "zeroize")]
unsafe impl<A: Allocator> Allocator for ZeroizingAlloc<A> {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        self.0.allocate(layout)
    }

    // `grow` and `shrink` are left to the default implementations, which
    // copy into a fresh block and pass the old one through `deallocate`.

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() > 0 {
            let mem = slice::from_raw_parts_mut(ptr.as_ptr(), layout.size());
            mem.zeroize();
        }
        self.0.deallocate(ptr, layout)
    }
}

#[cfg(feature = "zeroize")]
impl<A: AllocatorDefault> AllocatorDefault for ZeroizingAlloc<A> {
    const DEFAULT: Self = ZeroizingAlloc(A::DEFAULT);
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use core::alloc::Layout;

    use super::{Allocator, Global};

    #[test]
    fn global_zero_sized_is_dangling() {
        let layout = Layout::from_size_align(0, 16).unwrap();
        let ptr = Global.allocate(layout).expect("zero-sized allocation");
        assert_eq!(ptr.len(), 0);
        assert_eq!(ptr.cast::<u8>().as_ptr() as usize, 16);
        unsafe { Global.deallocate(ptr.cast(), layout) };
    }

    #[test]
    fn global_grow_preserves_contents() {
        let old = Layout::array::<u32>(2).unwrap();
        let new = Layout::array::<u32>(8).unwrap();
        let ptr = Global.allocate(old).unwrap().cast::<u32>();
        unsafe {
            ptr.as_ptr().write(7);
            ptr.as_ptr().add(1).write(9);
            let grown = Global.grow(ptr.cast(), old, new).unwrap().cast::<u32>();
            assert_eq!(grown.as_ptr().read(), 7);
            assert_eq!(grown.as_ptr().add(1).read(), 9);
            Global.deallocate(grown.cast(), new);
        }
    }
}
