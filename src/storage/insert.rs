use core::mem::MaybeUninit;
use core::ptr::{self, NonNull};
use core::slice;

use crate::alloc::Allocator;
use crate::capability::ArrayAlloc;

/// Fills a gap of uninitialized slots, optionally followed by a run of live
/// `tail` values which were shifted out of the way.
///
/// The owning length is only updated once the fill completes. If the fill is
/// abandoned (by a panic in a constructor), the values written so far are
/// destroyed in reverse order and the tail is shifted back, so the owner is
/// left exactly as it was before the gap was opened.
pub struct Inserter<'a, T, A: Allocator> {
    alloc: &'a A,
    buf: &'a mut [MaybeUninit<T>],
    pos: usize,
    cap: usize,
    length: &'a mut usize,
}

impl<'a, T, A: Allocator> Inserter<'a, T, A> {
    /// # Safety
    /// `data` must be valid for `count + tail_count` slots, where the first
    /// `count` are uninitialized and the remainder hold live values. `length`
    /// must currently exclude both the gap and the tail.
    #[inline]
    pub(crate) unsafe fn new(
        alloc: &'a A,
        data: *mut T,
        count: usize,
        tail_count: usize,
        length: &'a mut usize,
    ) -> Self {
        Self {
            alloc,
            buf: slice::from_raw_parts_mut(data.cast(), count + tail_count),
            pos: 0,
            cap: count,
            length,
        }
    }

    /// The number of values written so far.
    #[inline]
    pub const fn written(&self) -> usize {
        self.pos
    }

    /// The number of slots left in the gap.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.cap - self.pos
    }

    /// Determine if every slot in the gap has been written.
    #[inline]
    pub const fn full(&self) -> bool {
        self.pos == self.cap
    }

    /// Write a single value into the next free slot.
    #[inline]
    pub fn push(&mut self, val: T) {
        assert!(self.pos < self.cap, "Inserter capacity exceeded");
        // SAFETY: the slot is within the gap and uninitialized
        unsafe {
            self.alloc
                .construct(NonNull::from(&mut self.buf[self.pos]).cast(), val)
        };
        self.pos += 1;
    }

    /// Write `count` clones of `val`.
    #[inline]
    pub fn push_repeat(&mut self, val: &T, count: usize)
    where
        T: Clone,
    {
        assert!(self.remaining() >= count, "Inserter capacity exceeded");
        for _ in 0..count {
            self.push(val.clone());
        }
    }

    /// Write `count` values produced by `f`.
    #[inline]
    pub fn push_with<F>(&mut self, count: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        assert!(self.remaining() >= count, "Inserter capacity exceeded");
        for _ in 0..count {
            self.push(f());
        }
    }

    /// Write clones of every value in `data`.
    #[inline]
    pub fn push_slice(&mut self, data: &[T])
    where
        T: Clone,
    {
        assert!(self.remaining() >= data.len(), "Inserter capacity exceeded");
        for item in data {
            self.push(item.clone());
        }
    }

    /// Write values from `iter` until the gap is full or the iterator is
    /// exhausted.
    #[inline]
    pub fn push_iter(&mut self, iter: &mut impl Iterator<Item = T>) {
        while self.pos < self.cap {
            let Some(item) = iter.next() else { break };
            self.push(item);
        }
    }

    /// Successfully complete the fill, returning the number of values
    /// written. Unused gap slots are closed by shifting the tail down.
    #[inline]
    pub fn complete(mut self) -> usize {
        let count = self.pos;
        let tail_count = self.buf.len() - self.cap;
        if count < self.cap && tail_count > 0 {
            let range = self.buf[count..self.cap].as_mut_ptr_range();
            unsafe {
                ptr::copy(range.end, range.start, tail_count);
            }
        }
        *self.length += count + tail_count;
        self.buf = &mut [];
        count
    }
}

impl<T, A: Allocator> Drop for Inserter<'_, T, A> {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        // Destroy the inserted values, newest first
        while self.pos > 0 {
            self.pos -= 1;
            unsafe {
                self.alloc
                    .destroy(NonNull::from(&mut self.buf[self.pos]).cast::<T>())
            };
        }
        let tail_count = self.buf.len() - self.cap;
        if tail_count > 0 {
            // Close the gap again
            let start = self.buf.as_mut_ptr();
            unsafe { ptr::copy(start.add(self.cap), start, tail_count) };
            *self.length += tail_count;
        }
    }
}
