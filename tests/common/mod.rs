#![allow(dead_code)]

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

use vector_alloc::alloc::{AllocError, Allocator, Global};

/// Forwards to the global allocator, counting outstanding blocks. Requests
/// are refused once an optional byte budget is spent.
#[derive(Debug, Default)]
pub struct TrackingAlloc {
    live: Cell<usize>,
    total: Cell<usize>,
    budget: Cell<Option<usize>>,
}

impl TrackingAlloc {
    pub fn with_budget(bytes: usize) -> Self {
        let alloc = Self::default();
        alloc.set_budget(Some(bytes));
        alloc
    }

    /// The number of blocks currently allocated.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// The number of successful allocations.
    pub fn total(&self) -> usize {
        self.total.get()
    }

    pub fn set_budget(&self, bytes: Option<usize>) {
        self.budget.set(bytes);
    }
}

unsafe impl Allocator for TrackingAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        if let Some(budget) = self.budget.get() {
            if layout.size() > budget {
                return Err(AllocError);
            }
            self.budget.set(Some(budget - layout.size()));
        }
        let ptr = Global.allocate(layout)?;
        self.live.set(self.live.get() + 1);
        self.total.set(self.total.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.live.set(self.live.get() - 1);
        Global.deallocate(ptr, layout)
    }
}

/// A stateful allocator handle: instances with different tags do not share
/// blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedAlloc(pub u8);

unsafe impl Allocator for TaggedAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        Global.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        Global.deallocate(ptr, layout)
    }
}

#[derive(Debug, Default)]
pub struct Counters {
    pub created: Cell<usize>,
    pub clones: Cell<usize>,
    pub dropped: Cell<usize>,
    pub panic_on_clone: Cell<Option<usize>>,
}

impl Counters {
    /// Make the `k`th call to `clone` (counting from one) panic.
    pub fn panic_on_clone(k: usize) -> Self {
        let counters = Self::default();
        counters.panic_on_clone.set(Some(k));
        counters
    }

    pub fn live(&self) -> usize {
        self.created.get() - self.dropped.get()
    }
}

/// An element which records its constructions and drops.
#[derive(Debug)]
pub struct Tracked<'c> {
    pub value: u32,
    counters: &'c Counters,
}

impl<'c> Tracked<'c> {
    pub fn new(value: u32, counters: &'c Counters) -> Self {
        counters.created.set(counters.created.get() + 1);
        Self { value, counters }
    }
}

impl Clone for Tracked<'_> {
    fn clone(&self) -> Self {
        let call = self.counters.clones.get() + 1;
        self.counters.clones.set(call);
        if self.counters.panic_on_clone.get() == Some(call) {
            panic!("clone failed");
        }
        Tracked::new(self.value, self.counters)
    }
}

impl PartialEq for Tracked<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Drop for Tracked<'_> {
    fn drop(&mut self) {
        self.counters.dropped.set(self.counters.dropped.get() + 1);
    }
}
