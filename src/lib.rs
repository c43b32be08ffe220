//! A growable contiguous vector over a pluggable allocator.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc as alloc_crate;

pub mod alloc;

pub mod capability;

pub(crate) mod error;

pub mod storage;

pub mod vector;

pub use self::{
    alloc::Global,
    capability::ArrayAlloc,
    error::{StorageError, UpdateError},
    storage::Storage,
    vector::{Cursor, Vector},
};
