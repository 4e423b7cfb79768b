//! # pbmalloc-core
//!
//! A pointer-bumping, reclaiming memory allocator.
//!
//! All allocations come out of a single large virtual-memory region reserved
//! once, lazily, from the operating system. Two mechanisms cooperate:
//!
//! - a **frontier cursor** that carves fresh blocks by advancing
//!   monotonically through never-used region space, and
//! - a **free list** -- a singly-linked LIFO chain threaded through the
//!   released blocks themselves -- consulted first-fit before the frontier
//!   is touched.
//!
//! Every block is a `usize` size header immediately followed by the payload.
//! The header is never rewritten when a block is released, which is what
//! lets `release` recover the size with no external bookkeeping, and what
//! lets the same memory double as a free-list node:
//!
//! ```text
//!   live:  [ size ][ payload: size bytes ............ ]
//!   free:  [ size ][ next ][ stale payload bytes .... ]
//!           ^header ^link overwrites leading payload
//! ```
//!
//! # Architecture
//!
//! ```text
//! caller -> Heap::alloc -> FreeList first-fit scan -> hit: unlink, return
//!                                   |
//!                                  miss
//!                                   v
//!                          frontier carve (bounds-checked) -> return
//! ```
//!
//! The process-wide `extern "C"` surface (`malloc`/`free`/`calloc`/
//! `realloc`) lives in `pbmalloc-abi`; this crate is the policy and
//! mechanism layer and owns no global state.

pub mod config;
pub mod error;
pub mod free_list;
pub mod heap;
pub mod region;

pub use error::{AllocError, RegionError};
pub use free_list::{FreeList, HEADER_BYTES, LINK_BYTES, NULL_ADDR};
pub use heap::{Heap, HeapStats, recorded_size};
pub use region::Region;
