//! # pbmalloc-abi
//!
//! ABI-compatible `extern "C"` boundary for pbmalloc. Builds a `cdylib`
//! exposing `malloc`, `free`, `calloc`, and `realloc` over the
//! pointer-bumping reclaiming heap in `pbmalloc-core`, suitable for
//! `LD_PRELOAD`.
//!
//! # Architecture
//!
//! ```text
//! C caller -> ABI entry (this crate) -> global heap mutex -> core Heap -> return
//! ```
//!
//! The process-wide heap is created lazily on the first call: one region
//! reservation ever, one diagnostic banner line ever. Reservation failure
//! is fatal (`_exit(1)`) -- no allocation can proceed without the region.
//! Allocation failures (region exhaustion, calloc overflow) return null
//! with `errno` set to `ENOMEM`.
//!
//! Symbols are only `no_mangle` in release builds so debug and test
//! binaries do not shadow the system allocator (which would recurse the
//! moment Rust's own runtime allocates).

mod global_heap;
pub mod malloc_abi;
