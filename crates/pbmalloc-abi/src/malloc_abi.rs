//! ABI layer for the allocation entry points (`malloc`, `free`, `calloc`,
//! `realloc`).
//!
//! Thin translations from C calling conventions to the core heap:
//! null/zero conventions are honored here, failures become null returns
//! with `errno = ENOMEM`, and everything else is the core algorithm under
//! the global heap lock.
//!
//! In debug and test builds these are ordinary Rust functions (no symbol
//! export), so the test binary's own allocator keeps working; release
//! builds export the real symbols for `LD_PRELOAD`.

use std::ffi::c_void;
use std::ptr;

use crate::global_heap::with_heap;

#[inline]
fn set_errno_nomem() {
    // SAFETY: __errno_location returns this thread's errno slot.
    unsafe { *libc::__errno_location() = libc::ENOMEM };
}

/// C `malloc` -- allocates at least `size` bytes of uninitialized memory.
///
/// Returns null only on region exhaustion (with `errno = ENOMEM`); a
/// zero-size request yields a minimal distinct block, as the core clamps
/// every request to the free-list link width.
///
/// # Safety
///
/// Caller must release the returned pointer through this allocator's
/// `free`/`realloc` exactly once and not use it afterwards.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn malloc(size: usize) -> *mut c_void {
    with_heap(|heap| match heap.alloc(size) {
        Ok(payload) => payload.as_ptr().cast(),
        Err(_) => {
            set_errno_nomem();
            ptr::null_mut()
        }
    })
}

/// C `free` -- returns a block to the free list. Null is a no-op.
///
/// # Safety
///
/// `ptr` must be null or a pointer obtained from this allocator that has
/// not already been freed.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn free(ptr: *mut c_void) {
    if ptr.is_null() {
        // Do not reserve a region just to discard a null.
        return;
    }
    // SAFETY: per contract, ptr came from this allocator and is live.
    with_heap(|heap| unsafe { heap.release(ptr.cast()) });
}

/// C `calloc` -- allocates `nmemb * size` bytes, zero-filled.
///
/// The multiplication is overflow-checked; overflow and exhaustion both
/// return null with `errno = ENOMEM`.
///
/// # Safety
///
/// Same contract as [`malloc`].
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn calloc(nmemb: usize, size: usize) -> *mut c_void {
    with_heap(|heap| match heap.zero_alloc(nmemb, size) {
        Ok(payload) => payload.as_ptr().cast(),
        Err(_) => {
            set_errno_nomem();
            ptr::null_mut()
        }
    })
}

/// C `realloc` -- resizes a block, preserving contents.
///
/// Null `ptr` behaves as `malloc(size)`; zero `size` frees the block and
/// returns null. Shrinking returns the same pointer (the block keeps its
/// original capacity); growing moves the data to a fresh block and frees
/// the old one. On failure the old block is left untouched and null is
/// returned with `errno = ENOMEM`.
///
/// # Safety
///
/// `ptr` must be null or a live pointer obtained from this allocator.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
    // SAFETY: per contract, ptr is null or live from this allocator.
    with_heap(|heap| match unsafe { heap.resize(ptr.cast(), size) } {
        Ok(out) => out.cast(),
        Err(_) => {
            set_errno_nomem();
            ptr::null_mut()
        }
    })
}
