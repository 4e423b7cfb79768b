//! Process-wide heap state.
//!
//! One `Heap` for the whole process, created on first use and never torn
//! down: the region outlives every caller, so the static is simply never
//! dropped. The baseline design left the frontier cursor and free-list
//! head unsynchronized; here every operation runs under one mutex.

use parking_lot::Mutex;
use pbmalloc_core::Heap;

static GLOBAL_HEAP: Mutex<Option<Heap>> = Mutex::new(None);

const BANNER: &[u8] = b"pbmalloc: heap region reserved\n";
const RESERVE_FAILED: &[u8] = b"pbmalloc: fatal: heap region reservation failed\n";

/// Runs `f` against the process-wide heap, initializing it first if this
/// is the first allocator call in the process.
///
/// Initialization failure terminates the process: a message goes to stderr
/// via a raw `write` (the Rust I/O stack may itself want to allocate) and
/// `_exit` skips unwinding and atexit handlers.
pub(crate) fn with_heap<R>(f: impl FnOnce(&mut Heap) -> R) -> R {
    let mut guard = GLOBAL_HEAP.lock();
    let heap = guard.get_or_insert_with(|| match Heap::new() {
        Ok(heap) => {
            // One-time marker that this allocator is live. Informational
            // only; failure to write is ignored.
            // SAFETY: raw fd write of a static buffer.
            unsafe {
                libc::write(libc::STDOUT_FILENO, BANNER.as_ptr().cast(), BANNER.len());
            }
            heap
        }
        Err(_) => {
            // SAFETY: raw fd write of a static buffer, then immediate
            // process exit with no unwinding through foreign frames.
            unsafe {
                libc::write(
                    libc::STDERR_FILENO,
                    RESERVE_FAILED.as_ptr().cast(),
                    RESERVE_FAILED.len(),
                );
                libc::_exit(1)
            }
        }
    });
    f(heap)
}
