//! Allocator error types.
//!
//! The library layer reports failures as values; the ABI layer decides what
//! is fatal (region reservation) and what maps to a null return with
//! `ENOMEM` (everything else).

use thiserror::Error;

/// Failure to establish the backing region.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
    /// The one-shot `mmap` reservation was refused by the kernel.
    #[error("failed to reserve {bytes}-byte heap region (errno {errno})")]
    ReserveFailed { bytes: usize, errno: i32 },

    /// A zero-length region can never satisfy an allocation.
    #[error("heap region size must be nonzero")]
    EmptyReservation,
}

/// Failure of an individual allocation request.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The frontier cursor would advance past the end of the reserved
    /// region. The region is never grown, so this is permanent for requests
    /// of this size (smaller requests may still succeed via the free list).
    #[error("heap region exhausted: requested {requested} bytes, {remaining} remain")]
    RegionExhausted { requested: usize, remaining: usize },

    /// `count * element_size` overflowed in zero-allocate.
    #[error("zero-allocate size overflow: {count} x {element_size}")]
    SizeOverflow { count: usize, element_size: usize },
}
