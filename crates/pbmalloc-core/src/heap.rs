//! Heap operations: frontier allocation, release, zero-allocate, resize.
//!
//! A [`Heap`] owns one [`Region`] and threads a [`FreeList`] through the
//! blocks released back to it. Allocation consults the free list first
//! (first-fit); only on a miss does the frontier cursor advance into
//! never-used region space. Release is O(1) and never touches the region
//! bounds. Zero-allocate and resize are compositions of the two primitives,
//! not separate algorithms.

use std::ptr::{self, NonNull};

use crate::config;
use crate::error::{AllocError, RegionError};
use crate::free_list::{FreeList, HEADER_BYTES, LINK_BYTES, read_size};
use crate::region::Region;

/// Reads the size recorded in the header preceding `payload`.
///
/// This is the whole block-header convention: stepping back one header
/// width from any live payload pointer lands on its capacity.
///
/// # Safety
///
/// `payload` must be a pointer previously returned by [`Heap::alloc`],
/// [`Heap::zero_alloc`], or [`Heap::resize`] on a still-living heap, and
/// the block must not have been released.
#[inline]
#[must_use]
pub unsafe fn recorded_size(payload: *const u8) -> usize {
    // SAFETY: per contract the header sits HEADER_BYTES before the payload.
    unsafe { read_size(payload as usize - HEADER_BYTES) }
}

/// Operation counters, snapshot-copyable.
///
/// Maintained as plain integers so no operation path allocates (the ABI
/// layer runs these under a malloc symbol).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    /// Blocks carved fresh from the frontier.
    pub frontier_allocs: u64,
    /// Allocations satisfied by free-list reuse.
    pub reuse_hits: u64,
    /// Blocks pushed onto the free list.
    pub releases: u64,
    /// Requests that failed (exhaustion or overflow).
    pub failed_allocs: u64,
    /// Bytes consumed from the region, headers included.
    pub bytes_carved: u64,
}

/// A pointer-bumping, reclaiming heap over one reserved region.
///
/// Not `Sync`: callers hold `&mut Heap` (the process-wide instance in
/// `pbmalloc-abi` serializes access behind a mutex instead).
#[derive(Debug)]
pub struct Heap {
    region: Region,
    /// Boundary between claimed space (below) and never-used space (above).
    /// Monotonically non-decreasing within `[region.start, region.end]`.
    frontier: usize,
    free: FreeList,
    stats: HeapStats,
}

impl Heap {
    /// Creates a heap over a freshly reserved region of the configured
    /// default size (see [`config::region_bytes`]).
    pub fn new() -> Result<Self, RegionError> {
        Self::with_capacity(config::region_bytes())
    }

    /// Creates a heap over a freshly reserved region of `bytes` bytes
    /// (headers included). Tests use small capacities to exercise
    /// exhaustion.
    pub fn with_capacity(bytes: usize) -> Result<Self, RegionError> {
        let region = Region::reserve(bytes)?;
        let frontier = region.start();
        Ok(Self {
            region,
            frontier,
            free: FreeList::new(),
            stats: HeapStats::default(),
        })
    }

    /// Allocates a block with at least `size` usable bytes.
    ///
    /// Requests are clamped to [`LINK_BYTES`] so every block can later hold
    /// a free-list link. A reused block keeps its full original capacity --
    /// no splitting -- so the returned block may be larger than requested;
    /// [`recorded_size`] reports the truth.
    pub fn alloc(&mut self, size: usize) -> Result<NonNull<u8>, AllocError> {
        let size = size.max(LINK_BYTES);

        // Reuse path first: it depends on nothing but the header convention.
        // SAFETY: the list only ever holds headers of blocks this heap
        // carved and that were released exactly once.
        if let Some(node) = unsafe { self.free.take_first_fit(size) } {
            self.stats.reuse_hits += 1;
            let payload = (node + HEADER_BYTES) as *mut u8;
            // SAFETY: payload lies inside the reserved region, never zero.
            return Ok(unsafe { NonNull::new_unchecked(payload) });
        }

        // Frontier path: the cursor becomes the new header.
        let header = self.frontier;
        let next = match size
            .checked_add(HEADER_BYTES)
            .and_then(|block| header.checked_add(block))
            .filter(|&n| n <= self.region.end())
        {
            Some(n) => n,
            None => {
                self.stats.failed_allocs += 1;
                return Err(AllocError::RegionExhausted {
                    requested: size,
                    remaining: self.region.end().saturating_sub(self.frontier),
                });
            }
        };

        // SAFETY: [header, next) lies inside our private mapping; unaligned
        // because blocks are packed byte-exact.
        unsafe { (header as *mut usize).write_unaligned(size) };
        self.frontier = next;
        self.stats.frontier_allocs += 1;
        self.stats.bytes_carved += (HEADER_BYTES + size) as u64;

        let payload = (header + HEADER_BYTES) as *mut u8;
        // SAFETY: payload is inside the region, never zero.
        Ok(unsafe { NonNull::new_unchecked(payload) })
    }

    /// Returns a live block to the free list. Null is a no-op.
    ///
    /// The size header was written at block creation and is still valid, so
    /// the block's leading payload bytes become the next-link in place.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a payload pointer obtained from this heap that
    /// has not already been released (a double free silently corrupts the
    /// list) and is no longer read or written by the caller.
    pub unsafe fn release(&mut self, ptr: *mut u8) {
        if ptr.is_null() {
            return;
        }
        let node = ptr as usize - HEADER_BYTES;
        // SAFETY: per contract, node heads a block of at least LINK_BYTES
        // payload that is in no list.
        unsafe { self.free.push(node) };
        self.stats.releases += 1;
    }

    /// Allocates `count * element_size` bytes with every byte zero.
    ///
    /// The multiplication is overflow-checked. The full recorded capacity
    /// of the block is zeroed, so a reused oversized block also reads
    /// all-zero.
    pub fn zero_alloc(&mut self, count: usize, element_size: usize) -> Result<NonNull<u8>, AllocError> {
        let total = match count.checked_mul(element_size) {
            Some(t) => t,
            None => {
                self.stats.failed_allocs += 1;
                return Err(AllocError::SizeOverflow { count, element_size });
            }
        };
        let payload = self.alloc(total)?;
        // SAFETY: the header reports the block's true capacity, all of
        // which belongs to this allocation.
        unsafe {
            let capacity = recorded_size(payload.as_ptr());
            ptr::write_bytes(payload.as_ptr(), 0, capacity);
        }
        Ok(payload)
    }

    /// Changes a live block's apparent size, preserving contents.
    ///
    /// Null in is a fresh allocate. Zero size in releases the block and
    /// returns null. A request at or below the recorded size returns the
    /// same pointer with the header untouched, so the block keeps its
    /// original capacity. A larger request allocates
    /// anew, copies the old recorded size bytes, and releases the old
    /// block. On allocation failure the old block is left live and intact.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live payload pointer from this heap, with
    /// the same exclusivity rules as [`Heap::release`].
    pub unsafe fn resize(&mut self, ptr: *mut u8, size: usize) -> Result<*mut u8, AllocError> {
        if ptr.is_null() {
            return Ok(self.alloc(size)?.as_ptr());
        }
        if size == 0 {
            // SAFETY: per contract.
            unsafe { self.release(ptr) };
            return Ok(ptr::null_mut());
        }

        // SAFETY: ptr is a live payload pointer per contract.
        let old_size = unsafe { recorded_size(ptr) };
        if size <= old_size {
            return Ok(ptr);
        }

        let new = self.alloc(size)?;
        // SAFETY: the old block holds exactly old_size payload bytes; the
        // new block holds at least size > old_size, and the two blocks are
        // disjoint (the old one is still live, so the free list cannot have
        // handed its memory back).
        unsafe {
            ptr::copy_nonoverlapping(ptr, new.as_ptr(), old_size);
            self.release(ptr);
        }
        Ok(new.as_ptr())
    }

    /// Current frontier cursor address.
    #[must_use]
    pub fn frontier(&self) -> usize {
        self.frontier
    }

    /// The backing region.
    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Number of blocks currently on the free list.
    #[must_use]
    pub fn free_list_len(&self) -> usize {
        self.free.len()
    }

    /// Whether the block at payload pointer `ptr` is on the free list.
    ///
    /// # Safety
    ///
    /// `ptr` must be a payload pointer obtained from this heap.
    #[must_use]
    pub unsafe fn is_free(&self, ptr: *const u8) -> bool {
        // SAFETY: list nodes are valid block headers.
        unsafe { self.free.contains(ptr as usize - HEADER_BYTES) }
    }

    /// Snapshot of the operation counters.
    #[must_use]
    pub fn stats(&self) -> HeapStats {
        self.stats
    }
}
