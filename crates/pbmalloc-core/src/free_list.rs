//! Free-list reuse index.
//!
//! Released blocks are chained into a singly-linked, LIFO, unordered list.
//! The list has no nodes of its own: each entry is the released block's
//! header plus its leading payload bytes, reinterpreted in place. The size
//! field was written at block creation and is never touched again; the link
//! overwrites the first payload bytes, which is safe because every block is
//! allocated with at least [`LINK_BYTES`] of payload.
//!
//! Addresses are carried as `usize` with [`NULL_ADDR`] as the empty link,
//! and all header/link traffic uses unaligned loads and stores: block
//! packing is byte-exact (header immediately followed by payload, no
//! padding), so a header can land on any byte boundary.

/// Width of the size header preceding every payload.
pub const HEADER_BYTES: usize = size_of::<usize>();

/// Width of the next-link a free block must be able to hold in its payload.
pub const LINK_BYTES: usize = size_of::<usize>();

/// The empty link. Address zero is never part of a reserved region.
pub const NULL_ADDR: usize = 0;

/// Reads the size header of the block whose header starts at `node`.
///
/// # Safety
///
/// `node` must be the header address of a block created by the frontier
/// allocator, with at least `HEADER_BYTES` readable.
#[inline]
pub(crate) unsafe fn read_size(node: usize) -> usize {
    // SAFETY: per contract; unaligned because blocks are packed byte-exact.
    unsafe { (node as *const usize).read_unaligned() }
}

/// Reads the next-link of a free block.
///
/// # Safety
///
/// `node` must be the header address of a block currently linked into the
/// free list (so its leading payload bytes hold a link).
#[inline]
unsafe fn read_next(node: usize) -> usize {
    // SAFETY: per contract.
    unsafe { ((node + HEADER_BYTES) as *const usize).read_unaligned() }
}

/// Overwrites the leading payload bytes of a free block with a link.
///
/// # Safety
///
/// `node` must be the header address of a released block with at least
/// `LINK_BYTES` of payload, and no live pointer may alias that payload.
#[inline]
unsafe fn write_next(node: usize, next: usize) {
    // SAFETY: per contract.
    unsafe { ((node + HEADER_BYTES) as *mut usize).write_unaligned(next) }
}

/// Singly-linked LIFO index over released blocks.
///
/// No ordering by size or address is maintained; reuse is strictly
/// first-fit from the head (most recently released first).
#[derive(Debug)]
pub struct FreeList {
    head: usize,
    len: usize,
}

impl FreeList {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: NULL_ADDR,
            len: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head == NULL_ADDR
    }

    /// Number of blocks currently linked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Links the block whose header starts at `node` at the head.
    ///
    /// # Safety
    ///
    /// `node` must be the header address of a block with at least
    /// `LINK_BYTES` of payload that is not already in the list (a duplicate
    /// push creates a cycle) and is not referenced by any live pointer.
    pub unsafe fn push(&mut self, node: usize) {
        // SAFETY: per contract, the leading payload bytes are ours to reuse.
        unsafe { write_next(node, self.head) };
        self.head = node;
        self.len += 1;
    }

    /// Unlinks and returns the first block whose recorded size is at least
    /// `size` -- first-fit, even when a tighter fit exists further down.
    ///
    /// Returns the block's header address, or `None` on a miss (empty list
    /// or nothing large enough). A miss is not an error; the caller falls
    /// through to the frontier.
    ///
    /// # Safety
    ///
    /// Every node in the list must still satisfy the `push` contract.
    pub unsafe fn take_first_fit(&mut self, size: usize) -> Option<usize> {
        let mut prev = NULL_ADDR;
        let mut cur = self.head;
        while cur != NULL_ADDR {
            // SAFETY: list nodes are valid block headers per the push
            // contract.
            unsafe {
                if read_size(cur) >= size {
                    let next = read_next(cur);
                    if prev == NULL_ADDR {
                        self.head = next;
                    } else {
                        write_next(prev, next);
                    }
                    self.len -= 1;
                    return Some(cur);
                }
                prev = cur;
                cur = read_next(cur);
            }
        }
        None
    }

    /// Whether the block whose header starts at `node` is linked.
    ///
    /// Test and debugging support; O(n) walk.
    ///
    /// # Safety
    ///
    /// Every node in the list must still satisfy the `push` contract.
    #[must_use]
    pub unsafe fn contains(&self, node: usize) -> bool {
        let mut cur = self.head;
        while cur != NULL_ADDR {
            if cur == node {
                return true;
            }
            // SAFETY: list nodes are valid per the push contract.
            cur = unsafe { read_next(cur) };
        }
        false
    }
}

impl Default for FreeList {
    fn default() -> Self {
        Self::new()
    }
}
