//! Backing-region lifecycle.
//!
//! One anonymous private `mmap` reservation per `Region`, established once
//! and never grown or shrunk. `MAP_NORESERVE` keeps the reservation pure
//! address space: backing pages materialize only as they are touched, so a
//! multi-gigabyte default costs nothing up front and test suites can hold
//! several regions at once.

use std::ptr;

use crate::error::RegionError;

/// A reserved span of virtual address space `[start, end)`.
///
/// The region is unmapped when the `Region` is dropped. The process-wide
/// heap in `pbmalloc-abi` lives in a static and is never dropped, so its
/// region holds for the life of the process.
#[derive(Debug)]
pub struct Region {
    start: usize,
    len: usize,
}

impl Region {
    /// Reserves `bytes` of address space from the operating system.
    ///
    /// Nothing is committed or zeroed eagerly; anonymous pages are
    /// zero-filled by the kernel on first touch.
    pub fn reserve(bytes: usize) -> Result<Self, RegionError> {
        if bytes == 0 {
            return Err(RegionError::EmptyReservation);
        }

        // SAFETY: anonymous mapping with no fd; the kernel chooses the
        // placement, so no existing mapping can be clobbered.
        let addr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                bytes,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS | libc::MAP_NORESERVE,
                -1,
                0,
            )
        };
        if addr == libc::MAP_FAILED {
            let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
            return Err(RegionError::ReserveFailed { bytes, errno });
        }

        Ok(Self {
            start: addr as usize,
            len: bytes,
        })
    }

    /// First address of the region.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last address of the region.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Total reserved bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `addr` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, addr: usize) -> bool {
        addr >= self.start && addr < self.end()
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        // SAFETY: start/len describe exactly the mapping created in
        // `reserve`, and no payload pointer outlives the owning Heap's
        // borrow discipline.
        unsafe {
            libc::munmap(self.start as *mut libc::c_void, self.len);
        }
    }
}
