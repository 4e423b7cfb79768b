//! Region-size configuration.
//!
//! The default reservation is 2 GiB, overridable once per process via the
//! `PBMALLOC_REGION_BYTES` environment variable: a plain byte count or a
//! `k`/`m`/`g` suffixed value (case-insensitive, powers of 1024).
//! Unparseable values fall back to the default.
//!
//! Resolution is cached in an atomic with a sentinel instead of a
//! `OnceLock`, and the variable is read through `libc::getenv` rather than
//! `std::env`: when the ABI crate is loaded via `LD_PRELOAD`, config
//! resolution runs inside the process's `malloc` symbol and must neither
//! allocate nor block on a lazily-initialized lock.

use std::ffi::CStr;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default reservation: 2 GiB.
pub const DEFAULT_REGION_BYTES: usize = 2 * 1024 * 1024 * 1024;

/// Environment variable overriding the reservation size.
pub const REGION_BYTES_ENV: &str = "PBMALLOC_REGION_BYTES";

const ENV_NAME: &CStr = c"PBMALLOC_REGION_BYTES";

// 0 = unresolved; any other value is the cached byte count (parse_size
// never yields 0).
static CACHED_REGION_BYTES: AtomicUsize = AtomicUsize::new(0);

/// Resolves the region reservation size, reading the environment at most
/// once per process.
#[must_use]
pub fn region_bytes() -> usize {
    let cached = CACHED_REGION_BYTES.load(Ordering::Relaxed);
    if cached != 0 {
        return cached;
    }
    let resolved = resolve_from_env().unwrap_or(DEFAULT_REGION_BYTES);
    // First resolver wins; racing threads read the same environment.
    let _ = CACHED_REGION_BYTES.compare_exchange(0, resolved, Ordering::Relaxed, Ordering::Relaxed);
    CACHED_REGION_BYTES.load(Ordering::Relaxed)
}

fn resolve_from_env() -> Option<usize> {
    // SAFETY: getenv takes a NUL-terminated name and returns either null or
    // a pointer into the process environment, valid until the environment
    // is modified; the bytes are copied out before returning.
    let raw = unsafe { libc::getenv(ENV_NAME.as_ptr()) };
    if raw.is_null() {
        return None;
    }
    // SAFETY: getenv results are NUL-terminated.
    let value = unsafe { CStr::from_ptr(raw) };
    parse_size(value.to_bytes())
}

/// Parses a byte count: digits with an optional `k`/`m`/`g` suffix.
///
/// Returns `None` on empty input, non-digit characters, a zero value, or
/// overflow. Allocation-free.
fn parse_size(input: &[u8]) -> Option<usize> {
    let trimmed = input.trim_ascii();
    if trimmed.is_empty() {
        return None;
    }
    let (digits, shift) = match trimmed.last().map(u8::to_ascii_lowercase) {
        Some(b'k') => (&trimmed[..trimmed.len() - 1], 10),
        Some(b'm') => (&trimmed[..trimmed.len() - 1], 20),
        Some(b'g') => (&trimmed[..trimmed.len() - 1], 30),
        _ => (trimmed, 0),
    };
    if digits.is_empty() {
        return None;
    }
    let mut value: usize = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value
            .checked_mul(10)?
            .checked_add(usize::from(b - b'0'))?;
    }
    let bytes = value.checked_shl(shift).filter(|v| v >> shift == value)?;
    if bytes == 0 { None } else { Some(bytes) }
}
