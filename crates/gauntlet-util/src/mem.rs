use std::alloc::{self, Layout};
use thiserror::Error;

/// Default page stride used to force the kernel to commit a buffer.
pub const PAGE_STRIDE: usize = 4096;

/// Failure to obtain a buffer from the global allocator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The requested size does not form a valid layout.
    #[error("capacity overflow requesting {size} bytes")]
    CapacityOverflow { size: usize },

    /// The allocator returned null.
    #[error("out of memory requesting {size} bytes")]
    OutOfMemory { size: usize },
}

/// Allocate a zeroed byte buffer, reporting exhaustion instead of aborting.
///
/// Zeroed pages come straight from the allocator (calloc semantics), so an
/// untouched buffer does not count against resident memory until written.
///
/// # Errors
/// Returns [`AllocError`] if the layout is invalid or the allocator fails.
pub fn try_zeroed_block(size: usize) -> Result<Vec<u8>, AllocError> {
    if size == 0 {
        return Ok(Vec::new());
    }

    let layout = Layout::array::<u8>(size).map_err(|_| AllocError::CapacityOverflow { size })?;

    // SAFETY: `layout` has non-zero size (checked above).
    let ptr = unsafe { alloc::alloc_zeroed(layout) };
    if ptr.is_null() {
        return Err(AllocError::OutOfMemory { size });
    }

    // SAFETY: `ptr` was allocated by the global allocator with the layout of
    // `[u8; size]`, is fully initialized (zeroed), and ownership moves into the Vec.
    Ok(unsafe { Vec::from_raw_parts(ptr, size, size) })
}

/// Write `value` at every `stride`-th byte of `buf`, starting at offset 0.
///
/// Returns the number of bytes written. A `stride` of zero writes nothing.
pub fn touch_pages(buf: &mut [u8], stride: usize, value: u8) -> usize {
    if stride == 0 {
        return 0;
    }

    let mut written = 0;
    for byte in buf.iter_mut().step_by(stride) {
        *byte = value;
        written += 1;
    }
    written
}
