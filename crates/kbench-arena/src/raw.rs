//! Low-level primitives for arena memory operations.
//!
//! `memmap2` swallows `munmap` errors in its `Drop` impl. Release has to
//! report them, so the unmap is done here by hand on the exact region the
//! mapping covers. This is the only `unsafe` in the workspace.

#![allow(unsafe_code)]

use std::io;

use memmap2::MmapMut;

/// Unmap `map`, returning the OS error if `munmap` fails.
///
/// The mapping is consumed either way; its `Drop` impl never runs.
pub(crate) fn unmap(map: MmapMut) -> io::Result<()> {
    let len = map.len();
    let ptr = map.as_ptr() as *mut libc::c_void;
    std::mem::forget(map);
    // SAFETY: `ptr` and `len` describe an anonymous mapping created by
    // `MmapOptions::map_anon` with a non-zero length that is a whole number
    // of (huge) pages, so memmap2 applied no alignment offset and the range
    // is exactly the mapped region. The `MmapMut` that owned it has been
    // forgotten, so nothing else can touch or unmap it again.
    let rc = unsafe { libc::munmap(ptr, len) };
    if rc == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}
