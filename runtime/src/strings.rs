/*!
String Operations - NUL-terminated buffers owned by generated code

Every buffer handed across the C boundary comes from `malloc`, so the
program that receives it releases it with `free`.
*/

use crate::error::{RuntimeError, RuntimeResult};
use std::ffi::{CStr, c_char};
use std::fmt;
use std::ops::Deref;
use std::ptr::{self, NonNull};

/// An owned, NUL-terminated byte buffer allocated with the C allocator.
///
/// The logical length is always the offset of the single terminator:
/// construction cuts the content at the first NUL byte.
pub struct MallocString {
    ptr: NonNull<c_char>,
    len: usize,
}

impl MallocString {
    /// Copy `bytes` into a fresh buffer of `len + 1` bytes.
    ///
    /// Content after an embedded NUL is dropped, since no C consumer could
    /// observe it anyway.
    pub fn from_bytes(bytes: &[u8]) -> RuntimeResult<Self> {
        let visible = match bytes.iter().position(|&b| b == 0) {
            Some(nul) => &bytes[..nul],
            None => bytes,
        };
        Self::from_parts(&[visible])
    }

    /// Allocate exactly `sum(len) + 1` bytes, copy the parts back to back
    /// and terminate at the last index of the allocation.
    ///
    /// Parts must not contain NUL bytes.
    fn from_parts(parts: &[&[u8]]) -> RuntimeResult<Self> {
        let size = allocation_size(parts)?;
        let len = size - 1;

        // SAFETY: `size` is non-zero; a null result is handled below.
        let raw = unsafe { libc::malloc(size) }.cast::<u8>();
        let Some(base) = NonNull::new(raw) else {
            tracing::debug!(size, "malloc returned null");
            return Err(RuntimeError::AllocationFailed { size });
        };

        let mut offset = 0;
        for part in parts {
            // SAFETY: offset + part.len() <= len < size, and the source is a
            // live slice that cannot overlap a fresh allocation.
            unsafe {
                ptr::copy_nonoverlapping(part.as_ptr(), base.as_ptr().add(offset), part.len());
            }
            offset += part.len();
        }
        debug_assert_eq!(offset, len);

        // SAFETY: len == size - 1 is the last byte of the allocation.
        unsafe { base.as_ptr().add(len).write(0) };

        Ok(MallocString {
            ptr: base.cast(),
            len,
        })
    }

    /// Reclaim a buffer previously released with [`MallocString::into_raw`]
    /// or returned by one of the C entry points. Null yields `None`.
    ///
    /// # Safety
    /// `ptr` must be null or a NUL-terminated buffer from `malloc` that the
    /// caller owns and does not use afterwards.
    pub unsafe fn from_raw(ptr: *mut c_char) -> Option<Self> {
        let ptr = NonNull::new(ptr)?;
        let len = unsafe { CStr::from_ptr(ptr.as_ptr()) }.to_bytes().len();
        Some(MallocString { ptr, len })
    }

    /// Give up ownership; the caller must eventually `free` the pointer.
    pub fn into_raw(self) -> *mut c_char {
        let ptr = self.ptr.as_ptr();
        std::mem::forget(self);
        ptr
    }

    /// Content bytes, without the terminator
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: the buffer holds `len` initialized content bytes.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().cast::<u8>(), self.len) }
    }

    pub fn as_c_str(&self) -> &CStr {
        // SAFETY: the buffer holds `len` non-NUL bytes followed by one NUL.
        unsafe {
            CStr::from_bytes_with_nul_unchecked(std::slice::from_raw_parts(
                self.ptr.as_ptr().cast::<u8>(),
                self.len + 1,
            ))
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Deref for MallocString {
    type Target = CStr;

    fn deref(&self) -> &CStr {
        self.as_c_str()
    }
}

impl fmt::Debug for MallocString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MallocString({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl Drop for MallocString {
    fn drop(&mut self) {
        // SAFETY: the pointer came from `malloc` and is owned by `self`.
        unsafe { libc::free(self.ptr.as_ptr().cast()) }
    }
}

/// Bytes needed for the given parts plus one terminator
fn allocation_size(parts: &[&[u8]]) -> RuntimeResult<usize> {
    checked_size(parts.iter().map(|part| part.len()))
}

fn checked_size(lens: impl IntoIterator<Item = usize>) -> RuntimeResult<usize> {
    lens.into_iter()
        .try_fold(1usize, |acc, len| acc.checked_add(len))
        .ok_or(RuntimeError::AllocationFailed { size: usize::MAX })
}

/// Concatenate two strings into a new owned buffer.
///
/// Neither input is consumed. On allocation failure nothing is allocated.
pub fn concatenate(a: &CStr, b: &CStr) -> RuntimeResult<MallocString> {
    MallocString::from_parts(&[a.to_bytes(), b.to_bytes()])
}

/// Concatenate two strings
///
/// # Safety
/// Both arguments must be non-null, NUL-terminated strings.
/// Returns a `malloc`ed buffer owned by the caller, or null if allocation failed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn concat(s1: *const c_char, s2: *const c_char) -> *mut c_char {
    assert!(!s1.is_null(), "concat: first string is null");
    assert!(!s2.is_null(), "concat: second string is null");
    crate::diagnostics::init();

    let (a, b) = unsafe { (CStr::from_ptr(s1), CStr::from_ptr(s2)) };

    match concatenate(a, b) {
        Ok(result) => result.into_raw(),
        Err(err) => {
            tracing::debug!(%err, "concat: returning null");
            ptr::null_mut()
        }
    }
}
