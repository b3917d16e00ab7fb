/*!
I/O Operations - console output and input for compiled programs

Output goes to the process's stdout one flushed line at a time. Input is
read through the shared stdin buffer, so `readInt` and `readString` can be
interleaved freely.
*/

use crate::error::RuntimeResult;
use crate::scan::{NewlinePolicy, read_integer_from, read_line_from};
use crate::strings::MallocString;
use std::ffi::{CStr, c_char, c_int};
use std::io::{self, Write};
use std::ptr;

/// Write the bytes of `s` followed by a newline
pub fn write_string<W: Write + ?Sized>(out: &mut W, s: &CStr) -> io::Result<()> {
    out.write_all(s.to_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Write `n` in decimal followed by a newline
pub fn write_integer<W: Write + ?Sized>(out: &mut W, n: i32) -> io::Result<()> {
    writeln!(out, "{}", n)?;
    out.flush()
}

/// Print a string line to stdout. Write failures are ignored.
pub fn print_string(s: &CStr) {
    if let Err(err) = write_string(&mut io::stdout().lock(), s) {
        tracing::debug!(%err, "print_string: write failed");
    }
}

/// Print an integer line to stdout. Write failures are ignored.
pub fn print_integer(n: i32) {
    if let Err(err) = write_integer(&mut io::stdout().lock(), n) {
        tracing::debug!(%err, "print_integer: write failed");
    }
}

/// Read one integer from stdin; see [`read_integer_from`]
pub fn read_integer() -> RuntimeResult<i32> {
    read_integer_from(&mut io::stdin().lock())
}

/// Read one line from stdin; see [`read_line_from`]
pub fn read_line(policy: NewlinePolicy) -> RuntimeResult<MallocString> {
    read_line_from(&mut io::stdin().lock(), policy)
}

// ============================================================================
// FFI functions
// ============================================================================

/// # Safety
/// `s` must be a non-null, NUL-terminated string. It is not freed.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub unsafe extern "C" fn printString(s: *const c_char) {
    assert!(!s.is_null(), "printString: unexpected null string pointer");
    crate::diagnostics::init();

    print_string(unsafe { CStr::from_ptr(s) });
}

#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "C" fn printInt(x: c_int) {
    crate::diagnostics::init();
    print_integer(x);
}

/// Read an integer from stdin.
///
/// End of input, a malformed token or an out-of-range value is a runtime
/// error: the process terminates through the fatal path instead of
/// returning an unspecified value.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "C" fn readInt() -> c_int {
    crate::diagnostics::init();

    match read_integer() {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(%err, "readInt: unreadable integer");
            crate::fatal::fail()
        }
    }
}

/// Read a line from stdin.
///
/// Returns a `malloc`ed buffer owned by the caller, or null when input is
/// exhausted or the buffer cannot be allocated.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "C" fn readString() -> *mut c_char {
    crate::diagnostics::init();

    match read_line(NewlinePolicy::Legacy) {
        Ok(line) => line.into_raw(),
        Err(err) if err.is_absent_result() => {
            tracing::debug!(%err, "readString: returning null");
            ptr::null_mut()
        }
        Err(err) => {
            tracing::warn!(%err, "readString: stream failure, returning null");
            ptr::null_mut()
        }
    }
}
