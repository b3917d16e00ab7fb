/*!
Fatal Errors - the single unrecoverable exit path

Generated code calls `error` for any condition it cannot recover from.
*/

use std::io::{self, Write};

/// The only diagnostic a failing program prints
pub const FAILURE_MESSAGE: &str = "runtime error";

/// Exit status of a failing program (`exit(-1)`, seen as 255 on Unix)
pub const FAILURE_STATUS: i32 = -1;

/// Write the failure message line
pub fn write_failure<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", FAILURE_MESSAGE)?;
    out.flush()
}

/// Print "runtime error" to stdout and terminate the process.
///
/// Nothing unwinds; destructors on the current stack do not run.
pub fn fail() -> ! {
    tracing::error!(status = FAILURE_STATUS, "runtime error, exiting");

    let _ = write_failure(&mut io::stdout().lock());
    std::process::exit(FAILURE_STATUS)
}

#[unsafe(no_mangle)]
pub extern "C" fn error() -> ! {
    crate::diagnostics::init();
    fail()
}
