/*!
Latte Runtime - string and console I/O support for compiled Latte programs

Linked as a static library into every executable the compiler produces.
Each export is independent: there is no initialization call and no state
carried between calls apart from the process's standard streams.
*/

pub mod abi;
pub mod diagnostics;
pub mod error;
pub mod fatal;
pub mod io;
pub mod scan;
pub mod strings;

// Re-export the safe API
pub use error::{RuntimeError, RuntimeResult};
pub use fatal::fail;
pub use io::{print_integer, print_string, read_integer, read_line};
pub use scan::NewlinePolicy;
pub use strings::{MallocString, concatenate};
