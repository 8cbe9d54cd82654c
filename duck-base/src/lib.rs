mod error;

pub use error::{err, script_err, Error, ErrorKind, Result};
