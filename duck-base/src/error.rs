// Errors in duck want:
// 1. A backtrace captured where the error is created
// 2. One place to set a breakpoint that traps every error raised by a script
//    or by a library we call into
// 3. One place that emits the error into the tracing/logging system
//
// Alongside the backtrace we keep a classified ErrorKind, since callers (the
// CLI, the thread runner, tests) need to tell fatal script errors apart.

use std::borrow::Cow;
use std::fmt;
use backtrace_error::DynBacktraceError;
use tracing::error;

#[cfg(test)]
use test_log::test;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Arithmetic could not reduce its tokens to a single integer.
    MalformedExpression { tokens: Vec<String> },
    DivisionByZero { tokens: Vec<String> },
    /// The token in assignment position of `set`, `input` or `invoke` was
    /// not `=`.
    InvalidAssignmentOperator { found: String },
    /// The script path given to the driver is missing or not a duck file.
    SourceFormat { reason: String },
    Io { message: String },
    Other { message: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedExpression { tokens } => {
                write!(f, "invalid expression: >>>[{}]<<<", tokens.join(" "))
            }
            ErrorKind::DivisionByZero { tokens } => {
                write!(f, "division by zero in: >>>[{}]<<<", tokens.join(" "))
            }
            ErrorKind::InvalidAssignmentOperator { found } => {
                write!(f, "invalid operator for setting variables: >>>{}<<<", found)
            }
            ErrorKind::SourceFormat { reason } => write!(f, "{}", reason),
            ErrorKind::Io { message } => write!(f, "io error: {}", message),
            ErrorKind::Other { message } => write!(f, "{}", message),
        }
    }
}

pub struct Error {
    kind: ErrorKind,
    trace: DynBacktraceError,
}
pub type Result<T> = std::result::Result<T, Error>;

struct KindErr(ErrorKind);
impl std::fmt::Debug for KindErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for KindErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for KindErr {}

impl<E: std::error::Error + Send + Sync + 'static> From<E> for Error {
    fn from(err: E) -> Error {
        Error::new(err)
    }
}

impl Error {
    pub fn new<E: std::error::Error + Send + Sync + 'static>(err: E) -> Error {
        let dyn_err: &(dyn std::error::Error + 'static) = &err;
        let kind = match dyn_err.downcast_ref::<std::io::Error>() {
            Some(io) => ErrorKind::Io {
                message: io.to_string(),
            },
            None => ErrorKind::Other {
                message: err.to_string(),
            },
        };
        error!(target: "duck", "{:?}", err);
        Error {
            kind,
            trace: DynBacktraceError::from(err),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.trace)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

pub fn script_err(kind: ErrorKind) -> Error {
    error!(target: "duck", "{}", kind);
    Error {
        kind: kind.clone(),
        trace: DynBacktraceError::from(KindErr(kind)),
    }
}

pub fn err(msg: impl Into<Cow<'static, str>>) -> Error {
    script_err(ErrorKind::Other {
        message: msg.into().into_owned(),
    })
}

#[test]
fn test_error() {
    let e = err("test error");
    assert_eq!(e.to_string(), "test error");
}

#[test]
fn test_script_err_keeps_kind() {
    let e = script_err(ErrorKind::InvalidAssignmentOperator {
        found: "ADD".into(),
    });
    assert_eq!(
        e.kind(),
        &ErrorKind::InvalidAssignmentOperator { found: "ADD".into() }
    );
    assert_eq!(e.to_string(), "invalid operator for setting variables: >>>ADD<<<");
}

#[test]
fn test_io_error_classified() {
    fn open() -> Result<std::fs::File> {
        Ok(std::fs::File::open("/nonexistent/duck/test/path.dk")?)
    }
    match open() {
        Err(e) => assert!(matches!(e.kind(), ErrorKind::Io { .. })),
        Ok(_) => panic!("opened a nonexistent file"),
    }
}
