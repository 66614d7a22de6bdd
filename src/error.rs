use miette::Diagnostic;
use thiserror::Error;

use crate::ftype::{CmpOp, ValueKind};

/// Errors from converting literal text into values and from comparing values.
///
/// These are user-facing: the expression compiler reports the message and
/// abandons the expression.
#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error)]
pub enum FtypeError {
    #[error("\"{0}\" is not a valid number.")]
    #[diagnostic(code(dfilter::ftype::invalid_number))]
    InvalidNumber(String),

    #[error("\"{0}\" causes an integer overflow.")]
    #[diagnostic(
        code(dfilter::ftype::integer_overflow),
        help("integer literals must fit in 32 unsigned bits")
    )]
    IntegerOverflow(String),

    #[error("\"{0}\" causes floating-point underflow.")]
    #[diagnostic(code(dfilter::ftype::float_underflow))]
    FloatUnderflow(String),

    #[error("\"{0}\" causes floating-point overflow.")]
    #[diagnostic(code(dfilter::ftype::float_overflow))]
    FloatOverflow(String),

    #[error("\"{0}\" is not a valid floating-point number.")]
    #[diagnostic(code(dfilter::ftype::invalid_float))]
    InvalidFloat(String),

    #[error("\"{0}\" is not a valid time.")]
    #[diagnostic(
        code(dfilter::ftype::invalid_relative_time),
        help("relative times look like 3.5, .000001 or -2")
    )]
    InvalidRelativeTime(String),

    #[error("\"{0}\" is not a valid absolute time.")]
    #[diagnostic(
        code(dfilter::ftype::invalid_absolute_time),
        help("Example: \"Nov 12, 1999 08:55:44.123\"")
    )]
    InvalidAbsoluteTime(String),

    #[error("\"{0}\" occurs twice in local time.")]
    #[diagnostic(
        code(dfilter::ftype::ambiguous_local_time),
        help("the clocks were set back across this time; choose a local-time policy of earliest or latest to accept it")
    )]
    AmbiguousLocalTime(String),

    #[error("\"{0}\" never occurred in local time.")]
    #[diagnostic(
        code(dfilter::ftype::nonexistent_local_time),
        help("the clocks were set forward across this time")
    )]
    NonexistentLocalTime(String),

    #[error("\"{0}\" is not a valid byte string.")]
    #[diagnostic(
        code(dfilter::ftype::invalid_bytes),
        help("Example: \"00:1b:21\"")
    )]
    InvalidBytes(String),

    #[error("{kind} values cannot be written as text")]
    #[diagnostic(code(dfilter::ftype::no_text_form))]
    NoTextForm { kind: ValueKind },

    #[error("{kind} does not support the {op} comparison")]
    #[diagnostic(code(dfilter::ftype::unsupported))]
    Unsupported { kind: ValueKind, op: CmpOp },

    #[error("cannot compare {left} with {right}")]
    #[diagnostic(code(dfilter::ftype::kind_mismatch))]
    KindMismatch { left: ValueKind, right: ValueKind },
}

/// Errors raised while walking a finished tree against packet data
#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error)]
pub enum EvalError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Ftype(#[from] FtypeError),

    #[error("{kind} node does not produce values")]
    #[diagnostic(code(dfilter::eval::not_a_value))]
    NotAValue { kind: &'static str },

    #[error("{kind} node cannot be evaluated as a test")]
    #[diagnostic(code(dfilter::eval::not_a_test))]
    NotATest { kind: &'static str },

    #[error("field '{field}' holds {kind} values, which cannot be sliced")]
    #[diagnostic(
        code(dfilter::eval::not_sliceable),
        help("ranges apply to byte and string fields")
    )]
    NotSliceable { field: String, kind: ValueKind },

    #[error("range over '{field}' no longer owns its range list")]
    #[diagnostic(code(dfilter::eval::detached_range))]
    DetachedRange { field: String },

    #[error("expression nests deeper than {max_depth} levels")]
    #[diagnostic(code(dfilter::eval::too_deep))]
    TooDeep { max_depth: usize },
}
