//! A modal G-code interpreter core for CNC motion control.
//!
//! One sanitized line of RS274/NGC-style text at a time is resolved against
//! persistent modal state (active motion mode, units, distance mode, selected
//! plane, feed rate interpretation, spindle/coolant intent, tool, position)
//! and dispatched to the machine behind the [`machine`] traits. The dialect is
//! the pragmatic firmware subset of NIST's
//! [RS274/NGC interpreter version 3](https://www.nist.gov/publications/nist-rs274ngc-interpreter-version-3?pub_id=823374):
//! no canned cycles, cutter compensation, coordinate systems, expressions or
//! variables.
//!
//! Lines are interpreted in two passes over the same text. The first pass
//! settles every modal selection on the line, the second computes numeric
//! operands against those selections, and only then is the resulting action
//! dispatched and the new state committed. A line that fails anywhere leaves
//! the modal state untouched apart from [`ModalState::status`].
#![cfg_attr(not(feature = "std"), no_std)]

mod interp;
mod settings;
mod state;
mod words;

pub mod machine;

pub use interp::Interpreter;
pub use state::{
    Axis, DistanceMode, FeedRateMode, ModalState, MotionMode, Plane, ProgramFlow,
    SpindleDirection, Units,
};

/// Everything that can make a line of input fail.
///
/// The first error encountered aborts the line; no further words are
/// consumed and nothing is committed or dispatched.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A numeric word could not be parsed where one was required.
    BadNumberFormat,
    /// A byte outside `A..=Z` was found where a word letter was expected.
    ExpectedCommandLetter,
    /// A recognized letter carries an unrecognized or unimplemented value,
    /// or a `$` configuration line deviates from `$<index>=<value>`.
    UnsupportedStatement,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Error::BadNumberFormat => "bad number format",
            Error::ExpectedCommandLetter => "expected command letter",
            Error::UnsupportedStatement => "unsupported statement",
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
