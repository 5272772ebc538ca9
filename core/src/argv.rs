//! Argument vector assembly for process replacement and creation
//!
//! Builds the ordered, NUL-terminated argument list handed to exec. The
//! vector always starts with the program name; any further elements keep the
//! order they were supplied in. There is no fixed small-argument fast path:
//! the vector grows to whatever the caller supplies.

use crate::{CoreError, Result};
use std::ffi::{CStr, CString};

/// An ordered exec argument vector; element 0 is always the program name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentVector {
    args: Vec<CString>,
}

impl ArgumentVector {
    /// Build a vector from a program name and its arguments.
    ///
    /// Fails with [`CoreError::ArgumentParse`] when the program name is empty
    /// or any element contains an interior NUL byte, since such strings
    /// cannot be encoded for the exec family of calls.
    pub fn new(program: &str, args: &[String]) -> Result<Self> {
        if program.is_empty() {
            return Err(CoreError::ArgumentParse(
                "program name cannot be empty".to_string(),
            ));
        }

        let mut vector = Vec::with_capacity(args.len() + 1);
        vector.push(encode(program)?);
        for arg in args {
            vector.push(encode(arg)?);
        }

        Ok(Self { args: vector })
    }

    /// The program name (element 0)
    pub fn program(&self) -> &CStr {
        &self.args[0]
    }

    /// All elements including the program name, in exec order
    pub fn as_slice(&self) -> &[CString] {
        &self.args
    }

    /// Number of elements including the program name; never zero
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Always false: a constructed vector carries at least the program name
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

fn encode(arg: &str) -> Result<CString> {
    CString::new(arg).map_err(|_| {
        CoreError::ArgumentParse(format!("argument contains an embedded NUL byte: {arg:?}"))
    })
}
