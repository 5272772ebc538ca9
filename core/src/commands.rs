//! Interpreter-facing command surface
//!
//! One entry point per process-control command: `execute-replace`,
//! `create-child`, and `reap`. The surrounding interpreter owns list
//! tokenization and result binding; this module consumes the tokenizer
//! through [`ListSplitter`] and hands back structured values for the host
//! to report.

use crate::argv::ArgumentVector;
use crate::config::PlatformCapabilities;
use crate::launch::{self, Forked};
use crate::wait::{self, ReapResult};
use crate::{CoreError, Result};
use std::convert::Infallible;

/// Host list-syntax tokenizer, owned by the surrounding interpreter.
///
/// Splits a single list string into ordered argument strings following the
/// host's list-quoting rules. A failure message surfaces to the caller as
/// [`CoreError::ArgumentParse`].
pub trait ListSplitter {
    fn split_list(&self, list: &str) -> std::result::Result<Vec<String>, String>;
}

/// `execute-replace <program> [argument-list]`
///
/// Builds the argument vector (splitting `arg_list` with the host tokenizer
/// if supplied) and replaces the current process image. Never returns on
/// success.
pub fn execute_replace<S: ListSplitter + ?Sized>(
    splitter: &S,
    program: &str,
    arg_list: Option<&str>,
) -> Result<Infallible> {
    let args = match arg_list {
        Some(list) => splitter.split_list(list).map_err(CoreError::ArgumentParse)?,
        None => Vec::new(),
    };
    let argv = ArgumentVector::new(program, &args)?;
    launch::replace_image(&argv)
}

/// `create-child`
///
/// Duplicates the current process. The parent side receives the child's pid;
/// the child side receives [`Forked::Child`] and continues as an independent
/// copy (hosts mirroring classic fork semantics report pid 0 there).
pub fn create_child() -> Result<Forked> {
    launch::duplicate()
}

/// `reap [--no-hang] [--include-stopped] [--process-group] [pid]`
pub fn reap_command(tokens: &[&str], caps: &PlatformCapabilities) -> Result<ReapResult> {
    let request = wait::parse_wait_request(tokens)?;
    wait::reap(&request, caps)
}

/// Render a reap outcome in the host's result shape.
///
/// `NoChildReady` renders as `None`: a non-blocking reap with nothing ready
/// leaves the host result empty rather than reporting a fake outcome.
pub fn format_reap(outcome: &ReapResult) -> Option<String> {
    match outcome {
        ReapResult::Exited { pid, code } => Some(format!("{pid} EXIT {code}")),
        ReapResult::Signaled { pid, signal } => Some(format!("{pid} SIG {signal}")),
        ReapResult::Stopped { pid, signal } => Some(format!("{pid} STOP {signal}")),
        ReapResult::NoChildReady => None,
    }
}
