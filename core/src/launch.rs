//! Process creation primitives: image replacement (exec) and duplication (fork)
//!
//! Both primitives surface OS failures uniformly as [`CoreError::Os`] with
//! the OS-provided error text. Neither is ever retried by this layer, since a
//! retry could duplicate side effects.
//!
//! ## Safety
//!
//! `fork()` is inherently unsafe in a process that may hold threads: between
//! fork and exec (or `_exit`) the child must restrict itself to
//! async-signal-safe calls. This module performs the fork and hands the child
//! side back to the caller untouched; callers on the child side should exec
//! or exit promptly.

// Allow unsafe code for this module since process duplication requires the
// raw fork() call.
#![allow(unsafe_code)]

use crate::argv::ArgumentVector;
use crate::{CoreError, Result};
use nix::unistd::{self, ForkResult, Pid};
use std::convert::Infallible;
use tracing::{debug, error};

/// Outcome of a successful process duplication, seen from each side of the fork
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forked {
    /// Parent side: carries the pid of the newly created child
    Parent {
        /// Process ID of the new child (always positive)
        child: Pid,
    },
    /// Child side: an independently executing copy of the caller
    Child,
}

/// Replace the current process image with the program named by `argv`.
///
/// The program is looked up under the host's normal executable search path.
/// On success this call never returns; on failure the calling process is
/// unaffected and receives [`CoreError::Os`] with the OS error text.
pub fn replace_image(argv: &ArgumentVector) -> Result<Infallible> {
    debug!("Replacing process image with {:?}", argv.program());

    unistd::execvp(argv.program(), argv.as_slice()).map_err(|e| {
        error!("exec of {:?} failed: {}", argv.program(), e.desc());
        CoreError::Os(format!(
            "couldn't execute \"{}\": {}",
            argv.program().to_string_lossy(),
            e.desc()
        ))
    })
}

/// Duplicate the current process.
///
/// Returns [`Forked::Parent`] with the child's pid in the parent context and
/// [`Forked::Child`] in the child context. The child is a separate,
/// independently executing copy; see the module notes on what it may safely
/// do before exec or exit.
pub fn duplicate() -> Result<Forked> {
    // Safety: the fork itself is well-defined; the constraint on the child
    // side (async-signal-safe calls only until exec/_exit) is documented at
    // the module level and owned by the caller.
    match unsafe { unistd::fork() } {
        Ok(ForkResult::Parent { child }) => {
            debug!("Duplicated into child process {}", child);
            Ok(Forked::Parent { child })
        }
        Ok(ForkResult::Child) => Ok(Forked::Child),
        Err(e) => {
            error!("fork failed: {}", e.desc());
            Err(CoreError::Os(format!("couldn't fork: {}", e.desc())))
        }
    }
}
