//! Wait request parsing and child reaping
//!
//! The `reap` option surface is parsed into a normalized [`WaitRequest`]
//! (a tagged record, deliberately not bit flags, so the decode site can
//! pattern-match exhaustively). A request is executed with a single
//! `waitpid`, and the opaque status is decoded in exactly one place,
//! [`decode_status`], which owns all bit-layout knowledge.

use crate::config::PlatformCapabilities;
use crate::signals::signal_name;
use crate::{CoreError, Result};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::debug;

const REAP_USAGE: &str = "reap [--no-hang] [--include-stopped] [--process-group] [pid]";

/// Whether the wait may suspend the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HangPolicy {
    /// Suspend until a matching child changes state
    Block,
    /// Return immediately with [`ReapResult::NoChildReady`] if nothing is ready
    NonBlocking,
}

/// Whether job-control stops are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracePolicy {
    IgnoreStopped,
    IncludeStopped,
}

/// What the wait is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTarget {
    /// Any child of the caller, not restricted by group
    AnyChild,
    /// A single child process
    Pid(i32),
    /// The caller's own process group
    CallerGroup,
    /// A specific process group
    ProcessGroup(i32),
}

/// A fully normalized wait request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitRequest {
    pub hang: HangPolicy,
    pub trace: TracePolicy,
    pub target: WaitTarget,
}

/// Structured outcome of one reap call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReapResult {
    /// The child terminated normally with an exit code
    Exited { pid: i32, code: i32 },
    /// The child was terminated by a signal
    Signaled { pid: i32, signal: &'static str },
    /// The child was stopped (only reported under [`TracePolicy::IncludeStopped`])
    Stopped { pid: i32, signal: &'static str },
    /// Non-blocking wait found no eligible child with a state change
    NoChildReady,
}

/// Parse reap tokens into a [`WaitRequest`].
///
/// Zero or more flags (each at most once) followed by at most one positional
/// identifier. Flag scanning stops at the first token that does not start
/// with `--`, so a negative positional like `-5` is diagnosed as a
/// non-positive identifier rather than an unknown flag.
pub fn parse_wait_request(tokens: &[&str]) -> Result<WaitRequest> {
    let mut no_hang = false;
    let mut include_stopped = false;
    let mut process_group = false;
    let mut idx = 0;

    while idx < tokens.len() && tokens[idx].starts_with("--") {
        let seen = match tokens[idx] {
            "--no-hang" => &mut no_hang,
            "--include-stopped" => &mut include_stopped,
            "--process-group" => &mut process_group,
            other => {
                return Err(CoreError::Usage(format!(
                    "unknown option \"{other}\": {REAP_USAGE}"
                )));
            }
        };
        if *seen {
            return Err(CoreError::Usage(format!(
                "option \"{}\" given more than once: {REAP_USAGE}",
                tokens[idx]
            )));
        }
        *seen = true;
        idx += 1;
    }

    // At most one positional identifier, and nothing after it
    if tokens.len() > idx + 1 {
        return Err(CoreError::Usage(format!("wrong # args: {REAP_USAGE}")));
    }

    let ident = match tokens.get(idx) {
        Some(token) => {
            let value: i64 = token.parse().map_err(|_| {
                CoreError::Usage(format!("expected an integer but got \"{token}\""))
            })?;
            if value <= 0 {
                return Err(CoreError::Usage(
                    "pid or process group must be greater than zero".to_string(),
                ));
            }
            let value = i32::try_from(value).map_err(|_| {
                CoreError::Usage(format!("pid or process group \"{token}\" is out of range"))
            })?;
            Some(value)
        }
        None => None,
    };

    let target = match (process_group, ident) {
        (true, Some(n)) => WaitTarget::ProcessGroup(n),
        (true, None) => WaitTarget::CallerGroup,
        (false, Some(n)) => WaitTarget::Pid(n),
        (false, None) => WaitTarget::AnyChild,
    };

    Ok(WaitRequest {
        hang: if no_hang {
            HangPolicy::NonBlocking
        } else {
            HangPolicy::Block
        },
        trace: if include_stopped {
            TracePolicy::IncludeStopped
        } else {
            TracePolicy::IgnoreStopped
        },
        target,
    })
}

/// Execute a wait request and decode the resulting status.
///
/// Capability gaps are checked before any OS call and surface as
/// [`CoreError::UnsupportedOption`] naming every requested but unavailable
/// option; they are never silently ignored. OS failures (including "no child
/// processes") surface as [`CoreError::Os`] with the OS error text.
pub fn reap(request: &WaitRequest, caps: &PlatformCapabilities) -> Result<ReapResult> {
    ensure_supported(request, caps)?;

    let mut options = WaitPidFlag::empty();
    if request.hang == HangPolicy::NonBlocking {
        options |= WaitPidFlag::WNOHANG;
    }
    if request.trace == TracePolicy::IncludeStopped {
        options |= WaitPidFlag::WUNTRACED;
    }

    // POSIX target encoding: -1 any child, N one pid, 0 the caller's own
    // group, -N the group N.
    let target = match request.target {
        WaitTarget::AnyChild => Pid::from_raw(-1),
        WaitTarget::Pid(n) => Pid::from_raw(n),
        WaitTarget::CallerGroup => Pid::from_raw(0),
        WaitTarget::ProcessGroup(n) => Pid::from_raw(-n),
    };

    debug!("Waiting on target {} with options {:?}", target, options);
    let status = waitpid(target, Some(options))
        .map_err(|e| CoreError::Os(format!("wait failed: {}", e.desc())))?;

    decode_status(status)
}

fn ensure_supported(request: &WaitRequest, caps: &PlatformCapabilities) -> Result<()> {
    let mut missing = Vec::new();
    if request.hang == HangPolicy::NonBlocking && !caps.nonblocking_wait {
        missing.push("--no-hang");
    }
    if request.trace == TracePolicy::IncludeStopped && !caps.stop_tracking {
        missing.push("--include-stopped");
    }
    if matches!(
        request.target,
        WaitTarget::CallerGroup | WaitTarget::ProcessGroup(_)
    ) && !caps.group_wait
    {
        missing.push("--process-group");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::UnsupportedOption(format!(
            "the {} option(s) are not available on this system",
            missing.join(", ")
        )))
    }
}

/// Decode one opaque wait status into a tagged result.
///
/// The three outcome shapes are mutually exclusive by OS contract. Statuses
/// this core never requests (continued, ptrace events) are reported as OS
/// errors rather than guessed at.
fn decode_status(status: WaitStatus) -> Result<ReapResult> {
    match status {
        WaitStatus::Exited(pid, code) => Ok(ReapResult::Exited {
            pid: pid.as_raw(),
            code,
        }),
        WaitStatus::Signaled(pid, signal, _core_dumped) => Ok(ReapResult::Signaled {
            pid: pid.as_raw(),
            signal: signal_name(signal as i32)?,
        }),
        WaitStatus::Stopped(pid, signal) => Ok(ReapResult::Stopped {
            pid: pid.as_raw(),
            signal: signal_name(signal as i32)?,
        }),
        WaitStatus::StillAlive => Ok(ReapResult::NoChildReady),
        other => Err(CoreError::Os(format!("unexpected wait status: {other:?}"))),
    }
}
