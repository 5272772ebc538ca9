//! Integration tests for fork/exec/reap round trips
//!
//! These tests create real children and reap them. Every wait targets a
//! specific pid or process group: which of several eligible children an
//! any-child wait returns is unspecified by POSIX, and the test harness runs
//! tests in parallel, so waiting on -1 here would race with other tests'
//! children.
//!
//! Child sides of a fork restrict themselves to async-signal-safe calls
//! (exec, pause, _exit); argument vectors are built before forking.

#![cfg(unix)]
#![allow(unsafe_code)] // Required for libc calls in forked children

use forklift_core::argv::ArgumentVector;
use forklift_core::commands::{create_child, format_reap, reap_command};
use forklift_core::config::PlatformCapabilities;
use forklift_core::launch::{replace_image, Forked};
use forklift_core::wait::{reap, HangPolicy, ReapResult, TracePolicy, WaitRequest, WaitTarget};
use forklift_core::CoreError;
use nix::sys::signal::{kill, killpg, Signal};
use nix::unistd::{setpgid, Pid};

/// Fork and run `body` on the child side. The child never returns to the
/// test harness: if `body` itself returns, the child exits 0.
fn fork_child(body: impl FnOnce()) -> Pid {
    match create_child().expect("fork failed") {
        Forked::Parent { child } => child,
        Forked::Child => {
            body();
            unsafe { libc::_exit(0) }
        }
    }
}

fn blocking_pid_request(child: Pid) -> WaitRequest {
    WaitRequest {
        hang: HangPolicy::Block,
        trace: TracePolicy::IgnoreStopped,
        target: WaitTarget::Pid(child.as_raw()),
    }
}

#[test]
fn test_reap_returns_exit_code() {
    let child = fork_child(|| unsafe { libc::_exit(7) });

    let outcome = reap(&blocking_pid_request(child), &PlatformCapabilities::full())
        .expect("reap failed");
    assert_eq!(
        outcome,
        ReapResult::Exited {
            pid: child.as_raw(),
            code: 7,
        }
    );
}

#[test]
fn test_child_is_reaped_exactly_once() {
    let child = fork_child(|| unsafe { libc::_exit(0) });
    let caps = PlatformCapabilities::full();

    let outcome = reap(&blocking_pid_request(child), &caps).expect("first reap failed");
    assert_eq!(
        outcome,
        ReapResult::Exited {
            pid: child.as_raw(),
            code: 0,
        }
    );

    // The child's process-table entry is gone; a second reap is a real error
    let err = reap(&blocking_pid_request(child), &caps).unwrap_err();
    assert!(matches!(err, CoreError::Os(_)), "got: {err:?}");
}

#[test]
fn test_signaled_child_reports_signal_name() {
    let child = fork_child(|| loop {
        unsafe { libc::pause() };
    });

    kill(child, Signal::SIGKILL).expect("kill failed");

    let outcome = reap(&blocking_pid_request(child), &PlatformCapabilities::full())
        .expect("reap failed");
    assert_eq!(
        outcome,
        ReapResult::Signaled {
            pid: child.as_raw(),
            signal: "KILL",
        }
    );
}

#[test]
fn test_exec_roundtrip_through_shell() {
    // Built before the fork so the child only has to exec
    let argv = ArgumentVector::new("sh", &["-c".to_string(), "exit 7".to_string()])
        .expect("argv should build");

    let child = fork_child(move || {
        let _ = replace_image(&argv);
        unsafe { libc::_exit(127) }
    });

    let outcome = reap(&blocking_pid_request(child), &PlatformCapabilities::full())
        .expect("reap failed");
    assert_eq!(
        outcome,
        ReapResult::Exited {
            pid: child.as_raw(),
            code: 7,
        }
    );
}

#[test]
fn test_nonblocking_reap_reports_no_child_ready() {
    let child = fork_child(|| loop {
        unsafe { libc::pause() };
    });
    let caps = PlatformCapabilities::full();

    // Nothing has changed state yet: must not block, must not error
    let pid_token = child.as_raw().to_string();
    let outcome = reap_command(&["--no-hang", &pid_token], &caps).expect("reap failed");
    assert_eq!(outcome, ReapResult::NoChildReady);
    assert_eq!(format_reap(&outcome), None);

    kill(child, Signal::SIGKILL).expect("kill failed");
    let outcome = reap(&blocking_pid_request(child), &caps).expect("reap failed");
    assert_eq!(
        outcome,
        ReapResult::Signaled {
            pid: child.as_raw(),
            signal: "KILL",
        }
    );
}

#[test]
fn test_stopped_child_reported_when_requested() {
    let child = fork_child(|| loop {
        unsafe { libc::pause() };
    });
    let caps = PlatformCapabilities::full();

    kill(child, Signal::SIGSTOP).expect("stop failed");

    let request = WaitRequest {
        hang: HangPolicy::Block,
        trace: TracePolicy::IncludeStopped,
        target: WaitTarget::Pid(child.as_raw()),
    };
    let outcome = reap(&request, &caps).expect("reap failed");
    assert_eq!(
        outcome,
        ReapResult::Stopped {
            pid: child.as_raw(),
            signal: "STOP",
        }
    );

    // SIGKILL terminates even a stopped process
    kill(child, Signal::SIGKILL).expect("kill failed");
    let outcome = reap(&blocking_pid_request(child), &caps).expect("reap failed");
    assert_eq!(
        outcome,
        ReapResult::Signaled {
            pid: child.as_raw(),
            signal: "KILL",
        }
    );
}

#[test]
fn test_process_group_target() {
    // Both sides call setpgid so the group exists no matter which runs first
    let child = fork_child(|| {
        let _ = setpgid(Pid::from_raw(0), Pid::from_raw(0));
        loop {
            unsafe { libc::pause() };
        }
    });
    let _ = setpgid(child, child);

    killpg(child, Signal::SIGKILL).expect("killpg failed");

    let request = WaitRequest {
        hang: HangPolicy::Block,
        trace: TracePolicy::IgnoreStopped,
        target: WaitTarget::ProcessGroup(child.as_raw()),
    };
    let outcome = reap(&request, &PlatformCapabilities::full()).expect("group reap failed");
    assert_eq!(
        outcome,
        ReapResult::Signaled {
            pid: child.as_raw(),
            signal: "KILL",
        }
    );
}

#[test]
fn test_reaping_missing_child_is_an_os_error() {
    // Not a child of this process, so the OS reports an error we must surface
    let request = WaitRequest {
        hang: HangPolicy::NonBlocking,
        trace: TracePolicy::IgnoreStopped,
        target: WaitTarget::Pid(999_999),
    };
    let err = reap(&request, &PlatformCapabilities::full()).unwrap_err();
    match err {
        CoreError::Os(msg) => assert!(msg.contains("wait failed"), "msg: {msg}"),
        e => panic!("Expected Os error, got: {e}"),
    }
}

#[test]
fn test_exec_failure_returns_error_and_caller_continues() {
    let argv = ArgumentVector::new("definitely_not_a_real_program_12345", &[])
        .expect("argv should build");

    // On failure exec returns and this process is unaffected
    let err = replace_image(&argv).unwrap_err();
    match err {
        CoreError::Os(msg) => assert!(msg.contains("definitely_not_a_real_program_12345")),
        e => panic!("Expected Os error, got: {e}"),
    }
}

#[test]
fn test_run_outcome_formats_for_host() {
    let child = fork_child(|| unsafe { libc::_exit(3) });

    let outcome = reap(&blocking_pid_request(child), &PlatformCapabilities::full())
        .expect("reap failed");
    assert_eq!(
        format_reap(&outcome),
        Some(format!("{} EXIT 3", child.as_raw()))
    );
}
