//! Signal number to canonical name resolution
//!
//! The signal table is the process-wide static mapping provided by the
//! platform signal enum; it is read-only and needs no initialization beyond
//! process start. Names are reported without the `SIG` prefix (9 -> "KILL"),
//! matching the wire shape of reap results.

use crate::{CoreError, Result};
use nix::sys::signal::Signal;

/// Map a numeric signal to its canonical symbolic name.
///
/// Fails with [`CoreError::UnknownSignal`] for numbers outside the known
/// table. Values produced by the OS's own status encoding are always in
/// range, so that failure is not expected in normal operation.
pub fn signal_name(signo: i32) -> Result<&'static str> {
    let signal = Signal::try_from(signo).map_err(|_| CoreError::UnknownSignal(signo))?;
    let name = signal.as_str();
    Ok(name.strip_prefix("SIG").unwrap_or(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_signal_names() {
        assert_eq!(signal_name(Signal::SIGKILL as i32).unwrap(), "KILL");
        assert_eq!(signal_name(Signal::SIGTERM as i32).unwrap(), "TERM");
        assert_eq!(signal_name(Signal::SIGSTOP as i32).unwrap(), "STOP");
        assert_eq!(signal_name(Signal::SIGINT as i32).unwrap(), "INT");
    }

    #[test]
    fn test_kill_is_nine() {
        // The classic encoding: signal 9 is KILL everywhere
        assert_eq!(signal_name(9).unwrap(), "KILL");
    }

    #[test]
    fn test_out_of_range_rejected() {
        for signo in [0, -1, 4096] {
            match signal_name(signo) {
                Err(CoreError::UnknownSignal(n)) => assert_eq!(n, signo),
                other => panic!("Expected UnknownSignal for {signo}, got: {other:?}"),
            }
        }
    }
}
