//! Lightweight internal diagnostics, compiled to a no-op outside of test builds.
//!
//! A normal `println!`/`eprintln!` trace is awkward to assert against in the fixture harness
//! under `tests/`, since a failure there should report what the state machine actually did, not
//! just the final mismatched token. `trace_log` instead accumulates into a thread-local buffer
//! that a test can inspect directly.

#[cfg(test)]
use std::cell::RefCell;

#[cfg(test)]
thread_local! {
    static OUTPUT: RefCell<String> = RefCell::default();
}

/// Append a line to the current thread's trace buffer. A no-op outside of test builds.
pub(crate) fn trace_log(msg: &str) {
    #[cfg(test)]
    OUTPUT.with(|cell| {
        let mut buf = cell.borrow_mut();
        buf.push_str(msg);
        buf.push('\n');
        if buf.len() > 1024 * 1024 {
            buf.clear();
            buf.push_str("[truncated output]\n");
        }
    });
    #[cfg(not(test))]
    let _ = msg;
}

/// Take and clear the current thread's accumulated trace buffer.
#[cfg(test)]
pub(crate) fn take_trace() -> String {
    OUTPUT.with(|cell| cell.borrow_mut().split_off(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_log_accumulates_per_thread() {
        take_trace();
        trace_log("switch_to Data");
        trace_log("reconsume_in TagOpen");
        assert_eq!(take_trace(), "switch_to Data\nreconsume_in TagOpen\n");
        assert_eq!(take_trace(), "");
    }
}
