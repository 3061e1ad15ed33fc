//! Forwards SIGINT and SIGTERM received by the orchestrator to the process
//! group of the running build engine.
//!
//! The engine is spawned in its own process group, so a signal aimed at the
//! orchestrator alone still reaches the engine and everything it started.

use log::info;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::errors::Result;

/// Process group of the engine being waited on, 0 when none is running.
static ENGINE_GROUP: AtomicI32 = AtomicI32::new(0);

/// First interrupting signal received, 0 when none.
static RECEIVED: AtomicI32 = AtomicI32::new(0);

#[cfg(unix)]
pub fn install() -> Result<()> {
    use crate::errors::BuildError;
    use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

    let action = SigAction::new(
        SigHandler::Handler(forward),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    for signal in [Signal::SIGINT, Signal::SIGTERM].iter() {
        unsafe { sigaction(*signal, &action) }.map_err(|errno| BuildError::SignalHandler {
            source: errno.into(),
        })?;
    }
    info!("forwarding SIGINT and SIGTERM to the build engine");

    Ok(())
}

#[cfg(not(unix))]
pub fn install() -> Result<()> {
    info!("signal forwarding is only supported on unix");
    Ok(())
}

#[cfg(unix)]
extern "C" fn forward(signal: std::os::raw::c_int) {
    let _ = RECEIVED.compare_exchange(0, signal, Ordering::SeqCst, Ordering::SeqCst);

    let group = ENGINE_GROUP.load(Ordering::SeqCst);
    if group > 0 {
        signal_group(group, signal);
    }
}

#[cfg(unix)]
fn signal_group(group: i32, signal: i32) {
    use nix::{
        sys::signal::{killpg, Signal},
        unistd::Pid,
    };
    use std::convert::TryFrom;

    if let Ok(signal) = Signal::try_from(signal) {
        // The group may already be gone, nothing left to stop then.
        let _ = killpg(Pid::from_raw(group), signal);
    }
}

#[cfg(not(unix))]
fn signal_group(_group: i32, _signal: i32) {}

/// The signal that interrupted the orchestrator, if any.
pub fn received() -> Option<i32> {
    match RECEIVED.load(Ordering::SeqCst) {
        0 => None,
        signal => Some(signal),
    }
}

/// Marks `pid` as the running engine until the guard is dropped.
///
/// A signal that arrived between spawning and tracking is forwarded here.
pub fn track(pid: u32) -> EngineGuard {
    let group = pid as i32;
    ENGINE_GROUP.store(group, Ordering::SeqCst);

    if let Some(signal) = received() {
        signal_group(group, signal);
    }

    EngineGuard
}

pub struct EngineGuard;

impl Drop for EngineGuard {
    fn drop(&mut self) {
        ENGINE_GROUP.store(0, Ordering::SeqCst);
    }
}
