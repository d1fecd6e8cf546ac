use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::TimingConfig;
use crate::core::pe::ProcessingElement;
use crate::sync::shared::{ControlCommand, PeControl};

/// Returns the command register to `Idle` and clears `running`, unless a
/// newer command was issued while this one was executing.
fn finish(control: &PeControl, cmd: ControlCommand) {
    if control.finish(cmd) {
        control.running.store(false, Ordering::Release);
    }
}

fn stop_requested(control: &PeControl) -> bool {
    control.stop_requested.load(Ordering::Acquire)
}

/// What one pass over the command register did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing to do.
    Idle,
    /// One cycle ran under the given command.
    Cycle(ControlCommand),
    /// A command completed without running a cycle in this pass.
    Finished,
}

/// Services the command register once.
///
/// Runs at most one cycle. `StepUntil` and `StepForever` check
/// `stop_requested` before every cycle, so once a stop is observed no
/// further cycle starts and the command register returns to `Idle`.
pub fn dispatch(pe: &mut ProcessingElement, control: &PeControl) -> Dispatch {
    let Some(cmd) = control.command() else {
        warn!("PE{} ignoring unknown command", pe.id);
        control.set_command(ControlCommand::Idle);
        control.running.store(false, Ordering::Release);
        return Dispatch::Finished;
    };

    match cmd {
        ControlCommand::Idle => Dispatch::Idle,
        ControlCommand::Step => {
            pe.execute_cycle();
            finish(control, cmd);
            Dispatch::Cycle(cmd)
        }
        ControlCommand::StepUntil => {
            let remaining = control.step_count.load(Ordering::Acquire);
            if remaining == 0 || stop_requested(control) {
                debug!("PE{} step-until finished", pe.id);
                finish(control, cmd);
                return Dispatch::Finished;
            }
            pe.execute_cycle();
            control.step_count.store(remaining - 1, Ordering::Release);
            Dispatch::Cycle(cmd)
        }
        ControlCommand::StepForever => {
            if stop_requested(control) {
                debug!("PE{} step-forever stopped", pe.id);
                finish(control, cmd);
                return Dispatch::Finished;
            }
            pe.execute_cycle();
            Dispatch::Cycle(cmd)
        }
        ControlCommand::Reset => {
            pe.reset();
            finish(control, cmd);
            Dispatch::Finished
        }
    }
}

/// Main loop of a Processing Element thread.
///
/// Polls the element's command register until the global stop flag is
/// set, one [`dispatch`] per iteration.
///
/// # Arguments
///
/// * `pe` - The element, owned by this thread from now on
/// * `timing` - Polling and pacing intervals
pub fn run(mut pe: ProcessingElement, timing: TimingConfig) {
    let shared = pe.shared.clone();
    let control = &shared.pe(pe.id).control;
    let idle_sleep = Duration::from_micros(timing.idle_sleep_us);
    let forever_sleep = Duration::from_micros(timing.step_forever_sleep_us);

    info!("PE{} thread started", pe.id);

    while !shared.stop_requested() {
        match dispatch(&mut pe, control) {
            Dispatch::Idle => thread::sleep(idle_sleep),
            Dispatch::Cycle(ControlCommand::StepForever) if !forever_sleep.is_zero() => {
                thread::sleep(forever_sleep)
            }
            Dispatch::Cycle(_) | Dispatch::Finished => {}
        }
    }

    info!("PE{} thread stopped", pe.id);
}
