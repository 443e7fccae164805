//! Drives a `BreakScheduler` in real time: one tick per second, commands
//! applied between ticks, system notifications delivered off the runtime.

use crate::config;
use crate::messages::Command;
use crate::models::{Delivery, SchedulerEvent};
use crate::notifications::{warning_body, warning_title, NotificationSink};
use crate::scheduler::BreakScheduler;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::{self, Receiver, UnboundedReceiver, UnboundedSender};
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Runs until `shutdown` is cancelled, then hands the scheduler back.
pub async fn run_scheduler(
    mut scheduler: BreakScheduler,
    notifier: Arc<dyn NotificationSink>,
    mut commands: Option<Receiver<Command>>,
    shutdown: CancellationToken,
) -> BreakScheduler {
    info!("Starting break scheduler loop");

    let mut warnings = scheduler.subscribe();
    let (failed_tx, mut failed_rx) = mpsc::unbounded_channel();
    let mut ticker = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Shutdown signal received, stopping scheduler loop");
                break;
            }
            _ = ticker.tick() => {
                scheduler.tick();
            }
            command = next_command(&mut commands) => match command {
                Some(command) => apply_command(&mut scheduler, command),
                None => {
                    debug!("Command channel closed");
                    commands = None;
                }
            },
            Some(minutes) = failed_rx.recv() => {
                scheduler.redeliver_in_app(minutes);
            }
        }

        dispatch_warnings(&mut warnings, &notifier, &failed_tx);
    }

    info!("Break scheduler loop stopped gracefully");
    scheduler
}

pub fn apply_command(scheduler: &mut BreakScheduler, command: Command) {
    debug!("Applying command {:?}", command);
    match command {
        Command::TriggerBreak => {
            scheduler.trigger_break_now();
        }
        Command::StartFocus => {
            scheduler.start_focus_mode();
        }
        Command::EndFocus => {
            scheduler.end_focus_mode();
        }
        Command::ToggleFocus => scheduler.toggle_focus_mode(),
        Command::UpdateSettings(settings) => match config::validate_settings(&settings) {
            Ok(()) => scheduler.update_settings(settings),
            Err(e) => warn!("Rejected settings update: {}", e),
        },
        Command::UpdateSchedule(schedule) => scheduler.update_schedule(schedule),
    }
}

async fn next_command(commands: &mut Option<Receiver<Command>>) -> Option<Command> {
    match commands {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Hands queued system warnings to the sink on the blocking pool without
/// waiting for them. Minutes of warnings that could not be shown come back
/// through `failed` for the in-app indicator.
fn dispatch_warnings(
    warnings: &mut UnboundedReceiver<SchedulerEvent>,
    notifier: &Arc<dyn NotificationSink>,
    failed: &UnboundedSender<u32>,
) {
    while let Ok(event) = warnings.try_recv() {
        let SchedulerEvent::Warning {
            minutes,
            delivery: Delivery::System,
        } = event
        else {
            continue;
        };

        let sink = Arc::clone(notifier);
        let failed = failed.clone();
        tokio::task::spawn_blocking(move || {
            match sink.deliver(warning_title(), &warning_body(minutes)) {
                Ok(()) => debug!("Delivered {} minute warning", minutes),
                Err(e) => {
                    warn!("System notification failed: {}", e.to_safe_string());
                    if failed.send(minutes).is_err() {
                        debug!("Scheduler loop stopped; {} minute warning dropped", minutes);
                    }
                }
            }
        });
    }
}
