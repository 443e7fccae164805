// lookaway - eye-break reminder daemon
// Runs the break scheduler headless and reports through the log

use log::{debug, error, info, warn};
use lookaway::database::{Database, SqliteStore};
use lookaway::models::{Delivery, Phase, SchedulerEvent};
use lookaway::notifications::DesktopNotifier;
use lookaway::scheduler::{BreakScheduler, LocalClock};
use lookaway::utils::{focus_line, logging, next_break_line};
use lookaway::monitor::run_scheduler;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    if let Err(e) = logging::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting lookaway");

    let db = match Database::new().await {
        Ok(database) => database,
        Err(e) => {
            logging::log_error_with_context(&e, "startup");
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let (store, writer) = match SqliteStore::open(&db).await {
        Ok(opened) => opened,
        Err(e) => {
            logging::log_error_with_context(&e, "startup");
            eprintln!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    let mut scheduler = BreakScheduler::new(Box::new(store), Box::new(LocalClock));
    if scheduler.is_paused_by_schedule() {
        info!("Today is not a scheduled day; breaks are paused");
    }
    info!("{}", next_break_line(scheduler.remaining_work_time()));

    let events = scheduler.subscribe();
    let presenter = tokio::spawn(present(events));

    let shutdown = CancellationToken::new();
    let monitor = tokio::spawn(run_scheduler(
        scheduler,
        Arc::new(DesktopNotifier),
        None,
        shutdown.clone(),
    ));

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    shutdown.cancel();

    // Dropping the scheduler drops the store, which lets the writer drain.
    match monitor.await {
        Ok(scheduler) => drop(scheduler),
        Err(e) => error!("Scheduler task failed: {}", e),
    }
    if let Err(e) = writer.await {
        error!("Settings writer failed: {}", e);
    }
    if let Err(e) = presenter.await {
        error!("Presenter task failed: {}", e);
    }
    db.close().await;

    info!("lookaway stopped");
}

/// Stands in for a menu bar: logs what a tray menu would show.
async fn present(mut events: UnboundedReceiver<SchedulerEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            SchedulerEvent::TimeUpdate { remaining_secs } => {
                if remaining_secs % 60 == 0 {
                    info!("{}", next_break_line(remaining_secs));
                } else {
                    debug!("{}", next_break_line(remaining_secs));
                }
            }
            SchedulerEvent::FocusUpdate { remaining_secs } => {
                debug!("{}", focus_line(Phase::FocusActive, remaining_secs));
            }
            SchedulerEvent::FocusChanged { active: false } => {
                info!("{}", focus_line(Phase::Working, 0));
            }
            SchedulerEvent::FocusDenied {
                cooldown_remaining_secs,
            } => {
                info!("Focus Mode available again in {}s", cooldown_remaining_secs);
            }
            SchedulerEvent::BreakStarted { message, .. } => info!("{}", message),
            SchedulerEvent::Warning {
                minutes,
                delivery: Delivery::InApp,
            } => {
                warn!("Break in {} min", minutes);
            }
            SchedulerEvent::CountdownTick { remaining_secs } => {
                debug!("Break in {}s", remaining_secs);
            }
            other => debug!("{:?}", other),
        }
    }
}
