//! Break scheduling state machine.
//!
//! `BreakScheduler` is driven by one `tick()` per second and alternates
//! between a work countdown and a break, with Focus Mode as a manual
//! override that freezes the work countdown. It performs no I/O: events
//! go out through unbounded channels and settings writes go to the
//! injected `SettingsStore`.

use crate::database::settings::{load_schedule, load_settings, save_schedule, save_settings};
use crate::database::SettingsStore;
use crate::models::{Delivery, FocusRequest, Phase, SchedulerEvent, Settings, WeeklySchedule};
use log::{debug, info};
use std::collections::BTreeSet;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub mod clock;

pub use clock::{Clock, FixedClock, LocalClock};

/// Seconds before a break during which the in-app countdown runs.
pub const COUNTDOWN_WINDOW_SECS: u64 = 60;

/// Whole minutes left, rounded up: 300s and 241s both read as 5.
///
/// Rounding up makes a warning offset of `t` minutes fire on the tick that
/// leaves exactly `t * 60` seconds, or on the first tick of a cycle whose
/// interval is exactly `t` minutes.
pub fn minutes_bucket(remaining_secs: u64) -> u64 {
    remaining_secs.div_ceil(60)
}

pub struct BreakScheduler {
    settings: Settings,
    schedule: WeeklySchedule,
    phase: Phase,
    remaining_work: u64,
    remaining_break: u64,
    remaining_focus: u64,
    fired_warnings: BTreeSet<u32>,
    /// Logical seconds ticked so far; the time base for the focus cooldown.
    elapsed: u64,
    last_focus_end: Option<u64>,
    store: Box<dyn SettingsStore>,
    clock: Box<dyn Clock>,
    subscribers: Vec<UnboundedSender<SchedulerEvent>>,
}

impl BreakScheduler {
    /// Builds a scheduler from whatever the store holds, defaults otherwise.
    pub fn new(store: Box<dyn SettingsStore>, clock: Box<dyn Clock>) -> Self {
        let settings = load_settings(store.as_ref());
        let schedule = load_schedule(store.as_ref());
        info!(
            "Scheduler loaded: work {}s, break {}s, focus {}s, schedule {}",
            settings.work_interval,
            settings.break_duration,
            settings.focus_duration,
            if schedule.enabled { "on" } else { "off" }
        );
        Self::from_parts(settings, schedule, store, clock)
    }

    pub fn from_parts(
        mut settings: Settings,
        schedule: WeeklySchedule,
        store: Box<dyn SettingsStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        settings.normalize_timing();
        Self {
            phase: Phase::Working,
            remaining_work: settings.work_interval,
            remaining_break: 0,
            remaining_focus: 0,
            fired_warnings: BTreeSet::new(),
            elapsed: 0,
            last_focus_end: None,
            settings,
            schedule,
            store,
            clock,
            subscribers: Vec::new(),
        }
    }

    /// Registers a new listener. Receivers that are dropped get pruned on
    /// the next event.
    pub fn subscribe(&mut self) -> UnboundedReceiver<SchedulerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn tick(&mut self) {
        self.elapsed += 1;

        match self.phase {
            Phase::OnBreak => {
                self.remaining_break = self.remaining_break.saturating_sub(1);
                self.emit(SchedulerEvent::BreakUpdate {
                    remaining_secs: self.remaining_break,
                });
                if self.remaining_break == 0 {
                    self.end_break();
                }
            }
            Phase::FocusActive => {
                self.remaining_focus = self.remaining_focus.saturating_sub(1);
                self.emit(SchedulerEvent::FocusUpdate {
                    remaining_secs: self.remaining_focus,
                });
                if self.remaining_focus == 0 {
                    self.finish_focus();
                }
            }
            Phase::Working => {
                if !self.is_today_active() {
                    self.emit(SchedulerEvent::TimeUpdate {
                        remaining_secs: self.remaining_work,
                    });
                    return;
                }

                self.remaining_work = self.remaining_work.saturating_sub(1);
                self.emit(SchedulerEvent::TimeUpdate {
                    remaining_secs: self.remaining_work,
                });

                self.check_notifications();

                if self.remaining_work == 0 {
                    self.start_break();
                }
            }
        }
    }

    /// Starts a break immediately. Returns false without side effects when
    /// on break, focusing, or today is switched off.
    pub fn trigger_break_now(&mut self) -> bool {
        if self.phase != Phase::Working || !self.is_today_active() {
            debug!("Ignoring break request in {:?} phase", self.phase);
            return false;
        }
        info!("Break requested manually");
        self.start_break();
        true
    }

    pub fn start_focus_mode(&mut self) -> FocusRequest {
        if self.phase != Phase::Working {
            debug!("Ignoring focus request in {:?} phase", self.phase);
            return FocusRequest::Ignored;
        }

        if let Some(remaining_secs) = self.focus_cooldown_remaining() {
            info!("Focus Mode cooling down, {}s left", remaining_secs);
            self.emit(SchedulerEvent::FocusDenied {
                cooldown_remaining_secs: remaining_secs,
            });
            return FocusRequest::CoolingDown { remaining_secs };
        }

        info!("Focus Mode on for {}s", self.settings.focus_duration);
        self.phase = Phase::FocusActive;
        self.remaining_focus = self.settings.focus_duration;
        self.emit(SchedulerEvent::FocusChanged { active: true });
        FocusRequest::Started
    }

    pub fn end_focus_mode(&mut self) -> bool {
        if self.phase != Phase::FocusActive {
            return false;
        }
        self.finish_focus();
        true
    }

    pub fn toggle_focus_mode(&mut self) {
        if self.phase == Phase::FocusActive {
            self.end_focus_mode();
        } else {
            self.start_focus_mode();
        }
    }

    /// Replaces the settings wholesale. Unless a break is running, the work
    /// countdown restarts from the new interval.
    pub fn update_settings(&mut self, mut settings: Settings) {
        settings.normalize_timing();
        self.settings = settings;
        save_settings(self.store.as_mut(), &self.settings);
        info!(
            "Settings updated: work {}s, break {}s, focus {}s",
            self.settings.work_interval, self.settings.break_duration, self.settings.focus_duration
        );

        self.emit(SchedulerEvent::SettingsChanged);

        if self.phase != Phase::OnBreak {
            self.reset_work_cycle();
            self.emit(SchedulerEvent::TimeUpdate {
                remaining_secs: self.remaining_work,
            });
        }
    }

    /// Replaces the weekly schedule. Running breaks and focus sessions are
    /// left alone; the new schedule applies from the next tick.
    pub fn update_schedule(&mut self, schedule: WeeklySchedule) {
        self.schedule = schedule;
        save_schedule(self.store.as_mut(), &self.schedule);
        info!("Schedule updated (enabled: {})", self.schedule.enabled);
        self.emit(SchedulerEvent::SettingsChanged);
    }

    /// Re-emits a warning for the in-app indicator after the system
    /// notification could not be shown.
    pub fn redeliver_in_app(&mut self, minutes: u32) {
        self.emit(SchedulerEvent::Warning {
            minutes,
            delivery: Delivery::InApp,
        });
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_work_time(&self) -> u64 {
        self.remaining_work
    }

    pub fn remaining_break_time(&self) -> u64 {
        self.remaining_break
    }

    pub fn remaining_focus_time(&self) -> u64 {
        self.remaining_focus
    }

    pub fn fired_warnings(&self) -> &BTreeSet<u32> {
        &self.fired_warnings
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    pub fn store(&self) -> &dyn SettingsStore {
        self.store.as_ref()
    }

    pub fn is_today_active(&self) -> bool {
        self.schedule.is_active_on(self.clock.weekday())
    }

    pub fn is_paused_by_schedule(&self) -> bool {
        self.phase == Phase::Working && !self.is_today_active()
    }

    /// Seconds until Focus Mode may start again, if a cooldown is running.
    pub fn focus_cooldown_remaining(&self) -> Option<u64> {
        if !self.settings.focus_cooldown_enabled {
            return None;
        }
        let ended_at = self.last_focus_end?;
        let since = self.elapsed.saturating_sub(ended_at);
        let cooldown = self.settings.focus_cooldown_secs();
        (since < cooldown).then(|| cooldown - since)
    }

    fn check_notifications(&mut self) {
        if !self.settings.notifications_enabled {
            return;
        }

        let use_system = self.settings.use_system_notifications;
        let bucket = minutes_bucket(self.remaining_work);

        if let Ok(minutes) = u32::try_from(bucket) {
            if self.settings.notification_timing.contains(&minutes)
                && self.fired_warnings.insert(minutes)
            {
                let delivery = if use_system {
                    Delivery::System
                } else {
                    Delivery::InApp
                };
                info!("Break warning: {} min remaining ({:?})", minutes, delivery);
                self.emit(SchedulerEvent::Warning { minutes, delivery });
            }
        }

        if !use_system && self.remaining_work > 0 && self.remaining_work <= COUNTDOWN_WINDOW_SECS {
            self.emit(SchedulerEvent::CountdownTick {
                remaining_secs: self.remaining_work,
            });
        }
    }

    fn start_break(&mut self) {
        info!("Break starting for {}s", self.settings.break_duration);
        self.phase = Phase::OnBreak;
        self.remaining_break = self.settings.break_duration;
        self.emit(SchedulerEvent::BreakStarted {
            duration_secs: self.settings.break_duration,
            message: self.settings.break_message.clone(),
        });
    }

    fn end_break(&mut self) {
        info!("Break finished");
        self.phase = Phase::Working;
        self.remaining_break = 0;
        self.emit(SchedulerEvent::BreakEnded);
        self.reset_work_cycle();
    }

    fn finish_focus(&mut self) {
        info!("Focus Mode off");
        self.phase = Phase::Working;
        if self.remaining_focus > 0 {
            self.remaining_focus = 0;
            self.emit(SchedulerEvent::FocusUpdate { remaining_secs: 0 });
        }
        self.last_focus_end = Some(self.elapsed);
        self.emit(SchedulerEvent::FocusChanged { active: false });
    }

    fn reset_work_cycle(&mut self) {
        self.remaining_work = self.settings.work_interval;
        self.fired_warnings.clear();
    }

    fn emit(&mut self, event: SchedulerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
