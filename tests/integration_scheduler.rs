use chrono::Weekday;
use lookaway::{
    BreakScheduler, Delivery, FixedClock, FocusRequest, MemoryStore, Phase, PrefKey,
    SchedulerEvent, Settings, SettingsStore, WeeklySchedule,
};
use tokio::sync::mpsc::UnboundedReceiver;

fn build(
    settings: Settings,
    schedule: WeeklySchedule,
    clock: &FixedClock,
) -> (BreakScheduler, UnboundedReceiver<SchedulerEvent>) {
    let mut scheduler = BreakScheduler::from_parts(
        settings,
        schedule,
        Box::new(MemoryStore::new()),
        Box::new(clock.clone()),
    );
    let events = scheduler.subscribe();
    (scheduler, events)
}

fn drain(events: &mut UnboundedReceiver<SchedulerEvent>) -> Vec<SchedulerEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

fn count_breaks(events: &[SchedulerEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, SchedulerEvent::BreakStarted { .. }))
        .count()
}

#[test]
fn test_an_hour_of_default_cycles() {
    let clock = FixedClock::new(Weekday::Mon);
    let (mut scheduler, mut events) = build(Settings::default(), WeeklySchedule::default(), &clock);

    // 20 min of work plus a 20 s break, three times
    for _ in 0..3 * (1200 + 20) {
        scheduler.tick();
    }

    assert_eq!(scheduler.phase(), Phase::Working);
    assert_eq!(scheduler.remaining_work_time(), 1200);

    let events = drain(&mut events);
    assert_eq!(count_breaks(&events), 3);
    let ended = events
        .iter()
        .filter(|event| **event == SchedulerEvent::BreakEnded)
        .count();
    assert_eq!(ended, 3);

    let mut warnings: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            SchedulerEvent::Warning {
                minutes,
                delivery: Delivery::System,
            } => Some(*minutes),
            _ => None,
        })
        .collect();
    warnings.sort_unstable();
    assert_eq!(warnings, vec![1, 1, 1, 2, 2, 2, 5, 5, 5]);
}

#[test]
fn test_weekend_pause_then_monday_resume() {
    let clock = FixedClock::new(Weekday::Sat);
    let schedule = WeeklySchedule {
        enabled: true,
        ..WeeklySchedule::default()
    };
    let settings = Settings {
        work_interval: 60,
        break_duration: 10,
        ..Settings::default()
    };
    let (mut scheduler, mut events) = build(settings, schedule, &clock);

    for _ in 0..600 {
        scheduler.tick();
    }
    assert!(scheduler.is_paused_by_schedule());
    assert_eq!(scheduler.remaining_work_time(), 60);
    assert!(!scheduler.trigger_break_now());
    assert_eq!(count_breaks(&drain(&mut events)), 0);

    clock.set(Weekday::Mon);
    for _ in 0..60 {
        scheduler.tick();
    }
    assert_eq!(scheduler.phase(), Phase::OnBreak);
    assert_eq!(count_breaks(&drain(&mut events)), 1);
}

#[test]
fn test_disabling_schedule_resumes_countdown() {
    let clock = FixedClock::new(Weekday::Sun);
    let schedule = WeeklySchedule {
        enabled: true,
        ..WeeklySchedule::default()
    };
    let (mut scheduler, _events) = build(Settings::default(), schedule, &clock);

    scheduler.tick();
    assert_eq!(scheduler.remaining_work_time(), 1200);

    scheduler.update_schedule(WeeklySchedule {
        enabled: false,
        ..schedule
    });
    scheduler.tick();
    assert_eq!(scheduler.remaining_work_time(), 1199);
    assert!(scheduler.is_today_active());
}

#[test]
fn test_break_crossing_into_inactive_day_still_finishes() {
    let clock = FixedClock::new(Weekday::Fri);
    let schedule = WeeklySchedule {
        enabled: true,
        ..WeeklySchedule::default()
    };
    let settings = Settings {
        work_interval: 60,
        break_duration: 10,
        ..Settings::default()
    };
    let (mut scheduler, _events) = build(settings, schedule, &clock);

    assert!(scheduler.trigger_break_now());
    clock.set(Weekday::Sat);
    for _ in 0..10 {
        scheduler.tick();
    }

    assert_eq!(scheduler.phase(), Phase::Working);
    assert_eq!(scheduler.remaining_work_time(), 60);
    assert!(scheduler.is_paused_by_schedule());
}

#[test]
fn test_focus_session_postpones_break() {
    let clock = FixedClock::new(Weekday::Wed);
    let settings = Settings {
        work_interval: 120,
        focus_duration: 900,
        ..Settings::default()
    };
    let (mut scheduler, mut events) = build(settings, WeeklySchedule::default(), &clock);

    for _ in 0..100 {
        scheduler.tick();
    }
    assert_eq!(scheduler.start_focus_mode(), FocusRequest::Started);

    for _ in 0..900 {
        scheduler.tick();
    }
    assert_eq!(scheduler.phase(), Phase::Working);
    assert_eq!(scheduler.remaining_work_time(), 20);
    assert_eq!(count_breaks(&drain(&mut events)), 0);

    for _ in 0..20 {
        scheduler.tick();
    }
    assert_eq!(scheduler.phase(), Phase::OnBreak);
}

#[test]
fn test_warning_fired_before_focus_is_not_repeated() {
    let clock = FixedClock::new(Weekday::Wed);
    let settings = Settings {
        work_interval: 300,
        ..Settings::default()
    };
    let (mut scheduler, mut events) = build(settings, WeeklySchedule::default(), &clock);

    scheduler.tick();
    scheduler.start_focus_mode();
    scheduler.end_focus_mode();
    scheduler.tick();

    let fives = drain(&mut events)
        .into_iter()
        .filter(|event| matches!(event, SchedulerEvent::Warning { minutes: 5, .. }))
        .count();
    assert_eq!(fives, 1);
    assert!(scheduler.fired_warnings().contains(&5));
}

#[test]
fn test_focus_cooldown_counts_break_time() {
    let clock = FixedClock::new(Weekday::Thu);
    let settings = Settings {
        work_interval: 60,
        break_duration: 120,
        focus_duration: 900,
        focus_cooldown_enabled: true,
        focus_cooldown_minutes: 5,
        ..Settings::default()
    };
    let (mut scheduler, _events) = build(settings, WeeklySchedule::default(), &clock);

    scheduler.start_focus_mode();
    scheduler.end_focus_mode();

    // 60 s of work then a 120 s break
    for _ in 0..180 {
        scheduler.tick();
    }
    assert_eq!(scheduler.phase(), Phase::Working);
    assert_eq!(scheduler.focus_cooldown_remaining(), Some(120));
    assert_eq!(
        scheduler.start_focus_mode(),
        FocusRequest::CoolingDown { remaining_secs: 120 }
    );
}

#[test]
fn test_settings_written_through_store() {
    let mut store = MemoryStore::new();
    store.set(PrefKey::WorkInterval, "600".to_string());
    store.set(PrefKey::MondayEnabled, "false".to_string());

    let mut scheduler = BreakScheduler::new(Box::new(store), Box::new(FixedClock::new(Weekday::Mon)));
    assert_eq!(scheduler.remaining_work_time(), 600);
    assert!(!scheduler.schedule().monday);

    let updated = Settings {
        break_message: "Stretch".to_string(),
        ..scheduler.settings().clone()
    };
    scheduler.update_settings(updated);

    let store = scheduler.store();
    assert_eq!(store.get(PrefKey::WorkInterval).as_deref(), Some("600"));
    assert_eq!(store.get(PrefKey::BreakMessage).as_deref(), Some("Stretch"));
    assert_eq!(store.get(PrefKey::MondayEnabled).as_deref(), Some("false"));
}
