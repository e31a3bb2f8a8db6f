//! Periodic trigger for the daily job.
//!
//! # Responsibility
//! - Fire `run_daily` once per day after a configured local time.
//! - Keep the due-time arithmetic pure so it is testable without sleeping.
//!
//! # Invariants
//! - A failed run is logged and retried at the next due time, never in a tight loop.

use chrono::{Days, Local, NaiveDateTime, NaiveTime};
use log::{error, info};
use pyno_core::{DailyNoteService, NoteStore};
use std::thread;
use std::time::Duration;

const TICK: Duration = Duration::from_secs(60);

/// First instant strictly after `now` at which the job is due.
///
/// Returns `None` only when the next day is outside chrono's date range.
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> Option<NaiveDateTime> {
    let same_day = now.date().and_time(at);
    if same_day > now {
        return Some(same_day);
    }
    now.date()
        .checked_add_days(Days::new(1))
        .map(|day| day.and_time(at))
}

/// Runs the daily job now, then once per day after `at`. Never returns normally.
pub fn run<S: NoteStore>(
    service: &mut DailyNoteService<S>,
    at: NaiveTime,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("event=watch_start module=cli status=ok at={at}");
    let mut now = Local::now().naive_local();
    run_once(service, now);

    let mut next = next_run_after(now, at).ok_or("next run is out of calendar range")?;
    info!("event=watch_schedule module=cli status=ok next={next}");
    loop {
        thread::sleep(TICK);
        now = Local::now().naive_local();
        if now < next {
            continue;
        }
        run_once(service, now);
        next = next_run_after(now, at).ok_or("next run is out of calendar range")?;
        info!("event=watch_schedule module=cli status=ok next={next}");
    }
}

fn run_once<S: NoteStore>(service: &mut DailyNoteService<S>, now: NaiveDateTime) {
    let today = now.date();
    match service.run_daily(today) {
        Ok(report) => println!("{}", crate::describe_report(today, &report)),
        Err(err) => {
            error!("event=watch_run module=cli status=error date={today} error={err}");
            eprintln!("daily run for {today} failed: {err}");
        }
    }
}
