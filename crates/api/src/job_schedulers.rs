use crate::reminder::SendDueRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::{interval, sleep_until, Instant};
use remindu_infra::ReminduContext;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Seconds until the next minute boundary, shifted back by
/// `secs_before_min`
pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Spawns the job that runs the send reminders sweep on a fixed
/// interval, aligned to minute boundaries. A tick that fires while the
/// previous sweep is still running is skipped, so one process never has
/// two sweeps dispatching the same reminders.
pub fn start_send_reminders_job(ctx: ReminduContext) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        sleep_until(Instant::now() + Duration::from_secs(secs_to_next_run as u64)).await;

        let mut tick_interval =
            interval(Duration::from_secs(ctx.config.reminders_job_interval_secs));
        let sweep_in_progress = Arc::new(AtomicBool::new(false));
        loop {
            tick_interval.tick().await;
            if sweep_in_progress.swap(true, Ordering::SeqCst) {
                warn!("Previous send reminders sweep is still running, skipping this tick");
                continue;
            }

            let context = ctx.clone();
            let guard = sweep_in_progress.clone();
            actix_web::rt::spawn(async move {
                // Errors are logged by the usecase executor, a failed
                // sweep never stops the job
                let _ = execute(SendDueRemindersUseCase, &context).await;
                guard.store(false, Ordering::SeqCst);
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_delay_works() {
        assert_eq!(get_start_delay(50 * 1000, 5), 5);
        assert_eq!(get_start_delay(50 * 1000, 10), 60);
        assert_eq!(get_start_delay(50 * 1000, 15), 55);
        assert_eq!(get_start_delay(60 * 1000, 60), 60);
        assert_eq!(get_start_delay(60 * 1000, 10), 50);
        assert_eq!(get_start_delay(59 * 1000, 0), 1);
        assert_eq!(get_start_delay(59 * 1000, 1), 60);
    }
}
