use chrono::Utc;

/// Clock the rest of the crate reads time from. The dispatch sweep
/// decides whether a reminder is due by comparing its resolved instant
/// against this clock, and entity `created`/`updated` stamps come from
/// it, so tests can freeze "now" at an exact millisecond.
pub trait ISys: Send + Sync {
    /// Current unix timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// Wall clock, used everywhere outside of tests
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
