//! Time and timestamp helpers.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Wall-clock timestamp in the controller's configured timezone.
pub type Timestamp = DateTime<Tz>;

/// Return the current time in the given timezone.
#[must_use]
pub fn now_in(tz: Tz) -> Timestamp {
    Utc::now().with_timezone(&tz)
}

/// Resolve a local wall-clock time in `tz` to a concrete instant.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times that
/// do not exist (DST spring-forward gap) are pushed one hour forward.
#[must_use]
pub fn resolve_local(tz: Tz, naive: NaiveDateTime) -> Timestamp {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(ts) | LocalResult::Ambiguous(ts, _) => ts,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn should_return_current_time_in_timezone() {
        let before = Utc::now();
        let ts = now_in(chrono_tz::Europe::Moscow);
        let after = Utc::now();
        assert!(ts.with_timezone(&Utc) >= before);
        assert!(ts.with_timezone(&Utc) <= after);
        assert_eq!(ts.timezone(), chrono_tz::Europe::Moscow);
    }

    #[test]
    fn should_resolve_unambiguous_local_time() {
        let naive = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();
        let ts = resolve_local(chrono_tz::Europe::Berlin, naive);
        assert_eq!(ts.naive_local(), naive);
    }

    #[test]
    fn should_pick_earlier_instant_when_ambiguous() {
        // 02:30 happens twice in Berlin on 2024-10-27.
        let naive = NaiveDate::from_ymd_opt(2024, 10, 27)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let ts = resolve_local(chrono_tz::Europe::Berlin, naive);
        assert_eq!(ts.naive_local(), naive);
        assert_eq!(ts.naive_utc().hour(), 0);
    }

    #[test]
    fn should_skip_forward_over_dst_gap() {
        // 02:30 does not exist in Berlin on 2024-03-31.
        let naive = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let ts = resolve_local(chrono_tz::Europe::Berlin, naive);
        assert_eq!(ts.naive_local().hour(), 3);
        assert_eq!(ts.naive_local().minute(), 30);
    }
}
