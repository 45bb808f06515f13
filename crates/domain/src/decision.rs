//! Decision engine — fuses the clock schedule and the light sensor into one
//! desired lamp state.
//!
//! The schedule is authoritative: the sensor can be fooled by artificial
//! light or weather, so whenever the two verdicts disagree the time-based
//! verdict wins. The sensor verdict is still computed and reported so that
//! callers can log early dusk or an unexpectedly bright evening.

use chrono::NaiveTime;

use crate::daytime::DaytimeLevel;
use crate::lamp::LampState;
use crate::schedule::Schedule;
use crate::time::Timestamp;

/// Outcome of one fusion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// What the clock alone asks for.
    pub time_verdict: LampState,
    /// What the sensor alone asks for.
    pub sensor_verdict: LampState,
    /// Fused result.
    pub desired: LampState,
}

impl Decision {
    /// Whether clock and sensor agreed.
    #[must_use]
    pub fn agreed(&self) -> bool {
        self.time_verdict == self.sensor_verdict
    }
}

/// Stateless fusion of schedule and sensor verdicts.
#[derive(Debug, Clone, Copy)]
pub struct DecisionEngine {
    schedule: Schedule,
}

impl DecisionEngine {
    #[must_use]
    pub fn new(schedule: Schedule) -> Self {
        Self { schedule }
    }

    /// Desired lamp state for `now` given the debounced sensor level.
    #[must_use]
    pub fn desired_state(&self, now: &Timestamp, sensor_level: DaytimeLevel) -> LampState {
        self.decide(now, sensor_level).desired
    }

    /// Full decision record for `now` given the debounced sensor level.
    #[must_use]
    pub fn decide(&self, now: &Timestamp, sensor_level: DaytimeLevel) -> Decision {
        let time_verdict = self.time_verdict(now.time());
        let sensor_verdict = LampState::for_daytime(sensor_level);
        let desired = if time_verdict == sensor_verdict {
            sensor_verdict
        } else {
            time_verdict
        };
        Decision {
            time_verdict,
            sensor_verdict,
            desired,
        }
    }

    /// State of the latest boundary at or before `time`. Before the first
    /// boundary of the day, the latest boundary of the previous day applies.
    #[must_use]
    pub fn time_verdict(&self, time: NaiveTime) -> LampState {
        let boundaries = [
            (self.schedule.on_time(), LampState::On),
            (self.schedule.off_time(), LampState::Off),
        ];
        boundaries
            .iter()
            .filter(|(boundary, _)| *boundary <= time)
            .max_by_key(|(boundary, _)| *boundary)
            .or_else(|| boundaries.iter().max_by_key(|(boundary, _)| *boundary))
            .map_or(LampState::Off, |(_, state)| *state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Moscow;
    use proptest::prelude::*;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn engine(on: NaiveTime, off: NaiveTime) -> DecisionEngine {
        DecisionEngine::new(Schedule::new(on, off).unwrap())
    }

    #[test]
    fn should_want_light_inside_evening_window() {
        let engine = engine(hm(19, 0), hm(0, 30));
        assert_eq!(engine.time_verdict(hm(20, 0)), LampState::On);
        assert_eq!(engine.time_verdict(hm(23, 59)), LampState::On);
    }

    #[test]
    fn should_wrap_evening_window_past_midnight() {
        let engine = engine(hm(19, 0), hm(0, 30));
        assert_eq!(engine.time_verdict(hm(0, 10)), LampState::On);
        assert_eq!(engine.time_verdict(hm(0, 30)), LampState::Off);
        assert_eq!(engine.time_verdict(hm(0, 40)), LampState::Off);
        assert_eq!(engine.time_verdict(hm(18, 59)), LampState::Off);
    }

    #[test]
    fn should_handle_same_day_window() {
        let engine = engine(hm(6, 0), hm(8, 0));
        assert_eq!(engine.time_verdict(hm(5, 0)), LampState::Off);
        assert_eq!(engine.time_verdict(hm(7, 0)), LampState::On);
        assert_eq!(engine.time_verdict(hm(9, 0)), LampState::Off);
    }

    #[test]
    fn should_use_shared_verdict_when_clock_and_sensor_agree() {
        let engine = engine(hm(19, 0), hm(0, 30));
        let now = Moscow.with_ymd_and_hms(2024, 11, 10, 0, 40, 0).unwrap();
        let decision = engine.decide(&now, DaytimeLevel::Day);
        assert!(decision.agreed());
        assert_eq!(decision.desired, LampState::Off);
    }

    #[test]
    fn should_prefer_clock_when_sensor_sees_night_too_early() {
        let engine = engine(hm(19, 0), hm(0, 30));
        let now = Moscow.with_ymd_and_hms(2024, 11, 10, 17, 0, 0).unwrap();
        let decision = engine.decide(&now, DaytimeLevel::Night);
        assert!(!decision.agreed());
        assert_eq!(decision.sensor_verdict, LampState::On);
        assert_eq!(decision.desired, LampState::Off);
    }

    #[test]
    fn should_prefer_clock_when_evening_is_bright() {
        let engine = engine(hm(19, 0), hm(0, 30));
        let now = Moscow.with_ymd_and_hms(2024, 6, 10, 20, 0, 0).unwrap();
        assert_eq!(engine.desired_state(&now, DaytimeLevel::Day), LampState::On);
    }

    // ── Properties ─────────────────────────────────────────────────

    fn any_level() -> impl Strategy<Value = DaytimeLevel> {
        prop_oneof![
            Just(DaytimeLevel::Night),
            Just(DaytimeLevel::Evening),
            Just(DaytimeLevel::Day),
        ]
    }

    proptest! {
        #[test]
        fn should_always_follow_clock_on_disagreement(
            offset_secs in 0i64..86_400,
            level in any_level(),
        ) {
            let engine = engine(hm(19, 0), hm(0, 30));
            let now = Moscow.with_ymd_and_hms(2024, 11, 10, 0, 0, 0).unwrap()
                + chrono::Duration::seconds(offset_secs);

            let decision = engine.decide(&now, level);

            prop_assert_eq!(decision.time_verdict, engine.time_verdict(now.time()));
            if !decision.agreed() {
                prop_assert_eq!(decision.desired, decision.time_verdict);
            }
        }

        #[test]
        fn should_light_only_between_on_and_off_times(offset_secs in 0u32..86_400) {
            let engine = engine(hm(19, 0), hm(0, 30));
            let time = NaiveTime::from_num_seconds_from_midnight_opt(offset_secs, 0).unwrap();
            let expected = if time >= hm(19, 0) || time < hm(0, 30) {
                LampState::On
            } else {
                LampState::Off
            };
            prop_assert_eq!(engine.time_verdict(time), expected);
        }
    }
}
