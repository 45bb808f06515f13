//! Virtual ambient light sensor — follows a simple day curve.
//!
//! The curve has three plateaus matching the three daytime levels: dark at
//! night, dim within [`TWILIGHT_MINUTES`] of sunrise or sunset, bright in
//! between. Raw readings use the photoresistor convention of the real board:
//! the darker it is, the higher the reading.

use chrono::{Duration, NaiveTime};
use rand::Rng;

use lamplighter_app::ports::{Clock, SensorPort};
use lamplighter_domain::error::HardwareError;

use super::FaultSwitch;
use crate::error::VirtualError;

/// Raw reading in full darkness.
pub const DARK_RAW: u8 = 245;
/// Raw reading around sunrise and sunset.
pub const TWILIGHT_RAW: u8 = 220;
/// Raw reading in daylight.
pub const DAYLIGHT_RAW: u8 = 60;
/// Half-width of the twilight plateau around sunrise and sunset.
pub const TWILIGHT_MINUTES: i64 = 30;

const SECONDS_PER_DAY: i64 = 86_400;

/// Sunrise and sunset of the simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Daylight {
    sunrise: NaiveTime,
    sunset: NaiveTime,
}

impl Daylight {
    /// # Errors
    ///
    /// Returns [`VirtualError::DaylightOrder`] unless `sunrise < sunset`.
    pub fn new(sunrise: NaiveTime, sunset: NaiveTime) -> Result<Self, VirtualError> {
        if sunrise >= sunset {
            return Err(VirtualError::DaylightOrder { sunrise, sunset });
        }
        Ok(Self { sunrise, sunset })
    }

    #[must_use]
    pub fn sunrise(&self) -> NaiveTime {
        self.sunrise
    }

    #[must_use]
    pub fn sunset(&self) -> NaiveTime {
        self.sunset
    }

    /// Noise-free raw reading at wall-clock `time`.
    #[must_use]
    pub fn raw_at(&self, time: NaiveTime) -> u8 {
        let twilight = Duration::minutes(TWILIGHT_MINUTES);
        if near(time, self.sunrise, twilight) || near(time, self.sunset, twilight) {
            TWILIGHT_RAW
        } else if (self.sunrise..self.sunset).contains(&time) {
            DAYLIGHT_RAW
        } else {
            DARK_RAW
        }
    }
}

impl Default for Daylight {
    fn default() -> Self {
        Self {
            sunrise: NaiveTime::from_hms_opt(6, 30, 0).expect("06:30 is a valid time"),
            sunset: NaiveTime::from_hms_opt(18, 30, 0).expect("18:30 is a valid time"),
        }
    }
}

/// Distance on the 24h circle.
fn near(a: NaiveTime, b: NaiveTime, window: Duration) -> bool {
    let seconds = a.signed_duration_since(b).num_seconds().abs();
    seconds.min(SECONDS_PER_DAY - seconds) <= window.num_seconds()
}

/// A simulated photoresistor read through an ADC.
pub struct VirtualSensor<C, R> {
    clock: C,
    daylight: Daylight,
    noise: u8,
    rng: R,
    fault: FaultSwitch,
}

impl<C: Clock, R: Rng> VirtualSensor<C, R> {
    /// `noise` is the maximum deviation added to each reading, in raw units.
    pub fn new(clock: C, daylight: Daylight, noise: u8, rng: R) -> Self {
        Self {
            clock,
            daylight,
            noise,
            rng,
            fault: FaultSwitch::default(),
        }
    }

    /// Handle that disconnects the sensor while tripped.
    #[must_use]
    pub fn fault_switch(&self) -> FaultSwitch {
        self.fault.clone()
    }

    fn jitter(&mut self, raw: u8) -> u8 {
        if self.noise == 0 {
            return raw;
        }
        let noise = i16::from(self.noise);
        let noisy = i16::from(raw) + self.rng.gen_range(-noise..=noise);
        u8::try_from(noisy.clamp(0, i16::from(u8::MAX))).unwrap_or(u8::MAX)
    }
}

impl<C: Clock, R: Rng> SensorPort for VirtualSensor<C, R> {
    fn read(&mut self) -> Result<u8, HardwareError> {
        if self.fault.is_tripped() {
            return Err(VirtualError::SensorDisconnected.into_sensor_error());
        }
        let time = self.clock.now().time();
        let raw = self.jitter(self.daylight.raw_at(time));
        tracing::trace!(%time, raw, "virtual sensor sampled");
        Ok(raw)
    }
}
