//! Ambient light classification with debouncing.
//!
//! Raw sensor samples are inverted, bucketed into a [`DaytimeLevel`] and then
//! debounced over a short rolling window: a new level is only accepted once
//! the whole window agrees, otherwise the previously accepted level sticks.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of classified samples kept for debouncing.
pub const HISTORY_LEN: usize = 3;

/// Categorical ambient brightness, darkest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaytimeLevel {
    Night,
    Evening,
    Day,
}

impl std::fmt::Display for DaytimeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Night => f.write_str("night"),
            Self::Evening => f.write_str("evening"),
            Self::Day => f.write_str("day"),
        }
    }
}

/// Bucket boundaries applied to the inverted sensor value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    max_raw: u8,
    night: u8,
    evening: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_raw: u8::MAX,
            night: 25,
            evening: 50,
        }
    }
}

impl Thresholds {
    /// Build thresholds for a sensor reporting values in `0..=max_raw`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `night >= evening` or if `evening`
    /// lies outside the sensor range.
    pub fn new(max_raw: u8, night: u8, evening: u8) -> Result<Self, ValidationError> {
        if night >= evening {
            return Err(ValidationError::ThresholdOrder { night, evening });
        }
        if evening > max_raw {
            return Err(ValidationError::ThresholdOutOfRange { evening, max_raw });
        }
        Ok(Self {
            max_raw,
            night,
            evening,
        })
    }

    /// Invert a raw reading so that the result grows with ambient light.
    #[must_use]
    pub fn invert(&self, raw: u8) -> u8 {
        self.max_raw.saturating_sub(raw)
    }

    /// Map an inverted value to its bucket, lowest threshold first.
    #[must_use]
    pub fn level_for(&self, value: u8) -> DaytimeLevel {
        [
            (self.night, DaytimeLevel::Night),
            (self.evening, DaytimeLevel::Evening),
        ]
        .into_iter()
        .find_map(|(threshold, level)| (value < threshold).then_some(level))
        .unwrap_or(DaytimeLevel::Day)
    }
}

/// Result of classifying one raw sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Raw reading as returned by the sensor.
    pub raw: u8,
    /// Inverted reading the thresholds were applied to.
    pub value: u8,
    /// Level computed from this sample alone.
    pub sampled: DaytimeLevel,
    /// Effective level after debouncing.
    pub level: DaytimeLevel,
}

impl Classification {
    /// Whether debouncing overrode the freshly sampled level.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.sampled != self.level
    }
}

/// Converts raw samples into debounced [`DaytimeLevel`]s.
#[derive(Debug, Clone)]
pub struct DaytimeClassifier {
    thresholds: Thresholds,
    history: VecDeque<DaytimeLevel>,
    accepted: Option<DaytimeLevel>,
}

impl DaytimeClassifier {
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            history: VecDeque::with_capacity(HISTORY_LEN + 1),
            accepted: None,
        }
    }

    /// Classify a raw sample and fold it into the debounce window.
    pub fn classify(&mut self, raw: u8) -> Classification {
        let value = self.thresholds.invert(raw);
        let sampled = self.thresholds.level_for(value);
        self.history.push_back(sampled);

        let level = if self.history.len() < 2 || self.window_agrees() {
            sampled
        } else {
            self.accepted.unwrap_or(sampled)
        };

        while self.history.len() > HISTORY_LEN {
            self.history.pop_front();
        }
        self.accepted = Some(level);

        Classification {
            raw,
            value,
            sampled,
            level,
        }
    }

    /// Last accepted level, if any sample has been seen.
    #[must_use]
    pub fn accepted(&self) -> Option<DaytimeLevel> {
        self.accepted
    }

    /// Classified samples in the debounce window, oldest first.
    pub fn history(&self) -> impl Iterator<Item = DaytimeLevel> + '_ {
        self.history.iter().copied()
    }

    /// Whether the newest `HISTORY_LEN` entries are all the same level.
    fn window_agrees(&self) -> bool {
        let skip = self.history.len().saturating_sub(HISTORY_LEN);
        let mut window = self.history.iter().skip(skip);
        let Some(first) = window.next() else {
            return true;
        };
        window.all(|level| level == first)
    }
}
