use crate::{
    constants::{SECONDS_PER_WEEK, WEEK_ROLLOVER},
    error::Error,
    prelude::Epoch,
};

/// [GpsTime] is the time representation handed to the estimator:
/// GPS week counter and time of week.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct GpsTime {
    /// Week counter since the GPS origin (no rollover)
    pub week: u32,
    /// Time of week, in seconds
    pub tow_s: f64,
}

impl GpsTime {
    /// Converts [Epoch] to [GpsTime], whatever its timescale.
    pub fn from_epoch(t: Epoch) -> Result<Self, Error> {
        let seconds = t.to_gpst_seconds();

        if !seconds.is_finite() || seconds < 0.0 {
            return Err(Error::InvalidTime(t));
        }

        let week = (seconds / SECONDS_PER_WEEK).floor();
        let tow_s = seconds - week * SECONDS_PER_WEEK;

        Ok(Self {
            week: week as u32,
            tow_s,
        })
    }

    /// Seconds elapsed since `(week, tow_s)` reference, where the reference
    /// week may be truncated to the 1024 week rollover (almanacs).
    pub(crate) fn seconds_since(&self, week: u32, tow_s: f64) -> f64 {
        let dw = (self.week as i64 - week as i64).rem_euclid(WEEK_ROLLOVER);
        let dw = if dw >= WEEK_ROLLOVER / 2 {
            dw - WEEK_ROLLOVER
        } else {
            dw
        };
        dw as f64 * SECONDS_PER_WEEK + self.tow_s - tow_s
    }
}

impl std::fmt::Display for GpsTime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "week={} tow={:.3}s", self.week, self.tow_s)
    }
}
