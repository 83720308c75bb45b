//! Spreadsheet serial dates
//!
//! A serial date is a count of days from a fixed epoch with the time of day
//! as the fraction (0.5 = noon).
//!
//! - **1900 system**: days since 1899-12-30. Serials below 61 are shifted by
//!   one because spreadsheet applications keep a fictitious 1900-02-29.
//! - **1904 system**: days since 1904-01-01, no leap-year quirk.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

/// `num_days_from_ce` of 1899-12-30
const EPOCH_1900_CE_DAYS: i32 = 693_594;
/// `num_days_from_ce` of 1904-01-01
const EPOCH_1904_CE_DAYS: i32 = 695_056;
/// First 1900-system serial that is not shifted (1900-03-01)
const LEAP_BUG_SERIAL: i64 = 61;

const SECONDS_PER_DAY: f64 = 86_400.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Which epoch serial dates count from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateSystem {
    /// Days since 1899-12-30 with the 1900 leap-year quirk
    #[default]
    Excel1900,
    /// Days since 1904-01-01
    Excel1904,
}

impl DateSystem {
    /// Whether this is the 1904 system (`date1904` in workbook properties)
    pub fn is_1904(self) -> bool {
        matches!(self, DateSystem::Excel1904)
    }

    /// Convert a date-time to its serial number
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use streamsheet_core::DateSystem;
    ///
    /// let noon = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
    /// assert_eq!(DateSystem::Excel1900.to_serial(noon), 36526.5);
    /// ```
    pub fn to_serial(self, dt: NaiveDateTime) -> f64 {
        let ce_days = dt.date().num_days_from_ce();
        let days = match self {
            DateSystem::Excel1900 => {
                let days = i64::from(ce_days - EPOCH_1900_CE_DAYS);
                if days < LEAP_BUG_SERIAL {
                    days - 1
                } else {
                    days
                }
            }
            DateSystem::Excel1904 => i64::from(ce_days - EPOCH_1904_CE_DAYS),
        };

        let time = dt.time();
        let seconds =
            f64::from(time.num_seconds_from_midnight()) + f64::from(time.nanosecond()) / 1e9;
        days as f64 + seconds / SECONDS_PER_DAY
    }

    /// Convert a serial number back to a date-time, rounded to milliseconds
    ///
    /// Returns `None` for non-finite or out-of-range serials.
    pub fn from_serial(self, serial: f64) -> Option<NaiveDateTime> {
        if !serial.is_finite() {
            return None;
        }

        let total_ms = (serial * MILLIS_PER_DAY).round();
        if total_ms.abs() > i64::MAX as f64 / 2.0 {
            return None;
        }
        let total_ms = total_ms as i64;
        let mut days = total_ms.div_euclid(86_400_000);
        let ms_of_day = total_ms.rem_euclid(86_400_000);

        let epoch = match self {
            DateSystem::Excel1900 => {
                if days < LEAP_BUG_SERIAL {
                    days += 1;
                }
                EPOCH_1900_CE_DAYS
            }
            DateSystem::Excel1904 => EPOCH_1904_CE_DAYS,
        };

        let ce_days = i32::try_from(days).ok()?.checked_add(epoch)?;
        let date = NaiveDate::from_num_days_from_ce_opt(ce_days)?;
        date.and_hms_opt(0, 0, 0)?
            .checked_add_signed(Duration::milliseconds(ms_of_day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_1900_serials() {
        let sys = DateSystem::Excel1900;
        assert_eq!(sys.to_serial(dt(1900, 1, 1, 0, 0, 0)), 1.0);
        assert_eq!(sys.to_serial(dt(1900, 2, 28, 0, 0, 0)), 59.0);
        assert_eq!(sys.to_serial(dt(1900, 3, 1, 0, 0, 0)), 61.0);
        assert_eq!(sys.to_serial(dt(2000, 1, 1, 0, 0, 0)), 36526.0);
        assert_eq!(sys.to_serial(dt(1970, 1, 1, 0, 0, 0)), 25569.0);
    }

    #[test]
    fn test_1904_serials() {
        let sys = DateSystem::Excel1904;
        assert_eq!(sys.to_serial(dt(1904, 1, 1, 0, 0, 0)), 0.0);
        assert_eq!(sys.to_serial(dt(2000, 1, 1, 0, 0, 0)), 36526.0 - 1462.0);
    }

    #[test]
    fn test_time_fraction() {
        let serial = DateSystem::Excel1900.to_serial(dt(2009, 11, 10, 23, 0, 0));
        assert!((serial - 40127.958_333_333).abs() < 1e-6);
    }

    #[test]
    fn test_from_serial() {
        for sys in [DateSystem::Excel1900, DateSystem::Excel1904] {
            for value in [
                dt(1900, 1, 1, 0, 0, 0),
                dt(1900, 2, 28, 6, 0, 0),
                dt(1900, 3, 1, 0, 0, 0),
                dt(2009, 11, 10, 23, 0, 0),
                dt(2024, 2, 29, 13, 45, 30),
            ] {
                if sys.is_1904() && value.year() < 1904 {
                    continue;
                }
                assert_eq!(sys.from_serial(sys.to_serial(value)), Some(value));
            }
        }
        assert_eq!(DateSystem::Excel1900.from_serial(f64::NAN), None);
    }
}
