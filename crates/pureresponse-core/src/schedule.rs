// ── Delivery scheduling ──
//
// A delivery is scheduled at "now + delay" and sent to the vendor as
// `DD/MM/YYYY HH:MM` local time.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use pureresponse_api::OperationError;

/// Format the vendor expects in `deliveryDtTm`.
pub const DELIVERY_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DelayUnit {
    Seconds,
    #[default]
    Minutes,
    Hours,
    Days,
    Weeks,
}

/// How far in the future a list delivery is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleDelay {
    pub unit: DelayUnit,
    pub count: i64,
}

impl Default for ScheduleDelay {
    fn default() -> Self {
        Self::minutes(3)
    }
}

impl ScheduleDelay {
    pub fn new(unit: DelayUnit, count: i64) -> Self {
        Self { unit, count }
    }

    pub fn minutes(count: i64) -> Self {
        Self::new(DelayUnit::Minutes, count)
    }

    /// The delay as a duration, or `None` if it overflows.
    pub fn to_time_delta(self) -> Option<TimeDelta> {
        match self.unit {
            DelayUnit::Seconds => TimeDelta::try_seconds(self.count),
            DelayUnit::Minutes => TimeDelta::try_minutes(self.count),
            DelayUnit::Hours => TimeDelta::try_hours(self.count),
            DelayUnit::Days => TimeDelta::try_days(self.count),
            DelayUnit::Weeks => TimeDelta::try_weeks(self.count),
        }
    }
}

/// `now + delay`, formatted for `deliveryDtTm`.
pub fn delivery_time(now: NaiveDateTime, delay: ScheduleDelay) -> Result<String, OperationError> {
    let at = delay
        .to_time_delta()
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| {
            OperationError::invalid_parameters(format!(
                "delivery delay of {} {} is out of range",
                delay.count, delay.unit
            ))
        })?;
    Ok(at.format(DELIVERY_TIME_FORMAT).to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn before_midnight() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 28)
            .unwrap()
            .and_hms_opt(23, 58, 30)
            .unwrap()
    }

    #[test]
    fn default_delay_is_three_minutes() {
        assert_eq!(
            delivery_time(before_midnight(), ScheduleDelay::default()).unwrap(),
            "29/02/2024 00:01"
        );
    }

    #[test]
    fn other_units() {
        let delay = ScheduleDelay::new(DelayUnit::Days, 2);
        assert_eq!(
            delivery_time(before_midnight(), delay).unwrap(),
            "01/03/2024 23:58"
        );
        let delay = ScheduleDelay::new(DelayUnit::Hours, 1);
        assert_eq!(
            delivery_time(before_midnight(), delay).unwrap(),
            "29/02/2024 00:58"
        );
    }

    #[test]
    fn overflow_is_invalid_parameters() {
        let delay = ScheduleDelay::new(DelayUnit::Weeks, i64::MAX);
        let err = delivery_time(before_midnight(), delay).unwrap_err();
        assert_eq!(err.code, pureresponse_api::ErrorCode::InvalidParameters);
    }

    #[test]
    fn unit_parses_from_config_strings() {
        assert_eq!("Hours".parse::<DelayUnit>().unwrap(), DelayUnit::Hours);
    }
}
