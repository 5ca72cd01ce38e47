//! Validation of user-entered values before any payload is built.

use chrono::{NaiveDateTime, TimeZone, Utc};
use schedule_codec::{NewSchedule, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// New subscription as typed by the user. All values are raw text.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleForm {
    pub recipient: String,
    /// display units
    pub amount: String,
    /// whole hours
    pub frequency: String,
    pub start_time: String,
    pub end_time: String,
}

impl ScheduleForm {
    pub fn validate(&self) -> ClientResult<NewSchedule> {
        require_fields(&[
            ("recipient", &self.recipient),
            ("amount", &self.amount),
            ("frequency", &self.frequency),
            ("start_time", &self.start_time),
            ("end_time", &self.end_time),
        ])?;

        let frequency_hours =
            self.frequency
                .trim()
                .parse::<u64>()
                .map_err(|e| ClientError::InvalidInput {
                    field: "frequency",
                    reason: e.to_string(),
                })?;
        let start_time = parse_time("start_time", &self.start_time)?;
        let end_time = parse_time("end_time", &self.end_time)?;

        Ok(NewSchedule::parse(
            &self.recipient,
            &self.amount,
            frequency_hours,
            start_time,
            end_time,
        )?)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositForm {
    pub amount: String,
}

impl DepositForm {
    pub fn validate(&self) -> ClientResult<TokenAmount> {
        require_fields(&[("amount", &self.amount)])?;
        Ok(TokenAmount::parse_display(&self.amount)?)
    }
}

fn require_fields(fields: &[(&'static str, &String)]) -> ClientResult<()> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ClientError::MissingRequiredFields { missing })
    }
}

/// UNIX seconds, or a `YYYY-MM-DDTHH:MM[:SS]` date-time read as UTC.
pub fn parse_time(field: &'static str, text: &str) -> ClientResult<u64> {
    let text = text.trim();
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse::<u64>().map_err(|e| ClientError::InvalidInput {
            field,
            reason: e.to_string(),
        });
    }

    let parsed = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| ClientError::InvalidInput {
            field,
            reason: format!("`{}` is not a date-time", text),
        })?;

    let secs = Utc.from_utc_datetime(&parsed).timestamp();
    u64::try_from(secs).map_err(|_| ClientError::InvalidInput {
        field,
        reason: format!("`{}` is before 1970", text),
    })
}
