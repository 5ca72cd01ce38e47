//! Transaction data payloads for the contract's endpoints.
//!
//! A payload is the function name followed by hex arguments, each introduced
//! by [`ARG_SEPARATOR`]:
//!
//! ```text
//! addSchedule@<recipient>@<amount>@<frequency>@<start>@0100000000<end>
//! cancelSchedule@<index>
//! depositFunds
//! ```

use crate::address::Address;
use crate::amount::TokenAmount;
use crate::CodecError;

pub const ARG_SEPARATOR: char = '@';

/// Marker the contract expects ahead of the optional end-time argument.
pub const END_TIME_OPTION_PREFIX: &str = "0100000000";

pub const SECONDS_PER_HOUR: u64 = 3600;

/// Parameters of a new recurring payment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSchedule {
    pub recipient: Address,
    pub amount: TokenAmount,
    pub frequency_hours: u64,
    pub start_time: u64,
    pub end_time: u64,
}

impl NewSchedule {
    /// Build from user-facing text values: a bech32 recipient and a
    /// display-unit amount.
    pub fn parse(
        recipient: &str,
        amount: &str,
        frequency_hours: u64,
        start_time: u64,
        end_time: u64,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            recipient: Address::from_bech32(recipient)?,
            amount: TokenAmount::parse_display(amount)?,
            frequency_hours,
            start_time,
            end_time,
        })
    }

    pub fn frequency_seconds(&self) -> Result<u64, CodecError> {
        self.frequency_hours
            .checked_mul(SECONDS_PER_HOUR)
            .ok_or_else(|| {
                CodecError::InvalidFrequency(format!("{} hours overflows", self.frequency_hours))
            })
    }
}

/// Endpoint call carried in a transaction's data field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractCall {
    AddSchedule(NewSchedule),
    CancelSchedule { index: u32 },
    DepositFunds,
    ExecutePayments,
}

impl ContractCall {
    pub fn function_name(&self) -> &'static str {
        match self {
            ContractCall::AddSchedule(_) => "addSchedule",
            ContractCall::CancelSchedule { .. } => "cancelSchedule",
            ContractCall::DepositFunds => "depositFunds",
            ContractCall::ExecutePayments => "executePayments",
        }
    }

    pub fn encode(&self) -> Result<String, CodecError> {
        match self {
            ContractCall::AddSchedule(schedule) => encode_add_schedule(schedule),
            ContractCall::CancelSchedule { index } => Ok(encode_cancel_schedule(*index)),
            ContractCall::DepositFunds | ContractCall::ExecutePayments => {
                Ok(self.function_name().to_string())
            }
        }
    }
}

fn join_args(function: &str, args: &[String]) -> String {
    let mut data = String::from(function);
    for arg in args {
        data.push(ARG_SEPARATOR);
        data.push_str(arg);
    }
    data
}

/// Hex argument of at least 8 digits, padded to whole bytes.
pub fn hex_arg(value: u64) -> String {
    let mut encoded = format!("{:08x}", value);
    if encoded.len() % 2 == 1 {
        encoded.insert(0, '0');
    }
    encoded
}

pub fn encode_add_schedule(schedule: &NewSchedule) -> Result<String, CodecError> {
    let args = [
        schedule.recipient.to_hex(),
        schedule.amount.to_payload_hex(),
        hex_arg(schedule.frequency_seconds()?),
        hex_arg(schedule.start_time),
        format!("{}{}", END_TIME_OPTION_PREFIX, hex_arg(schedule.end_time)),
    ];
    Ok(join_args("addSchedule", &args))
}

pub fn encode_cancel_schedule(index: u32) -> String {
    join_args("cancelSchedule", &[hex_arg(u64::from(index))])
}
