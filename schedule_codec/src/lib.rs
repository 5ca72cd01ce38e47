//! Record codec for the PaySystem subscription contract.
//!
//! Decodes the flat, length-implicit buffers returned by the contract's
//! views (`getSchedules`, `getTransactionHistory`, `getBalance`) and encodes
//! the ASCII payloads consumed by its endpoints (`addSchedule`,
//! `cancelSchedule`, `depositFunds`, `executePayments`).
//!
//! Everything here is a pure function of its input.

pub mod address;
pub mod amount;
pub mod payload;
pub mod record;

pub use address::{Address, ADDRESS_HRP, ADDRESS_LEN};
pub use amount::{TokenAmount, DENOMINATION, DISPLAY_DECIMALS, TOKEN_DECIMALS};
pub use payload::{
    encode_add_schedule, encode_cancel_schedule, hex_arg, ContractCall, NewSchedule,
    ARG_SEPARATOR, END_TIME_OPTION_PREFIX, SECONDS_PER_HOUR,
};
pub use record::{
    decode_balance, decode_optional_schedule, decode_optional_schedule_hex, decode_schedules,
    decode_schedules_hex, decode_transaction_history, decode_transaction_history_hex,
    format_timestamp, AmountWidth, Field, PaymentSchedule, RecordLayout, ScheduleView,
    TransactionRecord, TransactionView, OPTION_SOME_TAG,
};

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A field would read past the end of the buffer.
    TruncatedRecord {
        record: usize,
        field: Field,
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    InvalidHex(String),
    InvalidAddress(String),
    InvalidAmount(String),
    /// An optional value starts with a byte other than the presence tag.
    InvalidOptionTag { tag: u8 },
    /// Bytes left over after a single-value result.
    TrailingBytes { offset: usize, remaining: usize },
    /// An integer field holds more bytes than the target type can carry.
    AmountOverflow { bytes: usize },
    InvalidFrequency(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::TruncatedRecord {
                record,
                field,
                offset,
                needed,
                remaining,
            } => write!(
                f,
                "truncated record {}: field `{}` at offset {} needs {} bytes, {} remaining",
                record, field, offset, needed, remaining
            ),
            CodecError::InvalidOptionTag { tag } => {
                write!(f, "invalid option tag 0x{:02x}", tag)
            }
            CodecError::TrailingBytes { offset, remaining } => {
                write!(f, "{} trailing bytes at offset {}", remaining, offset)
            }
            CodecError::InvalidHex(s) => write!(f, "invalid hex: {}", s),
            CodecError::InvalidAddress(s) => write!(f, "invalid address: {}", s),
            CodecError::InvalidAmount(s) => write!(f, "invalid amount: {}", s),
            CodecError::AmountOverflow { bytes } => {
                write!(f, "amount of {} bytes does not fit in 128 bits", bytes)
            }
            CodecError::InvalidFrequency(s) => write!(f, "invalid frequency: {}", s),
        }
    }
}

impl std::error::Error for CodecError {}
