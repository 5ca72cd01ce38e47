//! Fixed-width record layout of the contract's view results.
//!
//! Buffers carry no length prefix or delimiter: records are found purely by
//! position, so the field widths below must match the contract's
//! serialization exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::{Address, ADDRESS_LEN};
use crate::amount::TokenAmount;
use crate::payload::SECONDS_PER_HOUR;
use crate::CodecError;

const U64_LEN: usize = 8;

/// Leading byte of an encoded `Some` value.
pub const OPTION_SOME_TAG: u8 = 0x01;

/// Byte width of the on-chain `amount` field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountWidth {
    /// 8 bytes; gives the 64-byte schedule record.
    #[default]
    Narrow,
    /// 16 bytes.
    Wide,
}

impl AmountWidth {
    pub const fn bytes(self) -> usize {
        match self {
            AmountWidth::Narrow => 8,
            AmountWidth::Wide => 16,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLayout {
    #[serde(default)]
    pub amount_width: AmountWidth,
}

impl RecordLayout {
    pub const fn new(amount_width: AmountWidth) -> Self {
        Self { amount_width }
    }

    /// recipient + amount + frequency + next execution + end time
    pub const fn schedule_width(&self) -> usize {
        ADDRESS_LEN + self.amount_width.bytes() + 3 * U64_LEN
    }

    /// recipient + amount + timestamp
    pub const fn transaction_width(&self) -> usize {
        ADDRESS_LEN + self.amount_width.bytes() + U64_LEN
    }
}

/// Record fields, in wire order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Recipient,
    Amount,
    Frequency,
    NextExecutionTime,
    EndTime,
    Timestamp,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Recipient => "recipient",
            Field::Amount => "amount",
            Field::Frequency => "frequency",
            Field::NextExecutionTime => "next_execution_time",
            Field::EndTime => "end_time",
            Field::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Decoded `PaymentSchedule`. Its position in the decoded sequence is the
/// index `cancelSchedule` expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub recipient: Address,
    pub amount: TokenAmount,
    pub frequency: u64,
    pub next_execution_time: u64,
    pub end_time: u64,
}

impl PaymentSchedule {
    pub fn frequency_hours(&self) -> u64 {
        self.frequency / SECONDS_PER_HOUR
    }

    pub fn to_view(&self, index: usize) -> ScheduleView {
        ScheduleView {
            index,
            recipient: self.recipient.to_bech32(),
            amount: self.amount.to_display(),
            frequency_hours: self.frequency_hours(),
            next_execution_time: format_timestamp(self.next_execution_time),
            end_time: format_timestamp(self.end_time),
        }
    }
}

/// Display form of a schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduleView {
    pub index: usize,
    pub recipient: String,
    pub amount: String,
    pub frequency_hours: u64,
    pub next_execution_time: String,
    pub end_time: String,
}

/// A payment the contract has executed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub recipient: Address,
    pub amount: TokenAmount,
    pub timestamp: u64,
}

impl TransactionRecord {
    pub fn to_view(&self) -> TransactionView {
        TransactionView {
            recipient: self.recipient.to_bech32(),
            amount: self.amount.to_display(),
            timestamp: format_timestamp(self.timestamp),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionView {
    pub recipient: String,
    pub amount: String,
    pub timestamp: String,
}

/// Render UNIX seconds as a UTC date-time, or `never` when the value has no
/// calendar representation (the contract stores `u64::MAX` for open-ended
/// schedules).
pub fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string())
}

struct FieldReader<'a> {
    buf: &'a [u8],
    offset: usize,
    record: usize,
}

impl<'a> FieldReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self::at(buf, 0)
    }

    fn at(buf: &'a [u8], offset: usize) -> Self {
        Self {
            buf,
            offset,
            record: 0,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.offset >= self.buf.len()
    }

    fn next_record(&mut self) {
        self.record += 1;
    }

    fn take(&mut self, field: Field, needed: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.buf.len() - self.offset;
        if remaining < needed {
            return Err(CodecError::TruncatedRecord {
                record: self.record,
                field,
                offset: self.offset,
                needed,
                remaining,
            });
        }
        let bytes = &self.buf[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(bytes)
    }

    fn address(&mut self, field: Field) -> Result<Address, CodecError> {
        Address::from_slice(self.take(field, ADDRESS_LEN)?)
    }

    fn amount(&mut self, width: AmountWidth) -> Result<TokenAmount, CodecError> {
        let bytes = self.take(Field::Amount, width.bytes())?;
        Ok(TokenAmount::from_atomic(be_to_u128(bytes)?))
    }

    fn u64_le(&mut self, field: Field) -> Result<u64, CodecError> {
        let bytes = self.take(field, U64_LEN)?;
        let mut raw = [0u8; U64_LEN];
        raw.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }

    fn schedule(&mut self, layout: RecordLayout) -> Result<PaymentSchedule, CodecError> {
        Ok(PaymentSchedule {
            recipient: self.address(Field::Recipient)?,
            amount: self.amount(layout.amount_width)?,
            frequency: self.u64_le(Field::Frequency)?,
            next_execution_time: self.u64_le(Field::NextExecutionTime)?,
            end_time: self.u64_le(Field::EndTime)?,
        })
    }

    fn transaction(&mut self, layout: RecordLayout) -> Result<TransactionRecord, CodecError> {
        Ok(TransactionRecord {
            recipient: self.address(Field::Recipient)?,
            amount: self.amount(layout.amount_width)?,
            timestamp: self.u64_le(Field::Timestamp)?,
        })
    }
}

fn be_to_u128(bytes: &[u8]) -> Result<u128, CodecError> {
    if bytes.len() > 16 {
        return Err(CodecError::AmountOverflow { bytes: bytes.len() });
    }
    Ok(bytes
        .iter()
        .fold(0u128, |acc, &b| (acc << 8) | u128::from(b)))
}

fn decode_hex(text: &str) -> Result<Vec<u8>, CodecError> {
    let text = text.trim();
    hex::decode(text.strip_prefix("0x").unwrap_or(text))
        .map_err(|e| CodecError::InvalidHex(e.to_string()))
}

/// Decode a `getSchedules` result into schedules, in on-chain order.
pub fn decode_schedules(
    buf: &[u8],
    layout: RecordLayout,
) -> Result<Vec<PaymentSchedule>, CodecError> {
    let mut reader = FieldReader::new(buf);
    let mut schedules = Vec::with_capacity(buf.len() / layout.schedule_width());
    while !reader.is_exhausted() {
        schedules.push(reader.schedule(layout)?);
        reader.next_record();
    }
    Ok(schedules)
}

pub fn decode_schedules_hex(
    text: &str,
    layout: RecordLayout,
) -> Result<Vec<PaymentSchedule>, CodecError> {
    decode_schedules(&decode_hex(text)?, layout)
}

/// Decode a single optional value: empty for none, otherwise
/// [`OPTION_SOME_TAG`] followed by exactly one record.
fn decode_optional<'a, T>(
    buf: &'a [u8],
    read: impl FnOnce(&mut FieldReader<'a>) -> Result<T, CodecError>,
) -> Result<Option<T>, CodecError> {
    let Some(&tag) = buf.first() else {
        return Ok(None);
    };
    if tag != OPTION_SOME_TAG {
        return Err(CodecError::InvalidOptionTag { tag });
    }

    let mut reader = FieldReader::at(buf, 1);
    let value = read(&mut reader)?;
    if !reader.is_exhausted() {
        return Err(CodecError::TrailingBytes {
            offset: reader.offset,
            remaining: buf.len() - reader.offset,
        });
    }
    Ok(Some(value))
}

/// Decode a `getSchedule` result.
pub fn decode_optional_schedule(
    buf: &[u8],
    layout: RecordLayout,
) -> Result<Option<PaymentSchedule>, CodecError> {
    decode_optional(buf, |reader| reader.schedule(layout))
}

pub fn decode_optional_schedule_hex(
    text: &str,
    layout: RecordLayout,
) -> Result<Option<PaymentSchedule>, CodecError> {
    decode_optional_schedule(&decode_hex(text)?, layout)
}

/// Decode a `getTransactionHistory` result. The contract keeps only the
/// latest executed payment per account.
pub fn decode_transaction_history(
    buf: &[u8],
    layout: RecordLayout,
) -> Result<Option<TransactionRecord>, CodecError> {
    decode_optional(buf, |reader| reader.transaction(layout))
}

pub fn decode_transaction_history_hex(
    text: &str,
    layout: RecordLayout,
) -> Result<Option<TransactionRecord>, CodecError> {
    decode_transaction_history(&decode_hex(text)?, layout)
}

/// Decode a `getBalance` result: a minimal big-endian integer, empty for zero.
pub fn decode_balance(buf: &[u8]) -> Result<TokenAmount, CodecError> {
    be_to_u128(buf).map(TokenAmount::from_atomic)
}
