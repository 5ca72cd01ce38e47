//! Fixtures shared by the cross-crate tests: view-result builders and a
//! scripted gateway.

use async_trait::async_trait;
use paysystem_client::{ClientError, ClientResult, ContractGateway, VmQuery};
use schedule_codec::{AmountWidth, PaymentSchedule, TransactionRecord, OPTION_SOME_TAG};
use std::collections::HashMap;
use std::sync::Mutex;

/// Lay out schedules the way `getSchedules` returns them.
pub fn schedules_buffer(schedules: &[PaymentSchedule], width: AmountWidth) -> Vec<u8> {
    let mut buf = Vec::new();
    for s in schedules {
        buf.extend_from_slice(s.recipient.as_bytes());
        buf.extend_from_slice(&s.amount.atomic().to_be_bytes()[16 - width.bytes()..]);
        buf.extend_from_slice(&s.frequency.to_le_bytes());
        buf.extend_from_slice(&s.next_execution_time.to_le_bytes());
        buf.extend_from_slice(&s.end_time.to_le_bytes());
    }
    buf
}

/// A `getSchedule` result: empty for none, tagged single record otherwise.
pub fn schedule_option_buffer(schedule: Option<&PaymentSchedule>, width: AmountWidth) -> Vec<u8> {
    match schedule {
        Some(s) => {
            let mut buf = vec![OPTION_SOME_TAG];
            buf.extend(schedules_buffer(std::slice::from_ref(s), width));
            buf
        }
        None => Vec::new(),
    }
}

/// A `getTransactionHistory` result.
pub fn history_buffer(latest: Option<&TransactionRecord>, width: AmountWidth) -> Vec<u8> {
    let Some(r) = latest else {
        return Vec::new();
    };
    let mut buf = vec![OPTION_SOME_TAG];
    buf.extend_from_slice(r.recipient.as_bytes());
    buf.extend_from_slice(&r.amount.atomic().to_be_bytes()[16 - width.bytes()..]);
    buf.extend_from_slice(&r.timestamp.to_le_bytes());
    buf
}

/// Minimal big-endian form `getBalance` returns.
pub fn balance_buffer(atomic: u128) -> Vec<u8> {
    atomic
        .to_be_bytes()
        .iter()
        .copied()
        .skip_while(|b| *b == 0)
        .collect()
}

/// Gateway answering each view from a script; views can be re-scripted
/// between calls to model on-chain changes.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<HashMap<String, Option<Vec<u8>>>>,
    calls: Mutex<Vec<VmQuery>>,
}

impl ScriptedGateway {
    pub fn set(&self, function: &str, value: Vec<u8>) {
        if let Ok(mut script) = self.script.lock() {
            script.insert(function.to_string(), Some(value));
        }
    }

    /// Make the view fail at the transport level.
    pub fn fail(&self, function: &str) {
        if let Ok(mut script) = self.script.lock() {
            script.insert(function.to_string(), None);
        }
    }

    pub fn calls(&self) -> Vec<VmQuery> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ContractGateway for ScriptedGateway {
    async fn query(&self, query: &VmQuery) -> ClientResult<Vec<Vec<u8>>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.clone());
        }
        let entry = self
            .script
            .lock()
            .ok()
            .and_then(|script| script.get(&query.function).cloned());
        match entry {
            Some(Some(value)) => Ok(vec![value]),
            Some(None) => Err(ClientError::Transport {
                endpoint: "scripted".into(),
                reason: "connection reset".into(),
            }),
            None => Ok(Vec::new()),
        }
    }
}
