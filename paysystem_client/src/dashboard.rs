//! Dashboard operations: contract views and transaction builders.
//!
//! The `fetch_*` calls surface every failure. The `load_*` calls are what a
//! front end renders from: they log the failure and fall back to the empty
//! state (no schedules, zero balance, no history). Nothing is retried and
//! concurrent calls are not de-duplicated.

use schedule_codec::{
    decode_balance, decode_optional_schedule, decode_schedules, decode_transaction_history,
    Address, ContractCall, PaymentSchedule, TokenAmount, TransactionRecord,
};
use serde::Serialize;
use tracing::{error, info};

use crate::config::{AccountContext, NetworkContext};
use crate::error::{ClientError, ClientResult};
use crate::form::{DepositForm, ScheduleForm};
use crate::gateway::{ContractGateway, VmQuery};
use crate::transaction::UnsignedTransaction;

pub const GET_SCHEDULE: &str = "getSchedule";
pub const GET_SCHEDULES: &str = "getSchedules";
pub const GET_BALANCE: &str = "getBalance";
pub const GET_TRANSACTION_HISTORY: &str = "getTransactionHistory";

/// Everything the dashboard shows for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub balance: TokenAmount,
    pub schedules: Vec<PaymentSchedule>,
    pub transactions: Vec<TransactionRecord>,
}

pub struct Dashboard<G> {
    gateway: G,
    network: NetworkContext,
}

impl<G: ContractGateway> Dashboard<G> {
    pub fn new(gateway: G, network: NetworkContext) -> Self {
        Self { gateway, network }
    }

    pub fn network(&self) -> &NetworkContext {
        &self.network
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    async fn first_return_value(&self, query: VmQuery) -> ClientResult<Vec<u8>> {
        self.gateway
            .query(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClientError::InvalidResponseFormat(format!("{}: no return data", query.function))
            })
    }

    async fn owner_view(&self, function: &str, owner: &Address) -> ClientResult<Vec<u8>> {
        self.first_return_value(VmQuery::for_owner(self.network.contract, function, owner))
            .await
    }

    pub async fn fetch_schedules(&self, owner: &Address) -> ClientResult<Vec<PaymentSchedule>> {
        let raw = self.owner_view(GET_SCHEDULES, owner).await?;
        Ok(decode_schedules(&raw, self.network.layout)?)
    }

    /// One schedule by its position in the owner's list; `None` when the
    /// position is past the end.
    pub async fn fetch_schedule(
        &self,
        owner: &Address,
        index: u32,
    ) -> ClientResult<Option<PaymentSchedule>> {
        let query = VmQuery::for_owner_index(self.network.contract, GET_SCHEDULE, owner, index);
        let raw = self.first_return_value(query).await?;
        Ok(decode_optional_schedule(&raw, self.network.layout)?)
    }

    pub async fn fetch_balance(&self, owner: &Address) -> ClientResult<TokenAmount> {
        let raw = self.owner_view(GET_BALANCE, owner).await?;
        Ok(decode_balance(&raw)?)
    }

    /// Payment history. The contract only keeps the latest executed payment,
    /// so this holds at most one record.
    pub async fn fetch_transactions(&self, owner: &Address) -> ClientResult<Vec<TransactionRecord>> {
        let raw = self.owner_view(GET_TRANSACTION_HISTORY, owner).await?;
        let latest = decode_transaction_history(&raw, self.network.layout)?;
        Ok(latest.into_iter().collect())
    }

    pub async fn load_schedules(&self, owner: &Address) -> Vec<PaymentSchedule> {
        self.fetch_schedules(owner).await.unwrap_or_else(|e| {
            error!(%owner, error = %e, "Failed to fetch schedules");
            Vec::new()
        })
    }

    pub async fn load_schedule(&self, owner: &Address, index: u32) -> Option<PaymentSchedule> {
        self.fetch_schedule(owner, index).await.unwrap_or_else(|e| {
            error!(%owner, index, error = %e, "Failed to fetch schedule");
            None
        })
    }

    pub async fn load_balance(&self, owner: &Address) -> TokenAmount {
        self.fetch_balance(owner).await.unwrap_or_else(|e| {
            error!(%owner, error = %e, "Failed to fetch balance");
            TokenAmount::ZERO
        })
    }

    pub async fn load_transactions(&self, owner: &Address) -> Vec<TransactionRecord> {
        self.fetch_transactions(owner).await.unwrap_or_else(|e| {
            error!(%owner, error = %e, "Failed to fetch transactions");
            Vec::new()
        })
    }

    /// Reload every widget, one view after the other.
    pub async fn refresh(&self, owner: &Address) -> DashboardSnapshot {
        DashboardSnapshot {
            balance: self.load_balance(owner).await,
            schedules: self.load_schedules(owner).await,
            transactions: self.load_transactions(owner).await,
        }
    }

    /// Like [`Dashboard::refresh`], but the first failing view aborts.
    pub async fn fetch_snapshot(&self, owner: &Address) -> ClientResult<DashboardSnapshot> {
        Ok(DashboardSnapshot {
            balance: self.fetch_balance(owner).await?,
            schedules: self.fetch_schedules(owner).await?,
            transactions: self.fetch_transactions(owner).await?,
        })
    }

    pub fn add_schedule_tx(
        &self,
        account: &AccountContext,
        form: &ScheduleForm,
    ) -> ClientResult<UnsignedTransaction> {
        let schedule = form.validate()?;
        info!(recipient = %schedule.recipient, "building addSchedule transaction");
        UnsignedTransaction::contract_call(
            &self.network,
            account,
            &ContractCall::AddSchedule(schedule),
            TokenAmount::ZERO,
        )
    }

    /// `index` is the schedule's position in the last fetched list.
    pub fn cancel_schedule_tx(
        &self,
        account: &AccountContext,
        index: u32,
    ) -> ClientResult<UnsignedTransaction> {
        info!(index, "building cancelSchedule transaction");
        UnsignedTransaction::contract_call(
            &self.network,
            account,
            &ContractCall::CancelSchedule { index },
            TokenAmount::ZERO,
        )
    }

    pub fn deposit_tx(
        &self,
        account: &AccountContext,
        form: &DepositForm,
    ) -> ClientResult<UnsignedTransaction> {
        let amount = form.validate()?;
        info!(amount = %amount, "building depositFunds transaction");
        UnsignedTransaction::contract_call(&self.network, account, &ContractCall::DepositFunds, amount)
    }

    pub fn execute_payments_tx(&self, account: &AccountContext) -> ClientResult<UnsignedTransaction> {
        UnsignedTransaction::contract_call(
            &self.network,
            account,
            &ContractCall::ExecutePayments,
            TokenAmount::ZERO,
        )
    }
}
