//! PaySystem dashboard client.
//!
//! Reads schedules, balance and payment history from the PaySystem contract
//! and builds the unsigned transactions that create, fund, cancel and
//! execute schedules. Network settings and the signing account are passed in
//! explicitly as [`NetworkContext`] and [`AccountContext`]; signing itself is
//! left to an external wallet.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod gateway;
pub mod transaction;

pub use config::{load_config, AccountContext, DashboardConfig, NetworkContext};
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use error::{ClientError, ClientResult};
pub use form::{DepositForm, ScheduleForm};
pub use gateway::{parse_query_response, ContractGateway, HttpGateway, VmQuery};
pub use transaction::UnsignedTransaction;
