//! PaySystem command-line dashboard
//!
//! Views are queried through the gateway; write operations print an unsigned
//! transaction as JSON for an external wallet to sign and broadcast.

pub mod output;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use paysystem_client::{
    load_config, AccountContext, Dashboard, DepositForm, HttpGateway, NetworkContext,
    ScheduleForm,
};
use schedule_codec::{
    decode_balance, decode_optional_schedule_hex, decode_schedules_hex,
    decode_transaction_history_hex, Address, AmountWidth, RecordLayout,
};
use std::path::PathBuf;

pub use output::OutputFormat;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(name = "paysystem")]
pub struct PaySystemCli {
    /// Gateway URL (overrides the config file)
    #[arg(long, env = "PAYSYSTEM_GATEWAY")]
    pub gateway: Option<String>,

    /// Contract address, bech32 (overrides the config file)
    #[arg(long, env = "PAYSYSTEM_CONTRACT")]
    pub contract: Option<String>,

    /// Configuration file path (TOML)
    #[arg(short, long, env = "PAYSYSTEM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Byte width of the on-chain amount field
    #[arg(long, value_enum)]
    pub amount_width: Option<WidthArg>,

    /// Output format (`dashboard` supports table and json only)
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Fail on query errors instead of showing empty data
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short, long, env = "PAYSYSTEM_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: PaySystemCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WidthArg {
    Narrow,
    Wide,
}

impl From<WidthArg> for AmountWidth {
    fn from(arg: WidthArg) -> Self {
        match arg {
            WidthArg::Narrow => AmountWidth::Narrow,
            WidthArg::Wide => AmountWidth::Wide,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum PaySystemCommand {
    /// List active subscriptions of an account
    Schedules { owner: String },

    /// Show one subscription by its position in the `schedules` listing
    Schedule { owner: String, index: u32 },

    /// Show the deposited balance of an account
    Balance { owner: String },

    /// Show the latest executed payment of an account
    History { owner: String },

    /// Balance, subscriptions and history in one go
    Dashboard { owner: String },

    /// Build an addSchedule transaction
    AddSchedule(AddScheduleArgs),

    /// Build a cancelSchedule transaction
    Cancel {
        #[command(flatten)]
        account: AccountArgs,
        /// Position of the schedule in the `schedules` listing
        index: u32,
    },

    /// Build a depositFunds transaction
    Deposit {
        #[command(flatten)]
        account: AccountArgs,
        /// Amount in EGLD
        amount: String,
    },

    /// Build an executePayments transaction
    ExecutePayments {
        #[command(flatten)]
        account: AccountArgs,
    },

    /// Decode a hex-encoded view result offline
    Decode {
        #[arg(long, value_enum, default_value = "schedules")]
        kind: DecodeKind,
        /// Hex-encoded return data
        data: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AccountArgs {
    /// Sender address, bech32
    #[arg(long)]
    pub sender: String,

    /// Sender account nonce
    #[arg(long, default_value_t = 0)]
    pub nonce: u64,
}

#[derive(Args, Debug, Clone)]
pub struct AddScheduleArgs {
    #[command(flatten)]
    pub account: AccountArgs,

    #[arg(long)]
    pub recipient: String,

    /// Amount in EGLD per payment
    #[arg(long)]
    pub amount: String,

    /// Hours between payments
    #[arg(long)]
    pub frequency: String,

    /// First payment, `YYYY-MM-DDTHH:MM` (UTC) or UNIX seconds
    #[arg(long)]
    pub start: String,

    /// Last payment, `YYYY-MM-DDTHH:MM` (UTC) or UNIX seconds
    #[arg(long)]
    pub end: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecodeKind {
    /// `getSchedules` result
    Schedules,
    /// `getSchedule` result
    Schedule,
    /// `getTransactionHistory` result
    History,
    /// `getBalance` result
    Balance,
}

impl AccountArgs {
    fn context(&self) -> Result<AccountContext> {
        let address = Address::from_bech32(&self.sender).context("invalid --sender")?;
        Ok(AccountContext::new(address, self.nonce))
    }
}

/// Resolve the network context: defaults, then config file, then flags.
pub fn network_context(cli: &PaySystemCli) -> Result<NetworkContext> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(gateway) = &cli.gateway {
        config.gateway = Some(gateway.clone());
    }
    if let Some(contract) = &cli.contract {
        config.contract_address = Some(contract.clone());
    }
    if let Some(width) = cli.amount_width {
        config.amount_width = Some(width.into());
    }
    Ok(NetworkContext::from_config(&config)?)
}

fn http_dashboard(cli: &PaySystemCli) -> Result<Dashboard<HttpGateway>> {
    let network = network_context(cli)?;
    Ok(Dashboard::new(HttpGateway::new(network.gateway.clone()), network))
}

fn parse_owner(owner: &str) -> Result<Address> {
    Address::from_bech32(owner).with_context(|| format!("invalid owner address `{}`", owner))
}

/// Execute one command and return what should be printed.
pub async fn execute(cli: &PaySystemCli) -> Result<String> {
    let format = cli.format;

    match &cli.command {
        PaySystemCommand::Decode { kind, data } => {
            let layout = RecordLayout::new(cli.amount_width.map(Into::into).unwrap_or_default());
            decode_offline(*kind, data, layout, format)
        }
        PaySystemCommand::Schedules { owner } => {
            let dashboard = http_dashboard(cli)?;
            let owner = parse_owner(owner)?;
            let schedules = if cli.strict {
                dashboard.fetch_schedules(&owner).await?
            } else {
                dashboard.load_schedules(&owner).await
            };
            output::render_schedules(&schedules, format)
        }
        PaySystemCommand::Schedule { owner, index } => {
            let dashboard = http_dashboard(cli)?;
            let owner = parse_owner(owner)?;
            let schedule = if cli.strict {
                dashboard.fetch_schedule(&owner, *index).await?
            } else {
                dashboard.load_schedule(&owner, *index).await
            };
            output::render_schedule(*index as usize, schedule.as_ref(), format)
        }
        PaySystemCommand::Balance { owner } => {
            let dashboard = http_dashboard(cli)?;
            let owner = parse_owner(owner)?;
            let balance = if cli.strict {
                dashboard.fetch_balance(&owner).await?
            } else {
                dashboard.load_balance(&owner).await
            };
            output::render_balance(balance, format)
        }
        PaySystemCommand::History { owner } => {
            let dashboard = http_dashboard(cli)?;
            let owner = parse_owner(owner)?;
            let records = if cli.strict {
                dashboard.fetch_transactions(&owner).await?
            } else {
                dashboard.load_transactions(&owner).await
            };
            output::render_transactions(&records, format)
        }
        PaySystemCommand::Dashboard { owner } => {
            if format == OutputFormat::Csv {
                bail!("csv output is not available for `dashboard`, use table or json");
            }
            let dashboard = http_dashboard(cli)?;
            let owner = parse_owner(owner)?;
            let snapshot = if cli.strict {
                dashboard.fetch_snapshot(&owner).await?
            } else {
                dashboard.refresh(&owner).await
            };
            output::render_snapshot(&snapshot, format)
        }
        PaySystemCommand::AddSchedule(args) => {
            let dashboard = http_dashboard(cli)?;
            let form = ScheduleForm {
                recipient: args.recipient.clone(),
                amount: args.amount.clone(),
                frequency: args.frequency.clone(),
                start_time: args.start.clone(),
                end_time: args.end.clone(),
            };
            let tx = dashboard.add_schedule_tx(&args.account.context()?, &form)?;
            output::render_transaction(&tx)
        }
        PaySystemCommand::Cancel { account, index } => {
            let dashboard = http_dashboard(cli)?;
            let tx = dashboard.cancel_schedule_tx(&account.context()?, *index)?;
            output::render_transaction(&tx)
        }
        PaySystemCommand::Deposit { account, amount } => {
            let dashboard = http_dashboard(cli)?;
            let form = DepositForm {
                amount: amount.clone(),
            };
            let tx = dashboard.deposit_tx(&account.context()?, &form)?;
            output::render_transaction(&tx)
        }
        PaySystemCommand::ExecutePayments { account } => {
            let dashboard = http_dashboard(cli)?;
            let tx = dashboard.execute_payments_tx(&account.context()?)?;
            output::render_transaction(&tx)
        }
    }
}

/// Decode a view result given as hex, without touching the network.
pub fn decode_offline(
    kind: DecodeKind,
    data: &str,
    layout: RecordLayout,
    format: OutputFormat,
) -> Result<String> {
    match kind {
        DecodeKind::Schedules => {
            let schedules = decode_schedules_hex(data, layout)?;
            output::render_schedules(&schedules, format)
        }
        DecodeKind::Schedule => {
            let schedule = decode_optional_schedule_hex(data, layout)?;
            output::render_schedule(0, schedule.as_ref(), format)
        }
        DecodeKind::History => {
            let latest = decode_transaction_history_hex(data, layout)?;
            let records: Vec<_> = latest.into_iter().collect();
            output::render_transactions(&records, format)
        }
        DecodeKind::Balance => {
            let text = data.trim();
            let bytes = hex::decode(text.strip_prefix("0x").unwrap_or(text))
                .context("invalid hex")?;
            output::render_balance(decode_balance(&bytes)?, format)
        }
    }
}

pub async fn run_cli() -> Result<()> {
    let cli = PaySystemCli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let rendered = execute(&cli).await?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod test;
