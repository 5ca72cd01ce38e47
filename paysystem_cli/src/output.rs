//! Rendering of dashboard data for the terminal.

use anyhow::{bail, Result};
use clap::ValueEnum;
use paysystem_client::{DashboardSnapshot, UnsignedTransaction};
use schedule_codec::{PaymentSchedule, ScheduleView, TokenAmount, TransactionRecord, TransactionView};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

const SCHEDULE_COLUMNS: [&str; 6] = [
    "#",
    "Recipient",
    "Amount (EGLD)",
    "Frequency (hours)",
    "Next Execution Time",
    "End Time",
];

const TRANSACTION_COLUMNS: [&str; 3] = ["Recipient", "Amount (EGLD)", "Timestamp"];

pub fn schedule_views(schedules: &[PaymentSchedule]) -> Vec<ScheduleView> {
    schedules
        .iter()
        .enumerate()
        .map(|(index, schedule)| schedule.to_view(index))
        .collect()
}

pub fn transaction_views(records: &[TransactionRecord]) -> Vec<TransactionView> {
    records.iter().map(TransactionRecord::to_view).collect()
}

pub fn render_schedules(schedules: &[PaymentSchedule], format: OutputFormat) -> Result<String> {
    let views = schedule_views(schedules);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&views)?),
        OutputFormat::Csv => to_csv(&views),
        OutputFormat::Table => {
            if views.is_empty() {
                return Ok("No subscriptions found".to_string());
            }
            let rows = views.iter().map(schedule_row).collect::<Vec<_>>();
            Ok(table(&SCHEDULE_COLUMNS, &rows))
        }
    }
}

/// Render a single schedule, keeping the position it was requested at.
pub fn render_schedule(
    index: usize,
    schedule: Option<&PaymentSchedule>,
    format: OutputFormat,
) -> Result<String> {
    let Some(schedule) = schedule else {
        return match format {
            OutputFormat::Json => Ok("null".to_string()),
            OutputFormat::Csv => Ok(String::new()),
            OutputFormat::Table => Ok(format!("No subscription at index {}", index)),
        };
    };
    let view = schedule.to_view(index);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&view)?),
        OutputFormat::Csv => to_csv(&[view]),
        OutputFormat::Table => Ok(table(&SCHEDULE_COLUMNS, &[schedule_row(&view)])),
    }
}

fn schedule_row(view: &ScheduleView) -> Vec<String> {
    vec![
        view.index.to_string(),
        view.recipient.clone(),
        view.amount.clone(),
        view.frequency_hours.to_string(),
        view.next_execution_time.clone(),
        view.end_time.clone(),
    ]
}

pub fn render_transactions(records: &[TransactionRecord], format: OutputFormat) -> Result<String> {
    let views = transaction_views(records);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&views)?),
        OutputFormat::Csv => to_csv(&views),
        OutputFormat::Table => {
            if views.is_empty() {
                return Ok("No transactions found".to_string());
            }
            let rows = views
                .iter()
                .map(|v| vec![v.recipient.clone(), v.amount.clone(), v.timestamp.clone()])
                .collect::<Vec<_>>();
            Ok(table(&TRANSACTION_COLUMNS, &rows))
        }
    }
}

pub fn render_balance(balance: TokenAmount, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "balance": balance.to_display(),
            "atomic": balance.atomic().to_string(),
        }))?),
        OutputFormat::Csv => Ok(format!("balance\n{}\n", balance.to_display())),
        OutputFormat::Table => Ok(format!("Balance: {} EGLD", balance.to_display())),
    }
}

pub fn render_snapshot(snapshot: &DashboardSnapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct SnapshotView {
                balance: String,
                schedules: Vec<ScheduleView>,
                transactions: Vec<TransactionView>,
            }
            Ok(serde_json::to_string_pretty(&SnapshotView {
                balance: snapshot.balance.to_display(),
                schedules: schedule_views(&snapshot.schedules),
                transactions: transaction_views(&snapshot.transactions),
            })?)
        }
        OutputFormat::Csv => bail!("csv output is not available for a dashboard snapshot"),
        OutputFormat::Table => Ok(format!(
            "{}\n\n{}\n\n{}",
            render_balance(snapshot.balance, OutputFormat::Table)?,
            render_schedules(&snapshot.schedules, OutputFormat::Table)?,
            render_transactions(&snapshot.transactions, OutputFormat::Table)?
        )),
    }
}

pub fn render_transaction(tx: &UnsignedTransaction) -> Result<String> {
    Ok(serde_json::to_string_pretty(tx)?)
}

fn to_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

fn table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = vec![pad_line(columns, &widths)];
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push(pad_line(&cells, &widths));
    }
    out.join("\n")
}

fn pad_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
