#![cfg(test)]

use integration_tests::{
    balance_buffer, history_buffer, schedule_option_buffer, schedules_buffer, ScriptedGateway,
};
use paysystem_client::dashboard::{
    GET_BALANCE, GET_SCHEDULE, GET_SCHEDULES, GET_TRANSACTION_HISTORY,
};
use paysystem_client::{
    AccountContext, ClientError, Dashboard, DepositForm, HttpGateway, NetworkContext,
    ScheduleForm,
};
use schedule_codec::{
    Address, AmountWidth, PaymentSchedule, RecordLayout, TokenAmount, TransactionRecord,
    ADDRESS_LEN, ARG_SEPARATOR, DENOMINATION,
};

const T: u64 = 1_700_000_000;

fn address(byte: u8) -> Address {
    Address::from_bytes([byte; ADDRESS_LEN])
}

fn network() -> NetworkContext {
    NetworkContext::new("http://localhost:7950", address(0xcc))
}

/// Simulates a complete user flow against a scripted contract:
/// 1. Deposit funds and read the balance back
/// 2. Create two subscriptions from form input
/// 3. List them, then cancel the second by its list position
/// 4. Read payment history after execution
#[tokio::test]
async fn test_subscription_user_flow() {
    let dashboard = Dashboard::new(ScriptedGateway::default(), network());
    let user = AccountContext::new(address(0xaa), 0);

    // Step 1: deposit 10 EGLD
    let deposit = dashboard
        .deposit_tx(&user, &DepositForm { amount: "10".into() })
        .unwrap();
    assert_eq!(deposit.value, (10 * DENOMINATION).to_string());
    assert_eq!(deposit.payload().as_deref(), Some("depositFunds"));

    dashboard
        .gateway()
        .set(GET_BALANCE, balance_buffer(10 * DENOMINATION));
    assert_eq!(dashboard.load_balance(&user.address).await.to_display(), "10");

    // Step 2: two subscriptions
    let forms = [
        ScheduleForm {
            recipient: address(0x01).to_bech32(),
            amount: "1.0".into(),
            frequency: "1".into(),
            start_time: T.to_string(),
            end_time: (T + 3600).to_string(),
        },
        ScheduleForm {
            recipient: address(0x02).to_bech32(),
            amount: "2.5".into(),
            frequency: "24".into(),
            start_time: "2023-11-14T22:13:20".into(),
            end_time: "2023-12-14T22:13:20".into(),
        },
    ];

    let mut created = Vec::new();
    for (nonce, form) in forms.iter().enumerate() {
        let account = AccountContext::new(user.address, nonce as u64 + 1);
        let tx = dashboard.add_schedule_tx(&account, form).unwrap();
        assert_eq!(tx.nonce, nonce as u64 + 1);

        let payload = tx.payload().unwrap();
        let args: Vec<&str> = payload.split(ARG_SEPARATOR).collect();
        assert_eq!(args[0], "addSchedule");
        assert_eq!(args.len(), 6);

        let schedule = form.validate().unwrap();
        assert_eq!(args[1], schedule.recipient.to_hex());
        assert!(args[5].starts_with("0100000000"));

        created.push(PaymentSchedule {
            recipient: schedule.recipient,
            amount: schedule.amount,
            frequency: schedule.frequency_seconds().unwrap(),
            next_execution_time: schedule.start_time,
            end_time: schedule.end_time,
        });
    }

    // Step 3: list and cancel
    dashboard.gateway().set(
        GET_SCHEDULES,
        schedules_buffer(&created, AmountWidth::Narrow),
    );
    let listed = dashboard.load_schedules(&user.address).await;
    assert_eq!(listed, created);
    assert_eq!(listed[1].to_view(1).amount, "2.5");
    assert_eq!(listed[1].frequency_hours(), 24);

    let position = listed
        .iter()
        .position(|s| s.recipient == address(0x02))
        .unwrap() as u32;

    dashboard.gateway().set(
        GET_SCHEDULE,
        schedule_option_buffer(Some(&listed[1]), AmountWidth::Narrow),
    );
    assert_eq!(
        dashboard.fetch_schedule(&user.address, position).await.unwrap(),
        Some(listed[1].clone())
    );

    let cancel = dashboard.cancel_schedule_tx(&user, position).unwrap();
    assert_eq!(cancel.payload().as_deref(), Some("cancelSchedule@00000001"));

    dashboard.gateway().set(
        GET_SCHEDULES,
        schedules_buffer(&created[..1], AmountWidth::Narrow),
    );
    assert_eq!(dashboard.load_schedules(&user.address).await.len(), 1);

    // Step 4: history
    let executed = vec![TransactionRecord {
        recipient: address(0x01),
        amount: TokenAmount::from_atomic(DENOMINATION),
        timestamp: T,
    }];
    dashboard.gateway().set(
        GET_TRANSACTION_HISTORY,
        history_buffer(executed.first(), AmountWidth::Narrow),
    );
    dashboard
        .gateway()
        .set(GET_BALANCE, balance_buffer(9 * DENOMINATION));

    let snapshot = dashboard.refresh(&user.address).await;
    assert_eq!(snapshot.balance.to_display(), "9");
    assert_eq!(snapshot.schedules.len(), 1);
    assert_eq!(snapshot.transactions, executed);

    let calls = dashboard.gateway().calls();
    assert!(calls.iter().all(|q| q.contract == address(0xcc)));
    assert!(calls.iter().all(|q| q.args[0] == user.address.to_hex()));
    assert!(calls
        .iter()
        .filter(|q| q.function == GET_SCHEDULE)
        .all(|q| q.args == vec![user.address.to_hex(), "00000001".to_string()]));
}

/// Every view failure leaves the dashboard in its empty state.
#[tokio::test]
async fn test_failed_views_reset_to_defaults() {
    let dashboard = Dashboard::new(ScriptedGateway::default(), network());
    let owner = address(0xaa);

    // unscripted views return no data at all
    assert!(matches!(
        dashboard.fetch_schedules(&owner).await,
        Err(ClientError::InvalidResponseFormat(_))
    ));

    dashboard.gateway().fail(GET_SCHEDULES);
    dashboard.gateway().fail(GET_BALANCE);
    dashboard
        .gateway()
        .set(GET_TRANSACTION_HISTORY, vec![0u8; ADDRESS_LEN + 3]);

    assert!(matches!(
        dashboard.fetch_balance(&owner).await,
        Err(ClientError::Transport { .. })
    ));
    assert!(matches!(
        dashboard.fetch_transactions(&owner).await,
        Err(ClientError::Codec(_))
    ));

    let snapshot = dashboard.refresh(&owner).await;
    assert_eq!(snapshot.balance, TokenAmount::ZERO);
    assert!(snapshot.schedules.is_empty());
    assert!(snapshot.transactions.is_empty());
}

/// A buffer written with 16-byte amounts only decodes when the network
/// context is configured for it.
#[tokio::test]
async fn test_amount_width_must_match_contract() {
    let schedules: Vec<PaymentSchedule> = (0..3u8)
        .map(|i| PaymentSchedule {
            recipient: address(i + 1),
            amount: TokenAmount::from_atomic(u128::from(i + 1) * DENOMINATION),
            frequency: 3600,
            next_execution_time: T,
            end_time: T + 86_400,
        })
        .collect();
    let wide_buffer = schedules_buffer(&schedules, AmountWidth::Wide);
    assert_eq!(wide_buffer.len(), 3 * 80);

    let narrow = Dashboard::new(ScriptedGateway::default(), network());
    narrow.gateway().set(GET_SCHEDULES, wide_buffer.clone());
    assert!(narrow.fetch_schedules(&address(0xaa)).await.is_err());
    assert!(narrow.load_schedules(&address(0xaa)).await.is_empty());

    let mut ctx = network();
    ctx.layout = RecordLayout::new(AmountWidth::Wide);
    let wide = Dashboard::new(ScriptedGateway::default(), ctx);
    wide.gateway().set(GET_SCHEDULES, wide_buffer);
    assert_eq!(wide.fetch_schedules(&address(0xaa)).await.unwrap(), schedules);
}

/// Single-value views report absence as an empty result, and the history
/// view carries only the latest payment.
#[tokio::test]
async fn test_single_value_views() {
    let dashboard = Dashboard::new(ScriptedGateway::default(), network());
    let owner = address(0xaa);

    dashboard
        .gateway()
        .set(GET_SCHEDULE, schedule_option_buffer(None, AmountWidth::Narrow));
    dashboard
        .gateway()
        .set(GET_TRANSACTION_HISTORY, history_buffer(None, AmountWidth::Narrow));
    assert_eq!(dashboard.fetch_schedule(&owner, 7).await.unwrap(), None);
    assert!(dashboard.fetch_transactions(&owner).await.unwrap().is_empty());

    let latest = TransactionRecord {
        recipient: address(0x03),
        amount: TokenAmount::from_atomic(DENOMINATION / 4),
        timestamp: T + 60,
    };
    let mut two = history_buffer(Some(&latest), AmountWidth::Narrow);
    let record = two[1..].to_vec();
    two.extend_from_slice(&record);
    dashboard.gateway().set(GET_TRANSACTION_HISTORY, two);
    assert!(matches!(
        dashboard.fetch_transactions(&owner).await,
        Err(ClientError::Codec(_))
    ));
    assert!(dashboard.load_transactions(&owner).await.is_empty());

    dashboard.gateway().set(
        GET_TRANSACTION_HISTORY,
        history_buffer(Some(&latest), AmountWidth::Narrow),
    );
    assert_eq!(dashboard.load_transactions(&owner).await, vec![latest]);
}

/// An unreachable gateway fails the strict views, and the fallback views
/// swallow the failure.
#[tokio::test]
async fn test_http_gateway_unreachable() {
    let mut ctx = network();
    ctx.gateway = "http://127.0.0.1:9".into();
    let dashboard = Dashboard::new(HttpGateway::new(ctx.gateway.clone()), ctx);
    let owner = address(0xaa);

    assert!(dashboard.fetch_balance(&owner).await.is_err());
    assert_eq!(dashboard.load_balance(&owner).await, TokenAmount::ZERO);
    assert!(dashboard.load_schedules(&owner).await.is_empty());
}

#[test]
fn test_unsigned_transaction_serializes_for_wallet() {
    let dashboard = Dashboard::new(ScriptedGateway::default(), network());
    let tx = dashboard
        .cancel_schedule_tx(&AccountContext::new(address(0xaa), 12), 5)
        .unwrap();
    let json = serde_json::to_value(&tx).unwrap();

    for key in [
        "nonce", "value", "receiver", "sender", "gasPrice", "gasLimit", "data", "chainID",
        "version",
    ] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["receiver"], address(0xcc).to_bech32());
    assert_eq!(json["nonce"], 12);
}
