mod testsuit {
    use crate::output::{
        render_balance, render_schedule, render_schedules, render_snapshot, render_transactions,
    };
    use paysystem_client::DashboardSnapshot;
    use crate::*;
    use clap::Parser;
    use schedule_codec::{
        PaymentSchedule, TokenAmount, TransactionRecord, ADDRESS_LEN, DENOMINATION,
        OPTION_SOME_TAG,
    };

    const T: u64 = 1_700_000_000;

    fn address(byte: u8) -> Address {
        Address::from_bytes([byte; ADDRESS_LEN])
    }

    fn schedule() -> PaymentSchedule {
        PaymentSchedule {
            recipient: address(1),
            amount: TokenAmount::from_atomic(DENOMINATION * 3 / 2),
            frequency: 7200,
            next_execution_time: T,
            end_time: u64::MAX,
        }
    }

    fn parse(args: &[&str]) -> PaySystemCli {
        let mut argv = vec!["paysystem"];
        argv.extend_from_slice(args);
        PaySystemCli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_render_schedules_table() {
        let out = render_schedules(&[schedule()], OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#"));
        assert!(lines[0].contains("Frequency (hours)"));
        assert!(lines[1].contains(&address(1).to_bech32()));
        assert!(lines[1].contains("1.5"));
        assert!(lines[1].contains("2023-11-14 22:13:20 UTC"));
        assert!(lines[1].ends_with("never"));

        let empty = render_schedules(&[], OutputFormat::Table).unwrap();
        assert_eq!(empty, "No subscriptions found");
    }

    #[test]
    fn test_render_schedules_csv_and_json() {
        let csv = render_schedules(&[schedule(), schedule()], OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("index,recipient,amount,frequency_hours,next_execution_time,end_time")
        );
        assert!(lines.next().unwrap().starts_with("0,erd1"));
        assert!(lines.next().unwrap().starts_with("1,erd1"));

        let json = render_schedules(&[schedule()], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["amount"], "1.5");
        assert_eq!(value[0]["frequency_hours"], 2);
    }

    #[test]
    fn test_render_balance_and_history() {
        let balance = TokenAmount::from_atomic(DENOMINATION);
        assert_eq!(
            render_balance(balance, OutputFormat::Table).unwrap(),
            "Balance: 1 EGLD"
        );
        let json: serde_json::Value =
            serde_json::from_str(&render_balance(balance, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["atomic"], "1000000000000000000");

        let records = vec![TransactionRecord {
            recipient: address(2),
            amount: TokenAmount::from_atomic(DENOMINATION / 10),
            timestamp: 0,
        }];
        let out = render_transactions(&records, OutputFormat::Table).unwrap();
        assert!(out.contains("0.1"));
        assert!(out.contains("1970-01-01 00:00:00 UTC"));
        assert_eq!(
            render_transactions(&[], OutputFormat::Table).unwrap(),
            "No transactions found"
        );
    }

    #[test]
    fn test_decode_offline() {
        let mut buf = vec![4u8; ADDRESS_LEN];
        buf.extend_from_slice(&(DENOMINATION as u64).to_be_bytes());
        buf.extend_from_slice(&3600u64.to_le_bytes());
        buf.extend_from_slice(&T.to_le_bytes());
        buf.extend_from_slice(&T.to_le_bytes());
        let data = hex::encode(&buf);

        let out = decode_offline(
            DecodeKind::Schedules,
            &data,
            RecordLayout::default(),
            OutputFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["recipient"], address(4).to_bech32());

        let truncated = decode_offline(
            DecodeKind::Schedules,
            &data[..100],
            RecordLayout::default(),
            OutputFormat::Json,
        );
        assert!(truncated.unwrap_err().to_string().contains("truncated record"));

        let balance = decode_offline(
            DecodeKind::Balance,
            "0x0de0b6b3a7640000",
            RecordLayout::default(),
            OutputFormat::Table,
        )
        .unwrap();
        assert_eq!(balance, "Balance: 1 EGLD");
    }

    #[test]
    fn test_render_single_schedule() {
        let out = render_schedule(3, Some(&schedule()), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("3 "));
        assert!(lines[1].contains("1.5"));

        let json: serde_json::Value = serde_json::from_str(
            &render_schedule(3, Some(&schedule()), OutputFormat::Json).unwrap(),
        )
        .unwrap();
        assert_eq!(json["index"], 3);

        assert_eq!(
            render_schedule(4, None, OutputFormat::Table).unwrap(),
            "No subscription at index 4"
        );
        assert_eq!(render_schedule(4, None, OutputFormat::Json).unwrap(), "null");
    }

    #[test]
    fn test_render_snapshot_formats() {
        let snapshot = DashboardSnapshot {
            balance: TokenAmount::from_atomic(DENOMINATION),
            schedules: vec![schedule()],
            transactions: Vec::new(),
        };
        let table = render_snapshot(&snapshot, OutputFormat::Table).unwrap();
        assert!(table.starts_with("Balance: 1 EGLD"));
        assert!(table.ends_with("No transactions found"));

        let json: serde_json::Value =
            serde_json::from_str(&render_snapshot(&snapshot, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["schedules"][0]["amount"], "1.5");

        assert!(render_snapshot(&snapshot, OutputFormat::Csv).is_err());
    }

    #[test]
    fn test_decode_offline_single_values() {
        let mut record = vec![5u8; ADDRESS_LEN];
        record.extend_from_slice(&(DENOMINATION as u64).to_be_bytes());
        record.extend_from_slice(&T.to_le_bytes());
        let mut tagged = vec![OPTION_SOME_TAG];
        tagged.extend_from_slice(&record);

        let out = decode_offline(
            DecodeKind::History,
            &hex::encode(&tagged),
            RecordLayout::default(),
            OutputFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["recipient"], address(5).to_bech32());

        let none = decode_offline(
            DecodeKind::History,
            "",
            RecordLayout::default(),
            OutputFormat::Table,
        )
        .unwrap();
        assert_eq!(none, "No transactions found");

        let untagged = decode_offline(
            DecodeKind::History,
            &hex::encode(&record),
            RecordLayout::default(),
            OutputFormat::Table,
        );
        assert!(untagged
            .unwrap_err()
            .to_string()
            .contains("invalid option tag 0x05"));

        let empty_schedule = decode_offline(
            DecodeKind::Schedule,
            "",
            RecordLayout::default(),
            OutputFormat::Table,
        )
        .unwrap();
        assert_eq!(empty_schedule, "No subscription at index 0");
    }

    #[test]
    fn test_cli_parsing() {
        let owner = address(7).to_bech32();
        let cli = parse(&["-f", "csv", "--amount-width", "wide", "schedules", &owner]);
        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(cli.amount_width, Some(WidthArg::Wide));
        assert!(matches!(cli.command, PaySystemCommand::Schedules { .. }));

        let sender = address(8).to_bech32();
        let cli = parse(&["cancel", "--sender", &sender, "--nonce", "4", "5"]);
        match cli.command {
            PaySystemCommand::Cancel { account, index } => {
                assert_eq!(account.nonce, 4);
                assert_eq!(index, 5);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = parse(&["schedule", &owner, "2"]);
        match cli.command {
            PaySystemCommand::Schedule { index, .. } => assert_eq!(index, 2),
            other => panic!("unexpected command {:?}", other),
        }

        assert!(PaySystemCli::try_parse_from(["paysystem", "-f", "yaml", "balance", "x"]).is_err());
    }

    #[test]
    fn test_network_context_flags_override() {
        let contract = address(0x42).to_bech32();
        let cli = parse(&[
            "--gateway",
            "http://127.0.0.1:7950",
            "--contract",
            &contract,
            "--amount-width",
            "wide",
            "balance",
            &address(1).to_bech32(),
        ]);
        let ctx = network_context(&cli).unwrap();
        assert_eq!(ctx.gateway, "http://127.0.0.1:7950");
        assert_eq!(ctx.contract, address(0x42));
        assert_eq!(ctx.layout.amount_width, AmountWidth::Wide);
    }

    #[tokio::test]
    async fn test_execute_builds_unsigned_transactions() {
        let contract = address(0x42).to_bech32();
        let sender = address(0xaa).to_bech32();

        let cli = parse(&[
            "--contract", &contract, "cancel", "--sender", &sender, "--nonce", "9", "5",
        ]);
        let out = execute(&cli).await.unwrap();
        let tx: paysystem_client::UnsignedTransaction = serde_json::from_str(&out).unwrap();
        assert_eq!(tx.nonce, 9);
        assert_eq!(tx.receiver, address(0x42));
        assert_eq!(tx.payload().as_deref(), Some("cancelSchedule@00000005"));

        let cli = parse(&[
            "--contract", &contract, "deposit", "--sender", &sender, "0.5",
        ]);
        let out = execute(&cli).await.unwrap();
        let tx: paysystem_client::UnsignedTransaction = serde_json::from_str(&out).unwrap();
        assert_eq!(tx.value, "500000000000000000");

        let cli = parse(&[
            "--contract",
            &contract,
            "add-schedule",
            "--sender",
            &sender,
            "--recipient",
            &address(0x11).to_bech32(),
            "--amount",
            "",
            "--frequency",
            "1",
            "--start",
            "2024-01-01T00:00",
            "--end",
            "2024-02-01T00:00",
        ]);
        let err = execute(&cli).await.unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all required fields.");
    }

    #[tokio::test]
    async fn test_execute_dashboard_honours_strict_and_format() {
        let owner = address(0xaa).to_bech32();
        let contract = address(0x42).to_bech32();
        let base = ["--gateway", "http://127.0.0.1:9", "--contract", contract.as_str()];

        let mut args = base.to_vec();
        args.extend(["dashboard", owner.as_str()]);
        let relaxed = execute(&parse(&args)).await.unwrap();
        assert!(relaxed.starts_with("Balance: 0 EGLD"));

        let mut args = base.to_vec();
        args.extend(["--strict", "dashboard", owner.as_str()]);
        assert!(execute(&parse(&args)).await.is_err());

        let mut args = base.to_vec();
        args.extend(["-f", "csv", "dashboard", owner.as_str()]);
        let err = execute(&parse(&args)).await.unwrap_err();
        assert!(err.to_string().contains("csv output is not available"));
    }
}
