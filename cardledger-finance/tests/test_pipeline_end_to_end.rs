use cardledger_core::{Category, IssuerId, LedgerError, SourceConfig, DEFAULT_PAYER};
use cardledger_finance::{LedgerSummary, OutputOptions, Pipeline};
use std::fs;
use std::path::Path;

const AMEX: &str = "\
Date,Description,Card Member,Account #,Amount,Extended Details,Appears On Your Statement As,Address,City/State,Zip Code,Country,Reference,Category
01/02/2025,NETFLIX.COM,ALEX DOE,-11001,15.49,,,,,,,'320250020',Travel-Airline
01/03/2025,WHOLEFDS MKT 10234,JORDAN DOE,-11009,82.17,,,,,,,'320250031',Merchandise & Supplies-Groceries
01/05/2025,ONLINE PAYMENT - THANK YOU,ALEX DOE,-11001,-500.00,,,,,,,'320250052',
01/06/2025,MTA*NYCT PAYGO,ALEX DOE,-11001,2.90,,,,,,,'320250061',Transportation-Other Transportation
";

const CHASE: &str = "\
Transaction Date,Post Date,Description,Category,Type,Amount,Memo
01/04/2025,01/05/2025,BLUE BOTTLE COFFEE,Food & Drink,Sale,-5.75,
01/08/2025,01/08/2025,Payment Thank You - Web,,Payment,250.00,
01/09/2025,01/10/2025,HOTEL RETURN,Travel,Return,42.50,
";

const OLD_NAVY: &str = "\
Transaction Date,Description,Reference,Amount
01/11/2025,OLD NAVY ONLINE,1001,-34.00
";

const CAPITAL_ONE: &str = "\
Transaction Date,Posted Date,Card No.,Description,Category,Debit,Credit
2025-01-12,2025-01-13,4321,TMOBILE*AUTO PAY,Phone/Cable,70.00,
2025-01-14,2025-01-15,4321,RANDOM STORE,Merchandise,,12.00
";

const VENMO: &str = "\
Account Statement - (@alex),,,,,,,,
,ID,Datetime,Type,Status,Note,From,To,Amount (total)
,9001,2025-01-16T19:00:00,Payment,Complete,pizza,Alex,Sam,- $18.00
,9002,2025-01-17T19:00:00,Payment,Issued,ignored,Alex,Sam,- $1.00
";

const FIDELITY: &str = "\
Run Date,Action,Symbol,Description,Type,Amount ($),Settlement Date
01/20/2025,CONTRIBUTION,,ROTH CONTRIBUTION,Cash,200.00,01/21/2025
01/21/2025,YOU BOUGHT,FXAIX,INDEX FUND,Cash,-200.00,01/22/2025
";

fn write(dir: &Path, name: &str, body: &str) -> SourceConfig {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    let hint = cardledger_ingest::infer_source(name).expect("known file name");
    SourceConfig::new(path, hint.label, hint.issuer)
}

fn sources(dir: &Path) -> Vec<SourceConfig> {
    vec![
        write(dir, "2025-amex-gold-card.csv", AMEX),
        write(dir, "2025-chase-freedom-flex-card.csv", CHASE),
        write(dir, "2025-old-navy-card.csv", OLD_NAVY),
        write(dir, "2025-capital1-venture-rewards-card.csv", CAPITAL_ONE),
        write(dir, "venmo-2025.csv", VENMO),
        write(dir, "fidelity-2025.csv", FIDELITY),
    ]
}

#[test]
fn test_compile_all_sources_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Pipeline::default().compile(&sources(dir.path())).unwrap();

    let got: Vec<(&str, &str, f64, Category)> = ledger
        .records
        .iter()
        .map(|r| (r.source.as_str(), r.merchant.as_str(), r.amount, r.category))
        .collect();

    assert_eq!(
        got,
        vec![
            ("Amex - Gold", "NETFLIX.COM", 15.49, Category::Subscriptions),
            ("Amex - Gold", "WHOLEFDS MKT 10234", 82.17, Category::Groceries),
            ("Amex - Gold", "MTA*NYCT PAYGO", 2.9, Category::Transport),
            ("Chase - Freedom Flex", "BLUE BOTTLE COFFEE", 5.75, Category::FoodAndDrink),
            ("Chase - Freedom Flex", "HOTEL RETURN", -42.5, Category::Travel),
            ("Old Navy", "OLD NAVY ONLINE", 34.0, Category::Shopping),
            ("Capital One - Venture Rewards", "TMOBILE*AUTO PAY", 70.0, Category::Bills),
            ("Capital One - Venture Rewards", "RANDOM STORE", -12.0, Category::Shopping),
            ("Venmo", "pizza", 18.0, Category::Other),
            ("Fidelity", "ROTH CONTRIBUTION", 200.0, Category::Investments),
        ]
    );

    assert_eq!(ledger.records[1].payer, "JORDAN DOE");
    assert_eq!(ledger.records[3].payer, DEFAULT_PAYER);
    assert_eq!(ledger.records[8].date, "01/16/2025");

    let dropped: usize = ledger.sources.iter().map(|s| s.payments_dropped).sum();
    assert_eq!(dropped, 2);
    assert_eq!(ledger.sources.len(), 6);
    assert_eq!(ledger.sources[0].issuer, IssuerId::Amex);
}

#[test]
fn test_output_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let srcs = sources(dir.path());
    let pipeline = Pipeline::default();

    let first = dir.path().join("out/first.csv");
    let second = dir.path().join("out/second.csv");
    pipeline.run(&srcs, &OutputOptions::append_to(&first)).unwrap();
    pipeline.run(&srcs, &OutputOptions::append_to(&second)).unwrap();

    let a = fs::read(&first).unwrap();
    let b = fs::read(&second).unwrap();
    assert!(!a.is_empty());
    assert_eq!(a, b);

    let text = String::from_utf8(a).unwrap();
    let first_line = text.lines().next().unwrap();
    assert_eq!(first_line, "Amex - Gold,01/02/2025,NETFLIX.COM,15.49,Subscriptions,ALEX DOE");
    assert_eq!(text.lines().count(), 10);
}

#[test]
fn test_append_mode_writes_header_once() {
    let dir = tempfile::tempdir().unwrap();
    let srcs = sources(dir.path());
    let out = OutputOptions {
        path: dir.path().join("ledger.csv"),
        write_header: true,
        overwrite: false,
    };

    let pipeline = Pipeline::default();
    pipeline.run(&srcs, &out).unwrap();
    pipeline.run(&srcs, &out).unwrap();

    let text = fs::read_to_string(&out.path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Source,Purchase Date,Item,Amount,Category,Spender");
    assert_eq!(lines.len(), 21);
    assert_eq!(lines.iter().filter(|l| l.starts_with("Source,")).count(), 1);

    // overwrite starts fresh
    let fresh = OutputOptions { overwrite: true, ..out.clone() };
    pipeline.run(&srcs, &fresh).unwrap();
    assert_eq!(fs::read_to_string(&out.path).unwrap().lines().count(), 11);
}

#[test]
fn test_fatal_error_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut srcs = sources(dir.path());
    srcs.push(write(
        dir.path(),
        "2025-discover-card.csv",
        "Trans. Date,Post Date,Description,Amount,Category\n01/02/2025,01/03/2025,STORE,12..0,Merchandise\n",
    ));

    let out = OutputOptions::append_to(dir.path().join("ledger.csv"));
    let err = Pipeline::default().run(&srcs, &out).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::MalformedAmount { .. })
    ));
    assert!(format!("{err:#}").contains("Discover: data row 1"));
    assert!(!out.path.exists());
}

#[test]
fn test_missing_input_file_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let srcs = vec![SourceConfig::new(dir.path().join("nope.csv"), "Discover", IssuerId::Discover)];
    let err = Pipeline::default().compile(&srcs).unwrap_err();
    assert!(format!("{err:#}").contains("nope.csv"));
}

#[test]
fn test_shape_mismatch_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let src = write(dir.path(), "2025-discover-card.csv", "Trans. Date,Post Date,Description\n01/02/2025,01/03/2025\n");
    let err = Pipeline::default().compile(&[src]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::RowShapeMismatch { field: "merchant", index: 2, row_len: 2 })
    ));
}

#[test]
fn test_summary_over_compiled_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Pipeline::default().compile(&sources(dir.path())).unwrap();
    let summary = LedgerSummary::from_records(&ledger.records);

    assert_eq!(summary.record_count, 10);
    assert_eq!(summary.by_category[0].category, Category::Investments);
    assert_eq!(summary.by_source.len(), 6);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["by_category"][0]["category"], "Investments");
}
