//! End-to-end engine scenarios over synthetic statement documents.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::str::FromStr;

use stmt_core::{
    DocumentError, InstitutionProfile, ParseWarning, StatementDocument, StatementEngine, StmtError,
    to_tsv_string,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn doc(pages: &[&[&str]]) -> StatementDocument {
    StatementDocument::new(
        pages
            .iter()
            .map(|page| page.iter().map(|s| s.to_string()).collect())
            .collect(),
    )
}

fn everyday_single_page() -> StatementDocument {
    doc(&[&[
        "Smart Access",
        "Account number: 06 2799 12930092",
        "Statement period",
        "24 Aug 2020 - 31 Dec 2020",
        "Opening balance",
        "$11,989.28 CR",
        "Date Transaction",
        "Debit",
        "Credit",
        "Balance",
        "$",
        "09 Dec AFTERPAY AU Sydney NSW",
        "104.99",
        "11,884.29",
        "10 Dec Direct Credit 123456 Salary",
        "5,167.11",
        "$17,051.40 CR",
    ]])
}

#[test]
fn test_everyday_statement_end_to_end() {
    let engine = StatementEngine::new(InstitutionProfile::everyday());
    let outcome = engine.process(&everyday_single_page()).unwrap();

    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.warnings.is_empty());

    let first = &outcome.records[0];
    assert_eq!(first.description, "AFTERPAY AU Sydney NSW");
    assert_eq!(first.amount, Some(dec("-104.99")));
    assert_eq!(first.balance, Some(dec("11884.29")));

    let second = &outcome.records[1];
    assert_eq!(second.amount, Some(dec("5167.11")));
    assert_eq!(second.balance, Some(dec("17051.40")));
}

#[test]
fn test_running_balance_arithmetic_holds() {
    let engine = StatementEngine::new(InstitutionProfile::everyday());
    let outcome = engine.process(&everyday_single_page()).unwrap();

    let mut running = outcome.context.opening_balance.unwrap();
    for record in &outcome.records {
        running += record.amount.unwrap();
        assert_eq!(record.balance, Some(running));
    }
}

#[test]
fn test_dates_are_monotonic() {
    let engine = StatementEngine::new(InstitutionProfile::everyday());
    let outcome = engine.process(&everyday_single_page()).unwrap();
    for pair in outcome.records.windows(2) {
        assert!(pair[0].date <= pair[1].date);
    }
}

#[test]
fn test_processing_is_idempotent() {
    let engine = StatementEngine::new(InstitutionProfile::everyday());
    let doc = everyday_single_page();
    let first = to_tsv_string(&engine.process(&doc).unwrap().records).unwrap();
    let second = to_tsv_string(&engine.process(&doc).unwrap().records).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_tsv_rows_match_contract() {
    let engine = StatementEngine::new(InstitutionProfile::everyday());
    let outcome = engine.process(&everyday_single_page()).unwrap();
    let tsv = to_tsv_string(&outcome.records).unwrap();
    let lines: Vec<&str> = tsv.lines().collect();

    assert_eq!(lines[0], "Date\tAccount Number\tTransaction\tAmount\tBalance");
    assert_eq!(
        lines[1],
        "09/12/2020\t06 2799 12930092\tAFTERPAY AU Sydney NSW\t-104.99\t11884.29"
    );
}

#[test]
fn test_year_rollover_and_closing_balance() {
    let engine = StatementEngine::new(InstitutionProfile::everyday());
    let outcome = engine
        .process(&doc(&[&[
            "Smart Access",
            "Account number: 123456",
            "1 Dec 2020 - 31 Jan 2021",
            "Date Transaction",
            "Debit",
            "Credit",
            "Balance",
            "$",
            "Opening balance",
            "$100.00 CR",
            "31 Dec Debit Interest",
            "10.00",
            "90.00",
            "02 Jan Credit Interest",
            "5.00",
            "95.00",
            "Closing balance",
            "$95.00 CR",
        ]]))
        .unwrap();

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].date.to_string(), "2020-12-31");
    assert_eq!(outcome.records[1].date.to_string(), "2021-01-02");
    assert_eq!(outcome.records[0].amount, Some(dec("-10.00")));
    assert_eq!(outcome.records[1].amount, Some(dec("5.00")));

    // Declared closing row is consumed, never emitted, and it matches
    // the running balance
    assert_eq!(outcome.context.closing_balance, Some(dec("95.00")));
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_closing_balance_mismatch_warns() {
    let engine = StatementEngine::new(InstitutionProfile::everyday());
    let outcome = engine
        .process(&doc(&[&[
            "Smart Access",
            "Account number: 123456",
            "1 Dec 2020 - 31 Jan 2021",
            "Date Transaction",
            "Debit",
            "Credit",
            "Balance",
            "$",
            "Opening balance",
            "$100.00 CR",
            "31 Dec Debit Interest",
            "10.00",
            "90.00",
            "Closing balance",
            "$80.00 CR",
        ]]))
        .unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(
        outcome.warnings,
        vec![ParseWarning::ClosingBalanceMismatch {
            running: dec("90.00"),
            declared: dec("80.00"),
        }]
    );
}

#[test]
fn test_carried_forward_spans_pages() {
    let salary_line = format!("10 Aug Monthly Pay Salary{} 2,000.00", ".".repeat(120));
    let engine = StatementEngine::new(InstitutionProfile::offset_home_loan());
    let outcome = engine
        .process(&doc(&[
            &[
                "Everyday Offset account",
                "Account number: 12-3456-7890",
                "1 Jul 2021 - 30 Sep 2021",
                "Date Particulars",
                "Opening Balance .......... 826.30",
                "05 Jul Loan Repayment.......... 1,500.00",
                "BALANCE CARRIED FORWARD .......... 673.70 DR",
            ],
            &[
                "Transaction Details - continued",
                "BALANCE BROUGHT FORWARD .......... 673.70 DR",
                salary_line.as_str(),
                "CLOSING BALANCE .......... 1,326.30",
            ],
        ]))
        .unwrap();

    // Marker rows never become records
    assert_eq!(outcome.records.len(), 2);
    for record in &outcome.records {
        assert!(!record.description.to_lowercase().contains("forward"));
    }

    let repayment = &outcome.records[0];
    assert_eq!(repayment.description, "Loan Repayment");
    assert_eq!(repayment.amount, Some(dec("-1500.00")));
    assert_eq!(repayment.balance, Some(dec("-673.70")));

    let salary = &outcome.records[1];
    assert_eq!(salary.description, "Monthly Pay Salary");
    assert_eq!(salary.amount, Some(dec("2000.00")));
    assert_eq!(salary.balance, Some(dec("1326.30")));

    // The carried-forward anchor and the declared closing figure
    // arithmetically confirm both amounts; nothing is left unverified
    assert!(
        !outcome
            .warnings
            .iter()
            .any(|w| matches!(w, ParseWarning::BalanceUnverified { .. }))
    );

    assert_eq!(outcome.context.closing_balance, Some(dec("1326.30")));
}

#[test]
fn test_carried_anchor_confirms_block_without_keywords() {
    // No DR/CR, no keyword match, short filler run: only the carried
    // figure can sign the amount
    let engine = StatementEngine::new(InstitutionProfile::offset_home_loan());
    let outcome = engine
        .process(&doc(&[&[
            "Everyday Offset account",
            "Account number: 12-3456-7890",
            "1 Jul 2021 - 30 Sep 2021",
            "Date Particulars",
            "Opening Balance .......... 826.30",
            "05 Jul Mystery Adjustment.......... 1,500.00",
            "BALANCE CARRIED FORWARD .......... 673.70 DR",
        ]]))
        .unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].amount, Some(dec("-1500.00")));
    assert_eq!(outcome.records[0].balance, Some(dec("-673.70")));
    assert!(
        !outcome
            .warnings
            .iter()
            .any(|w| matches!(w, ParseWarning::BalanceUnverified { .. }))
    );
}

#[test]
fn test_overflowed_block_dropped_and_scan_resumes() {
    let mut profile = InstitutionProfile::everyday();
    profile.max_block_lines = 2;
    let engine = StatementEngine::new(profile);
    let outcome = engine
        .process(&doc(&[&[
            "Smart Access",
            "Account number: 123456",
            "1 Dec 2020 - 31 Jan 2021",
            "Date Transaction",
            "Debit",
            "Credit",
            "Balance",
            "$",
            "Opening balance",
            "$100.00 CR",
            "09 Dec Runaway Block",
            "fragment one",
            "fragment two",
            "fragment three",
            "10 Dec Debit Interest",
            "10.00",
            "90.00",
        ]]))
        .unwrap();

    // The runaway block is dropped with a warning; the next date token
    // still yields its record
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].description, "Debit Interest");
    assert_eq!(outcome.records[0].amount, Some(dec("-10.00")));
    assert_eq!(outcome.records[0].balance, Some(dec("90.00")));

    let overflow_date = NaiveDate::from_ymd_opt(2020, 12, 9).unwrap();
    assert!(outcome.warnings.contains(&ParseWarning::BlockOverflow {
        date: overflow_date,
        lines: 2,
    }));
}

#[test]
fn test_passbook_signed_columns() {
    let engine = StatementEngine::new(InstitutionProfile::passbook());
    let outcome = engine
        .process(&doc(&[&[
            "Youth Saver statement",
            "Account number: 987654",
            "1 Jan 2021 - 30 Jun 2021",
            "Date Transaction",
            "+ In",
            "- Out",
            "Balance",
            "$",
            "$",
            "15 Feb Transfer From xx1234",
            "+$40.00",
            "20 Feb Transfer to xx9999",
            "-$15.00",
        ]]))
        .unwrap();

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].amount, Some(dec("40.00")));
    assert_eq!(outcome.records[1].amount, Some(dec("-15.00")));
    // Explicit signs need no balance confirmation
    assert!(
        !outcome
            .warnings
            .iter()
            .any(|w| matches!(w, ParseWarning::BalanceUnverified { .. }))
    );
}

#[test]
fn test_missing_header_rejects_document() {
    let engine = StatementEngine::new(InstitutionProfile::everyday());
    let err = engine
        .process(&doc(&[&[
            "Smart Access",
            "Account number: 123456",
            "1 Dec 2020 - 31 Jan 2021",
            "No transaction table on this page",
        ]]))
        .unwrap_err();
    assert!(matches!(
        err,
        StmtError::Document(DocumentError::TableNotFound)
    ));
}

#[test]
fn test_wrong_statement_type_rejected() {
    let engine = StatementEngine::new(InstitutionProfile::everyday());
    let err = engine
        .process(&doc(&[&["Some unrelated letter", "Kind regards"]]))
        .unwrap_err();
    assert!(matches!(
        err,
        StmtError::Document(DocumentError::WrongStatementType(_))
    ));
}

#[test]
fn test_empty_document_rejected() {
    let engine = StatementEngine::new(InstitutionProfile::everyday());
    let err = engine.process(&StatementDocument::default()).unwrap_err();
    assert!(matches!(err, StmtError::Document(DocumentError::NoPages)));
}

#[test]
fn test_table_with_no_transactions_yields_header_only_tsv() {
    let engine = StatementEngine::new(InstitutionProfile::everyday());
    let outcome = engine
        .process(&doc(&[&[
            "Smart Access",
            "Account number: 123456",
            "1 Dec 2020 - 31 Jan 2021",
            "Date Transaction",
            "Debit",
            "Credit",
            "Balance",
            "$",
        ]]))
        .unwrap();
    assert!(outcome.records.is_empty());

    let tsv = to_tsv_string(&outcome.records).unwrap();
    assert_eq!(tsv.trim_end(), "Date\tAccount Number\tTransaction\tAmount\tBalance");
}
