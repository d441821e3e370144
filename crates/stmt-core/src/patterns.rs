//! Common regex patterns for statement line classification.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date tokens: "9 Dec" or "9 Dec 2020" as the whole line
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"^(\d{1,2})\s+([A-Za-z]{3,9})\s*$"
    ).unwrap();

    pub static ref DATE_TOKEN_WITH_YEAR: Regex = Regex::new(
        r"^(\d{1,2})\s+([A-Za-z]{3,9})\s+(\d{4})\s*$"
    ).unwrap();

    // Date at the start of a line, with the transaction text on the same line
    pub static ref DATE_AT_START: Regex = Regex::new(
        r"^(\d{1,2}\s+[A-Za-z]{3,9}(?:\s+\d{4})?)\s+(\S.*)$"
    ).unwrap();

    // Statement period: "24 Aug 2020 - 31 Dec 2020"
    pub static ref PERIOD_RANGE: Regex = Regex::new(
        r"(\d{1,2}\s+[A-Za-z]{3,9}\s+(\d{4}))\s*-\s*(\d{1,2}\s+[A-Za-z]{3,9}\s+\d{4})"
    ).unwrap();

    // Account id: the digits after a profile label, or alone on the
    // line following it
    pub static ref ACCOUNT_NUMBER_AFTER_LABEL: Regex = Regex::new(
        r"^[:.\s]*([\d][\d\s-]{5,})"
    ).unwrap();

    pub static ref ACCOUNT_NUMBER_BARE: Regex = Regex::new(
        r"^[\d][\d\s-]{5,}$"
    ).unwrap();

    // Unlabelled card number: four groups of four digits
    pub static ref CARD_NUMBER: Regex = Regex::new(
        r"\b(\d{4}[\s-]\d{4}[\s-]\d{4}[\s-]\d{4})\b"
    ).unwrap();

    // Amounts
    pub static ref AMOUNT_BARE: Regex = Regex::new(
        r"^\$?\s*([\d,]+\.\d{2})\s*$"
    ).unwrap();

    pub static ref AMOUNT_NEGATIVE: Regex = Regex::new(
        r"^-\s*([\d,]+\.?\d*)\s*$"
    ).unwrap();

    pub static ref AMOUNT_TRAILING_MINUS: Regex = Regex::new(
        r"^\$?\s*([\d,]+\.\d{2})\s*-\s*$"
    ).unwrap();

    pub static ref AMOUNT_PARENS: Regex = Regex::new(
        r"^\(\s*([\d,]+\.?\d*)\s*\)\s*$"
    ).unwrap();

    pub static ref AMOUNT_SIGNED_PREFIX: Regex = Regex::new(
        r"^([+-])\s*\$?\s*([\d,]+\.\d{2})\s*$"
    ).unwrap();

    pub static ref AMOUNT_ANYWHERE: Regex = Regex::new(
        r"([\d,]+\.\d{2})"
    ).unwrap();

    // Balance with explicit DR/CR suffix: "$292.80 DR", "8,835.67CR"
    pub static ref BALANCE_DR_CR: Regex = Regex::new(
        r"(?i)^\$?\s*([\d,]+\.?\d*)\s*(DR|CR)\.?\s*$"
    ).unwrap();

    // Filler run (dot leader) followed by an amount, used as a weak
    // column-position signal
    pub static ref FILLER_AMOUNT: Regex = Regex::new(
        r"^(.*?)(\.{3,})\s*([\d,]+\.\d{2})\s*$"
    ).unwrap();

    // Decorative rows
    pub static ref FILLER_ONLY: Regex = Regex::new(
        r"^[.\-_=*]{3,}$"
    ).unwrap();

    // Digit run with no decimal point (reference/transaction IDs)
    pub static ref DIGIT_RUN: Regex = Regex::new(
        r"^(\d[\d,]*)\s*$"
    ).unwrap();

    // Description cleanup: amounts and dot leaders that leaked into text
    pub static ref TRAILING_AMOUNT: Regex = Regex::new(
        r"\s+[\d,]+\.\d{2}\s*$"
    ).unwrap();

    pub static ref TRAILING_DOTS: Regex = Regex::new(
        r"\.{2,}\s*$"
    ).unwrap();

    pub static ref EMBEDDED_FILLER: Regex = Regex::new(
        r"\.{4,}"
    ).unwrap();

    pub static ref EMBEDDED_BALANCE: Regex = Regex::new(
        r"(?i)\s+[\d,]+\.\d{2}\s*(CR|DR)\b"
    ).unwrap();

    // Garbled parenthesized fragments ahead of a reference marker
    pub static ref GARBLED_PARENS: Regex = Regex::new(
        r"\([^a-zA-Z0-9\s)]*\)"
    ).unwrap();

    pub static ref MULTI_SPACE: Regex = Regex::new(
        r"\s{2,}"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_tokens() {
        assert!(DATE_TOKEN.is_match("9 Dec"));
        assert!(DATE_TOKEN.is_match("31 December"));
        assert!(DATE_TOKEN_WITH_YEAR.is_match("24 Aug 2020"));
        assert!(!DATE_TOKEN.is_match("9 Dec 2020"));
        assert!(!DATE_TOKEN.is_match("Direct Credit"));
    }

    #[test]
    fn test_date_at_start() {
        let caps = DATE_AT_START.captures("09 Dec Direct Credit 123456").unwrap();
        assert_eq!(&caps[1], "09 Dec");
        assert_eq!(&caps[2], "Direct Credit 123456");
    }

    #[test]
    fn test_balance_dr_cr() {
        let caps = BALANCE_DR_CR.captures("$8,835.67 CR").unwrap();
        assert_eq!(&caps[1], "8,835.67");
        assert_eq!(&caps[2], "CR");
        assert!(BALANCE_DR_CR.is_match("292.80DR"));
        assert!(!BALANCE_DR_CR.is_match("Credit Interest"));
    }

    #[test]
    fn test_filler_amount() {
        let line = "Online Transfer................................ 12,941.82";
        let caps = FILLER_AMOUNT.captures(line).unwrap();
        assert_eq!(&caps[3], "12,941.82");
        assert!(caps[2].len() > 30);
    }
}
