//! Accounting - VAT, trial balance, ledgers and statements
//!
//! All reports are computed from posted lines only.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::entities::{JournalLine, PostedLine};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::AccountType;

/// Saudi VAT rate (15%)
pub fn vat_rate() -> Decimal {
    Decimal::new(15, 2)
}

/// Round to halalas, half away from zero
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// VAT due on top of `amount` (additive, not VAT-inclusive)
pub fn vat_amount(amount: Decimal) -> Decimal {
    round2(amount * vat_rate())
}

pub fn amount_with_vat(amount: Decimal) -> Decimal {
    amount + vat_amount(amount)
}

/// A line carries exactly one strictly positive side
pub fn validate_line(line: &JournalLine) -> Result<(), DomainError> {
    let zero = Decimal::ZERO;
    if line.debit < zero || line.credit < zero {
        return Err(DomainError::validation("line amounts must be non-negative"));
    }
    let debit_side = line.debit > zero;
    let credit_side = line.credit > zero;
    if debit_side == credit_side {
        return Err(DomainError::validation(
            "each line must have either a debit or a credit amount",
        ));
    }
    Ok(())
}

/// At least two well-formed lines whose debits equal their credits
pub fn validate_balanced(lines: &[JournalLine]) -> Result<(), DomainError> {
    if lines.len() < 2 {
        return Err(DomainError::validation(
            "a journal entry requires at least two lines",
        ));
    }
    for line in lines {
        validate_line(line)?;
    }
    let debit: Decimal = lines.iter().map(|l| l.debit).sum();
    let credit: Decimal = lines.iter().map(|l| l.credit).sum();
    if debit != credit {
        return Err(DomainError::Validation(format!(
            "entry is not balanced: debit {debit} != credit {credit}"
        )));
    }
    Ok(())
}

/// Net movement of a line on the normal side of its account
fn signed(account_type: AccountType, debit: Decimal, credit: Decimal) -> Decimal {
    if account_type.is_debit_normal() {
        debit - credit
    } else {
        credit - debit
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrialBalanceRow {
    pub account_id: Uuid,
    pub account_code: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    /// Balance on the account's normal side
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub is_balanced: bool,
}

/// Per-account totals ordered by account code
pub fn trial_balance(lines: &[PostedLine]) -> TrialBalance {
    let mut by_account: BTreeMap<(String, Uuid), TrialBalanceRow> = BTreeMap::new();

    for line in lines {
        let row = by_account
            .entry((line.account_code.clone(), line.account_id))
            .or_insert_with(|| TrialBalanceRow {
                account_id: line.account_id,
                account_code: line.account_code.clone(),
                account_name: line.account_name.clone(),
                account_type: line.account_type,
                total_debit: Decimal::ZERO,
                total_credit: Decimal::ZERO,
                balance: Decimal::ZERO,
            });
        row.total_debit += line.debit;
        row.total_credit += line.credit;
    }

    let rows: Vec<TrialBalanceRow> = by_account
        .into_values()
        .map(|mut row| {
            row.balance = signed(row.account_type, row.total_debit, row.total_credit);
            row
        })
        .collect();

    let total_debit: Decimal = rows.iter().map(|r| r.total_debit).sum();
    let total_credit: Decimal = rows.iter().map(|r| r.total_credit).sum();

    TrialBalance {
        rows,
        total_debit,
        total_credit,
        is_balanced: total_debit == total_credit,
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LedgerRow {
    pub entry_id: Uuid,
    pub entry_number: String,
    pub entry_date: NaiveDate,
    pub description: Option<String>,
    pub debit: Decimal,
    pub credit: Decimal,
    pub balance: Decimal,
}

/// Lines of one account in date order with a running balance
pub fn account_ledger(account_type: AccountType, lines: &[PostedLine]) -> Vec<LedgerRow> {
    let mut ordered: Vec<&PostedLine> = lines.iter().collect();
    ordered.sort_by(|a, b| {
        a.entry_date
            .cmp(&b.entry_date)
            .then_with(|| a.entry_number.cmp(&b.entry_number))
    });

    let mut balance = Decimal::ZERO;
    ordered
        .into_iter()
        .map(|line| {
            balance += signed(account_type, line.debit, line.credit);
            LedgerRow {
                entry_id: line.entry_id,
                entry_number: line.entry_number.clone(),
                entry_date: line.entry_date,
                description: line.description.clone(),
                debit: line.debit,
                credit: line.credit,
                balance,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct IncomeStatement {
    pub revenues: Decimal,
    pub expenses: Decimal,
    pub net_income: Decimal,
}

pub fn income_statement(lines: &[PostedLine]) -> IncomeStatement {
    let mut revenues = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for line in lines {
        match line.account_type {
            AccountType::Revenue => revenues += line.credit - line.debit,
            AccountType::Expense => expenses += line.debit - line.credit,
            _ => {}
        }
    }
    IncomeStatement {
        revenues,
        expenses,
        net_income: revenues - expenses,
    }
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct BalanceSheet {
    pub assets: Decimal,
    pub liabilities: Decimal,
    /// Recorded equity plus the period's net income
    pub equity: Decimal,
    pub net_income: Decimal,
    pub is_balanced: bool,
}

pub fn balance_sheet(lines: &[PostedLine]) -> BalanceSheet {
    let mut assets = Decimal::ZERO;
    let mut liabilities = Decimal::ZERO;
    let mut equity = Decimal::ZERO;
    for line in lines {
        let amount = signed(line.account_type, line.debit, line.credit);
        match line.account_type {
            AccountType::Asset => assets += amount,
            AccountType::Liability => liabilities += amount,
            AccountType::Equity => equity += amount,
            AccountType::Revenue | AccountType::Expense => {}
        }
    }
    let net_income = income_statement(lines).net_income;
    let equity = equity + net_income;

    BalanceSheet {
        assets,
        liabilities,
        equity,
        net_income,
        is_balanced: assets == liabilities + equity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    struct Book {
        cash: Uuid,
        loan: Uuid,
        capital: Uuid,
        rent: Uuid,
        maintenance: Uuid,
        lines: Vec<PostedLine>,
    }

    impl Book {
        fn new() -> Self {
            Self {
                cash: Uuid::new_v4(),
                loan: Uuid::new_v4(),
                capital: Uuid::new_v4(),
                rent: Uuid::new_v4(),
                maintenance: Uuid::new_v4(),
                lines: Vec::new(),
            }
        }

        fn account(&self, id: Uuid) -> (&'static str, AccountType) {
            if id == self.cash {
                ("1100", AccountType::Asset)
            } else if id == self.loan {
                ("2100", AccountType::Liability)
            } else if id == self.capital {
                ("3100", AccountType::Equity)
            } else if id == self.rent {
                ("4100", AccountType::Revenue)
            } else {
                ("5100", AccountType::Expense)
            }
        }

        fn post(&mut self, day: u32, debit: Uuid, credit: Uuid, amount: &str) {
            let entry_id = Uuid::new_v4();
            let date = NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
            for (account_id, dr, cr) in [(debit, d(amount), Decimal::ZERO), (credit, Decimal::ZERO, d(amount))] {
                let (code, account_type) = self.account(account_id);
                self.lines.push(PostedLine {
                    entry_id,
                    entry_number: format!("JE-{day:02}"),
                    entry_date: date,
                    account_id,
                    account_code: code.to_string(),
                    account_name: code.to_string(),
                    account_type,
                    debit: dr,
                    credit: cr,
                    description: None,
                });
            }
        }
    }

    fn sample() -> Book {
        let mut book = Book::new();
        let (cash, loan, capital, rent, maintenance) =
            (book.cash, book.loan, book.capital, book.rent, book.maintenance);
        book.post(1, cash, capital, "100000");
        book.post(2, cash, loan, "20000");
        book.post(3, cash, rent, "45000.50");
        book.post(4, maintenance, cash, "5000.25");
        book
    }

    #[test]
    fn test_vat_is_additive() {
        assert_eq!(vat_amount(d("1000")), d("150.00"));
        assert_eq!(amount_with_vat(d("1000")), d("1150.00"));
        assert_eq!(vat_amount(d("0.10")), d("0.02"));
        assert_eq!(vat_amount(d("33.33")), d("5.00"));
    }

    #[test]
    fn test_trial_balance_balances() {
        let book = sample();
        let tb = trial_balance(&book.lines);
        assert!(tb.is_balanced);
        assert_eq!(tb.total_debit, tb.total_credit);
        assert_eq!(tb.rows.len(), 5);
        assert_eq!(tb.rows[0].account_code, "1100");
        assert_eq!(tb.rows[0].balance, d("160000.25"));
    }

    #[test]
    fn test_trial_balance_detects_imbalance() {
        let mut book = sample();
        book.lines.pop();
        assert!(!trial_balance(&book.lines).is_balanced);
    }

    #[test]
    fn test_income_statement_identity() {
        let book = sample();
        let is = income_statement(&book.lines);
        assert_eq!(is.revenues, d("45000.50"));
        assert_eq!(is.expenses, d("5000.25"));
        assert_eq!(is.revenues - is.expenses, is.net_income);
    }

    #[test]
    fn test_balance_sheet_identity() {
        let book = sample();
        let bs = balance_sheet(&book.lines);
        assert!(bs.is_balanced);
        assert_eq!(bs.assets, bs.liabilities + bs.equity);
        assert_eq!(bs.liabilities, d("20000"));
    }

    #[test]
    fn test_ledger_running_balance() {
        let book = sample();
        let cash_lines: Vec<PostedLine> = book
            .lines
            .iter()
            .filter(|l| l.account_id == book.cash)
            .cloned()
            .rev()
            .collect();
        let ledger = account_ledger(AccountType::Asset, &cash_lines);
        let balances: Vec<Decimal> = ledger.iter().map(|r| r.balance).collect();
        assert_eq!(
            balances,
            vec![d("100000"), d("120000"), d("165000.50"), d("160000.25")]
        );
    }

    #[test]
    fn test_validate_balanced_requires_two_lines() {
        let line = JournalLine {
            account_id: Uuid::new_v4(),
            debit: d("10"),
            credit: Decimal::ZERO,
            description: None,
        };
        assert!(validate_balanced(&[line]).is_err());
    }
}
