//! AccountType - Classification in the chart of accounts

text_enum! {
    /// Top-level account classes of the chart of accounts
    pub enum AccountType {
        Asset => "asset",
        Liability => "liability",
        Equity => "equity",
        Revenue => "revenue",
        Expense => "expense",
    }
}

impl AccountType {
    /// Assets and expenses increase on the debit side; everything else on credit.
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }
}
