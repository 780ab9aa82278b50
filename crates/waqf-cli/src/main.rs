//! Waqf CLI - Quick access to the Waqf administration API
//!
//! Validation and VAT commands run offline against the domain library.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dialoguer::Password;
use rust_decimal::Decimal;
use std::str::FromStr;

use api::WaqfClient;
use config::Config;
use waqf::domain::services::{accounting, validation};

#[derive(Parser)]
#[command(name = "waqf")]
#[command(about = "Waqf CLI - Endowment administration from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the server and store a bearer token
    Login {
        /// Bearer token (will prompt if not provided)
        #[arg(short, long)]
        token: Option<String>,
        /// API base URL (keeps the stored one if omitted)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Show current configuration
    Config,

    /// Show the unified KPI snapshot
    Kpis,

    /// Show the dashboard for your role
    Dashboard,

    /// Show the trial balance
    TrialBalance {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// Validate an identity or contact value (offline)
    Validate {
        #[arg(value_enum)]
        kind: ValidateKind,
        value: String,
    },

    /// Compute 15% VAT on an amount (offline)
    Vat {
        amount: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ValidateKind {
    NationalId,
    Iban,
    Phone,
    Email,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { token, url } => cmd_login(token, url).await,
        Commands::Config => cmd_config(),
        Commands::Kpis => cmd_kpis().await,
        Commands::Dashboard => cmd_dashboard().await,
        Commands::TrialBalance { from, to } => cmd_trial_balance(from, to).await,
        Commands::Validate { kind, value } => cmd_validate(kind, &value),
        Commands::Vat { amount } => cmd_vat(&amount),
    }
}

// ============================================
// Command Implementations
// ============================================

fn client() -> Result<WaqfClient> {
    let config = Config::load()?;
    let token = config
        .token
        .as_ref()
        .context("Not logged in. Run 'waqf login' first.")?;
    Ok(WaqfClient::new(&config.base_url, token))
}

async fn cmd_login(token: Option<String>, url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = url {
        config.set_base_url(&url);
    }

    let token = match token {
        Some(t) => t,
        None => Password::new()
            .with_prompt("Bearer token")
            .interact()
            .context("Failed to read token")?,
    };

    let client = WaqfClient::new(&config.base_url, &token);
    print!("Testing connection to {}... ", config.base_url);

    match client.health().await {
        Ok(health) if health.status == "ok" => {
            println!("{} (v{})", "OK".green(), health.version);
        }
        Ok(health) => {
            println!("{} (v{})", health.status.yellow(), health.version);
        }
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("Could not reach Waqf API: {}", e);
        }
    }

    config.set_token(token);
    config.save()?;

    println!("{} Token saved to {:?}", "✓".green(), Config::config_path()?);
    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  Token: {}",
        if config.token.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );

    Ok(())
}

async fn cmd_kpis() -> Result<()> {
    let kpis = client()?.kpis().await?;

    println!("{} ({})", "KPIs".bold(), kpis.generated_at.to_rfc3339().dimmed());
    println!(
        "  Beneficiaries: {} active / {}",
        kpis.beneficiaries.active_beneficiaries.to_string().cyan(),
        kpis.beneficiaries.total_beneficiaries
    );
    println!(
        "  Properties:    {} rented / {} ({}%)",
        kpis.properties.rented_properties.to_string().cyan(),
        kpis.properties.total_properties,
        kpis.properties.occupancy_rate
    );
    println!(
        "  Contracts:     {} active, {} expiring",
        kpis.contracts.active_contracts.to_string().cyan(),
        kpis.contracts.expiring_contracts.to_string().yellow()
    );
    println!(
        "  Rent:          {} collected, {} pending, {} overdue",
        kpis.collections.collected_rent.to_string().green(),
        kpis.collections.pending_rent,
        kpis.collections.overdue_payments.to_string().red()
    );
    println!(
        "  Income:        {} - {} = {}",
        kpis.income.total_revenues,
        kpis.income.total_expenses,
        kpis.income.net_income.to_string().bold()
    );
    println!("  Funds:         {}", kpis.funds.funds_balance);
    println!(
        "  Loans:         {} active, {} defaulted, {} outstanding",
        kpis.loans.active_loans,
        kpis.loans.defaulted_loans.to_string().red(),
        kpis.loans.outstanding_loans
    );
    println!(
        "  Pending:       {} requests, {} distributions",
        kpis.requests.pending_requests, kpis.distributions.distributions_awaiting_approval
    );

    if kpis.is_partial() {
        let failed: Vec<&str> = kpis.failed_slices.iter().map(|s| s.as_str()).collect();
        println!(
            "\n{} {}",
            "Partial snapshot, failed:".yellow(),
            failed.join(", ")
        );
    }

    Ok(())
}

async fn cmd_dashboard() -> Result<()> {
    let dashboard = client()?.dashboard().await?;

    let role = dashboard
        .get("role")
        .and_then(|r| r.as_str())
        .unwrap_or("unknown");
    println!("{} {}", "Dashboard for".bold(), role.cyan());

    if let Some(sections) = dashboard.as_object() {
        for (name, section) in sections.iter().filter(|(name, _)| *name != "role") {
            println!("\n{}", name.bold());
            println!("{}", serde_json::to_string_pretty(section)?);
        }
    }

    Ok(())
}

async fn cmd_trial_balance(from: Option<String>, to: Option<String>) -> Result<()> {
    let tb = client()?
        .trial_balance(from.as_deref(), to.as_deref())
        .await?;

    if tb.rows.is_empty() {
        println!("No posted entries in this period.");
        return Ok(());
    }

    println!(
        "{:<8} {:<30} {:>14} {:>14} {:>14}",
        "Code".bold(),
        "Account".bold(),
        "Debit".bold(),
        "Credit".bold(),
        "Balance".bold()
    );
    for row in &tb.rows {
        println!(
            "{:<8} {:<30} {:>14} {:>14} {:>14}",
            row.account_code,
            truncate_string(&row.account_name, 30),
            row.total_debit,
            row.total_credit,
            row.balance
        );
    }
    println!(
        "{:<8} {:<30} {:>14} {:>14}",
        "",
        "Total".bold(),
        tb.total_debit,
        tb.total_credit
    );

    if tb.is_balanced {
        println!("{} Balanced", "✓".green());
    } else {
        println!(
            "{} Not balanced (difference {})",
            "✗".red(),
            tb.total_debit - tb.total_credit
        );
    }

    Ok(())
}

fn cmd_validate(kind: ValidateKind, value: &str) -> Result<()> {
    let result = match kind {
        ValidateKind::NationalId => validation::validate_national_id(value),
        ValidateKind::Iban => validation::validate_iban(value),
        ValidateKind::Phone => validation::normalize_phone(value),
        ValidateKind::Email => validation::validate_email(value),
    };

    match result {
        Ok(canonical) => {
            println!("{} {}", "✓".green(), canonical);
            Ok(())
        }
        Err(e) => bail!("{}", e),
    }
}

fn cmd_vat(amount: &str) -> Result<()> {
    let amount = Decimal::from_str(amount.trim())
        .with_context(|| format!("Not a valid amount: {}", amount))?;
    if amount.is_sign_negative() {
        bail!("Amount must not be negative");
    }

    println!("  Amount: {}", amount);
    println!("  VAT (15%): {}", accounting::vat_amount(amount).to_string().cyan());
    println!(
        "  Total: {}",
        accounting::amount_with_vat(amount).to_string().bold()
    );

    Ok(())
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_counts_chars() {
        assert_eq!(truncate_string("إيرادات الإيجار", 30), "إيرادات الإيجار");
        assert_eq!(truncate_string("abcdefghij", 6), "abc...");
    }

    #[test]
    fn test_cli_parses_validate() {
        let cli = Cli::try_parse_from(["waqf", "validate", "national-id", "1012345678"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Validate {
                kind: ValidateKind::NationalId,
                ..
            }
        ));
    }

    #[test]
    fn test_vat_rejects_garbage() {
        assert!(cmd_vat("abc").is_err());
        assert!(cmd_vat("-5").is_err());
        assert!(cmd_vat("1000").is_ok());
    }
}
