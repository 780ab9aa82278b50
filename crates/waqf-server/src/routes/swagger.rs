//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use waqf::domain::services::accounting::{
    BalanceSheet, IncomeStatement, LedgerRow, TrialBalance, TrialBalanceRow,
};
use waqf::domain::services::distribution::SplitPreview;
use waqf::domain::services::governance::Tally;
use waqf::domain::services::kpi::{
    BeneficiaryKpis, CollectionKpis, ContractKpis, DistributionKpis, FundKpis, IncomeKpis,
    KpiSlice, LoanKpis, PropertyKpis, RequestKpis,
};
use waqf::domain::{
    Account, ArchivedDocument, AuditEntry, BeneficiaryCategory, BeneficiaryStatus,
    BeneficiaryUpdate, BoardDecision, ContractStatus, DecisionOutcome, DecisionStatus,
    DistributionSettingsUpdate, DistributionShare, DocumentCategory, Fund, FundType,
    JournalLine, JournalStatus, Loan, LoanStatus, NewAccount, NewArchivedDocument,
    NewBeneficiary, NewBeneficiaryRequest, NewBoardDecision, NewContract, NewDistribution,
    NewFund, NewJournalEntry, NewLoan, NewProperty, NewRentalPayment, NewSupportTicket,
    PaymentStatus, PropertyStatus, PropertyType, PropertyUpdate, RequestType, SupportTicket,
    TicketPriority, TicketStatus, Vote, VoteChoice,
};
use waqf::{
    AccountType, ApprovalAction, ApprovalStatus, Beneficiary, BeneficiaryRequest, Contract,
    Distribution, DistributionSettings, ErrorCategory, Frequency, JournalEntry, KpiSnapshot,
    Property, RentalPayment, UserRole,
};

use crate::application::{DecisionDetail, FunctionsHealth};
use crate::error::ErrorResponse;
use crate::error_log::ErrorRecord;
use crate::models::{
    ActionRequest, ArchiveSection, AssignTicketRequest, BeneficiarySection, CategoryCount,
    ClearedResponse, CollectionsSection, DashboardResponse, DatabaseHealth,
    DistributionDetailResponse, DistributionResponse, FinancialSection, MoveTicketRequest,
    OversightSection, PreviewRequest, RepayLoanRequest, RequestResponse, SystemHealth,
    SystemStatus, VoteRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Beneficiaries
        super::beneficiary::list_beneficiaries,
        super::beneficiary::create_beneficiary,
        super::beneficiary::get_own_profile,
        super::beneficiary::get_beneficiary,
        super::beneficiary::update_beneficiary,
        super::beneficiary::delete_beneficiary,
        // Properties
        super::property::list_properties,
        super::property::create_property,
        super::property::get_property,
        super::property::update_property,
        super::property::delete_property,
        // Contracts and payments
        super::contract::list_contracts,
        super::contract::create_contract,
        super::contract::get_contract,
        super::contract::terminate_contract,
        super::contract::generate_schedule,
        super::contract::record_payment,
        super::contract::list_payments,
        super::contract::payments_due,
        super::contract::collect_payment,
        // Accounting
        super::ledger::list_accounts,
        super::ledger::create_account,
        super::ledger::account_ledger,
        super::ledger::list_entries,
        super::ledger::create_entry,
        super::ledger::get_entry,
        super::ledger::delete_entry,
        super::ledger::post_entry,
        super::ledger::cancel_entry,
        super::ledger::trial_balance,
        super::ledger::income_statement,
        super::ledger::balance_sheet,
        // Treasury
        super::treasury::list_funds,
        super::treasury::create_fund,
        super::treasury::list_loans,
        super::treasury::grant_loan,
        super::treasury::get_loan,
        super::treasury::repay_loan,
        // Distributions
        super::distribution::get_settings,
        super::distribution::update_settings,
        super::distribution::preview,
        super::distribution::list_distributions,
        super::distribution::create_distribution,
        super::distribution::get_distribution,
        super::distribution::act_on_distribution,
        super::distribution::beneficiary_shares,
        // Requests
        super::request::list_requests,
        super::request::create_request,
        super::request::get_request,
        super::request::act_on_request,
        // Governance
        super::governance::list_decisions,
        super::governance::create_decision,
        super::governance::get_decision,
        super::governance::cast_vote,
        super::governance::close_decision,
        // Archive
        super::archive::list_documents,
        super::archive::create_document,
        super::archive::archive_stats,
        super::archive::get_document,
        super::archive::delete_document,
        // Tickets
        super::ticket::list_tickets,
        super::ticket::open_ticket,
        super::ticket::get_ticket,
        super::ticket::move_ticket,
        super::ticket::assign_ticket,
        // Dashboard
        super::dashboard::get_dashboard,
        super::dashboard::get_kpis,
        super::dashboard::refresh_kpis,
        // System
        super::system::system_health,
        super::system::list_errors,
        super::system::clear_errors,
        super::system::list_audit,
    ),
    info(
        title = "Waqf API",
        version = "0.1.0",
        description = "Administration backend for a family waqf: beneficiaries, rent roll, bookkeeping, treasury, heir distributions and governance.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Beneficiaries", description = "Registry of beneficiaries"),
        (name = "Properties", description = "Real estate held by the waqf"),
        (name = "Contracts", description = "Rental contracts"),
        (name = "Payments", description = "Rent roll and collections"),
        (name = "Accounting", description = "Chart of accounts, journal and reports"),
        (name = "Treasury", description = "Funds and loans"),
        (name = "Distributions", description = "Heir distributions"),
        (name = "Requests", description = "Beneficiary requests and approvals"),
        (name = "Governance", description = "Board decisions and votes"),
        (name = "Archive", description = "Document archive"),
        (name = "Tickets", description = "Support tickets"),
        (name = "Dashboard", description = "Role dashboards and KPIs"),
        (name = "System", description = "Monitoring and audit"),
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            ErrorCategory,
            UserRole,
            ApprovalStatus,
            ApprovalAction,
            ActionRequest,
            Frequency,
            // Beneficiaries
            Beneficiary,
            BeneficiaryCategory,
            BeneficiaryStatus,
            NewBeneficiary,
            BeneficiaryUpdate,
            // Properties and contracts
            Property,
            PropertyType,
            PropertyStatus,
            NewProperty,
            PropertyUpdate,
            Contract,
            ContractStatus,
            NewContract,
            RentalPayment,
            PaymentStatus,
            NewRentalPayment,
            // Accounting
            AccountType,
            Account,
            NewAccount,
            JournalEntry,
            JournalLine,
            JournalStatus,
            NewJournalEntry,
            TrialBalance,
            TrialBalanceRow,
            LedgerRow,
            IncomeStatement,
            BalanceSheet,
            // Treasury
            Fund,
            FundType,
            NewFund,
            Loan,
            LoanStatus,
            NewLoan,
            RepayLoanRequest,
            // Distributions
            DistributionSettings,
            DistributionSettingsUpdate,
            Distribution,
            NewDistribution,
            DistributionShare,
            DistributionResponse,
            DistributionDetailResponse,
            PreviewRequest,
            SplitPreview,
            // Requests
            BeneficiaryRequest,
            RequestType,
            NewBeneficiaryRequest,
            RequestResponse,
            // Governance
            BoardDecision,
            DecisionStatus,
            DecisionOutcome,
            NewBoardDecision,
            Vote,
            VoteChoice,
            VoteRequest,
            Tally,
            DecisionDetail,
            // Archive
            ArchivedDocument,
            DocumentCategory,
            NewArchivedDocument,
            CategoryCount,
            // Tickets
            SupportTicket,
            TicketPriority,
            TicketStatus,
            NewSupportTicket,
            MoveTicketRequest,
            AssignTicketRequest,
            // Dashboard
            KpiSnapshot,
            KpiSlice,
            BeneficiaryKpis,
            PropertyKpis,
            ContractKpis,
            CollectionKpis,
            IncomeKpis,
            FundKpis,
            LoanKpis,
            RequestKpis,
            DistributionKpis,
            DashboardResponse,
            SystemStatus,
            OversightSection,
            FinancialSection,
            CollectionsSection,
            ArchiveSection,
            BeneficiarySection,
            // System
            SystemHealth,
            DatabaseHealth,
            FunctionsHealth,
            ErrorRecord,
            ClearedResponse,
            AuditEntry,
        )
    ),
)]
pub struct ApiDoc;
