//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Budget planner - track spending against a monthly plan
#[derive(Parser)]
#[command(name = "budget")]
#[command(about = "Command-line client for the budget planner API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// API base URL (overrides config file and BUDGET_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and log in
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage transactions (list, add, edit, delete)
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Manage recurring transactions
    Recurring {
        #[command(subcommand)]
        action: Option<RecurringAction>,
    },

    /// Monthly budget table and planned amounts
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },

    /// Yearly, fiscal-year and trend reports
    Report {
        #[command(subcommand)]
        report: ReportType,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Import transactions from a CSV file
    Import {
        /// CSV file with columns date,type,category,description,amount
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Export transactions to CSV
    Export {
        /// Only export one fiscal year (April to March), given by its starting year
        #[arg(long)]
        fiscal_year: Option<i32>,

        /// Output file (defaults to transactions.csv / transactions_FY<year>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write an import template
    Template {
        #[command(subcommand)]
        kind: TemplateKind,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions with optional filters
    List {
        /// Month 1-12, or "all"
        #[arg(long, default_value = "all")]
        month: String,

        /// Year, or "all" (defaults to the current year)
        #[arg(long)]
        year: Option<String>,

        /// income, expense or all
        #[arg(long = "type", default_value = "all")]
        kind: String,

        /// date-desc, date-asc, amount-desc, amount-asc
        #[arg(long, default_value = "date-desc")]
        sort: String,

        /// Maximum rows to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Add a transaction
    Add {
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        kind: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        description: String,
    },

    /// Edit a transaction (unspecified fields keep their value)
    Edit {
        id: String,

        #[arg(long)]
        date: Option<String>,

        #[arg(long = "type")]
        kind: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        amount: Option<f64>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a transaction
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum RecurringAction {
    /// List recurring rules
    List,

    /// Add a recurring rule
    Add {
        #[arg(long = "type", default_value = "expense")]
        kind: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        amount: f64,

        #[arg(long, default_value = "")]
        description: String,

        /// Day of month (1-28)
        #[arg(long, default_value = "1")]
        day: u32,

        /// First date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<String>,

        /// Last date (YYYY-MM-DD, optional)
        #[arg(long)]
        end: Option<String>,
    },

    /// Edit a recurring rule (unspecified fields keep their value)
    Edit {
        id: String,

        #[arg(long = "type")]
        kind: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        amount: Option<f64>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        day: Option<u32>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        /// Remove the end date
        #[arg(long, conflicts_with = "end")]
        no_end: bool,
    },

    /// Delete a recurring rule
    Delete { id: String },

    /// Pause or resume a recurring rule
    Toggle { id: String },

    /// Create this month's transactions for active rules
    Generate,
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Show actual vs planned for a month
    Show {
        /// Month 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,

        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Set planned amounts, e.g. `budget set Groceries=6000 Fuel=2000`
    Set {
        /// CATEGORY=AMOUNT pairs
        #[arg(required = true)]
        amounts: Vec<String>,

        #[arg(long)]
        month: Option<u32>,

        #[arg(long)]
        year: Option<i32>,

        /// Only write the selected month instead of the next 12 months
        #[arg(long)]
        current_month_only: bool,
    },

    /// Copy this month's planned amounts to the next 12 months
    CopyForward {
        #[arg(long)]
        month: Option<u32>,

        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Income and expense per month of a calendar year
    Yearly {
        #[arg(long)]
        year: Option<i32>,
    },

    /// Income and expense for a fiscal year (April to March)
    Fiscal {
        /// Year the fiscal year starts in (defaults to the current fiscal year)
        #[arg(long)]
        start_year: Option<i32>,
    },

    /// Income and expense over recent months
    Trend {
        #[arg(long, default_value = "6")]
        months: u32,
    },

    /// Share of each category in a month
    Breakdown {
        #[arg(long)]
        month: Option<u32>,

        #[arg(long)]
        year: Option<i32>,

        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        kind: String,
    },

    /// Average monthly spend and runway
    BurnRate,
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories
    List {
        /// income or expense (default: both)
        #[arg(long = "type")]
        kind: Option<String>,
    },

    /// Add a category
    Add {
        name: String,

        #[arg(long = "type", default_value = "expense")]
        kind: String,
    },

    /// Rename a category
    Rename { id: String, name: String },

    /// Delete a category (predefined categories cannot be deleted)
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show,

    /// Set the display currency symbol
    Currency { symbol: String },
}

#[derive(Subcommand)]
pub enum TemplateKind {
    /// Fixed sample file
    Sample {
        #[arg(short, long, default_value = "sample_transactions.csv")]
        output: PathBuf,
    },

    /// Plain-text list of your categories
    Categories {
        #[arg(short, long, default_value = "categories.txt")]
        output: PathBuf,
    },

    /// Template pre-filled with your own categories
    WithCategories {
        #[arg(short, long, default_value = "import_template.csv")]
        output: PathBuf,
    },
}
