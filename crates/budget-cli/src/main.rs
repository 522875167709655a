//! Budget CLI - client for the budget planner API
//!
//! Usage:
//!   budget login --email E --password P     Log in and store the session
//!   budget transactions list --month 3      List transactions
//!   budget budget set Groceries=6000        Plan amounts for the next 12 months
//!   budget report fiscal                    Fiscal-year income and expense

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use budget_core::{ApplyScope, CalendarPeriod, SessionStore};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.api_url.as_deref())?;
    let store = SessionStore::open_default().context("Failed to locate session file")?;

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let client = commands::open_anonymous(&config)?;
            commands::cmd_signup(&client, &store, &name, &email, &password).await
        }
        Commands::Login { email, password } => {
            let client = commands::open_anonymous(&config)?;
            commands::cmd_login(&client, &store, &email, &password).await
        }
        Commands::Logout => commands::cmd_logout(&store),
        Commands::Whoami => {
            let ctx = commands::open_client(&config, &store)?;
            commands::cmd_whoami(&ctx).await
        }
        Commands::Transactions { action } => {
            let ctx = commands::open_client(&config, &store)?;
            match action {
                None => {
                    commands::cmd_transactions_list(&ctx, "all", None, "all", "date-desc", 50)
                        .await
                }
                Some(TransactionsAction::List {
                    month,
                    year,
                    kind,
                    sort,
                    limit,
                }) => {
                    commands::cmd_transactions_list(
                        &ctx,
                        &month,
                        year.as_deref(),
                        &kind,
                        &sort,
                        limit,
                    )
                    .await
                }
                Some(TransactionsAction::Add {
                    date,
                    kind,
                    category,
                    amount,
                    description,
                }) => {
                    commands::cmd_transactions_add(
                        &ctx,
                        date.as_deref(),
                        &kind,
                        &category,
                        amount,
                        &description,
                    )
                    .await
                }
                Some(TransactionsAction::Edit {
                    id,
                    date,
                    kind,
                    category,
                    amount,
                    description,
                }) => {
                    commands::cmd_transactions_edit(
                        &ctx,
                        &id,
                        date.as_deref(),
                        kind.as_deref(),
                        category.as_deref(),
                        amount,
                        description.as_deref(),
                    )
                    .await
                }
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&ctx, &id).await
                }
            }
        }
        Commands::Recurring { action } => {
            let ctx = commands::open_client(&config, &store)?;
            match action {
                None | Some(RecurringAction::List) => commands::cmd_recurring_list(&ctx).await,
                Some(RecurringAction::Add {
                    kind,
                    category,
                    amount,
                    description,
                    day,
                    start,
                    end,
                }) => {
                    commands::cmd_recurring_add(
                        &ctx,
                        &kind,
                        &category,
                        amount,
                        &description,
                        day,
                        start.as_deref(),
                        end.as_deref(),
                    )
                    .await
                }
                Some(RecurringAction::Edit {
                    id,
                    kind,
                    category,
                    amount,
                    description,
                    day,
                    start,
                    end,
                    no_end,
                }) => {
                    let edit = commands::RecurringEdit {
                        kind: kind.as_deref(),
                        category: category.as_deref(),
                        amount,
                        description: description.as_deref(),
                        day,
                        start: start.as_deref(),
                        end: end.as_deref(),
                        clear_end: no_end,
                    };
                    commands::cmd_recurring_edit(&ctx, &id, edit).await
                }
                Some(RecurringAction::Delete { id }) => {
                    commands::cmd_recurring_delete(&ctx, &id).await
                }
                Some(RecurringAction::Toggle { id }) => {
                    commands::cmd_recurring_toggle(&ctx, &id).await
                }
                Some(RecurringAction::Generate) => commands::cmd_recurring_generate(&ctx).await,
            }
        }
        Commands::Budget { action } => {
            let ctx = commands::open_client(&config, &store)?;
            match action {
                None => {
                    let period = commands::resolve_period(None, None)?;
                    commands::cmd_budget_show(&ctx, period).await
                }
                Some(BudgetAction::Show { month, year }) => {
                    let period = commands::resolve_period(month, year)?;
                    commands::cmd_budget_show(&ctx, period).await
                }
                Some(BudgetAction::Set {
                    amounts,
                    month,
                    year,
                    current_month_only,
                }) => {
                    let period = commands::resolve_period(month, year)?;
                    let scope = ApplyScope::from_apply_to_future(!current_month_only);
                    commands::cmd_budget_set(&ctx, period, &amounts, scope).await
                }
                Some(BudgetAction::CopyForward { month, year }) => {
                    let period = commands::resolve_period(month, year)?;
                    commands::cmd_budget_copy_forward(&ctx, period).await
                }
            }
        }
        Commands::Report { report } => {
            let ctx = commands::open_client(&config, &store)?;
            match report {
                ReportType::Yearly { year } => {
                    let year = year.unwrap_or_else(|| CalendarPeriod::current().year());
                    commands::cmd_report_yearly(&ctx, year).await
                }
                ReportType::Fiscal { start_year } => {
                    let start_year = start_year.unwrap_or_else(commands::current_fiscal_year);
                    commands::cmd_report_fiscal(&ctx, start_year).await
                }
                ReportType::Trend { months } => commands::cmd_report_trend(&ctx, months).await,
                ReportType::Breakdown { month, year, kind } => {
                    let period = commands::resolve_period(month, year)?;
                    commands::cmd_report_breakdown(&ctx, period, &kind).await
                }
                ReportType::BurnRate => commands::cmd_report_burn_rate(&ctx).await,
            }
        }
        Commands::Categories { action } => {
            let ctx = commands::open_client(&config, &store)?;
            match action {
                None => commands::cmd_categories_list(&ctx, None).await,
                Some(CategoriesAction::List { kind }) => {
                    commands::cmd_categories_list(&ctx, kind.as_deref()).await
                }
                Some(CategoriesAction::Add { name, kind }) => {
                    commands::cmd_categories_add(&ctx, &name, &kind).await
                }
                Some(CategoriesAction::Rename { id, name }) => {
                    commands::cmd_categories_rename(&ctx, &id, &name).await
                }
                Some(CategoriesAction::Delete { id }) => {
                    commands::cmd_categories_delete(&ctx, &id).await
                }
            }
        }
        Commands::Settings { action } => {
            let ctx = commands::open_client(&config, &store)?;
            match action {
                None | Some(SettingsAction::Show) => commands::cmd_settings_show(&ctx).await,
                Some(SettingsAction::Currency { symbol }) => {
                    commands::cmd_settings_currency(&ctx, &symbol).await
                }
            }
        }
        Commands::Import { file } => {
            let ctx = commands::open_client(&config, &store)?;
            commands::cmd_import(&ctx, &file).await
        }
        Commands::Export {
            fiscal_year,
            output,
        } => {
            let ctx = commands::open_client(&config, &store)?;
            commands::cmd_export(&ctx, fiscal_year, output.as_deref()).await
        }
        Commands::Template { kind } => match kind {
            TemplateKind::Sample { output } => commands::cmd_template_sample(&output),
            TemplateKind::Categories { output } => {
                let ctx = commands::open_client(&config, &store)?;
                commands::cmd_template_categories(&ctx, &output).await
            }
            TemplateKind::WithCategories { output } => {
                let ctx = commands::open_client(&config, &store)?;
                commands::cmd_template_with_categories(&ctx, &output).await
            }
        },
    }
}
