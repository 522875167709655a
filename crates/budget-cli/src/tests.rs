//! CLI command tests
//!
//! This module contains all tests for the CLI commands. Commands run against
//! the in-memory mock API from budget-core.

use budget_core::models::TransactionType;
use budget_core::test_utils::{new_tx, MockBudgetApi, MOCK_EMAIL, MOCK_PASSWORD};
use budget_core::{ApiClient, ApplyScope, CalendarPeriod, SessionStore};
use tempfile::TempDir;

use crate::commands::{self, truncate, ApiContext};

fn context(server: &MockBudgetApi) -> ApiContext {
    ApiContext::new(server.client(), "₹")
}

fn period(month: u32, year: i32) -> CalendarPeriod {
    CalendarPeriod::new(month, year).unwrap()
}

fn temp_store() -> (TempDir, SessionStore) {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    (dir, store)
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Groceries", 20), "Groceries");
    assert_eq!(truncate("Weekly grocery shopping", 10), "Weekly ...");
    // Multi-byte characters are not split
    assert_eq!(truncate("₹₹₹₹₹₹", 5), "₹₹...");
}

#[test]
fn test_money() {
    assert_eq!(commands::money("₹", 5420.5), "₹5420.50");
    assert_eq!(commands::money("$", -500.0), "-$500.00");
}

#[test]
fn test_amount_cell_pads_before_colouring() {
    let cell = commands::amount_cell("₹", TransactionType::Expense, 50.0);
    assert_eq!(cell, format!("\x1b[31m{:>14}\x1b[0m", "-₹50.00"));

    let plain = cell.trim_start_matches("\x1b[31m").trim_end_matches("\x1b[0m");
    assert_eq!(plain.chars().count(), 14);

    let income = commands::amount_cell("$", TransactionType::Income, 1234.5);
    assert_eq!(income, format!("\x1b[32m{:>14}\x1b[0m", "+$1234.50"));
}

#[test]
fn test_resolve_period() {
    assert_eq!(
        commands::resolve_period(Some(2), Some(2025)).unwrap(),
        period(2, 2025)
    );
    assert!(commands::resolve_period(Some(13), Some(2025)).is_err());

    let current = CalendarPeriod::current();
    assert_eq!(commands::resolve_period(None, None).unwrap(), current);
}

#[test]
fn test_parse_date_and_kind() {
    assert!(commands::parse_date(Some("2025-01-15")).is_ok());
    assert!(commands::parse_date(Some("15/01/2025")).is_err());
    assert!(commands::parse_date(None).is_ok());

    assert_eq!(commands::parse_kind("Income").unwrap(), TransactionType::Income);
    assert!(commands::parse_kind("transfer").is_err());
}

#[test]
fn test_parse_assignments() {
    let args = vec!["Groceries=6000".to_string(), "Eating out = 1500".to_string()];
    let pairs = commands::parse_assignments(&args).unwrap();
    assert_eq!(
        pairs,
        vec![
            ("Groceries".to_string(), "6000".to_string()),
            ("Eating out".to_string(), "1500".to_string()),
        ]
    );

    assert!(commands::parse_assignments(&["Groceries".to_string()]).is_err());
    assert!(commands::parse_assignments(&["=5".to_string()]).is_err());
}

// ========== Session Command Tests ==========

#[tokio::test]
async fn test_cmd_login_saves_session() {
    let server = MockBudgetApi::start().await;
    let (_dir, store) = temp_store();
    let client = ApiClient::new(&server.url());

    commands::cmd_login(&client, &store, MOCK_EMAIL, MOCK_PASSWORD)
        .await
        .unwrap();

    let session = store.load().unwrap().unwrap();
    assert_eq!(session.user.unwrap().email, MOCK_EMAIL);
}

#[tokio::test]
async fn test_cmd_login_bad_password_keeps_no_session() {
    let server = MockBudgetApi::start().await;
    let (_dir, store) = temp_store();
    let client = ApiClient::new(&server.url());

    let result = commands::cmd_login(&client, &store, MOCK_EMAIL, "nope").await;
    assert!(result.is_err());
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_cmd_signup_then_logout() {
    let server = MockBudgetApi::start().await;
    let (_dir, store) = temp_store();
    let client = ApiClient::new(&server.url());

    commands::cmd_signup(&client, &store, "Asha", "asha@example.com", "secret")
        .await
        .unwrap();
    assert!(store.load().unwrap().is_some());

    commands::cmd_logout(&store).unwrap();
    assert!(store.load().unwrap().is_none());
    // Logging out twice is fine
    commands::cmd_logout(&store).unwrap();
}

#[test]
fn test_open_client_requires_session() {
    let (_dir, store) = temp_store();
    let config = budget_core::ClientConfig::default();
    let err = commands::open_client(&config, &store).err().unwrap();
    assert!(err.to_string().contains("Not logged in"));
}

#[tokio::test]
async fn test_cmd_whoami() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);
    assert!(commands::cmd_whoami(&ctx).await.is_ok());
}

// ========== Transaction Command Tests ==========

#[tokio::test]
async fn test_cmd_transactions_add_and_list() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);

    commands::cmd_transactions_add(
        &ctx,
        Some("2025-01-15"),
        "expense",
        "Groceries",
        5420.5,
        "Weekly grocery shopping",
    )
    .await
    .unwrap();

    let stored = server.transactions();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].category, "Groceries");

    let result =
        commands::cmd_transactions_list(&ctx, "1", Some("2025"), "all", "date-asc", 10).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_transactions_add_rejects_negative_amount() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);

    let result =
        commands::cmd_transactions_add(&ctx, None, "expense", "Fuel", -10.0, "Petrol").await;
    assert!(result.is_err());
    assert!(server.transactions().is_empty());
}

#[tokio::test]
async fn test_cmd_transactions_edit_keeps_other_fields() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);
    let tx = server.add_transaction(new_tx(
        "2025-01-16",
        TransactionType::Expense,
        "Fuel",
        2000.0,
    ));

    commands::cmd_transactions_edit(&ctx, &tx.id, None, None, None, Some(2500.0), None)
        .await
        .unwrap();

    let stored = &server.transactions()[0];
    assert_eq!(stored.amount, 2500.0);
    assert_eq!(stored.category, "Fuel");
    assert_eq!(stored.date, tx.date);
}

#[tokio::test]
async fn test_cmd_transactions_edit_unknown_id() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);
    let result =
        commands::cmd_transactions_edit(&ctx, "missing", None, None, None, Some(1.0), None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_cmd_transactions_delete() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);
    let tx = server.add_transaction(new_tx(
        "2025-01-16",
        TransactionType::Expense,
        "Fuel",
        2000.0,
    ));

    commands::cmd_transactions_delete(&ctx, &tx.id).await.unwrap();
    assert!(server.transactions().is_empty());
    assert!(commands::cmd_transactions_delete(&ctx, &tx.id).await.is_err());
}

// ========== Budget Command Tests ==========

#[tokio::test]
async fn test_cmd_budget_set_twelve_months() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);

    commands::cmd_budget_set(
        &ctx,
        period(11, 2024),
        &["Groceries=6000".to_string(), "Fuel=abc".to_string()],
        ApplyScope::TwelveMonths,
    )
    .await
    .unwrap();

    let budgets = server.budgets();
    assert_eq!(budgets.len(), 12);
    assert!(budgets.iter().all(|b| b.category == "Groceries"));
    assert!(budgets.iter().any(|b| b.month == 1 && b.year == 2025));
}

#[tokio::test]
async fn test_cmd_budget_set_current_month_only() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);

    commands::cmd_budget_set(
        &ctx,
        period(3, 2025),
        &["Fuel=2000".to_string()],
        ApplyScope::CurrentMonth,
    )
    .await
    .unwrap();

    let budgets = server.budgets();
    assert_eq!(budgets.len(), 1);
    assert_eq!((budgets[0].month, budgets[0].year), (3, 2025));
}

#[tokio::test]
async fn test_cmd_budget_set_repeated_category_uses_last_value() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);

    commands::cmd_budget_set(
        &ctx,
        period(3, 2025),
        &["Fuel=1".to_string(), "Fuel=2".to_string()],
        ApplyScope::TwelveMonths,
    )
    .await
    .unwrap();

    let budgets = server.budgets();
    assert_eq!(budgets.len(), 12);
    assert!(budgets.iter().all(|b| b.planned_amount == 2.0));
    assert_eq!(
        server
            .requests()
            .iter()
            .filter(|r| r.as_str() == "POST /api/budgets")
            .count(),
        12
    );
}

#[tokio::test]
async fn test_cmd_budget_set_all_invalid_fails() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);

    let result = commands::cmd_budget_set(
        &ctx,
        period(3, 2025),
        &["Fuel=-5".to_string()],
        ApplyScope::TwelveMonths,
    )
    .await;
    assert!(result.is_err());
    assert!(server.budgets().is_empty());
}

#[tokio::test]
async fn test_cmd_budget_set_partial_failure() {
    let server = MockBudgetApi::start().await;
    server.fail_budget_writes_for(1, 2025);
    let ctx = context(&server);

    let err = commands::cmd_budget_set(
        &ctx,
        period(11, 2024),
        &["Groceries=6000".to_string()],
        ApplyScope::TwelveMonths,
    )
    .await
    .unwrap_err();

    assert!(format!("{:#}", err).contains("1 of 12 budget writes failed"));
    assert_eq!(server.budgets().len(), 11);
}

#[tokio::test]
async fn test_cmd_budget_show_and_copy_forward() {
    let server = MockBudgetApi::start().await;
    server.set_budget("Groceries", 12, 2024, 6000.0);
    let ctx = context(&server);

    commands::cmd_budget_show(&ctx, period(12, 2024)).await.unwrap();
    commands::cmd_budget_copy_forward(&ctx, period(12, 2024))
        .await
        .unwrap();

    let budgets = server.budgets();
    assert_eq!(budgets.len(), 13);
    assert!(budgets
        .iter()
        .any(|b| b.month == 12 && b.year == 2025 && b.planned_amount == 6000.0));
}

#[tokio::test]
async fn test_cmd_budget_copy_forward_nothing_planned() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);

    let err = commands::cmd_budget_copy_forward(&ctx, period(6, 2025))
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("No planned budgets to copy"));
}

// ========== Recurring Command Tests ==========

#[tokio::test]
async fn test_cmd_recurring_lifecycle() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);

    commands::cmd_recurring_add(
        &ctx,
        "income",
        "Paycheck",
        45000.0,
        "Salary",
        1,
        Some("2025-01-01"),
        None,
    )
    .await
    .unwrap();

    let rules = ctx.client.list_recurring().await.unwrap();
    assert_eq!(rules.len(), 1);
    let id = rules[0].id.clone();

    commands::cmd_recurring_list(&ctx).await.unwrap();
    commands::cmd_recurring_generate(&ctx).await.unwrap();
    assert_eq!(server.transactions().len(), 1);

    commands::cmd_recurring_edit(
        &ctx,
        &id,
        commands::RecurringEdit {
            day: Some(15),
            end: Some("2025-12-31"),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let rule = &ctx.client.list_recurring().await.unwrap()[0];
    assert_eq!(rule.day_of_month, 15);
    assert_eq!(rule.amount, 45000.0);
    assert!(rule.end_date.is_some());

    commands::cmd_recurring_toggle(&ctx, &id).await.unwrap();
    assert!(!ctx.client.list_recurring().await.unwrap()[0].is_active);

    commands::cmd_recurring_delete(&ctx, &id).await.unwrap();
    assert!(ctx.client.list_recurring().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cmd_recurring_add_rejects_day_29() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);

    let result =
        commands::cmd_recurring_add(&ctx, "expense", "Phone", 599.0, "", 29, None, None).await;
    assert!(result.is_err());
}

// ========== Report Command Tests ==========

#[tokio::test]
async fn test_cmd_reports() {
    let server = MockBudgetApi::start().await;
    server.add_transaction(new_tx(
        "2025-02-10",
        TransactionType::Expense,
        "Groceries",
        750.0,
    ));
    let ctx = context(&server);

    assert!(commands::cmd_report_yearly(&ctx, 2025).await.is_ok());
    assert!(commands::cmd_report_fiscal(&ctx, 2024).await.is_ok());
    assert!(commands::cmd_report_trend(&ctx, 6).await.is_ok());
    assert!(commands::cmd_report_breakdown(&ctx, period(2, 2025), "expense")
        .await
        .is_ok());
    assert!(commands::cmd_report_burn_rate(&ctx).await.is_ok());
    assert!(commands::cmd_report_breakdown(&ctx, period(2, 2025), "bogus")
        .await
        .is_err());
}

#[test]
fn test_current_fiscal_year_starts_in_april() {
    use chrono::Datelike;
    let today = chrono::Local::now().date_naive();
    let fy = commands::current_fiscal_year();
    if today.month() >= 4 {
        assert_eq!(fy, today.year());
    } else {
        assert_eq!(fy, today.year() - 1);
    }
}

// ========== Category and Settings Command Tests ==========

#[tokio::test]
async fn test_cmd_categories() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);

    commands::cmd_categories_add(&ctx, "Pets", "expense").await.unwrap();
    let pets = ctx
        .client
        .list_categories(None)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Pets")
        .unwrap();

    commands::cmd_categories_rename(&ctx, &pets.id, "Pet care")
        .await
        .unwrap();
    commands::cmd_categories_list(&ctx, Some("expense"))
        .await
        .unwrap();
    commands::cmd_categories_delete(&ctx, &pets.id).await.unwrap();

    let predefined = ctx.client.list_categories(None).await.unwrap()[0].clone();
    assert!(commands::cmd_categories_delete(&ctx, &predefined.id)
        .await
        .is_err());
}

#[tokio::test]
async fn test_cmd_settings_currency() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);

    commands::cmd_settings_currency(&ctx, "$").await.unwrap();
    assert_eq!(ctx.currency().await, "$");
    commands::cmd_settings_show(&ctx).await.unwrap();
}

#[tokio::test]
async fn test_currency_falls_back_without_session() {
    let server = MockBudgetApi::start().await;
    let ctx = ApiContext::new(ApiClient::new(&server.url()), "€");
    assert_eq!(ctx.currency().await, "€");
}

// ========== Import/Export Command Tests ==========

#[tokio::test]
async fn test_cmd_import_and_export() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);
    let dir = TempDir::new().unwrap();

    let sample = dir.path().join("sample.csv");
    commands::cmd_template_sample(&sample).unwrap();
    commands::cmd_import(&ctx, &sample).await.unwrap();
    assert_eq!(server.transactions().len(), 5);

    let out = dir.path().join("export.csv");
    commands::cmd_export(&ctx, None, Some(&out)).await.unwrap();
    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content.lines().count(), 6);

    // Sample rows are January 2025, inside fiscal year 2024-25
    let fy = dir.path().join("fy.csv");
    commands::cmd_export(&ctx, Some(2024), Some(&fy)).await.unwrap();
    assert_eq!(std::fs::read_to_string(&fy).unwrap().lines().count(), 6);
}

#[tokio::test]
async fn test_cmd_import_rejects_non_csv() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("statement.txt");
    std::fs::write(&path, "date,type,category,description,amount\n").unwrap();

    assert!(commands::cmd_import(&ctx, &path).await.is_err());
    assert!(server.transactions().is_empty());
}

#[tokio::test]
async fn test_cmd_templates_with_categories() {
    let server = MockBudgetApi::start().await;
    let ctx = context(&server);
    let dir = TempDir::new().unwrap();

    let list = dir.path().join("categories.txt");
    commands::cmd_template_categories(&ctx, &list).await.unwrap();
    let text = std::fs::read_to_string(&list).unwrap();
    assert!(text.starts_with("EXPENSE CATEGORIES:"));
    assert!(text.contains("Paycheck"));

    let template = dir.path().join("template.csv");
    commands::cmd_template_with_categories(&ctx, &template)
        .await
        .unwrap();
    let csv = std::fs::read_to_string(&template).unwrap();
    // header + 5 expense + 2 income rows
    assert_eq!(csv.lines().count(), 8);
}
