//! Budget Planner Core Library
//!
//! Shared functionality for the budget planner client:
//! - Calendar period arithmetic (month/year rollover projection)
//! - Client-side transaction filter/sort view
//! - Typed async client for the budget planner REST API
//! - Batch budget operations (apply to future months, copy forward)
//! - Table totals and CSV import templates
//! - Session token storage and client configuration

pub mod api;
pub mod budget;
pub mod config;
pub mod error;
pub mod models;
pub mod period;
pub mod session;
pub mod summary;
pub mod templates;
pub mod view;

/// Test utilities including mock budget API server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use api::ApiClient;
pub use budget::{ApplyScope, BatchOutcome, BudgetPlanner};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use period::{project_periods, CalendarPeriod};
pub use session::{Session, SessionStore};
pub use summary::{FlowTotals, MonthlyTotals};
pub use view::{
    apply_view, MonthFilter, SortKey, TransactionView, TypeFilter, ViewFilters, YearFilter,
};
