//! Client-side filter/sort view over a transaction list
//!
//! The transactions screen loads every transaction once and then narrows and
//! orders them locally whenever a filter changes. All predicates are combined
//! with AND. Sorting is stable, so rows with equal keys keep the order the API
//! returned them in.

use std::cmp::Ordering;

use chrono::Datelike;

use crate::models::{Transaction, TransactionType};

/// Month filter: everything, or one calendar month (1..=12) of any year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

impl MonthFilter {
    /// Parse a selector value; anything other than "1".."12" means all months
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<u32>() {
            Ok(m) if (1..=12).contains(&m) => Self::Month(m),
            _ => Self::All,
        }
    }

    fn matches(&self, tx: &Transaction) -> bool {
        match self {
            Self::All => true,
            Self::Month(m) => tx.date.month() == *m,
        }
    }
}

/// Year filter: everything, or one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl YearFilter {
    /// Parse a selector value; anything that is not an integer means all years
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(y) => Self::Year(y),
            Err(_) => Self::All,
        }
    }

    fn matches(&self, tx: &Transaction) -> bool {
        match self {
            Self::All => true,
            Self::Year(y) => tx.date.year() == *y,
        }
    }
}

/// Type filter: everything, or only income / only expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TransactionType),
}

impl TypeFilter {
    /// Parse a selector value; unknown values mean all types
    pub fn parse(value: &str) -> Self {
        value
            .parse::<TransactionType>()
            .map(Self::Only)
            .unwrap_or(Self::All)
    }

    fn matches(&self, tx: &Transaction) -> bool {
        match self {
            Self::All => true,
            Self::Only(kind) => tx.kind == *kind,
        }
    }
}

/// Row ordering for the transactions table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first
    #[default]
    DateDesc,
    DateAsc,
    /// Largest first
    AmountDesc,
    AmountAsc,
}

impl SortKey {
    /// Ordering used when a sort value is not recognised
    pub const FALLBACK: SortKey = SortKey::DateDesc;

    /// Parse a selector value ("date-desc", "amount-asc", ...)
    ///
    /// Unrecognised values resolve to [`SortKey::FALLBACK`] rather than an error.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "date-desc" => Self::DateDesc,
            "date-asc" => Self::DateAsc,
            "amount-desc" => Self::AmountDesc,
            "amount-asc" => Self::AmountAsc,
            _ => Self::FALLBACK,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::AmountDesc => "amount-desc",
            Self::AmountAsc => "amount-asc",
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            Self::DateDesc => b.date.cmp(&a.date),
            Self::DateAsc => a.date.cmp(&b.date),
            Self::AmountDesc => b.amount.total_cmp(&a.amount),
            Self::AmountAsc => a.amount.total_cmp(&b.amount),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three conjunctive filter predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewFilters {
    pub month: MonthFilter,
    pub year: YearFilter,
    pub kind: TypeFilter,
}

impl ViewFilters {
    /// True when the transaction passes every active predicate
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.month.matches(tx) && self.year.matches(tx) && self.kind.matches(tx)
    }
}

/// Filter then stably sort `transactions`, returning a new list
///
/// The input slice is left untouched.
pub fn apply_view(
    transactions: &[Transaction],
    filters: &ViewFilters,
    sort: SortKey,
) -> Vec<Transaction> {
    let mut rows: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| filters.matches(tx))
        .cloned()
        .collect();
    // sort_by is stable: equal keys keep input order
    rows.sort_by(|a, b| sort.compare(a, b));
    rows
}

/// Builder for a transactions table view
///
/// ```
/// use budget_core::view::{MonthFilter, SortKey, TransactionView, YearFilter};
///
/// let view = TransactionView::new()
///     .month(MonthFilter::Month(1))
///     .year(YearFilter::Year(2025))
///     .sort(SortKey::DateAsc);
/// assert_eq!(view.sort_key(), SortKey::DateAsc);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionView {
    filters: ViewFilters,
    sort: SortKey,
}

impl TransactionView {
    /// A view with every filter set to "all", newest first
    pub fn new() -> Self {
        Self::default()
    }

    /// The view the transactions screen opens with: the current year only
    pub fn current_year() -> Self {
        Self::new().year(YearFilter::Year(chrono::Local::now().year()))
    }

    /// Set the month filter
    pub fn month(mut self, month: MonthFilter) -> Self {
        self.filters.month = month;
        self
    }

    /// Set the year filter
    pub fn year(mut self, year: YearFilter) -> Self {
        self.filters.year = year;
        self
    }

    /// Set the type filter
    pub fn kind(mut self, kind: TypeFilter) -> Self {
        self.filters.kind = kind;
        self
    }

    /// Set the sort order
    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn filters(&self) -> &ViewFilters {
        &self.filters
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    /// Run the view over a transaction list
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        apply_view(transactions, &self.filters, self.sort)
    }
}
