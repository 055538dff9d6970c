//! Quarterly financial statements and point-in-time ratios
//!
//! Valuation ratios as of a past date are rebuilt from the statements that
//! had been published by that date together with that day's close. A fiscal
//! quarter counts as published on the `reportedDate` of its earnings release.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde_json::{Value, json};
use valuation_core::{MetricName, MetricValue, PriceBar, RatioName, RawFundamentals};

/// Publication lag assumed for a quarter with no known earnings release
const FILING_LAG_DAYS: u64 = 90;

/// Upper bound on the distance between the newest and oldest fiscal quarter
/// ends of a trailing year (consecutive quarters span about 275 days)
const TRAILING_YEAR_SPAN_DAYS: i64 = 300;

/// Reported earnings per share for one quarter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuarterlyEarnings {
    pub fiscal_date_ending: NaiveDate,
    pub reported_date: NaiveDate,
    pub eps: Option<f64>,
}

/// Balance sheet items used by P/B, EV and debt-to-equity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceSheet {
    pub fiscal_date_ending: NaiveDate,
    pub reported_date: NaiveDate,
    pub total_equity: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub total_debt: Option<f64>,
    pub cash: Option<f64>,
}

/// One quarter's EBITDA
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeStatement {
    pub fiscal_date_ending: NaiveDate,
    pub reported_date: NaiveDate,
    pub ebitda: Option<f64>,
}

/// One quarter's operating cash flow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlowStatement {
    pub fiscal_date_ending: NaiveDate,
    pub reported_date: NaiveDate,
    pub operating_cashflow: Option<f64>,
}

/// Raw Alpha Vantage statement payloads for one company
#[derive(Debug, Clone, Copy)]
pub struct StatementPayloads<'a> {
    pub earnings: &'a Value,
    pub balance_sheet: &'a Value,
    pub income_statement: &'a Value,
    pub cash_flow: &'a Value,
}

/// Quarterly statements for one company, each list newest fiscal quarter first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuarterlyStatements {
    earnings: Vec<QuarterlyEarnings>,
    balance_sheets: Vec<BalanceSheet>,
    income_statements: Vec<IncomeStatement>,
    cash_flows: Vec<CashFlowStatement>,
}

impl QuarterlyStatements {
    /// Parse the `EARNINGS`, `BALANCE_SHEET`, `INCOME_STATEMENT` and `CASH_FLOW` payloads
    ///
    /// Rows without a usable date are skipped. Rows with unparseable figures
    /// are kept so that a gap is still visible to trailing sums.
    pub fn from_payloads(payloads: StatementPayloads<'_>) -> Self {
        let mut earnings: Vec<QuarterlyEarnings> =
            reports(payloads.earnings, "quarterlyEarnings")
                .filter_map(|r| {
                    let reported = date_field(r, "reportedDate");
                    let fiscal = date_field(r, "fiscalDateEnding").or(reported)?;
                    Some(QuarterlyEarnings {
                        fiscal_date_ending: fiscal,
                        reported_date: reported.unwrap_or_else(|| filing_deadline(fiscal)),
                        eps: number_field(r, "reportedEPS"),
                    })
                })
                .collect();
        earnings.sort_by(|a, b| b.fiscal_date_ending.cmp(&a.fiscal_date_ending));

        let releases: HashMap<NaiveDate, NaiveDate> = earnings
            .iter()
            .map(|e| (e.fiscal_date_ending, e.reported_date))
            .collect();
        let published = |fiscal: NaiveDate| {
            releases
                .get(&fiscal)
                .copied()
                .unwrap_or_else(|| filing_deadline(fiscal))
        };

        let mut balance_sheets: Vec<BalanceSheet> =
            reports(payloads.balance_sheet, "quarterlyReports")
                .filter_map(|r| {
                    let fiscal = date_field(r, "fiscalDateEnding")?;
                    Some(BalanceSheet {
                        fiscal_date_ending: fiscal,
                        reported_date: published(fiscal),
                        total_equity: number_field(r, "totalShareholderEquity"),
                        shares_outstanding: number_field(r, "commonStockSharesOutstanding"),
                        total_debt: number_field(r, "shortLongTermDebtTotal"),
                        cash: number_field(r, "cashAndCashEquivalentsAtCarryingValue"),
                    })
                })
                .collect();
        balance_sheets.sort_by(|a, b| b.fiscal_date_ending.cmp(&a.fiscal_date_ending));

        let mut income_statements: Vec<IncomeStatement> =
            reports(payloads.income_statement, "quarterlyReports")
                .filter_map(|r| {
                    let fiscal = date_field(r, "fiscalDateEnding")?;
                    Some(IncomeStatement {
                        fiscal_date_ending: fiscal,
                        reported_date: published(fiscal),
                        ebitda: number_field(r, "ebitda"),
                    })
                })
                .collect();
        income_statements.sort_by(|a, b| b.fiscal_date_ending.cmp(&a.fiscal_date_ending));

        let mut cash_flows: Vec<CashFlowStatement> =
            reports(payloads.cash_flow, "quarterlyReports")
                .filter_map(|r| {
                    let fiscal = date_field(r, "fiscalDateEnding")?;
                    Some(CashFlowStatement {
                        fiscal_date_ending: fiscal,
                        reported_date: published(fiscal),
                        operating_cashflow: number_field(r, "operatingCashflow"),
                    })
                })
                .collect();
        cash_flows.sort_by(|a, b| b.fiscal_date_ending.cmp(&a.fiscal_date_ending));

        Self {
            earnings,
            balance_sheets,
            income_statements,
            cash_flows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.earnings.is_empty()
            && self.balance_sheets.is_empty()
            && self.income_statements.is_empty()
            && self.cash_flows.is_empty()
    }

    /// Sum of EPS over the four latest quarters published on or before `date`
    pub fn trailing_eps(&self, date: NaiveDate) -> Option<f64> {
        trailing_sum(
            self.earnings
                .iter()
                .filter(|e| e.reported_date <= date)
                .map(|e| (e.fiscal_date_ending, e.eps)),
        )
    }

    /// Sum of EBITDA over the four latest quarters published on or before `date`
    pub fn trailing_ebitda(&self, date: NaiveDate) -> Option<f64> {
        trailing_sum(
            self.income_statements
                .iter()
                .filter(|s| s.reported_date <= date)
                .map(|s| (s.fiscal_date_ending, s.ebitda)),
        )
    }

    /// Sum of operating cash flow over the four latest quarters published on or before `date`
    pub fn trailing_operating_cashflow(&self, date: NaiveDate) -> Option<f64> {
        trailing_sum(
            self.cash_flows
                .iter()
                .filter(|s| s.reported_date <= date)
                .map(|s| (s.fiscal_date_ending, s.operating_cashflow)),
        )
    }

    /// Latest balance sheet published on or before `date`
    pub fn balance_sheet_at(&self, date: NaiveDate) -> Option<&BalanceSheet> {
        self.balance_sheets.iter().find(|b| b.reported_date <= date)
    }

    /// Ratios applicable on the bar's date, priced at its close
    ///
    /// A ratio is omitted when an input is missing or its denominator is not
    /// positive. The result is `None` when no ratio can be computed.
    pub fn ratios_at(&self, bar: &PriceBar) -> Option<RawFundamentals> {
        let price = bar.close;
        if !price.is_finite() || price <= 0.0 {
            return None;
        }

        let sheet = self.balance_sheet_at(bar.date);
        let shares = sheet.and_then(|b| b.shares_outstanding).filter(|s| *s > 0.0);

        let pe = self
            .trailing_eps(bar.date)
            .filter(|eps| *eps > 0.0)
            .map(|eps| price / eps);

        let pb = sheet
            .and_then(|b| b.total_equity)
            .zip(shares)
            .map(|(equity, shares)| equity / shares)
            .filter(|book| *book > 0.0)
            .map(|book| price / book);

        let ev_ebitda = sheet
            .zip(shares)
            .and_then(|(b, shares)| {
                let debt = b.total_debt.unwrap_or(0.0);
                let cash = b.cash.unwrap_or(0.0);
                Some(price * shares + debt - cash).zip(self.trailing_ebitda(bar.date))
            })
            .filter(|(_, ebitda)| *ebitda > 0.0)
            .map(|(ev, ebitda)| ev / ebitda);

        let raw = finite_fields([
            (RatioName::Pe.source_field(), pe),
            (RatioName::Pb.source_field(), pb),
            (RatioName::EvEbitda.source_field(), ev_ebitda),
        ]);

        (!raw.is_empty()).then_some(raw)
    }

    /// Statement-derived metrics the overview does not publish
    ///
    /// `debtToEquity` is total debt over shareholder equity in percent, from
    /// the latest balance sheet. `priceToCashflow` is `market_cap` over
    /// trailing operating cash flow. Either is left out when its inputs are
    /// missing or the denominator is not positive.
    pub fn current_fundamentals(&self, market_cap: Option<f64>, date: NaiveDate) -> RawFundamentals {
        let debt_to_equity = self.balance_sheet_at(date).and_then(|b| {
            let equity = b.total_equity.filter(|e| *e > 0.0)?;
            Some(b.total_debt? / equity * 100.0)
        });

        let price_to_cashflow = market_cap
            .zip(self.trailing_operating_cashflow(date).filter(|cf| *cf > 0.0))
            .map(|(cap, cashflow)| cap / cashflow);

        finite_fields([
            (MetricName::DebtToEquity.source_field(), debt_to_equity),
            (MetricName::PriceToCashFlow.source_field(), price_to_cashflow),
        ])
    }
}

/// Sum of four consecutive quarters, newest first
///
/// `None` when fewer than four quarters are available, when any of them lacks
/// a figure, or when a quarter is missing between them.
fn trailing_sum(quarters: impl Iterator<Item = (NaiveDate, Option<f64>)>) -> Option<f64> {
    let quarters: Vec<_> = quarters.take(4).collect();
    if quarters.len() < 4 {
        return None;
    }

    let (newest, _) = quarters.first()?;
    let (oldest, _) = quarters.last()?;
    if (*newest - *oldest).num_days() > TRAILING_YEAR_SPAN_DAYS {
        return None;
    }

    quarters.into_iter().map(|(_, value)| value).sum()
}

fn filing_deadline(fiscal_date_ending: NaiveDate) -> NaiveDate {
    fiscal_date_ending
        .checked_add_days(Days::new(FILING_LAG_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

fn finite_fields<const N: usize>(fields: [(&str, Option<f64>); N]) -> RawFundamentals {
    let mut raw = RawFundamentals::new();
    for (field, value) in fields {
        if let Some(value) = value.filter(|v| v.is_finite()) {
            raw.insert(field.to_string(), json!(value));
        }
    }
    raw
}

fn reports<'a>(payload: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn date_field(report: &Value, key: &str) -> Option<NaiveDate> {
    report
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Alpha Vantage reports numbers as strings and uses "None" for gaps
pub(crate) fn number_field(report: &Value, key: &str) -> Option<f64> {
    report.get(key).and_then(|v| MetricValue::from_json(v).as_f64())
}
