//! Financial ratios over current account balances.

use rust_decimal::Decimal;

use super::types::{Ratio, RatioColor, ReportAccount};
use crate::accounts::{StatementKind, same_class_name};

const CURRENT_ASSETS: &str = "Current Assets";
const CURRENT_LIABILITIES: &str = "Current Liabilities";
const INVENTORY: &str = "inventory";

/// Threshold at or above which a ratio is green.
const GREEN_AT: Decimal = Decimal::TWO;
/// Threshold at or above which a ratio is yellow.
const YELLOW_AT: Decimal = Decimal::ONE;

/// Tags a value with the uniform traffic-light cutoffs.
#[must_use]
pub fn color_for(value: Decimal) -> RatioColor {
    if value >= GREEN_AT {
        RatioColor::Green
    } else if value >= YELLOW_AT {
        RatioColor::Yellow
    } else {
        RatioColor::Red
    }
}

/// Builds one ratio. A zero denominator yields no value and no color.
#[must_use]
pub fn ratio(name: &str, numerator: Decimal, denominator: Decimal) -> Ratio {
    let value = numerator.checked_div(denominator).map(|v| v.round_dp(2));
    Ratio {
        name: name.to_string(),
        value,
        numerator,
        denominator,
        formula: format!("{numerator} / {denominator}"),
        color: value.map(color_for),
    }
}

fn in_class(account: &ReportAccount, class: &str) -> bool {
    same_class_name(&account.category, class)
        || account
            .subcategory
            .as_deref()
            .is_some_and(|s| same_class_name(s, class))
}

fn is_inventory(account: &ReportAccount) -> bool {
    account
        .subcategory
        .as_deref()
        .is_some_and(|s| s.to_lowercase().contains(INVENTORY))
        || account.name.to_lowercase().contains(INVENTORY)
}

fn sum_where(accounts: &[&ReportAccount], pred: impl Fn(&ReportAccount) -> bool) -> Decimal {
    accounts.iter().filter(|a| pred(a)).map(|a| a.balance).sum()
}

/// Computes the six standard ratios from active accounts' current balances.
#[must_use]
pub fn compute_ratios(accounts: &[ReportAccount]) -> Vec<Ratio> {
    let active: Vec<&ReportAccount> = accounts.iter().filter(|a| a.is_active).collect();

    let current_assets = sum_where(&active, |a| in_class(a, CURRENT_ASSETS));
    let current_liabilities = sum_where(&active, |a| in_class(a, CURRENT_LIABILITIES));
    let inventory = sum_where(&active, |a| in_class(a, CURRENT_ASSETS) && is_inventory(a));
    let statement = |kind: StatementKind| sum_where(&active, move |a| a.statement == Some(kind));
    let revenue = statement(StatementKind::Revenue);
    let expenses = statement(StatementKind::Expense);
    let total_assets = statement(StatementKind::Asset);
    let total_equity = statement(StatementKind::Equity);
    let net_income = revenue - expenses;

    vec![
        ratio("Current Ratio", current_assets, current_liabilities),
        ratio("Net Profit Margin", net_income, revenue),
        ratio("Return on Assets", net_income, total_assets),
        ratio("Return on Equity", net_income, total_equity),
        ratio("Asset Turnover", revenue, total_assets),
        ratio("Quick Ratio", current_assets - inventory, current_liabilities),
    ]
}
