//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats a decimal amount as a price with two fraction digits.
///
/// Usage in templates: `{{ product.price|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    let formatted = raw
        .parse::<rust_decimal::Decimal>()
        .map_or(raw, |d| format!("{:.2}", d.round_dp(2)));
    Ok(format!("{formatted} Rs"))
}

#[cfg(test)]
mod tests {
    use askama::Template;

    use crate::filters;

    #[derive(Template)]
    #[template(source = "{{ amount|money }}", ext = "txt")]
    struct PriceDisplay {
        amount: &'static str,
    }

    fn render(amount: &'static str) -> String {
        PriceDisplay { amount }.render().expect("template renders")
    }

    #[test]
    fn test_money_pads_fraction_digits() {
        assert_eq!(render("250"), "250.00 Rs");
        assert_eq!(render("19.9"), "19.90 Rs");
    }

    #[test]
    fn test_money_rounds_to_two_places() {
        assert_eq!(render("19.999"), "20.00 Rs");
    }
}
