use rust_decimal::Decimal;

use super::domain::{Fund, Product};

/// All funds held across the application's products, in product order.
pub fn portfolio_funds(products: &[Product]) -> Vec<Fund> {
    products
        .iter()
        .flat_map(|product| product.funds.iter().cloned())
        .collect()
}

/// Sum of `amount - fees` over every fund, scaled by `tax_rate`.
///
/// No rounding is applied here; documents that show currency round at presentation time.
pub fn portfolio_total(products: &[Product], tax_rate: Decimal) -> Decimal {
    let net: Decimal = products
        .iter()
        .flat_map(|product| product.funds.iter())
        .map(Fund::net_value)
        .sum();

    net * tax_rate
}
