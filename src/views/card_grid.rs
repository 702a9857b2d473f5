use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Product;

pub const CARDS_PER_ROW: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&Product> for Card {
    fn from(product: &Product) -> Self {
        Card {
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_price(product.price),
            image_url: product.image_url.clone().filter(|url| !url.is_empty()),
        }
    }
}

pub fn format_price(price: Decimal) -> String {
    let mut cents = price;
    cents.rescale(2);
    format!("R$ {}", cents)
}

/// Splits products into rows of `CARDS_PER_ROW`; only the last row may be
/// shorter and there is never an empty row.
pub fn card_rows(products: &[Product]) -> Vec<Vec<Card>> {
    products
        .chunks(CARDS_PER_ROW)
        .map(|row| row.iter().map(Card::from).collect())
        .collect()
}
