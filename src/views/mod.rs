mod card_grid;
mod page;

pub use card_grid::{CARDS_PER_ROW, Card, card_rows, format_price};
pub use page::{EMPTY_CATALOG, Listing, PAGE_TITLE, PageView, render};
