use store::{PricedLineItem, Product};

use super::LineItemRequest;
use super::validator::index_by_id;

/// Pairs every requested line with its product's current catalog price.
///
/// Products are matched by id, never by position. Lines whose product is not
/// in `found` are skipped; validation rejects such requests beforehand.
pub fn price_line_items(requested: &[LineItemRequest], found: &[Product]) -> Vec<PricedLineItem> {
    let catalog = index_by_id(found);

    requested
        .iter()
        .filter_map(|line| {
            catalog
                .get(&line.id)
                .map(|product| PricedLineItem::new(line.id.clone(), line.quantity, product.price))
        })
        .collect()
}
