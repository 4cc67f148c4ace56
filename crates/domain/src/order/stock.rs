use std::collections::HashMap;

use common::ProductId;
use store::{Product, StockUpdate};

use super::LineItemRequest;
use super::validator::index_by_id;

/// Computes the stock level each ordered product is left with.
///
/// Works from the same `found` snapshot the request was validated against.
/// Lines for the same product are summed, and the result holds one update
/// per distinct product in order of first appearance.
pub fn compute_stock_updates(requested: &[LineItemRequest], found: &[Product]) -> Vec<StockUpdate> {
    let catalog = index_by_id(found);
    let mut order: Vec<&ProductId> = Vec::new();
    let mut ordered: HashMap<&ProductId, u32> = HashMap::new();

    for line in requested {
        if !catalog.contains_key(&line.id) {
            continue;
        }
        let total = ordered.entry(&line.id).or_insert_with(|| {
            order.push(&line.id);
            0
        });
        *total = total.saturating_add(line.quantity);
    }

    order
        .into_iter()
        .filter_map(|id| {
            let product = catalog.get(id)?;
            let taken = ordered.get(id).copied().unwrap_or(0);
            Some(StockUpdate::new(
                id.clone(),
                product.quantity.saturating_sub(taken),
            ))
        })
        .collect()
}
