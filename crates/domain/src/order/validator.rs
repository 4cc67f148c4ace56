//! Fail-fast admission checks for order requests.
//!
//! Every line must ask for at least one unit. That is checked on the request
//! alone, before the customer or catalog is read. The remaining checks run in
//! a fixed order and the first failure wins:
//!
//! 1. the customer exists
//! 2. at least one requested product exists
//! 3. every requested product exists
//! 4. every line fits within stock, counting earlier lines for the same product
//! 5. the order total fits in an `i64` amount of cents
//!
//! All functions here are pure; they never touch a repository.

use std::collections::HashMap;

use common::{Money, ProductId};
use store::{Customer, Product};

use super::{CreateOrder, LineItemRequest, OrderError};

/// Runs every check against an already-loaded customer and catalog snapshot.
///
/// Returns the validated customer on success.
pub fn validate<'a>(
    cmd: &CreateOrder,
    customer: Option<&'a Customer>,
    found: &[Product],
) -> Result<&'a Customer, OrderError> {
    validate_quantities(&cmd.products)?;
    let customer = validate_customer(cmd, customer)?;
    validate_products(&cmd.products, found)?;
    Ok(customer)
}

/// Rejects the first line asking for zero units.
pub fn validate_quantities(requested: &[LineItemRequest]) -> Result<(), OrderError> {
    match requested.iter().find(|line| line.quantity == 0) {
        Some(line) => Err(OrderError::InvalidQuantity {
            product_id: line.id.clone(),
        }),
        None => Ok(()),
    }
}

/// Step 1: the customer must exist.
pub fn validate_customer<'a>(
    cmd: &CreateOrder,
    customer: Option<&'a Customer>,
) -> Result<&'a Customer, OrderError> {
    customer.ok_or_else(|| OrderError::CustomerNotFound {
        customer_id: cmd.customer_id.clone(),
    })
}

/// Steps 2 to 5: the requested lines against the catalog snapshot.
pub fn validate_products(
    requested: &[LineItemRequest],
    found: &[Product],
) -> Result<(), OrderError> {
    if found.is_empty() {
        return Err(OrderError::NoProductsProvided);
    }

    let catalog = index_by_id(found);

    let missing: Vec<ProductId> = requested
        .iter()
        .filter(|line| !catalog.contains_key(&line.id))
        .map(|line| line.id.clone())
        .collect();
    if !missing.is_empty() {
        return Err(OrderError::ProductsNotFound {
            product_ids: missing,
        });
    }

    let mut running: HashMap<&ProductId, u64> = HashMap::new();
    for line in requested {
        let Some(product) = catalog.get(&line.id) else {
            continue;
        };
        let total = running.entry(&line.id).or_insert(0);
        *total += u64::from(line.quantity);
        if *total > u64::from(product.quantity) {
            return Err(OrderError::InsufficientStock {
                product_id: line.id.clone(),
                requested: *total,
                available: product.quantity,
            });
        }
    }

    let mut amount = Money::zero();
    for line in requested {
        let Some(product) = catalog.get(&line.id) else {
            continue;
        };
        amount = product
            .price
            .checked_multiply(line.quantity)
            .and_then(|line_total| amount.checked_add(line_total))
            .ok_or_else(|| OrderError::TotalTooLarge {
                product_id: line.id.clone(),
            })?;
    }

    Ok(())
}

pub(crate) fn index_by_id(products: &[Product]) -> HashMap<&ProductId, &Product> {
    products.iter().map(|p| (&p.id, p)).collect()
}
