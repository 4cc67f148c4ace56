//! Product catalog registration and lookup.

use common::{Money, ProductId};
use store::{NewProduct, Product, ProductRepository, StoreError};

use crate::error::DomainError;

/// Command to add a product to the catalog.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub price: Money,
    pub quantity: u32,
}

impl CreateProduct {
    pub fn new(name: impl Into<String>, price: Money, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }
}

/// Service for adding and loading catalog products.
pub struct ProductService<P: ProductRepository> {
    products: P,
}

impl<P: ProductRepository> ProductService<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    /// Adds a product. Names are unique and prices non-negative.
    ///
    /// A concurrent insert of the same name that passes the lookup is caught
    /// by the store's unique index.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, cmd: CreateProduct) -> Result<Product, DomainError> {
        if cmd.price.is_negative() {
            return Err(DomainError::InvalidPrice { price: cmd.price });
        }

        if self.products.find_by_name(&cmd.name).await?.is_some() {
            return Err(DomainError::ProductNameTaken { name: cmd.name });
        }

        let product = self
            .products
            .create(NewProduct {
                name: cmd.name,
                price: cmd.price,
                quantity: cmd.quantity,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate { value, .. } => DomainError::ProductNameTaken { name: value },
                other => other.into(),
            })?;

        metrics::counter!("products_created_total").increment(1);
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Loads a product by id.
    #[tracing::instrument(skip(self))]
    pub async fn find(&self, product_id: &ProductId) -> Result<Product, DomainError> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| DomainError::ProductNotFound(product_id.clone()))
    }
}
