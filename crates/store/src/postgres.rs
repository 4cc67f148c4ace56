use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Customer, CustomerId, CustomerRepository, Money, NewCustomer, NewOrder, NewProduct, Order,
    OrderId, OrderRepository, PricedLineItem, Product, ProductId, ProductRepository, Result,
    StockUpdate, StoreError,
};

const CUSTOMER_COLUMNS: &str = "id, name, email, created_at, updated_at";
const PRODUCT_COLUMNS: &str = "id, name, price, quantity, created_at, updated_at";

/// PostgreSQL-backed store implementing every repository trait.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_customer(row: PgRow) -> Result<Customer> {
        Ok(Customer {
            id: CustomerId::new(row.try_get::<String, _>("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        let id: String = row.try_get("id")?;
        let quantity = quantity_from_column(&id, row.try_get("quantity")?)?;

        Ok(Product {
            id: ProductId::new(id),
            name: row.try_get("name")?,
            price: Money::from_cents(row.try_get("price")?),
            quantity,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_line_item(row: PgRow) -> Result<PricedLineItem> {
        let product_id: String = row.try_get("product_id")?;
        let quantity = quantity_from_column(&product_id, row.try_get("quantity")?)?;

        Ok(PricedLineItem {
            product_id: ProductId::new(product_id),
            quantity,
            price: Money::from_cents(row.try_get("price")?),
        })
    }
}

fn quantity_from_column(id: &str, raw: i64) -> Result<u32> {
    u32::try_from(raw)
        .map_err(|_| StoreError::InvalidRecord(format!("quantity {raw} out of range for {id}")))
}

/// Turns a violation of the named unique constraint into the given error.
fn duplicate_on(
    err: sqlx::Error,
    constraint: &str,
    duplicate: impl FnOnce() -> StoreError,
) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.constraint() == Some(constraint)
    {
        return duplicate();
    }
    StoreError::Database(err)
}

#[async_trait]
impl CustomerRepository for PostgresStore {
    async fn create(&self, customer: NewCustomer) -> Result<Customer> {
        let id = CustomerId::generate();
        let row = sqlx::query(&format!(
            "INSERT INTO customers (id, name, email) VALUES ($1, $2, $3) RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(&customer.name)
        .bind(&customer.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            duplicate_on(e, "unique_customer_email", || StoreError::Duplicate {
                entity: "customer",
                field: "email",
                value: customer.email.clone(),
            })
        })?;

        Self::row_to_customer(row)
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_customer).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_customer).transpose()
    }
}

#[async_trait]
impl ProductRepository for PostgresStore {
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let id = ProductId::generate();
        let row = sqlx::query(&format!(
            "INSERT INTO products (id, name, price, quantity) VALUES ($1, $2, $3, $4) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(i64::from(product.quantity))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            duplicate_on(e, "unique_product_name", || StoreError::Duplicate {
                entity: "product",
                field: "name",
                value: product.name.clone(),
            })
        })?;

        Self::row_to_product(row)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        let ids: Vec<String> = ids.iter().map(|id| id.as_str().to_owned()).collect();

        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn update_quantity(&self, updates: Vec<StockUpdate>) -> Result<Vec<Product>> {
        let mut tx = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(updates.len());

        for update in &updates {
            let row = sqlx::query(&format!(
                "UPDATE products SET quantity = $1, updated_at = NOW() WHERE id = $2 RETURNING {PRODUCT_COLUMNS}"
            ))
            .bind(i64::from(update.quantity))
            .bind(update.id.as_str())
            .fetch_optional(&mut *tx)
            .await?;

            // Dropping the transaction without commit rolls back earlier rows.
            let row = row.ok_or_else(|| StoreError::NotFound {
                entity: "Product",
                id: update.id.to_string(),
            })?;
            updated.push(Self::row_to_product(row)?);
        }

        tx.commit().await?;
        tracing::debug!(products = updated.len(), "stock levels updated");
        Ok(updated)
    }
}

#[async_trait]
impl OrderRepository for PostgresStore {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        let order_id = OrderId::new();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id)
            VALUES ($1, $2)
            RETURNING created_at, updated_at
            "#,
        )
        .bind(order_id.as_uuid())
        .bind(order.customer.id.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

        for (position, line) in order.products.iter().enumerate() {
            let position = i32::try_from(position).map_err(|_| {
                StoreError::InvalidRecord(format!("order {order_id} has too many line items"))
            })?;

            sqlx::query(
                r#"
                INSERT INTO orders_products (order_id, position, product_id, price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order_id.as_uuid())
            .bind(position)
            .bind(line.product_id.as_str())
            .bind(line.price.cents())
            .bind(i64::from(line.quantity))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Order {
            id: order_id,
            customer: order.customer,
            products: order.products,
            created_at,
            updated_at,
        })
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT o.id AS order_id, o.created_at AS order_created_at, o.updated_at AS order_updated_at,
                   c.id, c.name, c.email, c.created_at, c.updated_at
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let order_id = OrderId::from_uuid(row.try_get::<Uuid, _>("order_id")?);
        let created_at: DateTime<Utc> = row.try_get("order_created_at")?;
        let updated_at: DateTime<Utc> = row.try_get("order_updated_at")?;
        let customer = Self::row_to_customer(row)?;

        let lines = sqlx::query(
            r#"
            SELECT product_id, price, quantity
            FROM orders_products
            WHERE order_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let products = lines
            .into_iter()
            .map(Self::row_to_line_item)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Order {
            id: order_id,
            customer,
            products,
            created_at,
            updated_at,
        }))
    }
}
