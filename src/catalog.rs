//! Product catalog and counter sales.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{PosError, PosResult};
use crate::models::{Product, Sale, SaleItem};
use crate::store::{CashStore, CatalogStore};

/// Editable product fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Display name.
    pub name: String,
    /// Catalog grouping.
    #[serde(default)]
    pub category: String,
    /// Unit price.
    pub price: Decimal,
    /// Units on hand.
    #[serde(default)]
    pub stock: u32,
    /// Whether the product can be sold.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ProductDraft {
    fn validate(self) -> PosResult<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(PosError::validation("name", "must not be empty"));
        }
        PosError::require_non_negative("price", self.price)?;
        Ok(Self {
            name,
            category: self.category.trim().to_string(),
            ..self
        })
    }

    fn into_product(self, id: Uuid) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            stock: self.stock,
            active: self.active,
        }
    }
}

/// One requested line of a counter sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    /// Product to sell.
    pub product_id: Uuid,
    /// Units to sell.
    pub quantity: u32,
}

/// Product maintenance and counter sales over a store.
pub struct Catalog<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> Catalog<'a, S> {
    /// Creates a catalog over `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All products, by name.
    pub fn list(&self) -> PosResult<Vec<Product>> {
        self.store.list_products()
    }

    /// Adds a product.
    pub fn create(&self, draft: ProductDraft) -> PosResult<Product> {
        let product = self
            .store
            .insert_product(draft.validate()?.into_product(Uuid::new_v4()))?;
        info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Replaces a product's fields.
    pub fn update(&self, id: Uuid, draft: ProductDraft) -> PosResult<Product> {
        let product = self.store.update_product(draft.validate()?.into_product(id))?;
        info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    /// Removes a product.
    pub fn delete(&self, id: Uuid) -> PosResult<()> {
        self.store.delete_product(id)?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

impl<S: CatalogStore + CashStore + ?Sized> Catalog<'_, S> {
    /// Rings up a counter sale at catalog prices against the open register.
    ///
    /// Stock for every line is decremented together with the sale insert, or
    /// nothing changes.
    pub fn sell(
        &self,
        lines: &[SaleLine],
        payment_type: Option<String>,
        sold_by: &str,
        now: NaiveDateTime,
    ) -> PosResult<Sale> {
        if lines.is_empty() {
            return Err(PosError::validation("items", "must not be empty"));
        }

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            if line.quantity == 0 {
                return Err(PosError::validation("quantity", "must be greater than zero"));
            }
            let product = self.store.get_product(line.product_id)?;
            if !product.active {
                return Err(PosError::validation(
                    "productId",
                    format!("{} is not available for sale", product.name),
                ));
            }
            let subtotal = PosError::in_range(
                "quantity",
                product.price.checked_mul(Decimal::from(line.quantity)),
            )?;
            items.push(SaleItem {
                product_id: product.id,
                product_name: product.name,
                quantity: line.quantity,
                unit_price: product.price,
                subtotal,
            });
        }

        let total = items.iter().try_fold(Decimal::ZERO, |acc, item| {
            PosError::in_range("items", acc.checked_add(item.subtotal))
        })?;
        let register_id = self.store.open_register()?.map(|r| r.id);
        let sale = self.store.record_sale(Sale {
            id: Uuid::new_v4(),
            register_id,
            sold_by: sold_by.to_string(),
            total,
            items,
            payment_type,
            created_at: now,
        })?;

        info!(
            sale_id = %sale.id,
            total = %sale.total,
            register_id = ?sale.register_id,
            "Sale recorded"
        );
        Ok(sale)
    }
}
