//! Cart Service
//!
//! Add/update/remove operations on the user's open cart plus the
//! live-priced preview. The cart itself is created lazily on first
//! access and survives clearing.

use crate::db::DbService;
use crate::db::repository::{CartRepository, ProductRepository};
use crate::pricing;
use crate::utils::{AppError, AppResult};
use shared::dto::{CartLineView, CartView};
use shared::models::cart::CartItem;

#[derive(Clone)]
pub struct CartService {
    carts: CartRepository,
    products: ProductRepository,
}

impl CartService {
    pub fn new(db: &DbService) -> Self {
        Self {
            carts: CartRepository::new(db.pool.clone()),
            products: ProductRepository::new(db.pool.clone()),
        }
    }

    /// Add a product to the cart and return the resulting line. An
    /// existing line item has its quantity incremented; otherwise a new
    /// line is created.
    pub async fn add_item(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> AppResult<CartItem> {
        require_quantity(quantity)?;
        // Unknown products are rejected before the cart is even touched
        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Product {product_id} not found")));
        }
        let cart = self.carts.find_or_create(user_id).await?;
        self.carts
            .add_or_increment(cart.cart_id, product_id, quantity)
            .await?;
        tracing::debug!(user_id, product_id, quantity, "Cart line added");
        self.line(cart.cart_id, product_id).await
    }

    /// Replace the quantity of an existing line item and return it
    pub async fn update_item(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> AppResult<CartItem> {
        require_quantity(quantity)?;
        let Some(cart) = self.carts.find_by_user(user_id).await? else {
            return Err(not_in_cart(product_id));
        };
        if !self
            .carts
            .set_quantity(cart.cart_id, product_id, quantity)
            .await?
        {
            return Err(not_in_cart(product_id));
        }
        self.line(cart.cart_id, product_id).await
    }

    /// Remove a line item
    pub async fn remove_item(&self, user_id: i64, product_id: i64) -> AppResult<()> {
        let Some(cart) = self.carts.find_by_user(user_id).await? else {
            return Err(not_in_cart(product_id));
        };
        if !self.carts.delete_item(cart.cart_id, product_id).await? {
            return Err(not_in_cart(product_id));
        }
        Ok(())
    }

    /// Cart preview with live catalog pricing. Display values only: the
    /// numbers here are re-read from the catalog on every call and are
    /// not the snapshot an order will carry.
    pub async fn items(&self, user_id: i64) -> AppResult<CartView> {
        let Some(cart) = self.carts.find_by_user(user_id).await? else {
            return Ok(CartView {
                items: Vec::new(),
                total: 0.0,
            });
        };
        let rows = self.carts.lines_with_products(cart.cart_id).await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let unit_price =
                pricing::discounted_unit_price(row.price, row.discount_percent.unwrap_or(0.0))?;
            items.push(CartLineView {
                product_id: row.product_id,
                name: row.name,
                quantity: row.quantity,
                unit_price,
                line_total: pricing::line_total(unit_price, row.quantity),
            });
        }
        let total = pricing::sum(items.iter().map(|i| i.line_total));
        Ok(CartView { items, total })
    }

    /// Empty the cart. Clearing an already-empty (or never-created) cart
    /// is a no-op, not an error.
    pub async fn clear(&self, user_id: i64) -> AppResult<()> {
        if let Some(cart) = self.carts.find_by_user(user_id).await? {
            let removed = self.carts.clear(cart.cart_id).await?;
            if removed > 0 {
                tracing::debug!(user_id, removed, "Cart cleared");
            }
        }
        Ok(())
    }

    async fn line(&self, cart_id: i64, product_id: i64) -> AppResult<CartItem> {
        self.carts
            .find_item(cart_id, product_id)
            .await?
            .ok_or_else(|| not_in_cart(product_id))
    }
}

fn require_quantity(quantity: i64) -> AppResult<()> {
    if quantity < 1 {
        return Err(AppError::Invalid(format!(
            "quantity must be >= 1, got {quantity}"
        )));
    }
    Ok(())
}

fn not_in_cart(product_id: i64) -> AppError {
    AppError::NotFound(format!("Product {product_id} is not in the cart"))
}
