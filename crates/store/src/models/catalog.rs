//! Promotions, collections, and products.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CollectionId, ProductId, PromotionId, Slug, UnitPrice};

use super::{FieldError, check_required, check_varchar};

/// Width of `collections.title` and `products.title`.
pub const TITLE_MAX_LENGTH: usize = 255;

/// A discount that can apply to many products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Promotion {
    /// Unique promotion ID.
    pub id: PromotionId,
    /// Free-form description.
    pub description: String,
    /// Discount as a ratio (e.g. `0.15` for 15% off).
    pub discount: f64,
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Input for creating a promotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPromotion {
    pub description: String,
    pub discount: f64,
}

impl NewPromotion {
    /// Check the discount is a finite number.
    ///
    /// # Errors
    ///
    /// Returns `FieldError` for a NaN or infinite discount.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !self.discount.is_finite() {
            return Err(FieldError::new("discount", "must be a finite number"));
        }
        Ok(())
    }
}

/// A group of products, optionally with one featured product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Collection {
    /// Unique collection ID.
    pub id: CollectionId,
    /// Collection title.
    pub title: String,
    /// Product highlighted for this collection. Cleared when that product is deleted.
    pub featured_product_id: Option<ProductId>,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Input for creating a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCollection {
    pub title: String,
}

impl NewCollection {
    /// Check the title fits its column.
    ///
    /// # Errors
    ///
    /// Returns `FieldError` for a blank or over-long title.
    pub fn validate(&self) -> Result<(), FieldError> {
        check_required("title", &self.title)?;
        check_varchar("title", &self.title, TITLE_MAX_LENGTH)
    }
}

/// A product in exactly one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Owning collection. The collection cannot be deleted while this product exists.
    pub collection_id: CollectionId,
    /// Product title.
    pub title: String,
    /// URL slug (not unique).
    pub slug: Slug,
    /// Long description.
    pub description: String,
    /// Current price. Cart and order lines keep their own copy.
    pub unit_price: UnitPrice,
    /// Units in stock.
    pub inventory: i32,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub collection_id: CollectionId,
    pub title: String,
    pub slug: Slug,
    pub description: String,
    pub unit_price: UnitPrice,
    pub inventory: i32,
}

impl NewProduct {
    /// Build a product input whose slug is derived from the title.
    #[must_use]
    pub fn with_derived_slug(
        collection_id: CollectionId,
        title: impl Into<String>,
        unit_price: UnitPrice,
        inventory: i32,
    ) -> Self {
        let title = title.into();
        Self {
            collection_id,
            slug: Slug::from_title(&title),
            title,
            description: String::new(),
            unit_price,
            inventory,
        }
    }

    /// Check the title fits its column.
    ///
    /// # Errors
    ///
    /// Returns `FieldError` for a blank or over-long title.
    pub fn validate(&self) -> Result<(), FieldError> {
        check_required("title", &self.title)?;
        check_varchar("title", &self.title, TITLE_MAX_LENGTH)
    }
}
