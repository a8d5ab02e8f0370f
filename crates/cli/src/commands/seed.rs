//! Seed the catalog from a YAML file.
//!
//! The file lists promotions and collections; each collection lists its
//! products. Products refer to promotions by `key`, and a collection may
//! name one of its products (by slug) as featured:
//!
//! ```yaml
//! promotions:
//!   - key: spring
//!     description: Spring sale
//!     discount: 0.1
//! collections:
//!   - title: Tea
//!     featured: green-tea
//!     products:
//!       - title: Green Tea
//!         unit_price: "8.99"
//!         inventory: 40
//!         promotions: [spring]
//! ```
//!
//! Prices are quoted strings so they are read as exact decimals.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{error, info};

use storefront_core::{CollectionId, PromotionId, Slug, UnitPrice};
use storefront_store::config::{ConfigError, StoreConfig};
use storefront_store::db::{
    self, CollectionRepository, ProductRepository, PromotionRepository, RepositoryError,
};
use storefront_store::models::{NewCollection, NewProduct, NewPromotion};

/// Errors from the seed command.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{0} validation errors found")]
    Invalid(usize),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    Connect(#[from] sqlx::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Top-level seed file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSeed {
    #[serde(default)]
    pub promotions: Vec<PromotionSeed>,
    #[serde(default)]
    pub collections: Vec<CollectionSeed>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromotionSeed {
    pub key: String,
    pub description: String,
    pub discount: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionSeed {
    pub title: String,
    /// Slug of one of this collection's products.
    pub featured: Option<Slug>,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductSeed {
    pub title: String,
    /// Derived from the title when omitted.
    pub slug: Option<Slug>,
    #[serde(default)]
    pub description: String,
    pub unit_price: UnitPrice,
    pub inventory: i32,
    /// Promotion keys.
    #[serde(default)]
    pub promotions: Vec<String>,
}

impl ProductSeed {
    fn slug(&self) -> Slug {
        self.slug
            .clone()
            .unwrap_or_else(|| Slug::from_title(&self.title))
    }

    fn to_new_product(&self, collection_id: CollectionId) -> NewProduct {
        NewProduct {
            collection_id,
            title: self.title.clone(),
            slug: self.slug(),
            description: self.description.clone(),
            unit_price: self.unit_price,
            inventory: self.inventory,
        }
    }
}

/// Counts of inserted rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub promotions: usize,
    pub collections: usize,
    pub products: usize,
    pub promotion_links: usize,
}

/// Check cross-references and column widths before touching the database.
///
/// Returns one message per problem; an empty list means the file is valid.
#[must_use]
pub fn validate_catalog(catalog: &CatalogSeed) -> Vec<String> {
    let mut errors = Vec::new();

    let mut keys = HashSet::new();
    for promotion in &catalog.promotions {
        if !keys.insert(promotion.key.as_str()) {
            errors.push(format!("duplicate promotion key '{}'", promotion.key));
        }
        let input = NewPromotion {
            description: promotion.description.clone(),
            discount: promotion.discount,
        };
        if let Err(e) = input.validate() {
            errors.push(format!("promotion '{}': {e}", promotion.key));
        }
    }

    for collection in &catalog.collections {
        let input = NewCollection {
            title: collection.title.clone(),
        };
        if let Err(e) = input.validate() {
            errors.push(format!("collection '{}': {e}", collection.title));
        }

        let slugs: HashSet<Slug> = collection.products.iter().map(ProductSeed::slug).collect();
        if let Some(featured) = &collection.featured
            && !slugs.contains(featured)
        {
            errors.push(format!(
                "collection '{}': featured product '{featured}' is not in the collection",
                collection.title
            ));
        }

        for product in &collection.products {
            // The collection does not exist yet; only the columns are checked.
            if let Err(e) = product.to_new_product(CollectionId::new(0)).validate() {
                errors.push(format!(
                    "collection '{}': product '{}': {e}",
                    collection.title, product.title
                ));
            }
            for key in &product.promotions {
                if !keys.contains(key.as_str()) {
                    errors.push(format!(
                        "product '{}': unknown promotion key '{key}'",
                        product.title
                    ));
                }
            }
        }
    }

    errors
}

/// Insert everything in `catalog`.
///
/// # Errors
///
/// Returns the first repository error; rows inserted before it remain.
pub async fn seed_catalog(
    pool: &PgPool,
    catalog: &CatalogSeed,
) -> Result<SeedSummary, RepositoryError> {
    let promotions = PromotionRepository::new(pool);
    let collections = CollectionRepository::new(pool);
    let products = ProductRepository::new(pool);

    let mut summary = SeedSummary::default();
    let mut promotion_ids: HashMap<&str, PromotionId> = HashMap::new();

    for seed in &catalog.promotions {
        let promotion = promotions
            .create(&NewPromotion {
                description: seed.description.clone(),
                discount: seed.discount,
            })
            .await?;
        promotion_ids.insert(seed.key.as_str(), promotion.id);
        summary.promotions += 1;
    }

    for seed in &catalog.collections {
        let collection = collections
            .create(&NewCollection {
                title: seed.title.clone(),
            })
            .await?;
        summary.collections += 1;

        for product_seed in &seed.products {
            let product = products
                .create(&product_seed.to_new_product(collection.id))
                .await?;
            summary.products += 1;

            for key in &product_seed.promotions {
                let Some(promotion_id) = promotion_ids.get(key.as_str()) else {
                    return Err(RepositoryError::MissingReference(format!("promotion '{key}'")));
                };
                if products.add_promotion(product.id, *promotion_id).await? {
                    summary.promotion_links += 1;
                }
            }

            if seed.featured.as_ref() == Some(&product.slug) {
                collections
                    .set_featured_product(collection.id, Some(product.id))
                    .await?;
            }
        }
    }

    Ok(summary)
}

/// Parse a seed file's contents.
///
/// # Errors
///
/// Returns `SeedError::Yaml` if the content is not a valid catalog.
pub fn parse_catalog(content: &str) -> Result<CatalogSeed, SeedError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Seed the catalog from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML catalog
/// * `check_only` - Validate the file and stop before connecting
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or a database operation fails.
pub async fn catalog(file_path: &str, check_only: bool) -> Result<(), SeedError> {
    info!(path = %file_path, "Loading catalog seed");

    let content = tokio::fs::read_to_string(Path::new(file_path))
        .await
        .map_err(|source| SeedError::Read {
            path: file_path.to_owned(),
            source,
        })?;
    let catalog = parse_catalog(&content)?;

    let errors = validate_catalog(&catalog);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    info!(
        promotions = catalog.promotions.len(),
        collections = catalog.collections.len(),
        "Catalog validated successfully"
    );
    if check_only {
        return Ok(());
    }

    let config = StoreConfig::from_env()?;
    let pool = db::create_pool(&config).await?;
    info!("Connected to database");

    let summary = seed_catalog(&pool, &catalog).await?;

    info!("Seeding complete!");
    info!("  Promotions inserted: {}", summary.promotions);
    info!("  Collections inserted: {}", summary.collections);
    info!("  Products inserted: {}", summary.products);
    info!("  Promotion links: {}", summary.promotion_links);

    pool.close().await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../../fixtures/catalog.yaml");

    #[test]
    fn test_fixture_is_valid() {
        let catalog = parse_catalog(FIXTURE).unwrap();
        assert!(validate_catalog(&catalog).is_empty());
        assert!(!catalog.collections.is_empty());
    }

    #[test]
    fn test_slug_is_derived_from_title() {
        let catalog = parse_catalog(
            r#"
collections:
  - title: Tea
    featured: green-tea
    products:
      - title: Green Tea
        unit_price: "8.99"
        inventory: 40
"#,
        )
        .unwrap();
        assert!(validate_catalog(&catalog).is_empty());
        let product = catalog.collections.first().and_then(|c| c.products.first()).unwrap();
        assert_eq!(product.slug().as_str(), "green-tea");
        assert_eq!(product.unit_price.to_string(), "8.99");
    }

    #[test]
    fn test_reports_unknown_references() {
        let catalog = parse_catalog(
            r#"
promotions:
  - key: spring
    description: Spring sale
    discount: 0.1
  - key: spring
    description: Duplicate
    discount: 0.2
collections:
  - title: Tea
    featured: oolong
    products:
      - title: Green Tea
        unit_price: "8.99"
        inventory: 40
        promotions: [winter]
"#,
        )
        .unwrap();
        let errors = validate_catalog(&catalog);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("duplicate promotion key")));
        assert!(errors.iter().any(|e| e.contains("featured product 'oolong'")));
        assert!(errors.iter().any(|e| e.contains("unknown promotion key 'winter'")));
    }

    #[test]
    fn test_reports_product_columns_that_do_not_fit() {
        let yaml = format!(
            r#"
collections:
  - title: Tea
    products:
      - title: "{}"
        slug: long-title
        unit_price: "1.00"
        inventory: 1
      - title: "  "
        slug: blank-title
        unit_price: "1.00"
        inventory: 1
"#,
            "x".repeat(300)
        );
        let catalog = parse_catalog(&yaml).unwrap();
        let errors = validate_catalog(&catalog);
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("at most 255 characters")));
    }

    #[test]
    fn test_price_precision_is_enforced_while_parsing() {
        let result = parse_catalog(
            r#"
collections:
  - title: Tea
    products:
      - title: Green Tea
        unit_price: "8.999"
        inventory: 40
"#,
        );
        assert!(matches!(result, Err(SeedError::Yaml(_))));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = parse_catalog("collections: []\nextra: 1\n");
        assert!(result.is_err());
    }
}
