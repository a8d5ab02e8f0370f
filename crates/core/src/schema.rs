//! Declarative description of the storefront tables.
//!
//! The SQL migrations in `storefront-store` are what the database actually
//! runs. This module lists the same tables and foreign keys as data so that
//! tooling (the CLI `schema` command, tests that compare against
//! `information_schema`) can reason about them without parsing SQL.
//!
//! # Deletion policies
//!
//! | Parent → child | Policy |
//! |---|---|
//! | Collection → Product | protect |
//! | Customer → Order | protect |
//! | Order → OrderItem | protect |
//! | Product → OrderItem | protect |
//! | Customer → Cart | cascade |
//! | Cart → CartItem | cascade |
//! | Product → CartItem | cascade |
//! | Customer → Address | cascade |
//! | Product / Promotion → join rows | cascade |
//! | Product → Collection featured link | set null |

use core::fmt;

use serde::Serialize;

/// Postgres schema holding every storefront table.
pub const SCHEMA: &str = "store";

/// What happens to referencing rows when the referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    /// Reject the delete while referencing rows exist.
    Protect,
    /// Delete referencing rows along with the parent.
    Cascade,
    /// Clear the reference and keep the referencing row.
    SetNull,
}

impl OnDelete {
    /// The `ON DELETE` action used in the migrations.
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Protect => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
        }
    }

    /// The value Postgres reports in
    /// `information_schema.referential_constraints.delete_rule`.
    #[must_use]
    pub const fn information_schema_rule(&self) -> &'static str {
        self.sql()
    }
}

impl fmt::Display for OnDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Protect => "protect",
            Self::Cascade => "cascade",
            Self::SetNull => "set null",
        })
    }
}

/// A foreign key from `table.column` to `references.id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Relation {
    /// Constraint name in the migrations.
    pub constraint: &'static str,
    /// Referencing table (unqualified).
    pub table: &'static str,
    /// Referencing column.
    pub column: &'static str,
    /// Referenced table (unqualified).
    pub references: &'static str,
    /// Whether the referencing column may be NULL.
    pub nullable: bool,
    /// Whether the referencing column is unique (one-to-one).
    pub unique: bool,
    /// Deletion policy.
    pub on_delete: OnDelete,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arity = if self.unique { "one-to-one" } else { "many-to-one" };
        write!(
            f,
            "{}.{} -> {} ({arity}, on delete {})",
            self.table, self.column, self.references, self.on_delete
        )
    }
}

/// A table together with its admin display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entity {
    /// Type name in the domain model.
    pub name: &'static str,
    /// Table name (unqualified).
    pub table: &'static str,
    /// Singular display name.
    pub verbose_name: &'static str,
    /// Plural display name.
    pub verbose_name_plural: &'static str,
}

impl Entity {
    /// Schema-qualified table name.
    #[must_use]
    pub fn qualified_table(&self) -> String {
        format!("{SCHEMA}.{}", self.table)
    }
}

/// Every table in the schema, parents before children.
pub const ENTITIES: &[Entity] = &[
    Entity {
        name: "Promotion",
        table: "promotions",
        verbose_name: "promotion",
        verbose_name_plural: "promotions",
    },
    Entity {
        name: "Collection",
        table: "collections",
        verbose_name: "collection",
        verbose_name_plural: "collections",
    },
    Entity {
        name: "Product",
        table: "products",
        verbose_name: "product",
        verbose_name_plural: "products",
    },
    Entity {
        name: "ProductPromotion",
        table: "product_promotions",
        verbose_name: "product promotion",
        verbose_name_plural: "product promotions",
    },
    Entity {
        name: "Customer",
        table: "customers",
        verbose_name: "customer",
        verbose_name_plural: "customers",
    },
    Entity {
        name: "Address",
        table: "addresses",
        verbose_name: "address",
        verbose_name_plural: "addresses",
    },
    Entity {
        name: "Order",
        table: "orders",
        verbose_name: "order",
        verbose_name_plural: "orders",
    },
    Entity {
        name: "OrderItem",
        table: "order_items",
        verbose_name: "order item",
        verbose_name_plural: "order items",
    },
    Entity {
        name: "Cart",
        table: "carts",
        verbose_name: "cart",
        verbose_name_plural: "carts",
    },
    Entity {
        name: "CartItem",
        table: "cart_items",
        verbose_name: "cart item",
        verbose_name_plural: "cart items",
    },
];

/// Every foreign key in the schema.
pub const RELATIONS: &[Relation] = &[
    Relation {
        constraint: "collections_featured_product_id_fkey",
        table: "collections",
        column: "featured_product_id",
        references: "products",
        nullable: true,
        unique: false,
        on_delete: OnDelete::SetNull,
    },
    Relation {
        constraint: "products_collection_id_fkey",
        table: "products",
        column: "collection_id",
        references: "collections",
        nullable: false,
        unique: false,
        on_delete: OnDelete::Protect,
    },
    Relation {
        constraint: "product_promotions_product_id_fkey",
        table: "product_promotions",
        column: "product_id",
        references: "products",
        nullable: false,
        unique: false,
        on_delete: OnDelete::Cascade,
    },
    Relation {
        constraint: "product_promotions_promotion_id_fkey",
        table: "product_promotions",
        column: "promotion_id",
        references: "promotions",
        nullable: false,
        unique: false,
        on_delete: OnDelete::Cascade,
    },
    Relation {
        constraint: "addresses_customer_id_fkey",
        table: "addresses",
        column: "customer_id",
        references: "customers",
        nullable: false,
        unique: true,
        on_delete: OnDelete::Cascade,
    },
    Relation {
        constraint: "orders_customer_id_fkey",
        table: "orders",
        column: "customer_id",
        references: "customers",
        nullable: false,
        unique: false,
        on_delete: OnDelete::Protect,
    },
    Relation {
        constraint: "order_items_order_id_fkey",
        table: "order_items",
        column: "order_id",
        references: "orders",
        nullable: false,
        unique: false,
        on_delete: OnDelete::Protect,
    },
    Relation {
        constraint: "order_items_product_id_fkey",
        table: "order_items",
        column: "product_id",
        references: "products",
        nullable: false,
        unique: false,
        on_delete: OnDelete::Protect,
    },
    Relation {
        constraint: "carts_customer_id_fkey",
        table: "carts",
        column: "customer_id",
        references: "customers",
        nullable: false,
        unique: true,
        on_delete: OnDelete::Cascade,
    },
    Relation {
        constraint: "cart_items_cart_id_fkey",
        table: "cart_items",
        column: "cart_id",
        references: "carts",
        nullable: false,
        unique: false,
        on_delete: OnDelete::Cascade,
    },
    Relation {
        constraint: "cart_items_product_id_fkey",
        table: "cart_items",
        column: "product_id",
        references: "products",
        nullable: false,
        unique: false,
        on_delete: OnDelete::Cascade,
    },
];

/// Look up an entity by its table name.
#[must_use]
pub fn entity(table: &str) -> Option<&'static Entity> {
    ENTITIES.iter().find(|e| e.table == table)
}

/// Foreign keys declared on `table`.
pub fn relations_from(table: &str) -> impl Iterator<Item = &'static Relation> + '_ {
    RELATIONS.iter().filter(move |r| r.table == table)
}

/// Foreign keys pointing at `table`.
pub fn relations_to(table: &str) -> impl Iterator<Item = &'static Relation> + '_ {
    RELATIONS.iter().filter(move |r| r.references == table)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_relations_reference_known_tables() {
        for relation in RELATIONS {
            assert!(entity(relation.table).is_some(), "{relation}");
            assert!(entity(relation.references).is_some(), "{relation}");
        }
    }

    #[test]
    fn test_constraint_names_are_unique() {
        let names: HashSet<_> = RELATIONS.iter().map(|r| r.constraint).collect();
        assert_eq!(names.len(), RELATIONS.len());
    }

    #[test]
    fn test_set_null_requires_nullable_column() {
        for relation in RELATIONS {
            if relation.on_delete == OnDelete::SetNull {
                assert!(relation.nullable, "{relation}");
            }
        }
    }

    #[test]
    fn test_customer_deletion_policies() {
        let mut policies: Vec<_> = relations_to("customers")
            .map(|r| (r.table, r.on_delete))
            .collect();
        policies.sort_by_key(|(table, _)| *table);
        assert_eq!(
            policies,
            vec![
                ("addresses", OnDelete::Cascade),
                ("carts", OnDelete::Cascade),
                ("orders", OnDelete::Protect),
            ]
        );
    }

    #[test]
    fn test_one_per_customer_links_are_unique() {
        for table in ["carts", "addresses"] {
            let relation = relations_from(table)
                .find(|r| r.references == "customers")
                .map(|r| r.unique);
            assert_eq!(relation, Some(true), "{table}");
        }
    }

    #[test]
    fn test_product_children() {
        let protect: Vec<_> = relations_to("products")
            .filter(|r| r.on_delete == OnDelete::Protect)
            .map(|r| r.table)
            .collect();
        assert_eq!(protect, vec!["order_items"]);
    }

    #[test]
    fn test_display() {
        let relation = relations_from("carts").next().map(ToString::to_string);
        assert_eq!(
            relation.as_deref(),
            Some("carts.customer_id -> customers (one-to-one, on delete cascade)")
        );
        assert_eq!(OnDelete::SetNull.sql(), "SET NULL");
    }

    #[test]
    fn test_qualified_table() {
        assert_eq!(
            entity("order_items").map(Entity::qualified_table).as_deref(),
            Some("store.order_items")
        );
    }
}
