//! Schema description command.

use storefront_core::schema::{ENTITIES, relations_from, relations_to};
use tracing::info;

/// Log every table with its outgoing and incoming foreign keys.
pub fn describe() {
    for entity in ENTITIES {
        info!(
            table = %entity.qualified_table(),
            name = entity.name,
            "{}",
            entity.verbose_name_plural
        );
        for relation in relations_from(entity.table) {
            info!("  references {relation}");
        }
        for relation in relations_to(entity.table) {
            info!("  referenced by {relation}");
        }
    }
}
