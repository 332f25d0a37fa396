//! Normalisation of SQLite introspection rows.

use ormbridge_contracts::{Column, DbColumn, DbForeignKey, DbIndex, ForeignKey, Index, Processor};

/// Splits a `group_concat` list, dropping empty entries.
fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turns pragma rows into [`Column`], [`Index`] and [`ForeignKey`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteProcessor;

impl SqliteProcessor {
    /// Creates a processor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Processor for SqliteProcessor {
    // A lone `integer` primary key aliases the rowid and auto-increments.
    fn process_columns(&self, columns: &[DbColumn]) -> Vec<Column> {
        let primaries: Vec<&DbColumn> = columns.iter().filter(|c| c.primary).collect();
        let rowid_alias = match primaries.as_slice() {
            [only] if only.ty.eq_ignore_ascii_case("integer") => Some(only.name.as_str()),
            _ => None,
        };

        columns
            .iter()
            .map(|column| {
                let ty = column.ty.to_lowercase();
                let type_name = ty.split('(').next().unwrap_or_default().trim().to_string();
                Column {
                    name: column.name.clone(),
                    autoincrement: rowid_alias == Some(column.name.as_str()),
                    ty,
                    type_name,
                    nullable: column.nullable,
                    default: column.default.clone(),
                }
            })
            .collect()
    }

    // The synthetic `primary` row duplicates a real index when the key is
    // backed by one; it is dropped in that case.
    fn process_indexes(&self, indexes: &[DbIndex]) -> Vec<Index> {
        let primary_count = indexes.iter().filter(|index| index.primary).count();

        indexes
            .iter()
            .filter(|index| !(primary_count > 1 && index.name == "primary"))
            .map(|index| Index {
                name: index.name.to_lowercase(),
                columns: split_list(&index.columns),
                unique: index.unique,
                primary: index.primary,
            })
            .collect()
    }

    fn process_foreign_keys(&self, foreign_keys: &[DbForeignKey]) -> Vec<ForeignKey> {
        foreign_keys
            .iter()
            .map(|foreign_key| ForeignKey {
                name: foreign_key.name.clone(),
                columns: split_list(&foreign_key.columns),
                foreign_schema: foreign_key.foreign_schema.clone(),
                foreign_table: foreign_key.foreign_table.clone(),
                foreign_columns: split_list(&foreign_key.foreign_columns),
                on_update: foreign_key.on_update.to_lowercase(),
                on_delete: foreign_key.on_delete.to_lowercase(),
            })
            .collect()
    }
}
