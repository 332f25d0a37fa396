use ormbridge_contracts::{Column, DbColumn, DbForeignKey, DbIndex, ForeignKey, Index, Processor};

/// Processor for document stores. Collections expose no relational
/// metadata, so every result is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoProcessor;

impl MongoProcessor {
    /// Creates a processor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Processor for MongoProcessor {
    fn process_columns(&self, _columns: &[DbColumn]) -> Vec<Column> {
        Vec::new()
    }

    fn process_indexes(&self, _indexes: &[DbIndex]) -> Vec<Index> {
        Vec::new()
    }

    fn process_foreign_keys(&self, _foreign_keys: &[DbForeignKey]) -> Vec<ForeignKey> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_everything_to_empty() {
        let processor = MongoProcessor::new();

        assert!(processor
            .process_columns(&[DbColumn {
                name: "id".into(),
                ty: "objectId".into(),
                ..DbColumn::default()
            }])
            .is_empty());
        assert!(processor
            .process_indexes(&[DbIndex {
                name: "_id_".into(),
                columns: "_id".into(),
                unique: true,
                primary: true,
            }])
            .is_empty());
        assert!(processor.process_foreign_keys(&[DbForeignKey::default()]).is_empty());
    }
}
