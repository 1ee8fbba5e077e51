use crate::key::EntityKey;

///
/// TableEntity
///
/// Any record addressable by a composite `(partition key, row key)` identity.
/// Payload fields are opaque to the pagination layer.
///

pub trait TableEntity: Clone {
    fn partition_key(&self) -> &str;

    fn row_key(&self) -> &str;

    /// Owned composite key for this entity.
    fn entity_key(&self) -> EntityKey {
        EntityKey::new(self.partition_key(), self.row_key())
    }
}
