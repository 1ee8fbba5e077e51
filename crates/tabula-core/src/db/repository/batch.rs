use crate::{
    db::store::TableWriter,
    error::Error,
    key::{EntityKey, is_blank},
    traits::TableEntity,
};

///
/// WriteOp
///

#[derive(Clone, Debug)]
pub enum WriteOp<E> {
    Insert(E),
    InsertOrReplace(E),
    Update(E),
    Delete(EntityKey),
}

impl<E: TableEntity> WriteOp<E> {
    fn key_parts(&self) -> (&str, &str) {
        match self {
            Self::Insert(entity) | Self::InsertOrReplace(entity) | Self::Update(entity) => {
                (entity.partition_key(), entity.row_key())
            }
            Self::Delete(key) => (key.partition_key(), key.row_key()),
        }
    }

    pub(crate) fn apply<W>(self, writer: &W, table: &str) -> Result<(), Error>
    where
        W: TableWriter<E> + ?Sized,
    {
        match self {
            Self::Insert(entity) => writer.insert(table, entity)?,
            Self::InsertOrReplace(entity) => writer.insert_or_replace(table, entity)?,
            Self::Update(entity) => writer.update(table, entity)?,
            Self::Delete(key) => writer.delete(table, &key)?,
        }

        Ok(())
    }
}

///
/// WriteBatch
///
/// Ordered change set recorded by the caller and dispatched by
/// `TableRepository::save_changes`.
///

#[derive(Clone, Debug)]
pub struct WriteBatch<E> {
    ops: Vec<WriteOp<E>>,
}

impl<E> Default for WriteBatch<E> {
    fn default() -> Self {
        Self { ops: Vec::new() }
    }
}

impl<E: TableEntity> WriteBatch<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: E) -> &mut Self {
        self.ops.push(WriteOp::Insert(entity));
        self
    }

    pub fn insert_or_replace(&mut self, entity: E) -> &mut Self {
        self.ops.push(WriteOp::InsertOrReplace(entity));
        self
    }

    pub fn update(&mut self, entity: E) -> &mut Self {
        self.ops.push(WriteOp::Update(entity));
        self
    }

    pub fn delete(&mut self, key: EntityKey) -> &mut Self {
        self.ops.push(WriteOp::Delete(key));
        self
    }

    #[must_use]
    pub fn ops(&self) -> &[WriteOp<E>] {
        &self.ops
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Every change must address a non-blank composite key.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        for op in &self.ops {
            let (partition_key, row_key) = op.key_parts();
            if is_blank(partition_key) {
                return Err(Error::invalid_argument(
                    "partition_key",
                    "must not be blank",
                ));
            }
            if is_blank(row_key) {
                return Err(Error::invalid_argument("row_key", "must not be blank"));
            }
        }

        Ok(())
    }

    pub(crate) fn into_ops(self) -> Vec<WriteOp<E>> {
        self.ops
    }
}

///
/// WriteBatchResponse
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WriteBatchResponse {
    applied: usize,
}

impl WriteBatchResponse {
    #[must_use]
    pub const fn new(applied: usize) -> Self {
        Self { applied }
    }

    /// Number of changes applied.
    #[must_use]
    pub const fn applied(&self) -> usize {
        self.applied
    }
}
