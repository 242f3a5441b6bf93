//! Checkpointed batch transactions.
//!
//! A [`BatchCheckpointer`] groups assembled pull requests into fixed-size
//! batches, each backed by its own database transaction. Committing at every
//! flush point bounds the work lost to an interruption to at most one
//! batch's worth of API calls. Batches are independent commit units; there
//! is deliberately no run-wide transaction.

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::store::StoreError;

/// A committed flush point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchFlush {
    /// Zero-based batch index within the scan.
    pub index: usize,
    /// Pull requests committed with this batch.
    pub pull_requests: usize,
}

/// Groups assembled pull requests into transactional batches.
pub struct BatchCheckpointer<'db> {
    db: &'db DatabaseConnection,
    batch_size: usize,
    txn: Option<DatabaseTransaction>,
    in_batch: usize,
    next_index: usize,
}

impl<'db> BatchCheckpointer<'db> {
    /// Create a checkpointer flushing every `batch_size` pull requests.
    pub fn new(db: &'db DatabaseConnection, batch_size: usize) -> Self {
        Self {
            db,
            batch_size: batch_size.max(1),
            txn: None,
            in_batch: 0,
            next_index: 0,
        }
    }

    /// The transaction backing the current batch, opened lazily.
    ///
    /// Item assembly runs against this connection (under a savepoint), so
    /// everything an item writes becomes durable together at the next flush.
    pub async fn unit(&mut self) -> Result<&DatabaseTransaction, StoreError> {
        if self.txn.is_none() {
            self.txn = Some(self.db.begin().await.map_err(StoreError::from)?);
        }
        // Just ensured above.
        Ok(self.txn.as_ref().expect("batch transaction was opened"))
    }

    /// Count one assembled pull request; commits and reports a flush when
    /// the batch is full.
    pub async fn record(&mut self) -> Result<Option<BatchFlush>, StoreError> {
        self.in_batch += 1;
        if self.in_batch >= self.batch_size {
            return Ok(Some(self.flush().await?));
        }
        Ok(None)
    }

    async fn flush(&mut self) -> Result<BatchFlush, StoreError> {
        if let Some(txn) = self.txn.take() {
            txn.commit().await.map_err(StoreError::from)?;
        }
        let flush = BatchFlush {
            index: self.next_index,
            pull_requests: self.in_batch,
        };
        self.next_index += 1;
        self.in_batch = 0;
        Ok(flush)
    }

    /// Commit the remainder. The final partial batch is always flushed, even
    /// when smaller than the batch size.
    pub async fn finish(mut self) -> Result<Option<BatchFlush>, StoreError> {
        if self.in_batch > 0 {
            return Ok(Some(self.flush().await?));
        }
        if let Some(txn) = self.txn.take() {
            // Nothing recorded since the last flush; the transaction holds
            // at most rolled-back savepoints.
            txn.commit().await.map_err(StoreError::from)?;
        }
        Ok(None)
    }

    /// Discard the in-flight batch. Used when the run aborts: previously
    /// flushed batches stay committed, the current one rolls back whole.
    pub async fn abort(mut self) -> Result<(), StoreError> {
        if let Some(txn) = self.txn.take() {
            txn.rollback().await.map_err(StoreError::from)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_and_migrate;
    use crate::entity::prelude::User;
    use crate::store::observations::UserObservation;
    use crate::store::resolve_or_create;
    use sea_orm::EntityTrait;

    fn observed_user(login: &str) -> UserObservation {
        UserObservation {
            login: login.to_string(),
            ..UserObservation::default()
        }
    }

    #[tokio::test]
    async fn flushes_every_n_and_the_remainder() {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db");
        let mut checkpointer = BatchCheckpointer::new(&db, 5);

        let mut flushes = Vec::new();
        for i in 0..12 {
            let unit = checkpointer.unit().await.expect("unit");
            resolve_or_create(unit, observed_user(&format!("user-{i}")))
                .await
                .expect("write");
            if let Some(flush) = checkpointer.record().await.expect("record") {
                flushes.push(flush);
            }
        }
        if let Some(flush) = checkpointer.finish().await.expect("finish") {
            flushes.push(flush);
        }

        let sizes: Vec<usize> = flushes.iter().map(|f| f.pull_requests).collect();
        assert_eq!(sizes, vec![5, 5, 2]);
        let indices: Vec<usize> = flushes.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let rows = User::find().all(&db).await.expect("query");
        assert_eq!(rows.len(), 12);
    }

    #[tokio::test]
    async fn abort_rolls_back_only_the_in_flight_batch() {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db");
        let mut checkpointer = BatchCheckpointer::new(&db, 2);

        for i in 0..3 {
            let unit = checkpointer.unit().await.expect("unit");
            resolve_or_create(unit, observed_user(&format!("user-{i}")))
                .await
                .expect("write");
            checkpointer.record().await.expect("record");
        }
        // One full batch committed (2 rows); the third row is in flight.
        checkpointer.abort().await.expect("abort");

        let rows = User::find().all(&db).await.expect("query");
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn finish_without_records_flushes_nothing() {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db");
        let checkpointer = BatchCheckpointer::new(&db, 5);
        let flush = checkpointer.finish().await.expect("finish");
        assert!(flush.is_none());
    }

    #[tokio::test]
    async fn batch_size_zero_is_clamped_to_one() {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db");
        let mut checkpointer = BatchCheckpointer::new(&db, 0);
        checkpointer.unit().await.expect("unit");
        let flush = checkpointer.record().await.expect("record");
        assert_eq!(
            flush,
            Some(BatchFlush {
                index: 0,
                pull_requests: 1
            })
        );
    }
}
