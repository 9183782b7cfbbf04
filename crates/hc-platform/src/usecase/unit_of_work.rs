//! Unit of Work
//!
//! Atomic commit of entity changes, the domain event and the audit log
//! within a single SQLite transaction.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::{SqliteArguments, SqlitePool};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, error};

use super::domain_event::DomainEvent;
use super::error::UseCaseError;
use super::result::UseCaseResult;
use crate::audit::entity::{AuditLog, StoredEvent};

/// A bound statement ready to run inside the commit transaction.
pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Something the unit of work can insert or update.
///
/// `save` must be an upsert keyed on the primary key (`INSERT ... ON CONFLICT
/// DO UPDATE`), never `INSERT OR REPLACE`, which deletes the old row and
/// fires cascades.
///
/// A guarded `save` (`DO UPDATE ... WHERE`, `UPDATE ... WHERE status = ?`)
/// returns the failure to report from `unmatched` when the guard matches no
/// row; the whole transaction is then rolled back.
pub trait Aggregate: Send + Sync {
    fn aggregate_type(&self) -> &'static str;
    fn aggregate_id(&self) -> String;
    fn save(&self) -> SqliteQuery<'_>;

    fn unmatched(&self) -> Option<UseCaseError> {
        None
    }
}

/// Something the unit of work can hard-delete.
pub trait Detachable: Send + Sync {
    fn aggregate_type(&self) -> &'static str;
    fn aggregate_id(&self) -> String;
    fn remove(&self) -> SqliteQuery<'_>;
}

/// One row-level change inside a multi-change commit.
pub enum Change {
    Save(Box<dyn Aggregate>),
    Remove(Box<dyn Detachable>),
}

impl Change {
    pub fn save<A: Aggregate + 'static>(aggregate: A) -> Self {
        Change::Save(Box::new(aggregate))
    }

    pub fn remove<D: Detachable + 'static>(detachable: D) -> Self {
        Change::Remove(Box::new(detachable))
    }

    fn describe(&self) -> (&'static str, String) {
        match self {
            Change::Save(a) => (a.aggregate_type(), a.aggregate_id()),
            Change::Remove(d) => (d.aggregate_type(), d.aggregate_id()),
        }
    }

    fn statement(&self) -> SqliteQuery<'_> {
        match self {
            Change::Save(a) => a.save(),
            Change::Remove(d) => d.remove(),
        }
    }

    fn unmatched(&self) -> Option<UseCaseError> {
        match self {
            Change::Save(a) => a.unmatched(),
            Change::Remove(_) => None,
        }
    }
}

/// Unit of Work for atomic domain operations.
///
/// **This is the ONLY way to create a successful `UseCaseResult`.** Every
/// success therefore persisted its rows, its domain event and its audit
/// entry together.
///
/// ```ignore
/// let circle = Circle::child_of(&parent, &command.name);
/// let event = CircleCreated::new(&ctx, &circle);
/// self.unit_of_work.commit(&circle, event, &command).await
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Upsert one aggregate with its event.
    async fn commit<E, T, C>(&self, aggregate: &T, event: E, command: &C) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        T: Aggregate,
        C: Serialize + Send + Sync;

    /// Hard-delete one entity with its event.
    async fn commit_remove<E, T, C>(&self, entity: &T, event: E, command: &C) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        T: Detachable,
        C: Serialize + Send + Sync;

    /// Apply several changes in order, with one event.
    ///
    /// Used for organization bootstrap, invitation acceptance and the
    /// soft-delete cascades.
    async fn commit_all<E, C>(&self, changes: Vec<Change>, event: E, command: &C) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        C: Serialize + Send + Sync;
}

/// SQLite implementation of UnitOfWork.
#[derive(Clone)]
pub struct SqliteUnitOfWork {
    pool: SqlitePool,
}

impl SqliteUnitOfWork {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>, UseCaseError> {
        self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            UseCaseError::commit(format!("Failed to start transaction: {}", e))
        })
    }

    async fn apply(
        tx: &mut Transaction<'static, Sqlite>,
        entity_type: &str,
        entity_id: &str,
        statement: SqliteQuery<'_>,
        unmatched: Option<UseCaseError>,
    ) -> Result<(), UseCaseError> {
        let done = statement
            .execute(&mut **tx)
            .await
            .map_err(|e| write_failure(entity_type, entity_id, e))?;

        match unmatched {
            Some(err) if done.rows_affected() == 0 => {
                debug!(entity_type, entity_id, code = err.code(), "Guarded write matched no row");
                Err(err)
            }
            _ => Ok(()),
        }
    }

    /// Write event and audit rows, then commit.
    async fn finish<E, C>(
        &self,
        mut tx: Transaction<'static, Sqlite>,
        event: E,
        command: &C,
    ) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        C: Serialize + Send + Sync,
    {
        let stored = StoredEvent::from_domain_event(&event);
        if let Err(e) = stored.insert().execute(&mut *tx).await {
            error!("Failed to insert event: {}", e);
            let _ = tx.rollback().await;
            return UseCaseResult::failure(UseCaseError::commit(format!(
                "Failed to insert event: {}",
                e
            )));
        }

        let audit_log = AuditLog::from_command(&event, command);
        if let Err(e) = audit_log.insert().execute(&mut *tx).await {
            error!("Failed to insert audit log: {}", e);
            let _ = tx.rollback().await;
            return UseCaseResult::failure(UseCaseError::commit(format!(
                "Failed to insert audit log: {}",
                e
            )));
        }

        if let Err(e) = tx.commit().await {
            error!("Failed to commit transaction: {}", e);
            return UseCaseResult::failure(UseCaseError::commit(format!(
                "Failed to commit transaction: {}",
                e
            )));
        }

        debug!(
            event_id = event.event_id(),
            event_type = event.event_type(),
            "Successfully committed transaction"
        );

        UseCaseResult::success(event)
    }
}

/// Constraint violations are caller errors; everything else is a commit failure.
fn write_failure(entity_type: &str, entity_id: &str, err: sqlx::Error) -> UseCaseError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return UseCaseError::already_exists(
                "DUPLICATE_ENTITY",
                format!("{} '{}' conflicts with an existing record", entity_type, entity_id),
            );
        }
        if db_err.is_foreign_key_violation() {
            return UseCaseError::not_found(
                "REFERENCED_ENTITY_NOT_FOUND",
                format!("{} '{}' references a missing record", entity_type, entity_id),
            );
        }
    }

    error!(entity_type, entity_id, "Failed to persist change: {}", err);
    UseCaseError::commit(format!("Failed to persist {}: {}", entity_type, err))
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn commit<E, T, C>(&self, aggregate: &T, event: E, command: &C) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        T: Aggregate,
        C: Serialize + Send + Sync,
    {
        let mut tx = match self.begin().await {
            Ok(tx) => tx,
            Err(e) => return UseCaseResult::failure(e),
        };

        let id = aggregate.aggregate_id();
        if let Err(e) = Self::apply(
            &mut tx,
            aggregate.aggregate_type(),
            &id,
            aggregate.save(),
            aggregate.unmatched(),
        )
        .await {
            let _ = tx.rollback().await;
            return UseCaseResult::failure(e);
        }

        self.finish(tx, event, command).await
    }

    async fn commit_remove<E, T, C>(&self, entity: &T, event: E, command: &C) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        T: Detachable,
        C: Serialize + Send + Sync,
    {
        let mut tx = match self.begin().await {
            Ok(tx) => tx,
            Err(e) => return UseCaseResult::failure(e),
        };

        let id = entity.aggregate_id();
        if let Err(e) = Self::apply(&mut tx, entity.aggregate_type(), &id, entity.remove(), None).await {
            let _ = tx.rollback().await;
            return UseCaseResult::failure(e);
        }

        self.finish(tx, event, command).await
    }

    async fn commit_all<E, C>(&self, changes: Vec<Change>, event: E, command: &C) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        C: Serialize + Send + Sync,
    {
        let mut tx = match self.begin().await {
            Ok(tx) => tx,
            Err(e) => return UseCaseResult::failure(e),
        };

        for change in &changes {
            let (entity_type, id) = change.describe();
            if let Err(e) = Self::apply(&mut tx, entity_type, &id, change.statement(), change.unmatched()).await {
                let _ = tx.rollback().await;
                return UseCaseResult::failure(e);
            }
        }

        self.finish(tx, event, command).await
    }
}
