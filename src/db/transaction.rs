/*!
 * Transaction helper
 *
 * Every multi-step write runs through `run_in_transaction`, which owns the
 * begin/commit/rollback lifecycle so callers only thread `&DatabaseTransaction`
 * through their steps.
 */

use crate::errors::ServiceError;
use metrics::{counter, histogram};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;
use tracing::{debug, warn};

/// Type alias for boxed future used in transactions
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Execute `f` inside a single database transaction.
///
/// Commits when `f` returns `Ok`, rolls back when it returns `Err`. The
/// connection goes back to the pool on both paths. The error produced by `f`
/// is returned unchanged.
///
/// ```rust,ignore
/// let id = run_in_transaction(&db, "compra.crear", |txn| {
///     Box::pin(async move {
///         let id = CompraRepository::create(txn, header).await?;
///         Ok(id)
///     })
/// })
/// .await?;
/// ```
pub async fn run_in_transaction<F, T>(
    db: &DatabaseConnection,
    operation: &'static str,
    f: F,
) -> Result<T, ServiceError>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<T, ServiceError>> + Send,
    T: Send,
{
    let start = Instant::now();
    debug!(operation, "Starting database transaction");
    counter!("taller_db.transaction.started", 1, "operation" => operation);

    let result = db
        .transaction::<_, T, ServiceError>(f)
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
            TransactionError::Transaction(service_err) => service_err,
        });

    let elapsed = start.elapsed();
    histogram!("taller_db.transaction.duration", elapsed, "operation" => operation);

    match &result {
        Ok(_) => {
            counter!("taller_db.transaction.committed", 1, "operation" => operation);
            debug!(operation, ?elapsed, "Transaction committed");
        }
        Err(err) => {
            counter!("taller_db.transaction.rolled_back", 1, "operation" => operation);
            warn!(operation, ?elapsed, error = %err, "Transaction rolled back");
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection_with_config, run_migrations, DbConfig};
    use crate::entities::proveedor;
    use assert_matches::assert_matches;
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

    async fn memory_db() -> DatabaseConnection {
        let db = establish_connection_with_config(&DbConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            ..Default::default()
        })
        .await
        .unwrap();
        run_migrations(&db).await.unwrap();
        db
    }

    fn nuevo_proveedor(nombre: &str) -> proveedor::ActiveModel {
        proveedor::ActiveModel {
            nombre: Set(nombre.to_string()),
            nombre_empresa: Set(None),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn commits_on_success() {
        let db = memory_db().await;

        let id = run_in_transaction(&db, "test.commit", |txn| {
            Box::pin(async move {
                let model = nuevo_proveedor("Repuestos Norte")
                    .insert(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;
                Ok(model.id)
            })
        })
        .await
        .unwrap();

        let stored = proveedor::Entity::find_by_id(id).one(&db).await.unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn rolls_back_and_returns_the_original_error() {
        let db = memory_db().await;

        let result: Result<(), ServiceError> = run_in_transaction(&db, "test.rollback", |txn| {
            Box::pin(async move {
                nuevo_proveedor("Frenos del Sur")
                    .insert(txn)
                    .await
                    .map_err(ServiceError::DatabaseError)?;
                Err(ServiceError::NotFound("Repuesto con ID 99 no encontrado".into()))
            })
        })
        .await;

        assert_matches!(result, Err(ServiceError::NotFound(msg)) if msg.contains("99"));
        assert_eq!(proveedor::Entity::find().count(&db).await.unwrap(), 0);
    }
}
