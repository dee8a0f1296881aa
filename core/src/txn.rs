use crate::error::{ServiceError, ServiceResult};
use sea_orm::{DatabaseTransaction, TransactionError, TransactionTrait};
use std::future::Future;
use std::pin::Pin;

pub type TxnFuture<'c, T> = Pin<Box<dyn Future<Output = ServiceResult<T>> + Send + 'c>>;

/// Runs `callback` inside one database transaction.
///
/// The transaction is committed when the callback returns `Ok` and rolled
/// back otherwise. Errors raised by the callback come back unchanged; a
/// failure to begin or commit surfaces as [`ServiceError::Db`].
pub async fn transactional<C, F, T>(db: &C, callback: F) -> ServiceResult<T>
where
    C: TransactionTrait,
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxnFuture<'c, T> + Send,
    T: Send,
{
    db.transaction::<F, T, ServiceError>(callback)
        .await
        .map_err(|err| match err {
            TransactionError::Connection(e) => {
                tracing::error!(error = %e, "transaction aborted");
                ServiceError::Db(e)
            }
            TransactionError::Transaction(e) => {
                if let ServiceError::Db(db_err) = &e {
                    tracing::error!(error = %db_err, "transaction rolled back");
                }
                e
            }
        })
}
