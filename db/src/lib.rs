pub mod models;
pub mod test_utils;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectOptions, ConnectionTrait, Database,
    DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, SqlErr, TransactionTrait,
};
use util::config::AppConfig;

/// Opens the process-lifetime connection to the target database.
///
/// The URL comes from `DATABASE_URL` or is composed from the `PG*`
/// environment variables (see `util::config`).
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let url = AppConfig::global().connection_url();
    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);
    Database::connect(options).await
}

/// Whether `err` is a unique-constraint violation, as classified by the
/// driver rather than by matching error message text.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Inserts `model` inside a savepoint on `conn`.
///
/// A unique-constraint conflict rolls back only this row and yields
/// `Ok(None)`, so the surrounding batch stays usable. Any other error is
/// propagated and aborts the batch.
pub async fn insert_or_skip<A, C>(
    conn: &C,
    model: A,
) -> Result<Option<<A::Entity as EntityTrait>::Model>, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let savepoint = conn.begin().await?;
    match model.insert(&savepoint).await {
        Ok(inserted) => {
            savepoint.commit().await?;
            Ok(Some(inserted))
        }
        Err(err) if is_unique_violation(&err) => {
            savepoint.rollback().await?;
            tracing::debug!("skipping row on unique-constraint conflict: {err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
