use crate::db::db_error::DbResult;
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

/// Records a token id as revoked.
///
/// # Returns
///
/// * `DbResult<bool>` - `true` if the token was revoked by this call, `false` if it already was.
#[tracing::instrument(
    skip(executor),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "revoked_tokens")
)]
pub async fn revoke_token<'e, E>(
    executor: E,
    jti: &str,
    user_id: i64,
    expires_at: DateTime<Utc>,
) -> DbResult<bool>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO revoked_tokens (jti, user_id, expires_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (jti) DO NOTHING
        "#,
    )
    .bind(jti)
    .bind(user_id)
    .bind(expires_at)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "revoked_tokens")
)]
pub async fn is_token_revoked(pool: &PgPool, jti: &str) -> DbResult<bool> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)",
    )
    .bind(jti)
    .fetch_one(pool)
    .await?)
}

/// Drops revocation records whose tokens have expired anyway.
#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = "revoked_tokens")
)]
pub async fn purge_expired_revocations(pool: &PgPool) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < NOW()")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
