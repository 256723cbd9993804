use crate::db::db_error::DbResult;
use crate::db::entity::user::{Role, RoleCount, Users};
use sqlx::{PgExecutor, PgPool};

const USER_SELECT: &str = r#"
    SELECT u.id, u.full_name, u.email, u.password_hash, u.role_id, r.name AS role_name,
           u.tokens_valid_after, u.created_at, u.updated_at
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

/// Retrieves a role by its id.
///
/// # Returns
///
/// * `DbResult<Option<Role>>` - `None` when no role has the given id.
#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "roles")
)]
pub async fn get_role_by_id(pool: &PgPool, role_id: i64) -> DbResult<Option<Role>> {
    Ok(
        sqlx::query_as::<_, Role>("SELECT id, name, created_at FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_optional(pool)
            .await?,
    )
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "roles")
)]
pub async fn list_roles(pool: &PgPool) -> DbResult<Vec<Role>> {
    Ok(
        sqlx::query_as::<_, Role>("SELECT id, name, created_at FROM roles ORDER BY id")
            .fetch_all(pool)
            .await?,
    )
}

/// Creates a new user in the database.
///
/// This function inserts a new user record into the `users` table and returns the stored
/// record joined with its role name.
///
/// # Arguments
///
/// * `pool` - A reference to the PostgreSQL connection pool.
/// * `full_name` - The display name of the user.
/// * `email` - The login email, already normalized to lower case.
/// * `password_hash` - The Argon2id PHC string of the user's password.
/// * `role_id` - The role assigned to the user.
///
/// # Errors
///
/// This function will return a `DbError` if:
/// * The email is already registered (`UniqueViolation` on `users_email_key`).
/// * The role does not exist (`ForeignKeyViolation`).
/// * There is an issue executing the SQL query.
#[tracing::instrument(
    skip(pool, password_hash),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "users")
)]
pub async fn create_user(
    pool: &PgPool,
    full_name: &str,
    email: &str,
    password_hash: &str,
    role_id: i64,
) -> DbResult<Users> {
    let query = r#"
        WITH u AS (
            INSERT INTO users (full_name, email, password_hash, role_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
        )
        SELECT u.id, u.full_name, u.email, u.password_hash, u.role_id, r.name AS role_name,
               u.tokens_valid_after, u.created_at, u.updated_at
        FROM u JOIN roles r ON r.id = u.role_id
    "#;
    Ok(sqlx::query_as::<_, Users>(query)
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .bind(role_id)
        .fetch_one(pool)
        .await?)
}

/// Retrieves a user by id.
///
/// # Errors
///
/// Returns `DbError::NotFound` when the user does not exist.
#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "users")
)]
pub async fn get_user_by_id(pool: &PgPool, id: i64) -> DbResult<Users> {
    let query = format!("{USER_SELECT} WHERE u.id = $1");
    Ok(sqlx::query_as::<_, Users>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "users")
)]
pub async fn find_user_by_email(pool: &PgPool, email: &str) -> DbResult<Option<Users>> {
    let query = format!("{USER_SELECT} WHERE u.email = $1");
    Ok(sqlx::query_as::<_, Users>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await?)
}

/// Retrieves the user account linked to a student record by its canonical student id.
#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "users")
)]
pub async fn find_user_by_student_id(pool: &PgPool, student_id: &str) -> DbResult<Option<Users>> {
    let query = format!(
        "{USER_SELECT} JOIN students s ON s.user_id = u.id WHERE s.student_id = $1"
    );
    Ok(sqlx::query_as::<_, Users>(&query)
        .bind(student_id)
        .fetch_optional(pool)
        .await?)
}

/// Retrieves a page of users, newest first, optionally filtered by a search term and role.
///
/// The search term matches the full name or the email, case insensitive.
#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "users")
)]
pub async fn list_users(
    pool: &PgPool,
    search: Option<&str>,
    role_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<Users>> {
    let query = format!(
        r#"{USER_SELECT}
        WHERE ($1::TEXT IS NULL OR u.full_name ILIKE '%' || $1 || '%' OR u.email ILIKE '%' || $1 || '%')
          AND ($2::BIGINT IS NULL OR u.role_id = $2)
        ORDER BY u.created_at DESC, u.id DESC
        LIMIT $3 OFFSET $4"#
    );
    Ok(sqlx::query_as::<_, Users>(&query)
        .bind(search)
        .bind(role_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "users")
)]
pub async fn count_users(pool: &PgPool, search: Option<&str>, role_id: Option<i64>) -> DbResult<i64> {
    Ok(sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users u
        WHERE ($1::TEXT IS NULL OR u.full_name ILIKE '%' || $1 || '%' OR u.email ILIKE '%' || $1 || '%')
          AND ($2::BIGINT IS NULL OR u.role_id = $2)
        "#,
    )
    .bind(search)
    .bind(role_id)
    .fetch_one(pool)
    .await?)
}

/// Number of users per role, including roles without users.
#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "users")
)]
pub async fn count_users_by_role(pool: &PgPool) -> DbResult<Vec<RoleCount>> {
    Ok(sqlx::query_as::<_, RoleCount>(
        r#"
        SELECT r.id AS role_id, r.name AS role_name, COUNT(u.id) AS count
        FROM roles r
        LEFT JOIN users u ON u.role_id = r.id
        GROUP BY r.id, r.name
        ORDER BY r.id
        "#,
    )
    .fetch_all(pool)
    .await?)
}

/// Updates the provided fields of a user. `None` keeps the stored value.
///
/// # Errors
///
/// * `DbError::NotFound` if the user does not exist.
/// * `DbError::UniqueViolation` if the new email is taken.
#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "users")
)]
pub async fn update_user(
    pool: &PgPool,
    id: i64,
    full_name: Option<&str>,
    email: Option<&str>,
    role_id: Option<i64>,
) -> DbResult<Users> {
    let query = r#"
        WITH u AS (
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                role_id = COALESCE($4, role_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
        )
        SELECT u.id, u.full_name, u.email, u.password_hash, u.role_id, r.name AS role_name,
               u.tokens_valid_after, u.created_at, u.updated_at
        FROM u JOIN roles r ON r.id = u.role_id
    "#;
    Ok(sqlx::query_as::<_, Users>(query)
        .bind(id)
        .bind(full_name)
        .bind(email)
        .bind(role_id)
        .fetch_one(pool)
        .await?)
}

/// Stores a new password hash and invalidates refresh tokens issued before now.
#[tracing::instrument(
    skip(executor, password_hash),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "users")
)]
pub async fn update_password<'e, E>(executor: E, id: i64, password_hash: &str) -> DbResult<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE users SET password_hash = $2, tokens_valid_after = NOW(), updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(password_hash)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Marks every refresh token issued to the user until now as unusable.
#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "users")
)]
pub async fn invalidate_sessions(pool: &PgPool, id: i64) -> DbResult<()> {
    sqlx::query("UPDATE users SET tokens_valid_after = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Deletes a user. Returns the number of deleted rows (0 or 1).
#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = "users")
)]
pub async fn delete_user(pool: &PgPool, id: i64) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[tracing::instrument(
    skip(executor),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "users")
)]
pub async fn find_existing_user_ids<'e, E>(executor: E, ids: &[i64]) -> DbResult<Vec<i64>>
where
    E: PgExecutor<'e>,
{
    Ok(
        sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ANY($1) FOR UPDATE")
            .bind(ids)
            .fetch_all(executor)
            .await?,
    )
}

#[tracing::instrument(
    skip(executor),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = "users")
)]
pub async fn delete_users<'e, E>(executor: E, ids: &[i64]) -> DbResult<u64>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(ids)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
