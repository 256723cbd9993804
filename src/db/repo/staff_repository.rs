use crate::db::db_error::DbResult;
use crate::db::entity::staff::Staff;
use sqlx::PgPool;

const STAFF_COLUMNS: &str =
    "id, user_id, name, middle_name, surname, position, department, created_at, updated_at";

#[derive(Debug, Default)]
pub struct StaffFields<'a> {
    pub user_id: Option<i64>,
    pub name: Option<&'a str>,
    pub middle_name: Option<&'a str>,
    pub surname: Option<&'a str>,
    pub position: Option<&'a str>,
    pub department: Option<&'a str>,
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "staff")
)]
pub async fn create_staff(pool: &PgPool, values: &StaffFields<'_>) -> DbResult<Staff> {
    let query = format!(
        r#"
        INSERT INTO staff (user_id, name, middle_name, surname, position, department)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {STAFF_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, Staff>(&query)
        .bind(values.user_id)
        .bind(values.name)
        .bind(values.middle_name)
        .bind(values.surname)
        .bind(values.position)
        .bind(values.department)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "staff")
)]
pub async fn get_staff_by_id(pool: &PgPool, id: i64) -> DbResult<Staff> {
    let query = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = $1");
    Ok(sqlx::query_as::<_, Staff>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "staff")
)]
pub async fn list_staff(
    pool: &PgPool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> DbResult<(Vec<Staff>, i64)> {
    let filter = r#"($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%' OR surname ILIKE '%' || $1 || '%'
        OR department ILIKE '%' || $1 || '%')"#;
    let query = format!(
        "SELECT {STAFF_COLUMNS} FROM staff WHERE {filter} ORDER BY surname, name LIMIT $2 OFFSET $3"
    );
    let items = sqlx::query_as::<_, Staff>(&query)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    let count_query = format!("SELECT COUNT(*) FROM staff WHERE {filter}");
    let total = sqlx::query_scalar::<_, i64>(&count_query)
        .bind(search)
        .fetch_one(pool)
        .await?;
    Ok((items, total))
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "staff")
)]
pub async fn update_staff(pool: &PgPool, id: i64, values: &StaffFields<'_>) -> DbResult<Staff> {
    let query = format!(
        r#"
        UPDATE staff
        SET name = COALESCE($2, name),
            middle_name = COALESCE($3, middle_name),
            surname = COALESCE($4, surname),
            position = COALESCE($5, position),
            department = COALESCE($6, department),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {STAFF_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, Staff>(&query)
        .bind(id)
        .bind(values.name)
        .bind(values.middle_name)
        .bind(values.surname)
        .bind(values.position)
        .bind(values.department)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = "staff")
)]
pub async fn delete_staff(pool: &PgPool, id: i64) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM staff WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
