use crate::db::db_error::DbResult;
use crate::db::entity::company::Company;
use sqlx::PgPool;

const COMPANY_COLUMNS: &str =
    "id, name, address, province, phone_number, email, website, created_at, updated_at";

#[derive(Debug, Default)]
pub struct CompanyFields<'a> {
    pub name: Option<&'a str>,
    pub address: Option<&'a str>,
    pub province: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub email: Option<&'a str>,
    pub website: Option<&'a str>,
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "companies")
)]
pub async fn create_company(pool: &PgPool, values: &CompanyFields<'_>) -> DbResult<Company> {
    let query = format!(
        r#"
        INSERT INTO companies (name, address, province, phone_number, email, website)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COMPANY_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, Company>(&query)
        .bind(values.name)
        .bind(values.address)
        .bind(values.province)
        .bind(values.phone_number)
        .bind(values.email)
        .bind(values.website)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "companies")
)]
pub async fn get_company_by_id(pool: &PgPool, id: i64) -> DbResult<Company> {
    let query = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1");
    Ok(sqlx::query_as::<_, Company>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "companies")
)]
pub async fn list_companies(
    pool: &PgPool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> DbResult<(Vec<Company>, i64)> {
    let filter = "($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%' OR province ILIKE '%' || $1 || '%')";
    let query = format!(
        "SELECT {COMPANY_COLUMNS} FROM companies WHERE {filter} ORDER BY name LIMIT $2 OFFSET $3"
    );
    let items = sqlx::query_as::<_, Company>(&query)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    let count_query = format!("SELECT COUNT(*) FROM companies WHERE {filter}");
    let total = sqlx::query_scalar::<_, i64>(&count_query)
        .bind(search)
        .fetch_one(pool)
        .await?;
    Ok((items, total))
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "companies")
)]
pub async fn update_company(pool: &PgPool, id: i64, values: &CompanyFields<'_>) -> DbResult<Company> {
    let query = format!(
        r#"
        UPDATE companies
        SET name = COALESCE($2, name),
            address = COALESCE($3, address),
            province = COALESCE($4, province),
            phone_number = COALESCE($5, phone_number),
            email = COALESCE($6, email),
            website = COALESCE($7, website),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COMPANY_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, Company>(&query)
        .bind(id)
        .bind(values.name)
        .bind(values.address)
        .bind(values.province)
        .bind(values.phone_number)
        .bind(values.email)
        .bind(values.website)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = "companies")
)]
pub async fn delete_company(pool: &PgPool, id: i64) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
