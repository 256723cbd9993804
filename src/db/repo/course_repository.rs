use crate::db::db_error::DbResult;
use crate::db::entity::course::{Course, Curriculum};
use sqlx::PgPool;

const COURSE_COLUMNS: &str =
    "id, curriculum_id, code, name, credits, description, prerequisites, created_at, updated_at";

const COURSE_FILTER: &str = r#"
    ($1::TEXT IS NULL OR code ILIKE '%' || $1 || '%' OR name ILIKE '%' || $1 || '%')
    AND ($2::BIGINT IS NULL OR curriculum_id = $2)
"#;

#[derive(Debug, Default)]
pub struct CourseFields<'a> {
    pub curriculum_id: Option<i64>,
    pub code: Option<&'a str>,
    pub name: Option<&'a str>,
    pub credits: Option<i32>,
    pub description: Option<&'a str>,
    pub prerequisites: Option<&'a str>,
}

/// Creates a course.
///
/// # Errors
///
/// * `DbError::UniqueViolation` on `courses_code_key` when the code already exists.
/// * `DbError::ForeignKeyViolation` when the curriculum does not exist.
#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "courses")
)]
pub async fn create_course(pool: &PgPool, values: &CourseFields<'_>) -> DbResult<Course> {
    let query = format!(
        r#"
        INSERT INTO courses (curriculum_id, code, name, credits, description, prerequisites)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COURSE_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, Course>(&query)
        .bind(values.curriculum_id)
        .bind(values.code)
        .bind(values.name)
        .bind(values.credits)
        .bind(values.description)
        .bind(values.prerequisites)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "courses")
)]
pub async fn get_course_by_id(pool: &PgPool, id: i64) -> DbResult<Course> {
    let query = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");
    Ok(sqlx::query_as::<_, Course>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "courses")
)]
pub async fn course_exists(pool: &PgPool, id: i64) -> DbResult<bool> {
    Ok(
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM courses WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?,
    )
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "courses")
)]
pub async fn list_courses(
    pool: &PgPool,
    search: Option<&str>,
    curriculum_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<Course>> {
    let query = format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE {COURSE_FILTER} ORDER BY code LIMIT $3 OFFSET $4"
    );
    Ok(sqlx::query_as::<_, Course>(&query)
        .bind(search)
        .bind(curriculum_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "courses")
)]
pub async fn count_courses(
    pool: &PgPool,
    search: Option<&str>,
    curriculum_id: Option<i64>,
) -> DbResult<i64> {
    let query = format!("SELECT COUNT(*) FROM courses WHERE {COURSE_FILTER}");
    Ok(sqlx::query_scalar::<_, i64>(&query)
        .bind(search)
        .bind(curriculum_id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "courses")
)]
pub async fn update_course(pool: &PgPool, id: i64, values: &CourseFields<'_>) -> DbResult<Course> {
    let query = format!(
        r#"
        UPDATE courses
        SET curriculum_id = COALESCE($2, curriculum_id),
            code = COALESCE($3, code),
            name = COALESCE($4, name),
            credits = COALESCE($5, credits),
            description = COALESCE($6, description),
            prerequisites = COALESCE($7, prerequisites),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {COURSE_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, Course>(&query)
        .bind(id)
        .bind(values.curriculum_id)
        .bind(values.code)
        .bind(values.name)
        .bind(values.credits)
        .bind(values.description)
        .bind(values.prerequisites)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = "courses")
)]
pub async fn delete_course(pool: &PgPool, id: i64) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

const CURRICULUM_COLUMNS: &str = "id, code, name, description, created_at, updated_at";

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "curriculums")
)]
pub async fn create_curriculum(
    pool: &PgPool,
    code: &str,
    name: &str,
    description: Option<&str>,
) -> DbResult<Curriculum> {
    let query = format!(
        "INSERT INTO curriculums (code, name, description) VALUES ($1, $2, $3) RETURNING {CURRICULUM_COLUMNS}"
    );
    Ok(sqlx::query_as::<_, Curriculum>(&query)
        .bind(code)
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "curriculums")
)]
pub async fn get_curriculum_by_id(pool: &PgPool, id: i64) -> DbResult<Curriculum> {
    let query = format!("SELECT {CURRICULUM_COLUMNS} FROM curriculums WHERE id = $1");
    Ok(sqlx::query_as::<_, Curriculum>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "curriculums")
)]
pub async fn curriculum_exists(pool: &PgPool, id: i64) -> DbResult<bool> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM curriculums WHERE id = $1)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "curriculums")
)]
pub async fn list_curriculums(
    pool: &PgPool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> DbResult<(Vec<Curriculum>, i64)> {
    let filter = "($1::TEXT IS NULL OR code ILIKE '%' || $1 || '%' OR name ILIKE '%' || $1 || '%')";
    let query = format!(
        "SELECT {CURRICULUM_COLUMNS} FROM curriculums WHERE {filter} ORDER BY code LIMIT $2 OFFSET $3"
    );
    let items = sqlx::query_as::<_, Curriculum>(&query)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    let total = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM curriculums WHERE {filter}"))
        .bind(search)
        .fetch_one(pool)
        .await?;
    Ok((items, total))
}
