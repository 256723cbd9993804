use crate::db::db_error::DbResult;
use crate::db::entity::course::CourseSection;
use sqlx::{PgExecutor, PgPool};

const SECTION_COLUMNS: &str =
    "id, course_id, section, semester, year, max_students, schedule, created_at, updated_at";

const SECTION_FILTER: &str = r#"
    ($1::BIGINT IS NULL OR course_id = $1)
    AND ($2::INTEGER IS NULL OR semester = $2)
    AND ($3::INTEGER IS NULL OR year = $3)
"#;

#[derive(Debug, Default)]
pub struct SectionFields<'a> {
    pub course_id: Option<i64>,
    pub section: Option<&'a str>,
    pub semester: Option<i32>,
    pub year: Option<i32>,
    pub max_students: Option<i32>,
    pub schedule: Option<&'a str>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SectionFilter {
    pub course_id: Option<i64>,
    pub semester: Option<i32>,
    pub year: Option<i32>,
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "course_sections")
)]
pub async fn create_section(pool: &PgPool, values: &SectionFields<'_>) -> DbResult<CourseSection> {
    let query = format!(
        r#"
        INSERT INTO course_sections (course_id, section, semester, year, max_students, schedule)
        VALUES ($1, $2, $3, $4, COALESCE($5, 30), $6)
        RETURNING {SECTION_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, CourseSection>(&query)
        .bind(values.course_id)
        .bind(values.section)
        .bind(values.semester)
        .bind(values.year)
        .bind(values.max_students)
        .bind(values.schedule)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "course_sections")
)]
pub async fn get_section_by_id(pool: &PgPool, id: i64) -> DbResult<CourseSection> {
    let query = format!("SELECT {SECTION_COLUMNS} FROM course_sections WHERE id = $1");
    Ok(sqlx::query_as::<_, CourseSection>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?)
}

/// Reads a section and holds a row lock on it until the surrounding transaction ends.
#[tracing::instrument(
    skip(executor),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "course_sections")
)]
pub async fn lock_section_by_id<'e, E>(executor: E, id: i64) -> DbResult<CourseSection>
where
    E: PgExecutor<'e>,
{
    let query = format!("SELECT {SECTION_COLUMNS} FROM course_sections WHERE id = $1 FOR UPDATE");
    Ok(sqlx::query_as::<_, CourseSection>(&query)
        .bind(id)
        .fetch_one(executor)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "course_sections")
)]
pub async fn section_exists(pool: &PgPool, id: i64) -> DbResult<bool> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM course_sections WHERE id = $1)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "course_sections")
)]
pub async fn list_sections(
    pool: &PgPool,
    filter: SectionFilter,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<CourseSection>> {
    let query = format!(
        r#"SELECT {SECTION_COLUMNS} FROM course_sections WHERE {SECTION_FILTER}
        ORDER BY year DESC, semester DESC, course_id, section LIMIT $4 OFFSET $5"#
    );
    Ok(sqlx::query_as::<_, CourseSection>(&query)
        .bind(filter.course_id)
        .bind(filter.semester)
        .bind(filter.year)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "course_sections")
)]
pub async fn count_sections(pool: &PgPool, filter: SectionFilter) -> DbResult<i64> {
    let query = format!("SELECT COUNT(*) FROM course_sections WHERE {SECTION_FILTER}");
    Ok(sqlx::query_scalar::<_, i64>(&query)
        .bind(filter.course_id)
        .bind(filter.semester)
        .bind(filter.year)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "course_sections")
)]
pub async fn update_section(
    pool: &PgPool,
    id: i64,
    values: &SectionFields<'_>,
) -> DbResult<CourseSection> {
    let query = format!(
        r#"
        UPDATE course_sections
        SET course_id = COALESCE($2, course_id),
            section = COALESCE($3, section),
            semester = COALESCE($4, semester),
            year = COALESCE($5, year),
            max_students = COALESCE($6, max_students),
            schedule = COALESCE($7, schedule),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {SECTION_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, CourseSection>(&query)
        .bind(id)
        .bind(values.course_id)
        .bind(values.section)
        .bind(values.semester)
        .bind(values.year)
        .bind(values.max_students)
        .bind(values.schedule)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = "course_sections")
)]
pub async fn delete_section(pool: &PgPool, id: i64) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM course_sections WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Number of students currently holding a seat (status `enrolled`).
#[tracing::instrument(
    skip(executor),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "student_enrolls")
)]
pub async fn count_enrolled<'e, E>(executor: E, course_section_id: i64) -> DbResult<i64>
where
    E: PgExecutor<'e>,
{
    Ok(sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM student_enrolls WHERE course_section_id = $1 AND status = 'enrolled'",
    )
    .bind(course_section_id)
    .fetch_one(executor)
    .await?)
}
