use crate::db::db_error::DbResult;
use crate::db::entity::enrollment::StudentEnrollStatus;
use sqlx::PgPool;

const STATUS_COLUMNS: &str =
    "id, student_id, semester, year, status, gpa, credits, instructor_id, created_at, updated_at";

const STATUS_FILTER: &str = r#"
    ($1::BIGINT IS NULL OR student_id = $1)
    AND ($2::INTEGER IS NULL OR semester = $2)
    AND ($3::INTEGER IS NULL OR year = $3)
"#;

#[derive(Debug, Default)]
pub struct EnrollStatusFields<'a> {
    pub student_id: Option<i64>,
    pub semester: Option<i32>,
    pub year: Option<i32>,
    pub status: Option<&'a str>,
    pub gpa: Option<f64>,
    pub credits: Option<i32>,
    pub instructor_id: Option<i64>,
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "student_enroll_statuses")
)]
pub async fn create_status(
    pool: &PgPool,
    values: &EnrollStatusFields<'_>,
) -> DbResult<StudentEnrollStatus> {
    let query = format!(
        r#"
        INSERT INTO student_enroll_statuses (student_id, semester, year, status, gpa, credits, instructor_id)
        VALUES ($1, $2, $3, COALESCE($4, 'active'), $5, COALESCE($6, 0), $7)
        RETURNING {STATUS_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, StudentEnrollStatus>(&query)
        .bind(values.student_id)
        .bind(values.semester)
        .bind(values.year)
        .bind(values.status)
        .bind(values.gpa)
        .bind(values.credits)
        .bind(values.instructor_id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "student_enroll_statuses")
)]
pub async fn list_statuses(
    pool: &PgPool,
    student_id: Option<i64>,
    semester: Option<i32>,
    year: Option<i32>,
    limit: i64,
    offset: i64,
) -> DbResult<(Vec<StudentEnrollStatus>, i64)> {
    let query = format!(
        r#"SELECT {STATUS_COLUMNS} FROM student_enroll_statuses WHERE {STATUS_FILTER}
        ORDER BY year DESC, semester DESC, student_id LIMIT $4 OFFSET $5"#
    );
    let items = sqlx::query_as::<_, StudentEnrollStatus>(&query)
        .bind(student_id)
        .bind(semester)
        .bind(year)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    let count_query = format!("SELECT COUNT(*) FROM student_enroll_statuses WHERE {STATUS_FILTER}");
    let total = sqlx::query_scalar::<_, i64>(&count_query)
        .bind(student_id)
        .bind(semester)
        .bind(year)
        .fetch_one(pool)
        .await?;
    Ok((items, total))
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "student_enroll_statuses")
)]
pub async fn update_status(
    pool: &PgPool,
    id: i64,
    values: &EnrollStatusFields<'_>,
) -> DbResult<StudentEnrollStatus> {
    let query = format!(
        r#"
        UPDATE student_enroll_statuses
        SET status = COALESCE($2, status),
            gpa = COALESCE($3, gpa),
            credits = COALESCE($4, credits),
            instructor_id = COALESCE($5, instructor_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {STATUS_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, StudentEnrollStatus>(&query)
        .bind(id)
        .bind(values.status)
        .bind(values.gpa)
        .bind(values.credits)
        .bind(values.instructor_id)
        .fetch_one(pool)
        .await?)
}
