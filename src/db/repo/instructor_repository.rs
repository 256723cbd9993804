use crate::db::db_error::DbResult;
use crate::db::entity::instructor::{CourseInstructor, Instructor};
use sqlx::PgPool;

const INSTRUCTOR_COLUMNS: &str =
    "id, user_id, staff_id, name, middle_name, surname, faculty, program, created_at, updated_at";
const ASSIGNMENT_COLUMNS: &str = "id, instructor_id, course_section_id, role, created_at, updated_at";

const INSTRUCTOR_FILTER: &str = r#"
    ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%' OR surname ILIKE '%' || $1 || '%'
        OR staff_id ILIKE '%' || $1 || '%')
    AND ($2::TEXT IS NULL OR faculty = $2)
"#;

#[derive(Debug, Default)]
pub struct InstructorFields<'a> {
    pub user_id: Option<i64>,
    pub staff_id: Option<&'a str>,
    pub name: Option<&'a str>,
    pub middle_name: Option<&'a str>,
    pub surname: Option<&'a str>,
    pub faculty: Option<&'a str>,
    pub program: Option<&'a str>,
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "instructors")
)]
pub async fn create_instructor(
    pool: &PgPool,
    values: &InstructorFields<'_>,
) -> DbResult<Instructor> {
    let query = format!(
        r#"
        INSERT INTO instructors (user_id, staff_id, name, middle_name, surname, faculty, program)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {INSTRUCTOR_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, Instructor>(&query)
        .bind(values.user_id)
        .bind(values.staff_id)
        .bind(values.name)
        .bind(values.middle_name)
        .bind(values.surname)
        .bind(values.faculty)
        .bind(values.program)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "instructors")
)]
pub async fn get_instructor_by_id(pool: &PgPool, id: i64) -> DbResult<Instructor> {
    let query = format!("SELECT {INSTRUCTOR_COLUMNS} FROM instructors WHERE id = $1");
    Ok(sqlx::query_as::<_, Instructor>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "instructors")
)]
pub async fn instructor_exists(pool: &PgPool, id: i64) -> DbResult<bool> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM instructors WHERE id = $1)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "instructors")
)]
pub async fn list_instructors(
    pool: &PgPool,
    search: Option<&str>,
    faculty: Option<&str>,
    limit: i64,
    offset: i64,
) -> DbResult<(Vec<Instructor>, i64)> {
    let query = format!(
        "SELECT {INSTRUCTOR_COLUMNS} FROM instructors WHERE {INSTRUCTOR_FILTER} ORDER BY surname, name LIMIT $3 OFFSET $4"
    );
    let items = sqlx::query_as::<_, Instructor>(&query)
        .bind(search)
        .bind(faculty)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    let count_query = format!("SELECT COUNT(*) FROM instructors WHERE {INSTRUCTOR_FILTER}");
    let total = sqlx::query_scalar::<_, i64>(&count_query)
        .bind(search)
        .bind(faculty)
        .fetch_one(pool)
        .await?;
    Ok((items, total))
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "instructors")
)]
pub async fn update_instructor(
    pool: &PgPool,
    id: i64,
    values: &InstructorFields<'_>,
) -> DbResult<Instructor> {
    let query = format!(
        r#"
        UPDATE instructors
        SET staff_id = COALESCE($2, staff_id),
            name = COALESCE($3, name),
            middle_name = COALESCE($4, middle_name),
            surname = COALESCE($5, surname),
            faculty = COALESCE($6, faculty),
            program = COALESCE($7, program),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {INSTRUCTOR_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, Instructor>(&query)
        .bind(id)
        .bind(values.staff_id)
        .bind(values.name)
        .bind(values.middle_name)
        .bind(values.surname)
        .bind(values.faculty)
        .bind(values.program)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = "instructors")
)]
pub async fn delete_instructor(pool: &PgPool, id: i64) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM instructors WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "instructors")
)]
pub async fn count_instructors_by_faculty(pool: &PgPool) -> DbResult<Vec<(String, i64)>> {
    Ok(sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT COALESCE(faculty, 'unassigned') AS faculty, COUNT(*) AS count
        FROM instructors GROUP BY 1 ORDER BY 1
        "#,
    )
    .fetch_all(pool)
    .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "course_instructors")
)]
pub async fn create_assignment(
    pool: &PgPool,
    instructor_id: i64,
    course_section_id: i64,
    role: &str,
) -> DbResult<CourseInstructor> {
    let query = format!(
        r#"
        INSERT INTO course_instructors (instructor_id, course_section_id, role)
        VALUES ($1, $2, $3)
        RETURNING {ASSIGNMENT_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, CourseInstructor>(&query)
        .bind(instructor_id)
        .bind(course_section_id)
        .bind(role)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "course_instructors")
)]
pub async fn update_assignment(pool: &PgPool, id: i64, role: &str) -> DbResult<CourseInstructor> {
    let query = format!(
        "UPDATE course_instructors SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {ASSIGNMENT_COLUMNS}"
    );
    Ok(sqlx::query_as::<_, CourseInstructor>(&query)
        .bind(id)
        .bind(role)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = "course_instructors")
)]
pub async fn delete_assignment(pool: &PgPool, id: i64) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM course_instructors WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "course_instructors")
)]
pub async fn list_assignments_for_instructor(
    pool: &PgPool,
    instructor_id: i64,
) -> DbResult<Vec<CourseInstructor>> {
    let query = format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM course_instructors WHERE instructor_id = $1 ORDER BY created_at DESC"
    );
    Ok(sqlx::query_as::<_, CourseInstructor>(&query)
        .bind(instructor_id)
        .fetch_all(pool)
        .await?)
}
