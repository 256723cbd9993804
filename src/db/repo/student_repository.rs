use crate::db::db_error::DbResult;
use crate::db::entity::enrollment::StudentEnroll;
use crate::db::entity::student::Student;
use sqlx::{PgExecutor, PgPool};

const STUDENT_COLUMNS: &str = "id, user_id, student_id, name, middle_name, surname, gpax, phone_number, \
     email, major, program, faculty, campus, created_at, updated_at";

const ENROLL_COLUMNS: &str =
    "id, student_id, course_section_id, status, grade, grade_points, enrolled_at, updated_at";

/// Column values for inserting or updating a student. On update `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct StudentFields<'a> {
    pub user_id: Option<i64>,
    pub student_id: Option<&'a str>,
    pub name: Option<&'a str>,
    pub middle_name: Option<&'a str>,
    pub surname: Option<&'a str>,
    pub gpax: Option<f64>,
    pub phone_number: Option<&'a str>,
    pub email: Option<&'a str>,
    pub major: Option<&'a str>,
    pub program: Option<&'a str>,
    pub faculty: Option<&'a str>,
    pub campus: Option<&'a str>,
}

/// Filters for listing students.
#[derive(Debug, Default)]
pub struct StudentFilter<'a> {
    pub search: Option<&'a str>,
    pub major: Option<&'a str>,
    pub faculty: Option<&'a str>,
}

const STUDENT_FILTER: &str = r#"
    ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%' OR surname ILIKE '%' || $1 || '%'
        OR student_id ILIKE '%' || $1 || '%' OR email ILIKE '%' || $1 || '%')
    AND ($2::TEXT IS NULL OR major = $2)
    AND ($3::TEXT IS NULL OR faculty = $3)
"#;

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "students")
)]
pub async fn create_student(pool: &PgPool, values: &StudentFields<'_>) -> DbResult<Student> {
    let query = format!(
        r#"
        INSERT INTO students (user_id, student_id, name, middle_name, surname, gpax, phone_number,
                              email, major, program, faculty, campus)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {STUDENT_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, Student>(&query)
        .bind(values.user_id)
        .bind(values.student_id)
        .bind(values.name)
        .bind(values.middle_name)
        .bind(values.surname)
        .bind(values.gpax)
        .bind(values.phone_number)
        .bind(values.email)
        .bind(values.major)
        .bind(values.program)
        .bind(values.faculty)
        .bind(values.campus)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "students")
)]
pub async fn get_student_by_id(pool: &PgPool, id: i64) -> DbResult<Student> {
    let query = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1");
    Ok(sqlx::query_as::<_, Student>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "students")
)]
pub async fn list_students(
    pool: &PgPool,
    filter: &StudentFilter<'_>,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<Student>> {
    let query = format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE {STUDENT_FILTER} ORDER BY student_id LIMIT $4 OFFSET $5"
    );
    Ok(sqlx::query_as::<_, Student>(&query)
        .bind(filter.search)
        .bind(filter.major)
        .bind(filter.faculty)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "students")
)]
pub async fn count_students(pool: &PgPool, filter: &StudentFilter<'_>) -> DbResult<i64> {
    let query = format!("SELECT COUNT(*) FROM students WHERE {STUDENT_FILTER}");
    Ok(sqlx::query_scalar::<_, i64>(&query)
        .bind(filter.search)
        .bind(filter.major)
        .bind(filter.faculty)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "students")
)]
pub async fn update_student(pool: &PgPool, id: i64, values: &StudentFields<'_>) -> DbResult<Student> {
    let query = format!(
        r#"
        UPDATE students
        SET student_id = COALESCE($2, student_id),
            name = COALESCE($3, name),
            middle_name = COALESCE($4, middle_name),
            surname = COALESCE($5, surname),
            gpax = COALESCE($6, gpax),
            phone_number = COALESCE($7, phone_number),
            email = COALESCE($8, email),
            major = COALESCE($9, major),
            program = COALESCE($10, program),
            faculty = COALESCE($11, faculty),
            campus = COALESCE($12, campus),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {STUDENT_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, Student>(&query)
        .bind(id)
        .bind(values.student_id)
        .bind(values.name)
        .bind(values.middle_name)
        .bind(values.surname)
        .bind(values.gpax)
        .bind(values.phone_number)
        .bind(values.email)
        .bind(values.major)
        .bind(values.program)
        .bind(values.faculty)
        .bind(values.campus)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = "students")
)]
pub async fn delete_student(pool: &PgPool, id: i64) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM students WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Student counts grouped by major, `NULL` majors reported as "unassigned".
#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "students")
)]
pub async fn count_students_by_major(pool: &PgPool) -> DbResult<Vec<(String, i64)>> {
    Ok(sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT COALESCE(major, 'unassigned') AS major, COUNT(*) AS count
        FROM students GROUP BY 1 ORDER BY 1
        "#,
    )
    .fetch_all(pool)
    .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "students")
)]
pub async fn average_gpax(pool: &PgPool) -> DbResult<Option<f64>> {
    Ok(sqlx::query_scalar::<_, Option<f64>>("SELECT AVG(gpax) FROM students")
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(executor),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "student_enrolls")
)]
pub async fn create_enrollment<'e, E>(
    executor: E,
    student_id: i64,
    course_section_id: i64,
    status: &str,
) -> DbResult<StudentEnroll>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        r#"
        INSERT INTO student_enrolls (student_id, course_section_id, status)
        VALUES ($1, $2, $3)
        RETURNING {ENROLL_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, StudentEnroll>(&query)
        .bind(student_id)
        .bind(course_section_id)
        .bind(status)
        .fetch_one(executor)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "student_enrolls")
)]
pub async fn update_enrollment(
    pool: &PgPool,
    id: i64,
    status: Option<&str>,
    grade: Option<&str>,
    grade_points: Option<f64>,
) -> DbResult<StudentEnroll> {
    let query = format!(
        r#"
        UPDATE student_enrolls
        SET status = COALESCE($2, status),
            grade = COALESCE($3, grade),
            grade_points = COALESCE($4, grade_points),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {ENROLL_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, StudentEnroll>(&query)
        .bind(id)
        .bind(status)
        .bind(grade)
        .bind(grade_points)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "student_enrolls")
)]
pub async fn list_enrollments_for_student(
    pool: &PgPool,
    student_id: i64,
) -> DbResult<Vec<StudentEnroll>> {
    let query = format!(
        "SELECT {ENROLL_COLUMNS} FROM student_enrolls WHERE student_id = $1 ORDER BY enrolled_at DESC"
    );
    Ok(sqlx::query_as::<_, StudentEnroll>(&query)
        .bind(student_id)
        .fetch_all(pool)
        .await?)
}
