use crate::db::db_error::DbResult;
use crate::db::entity::visitor::{VisitorEvaluation, VisitorSchedule, VisitorTraining};
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::PgPool;

const TRAINING_COLUMNS: &str =
    "id, student_enroll_id, visitor_instructor_id, company_id, created_at, updated_at";
const SCHEDULE_COLUMNS: &str =
    "id, visitor_training_id, visit_no, visit_at, comment, created_at, updated_at";

// Trainings

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "visitor_trainings")
)]
pub async fn create_training(
    pool: &PgPool,
    student_enroll_id: i64,
    visitor_instructor_id: i64,
    company_id: Option<i64>,
) -> DbResult<VisitorTraining> {
    let query = format!(
        r#"
        INSERT INTO visitor_trainings (student_enroll_id, visitor_instructor_id, company_id)
        VALUES ($1, $2, $3)
        RETURNING {TRAINING_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, VisitorTraining>(&query)
        .bind(student_enroll_id)
        .bind(visitor_instructor_id)
        .bind(company_id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "visitor_trainings")
)]
pub async fn get_training_by_id(pool: &PgPool, id: i64) -> DbResult<VisitorTraining> {
    let query = format!("SELECT {TRAINING_COLUMNS} FROM visitor_trainings WHERE id = $1");
    Ok(sqlx::query_as::<_, VisitorTraining>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "visitor_trainings")
)]
pub async fn training_exists(pool: &PgPool, id: i64) -> DbResult<bool> {
    Ok(sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM visitor_trainings WHERE id = $1)",
    )
    .bind(id)
    .fetch_one(pool)
    .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "visitor_trainings")
)]
pub async fn list_trainings(
    pool: &PgPool,
    student_enroll_id: Option<i64>,
    visitor_instructor_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> DbResult<(Vec<VisitorTraining>, i64)> {
    let filter = r#"($1::BIGINT IS NULL OR student_enroll_id = $1)
        AND ($2::BIGINT IS NULL OR visitor_instructor_id = $2)"#;
    let query = format!(
        "SELECT {TRAINING_COLUMNS} FROM visitor_trainings WHERE {filter} ORDER BY id DESC LIMIT $3 OFFSET $4"
    );
    let items = sqlx::query_as::<_, VisitorTraining>(&query)
        .bind(student_enroll_id)
        .bind(visitor_instructor_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    let count_query = format!("SELECT COUNT(*) FROM visitor_trainings WHERE {filter}");
    let total = sqlx::query_scalar::<_, i64>(&count_query)
        .bind(student_enroll_id)
        .bind(visitor_instructor_id)
        .fetch_one(pool)
        .await?;
    Ok((items, total))
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "visitor_trainings")
)]
pub async fn update_training(
    pool: &PgPool,
    id: i64,
    visitor_instructor_id: Option<i64>,
    company_id: Option<i64>,
) -> DbResult<VisitorTraining> {
    let query = format!(
        r#"
        UPDATE visitor_trainings
        SET visitor_instructor_id = COALESCE($2, visitor_instructor_id),
            company_id = COALESCE($3, company_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {TRAINING_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, VisitorTraining>(&query)
        .bind(id)
        .bind(visitor_instructor_id)
        .bind(company_id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = "visitor_trainings")
)]
pub async fn delete_training(pool: &PgPool, id: i64) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM visitor_trainings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// Schedules

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = "visitor_schedules")
)]
pub async fn create_schedule(
    pool: &PgPool,
    visitor_training_id: i64,
    visit_no: i32,
    visit_at: Option<DateTime<Utc>>,
    comment: Option<&str>,
) -> DbResult<VisitorSchedule> {
    let query = format!(
        r#"
        INSERT INTO visitor_schedules (visitor_training_id, visit_no, visit_at, comment)
        VALUES ($1, $2, $3, $4)
        RETURNING {SCHEDULE_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, VisitorSchedule>(&query)
        .bind(visitor_training_id)
        .bind(visit_no)
        .bind(visit_at)
        .bind(comment)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "visitor_schedules")
)]
pub async fn get_schedule_by_id(pool: &PgPool, id: i64) -> DbResult<VisitorSchedule> {
    let query = format!("SELECT {SCHEDULE_COLUMNS} FROM visitor_schedules WHERE id = $1");
    Ok(sqlx::query_as::<_, VisitorSchedule>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = "visitor_schedules")
)]
pub async fn list_schedules(
    pool: &PgPool,
    visitor_training_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> DbResult<(Vec<VisitorSchedule>, i64)> {
    let query = format!(
        r#"SELECT {SCHEDULE_COLUMNS} FROM visitor_schedules
        WHERE ($1::BIGINT IS NULL OR visitor_training_id = $1)
        ORDER BY visitor_training_id, visit_no LIMIT $2 OFFSET $3"#
    );
    let items = sqlx::query_as::<_, VisitorSchedule>(&query)
        .bind(visitor_training_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM visitor_schedules WHERE ($1::BIGINT IS NULL OR visitor_training_id = $1)",
    )
    .bind(visitor_training_id)
    .fetch_one(pool)
    .await?;
    Ok((items, total))
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = "visitor_schedules")
)]
pub async fn update_schedule(
    pool: &PgPool,
    id: i64,
    visit_no: Option<i32>,
    visit_at: Option<DateTime<Utc>>,
    comment: Option<&str>,
) -> DbResult<VisitorSchedule> {
    let query = format!(
        r#"
        UPDATE visitor_schedules
        SET visit_no = COALESCE($2, visit_no),
            visit_at = COALESCE($3, visit_at),
            comment = COALESCE($4, comment),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {SCHEDULE_COLUMNS}
        "#
    );
    Ok(sqlx::query_as::<_, VisitorSchedule>(&query)
        .bind(id)
        .bind(visit_no)
        .bind(visit_at)
        .bind(comment)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = "visitor_schedules")
)]
pub async fn delete_schedule(pool: &PgPool, id: i64) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM visitor_schedules WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// Evaluations

/// Who is being evaluated. Each target is stored in its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationTarget {
    Student,
    Company,
}

impl EvaluationTarget {
    fn table(self) -> &'static str {
        match self {
            EvaluationTarget::Student => "visitor_evaluate_students",
            EvaluationTarget::Company => "visitor_evaluate_companies",
        }
    }

    fn columns(self) -> &'static str {
        match self {
            EvaluationTarget::Student => {
                "id, visitor_training_id, NULL::BIGINT AS company_id, score, questions, comment, created_at, updated_at"
            }
            EvaluationTarget::Company => {
                "id, visitor_training_id, company_id, score, questions, comment, created_at, updated_at"
            }
        }
    }
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "INSERT", db.table = target.table())
)]
pub async fn create_evaluation(
    pool: &PgPool,
    target: EvaluationTarget,
    visitor_training_id: i64,
    company_id: Option<i64>,
    score: i32,
    questions: Option<&serde_json::Value>,
    comment: Option<&str>,
) -> DbResult<VisitorEvaluation> {
    let (table, columns) = (target.table(), target.columns());
    let query = match target {
        EvaluationTarget::Student => format!(
            "INSERT INTO {table} (visitor_training_id, score, questions, comment) VALUES ($1, $2, $3, $4) RETURNING {columns}"
        ),
        EvaluationTarget::Company => format!(
            "INSERT INTO {table} (visitor_training_id, score, questions, comment, company_id) VALUES ($1, $2, $3, $4, $5) RETURNING {columns}"
        ),
    };
    let mut insert = sqlx::query_as::<_, VisitorEvaluation>(&query)
        .bind(visitor_training_id)
        .bind(score)
        .bind(questions)
        .bind(comment);
    if target == EvaluationTarget::Company {
        insert = insert.bind(company_id);
    }
    Ok(insert.fetch_one(pool).await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = target.table())
)]
pub async fn get_evaluation_by_id(
    pool: &PgPool,
    target: EvaluationTarget,
    id: i64,
) -> DbResult<VisitorEvaluation> {
    let query = format!(
        "SELECT {} FROM {} WHERE id = $1",
        target.columns(),
        target.table()
    );
    Ok(sqlx::query_as::<_, VisitorEvaluation>(&query)
        .bind(id)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "SELECT", db.table = target.table())
)]
pub async fn list_evaluations(
    pool: &PgPool,
    target: EvaluationTarget,
    visitor_training_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> DbResult<(Vec<VisitorEvaluation>, i64)> {
    let (table, columns) = (target.table(), target.columns());
    let filter = "($1::BIGINT IS NULL OR visitor_training_id = $1)";
    let query = format!(
        "SELECT {columns} FROM {table} WHERE {filter} ORDER BY id DESC LIMIT $2 OFFSET $3"
    );
    let items = sqlx::query_as::<_, VisitorEvaluation>(&query)
        .bind(visitor_training_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    let count_query = format!("SELECT COUNT(*) FROM {table} WHERE {filter}");
    let total = sqlx::query_scalar::<_, i64>(&count_query)
        .bind(visitor_training_id)
        .fetch_one(pool)
        .await?;
    Ok((items, total))
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "UPDATE", db.table = target.table())
)]
pub async fn update_evaluation(
    pool: &PgPool,
    target: EvaluationTarget,
    id: i64,
    score: Option<i32>,
    questions: Option<&serde_json::Value>,
    comment: Option<&str>,
) -> DbResult<VisitorEvaluation> {
    let query = format!(
        r#"
        UPDATE {}
        SET score = COALESCE($2, score),
            questions = COALESCE($3, questions),
            comment = COALESCE($4, comment),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        target.table(),
        target.columns()
    );
    Ok(sqlx::query_as::<_, VisitorEvaluation>(&query)
        .bind(id)
        .bind(score)
        .bind(questions)
        .bind(comment)
        .fetch_one(pool)
        .await?)
}

#[tracing::instrument(
    skip(pool),
    fields(db.system = "postgresql", db.operation = "DELETE", db.table = target.table())
)]
pub async fn delete_evaluation(pool: &PgPool, target: EvaluationTarget, id: i64) -> DbResult<u64> {
    let query = format!("DELETE FROM {} WHERE id = $1", target.table());
    let result = sqlx::query(&query).bind(id).execute(pool).await?;
    Ok(result.rows_affected())
}
