//! Student CRUD statements.
//!
//! Student management runs in autocommit mode: each function is its own
//! statement on the pool and is durable as soon as it returns.

use crate::{models::Student, DbError, DbPool};

const SELECT_BY_ID_SQL: &str = r#"
    SELECT StudentID AS id, Name AS name, Department AS department, CAST(Marks AS DOUBLE) AS marks
    FROM Student
    WHERE StudentID = ?
"#;

const SELECT_ALL_SQL: &str = r#"
    SELECT StudentID AS id, Name AS name, Department AS department, CAST(Marks AS DOUBLE) AS marks
    FROM Student
    ORDER BY StudentID
"#;

/// Insert a new student. Returns `true` when a row was written.
pub async fn add_student(pool: &DbPool, student: &Student) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT INTO Student (StudentID, Name, Department, Marks) VALUES (?, ?, ?, ?)",
    )
    .bind(student.id)
    .bind(student.name.as_str())
    .bind(student.department.as_str())
    .bind(student.marks)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Fetch a single student by primary key.
pub async fn get_student(pool: &DbPool, id: i32) -> Result<Student, DbError> {
    let row = sqlx::query_as::<_, Student>(SELECT_BY_ID_SQL)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Return every student ordered by identifier.
pub async fn list_students(pool: &DbPool) -> Result<Vec<Student>, DbError> {
    let rows = sqlx::query_as::<_, Student>(SELECT_ALL_SQL)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Overwrite name, department and marks of `student.id`.
///
/// Returns `false` when no such student exists.
pub async fn update_student(pool: &DbPool, student: &Student) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE Student SET Name = ?, Department = ?, Marks = ? WHERE StudentID = ?",
    )
    .bind(student.name.as_str())
    .bind(student.department.as_str())
    .bind(student.marks)
    .bind(student.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Permanently delete a student.
///
/// Returns `DbError::NotFound` if no row was deleted.
pub async fn delete_student(pool: &DbPool, id: i32) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM Student WHERE StudentID = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
