//! Read-only employee queries.

use crate::{models::Employee, DbError, DbPool};

/// Return every employee ordered by identifier.
pub async fn list_employees(pool: &DbPool) -> Result<Vec<Employee>, DbError> {
    let rows = sqlx::query_as::<_, Employee>(
        r#"
        SELECT EmpID AS id, Name AS name, CAST(Salary AS DOUBLE) AS salary
        FROM Employee
        ORDER BY EmpID
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::test_support::memory_pool;

    #[tokio::test]
    async fn empty_table_lists_nothing() {
        let pool = memory_pool().await;
        assert!(list_employees(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn salaries_come_back_as_decimals() {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO Employee (EmpID, Name, Salary) VALUES (?, ?, ?), (?, ?, ?)")
            .bind(2)
            .bind("Bea")
            .bind(52000.5)
            .bind(1)
            .bind("Al")
            .bind(48000)
            .execute(&pool)
            .await
            .unwrap();

        let rows = list_employees(&pool).await.unwrap();
        assert_eq!(
            rows,
            vec![
                Employee { id: 1, name: "Al".into(), salary: 48000.0 },
                Employee { id: 2, name: "Bea".into(), salary: 52000.5 },
            ]
        );
    }
}
