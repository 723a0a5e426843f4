//! Product CRUD statements.
//!
//! These run on the connection of the caller's open transaction and never
//! commit or roll back themselves.

use sqlx::AnyConnection;

use crate::{models::Product, DbError};

const INSERT_SQL: &str =
    "INSERT INTO Product (ProductID, ProductName, Price, Quantity) VALUES (?, ?, ?, ?)";

const SELECT_ALL_SQL: &str = r#"
    SELECT ProductID AS id,
           ProductName AS name,
           CAST(Price AS DOUBLE) AS price,
           Quantity AS quantity
    FROM Product
    ORDER BY ProductID
"#;

// Key is the last placeholder.
const UPDATE_SQL: &str =
    "UPDATE Product SET ProductName = ?, Price = ?, Quantity = ? WHERE ProductID = ?";

const DELETE_SQL: &str = "DELETE FROM Product WHERE ProductID = ?";

/// Insert a product with its caller-chosen identifier.
///
/// Returns the number of rows inserted. A duplicate identifier is not checked
/// up front; it comes back as the store's constraint error.
pub async fn insert_product(conn: &mut AnyConnection, product: &Product) -> Result<u64, DbError> {
    let result = sqlx::query(INSERT_SQL)
        .bind(product.id)
        .bind(product.name.as_str())
        .bind(product.price)
        .bind(product.quantity)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

/// Return every product ordered by identifier. Each call re-queries the store.
pub async fn list_products(conn: &mut AnyConnection) -> Result<Vec<Product>, DbError> {
    let rows = sqlx::query_as::<_, Product>(SELECT_ALL_SQL)
        .fetch_all(conn)
        .await?;

    Ok(rows)
}

/// Overwrite name, price and quantity of the product with `product.id`.
///
/// Returns the number of rows affected; `0` means no such product and is not
/// an error.
pub async fn update_product(conn: &mut AnyConnection, product: &Product) -> Result<u64, DbError> {
    let result = sqlx::query(UPDATE_SQL)
        .bind(product.name.as_str())
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

/// Delete the product with `id`. Returns the number of rows affected.
pub async fn delete_product(conn: &mut AnyConnection, id: i32) -> Result<u64, DbError> {
    let result = sqlx::query(DELETE_SQL).bind(id).execute(conn).await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::test_support::memory_pool;

    fn product(id: i32, name: &str, price: f64, quantity: i32) -> Product {
        Product { id, name: name.into(), price, quantity }
    }

    #[tokio::test]
    async fn insert_then_list_returns_the_row() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let inserted = insert_product(&mut conn, &product(1, "Widget", 9.99, 5))
            .await
            .unwrap();
        assert_eq!(inserted, 1);

        let rows = list_products(&mut conn).await.unwrap();
        assert_eq!(rows, vec![product(1, "Widget", 9.99, 5)]);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        for id in [3, 1, 2] {
            insert_product(&mut conn, &product(id, "p", 1.0, 1)).await.unwrap();
        }

        let ids: Vec<i32> = list_products(&mut conn)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn update_binds_key_last() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        insert_product(&mut conn, &product(1, "Widget", 9.99, 5)).await.unwrap();

        let updated = update_product(&mut conn, &product(1, "WidgetX", 10.00, 3))
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let rows = list_products(&mut conn).await.unwrap();
        assert_eq!(rows, vec![product(1, "WidgetX", 10.00, 3)]);
    }

    #[tokio::test]
    async fn update_of_missing_key_affects_nothing() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        insert_product(&mut conn, &product(1, "Widget", 9.99, 5)).await.unwrap();

        let updated = update_product(&mut conn, &product(99, "Ghost", 1.0, 1))
            .await
            .unwrap();
        assert_eq!(updated, 0);
        assert_eq!(
            list_products(&mut conn).await.unwrap(),
            vec![product(1, "Widget", 9.99, 5)]
        );
    }

    #[tokio::test]
    async fn delete_of_missing_key_affects_nothing() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        insert_product(&mut conn, &product(1, "Widget", 9.99, 5)).await.unwrap();

        assert_eq!(delete_product(&mut conn, 99).await.unwrap(), 0);
        assert_eq!(list_products(&mut conn).await.unwrap().len(), 1);

        assert_eq!(delete_product(&mut conn, 1).await.unwrap(), 1);
        assert!(list_products(&mut conn).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_id_is_a_constraint_error() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        insert_product(&mut conn, &product(1, "Widget", 9.99, 5)).await.unwrap();

        let err = insert_product(&mut conn, &product(1, "Again", 1.0, 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Constraint);
    }

    #[tokio::test]
    async fn names_are_bound_not_interpolated() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let hostile = "x'); DROP TABLE Product; --";

        insert_product(&mut conn, &product(7, hostile, 0.5, 0)).await.unwrap();

        let rows = list_products(&mut conn).await.unwrap();
        assert_eq!(rows[0].name, hostile);
    }
}
