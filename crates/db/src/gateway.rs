//! Data store gateway: one connection, one manually managed transaction.
//!
//! Autocommit is effectively off: the first statement after connect (or after
//! a commit/rollback) opens a transaction that stays open until the caller
//! explicitly commits or rolls it back. A failed `COMMIT` leaves the
//! transaction marked open, so a following [`Gateway::rollback`] really
//! reaches the store.
//!
//! Transaction control goes through `raw_sql` (text protocol) rather than
//! `sqlx::Transaction`, which consumes itself on commit and would leave
//! nothing to roll back after a failed commit.

use sqlx::{AnyConnection, Connection};
use tracing::{debug, info, warn};

use crate::{DbConfig, DbError};

pub struct Gateway {
    conn: AnyConnection,
    in_transaction: bool,
}

impl Gateway {
    /// Open the single session connection described by `config`.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        sqlx::any::install_default_drivers();

        info!("Connecting to database at {}", config.redacted());
        let conn = AnyConnection::connect(config.url()).await?;
        Ok(Self {
            conn,
            in_transaction: false,
        })
    }

    /// The connection inside the open transaction, beginning one if none is
    /// open. Every CRUD statement of a session runs through here.
    pub async fn transaction(&mut self) -> Result<&mut AnyConnection, DbError> {
        if !self.in_transaction {
            debug!("beginning transaction");
            sqlx::raw_sql("BEGIN").execute(&mut self.conn).await?;
            self.in_transaction = true;
        }
        Ok(&mut self.conn)
    }

    /// Whether statements have run since the last commit or rollback.
    pub fn has_pending(&self) -> bool {
        self.in_transaction
    }

    /// Commit the open transaction. With nothing open this is a no-op.
    ///
    /// On failure the transaction stays marked open.
    pub async fn commit(&mut self) -> Result<(), DbError> {
        if self.in_transaction {
            sqlx::raw_sql("COMMIT").execute(&mut self.conn).await?;
            self.in_transaction = false;
            debug!("transaction committed");
        }
        Ok(())
    }

    /// Roll back everything since the last commit. With nothing open this is
    /// a no-op.
    ///
    /// The transaction is considered closed afterwards even if the store
    /// rejected the rollback. If the connection is still alive in that case
    /// (MySQL can refuse a `ROLLBACK` without dropping the link), the server
    /// may keep the old transaction open, and the `BEGIN` issued by the next
    /// [`Gateway::transaction`] implicitly commits whatever it held. Callers
    /// report a failed rollback; they cannot repair it.
    pub async fn rollback(&mut self) -> Result<(), DbError> {
        if self.in_transaction {
            self.in_transaction = false;
            sqlx::raw_sql("ROLLBACK").execute(&mut self.conn).await?;
            debug!("transaction rolled back");
        }
        Ok(())
    }

    /// Release the connection. Pending work is rolled back first.
    pub async fn close(mut self) {
        if let Err(e) = self.rollback().await {
            warn!("rollback during close failed: {e}");
        }
        match self.conn.close().await {
            Ok(()) => info!("Database connection closed"),
            Err(e) => warn!("closing the database connection failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use crate::pool::test_support::file_store;
    use crate::repository::products;

    fn widget(id: i32) -> Product {
        Product { id, name: "Widget".into(), price: 9.99, quantity: 5 }
    }

    async fn ids(gw: &mut Gateway) -> Vec<i32> {
        products::list_products(gw.transaction().await.unwrap())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect()
    }

    #[tokio::test]
    async fn statements_open_a_transaction_lazily() {
        let (_dir, config) = file_store().await;
        let mut gw = Gateway::connect(&config).await.unwrap();
        assert!(!gw.has_pending());

        products::insert_product(gw.transaction().await.unwrap(), &widget(1))
            .await
            .unwrap();
        assert!(gw.has_pending());

        gw.commit().await.unwrap();
        assert!(!gw.has_pending());
        gw.close().await;
    }

    #[tokio::test]
    async fn rollback_discards_only_uncommitted_work() {
        let (_dir, config) = file_store().await;
        let mut gw = Gateway::connect(&config).await.unwrap();

        products::insert_product(gw.transaction().await.unwrap(), &widget(1))
            .await
            .unwrap();
        gw.commit().await.unwrap();

        products::insert_product(gw.transaction().await.unwrap(), &widget(2))
            .await
            .unwrap();
        gw.rollback().await.unwrap();

        assert_eq!(ids(&mut gw).await, vec![1]);
        gw.close().await;
    }

    #[tokio::test]
    async fn close_rolls_back_pending_work() {
        let (_dir, config) = file_store().await;

        let mut gw = Gateway::connect(&config).await.unwrap();
        products::insert_product(gw.transaction().await.unwrap(), &widget(1))
            .await
            .unwrap();
        gw.close().await;

        let mut reopened = Gateway::connect(&config).await.unwrap();
        assert!(ids(&mut reopened).await.is_empty());
        reopened.close().await;
    }

    #[tokio::test]
    async fn committed_work_survives_reconnect() {
        let (_dir, config) = file_store().await;

        let mut gw = Gateway::connect(&config).await.unwrap();
        products::insert_product(gw.transaction().await.unwrap(), &widget(1))
            .await
            .unwrap();
        gw.commit().await.unwrap();
        gw.close().await;

        let mut reopened = Gateway::connect(&config).await.unwrap();
        assert_eq!(ids(&mut reopened).await, vec![1]);
        reopened.close().await;
    }

    #[tokio::test]
    async fn commit_and_rollback_without_pending_work_are_noops() {
        let (_dir, config) = file_store().await;
        let mut gw = Gateway::connect(&config).await.unwrap();
        gw.commit().await.unwrap();
        gw.rollback().await.unwrap();
        assert!(!gw.has_pending());
        gw.close().await;
    }

    #[tokio::test]
    async fn failed_commit_leaves_the_transaction_open_for_rollback() {
        let (_dir, config) = file_store().await;
        let mut gw = Gateway::connect(&config).await.unwrap();

        // A deferred foreign key is checked at COMMIT, not at INSERT.
        let conn = gw.transaction().await.unwrap();
        sqlx::raw_sql(
            "CREATE TABLE Parent (id INTEGER PRIMARY KEY);
             CREATE TABLE Child (
                 parent INT REFERENCES Parent (id) DEFERRABLE INITIALLY DEFERRED
             );",
        )
        .execute(&mut *conn)
        .await
        .unwrap();
        gw.commit().await.unwrap();

        products::insert_product(gw.transaction().await.unwrap(), &widget(1))
            .await
            .unwrap();
        sqlx::query("INSERT INTO Child (parent) VALUES (?)")
            .bind(99)
            .execute(gw.transaction().await.unwrap())
            .await
            .unwrap();

        let err = gw.commit().await.unwrap_err();
        assert!(err.is_store_failure());
        assert!(gw.has_pending());

        gw.rollback().await.unwrap();
        assert!(!gw.has_pending());
        assert!(ids(&mut gw).await.is_empty());
        gw.close().await;
    }
}
