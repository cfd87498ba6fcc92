use anyhow::Result;

use super::schema::Database;
use super::types::{SubscribeError, Subscriber};

impl Database {
    // ========================================================================
    // Subscriber Operations
    // ========================================================================

    /// Insert a new subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`SubscribeError::AlreadySubscribed`] when the address is
    /// already stored, [`SubscribeError::Database`] for any other failure.
    pub async fn add_subscriber(&self, email: &str) -> Result<(), SubscribeError> {
        sqlx::query("INSERT INTO subscribers (email, subscribed_at) VALUES (?, ?)")
            .bind(email)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        tracing::info!("Subscriber added");
        Ok(())
    }

    /// Get all subscriber addresses, oldest subscription first.
    pub async fn subscriber_emails(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT email FROM subscribers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(email,)| email).collect())
    }

    /// Get full subscriber rows, oldest subscription first.
    pub async fn subscribers(&self) -> Result<Vec<Subscriber>> {
        let rows = sqlx::query_as::<_, Subscriber>(
            "SELECT id, email, subscribed_at FROM subscribers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
