//! Analytics reads: sales aggregates and web vitals summaries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use dukkan_core::ProductId;

use super::RepositoryError;

/// Revenue and order count for one day. Cancelled orders are excluded.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailySales {
    pub day: NaiveDate,
    pub order_count: i64,
    pub revenue: Decimal,
}

/// A product ranked by units sold.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub units_sold: i64,
    pub revenue: Decimal,
}

/// Aggregate summary for one web vitals metric.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct VitalSummary {
    pub metric: String,
    pub sample_count: i64,
    pub avg_value: f64,
    pub p75: f64,
    pub good_share: f64,
}

/// Headline counts for the dashboard landing page.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DashboardCounts {
    pub pending_orders: i64,
    pub orders_today: i64,
    pub revenue_today: Decimal,
    pub customers: i64,
    pub visible_products: i64,
    pub unread_notifications: i64,
}

/// Repository for analytics reads.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Headline counts for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn dashboard_counts(&self) -> Result<DashboardCounts, RepositoryError> {
        let counts = sqlx::query_as::<_, DashboardCounts>(
            r"
            SELECT
                (SELECT COUNT(*) FROM orders WHERE status = 'pending') AS pending_orders,
                (SELECT COUNT(*) FROM orders
                 WHERE created_at >= date_trunc('day', now())
                   AND status <> 'cancelled') AS orders_today,
                (SELECT COALESCE(SUM(total), 0) FROM orders
                 WHERE created_at >= date_trunc('day', now())
                   AND status <> 'cancelled') AS revenue_today,
                (SELECT COUNT(*) FROM users) AS customers,
                (SELECT COUNT(*) FROM products WHERE is_visible) AS visible_products,
                (SELECT COUNT(*) FROM notifications WHERE NOT is_read) AS unread_notifications
            ",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(counts)
    }

    /// Per-day revenue and order counts since `since`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn daily_sales(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailySales>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailySales>(
            r"
            SELECT date_trunc('day', created_at)::date AS day,
                   COUNT(*) AS order_count,
                   COALESCE(SUM(total), 0) AS revenue
            FROM orders
            WHERE created_at >= $1 AND status <> 'cancelled'
            GROUP BY day
            ORDER BY day ASC
            ",
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Best-selling products since `since`, by units sold.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_products(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<TopProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, TopProduct>(
            r"
            SELECT oi.product_id,
                   oi.name,
                   SUM(oi.quantity)::bigint AS units_sold,
                   COALESCE(SUM(oi.unit_price * oi.quantity), 0) AS revenue
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE o.created_at >= $1 AND o.status <> 'cancelled'
            GROUP BY oi.product_id, oi.name
            ORDER BY units_sold DESC
            LIMIT $2
            ",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Per-metric sample count, average, p75, and good-rating share since
    /// `since`, optionally restricted to one route path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn vitals_summary(
        &self,
        since: DateTime<Utc>,
        path: Option<&str>,
    ) -> Result<Vec<VitalSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, VitalSummary>(
            r"
            SELECT metric,
                   COUNT(*) AS sample_count,
                   AVG(value)::float8 AS avg_value,
                   percentile_cont(0.75) WITHIN GROUP (ORDER BY value) AS p75,
                   AVG((rating = 'good')::int)::float8 AS good_share
            FROM web_vitals
            WHERE created_at >= $1
              AND ($2::text IS NULL OR path = $2)
            GROUP BY metric
            ORDER BY metric ASC
            ",
        )
        .bind(since)
        .bind(path)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
