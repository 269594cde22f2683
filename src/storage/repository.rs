use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{
    normalize_key, Account, BillingRunMarker, Cashier, CostCenter, PaymentRunMarker,
};

use super::MIGRATION_001_INITIAL;

/// Row counts of the reference tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceStats {
    pub cashiers: i64,
    pub accounts: i64,
    pub cost_centers: i64,
}

/// Repository for reference data (cashiers, accounts, cost centers) and the
/// append-only log of conversion runs.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to run on an already migrated database.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Reference data
    // ========================

    /// Store a cashier mapping. Codes are unique; an existing one is never replaced.
    pub async fn save_cashier(&self, cashier: &Cashier) -> Result<()> {
        sqlx::query("INSERT INTO cashiers (code, account_code) VALUES (?, ?)")
            .bind(cashier.code.trim())
            .bind(cashier.account_code.trim())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to save cashier {}", cashier.code))?;
        Ok(())
    }

    pub async fn find_cashier(&self, code: &str) -> Result<Option<Cashier>> {
        let row = sqlx::query("SELECT code, account_code FROM cashiers WHERE code = ?")
            .bind(code.trim())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch cashier")?;

        Ok(row.map(|row| Cashier {
            code: row.get("code"),
            account_code: row.get("account_code"),
        }))
    }

    /// Store an account under its normalized key.
    pub async fn save_account(&self, account: &Account) -> Result<()> {
        sqlx::query("INSERT INTO accounts (lookup_key, key, code, name) VALUES (?, ?, ?, ?)")
            .bind(normalize_key(&account.key))
            .bind(account.key.trim())
            .bind(account.code.trim())
            .bind(&account.name)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to save account {}", account.key))?;
        Ok(())
    }

    /// Find an account by item key or by code. A key match wins over a code match.
    pub async fn find_account(&self, key: &str) -> Result<Option<Account>> {
        let lookup_key = normalize_key(key);
        let row = sqlx::query(
            r#"
            SELECT key, code, name
            FROM accounts
            WHERE lookup_key = ? OR code = ?
            ORDER BY lookup_key = ? DESC
            LIMIT 1
            "#,
        )
        .bind(&lookup_key)
        .bind(key.trim())
        .bind(&lookup_key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        Ok(row.map(|row| Account {
            key: row.get("key"),
            code: row.get("code"),
            name: row.get("name"),
        }))
    }

    /// Store a cost center under its normalized name.
    pub async fn save_cost_center(&self, cost_center: &CostCenter) -> Result<()> {
        sqlx::query("INSERT INTO cost_centers (name_key, name, code) VALUES (?, ?, ?)")
            .bind(normalize_key(&cost_center.name))
            .bind(cost_center.name.trim())
            .bind(cost_center.code.trim())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to save cost center {}", cost_center.name))?;
        Ok(())
    }

    pub async fn find_cost_center(&self, name: &str) -> Result<Option<CostCenter>> {
        let row = sqlx::query("SELECT name, code FROM cost_centers WHERE name_key = ?")
            .bind(normalize_key(name))
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch cost center")?;

        Ok(row.map(|row| CostCenter {
            name: row.get("name"),
            code: row.get("code"),
        }))
    }

    pub async fn reference_stats(&self) -> Result<ReferenceStats> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM cashiers) as cashiers,
                (SELECT COUNT(*) FROM accounts) as accounts,
                (SELECT COUNT(*) FROM cost_centers) as cost_centers
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to count reference data")?;

        Ok(ReferenceStats {
            cashiers: row.get("cashiers"),
            accounts: row.get("accounts"),
            cost_centers: row.get("cost_centers"),
        })
    }

    // ========================
    // Run log
    // ========================

    pub async fn save_payment_run(&self, marker: &PaymentRunMarker) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payment_runs (id, consecutive, source_file, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(marker.id.to_string())
        .bind(marker.consecutive)
        .bind(&marker.source_file)
        .bind(marker.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save payment run")?;
        Ok(())
    }

    /// Most recently recorded payment run.
    pub async fn last_payment_run(&self) -> Result<Option<PaymentRunMarker>> {
        let row = sqlx::query(
            r#"
            SELECT id, consecutive, source_file, created_at
            FROM payment_runs
            ORDER BY seq DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch last payment run")?;

        row.as_ref().map(Self::row_to_payment_run).transpose()
    }

    /// Payment runs, oldest first.
    pub async fn list_payment_runs(&self) -> Result<Vec<PaymentRunMarker>> {
        let rows = sqlx::query(
            "SELECT id, consecutive, source_file, created_at FROM payment_runs ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list payment runs")?;

        rows.iter().map(Self::row_to_payment_run).collect()
    }

    pub async fn save_billing_run(&self, marker: &BillingRunMarker) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO billing_runs (id, source_file, base, debit, credit, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(marker.id.to_string())
        .bind(&marker.source_file)
        .bind(marker.base.to_string())
        .bind(marker.debit.to_string())
        .bind(marker.credit.to_string())
        .bind(marker.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save billing run")?;
        Ok(())
    }

    /// Billing runs, oldest first.
    pub async fn list_billing_runs(&self) -> Result<Vec<BillingRunMarker>> {
        let rows = sqlx::query(
            r#"
            SELECT id, source_file, base, debit, credit, created_at
            FROM billing_runs
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list billing runs")?;

        rows.iter().map(Self::row_to_billing_run).collect()
    }

    fn row_to_payment_run(row: &sqlx::sqlite::SqliteRow) -> Result<PaymentRunMarker> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(PaymentRunMarker {
            id: Uuid::parse_str(&id_str).context("Invalid payment run ID")?,
            consecutive: row.get("consecutive"),
            source_file: row.get("source_file"),
            created_at: parse_timestamp(&created_at_str)?,
        })
    }

    fn row_to_billing_run(row: &sqlx::sqlite::SqliteRow) -> Result<BillingRunMarker> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(BillingRunMarker {
            id: Uuid::parse_str(&id_str).context("Invalid billing run ID")?,
            source_file: row.get("source_file"),
            base: parse_decimal(row.get("base"))?,
            debit: parse_decimal(row.get("debit"))?,
            credit: parse_decimal(row.get("credit"))?,
            created_at: parse_timestamp(&created_at_str)?,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .context("Invalid created_at timestamp")?
        .with_timezone(&Utc))
}

fn parse_decimal(s: String) -> Result<Decimal> {
    Decimal::from_str(&s).with_context(|| format!("Invalid stored amount: {}", s))
}
