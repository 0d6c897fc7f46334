//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;
use uuid::Uuid;

use banking_types::{
    Account, AccountId, AccountRepository, AccountStatus, ApiKey, ApiKeyId, ApiKeyStore,
    CustomerId, Money, NewAccount, RepoError,
};

use crate::security;
use crate::types::{DbAccount, DbApiKey};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema (idempotent).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        for ddl in [
            include_str!("../migrations/0001_create_accounts.sql"),
            include_str!("../migrations/0002_create_api_keys.sql"),
        ] {
            sqlx::raw_sql(ddl)
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Tells a failed conditional write on an existing row from a missing row.
    async fn stale_or_missing(&self, id: AccountId) -> RepoError {
        let exists: Result<Option<(i64,)>, _> =
            sqlx::query_as(r#"SELECT 1 FROM accounts WHERE id = ?"#)
                .bind(id.into_uuid())
                .fetch_optional(&self.pool)
                .await;

        match exists {
            Ok(Some(_)) => RepoError::StaleWrite,
            Ok(None) => RepoError::NotFound,
            Err(e) => RepoError::Database(e.to_string()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Account repository
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl AccountRepository for SqliteRepo {
    async fn find_by_id(&self, id: AccountId) -> Result<Account, RepoError> {
        let row: Option<DbAccount> = sqlx::query_as(
            r#"SELECT id, customer_id, opened_at, account_type, balance, status FROM accounts WHERE id = ?"#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn save_new(&self, account: NewAccount) -> Result<Account, RepoError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"INSERT INTO accounts (id, customer_id, opened_at, account_type, balance, status)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id)
        .bind(account.owner.as_str())
        .bind(account.opened_at)
        .bind(account.account_type.as_str())
        .bind(account.balance.amount())
        .bind(account.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(account.into_account(AccountId::from_uuid(id)))
    }

    async fn list_for_owner(&self, owner: &CustomerId) -> Result<Vec<Account>, RepoError> {
        let rows: Vec<DbAccount> = sqlx::query_as(
            r#"SELECT id, customer_id, opened_at, account_type, balance, status FROM accounts
               WHERE customer_id = ? ORDER BY opened_at DESC"#,
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbAccount::into_domain).collect()
    }

    async fn compare_and_update_balance(
        &self,
        id: AccountId,
        expected: Money,
        new_balance: Money,
    ) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE accounts SET balance = ?
               WHERE id = ? AND balance = ? AND status = 'ACTIVE'"#,
        )
        .bind(new_balance.amount())
        .bind(id.into_uuid())
        .bind(expected.amount())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(self.stale_or_missing(id).await);
        }
        Ok(())
    }

    async fn compare_and_update_status(
        &self,
        id: AccountId,
        expected: AccountStatus,
        new_status: AccountStatus,
    ) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE accounts SET status = ?1
               WHERE id = ?2 AND status = ?3 AND (?1 <> 'CLOSED' OR balance = 0)"#,
        )
        .bind(new_status.as_str())
        .bind(id.into_uuid())
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(self.stale_or_missing(id).await);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// API key store
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ApiKeyStore for SqliteRepo {
    async fn create_api_key(
        &self,
        name: &str,
        customer_id: &CustomerId,
    ) -> Result<(ApiKey, String), RepoError> {
        let raw_key = security::generate_api_key();
        let api_key = ApiKey::new(
            name.to_string(),
            security::hash_api_key(&raw_key),
            customer_id.clone(),
        );

        sqlx::query(
            r#"INSERT INTO api_keys (id, name, key_hash, customer_id, is_active, created_at)
               VALUES (?, ?, ?, ?, 1, ?)"#,
        )
        .bind(api_key.id.into_uuid())
        .bind(&api_key.name)
        .bind(&api_key.key_hash)
        .bind(api_key.customer_id.as_str())
        .bind(api_key.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok((api_key, raw_key))
    }

    async fn verify_api_key_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, RepoError> {
        let row: Option<DbApiKey> = sqlx::query_as(
            r#"SELECT id, name, key_hash, customer_id, is_active, created_at, last_used_at
               FROM api_keys WHERE key_hash = ? AND is_active = 1"#,
        )
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut api_key = row.into_domain()?;
        let now = Utc::now();

        sqlx::query(r#"UPDATE api_keys SET last_used_at = ? WHERE id = ?"#)
            .bind(now)
            .bind(api_key.id.into_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        api_key.last_used_at = Some(now);
        Ok(Some(api_key))
    }

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, RepoError> {
        let rows: Vec<DbApiKey> = sqlx::query_as(
            r#"SELECT id, name, key_hash, customer_id, is_active, created_at, last_used_at
               FROM api_keys WHERE is_active = 1 ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbApiKey::into_domain).collect()
    }

    async fn delete_api_key(&self, id: ApiKeyId) -> Result<bool, RepoError> {
        let result =
            sqlx::query(r#"UPDATE api_keys SET is_active = 0 WHERE id = ? AND is_active = 1"#)
                .bind(id.into_uuid())
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
