//! Database row types shared by the SQLite and PostgreSQL adapters.
//!
//! Both backends store ids as UUIDs (BLOB in SQLite) and timestamps as
//! `DateTime<Utc>` (TEXT in SQLite), so one set of rows serves both.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use banking_types::{
    Account, AccountId, AccountStatus, AccountType, ApiKey, ApiKeyId, CustomerId, Money,
    RepoError,
};

/// Account row from database.
#[derive(FromRow)]
pub struct DbAccount {
    pub id: Uuid,
    pub customer_id: String,
    pub opened_at: DateTime<Utc>,
    pub account_type: String,
    pub balance: i64,
    pub status: String,
}

/// API key row from database.
#[derive(FromRow)]
pub struct DbApiKey {
    pub id: Uuid,
    pub name: String,
    pub key_hash: String,
    pub customer_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

fn corrupt(column: &str, err: impl std::fmt::Display) -> RepoError {
    RepoError::Database(format!("Invalid {} in database: {}", column, err))
}

impl DbAccount {
    /// Convert database row to domain Account.
    pub fn into_domain(self) -> Result<Account, RepoError> {
        let owner = CustomerId::new(self.customer_id).map_err(|e| corrupt("customer_id", e))?;
        let account_type: AccountType = self
            .account_type
            .parse()
            .map_err(|e| corrupt("account_type", e))?;
        let balance = Money::new(self.balance).map_err(|e| corrupt("balance", e))?;
        let status: AccountStatus = self.status.parse().map_err(|e| corrupt("status", e))?;

        Ok(Account::from_parts(
            AccountId::from_uuid(self.id),
            owner,
            self.opened_at,
            account_type,
            balance,
            status,
        ))
    }
}

impl DbApiKey {
    /// Convert database row to domain ApiKey.
    pub fn into_domain(self) -> Result<ApiKey, RepoError> {
        let customer_id =
            CustomerId::new(self.customer_id).map_err(|e| corrupt("customer_id", e))?;

        Ok(ApiKey {
            id: ApiKeyId::from_uuid(self.id),
            name: self.name,
            key_hash: self.key_hash,
            customer_id,
            is_active: self.is_active,
            created_at: self.created_at,
            last_used_at: self.last_used_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str, balance: i64) -> DbAccount {
        DbAccount {
            id: Uuid::new_v4(),
            customer_id: "2001".into(),
            opened_at: Utc::now(),
            account_type: "checking".into(),
            balance,
            status: status.into(),
        }
    }

    #[test]
    fn test_row_into_domain() {
        let account = row("BLOCKED", 420).into_domain().unwrap();
        assert_eq!(account.status, AccountStatus::Blocked);
        assert_eq!(account.balance.amount(), 420);
        assert_eq!(account.account_type, AccountType::Checking);
    }

    #[test]
    fn test_corrupt_rows_are_database_errors() {
        assert!(matches!(
            row("FROZEN", 0).into_domain(),
            Err(RepoError::Database(_))
        ));
        assert!(matches!(
            row("ACTIVE", -1).into_domain(),
            Err(RepoError::Database(_))
        ));
    }
}
