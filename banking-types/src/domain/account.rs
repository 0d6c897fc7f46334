//! Account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Money;
use crate::dto::AccountView;
use crate::error::DomainError;

/// Unique identifier for an Account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Creates a new random AccountId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an AccountId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier of the customer owning an account.
///
/// Issued by the customer system; the banking core only requires it to be
/// a non-blank string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "2001")]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::ValidationError(
                "Customer id cannot be empty".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CustomerId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CustomerId::new(value)
    }
}

impl From<CustomerId> for String {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CustomerId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CustomerId::new(s)
    }
}

/// Category of an account, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Saving,
    Checking,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Saving => "saving",
            AccountType::Checking => "checking",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "saving" => Ok(AccountType::Saving),
            "checking" => Ok(AccountType::Checking),
            _ => Err(DomainError::UnknownAccountType(s.to_string())),
        }
    }
}

/// Lifecycle state of an account. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Blocked,
    Closed,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Blocked => "BLOCKED",
            AccountStatus::Closed => "CLOSED",
        }
    }

    /// Returns true if the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: AccountStatus) -> bool {
        use AccountStatus::*;
        matches!(
            (self, next),
            (Active, Blocked) | (Blocked, Active) | (Active, Closed) | (Blocked, Closed)
        )
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(AccountStatus::Active),
            "BLOCKED" => Ok(AccountStatus::Blocked),
            "CLOSED" => Ok(AccountStatus::Closed),
            _ => Err(DomainError::UnknownAccountStatus(s.to_string())),
        }
    }
}

/// An account that has been validated but not yet persisted.
///
/// The repository assigns the identity when saving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub owner: CustomerId,
    pub account_type: AccountType,
    pub balance: Money,
    pub status: AccountStatus,
    pub opened_at: DateTime<Utc>,
}

impl NewAccount {
    /// Creates an active account holding the opening amount.
    ///
    /// # Validation
    /// - `account_type` must be `saving` or `checking`
    /// - `opening_amount` cannot be negative
    pub fn new(
        owner: CustomerId,
        account_type: &str,
        opening_amount: i64,
    ) -> Result<Self, DomainError> {
        let account_type = account_type.parse()?;
        let balance = Money::new(opening_amount)?;

        Ok(Self {
            owner,
            account_type,
            balance,
            status: AccountStatus::Active,
            opened_at: Utc::now(),
        })
    }

    /// Attaches the identity assigned by storage.
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            owner: self.owner,
            opened_at: self.opened_at,
            account_type: self.account_type,
            balance: self.balance,
            status: self.status,
        }
    }
}

/// A persisted monetary account owned by one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner: CustomerId,
    pub opened_at: DateTime<Utc>,
    pub account_type: AccountType,
    /// Only ever changed through the ledger.
    pub balance: Money,
    pub status: AccountStatus,
}

impl Account {
    /// Creates an account with all fields specified (for database reconstruction).
    pub fn from_parts(
        id: AccountId,
        owner: CustomerId,
        opened_at: DateTime<Utc>,
        account_type: AccountType,
        balance: Money,
        status: AccountStatus,
    ) -> Self {
        Self {
            id,
            owner,
            opened_at,
            account_type,
            balance,
            status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Validates a lifecycle change against the current state.
    pub fn check_status_change(&self, next: AccountStatus) -> Result<(), DomainError> {
        if self.status == next {
            return Err(DomainError::ValidationError(format!(
                "account is already {}",
                next
            )));
        }
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        if next == AccountStatus::Closed && !self.balance.is_zero() {
            return Err(DomainError::NonZeroBalance(self.balance));
        }
        Ok(())
    }

    /// Projects the fields that are safe to hand to the account holder.
    pub fn to_view(&self) -> AccountView {
        AccountView {
            id: self.id,
            account_type: self.account_type,
            status: self.status,
            balance: self.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> CustomerId {
        CustomerId::new("2001").unwrap()
    }

    fn account_with(balance: i64, status: AccountStatus) -> Account {
        let mut account = NewAccount::new(owner(), "saving", balance)
            .unwrap()
            .into_account(AccountId::new());
        account.status = status;
        account
    }

    #[test]
    fn test_new_account_is_active_with_opening_amount() {
        let account = NewAccount::new(owner(), "checking", 10_000).unwrap();
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.balance.amount(), 10_000);
        assert_eq!(account.account_type, AccountType::Checking);
    }

    #[test]
    fn test_new_account_type_is_case_insensitive() {
        let account = NewAccount::new(owner(), "Saving", 0).unwrap();
        assert_eq!(account.account_type, AccountType::Saving);
    }

    #[test]
    fn test_negative_opening_amount_fails() {
        let result = NewAccount::new(owner(), "saving", -1);
        assert!(matches!(result, Err(DomainError::NegativeAmount)));
    }

    #[test]
    fn test_unknown_account_type_fails() {
        let result = NewAccount::new(owner(), "brokerage", 100);
        assert!(matches!(result, Err(DomainError::UnknownAccountType(_))));
    }

    #[test]
    fn test_blank_customer_id_fails() {
        assert!(CustomerId::new("   ").is_err());
    }

    #[test]
    fn test_view_hides_owner() {
        let account = account_with(100, AccountStatus::Active);
        let json = serde_json::to_value(account.to_view()).unwrap();
        assert_eq!(json["balance"], 100);
        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["account_type"], "saving");
        assert!(json.get("owner").is_none());
    }

    #[test]
    fn test_closed_is_terminal() {
        for next in [AccountStatus::Active, AccountStatus::Blocked] {
            let account = account_with(0, AccountStatus::Closed);
            assert!(matches!(
                account.check_status_change(next),
                Err(DomainError::InvalidStatusTransition { .. })
            ));
        }
    }

    #[test]
    fn test_close_requires_zero_balance() {
        let account = account_with(500, AccountStatus::Active);
        assert!(matches!(
            account.check_status_change(AccountStatus::Closed),
            Err(DomainError::NonZeroBalance(_))
        ));

        let empty = account_with(0, AccountStatus::Blocked);
        assert!(empty.check_status_change(AccountStatus::Closed).is_ok());
    }

    #[test]
    fn test_block_and_unblock() {
        let account = account_with(100, AccountStatus::Active);
        assert!(account.check_status_change(AccountStatus::Blocked).is_ok());

        let blocked = account_with(100, AccountStatus::Blocked);
        assert!(blocked.check_status_change(AccountStatus::Active).is_ok());
        assert!(matches!(
            blocked.check_status_change(AccountStatus::Blocked),
            Err(DomainError::ValidationError(_))
        ));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            AccountStatus::Active,
            AccountStatus::Blocked,
            AccountStatus::Closed,
        ] {
            assert_eq!(status.as_str().parse::<AccountStatus>().unwrap(), status);
        }
    }
}
