//! Authorization guard for account operations.

use super::account::{Account, CustomerId};
use crate::error::AppError;

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The requesting customer does not own the account.
    NotOwner,
}

/// Outcome of an authorization check. Derived on every request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Granted,
    Denied(DenialReason),
}

impl AuthorizationDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AuthorizationDecision::Granted)
    }

    /// Turns a denial into an `Unauthorized` error.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            AuthorizationDecision::Granted => Ok(()),
            AuthorizationDecision::Denied(DenialReason::NotOwner) => Err(AppError::Unauthorized(
                "customer is not permitted to act on this account".into(),
            )),
        }
    }
}

/// Grants access only to the customer who owns the account.
pub fn authorize(requesting: &CustomerId, account: &Account) -> AuthorizationDecision {
    if &account.owner == requesting {
        AuthorizationDecision::Granted
    } else {
        AuthorizationDecision::Denied(DenialReason::NotOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, NewAccount};
    use crate::error::ErrorKind;

    fn account_owned_by(owner: &str) -> Account {
        NewAccount::new(CustomerId::new(owner).unwrap(), "checking", 100)
            .unwrap()
            .into_account(AccountId::new())
    }

    #[test]
    fn test_owner_is_granted() {
        let account = account_owned_by("C1");
        let decision = authorize(&CustomerId::new("C1").unwrap(), &account);
        assert!(decision.is_granted());
        assert!(decision.into_result().is_ok());
    }

    #[test]
    fn test_other_customer_is_denied() {
        let account = account_owned_by("C1");
        let decision = authorize(&CustomerId::new("C2").unwrap(), &account);
        assert_eq!(decision, AuthorizationDecision::Denied(DenialReason::NotOwner));

        let err = decision.into_result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_decision_is_stable_and_leaves_account_untouched() {
        let account = account_owned_by("C1");
        let before = account.clone();
        let requester = CustomerId::new("C2").unwrap();

        let first = authorize(&requester, &account);
        let second = authorize(&requester, &account);

        assert_eq!(first, second);
        assert_eq!(account, before);
    }
}
