//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use banking_types::domain::ledger;
    use banking_types::{
        AccountId, AccountRepository, AccountStatus, ApiKeyStore, CustomerId, Money, NewAccount,
        RepoError,
    };

    use crate::SqliteRepo;
    use crate::security;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    fn customer(id: &str) -> CustomerId {
        CustomerId::new(id).unwrap()
    }

    fn money(amount: i64) -> Money {
        Money::new(amount).unwrap()
    }

    async fn open(repo: &SqliteRepo, owner: &str, amount: i64) -> banking_types::Account {
        let new = NewAccount::new(customer(owner), "saving", amount).unwrap();
        repo.save_new(new).await.unwrap()
    }

    #[tokio::test]
    async fn test_save_and_find_account() {
        let repo = setup_repo().await;

        let created = open(&repo, "2001", 10_000).await;
        let fetched = repo.find_by_id(created.id).await.unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.owner, customer("2001"));
        assert_eq!(fetched.balance.amount(), 10_000);
        assert_eq!(fetched.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn test_find_account_not_found() {
        let repo = setup_repo().await;

        let result = repo.find_by_id(AccountId::new()).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_for_owner_only_returns_own_accounts() {
        let repo = setup_repo().await;

        open(&repo, "alice", 100).await;
        open(&repo, "alice", 200).await;
        open(&repo, "bob", 300).await;

        let accounts = repo.list_for_owner(&customer("alice")).await.unwrap();

        assert_eq!(accounts.len(), 2);
        assert!(accounts.iter().all(|a| a.owner == customer("alice")));
        assert!(repo.list_for_owner(&customer("carol")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_compare_and_update_balance() {
        let repo = setup_repo().await;
        let account = open(&repo, "2001", 10_000).await;

        repo.compare_and_update_balance(account.id, money(10_000), money(15_000))
            .await
            .unwrap();

        let updated = repo.find_by_id(account.id).await.unwrap();
        assert_eq!(updated.balance.amount(), 15_000);
    }

    #[tokio::test]
    async fn test_compare_and_update_balance_stale_expected() {
        let repo = setup_repo().await;
        let account = open(&repo, "2001", 10_000).await;

        // Someone else moved the balance after our read.
        repo.compare_and_update_balance(account.id, money(10_000), money(7_000))
            .await
            .unwrap();

        let result = repo
            .compare_and_update_balance(account.id, money(10_000), money(12_000))
            .await;

        assert!(matches!(result, Err(RepoError::StaleWrite)));
        let current = repo.find_by_id(account.id).await.unwrap();
        assert_eq!(current.balance.amount(), 7_000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_withdrawals_never_lose_an_update() {
        let repo = std::sync::Arc::new(setup_repo().await);
        let id = open(&repo, "2001", 1_000).await.id;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    let current = repo.find_by_id(id).await.unwrap();
                    let next = ledger::apply(&current, -10).unwrap();
                    match repo
                        .compare_and_update_balance(id, current.balance, next)
                        .await
                    {
                        Ok(()) => break,
                        Err(RepoError::StaleWrite) => tokio::task::yield_now().await,
                        Err(other) => panic!("losing writer saw {other:?}"),
                    }
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let settled = repo.find_by_id(id).await.unwrap();
        assert_eq!(settled.balance.amount(), 800);
    }

    #[tokio::test]
    async fn test_compare_and_update_balance_rejects_inactive() {
        let repo = setup_repo().await;
        let account = open(&repo, "2001", 500).await;

        repo.compare_and_update_status(account.id, AccountStatus::Active, AccountStatus::Blocked)
            .await
            .unwrap();

        let result = repo
            .compare_and_update_balance(account.id, money(500), money(600))
            .await;

        assert!(matches!(result, Err(RepoError::StaleWrite)));
        assert_eq!(repo.find_by_id(account.id).await.unwrap().balance.amount(), 500);
    }

    #[tokio::test]
    async fn test_compare_and_update_balance_missing_account() {
        let repo = setup_repo().await;

        let result = repo
            .compare_and_update_balance(AccountId::new(), money(0), money(100))
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_compare_and_update_status() {
        let repo = setup_repo().await;
        let account = open(&repo, "2001", 0).await;

        repo.compare_and_update_status(account.id, AccountStatus::Active, AccountStatus::Blocked)
            .await
            .unwrap();
        assert_eq!(
            repo.find_by_id(account.id).await.unwrap().status,
            AccountStatus::Blocked
        );

        // Expected status no longer matches.
        let result = repo
            .compare_and_update_status(account.id, AccountStatus::Active, AccountStatus::Closed)
            .await;
        assert!(matches!(result, Err(RepoError::StaleWrite)));

        repo.compare_and_update_status(account.id, AccountStatus::Blocked, AccountStatus::Closed)
            .await
            .unwrap();
        assert_eq!(
            repo.find_by_id(account.id).await.unwrap().status,
            AccountStatus::Closed
        );
    }

    #[tokio::test]
    async fn test_close_with_funds_is_refused_by_storage() {
        let repo = setup_repo().await;
        let account = open(&repo, "2001", 250).await;

        let result = repo
            .compare_and_update_status(account.id, AccountStatus::Active, AccountStatus::Closed)
            .await;

        assert!(matches!(result, Err(RepoError::StaleWrite)));
        assert_eq!(
            repo.find_by_id(account.id).await.unwrap().status,
            AccountStatus::Active
        );
    }

    #[tokio::test]
    async fn test_api_key_lifecycle() {
        let repo = setup_repo().await;

        let (key, raw) = repo
            .create_api_key("mobile-app", &customer("2001"))
            .await
            .unwrap();
        assert!(raw.starts_with(security::API_KEY_PREFIX));
        assert_eq!(key.key_hash, security::hash_api_key(&raw));

        let verified = repo
            .verify_api_key_hash(&security::hash_api_key(&raw))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(verified.id, key.id);
        assert_eq!(verified.customer_id, customer("2001"));
        assert!(verified.last_used_at.is_some());

        assert_eq!(repo.list_api_keys().await.unwrap().len(), 1);

        assert!(repo.delete_api_key(key.id).await.unwrap());
        assert!(!repo.delete_api_key(key.id).await.unwrap());
        assert!(
            repo.verify_api_key_hash(&security::hash_api_key(&raw))
                .await
                .unwrap()
                .is_none()
        );
        assert!(repo.list_api_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_api_key_hash() {
        let repo = setup_repo().await;

        let result = repo
            .verify_api_key_hash(&security::hash_api_key("sk_nope"))
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
