//! Accounts store.
//!
//! Same caching contract as the platforms store, optionally scoped to a
//! single platform: the in-memory list mirrors the backend ordered by name,
//! is patched after successful mutations, and is untouched on failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use vault_core::error::{Result, VaultError};
use vault_core::records::{Account, AccountChanges, AccountRepository, NewAccount};

/// Cached list of accounts plus create/update/delete operations.
pub struct AccountsStore {
    repository: Arc<dyn AccountRepository>,
    platform_id: Option<String>,
    accounts: RwLock<Vec<Account>>,
    loading: AtomicBool,
}

impl AccountsStore {
    /// Creates a store over all accounts, or over a single platform's
    /// accounts when `platform_id` is given.
    pub fn new(repository: Arc<dyn AccountRepository>, platform_id: Option<String>) -> Self {
        Self {
            repository,
            platform_id,
            accounts: RwLock::new(Vec::new()),
            loading: AtomicBool::new(true),
        }
    }

    /// Fetches the list from the backend, replacing the cache on success.
    pub async fn refetch(&self) -> Result<Vec<Account>> {
        let result = self.repository.list(self.platform_id.as_deref()).await;
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(rows) => {
                *self.accounts.write().await = rows.clone();
                Ok(rows)
            }
            Err(err) => {
                tracing::error!("[AccountsStore] Failed to fetch accounts: {}", err);
                Err(err.into())
            }
        }
    }

    /// Returns a snapshot of the cached list.
    pub async fn accounts(&self) -> Vec<Account> {
        self.accounts.read().await.clone()
    }

    /// Returns true until the first fetch has completed.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Creates an account and appends the stored row to the cached list.
    pub async fn create(&self, account: NewAccount) -> Result<Account> {
        let row = self
            .repository
            .insert(account)
            .await
            .map_err(VaultError::from)?;

        self.accounts.write().await.push(row.clone());
        Ok(row)
    }

    /// Applies a partial update and patches the cached row in place.
    pub async fn update(&self, id: &str, changes: AccountChanges) -> Result<Account> {
        let row = self
            .repository
            .update(id, changes)
            .await
            .map_err(VaultError::from)?;

        let mut accounts = self.accounts.write().await;
        if let Some(slot) = accounts.iter_mut().find(|a| a.id == id) {
            *slot = row.clone();
        }
        Ok(row)
    }

    /// Deletes an account and drops it from the cached list.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await.map_err(VaultError::from)?;

        self.accounts.write().await.retain(|a| a.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::account_row;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    struct MockAccountRepository {
        rows: StdMutex<Vec<Account>>,
        fail_next: StdMutex<bool>,
    }

    impl MockAccountRepository {
        fn new(rows: Vec<Account>) -> Arc<Self> {
            Arc::new(Self {
                rows: StdMutex::new(rows),
                fail_next: StdMutex::new(false),
            })
        }

        fn fail_next(&self) {
            *self.fail_next.lock().unwrap() = true;
        }

        fn check_failure(&self) -> anyhow::Result<()> {
            if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
                return Err(anyhow!("row level security violation"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AccountRepository for MockAccountRepository {
        async fn list(&self, platform_id: Option<&str>) -> anyhow::Result<Vec<Account>> {
            self.check_failure()?;
            let mut rows: Vec<Account> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|a| platform_id.is_none_or(|p| a.platform_id == p))
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(rows)
        }

        async fn insert(&self, account: NewAccount) -> anyhow::Result<Account> {
            self.check_failure()?;
            let row = account_row(&account.name, &account.platform_id);
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn update(&self, id: &str, changes: AccountChanges) -> anyhow::Result<Account> {
            self.check_failure()?;
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| anyhow!("not found"))?;
            if let Some(name) = changes.name {
                row.name = name;
            }
            if let Some(password) = changes.password {
                row.password = password;
            }
            Ok(row.clone())
        }

        async fn delete(&self, id: &str) -> anyhow::Result<()> {
            self.check_failure()?;
            self.rows.lock().unwrap().retain(|a| a.id != id);
            Ok(())
        }
    }

    fn new_account(name: &str, platform_id: &str) -> NewAccount {
        NewAccount {
            platform_id: platform_id.to_string(),
            name: name.to_string(),
            email: format!("{name}@example.com"),
            username: name.to_string(),
            password: "secret".to_string(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_refetch_scopes_to_platform() {
        let repository = MockAccountRepository::new(vec![
            account_row("Work", "p1"),
            account_row("Personal", "p2"),
        ]);
        let store = AccountsStore::new(repository, Some("p1".to_string()));

        let rows = store.refetch().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Work");
    }

    #[tokio::test]
    async fn test_unscoped_refetch_orders_by_name() {
        let repository = MockAccountRepository::new(vec![
            account_row("Zeta", "p1"),
            account_row("Alpha", "p2"),
        ]);
        let store = AccountsStore::new(repository, None);

        let rows = store.refetch().await.unwrap();
        assert_eq!(rows[0].name, "Alpha");
        assert_eq!(rows[1].name, "Zeta");
    }

    #[tokio::test]
    async fn test_create_appends_server_row() {
        let repository = MockAccountRepository::new(vec![account_row("Work", "p1")]);
        let store = AccountsStore::new(repository, None);
        store.refetch().await.unwrap();
        let before = store.accounts().await;

        let created = store.create(new_account("Backup", "p1")).await.unwrap();

        let after = store.accounts().await;
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[..before.len()], before[..]);
        assert_eq!(after.last().unwrap(), &created);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_cache_identical() {
        let repository = MockAccountRepository::new(vec![account_row("Work", "p1")]);
        let store = AccountsStore::new(repository.clone(), None);
        store.refetch().await.unwrap();
        let before = store.accounts().await;

        repository.fail_next();
        assert!(store.create(new_account("Backup", "p1")).await.is_err());

        assert_eq!(store.accounts().await, before);
    }

    #[tokio::test]
    async fn test_update_and_delete_patch_cache() {
        let repository = MockAccountRepository::new(vec![
            account_row("Work", "p1"),
            account_row("Personal", "p1"),
        ]);
        let store = AccountsStore::new(repository, None);
        store.refetch().await.unwrap();
        let id = store.accounts().await[0].id.clone();

        let changes = AccountChanges {
            password: Some("rotated".to_string()),
            ..Default::default()
        };
        store.update(&id, changes).await.unwrap();
        assert_eq!(store.accounts().await[0].password, "rotated");

        store.delete(&id).await.unwrap();
        assert_eq!(store.accounts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_cache_untouched() {
        let repository = MockAccountRepository::new(vec![account_row("Work", "p1")]);
        let store = AccountsStore::new(repository.clone(), None);
        store.refetch().await.unwrap();

        repository.fail_next();
        let id = store.accounts().await[0].id.clone();
        assert!(store.delete(&id).await.is_err());
        assert_eq!(store.accounts().await.len(), 1);
    }
}
