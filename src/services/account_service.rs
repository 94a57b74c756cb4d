//! Account service - orchestration between the engine and storage.
//!
//! This service handles:
//! - Loading and persisting the full account collection
//! - Code suggestions for the account form
//! - Validated creation and deletion
//!
//! # Write Model
//!
//! Every mutation reads the whole collection, validates against that snapshot
//! and writes the whole collection back. Mutations inside one process are
//! serialized by `write_lock`; nothing coordinates separate processes.

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    chart::{
        allocator,
        query::{TreeQuery, sort_by_code},
        validator,
    },
    error::AppError,
    models::account::{Account, AccountDetail, CodeSuggestion, CreateAccountRequest},
    store::KeyValueStore,
};

/// Chart-of-accounts operations over an injected store.
#[derive(Debug)]
pub struct AccountService<S> {
    store: S,
    key: String,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> AccountService<S> {
    /// Create a service storing its collection under `key`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Full collection; empty if nothing was stored yet.
    pub async fn load_all(&self) -> Result<Vec<Account>, AppError> {
        let accounts = self.store.get(&self.key).await?.unwrap_or_default();
        tracing::debug!(count = accounts.len(), key = %self.key, "loaded accounts");
        Ok(accounts)
    }

    /// Replace the stored collection.
    pub async fn persist_all(&self, accounts: &[Account]) -> Result<(), AppError> {
        self.store.set(&self.key, accounts).await
    }

    /// Accounts in code order, optionally filtered by code or name.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<Account>, AppError> {
        let accounts = self.load_all().await?;
        let found = TreeQuery::new(&accounts).search(query.unwrap_or_default());
        Ok(found.into_iter().cloned().collect())
    }

    /// Account with its structural parent and direct children.
    pub async fn account_detail(&self, id: Uuid) -> Result<AccountDetail, AppError> {
        let accounts = self.load_all().await?;
        let query = TreeQuery::new(&accounts);
        let account = query.find_by_id(id).ok_or(AppError::AccountNotFound)?;

        let mut children = query.direct_children(&account.code);
        sort_by_code(&mut children);

        Ok(AccountDetail {
            account: account.clone(),
            parent: query.parent_of(account).cloned(),
            children: children.into_iter().cloned().collect(),
            can_accept_more_children: query.can_accept_more_children(account),
        })
    }

    /// Direct children of the account by code.
    pub async fn children(&self, id: Uuid) -> Result<Vec<Account>, AppError> {
        Ok(self.account_detail(id).await?.children)
    }

    /// Container accounts a new account may be placed under.
    pub async fn parent_options(&self) -> Result<Vec<Account>, AppError> {
        let accounts = self.load_all().await?;
        Ok(TreeQuery::new(&accounts)
            .containers()
            .into_iter()
            .cloned()
            .collect())
    }

    /// Next free code under `parent_id`, or the next root.
    pub async fn suggest_code(&self, parent_id: Option<Uuid>) -> Result<CodeSuggestion, AppError> {
        let accounts = self.load_all().await?;
        let suggestion = allocator::suggest_code(parent_id, &accounts);

        if suggestion.is_failure() {
            tracing::warn!(
                parent_id = ?parent_id,
                reason = suggestion.reason.as_deref().unwrap_or_default(),
                "no code available"
            );
        } else if suggestion.parent_changed {
            tracing::warn!(
                parent_id = ?parent_id,
                suggested_code = %suggestion.suggested_code,
                suggested_parent_id = ?suggestion.suggested_parent_id,
                "requested parent is full, suggestion promoted"
            );
        }

        Ok(suggestion)
    }

    /// Whether `account` can still take children.
    pub async fn can_accept_more_children(&self, account: &Account) -> Result<bool, AppError> {
        let accounts = self.load_all().await?;
        Ok(TreeQuery::new(&accounts).can_accept_more_children(account))
    }

    /// Validate the request against the current collection and append it.
    ///
    /// # Errors
    ///
    /// - `Validation`: one or more field rules failed (all are reported)
    /// - `Database`: storage failed, nothing was written
    pub async fn validate_and_create(&self, request: CreateAccountRequest) -> Result<Account, AppError> {
        let format_errors = validator::validate_format(&request);
        if !format_errors.is_empty() {
            return Err(AppError::Validation(format_errors));
        }

        let _guard = self.write_lock.lock().await;
        let mut accounts = self.load_all().await?;

        let errors = validator::validate_creation(&request, &accounts);
        if !errors.is_empty() {
            tracing::debug!(code = %request.code, errors = errors.len(), "account rejected");
            return Err(AppError::Validation(errors));
        }

        let account = Account::from_request(request);
        accounts.push(account.clone());
        self.persist_all(&accounts).await?;

        tracing::info!(id = %account.id, code = %account.code, "account created");
        Ok(account)
    }

    /// Remove an account that has no children.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound`: no account with this id
    /// - `Validation`: the account still has children
    pub async fn validate_and_delete(&self, id: Uuid) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut accounts = self.load_all().await?;

        let code = TreeQuery::new(&accounts)
            .find_by_id(id)
            .map(|account| account.code.clone())
            .ok_or(AppError::AccountNotFound)?;

        if let Some(error) = validator::validate_deletion(&code, &accounts) {
            return Err(AppError::Validation(vec![error]));
        }

        accounts.retain(|account| account.id != id);
        self.persist_all(&accounts).await?;

        tracing::info!(id = %id, code = %code, "account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::query::tests::{container, leaf};
    use crate::models::account::AccountType;
    use crate::store::MemoryStore;

    const KEY: &str = "test:accounts";

    fn service() -> AccountService<MemoryStore> {
        AccountService::new(MemoryStore::new(), KEY)
    }

    async fn seeded(accounts: Vec<Account>) -> AccountService<MemoryStore> {
        let store = MemoryStore::new();
        store.set(KEY, &accounts).await.unwrap();
        AccountService::new(store, KEY)
    }

    fn request(code: &str, parent_id: Option<Uuid>, accepts_entries: bool) -> CreateAccountRequest {
        CreateAccountRequest {
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type: AccountType::Receipt,
            accepts_entries,
            parent_id,
        }
    }

    #[tokio::test]
    async fn empty_store_loads_as_empty_list() {
        assert!(service().load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn suggest_then_create_builds_a_tree() {
        let service = service();

        let root = service.suggest_code(None).await.unwrap();
        assert_eq!(root.suggested_code, "1");
        let root = service
            .validate_and_create(request(&root.suggested_code, None, false))
            .await
            .unwrap();

        let child = service.suggest_code(Some(root.id)).await.unwrap();
        assert_eq!(child.suggested_code, "1.1");
        assert!(!child.parent_changed);
        let child = service
            .validate_and_create(request(&child.suggested_code, child.suggested_parent_id, true))
            .await
            .unwrap();

        assert_eq!(child.parent_id, Some(root.id));
        assert_eq!(child.created_at, child.updated_at);
        assert_eq!(service.load_all().await.unwrap().len(), 2);

        let next = service.suggest_code(Some(root.id)).await.unwrap();
        assert_eq!(next.suggested_code, "1.2");
    }

    #[tokio::test]
    async fn rejected_creation_writes_nothing() {
        let service = seeded(vec![container("1")]).await;

        let error = service
            .validate_and_create(request("1", None, true))
            .await
            .unwrap_err();

        match error {
            AppError::Validation(errors) => assert_eq!(errors[0].field, "code"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(service.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn leading_zeros_name_the_same_account() {
        let service = service();
        let root = service.validate_and_create(request("1", None, false)).await.unwrap();
        service
            .validate_and_create(request("1.1", Some(root.id), true))
            .await
            .unwrap();

        for code in ["01", "1.001"] {
            let parent = (code != "01").then_some(root.id);
            let error = service
                .validate_and_create(request(code, parent, true))
                .await
                .unwrap_err();
            assert_eq!(error.messages(), vec!["This code is already in use"], "{code}");
        }

        let padded = service
            .validate_and_create(request("1.002", Some(root.id), true))
            .await
            .unwrap();
        assert_eq!(padded.code, "1.2");

        let codes: Vec<_> = service
            .load_all()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.code)
            .collect();
        assert_eq!(codes, vec!["1", "1.1", "1.2"]);
    }

    #[tokio::test]
    async fn malformed_code_is_rejected_before_rules() {
        let error = service()
            .validate_and_create(request("1.abc", None, true))
            .await
            .unwrap_err();

        assert_eq!(error.messages(), vec!["Invalid format. Use: 999.999.999"]);
    }

    #[tokio::test]
    async fn delete_guarded_by_children() {
        let accounts = vec![container("1"), leaf("1.1")];
        let parent = accounts[0].id;
        let child = accounts[1].id;
        let service = seeded(accounts).await;

        let error = service.validate_and_delete(parent).await.unwrap_err();
        assert_eq!(
            error.messages(),
            vec!["Cannot delete an account that has children"]
        );

        service.validate_and_delete(child).await.unwrap();
        service.validate_and_delete(parent).await.unwrap();
        assert!(service.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_account() {
        let error = service().validate_and_delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(error, AppError::AccountNotFound));
    }

    #[tokio::test]
    async fn full_root_container_is_reported_to_caller() {
        let accounts = vec![container("1"), leaf("1.999")];
        let parent = accounts[0].id;
        let service = seeded(accounts.clone()).await;

        let suggestion = service.suggest_code(Some(parent)).await.unwrap();
        assert_eq!(suggestion.suggested_code, "2");
        assert_eq!(suggestion.suggested_parent_id, None);
        assert!(suggestion.parent_changed);

        assert!(!service.can_accept_more_children(&accounts[0]).await.unwrap());
    }

    #[tokio::test]
    async fn detail_lists_parent_and_children_in_order() {
        let accounts = vec![
            container("2"),
            leaf("2.10"),
            container("2.3"),
            leaf("2.3.1"),
        ];
        let id = accounts[2].id;
        let root = accounts[0].id;
        let service = seeded(accounts).await;

        let detail = service.account_detail(id).await.unwrap();
        assert_eq!(detail.parent.unwrap().code, "2");
        assert_eq!(detail.children.len(), 1);
        assert!(detail.can_accept_more_children);

        let children: Vec<_> = service
            .children(root)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.code)
            .collect();
        assert_eq!(children, vec!["2.3", "2.10"]);
    }

    #[tokio::test]
    async fn search_and_parent_options() {
        let service = seeded(vec![container("1"), leaf("1.1"), container("2")]).await;

        assert_eq!(service.search(Some("1.1")).await.unwrap().len(), 1);
        assert_eq!(service.search(None).await.unwrap().len(), 3);
        assert_eq!(service.parent_options().await.unwrap().len(), 2);
    }
}
