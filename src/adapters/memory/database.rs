//! In-memory implementation of the storage ports.
//!
//! Committed rows live in shared maps. A transaction stages its writes and
//! holds per-row locks until it commits or is dropped, so concurrent inserts
//! for the same industry serialize exactly like a unique index would.
//! Useful for tests and local runs without Postgres.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::foundation::{DomainError, ErrorCode, ExternalIdentityId, Timestamp, UserId};
use crate::domain::insight::{IndustryInsight, IndustryKey};
use crate::domain::onboarding::{OnboardingUpdate, User};
use crate::ports::{
    IndustryInsightRepository, InsertOutcome, OnboardingState, UnitOfWork, UserReader,
    UserRepository,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RowKey {
    Insight(IndustryKey),
    User(UserId),
}

/// Open transaction against an [`InMemoryDatabase`].
///
/// Dropping it without calling `commit` discards the staged writes and
/// releases its row locks.
pub struct InMemoryTx {
    locks: HashMap<RowKey, OwnedMutexGuard<()>>,
    staged_insights: HashMap<IndustryKey, IndustryInsight>,
    staged_users: HashMap<UserId, User>,
}

impl InMemoryTx {
    fn new() -> Self {
        Self {
            locks: HashMap::new(),
            staged_insights: HashMap::new(),
            staged_users: HashMap::new(),
        }
    }
}

/// Shared in-memory database. Cloning shares the underlying tables.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    insights: Arc<RwLock<HashMap<IndustryKey, IndustryInsight>>>,
    users: Arc<RwLock<HashMap<UserId, User>>>,
    row_locks: Arc<Mutex<HashMap<RowKey, Arc<Mutex<()>>>>>,
    fail_user_writes: Arc<AtomicBool>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a provisioned user.
    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(*user.id(), user);
    }

    /// Seed a committed insight.
    pub async fn insert_insight(&self, insight: IndustryInsight) {
        self.insights
            .write()
            .await
            .insert(insight.industry().clone(), insight);
    }

    /// Committed insight for `industry`, if any.
    pub async fn insight(&self, industry: &IndustryKey) -> Option<IndustryInsight> {
        self.insights.read().await.get(industry).cloned()
    }

    /// Number of committed insights.
    pub async fn insight_count(&self) -> usize {
        self.insights.read().await.len()
    }

    /// Committed user by id.
    pub async fn user(&self, id: &UserId) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }

    /// Make every subsequent `apply_onboarding` fail with a database error.
    pub fn fail_user_writes(&self, fail: bool) {
        self.fail_user_writes.store(fail, Ordering::SeqCst);
    }

    /// Take the row lock for `key`, waiting for any other holder.
    async fn lock_row(&self, tx: &mut InMemoryTx, key: RowKey) {
        if tx.locks.contains_key(&key) {
            return;
        }
        let row = {
            let mut registry = self.row_locks.lock().await;
            registry
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let guard = row.lock_owned().await;
        tx.locks.insert(key, guard);
    }
}

#[async_trait]
impl UnitOfWork for InMemoryDatabase {
    type Tx = InMemoryTx;

    async fn begin(&self) -> Result<InMemoryTx, DomainError> {
        Ok(InMemoryTx::new())
    }

    async fn commit(&self, tx: InMemoryTx) -> Result<(), DomainError> {
        let InMemoryTx {
            locks,
            staged_insights,
            staged_users,
        } = tx;
        {
            let mut insights = self.insights.write().await;
            let mut users = self.users.write().await;
            insights.extend(staged_insights);
            users.extend(staged_users);
        }
        // Row locks are released only after the writes are visible.
        drop(locks);
        Ok(())
    }

    async fn rollback(&self, tx: InMemoryTx) -> Result<(), DomainError> {
        drop(tx);
        Ok(())
    }
}

#[async_trait]
impl IndustryInsightRepository<InMemoryTx> for InMemoryDatabase {
    async fn find_by_industry(
        &self,
        tx: &mut InMemoryTx,
        industry: &IndustryKey,
    ) -> Result<Option<IndustryInsight>, DomainError> {
        if let Some(staged) = tx.staged_insights.get(industry) {
            return Ok(Some(staged.clone()));
        }
        Ok(self.insights.read().await.get(industry).cloned())
    }

    async fn insert_if_absent(
        &self,
        tx: &mut InMemoryTx,
        insight: &IndustryInsight,
    ) -> Result<InsertOutcome, DomainError> {
        let key = insight.industry().clone();
        if let Some(staged) = tx.staged_insights.get(&key) {
            return Ok(InsertOutcome::Existing(staged.clone()));
        }

        self.lock_row(tx, RowKey::Insight(key.clone())).await;

        if let Some(committed) = self.insights.read().await.get(&key) {
            return Ok(InsertOutcome::Existing(committed.clone()));
        }

        tx.staged_insights.insert(key, insight.clone());
        Ok(InsertOutcome::Inserted(insight.clone()))
    }
}

#[async_trait]
impl UserRepository<InMemoryTx> for InMemoryDatabase {
    async fn find_by_external_identity(
        &self,
        tx: &mut InMemoryTx,
        identity: &ExternalIdentityId,
    ) -> Result<Option<User>, DomainError> {
        let id = {
            let users = self.users.read().await;
            users
                .values()
                .find(|u| u.external_identity_id() == identity)
                .map(|u| *u.id())
        };
        let Some(id) = id else {
            return Ok(None);
        };

        self.lock_row(tx, RowKey::User(id)).await;

        if let Some(staged) = tx.staged_users.get(&id) {
            return Ok(Some(staged.clone()));
        }
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn apply_onboarding(
        &self,
        tx: &mut InMemoryTx,
        user_id: &UserId,
        update: &OnboardingUpdate,
    ) -> Result<User, DomainError> {
        if self.fail_user_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("simulated write failure on users"));
        }

        self.lock_row(tx, RowKey::User(*user_id)).await;

        let current = match tx.staged_users.get(user_id) {
            Some(staged) => Some(staged.clone()),
            None => self.users.read().await.get(user_id).cloned(),
        };
        let mut user = current.ok_or_else(|| {
            DomainError::new(ErrorCode::NotFound, format!("User not found: {}", user_id))
        })?;

        let insight_visible = tx.staged_insights.contains_key(&update.industry)
            || self.insights.read().await.contains_key(&update.industry);
        if !insight_visible {
            return Err(DomainError::new(
                ErrorCode::ForeignKeyViolation,
                format!("No industry insight for '{}'", update.industry),
            ));
        }

        user.apply_onboarding(update, Timestamp::now());
        tx.staged_users.insert(*user_id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserReader for InMemoryDatabase {
    async fn onboarding_state(
        &self,
        identity: &ExternalIdentityId,
    ) -> Result<Option<OnboardingState>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.external_identity_id() == identity)
            .map(|u| OnboardingState {
                industry: u.industry().cloned(),
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::insight::{InsightContent, InsightOrigin};
    use std::time::Duration;

    fn key(s: &str) -> IndustryKey {
        IndustryKey::new(s).unwrap()
    }

    fn insight(industry: &str, growth: f64) -> IndustryInsight {
        let mut content = InsightContent::fallback();
        content.growth_rate = growth;
        IndustryInsight::new(
            key(industry),
            content,
            InsightOrigin::Generated,
            Timestamp::now(),
            7,
        )
    }

    fn update(industry: &str) -> OnboardingUpdate {
        OnboardingUpdate {
            industry: key(industry),
            experience: Some(2),
            bio: None,
            skills: vec!["Go".to_string()],
        }
    }

    #[tokio::test]
    async fn committed_insert_becomes_visible() {
        let db = InMemoryDatabase::new();
        let mut tx = db.begin().await.unwrap();

        let outcome = db.insert_if_absent(&mut tx, &insight("Tech", 1.0)).await.unwrap();
        assert!(outcome.was_inserted());
        assert_eq!(db.insight_count().await, 0);

        db.commit(tx).await.unwrap();
        assert_eq!(db.insight_count().await, 1);
    }

    #[tokio::test]
    async fn dropped_transaction_discards_writes() {
        let db = InMemoryDatabase::new();
        {
            let mut tx = db.begin().await.unwrap();
            db.insert_if_absent(&mut tx, &insight("Tech", 1.0)).await.unwrap();
        }
        assert_eq!(db.insight_count().await, 0);

        // The row lock was released with the dropped transaction.
        let mut tx = db.begin().await.unwrap();
        let outcome = db.insert_if_absent(&mut tx, &insight("Tech", 2.0)).await.unwrap();
        assert!(outcome.was_inserted());
    }

    #[tokio::test]
    async fn insert_never_overwrites_committed_row() {
        let db = InMemoryDatabase::new();
        db.insert_insight(insight("Tech", 1.0)).await;

        let mut tx = db.begin().await.unwrap();
        let outcome = db.insert_if_absent(&mut tx, &insight("Tech", 9.0)).await.unwrap();
        db.commit(tx).await.unwrap();

        match outcome {
            InsertOutcome::Existing(existing) => assert_eq!(existing.content().growth_rate, 1.0),
            other => panic!("expected Existing, got {:?}", other),
        }
        assert_eq!(db.insight(&key("Tech")).await.unwrap().content().growth_rate, 1.0);
    }

    #[tokio::test]
    async fn losing_insert_waits_for_winner_and_returns_its_row() {
        let db = InMemoryDatabase::new();
        let mut winner = db.begin().await.unwrap();
        db.insert_if_absent(&mut winner, &insight("Tech", 1.0)).await.unwrap();

        let loser_db = db.clone();
        let loser = tokio::spawn(async move {
            let mut tx = loser_db.begin().await.unwrap();
            let outcome = loser_db
                .insert_if_absent(&mut tx, &insight("Tech", 2.0))
                .await
                .unwrap();
            loser_db.commit(tx).await.unwrap();
            outcome
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!loser.is_finished());
        db.commit(winner).await.unwrap();

        match loser.await.unwrap() {
            InsertOutcome::Existing(existing) => assert_eq!(existing.content().growth_rate, 1.0),
            other => panic!("expected Existing, got {:?}", other),
        }
        assert_eq!(db.insight_count().await, 1);
    }

    #[tokio::test]
    async fn waiting_insert_proceeds_when_winner_rolls_back() {
        let db = InMemoryDatabase::new();
        let mut first = db.begin().await.unwrap();
        db.insert_if_absent(&mut first, &insight("Tech", 1.0)).await.unwrap();

        let second_db = db.clone();
        let second = tokio::spawn(async move {
            let mut tx = second_db.begin().await.unwrap();
            let outcome = second_db
                .insert_if_absent(&mut tx, &insight("Tech", 2.0))
                .await
                .unwrap();
            second_db.commit(tx).await.unwrap();
            outcome
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        db.rollback(first).await.unwrap();

        assert!(second.await.unwrap().was_inserted());
        assert_eq!(db.insight(&key("Tech")).await.unwrap().content().growth_rate, 2.0);
    }

    #[tokio::test]
    async fn apply_onboarding_requires_visible_insight() {
        let db = InMemoryDatabase::new();
        let user = User::provision(ExternalIdentityId::new("ext-1").unwrap(), None);
        let user_id = *user.id();
        db.insert_user(user).await;

        let mut tx = db.begin().await.unwrap();
        let err = db
            .apply_onboarding(&mut tx, &user_id, &update("Tech"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ForeignKeyViolation);
    }

    #[tokio::test]
    async fn apply_onboarding_sees_insight_staged_in_same_transaction() {
        let db = InMemoryDatabase::new();
        let user = User::provision(ExternalIdentityId::new("ext-1").unwrap(), None);
        let user_id = *user.id();
        db.insert_user(user).await;

        let mut tx = db.begin().await.unwrap();
        db.insert_if_absent(&mut tx, &insight("Tech", 1.0)).await.unwrap();
        let updated = db.apply_onboarding(&mut tx, &user_id, &update("Tech")).await.unwrap();
        assert_eq!(updated.industry().map(|k| k.as_str()), Some("Tech"));

        // Not visible outside the transaction until commit.
        assert!(db.user(&user_id).await.unwrap().industry().is_none());
        db.commit(tx).await.unwrap();
        assert!(db.user(&user_id).await.unwrap().is_onboarded());
    }

    #[tokio::test]
    async fn apply_onboarding_unknown_user_is_not_found() {
        let db = InMemoryDatabase::new();
        db.insert_insight(insight("Tech", 1.0)).await;

        let mut tx = db.begin().await.unwrap();
        let err = db
            .apply_onboarding(&mut tx, &UserId::new(), &update("Tech"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn onboarding_state_reflects_committed_industry() {
        let db = InMemoryDatabase::new();
        let identity = ExternalIdentityId::new("ext-1").unwrap();
        db.insert_user(User::provision(identity.clone(), None)).await;

        let state = db.onboarding_state(&identity).await.unwrap().unwrap();
        assert!(!state.is_onboarded());

        let missing = ExternalIdentityId::new("nobody").unwrap();
        assert!(db.onboarding_state(&missing).await.unwrap().is_none());
    }
}
