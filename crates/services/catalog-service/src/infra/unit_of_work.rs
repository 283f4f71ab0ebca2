//! Unit of Work: repository access plus transaction lifecycle.
//!
//! Multi-row writes (product + country settings, status + history entry,
//! assignment and video list replacement) run inside [`UnitOfWork::transaction`]
//! and are committed on `Ok`, rolled back on `Err`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait};

use common::{AppError, AppResult};

use crate::repository::{
    FamilyAssignmentRepository, FamilyAssignmentStore, LookupRepository, LookupStore,
    ProductRepository, ProductStore, TxFamilyAssignmentRepository, TxProductRepository,
    TxVideoRepository, TxWorkflowRepository, UserRepository, UserStore, VideoRepository,
    VideoStore, WorkflowRepository, WorkflowStore,
};

/// Boxed future returned by a transaction body.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method; tests
/// run services against [`Persistence`] over SQLite instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    fn assignments(&self) -> Arc<dyn FamilyAssignmentRepository>;

    fn workflows(&self) -> Arc<dyn WorkflowRepository>;

    fn videos(&self) -> Arc<dyn VideoRepository>;

    fn lookups(&self) -> Arc<dyn LookupRepository>;

    /// Execute a closure within a ReadCommitted transaction.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn products(&self) -> TxProductRepository<'a> {
        TxProductRepository::new(self.txn)
    }

    pub fn assignments(&self) -> TxFamilyAssignmentRepository<'a> {
        TxFamilyAssignmentRepository::new(self.txn)
    }

    pub fn workflows(&self) -> TxWorkflowRepository<'a> {
        TxWorkflowRepository::new(self.txn)
    }

    pub fn videos(&self) -> TxVideoRepository<'a> {
        TxVideoRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    users: Arc<UserStore>,
    products: Arc<ProductStore>,
    assignments: Arc<FamilyAssignmentStore>,
    workflows: Arc<WorkflowStore>,
    videos: Arc<VideoStore>,
    lookups: Arc<LookupStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            products: Arc::new(ProductStore::new(db.clone())),
            assignments: Arc::new(FamilyAssignmentStore::new(db.clone())),
            workflows: Arc::new(WorkflowStore::new(db.clone())),
            videos: Arc::new(VideoStore::new(db.clone())),
            lookups: Arc::new(LookupStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn assignments(&self) -> Arc<dyn FamilyAssignmentRepository> {
        self.assignments.clone()
    }

    fn workflows(&self) -> Arc<dyn WorkflowRepository> {
        self.workflows.clone()
    }

    fn videos(&self) -> Arc<dyn VideoRepository> {
        self.videos.clone()
    }

    fn lookups(&self) -> Arc<dyn LookupRepository> {
        self.lookups.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}
