//! Product video repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use common::{AppError, AppResult};
use domain::{ProductVideo, VideoUpdate};

use super::entities::product_video::{self, Entity as VideoEntity};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Videos of a product ordered by `(order, created_at)`
    async fn list(&self, product_id: i32) -> AppResult<Vec<ProductVideo>>;

    /// Find a video, scoped to its product
    async fn find(&self, product_id: i32, video_id: i32) -> AppResult<Option<ProductVideo>>;

    /// Append after the current last video
    async fn append(&self, product_id: i32, youtube_url: String) -> AppResult<ProductVideo>;

    /// Apply the fields present in `update`
    async fn update(&self, video_id: i32, update: VideoUpdate) -> AppResult<ProductVideo>;

    async fn delete(&self, video_id: i32) -> AppResult<()>;
}

pub struct VideoStore {
    db: DatabaseConnection,
}

impl VideoStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VideoRepository for VideoStore {
    async fn list(&self, product_id: i32) -> AppResult<Vec<ProductVideo>> {
        let models = VideoEntity::find()
            .filter(product_video::Column::ProductId.eq(product_id))
            .order_by_asc(product_video::Column::Order)
            .order_by_asc(product_video::Column::CreatedAt)
            .order_by_asc(product_video::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(ProductVideo::from).collect())
    }

    async fn find(&self, product_id: i32, video_id: i32) -> AppResult<Option<ProductVideo>> {
        let model = VideoEntity::find_by_id(video_id)
            .filter(product_video::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await?;
        Ok(model.map(ProductVideo::from))
    }

    async fn append(&self, product_id: i32, youtube_url: String) -> AppResult<ProductVideo> {
        let last = VideoEntity::find()
            .filter(product_video::Column::ProductId.eq(product_id))
            .order_by_desc(product_video::Column::Order)
            .one(&self.db)
            .await?;
        let order = last.map(|video| video.order + 1).unwrap_or(0);

        let model = product_video::ActiveModel {
            product_id: Set(product_id),
            youtube_url: Set(youtube_url),
            order: Set(order),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(ProductVideo::from(model))
    }

    async fn update(&self, video_id: i32, update: VideoUpdate) -> AppResult<ProductVideo> {
        let model = VideoEntity::find_by_id(video_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        if update.is_empty() {
            return Ok(ProductVideo::from(model));
        }

        let mut active: product_video::ActiveModel = model.into();
        if let Some(youtube_url) = update.youtube_url {
            active.youtube_url = Set(youtube_url);
        }
        if let Some(order) = update.order {
            active.order = Set(order);
        }
        let model = active.update(&self.db).await?;
        Ok(ProductVideo::from(model))
    }

    async fn delete(&self, video_id: i32) -> AppResult<()> {
        let result = VideoEntity::delete_by_id(video_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Transaction-bound video writes.
pub struct TxVideoRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxVideoRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Replace the whole list; `order` follows the position in `urls`
    pub async fn replace_all(&self, product_id: i32, urls: Vec<String>) -> AppResult<Vec<ProductVideo>> {
        VideoEntity::delete_many()
            .filter(product_video::Column::ProductId.eq(product_id))
            .exec(self.txn)
            .await?;

        let now = Utc::now();
        let mut created = Vec::with_capacity(urls.len());
        for (index, youtube_url) in urls.into_iter().enumerate() {
            let order = i32::try_from(index).map_err(|_| AppError::validation("Too many videos"))?;
            let model = product_video::ActiveModel {
                product_id: Set(product_id),
                youtube_url: Set(youtube_url),
                order: Set(order),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(self.txn)
            .await?;
            created.push(ProductVideo::from(model));
        }
        Ok(created)
    }
}
