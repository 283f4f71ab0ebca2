//! Product video service.
//!
//! Reads follow product read access; every write requires write access to
//! the owning product. Video IDs are always resolved within their product.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, OptionExt};
use domain::{validate_youtube_url, Principal, ProductVideo, VideoUpdate};

use super::access::{load_for_read, load_for_write};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VideoService: Send + Sync {
    async fn list_videos(&self, actor: Principal, product_id: i32) -> AppResult<Vec<ProductVideo>>;

    async fn add_video(
        &self,
        actor: Principal,
        product_id: i32,
        youtube_url: String,
    ) -> AppResult<ProductVideo>;

    /// Replace the whole list; order follows the input
    async fn replace_videos(
        &self,
        actor: Principal,
        product_id: i32,
        urls: Vec<String>,
    ) -> AppResult<Vec<ProductVideo>>;

    async fn get_video(
        &self,
        actor: Principal,
        product_id: i32,
        video_id: i32,
    ) -> AppResult<ProductVideo>;

    /// Change the link and/or the position of one video
    async fn update_video(
        &self,
        actor: Principal,
        product_id: i32,
        video_id: i32,
        update: VideoUpdate,
    ) -> AppResult<ProductVideo>;

    async fn delete_video(&self, actor: Principal, product_id: i32, video_id: i32) -> AppResult<()>;
}

pub struct VideoManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> VideoManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_in_product(&self, product_id: i32, video_id: i32) -> AppResult<ProductVideo> {
        self.uow.videos().find(product_id, video_id).await?.ok_or_not_found()
    }
}

fn normalize_url(url: String) -> AppResult<String> {
    let url = url.trim().to_string();
    validate_youtube_url(&url)?;
    Ok(url)
}

#[async_trait]
impl<U: UnitOfWork + 'static> VideoService for VideoManager<U> {
    async fn list_videos(&self, actor: Principal, product_id: i32) -> AppResult<Vec<ProductVideo>> {
        load_for_read(self.uow.as_ref(), &actor, product_id).await?;
        self.uow.videos().list(product_id).await
    }

    async fn add_video(
        &self,
        actor: Principal,
        product_id: i32,
        youtube_url: String,
    ) -> AppResult<ProductVideo> {
        load_for_write(self.uow.as_ref(), &actor, product_id).await?;
        let url = normalize_url(youtube_url)?;
        self.uow.videos().append(product_id, url).await
    }

    async fn replace_videos(
        &self,
        actor: Principal,
        product_id: i32,
        urls: Vec<String>,
    ) -> AppResult<Vec<ProductVideo>> {
        load_for_write(self.uow.as_ref(), &actor, product_id).await?;

        let urls = urls
            .into_iter()
            .map(normalize_url)
            .collect::<AppResult<Vec<_>>>()?;
        for (index, url) in urls.iter().enumerate() {
            if urls[..index].contains(url) {
                return Err(AppError::validation(format!("Duplicate video URL: {}", url)));
            }
        }

        let videos = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let videos = ctx.videos().replace_all(product_id, urls).await?;
                    Ok::<_, AppError>(videos)
                })
            })
            .await?;

        tracing::info!(product_id, count = videos.len(), "Product videos replaced");
        Ok(videos)
    }

    async fn get_video(
        &self,
        actor: Principal,
        product_id: i32,
        video_id: i32,
    ) -> AppResult<ProductVideo> {
        load_for_read(self.uow.as_ref(), &actor, product_id).await?;
        self.find_in_product(product_id, video_id).await
    }

    async fn update_video(
        &self,
        actor: Principal,
        product_id: i32,
        video_id: i32,
        update: VideoUpdate,
    ) -> AppResult<ProductVideo> {
        load_for_write(self.uow.as_ref(), &actor, product_id).await?;
        if update.order.is_some_and(|order| order < 0) {
            return Err(AppError::validation("order must not be negative"));
        }
        let update = VideoUpdate {
            youtube_url: update.youtube_url.map(normalize_url).transpose()?,
            ..update
        };
        let video = self.find_in_product(product_id, video_id).await?;
        self.uow.videos().update(video.id, update).await
    }

    async fn delete_video(&self, actor: Principal, product_id: i32, video_id: i32) -> AppResult<()> {
        load_for_write(self.uow.as_ref(), &actor, product_id).await?;
        let video = self.find_in_product(product_id, video_id).await?;
        self.uow.videos().delete(video.id).await
    }
}
