//! SeaORM implementation of VideoRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::domain::{DomainError, Video, VideoFields, VideoId, VideoRepository};
use crate::models::video::{ActiveModel, Column, Entity as VideoEntity};

/// SeaORM-based implementation of VideoRepository
pub struct SeaOrmVideoRepository {
    db: DatabaseConnection,
}

impl SeaOrmVideoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VideoRepository for SeaOrmVideoRepository {
    async fn find_all(&self) -> Result<Vec<Video>, DomainError> {
        let videos = VideoEntity::find()
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(videos.into_iter().map(Video::from).collect())
    }

    async fn find_by_id(&self, id: VideoId) -> Result<Option<Video>, DomainError> {
        let video = VideoEntity::find_by_id(id).one(&self.db).await?;
        Ok(video.map(Video::from))
    }

    async fn create(&self, fields: VideoFields) -> Result<Video, DomainError> {
        let mut video = ActiveModel {
            ..Default::default()
        };
        video.apply_fields(fields);

        let model = video.insert(&self.db).await?;
        Ok(Video::from(model))
    }

    async fn update(&self, id: VideoId, fields: VideoFields) -> Result<Video, DomainError> {
        let existing = VideoEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut video: ActiveModel = existing.into();
        video.apply_fields(fields);

        let model = video.update(&self.db).await?;
        Ok(Video::from(model))
    }

    async fn delete_many(&self, ids: &[VideoId]) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = VideoEntity::delete_many()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
