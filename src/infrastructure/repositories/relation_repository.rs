//! SeaORM implementations of the two video relation tables

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::{DomainError, RelationRepository, SectionId, VideoId};
use crate::models::section_video::{self, Entity as SectionVideoEntity};
use crate::models::tag::{self, Entity as TagEntity};

/// `tags` table: one row per (video_id, tag)
pub struct SeaOrmTagRepository {
    db: DatabaseConnection,
}

impl SeaOrmTagRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RelationRepository<String> for SeaOrmTagRepository {
    async fn find_for(&self, owner: VideoId) -> Result<Vec<String>, DomainError> {
        let tags: Vec<String> = TagEntity::find()
            .select_only()
            .column(tag::Column::Tag)
            .filter(tag::Column::VideoId.eq(owner))
            .order_by_asc(tag::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(tags)
    }

    async fn delete_for(&self, owner: VideoId) -> Result<u64, DomainError> {
        let result = TagEntity::delete_many()
            .filter(tag::Column::VideoId.eq(owner))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_values(&self, owner: VideoId, values: &[String]) -> Result<u64, DomainError> {
        if values.is_empty() {
            return Ok(0);
        }

        let result = TagEntity::delete_many()
            .filter(tag::Column::VideoId.eq(owner))
            .filter(tag::Column::Tag.is_in(values.iter().cloned()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn insert_for(&self, owner: VideoId, values: &[String]) -> Result<(), DomainError> {
        if values.is_empty() {
            return Ok(());
        }

        let rows = values.iter().map(|value| tag::ActiveModel {
            video_id: Set(owner),
            tag: Set(value.clone()),
            ..Default::default()
        });

        TagEntity::insert_many(rows)
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn delete_for_many(&self, owners: &[VideoId]) -> Result<u64, DomainError> {
        if owners.is_empty() {
            return Ok(0);
        }

        let result = TagEntity::delete_many()
            .filter(tag::Column::VideoId.is_in(owners.iter().copied()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

/// `section_videos` join table: composite identity (section_id, video_id)
pub struct SeaOrmSectionLinkRepository {
    db: DatabaseConnection,
}

impl SeaOrmSectionLinkRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RelationRepository<SectionId> for SeaOrmSectionLinkRepository {
    async fn find_for(&self, owner: VideoId) -> Result<Vec<SectionId>, DomainError> {
        let ids: Vec<SectionId> = SectionVideoEntity::find()
            .select_only()
            .column(section_video::Column::SectionId)
            .filter(section_video::Column::VideoId.eq(owner))
            .order_by_asc(section_video::Column::SectionId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(ids)
    }

    async fn delete_for(&self, owner: VideoId) -> Result<u64, DomainError> {
        let result = SectionVideoEntity::delete_many()
            .filter(section_video::Column::VideoId.eq(owner))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_values(
        &self,
        owner: VideoId,
        values: &[SectionId],
    ) -> Result<u64, DomainError> {
        if values.is_empty() {
            return Ok(0);
        }

        let result = SectionVideoEntity::delete_many()
            .filter(section_video::Column::VideoId.eq(owner))
            .filter(section_video::Column::SectionId.is_in(values.iter().copied()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn insert_for(&self, owner: VideoId, values: &[SectionId]) -> Result<(), DomainError> {
        if values.is_empty() {
            return Ok(());
        }

        let rows = values.iter().map(|section_id| section_video::ActiveModel {
            section_id: Set(*section_id),
            video_id: Set(owner),
        });

        SectionVideoEntity::insert_many(rows)
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn delete_for_many(&self, owners: &[VideoId]) -> Result<u64, DomainError> {
        if owners.is_empty() {
            return Ok(0);
        }

        let result = SectionVideoEntity::delete_many()
            .filter(section_video::Column::VideoId.is_in(owners.iter().copied()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
