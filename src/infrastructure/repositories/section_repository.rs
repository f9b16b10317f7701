//! SeaORM implementation of SectionRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::{DomainError, NewSection, Section, SectionRepository};
use crate::models::section::{ActiveModel, Column, Entity as SectionEntity};

/// SeaORM-based implementation of SectionRepository
pub struct SeaOrmSectionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSectionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SectionRepository for SeaOrmSectionRepository {
    async fn find_all(&self) -> Result<Vec<Section>, DomainError> {
        let sections = SectionEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(sections.into_iter().map(Section::from).collect())
    }

    async fn create(&self, input: NewSection) -> Result<Section, DomainError> {
        let section = ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            skill: Set(input.skill),
            ..Default::default()
        };

        let model = section.insert(&self.db).await?;
        Ok(Section::from(model))
    }
}
