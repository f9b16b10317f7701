use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::Section;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: String,
    pub skill: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::section_video::Entity")]
    SectionVideos,
}

impl Related<super::video::Entity> for Entity {
    fn to() -> RelationDef {
        super::section_video::Relation::Video.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::section_video::Relation::Section.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Section {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            skill: model.skill,
        }
    }
}
