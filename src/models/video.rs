use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::domain::{CategoryFlags, Video, VideoFields};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub video_ref: String,
    pub section_title: Option<String>,
    pub duration: Option<String>,
    pub skill: i32,
    pub watched_fully: bool,
    pub ott: bool,
    pub app: bool,
    pub arg: bool,
    pub putt: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tag::Entity")]
    Tags,
    #[sea_orm(has_many = "super::section_video::Entity")]
    SectionVideos,
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        super::section_video::Relation::Section.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::section_video::Relation::Video.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Video {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            fields: VideoFields {
                title: model.title,
                description: model.description,
                video_ref: model.video_ref,
                section_title: model.section_title,
                duration: model.duration,
                skill: model.skill,
                watched_fully: model.watched_fully,
                categories: CategoryFlags {
                    ott: model.ott,
                    app: model.app,
                    arg: model.arg,
                    putt: model.putt,
                },
            },
        }
    }
}

impl ActiveModel {
    /// Overwrite every scalar column with the given fields, leaving `id` alone
    pub fn apply_fields(&mut self, fields: VideoFields) {
        self.title = Set(fields.title);
        self.description = Set(fields.description);
        self.video_ref = Set(fields.video_ref);
        self.section_title = Set(fields.section_title);
        self.duration = Set(fields.duration);
        self.skill = Set(fields.skill);
        self.watched_fully = Set(fields.watched_fully);
        self.ott = Set(fields.categories.ott);
        self.app = Set(fields.categories.app);
        self.arg = Set(fields.categories.arg);
        self.putt = Set(fields.categories.putt);
    }
}
