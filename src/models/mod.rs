//! SeaORM entities for the four catalog tables

pub mod section;
pub mod section_video;
pub mod tag;
pub mod video;
