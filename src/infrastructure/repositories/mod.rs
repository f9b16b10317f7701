//! Repository implementations: SeaORM (direct SQL) and PostgREST (hosted)

pub mod relation_repository;
pub mod rest_repository;
pub mod section_repository;
pub mod video_repository;

pub use relation_repository::{SeaOrmSectionLinkRepository, SeaOrmTagRepository};
pub use rest_repository::{RestRelationRepository, RestSectionRepository, RestVideoRepository};
pub use section_repository::SeaOrmSectionRepository;
pub use video_repository::SeaOrmVideoRepository;
