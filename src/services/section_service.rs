//! Section Service - listing and creating sections

use crate::domain::{DomainError, NewSection, Section, SectionRepository};

pub async fn list_sections(repo: &dyn SectionRepository) -> Result<Vec<Section>, DomainError> {
    repo.find_all().await
}

/// Create a section. Only the name is required.
pub async fn create_section(
    repo: &dyn SectionRepository,
    input: NewSection,
) -> Result<Section, DomainError> {
    if input.name.trim().is_empty() {
        return Err(DomainError::Validation("Section name is required".to_string()));
    }

    let section = repo.create(input).await?;
    tracing::info!("Section {} '{}' created", section.id, section.name);
    Ok(section)
}
