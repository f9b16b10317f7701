//! PostgREST implementations of the catalog repositories

use std::fmt::Display;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::domain::{
    DomainError, NewSection, RelationRepository, Section, SectionId, SectionRepository, Video,
    VideoFields, VideoId, VideoRepository,
};
use crate::infrastructure::supabase::SupabaseClient;

const VIDEOS: &str = "videos";
const SECTIONS: &str = "sections";
const OWNER_COLUMN: &str = "video_id";

pub struct RestVideoRepository {
    client: SupabaseClient,
}

impl RestVideoRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VideoRepository for RestVideoRepository {
    async fn find_all(&self) -> Result<Vec<Video>, DomainError> {
        self.client.from(VIDEOS).order("id", false).select().await
    }

    async fn find_by_id(&self, id: VideoId) -> Result<Option<Video>, DomainError> {
        let rows: Vec<Video> = self.client.from(VIDEOS).eq("id", id).select().await?;
        Ok(rows.into_iter().next())
    }

    async fn create(&self, fields: VideoFields) -> Result<Video, DomainError> {
        let rows: Vec<Video> = self.client.from(VIDEOS).insert(&[fields]).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DomainError::External("Insert returned no row".to_string()))
    }

    async fn update(&self, id: VideoId, fields: VideoFields) -> Result<Video, DomainError> {
        let rows: Vec<Video> = self.client.from(VIDEOS).eq("id", id).update(&fields).await?;
        rows.into_iter().next().ok_or(DomainError::NotFound)
    }

    async fn delete_many(&self, ids: &[VideoId]) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.client.from(VIDEOS).in_list("id", ids).delete().await
    }
}

pub struct RestSectionRepository {
    client: SupabaseClient,
}

impl RestSectionRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SectionRepository for RestSectionRepository {
    async fn find_all(&self) -> Result<Vec<Section>, DomainError> {
        self.client.from(SECTIONS).order("id", true).select().await
    }

    async fn create(&self, input: NewSection) -> Result<Section, DomainError> {
        let rows: Vec<Section> = self.client.from(SECTIONS).insert(&[input]).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DomainError::External("Insert returned no row".to_string()))
    }
}

/// Relation table keyed by `video_id` with one value column.
///
/// Covers both `tags` (value column `tag`) and `section_videos`
/// (value column `section_id`).
pub struct RestRelationRepository<V> {
    client: SupabaseClient,
    table: &'static str,
    value_column: &'static str,
    _value: PhantomData<fn() -> V>,
}

impl<V> RestRelationRepository<V> {
    pub fn new(client: SupabaseClient, table: &'static str, value_column: &'static str) -> Self {
        Self {
            client,
            table,
            value_column,
            _value: PhantomData,
        }
    }

    fn row(&self, owner: VideoId, value: &V) -> Value
    where
        V: Serialize,
    {
        let mut row = Map::new();
        row.insert(OWNER_COLUMN.to_string(), json!(owner));
        row.insert(self.value_column.to_string(), json!(value));
        Value::Object(row)
    }
}

impl RestRelationRepository<String> {
    pub fn tags(client: SupabaseClient) -> Self {
        Self::new(client, "tags", "tag")
    }
}

impl RestRelationRepository<SectionId> {
    pub fn section_links(client: SupabaseClient) -> Self {
        Self::new(client, "section_videos", "section_id")
    }
}

#[async_trait]
impl<V> RelationRepository<V> for RestRelationRepository<V>
where
    V: Serialize + DeserializeOwned + Display + Send + Sync + 'static,
{
    async fn find_for(&self, owner: VideoId) -> Result<Vec<V>, DomainError> {
        let rows: Vec<Map<String, Value>> = self
            .client
            .from(self.table)
            .eq(OWNER_COLUMN, owner)
            .select()
            .await?;

        rows.into_iter()
            .map(|mut row| {
                let value = row.remove(self.value_column).unwrap_or(Value::Null);
                serde_json::from_value(value).map_err(|e| {
                    DomainError::External(format!(
                        "Unexpected '{}' value in '{}': {}",
                        self.value_column, self.table, e
                    ))
                })
            })
            .collect()
    }

    async fn delete_for(&self, owner: VideoId) -> Result<u64, DomainError> {
        self.client
            .from(self.table)
            .eq(OWNER_COLUMN, owner)
            .delete()
            .await
    }

    async fn delete_values(&self, owner: VideoId, values: &[V]) -> Result<u64, DomainError> {
        if values.is_empty() {
            return Ok(0);
        }
        self.client
            .from(self.table)
            .eq(OWNER_COLUMN, owner)
            .in_list(self.value_column, values)
            .delete()
            .await
    }

    async fn insert_for(&self, owner: VideoId, values: &[V]) -> Result<(), DomainError> {
        if values.is_empty() {
            return Ok(());
        }
        let rows: Vec<Value> = values.iter().map(|v| self.row(owner, v)).collect();
        self.client.from(self.table).insert_minimal(&rows).await
    }

    async fn delete_for_many(&self, owners: &[VideoId]) -> Result<u64, DomainError> {
        if owners.is_empty() {
            return Ok(0);
        }
        self.client
            .from(self.table)
            .in_list(OWNER_COLUMN, owners)
            .delete()
            .await
    }
}
