//! Minimal PostgREST client for the hosted Supabase tables.
//!
//! The client is built once by the composition root and shared by reference
//! (it is cheap to clone: `reqwest::Client` is reference-counted).

use std::fmt::Display;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::DomainError;

const USER_AGENT: &str = concat!("video-catalog/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: reqwest::Client,
    rest_url: Url,
    api_key: String,
}

/// Error body returned by PostgREST on non-2xx responses
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
    code: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

impl SupabaseClient {
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self, DomainError> {
        let mut base = Url::parse(endpoint).map_err(|e| {
            DomainError::Validation(format!("Invalid backend URL '{}': {}", endpoint, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(DomainError::Validation(format!(
                "Invalid backend URL '{}'",
                endpoint
            )));
        }
        // Without a trailing slash, join would replace the last path segment
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rest_url = base
            .join("rest/v1/")
            .map_err(|e| DomainError::Validation(e.to_string()))?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            http,
            rest_url,
            api_key: api_key.to_string(),
        })
    }

    /// Start a query against one table
    pub fn from(&self, table: &str) -> TableQuery<'_> {
        TableQuery {
            client: self,
            table: table.to_string(),
            filters: Vec::new(),
            order: None,
        }
    }

    fn request(&self, method: Method, table: &str) -> Result<RequestBuilder, DomainError> {
        let url = self
            .rest_url
            .join(table)
            .map_err(|e| DomainError::Internal(format!("Bad table name '{}': {}", table, e)))?;

        Ok(self
            .http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key))
    }
}

/// A single-table statement under construction: filters, ordering, then one
/// of select/insert/update/delete. Each statement commits on its own.
pub struct TableQuery<'a> {
    client: &'a SupabaseClient,
    table: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
}

impl<'a> TableQuery<'a> {
    /// `column = value`
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value)));
        self
    }

    /// `column IN (values)`
    pub fn in_list<V: Display>(mut self, column: &str, values: &[V]) -> Self {
        let list = values
            .iter()
            .map(|v| quote_list_item(&v.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        self.filters
            .push((column.to_string(), format!("in.({})", list)));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{}.{}", column, dir));
        self
    }

    pub async fn select<T: DeserializeOwned>(self) -> Result<Vec<T>, DomainError> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }

        let resp = self
            .client
            .request(Method::GET, &self.table)?
            .query(&params)
            .send()
            .await?;

        decode(resp, &self.table).await
    }

    /// Insert `rows` and return the stored representation
    pub async fn insert<B, T>(self, rows: &[B]) -> Result<Vec<T>, DomainError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .request(Method::POST, &self.table)?
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;

        decode(resp, &self.table).await
    }

    /// Insert rows without reading anything back
    pub async fn insert_minimal<B: Serialize>(self, rows: &[B]) -> Result<(), DomainError> {
        let resp = self
            .client
            .request(Method::POST, &self.table)?
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;

        check(resp, &self.table).await.map(|_| ())
    }

    pub async fn update<B, T>(self, patch: &B) -> Result<Vec<T>, DomainError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.require_filter("update")?;

        let resp = self
            .client
            .request(Method::PATCH, &self.table)?
            .query(&self.filters)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;

        decode(resp, &self.table).await
    }

    /// Delete matching rows and return how many were removed
    pub async fn delete(self) -> Result<u64, DomainError> {
        self.require_filter("delete")?;

        let resp = self
            .client
            .request(Method::DELETE, &self.table)?
            .query(&self.filters)
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let rows: Vec<serde_json::Value> = decode(resp, &self.table).await?;
        Ok(rows.len() as u64)
    }

    fn require_filter(&self, action: &str) -> Result<(), DomainError> {
        if self.filters.is_empty() {
            return Err(DomainError::Validation(format!(
                "Refusing unfiltered {} on '{}'",
                action, self.table
            )));
        }
        Ok(())
    }
}

/// PostgREST list items are quoted when they contain reserved characters
fn quote_list_item(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| matches!(c, ',' | '(' | ')' | '"' | '\\' | ' ' | '.' | ':'));
    if !needs_quotes {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

async fn check(resp: Response, table: &str) -> Result<Response, DomainError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<PostgrestError>(&body) {
        Ok(err) => {
            tracing::debug!(
                "PostgREST error on '{}': code={:?} details={:?} hint={:?}",
                table,
                err.code,
                err.details,
                err.hint
            );
            err.message.unwrap_or_else(|| status.to_string())
        }
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => body,
    };

    Err(DomainError::External(message))
}

async fn decode<T: DeserializeOwned>(resp: Response, table: &str) -> Result<Vec<T>, DomainError> {
    let resp = check(resp, table).await?;
    let body = resp.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| DomainError::External(format!("Unexpected response from '{}': {}", table, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_list_item() {
        assert_eq!(quote_list_item("42"), "42");
        assert_eq!(quote_list_item("beginner"), "beginner");
        assert_eq!(quote_list_item("short game"), "\"short game\"");
        assert_eq!(quote_list_item("a,b"), "\"a,b\"");
        assert_eq!(quote_list_item("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote_list_item(""), "\"\"");
    }

    #[test]
    fn test_rest_url_is_derived_from_endpoint() {
        let timeout = Duration::from_secs(1);

        let client = SupabaseClient::new("https://demo.supabase.co", "key", timeout).unwrap();
        assert_eq!(client.rest_url.as_str(), "https://demo.supabase.co/rest/v1/");

        let client = SupabaseClient::new("https://demo.supabase.co/", "key", timeout).unwrap();
        assert_eq!(client.rest_url.as_str(), "https://demo.supabase.co/rest/v1/");
    }

    #[test]
    fn test_rest_url_keeps_endpoint_path() {
        let timeout = Duration::from_secs(1);

        let client = SupabaseClient::new("https://host/proxy", "key", timeout).unwrap();
        assert_eq!(client.rest_url.as_str(), "https://host/proxy/rest/v1/");

        let client = SupabaseClient::new("https://host/proxy/", "key", timeout).unwrap();
        assert_eq!(client.rest_url.as_str(), "https://host/proxy/rest/v1/");
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let err = SupabaseClient::new("not a url", "key", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unfiltered_delete_is_refused() {
        let client =
            SupabaseClient::new("http://127.0.0.1:9", "key", Duration::from_secs(1)).unwrap();
        let err = client.from("tags").delete().await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
