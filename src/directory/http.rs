//! HTTP directory client for a people-match REST API.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::DirectoryConfig;
use crate::directory::{DirectoryClient, PersonMatch, PersonSummary};
use crate::error::DirectoryError;

/// Per-request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Error bodies are clipped to this many characters before reporting.
const ERROR_BODY_LIMIT: usize = 100;

/// Directory client backed by a people-match REST API.
pub struct HttpDirectoryClient {
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl HttpDirectoryClient {
    pub fn new(config: DirectoryConfig) -> Self {
        Self {
            base_url: config.base_url,
            api_key: config.api_key,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.base_url)
    }

    async fn send<T>(&self, request: reqwest::RequestBuilder) -> Result<T, DirectoryError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = request
            .header("Cache-Control", "no-cache")
            .header("X-Api-Key", self.api_key.expose_secret())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        match status {
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(DirectoryError::RateLimited),
            reqwest::StatusCode::UNAUTHORIZED => Err(DirectoryError::AuthFailed),
            _ if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(DirectoryError::Http {
                    status: status.as_u16(),
                    body: clip(&body),
                })
            }
            _ => response
                .json()
                .await
                .map_err(|e| DirectoryError::InvalidResponse(e.to_string())),
        }
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn match_person(
        &self,
        first_name: &str,
        last_name: &str,
        company: &str,
    ) -> Result<Option<PersonMatch>, DirectoryError> {
        let body = serde_json::json!({
            "first_name": first_name,
            "last_name": last_name,
            "organization_name": company,
        });

        let envelope: PersonEnvelope = self
            .send(self.client.post(self.api_url("people/match")).json(&body))
            .await?;
        Ok(envelope.person.map(PersonRecord::into_match))
    }

    async fn person_by_id(&self, id: &str) -> Result<Option<PersonMatch>, DirectoryError> {
        let envelope: PersonEnvelope = self
            .send(self.client.get(self.api_url(&format!("people/{id}"))))
            .await?;
        Ok(envelope.person.map(PersonRecord::into_match))
    }

    async fn search_people(
        &self,
        company: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PersonSummary>, DirectoryError> {
        let body = serde_json::json!({
            "organization_name": company,
            "page": page,
            "per_page": per_page,
        });

        let envelope: PeopleEnvelope = self
            .send(self.client.post(self.api_url("people/search")).json(&body))
            .await?;
        Ok(envelope
            .people
            .into_iter()
            .map(PersonRecord::into_summary)
            .collect())
    }
}

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PersonEnvelope {
    #[serde(default)]
    person: Option<PersonRecord>,
}

#[derive(Debug, Deserialize)]
struct PeopleEnvelope {
    #[serde(default)]
    people: Vec<PersonRecord>,
}

#[derive(Debug, Deserialize)]
struct PersonRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl PersonRecord {
    fn into_match(self) -> PersonMatch {
        PersonMatch {
            id: self.id,
            email: self.email,
        }
    }

    fn into_summary(self) -> PersonSummary {
        PersonSummary {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email,
        }
    }
}

fn map_transport(e: reqwest::Error) -> DirectoryError {
    if e.is_timeout() {
        DirectoryError::Timeout(REQUEST_TIMEOUT_SECS)
    } else {
        DirectoryError::Transport(e.to_string())
    }
}

fn clip(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn client() -> HttpDirectoryClient {
        HttpDirectoryClient::new(DirectoryConfig {
            base_url: "https://directory.test".to_string(),
            api_key: SecretString::from("test-key".to_string()),
        })
    }

    #[test]
    fn api_url_construction() {
        let c = client();
        assert_eq!(
            c.api_url("people/match"),
            "https://directory.test/v1/people/match"
        );
        assert_eq!(
            c.api_url("people/abc123"),
            "https://directory.test/v1/people/abc123"
        );
    }

    #[test]
    fn person_envelope_with_null_person() {
        let envelope: PersonEnvelope = serde_json::from_str(r#"{"person": null}"#).unwrap();
        assert!(envelope.person.is_none());

        let envelope: PersonEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.person.is_none());
    }

    #[test]
    fn person_envelope_with_partial_record() {
        let envelope: PersonEnvelope =
            serde_json::from_str(r#"{"person": {"id": "abc", "name": "ignored"}}"#).unwrap();
        let record = envelope.person.unwrap();
        assert_eq!(record.id.as_deref(), Some("abc"));
        assert!(record.email.is_none());
    }

    #[test]
    fn people_envelope_defaults_to_empty() {
        let envelope: PeopleEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.people.is_empty());
    }

    #[test]
    fn summary_fills_missing_names() {
        let record: PersonRecord =
            serde_json::from_str(r#"{"email": "ann.lee@acme.com"}"#).unwrap();
        let summary = record.into_summary();
        assert_eq!(summary.first_name, "");
        assert_eq!(summary.last_name, "");
        assert_eq!(summary.email.as_deref(), Some("ann.lee@acme.com"));
    }

    #[test]
    fn error_bodies_are_clipped() {
        let long_body = "x".repeat(500);
        assert_eq!(clip(&long_body).len(), ERROR_BODY_LIMIT);
        assert_eq!(clip("short"), "short");
    }
}
