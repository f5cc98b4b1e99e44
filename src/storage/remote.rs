use super::EntryStore;
use crate::{
    error::{JournalError, Result},
    import_export::{ExportDocument, ImportDocument, ImportedEntry},
    model::{Entry, EntryDraft, MonthSummary, SearchHit},
};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Once;
use std::time::Duration;
use url::Url;

#[derive(Serialize)]
struct CreateBody<'a> {
    date: &'a str,
    #[serde(flatten)]
    draft: &'a EntryDraft,
}

#[derive(Deserialize)]
struct CreatedBody {
    id: String,
}

#[derive(Deserialize)]
struct ImportedBody {
    count: usize,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Entry store backed by a running journal API server.
///
/// Anything that stops a request from getting an answer (refused
/// connection, timeout, server error, garbled body) is reported as
/// [`JournalError::Transport`]; 400 and 404 answers keep their meaning.
pub struct RemoteStore {
    base: Url,
    client: Client,
}

impl RemoteStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        install_crypto_provider();

        let base = Url::parse(base_url)
            .map_err(|e| JournalError::Config(format!("Invalid API URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(JournalError::Config(format!(
                "Invalid API URL '{}': not a base URL",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| JournalError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| JournalError::Config(format!("Invalid API URL '{}'", self.base)))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn send(&self, request: RequestBuilder, subject: &str) -> Result<Response> {
        let response = request
            .send()
            .map_err(|e| JournalError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());
        tracing::debug!(status = %status, message = %message, "Remote store rejected request");

        match status {
            StatusCode::BAD_REQUEST => Err(JournalError::Validation(message)),
            StatusCode::NOT_FOUND => Err(JournalError::NotFound(subject.to_string())),
            _ => Err(JournalError::Transport(format!("{} ({})", message, status))),
        }
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json()
            .map_err(|e| JournalError::Transport(format!("Unexpected response body: {}", e)))
    }
}

impl EntryStore for RemoteStore {
    fn get_by_date(&self, date: &str) -> Result<Entry> {
        let mut url = self.url(&["entries"])?;
        url.query_pairs_mut().append_pair("date", date);
        let response = self.send(self.client.get(url), &format!("No entry for {}", date))?;
        Self::decode(response)
    }

    fn list_by_month(&self, year: i32, month: u32) -> Result<Vec<MonthSummary>> {
        let mut url = self.url(&["entries", "by-month"])?;
        url.query_pairs_mut()
            .append_pair("year", &year.to_string())
            .append_pair("month", &month.to_string());
        let response = self.send(self.client.get(url), "month")?;
        Self::decode(response)
    }

    fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let mut url = self.url(&["entries", "search"])?;
        url.query_pairs_mut().append_pair("q", query);
        let response = self.send(self.client.get(url), "search")?;
        Self::decode(response)
    }

    fn create_or_replace(&self, date: &str, draft: &EntryDraft) -> Result<String> {
        let url = self.url(&["entries"])?;
        let body = CreateBody { date, draft };
        let response = self.send(self.client.post(url).json(&body), date)?;
        let created: CreatedBody = Self::decode(response)?;
        tracing::info!(id = %created.id, date = %date, "Saved entry remotely");
        Ok(created.id)
    }

    fn update(&self, id: &str, draft: &EntryDraft) -> Result<()> {
        let url = self.url(&["entries", id])?;
        self.send(self.client.put(url).json(draft), id)?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let url = self.url(&["entries", id])?;
        self.send(self.client.delete(url), id)?;
        Ok(())
    }

    fn export_all(&self) -> Result<Vec<Entry>> {
        let url = self.url(&["export"])?;
        let response = self.send(self.client.get(url), "export")?;
        let document: ExportDocument = Self::decode(response)?;
        Ok(document.entries)
    }

    fn import_entries(&self, entries: &[ImportedEntry]) -> Result<usize> {
        let url = self.url(&["import"])?;
        let body = ImportDocument {
            entries: entries.to_vec(),
        };
        let response = self.send(self.client.post(url).json(&body), "import")?;
        let imported: ImportedBody = Self::decode(response)?;
        Ok(imported.count)
    }
}

/// reqwest is built without a default TLS crypto provider; pick ring once
/// per process.
fn install_crypto_provider() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        // Err only means another provider was installed first
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
