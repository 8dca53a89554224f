use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Error;
use crate::model::SessionRecord;
use crate::sync::{RemoteEntry, SessionStore};

use super::models::{
    remote_entry_from_page, CreatePageRequest, DatabaseParent, DatabaseSchema, EntryProperties,
    PageRef, QueryRequest, QueryResponse, UpdatePageRequest,
};

const API_BASE_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
const QUERY_PAGE_SIZE: u32 = 100;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Blocking client for the Notion REST API, scoped to one database.
pub struct NotionClient {
    http: Client,
    api_key: String,
    database_id: String,
}

impl NotionClient {
    pub fn new(api_key: &str, database_id: &str) -> Result<Self, Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(NotionClient {
            http,
            api_key: api_key.to_string(),
            database_id: database_id.to_string(),
        })
    }

    /// Retrieve the database definition. Handy for checking that the expected
    /// columns exist with the right property types before a first sync.
    pub fn retrieve_schema(&self) -> Result<DatabaseSchema, Error> {
        let url = format!("{API_BASE_URL}/databases/{}", self.database_id);
        self.execute(self.http.get(&url))
    }

    fn query_page(&self, cursor: Option<&str>) -> Result<QueryResponse, Error> {
        let url = format!("{API_BASE_URL}/databases/{}/query", self.database_id);
        let body = QueryRequest {
            page_size: QUERY_PAGE_SIZE,
            start_cursor: cursor,
        };
        self.execute(self.http.post(&url).json(&body))
    }

    fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Notion-Version", NOTION_VERSION)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(Error::Api { status, message });
        }

        Ok(response.json()?)
    }
}

impl SessionStore for NotionClient {
    /// Fetch every entry in the database, following pagination until a
    /// response stops supplying a cursor.
    fn fetch_entries(&self) -> Result<Vec<RemoteEntry>, Error> {
        let mut entries: Vec<RemoteEntry> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let batch = self.query_page(cursor.as_deref())?;
            let next = batch.next_page_cursor().map(str::to_string);

            for page in batch.results {
                match remote_entry_from_page(&page)? {
                    Some(entry) => entries.push(entry),
                    None => debug!("skipping page {} with blank Animal ID", page.id),
                }
            }

            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!("{} remote entries fetched", entries.len());
        Ok(entries)
    }

    fn create_entry(&self, record: &SessionRecord) -> Result<(), Error> {
        let url = format!("{API_BASE_URL}/pages");
        let body = CreatePageRequest {
            parent: DatabaseParent {
                database_id: self.database_id.clone(),
            },
            properties: EntryProperties::from_record(record),
        };

        let page: PageRef = self.execute(self.http.post(&url).json(&body))?;
        debug!(
            "created page {} for {}/{}",
            page.id, record.animal_id, record.session_name
        );
        Ok(())
    }

    fn update_entry(&self, entry_id: &str, record: &SessionRecord) -> Result<(), Error> {
        let url = format!("{API_BASE_URL}/pages/{entry_id}");
        let body = UpdatePageRequest {
            properties: EntryProperties::from_record(record),
        };

        let page: PageRef = self.execute(self.http.patch(&url).json(&body))?;
        debug!(
            "updated page {} for {}/{}",
            page.id, record.animal_id, record.session_name
        );
        Ok(())
    }
}
