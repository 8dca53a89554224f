use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::SessionRecord;
use crate::sync::RemoteEntry;

/// Page properties in the shape the Notion pages API expects. The full set is
/// sent on both create and update so a synced entry always carries every
/// column, including an empty Notes value when nothing is missing.
#[derive(Debug, Serialize)]
pub struct EntryProperties {
    #[serde(rename = "Animal ID")]
    animal_id: TitleValue,
    #[serde(rename = "Session Name")]
    session_name: RichTextValue,
    #[serde(rename = "Status")]
    status: SelectValue,
    #[serde(rename = "Path")]
    path: UrlValue,
    #[serde(rename = "Notes")]
    notes: RichTextValue,
}

impl EntryProperties {
    pub fn from_record(record: &SessionRecord) -> Self {
        EntryProperties {
            animal_id: TitleValue {
                title: vec![TextFragment::new(&record.animal_id)],
            },
            session_name: RichTextValue {
                rich_text: vec![TextFragment::new(&record.session_name)],
            },
            status: SelectValue {
                select: SelectOption {
                    name: record.status.as_str().to_string(),
                },
            },
            path: UrlValue {
                url: record.path.clone(),
            },
            notes: RichTextValue {
                rich_text: vec![TextFragment::new(&record.comment)],
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct TitleValue {
    title: Vec<TextFragment>,
}

#[derive(Debug, Serialize)]
struct RichTextValue {
    rich_text: Vec<TextFragment>,
}

#[derive(Debug, Serialize)]
struct SelectValue {
    select: SelectOption,
}

#[derive(Debug, Serialize)]
struct SelectOption {
    name: String,
}

#[derive(Debug, Serialize)]
struct UrlValue {
    url: String,
}

#[derive(Debug, Serialize)]
struct TextFragment {
    text: TextContent,
}

#[derive(Debug, Serialize)]
struct TextContent {
    content: String,
}

impl TextFragment {
    fn new(content: &str) -> Self {
        TextFragment {
            text: TextContent {
                content: content.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct CreatePageRequest {
    pub parent: DatabaseParent,
    pub properties: EntryProperties,
}

#[derive(Debug, Serialize)]
pub struct DatabaseParent {
    pub database_id: String,
}

#[derive(Debug, Serialize)]
pub struct UpdatePageRequest {
    pub properties: EntryProperties,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<Page>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

impl QueryResponse {
    /// Cursor for the next query page, if the fetch should continue. A
    /// response claiming more results without a cursor would refetch the
    /// first page forever, so it ends the fetch instead.
    pub fn next_page_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.next_cursor.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl Page {
    /// First plain-text fragment of the named property, whether it holds a
    /// title or rich text. `None` when the property is absent or empty.
    pub fn plain_text(&self, property: &str) -> Option<&str> {
        let value = self.properties.get(property)?;
        let fragments = value.title.as_ref().or(value.rich_text.as_ref())?;
        fragments
            .first()
            .map(|fragment| fragment.plain_text.as_str())
    }
}

/// Property value as returned by the query endpoint. Only the text-bearing
/// shapes are decoded; select and url payloads are never read back.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyValue {
    pub title: Option<Vec<RichTextFragment>>,
    pub rich_text: Option<Vec<RichTextFragment>>,
}

#[derive(Debug, Deserialize)]
pub struct RichTextFragment {
    pub plain_text: String,
}

/// Reduce a fetched page to the identity the synchronizer needs. A page
/// whose "Animal ID" title is blank cannot be addressed by identity and
/// yields `None`; an addressable page without a "Session Name" value is a
/// data-shape error.
pub fn remote_entry_from_page(page: &Page) -> Result<Option<RemoteEntry>, Error> {
    let animal_id = match page.plain_text("Animal ID") {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => return Ok(None),
    };

    let session_name = page
        .plain_text("Session Name")
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::MissingProperty {
            page_id: page.id.clone(),
            property: "Session Name".to_string(),
        })?;

    Ok(Some(RemoteEntry {
        id: page.id.clone(),
        animal_id,
        session_name,
    }))
}

/// Acknowledgement body from page create and update calls.
#[derive(Debug, Deserialize)]
pub struct PageRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSchema {
    pub properties: HashMap<String, PropertySchema>,
}

#[derive(Debug, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionStatus;

    fn record() -> SessionRecord {
        SessionRecord {
            animal_id: "M1".to_string(),
            session_name: "S1".to_string(),
            status: SessionStatus::Ready,
            path: "/data/M1/S1".to_string(),
            comment: String::new(),
        }
    }

    #[test]
    fn entry_properties_serialize_in_page_shape() {
        let value = serde_json::to_value(EntryProperties::from_record(&record())).unwrap();

        assert_eq!(
            value.pointer("/Animal ID/title/0/text/content").unwrap(),
            "M1"
        );
        assert_eq!(
            value
                .pointer("/Session Name/rich_text/0/text/content")
                .unwrap(),
            "S1"
        );
        assert_eq!(
            value.pointer("/Status/select/name").unwrap(),
            "ready for analysis"
        );
        assert_eq!(value.pointer("/Path/url").unwrap(), "/data/M1/S1");
        assert_eq!(value.pointer("/Notes/rich_text/0/text/content").unwrap(), "");
    }

    #[test]
    fn query_request_omits_absent_cursor() {
        let first = serde_json::to_value(QueryRequest {
            page_size: 100,
            start_cursor: None,
        })
        .unwrap();
        assert!(first.get("start_cursor").is_none());

        let next = serde_json::to_value(QueryRequest {
            page_size: 100,
            start_cursor: Some("cursor-1"),
        })
        .unwrap();
        assert_eq!(next.get("start_cursor").unwrap(), "cursor-1");
    }

    #[test]
    fn next_page_cursor_requires_more_and_a_cursor() {
        let keep_going = QueryResponse {
            results: vec![],
            has_more: true,
            next_cursor: Some("cursor-2".to_string()),
        };
        assert_eq!(keep_going.next_page_cursor(), Some("cursor-2"));

        let done = QueryResponse {
            results: vec![],
            has_more: false,
            next_cursor: None,
        };
        assert_eq!(done.next_page_cursor(), None);

        // has_more with no cursor must end the fetch, not restart it.
        let broken = QueryResponse {
            results: vec![],
            has_more: true,
            next_cursor: None,
        };
        assert_eq!(broken.next_page_cursor(), None);
    }

    fn page(json: &str) -> Page {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn well_formed_page_becomes_a_remote_entry() {
        let page = page(
            r#"{
                "id": "page-1",
                "properties": {
                    "Animal ID": { "type": "title", "title": [ { "plain_text": "M1" } ] },
                    "Session Name": { "type": "rich_text", "rich_text": [ { "plain_text": "S1" } ] }
                }
            }"#,
        );

        let entry = remote_entry_from_page(&page).unwrap().unwrap();
        assert_eq!(entry.id, "page-1");
        assert_eq!(entry.animal_id, "M1");
        assert_eq!(entry.session_name, "S1");
    }

    #[test]
    fn blank_title_page_is_not_addressable() {
        let empty_title = page(
            r#"{
                "id": "blank-1",
                "properties": {
                    "Animal ID": { "type": "title", "title": [] },
                    "Session Name": { "type": "rich_text", "rich_text": [ { "plain_text": "S1" } ] }
                }
            }"#,
        );
        assert_eq!(remote_entry_from_page(&empty_title).unwrap(), None);

        let no_properties = page(r#"{ "id": "blank-2", "properties": {} }"#);
        assert_eq!(remote_entry_from_page(&no_properties).unwrap(), None);
    }

    #[test]
    fn addressable_page_without_session_name_is_an_error() {
        let missing = page(
            r#"{
                "id": "bad-1",
                "properties": {
                    "Animal ID": { "type": "title", "title": [ { "plain_text": "M1" } ] },
                    "Session Name": { "type": "rich_text", "rich_text": [] }
                }
            }"#,
        );

        match remote_entry_from_page(&missing).unwrap_err() {
            Error::MissingProperty { page_id, property } => {
                assert_eq!(page_id, "bad-1");
                assert_eq!(property, "Session Name");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn page_plain_text_reads_first_fragment() {
        let page: Page = serde_json::from_str(
            r#"{
                "id": "abc-123",
                "properties": {
                    "Animal ID": { "type": "title", "title": [ { "plain_text": "M1" } ] },
                    "Session Name": { "type": "rich_text", "rich_text": [] }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(page.plain_text("Animal ID"), Some("M1"));
        assert_eq!(page.plain_text("Session Name"), None);
        assert_eq!(page.plain_text("Status"), None);
    }

    #[test]
    fn database_schema_decodes_property_types() {
        let schema: DatabaseSchema = serde_json::from_str(
            r#"{
                "object": "database",
                "properties": {
                    "Animal ID": { "id": "title", "type": "title", "title": {} },
                    "Status": { "id": "abc", "type": "select", "select": { "options": [] } }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(schema.properties["Animal ID"].kind, "title");
        assert_eq!(schema.properties["Status"].kind, "select");
    }
}
