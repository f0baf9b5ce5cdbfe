use chrono::{DateTime, NaiveDateTime};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// The `{count, results}` envelope every list endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize"))]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub results: Vec<T>,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            count: 0,
            results: Vec::new(),
        }
    }
}

impl<T> Paginated<T> {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl<T: DeserializeOwned> Paginated<T> {
    /// Decodes an untyped payload; anything that doesn't fit is an empty page.
    pub fn from_value(value: &Value) -> Self {
        match serde_json::from_value(value.clone()) {
            Ok(page) => page,
            Err(e) => {
                if !value.as_array().is_some_and(|a| a.is_empty()) {
                    log::debug!("Payload is not a page: {e}");
                }
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    pub updated_at: String,
    #[serde(default)]
    pub updated_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub pin_code: Option<String>,
}

/// Decodes an untyped payload that should be a plain JSON list.
pub fn list_from_value<T: DeserializeOwned>(value: &Value) -> Vec<T> {
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        log::debug!("Payload is not a list: {e}");
        Vec::new()
    })
}

/// One entry of the recent file activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub activity_id: i64,
    #[serde(alias = "object_filename")]
    pub object_name: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub datetime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub url: String,
}

/// Formats a backend timestamp as `DD-MM-YYYY HH:mm`; unparseable values
/// are shown as-is.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d-%m-%Y %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%d-%m-%Y %H:%M").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_from_value() {
        let value = json!({
            "count": 7,
            "results": [{
                "id": "d1",
                "title": "Notulen",
                "url": "https://docs.example/d1",
                "mimetype": null,
                "updated_at": "2025-05-01T09:30:00+00:00"
            }]
        });
        let page = Paginated::<Document>::from_value(&value);
        assert_eq!(page.count, 7);
        assert_eq!(page.results[0].title, "Notulen");
    }

    #[test]
    fn test_page_without_results_decodes() {
        let page = Paginated::<Room>::from_value(&json!({ "count": 2 }));
        assert_eq!(page.count, 2);
        assert!(page.is_empty());
    }

    #[test]
    fn test_activities_from_value() {
        let value = json!([{
            "activity_id": 12,
            "app": "files",
            "type": "file_changed",
            "user": "jan",
            "subject": "Jan heeft begroting.xlsx gewijzigd",
            "message": "",
            "link": "https://files.example/apps/files/?dir=/",
            "object_type": "files",
            "object_id": 40,
            "object_name": "/Financien/begroting.xlsx",
            "datetime": "2025-05-01T09:30:00+00:00",
            "url": "https://files.example/f/40"
        }]);
        let activities: Vec<Activity> = list_from_value(&value);
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].object_name, "/Financien/begroting.xlsx");
        assert_eq!(activities[0].url.as_deref(), Some("https://files.example/f/40"));
        assert_eq!(format_timestamp(&activities[0].datetime), "01-05-2025 09:30");

        let renamed: Vec<Activity> = list_from_value(&json!([{
            "activity_id": 13,
            "object_filename": "notulen.docx",
            "datetime": "2025-05-02T10:00:00+00:00"
        }]));
        assert_eq!(renamed[0].object_name, "notulen.docx");
    }

    #[test]
    fn test_list_from_page_payload_is_empty() {
        let value = json!({ "count": 1, "results": [] });
        assert!(list_from_value::<Activity>(&value).is_empty());
        assert!(list_from_value::<Activity>(&json!([])).is_empty());
    }

    #[test]
    fn test_initial_empty_payload_is_empty_page() {
        let page = Paginated::<Room>::from_value(&json!([]));
        assert_eq!(page, Paginated::default());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2025-05-01T09:30:00+00:00"), "01-05-2025 09:30");
        assert_eq!(format_timestamp("2025-05-01T09:30:00.123"), "01-05-2025 09:30");
        assert_eq!(format_timestamp("gisteren"), "gisteren");
    }
}
