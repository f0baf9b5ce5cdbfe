use leptos::{prelude::*, task::spawn_local};
use leptos_icons::Icon;

use crate::api::{ApiClient, QueryParams};
use crate::components::context::use_dashboard_config;
use crate::components::widget::{EmptyList, ListItem, Widget};
use crate::i18n::Locale;
use crate::models::{format_timestamp, Activity, SearchResult};
use crate::refresh::use_fetch_with_refresh;

#[derive(Debug, Clone, PartialEq)]
struct FileRow {
    title: String,
    href: Option<String>,
    description: Option<String>,
}

impl From<Activity> for FileRow {
    fn from(activity: Activity) -> Self {
        FileRow {
            title: activity.object_name,
            href: activity.url,
            description: Some(format!(
                "Gemaakt op: {}",
                format_timestamp(&activity.datetime)
            )),
        }
    }
}

impl From<SearchResult> for FileRow {
    fn from(result: SearchResult) -> Self {
        FileRow {
            title: result.name,
            href: Some(result.url),
            description: None,
        }
    }
}

/// Recent file activity; a search term swaps the feed for search results.
#[component]
pub fn Files(#[prop(optional, into)] title: Option<String>) -> impl IntoView {
    let client = StoredValue::new(
        use_context::<ApiClient>().unwrap_or_else(|| ApiClient::new(Locale::default())),
    );
    let search = RwSignal::new(String::new());
    let found = RwSignal::new(None::<Result<Vec<SearchResult>, String>>);

    let resource = use_fetch_with_refresh("/ocs/activities", QueryParams::new);
    let activities = Memo::new(move |_| resource.list::<Activity>());
    let app = use_dashboard_config().application("ocs").cloned();

    Effect::new(move |_| {
        let term = search.get();
        if term.trim().is_empty() {
            found.set(None);
            return;
        }
        let client = client.get_value();
        spawn_local(async move {
            let params = QueryParams::new().with("term", term.clone());
            let result = client
                .get_typed::<Vec<SearchResult>>("/ocs/search", &params)
                .await
                .map_err(|e| e.to_string());
            // a newer term replaced this one while it was in flight
            if search.get_untracked() == term {
                found.set(Some(result));
            }
        });
    });

    let rows = move || -> Vec<FileRow> {
        match found.get() {
            Some(Ok(results)) => results.into_iter().map(FileRow::from).collect(),
            Some(Err(_)) => Vec::new(),
            None => activities.get().into_iter().map(FileRow::from).collect(),
        }
    };

    view! {
        <Widget
            title=title.unwrap_or_else(|| "Bestanden".to_string())
            resource=resource
            app=app
            search=search
        >
            {move || {
                found
                    .get()
                    .and_then(Result::err)
                    .map(|e| view! { <p class="widget-warning">{format!("Error: {e}")}</p> })
            }}
            {move || {
                let rows = rows();
                if rows.is_empty() {
                    return view! { <EmptyList /> }.into_any();
                }
                view! {
                    <ul class="widget-list">
                        {rows
                            .into_iter()
                            .map(|row| {
                                view! {
                                    <ListItem
                                        title=row.title
                                        href=row.href
                                        description=row.description
                                        avatar=view! { <Icon icon=icondata_bs::BsFileEarmark width="18" height="18" /> }
                                            .into_any()
                                    />
                                }
                            })
                            .collect_view()}
                    </ul>
                }
                    .into_any()
            }}
        </Widget>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_row_shows_creation_time() {
        let row = FileRow::from(Activity {
            activity_id: 7,
            object_name: "/Financien/begroting.xlsx".to_string(),
            subject: None,
            url: Some("https://files.example/f/40".to_string()),
            datetime: "2025-05-01T09:30:00+00:00".to_string(),
        });
        assert_eq!(row.title, "/Financien/begroting.xlsx");
        assert_eq!(row.href.as_deref(), Some("https://files.example/f/40"));
        assert_eq!(row.description.as_deref(), Some("Gemaakt op: 01-05-2025 09:30"));
    }

    #[test]
    fn test_search_row_links_to_result() {
        let row = FileRow::from(SearchResult {
            name: "notulen.docx".to_string(),
            url: "https://files.example/notulen.docx".to_string(),
        });
        assert_eq!(
            row,
            FileRow {
                title: "notulen.docx".to_string(),
                href: Some("https://files.example/notulen.docx".to_string()),
                description: None,
            }
        );
    }
}
