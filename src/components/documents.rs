use leptos::prelude::*;
use leptos_icons::Icon;

use crate::api::QueryParams;
use crate::components::context::use_dashboard_config;
use crate::components::widget::{EmptyList, ListItem, Widget, PAGE_SIZE};
use crate::models::{format_timestamp, Document, Paginated};
use crate::refresh::use_fetch_with_refresh;

/// Recent documents from Docs, with title search and a favourites filter.
#[component]
pub fn Documents(#[prop(optional, into)] title: Option<String>) -> impl IntoView {
    let favorite = RwSignal::new(false);
    let search = RwSignal::new(String::new());
    let page = RwSignal::new(1u32);

    let resource = use_fetch_with_refresh("/docs/documents", move || {
        QueryParams::new()
            .with("favorite", favorite.get())
            .with("title", search.get())
            .with("page", page.get())
            .with("page_size", PAGE_SIZE)
    });
    let docs = Memo::new(move |_| resource.page::<Document>());
    let app = use_dashboard_config().application("docs").cloned();

    view! {
        <Widget
            title=title.unwrap_or_else(|| "Docs".to_string())
            resource=resource
            app=app
            favorite=favorite
            search=search
            page=page
            total=Signal::derive(move || docs.with(|d| d.count))
        >
            <ul class="widget-list">
                <For
                    each=move || docs.get().results
                    key=|doc| doc.id.clone()
                    children=move |doc| {
                        let modified = doc
                            .updated_date
                            .clone()
                            .unwrap_or_else(|| format_timestamp(&doc.updated_at));
                        view! {
                            <ListItem
                                title=doc.title
                                href=doc.url
                                description=Some(format!("Laatst gewijzigd: {modified}"))
                                avatar=view! { <Icon icon=icondata_bs::BsFileText width="18" height="18" /> }
                                    .into_any()
                            />
                        }
                    }
                />
            </ul>
            <Show when=move || docs.with(Paginated::is_empty)>
                <EmptyList />
            </Show>
        </Widget>
    }
}
