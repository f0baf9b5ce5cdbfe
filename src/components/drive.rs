use leptos::prelude::*;
use leptos_icons::Icon;

use crate::api::QueryParams;
use crate::components::context::use_dashboard_config;
use crate::components::widget::{EmptyList, ListItem, Widget, PAGE_SIZE};
use crate::models::{format_timestamp, DriveItem, Paginated};
use crate::refresh::use_fetch_with_refresh;

#[component]
pub fn Drive(#[prop(optional, into)] title: Option<String>) -> impl IntoView {
    let favorite = RwSignal::new(false);
    let search = RwSignal::new(String::new());
    let page = RwSignal::new(1u32);

    let resource = use_fetch_with_refresh("/drive/documents", move || {
        QueryParams::new()
            .with("title", search.get())
            .with("favorite", favorite.get())
            .with("page", page.get())
            .with("page_size", PAGE_SIZE)
    });
    let files = Memo::new(move |_| resource.page::<DriveItem>());
    let app = use_dashboard_config().application("drive").cloned();

    view! {
        <Widget
            title=title.unwrap_or_else(|| "Drive".to_string())
            resource=resource
            app=app
            favorite=favorite
            search=search
            page=page
            total=Signal::derive(move || files.with(|f| f.count))
        >
            <ul class="widget-list">
                <For
                    each=move || files.get().results
                    key=|file| file.id.clone()
                    children=move |file| {
                        let description = file
                            .updated_at
                            .as_deref()
                            .map(|at| format!("Laatste wijziging: {}", format_timestamp(at)));
                        view! {
                            <ListItem
                                title=file.title
                                href=file.url
                                description=description
                                avatar=view! { <Icon icon=icondata_bs::BsFileImage width="18" height="18" /> }
                                    .into_any()
                            />
                        }
                    }
                />
            </ul>
            <Show when=move || files.with(Paginated::is_empty)>
                <EmptyList />
            </Show>
        </Widget>
    }
}
