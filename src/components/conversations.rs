use leptos::prelude::*;
use leptos_icons::Icon;

use crate::api::QueryParams;
use crate::components::context::use_dashboard_config;
use crate::components::widget::{EmptyList, ListItem, Widget, PAGE_SIZE};
use crate::models::{format_timestamp, Conversation, Paginated};
use crate::refresh::use_fetch_with_refresh;

/// Earlier AI conversations.
#[component]
pub fn Conversations(#[prop(optional, into)] title: Option<String>) -> impl IntoView {
    let search = RwSignal::new(String::new());
    let page = RwSignal::new(1u32);

    let resource = use_fetch_with_refresh("/conversations/chats", move || {
        QueryParams::new()
            .with("page", page.get())
            .with("page_size", PAGE_SIZE)
            .with("title", search.get())
    });
    let chats = Memo::new(move |_| resource.page::<Conversation>());
    let app = use_dashboard_config().application("conversation").cloned();

    view! {
        <Widget
            title=title.unwrap_or_else(|| "AI gesprek".to_string())
            resource=resource
            app=app
            search=search
            page=page
            total=Signal::derive(move || chats.with(|c| c.count))
        >
            <ul class="widget-list">
                <For
                    each=move || chats.get().results
                    key=|chat| chat.id.clone()
                    children=move |chat| {
                        view! {
                            <ListItem
                                title=chat.title
                                href=chat.url
                                description=Some(
                                    format!("Laatst gewijzigd: {}", format_timestamp(&chat.updated_at)),
                                )
                                avatar=view! { <Icon icon=icondata_bs::BsChatDots width="18" height="18" /> }
                                    .into_any()
                            />
                        }
                    }
                />
            </ul>
            <Show when=move || chats.with(Paginated::is_empty)>
                <EmptyList />
            </Show>
        </Widget>
    }
}
