use leptos::prelude::*;

use crate::api::QueryParams;
use crate::components::context::use_dashboard_config;
use crate::components::widget::{EmptyList, ListItem, Widget, PAGE_SIZE};
use crate::models::Room;
use crate::refresh::use_fetch_with_refresh;

/// Rooms whose name contains `search`, ignoring case. Meet has no search
/// endpoint, so this runs on the page that was fetched.
pub fn filter_rooms(rooms: &[Room], search: &str) -> Vec<Room> {
    let needle = search.to_uppercase();
    rooms
        .iter()
        .filter(|room| room.name.to_uppercase().contains(&needle))
        .cloned()
        .collect()
}

fn initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

#[component]
pub fn Meet(#[prop(optional, into)] title: Option<String>) -> impl IntoView {
    let search = RwSignal::new(String::new());
    let page = RwSignal::new(1u32);

    let resource = use_fetch_with_refresh("/meet/rooms", move || {
        QueryParams::new()
            .with("page", page.get())
            .with("page_size", PAGE_SIZE)
    });
    let rooms = Memo::new(move |_| resource.page::<Room>());
    let visible = Memo::new(move |_| rooms.with(|r| filter_rooms(&r.results, &search.get())));
    let app = use_dashboard_config().application("meet").cloned();

    view! {
        <Widget
            title=title.unwrap_or_else(|| "Videoconferentie".to_string())
            resource=resource
            app=app
            search=search
            page=page
            total=Signal::derive(move || rooms.with(|r| r.count))
        >
            <ul class="widget-list">
                <For
                    each=move || visible.get()
                    key=|room| room.slug.clone()
                    children=move |room| {
                        let pin = room.pin_code.as_ref().map(|pin| format!("Pincode: {pin}"));
                        view! {
                            <ListItem
                                title=room.name.clone()
                                href=room.url
                                description=pin
                                avatar=view! { <span class="avatar-initial">{initial(&room.name)}</span> }
                                    .into_any()
                            />
                        }
                    }
                />
            </ul>
            <Show when=move || visible.with(Vec::is_empty)>
                <EmptyList />
            </Show>
        </Widget>
    }
}
