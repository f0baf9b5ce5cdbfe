use leptos::{prelude::*, task::spawn_local};
use leptos_icons::Icon;

use crate::api::{ApiClient, QueryParams};
use crate::i18n::Locale;
use crate::models::SearchResult;

#[derive(Debug, Clone, PartialEq)]
enum Matches {
    Closed,
    Found(Vec<SearchResult>),
    NotFound,
}

impl Matches {
    fn from_results(results: Vec<SearchResult>) -> Self {
        if results.is_empty() {
            Matches::NotFound
        } else {
            Matches::Found(results)
        }
    }
}

/// File search in the sidebar; results open in place.
#[component]
pub fn SearchFiles() -> impl IntoView {
    let client = StoredValue::new(
        use_context::<ApiClient>().unwrap_or_else(|| ApiClient::new(Locale::default())),
    );
    let input = RwSignal::new(String::new());
    let matches = RwSignal::new(Matches::Closed);
    let loading = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let search = move || {
        let term = input.get_untracked();
        if term.trim().is_empty() {
            matches.set(Matches::Closed);
            return;
        }
        loading.set(true);
        error.set(None);
        let client = client.get_value();
        spawn_local(async move {
            let params = QueryParams::new().with("term", term);
            match client
                .get_typed::<Vec<SearchResult>>("/ocs/search", &params)
                .await
            {
                Ok(results) => matches.set(Matches::from_results(results)),
                Err(e) => error.set(Some(e.to_string())),
            }
            loading.set(false);
        });
    };

    view! {
        <div class="sider-search">
            <form on:submit=move |ev| {
                ev.prevent_default();
                search();
            }>
                <input
                    type="search"
                    placeholder="Bestanden zoeken..."
                    prop:value=move || input.get()
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        if value.is_empty() {
                            matches.set(Matches::Closed);
                        }
                        input.set(value);
                    }
                    on:blur=move |_| matches.set(Matches::Closed)
                />
                <button type="submit" class="btn btn-ghost btn-icon" title="Zoeken" disabled=move || loading.get()>
                    <Icon icon=icondata_bs::BsSearch width="16" height="16" />
                </button>
            </form>
            {move || match matches.get() {
                Matches::Closed => None,
                Matches::NotFound => {
                    Some(
                        view! {
                            <ul class="search-options">
                                <li class="search-option disabled">"Not Found"</li>
                            </ul>
                        }
                            .into_any(),
                    )
                }
                Matches::Found(results) => {
                    Some(
                        view! {
                            <ul class="search-options">
                                {results
                                    .into_iter()
                                    .map(|result| {
                                        view! {
                                            <li class="search-option" on:mousedown=|ev| ev.prevent_default()>
                                                <a href=result.url rel="external">{result.name}</a>
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        }
                            .into_any(),
                    )
                }
            }}
            <span class="side-search-error">
                {move || error.get().map(|e| format!("Error: {e}"))}
            </span>
        </div>
    }
}
