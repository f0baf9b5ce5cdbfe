use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::context::use_dashboard_config;
use crate::pages::NotFound;

const SANDBOX: &str = "allow-same-origin allow-scripts allow-forms allow-popups \
    allow-popups-to-escape-sandbox allow-downloads allow-modals \
    allow-storage-access-by-user-activation";

/// Embeds the configured application whose id matches the route.
#[component]
pub fn ExternalApp() -> impl IntoView {
    let params = use_params_map();
    let config = use_dashboard_config();

    move || {
        let id = params.with(|p| p.get("app_id").unwrap_or_default());
        match config.application(&id).filter(|app| app.enabled) {
            Some(app) => view! {
                <div class="external-app">
                    <iframe
                        src=app.url.clone()
                        title=app.label().to_string()
                        allow="fullscreen"
                        sandbox=SANDBOX
                    ></iframe>
                </div>
            }
            .into_any(),
            None => view! { <NotFound /> }.into_any(),
        }
    }
}
