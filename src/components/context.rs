use leptos::{prelude::*, task::spawn_local};
use leptos_router::hooks::use_navigate;
use log::{error, warn};

use crate::api::{ApiClient, ConfigFailure, QueryParams};
use crate::components::toast::Notifier;
use crate::config::{get_refresh_settings, RefreshSettings};
use crate::i18n::Locale;
use crate::models::DashboardConfig;

/// Loads the dashboard configuration once and makes it, the API client and
/// the refresh settings available to everything below it.
///
/// A failed config load redirects: `401` to the login page, `500` to the
/// error page, anything else to not-found.
#[component]
pub fn AppProvider(children: ChildrenFn) -> impl IntoView {
    let client = ApiClient::new(Locale::load_preference());
    provide_context(client.locale().clone());
    provide_context(client.clone());

    let loaded = RwSignal::new(None::<(DashboardConfig, RefreshSettings)>);
    let notifier = use_context::<Notifier>().unwrap_or_default();
    let navigate = use_navigate();

    Effect::new(move |_| {
        let client = client.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let settings = match get_refresh_settings().await {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Using default refresh settings: {e}");
                    RefreshSettings::default()
                }
            };
            match client
                .get_typed::<DashboardConfig>("/config", &QueryParams::new())
                .await
            {
                Ok(config) => loaded.set(Some((config, settings))),
                Err(e) => {
                    error!("Failed to load dashboard config: {e}");
                    let failure = ConfigFailure::from_error(&e);
                    if failure != ConfigFailure::Unauthorized {
                        notifier.show(format!("Configuratie laden mislukt: {e}"));
                    }
                    navigate(failure.redirect_path(), Default::default());
                }
            }
        });
    });

    view! {
        {move || match loaded.get() {
            Some((config, settings)) => {
                provide_context(config);
                provide_context(settings);
                children().into_any()
            }
            None => view! { <div class="app-loading">"Laden..."</div> }.into_any(),
        }}
    }
}

/// The loaded configuration; empty outside an [`AppProvider`].
pub fn use_dashboard_config() -> DashboardConfig {
    use_context::<DashboardConfig>().unwrap_or_default()
}
