use leptos::{prelude::*, task::spawn_local};
use leptos_icons::Icon;
use leptos_meta::Stylesheet;
use leptos_router::components::Outlet;
use log::{debug, warn};

use crate::api::{ApiClient, QueryParams};
use crate::components::context::{use_dashboard_config, AppProvider};
use crate::components::search_files::SearchFiles;
use crate::i18n::Locale;
use crate::models::{Application, Profile};

/// Frame around every authenticated page: header, application sidebar and
/// the routed content.
#[component]
pub fn DashboardLayout() -> impl IntoView {
    view! {
        <AppProvider>
            <div class="layout">
                <Header />
                <div class="layout-body">
                    <Sider />
                    <main class="content">
                        <Outlet />
                    </main>
                </div>
            </div>
        </AppProvider>
    }
}

#[component]
fn Header() -> impl IntoView {
    let config = use_dashboard_config();
    let client = use_context::<ApiClient>();
    let profile = RwSignal::new(None::<Profile>);

    Effect::new(move |_| {
        let Some(client) = client.clone() else {
            return;
        };
        spawn_local(async move {
            match client
                .get_typed::<Profile>("/auth/profile", &QueryParams::new())
                .await
            {
                Ok(p) => profile.set(Some(p)),
                Err(e) => debug!("No profile: {e}"),
            }
        });
    });

    let welcome = move || {
        profile
            .get()
            .and_then(|p| p.name)
            .map(|name| format!("Welkom {name}"))
            .unwrap_or_else(|| "Welkom".to_string())
    };

    view! {
        {config.theme_css.map(|href| view! { <Stylesheet id="theme" href=href /> })}
        <header class="header">
            <a href="/" class="logo">
                "Mijn Bureau"
            </a>
            <span class="welcome">{welcome}</span>
            <div class="header-actions">
                {config
                    .helpdesk_url
                    .map(|href| {
                        view! {
                            <a href=href target="_blank" rel="noopener noreferrer" title="Helpdesk">
                                <Icon icon=icondata_bs::BsQuestionCircle width="20" height="20" />
                            </a>
                        }
                    })}
                <LanguageSwitch />
            </div>
        </header>
    }
}

#[component]
fn Sider() -> impl IntoView {
    let applications: Vec<Application> = use_dashboard_config()
        .applications
        .into_iter()
        .filter(|app| app.enabled)
        .collect();

    view! {
        <nav class="sider">
            <SearchFiles />
            <ul class="sider-menu">
                {applications
                    .into_iter()
                    .map(|app| {
                        let (target, rel) = if app.iframe {
                            (None, None)
                        } else {
                            (Some("_blank"), Some("noopener noreferrer"))
                        };
                        view! {
                            <li>
                                <a href=app.href() target=target rel=rel>
                                    {app.label().to_string()}
                                </a>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </nav>
    }
}

/// Stores the chosen language and reloads, so every request built from
/// then on carries the new `Accept-Language`.
#[component]
fn LanguageSwitch() -> impl IntoView {
    let current = use_context::<Locale>().unwrap_or_default();

    view! {
        <select
            class="language-switch"
            title="Taal"
            on:change=move |ev| {
                let locale = Locale::new(event_target_value(&ev));
                locale.persist();
                if let Some(window) = web_sys::window() {
                    if let Err(e) = window.location().reload() {
                        warn!("Could not reload after switching language: {e:?}");
                    }
                }
            }
        >
            {["nl", "en"]
                .into_iter()
                .map(|tag| {
                    view! {
                        <option value=tag selected=current.as_str() == tag>
                            {tag.to_uppercase()}
                        </option>
                    }
                })
                .collect_view()}
        </select>
    }
}
