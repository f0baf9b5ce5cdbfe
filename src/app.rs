use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{ParentRoute, Route, Router, Routes},
    path, StaticSegment,
};

use crate::components::external_app::ExternalApp;
use crate::components::layout::DashboardLayout;
use crate::components::toast::{Notifier, Toast};
use crate::pages::{Dashboard, Login, NotFound, ServerError};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="nl">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    let notifier = Notifier::new();
    provide_context(notifier);

    view! {
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/mijn-bureau.css" />
        <Title text="Mijn Bureau" />
        <Router>
            <Routes fallback=|| view! { <NotFound /> }>
                <Route path=path!("login") view=Login />
                <Route path=path!("not-found") view=NotFound />
                <Route path=path!("500") view=ServerError />
                <ParentRoute path=StaticSegment("") view=DashboardLayout>
                    <Route path=StaticSegment("") view=Dashboard />
                    <Route path=path!(":app_id") view=ExternalApp />
                </ParentRoute>
            </Routes>
        </Router>
        <Toast notifier />
    }
}
