use leptos::prelude::*;

use crate::components::ui::LinkButton;

/// Full-page message with one way out.
#[component]
pub fn ErrorResult(
    #[prop(into)] status: String,
    #[prop(into)] title: String,
    #[prop(into)] subtitle: String,
    #[prop(into)] button: String,
    #[prop(into)] link: String,
) -> impl IntoView {
    view! {
        <div class=format!("result result-{status}")>
            <h1 class="result-title">{title}</h1>
            <p class="result-subtitle">{subtitle}</p>
            <LinkButton href=link>{button}</LinkButton>
        </div>
    }
}

#[component]
pub fn NotFound() -> impl IntoView {
    // set an HTTP status code 404
    // this is feature gated because it can only be done during
    // initial server-side rendering
    #[cfg(feature = "ssr")]
    {
        if let Some(resp) = use_context::<leptos_axum::ResponseOptions>() {
            resp.set_status(axum::http::StatusCode::NOT_FOUND);
        }
    }

    view! {
        <ErrorResult
            status="404"
            title="404"
            subtitle="Er is iets mis gegaan"
            button="Terug naar homepagina"
            link="/"
        />
    }
}

#[component]
pub fn ServerError() -> impl IntoView {
    view! {
        <ErrorResult
            status="500"
            title="500"
            subtitle="Er is een fout opgetreden op de server."
            button="Terug naar homepagina"
            link="/"
        />
    }
}
