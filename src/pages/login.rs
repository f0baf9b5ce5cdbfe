use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use super::errors::ErrorResult;

pub const LOGIN_URL: &str = "/api/v1/auth/login";
const AUTH_FAILED: &str = "authentication_failed";

/// `?error=authentication_failed` is set by the backend after a failed callback.
#[component]
pub fn Login() -> impl IntoView {
    let query = use_query_map();
    let failed = move || query.read().get("error").as_deref() == Some(AUTH_FAILED);

    move || {
        if failed() {
            view! {
                <ErrorResult
                    status="error"
                    title="Inloggen mislukt"
                    subtitle="Authenticatie is mislukt. Probeer het opnieuw."
                    button="Inloggen"
                    link=LOGIN_URL
                />
            }
        } else {
            view! {
                <ErrorResult
                    status="info"
                    title="Inloggen"
                    subtitle="Meld u aan om toegang te krijgen tot deze applicatie."
                    button="Inloggen"
                    link=LOGIN_URL
                />
            }
        }
    }
}
