use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::extract::FromRef;
        use leptos::prelude::LeptosOptions;

        use crate::config::ServerSettings;

        #[derive(FromRef, Clone)]
        pub struct AppState {
            pub leptos_options: LeptosOptions,
            pub settings: ServerSettings,
            pub http: reqwest::Client,
        }

        impl AppState {
            /// The backend client leaves redirects to the browser so the
            /// login flow keeps working through the proxy.
            pub fn new(
                leptos_options: LeptosOptions,
                settings: ServerSettings,
            ) -> Result<Self, reqwest::Error> {
                let http = reqwest::Client::builder()
                    .redirect(reqwest::redirect::Policy::none())
                    .build()?;
                Ok(Self {
                    leptos_options,
                    settings,
                    http,
                })
            }
        }
    }
}
