use leptos::prelude::*;
use leptos_icons::Icon;
use std::time::Duration;

const TOAST_DURATION: Duration = Duration::from_secs(5);

/// Handle for showing a toast from anywhere below the [`App`](crate::app::App).
#[derive(Clone, Copy)]
pub struct Notifier {
    message: RwSignal<String>,
    visible: RwSignal<bool>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            message: RwSignal::new(String::new()),
            visible: RwSignal::new(false),
        }
    }

    pub fn show(&self, message: impl Into<String>) {
        let visible = self.visible;
        self.message.set(message.into());
        visible.set(true);
        set_timeout(move || visible.set(false), TOAST_DURATION);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Transient notice in the corner of the screen.
#[component]
pub fn Toast(notifier: Notifier) -> impl IntoView {
    let Notifier { message, visible } = notifier;
    let class = move || {
        if visible.get() {
            "toast toast-visible"
        } else {
            "toast"
        }
    };

    view! {
        <div class=class role="status">
            <span>{move || message.get()}</span>
            <button class="toast-close" title="Sluiten" on:click=move |_| visible.set(false)>
                <Icon icon=icondata_bs::BsX width="16" height="16" />
            </button>
        </div>
    }
}
