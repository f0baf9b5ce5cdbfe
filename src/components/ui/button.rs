use leptos::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Ghost,
}

impl ButtonVariant {
    fn class(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "btn btn-primary",
            ButtonVariant::Secondary => "btn btn-secondary",
            ButtonVariant::Ghost => "btn btn-ghost",
        }
    }
}

#[component]
pub fn Button(
    #[prop(optional)] variant: ButtonVariant,
    #[prop(optional, into)] disabled: Signal<bool>,
    #[prop(optional, into)] class: String,
    #[prop(optional, into)] title: String,
    #[prop(optional)] on_click: Option<Callback<web_sys::MouseEvent>>,
    children: Children,
) -> impl IntoView {
    view! {
        <button
            class=format!("{} {}", variant.class(), class)
            title=title
            disabled=move || disabled.get()
            on:click=move |ev| {
                if !disabled.get_untracked() {
                    if let Some(handler) = on_click {
                        handler.run(ev);
                    }
                }
            }
        >
            {children()}
        </button>
    }
}

/// Square ghost button holding just an icon.
#[component]
pub fn IconButton(
    #[prop(into)] title: String,
    #[prop(optional, into)] class: String,
    on_click: Callback<web_sys::MouseEvent>,
    children: Children,
) -> impl IntoView {
    view! {
        <Button
            variant=ButtonVariant::Ghost
            class=format!("btn-icon {class}")
            title=title
            on_click=on_click
        >
            {children()}
        </Button>
    }
}

/// An anchor styled as a button, for navigation that leaves the app
/// (the login redirect, external applications).
#[component]
pub fn LinkButton(
    #[prop(optional)] variant: ButtonVariant,
    #[prop(into)] href: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    view! {
        <a class=format!("{} {}", variant.class(), class) href=href rel="external">
            {children()}
        </a>
    }
}
