use leptos::prelude::*;
use leptos_icons::Icon;

use crate::components::ui::IconButton;
use crate::models::Application;
use crate::refresh::RefreshableResource;

/// Items per widget page.
pub const PAGE_SIZE: u32 = 3;

pub fn page_count(total: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Dashboard card around one refreshable resource.
///
/// When the resource has an error the body is replaced by an inline warning.
/// The search box, favourite toggle and pager only show up when the matching
/// signal is passed in.
#[component]
pub fn Widget(
    #[prop(into)] title: String,
    resource: RefreshableResource,
    #[prop(default = None)] app: Option<Application>,
    #[prop(optional)] search: Option<RwSignal<String>>,
    #[prop(optional)] favorite: Option<RwSignal<bool>>,
    #[prop(optional)] page: Option<RwSignal<u32>>,
    #[prop(optional, into)] total: Signal<u32>,
    children: ChildrenFn,
) -> impl IntoView {
    let heading = match app {
        Some(app) => {
            let (target, rel) = if app.iframe {
                (None, None)
            } else {
                (Some("_blank"), Some("noopener noreferrer"))
            };
            view! {
                <a class="widget-title-link" href=app.href() target=target rel=rel>
                    {title}
                    <Icon icon=icondata_bs::BsArrowRight width="14" height="14" />
                </a>
            }
            .into_any()
        }
        None => view! { <span>{title}</span> }.into_any(),
    };

    let filters = move || {
        if search.is_none() && favorite.is_none() {
            return None;
        }
        Some(view! {
            <div class="widget-search-row">
                {search.map(|search| view! { <SearchBox search=search page=page /> })}
                {favorite
                    .map(|favorite| {
                        view! {
                            <button
                                class="btn btn-ghost btn-icon"
                                title="Favorieten"
                                on:click=move |_| {
                                    favorite.update(|f| *f = !*f);
                                    if let Some(page) = page {
                                        page.set(1);
                                    }
                                }
                            >
                                {move || {
                                    if favorite.get() {
                                        view! { <Icon icon=icondata_bs::BsStarFill width="16" height="16" /> }
                                            .into_any()
                                    } else {
                                        view! { <Icon icon=icondata_bs::BsStar width="16" height="16" /> }
                                            .into_any()
                                    }
                                }}
                            </button>
                        }
                    })}
            </div>
        })
    };

    view! {
        <section class="widget">
            <header class="widget-header">
                <h2 class="widget-title">{heading}</h2>
                <IconButton title="Vernieuwen" on_click=Callback::new(move |_| resource.refetch())>
                    <Icon icon=icondata_bs::BsArrowClockwise width="16" height="16" />
                </IconButton>
            </header>
            <Show
                when=move || resource.error().is_empty()
                fallback=move || {
                    view! {
                        <div class="widget-warning" role="alert">
                            <Icon icon=icondata_bs::BsExclamationTriangle width="20" height="20" />
                            <span>{move || resource.error()}</span>
                        </div>
                    }
                }
            >
                <div class="widget-body">
                    {filters()}
                    {move || resource.loading().then(|| view! { <WidgetLoading /> })}
                    <div class="widget-content" class:hidden=move || resource.loading()>
                        {children()}
                    </div>
                    {page.map(|page| view! { <Pager page=page total=total /> })}
                </div>
            </Show>
        </section>
    }
}

/// Search field that applies on Enter or on the search button.
#[component]
fn SearchBox(search: RwSignal<String>, page: Option<RwSignal<u32>>) -> impl IntoView {
    let value = RwSignal::new(search.get_untracked());
    let apply = move || {
        search.set(value.get_untracked());
        if let Some(page) = page {
            page.set(1);
        }
    };

    view! {
        <div class="widget-search">
            <input
                type="search"
                prop:value=move || value.get()
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    let cleared = text.is_empty();
                    value.set(text);
                    if cleared {
                        apply();
                    }
                }
                on:keydown=move |ev| {
                    if ev.key() == "Enter" {
                        apply();
                    }
                }
            />
            <button class="btn btn-ghost btn-icon" title="Zoeken" on:click=move |_| apply()>
                <Icon icon=icondata_bs::BsSearch width="14" height="14" />
            </button>
        </div>
    }
}

/// Page switcher, shown once there is more than one page.
#[component]
fn Pager(page: RwSignal<u32>, total: Signal<u32>) -> impl IntoView {
    let pages = move || page_count(total.get(), PAGE_SIZE);

    view! {
        <Show when=move || { total.get() > PAGE_SIZE }>
            <nav class="widget-pagination">
                <button
                    class="btn btn-ghost btn-icon"
                    title="Vorige"
                    disabled=move || page.get() <= 1
                    on:click=move |_| page.update(|p| *p = p.saturating_sub(1).max(1))
                >
                    <Icon icon=icondata_bs::BsChevronLeft width="14" height="14" />
                </button>
                <span>{move || format!("{} / {}", page.get(), pages())}</span>
                <button
                    class="btn btn-ghost btn-icon"
                    title="Volgende"
                    disabled=move || page.get() >= pages()
                    on:click=move |_| page.update(|p| *p = (*p + 1).min(pages()))
                >
                    <Icon icon=icondata_bs::BsChevronRight width="14" height="14" />
                </button>
            </nav>
        </Show>
    }
}

#[component]
fn WidgetLoading() -> impl IntoView {
    view! {
        <ul class="widget-list widget-list-loading">
            {(0..PAGE_SIZE).map(|_| view! { <li class="skeleton"></li> }).collect_view()}
        </ul>
    }
}

/// List row: avatar, linked title and an optional description.
#[component]
pub fn ListItem(
    #[prop(into)] title: String,
    href: Option<String>,
    #[prop(default = None)] description: Option<String>,
    avatar: AnyView,
) -> impl IntoView {
    view! {
        <li class="widget-item">
            <span class="avatar">{avatar}</span>
            <div class="widget-item-meta">
                <a href=href target="_blank" rel="noopener noreferrer">{title}</a>
                {description.map(|d| view! { <span class="widget-item-description">{d}</span> })}
            </div>
        </li>
    }
}

#[component]
pub fn EmptyList() -> impl IntoView {
    view! { <p class="widget-empty">"Geen items"</p> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, PAGE_SIZE), 1);
        assert_eq!(page_count(3, PAGE_SIZE), 1);
        assert_eq!(page_count(4, PAGE_SIZE), 2);
        assert_eq!(page_count(9, PAGE_SIZE), 3);
        assert_eq!(page_count(5, 0), 1);
    }
}
