use futures::StreamExt;
use leptos::{prelude::*, task::spawn_local};
use leptos_icons::Icon;
use log::{debug, error};

use crate::api::ApiClient;
use crate::components::markdown::MarkdownRenderer;
use crate::components::ui::IconButton;
use crate::i18n::Locale;
use crate::stream::{ChatSession, CHAT_COMPLETIONS_PATH};

/// Snapshot of a chat session for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
struct Transcript {
    messages: Vec<String>,
    error: Option<String>,
    streaming: bool,
}

impl Transcript {
    fn of(session: &ChatSession) -> Self {
        Self {
            messages: session.messages().to_vec(),
            error: session.error().map(str::to_string),
            streaming: session.is_streaming(),
        }
    }
}

/// Drawer with a prompt box; the answer streams in as markdown.
#[component]
pub fn AiAssistant() -> impl IntoView {
    let client = StoredValue::new(
        use_context::<ApiClient>().unwrap_or_else(|| ApiClient::new(Locale::default())),
    );
    let session = StoredValue::new_local(ChatSession::new());
    let transcript = RwSignal::new(Transcript::default());
    let open = RwSignal::new(false);
    let prompt = RwSignal::new(String::new());

    // applies `f` and republishes the transcript, unless a newer question
    // has been asked in the meantime
    let update = move |turn: u64, f: &mut dyn FnMut(&mut ChatSession)| -> bool {
        session
            .try_update_value(|s| {
                if s.turn() != turn {
                    return false;
                }
                f(s);
                transcript.set(Transcript::of(s));
                s.is_streaming()
            })
            .unwrap_or(false)
    };

    let ask = move |text: String| {
        let Some((turn, request)) = session.try_update_value(|s| {
            let request = s.submit(&text);
            transcript.set(Transcript::of(s));
            request.map(|r| (s.turn(), r))
        })
        .flatten() else {
            return;
        };
        let client = client.get_value();

        spawn_local(async move {
            debug!("Asking assistant (turn {turn})");
            let mut body = match client.post_stream(CHAT_COMPLETIONS_PATH, &request).await {
                Ok(body) => body,
                Err(e) => {
                    error!("Chat request failed: {e}");
                    update(turn, &mut |s| s.fail(e.to_string()));
                    return;
                }
            };
            let mut opened = None;
            if !update(turn, &mut |s| opened = s.open(body.take())) {
                return;
            }
            let Some(mut body) = opened else {
                return;
            };
            loop {
                let mut read = body.next().await;
                if !update(turn, &mut |s| s.step(read.take())) {
                    break;
                }
            }
        });
    };

    view! {
        <IconButton title="AI Assistent" on_click=Callback::new(move |_| open.set(true))>
            <Icon icon=icondata_bs::BsRobot width="20" height="20" />
        </IconButton>
        <aside class="drawer" class:drawer-open=move || open.get() aria-hidden=move || (!open.get()).to_string()>
            <header class="drawer-header">
                <h2>"AI Assistent"</h2>
                <IconButton title="Sluiten" on_click=Callback::new(move |_| open.set(false))>
                    <Icon icon=icondata_bs::BsX width="20" height="20" />
                </IconButton>
            </header>
            <form
                class="drawer-prompt"
                on:submit=move |ev| {
                    ev.prevent_default();
                    ask(prompt.get_untracked());
                }
            >
                <input
                    type="search"
                    placeholder="Typ je vraag hier..."
                    prop:value=move || prompt.get()
                    on:input=move |ev| prompt.set(event_target_value(&ev))
                    disabled=move || transcript.with(|t| t.streaming)
                />
            </form>
            <hr />
            {move || {
                transcript
                    .with(|t| t.error.clone())
                    .map(|error| {
                        view! {
                            <div class="widget-warning" role="alert">
                                <Icon icon=icondata_bs::BsExclamationTriangle width="20" height="20" />
                                <span>{error}</span>
                            </div>
                        }
                    })
            }}
            <For
                each=move || transcript.with(|t| (0..t.messages.len()).collect::<Vec<_>>())
                key=|i| *i
                children=move |i| {
                    let content = Signal::derive(move || {
                        transcript.with(|t| t.messages.get(i).cloned().unwrap_or_default())
                    });
                    view! {
                        <div class="message">
                            <MarkdownRenderer content=content />
                        </div>
                    }
                }
            />
        </aside>
    }
}
