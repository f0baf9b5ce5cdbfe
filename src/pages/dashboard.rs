use leptos::prelude::*;

use crate::components::ai_assistant::AiAssistant;
use crate::components::context::use_dashboard_config;
use crate::components::conversations::Conversations;
use crate::components::documents::Documents;
use crate::components::drive::Drive;
use crate::components::files::Files;
use crate::components::meet::Meet;
use crate::models::Cards;

pub const CARDS_PER_ROW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    Docs,
    Drive,
    Files,
    Conversations,
    Meet,
    Assistant,
}

/// The enabled cards in display order.
pub fn enabled_cards(cards: &Cards) -> Vec<Card> {
    [
        (cards.docs, Card::Docs),
        (cards.drive, Card::Drive),
        (cards.ocs, Card::Files),
        (cards.conversation, Card::Conversations),
        (cards.meet, Card::Meet),
        (cards.ai, Card::Assistant),
    ]
    .into_iter()
    .filter_map(|(enabled, card)| enabled.then_some(card))
    .collect()
}

fn render_card(card: Card) -> AnyView {
    match card {
        Card::Docs => view! { <Documents /> }.into_any(),
        Card::Drive => view! { <Drive /> }.into_any(),
        Card::Files => view! { <Files /> }.into_any(),
        Card::Conversations => view! { <Conversations /> }.into_any(),
        Card::Meet => view! { <Meet /> }.into_any(),
        Card::Assistant => view! {
            <section class="widget">
                <header class="widget-header">
                    <h2 class="widget-title">"AI Assistent"</h2>
                    <AiAssistant />
                </header>
                <div class="widget-body">
                    <p>"Stel een vraag aan de assistent."</p>
                </div>
            </section>
        }
        .into_any(),
    }
}

#[component]
pub fn Dashboard() -> impl IntoView {
    let cards = enabled_cards(&use_dashboard_config().cards);

    view! {
        <div class="dashboard">
            {cards
                .chunks(CARDS_PER_ROW)
                .map(|row| {
                    view! {
                        <div class="row">
                            {row
                                .iter()
                                .map(|card| view! { <div class="col">{render_card(*card)}</div> })
                                .collect_view()}
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_cards_keep_order() {
        let cards = Cards {
            ai: true,
            docs: true,
            meet: true,
            calendar: true,
            ..Default::default()
        };
        assert_eq!(
            enabled_cards(&cards),
            vec![Card::Docs, Card::Meet, Card::Assistant]
        );
        assert!(enabled_cards(&Cards::default()).is_empty());
    }

    #[test]
    fn test_rows_of_three() {
        let cards = Cards {
            ai: true,
            docs: true,
            drive: true,
            ocs: true,
            conversation: true,
            ..Default::default()
        };
        let enabled = enabled_cards(&cards);
        let rows: Vec<_> = enabled.chunks(CARDS_PER_ROW).map(<[Card]>::len).collect();
        assert_eq!(rows, vec![3, 2]);
    }
}
