use shared::models::JournalEntry;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct JournalCardProps {
    pub entry: JournalEntry,
    pub on_delete: Callback<()>,
}

#[function_component(JournalCard)]
pub fn journal_card(props: &JournalCardProps) -> Html {
    let entry = &props.entry;
    let on_delete = props.on_delete.clone();
    let delete = Callback::from(move |_| on_delete.emit(()));

    html! {
        <div class="journal-card">
            <div class="journal-meta">
                <span class="journal-date">
                    { entry.created_at.format("%B %-d, %Y").to_string() }
                </span>
                <button class="journal-delete" onclick={delete}>{ "✕" }</button>
            </div>
            if let Some(prompt) = &entry.prompt {
                <div class="journal-prompt">{ prompt }</div>
            }
            <div class="journal-content">{ &entry.content }</div>
        </div>
    }
}
