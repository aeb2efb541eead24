use chrono::Utc;
use shared::api::NewJournalEntry;
use shared::models::JournalEntry;
use sync::ListSync;
use validator::Validate;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::journal_card::JournalCard;
use crate::components::loader::Loader;
use crate::components::notice::{validation_message, NoticeBanner};
use crate::context::AppContext;
use crate::hooks::use_list_sync;

const PROMPTS: &[&str] = &[
    "What made you feel grounded today?",
    "What is something you are avoiding, and why?",
    "Describe a moment this week you are proud of.",
    "What would you tell a friend in your situation?",
    "What drained your energy today? What restored it?",
    "What is one thing you can let go of?",
    "When did you last feel truly at ease?",
    "What do you need more of right now?",
];

#[function_component(Journal)]
pub fn journal() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not provided");
    let sync = {
        let store = ctx.store.clone();
        let session = ctx.session.clone();
        use_list_sync(move || ListSync::<JournalEntry, _>::new(store, session))
    };
    let draft = use_state(NewJournalEntry::default);
    let form_error = use_state(|| None::<String>);
    let search = use_state(String::new);
    // Seed the rotation from the clock so each visit starts on a
    // different prompt.
    let prompt_index = use_state(|| Utc::now().timestamp() as usize % PROMPTS.len());

    let state = sync.state();
    let needle = (*search).clone();
    let entries: Vec<&JournalEntry> = state
        .items
        .iter()
        .filter(|entry| entry.matches(&needle))
        .collect();

    let prompt = PROMPTS[*prompt_index % PROMPTS.len()];

    let next_prompt = {
        let prompt_index = prompt_index.clone();
        Callback::from(move |_| prompt_index.set(*prompt_index + 1))
    };
    let on_content = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.content = input.value();
            draft.set(next);
        })
    };
    let on_search = {
        let search = search.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search.set(input.value());
        })
    };

    let onsubmit = {
        let sync = sync.clone();
        let draft = draft.clone();
        let form_error = form_error.clone();
        let session = ctx.session.clone();
        let prompt = prompt.to_owned();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let current = (*draft).clone();
            if let Err(errors) = current.validate() {
                form_error.set(Some(validation_message(&errors)));
                return;
            }
            form_error.set(None);
            let Some(user) = session.current() else {
                return;
            };

            let record = JournalEntry::new(user.id, current.content, Some(prompt.clone()));
            let sync = sync.clone();
            let draft = draft.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let vm = sync.view_model();
                if vm.create(&record).await.is_ok() {
                    draft.set(NewJournalEntry::default());
                }
                sync.publish();
            });
        })
    };

    let delete = |entry: &JournalEntry| {
        let sync = sync.clone();
        let id = entry.id;
        Callback::from(move |_| {
            let vm = sync.view_model();
            sync.run(async move { vm.remove(id).await });
        })
    };

    html! {
        <div class="container">
            <h2>{ "Journal" }</h2>
            <NoticeBanner message={state.notice.clone()} />

            <form class="journal-form" onsubmit={onsubmit}>
                <NoticeBanner message={(*form_error).clone()} />
                <div class="journal-prompt-box">
                    <span>{ prompt }</span>
                    <button type="button" onclick={next_prompt}>{ "Another prompt" }</button>
                </div>
                <textarea
                    placeholder="Write freely…"
                    value={draft.content.clone()}
                    oninput={on_content}
                />
                <button type="submit">{ "Save entry" }</button>
            </form>

            <input
                class="journal-search"
                placeholder="Search your entries"
                value={(*search).clone()}
                oninput={on_search}
            />

            if !state.is_settled() {
                <Loader />
            } else if entries.is_empty() {
                <p class="empty">
                    { if needle.is_empty() { "No entries yet." } else { "No entries match." } }
                </p>
            } else {
                { for entries.iter().copied().map(|entry| html! {
                    <JournalCard
                        key={entry.id.to_string()}
                        entry={(*entry).clone()}
                        on_delete={delete(entry)}
                    />
                }) }
            }
        </div>
    }
}
