use shared::api::NewCheckIn;
use shared::models::DailyCheckIn;
use sync::{views, ListSync};
use validator::Validate;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::loader::Loader;
use crate::components::notice::{validation_message, NoticeBanner};
use crate::context::AppContext;
use crate::hooks::use_list_sync;
use crate::router::Route;

/// Today's check-in. The list is scoped to the current calendar day, so
/// it holds at most one record; the date filter is recomputed on every
/// fetch and rolls over at midnight.
#[function_component(Home)]
pub fn home() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not provided");
    let sync = {
        let store = ctx.store.clone();
        let session = ctx.session.clone();
        use_list_sync(move || {
            ListSync::<DailyCheckIn, _>::new(store, session)
                .with_query(|query| query.and_eq("date", views::today()))
        })
    };
    let draft = use_state(NewCheckIn::default);
    let form_error = use_state(|| None::<String>);

    let state = sync.state();
    let today = state.items.first().cloned();

    let on_mood = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.mood = input.value();
            draft.set(next);
        })
    };
    let on_focus = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.focus = input.value();
            draft.set(next);
        })
    };
    let on_energy = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.energy = input.value().parse().ok();
            draft.set(next);
        })
    };
    let on_stress = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.stress = input.value().parse().ok();
            draft.set(next);
        })
    };
    let on_notes = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.notes = Some(input.value()).filter(|value| !value.is_empty());
            draft.set(next);
        })
    };

    let onsubmit = {
        let sync = sync.clone();
        let draft = draft.clone();
        let form_error = form_error.clone();
        let session = ctx.session.clone();
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

            let mut record =
                DailyCheckIn::for_day(user.id, views::today(), current.mood, current.focus);
            record.energy = current.energy;
            record.stress = current.stress;
            record.notes = current.notes;

            let sync = sync.clone();
            let draft = draft.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let vm = sync.view_model();
                if vm
                    .upsert(&record, DailyCheckIn::CONFLICT_COLUMNS)
                    .await
                    .is_ok()
                {
                    draft.set(NewCheckIn::default());
                }
                sync.publish();
            });
        })
    };

    html! {
        <div class="container">
            <h2>{ "How are you today?" }</h2>
            <NoticeBanner message={state.notice.clone()} />
            if !state.is_settled() {
                <Loader />
            } else if let Some(check_in) = today {
                <div class="checkin-done">
                    <p>{ "You already checked in today." }</p>
                    <div class="checkin-summary">
                        <div>{ format!("Mood: {}", check_in.mood) }</div>
                        <div>{ format!("Focus: {}", check_in.focus) }</div>
                        if let Some(energy) = check_in.energy {
                            <div>{ format!("Energy: {energy}/10") }</div>
                        }
                        if let Some(stress) = check_in.stress {
                            <div>{ format!("Stress: {stress}/10") }</div>
                        }
                        if let Some(notes) = &check_in.notes {
                            <div class="checkin-notes">{ notes }</div>
                        }
                    </div>
                </div>
            } else {
                <form class="checkin-form" onsubmit={onsubmit}>
                    <NoticeBanner message={(*form_error).clone()} />
                    <label>{ "Mood" }
                        <input value={draft.mood.clone()} oninput={on_mood} />
                    </label>
                    <label>{ "Focus for today" }
                        <input value={draft.focus.clone()} oninput={on_focus} />
                    </label>
                    <label>{ "Energy (0–10)" }
                        <input
                            type="range"
                            min="0"
                            max="10"
                            value={draft.energy.unwrap_or(NewCheckIn::MID_SCALE).to_string()}
                            oninput={on_energy}
                        />
                    </label>
                    <label>{ "Stress (0–10)" }
                        <input
                            type="range"
                            min="0"
                            max="10"
                            value={draft.stress.unwrap_or(NewCheckIn::MID_SCALE).to_string()}
                            oninput={on_stress}
                        />
                    </label>
                    <label>{ "Notes" }
                        <textarea value={draft.notes.clone().unwrap_or_default()} oninput={on_notes} />
                    </label>
                    <button type="submit">{ "Check in" }</button>
                </form>
            }
            <nav class="quick-links">
                <Link<Route> to={Route::Journal}>{ "Write in your journal" }</Link<Route>>
                <Link<Route> to={Route::Topics}>{ "Something to discuss?" }</Link<Route>>
                <Link<Route> to={Route::Goals}>{ "Check your goals" }</Link<Route>>
            </nav>
        </div>
    }
}
