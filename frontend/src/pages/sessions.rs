use shared::api::{AppointmentPatch, NewAppointment};
use shared::models::Appointment;
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

#[function_component(Sessions)]
pub fn sessions() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not provided");
    let sync = {
        let store = ctx.store.clone();
        let session = ctx.session.clone();
        use_list_sync(move || ListSync::<Appointment, _>::new(store, session))
    };
    let draft = use_state(NewAppointment::default);
    let form_error = use_state(|| None::<String>);

    let state = sync.state();
    // Scheduled on top of the fold, everything else below; recomputed on
    // every render from the fetched list.
    let (upcoming, past) = views::split_by_flag(&state.items, |a: &Appointment| !a.is_upcoming());

    let on_date = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.date = input.value();
            draft.set(next);
        })
    };
    let on_time = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.time = input.value();
            draft.set(next);
        })
    };
    let on_notes = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.notes = input.value();
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
            let Some(moment) = current.moment_utc() else {
                form_error.set(Some("please pick a valid date and time".into()));
                return;
            };
            form_error.set(None);
            let Some(user) = session.current() else {
                return;
            };

            let notes = Some(current.notes).filter(|notes| !notes.is_empty());
            let record = Appointment::schedule(user.id, moment, notes);

            let sync = sync.clone();
            let draft = draft.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let vm = sync.view_model();
                if vm.create(&record).await.is_ok() {
                    draft.set(NewAppointment::default());
                }
                sync.publish();
            });
        })
    };

    let complete = |appointment: &Appointment| {
        let sync = sync.clone();
        let id = appointment.id;
        Callback::from(move |_| {
            let vm = sync.view_model();
            sync.run(async move { vm.update(id, &AppointmentPatch::mark_completed()).await });
        })
    };
    let delete = |appointment: &Appointment| {
        let sync = sync.clone();
        let id = appointment.id;
        Callback::from(move |_| {
            let vm = sync.view_model();
            sync.run(async move { vm.remove(id).await });
        })
    };

    let card = |appointment: &Appointment| {
        html! {
            <div class="session-card" key={appointment.id.to_string()}>
                <div class="session-date">
                    { appointment.date.format("%B %-d, %Y at %-I:%M %p").to_string() }
                </div>
                if let Some(notes) = &appointment.notes {
                    <div class="session-notes">{ notes }</div>
                }
                <div class="session-actions">
                    <Link<Route> to={Route::ReflectOn { id: appointment.id }}>
                        { "Reflect" }
                    </Link<Route>>
                    if appointment.is_upcoming() {
                        <button onclick={complete(appointment)}>{ "Mark completed" }</button>
                    }
                    <button class="session-delete" onclick={delete(appointment)}>{ "✕" }</button>
                </div>
            </div>
        }
    };

    html! {
        <div class="container">
            <h2>{ "Sessions" }</h2>
            <NoticeBanner message={state.notice.clone()} />

            <form class="session-form" onsubmit={onsubmit}>
                <NoticeBanner message={(*form_error).clone()} />
                <label>{ "Date" }
                    <input type="date" value={draft.date.clone()} oninput={on_date} />
                </label>
                <label>{ "Time" }
                    <input type="time" value={draft.time.clone()} oninput={on_time} />
                </label>
                <label>{ "Notes" }
                    <textarea value={draft.notes.clone()} oninput={on_notes} />
                </label>
                <button type="submit">{ "Schedule" }</button>
            </form>

            if !state.is_settled() {
                <Loader />
            } else {
                <h3>{ "Upcoming" }</h3>
                if upcoming.is_empty() {
                    <p class="empty">{ "Nothing scheduled." }</p>
                }
                { for upcoming.iter().copied().map(&card) }

                <h3>{ "Past" }</h3>
                { for past.iter().copied().map(&card) }
            }
        </div>
    }
}
