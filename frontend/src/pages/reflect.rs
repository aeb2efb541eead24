use shared::api::ReflectionDraft;
use shared::flows;
use shared::models::{Appointment, SessionReflection};
use sync::ListSync;
use uuid::Uuid;
use validator::Validate;
use yew::prelude::*;

use crate::components::loader::Loader;
use crate::components::notice::{validation_message, NoticeBanner};
use crate::context::AppContext;
use crate::hooks::use_list_sync;

#[derive(Properties, PartialEq)]
pub struct ReflectProps {
    /// Set when arriving from a session card; `None` is an ad-hoc
    /// reflection written outside any appointment.
    #[prop_or_default]
    pub appointment_id: Option<Uuid>,
}

/// Session check-in: four free-text prompts saved as one reflection.
///
/// Appointment-linked reflections are canonical (saving again revises the
/// same record); ad-hoc ones accumulate and are listed below the form.
#[function_component(Reflect)]
pub fn reflect(props: &ReflectProps) -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not provided");
    let appointment_id = props.appointment_id;

    let sync = {
        let store = ctx.store.clone();
        let session = ctx.session.clone();
        use_list_sync(move || {
            let vm = ListSync::<SessionReflection, _>::new(store, session);
            match appointment_id {
                Some(id) => vm.with_query(move |query| query.and_eq("appointment_id", id)),
                None => vm,
            }
        })
    };
    let draft = use_state(ReflectionDraft::default);
    let form_error = use_state(|| None::<String>);
    let saved = use_state(|| false);
    let prefilled = use_state(|| false);
    let appointment = use_state(|| None::<Appointment>);

    let state = sync.state();

    // Fetch the linked session so its date, status, and notes sit above
    // the form.
    {
        let store = ctx.store.clone();
        let session = ctx.session.clone();
        let appointment = appointment.clone();
        use_effect_with(appointment_id, move |_| {
            let Some(id) = appointment_id else {
                return;
            };
            let Some(user) = session.current() else {
                return;
            };
            wasm_bindgen_futures::spawn_local(async move {
                match flows::find_appointment(&store, &user.id, id).await {
                    Ok(found) => appointment.set(found),
                    Err(err) => {
                        tracing::error!(error = %err, "failed to load appointment");
                    }
                }
            });
        });
    }

    // Revisiting a linked reflection starts from the stored text, once.
    {
        let draft = draft.clone();
        let prefilled = prefilled.clone();
        let existing = state.items.first().cloned();
        use_effect_with(state.items.first().map(|r| r.id), move |_| {
            if appointment_id.is_some() && !*prefilled {
                if let Some(existing) = existing {
                    draft.set(ReflectionDraft::from_reflection(&existing));
                    prefilled.set(true);
                }
            }
            || ()
        });
    }

    let field = |label: &str,
                 value: String,
                 update: Box<dyn Fn(&mut ReflectionDraft, String)>| {
        let draft = draft.clone();
        let saved = saved.clone();
        let oninput = Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            update(&mut next, input.value());
            draft.set(next);
            saved.set(false);
        });
        html! {
            <label>{ label.to_owned() }
                <textarea value={value} oninput={oninput} />
            </label>
        }
    };

    let onsubmit = {
        let sync = sync.clone();
        let draft = draft.clone();
        let form_error = form_error.clone();
        let saved = saved.clone();
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

            let mut record = SessionReflection::new(user.id, appointment_id);
            record.feeling = current.feeling;
            record.takeaways = current.takeaways;
            record.topics_discussed = current.topics_discussed;
            record.progress = current.progress;

            let sync = sync.clone();
            let form_error = form_error.clone();
            let saved = saved.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let vm = sync.view_model();
                match flows::save_reflection(vm.store(), &record).await {
                    Ok(_) => {
                        saved.set(true);
                        vm.load().await;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to save reflection");
                        form_error.set(Some(err.to_string()));
                    }
                }
                sync.publish();
            });
        })
    };

    // "Prepare" before the session, "reflection" afterwards, matching
    // the session's current status.
    let heading = match (&*appointment, appointment_id) {
        (Some(linked), _) if linked.is_upcoming() => "Prepare for your session",
        (Some(_), _) => "Session reflection",
        (None, Some(_)) => "Session check-in",
        (None, None) => "Reflect",
    };

    html! {
        <div class="container">
            <h2>{ heading }</h2>
            if let Some(linked) = &*appointment {
                <div class="session-context">
                    <div class="session-date">
                        { linked.date.format("%B %-d, %Y at %-I:%M %p").to_string() }
                    </div>
                    <span class={format!("session-badge badge-{:?}", linked.status).to_lowercase()}>
                        { format!("{:?}", linked.status) }
                    </span>
                    if let Some(notes) = &linked.notes {
                        <div class="session-notes">{ notes }</div>
                    }
                </div>
            }
            <NoticeBanner message={state.notice.clone()} />
            if appointment_id.is_some() && !state.is_settled() {
                <Loader />
            } else {
                <form class="reflect-form" onsubmit={onsubmit}>
                    <NoticeBanner message={(*form_error).clone()} />
                    if *saved {
                        <div class="saved">{ "Reflection saved." }</div>
                    }
                    { field(
                        "How are you feeling?",
                        draft.feeling.clone(),
                        Box::new(|d, v| d.feeling = v),
                    ) }
                    { field(
                        "Key takeaways",
                        draft.takeaways.clone(),
                        Box::new(|d, v| d.takeaways = v),
                    ) }
                    { field(
                        "Topics discussed",
                        draft.topics_discussed.clone(),
                        Box::new(|d, v| d.topics_discussed = v),
                    ) }
                    { field(
                        "Progress you noticed",
                        draft.progress.clone(),
                        Box::new(|d, v| d.progress = v),
                    ) }
                    <button type="submit">{ "Save reflection" }</button>
                </form>

                if appointment_id.is_none() && !state.items.is_empty() {
                    <h3>{ "Earlier reflections" }</h3>
                    { for state.items.iter().map(|reflection| html! {
                        <div class="reflection-card" key={reflection.id.to_string()}>
                            <div class="reflection-date">
                                { reflection.created_at.format("%B %-d, %Y").to_string() }
                            </div>
                            if !reflection.feeling.is_empty() {
                                <p>{ &reflection.feeling }</p>
                            }
                            if !reflection.takeaways.is_empty() {
                                <p>{ &reflection.takeaways }</p>
                            }
                        </div>
                    }) }
                }
            }
        </div>
    }
}
