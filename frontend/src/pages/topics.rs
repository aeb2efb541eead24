use shared::api::{NewTopic, TopicPatch};
use shared::models::{Priority, Topic};
use sync::{views, ListSync};
use validator::Validate;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::loader::Loader;
use crate::components::notice::{validation_message, NoticeBanner};
use crate::components::topic_row::TopicRow;
use crate::context::AppContext;
use crate::hooks::use_list_sync;

#[function_component(Topics)]
pub fn topics() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not provided");
    let sync = {
        let store = ctx.store.clone();
        let session = ctx.session.clone();
        use_list_sync(move || ListSync::<Topic, _>::new(store, session))
    };
    let draft = use_state(NewTopic::default);
    let form_error = use_state(|| None::<String>);

    let state = sync.state();
    let (active, discussed) =
        views::split_by_flag(&state.items, |t: &Topic| t.is_completed.is_set());

    let on_title = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.title = input.value();
            draft.set(next);
        })
    };
    let on_priority = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.priority = match select.value().as_str() {
                "low" => Priority::Low,
                "high" => Priority::High,
                _ => Priority::Medium,
            };
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

            let record = Topic::new(user.id, current.title, current.priority);
            let sync = sync.clone();
            let draft = draft.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let vm = sync.view_model();
                if vm.create(&record).await.is_ok() {
                    draft.set(NewTopic::default());
                }
                sync.publish();
            });
        })
    };

    let toggle = |topic: &Topic| {
        let sync = sync.clone();
        let id = topic.id;
        let patch = TopicPatch::set_completed(topic.is_completed.flipped());
        Callback::from(move |_| {
            let vm = sync.view_model();
            let patch = patch.clone();
            sync.run(async move { vm.update(id, &patch).await });
        })
    };
    let delete = |topic: &Topic| {
        let sync = sync.clone();
        let id = topic.id;
        Callback::from(move |_| {
            let vm = sync.view_model();
            sync.run(async move { vm.remove(id).await });
        })
    };

    html! {
        <div class="container">
            <h2>{ "Topics to discuss" }</h2>
            <NoticeBanner message={state.notice.clone()} />

            <form class="topic-form" onsubmit={onsubmit}>
                <NoticeBanner message={(*form_error).clone()} />
                <input
                    placeholder="What would you like to bring up?"
                    value={draft.title.clone()}
                    oninput={on_title}
                />
                <select onchange={on_priority}>
                    <option value="low" selected={draft.priority == Priority::Low}>{ "Low" }</option>
                    <option value="medium" selected={draft.priority == Priority::Medium}>{ "Medium" }</option>
                    <option value="high" selected={draft.priority == Priority::High}>{ "High" }</option>
                </select>
                <button type="submit">{ "Add" }</button>
            </form>

            if !state.is_settled() {
                <Loader />
            } else {
                <h3>{ "To discuss" }</h3>
                if active.is_empty() {
                    <p class="empty">{ "Nothing queued up." }</p>
                }
                { for active.iter().copied().map(|topic| html! {
                    <TopicRow
                        key={topic.id.to_string()}
                        topic={(*topic).clone()}
                        on_toggle={toggle(topic)}
                        on_delete={delete(topic)}
                    />
                }) }

                if !discussed.is_empty() {
                    <h3>{ "Discussed" }</h3>
                    { for discussed.iter().copied().map(|topic| html! {
                        <TopicRow
                            key={topic.id.to_string()}
                            topic={(*topic).clone()}
                            on_toggle={toggle(topic)}
                            on_delete={delete(topic)}
                        />
                    }) }
                }
            }
        </div>
    }
}
