use shared::api::{GoalPatch, NewGoal};
use shared::models::Goal;
use sync::{views, ListSync};
use validator::Validate;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::goal_card::GoalCard;
use crate::components::loader::Loader;
use crate::components::notice::{validation_message, NoticeBanner};
use crate::context::AppContext;
use crate::hooks::use_list_sync;

#[function_component(Goals)]
pub fn goals() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not provided");
    let sync = {
        let store = ctx.store.clone();
        let session = ctx.session.clone();
        use_list_sync(move || ListSync::<Goal, _>::new(store, session))
    };
    let draft = use_state(NewGoal::default);
    let form_error = use_state(|| None::<String>);
    let achievement = use_state(|| None::<String>);

    let state = sync.state();
    let (active, achieved) = views::split_by_flag(&state.items, |g: &Goal| g.is_completed.is_set());

    let on_title = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.title = input.value();
            draft.set(next);
        })
    };
    let on_target = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.target_progress = input.value().parse().unwrap_or(Goal::DEFAULT_TARGET);
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

            let record = Goal::new(user.id, current.title, current.target_progress);
            let sync = sync.clone();
            let draft = draft.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let vm = sync.view_model();
                if vm.create(&record).await.is_ok() {
                    draft.set(NewGoal::default());
                }
                sync.publish();
            });
        })
    };

    let step = |goal: &Goal| {
        let sync = sync.clone();
        let achievement = achievement.clone();
        let goal = goal.clone();
        Callback::from(move |delta: i32| {
            let next = goal.stepped(delta);
            if goal.newly_achieved(next) {
                achievement.set(Some(format!("You achieved \"{}\"!", goal.title)));
            }
            let vm = sync.view_model();
            let id = goal.id;
            sync.run(async move { vm.update(id, &GoalPatch::from_progress(next)).await });
        })
    };
    let delete = |goal: &Goal| {
        let sync = sync.clone();
        let id = goal.id;
        Callback::from(move |_| {
            let vm = sync.view_model();
            sync.run(async move { vm.remove(id).await });
        })
    };

    html! {
        <div class="container">
            <h2>{ "Goals" }</h2>
            <NoticeBanner message={state.notice.clone()} />
            <NoticeBanner message={(*achievement).clone()} />

            <form class="goal-form" onsubmit={onsubmit}>
                <NoticeBanner message={(*form_error).clone()} />
                <input
                    placeholder="What are you working toward?"
                    value={draft.title.clone()}
                    oninput={on_title}
                />
                <label>{ "Steps to get there" }
                    <input
                        type="number"
                        min="1"
                        value={draft.target_progress.to_string()}
                        oninput={on_target}
                    />
                </label>
                <button type="submit">{ "Add goal" }</button>
            </form>

            if !state.is_settled() {
                <Loader />
            } else {
                <h3>{ "In progress" }</h3>
                if active.is_empty() {
                    <p class="empty">{ "No active goals yet." }</p>
                }
                { for active.iter().copied().map(|goal| html! {
                    <GoalCard
                        key={goal.id.to_string()}
                        goal={(*goal).clone()}
                        on_step={step(goal)}
                        on_delete={delete(goal)}
                    />
                }) }

                if !achieved.is_empty() {
                    <h3>{ "Achieved" }</h3>
                    { for achieved.iter().copied().map(|goal| html! {
                        <GoalCard
                            key={goal.id.to_string()}
                            goal={(*goal).clone()}
                            on_step={step(goal)}
                            on_delete={delete(goal)}
                        />
                    }) }
                }
            }
        </div>
    }
}
