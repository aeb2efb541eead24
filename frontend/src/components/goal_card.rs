use shared::models::Goal;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct GoalCardProps {
    pub goal: Goal,
    /// Emits the step delta (+1 or -1).
    pub on_step: Callback<i32>,
    pub on_delete: Callback<()>,
}

#[function_component(GoalCard)]
pub fn goal_card(props: &GoalCardProps) -> Html {
    let goal = &props.goal;
    let percent = goal.percent().unwrap_or(0.0);

    let step_down = {
        let on_step = props.on_step.clone();
        Callback::from(move |_| on_step.emit(-1))
    };
    let step_up = {
        let on_step = props.on_step.clone();
        Callback::from(move |_| on_step.emit(1))
    };
    let delete = {
        let on_delete = props.on_delete.clone();
        Callback::from(move |_| on_delete.emit(()))
    };

    html! {
        <div class="goal-card">
            <div class="goal-title">{ &goal.title }</div>
            <div class="goal-progress">
                <div class="goal-bar">
                    <div class="goal-bar-fill" style={format!("width: {percent:.0}%")}></div>
                </div>
                <span class="goal-counts">
                    { format!("{} / {}", goal.current_progress, goal.target_progress) }
                </span>
            </div>
            <div class="goal-actions">
                if !goal.is_completed.is_set() {
                    <button onclick={step_down}>{ "−" }</button>
                    <button onclick={step_up}>{ "+" }</button>
                } else {
                    <span class="goal-achieved">{ "achieved" }</span>
                }
                <button class="goal-delete" onclick={delete}>{ "✕" }</button>
            </div>
        </div>
    }
}
