use shared::models::Topic;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TopicRowProps {
    pub topic: Topic,
    pub on_toggle: Callback<()>,
    pub on_delete: Callback<()>,
}

#[function_component(TopicRow)]
pub fn topic_row(props: &TopicRowProps) -> Html {
    let topic = &props.topic;
    let on_toggle = props.on_toggle.clone();
    let on_delete = props.on_delete.clone();

    let toggle = Callback::from(move |_| on_toggle.emit(()));
    let delete = Callback::from(move |_| on_delete.emit(()));

    html! {
        <div class="topic-row">
            <input
                type="checkbox"
                class="topic-checkbox"
                checked={topic.is_completed.is_set()}
                onclick={toggle}
            />
            <div class="topic-content">
                <div class="topic-title">{ &topic.title }</div>
                <span class={format!("topic-badge badge-priority-{:?}", topic.priority).to_lowercase()}>
                    { format!("{:?}", topic.priority) }
                </span>
            </div>
            <button class="topic-delete" onclick={delete}>{ "✕" }</button>
        </div>
    }
}
