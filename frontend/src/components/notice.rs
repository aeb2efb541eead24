use validator::ValidationErrors;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NoticeProps {
    pub message: Option<String>,
}

/// Inline banner for load/write notices; renders nothing when clear.
#[function_component(NoticeBanner)]
pub fn notice_banner(props: &NoticeProps) -> Html {
    match &props.message {
        Some(message) => html! {
            <div class="notice">{ message }</div>
        },
        None => Html::default(),
    }
}

/// First human-readable message out of a validation failure.
pub fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .find_map(|error| error.message.as_ref().map(|message| message.to_string()))
        .unwrap_or_else(|| "please check the form".to_owned())
}
