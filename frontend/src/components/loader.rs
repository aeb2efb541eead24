use yew::prelude::*;

#[function_component(Loader)]
pub fn loader() -> Html {
    html! {
        <div class="loading">
            <div class="spinner"></div>
        </div>
    }
}
