use yew::prelude::*;

use crate::context::AppContext;

#[function_component(Landing)]
pub fn landing() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not provided");
    let sign_in = Callback::from(move |_| ctx.auth.sign_in());

    html! {
        <div class="landing">
            <h1>{ "Therapy Companion" }</h1>
            <p>{ "A private space between sessions: check in daily, collect topics, track goals, and reflect." }</p>
            <button class="sign-in" onclick={sign_in}>{ "Sign in to get started" }</button>
        </div>
    }
}
