mod components;
mod context;
mod hooks;
mod pages;
mod router;
mod services;

use yew::prelude::*;
use yew_router::BrowserRouter;

use crate::context::AppContext;
use crate::pages::landing::Landing;
use crate::router::{switch, Route};
use crate::services::auth::AuthClient;

#[function_component(App)]
fn app() -> Html {
    let context = use_memo((), |_| AppContext::bootstrap());
    let authenticated = use_state(|| false);
    let resolving = use_state(|| true);

    // Resolve the identity once on startup and mirror later session
    // changes (sign-out) into render state.
    {
        let context = context.clone();
        let authenticated = authenticated.clone();
        let resolving = resolving.clone();
        use_effect_with((), move |_| {
            let session = context.session.clone();
            let subscription = session.subscribe({
                let authenticated = authenticated.clone();
                move |user| authenticated.set(user.is_some())
            });

            {
                let context = context.clone();
                let authenticated = authenticated.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let identity = context.auth.me().await;
                    authenticated.set(identity.is_some());
                    context.session.set_identity(identity);
                    resolving.set(false);
                });
            }

            move || session.unsubscribe(subscription)
        });
    }

    html! {
        <ContextProvider<AppContext> context={(*context).clone()}>
            if *resolving {
                <div class="loading">
                    <div class="spinner"></div>
                </div>
            } else if *authenticated {
                <BrowserRouter>
                    <div id="app">
                        <components::header::Header />
                        <yew_router::Switch<Route> render={switch} />
                    </div>
                </BrowserRouter>
            } else {
                <Landing />
            }
        </ContextProvider<AppContext>>
    }
}

fn main() {
    // Initialize tracing
    tracing_wasm::set_as_global_default();

    // Capture the auth redirect's token fragment before anything reads
    // local storage.
    AuthClient::capture_redirect_token();

    yew::Renderer::<App>::new().render();
}
