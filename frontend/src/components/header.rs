use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;

#[function_component(Header)]
pub fn header() -> Html {
    html! {
        <header class="header">
            <div class="container">
                <h1>{ "Therapy Companion" }</h1>
                <nav>
                    <Link<Route> to={Route::Home}>{ "Today" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Sessions}>{ "Sessions" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Topics}>{ "Topics" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Goals}>{ "Goals" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Journal}>{ "Journal" }</Link<Route>>
                    { " | " }
                    <Link<Route> to={Route::Profile}>{ "Profile" }</Link<Route>>
                </nav>
            </div>
        </header>
    }
}
