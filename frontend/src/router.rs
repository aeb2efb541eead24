use uuid::Uuid;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::pages::{
    goals::Goals, home::Home, journal::Journal, not_found::NotFound, profile::Profile,
    reflect::Reflect, sessions::Sessions, topics::Topics,
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/sessions")]
    Sessions,
    #[at("/reflect/:id")]
    ReflectOn { id: Uuid },
    #[at("/reflect")]
    Reflect,
    #[at("/topics")]
    Topics,
    #[at("/goals")]
    Goals,
    #[at("/journal")]
    Journal,
    #[at("/profile")]
    Profile,
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <Home /> },
        Route::Sessions => html! { <Sessions /> },
        Route::ReflectOn { id } => html! { <Reflect appointment_id={Some(id)} /> },
        Route::Reflect => html! { <Reflect /> },
        Route::Topics => html! { <Topics /> },
        Route::Goals => html! { <Goals /> },
        Route::Journal => html! { <Journal /> },
        Route::Profile => html! { <Profile /> },
        Route::NotFound => html! { <NotFound /> },
    }
}
