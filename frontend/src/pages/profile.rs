use shared::api::{ProfileDraft, ProfilePatch};
use shared::flows::{self, JourneyStats};
use shared::models::UserProfile;
use sync::EntityStore;
use validator::Validate;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::loader::Loader;
use crate::components::notice::{validation_message, NoticeBanner};
use crate::context::AppContext;

/// Profile page: lazily created profile record, name edits, avatar
/// upload, the journey counts, and sign-out.
#[function_component(Profile)]
pub fn profile() -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not provided");
    let profile = use_state(|| None::<UserProfile>);
    let stats = use_state(|| None::<JourneyStats>);
    let draft = use_state(ProfileDraft::default);
    let notice = use_state(|| None::<String>);

    {
        let ctx = ctx.clone();
        let profile = profile.clone();
        let stats = stats.clone();
        let draft = draft.clone();
        let notice = notice.clone();
        use_effect_with((), move |_| {
            let Some(user) = ctx.session.current() else {
                return;
            };
            wasm_bindgen_futures::spawn_local(async move {
                match flows::ensure_profile(&ctx.store, &user.id, user.email.as_deref()).await {
                    Ok(loaded) => {
                        draft.set(ProfileDraft {
                            display_name: loaded.display_name.clone(),
                            therapist_name: loaded.therapist_name.clone().unwrap_or_default(),
                            avatar_url: loaded.avatar_url.clone(),
                        });
                        profile.set(Some(loaded));
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "failed to load profile");
                        notice.set(Some(err.to_string()));
                    }
                }
                match flows::journey_stats(&ctx.store, &user.id).await {
                    Ok(counts) => stats.set(Some(counts)),
                    Err(err) => tracing::error!(error = %err, "failed to load journey stats"),
                }
            });
        });
    }

    let on_display_name = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.display_name = input.value();
            draft.set(next);
        })
    };
    let on_therapist_name = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.therapist_name = input.value();
            draft.set(next);
        })
    };

    let onsubmit = {
        let ctx = ctx.clone();
        let profile = profile.clone();
        let draft = draft.clone();
        let notice = notice.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(current) = (*profile).clone() else {
                return;
            };
            let form = (*draft).clone();
            if let Err(errors) = form.validate() {
                notice.set(Some(validation_message(&errors)));
                return;
            }
            notice.set(None);

            let patch = ProfilePatch {
                display_name: Some(form.display_name),
                therapist_name: Some(form.therapist_name).filter(|name| !name.is_empty()),
                avatar_url: None,
            };
            let store = ctx.store.clone();
            let profile = profile.clone();
            let notice = notice.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match store.update::<UserProfile>(current.id, &patch).await {
                    Ok(updated) => profile.set(Some(updated)),
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to update profile");
                        notice.set(Some(err.to_string()));
                    }
                }
            });
        })
    };

    let on_avatar = {
        let ctx = ctx.clone();
        let profile = profile.clone();
        let notice = notice.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let Some(current) = (*profile).clone() else {
                return;
            };
            let Some(user) = ctx.session.current() else {
                return;
            };

            let storage = ctx.storage.clone();
            let store = ctx.store.clone();
            let profile = profile.clone();
            let notice = notice.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let url = match storage.upload_avatar(&user.id, file).await {
                    Ok(url) => url,
                    Err(err) => {
                        tracing::warn!(error = %err, "avatar upload failed");
                        notice.set(Some(err));
                        return;
                    }
                };
                let patch = ProfilePatch {
                    display_name: None,
                    therapist_name: None,
                    avatar_url: Some(url),
                };
                match store.update::<UserProfile>(current.id, &patch).await {
                    Ok(updated) => profile.set(Some(updated)),
                    Err(err) => notice.set(Some(err.to_string())),
                }
            });
        })
    };

    let sign_out = {
        let ctx = ctx.clone();
        Callback::from(move |_| {
            ctx.auth.sign_out();
            ctx.session.set_identity(None);
        })
    };

    html! {
        <div class="container">
            <h2>{ "Profile" }</h2>
            <NoticeBanner message={(*notice).clone()} />

            if let Some(current) = &*profile {
                <div class="profile-card">
                    if let Some(avatar) = &current.avatar_url {
                        <img class="profile-avatar" src={avatar.clone()} alt="avatar" />
                    }
                    <label class="profile-upload">{ "Change photo" }
                        <input type="file" accept="image/*" onchange={on_avatar} />
                    </label>
                </div>

                <form class="profile-form" onsubmit={onsubmit}>
                    <label>{ "Display name" }
                        <input value={draft.display_name.clone()} oninput={on_display_name} />
                    </label>
                    <label>{ "Therapist" }
                        <input value={draft.therapist_name.clone()} oninput={on_therapist_name} />
                    </label>
                    <button type="submit">{ "Save" }</button>
                </form>

                if let Some(counts) = &*stats {
                    <h3>{ "Your journey in numbers" }</h3>
                    <div class="journey-stats">
                        <div>{ format!("{} sessions completed", counts.sessions_completed) }</div>
                        <div>{ format!("{} topics discussed", counts.topics_discussed) }</div>
                        <div>{ format!("{} goals achieved", counts.goals_achieved) }</div>
                        <div>{ format!("{} check-ins logged", counts.check_ins_logged) }</div>
                    </div>
                }

                <button class="sign-out" onclick={sign_out}>{ "Sign out" }</button>
            } else {
                <Loader />
            }
        </div>
    }
}
