use shared::auth::signup_request;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::AbortOnDrop;
use crate::components::header::render_header;
use crate::components::utils::{input_value, render_error_message};
use crate::context::use_portal;
use crate::route::Route;

#[function_component(CandidateSignup)]
pub fn candidate_signup() -> Html {
    let portal = use_portal();
    let abort = use_memo((), |_| AbortOnDrop::new());

    let email = use_state(String::new);
    let password = use_state(String::new);
    let confirm = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let bind = |state: &UseStateHandle<String>| {
        let state = state.clone();
        Callback::from(move |e: InputEvent| state.set(input_value(&e)))
    };

    let on_submit = {
        let portal = portal.clone();
        let api = portal.api().with_abort(&abort);
        let (email, password, confirm) = (email.clone(), password.clone(), confirm.clone());
        let (error, loading) = (error.clone(), loading.clone());

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let request = match signup_request(&email, &password, &confirm) {
                Ok(request) => request,
                Err(err) => {
                    error.set(Some(err.to_string()));
                    return;
                }
            };

            // A new candidate account never shares the browser with an HR login.
            portal.session.end_hr();
            error.set(None);
            loading.set(true);

            let (portal, api) = (portal.clone(), api.clone());
            let (error, loading) = (error.clone(), loading.clone());
            spawn_local(async move {
                match api.candidate_signup(&request).await {
                    Ok(_) => {
                        log::info!("Account created for {}", request.email);
                        loading.set(false);
                        portal.navigate(Route::CandidateLogin);
                    }
                    Err(e) if e.is_aborted() => {}
                    Err(e) => {
                        error.set(Some(e.user_message("Signup failed. Please try again.")));
                        loading.set(false);
                    }
                }
            });
        })
    };

    html! {
        <div class="auth-page">
            { render_header("fa-user-plus", "Candidate Signup", None) }
            <form class="auth-form" onsubmit={on_submit}>
                <input type="email" placeholder="Email" value={(*email).clone()} oninput={bind(&email)} />
                <input type="password" placeholder="Password" value={(*password).clone()} oninput={bind(&password)} />
                <input type="password" placeholder="Confirm Password" value={(*confirm).clone()} oninput={bind(&confirm)} />
                <button type="submit" class="analyze-btn" disabled={*loading}>
                    { if *loading { "Creating account..." } else { "Sign Up" } }
                </button>
            </form>
            { render_error_message((*error).as_ref()) }
            <div class="auth-links">
                <button class="link-btn" onclick={portal.navigate_to(Route::CandidateLogin)}>{"Already have an account? Login"}</button>
            </div>
        </div>
    }
}
