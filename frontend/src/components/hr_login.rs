use shared::auth::login_request;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::AbortOnDrop;
use crate::components::header::render_header;
use crate::components::utils::{input_value, render_error_message};
use crate::context::use_portal;
use crate::route::Route;

#[function_component(HrLogin)]
pub fn hr_login() -> Html {
    let portal = use_portal();
    let abort = use_memo((), |_| AbortOnDrop::new());

    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| email.set(input_value(&e)))
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| password.set(input_value(&e)))
    };

    let on_submit = {
        let portal = portal.clone();
        let api = portal.api().with_abort(&abort);
        let (email, password) = (email.clone(), password.clone());
        let (error, loading) = (error.clone(), loading.clone());

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let request = match login_request(&email, &password) {
                Ok(request) => request,
                Err(err) => {
                    error.set(Some(err.to_string()));
                    return;
                }
            };

            error.set(None);
            loading.set(true);
            let (portal, api) = (portal.clone(), api.clone());
            let (error, loading) = (error.clone(), loading.clone());

            spawn_local(async move {
                let outcome = api
                    .hr_login(&request)
                    .await
                    .map_err(|e| (!e.is_aborted()).then(|| e.user_message("Login failed.")))
                    .and_then(|response| {
                        portal
                            .session
                            .begin_hr(&response.email)
                            .map_err(|e| Some(e.to_string()))
                    });

                match outcome {
                    Ok(()) => {
                        loading.set(false);
                        portal.navigate(Route::HrHome);
                    }
                    Err(None) => {}
                    Err(Some(message)) => {
                        log::warn!("HR login failed: {}", message);
                        error.set(Some(message));
                        loading.set(false);
                    }
                }
            });
        })
    };

    html! {
        <div class="auth-page">
            { render_header("fa-user-tie", "HR Login", None) }
            <form class="auth-form" onsubmit={on_submit}>
                <input type="email" placeholder="Email" value={(*email).clone()} oninput={on_email} />
                <input type="password" placeholder="Password" value={(*password).clone()} oninput={on_password} />
                <button type="submit" class="analyze-btn" disabled={*loading}>
                    { if *loading { "Logging in..." } else { "Login" } }
                </button>
            </form>
            { render_error_message((*error).as_ref()) }
            <div class="auth-links">
                <button class="link-btn" onclick={portal.navigate_to(Route::CandidateLogin)}>{"Candidate login"}</button>
            </div>
        </div>
    }
}
