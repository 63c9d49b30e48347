use shared::auth::{login_request, reset_password_request};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::AbortOnDrop;
use crate::components::header::render_header;
use crate::components::utils::{input_value, render_error_message, render_success_message};
use crate::context::use_portal;
use crate::route::Route;

#[function_component(CandidateLogin)]
pub fn candidate_login() -> Html {
    let portal = use_portal();
    let abort = use_memo((), |_| AbortOnDrop::new());

    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let notice = use_state(|| None::<String>);
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
        let (error, notice, loading) = (error.clone(), notice.clone(), loading.clone());

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            notice.set(None);

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
                match api.candidate_login(&request).await {
                    Ok(response) => {
                        log::info!("Candidate {} signed in", request.email);
                        if let Err(e) = portal
                            .session
                            .begin_candidate(&request.email, response.has_completed_profile)
                        {
                            error.set(Some(e.to_string()));
                            loading.set(false);
                            return;
                        }
                        loading.set(false);
                        portal.navigate(if response.has_completed_profile {
                            Route::CandidateDashboard
                        } else {
                            Route::CandidateDetails
                        });
                    }
                    Err(e) if e.is_aborted() => {}
                    Err(e) => {
                        error.set(Some(e.user_message("Unknown error")));
                        loading.set(false);
                    }
                }
            });
        })
    };

    let on_reset = {
        let api = portal.api().with_abort(&abort);
        let email = email.clone();
        let (error, notice) = (error.clone(), notice.clone());

        Callback::from(move |_: MouseEvent| {
            let request = match reset_password_request(&email) {
                Ok(request) => request,
                Err(_) => {
                    error.set(Some("Enter your email to reset the password.".to_string()));
                    return;
                }
            };
            error.set(None);
            let api = api.clone();
            let (error, notice) = (error.clone(), notice.clone());

            spawn_local(async move {
                match api.reset_password(&request).await {
                    Ok(response) => notice.set(Some(
                        response
                            .message
                            .unwrap_or_else(|| "Password reset link sent to your email.".to_string()),
                    )),
                    Err(e) if e.is_aborted() => {}
                    Err(e) => error.set(Some(e.user_message("Unknown error"))),
                }
            });
        })
    };

    html! {
        <div class="auth-page">
            { render_header("fa-user", "Candidate Login", Some("Sign in to manage your documents")) }
            <form class="auth-form" onsubmit={on_submit}>
                <input type="email" placeholder="Email" value={(*email).clone()} oninput={on_email} />
                <input type="password" placeholder="Password" value={(*password).clone()} oninput={on_password} />
                <button type="submit" class="analyze-btn" disabled={*loading}>
                    { if *loading {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Signing in..."}</> }
                    } else {
                        html! { <><i class="fa-solid fa-right-to-bracket"></i>{" Login"}</> }
                    }}
                </button>
            </form>
            { render_error_message((*error).as_ref()) }
            { render_success_message((*notice).as_ref()) }
            <div class="auth-links">
                <button class="link-btn" onclick={on_reset}>{"Forgot password?"}</button>
                <button class="link-btn" onclick={portal.navigate_to(Route::CandidateSignup)}>{"Create an account"}</button>
                <button class="link-btn" onclick={portal.navigate_to(Route::HrLogin)}>{"HR login"}</button>
            </div>
        </div>
    }
}
