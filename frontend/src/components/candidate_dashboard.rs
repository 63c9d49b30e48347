use shared::CandidateProfile;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::AbortOnDrop;
use crate::components::candidate_details::CandidateDetails;
use crate::components::documents::render_document_link;
use crate::components::header::render_header;
use crate::components::theme_toggle::ThemeToggle;
use crate::components::utils::render_error_message;
use crate::context::use_portal;
use crate::route::Route;

#[function_component(CandidateDashboard)]
pub fn candidate_dashboard() -> Html {
    let portal = use_portal();
    let abort = use_memo((), |_| AbortOnDrop::new());

    let candidate = use_state(|| None::<CandidateProfile>);
    let error = use_state(|| None::<String>);
    let editing = use_state(|| false);
    let reload = use_state(|| 0u32);

    {
        let portal = portal.clone();
        let api = portal.api().with_abort(&abort);
        let (candidate, error) = (candidate.clone(), error.clone());

        use_effect_with(*reload, move |_| {
            match portal.session.candidate_email() {
                None => portal.navigate(Route::CandidateLogin),
                Some(email) => spawn_local(async move {
                    match api.candidate_profile(&email, true).await {
                        Ok(profile) => {
                            error.set(None);
                            candidate.set(Some(profile));
                        }
                        Err(e) if e.is_aborted() => {}
                        Err(e) => {
                            log::error!("Error fetching data: {}", e);
                            error.set(Some(match &e {
                                crate::api::ApiError::Server { status, body } => {
                                    format!("Failed to fetch candidate data: {} - {}", status, body)
                                }
                                _ => "Network error or failed to fetch data.".to_string(),
                            }));
                        }
                    }
                }),
            }
            || ()
        });
    }

    let on_sign_out = {
        let portal = portal.clone();
        Callback::from(move |_: MouseEvent| {
            portal.session.end_candidate();
            portal.navigate(Route::CandidateLogin);
        })
    };

    let on_edit = {
        let editing = editing.clone();
        Callback::from(move |_: MouseEvent| editing.set(true))
    };

    let on_saved = {
        let (editing, reload) = (editing.clone(), reload.clone());
        Callback::from(move |_| {
            editing.set(false);
            reload.set(*reload + 1);
        })
    };

    let on_cancel = {
        let editing = editing.clone();
        Callback::from(move |_| editing.set(false))
    };

    let body = match (&*candidate, &*error) {
        (_, Some(message)) => render_error_message(Some(message)),
        (None, None) => html! { <p class="loading"><i class="fa-solid fa-spinner fa-spin"></i>{" Loading..."}</p> },
        (Some(profile), None) => html! {
            <div class="profile-card">
                <h2>{ format!("Welcome, {}", profile.full_name()) }</h2>
                <p><strong>{"Email: "}</strong>{ &profile.email }</p>
                <p><strong>{"Phone: "}</strong>{ &profile.phone }</p>
                <p><strong>{"Address: "}</strong>{ &profile.address }</p>
                <div class="document-links">
                    { render_document_link("Photo", profile.photo.as_deref()) }
                    { render_document_link("ID Proof", profile.id_proof.as_deref()) }
                    { render_document_link("Resume", profile.resume.as_deref()) }
                </div>
            </div>
        },
    };

    html! {
        <div class="dashboard">
            <div class="top-right"><ThemeToggle /></div>
            { render_header("fa-id-card", "Candidate Dashboard", None) }
            { body }
            <div class="button-container">
                <button class="analyze-btn" onclick={on_edit} disabled={*editing}>
                    <i class="fa-solid fa-pen"></i>{" Edit Details"}
                </button>
                <button class="analyze-btn" style="background-color: var(--danger-color);" onclick={on_sign_out}>
                    <i class="fa-solid fa-right-from-bracket"></i>{" Sign Out"}
                </button>
            </div>
            if *editing {
                <CandidateDetails {on_saved} on_close={Some(on_cancel)} />
            }
        </div>
    }
}
