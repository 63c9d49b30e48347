use shared::meetings::schedule_meeting_body;
use shared::{CandidateId, CandidateProfile};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::AbortOnDrop;
use crate::components::utils::{input_value, render_error_message, render_success_message, BrowserZone};
use crate::context::use_portal;
use crate::route::Route;

#[derive(Properties, PartialEq)]
pub struct ScheduleMeetingProps {
    pub candidate: CandidateProfile,
    #[prop_or_default]
    pub on_scheduled: Callback<String>,
    #[prop_or_default]
    pub on_close: Option<Callback<()>>,
}

/// Picks a local date and time and books an interview with the candidate.
#[function_component(ScheduleMeeting)]
pub fn schedule_meeting(props: &ScheduleMeetingProps) -> Html {
    let portal = use_portal();
    let abort = use_memo((), |_| AbortOnDrop::new());

    let start_time = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_time = {
        let start_time = start_time.clone();
        Callback::from(move |e: InputEvent| start_time.set(input_value(&e)))
    };

    let on_submit = {
        let portal = portal.clone();
        let api = portal.api().with_abort(&abort);
        let candidate = props.candidate.clone();
        let (on_scheduled, on_close) = (props.on_scheduled.clone(), props.on_close.clone());
        let (start_time, error, loading) = (start_time.clone(), error.clone(), loading.clone());

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let hr_email = portal.session.hr_email();
            let body = match schedule_meeting_body(
                &candidate,
                hr_email.as_deref(),
                &start_time,
                BrowserZone,
            ) {
                Ok(body) => body,
                Err(err) => {
                    error.set(Some(err.to_string()));
                    return;
                }
            };

            error.set(None);
            loading.set(true);
            let api = api.clone();
            let (on_scheduled, on_close) = (on_scheduled.clone(), on_close.clone());
            let (error, loading) = (error.clone(), loading.clone());

            spawn_local(async move {
                match api.schedule_meeting(body).await {
                    Ok(response) if response.success => {
                        let link = response.meeting_link.unwrap_or_default();
                        log::info!("Meeting scheduled: {}", link);
                        loading.set(false);
                        on_scheduled.emit(link);
                        if let Some(on_close) = on_close {
                            on_close.emit(());
                        }
                    }
                    Ok(_) => {
                        error.set(Some("Failed to schedule meeting.".to_string()));
                        loading.set(false);
                    }
                    Err(e) if e.is_aborted() => {}
                    Err(e) => {
                        log::error!("Scheduling failed: {}", e);
                        error.set(Some(e.user_message("Failed to schedule meeting.")));
                        loading.set(false);
                    }
                }
            });
        })
    };

    let close_button = props.on_close.clone().map(|on_close| {
        html! {
            <button type="button" class="remove-btn" title="Close" onclick={Callback::from(move |_| on_close.emit(()))}>
                <i class="fa-solid fa-times"></i>
            </button>
        }
    });

    html! {
        <div class="schedule-meeting">
            <div class="form-header">
                <h2><i class="fa-solid fa-calendar-plus"></i>{ format!(" Schedule Meeting with {}", props.candidate.full_name()) }</h2>
                { for close_button }
            </div>
            <form onsubmit={on_submit}>
                <input type="datetime-local" class="form-input" value={(*start_time).clone()} oninput={on_time} />
                { render_error_message((*error).as_ref()) }
                <button type="submit" class="analyze-btn" disabled={*loading}>
                    { if *loading {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Scheduling..."}</> }
                    } else {
                        html! { <><i class="fa-solid fa-calendar-check"></i>{" Schedule"}</> }
                    }}
                </button>
            </form>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ScheduleMeetingPageProps {
    pub candidate_id: CandidateId,
}

#[function_component(ScheduleMeetingPage)]
pub fn schedule_meeting_page(props: &ScheduleMeetingPageProps) -> Html {
    let portal = use_portal();
    let abort = use_memo((), |_| AbortOnDrop::new());
    let candidate = use_state(|| None::<CandidateProfile>);
    let error = use_state(|| None::<String>);
    let meeting_link = use_state(|| None::<String>);

    {
        let api = portal.api().with_abort(&abort);
        let (candidate, error) = (candidate.clone(), error.clone());
        use_effect_with(props.candidate_id, move |id| {
            let id = *id;
            spawn_local(async move {
                match api.hr_candidate(id).await {
                    Ok(profile) => candidate.set(Some(profile)),
                    Err(e) if e.is_aborted() => {}
                    Err(e) => error.set(Some(e.user_message("Failed to load candidate details."))),
                }
            });
            || ()
        });
    }

    let on_scheduled = {
        let meeting_link = meeting_link.clone();
        Callback::from(move |link: String| meeting_link.set(Some(link)))
    };

    let success = (*meeting_link)
        .as_ref()
        .map(|link| format!("Meeting scheduled successfully! Link: {}", link));

    html! {
        <div class="panel-page">
            <div class="button-container">
                <button class="link-btn" onclick={portal.navigate_to(Route::HrCandidate(props.candidate_id))}>
                    <i class="fa-solid fa-arrow-left"></i>{" Back to candidate"}
                </button>
            </div>
            { render_error_message((*error).as_ref()) }
            { render_success_message(success.as_ref()) }
            { match &*candidate {
                Some(profile) if meeting_link.is_none() => html! {
                    <ScheduleMeeting candidate={profile.clone()} {on_scheduled} />
                },
                Some(_) => html! {},
                None => html! { <p class="loading"><i class="fa-solid fa-spinner fa-spin"></i>{" Loading..."}</p> },
            }}
        </div>
    }
}
