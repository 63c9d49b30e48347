use shared::meetings::{UpcomingMeeting, format_meeting_time, upcoming_meetings};
use shared::models::CandidateMatchStatus;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::AbortOnDrop;
use crate::components::documents::render_document_link;
use crate::components::header::render_header;
use crate::components::utils::{render_error_message, BrowserZone};
use crate::context::{PortalContext, use_portal};
use crate::route::Route;

const FETCH_FAILED: &str = "Failed to fetch data. Please try again later.";

#[derive(Clone, PartialEq, Default)]
struct DashboardData {
    candidates: Vec<CandidateMatchStatus>,
    upcoming: Vec<UpcomingMeeting>,
}

fn flag(value: bool) -> Html {
    if value {
        html! { <span class="flag flag-yes"><i class="fa-solid fa-check"></i></span> }
    } else {
        html! { <span class="flag flag-no"><i class="fa-solid fa-xmark"></i></span> }
    }
}

fn render_candidate_row(portal: &PortalContext, candidate: &CandidateMatchStatus) -> Html {
    html! {
        <tr key={candidate.id.to_string()}>
            <td>
                <button class="link-btn" onclick={portal.navigate_to(Route::HrCandidate(candidate.id))}>
                    { format!("{} {}", candidate.first_name, candidate.last_name) }
                </button>
            </td>
            <td>{ &candidate.email }</td>
            <td>{ flag(candidate.verified) }</td>
            <td>{ flag(candidate.match_found) }</td>
            <td>{ candidate.confidence_display() }</td>
            <td>{ render_document_link("Photo", candidate.photo.as_deref()) }</td>
            <td>{ render_document_link("ID Proof", candidate.id_proof.as_deref()) }</td>
            <td>{ render_document_link("Resume", candidate.resume.as_deref()) }</td>
        </tr>
    }
}

fn render_meetings(upcoming: &[UpcomingMeeting]) -> Html {
    if upcoming.is_empty() {
        return html! { <p class="empty-state">{"No upcoming meetings."}</p> };
    }

    html! {
        <ul class="meeting-list">
            { for upcoming.iter().map(|item| html! {
                <li class="meeting-item">
                    <strong>{ &item.candidate_name }</strong>
                    {" - "}
                    { format_meeting_time(&item.meeting.scheduled_at, BrowserZone) }
                    { for item.meeting.join_url.as_ref().map(|url| html! {
                        <a class="meeting-link" href={url.clone()} target="_blank" rel="noopener noreferrer">{" Join"}</a>
                    }) }
                </li>
            }) }
        </ul>
    }
}

#[function_component(HrDashboard)]
pub fn hr_dashboard() -> Html {
    let portal = use_portal();
    let abort = use_memo((), |_| AbortOnDrop::new());

    let data = use_state(|| None::<DashboardData>);
    let error = use_state(|| None::<String>);

    {
        let api = portal.api().with_abort(&abort);
        let (data, error) = (data.clone(), error.clone());

        use_effect_with((), move |_| {
            spawn_local(async move {
                let fetched = async {
                    let candidates = api.match_statuses().await?;
                    let meetings = api.meetings().await?;
                    Ok::<_, crate::api::ApiError>((candidates, meetings))
                }
                .await;

                match fetched {
                    Ok((candidates, meetings)) => {
                        let upcoming = upcoming_meetings(&meetings, &candidates, chrono::Utc::now());
                        log::info!(
                            "Loaded {} candidates, {} upcoming meetings",
                            candidates.len(),
                            upcoming.len()
                        );
                        data.set(Some(DashboardData { candidates, upcoming }));
                    }
                    Err(e) if e.is_aborted() => {}
                    Err(e) => {
                        gloo_console::error!(format!("Error fetching data: {}", e));
                        error.set(Some(FETCH_FAILED.to_string()));
                    }
                }
            });
            || ()
        });
    }

    let body = match (&*data, &*error) {
        (_, Some(message)) => render_error_message(Some(message)),
        (None, None) => html! { <p class="loading"><i class="fa-solid fa-spinner fa-spin"></i>{" Loading..."}</p> },
        (Some(data), None) => html! {
            <>
                <section class="dashboard-section">
                    <h2><i class="fa-solid fa-calendar-days"></i>{" Upcoming Meetings"}</h2>
                    { render_meetings(&data.upcoming) }
                </section>
                <section class="dashboard-section">
                    <h2><i class="fa-solid fa-users"></i>{" Candidates"}</h2>
                    <table class="candidate-table">
                        <thead>
                            <tr>
                                <th>{"Name"}</th>
                                <th>{"Email"}</th>
                                <th>{"Verified"}</th>
                                <th>{"Matched"}</th>
                                <th>{"Confidence"}</th>
                                <th>{"Photo"}</th>
                                <th>{"ID Proof"}</th>
                                <th>{"Resume"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            { for data.candidates.iter().map(|c| render_candidate_row(&portal, c)) }
                        </tbody>
                    </table>
                </section>
            </>
        },
    };

    html! {
        <div class="dashboard">
            { render_header("fa-table-list", "Candidate Dashboard", None) }
            <div class="button-container">
                <button class="link-btn" onclick={portal.navigate_to(Route::HrHome)}>
                    <i class="fa-solid fa-arrow-left"></i>{" Back"}
                </button>
            </div>
            { body }
        </div>
    }
}
