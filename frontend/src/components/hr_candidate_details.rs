use std::cmp::Reverse;

use shared::meetings::{format_meeting_time, meetings_for_candidate, parse_timestamp};
use shared::{CandidateId, CandidateProfile, MatchResult, Meeting};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{AbortOnDrop, ApiError};
use crate::components::documents::render_document_link;
use crate::components::header::render_header;
use crate::components::match_history::MatchHistory;
use crate::components::schedule_meeting::ScheduleMeeting;
use crate::components::utils::{render_error_message, render_success_message, BrowserZone};
use crate::components::video_upload::VideoUpload;
use crate::context::use_portal;
use crate::route::Route;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Panel {
    None,
    Video,
    Schedule,
}

#[derive(Clone, PartialEq)]
struct CandidateView {
    profile: CandidateProfile,
    meetings: Vec<Meeting>,
    history: Vec<MatchResult>,
}

/// Newest first; records without a readable timestamp go last, by id.
fn newest_first(mut history: Vec<MatchResult>) -> Vec<MatchResult> {
    history.sort_by_key(|m| {
        Reverse((
            m.created_at.as_deref().and_then(parse_timestamp),
            m.id,
        ))
    });
    history
}

async fn load(api: crate::api::ApiClient, id: CandidateId) -> Result<CandidateView, ApiError> {
    let profile = api.hr_candidate(id).await?;
    let meetings = meetings_for_candidate(&api.meetings().await?, id);
    let history = newest_first(api.match_history(id).await?);
    Ok(CandidateView {
        profile,
        meetings,
        history,
    })
}

fn render_meetings(meetings: &[Meeting]) -> Html {
    if meetings.is_empty() {
        return html! { <p class="empty-state">{"No meetings scheduled."}</p> };
    }
    html! {
        <ul class="meeting-list">
            { for meetings.iter().map(|m| html! {
                <li class="meeting-item">
                    { format_meeting_time(&m.scheduled_at, BrowserZone) }
                    { for m.join_url.as_ref().map(|url| html! {
                        <a class="meeting-link" href={url.clone()} target="_blank" rel="noopener noreferrer">{" Join"}</a>
                    }) }
                </li>
            }) }
        </ul>
    }
}

#[derive(Properties, PartialEq)]
pub struct HrCandidateDetailsProps {
    pub candidate_id: CandidateId,
}

#[function_component(HrCandidateDetails)]
pub fn hr_candidate_details(props: &HrCandidateDetailsProps) -> Html {
    let portal = use_portal();
    let abort = use_memo((), |_| AbortOnDrop::new());
    let id = props.candidate_id;

    let view = use_state(|| None::<CandidateView>);
    let error = use_state(|| None::<String>);
    let panel = use_state(|| Panel::None);
    let notice = use_state(|| None::<String>);
    let reload = use_state(|| 0u32);

    {
        let api = portal.api().with_abort(&abort);
        let (view, error) = (view.clone(), error.clone());
        use_effect_with((id, *reload), move |(id, _)| {
            let id = *id;
            spawn_local(async move {
                match load(api, id).await {
                    Ok(loaded) => {
                        error.set(None);
                        view.set(Some(loaded));
                    }
                    Err(e) if e.is_aborted() => {}
                    Err(e) => {
                        log::error!("Candidate {} failed to load: {}", id, e);
                        error.set(Some(e.user_message("Failed to load candidate details.")));
                    }
                }
            });
            || ()
        });
    }

    let toggle = |target: Panel| {
        let panel = panel.clone();
        Callback::from(move |_: MouseEvent| {
            panel.set(if *panel == target { Panel::None } else { target });
        })
    };
    let close_panel = {
        let panel = panel.clone();
        Callback::from(move |_| panel.set(Panel::None))
    };
    let on_matched = {
        let reload = reload.clone();
        Callback::from(move |_: MatchResult| reload.set(*reload + 1))
    };
    let on_scheduled = {
        let (notice, reload) = (notice.clone(), reload.clone());
        Callback::from(move |link: String| {
            notice.set(Some(format!("Meeting scheduled successfully! Link: {}", link)));
            reload.set(*reload + 1);
        })
    };

    let Some(loaded) = (*view).as_ref() else {
        return html! {
            <div class="candidate-details">
                { render_error_message((*error).as_ref()) }
                if error.is_none() {
                    <p class="loading"><i class="fa-solid fa-spinner fa-spin"></i>{" Loading..."}</p>
                }
            </div>
        };
    };
    let profile = &loaded.profile;

    let active_panel = match *panel {
        Panel::None => html! {},
        Panel::Video => html! {
            <VideoUpload
                candidate_id={id}
                photo_url={profile.photo.clone()}
                {on_matched}
                on_close={Some(close_panel)}
            />
        },
        Panel::Schedule => html! {
            <ScheduleMeeting candidate={profile.clone()} {on_scheduled} on_close={Some(close_panel)} />
        },
    };

    html! {
        <div class="candidate-details">
            { render_header("fa-user", &profile.full_name(), Some(profile.email.as_str())) }
            <div class="button-container">
                <button class="link-btn" onclick={portal.navigate_to(Route::HrDashboard)}>
                    <i class="fa-solid fa-arrow-left"></i>{" Back to dashboard"}
                </button>
                <button class="analyze-btn" onclick={toggle(Panel::Video)}>
                    <i class="fa-solid fa-video"></i>{" Upload Video"}
                </button>
                <button class="analyze-btn" onclick={toggle(Panel::Schedule)}>
                    <i class="fa-solid fa-calendar-plus"></i>{" Schedule Meeting"}
                </button>
                <button class="analyze-btn" onclick={portal.navigate_to(Route::HrCandidateAnalytics(id))}>
                    <i class="fa-solid fa-chart-line"></i>{" Analytics"}
                </button>
            </div>
            { render_error_message((*error).as_ref()) }
            { render_success_message((*notice).as_ref()) }
            <div class="profile-card">
                <p><strong>{"Phone: "}</strong>{ &profile.phone }</p>
                <p><strong>{"Address: "}</strong>{ &profile.address }</p>
                <p><strong>{"Verified: "}</strong>{ if profile.verified { "Yes" } else { "No" } }</p>
                <div class="document-links">
                    { render_document_link("Photo", profile.photo.as_deref()) }
                    { render_document_link("ID Proof", profile.id_proof.as_deref()) }
                    { render_document_link("Resume", profile.resume.as_deref()) }
                </div>
            </div>
            { active_panel }
            <section class="dashboard-section">
                <h2><i class="fa-solid fa-calendar-days"></i>{" Meetings"}</h2>
                { render_meetings(&loaded.meetings) }
            </section>
            <section class="dashboard-section">
                <h2><i class="fa-solid fa-clock-rotate-left"></i>{" Match History"}</h2>
                <MatchHistory records={loaded.history.clone()} />
            </section>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, created_at: Option<&str>) -> MatchResult {
        MatchResult {
            id,
            created_at: created_at.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn history_is_sorted_newest_first() {
        let sorted = newest_first(vec![
            record(1, Some("2025-01-01T10:00:00Z")),
            record(2, None),
            record(3, Some("2025-03-01 09:00:00")),
        ]);
        let ids: Vec<u64> = sorted.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
