use shared::confidence::{ConfidenceTier, format_percent_precise};
use shared::meetings::format_meeting_time;
use shared::MatchResult;
use yew::prelude::*;

use crate::components::utils::BrowserZone;

#[derive(Properties, PartialEq)]
pub struct MatchHistoryProps {
    pub records: Vec<MatchResult>,
    #[prop_or_default]
    pub show_candidate: bool,
}

#[function_component(MatchHistory)]
pub fn match_history(props: &MatchHistoryProps) -> Html {
    if props.records.is_empty() {
        return html! { <p class="empty-state">{"No match records found."}</p> };
    }

    html! {
        <table class="match-history">
            <thead>
                <tr>
                    <th>{"Date"}</th>
                    <th>{"Match ID"}</th>
                    if props.show_candidate {
                        <th>{"Candidate"}</th>
                    }
                    <th>{"Confidence"}</th>
                    <th>{"Frames"}</th>
                    <th>{"Status"}</th>
                </tr>
            </thead>
            <tbody>
                { for props.records.iter().map(|record| {
                    let tier = ConfidenceTier::from_score(record.confidence_score);
                    let date = record
                        .created_at
                        .as_deref()
                        .map(|at| format_meeting_time(at, BrowserZone))
                        .unwrap_or_else(|| "-".to_string());
                    let candidate = record
                        .candidate
                        .as_ref()
                        .map(|c| c.full_name())
                        .unwrap_or_default();

                    html! {
                        <tr key={record.id.to_string()} class={tier.css_class()}>
                            <td>{ date }</td>
                            <td>{ format!("#{}", record.id) }</td>
                            if props.show_candidate {
                                <td>{ candidate }</td>
                            }
                            <td style={format!("color: {};", tier.color())}>
                                { format!("{}%", format_percent_precise(record.confidence_score)) }
                            </td>
                            <td>{ format!("{} / {}", record.matching_frames, record.checked_frames) }</td>
                            <td>{ &record.status }</td>
                        </tr>
                    }
                }) }
            </tbody>
        </table>
    }
}
