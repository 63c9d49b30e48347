use shared::confidence::{ConfidenceTier, format_percent};
use shared::MatchResult;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct MatchResultProps {
    pub result: MatchResult,
}

#[function_component(MatchResultView)]
pub fn match_result_view(props: &MatchResultProps) -> Html {
    let result = &props.result;
    let tier = ConfidenceTier::from_score(result.confidence_score);
    let percent = (result.confidence_score * 100.0).clamp(0.0, 100.0);

    html! {
        <div class={classes!("results-container", tier.css_class())}>
            <div class="result-header">
                <h2>
                    { if result.match_found {
                        html! { <><i class="fa-solid fa-user-check"></i>{" Match Found"}</> }
                    } else {
                        html! { <><i class="fa-solid fa-user-xmark"></i>{" No Match"}</> }
                    }}
                    <span class="tier-label">{ format!("({})", tier) }</span>
                </h2>
                <div class="confidence-meter">
                    <div class="meter-label">{"Confidence:"}</div>
                    <div class="meter">
                        <div class="meter-fill" style={format!("width: {}%; background-color: {};", percent, tier.color())}></div>
                    </div>
                    <div class="meter-value" style={format!("color: {};", tier.color())}>
                        { format_percent(result.confidence_score) }
                    </div>
                </div>
            </div>
            <div class="detailed-results">
                <p><strong>{"Matching Frames: "}</strong>{ format!("{} / {}", result.matching_frames, result.checked_frames) }</p>
                { if result.status.is_empty() {
                    html! {}
                } else {
                    html! { <p><strong>{"Status: "}</strong>{ &result.status }</p> }
                }}
            </div>
        </div>
    }
}
