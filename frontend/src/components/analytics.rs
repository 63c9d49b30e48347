use shared::analytics::{
    MatchFilter, PageSummary, Pager, confidence_series, frames_series, summarize,
};
use shared::error::ValidationError;
use shared::export::{CSV_MIME, CsvLayout, export_csv, file_name};
use shared::models::CandidateOption;
use shared::{CandidateId, MatchResult};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::context::ContextHandle;
use yew::prelude::*;

use crate::api::{AbortOnDrop, ApiClient};
use crate::components::charts::{ConfidenceTrend, FramesComparison};
use crate::components::header::render_header;
use crate::components::match_history::MatchHistory;
use crate::components::utils::{debounce, input_value, render_error_message, trigger_download};
use crate::context::{PortalContext, use_portal};
use crate::route::Route;

const FETCH_FAILED: &str = "Failed to fetch match data. Please try again later.";

fn render_summary(summary: &PageSummary) -> Html {
    let (label, class) = if summary.passed() {
        ("Pass", "tier-pass")
    } else {
        ("Fail", "tier-fail")
    };

    html! {
        <div class="summary-cards">
            <div class="summary-card">
                <span class="summary-label">{"Records"}</span>
                <span class="summary-value">{ summary.count }</span>
            </div>
            <div class="summary-card">
                <span class="summary-label">{"Average Confidence"}</span>
                <span class="summary-value">{ summary.average_display() }</span>
            </div>
            <div class={classes!("summary-card", class)}>
                <span class="summary-label">{"Overall Status"}</span>
                <span class="summary-value">{ label }</span>
            </div>
        </div>
    }
}

fn render_charts(records: &[MatchResult]) -> Html {
    html! {
        <div class="charts">
            <ConfidenceTrend points={confidence_series(records)} />
            <FramesComparison points={frames_series(records)} />
        </div>
    }
}

fn download_csv(records: &[MatchResult], layout: CsvLayout, candidate: Option<CandidateId>) -> Option<String> {
    let name = file_name(candidate);
    match trigger_download(&export_csv(records, layout), CSV_MIME, &name) {
        Ok(()) => {
            log::info!("Exported {} records to {}", records.len(), name);
            None
        }
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            Some("Failed to export CSV.".to_string())
        }
    }
}

pub enum Msg {
    OptionsLoaded(Vec<CandidateOption>),
    SetCandidate(Option<CandidateId>),
    SetStartDate(String),
    SetEndDate(String),
    SetMinConfidence(String),
    Apply,
    PreviousPage,
    NextPage,
    Loaded(Vec<MatchResult>),
    Failed(String),
    Export,
}

/// Global match history with filters, paging, charts and CSV export.
pub struct AnalyticsDashboard {
    portal: PortalContext,
    api: ApiClient,
    options: Vec<CandidateOption>,
    filter: MatchFilter,
    pager: Pager,
    records: Vec<MatchResult>,
    loading: bool,
    error: Option<String>,
    _abort: AbortOnDrop,
    _context_handle: Option<ContextHandle<PortalContext>>,
}

impl Component for AnalyticsDashboard {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let (portal, context_handle) = PortalContext::from_scope(ctx);
        let abort = AbortOnDrop::new();
        let api = portal.api().with_abort(&abort);

        let mut model = Self {
            portal,
            api,
            options: Vec::new(),
            filter: MatchFilter::default(),
            pager: Pager::default(),
            records: Vec::new(),
            loading: false,
            error: None,
            _abort: abort,
            _context_handle: context_handle,
        };
        model.fetch_options(ctx);
        let first = model.pager.first(&model.filter);
        model.fetch_page(ctx, first);
        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::OptionsLoaded(options) => {
                self.options = options;
                true
            }
            Msg::SetCandidate(candidate) => {
                self.filter.candidate_id = candidate;
                true
            }
            Msg::SetStartDate(value) => {
                self.filter.start_date = value;
                true
            }
            Msg::SetEndDate(value) => {
                self.filter.end_date = value;
                true
            }
            Msg::SetMinConfidence(value) => {
                self.filter.min_confidence = value;
                true
            }
            Msg::Apply => {
                let query = self.pager.first(&self.filter);
                self.fetch_page(ctx, query)
            }
            Msg::PreviousPage => {
                if self.pager.page().is_first() {
                    return false;
                }
                let query = self.pager.previous(&self.filter);
                self.fetch_page(ctx, query)
            }
            Msg::NextPage => {
                let query = self.pager.next(&self.filter);
                self.fetch_page(ctx, query)
            }
            Msg::Loaded(records) => {
                self.records = records;
                self.loading = false;
                self.error = None;
                true
            }
            Msg::Failed(message) => {
                self.loading = false;
                self.error = Some(message);
                true
            }
            Msg::Export => {
                self.error = download_csv(&self.records, CsvLayout::AllCandidates, None);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let summary = summarize(&self.records);

        html! {
            <div class="analytics">
                { render_header("fa-chart-line", "Candidate Analytics", None) }
                <div class="button-container">
                    <button class="link-btn" onclick={self.portal.navigate_to(Route::HrHome)}>
                        <i class="fa-solid fa-arrow-left"></i>{" Back"}
                    </button>
                </div>
                { self.render_filters(ctx) }
                { render_error_message(self.error.as_ref()) }
                { if self.loading {
                    html! { <p class="loading"><i class="fa-solid fa-spinner fa-spin"></i>{" Loading..."}</p> }
                } else {
                    html! {
                        <>
                            { render_summary(&summary) }
                            { render_charts(&self.records) }
                            <MatchHistory records={self.records.clone()} show_candidate={true} />
                        </>
                    }
                }}
                { self.render_pager(ctx) }
            </div>
        }
    }
}

// Handler methods
impl AnalyticsDashboard {
    fn fetch_options(&self, ctx: &Context<Self>) {
        let link = ctx.link().clone();
        let api = self.api.clone();
        spawn_local(async move {
            match api.candidate_options().await {
                Ok(options) => link.send_message(Msg::OptionsLoaded(options)),
                Err(e) if e.is_aborted() => {}
                Err(e) => log::warn!("Candidate list unavailable: {}", e),
            }
        });
    }

    fn fetch_page(&mut self, ctx: &Context<Self>, query: Result<String, ValidationError>) -> bool {
        let query = match query {
            Ok(query) => query,
            Err(e) => {
                self.error = Some(e.to_string());
                return true;
            }
        };
        self.loading = true;
        self.error = None;

        let link = ctx.link().clone();
        let api = self.api.clone();
        spawn_local(async move {
            match api.all_matches(&query).await {
                Ok(records) => link.send_message(Msg::Loaded(records)),
                Err(e) if e.is_aborted() => {}
                Err(e) => {
                    gloo_console::error!(format!("Error fetching matches: {}", e));
                    link.send_message(Msg::Failed(FETCH_FAILED.to_string()));
                }
            }
        });
        true
    }
}

// Rendering methods
impl AnalyticsDashboard {
    fn render_filters(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let selected = self.filter.candidate_id;

        html! {
            <div class="filters">
                <select
                    class="form-input"
                    onchange={link.callback(|e: Event| {
                        let select: HtmlSelectElement = e.target_unchecked_into();
                        Msg::SetCandidate(select.value().parse().ok())
                    })}
                >
                    <option value="" selected={selected.is_none()}>{"All candidates"}</option>
                    { for self.options.iter().map(|option| html! {
                        <option value={option.id.to_string()} selected={selected == Some(option.id)}>
                            { format!("{} {}", option.first_name, option.last_name) }
                        </option>
                    }) }
                </select>
                <input
                    type="date"
                    class="form-input"
                    value={self.filter.start_date.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::SetStartDate(input_value(&e)))}
                />
                <input
                    type="date"
                    class="form-input"
                    value={self.filter.end_date.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::SetEndDate(input_value(&e)))}
                />
                <input
                    type="number"
                    class="form-input"
                    min="0"
                    max="1"
                    step="0.01"
                    placeholder="Min confidence (0-1)"
                    value={self.filter.min_confidence.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::SetMinConfidence(input_value(&e)))}
                />
                <button
                    class="analyze-btn"
                    disabled={self.loading}
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Apply)
                    })}
                >
                    <i class="fa-solid fa-filter"></i>{" Apply Filters"}
                </button>
                <button
                    class="analyze-btn"
                    disabled={self.records.is_empty()}
                    onclick={link.callback(|_| Msg::Export)}
                >
                    <i class="fa-solid fa-file-csv"></i>{" Export CSV"}
                </button>
            </div>
        }
    }

    fn render_pager(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="pager">
                <button
                    class="analyze-btn"
                    disabled={self.loading || self.pager.page().is_first()}
                    onclick={link.callback(|_| Msg::PreviousPage)}
                >
                    {"Previous"}
                </button>
                <span class="page-info">
                    { if self.records.is_empty() {
                        "No records".to_string()
                    } else {
                        {
                        let offset = self.pager.page().offset;
                        format!("Records {}-{}", offset + 1, offset + self.records.len() as u32)
                    }
                    }}
                </span>
                <button
                    class="analyze-btn"
                    disabled={self.loading}
                    onclick={link.callback(|_| Msg::NextPage)}
                >
                    {"Next"}
                </button>
            </div>
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct CandidateAnalyticsProps {
    pub candidate_id: CandidateId,
}

/// Match history of one candidate, without the candidate column.
#[function_component(CandidateAnalytics)]
pub fn candidate_analytics(props: &CandidateAnalyticsProps) -> Html {
    let portal = use_portal();
    let abort = use_memo((), |_| AbortOnDrop::new());
    let records = use_state(|| None::<Vec<MatchResult>>);
    let error = use_state(|| None::<String>);

    {
        let api = portal.api().with_abort(&abort);
        let (records, error) = (records.clone(), error.clone());
        use_effect_with(props.candidate_id, move |id| {
            let id = *id;
            spawn_local(async move {
                match api.match_history(id).await {
                    Ok(history) => records.set(Some(history)),
                    Err(e) if e.is_aborted() => {}
                    Err(e) => {
                        gloo_console::error!(format!("Error fetching match history: {}", e));
                        error.set(Some(FETCH_FAILED.to_string()));
                    }
                }
            });
            || ()
        });
    }

    let on_export = {
        let (records, error) = (records.clone(), error.clone());
        let id = props.candidate_id;
        Callback::from(move |_: MouseEvent| {
            if let Some(history) = (*records).as_ref() {
                error.set(download_csv(history, CsvLayout::SingleCandidate, Some(id)));
            }
        })
    };

    let body = match (*records).as_ref() {
        None => html! { <p class="loading"><i class="fa-solid fa-spinner fa-spin"></i>{" Loading..."}</p> },
        Some(history) => html! {
            <>
                { render_summary(&summarize(history)) }
                { render_charts(history) }
                <MatchHistory records={history.clone()} />
            </>
        },
    };

    html! {
        <div class="analytics">
            { render_header("fa-chart-line", &format!("Candidate #{} Analytics", props.candidate_id), None) }
            <div class="button-container">
                <button class="link-btn" onclick={portal.navigate_to(Route::HrCandidate(props.candidate_id))}>
                    <i class="fa-solid fa-arrow-left"></i>{" Back to candidate"}
                </button>
                <button
                    class="analyze-btn"
                    disabled={(*records).as_ref().is_none_or(|r| r.is_empty())}
                    onclick={on_export}
                >
                    <i class="fa-solid fa-file-csv"></i>{" Export CSV"}
                </button>
            </div>
            { render_error_message((*error).as_ref()) }
            { body }
        </div>
    }
}
