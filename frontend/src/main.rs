mod api;
mod components;
mod config;
mod context;
mod route;
mod session;

use std::rc::Rc;

use gloo_events::EventListener;
use shared::session::Session;
use wasm_bindgen::JsValue;
use yew::prelude::*;

use components::analytics::{AnalyticsDashboard, CandidateAnalytics};
use components::candidate_dashboard::CandidateDashboard;
use components::candidate_details::CandidateDetails;
use components::candidate_login::CandidateLogin;
use components::candidate_signup::CandidateSignup;
use components::hr_candidate_details::HrCandidateDetails;
use components::hr_dashboard::HrDashboard;
use components::hr_home::HrHome;
use components::hr_login::HrLogin;
use components::schedule_meeting::ScheduleMeetingPage;
use components::video_upload::VideoUploadPage;
use config::AppConfig;
use context::PortalContext;
use route::Route;
use session::BrowserStore;

enum Msg {
    Navigate(Route),
    PopState,
}

struct App {
    route: Route,
    context: PortalContext,
    _popstate_listener: Option<EventListener>,
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn write_history(route: Route, replace: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let path = route.path();
    let result = if replace {
        history.replace_state_with_url(&JsValue::NULL, "", Some(&path))
    } else {
        history.push_state_with_url(&JsValue::NULL, "", Some(&path))
    };
    if let Err(e) = result {
        log::warn!("History update to {} failed: {:?}", path, e);
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let context = PortalContext {
            config: Rc::new(AppConfig::from_build_env()),
            session: Rc::new(Session::new(BrowserStore)),
            navigator: ctx.link().callback(Msg::Navigate),
        };

        let popstate_listener = web_sys::window().map(|window| {
            let link = ctx.link().clone();
            EventListener::new(&window, "popstate", move |_| {
                link.send_message(Msg::PopState);
            })
        });

        let mut app = Self {
            route: Route::CandidateLogin,
            context,
            _popstate_listener: popstate_listener,
        };
        app.route = app.resolve(&current_path());
        app
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Navigate(route) => {
                let target = self.guard(route);
                write_history(target, false);
                self.route = target;
            }
            Msg::PopState => {
                self.route = self.resolve(&current_path());
            }
        }
        true
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <ContextProvider<PortalContext> context={self.context.clone()}>
                <div class="container">
                    <main class="main-content">
                        { self.render_route() }
                    </main>
                    <footer class="app-footer">
                        <p>{"Candidate Verification Portal | Fullstack Rust WASM"}</p>
                    </footer>
                </div>
            </ContextProvider<PortalContext>>
        }
    }
}

impl App {
    fn guard(&self, route: Route) -> Route {
        let session = &self.context.session;
        route.guarded(|area| session.identity_for(area).is_some())
    }

    /// Maps the address bar to a route, rewriting it when the path is
    /// unknown or gated.
    fn resolve(&self, path: &str) -> Route {
        let requested = Route::parse(path);
        let target = self.guard(requested.unwrap_or(Route::CandidateLogin));
        if requested != Some(target) {
            log::info!("Redirecting {} to {}", path, target.path());
            write_history(target, true);
        }
        target
    }

    fn render_route(&self) -> Html {
        match self.route {
            Route::CandidateLogin => html! { <CandidateLogin /> },
            Route::CandidateSignup => html! { <CandidateSignup /> },
            Route::CandidateDashboard => html! { <CandidateDashboard /> },
            Route::CandidateDetails => {
                let context = self.context.clone();
                html! {
                    <CandidateDetails
                        on_saved={Callback::from(move |_| context.navigate(Route::CandidateDashboard))}
                    />
                }
            }
            Route::HrLogin => html! { <HrLogin /> },
            Route::HrHome => html! { <HrHome /> },
            Route::HrDashboard => html! { <HrDashboard /> },
            Route::HrCandidate(id) => html! { <HrCandidateDetails candidate_id={id} key={id.to_string()} /> },
            Route::HrUploadVideo(id) => html! { <VideoUploadPage candidate_id={id} /> },
            Route::HrScheduleMeeting(id) => html! { <ScheduleMeetingPage candidate_id={id} /> },
            Route::HrAnalytics => html! { <AnalyticsDashboard /> },
            Route::HrCandidateAnalytics(id) => html! { <CandidateAnalytics candidate_id={id} key={id.to_string()} /> },
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<App>::new().render();
}
