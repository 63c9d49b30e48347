use yew::prelude::*;

use crate::components::header::render_header;
use crate::components::theme_toggle::ThemeToggle;
use crate::context::use_portal;
use crate::route::Route;

#[function_component(HrHome)]
pub fn hr_home() -> Html {
    let portal = use_portal();
    let email = portal.session.hr_email().unwrap_or_default();

    let on_sign_out = {
        let portal = portal.clone();
        Callback::from(move |_: MouseEvent| {
            log::info!("HR user signed out");
            portal.session.end_hr();
            portal.navigate(Route::HrLogin);
        })
    };

    html! {
        <div class="hr-home">
            <div class="top-right"><ThemeToggle /></div>
            { render_header("fa-user-tie", "HR Portal", Some(format!("Signed in as {}", email).as_str())) }
            <div class="button-container">
                <button class="analyze-btn" onclick={portal.navigate_to(Route::HrDashboard)}>
                    <i class="fa-solid fa-table-list"></i>{" Candidate Dashboard"}
                </button>
                <button class="analyze-btn" onclick={portal.navigate_to(Route::HrAnalytics)}>
                    <i class="fa-solid fa-chart-line"></i>{" Analytics"}
                </button>
                <button class="analyze-btn" style="background-color: var(--danger-color);" onclick={on_sign_out}>
                    <i class="fa-solid fa-right-from-bracket"></i>{" Sign Out"}
                </button>
            </div>
        </div>
    }
}
