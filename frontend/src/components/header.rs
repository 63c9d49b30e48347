use yew::prelude::*;

/// Renders a page header
pub fn render_header(icon: &str, title: &str, subtitle: Option<&str>) -> Html {
    html! {
        <header class="app-header">
            <h1><i class={classes!("fa-solid", icon.to_string())}></i> { format!(" {}", title) }</h1>
            { for subtitle.map(|text| html! { <p class="subtitle">{ text }</p> }) }
        </header>
    }
}
