use shared::files::{LinkMode, link_mode};
use shared::urls::file_name_from_url;
use yew::prelude::*;

/// Link to a stored document. Word and text files download, everything
/// else opens in a new tab.
pub fn render_document_link(label: &str, url: Option<&str>) -> Html {
    let Some(url) = url else {
        return html! { <span class="document-missing">{ format!("{}: Not uploaded", label) }</span> };
    };

    match link_mode(url) {
        LinkMode::Download => html! {
            <a class="document-link" href={url.to_string()} download={file_name_from_url(url).unwrap_or("document").to_string()}>
                <i class="fa-solid fa-download"></i>{ format!(" Download {}", label) }
            </a>
        },
        LinkMode::Open => html! {
            <a class="document-link" href={url.to_string()} target="_blank" rel="noopener noreferrer">
                <i class="fa-solid fa-file"></i>{ format!(" View {}", label) }
            </a>
        },
    }
}
