use yew::prelude::*;

const DARK_CLASS: &str = "dark-mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Reads the theme off the body's `class` attribute.
    fn from_class_name(class_name: &str) -> Self {
        if class_name.split_whitespace().any(|c| c == DARK_CLASS) {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Theme::Light => "Switch to Dark Mode",
            Theme::Dark => "Switch to Light Mode",
        }
    }
}

fn body() -> Option<web_sys::HtmlElement> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
}

/// The theme already on the page; another toggle may have switched it
/// before this one mounted.
fn current_theme() -> Theme {
    body()
        .map(|b| Theme::from_class_name(&b.class_name()))
        .unwrap_or(Theme::Light)
}

fn apply_theme(theme: Theme) {
    let Some(body) = body() else {
        return;
    };
    let result = match theme {
        Theme::Dark => body.class_list().add_1(DARK_CLASS),
        Theme::Light => body.class_list().remove_1(DARK_CLASS),
    };
    if let Err(e) = result {
        log::warn!("Theme switch failed: {:?}", e);
    }
}

#[function_component(ThemeToggle)]
pub fn theme_toggle() -> Html {
    let theme = use_state(current_theme);

    let onclick = {
        let theme = theme.clone();
        Callback::from(move |_| {
            let next = theme.toggled();
            apply_theme(next);
            theme.set(next);
        })
    };

    html! {
        <button id="theme-toggle" class="theme-toggle" {onclick} title={theme.title()}>
            { match *theme {
                Theme::Light => html! { <img src="https://cdnjs.cloudflare.com/ajax/libs/twemoji/14.0.2/svg/2600.svg" alt="Sun Icon" class="toggle-icon" /> },
                Theme::Dark => html! { <img src="https://cdnjs.cloudflare.com/ajax/libs/twemoji/14.0.2/svg/1f319.svg" alt="Moon Icon" class="toggle-icon" /> },
            }}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_body_class_starts_the_toggle_dark() {
        assert_eq!(Theme::from_class_name("page dark-mode"), Theme::Dark);
        assert_eq!(Theme::from_class_name("dark-mode-preview"), Theme::Light);
        assert_eq!(Theme::from_class_name(""), Theme::Light);
    }

    #[test]
    fn toggle_flips_and_offers_the_other_theme() {
        let theme = Theme::from_class_name("dark-mode");
        assert_eq!(theme.title(), "Switch to Light Mode");
        assert_eq!(theme.toggled(), Theme::Light);
        assert_eq!(theme.toggled().title(), "Switch to Dark Mode");
    }
}
