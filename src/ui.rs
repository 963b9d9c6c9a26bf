use crate::theme::theme_definition;
use crate::types::ThemeMode;
use crate::views::ChatView;
use dioxus::prelude::*;

const PARLEY_CSS: Asset = asset!("/assets/parley.css");

#[component]
pub fn App() -> Element {
    let theme = use_signal(ThemeMode::default);
    let definition = theme_definition(theme());

    rsx! {
        ThemeStyles { theme }
        div { class: "{definition.body_class}",
            AppHeader { theme }
            ChatView {}
        }
    }
}

#[component]
fn ThemeStyles(theme: Signal<ThemeMode>) -> Element {
    let definition = theme_definition(theme());
    rsx! {
        document::Link { rel: "stylesheet", href: PARLEY_CSS }
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn AppHeader(theme: Signal<ThemeMode>) -> Element {
    let mut theme = theme;
    rsx! {
        div { class: "header",
            div { class: "header-content",
                h1 { class: "header-title", "Parley AI" }
                button {
                    id: "themeToggle",
                    class: "btn btn-ghost",
                    r#type: "button",
                    onclick: move |_| theme.set(theme().toggled()),
                    "{theme().toggle_label()}"
                }
            }
        }
    }
}
