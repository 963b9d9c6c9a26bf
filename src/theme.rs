use crate::types::ThemeMode;

pub struct ThemeDefinition {
    pub css: &'static str,
    pub body_class: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Light => ThemeDefinition {
            css: LIGHT_THEME,
            body_class: "app-shell",
        },
        ThemeMode::Dark => ThemeDefinition {
            css: DARK_THEME,
            body_class: "app-shell dark-mode",
        },
    }
}

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #f4f6fb;
    --color-bg-panel: #ffffff;
    --color-text-primary: #1d2433;
    --color-text-muted: #5b6478;
    --color-border: #d9deea;
    --color-input-bg: #ffffff;
    --color-user-bg: #4f6df5;
    --color-user-text: #ffffff;
    --color-bot-bg: #eef1f8;
    --color-bot-text: #1d2433;
    --color-accent: #4f6df5;
    --color-timestamp: #8a93a6;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #10131a;
    --color-bg-panel: #181c25;
    --color-text-primary: #e8ebf2;
    --color-text-muted: #a0a8ba;
    --color-border: #2b3140;
    --color-input-bg: #0d1016;
    --color-user-bg: #6d85ff;
    --color-user-text: #0d1016;
    --color-bot-bg: #222838;
    --color-bot-text: #e8ebf2;
    --color-accent: #6d85ff;
    --color-timestamp: #7a8398;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;
