#[cfg(not(target_arch = "wasm32"))]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// The web build logs through the subscriber dioxus installs on launch.
#[cfg(target_arch = "wasm32")]
fn init_tracing() {}

fn main() {
    parley::config::load_dotenv();
    init_tracing();
    dioxus::launch(parley::ui::App);
}
