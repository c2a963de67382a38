use session_inbox::config::load_settings;
use session_inbox::server::serve;

async fn run() -> Result<(), String> {
    let settings = load_settings().map_err(|err| err.to_string())?;
    eprintln!(
        "session-inbox starting on http://{} ({} mode, inbox {})",
        settings.bind,
        settings.mode(),
        settings.inbox_dir.display()
    );
    serve(settings).await.map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
