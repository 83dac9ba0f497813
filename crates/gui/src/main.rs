mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::orchestrator`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use nfinit_gui_lib::artifact;
pub use nfinit_gui_lib::driver;
pub use nfinit_gui_lib::intent;
pub use nfinit_gui_lib::orchestrator;
pub use nfinit_gui_lib::state;
pub use nfinit_gui_lib::worker;

use app::NfinitApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nfinit_gui=info,nfinit_gui_lib=info".into()),
        )
        .init();

    // Parse --code <path> argument
    let initial_code = parse_code_arg();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return;
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("nfinit: Conversational Part Designer")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    if let Err(e) = eframe::run_native(
        "nfinit-gui",
        native_options,
        Box::new(move |cc| Ok(Box::new(NfinitApp::new(cc, handle, initial_code)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_code_arg() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--code" && i + 1 < args.len() {
            let path = &args[i + 1];
            match std::fs::read_to_string(path) {
                Ok(code) => {
                    tracing::info!("Loaded code from {path} ({} lines)", code.lines().count());
                    return Some(code);
                }
                Err(e) => {
                    tracing::error!("Failed to read code file {path}: {e}");
                }
            }
            break;
        }
        i += 1;
    }
    None
}
