mod app;
mod components;
mod theme;
mod utils;

use installer_app_core::{SessionController, SystemLauncher};
use installer_config::DEFAULT_TRANSCRIPT_PATH;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub use installer_app_core::CommandSpec;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Opens the progress page for `command`. The installer starts when the user
/// presses INSTALL.
pub fn run(command: CommandSpec) -> eframe::Result<()> {
    setup_logging();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([760.0, 560.0])
            .with_min_inner_size([600.0, 420.0])
            .with_title("LOC // INSTALLER"),
        ..Default::default()
    };

    eframe::run_native(
        "LOC Installer",
        options,
        Box::new(|cc| {
            theme::setup(&cc.egui_ctx);

            let controller = SessionController::new(SystemLauncher::new(), command)
                .with_transcript(DEFAULT_TRANSCRIPT_PATH);
            Ok(Box::new(app::InstallerUiApp::new(controller)))
        }),
    )
}
