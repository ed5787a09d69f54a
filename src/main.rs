use std::io::IsTerminal;

use chat_widget::{
    config::WidgetConfig,
    services::{controller::ChatController, transport::HttpTransport},
    tui,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The TUI owns the terminal; only log when stderr is redirected.
    if !std::io::stderr().is_terminal() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();
    }

    let transport = HttpTransport::new();
    info!(endpoint = transport.endpoint(), "chat widget starting");

    let controller = ChatController::new(transport, WidgetConfig::default());
    tui::run(controller).await
}
