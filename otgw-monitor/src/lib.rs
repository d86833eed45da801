use std::sync::Arc;

use tokio::io::BufReader;
use tokio::sync::broadcast::error::RecvError;

use crate::app::App;
use crate::configs::Settings;
use crate::errors::MonitorError;
use crate::services::FeedEvent;

pub mod app;
pub mod charts;
pub mod configs;
pub mod console;
pub mod errors;
pub mod services;

pub async fn run(settings: &Arc<Settings>) -> Result<(), MonitorError> {
    let mut app = App::new(settings.clone())?;

    let printer = tokio::spawn(print_lines(app.subscribe()));
    app.start().await;

    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    let result = console::run_console(&app, input, &mut output).await;

    app.shutdown().await;
    printer.abort();

    Ok(result?)
}

async fn print_lines(mut events: tokio::sync::broadcast::Receiver<FeedEvent>) {
    loop {
        match events.recv().await {
            Ok(FeedEvent::Line(line)) => println!("{line}"),
            Ok(FeedEvent::Rejected { message, reason }) => println!("Invalid message {message:?}: {reason}"),
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => tracing::warn!("Dropped {} live feed events", skipped),
            Err(RecvError::Closed) => break,
        }
    }
}
