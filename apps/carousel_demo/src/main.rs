use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use carousel_core::{
    window::spawn_viewport_bridge, AccessibilityAnnouncer, BreakpointClassifier, Dispatch,
    InputController, RotationEngine, ViewportListener,
};
use clap::Parser;
use futures::{FutureExt, StreamExt};
use shared::protocol::RotationEvent;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, watch},
};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;

use commands::{parse_command, DemoCommand, HELP};
use config::{load_items, resolve_settings, CliOverrides};
use render::{FrameRenderer, TerminalRenderer};

#[derive(Parser, Debug)]
#[command(about = "Drive the statistic card rotation from the terminal")]
struct Args {
    /// Settings file; missing files are ignored.
    #[arg(long, default_value = "carousel.toml")]
    config: PathBuf,
    /// Item catalog (TOML); defaults to the bundled cards.
    #[arg(long)]
    items: Option<PathBuf>,
    /// Viewport width in CSS pixels.
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Do not start autoplay on mount.
    #[arg(long)]
    no_autoplay: bool,
    /// Emit JSON lines instead of text.
    #[arg(long)]
    json: bool,
    /// Exit after this many seconds, even if stdin stays open.
    #[arg(long)]
    run_for_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let cli = CliOverrides {
        items_path: args.items.clone(),
        viewport_width: args.width,
        interval_ms: args.interval_ms,
        no_autoplay: args.no_autoplay,
    };
    let mut settings = resolve_settings(&args.config, &cli)?;

    let items = load_items(settings.items_path.as_deref())?;
    let classifier = BreakpointClassifier::new(settings.rotation.breakpoints);
    let breakpoint = classifier.classify(settings.viewport_width);
    settings.rotation.initial_breakpoint = breakpoint;
    info!(
        items = items.len(),
        width = settings.viewport_width,
        breakpoint = breakpoint.name(),
        interval_ms = settings.rotation.interval_ms,
        "mounting carousel"
    );

    let engine = Arc::new(RotationEngine::with_tokio_timer(
        items,
        settings.rotation.clone(),
    ));
    let (announce_tx, mut announcements) = mpsc::unbounded_channel();
    engine.add_observer(Arc::new(AccessibilityAnnouncer::new(announce_tx)));
    let mut events = BroadcastStream::new(engine.subscribe_events());

    let (viewport_tx, viewport_rx) = watch::channel(breakpoint);
    let listener: Arc<dyn ViewportListener> = engine.clone();
    let bridge = spawn_viewport_bridge(listener, viewport_rx);
    let input = InputController::new(Arc::clone(&engine));

    let mut renderer = TerminalRenderer::new(tokio::io::stdout(), args.json);
    match engine.frame() {
        Some(frame) => renderer.render_frame(&frame, engine.items()).await?,
        None => renderer.render_notice("no items to rotate").await?,
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let run_for = args.run_for_secs.map(Duration::from_secs);
    let deadline = async move {
        match run_for {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("failed to read stdin")? else {
                    debug!("stdin closed");
                    stdin_open = false;
                    if run_for.is_none() {
                        break;
                    }
                    continue;
                };
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(err) => {
                        renderer.render_error(&err).await?;
                        continue;
                    }
                };
                debug!(command = command.name(), "demo command");
                match command {
                    DemoCommand::Action(action) => {
                        if input.handle(action) == Dispatch::Ignored {
                            renderer.render_notice("input ignored").await?;
                        }
                    }
                    DemoCommand::Width(width) => {
                        let next = classifier.classify(width);
                        viewport_tx.send_if_modified(|current| {
                            let changed = *current != next;
                            *current = next;
                            changed
                        });
                    }
                    DemoCommand::Status => renderer.render_status(&engine.snapshot()).await?,
                    DemoCommand::Help => renderer.render_notice(HELP).await?,
                    DemoCommand::Quit => break,
                }
            }
            event = events.next() => {
                let Some(event) = event else {
                    break;
                };
                render_event(&mut renderer, &engine, event).await?;
            }
            Some(announcement) = announcements.recv() => {
                // The engine broadcasts a frame before announcing it, so the
                // frame is already queued here.
                while let Some(Some(event)) = events.next().now_or_never() {
                    render_event(&mut renderer, &engine, event).await?;
                }
                renderer.render_announcement(&announcement).await?;
            }
            _ = &mut deadline => {
                info!("run time elapsed");
                break;
            }
            result = &mut shutdown => {
                result.context("failed to listen for ctrl-c")?;
                info!("interrupt received");
                break;
            }
        }
    }

    engine.stop();
    drop(input);
    drop(viewport_tx);
    bridge.await.context("viewport bridge task failed")?;
    info!("carousel unmounted");
    Ok(())
}

async fn render_event(
    renderer: &mut impl FrameRenderer,
    engine: &RotationEngine,
    event: Result<RotationEvent, BroadcastStreamRecvError>,
) -> Result<()> {
    match event {
        Ok(RotationEvent::StateChanged(frame)) => {
            renderer.render_frame(&frame, engine.items()).await
        }
        Ok(RotationEvent::AutoplayUnavailable { reason }) => {
            renderer
                .render_notice(&format!("autoplay unavailable: {reason}"))
                .await
        }
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "renderer fell behind the engine");
            Ok(())
        }
    }
}
