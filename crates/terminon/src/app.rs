//! The interactive host.
//!
//! One current-thread tokio runtime drives the [`Workspace`] reactor. PTY
//! reader threads and the input thread feed it through channels; every
//! event runs to completion before the screen is redrawn.

use crate::input::{Focus, InputRouter, Routed};
use crate::render::Screen;
use anyhow::{Context, Result};
use broadcast::Broadcast;
use crossterm::event::Event;
use settings::{Config, JsonFileStore};
use terminal::{host_event_channel, platform_default_shell, ProcessHost, PtyHost, TerminalSurface};
use terminon_workspace::{ActiveView, ConfigManager, Workspace, WorkspaceSignal};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tracing::{debug, info};

pub fn run(config: &Config, profile_override: Option<&str>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;
    runtime.block_on(event_loop(config, profile_override))
}

/// Forward terminal input from a blocking reader thread.
fn spawn_input_reader(events: UnboundedSender<Event>) -> Result<()> {
    std::thread::Builder::new()
        .name("terminon-input".into())
        .spawn(move || loop {
            match crossterm::event::read() {
                Ok(event) => {
                    if events.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to read terminal input: {}", e);
                    break;
                }
            }
        })
        .context("Failed to spawn input thread")?;
    Ok(())
}

async fn event_loop(config: &Config, profile_override: Option<&str>) -> Result<()> {
    let (host_events, mut host_rx) = host_event_channel();
    let host = PtyHost::new(
        host_events,
        platform_default_shell(config.windows_shell_command()),
    );
    let manager = ConfigManager::load(Box::new(JsonFileStore::open_default()), Broadcast::new());
    let mut router = InputRouter::new(config);

    let mut screen = Screen::enter()?;
    let mut workspace = Workspace::new(
        host,
        manager,
        TerminalSurface::factory(config.effective_scrollback()),
        screen.content_area(),
    );
    workspace.open_startup(profile_override.or(config.startup_profile.as_deref()));

    let (input_events, mut input_rx) = unbounded_channel();
    spawn_input_reader(input_events)?;

    screen.draw(&workspace, router.awaiting_command())?;
    loop {
        let signal = tokio::select! {
            Some(event) = host_rx.recv() => {
                let mut signal = workspace.handle_host_event(event);
                // Drain bursts before repainting
                while signal == WorkspaceSignal::Continue {
                    match host_rx.try_recv() {
                        Ok(event) => signal = workspace.handle_host_event(event),
                        Err(_) => break,
                    }
                }
                signal
            }
            Some(event) = input_rx.recv() => {
                handle_input(&mut workspace, &mut router, &mut screen, event)
            }
            else => WorkspaceSignal::Exit,
        };

        if workspace.pump_config() {
            debug!("Configuration change applied");
        }
        if signal == WorkspaceSignal::Exit {
            break;
        }
        screen.draw(&workspace, router.awaiting_command())?;
    }

    workspace.shutdown();
    drop(screen);
    info!("Terminon shutting down");
    Ok(())
}

fn focus<H: ProcessHost>(workspace: &Workspace<H>) -> Focus {
    if workspace.menu().is_open() {
        return Focus::Panel;
    }
    match workspace.active_view() {
        ActiveView::Terminal(surface) => Focus::Terminal {
            application_cursor: surface.application_cursor(),
        },
        ActiveView::Settings(_) | ActiveView::Welcome { .. } => Focus::Panel,
    }
}

fn handle_input<H: ProcessHost>(
    workspace: &mut Workspace<H>,
    router: &mut InputRouter,
    screen: &mut Screen,
    event: Event,
) -> WorkspaceSignal {
    match event {
        Event::Key(key) => match router.route(key, focus(workspace)) {
            Routed::Action(action) => workspace.handle_action(action),
            Routed::Panel(key) => workspace.handle_panel_key(key),
            Routed::Input(data) => {
                workspace.send_input(&data);
                WorkspaceSignal::Continue
            }
            Routed::Ignored => WorkspaceSignal::Continue,
        },
        Event::Paste(text) => {
            if let Routed::Input(data) = router.paste(text, focus(workspace)) {
                workspace.send_input(&data);
            }
            WorkspaceSignal::Continue
        }
        Event::Resize(cols, rows) => {
            screen.resize(cols, rows);
            workspace.resize(screen.content_area());
            WorkspaceSignal::Continue
        }
        _ => WorkspaceSignal::Continue,
    }
}
