use crate::audit::AuditLog;
use crate::gateway::QueueGateway;
use crate::ui::app_component::AppComponent;
use crate::ui::core::{EventHandler, EventType};
use crate::ui::state::AppState;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Set up the terminal, run the event loop, and restore the terminal on exit
pub async fn run_app(
    state: AppState,
    gateway: Arc<dyn QueueGateway>,
    audit: AuditLog,
    request_timeout: Duration,
) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppComponent::new(state, gateway, audit, request_timeout);
    let mut event_handler = EventHandler::new();

    app.start();
    let result = run_app_loop(&mut terminal, &mut app, &mut event_handler).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppComponent,
    event_handler: &mut EventHandler,
) -> anyhow::Result<()> {
    let mut needs_render = true;

    loop {
        if needs_render {
            terminal.draw(|f| app.render(f, f.area()))?;
            event_handler.mark_rendered();
            needs_render = false;
        }

        let event = event_handler.next_event().await?;
        match event {
            EventType::Key(_) | EventType::Resize(_, _) => {
                needs_render |= app.handle_terminal_event(event);
            }
            EventType::Tick => {
                // Task results and timer ticks arrive between key presses
                if app.process_background_events() > 0 {
                    needs_render = true;
                }
                // Keep the pending-operation spinner moving
                if app.state().is_loading() && event_handler.time_since_last_render() >= Duration::from_millis(250) {
                    needs_render = true;
                }
            }
            EventType::Other => {}
        }

        if app.should_quit() {
            log::info!("Quit requested with {} task(s) still running", app.active_task_count());
            break;
        }
    }

    Ok(())
}
