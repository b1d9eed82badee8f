use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tui_choropleth::app::App;
use tui_choropleth::choropleth::{MapMode, PopulationTable};
use tui_choropleth::config::Config;
use tui_choropleth::{data, ui};

fn main() -> Result<()> {
    let config = Config::from_args();
    init_logging(&config)?;

    // Build everything before touching the terminal so errors print normally
    let regions = match &config.data {
        Some(path) => data::load_regions(path, &config.properties)?,
        None => data::generate_tile_grid(),
    };
    let (width, height) = crossterm::terminal::size()?;
    let mut app = App::new(regions, PopulationTable::prefectures(), width, height)?;
    app.set_mode(config.initial_mode);
    info!(regions = app.widget.len(), "starting map");

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, app);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Log to a file when asked; stdout belongs to the map
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(())
}

/// Handle mouse events for clicking, panning and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => {
            app.mouse_up(mouse.column, mouse.row);
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                    // Map modes
                    KeyCode::Char('p') | KeyCode::Char('P') => app.set_mode(MapMode::Population),
                    KeyCode::Char('t') | KeyCode::Char('T') => app.set_mode(MapMode::Treatment),
                    KeyCode::Char('m') => app.widget.toggle_mode(),

                    // Table cursor
                    KeyCode::Tab => app.cursor_next(),
                    KeyCode::BackTab => app.cursor_prev(),
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        app.click_cursor();
                    }

                    // Pan with hjkl or arrow keys
                    KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                    // Zoom
                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    // Layer toggles
                    KeyCode::Char('o') => app.renderer.toggle_outlines(),
                    KeyCode::Char('L') => app.renderer.toggle_labels(),

                    KeyCode::Char('r') | KeyCode::Char('0') => app.refit(),

                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
