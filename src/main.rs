use std::fs;
use std::io;
use std::io::Stdout;
use std::time::Duration;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::cursor;
use crossterm::event;
use crossterm::event::Event as CtEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use crossterm::execute;
use crossterm::terminal;
use rand::rngs::StdRng;
use tracing::debug;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bensway::config::Config;
use bensway::driver;
use bensway::driver::Animation;
use bensway::driver::PlayError;
use bensway::render::CanvasRenderer;
use bensway::render::Render;
use bensway::render::RenderError;
use bensway::render::SvgRenderer;
use bensway::simulation::Simulation;
use bensway::term::TerminalSurface;

/// How often the terminal gets a chance to show a frame, whether or not a tick is due.
const HOST_FRAMERATE: u32 = 60;
const HOST_FRAMETIME: Duration = Duration::from_nanos(1_000_000_000 / HOST_FRAMERATE as u64);

type TermAnimation = Animation<CanvasRenderer<TerminalSurface<Stdout>>>;

enum Event {
    Resize { cols: u16, rows: u16 },
    Exit,
}

fn handle_event(event: CtEvent) -> Option<Event> {
    match event {
        CtEvent::Key(
            KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            },
        ) => Some(Event::Exit),
        CtEvent::Resize(cols, rows) => Some(Event::Resize { cols, rows }),
        _ => None,
    }
}

fn setup(
    config: &Config,
    rng: &mut StdRng,
    cols: u16,
    rows: u16,
) -> anyhow::Result<TermAnimation> {
    let surface = TerminalSurface::new(io::stdout(), cols, rows, config.backdrop);
    let options = config.play_options()?;

    let animation = driver::play(surface, options, rng)
        .with_context(|| format!("failed to start on a {cols}x{rows} terminal"))?;

    debug!(cols, rows, grid = ?animation.renderer().grid_size(), "playing");

    Ok(animation)
}

/// Whether `setup` failed only because the terminal can't fit a single cell right now
fn too_small(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PlayError>(),
        Some(PlayError::Render(RenderError::SurfaceTooSmall { .. }))
    )
}

fn animate(config: &Config) -> anyhow::Result<()> {
    let mut rng = config.rng();
    let (cols, rows) = terminal::size()?;
    let mut animation = setup(config, &mut rng, cols, rows)?;

    loop {
        let t = Instant::now();

        let event = if event::poll(HOST_FRAMETIME)? {
            handle_event(event::read()?)
        } else {
            None
        };

        match event {
            None => {}
            Some(Event::Exit) => break,
            Some(Event::Resize { cols, rows }) => {
                // never two animations on one terminal
                animation.stop();
                execute!(io::stdout(), terminal::Clear(terminal::ClearType::All))?;

                // a shrunk terminal keeps the old animation stopped until the next resize
                match setup(config, &mut rng, cols, rows) {
                    Ok(next) => animation = next,
                    Err(e) if too_small(&e) => debug!(cols, rows, "terminal too small, waiting"),
                    Err(e) => return Err(e),
                }
            }
        }

        animation.on_frame(Instant::now())?;

        let time_left = HOST_FRAMETIME.saturating_sub(t.elapsed());
        std::thread::sleep(time_left);
    }

    animation.stop();
    info!(
        generations = animation.simulation().generation(),
        "exiting"
    );

    Ok(())
}

fn write_svg(config: &Config) -> anyhow::Result<()> {
    let Some(path) = &config.svg else {
        return Ok(());
    };

    let mut rng = config.rng();
    let mut simulation =
        Simulation::new(config.width, config.height, config.alive_fraction, &mut rng)
            .context("invalid board size")?
            .with_aging(config.aging());

    simulation.steps(config.generations);

    let mut svg = SvgRenderer::new(config.cell_size, config.cell_size)?;
    svg.render(&simulation)?;

    fs::write(path, svg.document())
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(
        path = %path.display(),
        population = simulation.population(),
        "wrote board"
    );
    debug!("final board:\n{}", simulation.grid());

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::parse();

    if config.svg.is_some() {
        return write_svg(&config);
    }

    terminal::enable_raw_mode()?;
    execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

    let res = animate(&config);

    execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    res
}
