use std::time::Duration;
use std::time::Instant;

use rand::Rng;
use thiserror::Error;
use tracing::debug;
use tracing::trace;

use crate::Pixels;
use crate::color::Palette;
use crate::grid::GridError;
use crate::render::CanvasRenderer;
use crate::render::Render;
use crate::render::RenderError;
use crate::rules::Aging;
use crate::simulation::Simulation;
use crate::surface::Surface;

#[derive(Debug, Error)]
pub enum PlayError {
    #[error("Frame rate must be a positive number, got {0}")]
    InvalidFps(f64),

    #[error("Renderer error: {0}")]
    Render(#[from] RenderError),

    #[error("Board error: {0}")]
    Grid(#[from] GridError),
}

/// Everything [`play`] needs besides a surface and a source of randomness.
#[derive(Debug, Clone)]
pub struct PlayOptions {
    /// Chance of each cell starting alive
    pub alive_fraction: f64,

    pub palette: Palette,

    /// Side of the square block of pixels drawn for each cell
    pub pixel_size: Pixels,

    /// Upper bound on ticks per second
    pub fps: f64,

    pub aging: Aging,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            alive_fraction: 0.1,
            palette: Palette::homepage(),
            pixel_size: 4,
            fps: 16.0,
            aging: Aging::Tracked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Built, no tick scheduled yet
    Idle,

    /// Ticking whenever a frame arrives past the deadline
    Running,

    /// Done for good. Start over with a fresh [`play`].
    Stopped,
}

/// A simulation wired to a renderer, ticked by the host's frames.
///
/// The host calls [`Animation::on_frame`] every time it is ready to show a new frame. A tick
/// (step, then render) only happens once the previous tick is at least `1 / fps` seconds old, so
/// ticks are spaced by the frame rate limit and by the host's own frame rate, whichever is slower.
pub struct Animation<R> {
    simulation: Simulation,
    renderer: R,
    state: State,

    /// Minimum time between two ticks
    interval: Duration,

    /// Deadline of the next tick. `None` means nothing is scheduled.
    pending: Option<Instant>,

    ticks: u64,
}

/// Seed a simulation that fills `surface` and start animating it.
///
/// The first tick is due right away, on the first frame the host delivers.
pub fn play<S, G>(
    surface: S,
    options: PlayOptions,
    rng: &mut G,
) -> Result<Animation<CanvasRenderer<S>>, PlayError>
where
    S: Surface,
    G: Rng + ?Sized,
{
    let PlayOptions {
        alive_fraction,
        palette,
        pixel_size,
        fps,
        aging,
    } = options;

    let renderer = CanvasRenderer::new(surface, palette, pixel_size, pixel_size)?;
    let (width, height) = renderer.grid_size();
    let simulation = Simulation::new(width, height, alive_fraction, rng)?.with_aging(aging);

    let mut animation = Animation::new(simulation, renderer, fps)?;
    animation.start(Instant::now());

    Ok(animation)
}

impl<R> Animation<R>
where
    R: Render,
{
    /// Wire up an idle animation. Nothing happens until [`Animation::start`].
    pub fn new(simulation: Simulation, renderer: R, fps: f64) -> Result<Self, PlayError> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(PlayError::InvalidFps(fps));
        }

        // rates this slow have no representable interval
        let Ok(interval) = Duration::try_from_secs_f64(1.0 / fps) else {
            return Err(PlayError::InvalidFps(fps));
        };

        Ok(Self {
            simulation,
            renderer,
            state: State::Idle,
            interval,
            pending: None,
            ticks: 0,
        })
    }

    /// Schedule the first tick at `now`. Only an idle animation can start.
    pub fn start(&mut self, now: Instant) {
        if self.state != State::Idle {
            return;
        }

        debug!(interval = ?self.interval, "starting animation");

        self.state = State::Running;
        self.pending = Some(now);
    }

    /// Cancel any scheduled tick. Frames delivered afterwards do nothing. Safe to call in any state
    /// and any number of times.
    pub fn stop(&mut self) {
        if self.state != State::Stopped {
            debug!(ticks = self.ticks, "stopping animation");
        }

        self.state = State::Stopped;
        self.pending = None;
    }

    /// The host's frame callback. Returns whether a tick ran.
    ///
    /// On error the animation stops, since a frame either renders completely or not at all.
    pub fn on_frame(&mut self, now: Instant) -> Result<bool, RenderError> {
        if self.state != State::Running {
            return Ok(false);
        }

        match self.pending {
            Some(due) if due <= now => {}
            _ => return Ok(false),
        }

        self.pending = None;

        self.simulation.step();
        if let Err(e) = self.renderer.render(&self.simulation) {
            self.stop();
            return Err(e);
        }

        self.ticks += 1;
        self.pending = now.checked_add(self.interval);

        if self.pending.is_none() {
            debug!(interval = ?self.interval, "next tick is past the end of time");
        }

        trace!(
            tick = self.ticks,
            population = self.simulation.population(),
            "tick"
        );

        Ok(true)
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Deadline of the next tick, if one is scheduled
    pub fn next_due(&self) -> Option<Instant> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;
    use std::time::Instant;

    use super::Animation;
    use super::PlayError;
    use super::State;
    use crate::grid::Grid;
    use crate::render::Render;
    use crate::render::RenderError;
    use crate::simulation::Simulation;

    /// Counts renders, optionally failing them
    #[derive(Default)]
    struct Counter {
        renders: usize,
        fail: bool,
    }

    impl Render for Counter {
        fn render(&mut self, _simulation: &Simulation) -> Result<(), RenderError> {
            if self.fail {
                return Err(std::io::Error::other("surface went away").into());
            }

            self.renders += 1;
            Ok(())
        }
    }

    fn animation(fps: f64) -> Animation<Counter> {
        let grid = Grid::from_rows(&[[0u32, 1, 0], [0, 1, 0], [0, 1, 0]]).unwrap();
        Animation::new(Simulation::from_grid(grid), Counter::default(), fps).unwrap()
    }

    #[test]
    fn rejects_bad_fps() {
        for fps in [
            0.0,
            -3.0,
            f64::NAN,
            f64::INFINITY,
            1e-30,
            f64::MIN_POSITIVE,
        ] {
            let grid = Grid::new(1, 1).unwrap();
            let res = Animation::new(Simulation::from_grid(grid), Counter::default(), fps);

            assert!(matches!(res, Err(PlayError::InvalidFps(_))), "fps {fps}");
        }
    }

    #[test]
    fn glacial_fps_ticks_once() {
        let t0 = Instant::now();
        let mut anim = animation(1e-19);
        anim.start(t0);

        assert!(anim.on_frame(t0).unwrap());
        assert!(!anim.on_frame(t0 + Duration::from_secs(3600)).unwrap());

        assert_eq!(anim.state(), State::Running);
        assert_eq!(anim.ticks(), 1);
    }

    #[test]
    fn idle_ignores_frames() {
        let mut anim = animation(10.0);

        assert_eq!(anim.state(), State::Idle);
        assert!(!anim.on_frame(Instant::now()).unwrap());
        assert_eq!(anim.renderer().renders, 0);
    }

    #[test]
    fn first_tick_on_first_frame() {
        let t0 = Instant::now();
        let mut anim = animation(10.0);

        anim.start(t0);
        assert!(anim.on_frame(t0).unwrap());

        assert_eq!(anim.ticks(), 1);
        assert_eq!(anim.simulation().generation(), 1);
        assert_eq!(anim.renderer().renders, 1);
        assert_eq!(anim.next_due(), Some(t0 + Duration::from_millis(100)));
    }

    #[test]
    fn ticks_are_throttled() {
        let t0 = Instant::now();
        let mut anim = animation(10.0);
        anim.start(t0);

        // a 60Hz host delivering frames for half a second
        let ran = (0..30)
            .map(|n| t0 + Duration::from_micros(16_667 * n))
            .filter(|&now| anim.on_frame(now).unwrap())
            .count();

        // ticks on the first frames past 0, 100, 200, 300 and 400 ms
        assert_eq!(ran, 5);
        assert_eq!(anim.renderer().renders, 5);
    }

    #[test]
    fn slow_host_bounds_ticks() {
        let t0 = Instant::now();
        let mut anim = animation(1000.0);
        anim.start(t0);

        for n in 0..4 {
            assert!(anim.on_frame(t0 + Duration::from_millis(50 * n)).unwrap());
        }

        assert_eq!(anim.ticks(), 4);
    }

    #[test]
    fn stop_before_any_frame() {
        let t0 = Instant::now();
        let mut anim = animation(10.0);
        anim.start(t0);

        anim.stop();
        anim.stop();

        assert_eq!(anim.state(), State::Stopped);
        assert!(!anim.is_pending());
        assert!(!anim.on_frame(t0).unwrap());
        assert_eq!(anim.renderer().renders, 0);
    }

    #[test]
    fn stop_when_idle() {
        let mut anim = animation(10.0);
        anim.stop();

        assert_eq!(anim.state(), State::Stopped);
        assert!(!anim.is_pending());
    }

    #[test]
    fn frames_after_stop_do_nothing() {
        let t0 = Instant::now();
        let mut anim = animation(10.0);
        anim.start(t0);
        anim.on_frame(t0).unwrap();

        anim.stop();

        // long past the deadline that was pending before the stop
        assert!(!anim.on_frame(t0 + Duration::from_secs(5)).unwrap());
        assert_eq!(anim.ticks(), 1);
        assert_eq!(anim.simulation().generation(), 1);
    }

    #[test]
    fn stopped_cannot_restart() {
        let t0 = Instant::now();
        let mut anim = animation(10.0);
        anim.stop();
        anim.start(t0);

        assert_eq!(anim.state(), State::Stopped);
        assert!(!anim.on_frame(t0).unwrap());
    }

    #[test]
    fn render_failure_stops() {
        let t0 = Instant::now();
        let mut anim = animation(10.0);
        anim.renderer_mut().fail = true;
        anim.start(t0);

        assert!(anim.on_frame(t0).is_err());
        assert_eq!(anim.state(), State::Stopped);
        assert!(!anim.is_pending());
    }
}
