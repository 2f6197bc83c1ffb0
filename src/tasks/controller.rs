use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{self, Receiver};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Configuration;
use crate::error::Error;
use crate::events::{Command, Tick};
use crate::navigator::{Direction, Navigator};
use crate::render::{ImageDecoder, RenderSize, StartPage};
use crate::scan::{ImageSet, ScanOptions};
use crate::surface::{Prompt, Slide, Surface};
use crate::tasks::autoplay;
use crate::view::{Autoplay, View, ViewChange, ViewSM};

#[derive(Debug, Clone)]
pub struct SlideshowOptions {
    pub render_size: RenderSize,
    pub thumbnail_size: RenderSize,
    pub preview_count: usize,
    pub scan: ScanOptions,
}

impl From<&Configuration> for SlideshowOptions {
    fn from(cfg: &Configuration) -> Self {
        Self {
            render_size: cfg.render_size,
            thumbnail_size: cfg.thumbnail_size,
            preview_count: cfg.preview_count,
            scan: cfg.scan_options(),
        }
    }
}

/// What the event loop must do after a command was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Continue,
    StartTimer,
    StopTimer,
    Quit,
}

/// Owns the navigator, the mounted view and the collaborators.
pub struct Slideshow<D, S> {
    opts: SlideshowOptions,
    decoder: D,
    surface: S,
    navigator: Navigator,
    directory: Option<PathBuf>,
    view: ViewSM,
    session: u64,
}

impl<D: ImageDecoder, S: Surface> Slideshow<D, S> {
    pub fn new(opts: SlideshowOptions, decoder: D, surface: S) -> Self {
        Self {
            opts,
            decoder,
            surface,
            navigator: Navigator::new(ImageSet::from_paths(PathBuf::new(), Vec::new())),
            directory: None,
            view: ViewSM::default(),
            session: 0,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn view(&self) -> View {
        self.view.current()
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Id of the current (or last) play session; ticks from older sessions are ignored.
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Open the startup directory, or ask for one when none was configured.
    pub fn start(&mut self, dir: Option<&Path>) -> Result<(), Error> {
        match dir {
            Some(dir) => self.open(dir).map(|_| ()),
            None => {
                info!("no directory selected, waiting for user input");
                self.show_prompt(&Prompt::NoDirectory)
            }
        }
    }

    /// Scan `dir` and make it the active set.
    ///
    /// Returns `false` (after prompting) when the directory is unusable; the
    /// previous set stays active in that case.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn open(&mut self, dir: &Path) -> Result<bool, Error> {
        let set = match ImageSet::scan(dir, &self.opts.scan, &self.decoder) {
            Ok(set) => set,
            Err(err) if err.is_recoverable() => {
                self.recover(&err)?;
                return Ok(false);
            }
            Err(err) => return Err(err),
        };
        if set.is_empty() {
            warn!("no decodable images; keeping previous directory");
            self.show_prompt(&Prompt::NoImages(dir.to_path_buf()))?;
            return Ok(false);
        }

        info!(images = set.len(), "directory opened");
        self.navigator.replace(set);
        self.directory = Some(dir.to_path_buf());
        if let Some(change) = self.view.reset() {
            debug!(from = ?change.from, "view reset to start");
        }
        self.show_start_page()?;
        Ok(true)
    }

    /// Apply one command. Recoverable errors are turned into a directory prompt.
    pub fn handle(&mut self, cmd: Command) -> Result<Reaction, Error> {
        match self.dispatch(cmd) {
            Err(err) if err.is_recoverable() => {
                self.recover(&err)?;
                Ok(Reaction::Continue)
            }
            other => other,
        }
    }

    fn dispatch(&mut self, cmd: Command) -> Result<Reaction, Error> {
        match cmd {
            Command::Quit => return Ok(Reaction::Quit),
            Command::Tick(tick) => return self.on_tick(tick),
            Command::SelectDirectory(None) => {
                info!("directory selection cancelled");
                if self.directory.is_none() {
                    self.show_prompt(&Prompt::NoDirectory)?;
                }
                return Ok(Reaction::Continue);
            }
            Command::SelectDirectory(Some(dir)) => {
                let was_running = self.is_running();
                if self.open(&dir)? && was_running {
                    return Ok(Reaction::StopTimer);
                }
                return Ok(Reaction::Continue);
            }
            _ => {}
        }

        if self.directory.is_none() {
            self.show_prompt(&Prompt::NoDirectory)?;
            return Ok(Reaction::Continue);
        }

        match self.view.on_command(&cmd) {
            Some(change) => self.enter(change),
            None => self.navigate(&cmd),
        }
    }

    fn enter(&mut self, change: ViewChange) -> Result<Reaction, Error> {
        debug!(from = ?change.from, to = ?change.to, "view changed");
        match (change.from, change.to) {
            (_, View::Viewing) => {
                self.navigator.reset();
                self.show_step(Direction::Forward)?;
                Ok(Reaction::Continue)
            }
            (View::Start, View::Playing(_)) => {
                self.navigator.reset();
                self.clear()?;
                Ok(Reaction::Continue)
            }
            (_, View::Playing(Autoplay::Running)) => {
                self.session += 1;
                Ok(Reaction::StartTimer)
            }
            (_, View::Playing(Autoplay::Paused)) => {
                debug!("loop paused");
                Ok(Reaction::StopTimer)
            }
            (from, View::Start) => {
                self.navigator.reset();
                self.clear()?;
                self.show_start_page()?;
                if from == View::Playing(Autoplay::Running) {
                    Ok(Reaction::StopTimer)
                } else {
                    Ok(Reaction::Continue)
                }
            }
        }
    }

    fn navigate(&mut self, cmd: &Command) -> Result<Reaction, Error> {
        match (self.view.current(), cmd) {
            (View::Viewing, Command::Next | Command::Confirm) => {
                self.show_step(Direction::Forward)?;
            }
            (View::Viewing, Command::Previous) => {
                self.show_step(Direction::Backward)?;
            }
            (view, cmd) => debug!(?view, ?cmd, "command ignored in this view"),
        }
        Ok(Reaction::Continue)
    }

    fn on_tick(&mut self, tick: Tick) -> Result<Reaction, Error> {
        if self.is_running() && tick.session == self.session {
            self.show_step(Direction::Forward)?;
        } else {
            debug!(tick = tick.session, current = self.session, "stale tick ignored");
        }
        Ok(Reaction::Continue)
    }

    fn is_running(&self) -> bool {
        self.view.current() == View::Playing(Autoplay::Running)
    }

    fn show_step(&mut self, direction: Direction) -> Result<(), Error> {
        let advance = self.navigator.advance(direction)?;
        let Some(path) = self.navigator.current_path().map(Path::to_path_buf) else {
            return Ok(());
        };
        let image = match self.decoder.decode(&path, self.opts.render_size) {
            Ok(img) => Some(img),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not display image");
                None
            }
        };
        self.surface
            .show_slide(&Slide {
                label: advance.label,
                path,
                image,
            })
            .map_err(Error::Render)
    }

    fn show_start_page(&mut self) -> Result<(), Error> {
        let page = StartPage::build(
            self.navigator.images(),
            &self.decoder,
            self.opts.thumbnail_size,
            self.opts.preview_count,
        );
        self.surface.show_start(&page).map_err(Error::Render)
    }

    fn clear(&mut self) -> Result<(), Error> {
        self.surface.clear().map_err(Error::Render)
    }

    fn show_prompt(&mut self, prompt: &Prompt) -> Result<(), Error> {
        self.surface.prompt(prompt).map_err(Error::Render)
    }

    fn recover(&mut self, err: &Error) -> Result<(), Error> {
        warn!(error = %err, "asking for another directory");
        let prompt = match err {
            Error::DirectoryUnavailable(dir) => Prompt::DirectoryUnavailable(dir.clone()),
            Error::EmptyImageSet => match &self.directory {
                Some(dir) => Prompt::NoImages(dir.clone()),
                None => Prompt::NoDirectory,
            },
            _ => Prompt::NoDirectory,
        };
        self.show_prompt(&prompt)
    }
}

/// Single event loop: every command is handled to completion before the next.
///
/// Returns the slideshow when the command channel closes, `Quit` arrives or
/// `cancel` fires.
pub async fn run<D, S>(
    mut slideshow: Slideshow<D, S>,
    mut commands: Receiver<Command>,
    delay: Duration,
    cancel: CancellationToken,
) -> Result<Slideshow<D, S>>
where
    D: ImageDecoder,
    S: Surface,
{
    let (tick_tx, mut tick_rx) = mpsc::channel::<Tick>(1);
    let mut timer: Option<CancellationToken> = None;

    loop {
        let cmd = select! {
            _ = cancel.cancelled() => {
                info!("cancel received; exiting controller");
                break;
            }
            Some(tick) = tick_rx.recv() => Command::Tick(tick),
            maybe = commands.recv() => match maybe {
                Some(cmd) => cmd,
                None => {
                    info!("command channel closed; exiting controller");
                    break;
                }
            },
        };

        match slideshow.handle(cmd) {
            Ok(Reaction::Continue) => {}
            Ok(Reaction::StartTimer) => {
                stop_timer(&mut timer, &mut tick_rx);
                let token = cancel.child_token();
                tokio::spawn(autoplay::run(
                    slideshow.session(),
                    delay,
                    tick_tx.clone(),
                    token.clone(),
                ));
                timer = Some(token);
            }
            Ok(Reaction::StopTimer) => stop_timer(&mut timer, &mut tick_rx),
            Ok(Reaction::Quit) => {
                info!("quit requested");
                break;
            }
            Err(err) => error!("command failed: {err}"),
        }
    }

    stop_timer(&mut timer, &mut tick_rx);
    Ok(slideshow)
}

fn stop_timer(timer: &mut Option<CancellationToken>, ticks: &mut Receiver<Tick>) {
    if let Some(token) = timer.take() {
        token.cancel();
    }
    while ticks.try_recv().is_ok() {}
}
