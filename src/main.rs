pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use schulte::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    game::{Command, Game},
    input::PointCountField,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    timer::MonotonicClock,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const FRAME_RATE_MS: u64 = 50;

/// click the numbers in ascending order before the clock gets you
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A Schulte table reaction game: numbered targets are scattered over the board and must be clicked in ascending order. A wrong click ends the game; clearing every target wins it."
)]
pub struct Cli {
    /// number of targets to place (1-50); defaults to the last game's count
    #[clap(short = 'n', long)]
    points: Option<usize>,

    /// seed for target placement, for reproducible boards
    #[clap(long)]
    seed: Option<u64>,

    /// path to the config file
    #[clap(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub game: Game<MonotonicClock>,
    pub points: PointCountField,
}

impl App {
    pub fn new(cli: &Cli, config: &Config) -> Self {
        let settings = config.game;
        let initial = settings.clamp_points(cli.points.unwrap_or(config.point_count));
        let rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let points = PointCountField::new(initial, settings.min_points, settings.max_points);
        let mut game = Game::new(MonotonicClock::new(), settings, rng);
        game.handle(Command::SetPointCount(points.value()));

        Self { game, points }
    }

    fn set_points(&mut self, n: usize) {
        self.game.handle(Command::SetPointCount(n));
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            // ctrl+c to quit
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Flow::Quit,
            KeyCode::Enter => self.game.handle(Command::StartOrRestart),
            KeyCode::Char('a') => self.game.handle(Command::ToggleAutoPlay),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let n = self.points.push_digit(c);
                self.set_points(n);
            }
            KeyCode::Backspace => {
                let n = self.points.backspace();
                self.set_points(n);
            }
            KeyCode::Up => {
                let n = self.points.increment();
                self.set_points(n);
            }
            KeyCode::Down => {
                let n = self.points.decrement();
                self.set_points(n);
            }
            _ => {}
        }
        Flow::Continue
    }

    fn on_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        // The board belongs to the demo while auto-play is on
        if self.game.session().auto_play() {
            return;
        }

        let viewport = ui::viewport(area, self.game.settings());
        if let Some(rank) = viewport.hit_test(self.game.session(), mouse.column, mouse.row) {
            self.game.handle(Command::ClickTarget(rank));
        }
    }
}

/// Log to a file: the terminal belongs to the UI.
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let mut config = store.load();

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli, &config);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    config.point_count = config.game.clamp_points(app.points.value());
    if let Err(e) = store.save(&config) {
        log::warn!("could not save config to {}: {e}", store.path().display());
    }

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(FRAME_RATE_MS)),
    );

    loop {
        app.game.update();
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
            }
            AppEvent::Mouse(mouse) => {
                let size = terminal.size().unwrap_or_default();
                app.on_mouse(mouse, Rect::new(0, 0, size.width, size.height));
            }
        }
    }

    Ok(())
}
