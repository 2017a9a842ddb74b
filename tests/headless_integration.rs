use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use schulte::config::GameSettings;
use schulte::game::{Command, Game};
use schulte::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use schulte::session::Status;
use schulte::timer::ManualClock;
use schulte::viewport::Viewport;

// Headless integration using the runtime + Game without a TTY.
// Each runner step advances a virtual clock by one frame, so the game sees
// the same timeline no matter how fast the test machine is.

const FRAME_MS: u64 = 50;

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn left_click(column: u16, row: u16) -> AppEvent {
    AppEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

struct Harness {
    clock: ManualClock,
    game: Game<ManualClock>,
    viewport: Viewport,
}

impl Harness {
    fn new(points: usize, seed: u64) -> Self {
        let clock = ManualClock::new();
        let settings = GameSettings::default();
        let mut game = Game::with_seed(clock.clone(), settings, seed);
        game.handle(Command::SetPointCount(points));
        Self {
            clock,
            game,
            viewport: Viewport::new(Rect::new(0, 0, 148, 108), &settings),
        }
    }

    fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => {
                self.clock.advance_ms(FRAME_MS);
                self.game.update();
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => match key.code {
                KeyCode::Char('s') => self.game.handle(Command::StartOrRestart),
                KeyCode::Char('a') => self.game.handle(Command::ToggleAutoPlay),
                _ => {}
            },
            AppEvent::Mouse(mouse) => {
                if let Some(rank) = self.viewport.hit_test(self.game.session(), mouse.column, mouse.row) {
                    self.game.handle(Command::ClickTarget(rank));
                }
            }
        }
    }

    fn center_of(&self, rank: usize) -> (u16, u16) {
        let position = self.game.session().target(rank).unwrap().position;
        let r = self.viewport.target_rect(position);
        (r.x + r.width / 2, r.y + r.height / 2)
    }
}

#[test]
fn headless_auto_play_clears_the_board() {
    let mut h = Harness::new(3, 5);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), FixedTicker::new(Duration::from_millis(1)));

    tx.send(key('s')).unwrap();
    tx.send(key('a')).unwrap();

    // 3 auto clicks at 1s cadence plus the final reveal: ~4s of frames
    for _ in 0..200u32 {
        let ev = runner.step();
        h.apply(ev);
        if h.game.session().status() == Status::AllClear {
            break;
        }
    }

    let session = h.game.session();
    assert_eq!(session.status(), Status::AllClear);
    assert!(!session.auto_play());
    assert_eq!(session.visible_targets().count(), 0);
    assert_eq!(session.elapsed(), Duration::from_secs(4));
}

#[test]
fn headless_mouse_clicks_in_order() {
    let mut h = Harness::new(4, 11);
    h.apply(key('s'));

    for rank in 1..=4 {
        let (col, row) = h.center_of(rank);
        h.apply(left_click(col, row));
        for _ in 0..4 {
            h.apply(AppEvent::Tick);
        }
    }
    assert_eq!(h.game.session().status(), Status::Running);
    assert!(h.game.session().target(4).unwrap().outcome.is_some());

    for _ in 0..20 {
        h.apply(AppEvent::Tick);
    }
    assert_eq!(h.game.session().status(), Status::AllClear);
}

#[test]
fn headless_wrong_click_then_restart() {
    let mut h = Harness::new(3, 2);
    h.apply(key('s'));
    let first_board: Vec<_> = h.game.session().positions().collect();

    let (col, row) = h.center_of(2);
    h.apply(left_click(col, row));
    for _ in 0..20 {
        h.apply(AppEvent::Tick);
    }
    assert_eq!(h.game.session().status(), Status::GameOver);

    // Clicks after game over land on nothing
    let (col, row) = h.center_of(1);
    h.apply(left_click(col, row));
    assert_eq!(h.game.session().target(1).unwrap().outcome, None);

    h.apply(key('s'));
    assert_eq!(h.game.session().status(), Status::Running);
    assert_ne!(h.game.session().positions().collect::<Vec<_>>(), first_board);

    for _ in 0..40 {
        h.apply(AppEvent::Tick);
    }
    assert_eq!(h.game.session().status(), Status::Running);
    assert_eq!(h.game.session().elapsed(), Duration::from_secs(2));
}

#[test]
fn headless_scenario_click_three_before_two() {
    let mut h = Harness::new(3, 8);
    h.game.handle(Command::StartOrRestart);

    h.game.handle(Command::ClickTarget(1));
    assert_eq!(h.game.session().next_expected(), 2);
    for _ in 0..20 {
        h.apply(AppEvent::Tick);
    }
    assert!(!h.game.session().target(1).unwrap().visible);

    h.game.handle(Command::ClickTarget(3));
    for _ in 0..19 {
        h.apply(AppEvent::Tick);
    }
    assert_eq!(h.game.session().status(), Status::Running);
    h.apply(AppEvent::Tick);
    assert_eq!(h.game.session().status(), Status::GameOver);
}
