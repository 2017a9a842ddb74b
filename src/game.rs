use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameSettings;
use crate::layout;
use crate::session::{Effect, Session, SessionId, Status, Step};
use crate::timer::{Clock, TimerId, TimerQueue};

/// Inbound events from the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetPointCount(usize),
    StartOrRestart,
    ToggleAutoPlay,
    ClickTarget(usize),
}

/// Deferred work, tagged with the session that scheduled it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    Tick(SessionId),
    AutoClick(SessionId),
    Reveal(SessionId, usize),
    Finish(SessionId, Status),
}

impl TimerEvent {
    fn session(&self) -> SessionId {
        match self {
            TimerEvent::Tick(id)
            | TimerEvent::AutoClick(id)
            | TimerEvent::Reveal(id, _)
            | TimerEvent::Finish(id, _) => *id,
        }
    }
}

/// Drives a [`Session`] with timers read off an injected clock.
///
/// Nothing happens between calls: `update` replays every timer that came
/// due since the last call, in order, and `handle` does the same before
/// applying a command. Effects produced by a timer are scheduled from that
/// timer's due time, so polling late never changes the outcome.
pub struct Game<C: Clock> {
    clock: C,
    settings: GameSettings,
    rng: StdRng,
    point_count: usize,
    session: Session,
    timers: TimerQueue<TimerEvent>,
    tick_timer: Option<TimerId>,
    auto_play_timer: Option<TimerId>,
    last_session: u64,
    now: Duration,
}

impl<C: Clock> Game<C> {
    pub fn new(clock: C, settings: GameSettings, rng: StdRng) -> Self {
        let now = clock.now();
        Self {
            clock,
            settings,
            rng,
            point_count: 0,
            session: Session::default(),
            timers: TimerQueue::new(),
            tick_timer: None,
            auto_play_timer: None,
            last_session: 0,
            now,
        }
    }

    pub fn with_seed(clock: C, settings: GameSettings, seed: u64) -> Self {
        Self::new(clock, settings, StdRng::seed_from_u64(seed))
    }

    /// Latest snapshot for the renderer
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Point count the next start will use
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Fire every timer due by the clock's current time.
    pub fn update(&mut self) {
        let now = self.clock.now().max(self.now);
        while let Some((at, event)) = self.timers.pop_due(now) {
            self.now = at;
            self.dispatch(event);
        }
        self.now = now;
    }

    pub fn handle(&mut self, command: Command) {
        self.update();
        match command {
            Command::SetPointCount(n) => self.point_count = n,
            Command::StartOrRestart => self.start(),
            Command::ToggleAutoPlay => self.transition(Session::toggle_auto_play),
            Command::ClickTarget(rank) => self.transition(|s| s.click(rank)),
        }
    }

    fn start(&mut self) {
        self.last_session += 1;
        let id = SessionId(self.last_session);
        let positions = layout::generate(self.point_count, &self.settings.layout(), &mut self.rng);
        log::info!("session {} started with {} targets", id.0, positions.len());
        self.apply(Session::start(id, positions));
    }

    fn transition(&mut self, f: impl FnOnce(Session) -> Step) {
        let session = std::mem::take(&mut self.session);
        self.apply(f(session));
    }

    fn dispatch(&mut self, event: TimerEvent) {
        if event.session() != self.session.id() {
            log::debug!("dropping stale timer {event:?}");
            return;
        }

        match event {
            TimerEvent::Tick(_) => {
                let step = self.settings.tick_interval();
                self.session = std::mem::take(&mut self.session).tick(step);
            }
            TimerEvent::AutoClick(_) => {
                let rank = self.session.next_expected();
                log::debug!("auto-play clicking {rank}");
                self.transition(|s| s.click(rank));
            }
            TimerEvent::Reveal(_, rank) => {
                self.session = std::mem::take(&mut self.session).reveal(rank);
            }
            TimerEvent::Finish(id, status) => {
                self.transition(|s| s.finish(status));
                if self.session.status() == status {
                    log::info!(
                        "session {} ended: {status} after {:.1}s",
                        id.0,
                        self.session.elapsed_secs()
                    );
                }
            }
        }
    }

    fn apply(&mut self, step: Step) {
        self.session = step.session;
        let id = self.session.id();

        for effect in step.effects {
            log::debug!("session {}: {effect:?}", id.0);
            match effect {
                Effect::CancelAll => {
                    self.timers.clear();
                    self.tick_timer = None;
                    self.auto_play_timer = None;
                }
                Effect::StartClock => {
                    self.cancel_tick();
                    let period = self.settings.tick_interval();
                    self.tick_timer = Some(self.timers.schedule_every(self.now, period, TimerEvent::Tick(id)));
                }
                Effect::StopClock => self.cancel_tick(),
                Effect::StartAutoPlay => {
                    self.cancel_auto_play();
                    let period = self.settings.auto_play_interval();
                    self.auto_play_timer =
                        Some(self.timers.schedule_every(self.now, period, TimerEvent::AutoClick(id)));
                }
                Effect::StopAutoPlay => self.cancel_auto_play(),
                Effect::ScheduleReveal(rank) => {
                    let at = self.now + self.settings.reveal_delay();
                    self.timers.schedule_once(at, TimerEvent::Reveal(id, rank));
                }
                Effect::ScheduleFinish(status) => {
                    let at = self.now + self.settings.reveal_delay();
                    self.timers.schedule_once(at, TimerEvent::Finish(id, status));
                }
            }
        }
    }

    fn cancel_tick(&mut self) {
        if let Some(timer) = self.tick_timer.take() {
            self.timers.cancel(timer);
        }
    }

    fn cancel_auto_play(&mut self) {
        if let Some(timer) = self.auto_play_timer.take() {
            self.timers.cancel(timer);
        }
    }
}
