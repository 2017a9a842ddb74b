use std::time::Duration;

use crate::layout::Position;

/// Identity of one play-through. The idle placeholder is session 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Status {
    #[default]
    Idle,
    Running,
    #[strum(serialize = "GAME OVER")]
    GameOver,
    #[strum(serialize = "ALL CLEAR!")]
    AllClear,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::GameOver | Status::AllClear)
    }
}

/// Result of clicking a target, stamped with the elapsed game time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Correct(Duration),
    Wrong(Duration),
}

impl Outcome {
    pub fn at(&self) -> Duration {
        match self {
            Outcome::Correct(at) | Outcome::Wrong(at) => *at,
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub rank: usize,
    pub position: Position,
    pub outcome: Option<Outcome>,
    pub visible: bool,
}

/// Side effects a transition asks the driver to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Drop every pending timer of the previous session
    CancelAll,
    StartClock,
    StopClock,
    StartAutoPlay,
    StopAutoPlay,
    /// Hide the target with this rank after the reveal delay
    ScheduleReveal(usize),
    /// Land on this terminal status after the reveal delay
    ScheduleFinish(Status),
}

/// Output of a transition: the next session value plus what to schedule
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Step {
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl Step {
    fn unchanged(session: Session) -> Self {
        Self {
            session,
            effects: vec![],
        }
    }
}

/// Snapshot of one play-through.
///
/// Sessions are values: every transition consumes the current session and
/// returns the next one. Fields are read through accessors so the renderer
/// can never mutate a snapshot behind the game's back.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: SessionId,
    targets: Vec<Target>,
    elapsed: Duration,
    next_expected: usize,
    status: Status,
    auto_play: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            id: SessionId::default(),
            targets: vec![],
            elapsed: Duration::ZERO,
            next_expected: 1,
            status: Status::Idle,
            auto_play: false,
        }
    }
}

impl Session {
    /// Fresh running session with one target per position, ranked in order.
    pub fn start(id: SessionId, positions: Vec<Position>) -> Step {
        let targets = positions
            .into_iter()
            .enumerate()
            .map(|(idx, position)| Target {
                rank: idx + 1,
                position,
                outcome: None,
                visible: true,
            })
            .collect();

        Step {
            session: Self {
                id,
                targets,
                status: Status::Running,
                ..Self::default()
            },
            effects: vec![Effect::CancelAll, Effect::StartClock],
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn auto_play(&self) -> bool {
        self.auto_play
    }

    pub fn point_count(&self) -> usize {
        self.targets.len()
    }

    pub fn next_expected(&self) -> usize {
        self.next_expected
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn target(&self, rank: usize) -> Option<&Target> {
        rank.checked_sub(1).and_then(|idx| self.targets.get(idx))
    }

    fn target_mut(&mut self, rank: usize) -> Option<&mut Target> {
        rank.checked_sub(1).and_then(|idx| self.targets.get_mut(idx))
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.targets.iter().map(|t| t.position)
    }

    pub fn visible_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| t.visible)
    }

    /// Label for the start button
    pub fn start_label(&self) -> &'static str {
        if self.is_running() {
            "Restart"
        } else {
            "Play"
        }
    }

    /// Label for the auto-play button, naming the action it performs
    pub fn auto_play_label(&self) -> &'static str {
        if self.auto_play {
            "Auto Play OFF"
        } else {
            "Auto Play ON"
        }
    }

    /// Text after "Next:", shown only while a game is in progress
    pub fn next_label(&self) -> Option<String> {
        self.is_running().then(|| self.next_expected.to_string())
    }

    fn accepts_click(&self, rank: usize) -> bool {
        self.is_running()
            && self
                .target(rank)
                .is_some_and(|t| t.visible && t.outcome.is_none())
    }

    pub fn tick(mut self, step: Duration) -> Session {
        if self.is_running() {
            self.elapsed += step;
        }
        self
    }

    pub fn toggle_auto_play(mut self) -> Step {
        if !self.is_running() {
            return Step::unchanged(self);
        }

        self.auto_play = !self.auto_play;
        let effect = if self.auto_play {
            Effect::StartAutoPlay
        } else {
            Effect::StopAutoPlay
        };
        Step {
            session: self,
            effects: vec![effect],
        }
    }

    pub fn click(mut self, rank: usize) -> Step {
        if !self.accepts_click(rank) {
            return Step::unchanged(self);
        }

        let at = self.elapsed;
        let is_last = rank == self.point_count();
        let correct = rank == self.next_expected;
        let mut effects = vec![];

        if let Some(target) = self.target_mut(rank) {
            if correct {
                target.outcome = Some(Outcome::Correct(at));
                effects.push(Effect::ScheduleReveal(rank));
            } else {
                target.outcome = Some(Outcome::Wrong(at));
            }
        }

        if !correct {
            effects.push(Effect::ScheduleFinish(Status::GameOver));
        } else if is_last {
            effects.push(Effect::ScheduleFinish(Status::AllClear));
        } else {
            self.next_expected += 1;
        }

        Step {
            session: self,
            effects,
        }
    }

    /// Hide a correctly clicked target and drop its outcome badge.
    pub fn reveal(mut self, rank: usize) -> Session {
        if let Some(target) = self.target_mut(rank) {
            if target.outcome.is_some_and(|o| o.is_correct()) {
                target.visible = false;
                target.outcome = None;
            }
        }
        self
    }

    pub fn finish(mut self, status: Status) -> Step {
        if !self.is_running() || !status.is_terminal() {
            return Step::unchanged(self);
        }

        self.status = status;
        self.auto_play = false;
        Step {
            session: self,
            effects: vec![Effect::StopClock, Effect::StopAutoPlay],
        }
    }
}
