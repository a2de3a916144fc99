//! A live game driven by wall-clock time.
//!
//! [`Session`] wraps a [`Kingdom`] for interactive frontends. Player commands
//! go through [`Session::submit`]; the autonomous Enemy and Income phases are
//! resolved by [`Session::poll`] once their pacing delay has passed. Restarting
//! bumps the session epoch so nothing scheduled for the old game can fire.

mod pacing;

pub use pacing::{PhaseTimer, Ticket};

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::chronicle::{self, ChronicleProvider, DayContext};
use crate::game::{roll_spawn, Action, Command, GameState, Kingdom, Outcome, Phase};

/// Tidings composed off-thread for a given game and day.
#[derive(Debug)]
struct Tidings {
    epoch: u64,
    day: u32,
    text: String,
}

/// An interactive game session.
pub struct Session {
    kingdom: Kingdom,
    epoch: u64,
    timer: PhaseTimer,
    rng: StdRng,
    chronicle: Option<Arc<dyn ChronicleProvider>>,
    tidings_tx: Sender<Tidings>,
    tidings_rx: Receiver<Tidings>,
    asked: Option<(u64, u32)>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("epoch", &self.epoch)
            .field("day", &self.kingdom.state().day)
            .field("phase", &self.kingdom.state().phase)
            .field("timer", &self.timer)
            .field("chronicle", &self.chronicle.is_some())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Start a session. `seed` drives the spawn rolls.
    ///
    /// A kingdom resumed in the Enemy or Income phase is paced from now.
    #[must_use]
    pub fn new(kingdom: Kingdom, seed: u64) -> Self {
        let (tidings_tx, tidings_rx) = unbounded();
        let mut session = Self {
            kingdom,
            epoch: 0,
            timer: PhaseTimer::new(),
            rng: StdRng::seed_from_u64(seed),
            chronicle: None,
            tidings_tx,
            tidings_rx,
            asked: None,
        };
        session.after_change(Instant::now());
        session
    }

    /// Ask `provider` for tidings at the start of every day after the first.
    #[must_use]
    pub fn with_chronicle(mut self, provider: Arc<dyn ChronicleProvider>) -> Self {
        self.chronicle = Some(provider);
        let state = self.kingdom.state();
        if !state.game_over && state.phase == Phase::Player && state.day > 1 {
            self.request_tidings();
        }
        self
    }

    /// The current kingdom.
    #[must_use]
    pub fn kingdom(&self) -> &Kingdom {
        &self.kingdom
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        self.kingdom.state()
    }

    /// Game generation, bumped on every restart.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The resolution waiting on the clock, if any.
    #[must_use]
    pub fn pending(&self) -> Option<Ticket> {
        self.timer.pending()
    }

    /// Time until the pending resolution fires.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// Apply a command now.
    pub fn submit(&mut self, command: &Command, now: Instant) -> Outcome {
        let step = self.kingdom.apply(command);
        if step.outcome.changed() {
            self.kingdom = step.kingdom;
            self.after_change(now);
        }
        step.outcome
    }

    /// Perform a player action.
    pub fn act(&mut self, action: Action, now: Instant) -> Outcome {
        self.submit(&Command::Act(action), now)
    }

    /// End the Player or Build phase.
    pub fn end_phase(&mut self, now: Instant) -> Outcome {
        self.submit(&Command::EndPhase, now)
    }

    /// Resolve whatever is due at `now` and log any tidings that arrived.
    ///
    /// Returns `true` if the state changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = self.drain_tidings(now);

        if let Some(ticket) = self.timer.take_due(now) {
            if ticket.is_current(self.epoch, self.kingdom.state()) {
                let command = match ticket.phase {
                    Phase::Enemy => {
                        let day = self.kingdom.state().day;
                        let spawn = roll_spawn(day, self.kingdom.config(), &mut self.rng);
                        Command::ResolveNight { spawn }
                    }
                    Phase::Income => Command::CollectIncome,
                    Phase::Player | Phase::Build => return changed,
                };
                changed |= self.submit(&command, now).changed();
            } else {
                debug!(?ticket, epoch = self.epoch, "dropping stale ticket");
            }
        }

        changed
    }

    /// Throw the current game away and start over.
    pub fn restart(&mut self, now: Instant) {
        self.epoch += 1;
        self.timer.cancel();
        self.asked = None;
        self.kingdom = self.kingdom.restart();
        self.after_change(now);
    }

    fn after_change(&mut self, now: Instant) {
        let state = self.kingdom.state();
        if state.game_over {
            self.timer.cancel();
            return;
        }

        if matches!(state.phase, Phase::Enemy | Phase::Income) {
            let ticket = Ticket::for_state(self.epoch, state);
            self.timer
                .schedule(ticket, now, self.kingdom.config().phase_delay);
        }

        if state.phase == Phase::Player && state.day > 1 {
            self.request_tidings();
        }
    }

    fn request_tidings(&mut self) {
        let key = (self.epoch, self.kingdom.state().day);
        if self.asked == Some(key) {
            return;
        }
        let Some(provider) = self.chronicle.clone() else {
            return;
        };
        self.asked = Some(key);

        let context = DayContext::from_state(self.kingdom.state());
        let tx = self.tidings_tx.clone();
        let (epoch, day) = key;
        thread::spawn(move || {
            let text = chronicle::tell(provider.as_ref(), &context);
            // The session may be gone by now; nothing to do then.
            let _ = tx.send(Tidings { epoch, day, text });
        });
    }

    fn drain_tidings(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Ok(tidings) = self.tidings_rx.try_recv() {
            let state = self.kingdom.state();
            if tidings.epoch != self.epoch || tidings.day != state.day {
                debug!(day = tidings.day, "dropping late tidings");
                continue;
            }
            changed |= self
                .submit(&Command::RecordTidings(tidings.text), now)
                .changed();
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::chronicle::ChronicleError;
    use crate::game::{GameConfig, ObjectiveCatalog};

    struct Herald;

    impl ChronicleProvider for Herald {
        fn compose(&self, context: &DayContext) -> Result<String, ChronicleError> {
            Ok(format!("Day {} is heralded.", context.day))
        }
    }

    /// Counts how often it is asked.
    #[derive(Default)]
    struct Tally {
        calls: AtomicUsize,
    }

    impl ChronicleProvider for Tally {
        fn compose(&self, context: &DayContext) -> Result<String, ChronicleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("Tally for day {}.", context.day))
        }
    }

    /// Holds every answer until the gate opens.
    struct Gated {
        gate: Receiver<()>,
    }

    impl ChronicleProvider for Gated {
        fn compose(&self, context: &DayContext) -> Result<String, ChronicleError> {
            let _ = self.gate.recv();
            Ok(format!("Late word of day {}.", context.day))
        }
    }

    fn quiet_config() -> GameConfig {
        GameConfig {
            spawn_base_chance: 0.0,
            spawn_chance_per_day: 0.0,
            ..GameConfig::default()
        }
    }

    fn session() -> Session {
        let kingdom = Kingdom::new(quiet_config(), ObjectiveCatalog::default()).unwrap();
        Session::new(kingdom, 1)
    }

    /// Play out a quiet day and return the clock at dawn.
    fn next_day(session: &mut Session, start: Instant) -> Instant {
        session.end_phase(start);
        session.end_phase(start);
        let night = start + Duration::from_millis(1500);
        session.poll(night);
        let dawn = night + Duration::from_millis(1500);
        session.poll(dawn);
        dawn
    }

    fn tidings_logged(session: &Session) -> bool {
        session.state().event_log.iter().any(|line| line.starts_with("Event:"))
    }

    #[test]
    fn test_night_waits_for_delay() {
        let start = Instant::now();
        let mut session = session();
        session.end_phase(start);
        session.end_phase(start);
        assert_eq!(session.state().phase, Phase::Enemy);
        assert!(session.pending().is_some());

        assert!(!session.poll(start + Duration::from_millis(1000)));
        assert_eq!(session.state().phase, Phase::Enemy);

        let later = start + Duration::from_millis(1500);
        assert!(session.poll(later));
        assert_eq!(session.state().phase, Phase::Income);

        let dawn = later + Duration::from_millis(1500);
        assert!(session.poll(dawn));
        assert_eq!(session.state().phase, Phase::Player);
        assert_eq!(session.state().day, 2);
        assert!(session.pending().is_none());
    }

    #[test]
    fn test_restart_cancels_pending_night() {
        let start = Instant::now();
        let mut session = session();
        session.end_phase(start);
        session.end_phase(start);
        assert!(session.pending().is_some());

        session.restart(start);
        assert_eq!(session.epoch(), 1);
        assert!(session.pending().is_none());

        assert!(!session.poll(start + Duration::from_secs(10)));
        assert_eq!(session.state().phase, Phase::Player);
        assert_eq!(session.state().day, 1);
    }

    #[test]
    fn test_player_commands_ignored_during_night() {
        let start = Instant::now();
        let mut session = session();
        session.end_phase(start);
        session.end_phase(start);

        assert_eq!(session.end_phase(start), Outcome::Ignored);
        assert!(matches!(
            session.act(Action::MoveLeft, start),
            Outcome::Rejected(_)
        ));
    }

    #[test]
    fn test_tidings_arrive_without_blocking() {
        let start = Instant::now();
        let kingdom = Kingdom::new(quiet_config(), ObjectiveCatalog::default()).unwrap();
        let mut session = Session::new(kingdom, 1).with_chronicle(Arc::new(Herald));

        session.end_phase(start);
        session.end_phase(start);
        let mut now = start + Duration::from_millis(1500);
        session.poll(now);
        now += Duration::from_millis(1500);
        session.poll(now);
        assert_eq!(session.state().day, 2);
        assert_eq!(session.state().phase, Phase::Player);

        let deadline = Instant::now() + Duration::from_secs(5);
        while !session.state().event_log.contains("Day 2 is heralded.") {
            assert!(Instant::now() < deadline, "tidings never arrived");
            thread::sleep(Duration::from_millis(5));
            session.poll(now);
        }
        assert_eq!(
            session.state().event_log.latest(),
            Some("Event: Day 2 is heralded.")
        );
    }

    #[test]
    fn test_tidings_from_previous_game_dropped() {
        let start = Instant::now();
        let mut session = session();
        next_day(&mut session, start);
        session.restart(start);
        let now = next_day(&mut session, start);
        assert_eq!(session.state().day, 2);

        session
            .tidings_tx
            .send(Tidings {
                epoch: 0,
                day: 2,
                text: "Old news.".to_string(),
            })
            .unwrap();
        assert!(!session.poll(now));
        assert!(!tidings_logged(&session));
    }

    #[test]
    fn test_tidings_for_past_day_dropped() {
        let start = Instant::now();
        let mut session = session();
        next_day(&mut session, start);
        session
            .tidings_tx
            .send(Tidings {
                epoch: 0,
                day: 2,
                text: "Yesterday's news.".to_string(),
            })
            .unwrap();

        let now = next_day(&mut session, start);
        assert_eq!(session.state().day, 3);
        assert!(!session.poll(now));
        assert!(!tidings_logged(&session));
    }

    #[test]
    fn test_restart_while_tidings_in_flight() {
        let start = Instant::now();
        let (open, gate) = unbounded();
        let kingdom = Kingdom::new(quiet_config(), ObjectiveCatalog::default()).unwrap();
        let mut session = Session::new(kingdom, 1).with_chronicle(Arc::new(Gated { gate }));

        next_day(&mut session, start);
        assert_eq!(session.state().day, 2);
        session.restart(start);

        open.send(()).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while session.tidings_rx.is_empty() {
            assert!(Instant::now() < deadline, "worker never answered");
            thread::sleep(Duration::from_millis(5));
        }

        assert!(!session.poll(start));
        assert_eq!(session.state().day, 1);
        assert!(!tidings_logged(&session));
    }

    #[test]
    fn test_tidings_requested_once_per_day() {
        let start = Instant::now();
        let tally = Arc::new(Tally::default());
        let kingdom = Kingdom::new(quiet_config(), ObjectiveCatalog::default()).unwrap();
        let mut session = Session::new(kingdom, 1).with_chronicle(tally.clone());

        let now = next_day(&mut session, start);
        let deadline = Instant::now() + Duration::from_secs(5);
        while !tidings_logged(&session) {
            assert!(Instant::now() < deadline, "tidings never arrived");
            thread::sleep(Duration::from_millis(5));
            session.poll(now);
        }

        session.act(Action::MoveLeft, now);
        session.act(Action::MoveRight, now);
        session.submit(&Command::RecordTidings("A quiet road.".to_string()), now);
        thread::sleep(Duration::from_millis(20));
        session.poll(now);

        assert_eq!(session.state().phase, Phase::Player);
        assert_eq!(tally.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resumed_night_is_paced() {
        let config = quiet_config();
        let mut state = GameState::new(&config);
        state.phase = Phase::Enemy;
        let kingdom = Kingdom::from_state(config, ObjectiveCatalog::default(), state).unwrap();

        let mut session = Session::new(kingdom, 1);
        let ticket = session.pending().unwrap();
        assert_eq!(ticket.phase, Phase::Enemy);

        assert!(session.poll(Instant::now() + Duration::from_secs(2)));
        assert_eq!(session.state().phase, Phase::Income);
    }
}
