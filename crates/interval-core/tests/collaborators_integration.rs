//! Integration tests wiring the scheduler to its cue and keep-awake collaborators.

use std::sync::{Arc, Mutex};

use interval_core::{
    CueDispatcher, CueError, CueKind, CuePlayer, Event, IntervalConfig, Phase, Scheduler, Tone,
    WakeLock, WakeLockError, WakeLockListener,
};

#[derive(Clone, Default)]
struct SharedPlayer(Arc<Mutex<Vec<CueKind>>>);

impl CuePlayer for SharedPlayer {
    fn play(&mut self, kind: CueKind, _tones: &[Tone]) -> Result<(), CueError> {
        self.0.lock().unwrap().push(kind);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedLock(Arc<Mutex<Vec<&'static str>>>);

impl WakeLock for SharedLock {
    fn acquire(&mut self) -> Result<(), WakeLockError> {
        self.0.lock().unwrap().push("acquire");
        Ok(())
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        self.0.lock().unwrap().push("release");
        Ok(())
    }
}

struct DeniedLock;

impl WakeLock for DeniedLock {
    fn acquire(&mut self) -> Result<(), WakeLockError> {
        Err(WakeLockError::Unsupported("headless".into()))
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        Err(WakeLockError::ReleaseFailed("nothing held".into()))
    }
}

fn wired(config: IntervalConfig) -> (Scheduler, SharedPlayer, SharedLock) {
    let mut scheduler = Scheduler::new(config);
    let player = SharedPlayer::default();
    let lock = SharedLock::default();
    scheduler.subscribe(CueDispatcher::new(player.clone()));
    scheduler.subscribe(WakeLockListener::new(lock.clone()));
    (scheduler, player, lock)
}

fn run_to_completion(scheduler: &mut Scheduler) -> u32 {
    let mut ticks = 0;
    while scheduler.snapshot().phase != Phase::Complete {
        scheduler.tick();
        ticks += 1;
    }
    ticks
}

#[test]
fn example_workout_plays_expected_cues() {
    let (mut scheduler, player, lock) = wired(IntervalConfig::new(30, 15, 5, 3, 2));
    scheduler.start();
    assert_eq!(run_to_completion(&mut scheduler), 100);

    let played = player.0.lock().unwrap().clone();
    let w = CueKind::Warning;
    let s = CueKind::PhaseStart;
    assert_eq!(
        played,
        vec![w, s, w, s, w, w, s, w, s, w, CueKind::Completion]
    );
    assert_eq!(*lock.0.lock().unwrap(), vec!["acquire", "release"]);
}

#[test]
fn muted_run_plays_nothing_but_still_emits_cues() {
    let (mut scheduler, player, _) = wired(IntervalConfig::new(4, 4, 0, 2, 1));
    let emitted = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&emitted);
    scheduler.subscribe(move |e: &Event| {
        if e.cue_kind().is_some() {
            *counter.lock().unwrap() += 1;
        }
    });

    scheduler.set_muted(true);
    scheduler.start();
    run_to_completion(&mut scheduler);

    assert!(player.0.lock().unwrap().is_empty());
    // PhaseStart x2, Warning x2, Completion
    assert_eq!(*emitted.lock().unwrap(), 5);
}

#[test]
fn player_subscribed_after_muting_stays_silent() {
    let mut scheduler = Scheduler::new(IntervalConfig::new(4, 4, 0, 2, 1));
    scheduler.set_muted(true);
    let player = SharedPlayer::default();
    scheduler.subscribe(CueDispatcher::new(player.clone()));

    scheduler.start();
    scheduler.tick();
    scheduler.tick();
    assert!(scheduler.is_muted());
    assert!(player.0.lock().unwrap().is_empty());

    scheduler.set_muted(false);
    run_to_completion(&mut scheduler);
    assert_eq!(player.0.lock().unwrap().last(), Some(&CueKind::Completion));
}

#[test]
fn pause_resume_reset_drive_keep_awake() {
    let (mut scheduler, _, lock) = wired(IntervalConfig::default());
    scheduler.start();
    scheduler.tick();
    scheduler.pause();
    scheduler.pause();
    scheduler.start();
    scheduler.reset();
    scheduler.reset();
    assert_eq!(
        *lock.0.lock().unwrap(),
        vec!["acquire", "release", "acquire", "release"]
    );
}

#[test]
fn keep_awake_failures_do_not_disturb_the_timer() {
    let mut scheduler = Scheduler::new(IntervalConfig::new(2, 2, 0, 1, 2));
    scheduler.subscribe(WakeLockListener::new(DeniedLock));
    scheduler.start();
    assert_eq!(run_to_completion(&mut scheduler), 8);
    assert_eq!(scheduler.snapshot().current_cycle, 2);
}

#[test]
fn reconfigure_mid_run_resets_and_uses_new_durations() {
    let (mut scheduler, _, lock) = wired(IntervalConfig::default());
    scheduler.start();
    scheduler.tick();
    scheduler.configure(IntervalConfig::new(10, 5, 0, 2, 1));
    assert_eq!(scheduler.snapshot().phase, Phase::Idle);
    assert_eq!(*lock.0.lock().unwrap(), vec!["acquire", "release"]);

    scheduler.start();
    assert_eq!(scheduler.snapshot().phase, Phase::Work);
    assert_eq!(scheduler.snapshot().remaining_secs, 10);
}
