//! In-memory fakes for driving sessions without a game process.
//!
//! [`FakeWorld`] is a mutable snapshot shared by [`FakeReader`],
//! [`RecordingActions`] and [`RecordingInput`]: actions move the player,
//! attacks kill monsters and key presses switch the right-hand skill, so runs
//! observe the consequences of their own input on the next poll. The client's
//! offline mode uses the same pieces.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use game_core::{
    Area, KeyBinding, KeyBindings, Monster, MonsterFilter, Monsters, Object, ObjectId, Position,
    SkillId, WorldSnapshot,
};
use tokio::time::Instant;
use tracing::debug;

use crate::api::{ActionError, Actions, GameReader, InputError, InputSink, ReaderError};

/// Mutable world state shared between fakes.
#[derive(Clone, Default)]
pub struct FakeWorld {
    inner: Arc<Mutex<WorldState>>,
}

#[derive(Default)]
struct WorldState {
    snapshot: WorldSnapshot,
    detached: bool,
    pending_waves: VecDeque<Vec<Monster>>,
    area_monsters: HashMap<Area, Vec<Monster>>,
    empty_since: Option<Instant>,
    polls: usize,
    new_sessions: usize,
}

impl FakeWorld {
    /// Quiet time after the last monster dies before the next queued wave spawns.
    pub const SPAWN_GAP: Duration = Duration::from_millis(400);

    pub fn new(snapshot: WorldSnapshot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(WorldState {
                snapshot,
                ..WorldState::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WorldState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.lock().snapshot.clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut WorldSnapshot)) {
        f(&mut self.lock().snapshot);
    }

    pub fn set_detached(&self, detached: bool) {
        self.lock().detached = detached;
    }

    /// Queues monsters that spawn once the world has been empty for [`Self::SPAWN_GAP`].
    pub fn queue_wave(&self, monsters: Vec<Monster>) {
        self.lock().pending_waves.push_back(monsters);
    }

    /// Monsters present when the player next enters `area`.
    pub fn populate(&self, area: Area, monsters: Vec<Monster>) {
        self.lock().area_monsters.insert(area, monsters);
    }

    /// Moves the player into `area`, replacing the visible monsters.
    pub fn enter(&self, area: Area) {
        let mut state = self.lock();
        let monsters = state.area_monsters.remove(&area).unwrap_or_default();
        state.snapshot.player.area = area;
        state.snapshot.monsters = Monsters::new(monsters);
    }

    pub fn polls(&self) -> usize {
        self.lock().polls
    }

    pub fn new_sessions(&self) -> usize {
        self.lock().new_sessions
    }

    /// Removes every monster standing at `target`.
    pub fn kill_at(&self, target: Position) -> usize {
        let mut state = self.lock();
        let before = state.snapshot.monsters.len();
        let survivors: Monsters = state
            .snapshot
            .monsters
            .iter()
            .filter(|m| m.position != target)
            .cloned()
            .collect();
        state.snapshot.monsters = survivors;
        before - state.snapshot.monsters.len()
    }

    fn poll(&self, new_session: bool) -> Result<WorldSnapshot, ReaderError> {
        let now = Instant::now();
        let mut state = self.lock();
        if state.detached {
            return Err(ReaderError::NotAttached);
        }
        state.polls += 1;
        if new_session {
            state.new_sessions += 1;
        }

        if state.snapshot.monsters.is_empty() {
            let since = *state.empty_since.get_or_insert(now);
            if now.duration_since(since) >= Self::SPAWN_GAP {
                if let Some(wave) = state.pending_waves.pop_front() {
                    state.snapshot.monsters = Monsters::new(wave);
                    state.empty_since = None;
                }
            }
        } else {
            state.empty_since = None;
        }
        Ok(state.snapshot.clone())
    }
}

/// [`GameReader`] returning the current state of a [`FakeWorld`].
#[derive(Clone)]
pub struct FakeReader {
    world: FakeWorld,
}

impl FakeReader {
    pub fn new(world: FakeWorld) -> Self {
        Self { world }
    }
}

#[async_trait]
impl GameReader for FakeReader {
    fn is_attached(&self) -> bool {
        !self.world.lock().detached
    }

    async fn poll(&mut self, new_session: bool) -> Result<WorldSnapshot, ReaderError> {
        self.world.poll(new_session)
    }
}

/// Every call made through [`RecordingActions`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionCall {
    WaypointTo(Area),
    MoveToArea(Area),
    MoveTo(Position),
    ClearCurrentLevel { elites_only: bool },
    ClearAroundPlayer(u32),
    OpenPortal,
    Buff,
    Interact(ObjectId),
}

impl ActionCall {
    fn name(&self) -> &'static str {
        match self {
            ActionCall::WaypointTo(_) => "waypoint_to",
            ActionCall::MoveToArea(_) => "move_to_area",
            ActionCall::MoveTo(_) => "move_to",
            ActionCall::ClearCurrentLevel { .. } => "clear_current_level",
            ActionCall::ClearAroundPlayer(_) => "clear_area_around_player",
            ActionCall::OpenPortal => "open_portal",
            ActionCall::Buff => "buff",
            ActionCall::Interact(_) => "interact",
        }
    }
}

/// [`Actions`] that records calls and applies their effect to a [`FakeWorld`].
#[derive(Default)]
pub struct RecordingActions {
    world: FakeWorld,
    calls: Mutex<Vec<ActionCall>>,
    failing: HashSet<&'static str>,
    portals: HashMap<ObjectId, Area>,
}

impl RecordingActions {
    pub fn new(world: FakeWorld) -> Self {
        Self {
            world,
            ..Self::default()
        }
    }

    /// Makes every call of the named action fail.
    pub fn failing(mut self, action: &'static str) -> Self {
        self.failing.insert(action);
        self
    }

    /// Interacting with `object` moves the player to `destination`.
    pub fn with_portal(mut self, object: ObjectId, destination: Area) -> Self {
        self.portals.insert(object, destination);
        self
    }

    pub fn calls(&self) -> Vec<ActionCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count(&self, action: &str) -> usize {
        self.calls().iter().filter(|c| c.name() == action).count()
    }

    fn record(&self, call: ActionCall) -> Result<(), ActionError> {
        let name = call.name();
        debug!(?call, "action");
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
        if self.failing.contains(name) {
            return Err(ActionError::new(name, "scripted failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl Actions for RecordingActions {
    async fn waypoint_to(&self, area: Area) -> Result<(), ActionError> {
        self.record(ActionCall::WaypointTo(area))?;
        self.world.enter(area);
        Ok(())
    }

    async fn move_to_area(&self, area: Area) -> Result<(), ActionError> {
        self.record(ActionCall::MoveToArea(area))?;
        self.world.enter(area);
        Ok(())
    }

    async fn move_to(&self, position: Position) -> Result<(), ActionError> {
        self.record(ActionCall::MoveTo(position))?;
        self.world
            .update(|snapshot| snapshot.player.position = position);
        Ok(())
    }

    async fn clear_current_level(
        &self,
        _open_chests: bool,
        filter: &MonsterFilter,
    ) -> Result<(), ActionError> {
        self.record(ActionCall::ClearCurrentLevel {
            elites_only: matches!(filter, MonsterFilter::Elite),
        })
    }

    async fn clear_area_around_player(
        &self,
        radius: u32,
        _filter: &MonsterFilter,
    ) -> Result<(), ActionError> {
        self.record(ActionCall::ClearAroundPlayer(radius))
    }

    async fn open_portal(&self) -> Result<(), ActionError> {
        self.record(ActionCall::OpenPortal)
    }

    async fn buff(&self) -> Result<(), ActionError> {
        self.record(ActionCall::Buff)
    }

    async fn interact(&self, object: &Object) -> Result<(), ActionError> {
        self.record(ActionCall::Interact(object.name))?;
        if let Some(&destination) = self.portals.get(&object.name) {
            self.world.enter(destination);
        }
        Ok(())
    }
}

/// What [`RecordingInput`] was asked to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Press(KeyBinding),
    Attack(Position),
}

/// [`InputSink`] that records input; presses switch the right-hand skill and
/// attacks kill whatever stands at the target.
#[derive(Default)]
pub struct RecordingInput {
    world: FakeWorld,
    skills: HashMap<KeyBinding, SkillId>,
    events: Mutex<Vec<InputEvent>>,
    presses: AtomicUsize,
}

impl RecordingInput {
    pub fn new(world: FakeWorld, bindings: &KeyBindings) -> Self {
        Self {
            world,
            skills: bindings
                .iter()
                .map(|(skill, binding)| (binding.clone(), skill))
                .collect(),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<InputEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn presses(&self) -> usize {
        self.presses.load(Ordering::Relaxed)
    }

    pub fn presses_of(&self, key: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, InputEvent::Press(b) if b.as_str() == key))
            .count()
    }

    pub fn attacks(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, InputEvent::Attack(_)))
            .count()
    }

    fn push(&self, event: InputEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

impl InputSink for RecordingInput {
    fn press_binding(&self, binding: &KeyBinding) -> Result<(), InputError> {
        self.presses.fetch_add(1, Ordering::Relaxed);
        self.push(InputEvent::Press(binding.clone()));
        if let Some(&skill) = self.skills.get(binding) {
            self.world
                .update(|snapshot| snapshot.player.right_skill = skill);
        }
        Ok(())
    }

    fn attack_at(&self, target: Position) -> Result<(), InputError> {
        self.push(InputEvent::Attack(target));
        self.world.kill_at(target);
        Ok(())
    }
}
