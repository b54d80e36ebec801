//! # NPC System
//!
//! Autonomous actors driven by a six-state machine:
//!
//! ```text
//!            timer >= max_state_time           arrive / 15s
//!   IDLE ─────────────────────────> MOVING_TO_TARGET ───────> IDLE
//!    │
//!    │ hostile player in aggro range (villager)      (others)
//!    ├──────────────> FLEEING ──> IDLE      APPROACHING_ENEMY ──> IN_COMBAT
//!    │          arrive(2.0) / 8s                 │   leash / 10s / target down
//!    │                                           └─────────────> IDLE
//! WANDERING ──(10s)──> IDLE
//! ```
//!
//! Every tick the actor is snapped to the ground through a [`GroundQuery`];
//! there is no physics.
//!
//! Per-type constants live in [`NpcType::stats`] as data.

use std::f32::consts::TAU;

use rand::Rng;
use wildlands_core::{Handle, Vec3};

use crate::gameplay::animation::{AnimationBinding, AnimationLibrary, CLIP_IDLE, CLIP_WALK};
use crate::gameplay::combat::{roll_attack, AttackTimer, CombatBand, CombatStats};
use crate::gameplay::movement::{ground_y, integrate, sine_hash, step_toward};
use crate::gameplay::player::{Player, PlayerId};
use crate::world::GroundQuery;

// ============================================================================
// NPC CONSTANTS
// ============================================================================

/// Distance a villager runs from its threat.
pub const FLEE_DISTANCE: f32 = 15.0;

/// MOVING_TO_TARGET counts as arrived within this distance.
pub const MOVE_ARRIVAL_DISTANCE: f32 = 1.0;

/// MOVING_TO_TARGET gives up after this many seconds.
pub const MOVE_TIMEOUT: f32 = 15.0;

/// APPROACHING_ENEMY gives up after this many seconds.
pub const APPROACH_TIMEOUT: f32 = 10.0;

/// FLEEING counts as safe within this distance of the flee point.
pub const FLEE_ARRIVAL_DISTANCE: f32 = 2.0;

/// FLEEING gives up after this many seconds.
pub const FLEE_TIMEOUT: f32 = 8.0;

/// Combat is dropped beyond `aggro_range * LEASH_FACTOR`.
pub const LEASH_FACTOR: f32 = 1.5;

/// WANDERING re-rolls its heading this often (seconds).
pub const WANDER_REROLL_INTERVAL: f32 = 1.0;

/// WANDERING settles into IDLE after this many seconds.
pub const WANDER_DURATION: f32 = 10.0;

/// Drift speed relative to move speed.
pub const WANDER_SPEED_FACTOR: f32 = 0.4;

/// Damage flash window (visual only).
pub const DAMAGE_FLASH_DURATION: f32 = 0.5;

/// Largest extra idle time added per instance.
pub const IDLE_JITTER_MAX: f32 = 2.0;

/// Idle move orders land between these distances.
const IDLE_TARGET_MIN: f32 = 5.0;
const IDLE_TARGET_SPAN: f32 = 10.0;

/// Stable handle to an NPC in the world's arena.
pub type NpcId = Handle<Npc>;

// ============================================================================
// NPC TYPES
// ============================================================================

/// Per-type constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NpcStats {
    /// Walking speed (units per second).
    pub move_speed: f32,
    /// Starting health.
    pub max_health: f32,
    /// Attack stats.
    pub combat: CombatStats,
    /// Notices hostile players within this distance.
    pub aggro_range: f32,
    /// Preferred fighting distance.
    pub combat_range: f32,
    /// Base idle time before picking a new move target.
    pub max_state_time: f32,
    /// Half-height, used for ground clamping and rendering scale.
    pub size: f32,
}

/// Kinds of NPC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NpcType {
    /// Roaming fighter.
    Wanderer,
    /// Timid settler. Always flees.
    Villager,
    /// Travelling trader. Slow but tough.
    Merchant,
}

impl NpcType {
    /// All NPC types.
    pub const ALL: [Self; 3] = [Self::Wanderer, Self::Villager, Self::Merchant];

    /// Stat table.
    #[must_use]
    pub const fn stats(self) -> NpcStats {
        match self {
            Self::Wanderer => NpcStats {
                move_speed: 2.5,
                max_health: 80.0,
                combat: CombatStats {
                    attack_damage: 8.0,
                    attack_cooldown: 1.5,
                    hit_chance: 0.7,
                    dodge_chance: 0.15,
                },
                aggro_range: 12.0,
                combat_range: 2.0,
                max_state_time: 4.0,
                size: 0.5,
            },
            Self::Villager => NpcStats {
                move_speed: 1.8,
                max_health: 50.0,
                combat: CombatStats {
                    attack_damage: 3.0,
                    attack_cooldown: 2.0,
                    hit_chance: 0.5,
                    dodge_chance: 0.25,
                },
                aggro_range: 10.0,
                combat_range: 1.5,
                max_state_time: 6.0,
                size: 0.45,
            },
            Self::Merchant => NpcStats {
                move_speed: 1.5,
                max_health: 120.0,
                combat: CombatStats {
                    attack_damage: 12.0,
                    attack_cooldown: 2.0,
                    hit_chance: 0.75,
                    dodge_chance: 0.1,
                },
                aggro_range: 8.0,
                combat_range: 2.0,
                max_state_time: 8.0,
                size: 0.55,
            },
        }
    }

    /// Display color (RGBA).
    #[must_use]
    pub const fn color(self) -> [f32; 4] {
        match self {
            Self::Wanderer => [0.30, 0.50, 0.90, 1.0],
            Self::Villager => [0.20, 0.80, 0.30, 1.0],
            Self::Merchant => [0.85, 0.70, 0.20, 1.0],
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wanderer => "Wanderer",
            Self::Villager => "Villager",
            Self::Merchant => "Merchant",
        }
    }

    /// State a freshly spawned NPC starts in.
    #[must_use]
    pub const fn initial_state(self) -> NpcState {
        match self {
            Self::Wanderer => NpcState::Wandering,
            Self::Villager | Self::Merchant => NpcState::Idle,
        }
    }
}

// ============================================================================
// AI STATE MACHINE
// ============================================================================

/// AI behavior states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NpcState {
    /// Standing still, waiting.
    Idle,
    /// Walking to a chosen point.
    MovingToTarget,
    /// Closing in on a hostile player.
    ApproachingEnemy,
    /// Holding the combat band and attacking on cooldown.
    InCombat,
    /// Running away from a hostile player.
    Fleeing,
    /// Slow drift with periodic heading changes.
    Wandering,
}

impl NpcState {
    /// All states.
    pub const ALL: [Self; 6] = [
        Self::Idle,
        Self::MovingToTarget,
        Self::ApproachingEnemy,
        Self::InCombat,
        Self::Fleeing,
        Self::Wandering,
    ];

    /// Log name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::MovingToTarget => "MOVING_TO_TARGET",
            Self::ApproachingEnemy => "APPROACHING_ENEMY",
            Self::InCombat => "IN_COMBAT",
            Self::Fleeing => "FLEEING",
            Self::Wandering => "WANDERING",
        }
    }
}

// ============================================================================
// NPC COMPONENT
// ============================================================================

/// A non-player character.
#[derive(Clone, Debug)]
pub struct Npc {
    npc_type: NpcType,
    stats: NpcStats,
    position: Vec3,
    velocity: Vec3,
    /// Move / flee destination.
    target: Vec3,
    state: NpcState,
    /// Seconds since the last transition.
    state_timer: f32,
    health: f32,
    active: bool,
    hostile: bool,
    combat_target: Option<PlayerId>,
    attack_timer: AttackTimer,
    last_damage_time: f32,
    /// Per-instance seed derived from the spawn position.
    seed: f32,
    /// Extra idle seconds, derived from `seed`.
    idle_jitter: f32,
    wander_heading: f32,
    wander_reroll: f32,
    animation: Option<AnimationBinding>,
}

impl Npc {
    /// Creates an NPC at its spawn position.
    #[must_use]
    pub fn new(npc_type: NpcType, position: Vec3) -> Self {
        let stats = npc_type.stats();
        let seed = sine_hash(position.x * 12.9898 + position.z * 78.233);

        Self {
            npc_type,
            stats,
            position,
            velocity: Vec3::ZERO,
            target: position,
            state: npc_type.initial_state(),
            state_timer: 0.0,
            health: stats.max_health,
            active: true,
            hostile: false,
            combat_target: None,
            attack_timer: AttackTimer::ready(),
            last_damage_time: f32::NEG_INFINITY,
            seed,
            idle_jitter: seed * IDLE_JITTER_MAX,
            wander_heading: 0.0,
            wander_reroll: 0.0,
            animation: None,
        }
    }

    /// NPC type.
    #[inline]
    #[must_use]
    pub const fn npc_type(&self) -> NpcType {
        self.npc_type
    }

    /// Stat table in effect.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &NpcStats {
        &self.stats
    }

    /// World position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Velocity of the last update.
    #[inline]
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Current move/flee destination.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> Vec3 {
        self.target
    }

    /// Current AI state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> NpcState {
        self.state
    }

    /// Seconds spent in the current state.
    #[inline]
    #[must_use]
    pub const fn state_timer(&self) -> f32 {
        self.state_timer
    }

    /// Remaining health.
    #[inline]
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// False once dead. Never becomes true again.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// True if linked to the player as an enemy.
    #[inline]
    #[must_use]
    pub const fn is_hostile(&self) -> bool {
        self.hostile
    }

    /// Marks the NPC hostile (or not) toward the player.
    pub fn set_hostile(&mut self, hostile: bool) {
        self.hostile = hostile;
    }

    /// Player this NPC is fighting, if any.
    #[inline]
    #[must_use]
    pub const fn combat_target(&self) -> Option<PlayerId> {
        self.combat_target
    }

    /// Binds or clears the combat target.
    pub fn set_combat_target(&mut self, target: Option<PlayerId>) {
        self.combat_target = target;
    }

    /// Chance of dodging an incoming attack.
    #[inline]
    #[must_use]
    pub const fn dodge_chance(&self) -> f32 {
        self.stats.combat.dodge_chance
    }

    /// Orders the NPC to walk to (x, z).
    pub fn set_move_target(&mut self, x: f32, z: f32) {
        self.target = Vec3::new(x, self.position.y, z);
        self.transition_to(NpcState::MovingToTarget);
    }

    /// Applies damage. There is no damage immunity.
    ///
    /// Returns true if this hit killed the NPC.
    pub fn take_damage(&mut self, amount: f32, now: f32) -> bool {
        if !self.active {
            return false;
        }

        self.health = (self.health - amount.max(0.0)).max(0.0);
        self.last_damage_time = now;

        if self.health > 0.0 {
            return false;
        }

        self.active = false;
        self.velocity = Vec3::ZERO;
        self.combat_target = None;
        tracing::info!(
            npc = self.npc_type.name(),
            x = self.position.x,
            z = self.position.z,
            "NPC died"
        );
        true
    }

    /// True within [`DAMAGE_FLASH_DURATION`] of the last damage.
    #[inline]
    #[must_use]
    pub fn is_flashing(&self, now: f32) -> bool {
        now - self.last_damage_time < DAMAGE_FLASH_DURATION
    }

    /// Flash strength in `[0, 1]`, fading linearly.
    #[must_use]
    pub fn flash_intensity(&self, now: f32) -> f32 {
        if self.is_flashing(now) {
            (1.0 - (now - self.last_damage_time) / DAMAGE_FLASH_DURATION).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Name of the animation clip matching the current motion.
    #[must_use]
    pub fn animation_clip(&self) -> &'static str {
        let speed_sq = self.velocity.x * self.velocity.x + self.velocity.z * self.velocity.z;
        if speed_sq > 1e-6 {
            CLIP_WALK
        } else {
            CLIP_IDLE
        }
    }

    /// Loaded animation assets, if any.
    #[inline]
    #[must_use]
    pub const fn animation(&self) -> Option<&AnimationBinding> {
        self.animation.as_ref()
    }

    /// Loads and binds skeleton + animations.
    ///
    /// Returns false (and logs) on failure; the NPC keeps simulating.
    pub fn attach_animation(
        &mut self,
        library: &mut dyn AnimationLibrary,
        skeleton_path: &str,
        animation_path: &str,
    ) -> bool {
        match AnimationBinding::load(library, skeleton_path, animation_path) {
            Ok(binding) => {
                self.animation = Some(binding);
                true
            }
            Err(error) => {
                tracing::warn!(
                    npc = self.npc_type.name(),
                    %error,
                    "Failed to load NPC animation; continuing without it"
                );
                false
            }
        }
    }

    /// Advances the state machine by `dt` seconds.
    ///
    /// `id` is only used for log context.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        id: NpcId,
        dt: f32,
        now: f32,
        player: &mut Player,
        ground: &dyn GroundQuery,
        rng: &mut R,
    ) {
        if !self.active {
            return;
        }

        self.state_timer += dt;
        self.check_aggro(player);

        match self.state {
            NpcState::Idle => self.update_idle(),
            NpcState::MovingToTarget => self.update_moving(dt),
            NpcState::ApproachingEnemy => self.update_approaching(id, dt, player),
            NpcState::InCombat => self.update_combat(id, dt, now, player, rng),
            NpcState::Fleeing => self.update_fleeing(dt),
            NpcState::Wandering => self.update_wandering(dt),
        }

        self.position.y = ground_y(ground, self.position.x, self.position.z, self.stats.size);
    }

    fn transition_to(&mut self, next: NpcState) {
        tracing::trace!(
            npc = self.npc_type.name(),
            from = self.state.name(),
            to = next.name(),
            after = self.state_timer,
            "NPC state transition"
        );
        self.state = next;
        self.state_timer = 0.0;
        if next == NpcState::Wandering {
            self.wander_reroll = 0.0;
        }
    }

    /// Reacts to a hostile-linked player inside aggro range.
    fn check_aggro(&mut self, player: &Player) {
        let linked = self.hostile || self.combat_target == Some(player.id());
        if !linked || !player.is_alive() {
            return;
        }
        if matches!(
            self.state,
            NpcState::InCombat | NpcState::Fleeing | NpcState::ApproachingEnemy
        ) {
            return;
        }

        let threat = player.position();
        if self.position.horizontal_distance(threat) > self.stats.aggro_range {
            return;
        }

        if self.npc_type == NpcType::Villager {
            let mut away = threat.horizontal_direction_to(self.position);
            if away == Vec3::ZERO {
                away = Vec3::new(1.0, 0.0, 0.0);
            }
            self.target = self.position + away * FLEE_DISTANCE;
            self.transition_to(NpcState::Fleeing);
        } else {
            self.combat_target = Some(player.id());
            self.transition_to(NpcState::ApproachingEnemy);
        }
    }

    fn update_idle(&mut self) {
        self.velocity = Vec3::ZERO;
        if self.state_timer < self.stats.max_state_time + self.idle_jitter {
            return;
        }

        let timer = self.state_timer;
        let angle = sine_hash(self.position.x * 0.37 + timer * 1.31 + self.seed * 17.0) * TAU;
        let radius = IDLE_TARGET_MIN
            + IDLE_TARGET_SPAN * sine_hash(self.position.z * 0.73 + timer * 2.17 + self.seed * 29.0);

        self.target = Vec3::new(
            self.position.x + angle.cos() * radius,
            self.position.y,
            self.position.z + angle.sin() * radius,
        );
        self.transition_to(NpcState::MovingToTarget);
    }

    fn update_moving(&mut self, dt: f32) {
        let step = step_toward(self.position, self.target, self.stats.move_speed, dt);
        self.position = step.position;
        self.velocity = step.velocity;

        let arrived = self.position.horizontal_distance(self.target) < MOVE_ARRIVAL_DISTANCE;
        if arrived || self.state_timer > MOVE_TIMEOUT {
            self.velocity = Vec3::ZERO;
            self.transition_to(NpcState::Idle);
        }
    }

    fn update_approaching(&mut self, id: NpcId, dt: f32, player: &Player) {
        let threat = player.position();
        let distance = self.position.horizontal_distance(threat);

        if !player.is_alive()
            || distance > self.stats.aggro_range * LEASH_FACTOR
            || self.state_timer > APPROACH_TIMEOUT
        {
            self.disengage(id);
            return;
        }

        let step = step_toward(self.position, threat, self.stats.move_speed, dt);
        self.position = step.position;
        self.velocity = step.velocity;

        if self.position.horizontal_distance(threat) <= self.stats.combat_range {
            self.transition_to(NpcState::InCombat);
        }
    }

    fn update_combat<R: Rng + ?Sized>(
        &mut self,
        id: NpcId,
        dt: f32,
        now: f32,
        player: &mut Player,
        rng: &mut R,
    ) {
        let threat = player.position();
        let distance = self.position.horizontal_distance(threat);

        if !player.is_alive() || distance > self.stats.aggro_range * LEASH_FACTOR {
            self.disengage(id);
            return;
        }

        let band = CombatBand::around(self.stats.combat_range);
        self.velocity = band.velocity(self.position, threat, self.stats.move_speed, now);
        self.position = integrate(self.position, self.velocity, dt);

        let combat = self.stats.combat;
        if distance > band.max || !self.attack_timer.is_ready(now, combat.attack_cooldown) {
            return;
        }

        let outcome = roll_attack(rng, combat.hit_chance, player.dodge_chance());
        self.attack_timer.reset(now);

        if outcome.is_hit() {
            let applied = player.take_damage(combat.attack_damage, now);
            tracing::debug!(
                npc = id.index(),
                kind = self.npc_type.name(),
                damage = combat.attack_damage,
                applied,
                player_health = player.health(),
                "NPC hit player"
            );
            if !player.is_alive() {
                tracing::info!(npc = id.index(), kind = self.npc_type.name(), "NPC defeated player");
                self.disengage(id);
            }
        } else {
            tracing::debug!(npc = id.index(), kind = self.npc_type.name(), "NPC missed player");
        }
    }

    fn update_fleeing(&mut self, dt: f32) {
        let step = step_toward(self.position, self.target, self.stats.move_speed, dt);
        self.position = step.position;
        self.velocity = step.velocity;

        let safe = self.position.horizontal_distance(self.target) < FLEE_ARRIVAL_DISTANCE;
        if safe || self.state_timer > FLEE_TIMEOUT {
            self.velocity = Vec3::ZERO;
            self.transition_to(NpcState::Idle);
        }
    }

    fn update_wandering(&mut self, dt: f32) {
        if self.state_timer > WANDER_DURATION {
            self.velocity = Vec3::ZERO;
            self.transition_to(NpcState::Idle);
            return;
        }

        self.wander_reroll -= dt;
        if self.wander_reroll <= 0.0 {
            let seed = self.position.x * 0.13 + self.position.z * 0.29 + self.state_timer * 3.7;
            self.wander_heading = sine_hash(seed + self.seed * 11.0) * TAU;
            self.wander_reroll = WANDER_REROLL_INTERVAL;
        }

        let speed = self.stats.move_speed * WANDER_SPEED_FACTOR;
        self.velocity = Vec3::new(self.wander_heading.cos(), 0.0, self.wander_heading.sin()) * speed;
        self.position = integrate(self.position, self.velocity, dt);
    }

    /// Drops combat, clears hostility and returns to IDLE.
    fn disengage(&mut self, id: NpcId) {
        tracing::debug!(npc = id.index(), kind = self.npc_type.name(), "NPC disengaged");
        self.combat_target = None;
        self.hostile = false;
        self.velocity = Vec3::ZERO;
        self.transition_to(NpcState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssetError;
    use crate::gameplay::animation::{AnimationHandle, SkeletonHandle};
    use crate::world::FlatGround;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f32 = 0.01;

    fn far_player() -> Player {
        Player::new(PlayerId(0), [10_000.0, 10_000.0])
    }

    fn run_until<F: Fn(&Npc) -> bool>(npc: &mut Npc, player: &mut Player, ticks: usize, done: F) -> bool {
        let ground = FlatGround(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let id = NpcId::from_index(0);
        for tick in 0..ticks {
            npc.update(id, DT, tick as f32 * DT, player, &ground, &mut rng);
            if done(npc) {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_stat_table() {
        let wanderer = NpcType::Wanderer.stats();
        assert_eq!(wanderer.move_speed, 2.5);
        assert_eq!(wanderer.max_health, 80.0);
        assert_eq!(wanderer.aggro_range, 12.0);

        let merchant = NpcType::Merchant.stats();
        assert_eq!(merchant.max_health, 120.0);
        assert_eq!(merchant.combat.attack_damage, 12.0);
    }

    #[test]
    fn test_initial_states() {
        assert_eq!(Npc::new(NpcType::Wanderer, Vec3::ZERO).state(), NpcState::Wandering);
        assert_eq!(Npc::new(NpcType::Villager, Vec3::ZERO).state(), NpcState::Idle);
        assert_eq!(Npc::new(NpcType::Merchant, Vec3::ZERO).state(), NpcState::Idle);
    }

    #[test]
    fn test_every_state_returns_to_idle() {
        for npc_type in NpcType::ALL {
            for state in NpcState::ALL {
                let mut npc = Npc::new(npc_type, Vec3::new(3.0, 0.0, -4.0));
                npc.target = Vec3::new(500.0, 0.0, 500.0);
                npc.transition_to(state);
                let mut player = far_player();

                // 20 simulated seconds bounds every timeout
                let reached = run_until(&mut npc, &mut player, 2000, |n| n.state() == NpcState::Idle);
                assert!(reached, "{} stuck in {}", npc_type.name(), state.name());
            }
        }
    }

    #[test]
    fn test_idle_picks_target_after_timer() {
        let mut npc = Npc::new(NpcType::Villager, Vec3::new(10.0, 0.0, 10.0));
        let mut player = far_player();
        let start = npc.position();

        let moved = run_until(&mut npc, &mut player, 900, |n| n.state() == NpcState::MovingToTarget);
        assert!(moved);
        assert!(npc.state_timer() <= DT);

        let distance = start.horizontal_distance(npc.target());
        assert!((4.9..=15.1).contains(&distance), "Target distance {distance}");
    }

    #[test]
    fn test_idle_jitter_bounded() {
        for i in 0..100 {
            let npc = Npc::new(NpcType::Merchant, Vec3::new(i as f32 * 3.3, 0.0, i as f32 * -1.7));
            assert!((0.0..IDLE_JITTER_MAX).contains(&npc.idle_jitter));
        }
    }

    #[test]
    fn test_villager_flees_away_from_player() {
        let mut npc = Npc::new(NpcType::Villager, Vec3::new(5.0, 0.0, 0.0));
        npc.set_hostile(true);
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);

        assert!(run_until(&mut npc, &mut player, 1, |n| n.state() == NpcState::Fleeing));
        assert!(npc.target().x > npc.position().x);
        assert!((npc.target().horizontal_distance(Vec3::new(5.0, 0.0, 0.0)) - FLEE_DISTANCE).abs() < 0.1);
    }

    #[test]
    fn test_fighter_approaches_and_engages() {
        let mut npc = Npc::new(NpcType::Merchant, Vec3::new(6.0, 0.0, 0.0));
        npc.transition_to(NpcState::Idle);
        let mut player = Player::new(PlayerId(7), [0.0, 0.0]);
        npc.set_combat_target(Some(player.id()));

        assert!(run_until(&mut npc, &mut player, 1, |n| n.state() == NpcState::ApproachingEnemy));
        assert_eq!(npc.combat_target(), Some(PlayerId(7)));

        assert!(run_until(&mut npc, &mut player, 500, |n| n.state() == NpcState::InCombat));
    }

    #[test]
    fn test_unlinked_player_ignored() {
        let mut npc = Npc::new(NpcType::Merchant, Vec3::new(2.0, 0.0, 0.0));
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        assert!(!run_until(&mut npc, &mut player, 50, |n| n.state() != NpcState::Idle));
    }

    #[test]
    fn test_combat_damages_player() {
        let mut npc = Npc::new(NpcType::Merchant, Vec3::new(2.0, 0.0, 0.0));
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        npc.set_combat_target(Some(player.id()));
        npc.transition_to(NpcState::InCombat);

        run_until(&mut npc, &mut player, 3000, |_| false);
        assert!(player.health() < player.max_health() || !player.is_alive());
    }

    #[test]
    fn test_leash_clears_hostility() {
        let mut npc = Npc::new(NpcType::Wanderer, Vec3::ZERO);
        npc.set_hostile(true);
        npc.set_combat_target(Some(PlayerId(0)));
        npc.transition_to(NpcState::InCombat);
        let mut player = far_player();

        assert!(run_until(&mut npc, &mut player, 1, |n| n.state() == NpcState::Idle));
        assert!(!npc.is_hostile());
        assert_eq!(npc.combat_target(), None);
    }

    #[test]
    fn test_damage_not_suppressed_but_flashes() {
        let mut npc = Npc::new(NpcType::Villager, Vec3::ZERO);
        assert!(!npc.take_damage(10.0, 1.0));
        assert!(!npc.take_damage(10.0, 1.1));
        assert_eq!(npc.health(), 30.0);

        assert!(npc.is_flashing(1.2));
        assert!(npc.flash_intensity(1.2) > 0.0);
        assert!(!npc.is_flashing(1.7));
        assert_eq!(npc.flash_intensity(2.0), 0.0);
    }

    #[test]
    fn test_death_is_permanent() {
        let mut npc = Npc::new(NpcType::Villager, Vec3::ZERO);
        assert!(npc.take_damage(500.0, 0.0));
        assert!(!npc.is_active());
        assert_eq!(npc.health(), 0.0);
        assert!(!npc.take_damage(10.0, 5.0));

        let mut player = far_player();
        run_until(&mut npc, &mut player, 1000, |_| false);
        assert!(!npc.is_active());
        assert_eq!(npc.position(), Vec3::ZERO);
    }

    #[test]
    fn test_ground_clamp() {
        let mut npc = Npc::new(NpcType::Wanderer, Vec3::new(0.0, 50.0, 0.0));
        let mut player = far_player();
        let ground = FlatGround(3.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        npc.update(NpcId::from_index(0), DT, 0.0, &mut player, &ground, &mut rng);

        let expected = 3.0 + npc.stats().size + crate::gameplay::movement::TERRAIN_RENDER_OFFSET;
        assert!((npc.position().y - expected).abs() < 1e-6);
    }

    #[test]
    fn test_animation_clip_follows_motion() {
        let mut npc = Npc::new(NpcType::Villager, Vec3::ZERO);
        assert_eq!(npc.animation_clip(), CLIP_IDLE);
        npc.set_move_target(20.0, 0.0);
        let mut player = far_player();
        run_until(&mut npc, &mut player, 1, |_| true);
        assert_eq!(npc.animation_clip(), CLIP_WALK);
    }

    struct MissingAssets;

    impl AnimationLibrary for MissingAssets {
        fn load_skeleton(&mut self, path: &str) -> Result<SkeletonHandle, AssetError> {
            Err(AssetError::NotFound(path.to_string()))
        }

        fn load_animation(
            &mut self,
            _skeleton: SkeletonHandle,
            path: &str,
        ) -> Result<AnimationHandle, AssetError> {
            Err(AssetError::NotFound(path.to_string()))
        }
    }

    struct StubAssets;

    impl AnimationLibrary for StubAssets {
        fn load_skeleton(&mut self, _path: &str) -> Result<SkeletonHandle, AssetError> {
            Ok(SkeletonHandle(1))
        }

        fn load_animation(
            &mut self,
            _skeleton: SkeletonHandle,
            _path: &str,
        ) -> Result<AnimationHandle, AssetError> {
            Ok(AnimationHandle(2))
        }
    }

    #[test]
    fn test_animation_failure_is_not_fatal() {
        let mut npc = Npc::new(NpcType::Merchant, Vec3::ZERO);
        assert!(!npc.attach_animation(&mut MissingAssets, "skel.glb", "anim.glb"));
        assert!(npc.animation().is_none());
        assert!(npc.is_active());

        assert!(npc.attach_animation(&mut StubAssets, "skel.glb", "anim.glb"));
        assert_eq!(npc.animation().map(|a| a.animations), Some(AnimationHandle(2)));
    }
}
