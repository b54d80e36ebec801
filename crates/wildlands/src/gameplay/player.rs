//! # Player
//!
//! The user-controlled actor. Two implicit modes with a strict precedence:
//!
//! 1. **Combat**: a bound, living combat target within
//!    [`PLAYER_COMBAT_RANGE`] overrides any move order. The player holds the
//!    `[1.5, 2.5]` band and attacks on cooldown.
//! 2. **Pursuit**: a living target farther away makes the player sprint
//!    toward it.
//! 3. **Free movement**: otherwise a pending move order is followed until
//!    within [`ARRIVAL_EPSILON`].
//!
//! Walking feeds agility experience in whole-unit batches.

use rand::Rng;
use wildlands_core::{Arena, Vec3};

use crate::gameplay::combat::{roll_attack, AttackTimer, CombatBand, CombatStats};
use crate::gameplay::movement::{ground_y, integrate, step_toward, ARRIVAL_EPSILON};
use crate::gameplay::npc::{Npc, NpcId};
use crate::gameplay::resource::ResourceNode;
use crate::gameplay::skills::{
    Inventory, Skills, HIT_XP, MINE_XP, SPRINT_XP_PER_UNIT, WALK_XP_PER_UNIT,
};
use crate::world::GroundQuery;

/// Player health when (re)spawned.
pub const PLAYER_MAX_HEALTH: f32 = 100.0;

/// Base walking speed (units per second).
pub const PLAYER_WALK_SPEED: f32 = 5.0;

/// Speed multiplier while sprinting.
pub const SPRINT_MULTIPLIER: f32 = 1.8;

/// Half-height used for ground clamping.
pub const PLAYER_SIZE: f32 = 0.9;

/// Combat takes over within this distance of the combat target.
pub const PLAYER_COMBAT_RANGE: f32 = 3.0;

/// Preferred standoff band while fighting.
pub const PLAYER_COMBAT_BAND: CombatBand = CombatBand { min: 1.5, max: 2.5 };

/// Damage taken within this window of the previous hit is ignored.
pub const DAMAGE_IMMUNITY: f32 = 1.0;

/// Mining damage at mining level 1.
pub const BASE_MINING_DAMAGE: f32 = 25.0;

/// Base attack stats.
pub const PLAYER_COMBAT_STATS: CombatStats = CombatStats {
    attack_damage: 15.0,
    attack_cooldown: 1.0,
    hit_chance: 0.8,
    dodge_chance: 0.2,
};

/// Identifies the player to NPCs that target it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u32);

/// The player.
#[derive(Clone, Debug)]
pub struct Player {
    id: PlayerId,
    position: Vec3,
    /// Move order destination.
    target: Vec3,
    has_target: bool,
    sprinting: bool,
    /// Chasing a combat target; forces sprint speed without touching `sprinting`.
    pursuing: bool,
    in_combat: bool,
    health: f32,
    max_health: f32,
    stats: CombatStats,
    attack_timer: AttackTimer,
    last_damage_time: f32,
    combat_target: Option<NpcId>,
    skills: Skills,
    inventory: Inventory,
    /// Distance walked that has not yet been converted to experience.
    distance_traveled: f32,
    spawn_point: [f32; 2],
    deaths: u32,
}

impl Player {
    /// Creates a player at `spawn` (world x, z). Y is fixed on the first
    /// update.
    #[must_use]
    pub fn new(id: PlayerId, spawn: [f32; 2]) -> Self {
        let position = Vec3::new(spawn[0], 0.0, spawn[1]);
        Self {
            id,
            position,
            target: position,
            has_target: false,
            sprinting: false,
            pursuing: false,
            in_combat: false,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            stats: PLAYER_COMBAT_STATS,
            attack_timer: AttackTimer::ready(),
            last_damage_time: f32::NEG_INFINITY,
            combat_target: None,
            skills: Skills::default(),
            inventory: Inventory::new(),
            distance_traveled: 0.0,
            spawn_point: spawn,
            deaths: 0,
        }
    }

    /// Player identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// World position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Move order destination (meaningful while [`Player::has_target`]).
    #[inline]
    #[must_use]
    pub const fn target(&self) -> Vec3 {
        self.target
    }

    /// True while a move order is pending.
    #[inline]
    #[must_use]
    pub const fn has_target(&self) -> bool {
        self.has_target
    }

    /// True while sprinting, either by order or while chasing a target.
    #[inline]
    #[must_use]
    pub const fn is_sprinting(&self) -> bool {
        self.sprinting || self.pursuing
    }

    /// True while combat overrides movement.
    #[inline]
    #[must_use]
    pub const fn is_in_combat(&self) -> bool {
        self.in_combat
    }

    /// Current health.
    #[inline]
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Maximum health.
    #[inline]
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.max_health
    }

    /// False between a fatal hit and the next update.
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Chance of dodging an NPC attack.
    #[inline]
    #[must_use]
    pub const fn dodge_chance(&self) -> f32 {
        self.stats.dodge_chance
    }

    /// Bound combat target, possibly stale until the next update.
    #[inline]
    #[must_use]
    pub const fn combat_target(&self) -> Option<NpcId> {
        self.combat_target
    }

    /// Skill levels.
    #[inline]
    #[must_use]
    pub const fn skills(&self) -> &Skills {
        &self.skills
    }

    /// Carried resources.
    #[inline]
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Walked distance not yet converted to experience (always < 1).
    #[inline]
    #[must_use]
    pub const fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    /// Number of deaths so far.
    #[inline]
    #[must_use]
    pub const fn deaths(&self) -> u32 {
        self.deaths
    }

    /// Current movement speed including sprint and agility.
    #[must_use]
    pub fn move_speed(&self) -> f32 {
        let sprint = if self.is_sprinting() { SPRINT_MULTIPLIER } else { 1.0 };
        PLAYER_WALK_SPEED * sprint * self.skills.speed_modifier()
    }

    /// Issues a move order to (x, z).
    pub fn set_target(&mut self, x: f32, z: f32) {
        self.target = Vec3::new(x, self.position.y, z);
        self.has_target = true;
    }

    /// Sets the sprint flag.
    pub fn set_sprinting(&mut self, sprinting: bool) {
        self.sprinting = sprinting;
    }

    /// Moves the player without walking (no experience, no ground clamp).
    pub fn teleport(&mut self, x: f32, z: f32) {
        self.position.x = x;
        self.position.z = z;
        self.has_target = false;
    }

    /// Binds `npc_id` as combat target and links the NPC back to the player.
    ///
    /// Returns false if the NPC does not exist or is dead.
    pub fn engage(&mut self, npc_id: NpcId, npcs: &mut Arena<Npc>) -> bool {
        match npcs.get_mut(npc_id) {
            Some(npc) if npc.is_active() => {
                npc.set_hostile(true);
                npc.set_combat_target(Some(self.id));
                self.combat_target = Some(npc_id);
                tracing::debug!(npc = npc_id.index(), kind = npc.npc_type().name(), "Player engaged NPC");
                true
            }
            _ => false,
        }
    }

    /// Drops the combat target.
    pub fn disengage(&mut self) {
        self.combat_target = None;
        self.in_combat = false;
        self.pursuing = false;
    }

    /// Applies NPC damage unless within [`DAMAGE_IMMUNITY`] of the last
    /// accepted hit.
    ///
    /// Returns true if the damage was applied.
    pub fn take_damage(&mut self, amount: f32, now: f32) -> bool {
        if !self.is_alive() || now - self.last_damage_time < DAMAGE_IMMUNITY {
            return false;
        }

        self.health = (self.health - amount.max(0.0)).max(0.0);
        self.last_damage_time = now;
        if !self.is_alive() {
            tracing::info!(x = self.position.x, z = self.position.z, "Player died");
        }
        true
    }

    /// Mines a node with skill-scaled damage.
    ///
    /// Returns the resources gained (0 for a depleted node).
    pub fn mine(&mut self, node: &mut ResourceNode) -> u32 {
        if !node.is_active() {
            return 0;
        }

        let gained = node.mine(BASE_MINING_DAMAGE * self.skills.mining_modifier());
        self.skills.mining.add_experience(MINE_XP);
        self.inventory.add(node.resource_type(), gained);
        gained
    }

    /// Advances the player by `dt` seconds.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        now: f32,
        ground: &dyn GroundQuery,
        npcs: &mut Arena<Npc>,
        rng: &mut R,
    ) {
        if !self.is_alive() {
            self.respawn(ground);
            return;
        }

        let mut moved = 0.0;
        let live_target = self
            .combat_target
            .and_then(|id| npcs.get_mut(id).filter(|npc| npc.is_active()).map(|npc| (id, npc)));

        match live_target {
            Some((id, npc)) => moved = self.update_combat(id, npc, dt, now, rng),
            None => {
                if self.combat_target.take().is_some() {
                    self.in_combat = false;
                }
                self.pursuing = false;
                if self.has_target {
                    moved = self.update_move_order(dt);
                }
            }
        }

        self.accumulate_distance(moved);
        self.position.y = ground_y(ground, self.position.x, self.position.z, PLAYER_SIZE);
    }

    /// Combat or pursuit against a living target. Returns distance moved.
    fn update_combat<R: Rng + ?Sized>(
        &mut self,
        id: NpcId,
        npc: &mut Npc,
        dt: f32,
        now: f32,
        rng: &mut R,
    ) -> f32 {
        let enemy = npc.position();
        let distance = self.position.horizontal_distance(enemy);

        if distance > PLAYER_COMBAT_RANGE {
            self.in_combat = false;
            self.pursuing = true;
            let step = step_toward(self.position, enemy, self.move_speed(), dt);
            self.position = step.position;
            return step.distance;
        }

        if !self.in_combat {
            tracing::debug!(npc = id.index(), "Player entered combat");
        }
        self.in_combat = true;
        self.pursuing = false;
        self.has_target = false;

        let velocity = PLAYER_COMBAT_BAND.velocity(self.position, enemy, self.move_speed(), now);
        let next = integrate(self.position, velocity, dt);
        let moved = self.position.horizontal_distance(next);
        self.position = next;

        if !self.attack_timer.is_ready(now, self.stats.attack_cooldown) {
            return moved;
        }

        let outcome = roll_attack(rng, self.stats.hit_chance, npc.dodge_chance());
        self.attack_timer.reset(now);

        if outcome.is_hit() {
            let damage = self.stats.attack_damage * self.skills.damage_modifier();
            let killed = npc.take_damage(damage, now);
            self.skills.strength.add_experience(HIT_XP);
            tracing::debug!(npc = id.index(), damage, npc_health = npc.health(), "Player hit NPC");
            if killed {
                tracing::info!(npc = id.index(), kind = npc.npc_type().name(), "Player defeated NPC");
                self.disengage();
            }
        } else {
            tracing::debug!(npc = id.index(), "Player missed NPC");
        }

        moved
    }

    /// Follows the pending move order. Returns distance moved.
    fn update_move_order(&mut self, dt: f32) -> f32 {
        let step = step_toward(self.position, self.target, self.move_speed(), dt);
        self.position = step.position;
        if step.arrived {
            self.has_target = false;
        }
        step.distance
    }

    /// Converts walked distance to agility experience, one whole unit at a
    /// time.
    fn accumulate_distance(&mut self, moved: f32) {
        self.distance_traveled += moved;
        while self.distance_traveled >= 1.0 {
            self.distance_traveled -= 1.0;
            let xp = if self.is_sprinting() {
                SPRINT_XP_PER_UNIT
            } else {
                WALK_XP_PER_UNIT
            };
            if self.skills.agility.add_experience(xp) > 0 {
                tracing::debug!(level = self.skills.agility.level, "Agility level up");
            }
        }
    }

    /// Full reset at the spawn point. Skills and inventory are kept.
    fn respawn(&mut self, ground: &dyn GroundQuery) {
        let [x, z] = self.spawn_point;
        self.position = Vec3::new(x, ground_y(ground, x, z, PLAYER_SIZE), z);
        self.target = self.position;
        self.has_target = false;
        self.sprinting = false;
        self.pursuing = false;
        self.in_combat = false;
        self.combat_target = None;
        self.health = self.max_health;
        self.attack_timer = AttackTimer::ready();
        self.last_damage_time = f32::NEG_INFINITY;
        self.distance_traveled = 0.0;
        self.deaths += 1;
        tracing::info!(x, z, deaths = self.deaths, "Player respawned");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::npc::NpcType;
    use crate::gameplay::resource::ResourceType;
    use crate::world::FlatGround;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f32 = 0.01;

    fn run(player: &mut Player, npcs: &mut Arena<Npc>, ticks: usize) {
        let ground = FlatGround(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for tick in 0..ticks {
            player.update(DT, tick as f32 * DT, &ground, npcs, &mut rng);
        }
    }

    #[test]
    fn test_move_order_arrives() {
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        let mut npcs = Arena::new();
        player.set_target(3.0, 4.0);

        run(&mut player, &mut npcs, 200);
        assert!(!player.has_target());
        assert!(player.position().horizontal_distance(Vec3::new(3.0, 0.0, 4.0)) < ARRIVAL_EPSILON);
    }

    #[test]
    fn test_walking_xp_is_batched() {
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        let mut npcs = Arena::new();
        player.set_target(10.5, 0.0);

        run(&mut player, &mut npcs, 400);
        assert_eq!(player.skills().agility.experience, 10);
        assert!(player.distance_traveled() < 1.0);
    }

    #[test]
    fn test_sprinting_xp_doubles() {
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        let mut npcs = Arena::new();
        player.set_sprinting(true);
        player.set_target(5.5, 0.0);

        run(&mut player, &mut npcs, 400);
        assert_eq!(player.skills().agility.experience, 10);
    }

    #[test]
    fn test_combat_overrides_move_order() {
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        let mut npcs = Arena::new();
        let id = npcs.insert(Npc::new(NpcType::Merchant, Vec3::new(2.0, 0.0, 0.0)));

        assert!(player.engage(id, &mut npcs));
        player.set_target(-50.0, 0.0);
        run(&mut player, &mut npcs, 1);

        assert!(player.is_in_combat());
        assert!(!player.has_target());
        assert!(player.position().x > -1.0);
    }

    #[test]
    fn test_pursuit_sprints() {
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        let mut npcs = Arena::new();
        let id = npcs.insert(Npc::new(NpcType::Merchant, Vec3::new(20.0, 0.0, 0.0)));

        player.engage(id, &mut npcs);
        run(&mut player, &mut npcs, 10);
        assert!(player.is_sprinting());
        assert!(!player.is_in_combat());
        assert!(player.position().x > 0.0);
    }

    #[test]
    fn test_pursuit_sprint_ends_with_target() {
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        let mut npcs = Arena::new();
        let id = npcs.insert(Npc::new(NpcType::Villager, Vec3::new(10.0, 0.0, 0.0)));

        player.engage(id, &mut npcs);
        run(&mut player, &mut npcs, 50);
        assert!(player.is_sprinting());

        npcs.get_mut(id).expect("npc").take_damage(1000.0, 0.0);
        run(&mut player, &mut npcs, 1);
        assert!(!player.is_sprinting());
        assert_eq!(player.move_speed(), PLAYER_WALK_SPEED);

        let xp_before = player.skills().agility.experience;
        let carried = player.distance_traveled();
        let start = player.position().x;
        player.set_target(start + 10.25, 0.0);
        run(&mut player, &mut npcs, 400);

        assert!(!player.has_target());
        let walked_xp = player.skills().agility.experience - xp_before;
        assert_eq!(walked_xp, (carried + 10.25).floor() as u32 * WALK_XP_PER_UNIT);
    }

    #[test]
    fn test_engage_links_both_sides() {
        let mut player = Player::new(PlayerId(9), [0.0, 0.0]);
        let mut npcs = Arena::new();
        let id = npcs.insert(Npc::new(NpcType::Wanderer, Vec3::ZERO));

        assert!(player.engage(id, &mut npcs));
        assert_eq!(player.combat_target(), Some(id));
        let npc = npcs.get(id).expect("npc");
        assert!(npc.is_hostile());
        assert_eq!(npc.combat_target(), Some(PlayerId(9)));
    }

    #[test]
    fn test_cannot_engage_dead_npc() {
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        let mut npcs = Arena::new();
        let id = npcs.insert(Npc::new(NpcType::Villager, Vec3::ZERO));
        npcs.get_mut(id).expect("npc").take_damage(1000.0, 0.0);

        assert!(!player.engage(id, &mut npcs));
        assert_eq!(player.combat_target(), None);
    }

    #[test]
    fn test_stale_target_cleared() {
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        let mut npcs = Arena::new();
        let id = npcs.insert(Npc::new(NpcType::Villager, Vec3::new(1.0, 0.0, 0.0)));
        player.engage(id, &mut npcs);

        npcs.get_mut(id).expect("npc").take_damage(1000.0, 0.0);
        run(&mut player, &mut npcs, 1);
        assert_eq!(player.combat_target(), None);
        assert!(!player.is_in_combat());
    }

    #[test]
    fn test_player_kills_npc_with_base_damage() {
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        let mut npcs = Arena::new();
        let id = npcs.insert(Npc::new(NpcType::Villager, Vec3::new(2.0, 0.0, 0.0)));
        player.engage(id, &mut npcs);

        // Villager: 50 HP, 15 per hit -> 4 hits
        run(&mut player, &mut npcs, 10_000);
        let npc = npcs.get(id).expect("npc");
        assert!(!npc.is_active());
        assert_eq!(player.combat_target(), None);
        assert!(player.skills().strength.experience >= 4 * HIT_XP);
    }

    #[test]
    fn test_damage_immunity_window() {
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        assert!(player.take_damage(10.0, 0.0));
        assert!(!player.take_damage(10.0, 0.5));
        assert!(player.take_damage(10.0, 1.0));
        assert_eq!(player.health(), 80.0);
    }

    #[test]
    fn test_respawn_keeps_progress() {
        let mut player = Player::new(PlayerId(0), [4.0, -2.0]);
        let mut npcs = Arena::new();
        let mut stone = ResourceNode::new(ResourceType::Stone, Vec3::ZERO);
        for _ in 0..4 {
            player.mine(&mut stone);
        }
        player.teleport(100.0, 100.0);
        player.set_sprinting(true);

        assert!(player.take_damage(1000.0, 0.0));
        assert!(!player.is_alive());

        let ground = FlatGround(2.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        player.update(DT, 0.0, &ground, &mut npcs, &mut rng);

        assert!(player.is_alive());
        assert_eq!(player.health(), PLAYER_MAX_HEALTH);
        assert_eq!(player.position().x, 4.0);
        assert_eq!(player.position().z, -2.0);
        assert!((player.position().y - (2.0 + PLAYER_SIZE + crate::gameplay::movement::TERRAIN_RENDER_OFFSET)).abs() < 1e-6);
        assert!(!player.is_sprinting());
        assert_eq!(player.deaths(), 1);
        assert_eq!(player.inventory().count(ResourceType::Stone), 1);
        assert_eq!(player.skills().mining.experience, 4 * MINE_XP);
    }

    #[test]
    fn test_mining_scales_with_skill() {
        let mut player = Player::new(PlayerId(0), [0.0, 0.0]);
        player.skills.mining.level = 3;
        let mut copper = ResourceNode::new(ResourceType::Copper, Vec3::ZERO);

        // 25 * 1.2 = 30 per swing; copper has 80 HP -> 3 swings
        assert_eq!(player.mine(&mut copper), 0);
        assert_eq!(player.mine(&mut copper), 0);
        assert_eq!(player.mine(&mut copper), 1);
        assert_eq!(player.mine(&mut copper), 0);
        assert_eq!(player.inventory().count(ResourceType::Copper), 1);
    }
}
