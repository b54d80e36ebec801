//! # Simulation
//!
//! Owns every collection and drives one fixed-step tick:
//! ```text
//! Tick N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. ADVANCE CLOCK          now += fixed_delta                        │
//! │                                                                     │
//! │ 2. STREAM CHUNKS          only if the player changed chunk          │
//! │    ├─ generate + upload new chunks                                  │
//! │    ├─ append spawned resources / NPCs (first load only)             │
//! │    └─ release meshes of distant chunks                              │
//! │                                                                     │
//! │ 3. PLAYER                 combat > pursuit > move order             │
//! │                                                                     │
//! │ 4. NPCS                   state machine, in arena order             │
//! │                                                                     │
//! │ 5. RENDER (caller)        chunks, resources, NPCs, HUD              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs to completion inside the tick; there is no background
//! loading. Combat rolls come from a seeded ChaCha stream, so two
//! simulations built from the same config and fed the same input replay
//! identically.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wildlands_core::Arena;

use crate::config::WorldConfig;
use crate::error::WorldResult;
use crate::gameplay::animation::AnimationLibrary;
use crate::gameplay::npc::Npc;
use crate::gameplay::player::{Player, PlayerId};
use crate::gameplay::resource::{ResourceId, ResourceNode};
use crate::hud::{draw_player_hud, Overlay};
use crate::input::InputSource;
use crate::render::{EntityRenderer, MeshBackend, TextureProvider};
use crate::world::{ChunkManager, SpawnTargets, WorldStats};

/// Largest horizontal distance at which the player can mine a node.
pub const MINING_REACH: f32 = 4.0;

/// The streamed world plus its inhabitants.
#[derive(Debug)]
pub struct Simulation {
    config: WorldConfig,
    chunks: ChunkManager,
    player: Player,
    npcs: Arena<Npc>,
    resources: Vec<ResourceNode>,
    rng: ChaCha8Rng,
    now: f32,
    tick_count: u64,
    entities: EntityRenderer,
}

impl Simulation {
    /// Creates an empty world. Nothing is loaded until the first tick.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WorldError::InvalidConfig`] if the config fails
    /// validation.
    pub fn new(config: WorldConfig) -> WorldResult<Self> {
        config.validate()?;

        tracing::info!(
            render_distance = config.render_distance,
            sea_level = config.sea_level,
            spawn_entities = config.spawn_entities,
            seed = config.rng_seed,
            "Creating world"
        );

        Ok(Self {
            chunks: ChunkManager::new(&config),
            player: Player::new(PlayerId(0), config.player_spawn),
            npcs: Arena::new(),
            resources: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            now: 0.0,
            tick_count: 0,
            entities: EntityRenderer::new(),
            config,
        })
    }

    /// Advances the world by one fixed step.
    pub fn tick(&mut self, backend: &mut dyn MeshBackend) {
        let dt = self.config.fixed_delta;
        self.now += dt;
        self.tick_count += 1;

        let position = self.player.position();
        self.chunks.update_chunks_around_player(
            position.x,
            position.z,
            backend,
            SpawnTargets {
                resources: &mut self.resources,
                npcs: &mut self.npcs,
            },
        );

        self.player
            .update(dt, self.now, &self.chunks, &mut self.npcs, &mut self.rng);

        for (id, npc) in self.npcs.iter_mut() {
            npc.update(id, dt, self.now, &mut self.player, &self.chunks, &mut self.rng);
        }
    }

    /// Runs `ticks` fixed steps.
    pub fn run(&mut self, backend: &mut dyn MeshBackend, ticks: u64) {
        for _ in 0..ticks {
            self.tick(backend);
        }
    }

    /// Applies one frame of player orders.
    pub fn apply_input(&mut self, input: &dyn InputSource) {
        let frame = input.poll();

        self.player.set_sprinting(frame.sprint);
        if let Some([x, z]) = frame.move_target {
            self.player.set_target(x, z);
        }
        if let Some(npc) = frame.attack_target {
            if !self.player.engage(npc, &mut self.npcs) {
                tracing::debug!(npc = npc.index(), "Attack order ignored: no living NPC");
            }
        }
        if let Some(resource) = frame.mine_target {
            self.mine(resource);
        }
    }

    /// Mines a node within [`MINING_REACH`]. Returns resources gained.
    pub fn mine(&mut self, resource: ResourceId) -> u32 {
        let Some(node) = self.resources.get_mut(resource.index()) else {
            tracing::debug!(resource = resource.0, "Mine order ignored: unknown node");
            return 0;
        };
        let distance = self.player.position().horizontal_distance(node.position());
        if distance > MINING_REACH {
            tracing::debug!(resource = resource.0, distance, "Mine order ignored: out of reach");
            return 0;
        }
        self.player.mine(node)
    }

    /// Loads the same skeleton and animation set for every NPC that has
    /// none yet. Returns how many NPCs were bound.
    pub fn attach_npc_animations(
        &mut self,
        library: &mut dyn AnimationLibrary,
        skeleton_path: &str,
        animation_path: &str,
    ) -> usize {
        let mut bound = 0;
        for (_, npc) in self.npcs.iter_mut() {
            if npc.is_active()
                && npc.animation().is_none()
                && npc.attach_animation(library, skeleton_path, animation_path)
            {
                bound += 1;
            }
        }
        bound
    }

    /// Submits terrain, resources and NPCs.
    pub fn render(&mut self, backend: &mut dyn MeshBackend, textures: &mut dyn TextureProvider) {
        self.chunks.draw(backend, textures);
        self.entities.draw_resources(backend, &self.resources);
        self.entities.draw_npcs(backend, &self.npcs, self.now);
    }

    /// Draws the player HUD.
    pub fn draw_hud(&self, overlay: &mut dyn Overlay) {
        draw_player_hud(overlay, &self.player);
    }

    /// Releases every mesh this world uploaded.
    pub fn shutdown(&mut self, backend: &mut dyn MeshBackend) {
        self.chunks.unload_all(backend);
        self.entities.release_all(backend);
        tracing::info!(ticks = self.tick_count, "World shut down");
    }

    /// The player's current combat target, if it is still alive.
    #[must_use]
    pub fn player_target(&self) -> Option<&Npc> {
        self.player
            .combat_target()
            .and_then(|id| self.npcs.get(id))
            .filter(|npc| npc.is_active())
    }

    /// Configuration the world was built with.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Chunk streaming state.
    #[must_use]
    pub const fn chunks(&self) -> &ChunkManager {
        &self.chunks
    }

    /// Session counters.
    #[must_use]
    pub const fn stats(&self) -> &WorldStats {
        self.chunks.stats()
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player, for scripted control.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Every NPC ever spawned, dead ones included.
    #[must_use]
    pub const fn npcs(&self) -> &Arena<Npc> {
        &self.npcs
    }

    /// Every resource node ever spawned, depleted ones included.
    #[must_use]
    pub fn resources(&self) -> &[ResourceNode] {
        &self.resources
    }

    /// Simulated seconds since creation.
    #[must_use]
    pub const fn now(&self) -> f32 {
        self.now
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
