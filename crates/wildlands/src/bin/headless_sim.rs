//! # WILDLANDS Headless Simulation
//!
//! Runs the world with no window and no GPU: a scripted player walk across
//! several chunks, one fight and some mining, then prints world stats.
//!
//! ```bash
//! # Defaults, 3000 ticks
//! wildlands-headless
//!
//! # Custom config and tick count
//! RUST_LOG=wildlands=debug wildlands-headless world.toml 10000
//! ```

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use wildlands::gameplay::NpcType;
use wildlands::{HeadlessBackend, InputFrame, ResourceId, Simulation, WorldConfig};

const DEFAULT_TICKS: u64 = 3000;

/// One swing of the pick every this many ticks.
const MINE_INTERVAL: u64 = 50;

/// Waypoints walked in order (world x, z).
const ROUTE: [[f32; 2]; 4] = [[60.0, 0.0], [60.0, 70.0], [-40.0, 70.0], [0.0, 0.0]];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => WorldConfig::from_toml_file(&path).with_context(|| format!("loading {path}"))?,
        None => WorldConfig::default(),
    };
    let ticks = match args.next() {
        Some(raw) => raw.parse::<u64>().with_context(|| format!("tick count {raw:?}"))?,
        None => DEFAULT_TICKS,
    };

    let mut world = Simulation::new(config).context("creating world")?;
    let mut backend = HeadlessBackend::new();
    let mut textures = HeadlessBackend::new();

    let leg = (ticks / ROUTE.len() as u64).max(1);
    let mut waypoint = 0usize;

    for tick in 0..ticks {
        if tick % leg == 0 && waypoint < ROUTE.len() {
            let [x, z] = ROUTE[waypoint];
            world.apply_input(&InputFrame {
                move_target: Some([x, z]),
                sprint: waypoint % 2 == 1,
                ..InputFrame::default()
            });
            tracing::info!(waypoint, x, z, "Heading to waypoint");
            waypoint += 1;
        }

        // Pick a fight with the nearest wanderer once, halfway through
        if tick == ticks / 2 {
            engage_nearest_wanderer(&mut world);
        }

        world.tick(&mut backend);
        if tick % MINE_INTERVAL == 0 {
            mine_nearby(&mut world);
        }

        backend.begin_frame();
        world.render(&mut backend, &mut textures);
    }

    report(&world, &backend);
    world.shutdown(&mut backend);
    Ok(())
}

fn engage_nearest_wanderer(world: &mut Simulation) {
    let player = world.player().position();
    let nearest = world
        .npcs()
        .iter()
        .filter(|(_, npc)| npc.is_active() && npc.npc_type() == NpcType::Wanderer)
        .min_by(|(_, a), (_, b)| {
            let da = a.position().horizontal_distance(player);
            let db = b.position().horizontal_distance(player);
            da.total_cmp(&db)
        })
        .map(|(id, _)| id);

    match nearest {
        Some(id) => world.apply_input(&InputFrame {
            attack_target: Some(id),
            ..InputFrame::default()
        }),
        None => tracing::info!("No wanderer to fight"),
    }
}

fn mine_nearby(world: &mut Simulation) {
    let player = world.player().position();
    let target = world
        .resources()
        .iter()
        .position(|node| node.is_active() && node.position().horizontal_distance(player) < 3.0);
    if let Some(index) = target {
        world.apply_input(&InputFrame {
            mine_target: Some(ResourceId(index as u32)),
            ..InputFrame::default()
        });
    }
}

fn report(world: &Simulation, backend: &HeadlessBackend) {
    let stats = world.stats();
    let player = world.player();
    let living_npcs = world.npcs().iter().filter(|(_, npc)| npc.is_active()).count();
    let active_resources = world.resources().iter().filter(|node| node.is_active()).count();

    tracing::info!(
        ticks = world.tick_count(),
        seconds = world.now(),
        generated = stats.chunks_generated,
        unloaded = stats.chunks_unloaded,
        resident = stats.resident_chunks,
        validation_warnings = stats.validation_warnings,
        "Chunks"
    );
    tracing::info!(
        resources = stats.resources_spawned,
        active_resources,
        npcs = stats.npcs_spawned,
        living_npcs,
        "Entities"
    );
    tracing::info!(
        health = player.health(),
        deaths = player.deaths(),
        agility = player.skills().agility.level,
        strength = player.skills().strength.level,
        mining = player.skills().mining.level,
        collected = player.inventory().total(),
        "Player"
    );
    tracing::info!(
        uploads = backend.uploads(),
        releases = backend.releases(),
        live_meshes = backend.live_meshes(),
        last_frame_draws = backend.frame_draws(),
        "Backend"
    );
}
