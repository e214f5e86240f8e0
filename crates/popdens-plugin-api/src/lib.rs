//! Plugin API: events, entity kinds, and the host interface for world rules.
//!
//! This crate defines the seam between a hosting server (event dispatch,
//! worlds, entities, region store) and plugins that react to world events.
//! It depends only on the popdens-world data model.

use popdens_world::{BlockPos, Dimension, Location, Material, MobType, RegionCoords, WorldId};
use serde::{Deserialize, Serialize};

// ─── Types ───────────────────────────────────────────────────────────────────

/// An online player, as seen by plugins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRef {
    pub name: String,
    pub uuid: String,
}

/// Projectile families that can carry a shooter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    Arrow,
    ThrownPotion,
    Trident,
    Snowball,
    Other,
}

/// Whatever launched a projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shooter {
    Player(PlayerRef),
    Mob(MobType),
    Dispenser,
}

/// What an entity is, resolved once when the host builds the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player(PlayerRef),
    Mob(MobType),
    Projectile {
        projectile: ProjectileKind,
        shooter: Option<Shooter>,
    },
    Item(Material),
    Other,
}

impl EntityKind {
    /// The player behind this entity: itself, or the shooter of a projectile.
    pub fn responsible_player(&self) -> Option<&PlayerRef> {
        match self {
            EntityKind::Player(player) => Some(player),
            EntityKind::Projectile {
                shooter: Some(Shooter::Player(player)),
                ..
            } => Some(player),
            _ => None,
        }
    }

    pub fn mob(&self) -> Option<MobType> {
        match self {
            EntityKind::Mob(mob) => Some(*mob),
            _ => None,
        }
    }

    pub fn is_hostile_mob(&self) -> bool {
        self.mob().is_some_and(MobType::is_hostile)
    }

    pub fn is_passive_mob(&self) -> bool {
        self.mob().is_some_and(MobType::is_passive)
    }
}

/// Why a creature is spawning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnReason {
    Natural,
    Spawner,
    SpawnerEgg,
    NetherPortal,
    Breeding,
    Custom,
    Other,
}

/// A creature about to enter the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnedMob {
    pub runtime_id: u64,
    pub mob: MobType,
    pub location: Location,
}

/// An entity returned by a proximity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyEntity {
    pub runtime_id: u64,
    pub kind: EntityKind,
    pub location: Location,
}

/// Server-wide flags set by the host, read-only to plugins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerStatus {
    /// Set by the load monitor when monster grinders should be throttled.
    pub grinders_stopped: bool,
}

/// Result of dispatching an event to a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue normal handling.
    Continue,
    /// Event was cancelled by this plugin.
    Cancelled,
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// World events plugins can react to. All of them are cancellable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PluginEvent {
    /// An entity (creeper, TNT, ...) exploded. `blocks` is the set of blocks
    /// the explosion will destroy; plugins may shrink it.
    EntityExplode {
        #[serde(default)]
        source: Option<EntityKind>,
        location: Location,
        blocks: Vec<BlockPos>,
    },
    /// A dropped item stack timed out.
    ItemDespawn {
        runtime_id: u64,
        item: Material,
        location: Location,
    },
    /// One entity damaged another.
    EntityDamageByEntity {
        damager: EntityKind,
        victim_runtime_id: u64,
        damage: f32,
    },
    /// A creature is about to spawn.
    CreatureSpawn {
        entity: SpawnedMob,
        reason: SpawnReason,
    },
}

impl PluginEvent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            PluginEvent::EntityExplode { .. } => "entity_explode",
            PluginEvent::ItemDespawn { .. } => "item_despawn",
            PluginEvent::EntityDamageByEntity { .. } => "entity_damage_by_entity",
            PluginEvent::CreatureSpawn { .. } => "creature_spawn",
        }
    }
}

// ─── Plugin trait ────────────────────────────────────────────────────────────

/// Metadata about a plugin.
#[derive(Debug, Clone)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
}

/// A world-rules plugin.
pub trait Plugin: Send {
    /// Return plugin metadata.
    fn info(&self) -> PluginInfo;

    /// Called when the plugin is loaded.
    fn on_enable(&mut self, api: &mut dyn ServerApi);

    /// Called when the plugin is unloaded.
    fn on_disable(&mut self) {}

    /// Called for every dispatched event. Return `Cancelled` to make the host
    /// skip the event's default action.
    fn on_event(
        &mut self,
        event: &mut PluginEvent,
        status: &ServerStatus,
        api: &mut dyn ServerApi,
    ) -> EventResult {
        let _ = (event, status, api);
        EventResult::Continue
    }

    /// Return a default config as JSON. If `Some`, the plugin gets a config file.
    fn default_config(&self) -> Option<serde_json::Value> {
        None
    }

    /// Called with the loaded config (from `plugins/<name>/config.json`).
    fn load_config(&mut self, _config: serde_json::Value) {}
}

// ─── Server API ──────────────────────────────────────────────────────────────

/// Host services available to plugins during callbacks.
///
/// Read methods answer immediately. Write methods may be deferred by the host
/// until the callback returns, so a plugin must not expect to read back its
/// own writes within one event.
pub trait ServerApi {
    // --- Regions ---
    /// Region containing `location`, or `None` outside the managed world.
    fn resolve_region(&self, location: &Location) -> Option<RegionCoords>;
    /// Region post location. Its y is not terrain-corrected.
    fn region_center(&self, region: RegionCoords) -> Location;
    /// The newest region, where growth features apply.
    fn open_region(&self) -> RegionCoords;
    fn managed_world(&self) -> Option<WorldId>;

    // --- World ---
    fn dimension(&self, world: WorldId) -> Dimension;
    fn block_at(&self, world: WorldId, pos: BlockPos) -> Material;
    fn highest_solid_y(&self, world: WorldId, x: i32, z: i32) -> i32;
    fn set_block(&mut self, world: WorldId, pos: BlockPos, material: Material);

    // --- Entities ---
    /// Entities inside the box `center ± half_extents`, minus `exclude`.
    fn nearby_entities(
        &self,
        center: &Location,
        half_extents: (f64, f64, f64),
        exclude: Option<u64>,
    ) -> Vec<NearbyEntity>;
    fn spawn_mob(&mut self, mob: MobType, location: &Location);

    // --- Players ---
    fn reset_idle_timer(&mut self, player: &PlayerRef);
}

// ─── Tests ───────────────────────────────────────────────────────────────────
