//! Plugin manager: loads, enables, and dispatches events to plugins.

use std::path::{Path, PathBuf};

use popdens_plugin_api::{
    EventResult, NearbyEntity, PlayerRef, Plugin, PluginEvent, ServerApi, ServerStatus,
};
use popdens_world::{BlockPos, Dimension, Location, Material, MobType, RegionCoords, WorldId};
use tracing::{debug, info, warn};

use crate::host::HostState;

// ─── Types ───────────────────────────────────────────────────────────────────

/// Deferred side-effect requested by a plugin during a callback.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    SetBlock {
        world: WorldId,
        pos: BlockPos,
        material: Material,
    },
    SpawnMob {
        mob: MobType,
        location: Location,
    },
    ResetIdleTimer {
        player: PlayerRef,
    },
}

// ─── ServerApiImpl ───────────────────────────────────────────────────────────

/// Implements `ServerApi` by reading host state directly and accumulating
/// PendingActions for writes.
struct ServerApiImpl<'a> {
    host: &'a HostState,
    actions: Vec<PendingAction>,
}

impl<'a> ServerApiImpl<'a> {
    fn new(host: &'a HostState) -> Self {
        Self {
            host,
            actions: Vec::new(),
        }
    }

    fn take_actions(self) -> Vec<PendingAction> {
        self.actions
    }
}

impl ServerApi for ServerApiImpl<'_> {
    fn resolve_region(&self, location: &Location) -> Option<RegionCoords> {
        self.host.resolve_region(location)
    }

    fn region_center(&self, region: RegionCoords) -> Location {
        self.host.region_center(region)
    }

    fn open_region(&self) -> RegionCoords {
        self.host.open_region()
    }

    fn managed_world(&self) -> Option<WorldId> {
        self.host.managed_world()
    }

    fn dimension(&self, world: WorldId) -> Dimension {
        self.host.dimension(world)
    }

    fn block_at(&self, world: WorldId, pos: BlockPos) -> Material {
        self.host.block_at(world, pos)
    }

    fn highest_solid_y(&self, world: WorldId, x: i32, z: i32) -> i32 {
        self.host.highest_solid_y(world, x, z)
    }

    fn set_block(&mut self, world: WorldId, pos: BlockPos, material: Material) {
        self.actions.push(PendingAction::SetBlock {
            world,
            pos,
            material,
        });
    }

    fn nearby_entities(
        &self,
        center: &Location,
        half_extents: (f64, f64, f64),
        exclude: Option<u64>,
    ) -> Vec<NearbyEntity> {
        self.host.nearby_entities(center, half_extents, exclude)
    }

    fn spawn_mob(&mut self, mob: MobType, location: &Location) {
        self.actions.push(PendingAction::SpawnMob {
            mob,
            location: *location,
        });
    }

    fn reset_idle_timer(&mut self, player: &PlayerRef) {
        self.actions.push(PendingAction::ResetIdleTimer {
            player: player.clone(),
        });
    }
}

// ─── PluginManager ───────────────────────────────────────────────────────────

/// Manages all loaded plugins.
pub struct PluginManager {
    plugins: Vec<Box<dyn Plugin>>,
    plugin_dir: PathBuf,
}

impl PluginManager {
    pub fn new(plugin_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugins: Vec::new(),
            plugin_dir: plugin_dir.into(),
        }
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Register a plugin (not yet enabled).
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        info!("Registered plugin: {}", plugin.info().name);
        self.plugins.push(plugin);
    }

    /// Enable all registered plugins. Returns the writes they requested.
    pub fn enable_all(&mut self, host: &HostState) -> Vec<PendingAction> {
        let mut all_actions = Vec::new();
        for plugin in &mut self.plugins {
            let mut api = ServerApiImpl::new(host);
            plugin.on_enable(&mut api);
            all_actions.extend(api.take_actions());
        }
        all_actions
    }

    /// Disable all registered plugins.
    pub fn disable_all(&mut self) {
        for plugin in &mut self.plugins {
            plugin.on_disable();
        }
    }

    /// Dispatch an event to all plugins. Returns the combined result and pending actions.
    ///
    /// Plugins see the event as modified by earlier plugins. Dispatch stops at
    /// the first cancellation.
    pub fn dispatch(
        &mut self,
        event: &mut PluginEvent,
        status: &ServerStatus,
        host: &HostState,
    ) -> (EventResult, Vec<PendingAction>) {
        let mut all_actions = Vec::new();
        let mut final_result = EventResult::Continue;

        for plugin in &mut self.plugins {
            let mut api = ServerApiImpl::new(host);
            let result = plugin.on_event(event, status, &mut api);
            all_actions.extend(api.take_actions());

            if result == EventResult::Cancelled {
                debug!("{} cancelled by {}", event.name(), plugin.info().name);
                final_result = EventResult::Cancelled;
                break; // Stop propagation
            }
        }

        (final_result, all_actions)
    }

    fn config_path(&self, plugin_name: &str) -> PathBuf {
        self.plugin_dir.join(plugin_name).join("config.json")
    }

    /// Load each plugin's config file, writing the default when missing.
    pub fn load_configs(&mut self) {
        for i in 0..self.plugins.len() {
            let info = self.plugins[i].info();
            let Some(default_config) = self.plugins[i].default_config() else {
                continue;
            };
            let config_path = self.config_path(&info.name);
            let config = read_or_create_config(&config_path, &info.name, default_config);
            self.plugins[i].load_config(config);
        }
    }
}

fn read_or_create_config(
    config_path: &Path,
    plugin_name: &str,
    default_config: serde_json::Value,
) -> serde_json::Value {
    if config_path.exists() {
        return match std::fs::read_to_string(config_path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Failed to parse config for {plugin_name}: {e}");
                    default_config
                }
            },
            Err(e) => {
                warn!("Failed to read config for {plugin_name}: {e}");
                default_config
            }
        };
    }

    // Write default config
    if let Some(dir) = config_path.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!("Failed to create {}: {e}", dir.display());
        }
    }
    match serde_json::to_string_pretty(&default_config) {
        Ok(json) => {
            if let Err(e) = std::fs::write(config_path, json) {
                warn!("Failed to write default config for {plugin_name}: {e}");
            }
        }
        Err(e) => warn!("Failed to serialize default config for {plugin_name}: {e}"),
    }
    default_config
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::test_config;
    use popdens_plugin_api::{EntityKind, PluginInfo, SpawnReason, SpawnedMob};
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Arc;

    fn host() -> HostState {
        HostState::from_config(&test_config()).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("popdens-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    /// Cancels every creature spawn and counts how many events it saw.
    struct Blocker {
        seen: Arc<AtomicUsize>,
    }

    impl Plugin for Blocker {
        fn info(&self) -> PluginInfo {
            PluginInfo {
                name: "Blocker".into(),
                version: "0.1.0".into(),
                description: "Test".into(),
                author: "Test".into(),
            }
        }

        fn on_enable(&mut self, api: &mut dyn ServerApi) {
            api.set_block(WorldId(0), BlockPos::new(0, 10, 0), Material::Stone);
        }

        fn on_event(
            &mut self,
            event: &mut PluginEvent,
            _status: &ServerStatus,
            api: &mut dyn ServerApi,
        ) -> EventResult {
            self.seen.fetch_add(1, Ordering::SeqCst);
            match event {
                PluginEvent::CreatureSpawn { entity, .. } => {
                    api.spawn_mob(MobType::Pig, &entity.location);
                    EventResult::Cancelled
                }
                _ => EventResult::Continue,
            }
        }
    }

    /// Counts events and exposes its loaded config.
    struct Recorder {
        seen: Arc<AtomicUsize>,
        threshold: Arc<AtomicU64>,
    }

    impl Plugin for Recorder {
        fn info(&self) -> PluginInfo {
            PluginInfo {
                name: "Recorder".into(),
                version: "0.1.0".into(),
                description: "Test".into(),
                author: "Test".into(),
            }
        }

        fn on_enable(&mut self, _api: &mut dyn ServerApi) {}

        fn on_event(
            &mut self,
            _event: &mut PluginEvent,
            _status: &ServerStatus,
            _api: &mut dyn ServerApi,
        ) -> EventResult {
            self.seen.fetch_add(1, Ordering::SeqCst);
            EventResult::Continue
        }

        fn default_config(&self) -> Option<serde_json::Value> {
            Some(serde_json::json!({ "threshold": 5 }))
        }

        fn load_config(&mut self, config: serde_json::Value) {
            if let Some(t) = config["threshold"].as_u64() {
                self.threshold.store(t, Ordering::SeqCst);
            }
        }
    }

    fn spawn_event() -> PluginEvent {
        PluginEvent::CreatureSpawn {
            entity: SpawnedMob {
                runtime_id: 3,
                mob: MobType::Zombie,
                location: Location::new(WorldId(0), 1.5, 4.0, 1.5),
            },
            reason: SpawnReason::Natural,
        }
    }

    #[test]
    fn enable_all_collects_writes() {
        let mut mgr = PluginManager::new(scratch_dir("enable"));
        mgr.register(Box::new(Blocker {
            seen: Arc::default(),
        }));
        let actions = mgr.enable_all(&host());
        assert_eq!(
            actions,
            vec![PendingAction::SetBlock {
                world: WorldId(0),
                pos: BlockPos::new(0, 10, 0),
                material: Material::Stone,
            }]
        );
    }

    #[test]
    fn dispatch_stops_after_cancel() {
        let blocker_seen = Arc::new(AtomicUsize::new(0));
        let recorder_seen = Arc::new(AtomicUsize::new(0));
        let mut mgr = PluginManager::new(scratch_dir("cancel"));
        mgr.register(Box::new(Blocker {
            seen: blocker_seen.clone(),
        }));
        mgr.register(Box::new(Recorder {
            seen: recorder_seen.clone(),
            threshold: Arc::default(),
        }));
        let host = host();

        let mut event = spawn_event();
        let (result, actions) = mgr.dispatch(&mut event, &ServerStatus::default(), &host);
        assert_eq!(result, EventResult::Cancelled);
        // Writes made before cancelling are still returned.
        assert_eq!(actions.len(), 1);
        assert_eq!(recorder_seen.load(Ordering::SeqCst), 0);

        let mut damage = PluginEvent::EntityDamageByEntity {
            damager: EntityKind::Other,
            victim_runtime_id: 3,
            damage: 1.0,
        };
        let (result, actions) = mgr.dispatch(&mut damage, &ServerStatus::default(), &host);
        assert_eq!(result, EventResult::Continue);
        assert!(actions.is_empty());
        assert_eq!(blocker_seen.load(Ordering::SeqCst), 2);
        assert_eq!(recorder_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn api_reads_see_host_not_pending_writes() {
        let mut host = host();
        host.spawn_entity(
            EntityKind::Mob(MobType::Cow),
            Location::new(WorldId(0), 2.0, 4.0, 2.0),
        );
        let mut api = ServerApiImpl::new(&host);
        api.set_block(WorldId(0), BlockPos::new(0, 3, 0), Material::Stone);
        assert_eq!(api.block_at(WorldId(0), BlockPos::new(0, 3, 0)), Material::GrassBlock);
        assert_eq!(api.highest_solid_y(WorldId(0), 0, 0), 3);
        assert_eq!(api.managed_world(), Some(WorldId(0)));
        let center = Location::new(WorldId(0), 0.0, 4.0, 0.0);
        assert_eq!(api.nearby_entities(&center, (5.0, 5.0, 5.0), None).len(), 1);
        assert_eq!(api.take_actions().len(), 1);
    }

    #[test]
    fn load_configs_writes_default_then_reads_back() {
        let dir = scratch_dir("configs");
        let threshold = Arc::new(AtomicU64::new(0));
        let mut mgr = PluginManager::new(&dir);
        mgr.register(Box::new(Recorder {
            seen: Arc::default(),
            threshold: threshold.clone(),
        }));

        mgr.load_configs();
        let path = dir.join("Recorder").join("config.json");
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["threshold"], 5);
        assert_eq!(threshold.load(Ordering::SeqCst), 5);

        std::fs::write(&path, r#"{ "threshold": 9 }"#).unwrap();
        mgr.load_configs();
        assert_eq!(threshold.load(Ordering::SeqCst), 9);

        // Unparseable files fall back to the default.
        std::fs::write(&path, "not json").unwrap();
        mgr.load_configs();
        assert_eq!(threshold.load(Ordering::SeqCst), 5);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
