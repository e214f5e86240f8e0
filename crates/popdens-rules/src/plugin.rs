//! The world-rules plugin: routes host events to the rule handlers.

use popdens_plugin_api::{EventResult, Plugin, PluginEvent, PluginInfo, ServerApi, ServerStatus};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{info, warn};

use crate::companion::CompanionSpawner;
use crate::config::RulesConfig;
use crate::error::RulesError;
use crate::explosion::protect_region_post;
use crate::idle::reset_attacker_idle_timer;
use crate::spawn_ground::SpawnGroundTable;
use crate::spawn_governor::SpawnGovernor;
use crate::vegetation::replant_sapling;

pub const PLUGIN_NAME: &str = "PopulationDensity";

pub struct PopulationDensityPlugin<R = StdRng> {
    config: RulesConfig,
    governor: SpawnGovernor<R>,
}

impl PopulationDensityPlugin<StdRng> {
    /// Plugin with default config and the vanilla ground table.
    pub fn new() -> Self {
        Self {
            config: RulesConfig::default(),
            governor: SpawnGovernor::new(SpawnGroundTable::vanilla()),
        }
    }

    pub fn with_config(config: RulesConfig) -> Result<Self, RulesError> {
        Self::with_companions(config, CompanionSpawner::new())
    }
}

impl Default for PopulationDensityPlugin<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> PopulationDensityPlugin<R> {
    pub fn with_companions(
        config: RulesConfig,
        companions: CompanionSpawner<R>,
    ) -> Result<Self, RulesError> {
        let ground = SpawnGroundTable::from_config(config.spawn_ground.as_ref())?;
        Ok(Self {
            config,
            governor: SpawnGovernor::with_companions(ground, companions),
        })
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn governor(&self) -> &SpawnGovernor<R> {
        &self.governor
    }

    fn apply_config(&mut self, config: RulesConfig) -> Result<(), RulesError> {
        if config.spawn_ground != self.config.spawn_ground {
            let ground = SpawnGroundTable::from_config(config.spawn_ground.as_ref())?;
            self.governor.set_ground(ground);
        }
        self.config = config;
        Ok(())
    }
}

impl<R: Rng + Send> Plugin for PopulationDensityPlugin<R> {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: PLUGIN_NAME.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: "Region-post protection, regrowth, and spawn throttling".into(),
            author: "popdens".into(),
        }
    }

    fn on_enable(&mut self, _api: &mut dyn ServerApi) {
        let c = &self.config;
        info!(
            "{PLUGIN_NAME} enabled: regrow_trees={}, regrow_grass={}, respawn_animals={}, \
             nearby_monster_spawn_limit={}, custom_spawn_ground={}",
            c.regrow_trees,
            c.regrow_grass,
            c.respawn_animals,
            c.nearby_monster_spawn_limit,
            c.spawn_ground.is_some()
        );
    }

    fn on_disable(&mut self) {
        info!("{PLUGIN_NAME} disabled");
    }

    fn on_event(
        &mut self,
        event: &mut PluginEvent,
        status: &ServerStatus,
        api: &mut dyn ServerApi,
    ) -> EventResult {
        match event {
            PluginEvent::EntityExplode {
                location, blocks, ..
            } => {
                protect_region_post(location, blocks, &*api);
                EventResult::Continue
            }
            PluginEvent::ItemDespawn { item, location, .. } => {
                replant_sapling(*item, location, &self.config, api);
                EventResult::Continue
            }
            PluginEvent::EntityDamageByEntity { damager, .. } => {
                reset_attacker_idle_timer(damager, api);
                EventResult::Continue
            }
            PluginEvent::CreatureSpawn { entity, reason } => {
                self.governor
                    .on_creature_spawn(entity, *reason, status, &self.config, api)
            }
        }
    }

    fn default_config(&self) -> Option<serde_json::Value> {
        Some(RulesConfig::default().to_json())
    }

    fn load_config(&mut self, config: serde_json::Value) {
        let result = RulesConfig::from_json(config).and_then(|c| self.apply_config(c));
        if let Err(e) = result {
            warn!("Keeping previous {PLUGIN_NAME} config: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{on_surface, spawned, MockServer, OVERWORLD, SPAWN_Y};
    use popdens_plugin_api::{EntityKind, PlayerRef, SpawnReason};
    use popdens_world::{BlockPos, Dimension, Location, Material, MobType};
    use rand::SeedableRng;
    use serde_json::json;

    fn plugin() -> PopulationDensityPlugin<StdRng> {
        PopulationDensityPlugin::with_companions(
            RulesConfig::default(),
            CompanionSpawner::with_rng(StdRng::seed_from_u64(11)),
        )
        .unwrap()
    }

    fn spawn_event(mob: MobType, loc: Location, reason: SpawnReason) -> PluginEvent {
        PluginEvent::CreatureSpawn {
            entity: spawned(77, mob, loc),
            reason,
        }
    }

    #[test]
    fn info_and_default_config() {
        let p = PopulationDensityPlugin::new();
        assert_eq!(p.info().name, "PopulationDensity");
        let defaults = p.default_config().unwrap();
        assert_eq!(defaults["regrow_trees"], json!(true));
        assert_eq!(defaults["nearby_monster_spawn_limit"], json!(-1));
        assert!(defaults.get("spawn_ground").is_none());
    }

    #[test]
    fn default_config_roundtrips() {
        let mut p = plugin();
        let defaults = p.default_config().unwrap();
        p.load_config(defaults);
        assert_eq!(p.config(), &RulesConfig::default());
    }

    #[test]
    fn bad_config_keeps_previous() {
        let mut p = plugin();
        p.load_config(json!({ "regrow_trees": false, "nearby_monster_spawn_limit": 4 }));
        assert!(!p.config().regrow_trees);

        p.load_config(json!({ "regrow_trees": "sometimes" }));
        p.load_config(json!({
            "spawn_ground": { "overworld": ["stone"], "nether": [], "end": ["end_stone"] }
        }));
        p.load_config(json!({
            "spawn_ground": { "overworld": ["moon_rock"], "nether": ["netherrack"], "end": ["end_stone"] }
        }));
        assert!(!p.config().regrow_trees);
        assert_eq!(p.config().monster_limit(), Some(4));
        assert!(p.config().spawn_ground.is_none());
    }

    #[test]
    fn ground_override_rebuilds_table() {
        let mut p = plugin();
        assert!(!p.governor().ground().allows(Dimension::Overworld, Material::OakPlanks));
        p.load_config(json!({
            "spawn_ground": {
                "overworld": ["oak_planks"],
                "nether": ["netherrack"],
                "end": ["end_stone"]
            }
        }));
        assert!(p.governor().ground().allows(Dimension::Overworld, Material::OakPlanks));
        assert!(!p.governor().ground().allows(Dimension::Overworld, Material::Stone));

        p.load_config(json!({}));
        assert!(p.governor().ground().allows(Dimension::Overworld, Material::Stone));
    }

    #[test]
    fn with_config_rejects_empty_ground() {
        let config = RulesConfig {
            spawn_ground: Some(crate::config::SpawnGroundConfig {
                overworld: vec![Material::Stone],
                nether: vec![Material::Netherrack],
                end: vec![],
            }),
            ..Default::default()
        };
        assert!(matches!(
            PopulationDensityPlugin::with_config(config),
            Err(RulesError::EmptySpawnGround(Dimension::End))
        ));
    }

    #[test]
    fn explosion_near_post_spares_blocks_and_continues() {
        let mut api = MockServer::flat();
        let mut p = plugin();
        let blocks = vec![BlockPos::new(15, 3, 15), BlockPos::new(16, 3, 16)];
        let mut event = PluginEvent::EntityExplode {
            source: Some(EntityKind::Mob(MobType::Creeper)),
            location: Location::new(OVERWORLD, 18.0, 4.0, 18.0),
            blocks,
        };
        let result = p.on_event(&mut event, &ServerStatus::default(), &mut api);
        assert_eq!(result, EventResult::Continue);
        let PluginEvent::EntityExplode { blocks, .. } = &event else {
            unreachable!()
        };
        assert!(blocks.is_empty());
    }

    #[test]
    fn despawning_sapling_is_replanted() {
        let mut api = MockServer::flat();
        let mut p = plugin();
        let loc = on_surface(OVERWORLD, 3, 3);
        let mut event = PluginEvent::ItemDespawn {
            runtime_id: 5,
            item: Material::SpruceSapling,
            location: loc,
        };
        p.on_event(&mut event, &ServerStatus::default(), &mut api);
        assert_eq!(
            api.block(OVERWORLD, BlockPos::new(3, SPAWN_Y, 3)),
            Material::SpruceSapling
        );
    }

    #[test]
    fn player_damage_resets_idle_timer() {
        let mut api = MockServer::flat();
        let mut p = plugin();
        let alex = PlayerRef {
            name: "Alex".into(),
            uuid: "u-2".into(),
        };
        let mut event = PluginEvent::EntityDamageByEntity {
            damager: EntityKind::Player(alex.clone()),
            victim_runtime_id: 9,
            damage: 3.0,
        };
        let result = p.on_event(&mut event, &ServerStatus::default(), &mut api);
        assert_eq!(result, EventResult::Continue);
        assert_eq!(api.idle_resets, vec![alex]);
    }

    #[test]
    fn creature_spawn_uses_status_flag() {
        let mut api = MockServer::flat();
        let mut p = plugin();
        let loc = on_surface(OVERWORLD, 8, 8);
        let stopped = ServerStatus {
            grinders_stopped: true,
        };

        let mut event = spawn_event(MobType::Zombie, loc, SpawnReason::Spawner);
        assert_eq!(
            p.on_event(&mut event, &stopped, &mut api),
            EventResult::Cancelled
        );
        assert_eq!(
            p.on_event(&mut event, &ServerStatus::default(), &mut api),
            EventResult::Continue
        );
    }

    #[test]
    fn natural_monster_spawn_brings_companion() {
        let mut api = MockServer::flat();
        let mut p = plugin();
        let loc = on_surface(OVERWORLD, 8, 8);
        let mut event = spawn_event(MobType::Skeleton, loc, SpawnReason::Natural);
        p.on_event(&mut event, &ServerStatus::default(), &mut api);
        assert_eq!(api.spawned, vec![(MobType::Pig, loc)]);
    }

    #[test]
    fn density_limit_from_loaded_config() {
        let mut api = MockServer::flat();
        let mut p = plugin();
        p.load_config(json!({ "nearby_monster_spawn_limit": 0 }));
        let loc = on_surface(OVERWORLD, 8, 8);
        api.add_mob(1, MobType::Creeper, on_surface(OVERWORLD, 9, 9));
        let mut event = spawn_event(MobType::Zombie, loc, SpawnReason::Natural);
        assert_eq!(
            p.on_event(&mut event, &ServerStatus::default(), &mut api),
            EventResult::Cancelled
        );
    }
}
