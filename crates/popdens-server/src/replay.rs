//! Event replay: feeds recorded world events through the plugins.
//!
//! Input is one JSON `PluginEvent` per line. Blank lines and lines starting
//! with `#` are skipped. Lines starting with `/` are console directives:
//!
//! - `/grinders stop` | `/grinders start` toggles the load monitor flag
//! - `/open <x> <z>` moves the open region
//! - `/tick [n]` advances the clock (default one tick)
//!
//! Every event advances the clock by one tick.

use std::fmt;

use popdens_plugin_api::{EntityKind, EventResult, PluginEvent, ServerStatus};
use popdens_world::{Material, RegionCoords, WorldId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::host::HostState;
use crate::plugin_manager::PluginManager;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub cancelled: usize,
    /// Events naming a world the host does not have.
    pub skipped: usize,
    pub directives: usize,
    pub actions_applied: usize,
    pub blocks_destroyed: usize,
    pub creatures_spawned: usize,
    /// Spawns dropped because their runtime id was already in use.
    pub duplicate_ids: usize,
}

impl fmt::Display for ReplayStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events ({} cancelled, {} skipped), {} directives, {} plugin actions, \
             {} blocks destroyed, {} creatures spawned ({} duplicate ids)",
            self.events,
            self.cancelled,
            self.skipped,
            self.directives,
            self.actions_applied,
            self.blocks_destroyed,
            self.creatures_spawned,
            self.duplicate_ids
        )
    }
}

/// The world a replayed event happens in, if it names one.
fn event_world(event: &PluginEvent) -> Option<WorldId> {
    match event {
        PluginEvent::EntityExplode { location, .. } => Some(location.world),
        PluginEvent::ItemDespawn { location, .. } => Some(location.world),
        PluginEvent::CreatureSpawn { entity, .. } => Some(entity.location.world),
        PluginEvent::EntityDamageByEntity { .. } => None,
    }
}

pub struct Replayer {
    host: HostState,
    manager: PluginManager,
    status: ServerStatus,
    stats: ReplayStats,
}

impl Replayer {
    pub fn new(host: HostState, manager: PluginManager, status: ServerStatus) -> Self {
        Self {
            host,
            manager,
            status,
            stats: ReplayStats::default(),
        }
    }

    pub fn host(&self) -> &HostState {
        &self.host
    }

    pub fn status(&self) -> ServerStatus {
        self.status
    }

    pub fn stats(&self) -> &ReplayStats {
        &self.stats
    }

    /// Enable plugins and apply whatever they write on startup.
    pub fn enable_plugins(&mut self) {
        let actions = self.manager.enable_all(&self.host);
        self.stats.actions_applied += self.host.apply_actions(actions);
    }

    /// Disable plugins and hand back the final state.
    pub fn finish(mut self) -> (HostState, ReplayStats) {
        self.manager.disable_all();
        (self.host, self.stats)
    }

    /// Process one input line. `line_no` is 1-based and only used in errors.
    pub fn handle_line(&mut self, line_no: usize, line: &str) -> Result<(), ServerError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }
        if let Some(directive) = line.strip_prefix('/') {
            return self.directive(line_no, directive);
        }
        let event: PluginEvent = serde_json::from_str(line)
            .map_err(|source| ServerError::MalformedEvent { line: line_no, source })?;
        self.replay_event(event);
        Ok(())
    }

    fn directive(&mut self, line_no: usize, directive: &str) -> Result<(), ServerError> {
        let unknown = || ServerError::UnknownDirective {
            line: line_no,
            directive: format!("/{directive}"),
        };
        let args: Vec<&str> = directive.split_whitespace().collect();
        match args.as_slice() {
            ["grinders", "stop"] => self.set_grinders_stopped(true),
            ["grinders", "start"] => self.set_grinders_stopped(false),
            ["open", x, z] => {
                let x = x.parse().map_err(|_| unknown())?;
                let z = z.parse().map_err(|_| unknown())?;
                self.host.set_open_region(RegionCoords::new(x, z));
            }
            ["tick"] => self.host.advance_tick(),
            ["tick", n] => {
                let n: u64 = n.parse().map_err(|_| unknown())?;
                self.host.advance_ticks(n);
            }
            _ => return Err(unknown()),
        }
        self.stats.directives += 1;
        Ok(())
    }

    fn set_grinders_stopped(&mut self, stopped: bool) {
        if self.status.grinders_stopped != stopped {
            info!("Grinders {}", if stopped { "stopped" } else { "resumed" });
        }
        self.status.grinders_stopped = stopped;
    }

    /// Dispatch an event, then run its default action unless cancelled.
    pub fn replay_event(&mut self, mut event: PluginEvent) {
        if let Some(world) = event_world(&event) {
            if !self.host.has_world(world) {
                warn!("Skipping {}: no world {:?}", event.name(), world);
                self.stats.skipped += 1;
                return;
            }
        }

        self.host.advance_tick();
        self.stats.events += 1;
        let (result, actions) = self.manager.dispatch(&mut event, &self.status, &self.host);

        if result == EventResult::Cancelled {
            self.stats.cancelled += 1;
        } else {
            self.default_action(&event);
        }
        self.stats.actions_applied += self.host.apply_actions(actions);
    }

    fn default_action(&mut self, event: &PluginEvent) {
        match event {
            PluginEvent::CreatureSpawn { entity, .. } => {
                if self.host.insert_entity(
                    entity.runtime_id,
                    EntityKind::Mob(entity.mob),
                    entity.location,
                ) {
                    self.stats.creatures_spawned += 1;
                } else {
                    warn!(
                        "Dropping {} spawn: runtime id {} is already in use",
                        entity.mob, entity.runtime_id
                    );
                    self.stats.duplicate_ids += 1;
                }
            }
            PluginEvent::EntityExplode {
                location, blocks, ..
            } => {
                let mut destroyed = 0;
                for pos in blocks {
                    if self.host.block_at(location.world, *pos) != Material::Air
                        && self.host.set_block(location.world, *pos, Material::Air)
                    {
                        destroyed += 1;
                    }
                }
                debug!("Explosion destroyed {} blocks", destroyed);
                self.stats.blocks_destroyed += destroyed;
            }
            PluginEvent::ItemDespawn { runtime_id, .. } => {
                self.host.remove_entity(*runtime_id);
            }
            PluginEvent::EntityDamageByEntity { .. } => {}
        }
    }
}

/// Replay every line from `reader`, stopping at the first bad line.
pub async fn run<R>(replayer: &mut Replayer, reader: R) -> Result<(), ServerError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        replayer.handle_line(line_no, &line)?;
    }
    Ok(())
}
