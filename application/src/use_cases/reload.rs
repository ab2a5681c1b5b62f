//! Config reload manager
//!
//! Owns the active [`AgentSnapshot`]. A reload parses both manifests,
//! validates them, assembles every agent and only then publishes the new
//! snapshot with a single pointer swap. In-flight requests keep the snapshot
//! they loaded at start; a failed reload leaves the previous one in place.

use crate::config::ReloadParams;
use crate::ports::manifest_source::{ConfigLoadError, ManifestSource};
use crate::use_cases::assemble_agents::{Agent, AgentAssembler};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use switchyard_domain::{ManifestError, ToolManifest, validate_agent_definitions};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ReloadError {
    #[error(transparent)]
    Load(#[from] ConfigLoadError),

    #[error("Invalid manifest: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Reload produced no usable agents; keeping the current configuration")]
    NoAgents,
}

/// Result of a debounced reload request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Reloaded { agents: usize, generation: u64 },
    /// Within the cooldown of the previous reload
    Skipped,
}

/// Immutable set of assembled agents, published as a unit.
#[derive(Debug)]
pub struct AgentSnapshot {
    agents: Vec<Arc<Agent>>,
    manifest: Arc<ToolManifest>,
    generation: u64,
    loaded_at: DateTime<Utc>,
}

impl AgentSnapshot {
    pub fn new(agents: Vec<Agent>, manifest: ToolManifest, generation: u64) -> Self {
        Self {
            agents: agents.into_iter().map(Arc::new).collect(),
            manifest: Arc::new(manifest),
            generation,
            loaded_at: Utc::now(),
        }
    }

    /// Placeholder published before the first successful load.
    pub fn empty() -> Self {
        Self {
            agents: Vec::new(),
            manifest: Arc::new(ToolManifest::default()),
            generation: 0,
            loaded_at: Utc::now(),
        }
    }

    pub fn agents(&self) -> &[Arc<Agent>] {
        &self.agents
    }

    pub fn agent(&self, name: &str) -> Option<&Arc<Agent>> {
        self.agents.iter().find(|a| a.name() == name)
    }

    pub fn agent_names(&self) -> HashSet<String> {
        self.agents.iter().map(|a| a.name().to_string()).collect()
    }

    pub fn manifest(&self) -> &ToolManifest {
        &self.manifest
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

struct ReloadState {
    last_attempt: Option<Instant>,
    generation: u64,
}

/// Publishes agent snapshots and serializes reloads.
pub struct ReloadManager {
    current: ArcSwap<AgentSnapshot>,
    state: Mutex<ReloadState>,
    assembler: AgentAssembler,
    cooldown: Duration,
}

impl ReloadManager {
    pub fn new(assembler: AgentAssembler, params: &ReloadParams) -> Self {
        Self {
            current: ArcSwap::from_pointee(AgentSnapshot::empty()),
            state: Mutex::new(ReloadState {
                last_attempt: None,
                generation: 0,
            }),
            assembler,
            cooldown: params.cooldown,
        }
    }

    /// The snapshot a request should hold for its whole lifetime.
    pub fn snapshot(&self) -> Arc<AgentSnapshot> {
        self.current.load_full()
    }

    pub fn assembler(&self) -> &AgentAssembler {
        &self.assembler
    }

    /// Reload from `source`, returning the number of agents published.
    pub async fn reload(&self, source: &dyn ManifestSource) -> Result<usize, ReloadError> {
        let mut state = self.state.lock().await;
        state.last_attempt = Some(Instant::now());
        self.reload_locked(&mut state, source).await
    }

    /// Reload unless the previous reload started less than the cooldown ago.
    pub async fn reload_debounced(
        &self,
        source: &dyn ManifestSource,
    ) -> Result<ReloadOutcome, ReloadError> {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        if let Some(last) = state.last_attempt
            && now.duration_since(last) < self.cooldown
        {
            info!(source = %source.describe(), "Reload skipped (cooldown)");
            return Ok(ReloadOutcome::Skipped);
        }
        state.last_attempt = Some(now);

        let agents = self.reload_locked(&mut state, source).await?;
        Ok(ReloadOutcome::Reloaded {
            agents,
            generation: state.generation,
        })
    }

    async fn reload_locked(
        &self,
        state: &mut ReloadState,
        source: &dyn ManifestSource,
    ) -> Result<usize, ReloadError> {
        let result = self.build_snapshot(state.generation + 1, source).await;
        match result {
            Ok(snapshot) => {
                let count = snapshot.agents.len();
                state.generation = snapshot.generation;
                info!(
                    source = %source.describe(),
                    generation = snapshot.generation,
                    agents = count,
                    tools = snapshot.manifest.len(),
                    "Published agent snapshot"
                );
                self.current.store(Arc::new(snapshot));
                Ok(count)
            }
            Err(e) => {
                warn!(
                    source = %source.describe(),
                    error = %e,
                    generation = state.generation,
                    "Reload failed, keeping current snapshot"
                );
                Err(e)
            }
        }
    }

    async fn build_snapshot(
        &self,
        generation: u64,
        source: &dyn ManifestSource,
    ) -> Result<AgentSnapshot, ReloadError> {
        let documents = source.load().await?;
        let manifest = ToolManifest::new(documents.tools)?;
        validate_agent_definitions(&documents.agents)?;

        let agents = self.assembler.assemble_all(&documents.agents, &manifest);
        if agents.is_empty() {
            return Err(ReloadError::NoAgents);
        }
        Ok(AgentSnapshot::new(agents, manifest, generation))
    }
}
