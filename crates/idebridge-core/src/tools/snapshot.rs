//! Remote tool snapshots and merging

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::Deserialize;
use tokio::time::Instant;

use crate::types::ToolDescriptor;

/// Accepted shapes of the IDE's tool listing
///
/// Either a bare array or an object wrapping the array under `tools`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ToolListPayload {
    Bare(Vec<ToolDescriptor>),
    Wrapped { tools: Vec<ToolDescriptor> },
}

impl ToolListPayload {
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    pub fn into_tools(self) -> Vec<ToolDescriptor> {
        match self {
            ToolListPayload::Bare(tools) => tools,
            ToolListPayload::Wrapped { tools } => tools,
        }
    }
}

/// Immutable, timestamped view of remotely discovered tools
#[derive(Debug, Clone)]
pub struct ToolRegistrySnapshot {
    entries: BTreeMap<String, ToolDescriptor>,
    fetched_at: Instant,
}

impl ToolRegistrySnapshot {
    /// Build a snapshot; on duplicate names the later descriptor wins
    pub fn new(tools: Vec<ToolDescriptor>, fetched_at: Instant) -> Self {
        let entries = tools.into_iter().map(|t| (t.name.clone(), t)).collect();
        Self { entries, fetched_at }
    }

    pub fn entries(&self) -> &BTreeMap<String, ToolDescriptor> {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fetched_at(&self) -> Instant {
        self.fetched_at
    }

    /// `now - fetched_at < ttl`
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// Merge the static set with a remote snapshot.
///
/// Static tools keep their position and are never dropped; a remote tool
/// with the same name replaces the static one when its content differs.
/// Remote-only tools follow, ordered by name.
pub fn merge_tools(static_tools: &[ToolDescriptor], remote: &ToolRegistrySnapshot) -> Vec<ToolDescriptor> {
    let mut merged: Vec<ToolDescriptor> = Vec::with_capacity(static_tools.len() + remote.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for tool in static_tools {
        let chosen = match remote.get(&tool.name) {
            Some(remote_tool) if remote_tool != tool => remote_tool,
            _ => tool,
        };
        match positions.get(tool.name.as_str()) {
            Some(&index) => merged[index] = chosen.clone(),
            None => {
                positions.insert(tool.name.as_str(), merged.len());
                merged.push(chosen.clone());
            }
        }
    }

    for (name, tool) in remote.entries() {
        if !positions.contains_key(name.as_str()) {
            merged.push(tool.clone());
        }
    }

    merged
}
