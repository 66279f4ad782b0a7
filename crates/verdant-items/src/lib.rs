//! Item identity: instance ids tag voxels, the registry hands them out.
#![forbid(unsafe_code)]

use std::collections::HashMap;

/// Small integer tagging the feature/material occupying a voxel. 0 is always air.
pub type InstanceId = u16;

/// Reserved "empty/air" id; the registry never assigns it.
pub const AIR: InstanceId = 0;

/// Maps feature sub-type names to sequentially assigned positive instance ids.
///
/// Ids start at 1 and follow registration order, so a given registration
/// sequence is reproducible across runs.
#[derive(Default, Clone, Debug)]
pub struct ItemRegistry {
    by_name: HashMap<String, InstanceId>,
    names: Vec<String>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, returning its id. Re-registering an existing name
    /// returns the id it already holds.
    pub fn register(&mut self, name: &str) -> InstanceId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = (self.names.len() + 1) as InstanceId;
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn id_by_name(&self, name: &str) -> Option<InstanceId> {
        self.by_name.get(name).copied()
    }

    /// Name for a registered id; `None` for air and unknown ids.
    pub fn name_of(&self, id: InstanceId) -> Option<&str> {
        if id == AIR {
            return None;
        }
        self.names.get(id as usize - 1).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
