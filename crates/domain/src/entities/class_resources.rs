use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rules::{resources_for_level, CharacterClass, ClassResource, ResourceRecovery};

/// Class resources keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassResourcesState {
    #[serde(default)]
    pub resources: BTreeMap<String, ClassResource>,
}

impl ClassResourcesState {
    pub fn for_level(class: CharacterClass, level: u8) -> Self {
        Self {
            resources: resources_for_level(class, level)
                .into_iter()
                .map(|r| (r.id.clone(), r))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ClassResource> {
        self.resources.get(id)
    }

    /// Spend one use.
    pub fn use_resource(&mut self, id: &str) -> bool {
        self.use_amount(id, 1)
    }

    /// Spend `amount` uses at once; fails if fewer remain or `amount` is 0.
    pub fn use_amount(&mut self, id: &str, amount: u32) -> bool {
        match self.resources.get_mut(id) {
            Some(resource) if amount > 0 && resource.current >= amount => {
                resource.current -= amount;
                true
            }
            _ => false,
        }
    }

    pub fn restore(&mut self, id: &str) {
        if let Some(resource) = self.resources.get_mut(id) {
            resource.current = resource.max;
        }
    }

    pub fn restore_all(&mut self) {
        for resource in self.resources.values_mut() {
            resource.current = resource.max;
        }
    }

    /// Refill everything that recovers on a short rest.
    pub fn restore_short_rest(&mut self) {
        for resource in self.resources.values_mut() {
            if resource.recovery == ResourceRecovery::ShortRest {
                resource.current = resource.max;
            }
        }
    }

    /// Rebuild for a new level. Each resource keeps its current value plus
    /// whatever its maximum grew by.
    pub fn rebuild_for_level(&mut self, class: CharacterClass, level: u8) {
        let mut fresh = Self::for_level(class, level);
        for (id, resource) in fresh.resources.iter_mut() {
            if let Some(old) = self.resources.get(id) {
                let gained = resource.max.saturating_sub(old.max);
                resource.current = (old.current + gained).min(resource.max);
            }
        }
        *self = fresh;
    }
}
