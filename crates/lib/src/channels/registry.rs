//! Channel registry: the host builds it from configuration and hands it to the gateway.

use crate::channels::channel::ChannelConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Channels by uuid. Built once at startup; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    inner: Arc<HashMap<String, Arc<ChannelConfig>>>,
}

impl ChannelRegistry {
    pub fn new(channels: impl IntoIterator<Item = ChannelConfig>) -> Self {
        let mut map = HashMap::new();
        for channel in channels {
            let id = channel.uuid().to_string();
            if map.insert(id.clone(), Arc::new(channel)).is_some() {
                log::warn!("duplicate channel uuid {}, keeping the last entry", id);
            }
        }
        Self {
            inner: Arc::new(map),
        }
    }

    pub fn get(&self, uuid: &str) -> Option<Arc<ChannelConfig>> {
        self.inner.get(uuid).cloned()
    }

    pub fn ids(&self) -> Vec<String> {
        self.inner.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
