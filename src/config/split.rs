//! Split configuration resolved from settings

use crate::config::settings::Settings;
use crate::domain::topology::{MonitorId, SplitConfig};
use crate::platform::SplitConfigStore;

/// Split store that serves the splits named in the settings file
///
/// Physical monitor ids are enumeration indices, so `split.monitor = 1`
/// splits the second monitor reported by the OS.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticSplitStore {
    splits: Vec<SplitConfig>,
}

impl StaticSplitStore {
    pub fn from_settings(settings: &Settings) -> Self {
        let splits = settings
            .split
            .iter()
            .map(|section| SplitConfig {
                enabled: section.enabled,
                ratio: section.ratio,
                anchor_monitor_id: MonitorId(section.monitor),
            })
            .collect();
        Self { splits }
    }
}

impl SplitConfigStore for StaticSplitStore {
    fn active_splits(&self) -> Vec<SplitConfig> {
        self.splits.iter().filter(|split| split.enabled).copied().collect()
    }
}
