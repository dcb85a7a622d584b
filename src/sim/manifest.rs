//! 乘客清单（JSON）
//!
//! 保存配置和全部乘客，两种调度读同一份清单，保证输入完全一致。
//! 字段名沿用乘客总览文件：`start_floor`、`target_floor`，另加 `arrival_tick`。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::config::SimConfig;
use super::tick::Tick;
use crate::error::{Result, SimError};
use crate::lift::Request;

pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Passenger manifest: the configuration plus every generated passenger.
///
/// Written once and replayed so that both dispatchers see identical input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimManifest {
    pub schema_version: u32,
    #[serde(default)]
    pub meta: Option<ManifestMeta>,
    pub config: SimConfig,
    #[serde(default)]
    pub passengers: Vec<PassengerSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestMeta {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerSpec {
    pub id: u64,
    pub start_floor: usize,
    pub target_floor: usize,
    #[serde(default)]
    pub arrival_tick: u64,
}

impl PassengerSpec {
    pub fn to_request(&self) -> Request {
        Request::new(
            self.id,
            self.start_floor,
            self.target_floor,
            Tick(self.arrival_tick),
        )
    }
}

impl SimManifest {
    pub fn new(config: SimConfig, passengers: Vec<PassengerSpec>) -> Self {
        Self {
            schema_version: MANIFEST_SCHEMA_VERSION,
            meta: None,
            config,
            passengers,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let manifest: SimManifest = serde_json::from_str(&raw)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Checks the config and every passenger against it.
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != MANIFEST_SCHEMA_VERSION {
            return Err(SimError::InvalidConfig(format!(
                "unsupported manifest schema_version {}",
                self.schema_version
            )));
        }
        self.config.validate()?;
        for p in &self.passengers {
            p.to_request().validate(self.config.floors)?;
        }
        Ok(())
    }

    pub fn requests(&self) -> Vec<Request> {
        self.passengers.iter().map(PassengerSpec::to_request).collect()
    }

    pub fn last_arrival(&self) -> u64 {
        self.passengers
            .iter()
            .map(|p| p.arrival_tick)
            .max()
            .unwrap_or(0)
    }
}
