//! 随机乘客生成
//!
//! 内核只消费生成结果；固定种子保证同一份输入可以反复对比两种调度。

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::SimConfig;
use super::manifest::{ManifestMeta, PassengerSpec, SimManifest};
use crate::error::{Result, SimError};

#[derive(Debug)]
pub struct PassengerGenerator {
    floors: usize,
    arrival_window: u64,
    rng: StdRng,
    next_id: u64,
}

impl PassengerGenerator {
    /// `arrival_window` 为 0 时所有乘客在 tick 0 同时到达；少于两层时无法生成互不相同的起止楼层
    pub fn new(floors: usize, seed: u64, arrival_window: u64) -> Result<Self> {
        if floors < 2 {
            return Err(SimError::InvalidConfig(format!(
                "floors must be at least 2, got {floors}"
            )));
        }
        Ok(Self {
            floors,
            arrival_window,
            rng: StdRng::seed_from_u64(seed),
            next_id: 0,
        })
    }

    /// 起始楼层与目标楼层均匀随机且互不相同
    pub fn next_passenger(&mut self) -> PassengerSpec {
        let start_floor = self.rng.gen_range(0..self.floors);
        let mut target_floor = self.rng.gen_range(0..self.floors - 1);
        if target_floor >= start_floor {
            target_floor += 1;
        }
        let arrival_tick = if self.arrival_window == 0 {
            0
        } else {
            self.rng.gen_range(0..self.arrival_window)
        };
        let id = self.next_id;
        self.next_id += 1;
        PassengerSpec {
            id,
            start_floor,
            target_floor,
            arrival_tick,
        }
    }

    /// 生成 `count` 位乘客，按到达时间排序
    pub fn generate(&mut self, count: usize) -> Vec<PassengerSpec> {
        let mut people: Vec<PassengerSpec> = (0..count).map(|_| self.next_passenger()).collect();
        people.sort_by_key(|p| (p.arrival_tick, p.id));
        people
    }
}

impl SimManifest {
    /// 按配置的人数生成一份完整清单
    pub fn generate(config: SimConfig, seed: u64, arrival_window: u64) -> Result<Self> {
        config.validate()?;
        let mut generator = PassengerGenerator::new(config.floors, seed, arrival_window)?;
        let passengers = generator.generate(config.population);
        let mut manifest = SimManifest::new(config, passengers);
        manifest.meta = Some(ManifestMeta {
            seed: Some(seed),
            source: Some("generator".to_string()),
        });
        Ok(manifest)
    }
}
