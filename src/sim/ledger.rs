//! 乘客台账
//!
//! 记录每个已到达请求的生命周期，用于守恒检查、等待时间统计和结束时的乘客总览。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::tick::Tick;
use crate::error::{Result, SimError};
use crate::lift::{Direction, Request, RequestId, RequestStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerRecord {
    pub request: Request,
    pub status: RequestStatus,
    pub boarded_at: Option<Tick>,
    pub delivered_at: Option<Tick>,
}

impl PassengerRecord {
    /// 候梯时长（到达到上车）
    pub fn wait_ticks(&self) -> Option<u64> {
        self.boarded_at.map(|t| t.since(self.request.arrival))
    }

    /// 全程时长（到达到送达）
    pub fn journey_ticks(&self) -> Option<u64> {
        self.delivered_at.map(|t| t.since(self.request.arrival))
    }
}

/// 乘客总览中的一行，字段与乘客清单一致，另带最终状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerOverview {
    pub id: u64,
    pub start_floor: usize,
    pub target_floor: usize,
    pub direction: Direction,
    /// 候梯时为起点，轿厢内为电梯所在层，送达后为终点
    pub current_floor: usize,
    pub delivered: bool,
    pub status: RequestStatus,
    pub arrival_tick: u64,
    pub boarded_tick: Option<u64>,
    pub delivered_tick: Option<u64>,
}

impl PassengerRecord {
    pub fn overview(&self, lift_floor: usize) -> PassengerOverview {
        let r = &self.request;
        let current_floor = match self.status {
            RequestStatus::Pending => r.origin,
            RequestStatus::InLift => lift_floor,
            RequestStatus::Delivered => r.destination,
        };
        PassengerOverview {
            id: r.id.0,
            start_floor: r.origin,
            target_floor: r.destination,
            direction: r.direction(),
            current_floor,
            delivered: self.status == RequestStatus::Delivered,
            status: self.status,
            arrival_tick: r.arrival.0,
            boarded_tick: self.boarded_at.map(|t| t.0),
            delivered_tick: self.delivered_at.map(|t| t.0),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Ledger {
    records: BTreeMap<RequestId, PassengerRecord>,
}

impl Ledger {
    pub(crate) fn admit(&mut self, request: Request) -> Result<()> {
        if self.records.contains_key(&request.id) {
            return Err(SimError::InvalidRequest {
                id: request.id,
                reason: "id already used in this run".to_string(),
            });
        }
        self.records.insert(
            request.id,
            PassengerRecord {
                request,
                status: RequestStatus::Pending,
                boarded_at: None,
                delivered_at: None,
            },
        );
        Ok(())
    }

    pub(crate) fn board(&mut self, id: RequestId, now: Tick) -> Result<()> {
        let rec = self.records.get_mut(&id).ok_or(SimError::NotFound(id))?;
        rec.status = RequestStatus::InLift;
        rec.boarded_at = Some(now);
        Ok(())
    }

    pub(crate) fn deliver(&mut self, id: RequestId, now: Tick) -> Result<()> {
        let rec = self.records.get_mut(&id).ok_or(SimError::NotFound(id))?;
        rec.status = RequestStatus::Delivered;
        rec.delivered_at = Some(now);
        Ok(())
    }

    pub fn get(&self, id: RequestId) -> Option<&PassengerRecord> {
        self.records.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PassengerRecord> + '_ {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 按 id 排列的乘客总览
    pub fn overview(&self, lift_floor: usize) -> Vec<PassengerOverview> {
        self.records.values().map(|r| r.overview(lift_floor)).collect()
    }

    pub fn count(&self, status: RequestStatus) -> usize {
        self.records.values().filter(|r| r.status == status).count()
    }
}
