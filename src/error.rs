//! 错误类型
//!
//! 仿真内核的所有失败都汇总到 [`SimError`]。调度违规与簿记错误属于算法缺陷，
//! 不做重试，直接向上传播并终止本次运行。

use thiserror::Error;

use crate::dispatch::Decision;
use crate::lift::RequestId;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// 请求本身不合法：起止楼层相同、越界或 id 重复
    #[error("invalid request {id}: {reason}")]
    InvalidRequest { id: RequestId, reason: String },

    /// 移除了一个不在队列（或台账）中的请求
    #[error("request {0} not found")]
    NotFound(RequestId),

    /// 调度器给出了违反楼层范围、载客方向或空闲条件的决策
    #[error("dispatch violation at floor {floor}: {decision} rejected, {reason}")]
    DispatchViolation {
        decision: Decision,
        floor: usize,
        reason: &'static str,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// 在 tick 上限内没有完成全部请求
    #[error("simulation stalled after {ticks} ticks ({pending} pending, {in_lift} in lift)")]
    Stalled {
        ticks: u64,
        pending: usize,
        in_lift: usize,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
