//! 电梯模型
//!
//! 请求、待服务队列和单部电梯的状态机。

mod queue;
mod request;
mod state;

pub use queue::RequestQueue;
pub use request::{Direction, Request, RequestId, RequestStatus};
pub use state::{LiftMode, LiftState, TickOutcome};
