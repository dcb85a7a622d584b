//! 待到达请求
//!
//! 按到达 tick（再按登记序号）排序的堆元素。

use super::tick::Tick;
use crate::lift::Request;
use std::cmp::Ordering;

#[derive(Debug)]
pub struct ScheduledArrival {
    pub(crate) at: Tick,
    pub(crate) seq: u64,
    pub(crate) request: Request,
}

// BinaryHeap 是 max-heap；我们需要最早到达优先，因此反向比较。
impl Ord for ScheduledArrival {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.at.cmp(&other.at) {
            Ordering::Equal => self.seq.cmp(&other.seq),
            ord => ord,
        }
        .reverse()
    }
}

impl PartialOrd for ScheduledArrival {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledArrival {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl Eq for ScheduledArrival {}
