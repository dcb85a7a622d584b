//! Pending request queue.
//!
//! Requests are bucketed by origin floor in an ordered map so that proximity
//! scans in either direction are plain range walks. Inside a bucket requests
//! stay in `(arrival, id)` order, which is the FIFO tie-break both dispatchers
//! rely on.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::error::{Result, SimError};

use super::request::{Direction, Request, RequestId};

#[derive(Debug, Clone)]
pub struct RequestQueue {
    floors: usize,
    by_floor: BTreeMap<usize, VecDeque<Request>>,
    index: HashMap<RequestId, usize>,
}

impl RequestQueue {
    pub fn new(floors: usize) -> Self {
        Self {
            floors,
            by_floor: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    pub fn floors(&self) -> usize {
        self.floors
    }

    pub fn insert(&mut self, request: Request) -> Result<()> {
        request.validate(self.floors)?;
        if self.index.contains_key(&request.id) {
            return Err(SimError::InvalidRequest {
                id: request.id,
                reason: "already queued".to_string(),
            });
        }
        self.index.insert(request.id, request.origin);
        let bucket = self.by_floor.entry(request.origin).or_default();
        let key = (request.arrival, request.id);
        let pos = bucket.partition_point(|r| (r.arrival, r.id) < key);
        bucket.insert(pos, request);
        Ok(())
    }

    pub fn remove(&mut self, id: RequestId) -> Result<Request> {
        let floor = self.index.remove(&id).ok_or(SimError::NotFound(id))?;
        let bucket = self
            .by_floor
            .get_mut(&floor)
            .ok_or(SimError::NotFound(id))?;
        let pos = bucket
            .iter()
            .position(|r| r.id == id)
            .ok_or(SimError::NotFound(id))?;
        let request = bucket.remove(pos).ok_or(SimError::NotFound(id))?;
        if bucket.is_empty() {
            self.by_floor.remove(&floor);
        }
        Ok(request)
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Requests waiting at `floor`, oldest first.
    pub fn at_floor(&self, floor: usize) -> impl Iterator<Item = &Request> + '_ {
        self.by_floor.get(&floor).into_iter().flatten()
    }

    /// Requests whose origin lies on the path from `from_floor` (inclusive)
    /// in `direction`, nearest origin first.
    ///
    /// The iterator is lazy and borrows the queue, so every call sees the
    /// current contents.
    pub fn pending_in_direction(
        &self,
        direction: Direction,
        from_floor: usize,
    ) -> Box<dyn Iterator<Item = &Request> + '_> {
        match direction {
            Direction::Up => Box::new(self.by_floor.range(from_floor..).flat_map(|(_, b)| b)),
            Direction::Down => Box::new(
                self.by_floor
                    .range(..=from_floor)
                    .rev()
                    .flat_map(|(_, b)| b),
            ),
        }
    }

    /// All pending requests, lowest origin floor first.
    pub fn iter(&self) -> impl Iterator<Item = &Request> + '_ {
        self.by_floor.values().flatten()
    }
}
