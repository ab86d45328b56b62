use std::collections::HashMap;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::audit::{ConfirmedPickup, RejectedPickup};
use crate::models::collection::CollectionPoint;
use crate::models::pickup::PickupRequest;

/// The four workflow-owned record stores. Guarded by one lock so that a
/// reader never observes a request marked allocated without its
/// collection point, or a completed collection point without its audit
/// record.
#[derive(Default)]
pub struct Shelves {
    pub requests: HashMap<Uuid, PickupRequest>,
    pub collection_points: HashMap<Uuid, CollectionPoint>,
    pub confirmed: HashMap<Uuid, ConfirmedPickup>,
    pub rejected: HashMap<Uuid, RejectedPickup>,
}

enum Write {
    PutRequest(PickupRequest),
    DeleteRequest(Uuid),
    PutCollectionPoint(CollectionPoint),
    DeleteCollectionPoint(Uuid),
    PutConfirmed(ConfirmedPickup),
    PutRejected(RejectedPickup),
}

impl Shelves {
    fn apply(&mut self, write: Write) {
        match write {
            Write::PutRequest(request) => {
                self.requests.insert(request.id, request);
            }
            Write::DeleteRequest(id) => {
                self.requests.remove(&id);
            }
            Write::PutCollectionPoint(point) => {
                self.collection_points.insert(point.id, point);
            }
            Write::DeleteCollectionPoint(id) => {
                self.collection_points.remove(&id);
            }
            Write::PutConfirmed(record) => {
                self.confirmed.insert(record.id, record);
            }
            Write::PutRejected(record) => {
                self.rejected.insert(record.id, record);
            }
        }
    }
}

/// One unit of work: writes are staged against a read view and applied
/// only if the whole unit succeeds. Reads observe the unit's own staged
/// writes.
pub struct Txn<'a> {
    base: &'a Shelves,
    staged: Vec<Write>,
}

impl Txn<'_> {
    pub fn request(&self, id: Uuid) -> Option<PickupRequest> {
        let mut found = self.base.requests.get(&id).cloned();
        for write in &self.staged {
            match write {
                Write::PutRequest(request) if request.id == id => found = Some(request.clone()),
                Write::DeleteRequest(deleted) if *deleted == id => found = None,
                _ => {}
            }
        }
        found
    }

    pub fn collection_point_for_request(&self, request_id: Uuid) -> Option<CollectionPoint> {
        let mut found = self
            .base
            .collection_points
            .values()
            .find(|point| point.request_id == request_id)
            .cloned();
        for write in &self.staged {
            match write {
                Write::PutCollectionPoint(point) if point.request_id == request_id => {
                    found = Some(point.clone());
                }
                Write::DeleteCollectionPoint(deleted) => {
                    if found.as_ref().is_some_and(|point| point.id == *deleted) {
                        found = None;
                    }
                }
                _ => {}
            }
        }
        found
    }

    pub fn collection_code_in_use(&self, code: &str) -> bool {
        let mut found = self
            .base
            .collection_points
            .values()
            .find(|point| point.collection_code == code)
            .map(|point| point.id);
        for write in &self.staged {
            match write {
                Write::PutCollectionPoint(point) if point.collection_code == code => {
                    found = Some(point.id);
                }
                Write::DeleteCollectionPoint(deleted) if found == Some(*deleted) => {
                    found = None;
                }
                _ => {}
            }
        }
        found.is_some()
    }

    pub fn put_request(&mut self, request: PickupRequest) {
        self.staged.push(Write::PutRequest(request));
    }

    pub fn delete_request(&mut self, id: Uuid) {
        self.staged.push(Write::DeleteRequest(id));
    }

    pub fn put_collection_point(&mut self, point: CollectionPoint) {
        self.staged.push(Write::PutCollectionPoint(point));
    }

    pub fn delete_collection_point(&mut self, id: Uuid) {
        self.staged.push(Write::DeleteCollectionPoint(id));
    }

    pub fn put_confirmed(&mut self, record: ConfirmedPickup) {
        self.staged.push(Write::PutConfirmed(record));
    }

    pub fn put_rejected(&mut self, record: RejectedPickup) {
        self.staged.push(Write::PutRejected(record));
    }
}

pub struct Ledger {
    shelves: Mutex<Shelves>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            shelves: Mutex::new(Shelves::default()),
        }
    }

    /// Runs `unit` as an all-or-nothing operation over the shelves. An
    /// `Err` from the unit discards every staged write.
    pub async fn transact<T>(
        &self,
        unit: impl FnOnce(&mut Txn<'_>) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut shelves = self.shelves.lock().await;
        let mut txn = Txn {
            base: &shelves,
            staged: Vec::new(),
        };

        let outcome = unit(&mut txn);
        let staged = txn.staged;

        let value = outcome?;
        for write in staged {
            shelves.apply(write);
        }
        Ok(value)
    }

    /// Consistent read over the shelves.
    pub async fn read<T>(&self, f: impl FnOnce(&Shelves) -> T) -> T {
        let shelves = self.shelves.lock().await;
        f(&shelves)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
