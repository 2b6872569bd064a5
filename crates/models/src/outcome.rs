use mongodb::bson::Bson;
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use serde::Serialize;

/// Wire shapes for write acknowledgements. Field names match what the
/// driver's raw results look like to existing clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: Bson,
}

impl From<InsertOneResult> for InsertOutcome {
    fn from(r: InsertOneResult) -> Self {
        Self { acknowledged: true, inserted_id: r.inserted_id }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl From<UpdateResult> for UpdateOutcome {
    fn from(r: UpdateResult) -> Self {
        Self { acknowledged: true, matched_count: r.matched_count, modified_count: r.modified_count }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeleteOutcome {
    fn from(r: DeleteResult) -> Self {
        Self { acknowledged: true, deleted_count: r.deleted_count }
    }
}
