use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};

/// A review left against a service. `service_id` relates by value only;
/// nothing enforces that the referenced service exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "serviceId")]
    pub service_id: String,
    pub email: String,
    pub review: String,
    pub rating: f64,
    #[serde(flatten)]
    pub extra: Document,
}

/// The only fields a review update may touch.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewPatch {
    pub review: String,
    pub rating: f64,
}

pub fn by_service_filter(service_id: &str) -> Document {
    doc! { "serviceId": service_id }
}

pub fn owner_filter(email: &str) -> Document {
    doc! { "email": email }
}

pub async fn insert(coll: &Collection<Review>, review: Review) -> Result<InsertOutcome, ModelError> {
    let result = coll.insert_one(review).await?;
    Ok(result.into())
}

pub async fn all(coll: &Collection<Review>) -> Result<Vec<Review>, ModelError> {
    let cursor = coll.find(doc! {}).await?;
    Ok(cursor.try_collect().await?)
}

pub async fn by_service(coll: &Collection<Review>, service_id: &str) -> Result<Vec<Review>, ModelError> {
    let cursor = coll.find(by_service_filter(service_id)).await?;
    Ok(cursor.try_collect().await?)
}

pub async fn by_owner(coll: &Collection<Review>, email: &str) -> Result<Vec<Review>, ModelError> {
    let cursor = coll.find(owner_filter(email)).await?;
    Ok(cursor.try_collect().await?)
}

/// `$set`s `review` and `rating` only; `serviceId` and `email` stay as written.
pub async fn update_fields(
    coll: &Collection<Review>,
    id: ObjectId,
    patch: &ReviewPatch,
) -> Result<UpdateOutcome, ModelError> {
    let update = doc! { "$set": { "review": &patch.review, "rating": patch.rating } };
    let result = coll.update_one(doc! { "_id": id }, update).await?;
    Ok(result.into())
}

pub async fn delete_by_id(coll: &Collection<Review>, id: ObjectId) -> Result<DeleteOutcome, ModelError> {
    let result = coll.delete_one(doc! { "_id": id }).await?;
    Ok(result.into())
}
