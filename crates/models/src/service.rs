use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::outcome::{DeleteOutcome, InsertOutcome};

/// A listed service. Callers may attach arbitrary extra fields (description,
/// image, price, ...); those ride along in `extra` untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub category: String,
    /// Owner identity, compared against the token's email on owner-scoped routes.
    pub email: String,
    #[serde(flatten)]
    pub extra: Document,
}

/// Case-insensitive substring match on `title`, optionally narrowed to an
/// exact `category`. An absent search term matches everything.
pub fn search_filter(search: Option<&str>, category: Option<&str>) -> Document {
    let mut query = doc! { "title": { "$regex": search.unwrap_or(""), "$options": "i" } };
    if let Some(category) = category {
        query.insert("category", category);
    }
    query
}

/// Owner's services, with a case-insensitive substring match on `category`.
pub fn owner_filter(email: &str, search: Option<&str>) -> Document {
    doc! {
        "email": email,
        "category": { "$regex": search.unwrap_or(""), "$options": "i" },
    }
}

pub async fn insert(coll: &Collection<Service>, service: Service) -> Result<InsertOutcome, ModelError> {
    let result = coll.insert_one(service).await?;
    Ok(result.into())
}

pub async fn search(
    coll: &Collection<Service>,
    search: Option<&str>,
    category: Option<&str>,
) -> Result<Vec<Service>, ModelError> {
    let cursor = coll.find(search_filter(search, category)).await?;
    Ok(cursor.try_collect().await?)
}

pub async fn all(coll: &Collection<Service>) -> Result<Vec<Service>, ModelError> {
    let cursor = coll.find(doc! {}).await?;
    Ok(cursor.try_collect().await?)
}

pub async fn first_n(coll: &Collection<Service>, n: i64) -> Result<Vec<Service>, ModelError> {
    let cursor = coll.find(doc! {}).limit(n).await?;
    Ok(cursor.try_collect().await?)
}

pub async fn find_by_id(coll: &Collection<Service>, id: ObjectId) -> Result<Option<Service>, ModelError> {
    Ok(coll.find_one(doc! { "_id": id }).await?)
}

pub async fn by_owner(
    coll: &Collection<Service>,
    email: &str,
    search: Option<&str>,
) -> Result<Vec<Service>, ModelError> {
    let cursor = coll.find(owner_filter(email, search)).await?;
    Ok(cursor.try_collect().await?)
}

pub async fn delete_by_id(coll: &Collection<Service>, id: ObjectId) -> Result<DeleteOutcome, ModelError> {
    let result = coll.delete_one(doc! { "_id": id }).await?;
    Ok(result.into())
}
