use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::outcome::InsertOutcome;

/// `email` acts as the natural key. Uniqueness is checked at insert time by
/// the handler, not enforced by an index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    #[serde(flatten)]
    pub extra: Document,
}

pub async fn find_by_email(coll: &Collection<User>, email: &str) -> Result<Option<User>, ModelError> {
    Ok(coll.find_one(doc! { "email": email }).await?)
}

pub async fn insert(coll: &Collection<User>, user: User) -> Result<InsertOutcome, ModelError> {
    if user.email.trim().is_empty() {
        return Err(ModelError::Validation("email required".into()));
    }
    let result = coll.insert_one(user).await?;
    Ok(result.into())
}

pub async fn all(coll: &Collection<User>) -> Result<Vec<User>, ModelError> {
    let cursor = coll.find(doc! {}).await?;
    Ok(cursor.try_collect().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_keeps_profile_fields() {
        let json = serde_json::json!({
            "email": "a@b.com",
            "name": "Ada",
            "photoURL": "https://example.com/p.png"
        });
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.extra.get_str("name").unwrap(), "Ada");
    }
}
