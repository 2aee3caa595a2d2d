//! Actor entity model and DTOs.

use chrono::NaiveDate;
use reelhub_core::contracts::ActorSummary;
use reelhub_core::media::MediaAsset;
use reelhub_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Actor {
    pub id: DbId,
    pub name: String,
    pub about: String,
    pub gender: String,
    pub birthday: Option<NaiveDate>,
    pub avatar: Option<Json<MediaAsset>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Actor {
    pub fn avatar_asset(&self) -> Option<&MediaAsset> {
        self.avatar.as_ref().map(|a| &a.0)
    }

    /// The profile shape shared by public endpoints and the batch contract.
    pub fn to_summary(&self) -> ActorSummary {
        ActorSummary {
            id: self.id,
            name: self.name.clone(),
            about: self.about.clone(),
            gender: self.gender.clone(),
            avatar: self.avatar.as_ref().map(|a| a.url.clone()),
            birthday: self.birthday,
        }
    }
}

/// Fields written on create and on update. Updates replace every field.
#[derive(Debug, Clone)]
pub struct ActorInput {
    pub name: String,
    pub about: String,
    pub gender: String,
    pub birthday: Option<NaiveDate>,
}
