//! Resolving a movie's actor references through the actor service.

use std::collections::HashMap;

use serde::Serialize;

use super::{fetch_referenced, BatchLookup};
use crate::contracts::ActorSummary;
use crate::error::CoreError;
use crate::fanout::resolve_in_order;
use crate::movie::{CastMember, MovieCredits};
use crate::types::DbId;

/// Compact actor reference shown on public movie pages.
///
/// `name` is absent only when the view fell back to id-only rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonRef {
    pub id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&ActorSummary> for PersonRef {
    fn from(actor: &ActorSummary) -> Self {
        Self {
            id: actor.id,
            name: Some(actor.name.clone()),
            avatar: actor.avatar.clone(),
        }
    }
}

impl PersonRef {
    fn id_only(id: DbId) -> Self {
        Self {
            id,
            name: None,
            avatar: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastCredit<P> {
    pub actor: P,
    pub role_as: String,
    pub lead_actor: bool,
}

/// Credits with every reference replaced by a rendered actor `P`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCredits<P> {
    pub director: Option<P>,
    pub writers: Vec<P>,
    pub producers: Vec<P>,
    pub cast: Vec<CastCredit<P>>,
    /// Set when the actor service was unavailable and only ids are shown.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub partial: bool,
}

impl<P> ResolvedCredits<P> {
    fn render<F>(credits: &MovieCredits, actors: &HashMap<DbId, ActorSummary>, to: F) -> Self
    where
        F: Fn(&ActorSummary) -> P,
    {
        let director = credits
            .director
            .and_then(|id| actors.get(&id))
            .map(&to);
        let writers = resolve_in_order(credits.writers.iter(), actors, |id| **id, |_, a| to(a));
        let producers =
            resolve_in_order(credits.producers.iter(), actors, |id| **id, |_, a| to(a));
        let cast = resolve_in_order(
            credits.cast.iter(),
            actors,
            |c: &&CastMember| c.actor,
            |c, a| CastCredit {
                actor: to(a),
                role_as: c.role_as.clone(),
                lead_actor: c.lead_actor,
            },
        );
        Self {
            director,
            writers,
            producers,
            cast,
            partial: false,
        }
    }
}

impl ResolvedCredits<PersonRef> {
    fn ids_only(credits: &MovieCredits) -> Self {
        Self {
            director: credits.director.map(PersonRef::id_only),
            writers: credits.writers.iter().copied().map(PersonRef::id_only).collect(),
            producers: credits.producers.iter().copied().map(PersonRef::id_only).collect(),
            cast: credits
                .cast
                .iter()
                .map(|c| CastCredit {
                    actor: PersonRef::id_only(c.actor),
                    role_as: c.role_as.clone(),
                    lead_actor: c.lead_actor,
                })
                .collect(),
            partial: true,
        }
    }
}

/// Resolve credits to full actor records. Fails if the actor service does.
pub async fn resolve_credits(
    credits: &MovieCredits,
    actors: &dyn BatchLookup<ActorSummary>,
) -> Result<ResolvedCredits<ActorSummary>, CoreError> {
    let found = fetch_referenced(actors, credits.referenced_ids()).await?;
    Ok(ResolvedCredits::render(credits, &found, ActorSummary::clone))
}

/// Resolve credits for a public page.
///
/// Deleted actors disappear from the view. If the actor service itself
/// cannot be reached the view still renders, with id-only references and
/// `partial` set.
pub async fn compose_public_credits(
    credits: &MovieCredits,
    actors: &dyn BatchLookup<ActorSummary>,
) -> ResolvedCredits<PersonRef> {
    match fetch_referenced(actors, credits.referenced_ids()).await {
        Ok(found) => ResolvedCredits::render(credits, &found, |a| PersonRef::from(a)),
        Err(e) => {
            tracing::warn!(error = %e, "Actor lookup failed, rendering credits by id");
            ResolvedCredits::ids_only(credits)
        }
    }
}
