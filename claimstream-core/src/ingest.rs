//! Event ingest validation.
//!
//! Validation is a pure step that precedes any database write, so an
//! invalid payload can never persist a partial event.

use thiserror::Error;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::entities::ActionType;
use crate::entities::tracking_events::InsertTrackingEvent;
use claimstream_sdk::objects::TrackRequest;

/// Errors surfaced synchronously to the ingest caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    /// The request is malformed or incomplete; client-fixable (400).
    #[error("{0}")]
    Validation(String),
}

/// A tracking request that passed the ingest contract.
///
/// Invariant: for offer actions both `casino_id` and `bonus_id` are set
/// and `search_term` is `None`; for `search` the reverse; `page_visit`
/// carries neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTracking {
    pub action_type: ActionType,
    pub casino_id: Option<Uuid>,
    pub bonus_id: Option<Uuid>,
    pub search_term: Option<String>,
    pub path: Option<String>,
}

impl ValidatedTracking {
    /// Apply the ingest contract to a raw request.
    pub fn from_request(request: &TrackRequest) -> Result<Self, IngestError> {
        let action_type = parse_action(&request.action_type).ok_or_else(|| {
            IngestError::Validation(format!(
                "unrecognized actionType: {:?}",
                request.action_type
            ))
        })?;

        match action_type {
            ActionType::CodeCopy | ActionType::OfferClick => {
                let (Some(casino_id), Some(bonus_id)) = (request.casino_id, request.bonus_id)
                else {
                    return Err(IngestError::Validation(
                        "casinoId and bonusId are required for offer actions".into(),
                    ));
                };
                Ok(Self {
                    action_type,
                    casino_id: Some(casino_id),
                    bonus_id: Some(bonus_id),
                    search_term: None,
                    path: request.path.clone(),
                })
            }
            ActionType::Search => {
                let term = request
                    .search_term
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| {
                        IngestError::Validation(
                            "searchTerm is required for search actions".into(),
                        )
                    })?;
                Ok(Self {
                    action_type,
                    casino_id: None,
                    bonus_id: None,
                    search_term: Some(term.to_owned()),
                    path: request.path.clone(),
                })
            }
            ActionType::PageVisit => Ok(Self {
                action_type,
                casino_id: None,
                bonus_id: None,
                search_term: None,
                path: request.path.clone(),
            }),
        }
    }

    /// Offer actions get a same-day usage count and a live notification.
    pub fn is_offer_action(&self) -> bool {
        self.action_type.is_offer_action()
    }

    /// Attach identity and timestamp, producing the insert message.
    pub fn into_insert(self, id: Uuid, created_at: PrimitiveDateTime) -> InsertTrackingEvent {
        InsertTrackingEvent {
            id,
            action_type: self.action_type,
            casino_id: self.casino_id,
            bonus_id: self.bonus_id,
            search_term: self.search_term,
            path: self.path,
            created_at,
        }
    }
}

/// Parse a wire action name, rejecting anything unknown.
pub fn parse_action(name: &str) -> Option<ActionType> {
    match name {
        "code_copy" => Some(ActionType::CodeCopy),
        "offer_click" => Some(ActionType::OfferClick),
        "search" => Some(ActionType::Search),
        "page_visit" => Some(ActionType::PageVisit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(action: &str) -> TrackRequest {
        TrackRequest {
            action_type: action.to_owned(),
            casino_id: None,
            bonus_id: None,
            search_term: None,
            path: None,
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(matches!(
            ValidatedTracking::from_request(&request("bonus_hover")),
            Err(IngestError::Validation(_))
        ));
    }

    #[test]
    fn offer_action_requires_complete_entity_ref() {
        let mut req = request("code_copy");
        assert!(ValidatedTracking::from_request(&req).is_err());

        req.casino_id = Some(Uuid::new_v4());
        assert!(ValidatedTracking::from_request(&req).is_err());

        req.bonus_id = Some(Uuid::new_v4());
        assert_eq!(
            ValidatedTracking::from_request(&req),
            Ok(ValidatedTracking {
                action_type: ActionType::CodeCopy,
                casino_id: req.casino_id,
                bonus_id: req.bonus_id,
                search_term: None,
                path: None,
            })
        );
    }

    #[test]
    fn search_requires_non_empty_term() {
        let mut req = request("search");
        assert!(ValidatedTracking::from_request(&req).is_err());

        req.search_term = Some("   ".into());
        assert!(ValidatedTracking::from_request(&req).is_err());

        req.search_term = Some(" blackjack ".into());
        assert_eq!(
            ValidatedTracking::from_request(&req),
            Ok(ValidatedTracking {
                action_type: ActionType::Search,
                casino_id: None,
                bonus_id: None,
                search_term: Some("blackjack".into()),
                path: None,
            })
        );
    }

    #[test]
    fn search_drops_stray_entity_ref() {
        let mut req = request("search");
        req.search_term = Some("roulette".into());
        req.casino_id = Some(Uuid::new_v4());
        req.bonus_id = Some(Uuid::new_v4());

        let validated = ValidatedTracking::from_request(&req);
        assert_eq!(
            validated.as_ref().map(|v| v.casino_id.zip(v.bonus_id)),
            Ok(None)
        );
    }

    #[test]
    fn page_visit_carries_only_the_path() {
        let mut req = request("page_visit");
        req.path = Some("/casinos/lucky-dice".into());

        let expected = ValidatedTracking {
            action_type: ActionType::PageVisit,
            casino_id: None,
            bonus_id: None,
            search_term: None,
            path: Some("/casinos/lucky-dice".into()),
        };
        assert!(!expected.is_offer_action());
        assert_eq!(ValidatedTracking::from_request(&req), Ok(expected));
    }
}
