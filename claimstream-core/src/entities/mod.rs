pub mod casinos;
pub mod tracking_events;

use claimstream_sdk::objects::ActionType as SdkActionType;

/// Tracking action type for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see
/// `claimstream_sdk::objects::ActionType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case", type_name = "action_type")]
pub enum ActionType {
    CodeCopy,
    OfferClick,
    Search,
    PageVisit,
}

impl ActionType {
    /// Offer actions carry a `(casino, bonus)` pair and feed rollups and
    /// the live stream.
    pub fn is_offer_action(self) -> bool {
        matches!(self, ActionType::CodeCopy | ActionType::OfferClick)
    }
}

impl From<ActionType> for SdkActionType {
    fn from(value: ActionType) -> Self {
        match value {
            ActionType::CodeCopy => SdkActionType::CodeCopy,
            ActionType::OfferClick => SdkActionType::OfferClick,
            ActionType::Search => SdkActionType::Search,
            ActionType::PageVisit => SdkActionType::PageVisit,
        }
    }
}

impl From<SdkActionType> for ActionType {
    fn from(value: SdkActionType) -> Self {
        match value {
            SdkActionType::CodeCopy => ActionType::CodeCopy,
            SdkActionType::OfferClick => ActionType::OfferClick,
            SdkActionType::Search => ActionType::Search,
            SdkActionType::PageVisit => ActionType::PageVisit,
        }
    }
}
