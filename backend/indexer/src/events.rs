//! Canonical event types emitted by the crowdfund contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/crowdfund/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the crowdfund contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A contribution was accepted (`contrib` topic).
    ContributionReceived,
    /// A contributor reclaimed funds after the deadline (`refund` topic).
    RefundIssued,
    /// The manager created a spending request (`request` topic).
    RequestCreated,
    /// A contributor voted on a spending request (`voted` topic).
    VoteCast,
    /// An approved request was paid out (`paid` topic).
    PaymentMade,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "contrib" => Self::ContributionReceived,
            "refund" => Self::RefundIssued,
            "request" => Self::RequestCreated,
            "voted" => Self::VoteCast,
            "paid" => Self::PaymentMade,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContributionReceived => "contribution_received",
            Self::RefundIssued => "refund_issued",
            Self::RequestCreated => "request_created",
            Self::VoteCast => "vote_cast",
            Self::PaymentMade => "payment_made",
            Self::Unknown => "unknown",
        }
    }

    /// Does this kind carry a spending-request ID in its second topic?
    pub fn has_request_topic(&self) -> bool {
        matches!(
            self,
            Self::RequestCreated | Self::VoteCast | Self::PaymentMade
        )
    }
}

/// A fully decoded crowdfund event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignEvent {
    pub event_type: String,
    /// Spending-request ID for request/vote/payment events; `None` for
    /// contribution and refund events.
    pub request_id: Option<String>,
    /// The contributor, voter, or recipient involved.
    pub party: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub request_id: Option<String>,
    pub party: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
