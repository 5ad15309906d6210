//! # Types
//!
//! Shared data structures used across all modules of the crowdfund ledger.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A spending request is internally stored as two separate ledger entries:
//!
//! - [`RequestConfig`] — written once at creation; never mutated.
//! - [`RequestState`] — written on every vote and on payment.
//!
//! Votes are the high-frequency write path, so only the small state entry
//! is rewritten per vote. The public API exposes the reconstructed
//! [`SpendingRequest`] struct for convenience.
//!
//! ### Request lifecycle as a Finite-State Machine
//!
//! ```text
//! Created ──(votes accumulate)──► Created ──(make_payment)──► Completed
//! ```
//!
//! `Completed` is terminal. There is no rejected state: a request that
//! never reaches quorum simply stays open forever.

use soroban_sdk::{contracttype, Address, String};

/// Immutable campaign configuration, written once at initialization.
///
/// The manager is the only party allowed to create spending requests and
/// execute approved payments. Target and deadline are fixed for the life
/// of the contract.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    /// Privileged party that proposes and pays spending requests.
    pub manager: Address,
    /// Token contract holding the campaign's funding asset.
    pub token: Address,
    /// Funding goal; crossing it disables refunds.
    pub target: i128,
    /// Ledger timestamp after which unmet-target refunds become available.
    pub deadline: u64,
}

/// Immutable spending-request configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestConfig {
    pub description: String,
    pub recipient: Address,
    pub amount: i128,
}

/// Mutable spending-request state, updated on votes and on payment.
///
/// Kept small so that frequent writes (votes) are cheap.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestState {
    pub completed: bool,
    pub vote_count: u32,
}

/// Full on-chain representation of a spending request.
///
/// Used as the public API return type; reconstructed internally from
/// the split `RequestConfig` + `RequestState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpendingRequest {
    /// Stable identifier: the request's position in creation order.
    pub id: u32,
    /// Free-form purpose of the spend.
    pub description: String,
    /// Party paid when the request completes.
    pub recipient: Address,
    /// Amount released on payment.
    pub amount: i128,
    /// Set by `make_payment`; terminal once true.
    pub completed: bool,
    /// Number of distinct contributors that have voted for this request.
    pub vote_count: u32,
}
