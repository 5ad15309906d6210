//! # Events
//!
//! Every state mutation publishes a contract event so the off-chain
//! indexer (`backend/indexer`) can reconstruct campaign history without
//! replaying ledger state.
//!
//! Topic layout:
//!
//! | Topic     | Extra topic  | Data                     |
//! |-----------|--------------|--------------------------|
//! | `contrib` | —            | [`ContributionReceived`] |
//! | `refund`  | —            | [`RefundIssued`]         |
//! | `request` | `request_id` | [`RequestCreated`]       |
//! | `voted`   | `request_id` | [`VoteCast`]             |
//! | `paid`    | `request_id` | [`PaymentMade`]          |

use soroban_sdk::{contracttype, symbol_short, Address, Env};

/// A contribution was accepted (`contrib` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionReceived {
    pub contributor: Address,
    pub amount: i128,
    /// Running total after this contribution.
    pub raised: i128,
}

/// A contributor reclaimed their balance after the deadline (`refund` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundIssued {
    pub contributor: Address,
    pub amount: i128,
}

/// The manager created a spending request (`request` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestCreated {
    pub request_id: u32,
    pub recipient: Address,
    pub amount: i128,
}

/// A contributor voted on a spending request (`voted` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VoteCast {
    pub request_id: u32,
    pub voter: Address,
    /// Vote count after this vote.
    pub vote_count: u32,
}

/// An approved request was paid out (`paid` topic).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaymentMade {
    pub request_id: u32,
    pub recipient: Address,
    pub amount: i128,
}

pub fn contribution_received(env: &Env, contributor: Address, amount: i128, raised: i128) {
    env.events().publish(
        (symbol_short!("contrib"),),
        ContributionReceived {
            contributor,
            amount,
            raised,
        },
    );
}

pub fn refund_issued(env: &Env, contributor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("refund"),),
        RefundIssued {
            contributor,
            amount,
        },
    );
}

pub fn request_created(env: &Env, request_id: u32, recipient: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("request"), request_id),
        RequestCreated {
            request_id,
            recipient,
            amount,
        },
    );
}

pub fn vote_cast(env: &Env, request_id: u32, voter: Address, vote_count: u32) {
    env.events().publish(
        (symbol_short!("voted"), request_id),
        VoteCast {
            request_id,
            voter,
            vote_count,
        },
    );
}

pub fn payment_made(env: &Env, request_id: u32, recipient: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("paid"), request_id),
        PaymentMade {
            request_id,
            recipient,
            amount,
        },
    );
}
