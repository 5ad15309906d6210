//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the
//! crowdfund ledger:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key                | Type             | Description                          |
//! |--------------------|------------------|--------------------------------------|
//! | `Config`           | `CampaignConfig` | Manager, token, target, deadline     |
//! | `Raised`           | `i128`           | Value held, net of refunds/payouts   |
//! | `ContributorCount` | `u32`            | Parties with a nonzero balance       |
//! | `RequestCount`     | `u32`            | Auto-increment request ID counter    |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                      | Type            | Description                    |
//! |--------------------------|-----------------|--------------------------------|
//! | `Contribution(party)`    | `i128`          | Per-party contributed balance  |
//! | `ReqConfig(id)`          | `RequestConfig` | Immutable request fields       |
//! | `ReqState(id)`           | `RequestState`  | Mutable vote/completion state  |
//! | `Voted(id, party)`       | `bool`          | Per-request has-voted flag     |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! ## Why split ReqConfig and ReqState?
//!
//! Votes are high-frequency writes. Writing the full request record (with
//! its description string) on every vote is wasteful; `RequestState` is a
//! handful of bytes, so each vote rewrites only that entry while the public
//! API stays clean via the reconstructed [`SpendingRequest`] return type.
//! The same reasoning puts has-voted flags under their own `Voted(id, party)`
//! keys instead of a map inside the request record.

use soroban_sdk::{contracttype, panic_with_error, Address, Env};

use crate::types::{CampaignConfig, RequestConfig, RequestState, SpendingRequest};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
///
/// Instance-tier keys (`Config`, `Raised`, `ContributorCount`,
/// `RequestCount`) live as long as the contract and are extended together.
/// Persistent-tier keys hold per-party and per-request data with
/// independent TTLs.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Immutable campaign configuration (Instance).
    Config,
    /// Running total of value held by the campaign (Instance).
    Raised,
    /// Number of distinct parties with a nonzero balance (Instance).
    ContributorCount,
    /// Global auto-increment counter for request IDs (Instance).
    RequestCount,
    /// Contributed balance keyed by party (Persistent).
    Contribution(Address),
    /// Immutable request configuration keyed by ID (Persistent).
    ReqConfig(u32),
    /// Mutable request state keyed by ID (Persistent).
    ReqState(u32),
    /// Has-voted flag keyed by (request ID, party) (Persistent).
    Voted(u32, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Return `true` once `init` has stored the campaign configuration.
pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

/// Store the campaign configuration. Written exactly once by `init`.
pub fn save_config(env: &Env, config: &CampaignConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

/// Retrieve the campaign configuration.
/// Panics if the contract has not been initialized.
pub fn load_config(env: &Env) -> CampaignConfig {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("not initialized")
}

/// Running total of value held, net of refunds and payouts.
pub fn get_raised(env: &Env) -> i128 {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Raised).unwrap_or(0)
}

pub fn set_raised(env: &Env, raised: i128) {
    env.storage().instance().set(&DataKey::Raised, &raised);
    bump_instance(env);
}

/// Number of distinct parties currently holding a nonzero balance.
/// This is the quorum base for `make_payment`.
pub fn get_contributor_count(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::ContributorCount)
        .unwrap_or(0)
}

pub fn set_contributor_count(env: &Env, count: u32) {
    env.storage()
        .instance()
        .set(&DataKey::ContributorCount, &count);
    bump_instance(env);
}

/// Total number of requests ever created. Valid IDs are `0..count`.
pub fn get_request_count(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::RequestCount)
        .unwrap_or(0)
}

/// Atomically reads, increments, and stores the request counter.
/// Returns the ID to use for the *current* request (pre-increment value).
pub fn get_and_increment_request_id(env: &Env) -> u32 {
    let current = get_request_count(env);
    env.storage()
        .instance()
        .set(&DataKey::RequestCount, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// A party's contributed balance; zero when the party never contributed
/// or has been refunded.
pub fn get_contribution(env: &Env, party: &Address) -> i128 {
    let key = DataKey::Contribution(party.clone());
    let balance: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    if balance > 0 {
        bump_persistent(env, &key);
    }
    balance
}

pub fn set_contribution(env: &Env, party: &Address, balance: i128) {
    let key = DataKey::Contribution(party.clone());
    env.storage().persistent().set(&key, &balance);
    bump_persistent(env, &key);
}

/// Save both the immutable config and initial mutable state for a new request.
pub fn save_request(env: &Env, id: u32, config: &RequestConfig, state: &RequestState) {
    let config_key = DataKey::ReqConfig(id);
    let state_key = DataKey::ReqState(id);
    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&state_key, state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load the full `SpendingRequest` by combining config and state.
/// Panics with `Error::InvalidRequest` if the ID was never created.
pub fn load_request(env: &Env, id: u32) -> SpendingRequest {
    let config = load_request_config(env, id);
    let state = load_request_state(env, id);
    SpendingRequest {
        id,
        description: config.description,
        recipient: config.recipient,
        amount: config.amount,
        completed: state.completed,
        vote_count: state.vote_count,
    }
}

/// Load only the immutable request configuration.
pub fn load_request_config(env: &Env, id: u32) -> RequestConfig {
    let key = DataKey::ReqConfig(id);
    let config: RequestConfig = match env.storage().persistent().get(&key) {
        Some(config) => config,
        None => panic_with_error!(env, Error::InvalidRequest),
    };
    bump_persistent(env, &key);
    config
}

/// Load only the mutable request state.
pub fn load_request_state(env: &Env, id: u32) -> RequestState {
    let key = DataKey::ReqState(id);
    let state: RequestState = match env.storage().persistent().get(&key) {
        Some(state) => state,
        None => panic_with_error!(env, Error::InvalidRequest),
    };
    bump_persistent(env, &key);
    state
}

/// Save only the mutable request state (optimized for votes/payment).
pub fn save_request_state(env: &Env, id: u32, state: &RequestState) {
    let key = DataKey::ReqState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Has `party` already voted on request `id`?
pub fn has_voted(env: &Env, id: u32, party: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Voted(id, party.clone()))
        .unwrap_or(false)
}

/// Record that `party` voted on request `id`.
pub fn set_voted(env: &Env, id: u32, party: &Address) {
    let key = DataKey::Voted(id, party.clone());
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
}
