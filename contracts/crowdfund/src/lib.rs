//! # Crowdfund Ledger Contract
//!
//! This is the root crate of the **crowdfund ledger**: a single Soroban
//! contract `Crowdfund` that pools contributions toward a funding target
//! and puts spending under contributor governance.
//!
//! | Phase        | Entry Point(s)                               |
//! |--------------|----------------------------------------------|
//! | Bootstrap    | [`Crowdfund::init`]                          |
//! | Funding      | [`Crowdfund::contribute`], [`Crowdfund::refund`] |
//! | Governance   | [`Crowdfund::create_request`], [`Crowdfund::vote_request`] |
//! | Payout       | [`Crowdfund::make_payment`]                  |
//! | Queries      | `manager`, `target`, `deadline`, `raised_amount`, `contribution`, `contract_balance`, `get_request`, `request_count`, `contributor_count`, `has_voted` |
//!
//! ## Architecture
//!
//! Storage access is fully delegated to [`storage`]; event payloads live
//! in [`events`]. This file contains **only** the public entry points:
//! precondition checks, bookkeeping commits, and token transfers.
//!
//! ## Invariants
//!
//! * Conservation: `raised_amount` equals the sum of all nonzero
//!   contribution balances at all times, and exceeds the token balance
//!   the contract holds by exactly the total of completed payouts.
//! * Refunds are gated on `deadline` having passed AND the target being
//!   unmet AND a nonzero balance.
//! * One vote per contributor per request; only parties with a nonzero
//!   balance may vote.
//! * A request pays out at most once, and only with a strict majority of
//!   current contributors behind it.
//!
//! All bookkeeping is committed *before* any outbound token transfer, so a
//! transfer recipient that re-enters the contract observes fully settled
//! state (a refunded party re-entering `refund` sees a zero balance).

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, Env, String,
};

mod events;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

use storage::{
    get_and_increment_request_id, get_contribution, get_contributor_count, get_raised,
    get_request_count, is_initialized, load_config, load_request, load_request_state, save_config,
    save_request, save_request_state, set_contribution, set_contributor_count, set_raised,
    set_voted,
};
use types::{CampaignConfig, RequestConfig, RequestState};
pub use types::SpendingRequest;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized   = 1,
    Unauthorized         = 2,
    InvalidAmount        = 3,
    NotEligible          = 4,
    InvalidRequest       = 5,
    AlreadyVoted         = 6,
    AlreadyCompleted     = 7,
    InsufficientVotes    = 8,
    InsufficientBalance  = 9,
}

#[contract]
pub struct Crowdfund;

#[contractimpl]
impl Crowdfund {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the campaign: fix the manager, funding token, target,
    /// and deadline.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls panic with `Error::AlreadyInitialized`.
    ///
    /// - `manager` must sign; it becomes the only party able to create
    ///   spending requests and execute payments.
    /// - `target` must be positive.
    pub fn init(env: Env, manager: Address, token: Address, target: i128, deadline: u64) {
        manager.require_auth();

        if is_initialized(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        if target <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }

        save_config(
            &env,
            &CampaignConfig {
                manager,
                token,
                target,
                deadline,
            },
        );
        set_raised(&env, 0);
        set_contributor_count(&env, 0);
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Contribute `amount` of the campaign token.
    ///
    /// Contributions are accepted at any time — even after the deadline or
    /// after the target is met. A party's repeated contributions accumulate
    /// under a single balance.
    pub fn contribute(env: Env, contributor: Address, amount: i128) {
        contributor.require_auth();

        if amount <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }

        let config = load_config(&env);

        // Pull the funds in first; the host rolls back the whole call if
        // the transfer fails, so bookkeeping never runs ahead of value.
        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&contributor, &env.current_contract_address(), &amount);

        let balance = get_contribution(&env, &contributor);
        if balance == 0 {
            set_contributor_count(&env, get_contributor_count(&env) + 1);
        }
        set_contribution(&env, &contributor, balance + amount);

        let raised = get_raised(&env) + amount;
        set_raised(&env, raised);

        events::contribution_received(&env, contributor, amount, raised);
    }

    /// Reclaim a contribution after a failed campaign.
    ///
    /// Eligible only when the deadline has passed, the target was not
    /// reached, and `contributor` holds a nonzero balance; otherwise panics
    /// with `Error::NotEligible`.
    ///
    /// The contribution entry is zeroed (and `raised_amount` decremented)
    /// *before* the outbound transfer, so re-entering this function from
    /// the transfer cannot pay the same balance twice.
    pub fn refund(env: Env, contributor: Address) {
        contributor.require_auth();

        let config = load_config(&env);

        if env.ledger().timestamp() < config.deadline {
            panic_with_error!(&env, Error::NotEligible);
        }
        if get_raised(&env) >= config.target {
            panic_with_error!(&env, Error::NotEligible);
        }
        let balance = get_contribution(&env, &contributor);
        if balance <= 0 {
            panic_with_error!(&env, Error::NotEligible);
        }

        // Commit all bookkeeping before moving value out.
        set_contribution(&env, &contributor, 0);
        set_contributor_count(&env, get_contributor_count(&env) - 1);
        set_raised(&env, get_raised(&env) - balance);

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&env.current_contract_address(), &contributor, &balance);

        events::refund_issued(&env, contributor, balance);
    }

    // ─────────────────────────────────────────────────────────
    // Governance
    // ─────────────────────────────────────────────────────────

    /// Create a spending request for `amount` payable to `recipient`.
    ///
    /// Manager-only. Returns the new request's ID; IDs are assigned
    /// 0, 1, 2, … in creation order and are stable forever.
    ///
    /// No balance check happens here — whether the ledger can actually
    /// cover `amount` is decided at payment time.
    pub fn create_request(
        env: Env,
        caller: Address,
        description: String,
        recipient: Address,
        amount: i128,
    ) -> u32 {
        caller.require_auth();

        let config = load_config(&env);
        if caller != config.manager {
            panic_with_error!(&env, Error::Unauthorized);
        }
        if amount <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }

        let id = get_and_increment_request_id(&env);
        save_request(
            &env,
            id,
            &RequestConfig {
                description,
                recipient: recipient.clone(),
                amount,
            },
            &RequestState {
                completed: false,
                vote_count: 0,
            },
        );

        events::request_created(&env, id, recipient, amount);
        id
    }

    /// Vote in favour of spending request `request_id`.
    ///
    /// Only parties holding a nonzero contribution balance may vote, and
    /// each may vote at most once per request. Votes cannot be withdrawn,
    /// and completed requests no longer accept votes.
    pub fn vote_request(env: Env, voter: Address, request_id: u32) {
        voter.require_auth();

        let mut state = load_request_state(&env, request_id);
        if state.completed {
            panic_with_error!(&env, Error::AlreadyCompleted);
        }
        if get_contribution(&env, &voter) <= 0 {
            panic_with_error!(&env, Error::NotEligible);
        }
        if storage::has_voted(&env, request_id, &voter) {
            panic_with_error!(&env, Error::AlreadyVoted);
        }

        set_voted(&env, request_id, &voter);
        state.vote_count += 1;
        save_request_state(&env, request_id, &state);

        events::vote_cast(&env, request_id, voter, state.vote_count);
    }

    // ─────────────────────────────────────────────────────────
    // Payout
    // ─────────────────────────────────────────────────────────

    /// Pay out an approved spending request.
    ///
    /// Manager-only. Requires a strict majority — more than half of the
    /// parties currently holding a nonzero balance must have voted — and
    /// enough held funds to cover the request. Marks the request completed
    /// *before* transferring, making completion terminal even under
    /// re-entry from the recipient.
    pub fn make_payment(env: Env, caller: Address, request_id: u32) {
        caller.require_auth();

        let config = load_config(&env);
        if caller != config.manager {
            panic_with_error!(&env, Error::Unauthorized);
        }

        let request = load_request(&env, request_id);
        if request.completed {
            panic_with_error!(&env, Error::AlreadyCompleted);
        }

        // Strict majority of distinct current contributors.
        let contributors = get_contributor_count(&env);
        if u64::from(request.vote_count) * 2 <= u64::from(contributors) {
            panic_with_error!(&env, Error::InsufficientVotes);
        }

        let token_client = token::Client::new(&env, &config.token);
        let held = token_client.balance(&env.current_contract_address());
        if held < request.amount {
            panic_with_error!(&env, Error::InsufficientBalance);
        }

        // Terminal state commits before the transfer.
        save_request_state(
            &env,
            request_id,
            &RequestState {
                completed: true,
                vote_count: request.vote_count,
            },
        );
        token_client.transfer(
            &env.current_contract_address(),
            &request.recipient,
            &request.amount,
        );

        events::payment_made(&env, request_id, request.recipient, request.amount);
    }

    // ─────────────────────────────────────────────────────────
    // Read-only queries
    // ─────────────────────────────────────────────────────────

    /// The privileged party fixed at initialization.
    pub fn manager(env: Env) -> Address {
        load_config(&env).manager
    }

    /// The immutable funding goal.
    pub fn target(env: Env) -> i128 {
        load_config(&env).target
    }

    /// The immutable refund-eligibility timestamp.
    pub fn deadline(env: Env) -> u64 {
        load_config(&env).deadline
    }

    /// Value currently held that has not been paid out or refunded.
    pub fn raised_amount(env: Env) -> i128 {
        get_raised(&env)
    }

    /// `party`'s contributed balance; zero after a refund.
    pub fn contribution(env: Env, party: Address) -> i128 {
        get_contribution(&env, &party)
    }

    /// Live token balance held by the contract.
    pub fn contract_balance(env: Env) -> i128 {
        let config = load_config(&env);
        token::Client::new(&env, &config.token).balance(&env.current_contract_address())
    }

    /// Retrieve a request's full record by its ID.
    pub fn get_request(env: Env, request_id: u32) -> SpendingRequest {
        load_request(&env, request_id)
    }

    /// Total number of requests ever created.
    pub fn request_count(env: Env) -> u32 {
        get_request_count(&env)
    }

    /// Number of distinct parties with a nonzero balance (the quorum base).
    pub fn contributor_count(env: Env) -> u32 {
        get_contributor_count(&env)
    }

    /// Has `party` voted on request `request_id`?
    pub fn has_voted(env: Env, request_id: u32, party: Address) -> bool {
        storage::has_voted(&env, request_id, &party)
    }
}
