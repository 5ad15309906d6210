extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger as _},
    token, vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::events::{ContributionReceived, PaymentMade, RefundIssued, RequestCreated, VoteCast};
use crate::{Crowdfund, CrowdfundClient};

fn setup<'a>() -> (
    Env,
    CrowdfundClient<'a>,
    Address,
    token::Client<'a>,
    token::StellarAssetClient<'a>,
) {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(Crowdfund, ());
    let client = CrowdfundClient::new(&env, &contract_id);

    let manager = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token_addr = env.register_stellar_asset_contract_v2(token_admin);
    let token = token::Client::new(&env, &token_addr.address());
    let token_sac = token::StellarAssetClient::new(&env, &token_addr.address());

    let deadline = env.ledger().timestamp() + 3_600;
    client.init(&manager, &token.address, &10_000i128, &deadline);

    (env, client, manager, token, token_sac)
}

#[test]
fn test_contribution_event() {
    let (env, client, _manager, _token, token_sac) = setup();
    let party = Address::generate(&env);
    let amount = 1_500i128;

    token_sac.mint(&party, &amount);
    client.contribute(&party, &amount);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("contrib").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ContributionReceived = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ContributionReceived {
            contributor: party.clone(),
            amount,
            raised: amount,
        }
    );
}

#[test]
fn test_refund_event() {
    let (env, client, _manager, _token, token_sac) = setup();
    let party = Address::generate(&env);
    let amount = 2_000i128;

    token_sac.mint(&party, &amount);
    client.contribute(&party, &amount);

    let deadline = client.deadline();
    env.ledger().with_mut(|li| li.timestamp = deadline + 1);

    client.refund(&party);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("refund").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RefundIssued = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        RefundIssued {
            contributor: party.clone(),
            amount,
        }
    );
}

#[test]
fn test_request_created_event() {
    let (env, client, manager, _token, _token_sac) = setup();
    let recipient = Address::generate(&env);
    let amount = 750i128;

    let id = client.create_request(
        &manager,
        &String::from_str(&env, "printing costs"),
        &recipient,
        &amount,
    );

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("request").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RequestCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        RequestCreated {
            request_id: id,
            recipient: recipient.clone(),
            amount,
        }
    );
}

#[test]
fn test_vote_cast_event() {
    let (env, client, manager, _token, token_sac) = setup();
    let party = Address::generate(&env);
    let recipient = Address::generate(&env);

    token_sac.mint(&party, &1_000i128);
    client.contribute(&party, &1_000i128);
    let id = client.create_request(
        &manager,
        &String::from_str(&env, "printing costs"),
        &recipient,
        &500i128,
    );

    client.vote_request(&party, &id);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("voted").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: VoteCast = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        VoteCast {
            request_id: id,
            voter: party.clone(),
            vote_count: 1,
        }
    );
}

#[test]
fn test_payment_made_event() {
    let (env, client, manager, _token, token_sac) = setup();
    let party = Address::generate(&env);
    let recipient = Address::generate(&env);
    let amount = 800i128;

    token_sac.mint(&party, &2_000i128);
    client.contribute(&party, &2_000i128);
    let id = client.create_request(
        &manager,
        &String::from_str(&env, "printing costs"),
        &recipient,
        &amount,
    );
    client.vote_request(&party, &id);

    client.make_payment(&manager, &id);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("paid").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: PaymentMade = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        PaymentMade {
            request_id: id,
            recipient: recipient.clone(),
            amount,
        }
    );
}
