//! How does the bridge respond to a counterparty that misbehaves?
//!
//! Chain C plays the adversary: it hand-crafts packets instead of running the
//! bridge logic, and closes channels when it feels like it.

mod harness;

use common::Ack;

use harness::{attr, connect, forged_packet, packet_data, relay, Chain, CLASS_URI, TOKEN_URI};
use nft_bridge::msg::{ChannelResponse, NftInfoResponse, PendingPacketResponse, QueryMsg};
use nft_bridge::state::{ChannelState, PacketStatus};
use nft_bridge::ContractError;

const CLASS_A: &str = "nft-a";
const TOKEN: &str = "bad kid 1";

/// A <-> B over channel-0/channel-0, A <-> C over channel-1/channel-0.
fn setup() -> (Chain, Chain, Chain) {
    let mut a = Chain::new("a");
    let mut b = Chain::new("b");
    let mut c = Chain::new("c");
    connect(&mut a, "channel-0", &mut b, "channel-0");
    connect(&mut a, "channel-1", &mut c, "channel-0");
    a.mint_native("creator", CLASS_A, &[TOKEN], "alice");
    (a, b, c)
}

// ============================================================================
// Unexpected Close
// ============================================================================

#[test]
fn test_unexpected_close_refunds_pending() {
    let (mut a, _b, c) = setup();

    // Pending packet across A -> C that is never relayed.
    let packet = a
        .send_nft("alice", CLASS_A, &[TOKEN], "carol", "channel-1")
        .unwrap();
    assert_eq!(a.owner_of(CLASS_A, TOKEN), Some(a.bridge().to_string()));

    // C closes its end; A is told via CloseConfirm.
    a.close_confirm("channel-1", &c.endpoint("channel-0"))
        .unwrap();

    assert_eq!(a.owner_of(CLASS_A, TOKEN), Some("alice".to_string()));
    let record: PendingPacketResponse = a.query(QueryMsg::PendingPacket {
        channel_id: "channel-1".to_string(),
        sequence: packet.sequence,
    });
    assert_eq!(record.status, PacketStatus::Refunded);
    let channel: ChannelResponse = a.query(QueryMsg::Channel {
        channel_id: "channel-1".to_string(),
    });
    assert_eq!(channel.state, ChannelState::Closed);

    // The host still reports the timeout later; it must not refund twice.
    let response = a.timeout(&packet).unwrap();
    assert_eq!(
        harness::attr(&response.attributes, "result"),
        Some("already_resolved")
    );
    assert_eq!(a.owner_of(CLASS_A, TOKEN), Some("alice".to_string()));

    // New sends over the closed channel fail.
    a.execute(
        "creator",
        nft_bridge::msg::ExecuteMsg::Mint {
            class_id: CLASS_A.to_string(),
            token_id: "bad kid 2".to_string(),
            token_uri: None,
            owner: "dave".to_string(),
        },
    )
    .unwrap();
    let err = a
        .send_nft("dave", CLASS_A, &["bad kid 2"], "carol", "channel-1")
        .unwrap_err();
    assert_eq!(
        err,
        ContractError::ChannelClosed {
            channel_id: "channel-1".to_string()
        }
    );
    assert_eq!(a.owner_of(CLASS_A, "bad kid 2"), Some("dave".to_string()));
}

#[test]
fn test_close_leaves_other_channels_alone() {
    let (mut a, mut b, c) = setup();
    a.mint_native("creator", "nft-z", &["z"], "alice");

    let to_b = a
        .send_nft("alice", CLASS_A, &[TOKEN], "bob", "channel-0")
        .unwrap();
    a.send_nft("alice", "nft-z", &["z"], "carol", "channel-1")
        .unwrap();

    a.close_init("channel-1", &c.endpoint("channel-0")).unwrap();
    assert_eq!(a.owner_of("nft-z", "z"), Some("alice".to_string()));

    // The packet on channel-0 is still in flight and completes normally.
    assert_eq!(a.owner_of(CLASS_A, TOKEN), Some(a.bridge().to_string()));
    assert_eq!(relay(&mut a, &mut b, &to_b), Ack::Success);
    assert_eq!(b.owner_of("wasm.b/channel-0/nft-a", TOKEN), Some("bob".to_string()));
}

#[test]
fn test_receive_on_closed_channel_is_rejected() {
    let (mut a, _b, c) = setup();
    a.close_confirm("channel-1", &c.endpoint("channel-0"))
        .unwrap();

    let data = packet_data("class", &["1"], "carol", "alice");
    let packet = forged_packet(c.endpoint("channel-0"), a.endpoint("channel-1"), 1, &data);
    let response = a.receive(&packet);

    let ack = Ack::decode(&response.acknowledgement).unwrap();
    assert_eq!(
        ack,
        Ack::error(
            ContractError::ChannelClosed {
                channel_id: "channel-1".to_string()
            }
            .to_string()
        )
    );
    assert_eq!(a.owner_of("wasm.a/channel-1/class", "1"), None);
}

#[test]
fn test_close_refunds_around_unrefundable_packet() {
    let (mut a, mut b, _c) = setup();
    let wrapped = "wasm.a/channel-0/nft-b";

    // bob sends B's native token to alice on A
    b.mint_native("creator", "nft-b", &["1"], "bob");
    let incoming = b
        .send_nft("bob", "nft-b", &["1"], "alice", "channel-0")
        .unwrap();
    relay(&mut b, &mut a, &incoming);
    assert_eq!(a.owner_of(wrapped, "1"), Some("alice".to_string()));

    // Both still in flight: the voucher burned, the native token escrowed.
    let home = a
        .send_nft("alice", wrapped, &["1"], "bob", "channel-0")
        .unwrap();
    let escrowed = a
        .send_nft("alice", CLASS_A, &[TOKEN], "bob", "channel-0")
        .unwrap();
    assert_eq!(a.owner_of(wrapped, "1"), None);

    // B mints the burned voucher again under a packet it never sent.
    let data = packet_data("nft-b", &["1"], "bob", "mallory");
    let replay = forged_packet(b.endpoint("channel-0"), a.endpoint("channel-0"), 99, &data);
    let response = a.receive(&replay);
    assert_eq!(Ack::decode(&response.acknowledgement).unwrap(), Ack::Success);
    assert_eq!(a.owner_of(wrapped, "1"), Some("mallory".to_string()));

    // The voucher can no longer be re-minted, yet the close goes through.
    let response = a
        .close_confirm("channel-0", &b.endpoint("channel-0"))
        .unwrap();
    assert_eq!(attr(&response.attributes, "refunded"), Some("1"));
    assert_eq!(
        attr(&response.attributes, "refund_failed"),
        Some(home.sequence.to_string().as_str())
    );

    assert_eq!(a.owner_of(CLASS_A, TOKEN), Some("alice".to_string()));
    assert_eq!(a.owner_of(wrapped, "1"), Some("mallory".to_string()));
    let status = |sequence| {
        let record: PendingPacketResponse = a.query(QueryMsg::PendingPacket {
            channel_id: "channel-0".to_string(),
            sequence,
        });
        record.status
    };
    assert_eq!(status(escrowed.sequence), PacketStatus::Refunded);
    assert_eq!(status(home.sequence), PacketStatus::Pending);
    let channel: ChannelResponse = a.query(QueryMsg::Channel {
        channel_id: "channel-0".to_string(),
    });
    assert_eq!(channel.state, ChannelState::Closed);
}

// ============================================================================
// Class Id Spoofing
// ============================================================================

/// C sends a packet using the class id that B uses for A's token, trying to
/// unlock A's escrow. A must treat it as a brand new class from C.
#[test]
fn test_invalid_on_mine_valid_on_theirs() {
    let (mut a, mut b, c) = setup();

    let out = a
        .send_nft("alice", CLASS_A, &[TOKEN], "bob", "channel-0")
        .unwrap();
    assert_eq!(relay(&mut a, &mut b, &out), Ack::Success);

    let chain_b_class_id = "wasm.b/channel-0/nft-a";
    assert_eq!(b.owner_of(chain_b_class_id, TOKEN), Some("bob".to_string()));

    let data = packet_data(chain_b_class_id, &[TOKEN], "carol", "alice");
    let spoof = forged_packet(c.endpoint("channel-0"), a.endpoint("channel-1"), 1, &data);
    let response = a.receive(&spoof);
    assert_eq!(Ack::decode(&response.acknowledgement).unwrap(), Ack::Success);

    // A's escrow is untouched.
    assert_eq!(a.owner_of(CLASS_A, TOKEN), Some(a.bridge().to_string()));

    // A new class was minted under the doubly derived id.
    let chain_a_class_id = format!("wasm.a/channel-1/{}", chain_b_class_id);
    assert_eq!(
        a.owner_of(&chain_a_class_id, TOKEN),
        Some("alice".to_string())
    );
    let metadata: Option<String> = a.query(QueryMsg::Metadata {
        class_id: chain_a_class_id.clone(),
    });
    assert_eq!(metadata, Some(CLASS_URI.to_string()));
    let info: NftInfoResponse = a.query(QueryMsg::NftInfo {
        class_id: chain_a_class_id.clone(),
        token_id: TOKEN.to_string(),
    });
    assert_eq!(info.token_uri, Some(TOKEN_URI.to_string()));

    // The minted token can go back to C, which burns it here.
    let back = a
        .send_nft("alice", &chain_a_class_id, &[TOKEN], "carol", "channel-1")
        .unwrap();
    assert_eq!(a.owner_of(&chain_a_class_id, TOKEN), None);
    let acked = a
        .acknowledge(&back, Ack::Success.encode().unwrap())
        .unwrap();
    assert_eq!(harness::attr(&acked.attributes, "result"), Some("committed"));
    assert_eq!(a.owner_of(&chain_a_class_id, TOKEN), None);

    // And the original escrow is still there for B's holder.
    assert_eq!(a.owner_of(CLASS_A, TOKEN), Some(a.bridge().to_string()));
}

/// A class id carrying C's own prefix pops fine, but the token is escrowed
/// for B's channel, not C's.
#[test]
fn test_popped_prefix_escrowed_elsewhere_mints() {
    let (mut a, mut b, c) = setup();

    let out = a
        .send_nft("alice", CLASS_A, &[TOKEN], "bob", "channel-0")
        .unwrap();
    relay(&mut a, &mut b, &out);

    let data = packet_data("wasm.c/channel-0/nft-a", &[TOKEN], "carol", "mallory");
    let spoof = forged_packet(c.endpoint("channel-0"), a.endpoint("channel-1"), 1, &data);
    let response = a.receive(&spoof);
    assert_eq!(Ack::decode(&response.acknowledgement).unwrap(), Ack::Success);

    assert_eq!(a.owner_of(CLASS_A, TOKEN), Some(a.bridge().to_string()));
    assert_eq!(
        a.owner_of("wasm.a/channel-1/wasm.c/channel-0/nft-a", TOKEN),
        Some("mallory".to_string())
    );
}

#[test]
fn test_mixed_batch_is_rejected() {
    let (mut a, mut b, _c) = setup();
    a.execute(
        "creator",
        nft_bridge::msg::ExecuteMsg::Mint {
            class_id: CLASS_A.to_string(),
            token_id: "bad kid 2".to_string(),
            token_uri: None,
            owner: "alice".to_string(),
        },
    )
    .unwrap();

    let out = a
        .send_nft("alice", CLASS_A, &[TOKEN], "bob", "channel-0")
        .unwrap();
    relay(&mut a, &mut b, &out);

    // B claims to return one escrowed token and one that never left A.
    let data = packet_data("wasm.b/channel-0/nft-a", &[TOKEN, "bad kid 2"], "bob", "bob");
    let packet = forged_packet(b.endpoint("channel-0"), a.endpoint("channel-0"), 7, &data);
    let response = a.receive(&packet);
    assert_eq!(
        Ack::decode(&response.acknowledgement).unwrap(),
        Ack::error(ContractError::InvalidTransferBothActions.to_string())
    );

    assert_eq!(a.owner_of(CLASS_A, TOKEN), Some(a.bridge().to_string()));
    assert_eq!(a.owner_of(CLASS_A, "bad kid 2"), Some("alice".to_string()));
}

// ============================================================================
// Malformed Packets
// ============================================================================

#[test]
fn test_empty_class_id() {
    let (mut a, _b, c) = setup();

    let data = packet_data("", &[TOKEN], "carol", "alice");
    let packet = forged_packet(c.endpoint("channel-0"), a.endpoint("channel-1"), 1, &data);
    let response = a.receive(&packet);

    let ack = Ack::decode(&response.acknowledgement).unwrap();
    assert_eq!(ack.kind(), "error");

    // Nothing was minted under the bare prefix.
    let contract: Option<cosmwasm_std::Addr> = a.query(QueryMsg::NftContract {
        class_id: "wasm.a/channel-1/".to_string(),
    });
    assert_eq!(contract, None);
    assert_eq!(a.owner_of("wasm.a/channel-1/", TOKEN), None);
}

#[test]
fn test_garbage_packet_data() {
    let (mut a, _b, c) = setup();

    let mut packet = forged_packet(
        c.endpoint("channel-0"),
        a.endpoint("channel-1"),
        1,
        &packet_data("class", &["1"], "carol", "alice"),
    );
    packet.data = cosmwasm_std::Binary::from(b"not json".to_vec());
    let response = a.receive(&packet);
    assert_eq!(Ack::decode(&response.acknowledgement).unwrap().kind(), "error");
}

#[test]
fn test_failed_receive_changes_nothing() {
    let (mut a, _b, c) = setup();

    let first = packet_data("class", &["1"], "carol", "alice");
    a.receive(&forged_packet(
        c.endpoint("channel-0"),
        a.endpoint("channel-1"),
        1,
        &first,
    ));

    // "2" is minted before "1" collides with the existing token.
    let colliding = packet_data("class", &["2", "1"], "carol", "alice");
    let response = a.receive(&forged_packet(
        c.endpoint("channel-0"),
        a.endpoint("channel-1"),
        2,
        &colliding,
    ));
    assert_eq!(
        Ack::decode(&response.acknowledgement).unwrap(),
        Ack::error(
            ContractError::TokenAlreadyExists {
                class_id: "wasm.a/channel-1/class".to_string(),
                token_id: "1".to_string(),
            }
            .to_string()
        )
    );

    assert_eq!(a.owner_of("wasm.a/channel-1/class", "1"), Some("alice".to_string()));
    assert_eq!(a.owner_of("wasm.a/channel-1/class", "2"), None);
}

#[test]
fn test_uri_count_mismatch_rejected() {
    let (mut a, _b, c) = setup();

    let mut data = packet_data("class", &["1", "2"], "carol", "alice");
    data.token_uris = vec![None];
    let packet = forged_packet(c.endpoint("channel-0"), a.endpoint("channel-1"), 1, &data);
    let response = a.receive(&packet);
    assert_eq!(Ack::decode(&response.acknowledgement).unwrap().kind(), "error");

    let contract: Option<cosmwasm_std::Addr> = a.query(QueryMsg::NftContract {
        class_id: "wasm.a/channel-1/class".to_string(),
    });
    assert_eq!(contract, None);
}

// ============================================================================
// Acknowledgements
// ============================================================================

#[test]
fn test_simple_ack_fail() {
    let (mut a, mut b, _c) = setup();

    let packet = a
        .send_nft("alice", CLASS_A, &[TOKEN], "I am Invalid", "channel-0")
        .unwrap();
    let ack = relay(&mut a, &mut b, &packet);

    assert_eq!(ack.kind(), "error");
    assert_eq!(a.last_ack(), Some(ack));
    // Refunded.
    assert_eq!(a.owner_of(CLASS_A, TOKEN), Some("alice".to_string()));
    assert_eq!(b.owner_of("wasm.b/channel-0/nft-a", TOKEN), None);
}

#[test]
fn test_simple_ack_success() {
    let (mut a, mut b, _c) = setup();

    let packet = a
        .send_nft("alice", CLASS_A, &[TOKEN], "bob", "channel-0")
        .unwrap();
    let ack = relay(&mut a, &mut b, &packet);

    assert_eq!(ack, Ack::Success);
    assert_eq!(a.last_ack(), Some(Ack::Success));
}
