//! Shared harness for the IBC integration tests.
//!
//! Each `Chain` is one bridge instance with its own mock storage. There is no
//! real IBC stack: tests open channels by calling the handshake entry points
//! on both ends, and relay packets by pulling `IbcMsg::SendPacket` out of the
//! sender's response and calling the receive, ack and timeout entry points
//! directly.

#![allow(dead_code)]

use common::{Ack, NonFungibleTokenPacketData};
use cosmwasm_std::testing::{
    mock_dependencies, mock_env, mock_info, MockApi, MockQuerier, MockStorage,
};
use cosmwasm_std::{
    from_json, Addr, Binary, CosmosMsg, Env, IbcAcknowledgement, IbcBasicResponse, IbcChannel,
    IbcChannelCloseMsg, IbcChannelConnectMsg, IbcChannelOpenMsg, IbcEndpoint, IbcMsg, IbcOrder,
    IbcPacket, IbcPacketAckMsg, IbcPacketReceiveMsg, IbcPacketTimeoutMsg, IbcReceiveResponse,
    IbcTimeout, OwnedDeps, Response, Timestamp,
};
use serde::de::DeserializeOwned;

use nft_bridge::contract::{execute, instantiate, query};
use nft_bridge::ibc::{
    ibc_channel_close, ibc_channel_connect, ibc_channel_open, ibc_packet_ack, ibc_packet_receive,
    ibc_packet_timeout,
};
use nft_bridge::msg::{ExecuteMsg, InstantiateMsg, OwnerOfResponse, QueryMsg};
use nft_bridge::state::IBC_VERSION;
use nft_bridge::ContractError;

pub const ADMIN: &str = "admin";
pub const RELAYER: &str = "relayer";
pub const CLASS_URI: &str = "https://metadata-url.com/my-metadata";
pub const TOKEN_URI: &str = "https://metadata-url.com/my-metadata1";

// ============================================================================
// Chains
// ============================================================================

pub struct Chain {
    pub deps: OwnedDeps<MockStorage, MockApi, MockQuerier>,
    pub env: Env,
    pub port: String,
}

impl Chain {
    /// A freshly instantiated bridge listening on port `wasm.{name}`.
    pub fn new(name: &str) -> Self {
        let mut deps = mock_dependencies();
        let env = mock_env();
        instantiate(
            deps.as_mut(),
            env.clone(),
            mock_info(ADMIN, &[]),
            InstantiateMsg {
                admin: ADMIN.to_string(),
                default_timeout_seconds: None,
            },
        )
        .unwrap();

        Chain {
            deps,
            env,
            port: format!("wasm.{}", name),
        }
    }

    pub fn bridge(&self) -> Addr {
        self.env.contract.address.clone()
    }

    pub fn endpoint(&self, channel_id: &str) -> IbcEndpoint {
        IbcEndpoint {
            port_id: self.port.clone(),
            channel_id: channel_id.to_string(),
        }
    }

    pub fn execute(&mut self, sender: &str, msg: ExecuteMsg) -> Result<Response, ContractError> {
        execute(
            self.deps.as_mut(),
            self.env.clone(),
            mock_info(sender, &[]),
            msg,
        )
    }

    pub fn query<T: DeserializeOwned>(&self, msg: QueryMsg) -> T {
        from_json(query(self.deps.as_ref(), self.env.clone(), msg).unwrap()).unwrap()
    }

    /// Creates a native class owned by `creator` and mints `token_ids` to
    /// `owner`.
    pub fn mint_native(&mut self, creator: &str, class_id: &str, token_ids: &[&str], owner: &str) {
        self.execute(
            creator,
            ExecuteMsg::CreateClass {
                class_id: class_id.to_string(),
                class_uri: Some(CLASS_URI.to_string()),
            },
        )
        .unwrap();
        for token_id in token_ids {
            self.execute(
                creator,
                ExecuteMsg::Mint {
                    class_id: class_id.to_string(),
                    token_id: token_id.to_string(),
                    token_uri: Some(TOKEN_URI.to_string()),
                    owner: owner.to_string(),
                },
            )
            .unwrap();
        }
    }

    /// Owner of a token, or `None` if it does not exist here.
    pub fn owner_of(&self, class_id: &str, token_id: &str) -> Option<String> {
        query(
            self.deps.as_ref(),
            self.env.clone(),
            QueryMsg::OwnerOf {
                class_id: class_id.to_string(),
                token_id: token_id.to_string(),
            },
        )
        .ok()
        .map(|bin| from_json::<OwnerOfResponse>(bin).unwrap().owner.to_string())
    }

    pub fn last_ack(&self) -> Option<Ack> {
        self.query(QueryMsg::LastAck {})
    }

    /// Sends tokens and returns the packet the host would emit.
    pub fn send_nft(
        &mut self,
        sender: &str,
        class_id: &str,
        token_ids: &[&str],
        receiver: &str,
        channel_id: &str,
    ) -> Result<IbcPacket, ContractError> {
        let response = self.execute(
            sender,
            ExecuteMsg::SendNft {
                class_id: class_id.to_string(),
                token_ids: token_ids.iter().map(|id| id.to_string()).collect(),
                receiver: receiver.to_string(),
                channel_id: channel_id.to_string(),
                timeout_seconds: None,
            },
        )?;
        Ok(self.emitted_packet(&response))
    }

    /// Turns the `SendPacket` message of a response into the packet the
    /// counterparty would receive.
    pub fn emitted_packet(&self, response: &Response) -> IbcPacket {
        let sequence: u64 = response
            .attributes
            .iter()
            .find(|attr| attr.key == "sequence")
            .map(|attr| attr.value.parse().unwrap())
            .unwrap();

        let (channel_id, data, timeout) = response
            .messages
            .iter()
            .find_map(|sub| match &sub.msg {
                CosmosMsg::Ibc(IbcMsg::SendPacket {
                    channel_id,
                    data,
                    timeout,
                    ..
                }) => Some((channel_id.clone(), data.clone(), timeout.clone())),
                _ => None,
            })
            .unwrap();

        let channel: nft_bridge::msg::ChannelResponse = self.query(QueryMsg::Channel {
            channel_id: channel_id.clone(),
        });
        IbcPacket::new(
            data,
            self.endpoint(&channel_id),
            IbcEndpoint {
                port_id: channel.counterparty_port,
                channel_id: channel.counterparty_channel_id,
            },
            sequence,
            timeout,
        )
    }

    // ========================================================================
    // IBC entry points
    // ========================================================================

    pub fn receive(&mut self, packet: &IbcPacket) -> IbcReceiveResponse {
        ibc_packet_receive(
            self.deps.as_mut(),
            self.env.clone(),
            IbcPacketReceiveMsg::new(packet.clone(), Addr::unchecked(RELAYER)),
        )
        .unwrap()
    }

    pub fn acknowledge(
        &mut self,
        packet: &IbcPacket,
        ack: Binary,
    ) -> Result<IbcBasicResponse, ContractError> {
        ibc_packet_ack(
            self.deps.as_mut(),
            self.env.clone(),
            IbcPacketAckMsg::new(
                IbcAcknowledgement::new(ack),
                packet.clone(),
                Addr::unchecked(RELAYER),
            ),
        )
    }

    pub fn timeout(&mut self, packet: &IbcPacket) -> Result<IbcBasicResponse, ContractError> {
        ibc_packet_timeout(
            self.deps.as_mut(),
            self.env.clone(),
            IbcPacketTimeoutMsg::new(packet.clone(), Addr::unchecked(RELAYER)),
        )
    }

    pub fn close_confirm(
        &mut self,
        channel_id: &str,
        counterparty: &IbcEndpoint,
    ) -> Result<IbcBasicResponse, ContractError> {
        let channel = ibc_channel(self.endpoint(channel_id), counterparty.clone());
        ibc_channel_close(
            self.deps.as_mut(),
            self.env.clone(),
            IbcChannelCloseMsg::new_confirm(channel),
        )
    }

    pub fn close_init(
        &mut self,
        channel_id: &str,
        counterparty: &IbcEndpoint,
    ) -> Result<IbcBasicResponse, ContractError> {
        let channel = ibc_channel(self.endpoint(channel_id), counterparty.clone());
        ibc_channel_close(
            self.deps.as_mut(),
            self.env.clone(),
            IbcChannelCloseMsg::new_init(channel),
        )
    }
}

pub fn ibc_channel(endpoint: IbcEndpoint, counterparty: IbcEndpoint) -> IbcChannel {
    IbcChannel::new(
        endpoint,
        counterparty,
        IbcOrder::Unordered,
        IBC_VERSION,
        "connection-0",
    )
}

/// Runs the channel handshake between `a` and `b`.
pub fn connect(a: &mut Chain, a_channel: &str, b: &mut Chain, b_channel: &str) {
    let a_side = ibc_channel(a.endpoint(a_channel), b.endpoint(b_channel));
    let b_side = ibc_channel(b.endpoint(b_channel), a.endpoint(a_channel));

    ibc_channel_open(
        a.deps.as_mut(),
        a.env.clone(),
        IbcChannelOpenMsg::new_init(a_side.clone()),
    )
    .unwrap();
    ibc_channel_open(
        b.deps.as_mut(),
        b.env.clone(),
        IbcChannelOpenMsg::new_try(b_side.clone(), IBC_VERSION),
    )
    .unwrap();
    ibc_channel_connect(
        a.deps.as_mut(),
        a.env.clone(),
        IbcChannelConnectMsg::new_ack(a_side, IBC_VERSION),
    )
    .unwrap();
    ibc_channel_connect(
        b.deps.as_mut(),
        b.env.clone(),
        IbcChannelConnectMsg::new_confirm(b_side),
    )
    .unwrap();
}

// ============================================================================
// Relaying
// ============================================================================

/// Delivers `packet` to `to` and its ack back to `from`. Returns the ack.
pub fn relay(from: &mut Chain, to: &mut Chain, packet: &IbcPacket) -> Ack {
    let response = to.receive(packet);
    from.acknowledge(packet, response.acknowledgement.clone())
        .unwrap();
    Ack::decode(&response.acknowledgement).unwrap()
}

/// Builds a packet by hand, as a misbehaving counterparty could.
pub fn forged_packet(
    src: IbcEndpoint,
    dest: IbcEndpoint,
    sequence: u64,
    data: &NonFungibleTokenPacketData,
) -> IbcPacket {
    IbcPacket::new(
        data.encode().unwrap(),
        src,
        dest,
        sequence,
        IbcTimeout::with_timestamp(Timestamp::from_seconds(4_000_000_000)),
    )
}

pub fn packet_data(
    class_id: &str,
    token_ids: &[&str],
    sender: &str,
    receiver: &str,
) -> NonFungibleTokenPacketData {
    NonFungibleTokenPacketData {
        class_id: class_id.to_string(),
        class_uri: Some(CLASS_URI.to_string()),
        token_ids: token_ids.iter().map(|id| id.to_string()).collect(),
        token_uris: token_ids.iter().map(|_| Some(TOKEN_URI.to_string())).collect(),
        sender: sender.to_string(),
        receiver: receiver.to_string(),
    }
}

/// Value of the first attribute named `key`.
pub fn attr<'a>(attributes: &'a [cosmwasm_std::Attribute], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attr| attr.key == key)
        .map(|attr| attr.value.as_str())
}
