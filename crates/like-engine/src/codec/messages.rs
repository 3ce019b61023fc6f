//! Protobuf messages exchanged with the game client API.
//!
//! Field numbers and scalar types must match the vendor schema exactly.

/// Body of a `LikeProfile` call.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LikeRequest {
    #[prost(uint64, tag = "1")]
    pub uid: u64,
    #[prost(string, tag = "2")]
    pub region: String,
}

/// Body of a `GetPlayerPersonalShow` call.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UidProbe {
    #[prost(uint64, tag = "1")]
    pub uid: u64,
    #[prost(uint64, tag = "2")]
    pub discriminator: u64,
}

/// Response of a `GetPlayerPersonalShow` call, reduced to the fields we read.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PlayerInfo {
    #[prost(message, optional, tag = "1")]
    pub account_info: Option<AccountInfo>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AccountInfo {
    #[prost(uint64, tag = "1")]
    pub uid: u64,
    #[prost(string, tag = "3")]
    pub nickname: String,
    #[prost(uint64, tag = "21")]
    pub likes: u64,
}
