//! Token transfer rows.
//!
//! Unlike the flat schemas, a transfer nests its asset in the last field:
//!
//! ```text
//! transfers = id:address:addressOrEns:chainId:assetType:asset (;-separated)
//! transfer  =    address:addressOrEns:chainId:assetType:asset
//! asset     = assetAddress|n1|n2
//! ```
//!
//! For `erc20`, `n1` is the decimals and `n2` the quantity (float). For
//! `erc721` and `erc1155`, `n1` is the token id and `n2` the quantity
//! (integer). A row is kept only if its asset is complete: a known type, a
//! valid EVM asset address and both numbers present.

use query_state_codec::{RecordList, FIELD_DELIMITER, RECORD_DELIMITER, SENTINEL};
use query_state_util::{format_number, is_address, parse_float, parse_int};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parser::{Parser, WithDefault};

pub const TRANSFERS_KEY: &str = "transfers";
pub const TRANSFER_KEY: &str = "transfer";

const ASSET_DELIMITER: char = '|';

/// The token moved by a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "assetType", content = "asset", rename_all = "lowercase")]
pub enum TransferAsset {
    Erc20 {
        address: Option<String>,
        decimals: i64,
        quantity: f64,
    },
    Erc721 {
        address: Option<String>,
        #[serde(rename = "tokenId")]
        token_id: i64,
        quantity: i64,
    },
    Erc1155 {
        address: Option<String>,
        #[serde(rename = "tokenId")]
        token_id: i64,
        quantity: i64,
    },
}

impl TransferAsset {
    pub fn asset_type(&self) -> &'static str {
        match self {
            TransferAsset::Erc20 { .. } => "erc20",
            TransferAsset::Erc721 { .. } => "erc721",
            TransferAsset::Erc1155 { .. } => "erc1155",
        }
    }

    fn decode(asset_type: &str, raw: &str) -> Option<Self> {
        let mut parts = raw.split(ASSET_DELIMITER);
        let address = parts.next().filter(|address| *address != SENTINEL)?;
        if !is_address(address) {
            return None;
        }
        let address = Some(address.to_string());
        let first = parts.next().unwrap_or_default();
        let second = parts.next().unwrap_or_default();

        match asset_type {
            "erc20" => Some(TransferAsset::Erc20 {
                address,
                decimals: parse_int(first)?,
                quantity: parse_float(second)?,
            }),
            "erc721" => Some(TransferAsset::Erc721 {
                address,
                token_id: parse_int(first)?,
                quantity: parse_int(second)?,
            }),
            "erc1155" => Some(TransferAsset::Erc1155 {
                address,
                token_id: parse_int(first)?,
                quantity: parse_int(second)?,
            }),
            _ => None,
        }
    }

    fn encode(&self) -> String {
        let (address, first, second) = match self {
            TransferAsset::Erc20 {
                address,
                decimals,
                quantity,
            } => (address, decimals.to_string(), format_number(*quantity)),
            TransferAsset::Erc721 {
                address,
                token_id,
                quantity,
            }
            | TransferAsset::Erc1155 {
                address,
                token_id,
                quantity,
            } => (address, token_id.to_string(), quantity.to_string()),
        };
        format!(
            "{}{ASSET_DELIMITER}{first}{ASSET_DELIMITER}{second}",
            address.as_deref().unwrap_or(SENTINEL)
        )
    }
}

/// A transfer row: recipient, chain and asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub address: Option<String>,
    pub address_or_ens: Option<String>,
    pub chain_id: Option<i64>,
    #[serde(flatten)]
    pub asset: Option<TransferAsset>,
}

fn optional(raw: Option<&str>) -> Option<String> {
    raw.filter(|raw| *raw != SENTINEL).map(str::to_string)
}

impl TokenTransfer {
    /// Decode `address:addressOrEns:chainId:assetType:asset`.
    fn decode(parts: &[&str]) -> Option<Self> {
        let field = |i: usize| parts.get(i).copied();
        let asset_type = field(3).unwrap_or(SENTINEL);
        let asset = TransferAsset::decode(asset_type, field(4).unwrap_or_default())?;
        Some(Self {
            address: optional(field(0)),
            address_or_ens: optional(field(1)),
            chain_id: field(2).and_then(parse_int),
            asset: Some(asset),
        })
    }

    fn encode(&self) -> String {
        let (asset_type, asset) = match &self.asset {
            Some(asset) => (asset.asset_type(), asset.encode()),
            None => (SENTINEL, String::new()),
        };
        let chain_id = self.chain_id.unwrap_or(0).to_string();
        [
            self.address.as_deref().unwrap_or(SENTINEL),
            self.address_or_ens.as_deref().unwrap_or(SENTINEL),
            chain_id.as_str(),
            asset_type,
            asset.as_str(),
        ]
        .join(&FIELD_DELIMITER.to_string())
    }
}

/// Parser for the `transfers` list.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransfersParser;

impl TransfersParser {
    pub fn parse(&self, raw: &str) -> RecordList<TokenTransfer> {
        let mut list = RecordList::new();
        for (position, token) in raw.split(RECORD_DELIMITER).enumerate() {
            if token.is_empty() {
                continue;
            }
            let parts: Vec<&str> = token.split(FIELD_DELIMITER).collect();
            let Some(transfer) = TokenTransfer::decode(&parts[1..]) else {
                debug!(key = TRANSFERS_KEY, record = position, "dropping incomplete transfer");
                continue;
            };
            if !list.place(parts[0], transfer) {
                debug!(
                    key = TRANSFERS_KEY,
                    record = position,
                    index = parts[0],
                    "dropping transfer with out-of-range index"
                );
            }
        }
        list
    }

    pub fn serialize(&self, list: &RecordList<TokenTransfer>) -> String {
        list.entries()
            .map(|(index, transfer)| format!("{index}{FIELD_DELIMITER}{}", transfer.encode()))
            .collect::<Vec<_>>()
            .join(&RECORD_DELIMITER.to_string())
    }
}

impl Parser for TransfersParser {
    type Value = RecordList<TokenTransfer>;

    fn parse(&self, raw: &str) -> Option<Self::Value> {
        Some(TransfersParser::parse(self, raw))
    }

    fn serialize(&self, value: &Self::Value) -> String {
        TransfersParser::serialize(self, value)
    }
}

/// Parser for the single `transfer` parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferParser;

impl Parser for TransferParser {
    type Value = TokenTransfer;

    fn parse(&self, raw: &str) -> Option<TokenTransfer> {
        if raw.is_empty() {
            return None;
        }
        let parts: Vec<&str> = raw.split(FIELD_DELIMITER).collect();
        let transfer = TokenTransfer::decode(&parts);
        if transfer.is_none() {
            debug!(key = TRANSFER_KEY, "dropping incomplete transfer");
        }
        transfer
    }

    fn serialize(&self, value: &TokenTransfer) -> String {
        value.encode()
    }
}

pub fn transfers_parser() -> WithDefault<TransfersParser> {
    TransfersParser.with_default(RecordList::new())
}

pub fn transfer_parser(initial: Option<TokenTransfer>) -> WithDefault<TransferParser> {
    TransferParser.with_default(initial.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";

    fn erc20_transfer() -> TokenTransfer {
        TokenTransfer {
            address: Some("0x1111111111111111111111111111111111111111".to_string()),
            address_or_ens: Some("alice.eth".to_string()),
            chain_id: Some(10),
            asset: Some(TransferAsset::Erc20 {
                address: Some(TOKEN.to_string()),
                decimals: 6,
                quantity: 1.5,
            }),
        }
    }

    #[test]
    fn test_transfers_erc20() {
        let raw = format!("0:0x1111111111111111111111111111111111111111:alice.eth:10:erc20:{TOKEN}|6|1.5");
        let list = TransfersParser.parse(&raw);
        assert_eq!(list.get(0), Some(&erc20_transfer()));
        assert_eq!(TransfersParser.serialize(&list), raw);
    }

    #[test]
    fn test_transfers_nft_and_hole() {
        let raw = format!("1:_:bob.eth:1:erc721:{TOKEN}|42|1");
        let list = TransfersParser.parse(&raw);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0), None);
        assert_eq!(
            list.get(1).and_then(|t| t.asset.clone()),
            Some(TransferAsset::Erc721 {
                address: Some(TOKEN.to_string()),
                token_id: 42,
                quantity: 1,
            })
        );
    }

    #[test]
    fn test_transfers_drop_incomplete() {
        let raw = format!(
            "0:_:_:1:erc20:0xnotanaddress|6|1;1:_:_:1:erc1155:{TOKEN}|x|1;2:_:_:1:erc777:{TOKEN}|1|1;3:_:_:1"
        );
        assert!(TransfersParser.parse(&raw).is_empty());
    }

    #[test]
    fn test_transfers_chain_id_unparsable() {
        let raw = format!("0:_:_:mainnet:erc1155:{TOKEN}|7|3");
        let list = TransfersParser.parse(&raw);
        assert_eq!(list.get(0).and_then(|t| t.chain_id), None);
        // An absent chain id serializes as 0.
        assert_eq!(TransfersParser.serialize(&list), format!("0:_:_:0:erc1155:{TOKEN}|7|3"));
    }

    #[test]
    fn test_transfer_without_asset_serializes_sentinel_type() {
        let transfer = TokenTransfer {
            address: Some("0xabc".to_string()),
            ..TokenTransfer::default()
        };
        assert_eq!(TransferParser.serialize(&transfer), "0xabc:_:0:_:");
        // Without an asset the row does not parse back.
        assert_eq!(Parser::parse(&TransferParser, "0xabc:_:0:_:"), None);
    }

    #[test]
    fn test_single_transfer() {
        let raw = format!("0x1111111111111111111111111111111111111111:alice.eth:10:erc20:{TOKEN}|6|1.5");
        assert_eq!(Parser::parse(&TransferParser, &raw), Some(erc20_transfer()));
        assert_eq!(Parser::parse(&TransferParser, ""), None);
    }

    #[test]
    fn test_transfer_parser_default() {
        let parser = transfer_parser(None);
        assert_eq!(parser.parse_server_side(Some("garbage")), TokenTransfer::default());
        let parser = transfer_parser(Some(erc20_transfer()));
        assert_eq!(parser.parse_server_side(None), erc20_transfer());
    }

    #[test]
    fn test_transfer_json_shape() {
        let json = serde_json::to_value(erc20_transfer()).unwrap();
        assert_eq!(json["assetType"], "erc20");
        assert_eq!(json["asset"]["decimals"], 6);
        assert_eq!(json["chainId"], 10);
    }
}
