//! The three list-valued form parameters.
//!
//! | Record | Key | Fields | Layout | Encoding |
//! |---|---|---|---|---|
//! | [`Owner`] | `owners` | `index:address:addressOrEns:weight` | indexed | plain |
//! | [`Asset`] | `assets` | `index:address:addressOrEns:weight` | indexed | `encodeURIComponent` |
//! | [`UserOperationPartial`] | `userOperations` | `chainId:initCode:callData` | appended | plain |
//!
//! Absent numeric fields serialize as a default (`1` for weight, `0` for chain
//! id) instead of `_`. An absent weight therefore reads back as `Some(1)`
//! after one round trip, and stays there.

use query_state_codec::{
    Encoding, FieldCursor, FieldSpec, FieldValue, Fields, Layout, ListCodec, QueryRecord,
    RecordList, Schema,
};
use serde::{Deserialize, Serialize};

use crate::parser::{Parser, WithDefault};

const WEIGHTED_ADDRESS_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("address"),
    FieldSpec::string("addressOrEns"),
    FieldSpec::int("weight", "1"),
];

pub const OWNERS: Schema = Schema {
    key: "owners",
    fields: WEIGHTED_ADDRESS_FIELDS,
    layout: Layout::Indexed,
    encoding: Encoding::Plain,
};

pub const ASSETS: Schema = Schema {
    key: "assets",
    fields: WEIGHTED_ADDRESS_FIELDS,
    layout: Layout::Indexed,
    encoding: Encoding::UriComponent,
};

pub const USER_OPERATIONS: Schema = Schema {
    key: "userOperations",
    fields: &[
        FieldSpec::int("chainId", "0"),
        FieldSpec::string("initCode"),
        FieldSpec::string("callData"),
    ],
    layout: Layout::Appended { required: "chainId" },
    encoding: Encoding::Plain,
};

/// A wallet owner row. Its index is its slot in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub address: Option<String>,
    pub address_or_ens: Option<String>,
    pub weight: Option<i64>,
}

/// An asset row. Same shape as [`Owner`], but the value is percent-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub address: Option<String>,
    pub address_or_ens: Option<String>,
    pub weight: Option<i64>,
}

/// The caller-supplied part of a user operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationPartial {
    pub chain_id: Option<i64>,
    pub init_code: Option<String>,
    pub call_data: Option<String>,
}

fn weighted_address_fields(
    address: &Option<String>,
    address_or_ens: &Option<String>,
    weight: Option<i64>,
) -> Fields {
    vec![
        address.clone().map(FieldValue::Str),
        address_or_ens.clone().map(FieldValue::Str),
        weight.map(FieldValue::Int),
    ]
}

impl QueryRecord for Owner {
    const SCHEMA: &'static Schema = &OWNERS;

    fn from_fields(fields: Fields) -> Self {
        let mut cursor = FieldCursor::new(fields);
        Self {
            address: cursor.string(),
            address_or_ens: cursor.string(),
            weight: cursor.int(),
        }
    }

    fn to_fields(&self) -> Fields {
        weighted_address_fields(&self.address, &self.address_or_ens, self.weight)
    }
}

impl QueryRecord for Asset {
    const SCHEMA: &'static Schema = &ASSETS;

    fn from_fields(fields: Fields) -> Self {
        let mut cursor = FieldCursor::new(fields);
        Self {
            address: cursor.string(),
            address_or_ens: cursor.string(),
            weight: cursor.int(),
        }
    }

    fn to_fields(&self) -> Fields {
        weighted_address_fields(&self.address, &self.address_or_ens, self.weight)
    }
}

impl QueryRecord for UserOperationPartial {
    const SCHEMA: &'static Schema = &USER_OPERATIONS;

    fn from_fields(fields: Fields) -> Self {
        let mut cursor = FieldCursor::new(fields);
        Self {
            chain_id: cursor.int(),
            init_code: cursor.string(),
            call_data: cursor.string(),
        }
    }

    fn to_fields(&self) -> Fields {
        vec![
            self.chain_id.map(FieldValue::Int),
            self.init_code.clone().map(FieldValue::Str),
            self.call_data.clone().map(FieldValue::Str),
        ]
    }
}

pub fn owners_parser() -> WithDefault<ListCodec<Owner>> {
    ListCodec::new().with_default(RecordList::new())
}

pub fn assets_parser() -> WithDefault<ListCodec<Asset>> {
    ListCodec::new().with_default(RecordList::new())
}

pub fn user_operations_parser() -> WithDefault<ListCodec<UserOperationPartial>> {
    ListCodec::new().with_default(RecordList::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(address: Option<&str>, weight: Option<i64>) -> Owner {
        Owner {
            address: address.map(str::to_string),
            address_or_ens: None,
            weight,
        }
    }

    #[test]
    fn test_owner_sentinel_symmetry() {
        let codec = ListCodec::<Owner>::new();
        let list = codec.parse("0:_:_:1");
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(0), Some(&owner(None, Some(1))));

        let list: RecordList<Owner> = [owner(None, Some(1))].into_iter().collect();
        assert_eq!(codec.serialize(&list), "0:_:_:1");
    }

    #[test]
    fn test_owner_index_hole() {
        let list = ListCodec::<Owner>::new().parse("2:0xabc:_:3");
        assert_eq!(list.len(), 3);
        assert_eq!(list.get(0), None);
        assert_eq!(list.get(1), None);
        assert_eq!(list.get(2), Some(&owner(Some("0xabc"), Some(3))));
    }

    #[test]
    fn test_owner_malformed_token() {
        let list = ListCodec::<Owner>::new().parse("abc");
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(0), Some(&Owner::default()));
    }

    #[test]
    fn test_owner_weight_default_asymmetry() {
        let codec = ListCodec::<Owner>::new();
        // Parse keeps an unparsable weight absent...
        let parsed = codec.parse("0:0xabc:_:heavy");
        assert_eq!(parsed.get(0).and_then(|o| o.weight), None);
        // ...but serialize writes the default, so the next parse sees 1.
        let once = codec.serialize(&parsed);
        assert_eq!(once, "0:0xabc:_:1");
        let reparsed = codec.parse(&once);
        assert_eq!(reparsed.get(0).and_then(|o| o.weight), Some(1));
        assert_eq!(codec.serialize(&reparsed), once);
    }

    #[test]
    fn test_owner_serialize_keeps_slots() {
        let list = RecordList::from_slots(vec![
            None,
            Some(owner(Some("0x1"), Some(2))),
            None,
            Some(owner(None, None)),
        ]);
        assert_eq!(
            ListCodec::<Owner>::new().serialize(&list),
            "1:0x1:_:2;3:_:_:1"
        );
    }

    #[test]
    fn test_asset_percent_encoded() {
        let codec = ListCodec::<Asset>::new();
        let list: RecordList<Asset> = [Asset {
            address: Some("0xdead".to_string()),
            address_or_ens: None,
            weight: Some(2),
        }]
        .into_iter()
        .collect();
        let encoded = codec.serialize(&list);
        assert_eq!(encoded, "0%3A0xdead%3A_%3A2");
        assert_eq!(codec.parse(&encoded), list);
    }

    #[test]
    fn test_asset_bad_escape_is_empty() {
        assert!(ListCodec::<Asset>::new().parse("0%3A%E0%A4%A").is_empty());
    }

    #[test]
    fn test_user_operation_filter() {
        let list = ListCodec::<UserOperationPartial>::new().parse("1:_:_;_:_:_;");
        assert_eq!(list.len(), 1);
        assert_eq!(
            list.get(0),
            Some(&UserOperationPartial {
                chain_id: Some(1),
                init_code: None,
                call_data: None,
            })
        );
    }

    #[test]
    fn test_user_operation_serialize() {
        let list = RecordList::from_slots(vec![
            Some(UserOperationPartial {
                chain_id: Some(137),
                init_code: None,
                call_data: Some("0xb61d27f6".to_string()),
            }),
            None,
            Some(UserOperationPartial::default()),
        ]);
        assert_eq!(
            ListCodec::<UserOperationPartial>::new().serialize(&list),
            "137:_:0xb61d27f6;0:_:_"
        );
    }

    #[test]
    fn test_parsers_default_empty() {
        assert!(owners_parser().parse_server_side(None).is_empty());
        assert!(assets_parser().parse_server_side(None).is_empty());
        assert!(user_operations_parser().parse_server_side(Some("")).is_empty());
    }

    #[test]
    fn test_records_serialize_camel_case() {
        let list = ListCodec::<Owner>::new().parse("1:0xabc:alice.eth:2");
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                null,
                {"address": "0xabc", "addressOrEns": "alice.eth", "weight": 2}
            ])
        );
    }
}
