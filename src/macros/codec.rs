//! JSON mapping for the macro file
//!
//! The file is a JSON array of macro objects:
//!
//! ```json
//! [{ "name": "test", "enabled": true, "key": -1,
//!    "actions": [{ "type": "command", "command": "/say hello" }] }]
//! ```
//!
//! Parsing happens in two steps so the store can tell a corrupt document
//! (not a JSON array at all) apart from a well-formed array holding a macro
//! it cannot decode.

use super::types::Macro;
use serde_json::Value;

/// Parse the document into its raw array elements
pub fn parse_document(text: &str) -> serde_json::Result<Vec<Value>> {
    serde_json::from_str(text)
}

/// Decode one array element into a macro.
///
/// Fails on missing fields, wrong field types and unknown action types.
pub fn decode_macro(value: Value) -> serde_json::Result<Macro> {
    serde_json::from_value(value)
}

pub fn encode_macro(m: &Macro) -> serde_json::Result<Value> {
    serde_json::to_value(m)
}

/// Serialize the whole list as the file body
pub fn encode_macros(macros: &[Macro]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(macros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::types::{Action, UNBOUND_KEY};
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_encode_schema() {
        let m = Macro::from_commands("greet", ["/say hi"]).with_key(72);

        assert_eq!(
            encode_macro(&m).unwrap(),
            json!({
                "name": "greet",
                "enabled": true,
                "key": 72,
                "actions": [{ "type": "command", "command": "/say hi" }]
            })
        );
    }

    #[test]
    fn test_decode_accepts_legacy_data_field() {
        let m = decode_macro(json!({
            "name": "old",
            "enabled": false,
            "key": UNBOUND_KEY,
            "actions": [{ "type": "command", "data": "/weather clear" }]
        }))
        .unwrap();

        assert_eq!(m.actions, vec![Action::command("/weather clear")]);
        assert!(!m.enabled);
    }

    #[test]
    fn test_decode_rejects_unknown_action_type() {
        let err = decode_macro(json!({
            "name": "tp",
            "enabled": true,
            "key": 84,
            "actions": [{ "type": "teleport", "x": 0, "y": 64, "z": 0 }]
        }))
        .unwrap_err();

        assert!(err.to_string().contains("teleport"));
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        let result = decode_macro(json!({ "name": "incomplete", "enabled": true }));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_document_requires_array() {
        assert!(parse_document("[]").unwrap().is_empty());
        assert!(parse_document("{\"name\": \"x\"}").is_err());
        assert!(parse_document("not json").is_err());
    }

    fn arb_macro() -> impl Strategy<Value = Macro> {
        (
            ".*",
            any::<bool>(),
            prop_oneof![Just(UNBOUND_KEY), 0..512i32],
            prop::collection::vec(".*", 0..6),
        )
            .prop_map(|(name, enabled, key, commands)| Macro {
                enabled,
                ..Macro::from_commands(name, commands).with_key(key)
            })
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(m in arb_macro()) {
            let decoded = decode_macro(encode_macro(&m).unwrap()).unwrap();
            prop_assert_eq!(decoded, m);
        }

        #[test]
        fn prop_document_round_trip(macros in prop::collection::vec(arb_macro(), 0..4)) {
            let text = encode_macros(&macros).unwrap();
            let decoded = parse_document(&text)
                .unwrap()
                .into_iter()
                .map(decode_macro)
                .collect::<serde_json::Result<Vec<_>>>()
                .unwrap();
            prop_assert_eq!(decoded, macros);
        }
    }
}
