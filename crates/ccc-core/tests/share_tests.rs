use ccc_catalog::{builtin, CascadeLevel};
use ccc_core::{decode_url, reduce, Action, DecodeError, Selection, ShareEncoder, ShareParams};
use ccc_test_utils::{apply_all, arb_selection, complete_cascade_actions};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const BASE: &str = "http://bhp-qr-code-evolve-platform-prototype1.burnsred.com.au/";

#[test]
fn test_partial_selection_encodes_empty_strings() {
    let c = builtin();
    let s = reduce(Selection::new(), &Action::level(CascadeLevel::Operation, "NMKM"), c);
    let s = reduce(s, &Action::level(CascadeLevel::Control, "30000000"), c);

    let url = ShareEncoder::new(BASE).encode(&s).unwrap();
    assert!(url.starts_with(&format!("{BASE}?params=")));

    let params = decode_url(&url).unwrap();
    assert_eq!(
        params,
        ShareParams {
            operation: "NMKM".into(),
            lead_observer: String::new(),
            risk_selected: "30000000".into(),
            control_framework_selected: String::new(),
            operating_contexts: String::new(),
            equipment_selected: String::new(),
        }
    );
}

#[test]
fn test_token_json_key_order() {
    let s = apply_all(&complete_cascade_actions(), builtin());
    let token = ShareParams::from_selection(&s).to_token().unwrap();
    use base64::Engine;
    let json = String::from_utf8(base64::engine::general_purpose::STANDARD.decode(token).unwrap()).unwrap();
    assert_eq!(
        json,
        r#"{"operation":"NMKM","leadObserver":"","riskSelected":"30000000","controlFrameworkSelected":"31000000","operatingContexts":"31200000","equipmentSelected":"31140000"}"#
    );
}

#[test]
fn test_decode_rejects_foreign_urls() {
    assert!(matches!(decode_url("not a url"), Err(DecodeError::InvalidUrl(_))));
    assert!(matches!(decode_url("https://a.example/?q=1"), Err(DecodeError::MissingParams)));
    assert!(decode_url("https://a.example/?params=%%%").is_err());
}

proptest! {
    #[test]
    fn prop_round_trip(s in arb_selection()) {
        let url = ShareEncoder::new(BASE).encode(&s).unwrap();
        prop_assert_eq!(decode_url(&url).unwrap(), ShareParams::from_selection(&s));
    }

    #[test]
    fn prop_equal_selections_give_equal_urls(s in arb_selection()) {
        let encoder = ShareEncoder::new(BASE);
        prop_assert_eq!(encoder.encode(&s).unwrap(), encoder.encode(&s.clone()).unwrap());
    }
}
