use super::*;
use std::str::FromStr;

#[test]
fn test_typed_id_roundtrip() {
    let id = AccountId::new(42);
    assert_eq!(id.into_inner(), 42);
    assert_eq!(AccountId::from(42), id);
}

#[test]
fn test_typed_id_display() {
    assert_eq!(JournalEntryId::new(7).to_string(), "7");
}

#[test]
fn test_typed_id_from_str() {
    assert_eq!(AccountId::from_str("15").unwrap(), AccountId::new(15));
    assert_eq!(AccountId::from_str(" 15 ").unwrap(), AccountId::new(15));
}

#[test]
fn test_typed_id_from_str_error() {
    let err = JournalEntryId::from_str("abc").unwrap_err();
    assert_eq!(err, InvalidId("abc".to_string()));
    assert!(JournalEntryId::from_str("1.5").is_err());
    assert!(JournalEntryId::from_str("").is_err());
}

#[test]
fn test_typed_id_serde_transparent() {
    let json = serde_json::to_string(&TransactionId::new(3)).unwrap();
    assert_eq!(json, "3");
    let id: TransactionId = serde_json::from_str("9").unwrap();
    assert_eq!(id, TransactionId::new(9));
}
