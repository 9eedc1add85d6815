//! Property-based tests for journal entry validation and review.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use tally_shared::types::UserId;

use crate::journal::error::JournalError;
use crate::journal::types::{DraftLine, JournalEntryDraft, JournalEntryStatus};
use crate::journal::validation::validate_draft;
use crate::journal::workflow::JournalWorkflow;
use crate::ledger::EntryType;

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn arb_side() -> impl Strategy<Value = EntryType> {
    prop_oneof![Just(EntryType::Debit), Just(EntryType::Credit)]
}

fn arb_status() -> impl Strategy<Value = JournalEntryStatus> {
    prop_oneof![
        Just(JournalEntryStatus::Pending),
        Just(JournalEntryStatus::Approved),
        Just(JournalEntryStatus::Rejected),
    ]
}

fn draft_of(lines: &[(EntryType, Decimal)]) -> JournalEntryDraft {
    JournalEntryDraft {
        description: Some("generated".into()),
        date: NaiveDate::from_ymd_opt(2026, 1, 31),
        is_adjusting: None,
        user_id: Some(1),
        transactions: Some(
            lines
                .iter()
                .enumerate()
                .map(|(i, (side, amount))| DraftLine {
                    account_id: Some(json!(i + 1)),
                    entry_type: Some(side.as_str().to_string()),
                    amount: Some(*amount),
                    description: None,
                    date: None,
                })
                .collect(),
        ),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every accepted entry has debits equal to credits, exactly.
    #[test]
    fn prop_accepted_entries_balance(
        lines in prop::collection::vec((arb_side(), arb_amount()), 1..12)
    ) {
        let debits: Decimal = lines.iter().filter(|(s, _)| *s == EntryType::Debit).map(|(_, a)| *a).sum();
        let credits: Decimal = lines.iter().filter(|(s, _)| *s == EntryType::Credit).map(|(_, a)| *a).sum();

        match validate_draft(draft_of(&lines)) {
            Ok(entry) => {
                prop_assert_eq!(debits, credits);
                prop_assert_eq!(entry.total, debits);
            }
            Err(JournalError::Unbalanced { debit_total, credit_total }) => {
                prop_assert_ne!(debits, credits);
                prop_assert_eq!(debit_total, debits);
                prop_assert_eq!(credit_total, credits);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    /// A mirrored entry (each debit matched by a credit of the same amount) is accepted.
    #[test]
    fn prop_mirrored_entries_accepted(
        amounts in prop::collection::vec(arb_amount(), 1..8)
    ) {
        let lines: Vec<_> = amounts
            .iter()
            .flat_map(|a| [(EntryType::Debit, *a), (EntryType::Credit, *a)])
            .collect();
        let entry = validate_draft(draft_of(&lines));
        prop_assert!(entry.is_ok());
    }

    /// Only a pending entry can be approved or rejected.
    #[test]
    fn prop_only_pending_transitions(status in arb_status()) {
        let user = UserId::new(1);
        let approved = JournalWorkflow::approve(status, user);
        let rejected = JournalWorkflow::reject(status, user, "reason");
        prop_assert_eq!(approved.is_ok(), status == JournalEntryStatus::Pending);
        prop_assert_eq!(rejected.is_ok(), status == JournalEntryStatus::Pending);
    }

    /// Whitespace-only comments never reject an entry.
    #[test]
    fn prop_blank_comment_refused(spaces in "[ \t\n]{0,8}") {
        let result = JournalWorkflow::reject(JournalEntryStatus::Pending, UserId::new(1), &spaces);
        prop_assert!(matches!(result, Err(JournalError::CommentRequired)));
    }
}
