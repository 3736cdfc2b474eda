//! Property tests for the store and engine invariants

use proptest::prelude::*;
use procflow::{FieldMap, FieldValue, IndentNumber, RecordStatus, Stage, WorkflowContext};
use std::collections::HashSet;

fn vendor_fields(third_vendor: bool) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(
        "vendor1Name".to_string(),
        FieldValue::Text("Acme Forge".to_string()),
    );
    if third_vendor {
        fields.insert(
            "vendor3Name".to_string(),
            FieldValue::Text("Trident Alloys".to_string()),
        );
    }
    fields
}

proptest! {
    // However far a record is driven, history stages never decrease and
    // the record never moves backwards.
    #[test]
    fn history_stages_are_non_decreasing(
        third_vendor in any::<bool>(),
        advances in 0usize..20,
    ) {
        let mut ctx = WorkflowContext::new();
        let ids = ctx.create_indent(vec![vendor_fields(third_vendor)]).unwrap();
        let id = ids[0];

        for _ in 0..advances {
            if ctx.record(id).unwrap().status != RecordStatus::Pending {
                break;
            }
            ctx.move_to_next_stage(id).unwrap();
        }

        let record = ctx.record(id).unwrap();
        for pair in record.history.windows(2) {
            prop_assert!(pair[0].stage <= pair[1].stage);
        }
        if let Some(last) = record.history.last() {
            prop_assert!(last.stage <= record.stage);
        }
        if record.status == RecordStatus::Completed {
            prop_assert_eq!(record.stage, Stage::Completed);
        }
    }

    // Shallow merge is last-write-wins per key and never drops keys.
    #[test]
    fn merge_is_last_write_wins_and_keys_only_grow(
        writes in proptest::collection::vec(("[a-e]", -1000.0f64..1000.0), 1..40),
    ) {
        let mut ctx = WorkflowContext::new();
        let id = ctx.add_record(Stage::Approval, FieldMap::new());

        let mut expected: Vec<(String, f64)> = Vec::new();
        let mut seen_keys = 0usize;
        for (key, number) in &writes {
            let mut fields = FieldMap::new();
            fields.insert(key.clone(), FieldValue::Number(*number));
            ctx.update_record(id, fields).unwrap();

            match expected.iter_mut().find(|(k, _)| k == key) {
                Some((_, v)) => *v = *number,
                None => expected.push((key.clone(), *number)),
            }

            // Key count never shrinks across merges
            let len = ctx.record(id).unwrap().data.len();
            prop_assert!(len >= seen_keys);
            seen_keys = len;
        }

        let record = ctx.record(id).unwrap();
        prop_assert_eq!(record.data.len(), expected.len());
        for (key, number) in expected {
            prop_assert_eq!(record.data[&key].as_number(), Some(number));
        }
    }

    // Every record in the store keeps a distinct id, whatever the mix of
    // batches and direct creations.
    #[test]
    fn record_ids_stay_unique(
        batch_sizes in proptest::collection::vec(0usize..4, 0..6),
        direct in 0usize..5,
    ) {
        let mut ctx = WorkflowContext::new();
        for size in batch_sizes {
            ctx.create_indent(vec![FieldMap::new(); size]).unwrap();
        }
        for _ in 0..direct {
            ctx.add_record(Stage::CreateIndent, FieldMap::new());
        }

        let ids: Vec<_> = ctx.records().map(|record| record.id).collect();
        let unique: HashSet<_> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }

    // Indent numbers survive a render/parse round trip for any plausible
    // sequence and item index.
    #[test]
    fn indent_numbers_round_trip(sequence in 0u32..100_000, item in 0u32..10_000) {
        let number = IndentNumber::new(sequence, item);
        let parsed: IndentNumber = number.to_string().parse().unwrap();
        prop_assert_eq!(parsed, number);
    }
}
