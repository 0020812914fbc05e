// Property-based tests for the transformation engine.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use proptest::strategy::{BoxedStrategy, Union};

use rowforge_engine::{apply, replay, replay_states, Action, CaseMode, FilterCondition, MathOp, SortDirection, Table, Value};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn headers() -> Vec<String> {
    vec!["name".to_string(), "amount".to_string(), "note".to_string()]
}

/// Arbitrary cell: mostly text or numbers, sometimes null or blank text.
fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => (-1_000_000i64..1_000_000i64).prop_map(|n| Value::Number(n as f64 / 100.0)),
        3 => "[a-zA-Z ]{0,12}".prop_map(Value::Text),
        1 => Just(Value::Null),
        1 => Just(Value::Text(String::new())),
    ]
}

fn arb_table(max_rows: usize) -> impl Strategy<Value = Table> {
    proptest::collection::vec((arb_value(), arb_value(), arb_value()), 0..=max_rows).prop_map(
        |cells| {
            let columns = headers();
            let rows = cells
                .into_iter()
                .map(|(name, amount, note)| {
                    columns
                        .iter()
                        .cloned()
                        .zip([name, amount, note])
                        .collect()
                })
                .collect();
            Table::new(columns, rows)
        },
    )
}

/// One arbitrary action over the known column set. Actions may reference a
/// column a previous action has dropped or renamed — the interpreter's
/// edge-case policies must absorb that.
fn arb_action() -> impl Strategy<Value = Action> {
    let col = || {
        prop_oneof![Just("name"), Just("amount"), Just("note")].prop_map(str::to_string)
    };
    let arms: Vec<BoxedStrategy<Action>> = vec![
        col().prop_map(|col| Action::DropColumn { col }).boxed(),
        col()
            .prop_map(|col| Action::Rename { col, new_name: "renamed".into() })
            .boxed(),
        Just(Action::AddIndex).boxed(),
        (0usize..5).prop_map(|count| Action::DropTopRows { count }).boxed(),
        Just(Action::SmartClean).boxed(),
        Just(Action::DropDuplicates).boxed(),
        col().prop_map(|col| Action::FillDown { col }).boxed(),
        col()
            .prop_map(|col| Action::FillNulls { col, value: "filled".into() })
            .boxed(),
        col().prop_map(|col| Action::Trim { col }).boxed(),
        col().prop_map(|col| Action::CleanSymbols { col }).boxed(),
        col()
            .prop_map(|col| Action::CaseChange { col, mode: CaseMode::Title })
            .boxed(),
        col()
            .prop_map(|col| Action::Split { col, delimiter: " ".into() })
            .boxed(),
        Just(Action::MergeColumns {
            col1: "name".into(),
            col2: "note".into(),
            separator: "-".into(),
        })
        .boxed(),
        Just(Action::CalcMath {
            col1: "amount".into(),
            col2: "amount".into(),
            op: MathOp::Div,
            target: "ratio".into(),
        })
        .boxed(),
        (col(), prop::bool::ANY)
            .prop_map(|(col, asc)| Action::Sort {
                col,
                direction: if asc { SortDirection::Ascending } else { SortDirection::Descending },
            })
            .boxed(),
        col()
            .prop_map(|col| Action::Filter {
                col,
                condition: FilterCondition::Contains,
                value: "a".into(),
            })
            .boxed(),
        col().prop_map(|col| Action::Duplicate { col }).boxed(),
        Just(Action::PromoteHeaders).boxed(),
    ];
    Union::new(arms)
}

fn arb_log(max_len: usize) -> impl Strategy<Value = Vec<Action>> {
    proptest::collection::vec(arb_action(), 0..=max_len)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    /// Batch replay and one-at-a-time incremental application agree exactly.
    #[test]
    fn replay_equals_incremental_fold(table in arb_table(20), actions in arb_log(8)) {
        let batch = replay(&table, &actions);
        let incremental = actions.iter().fold(table.clone(), |t, a| apply(&t, a));
        prop_assert_eq!(batch, incremental);
    }

    /// Applying the same action to the same table twice yields identical output.
    #[test]
    fn apply_is_deterministic(table in arb_table(20), action in arb_action()) {
        let first = apply(&table, &action);
        let second = apply(&table, &action);
        prop_assert_eq!(first, second);
    }

    /// The input table is never mutated.
    #[test]
    fn apply_leaves_input_untouched(table in arb_table(20), action in arb_action()) {
        let before = table.clone();
        let _ = apply(&table, &action);
        prop_assert_eq!(table, before);
    }

    /// Deduplication is idempotent.
    #[test]
    fn drop_duplicates_idempotent(table in arb_table(20)) {
        let once = apply(&table, &Action::DropDuplicates);
        let twice = apply(&once, &Action::DropDuplicates);
        prop_assert_eq!(once, twice);
    }

    /// SmartClean stabilizes after one application.
    #[test]
    fn smart_clean_idempotent(table in arb_table(20)) {
        let once = apply(&table, &Action::SmartClean);
        let twice = apply(&once, &Action::SmartClean);
        prop_assert_eq!(once, twice);
    }

    /// DropColumn shrinks the column list by exactly one (or zero when absent).
    #[test]
    fn drop_column_count(table in arb_table(10)) {
        let hit = apply(&table, &Action::DropColumn { col: "name".into() });
        prop_assert_eq!(hit.column_count(), table.column_count() - 1);
        let miss = apply(&table, &Action::DropColumn { col: "no_such".into() });
        prop_assert_eq!(miss.column_count(), table.column_count());
    }

    /// Pre-action states line up with the log and chain through `apply`.
    #[test]
    fn replay_states_chain(table in arb_table(15), actions in arb_log(6)) {
        let (fin, states) = replay_states(&table, &actions);
        prop_assert_eq!(states.len(), actions.len());
        for i in 0..actions.len() {
            let next = apply(&states[i], &actions[i]);
            if i + 1 < actions.len() {
                prop_assert_eq!(&next, &states[i + 1]);
            } else {
                prop_assert_eq!(&next, &fin);
            }
        }
        if actions.is_empty() {
            prop_assert_eq!(fin, table);
        }
    }

    /// Sorting twice in the same direction is idempotent.
    #[test]
    fn sort_idempotent(table in arb_table(20)) {
        let action = Action::Sort { col: "amount".into(), direction: SortDirection::Ascending };
        let once = apply(&table, &action);
        let twice = apply(&once, &action);
        prop_assert_eq!(once, twice);
    }
}
