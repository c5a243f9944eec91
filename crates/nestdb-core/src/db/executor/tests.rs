use crate::{
    config::ExecutionConfig,
    db::{
        executor::{
            Cursor, CursorState, ExecutionContext, ExecutionTraceSink, OperatorKind,
            PhysicalOperator, TraceEvent,
        },
        row::Row,
        store::{Bindings, MemoryStore, StoreAdapter},
    },
    error::{ErrorClass, ErrorOrigin},
    model::{RowTypeId, RowTypeRef},
    test_support::{Coi, ScriptedAdapter},
    value::Value,
};
use proptest::prelude::*;
use std::cell::RefCell;

///
/// RecordingSink
///

#[derive(Default)]
struct RecordingSink {
    events: RefCell<Vec<TraceEvent>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }
}

impl ExecutionTraceSink for RecordingSink {
    fn on_event(&self, event: TraceEvent) {
        self.events.borrow_mut().push(event);
    }
}

fn drain(cursor: &mut Cursor<'_>) -> Vec<Row> {
    let mut rows = Vec::new();
    while let Some(row) = cursor.next().expect("pull should succeed") {
        rows.push(row);
    }

    rows
}

// customer 1 with two orders, three items in total.
fn nested_stream(coi: &Coi) -> Vec<Row> {
    vec![
        coi.customer_row(1),
        coi.order_row(1, 10),
        coi.item_row(1, 10, 100),
        coi.order_row(1, 11),
        coi.item_row(1, 11, 110),
        coi.item_row(1, 11, 111),
    ]
}

fn execute(coi: &Coi, adapter: &dyn StoreAdapter, plan: &PhysicalOperator) -> Vec<Row> {
    ExecutionContext::new(&coi.schema, adapter)
        .execute(plan, &Bindings::empty())
        .expect("plan should execute")
}

// ----------------------------------------------------------------------
// Cut
// ----------------------------------------------------------------------

#[test]
fn cut_drops_everything_below_the_boundary() {
    let coi = Coi::new();
    let plan = PhysicalOperator::cut(
        &coi.schema,
        PhysicalOperator::values(nested_stream(&coi)),
        coi.order,
    );

    assert_eq!(
        execute(&coi, &MemoryStore::new(), &plan),
        vec![
            coi.customer_row(1),
            coi.order_row(1, 10),
            coi.order_row(1, 11)
        ]
    );
}

#[test]
fn cut_at_a_leaf_type_is_a_no_op() {
    let coi = Coi::new();
    let plan = PhysicalOperator::cut(
        &coi.schema,
        PhysicalOperator::values(nested_stream(&coi)),
        coi.item,
    );

    assert_eq!(
        execute(&coi, &MemoryStore::new(), &plan),
        nested_stream(&coi)
    );
}

#[test]
fn cut_at_root_keeps_roots_and_index_rows() {
    let coi = Coi::new();
    let input = vec![
        coi.customer_row(1),
        coi.address_row(1, 5),
        coi.item_entry("sku-1", 1, 10, 100),
        coi.order_row(1, 10),
        coi.customer_row(2),
    ];
    let plan = PhysicalOperator::cut(&coi.schema, PhysicalOperator::values(input), coi.customer);

    assert_eq!(
        execute(&coi, &MemoryStore::new(), &plan),
        vec![
            coi.customer_row(1),
            coi.item_entry("sku-1", 1, 10, 100),
            coi.customer_row(2)
        ]
    );
}

#[test]
fn cut_reject_set_is_strict_descendants() {
    let coi = Coi::new();
    let PhysicalOperator::Cut(plan) = PhysicalOperator::cut(
        &coi.schema,
        PhysicalOperator::values(Vec::new()),
        coi.customer,
    ) else {
        unreachable!("cut constructor builds a cut");
    };

    assert_eq!(plan.boundary(), coi.customer);
    assert_eq!(
        plan.reject().iter().collect::<Vec<_>>(),
        vec![coi.order, coi.item, coi.address]
    );
}

#[test]
#[should_panic(expected = "invariant violation: cut boundary #42 is not part of this schema")]
fn cut_boundary_must_belong_to_the_schema() {
    let coi = Coi::new();
    let _ = PhysicalOperator::cut(
        &coi.schema,
        PhysicalOperator::values(Vec::new()),
        RowTypeId::new(42),
    );
}

// ----------------------------------------------------------------------
// Cursor lifecycle
// ----------------------------------------------------------------------

#[test]
fn close_is_idempotent_and_releases_once() {
    let coi = Coi::new();
    let adapter = ScriptedAdapter::new(nested_stream(&coi));
    let probe = adapter.probe();
    let ctx = ExecutionContext::new(&coi.schema, &adapter);
    let plan = PhysicalOperator::cut(
        &coi.schema,
        PhysicalOperator::group_scan(&coi.schema, coi.customer),
        coi.order,
    );

    let mut cursor = ctx.cursor(&plan);
    assert_eq!(cursor.state(), CursorState::Idle);
    cursor.open(&Bindings::empty()).expect("open should succeed");
    assert!(cursor.next().expect("pull").is_some());

    cursor.close();
    cursor.close();
    assert_eq!(cursor.state(), CursorState::Closed);
    assert_eq!(probe.releases(), 1);

    drop(cursor);
    assert_eq!(probe.releases(), 1);
}

#[test]
fn auto_close_then_explicit_close_releases_once() {
    let coi = Coi::new();
    let adapter = ScriptedAdapter::new(nested_stream(&coi));
    let probe = adapter.probe();
    let ctx = ExecutionContext::new(&coi.schema, &adapter);
    let plan = PhysicalOperator::group_scan(&coi.schema, coi.customer);

    let mut cursor = ctx.cursor(&plan);
    cursor.open(&Bindings::empty()).expect("open should succeed");
    assert_eq!(drain(&mut cursor).len(), 6);
    assert_eq!(cursor.state(), CursorState::Closed);
    assert_eq!(probe.releases(), 1);

    cursor.close();
    assert_eq!(probe.releases(), 1);
}

#[test]
fn dropping_an_open_cursor_releases_its_stream() {
    let coi = Coi::new();
    let adapter = ScriptedAdapter::new(nested_stream(&coi));
    let probe = adapter.probe();
    let ctx = ExecutionContext::new(&coi.schema, &adapter);
    let plan = PhysicalOperator::limit(PhysicalOperator::group_scan(&coi.schema, coi.customer), 4);

    let mut cursor = ctx.cursor(&plan);
    cursor.open(&Bindings::empty()).expect("open should succeed");
    assert!(cursor.next().expect("pull").is_some());
    assert_eq!(probe.releases(), 0);

    drop(cursor);
    assert_eq!(probe.releases(), 1);
}

#[test]
fn exhausted_cursor_does_not_touch_its_input() {
    let coi = Coi::new();
    let adapter = ScriptedAdapter::new(nested_stream(&coi));
    let probe = adapter.probe();
    let ctx = ExecutionContext::new(&coi.schema, &adapter);
    let plan = PhysicalOperator::cut(
        &coi.schema,
        PhysicalOperator::group_scan(&coi.schema, coi.customer),
        coi.order,
    );

    let mut cursor = ctx.cursor(&plan);
    cursor.open(&Bindings::empty()).expect("open should succeed");
    drain(&mut cursor);
    let pulls = probe.pulls();

    assert_eq!(cursor.next().expect("closed cursor pull"), None);
    assert_eq!(cursor.next().expect("closed cursor pull"), None);
    assert_eq!(probe.pulls(), pulls);
}

#[test]
fn closed_cursor_reopens_and_replays() {
    let coi = Coi::new();
    let store = MemoryStore::new();
    let ctx = ExecutionContext::new(&coi.schema, &store);
    let plan = PhysicalOperator::values(nested_stream(&coi));

    let mut cursor = ctx.cursor(&plan);
    cursor.open(&Bindings::empty()).expect("first open");
    let first = drain(&mut cursor);
    cursor.open(&Bindings::empty()).expect("second open");
    let second = drain(&mut cursor);

    assert_eq!(first, second);
    assert_eq!(cursor.rows_returned(), 6);
}

#[test]
#[should_panic(expected = "invariant violation: next on a Cut cursor that was never opened")]
fn next_before_open_is_a_contract_violation() {
    let coi = Coi::new();
    let store = MemoryStore::new();
    let ctx = ExecutionContext::new(&coi.schema, &store);
    let plan = PhysicalOperator::cut(
        &coi.schema,
        PhysicalOperator::values(Vec::new()),
        coi.order,
    );

    let mut cursor = ctx.cursor(&plan);
    let _ = cursor.next();
}

#[test]
#[should_panic(expected = "invariant violation: Values cursor opened while already open")]
fn open_while_open_is_a_contract_violation() {
    let coi = Coi::new();
    let store = MemoryStore::new();
    let ctx = ExecutionContext::new(&coi.schema, &store);
    let plan = PhysicalOperator::values(nested_stream(&coi));

    let mut cursor = ctx.cursor(&plan);
    cursor.open(&Bindings::empty()).expect("first open");
    let _ = cursor.open(&Bindings::empty());
}

#[test]
fn bindings_reach_leaf_streams() {
    let coi = Coi::new();
    let adapter = ScriptedAdapter::new(Vec::new());
    let probe = adapter.probe();
    let plan = PhysicalOperator::cut(
        &coi.schema,
        PhysicalOperator::group_scan(&coi.schema, coi.customer),
        coi.order,
    );

    ExecutionContext::new(&coi.schema, &adapter)
        .execute(&plan, &Bindings::new(vec![Value::Int(1), Value::Int(2)]))
        .expect("plan should execute");

    assert_eq!(probe.opens(), 1);
    assert_eq!(probe.bindings_seen(), 2);
}

// ----------------------------------------------------------------------
// Failures
// ----------------------------------------------------------------------

#[test]
fn storage_failure_propagates_unchanged() {
    let coi = Coi::new();
    let adapter = ScriptedAdapter::new(nested_stream(&coi)).failing_at(2);
    let probe = adapter.probe();
    let ctx = ExecutionContext::new(&coi.schema, &adapter);
    let plan = PhysicalOperator::cut(
        &coi.schema,
        PhysicalOperator::group_scan(&coi.schema, coi.customer),
        coi.order,
    );

    let mut cursor = ctx.cursor(&plan);
    cursor.open(&Bindings::empty()).expect("open should succeed");
    assert_eq!(cursor.next().expect("first row"), Some(coi.customer_row(1)));
    assert_eq!(cursor.next().expect("second row"), Some(coi.order_row(1, 10)));

    let err = cursor.next().expect_err("third pull should fail");
    assert_eq!(err.class, ErrorClass::Internal);
    assert_eq!(err.origin, ErrorOrigin::Store);
    assert_eq!(err.message, "scripted failure at pull 2");
    assert_eq!(cursor.state(), CursorState::Failed);

    cursor.close();
    cursor.close();
    assert_eq!(cursor.state(), CursorState::Closed);
    assert_eq!(probe.releases(), 1);
}

#[test]
fn failed_cursor_can_start_afresh() {
    let coi = Coi::new();
    let adapter = ScriptedAdapter::new(nested_stream(&coi)).failing_at(1);
    let probe = adapter.probe();
    let ctx = ExecutionContext::new(&coi.schema, &adapter);
    let plan = PhysicalOperator::group_scan(&coi.schema, coi.customer);

    let mut cursor = ctx.cursor(&plan);
    cursor.open(&Bindings::empty()).expect("open should succeed");
    cursor.next().expect("first row");
    cursor.next().expect_err("second pull should fail");

    cursor.open(&Bindings::empty()).expect("reopen should succeed");
    assert_eq!(probe.releases(), 1);
    assert_eq!(cursor.next().expect("first row again"), Some(coi.customer_row(1)));
    assert_eq!(cursor.rows_returned(), 1);
}

#[test]
#[should_panic(expected = "invariant violation: next on a failed GroupScan cursor before reopening")]
fn next_after_failure_is_a_contract_violation() {
    let coi = Coi::new();
    let adapter = ScriptedAdapter::new(nested_stream(&coi)).failing_at(0);
    let ctx = ExecutionContext::new(&coi.schema, &adapter);
    let plan = PhysicalOperator::group_scan(&coi.schema, coi.customer);

    let mut cursor = ctx.cursor(&plan);
    cursor.open(&Bindings::empty()).expect("open should succeed");
    cursor.next().expect_err("first pull should fail");
    let _ = cursor.next();
}

#[test]
fn execute_closes_the_pipeline_on_failure() {
    let coi = Coi::new();
    let adapter = ScriptedAdapter::new(nested_stream(&coi)).failing_at(3);
    let probe = adapter.probe();
    let plan = PhysicalOperator::limit(
        PhysicalOperator::group_scan(&coi.schema, coi.customer),
        10,
    );

    let err = ExecutionContext::new(&coi.schema, &adapter)
        .execute(&plan, &Bindings::empty())
        .expect_err("scripted failure should surface");

    assert!(err.is_store_failure());
    assert_eq!(probe.releases(), 1);
}

// ----------------------------------------------------------------------
// Extract / Limit
// ----------------------------------------------------------------------

#[test]
fn extract_keeps_whole_subtrees_of_the_extract_types() {
    let coi = Coi::new();
    let input = vec![
        coi.customer_row(1),
        coi.order_row(1, 10),
        coi.item_row(1, 10, 100),
        coi.address_row(1, 5),
        coi.item_entry("sku-1", 1, 10, 100),
        coi.order_row(1, 11),
    ];
    let plan = PhysicalOperator::extract(&coi.schema, PhysicalOperator::values(input), &[coi.order]);

    assert_eq!(
        execute(&coi, &MemoryStore::new(), &plan),
        vec![
            coi.order_row(1, 10),
            coi.item_row(1, 10, 100),
            coi.order_row(1, 11)
        ]
    );
}

#[test]
fn limit_stops_pulling_once_spent() {
    let coi = Coi::new();
    let adapter = ScriptedAdapter::new(nested_stream(&coi));
    let probe = adapter.probe();
    let ctx = ExecutionContext::new(&coi.schema, &adapter);
    let plan = PhysicalOperator::limit(
        PhysicalOperator::group_scan(&coi.schema, coi.customer),
        2,
    );

    let mut cursor = ctx.cursor(&plan);
    cursor.open(&Bindings::empty()).expect("open should succeed");
    let rows = drain(&mut cursor);

    assert_eq!(rows, vec![coi.customer_row(1), coi.order_row(1, 10)]);
    assert_eq!(probe.pulls(), 2);
    assert_eq!(probe.releases(), 1);
}

#[test]
fn limit_zero_never_pulls() {
    let coi = Coi::new();
    let adapter = ScriptedAdapter::new(nested_stream(&coi));
    let probe = adapter.probe();
    let plan = PhysicalOperator::limit(
        PhysicalOperator::group_scan(&coi.schema, coi.customer),
        0,
    );

    assert!(execute(&coi, &adapter, &plan).is_empty());
    assert_eq!(probe.pulls(), 0);
    assert_eq!(probe.releases(), 1);
}

// ----------------------------------------------------------------------
// AncestorLookup
// ----------------------------------------------------------------------

#[test]
fn ancestor_lookup_from_index_emits_existing_ancestors_root_first() {
    let coi = Coi::new();
    let mut store = coi.store([
        coi.customer_row(1),
        coi.order_row(1, 10),
        coi.item_row(1, 10, 100),
        coi.item_row(1, 10, 101),
    ]);
    // An entry whose customer and order rows are not stored.
    store
        .insert_index_entry(
            coi.schema.index(coi.item_by_sku),
            vec![
                Value::from("sku-200"),
                Value::Int(2),
                Value::Int(20),
                Value::Int(200),
            ],
        )
        .expect("orphan entry should insert");

    let plan = PhysicalOperator::ancestor_lookup(
        &coi.schema,
        PhysicalOperator::index_scan(&coi.schema, coi.item_by_sku),
        RowTypeRef::Index(coi.item_by_sku),
        &[coi.order, coi.customer],
        true,
    );

    assert_eq!(
        execute(&coi, &store, &plan),
        vec![
            coi.customer_row(1),
            coi.order_row(1, 10),
            coi.item_entry("sku-100", 1, 10, 100),
            coi.customer_row(1),
            coi.order_row(1, 10),
            coi.item_entry("sku-101", 1, 10, 101),
            coi.item_entry("sku-200", 2, 20, 200),
        ]
    );
}

#[test]
fn ancestor_lookup_can_fetch_the_indexed_row_itself() {
    let coi = Coi::new();
    let store = coi.store([
        coi.customer_row(1),
        coi.order_row(1, 10),
        coi.item_row(1, 10, 100),
    ]);
    let plan = PhysicalOperator::ancestor_lookup(
        &coi.schema,
        PhysicalOperator::index_scan(&coi.schema, coi.item_by_sku),
        RowTypeRef::Index(coi.item_by_sku),
        &[coi.item],
        false,
    );

    assert_eq!(
        execute(&coi, &store, &plan),
        vec![coi.item_row(1, 10, 100)]
    );
}

#[test]
fn ancestor_lookup_passes_other_rows_through() {
    let coi = Coi::new();
    let store = coi.store([coi.customer_row(1), coi.order_row(1, 10)]);
    let input = vec![coi.customer_row(7), coi.item_row(1, 10, 100)];
    let plan = PhysicalOperator::ancestor_lookup(
        &coi.schema,
        PhysicalOperator::values(input),
        RowTypeRef::Table(coi.item),
        &[coi.order],
        false,
    );

    assert_eq!(
        execute(&coi, &store, &plan),
        vec![coi.customer_row(7), coi.order_row(1, 10)]
    );
}

#[test]
fn ancestor_lookup_uses_the_adapter_lookup() {
    let coi = Coi::new();
    let lookups = coi.store([coi.customer_row(3)]);
    let adapter = ScriptedAdapter::new(vec![coi.order_row(3, 30)]).with_lookups(lookups);
    let plan = PhysicalOperator::ancestor_lookup(
        &coi.schema,
        PhysicalOperator::group_scan(&coi.schema, coi.customer),
        RowTypeRef::Table(coi.order),
        &[coi.customer],
        true,
    );

    assert_eq!(
        execute(&coi, &adapter, &plan),
        vec![coi.customer_row(3), coi.order_row(3, 30)]
    );
}

#[test]
#[should_panic(expected = "invariant violation: address is not an ancestor of item")]
fn ancestor_lookup_rejects_unrelated_types() {
    let coi = Coi::new();
    let _ = PhysicalOperator::ancestor_lookup(
        &coi.schema,
        PhysicalOperator::index_scan(&coi.schema, coi.item_by_sku),
        RowTypeRef::Index(coi.item_by_sku),
        &[coi.address],
        true,
    );
}

#[test]
#[should_panic(expected = "invariant violation: group scan root order has a parent")]
fn group_scan_needs_a_root_type() {
    let coi = Coi::new();
    let _ = PhysicalOperator::group_scan(&coi.schema, coi.order);
}

// ----------------------------------------------------------------------
// Explain / trace
// ----------------------------------------------------------------------

#[test]
fn describe_plan_renders_an_indented_tree() {
    let coi = Coi::new();
    let plan = PhysicalOperator::limit(
        PhysicalOperator::ancestor_lookup(
            &coi.schema,
            PhysicalOperator::cut(
                &coi.schema,
                PhysicalOperator::index_scan(&coi.schema, coi.item_by_sku),
                coi.order,
            ),
            RowTypeRef::Index(coi.item_by_sku),
            &[coi.order, coi.customer],
            true,
        ),
        5,
    );

    assert_eq!(
        plan.describe_plan(),
        "Limit(5)\n  AncestorLookup(item_by_sku -> customer, order; keep input)\n    Cut(order)\n      IndexScan(item_by_sku)\n"
    );
    assert_eq!(plan.input_operators().len(), 1);
    assert_eq!(plan.kind(), OperatorKind::Limit);
}

#[test]
fn fingerprint_is_stable_and_plan_sensitive() {
    let coi = Coi::new();
    let build = |boundary| {
        PhysicalOperator::cut(
            &coi.schema,
            PhysicalOperator::group_scan(&coi.schema, coi.customer),
            boundary,
        )
    };

    let order_cut = build(coi.order);
    assert_eq!(order_cut.fingerprint(), order_cut.clone().fingerprint());
    assert_ne!(order_cut.fingerprint(), build(coi.item).fingerprint());
    assert_eq!(order_cut.fingerprint().as_hex().len(), 64);
    assert_eq!(order_cut.fingerprint().short().len(), 16);
}

#[test]
fn trace_records_cursor_lifecycle_and_plan_bracket() {
    let coi = Coi::new();
    let store = MemoryStore::new();
    let sink = RecordingSink::default();
    let plan = PhysicalOperator::values(vec![coi.customer_row(1), coi.customer_row(2)]);

    ExecutionContext::new(&coi.schema, &store)
        .with_trace(&sink)
        .execute(&plan, &Bindings::empty())
        .expect("plan should execute");

    let fingerprint = plan.fingerprint();
    assert_eq!(
        sink.events(),
        vec![
            TraceEvent::PlanStart { fingerprint },
            TraceEvent::Open {
                operator: OperatorKind::Values
            },
            TraceEvent::Exhausted {
                operator: OperatorKind::Values,
                rows: 2
            },
            TraceEvent::Close {
                operator: OperatorKind::Values,
                rows: 2
            },
            TraceEvent::PlanFinish {
                fingerprint,
                rows: 2
            },
        ]
    );
}

#[test]
fn trace_reports_errors_per_cursor() {
    let coi = Coi::new();
    let adapter = ScriptedAdapter::new(nested_stream(&coi)).failing_at(0);
    let sink = RecordingSink::default();
    let plan = PhysicalOperator::cut(
        &coi.schema,
        PhysicalOperator::group_scan(&coi.schema, coi.customer),
        coi.order,
    );

    let _ = ExecutionContext::new(&coi.schema, &adapter)
        .with_trace(&sink)
        .execute(&plan, &Bindings::empty());

    let errors: Vec<_> = sink
        .events()
        .into_iter()
        .filter_map(|event| match event {
            TraceEvent::Error {
                operator, origin, ..
            } => Some((operator, origin)),
            _ => None,
        })
        .collect();
    assert_eq!(
        errors,
        vec![
            (OperatorKind::GroupScan, ErrorOrigin::Store),
            (OperatorKind::Cut, ErrorOrigin::Store)
        ]
    );
}

#[test]
fn plan_events_can_be_disabled() {
    let coi = Coi::new();
    let store = MemoryStore::new();
    let sink = RecordingSink::default();
    let config = ExecutionConfig {
        trace_plan: false,
        ..ExecutionConfig::default()
    };
    let plan = PhysicalOperator::values(vec![coi.customer_row(1)]);

    ExecutionContext::with_config(&coi.schema, &store, config)
        .with_trace(&sink)
        .execute(&plan, &Bindings::empty())
        .expect("plan should execute");

    assert!(
        sink.events()
            .iter()
            .all(|event| !matches!(event, TraceEvent::PlanStart { .. } | TraceEvent::PlanFinish { .. }))
    );
    assert!(!sink.events().is_empty());
}

// ----------------------------------------------------------------------
// Properties
// ----------------------------------------------------------------------

// Row shapes: 0 customer, 1 order, 2 item, 3 address, 4 index entry.
fn arb_shapes() -> impl Strategy<Value = Vec<(u8, i64)>> {
    prop::collection::vec((0u8..5, 0i64..4), 0..40)
}

fn row_for(coi: &Coi, shape: u8, key: i64) -> Row {
    match shape {
        0 => coi.customer_row(key),
        1 => coi.order_row(key, key),
        2 => coi.item_row(key, key, key),
        3 => coi.address_row(key, key),
        _ => coi.item_entry("sku", key, key, key),
    }
}

proptest! {
    #[test]
    fn cut_emits_exactly_the_rows_outside_the_subtree(
        shapes in arb_shapes(),
        boundary in 0u32..4,
    ) {
        let coi = Coi::new();
        let boundary = RowTypeId::new(boundary);
        let input: Vec<Row> = shapes.iter().map(|(shape, key)| row_for(&coi, *shape, *key)).collect();
        let expected: Vec<Row> = input
            .iter()
            .filter(|row| {
                row.table_type()
                    .is_none_or(|row_type| !coi.schema.is_strict_ancestor(boundary, row_type))
            })
            .cloned()
            .collect();

        let plan = PhysicalOperator::cut(&coi.schema, PhysicalOperator::values(input), boundary);
        prop_assert_eq!(execute(&coi, &MemoryStore::new(), &plan), expected);
    }

    #[test]
    fn extract_and_cut_preserve_input_order(shapes in arb_shapes()) {
        let coi = Coi::new();
        let input: Vec<Row> = shapes.iter().map(|(shape, key)| row_for(&coi, *shape, *key)).collect();
        let plan = PhysicalOperator::extract(
            &coi.schema,
            PhysicalOperator::cut(&coi.schema, PhysicalOperator::values(input.clone()), coi.order),
            &[coi.customer],
        );

        let output = execute(&coi, &MemoryStore::new(), &plan);
        let mut remaining = input.iter();
        for row in &output {
            prop_assert!(remaining.any(|candidate| candidate == row), "row {} out of order", row);
        }
    }
}
