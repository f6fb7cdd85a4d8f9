use aefi_search::columns::flatten_columns;
use aefi_search::config::SearchConfig;
use aefi_search::criterion::Criterion as SearchCriterion;
use aefi_search::entity::EntityTree;
use aefi_search::fetch_compiler::FetchCompiler;
use aefi_search::search_event::{DataKind, Operator, SearchEvent};
use aefi_search::session::SearchSession;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

// 不同规模的事件序列
fn events(name: &str) -> Vec<SearchEvent> {
    let mut events = vec![SearchEvent::update(
        "incident",
        "title",
        DataKind::Text,
        Operator::BeginsWith,
        "AEFI",
    )
    .with_output(true)];

    if name == "simple" {
        return events;
    }

    events.push(SearchEvent::update(
        "caefiss_aefi_vaccines",
        "caefiss_lot_number",
        DataKind::Text,
        Operator::Contains,
        "AB1,AB2,AB3",
    ));
    events.push(SearchEvent::update(
        "caefiss_aefi_reactions",
        "caefiss_onset",
        DataKind::Date,
        Operator::Between,
        "2024-01-01 2024-06-30",
    ));
    events.push(SearchEvent::update(
        "caefiss_patients",
        "caefiss_age",
        DataKind::Number,
        Operator::Between,
        r#"{"number1": 18, "number2": 65}"#,
    ));

    if name == "medium" {
        return events;
    }

    events.push(SearchEvent::update(
        "caefiss_reporting_organizations",
        "caefiss_type",
        DataKind::OptionSet,
        Operator::In,
        r#"[{"display": "Clinic", "value": 1}, {"display": "Hospital", "value": 2}]"#,
    ));
    events.push(SearchEvent::update(
        "caefiss_case_outcomes",
        "caefiss_hospitalized",
        DataKind::Checkbox,
        Operator::Equal,
        r#"{"0": false, "1": true}"#,
    ));
    events.push(
        SearchEvent::remove("caefiss_medical_histories", "caefiss_condition", DataKind::Text).with_output(true),
    );
    events
}

fn populated_tree(name: &str) -> EntityTree {
    let mut tree = EntityTree::case_tree();
    for event in events(name) {
        tree.add_search_event(SearchCriterion::try_from(event).expect("事件应该有效"));
    }
    tree
}

// 基准测试：事件合并性能
fn benchmark_add_search_event(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_search_event");

    for name in ["simple", "medium", "complex"] {
        let events = events(name);
        group.bench_with_input(BenchmarkId::new("apply", name), &events, |b, events| {
            b.iter(|| {
                let mut session = SearchSession::new(SearchConfig::default());
                for event in events {
                    session.add_search_event(black_box(event.clone())).expect("事件应该有效");
                }
                black_box(session)
            })
        });
    }

    group.finish();
}

// 基准测试：查询文档编译性能
fn benchmark_fetch_compiler(c: &mut Criterion) {
    let mut group = c.benchmark_group("fetch_compiler");

    for name in ["simple", "medium", "complex"] {
        let tree = populated_tree(name);
        group.bench_with_input(BenchmarkId::new("compile", name), &tree, |b, tree| {
            b.iter(|| {
                let document = FetchCompiler::new(black_box(tree)).compile(true);
                black_box(document.to_string())
            })
        });
    }

    group.finish();
}

// 基准测试：输出列展开
fn benchmark_flatten_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten_columns");

    for name in ["simple", "complex"] {
        let tree = populated_tree(name);
        group.bench_with_input(BenchmarkId::new("flatten", name), &tree, |b, tree| {
            b.iter(|| black_box(flatten_columns(black_box(tree), true)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_add_search_event,
    benchmark_fetch_compiler,
    benchmark_flatten_columns
);
criterion_main!(benches);
