use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use attribs_core::{AttributeSet, Formattable, Value, ValueClass, ValueObject, attributes};

fn container_with(widgets: usize) -> ValueObject {
    let widget = ValueClass::new(
        "Widget",
        AttributeSet::new(["color", "size"], [("options", Value::empty_map())]),
    );
    let container = ValueClass::new(
        "WidgetContainer",
        AttributeSet::from_defaults([("widgets", Value::empty_list())]),
    );

    let items: Vec<Value> = (0..widgets)
        .map(|i| {
            widget
                .construct(attributes! { color: Value::symbol("green"), size: i as i64 })
                .map(Value::from)
        })
        .collect::<Result<_, _>>()
        .unwrap_or_default();

    container
        .construct(attributes! { widgets: items })
        .unwrap_or_else(|err| panic!("benchmark fixture: {err}"))
}

fn bench_pretty(c: &mut Criterion) {
    let mut group = c.benchmark_group("pretty_print");
    for widgets in [1usize, 10, 100] {
        let object = container_with(widgets);
        group.bench_with_input(BenchmarkId::from_parameter(widgets), &object, |b, object| {
            b.iter(|| black_box(object.pretty()))
        });
    }
    group.finish();
}

fn bench_with(c: &mut Criterion) {
    let object = container_with(10);
    c.bench_function("append_to", |b| {
        b.iter(|| black_box(object.append_to("widgets", [Value::from(1)])))
    });
}

criterion_group!(benches, bench_pretty, bench_with);
criterion_main!(benches);
