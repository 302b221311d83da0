use criterion::{Criterion, criterion_group, criterion_main};
use markdown_context_engine::{Editor, Selection, Snapshot, edits};
use markdown_context_syntax::parse;

fn generate_notes(sections: usize) -> String {
    let base = "# Notes\n\nRead [the guide](https://docs.io/guide \"Guide\") and https://blog.io/post.\n\n\
                - [ ] Write `cargo bench` numbers\n- [x] Review [ref][1]\n  - [ ] Nested task\n\n\
                ```rust\nfn main() {}\n```\n\nClaim[^n].\n\n[1]: https://ref.io\n[^n]: Source.\n\n";
    base.repeat(sections)
}

fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detection");
    group.sample_size(10);

    let text = generate_notes(200);
    let tree = parse(&text);
    let snapshot = Snapshot::new(&text, &tree);
    let cursor = text.rfind("cargo bench").unwrap_or(0);

    group.bench_function("parse", |b| {
        b.iter(|| std::hint::black_box(parse(std::hint::black_box(&text))));
    });

    group.bench_function("contexts_at_cursor", |b| {
        b.iter(|| std::hint::black_box(snapshot.contexts(Selection::cursor(cursor))));
    });

    group.bench_function("whole_document_selection", |b| {
        b.iter(|| std::hint::black_box(snapshot.contexts(Selection::new(0, text.len()))));
    });

    group.finish();
}

fn bench_task_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("editing");
    group.sample_size(10);

    let editor = Editor::from_text(&generate_notes(50));

    group.bench_function("toggle_all_tasks", |b| {
        let mut e = editor.clone();
        let len = e.len();
        b.iter(|| {
            e.set_selection(0, len);
            if let Some(markdown_context_engine::Context::TaskSelection(tasks)) =
                e.get_contexts_at_cursor().first()
            {
                std::hint::black_box(e.batch_replace(&edits::toggle_tasks(tasks)));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_detection, bench_task_toggle);
criterion_main!(benches);
