use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use prettify_core::{Position, RopeDocument, TextDocument, TextEdit};
use prettify_regex::{MatchEngine, PatternRule, RuleSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn rules() -> RuleSet {
    RuleSet::compile([
        PatternRule::new("->", "→"),
        PatternRule::new("=>", "⇒"),
        PatternRule::new("<=", "≤"),
        PatternRule::new(">=", "≥"),
        PatternRule::new("!=", "≠"),
        PatternRule::new(r"\blambda\b", "λ"),
        PatternRule::new(r"\bforall\b", "∀"),
        PatternRule::new(r"\\", "λ").with_pre(r"[\s(]"),
    ])
}

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} map (lambda x -> x >= 0 && x != 1) xs <= forall ys => zs\n"
        ));
    }
    out.pop();
    out
}

fn bench_full_scan(c: &mut Criterion) {
    let doc = RopeDocument::from_text(&large_text(20_000));
    let mut engine = MatchEngine::new(rules());
    c.bench_function("full_scan/20k_lines", |b| {
        b.iter(|| black_box(engine.full_scan(&doc)))
    });
}

fn bench_incremental_typing(c: &mut Criterion) {
    let text = large_text(20_000);
    c.bench_function("incremental_typing/100_keystrokes", |b| {
        b.iter_batched(
            || {
                let doc = RopeDocument::from_text(&text);
                let mut engine = MatchEngine::new(rules());
                engine.full_scan(&doc);
                (doc, engine, StdRng::seed_from_u64(7))
            },
            |(mut doc, mut engine, mut rng)| {
                for _ in 0..100 {
                    let line = rng.gen_range(0..doc.line_count());
                    let column = rng.gen_range(0..=doc.line_len(line));
                    let edit = TextEdit::insert(Position::new(line, column), "-");
                    doc.apply_edit(&edit);
                    black_box(engine.apply_change(&doc, &[edit]));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_rescan_per_keystroke(c: &mut Criterion) {
    let text = large_text(20_000);
    c.bench_function("full_rescan_typing/10_keystrokes", |b| {
        b.iter_batched(
            || {
                let doc = RopeDocument::from_text(&text);
                (doc, MatchEngine::new(rules()), StdRng::seed_from_u64(7))
            },
            |(mut doc, mut engine, mut rng)| {
                for _ in 0..10 {
                    let line = rng.gen_range(0..doc.line_count());
                    let column = rng.gen_range(0..=doc.line_len(line));
                    doc.apply_edit(&TextEdit::insert(Position::new(line, column), "-"));
                    black_box(engine.full_scan(&doc));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_full_scan,
    bench_incremental_typing,
    bench_rescan_per_keystroke
);
criterion_main!(benches);
