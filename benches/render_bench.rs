use criterion::{black_box, criterion_group, criterion_main, Criterion};
use powerbar::segments::{group, render_env, set_render_env, text};
use powerbar::*;

fn powerline_layout() -> BarLayout {
    let chain = |color: &str, label: &str| {
        powerline_open(
            "\u{e0b6}",
            "\u{e0b4}",
            color,
            vec![
                text(label),
                powerline_transition("\u{e0b0}", "blue", Direction::Right),
                group(vec![
                    set_render_env("name", label),
                    render_env(" {name} "),
                    powerline_transition("\u{e0b0}", "#336699", Direction::Left),
                ]),
            ],
        )
    };

    BarLayout {
        left: vec![chain("21", "one"), chain("39", "two")],
        center: vec![text("title")],
        right: vec![chain("red", "12:00"), text(" "), chain("bright-blue", "50%")],
    }
}

fn bench_style(c: &mut Criterion) {
    c.bench_function("style", |b| {
        b.iter(|| style(black_box("segment"), black_box("reset fg:#ff8000 bg:17 bold")))
    });

    let line = style("segment", "reset fg:#ff8000 bg:17 bold").repeat(20);
    c.bench_function("visible_length", |b| b.iter(|| visible_length(black_box(&line))));
}

fn bench_status(c: &mut Criterion) {
    let bar = Bar::new(powerline_layout(), 200);

    c.bench_function("status", |b| b.iter(|| tokio_test::block_on(bar.status())));

    tokio_test::block_on(bar.status());
    c.bench_function("handle_event", |b| {
        b.iter(|| {
            tokio_test::block_on(bar.handle_event(Some(&ClickEvent::new(ClickKind::MouseLeft, black_box(3)))))
        })
    });
}

criterion_group!(benches, bench_style, bench_status);
criterion_main!(benches);
