use bookworm_core::links::{extract_links, LinkRules};
use bookworm_core::tokenizer::top_ten;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_top_ten(c: &mut Criterion) {
    let paragraph = "It is a truth universally acknowledged, that a single man in possession of a good fortune, \
                     must be in want of a wife. However little known the feelings or views of such a man may be \
                     on his first entering a neighbourhood, this truth is so well fixed in the minds of the \
                     surrounding families, that he is considered the rightful property of some one or other of \
                     their daughters.\n";
    let text = paragraph.repeat(2_000);
    c.bench_function("top_ten_novel", |b| b.iter(|| top_ten(&text)));
}

fn bench_links(c: &mut Criterion) {
    let item = r#"<li class="booklink"><a class="link" href="/ebooks/1342"><span class="title">Pride and Prejudice</span></a></li>"#;
    let page = format!("<ul>{}</ul>", item.repeat(500));
    let rules = LinkRules::default();
    c.bench_function("extract_links_search_page", |b| b.iter(|| extract_links(&page, &rules)));
}

criterion_group!(benches, bench_top_ten, bench_links);
criterion_main!(benches);
