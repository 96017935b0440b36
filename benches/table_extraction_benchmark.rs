//! Horizontal table extraction throughput
//!
//! Header mapping plus row extraction over a generated catalogue table, with
//! and without a custom column parser.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;
use table_harvest::{
    ColumnParsers, HtmlDocument, HtmlNode, LabelDictionary, MarkupNode, TableOptions, parse_table,
};

fn catalogue(rows: usize) -> String {
    let mut html = String::from(
        "<table><thead><tr><th>SKU <i class=\"icon\"></i></th><th>Product name</th>\
         <th>Price&nbsp;(EUR)</th><th>Notes</th></tr></thead><tbody>",
    );
    for row in 0..rows {
        html.push_str(&format!(
            "<tr><td>SKU-{row:05}</td><td>  Product   {row} </td><td>{}.99</td><td>n/a</td></tr>",
            row % 100
        ));
    }
    html.push_str("</tbody></table>");
    html
}

fn dictionary() -> LabelDictionary {
    LabelDictionary::new()
        .pattern("id", "(?i)^sku")
        .unwrap()
        .literal("name", "Product name")
        .pattern("price", r"Price\s+\(\w+\)")
        .unwrap()
}

fn table_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_table");

    for rows in [10usize, 100, 1000] {
        let doc = HtmlDocument::parse_fragment(&catalogue(rows));

        group.bench_with_input(BenchmarkId::new("default_parser", rows), &doc, |b, doc| {
            let options = TableOptions::<HtmlNode>::new("thead tr", "tbody tr", dictionary());
            b.iter(|| black_box(parse_table(Some(&doc.root()), &options).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("price_parser", rows), &doc, |b, doc| {
            let options = TableOptions::new("thead tr", "tbody tr", dictionary()).with_column_parsers(
                ColumnParsers::<HtmlNode>::new().with("price", |cell, record, key| {
                    let text = cell.map(MarkupNode::text).unwrap_or_default();
                    record.insert(key.to_string(), json!(text.trim().parse::<f64>()?));
                    Ok(())
                }),
            );
            b.iter(|| black_box(parse_table(Some(&doc.root()), &options).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, table_extraction);
criterion_main!(benches);
