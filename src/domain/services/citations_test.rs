use test_utils::answer_fixture;

use super::annotation;
use super::process_citations;
use super::resolve_citation;
use crate::domain::models::ChunkValue;
use crate::domain::models::Reference;

fn reference(file_id: &str, index: u32) -> Reference {
    return Reference {
        file_id: file_id.to_string(),
        index,
        kind: "text".to_string(),
        chunk_value: ChunkValue {
            tag: "p".to_string(),
            text: format!("chunk {index}"),
            html: format!("<p>chunk {index}</p>"),
        },
    };
}

#[test]
fn it_numbers_in_first_seen_order() {
    let res = process_citations("[citation:A] then [citation:B] and [citation:A]");

    assert_eq!(res.map.get("A"), Some(&1));
    assert_eq!(res.map.get("B"), Some(&2));
    assert_eq!(res.order, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(res.text.matches("<sup class=\"citation\"").count(), 3);
    assert_eq!(res.text.matches("data-citation-number=\"1\"").count(), 2);
    assert_eq!(res.text.matches("data-citation-number=\"2\"").count(), 1);
}

#[test]
fn it_renders_annotations() {
    let res = process_citations("Sales grew[citation:x-1].");
    insta::assert_snapshot!(res.text, @r###"Sales grew<sup class="citation" data-citation-id="x-1" data-citation-number="1">[1]</sup>."###);
}

#[test]
fn it_leaves_text_without_markers() {
    let res = process_citations("No sources here [1].");
    assert_eq!(res.text, "No sources here [1].");
    assert!(res.map.is_empty());
    assert!(res.order.is_empty());
}

#[test]
fn it_is_a_no_op_on_processed_text() {
    let first = process_citations(answer_fixture());
    let second = process_citations(&first.text);

    assert_eq!(first.order.len(), 3);
    assert_eq!(second.text, first.text);
    assert!(second.order.is_empty());
}

#[test]
fn it_keeps_unterminated_and_empty_markers() {
    let res = process_citations("a [citation:] b [citation:Q] c [citation:open");
    assert_eq!(
        res.text,
        format!("a [citation:] b {} c [citation:open", annotation("Q", 1))
    );
    assert_eq!(res.order, vec!["Q".to_string()]);
}

#[test]
fn it_handles_multibyte_text() {
    let res = process_citations("Umsatz – stark[citation:é]…");
    assert_eq!(res.text, format!("Umsatz – stark{}…", annotation("é", 1)));
}

#[test]
fn it_maps_numbers_back_to_ids() {
    let res = process_citations(answer_fixture());
    assert_eq!(res.id_for_number(1), Some("0000320193-23-000106-12"));
    assert_eq!(res.id_for_number(3), Some("0000320193-23-000106-7"));
    assert_eq!(res.id_for_number(0), None);
    assert_eq!(res.id_for_number(4), None);
}

#[test]
fn it_resolves_citations_by_key_then_index() {
    let references = vec![reference("f1", 12), reference("f2", 7)];

    assert_eq!(resolve_citation("f2-7", &references), Some(&references[1]));
    assert_eq!(resolve_citation("12", &references), Some(&references[0]));
    assert_eq!(resolve_citation("f9-1", &references), None);
}

#[test]
fn it_escapes_citation_ids_in_markup() {
    let res = process_citations("Margins [citation:a\"b<c&d] held.");

    assert_eq!(res.order, vec!["a\"b<c&d".to_string()]);
    insta::assert_snapshot!(res.text, @r###"Margins <sup class="citation" data-citation-id="a&quot;b&lt;c&amp;d" data-citation-number="1">[1]</sup> held."###);
}
