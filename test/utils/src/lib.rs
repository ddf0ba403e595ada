use std::env;

pub fn insta_snapshot<F: FnOnce()>(f: F) {
    let mut settings = insta::Settings::clone_current();
    let snapshot_path = env::current_dir().unwrap().join("./test/snapshots");
    settings.set_snapshot_path(snapshot_path);
    settings.bind(f);
}

pub fn answer_fixture() -> &'static str {
    return r#"
Apple reported total net sales of $383.3 billion for fiscal 2023 [citation:0000320193-23-000106-12].

Services revenue grew to $85.2 billion [citation:0000320193-23-000106-31], while iPhone remained the largest category [citation:0000320193-23-000106-12].

Risk factors call out supply chain concentration [citation:0000320193-23-000106-7].
"#
    .trim();
}

pub fn filing_html_fixture() -> &'static str {
    return r#"<html><body>
<h1>FORM 10-K</h1>
<p>Apple Inc.</p>
<table><tr><td>Total net sales</td><td>$383,285</td></tr></table>
<p>The Company's fiscal year is the 52- or 53-week period that ends on the last Saturday of September.</p>
<p>Services net sales increased during 2023 compared to 2022.</p>
</body></html>"#;
}

pub fn chat_response_fixture() -> &'static str {
    return r#"{
  "response": "Net sales were $383.3 billion [citation:0000320193-23-000106-12].",
  "chatHistory": [
    { "id": "m-1", "role": "user", "content": "What were net sales?" },
    {
      "role": "assistant",
      "content": { "answer": "Net sales were $383.3 billion [citation:0000320193-23-000106-12]." },
      "references": [
        {
          "fileId": "0000320193-23-000106",
          "index": 12,
          "type": "table",
          "chunkValue": {
            "tag": "table",
            "text": "Total net sales $383,285",
            "html": "<table><tr><td>Total net sales</td><td>$383,285</td></tr></table>"
          }
        }
      ]
    }
  ]
}"#;
}
