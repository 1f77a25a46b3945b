use super::collapse_whitespace as collapse_whitespace_impl;
use super::*;

fn page_url() -> Url {
    Url::parse("https://example.com/support/ipo/").expect("url should parse")
}

#[test]
fn extract_question_with_answer() {
    let html = r#"
        <html>
            <body>
                <h2>How to apply for an IPO?</h2>
                <p>Open the IPO section in the app and pick an issue.</p>
                <h2>Overview</h2>
                <p>Not a question.</p>
            </body>
        </html>
    "#;

    let records = extract_faqs(html, &page_url(), 3).expect("extraction should succeed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question, "How to apply for an IPO?");
    assert_eq!(
        records[0].answer,
        "Open the IPO section in the app and pick an issue."
    );
    assert_eq!(records[0].url, "https://example.com/support/ipo/");
}

#[test]
fn heading_without_sibling_has_empty_answer() {
    let html = r#"
        <html>
            <body>
                <div><h3>Can I cancel my IPO bid?</h3></div>
            </body>
        </html>
    "#;

    let records = extract_faqs(html, &page_url(), 3).expect("extraction should succeed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].answer, "");
}

#[test]
fn answer_skips_text_nodes_between_elements() {
    let html = "<div><h3>What is a bracket order?</h3>\n  loose text  \n<div><p>An order with a target</p><p>and a stoploss.</p></div></div>";

    let records = extract_faqs(html, &page_url(), 3).expect("extraction should succeed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].answer, "An order with a target and a stoploss.");
}

#[test]
fn short_questions_are_filtered_by_word_count() {
    let html = r#"
        <h2>Why?</h2><p>Because.</p>
        <h2>Fees?</h2><p>See charges.</p>
        <h3>What are the brokerage charges?</h3><p>Depends on plan.</p>
    "#;

    let strict = extract_faqs(html, &page_url(), 3).expect("extraction should succeed");
    assert_eq!(strict.len(), 1);
    assert_eq!(strict[0].question, "What are the brokerage charges?");

    let lenient = extract_faqs(html, &page_url(), 0).expect("extraction should succeed");
    assert_eq!(lenient.len(), 3);
}

#[test]
fn only_h2_and_h3_are_scanned() {
    let html = r#"
        <h1>How do I open an account?</h1><p>h1 is ignored</p>
        <h4>How do I close an account?</h4><p>h4 is ignored</p>
        <p>How do I transfer shares?</p>
    "#;

    let records = extract_faqs(html, &page_url(), 3).expect("extraction should succeed");
    assert!(records.is_empty());
}

#[test]
fn nested_markup_is_flattened() {
    let html = r#"
        <h2>
            How to <em>reset</em>
            my   password?
        </h2>
        <p>Use <a href="/forgot">Forgot Password</a> on the login screen.</p>
    "#;

    let records = extract_faqs(html, &page_url(), 3).expect("extraction should succeed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question, "How to reset my password?");
    assert_eq!(
        records[0].answer,
        "Use Forgot Password on the login screen."
    );
}

#[test]
fn duplicate_questions_are_kept_in_document_order() {
    let html = r#"
        <h2>How to apply for an IPO?</h2><p>First.</p>
        <h3>How to apply for an IPO?</h3><p>Second.</p>
    "#;

    let records = extract_faqs(html, &page_url(), 3).expect("extraction should succeed");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].answer, "First.");
    assert_eq!(records[1].answer, "Second.");
}

#[test]
fn is_question_rules() {
    assert!(is_question("How to apply for an IPO?", 3));
    assert!(!is_question("How to apply for an IPO", 3));
    assert!(!is_question("IPO?", 3));
    assert!(is_question("IPO?", 1));
    assert!(!is_question("", 0));
}

#[test]
fn collapse_whitespace() {
    assert_eq!(collapse_whitespace_impl("  a \n\t b  "), "a b");
    assert_eq!(collapse_whitespace_impl(""), "");
}
