use opdoc_catalog::Catalog;
use opdoc_highlight::{highlight, Language};
use pretty_assertions::assert_eq;
use regex::Regex;

fn strip_markup(markup: &str) -> String {
    let tags = Regex::new(r#"<span class="hljs-[a-z_ ]+">|</span>"#).expect("tag regex");
    let text = tags.replace_all(markup, "");
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

#[test]
fn every_catalog_example_round_trips_through_markup() {
    let catalog = Catalog::embedded().expect("embedded catalog");
    for (identifier, record) in catalog.iter() {
        for example in &record.examples {
            let markup = highlight(&example.code, Language::JavaScript);
            assert_eq!(
                strip_markup(markup.as_str()),
                example.code,
                "{identifier}: {}",
                example.title
            );
        }
    }
}

#[test]
fn highlighting_is_deterministic() {
    let catalog = Catalog::embedded().expect("embedded catalog");
    for (_, record) in catalog.iter() {
        for example in &record.examples {
            let first = highlight(&example.code, Language::TypeScript);
            let second = highlight(&example.code, Language::TypeScript);
            assert_eq!(first, second);
        }
    }
}

#[test]
fn raw_angle_brackets_never_survive() {
    let tags = Regex::new(r#"<span class="hljs-[a-z_ ]+">|</span>"#).expect("tag regex");
    let code = "const el = '<img src=x onerror=alert(1)>'; // <b>bold</b>\nif (a<b) {}";
    let markup = highlight(code, Language::JavaScript);
    let without_tags = tags.replace_all(markup.as_str(), "");
    assert!(!without_tags.contains('<'));
    assert!(!without_tags.contains('>'));
}

#[test]
fn unterminated_constructs_are_escaped() {
    let markup = highlight("/* <open comment", Language::JavaScript);
    assert_eq!(
        markup.as_str(),
        "<span class=\"hljs-comment\">/* &lt;open comment</span>"
    );

    let markup = highlight("`<${a", Language::JavaScript);
    assert_eq!(
        markup.as_str(),
        "<span class=\"hljs-string\">`&lt;<span class=\"hljs-subst\">${a</span></span>"
    );
}

#[test]
fn defer_example_marks_calls_and_keywords() {
    let catalog = Catalog::embedded().expect("embedded catalog");
    let defer = catalog.lookup("defer").expect("defer entry");
    let markup = highlight(&defer.examples[0].code, Language::JavaScript);
    assert!(markup
        .as_str()
        .contains("<span class=\"hljs-keyword\">import</span>"));
    assert!(markup
        .as_str()
        .contains("<span class=\"hljs-title function_\">defer</span>"));
}

#[test]
fn deeply_nested_templates_fall_back_to_string_text() {
    let code = "`${".repeat(20_000);
    let markup = highlight(&code, Language::JavaScript);
    assert_eq!(strip_markup(markup.as_str()), code);
    assert_eq!(markup.as_str().matches("hljs-subst").count(), 32);
    assert!(markup
        .as_str()
        .contains("<span class=\"hljs-subst\">${<span class=\"hljs-string\">`${`${"));
}

#[test]
fn shallow_nested_templates_keep_substitutions() {
    let code = "`a ${`b ${`c ${x}`}`}`";
    let markup = highlight(code, Language::JavaScript);
    assert_eq!(strip_markup(markup.as_str()), code);
    assert_eq!(markup.as_str().matches("hljs-subst").count(), 3);
}
