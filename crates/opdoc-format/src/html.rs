use std::fmt::Write as _;

use opdoc_highlight::{escape_html, Language};
use opdoc_render::{encode_segment, operator_path, DisplayedOperator};

use crate::{MenuGroupView, ShowView};

/// Minimal stylesheet for the page chrome and highlight classes.
pub const STYLESHEET: &str = "\
body{margin:0;display:flex;font-family:system-ui,sans-serif;color:#1f2328}
nav.menu{width:14rem;padding:1rem;border-right:1px solid #d0d7de;font-size:.9rem}
nav.menu h2{font-size:.95rem;margin:1rem 0 .25rem}
nav.menu ul{list-style:none;margin:0;padding:0}
nav.menu .unresolved{color:#8c959f}
nav.menu .current{font-weight:600}
main{flex:1;padding:1rem 2rem;max-width:60rem}
pre{background:#f6f8fa;padding:.75rem;overflow:auto}
.example[data-copy-state=\"1\"] .copy::after{content:\" \\2713\"}
.hljs-comment{color:#6e7781}
.hljs-keyword{color:#cf222e}
.hljs-string{color:#0a3069}
.hljs-subst{color:#1f2328}
.hljs-number,.hljs-literal,.hljs-variable.language_{color:#0550ae}
.hljs-built_in{color:#953800}
.hljs-title.function_,.hljs-title.class_{color:#8250df}
.hljs-property{color:#116329}
.hljs-meta{color:#6e7781}
";

/// Copies the literal code held in each example's `textarea.copy-source`. The
/// section is marked copied only once the clipboard write resolves.
pub const COPY_SCRIPT: &str = "\
document.addEventListener('click', (event) => {
  const button = event.target.closest('button.copy');
  if (!button || !navigator.clipboard) return;
  const section = button.closest('section.example');
  const source = section && section.querySelector('textarea.copy-source');
  if (!source) return;
  navigator.clipboard.writeText(source.value).then(
    () => { section.dataset.copyState = '1'; },
    () => {}
  );
});
";

/// File name of an exported operator page, relative to the `operator/` directory.
pub fn export_file_name(identifier: &str) -> String {
    format!("{}.html", encode_segment(identifier))
}

/// How operator links are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStyle {
    /// Router paths such as `/operator/of`.
    Route,
    /// Sibling files of an exported `operator/` directory, such as `of.html`.
    Export,
}

impl LinkStyle {
    pub fn href(self, identifier: &str) -> String {
        match self {
            LinkStyle::Route => operator_path(identifier),
            // The file name itself may hold `%` escapes, which must survive URL decoding.
            LinkStyle::Export => encode_segment(&export_file_name(identifier)),
        }
    }
}

/// Everything needed to render one standalone HTML page.
#[derive(Clone, Copy, Debug)]
pub struct Page<'a> {
    pub site_title: &'a str,
    pub language: Language,
    pub menu: &'a [MenuGroupView],
    pub view: ShowView<'a>,
    pub links: LinkStyle,
}

/// Render a complete HTML document. Only highlighted example markup is emitted unescaped.
pub fn render_page(page: &Page<'_>) -> String {
    let mut out = String::with_capacity(8 * 1024);
    let heading = page.view.operator.map(|operator| operator.identifier.as_str());
    let title = match heading {
        Some(identifier) => format!("{identifier} · {}", page.site_title),
        None => page.site_title.to_string(),
    };

    out.push_str("<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(&title));
    let _ = writeln!(out, "<style>\n{STYLESHEET}</style>");
    out.push_str("</head>\n<body>\n");

    write_menu(&mut out, page, heading);

    out.push_str("<main class=\"operator\">\n");
    match page.view.operator {
        Some(operator) => write_operator(&mut out, page, operator),
        None => write_empty(&mut out, page),
    }
    out.push_str("</main>\n");
    let _ = writeln!(out, "<script>\n{COPY_SCRIPT}</script>");
    out.push_str("</body>\n</html>\n");
    out
}

/// Page that forwards to `target` (a relative URL).
pub fn render_redirect(site_title: &str, target: &str) -> String {
    let target = escape_html(target);
    format!(
        "<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta http-equiv=\"refresh\" content=\"0; url={target}\">\n\
         <title>{}</title>\n</head>\n<body>\n<p><a href=\"{target}\">{target}</a></p>\n</body>\n</html>\n",
        escape_html(site_title)
    )
}

fn write_menu(out: &mut String, page: &Page<'_>, current: Option<&str>) {
    out.push_str("<nav class=\"menu\">\n");
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(page.site_title));
    for group in page.menu {
        let _ = writeln!(out, "<h2>{}</h2>\n<ul>", escape_html(&group.title));
        for entry in &group.entries {
            let label = escape_html(&entry.identifier);
            if !entry.resolved {
                let _ = writeln!(out, "<li class=\"unresolved\">{label}</li>");
            } else if Some(entry.identifier.as_str()) == current {
                let _ = writeln!(
                    out,
                    "<li class=\"current\"><a href=\"{}\">{label}</a></li>",
                    escape_html(&page.links.href(&entry.identifier))
                );
            } else {
                let _ = writeln!(
                    out,
                    "<li><a href=\"{}\">{label}</a></li>",
                    escape_html(&page.links.href(&entry.identifier))
                );
            }
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</nav>\n");
}

fn write_operator(out: &mut String, page: &Page<'_>, operator: &DisplayedOperator) {
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(&operator.identifier));
    let _ = writeln!(
        out,
        "<p class=\"description\">{}</p>",
        escape_html(&operator.description)
    );
    let _ = writeln!(
        out,
        "<pre class=\"signature\"><code>{}</code></pre>",
        escape_html(&operator.signature)
    );

    if !operator.related.is_empty() {
        out.push_str("<ul class=\"related\">\n");
        for related in &operator.related {
            let _ = writeln!(
                out,
                "<li><a href=\"{}\">{}</a></li>",
                escape_html(&page.links.href(related)),
                escape_html(related)
            );
        }
        out.push_str("</ul>\n");
    }

    for (index, example) in operator.examples.iter().enumerate() {
        let _ = writeln!(
            out,
            "<section class=\"example\" data-index=\"{index}\" data-copy-state=\"{}\">",
            example.copy_state
        );
        let _ = writeln!(out, "<h2>{}</h2>", escape_html(&example.title));
        if let Some(description) = &example.description {
            let _ = writeln!(out, "<p>{}</p>", escape_html(description));
        }
        if let Some(link) = &example.link {
            let _ = writeln!(
                out,
                "<p><a class=\"sandbox\" href=\"{}\">在线示例</a></p>",
                escape_html(link)
            );
        }
        out.push_str("<button class=\"copy\" type=\"button\">复制</button>\n");
        // The parser drops one newline after `<textarea>`, so a leading newline in the code survives.
        let _ = writeln!(
            out,
            "<textarea class=\"copy-source\" hidden readonly>\n{}</textarea>",
            escape_html(&example.code)
        );
        let _ = writeln!(
            out,
            "<pre><code class=\"hljs language-{}\">{}</code></pre>",
            page.language,
            example.safe_code
        );
        out.push_str("</section>\n");
    }
}

fn write_empty(out: &mut String, page: &Page<'_>) {
    let _ = writeln!(
        out,
        "<p class=\"empty\">{}</p>",
        escape_html(&page.view.not_found_message())
    );
    if let Some(suggestion) = page.view.suggestion {
        let _ = writeln!(
            out,
            "<p>Did you mean <a href=\"{}\">{}</a>?</p>",
            escape_html(&page.links.href(suggestion)),
            escape_html(suggestion)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MenuEntry;
    use opdoc_catalog::{Catalog, CopyState, Example, MenuGroup, OperatorRecord};
    use opdoc_render::Viewer;
    use std::sync::Arc;

    fn hostile_viewer() -> Viewer {
        let record = OperatorRecord {
            description: "<b>bold</b> & more".into(),
            signature: "f<T>(): T".into(),
            related: vec!["x\"y".into()],
            examples: vec![Example {
                title: "<i>t</i>".into(),
                code: "const s = '<script>alert(1)</script>';".into(),
                description: None,
                link: Some("https://example.com/?a=1&b=\"2\"".into()),
                copy_state: CopyState::NotCopied,
            }],
        };
        let catalog = Catalog::from_records([("evil".to_string(), record)], Vec::<MenuGroup>::new())
            .expect("catalog");
        Viewer::new(Arc::new(catalog), Language::JavaScript)
    }

    #[test]
    fn page_escapes_everything_but_highlighted_code() {
        let mut viewer = hostile_viewer();
        let operator = viewer.navigate("evil").cloned().expect("evil");
        let page = Page {
            site_title: "T",
            language: Language::JavaScript,
            menu: &[],
            view: ShowView {
                requested: Some("evil"),
                operator: Some(&operator),
                suggestion: None,
            },
            links: LinkStyle::Route,
        };
        let html = render_page(&page);
        assert!(!html.contains("<b>"));
        assert!(!html.contains("<i>"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; &amp; more"));
        assert!(html.contains("href=\"/operator/x%22y\""));
        assert!(html.contains("a=1&amp;b=&quot;2&quot;"));
        assert!(html.contains("<code class=\"hljs language-javascript\"><span class=\"hljs-keyword\">const</span>"));
    }

    #[test]
    fn copy_button_reads_escaped_literal_code() {
        let mut viewer = hostile_viewer();
        let operator = viewer.navigate("evil").cloned().expect("evil");
        let page = Page {
            site_title: "T",
            language: Language::JavaScript,
            menu: &[],
            view: ShowView {
                requested: Some("evil"),
                operator: Some(&operator),
                suggestion: None,
            },
            links: LinkStyle::Export,
        };
        let html = render_page(&page);
        assert!(html.contains(
            "<textarea class=\"copy-source\" hidden readonly>\n\
             const s = &#x27;&lt;script&gt;alert(1)&lt;/script&gt;&#x27;;</textarea>"
        ));
        assert!(html.contains("navigator.clipboard.writeText(source.value)"));
        assert!(html.contains("section.dataset.copyState = '1'"));
        assert!(html.contains("data-copy-state=\"0\""));
        assert_eq!(html.matches("<script>").count(), 1);
    }

    #[test]
    fn export_links_survive_url_decoding() {
        assert_eq!(export_file_name("of"), "of.html");
        assert_eq!(LinkStyle::Export.href("of"), "of.html");
        assert_eq!(export_file_name("a b"), "a%20b.html");
        assert_eq!(LinkStyle::Export.href("a b"), "a%2520b.html");
    }

    #[test]
    fn menu_marks_current_and_unresolved() {
        let menu = vec![MenuGroupView {
            title: "创建".into(),
            entries: vec![
                MenuEntry {
                    identifier: "defer".into(),
                    resolved: true,
                },
                MenuEntry {
                    identifier: "range".into(),
                    resolved: false,
                },
            ],
        }];
        let page = Page {
            site_title: "RxJS 操作符",
            language: Language::JavaScript,
            menu: &menu,
            view: ShowView {
                requested: Some("missing"),
                operator: None,
                suggestion: None,
            },
            links: LinkStyle::Export,
        };
        let html = render_page(&page);
        assert!(html.contains("<li><a href=\"defer.html\">defer</a></li>"));
        assert!(html.contains("<li class=\"unresolved\">range</li>"));
        assert!(html.contains("Nothing to show for &#x27;missing&#x27;."));
    }

    #[test]
    fn redirect_points_at_target() {
        let html = render_redirect("Site", "operator/defer.html");
        assert!(html.contains("content=\"0; url=operator/defer.html\""));
    }
}
