//! Rewrites an article page down to its main content.
//!
//! The cleaner parses the page once and runs an ordered list of [`Rule`]s
//! over the tree. Each rule selects elements with a CSS selector and either
//! removes them or replaces them with their text. Finally the main region
//! becomes the only child of `<body>`.
use ne_core::{Error, Result};
use scraper::node::Text;
use scraper::{ElementRef, Html, Node, Selector};

pub const MAIN_SELECTOR: &str = "#main";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Delete the element and everything under it.
    Remove,
    /// Replace the element with its text content.
    Unwrap,
}

#[derive(Debug, Clone)]
pub struct Rule {
    css: &'static str,
    selector: Selector,
    action: Action,
}

impl Rule {
    pub fn new(css: &'static str, action: Action) -> Result<Self> {
        Ok(Self {
            css,
            selector: parse_selector(css)?,
            action,
        })
    }

    pub fn css(&self) -> &str {
        self.css
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Applies the rule to every match and returns how many there were.
    pub fn apply(&self, html: &mut Html) -> usize {
        let ids: Vec<_> = html.select(&self.selector).map(|el| el.id()).collect();

        // Descendants come after their ancestors in document order, so
        // walking backwards rewrites inner matches first and every node is
        // still attached when its turn comes.
        for id in ids.iter().rev() {
            match self.action {
                Action::Remove => {
                    if let Some(mut node) = html.tree.get_mut(*id) {
                        node.detach();
                    }
                }
                Action::Unwrap => {
                    let text = html
                        .tree
                        .get(*id)
                        .and_then(ElementRef::wrap)
                        .map(|el| el.text().collect::<String>())
                        .unwrap_or_default();
                    if let Some(mut node) = html.tree.get_mut(*id) {
                        if !text.is_empty() {
                            node.insert_before(Node::Text(Text { text: text.into() }));
                        }
                        node.detach();
                    }
                }
            }
        }

        ids.len()
    }
}

#[derive(Debug, Clone)]
pub struct Cleaner {
    rules: Vec<Rule>,
    main: Selector,
    body: Selector,
}

impl Cleaner {
    /// Rules for NHK News Web Easy article pages.
    pub fn news_easy() -> Result<Self> {
        Self::with_rules(vec![
            Rule::new("#main rt", Action::Remove)?,
            Rule::new("ruby", Action::Unwrap)?,
            Rule::new("#main span", Action::Unwrap)?,
            Rule::new("#main a", Action::Unwrap)?,
            Rule::new("#soundkana", Action::Remove)?,
        ])
    }

    pub fn with_rules(rules: Vec<Rule>) -> Result<Self> {
        Ok(Self {
            rules,
            main: parse_selector(MAIN_SELECTOR)?,
            body: parse_selector("body")?,
        })
    }

    pub fn clean(&self, raw: &str) -> String {
        let mut html = Html::parse_document(raw);
        for rule in &self.rules {
            let count = rule.apply(&mut html);
            tracing::debug!("{:?} {} ({} matches)", rule.action(), rule.css(), count);
        }
        self.isolate_main(&mut html);
        html.html()
    }

    /// Makes the main region the sole child of `<body>`. Without a main
    /// region the body ends up empty. A main region that is `<body>` itself
    /// or one of its ancestors is left as it is.
    fn isolate_main(&self, html: &mut Html) {
        let main_id = html.select(&self.main).next().map(|el| el.id());
        let Some(body_id) = html.select(&self.body).next().map(|el| el.id()) else {
            return;
        };

        if let (Some(main_id), Some(body)) = (main_id, html.tree.get(body_id)) {
            if main_id == body_id || body.ancestors().any(|node| node.id() == main_id) {
                return;
            }
        }

        let children: Vec<_> = html
            .tree
            .get(body_id)
            .map(|body| body.children().map(|child| child.id()).collect())
            .unwrap_or_default();
        for id in children {
            if let Some(mut child) = html.tree.get_mut(id) {
                child.detach();
            }
        }

        if let (Some(main_id), Some(mut body)) = (main_id, html.tree.get_mut(body_id)) {
            body.append_id(main_id);
        }
    }
}

/// Cleans a page with the default rule set.
pub fn prettify(raw: &str) -> Result<String> {
    Ok(Cleaner::news_easy()?.clean(raw))
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Scraping(format!("Invalid selector {}: {}", css, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = concat!(
        "<html><head><title>t</title></head><body>",
        "<div id=\"nav\">menu</div>",
        "<div id=\"main\"><h1><ruby>今日<rt>きょう</rt></ruby>のニュース</h1>",
        "<p><span class=\"colorL\"><ruby>漢<rt>かん</rt></ruby>字</span>です。",
        "<a href=\"/dict/1\" class=\"dicWin\">言葉</a>を<span>見</span>る</p>",
        "<div id=\"soundkana\"><img src=\"sound.png\"></div></div>",
        "<script>track()</script><div class=\"ad\">buy</div>",
        "</body></html>"
    );

    fn body_of(html: &str) -> String {
        let doc = Html::parse_document(html);
        let body = Selector::parse("body").unwrap();
        doc.select(&body).next().unwrap().inner_html()
    }

    #[test]
    fn test_removes_furigana_and_unwraps_markup() {
        let cleaned = prettify(PAGE).unwrap();
        assert!(!cleaned.contains("きょう"));
        assert!(!cleaned.contains("かん"));
        assert!(!cleaned.contains("<ruby"));
        assert!(!cleaned.contains("<span"));
        assert!(!cleaned.contains("<a "));
        assert!(!cleaned.contains("/dict/1"));
        assert!(cleaned.contains("今日のニュース"));
        assert!(cleaned.contains("漢字です。言葉を見る"));
    }

    #[test]
    fn test_main_is_only_body_child() {
        let cleaned = prettify(PAGE).unwrap();
        let body = body_of(&cleaned);
        assert!(body.starts_with("<div id=\"main\">"));
        assert!(body.ends_with("</div>"));
        assert!(!cleaned.contains("menu"));
        assert!(!cleaned.contains("track()"));
        assert!(!cleaned.contains("buy"));
        assert!(!cleaned.contains("sound.png"));
        assert!(cleaned.contains("<title>t</title>"));
    }

    #[test]
    fn test_missing_main_gives_empty_body() {
        let cleaned = prettify("<html><head></head><body><p>only nav</p></body></html>").unwrap();
        assert_eq!(body_of(&cleaned), "");
    }

    #[test]
    fn test_ruby_outside_main_is_unwrapped() {
        let mut html = Html::parse_document(concat!(
            "<html><head></head><body>",
            "<p id=\"nav\"><ruby>外<rt>そと</rt></ruby></p>",
            "<div id=\"main\"><ruby>中<rt>なか</rt></ruby></div>",
            "</body></html>"
        ));
        Rule::new("#main rt", Action::Remove).unwrap().apply(&mut html);
        assert_eq!(Rule::new("ruby", Action::Unwrap).unwrap().apply(&mut html), 2);

        let out = html.html();
        assert!(!out.contains("<ruby"));
        // Readings are only dropped inside the main region.
        assert!(out.contains("<p id=\"nav\">外そと</p>"));
        assert!(out.contains("<div id=\"main\">中</div>"));
    }

    #[test]
    fn test_main_on_body_keeps_content() {
        let cleaned = prettify("<html><head></head><body id=\"main\"><p>本文</p><span>です</span></body></html>").unwrap();
        assert_eq!(body_of(&cleaned), "<p>本文</p>です");
    }

    #[test]
    fn test_main_on_html_keeps_content() {
        let cleaned = prettify("<html id=\"main\"><head></head><body><p>本文</p></body></html>").unwrap();
        assert_eq!(body_of(&cleaned), "<p>本文</p>");
    }

    #[test]
    fn test_nested_spans_keep_text() {
        let cleaned = prettify(
            "<html><head></head><body><div id=\"main\"><p><span>a<span>b</span>c</span></p></div></body></html>",
        )
        .unwrap();
        assert!(cleaned.contains("<p>abc</p>"));
    }

    #[test]
    fn test_rule_counts_matches() {
        let mut html = Html::parse_document(PAGE);
        let rule = Rule::new("#main rt", Action::Remove).unwrap();
        assert_eq!(rule.apply(&mut html), 2);
        assert_eq!(rule.apply(&mut html), 0);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let cleaner = Cleaner::news_easy().unwrap();
        let once = cleaner.clean(PAGE);
        let twice = cleaner.clean(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        assert!(matches!(Rule::new("##", Action::Remove), Err(Error::Scraping(_))));
    }
}
