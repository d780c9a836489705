//! Tag markup tree for documentation comments.
//!
//! A comment such as `<summary>Returns <c>true</c> on success.</summary>` is
//! parsed into a list of [`Node`]s. The parser is forgiving about things that
//! show up in hand-written comments (a bare `<` in `a < b`, a stray `&`,
//! unquoted attribute values) but rejects broken nesting, which the renderer
//! reports and falls back to raw text for.

use crate::error::MarkupError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Non-empty attribute value by name.
    pub fn attr_non_empty(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|v| !v.is_empty())
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First direct child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(&e.children, out),
        }
    }
}

/// Parse a fragment of tag markup into top-level nodes.
pub fn parse(input: &str) -> Result<Vec<Node>, MarkupError> {
    Parser::new(input).run()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    root: Vec<Node>,
    open: Vec<Element>,
    text: String,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            root: Vec::new(),
            open: Vec::new(),
            text: String::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn run(mut self) -> Result<Vec<Node>, MarkupError> {
        while let Some(c) = self.rest().chars().next() {
            match c {
                '<' => self.tag()?,
                '&' => self.entity(),
                _ => {
                    self.text.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        self.flush_text();
        if let Some(unclosed) = self.open.last() {
            return Err(MarkupError::Unclosed(unclosed.name.clone()));
        }
        Ok(self.root)
    }

    fn tag(&mut self) -> Result<(), MarkupError> {
        let start = self.pos;
        let rest = self.rest();

        if rest.starts_with("<!--") {
            let end = rest.find("-->").ok_or(MarkupError::MalformedTag(start))?;
            self.pos += end + 3;
            return Ok(());
        }

        if let Some(body) = rest.strip_prefix("<![CDATA[") {
            let end = body.find("]]>").ok_or(MarkupError::MalformedTag(start))?;
            self.text.push_str(&body[..end]);
            self.pos += "<![CDATA[".len() + end + 3;
            return Ok(());
        }

        if let Some(body) = rest.strip_prefix("</") {
            let end = body.find('>').ok_or(MarkupError::MalformedTag(start))?;
            let name = body[..end].trim().to_string();
            self.pos += 2 + end + 1;
            return self.close(name, start);
        }

        // `a < b` or `<3`: not a tag
        if !rest[1..].starts_with(is_name_start) {
            self.text.push('<');
            self.pos += 1;
            return Ok(());
        }

        let (element, self_closing) = self.open_tag(start)?;
        self.flush_text();
        if self_closing {
            self.push_node(Node::Element(element));
        } else {
            self.open.push(element);
        }
        Ok(())
    }

    /// Parse `<name attr="v" ...>` or `<name .../>` starting at `start`.
    fn open_tag(&mut self, start: usize) -> Result<(Element, bool), MarkupError> {
        self.pos += 1;
        let name = self.take_while(is_name_char).to_string();
        let mut element = Element::new(name);

        loop {
            self.take_while(char::is_whitespace);
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok((element, true));
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok((element, false));
            }
            if rest.is_empty() || rest.starts_with('<') {
                return Err(MarkupError::MalformedTag(start));
            }

            let key = self
                .take_while(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/')
                .to_string();
            if key.is_empty() {
                // lone '/' not followed by '>'
                self.pos += 1;
                continue;
            }
            self.take_while(char::is_whitespace);
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.take_while(char::is_whitespace);
                self.attr_value(start)?
            } else {
                String::new()
            };
            element.attributes.push((key, value));
        }
    }

    fn attr_value(&mut self, start: usize) -> Result<String, MarkupError> {
        let rest = self.rest();
        let raw = match rest.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let end = rest[1..].find(q).ok_or(MarkupError::MalformedTag(start))?;
                self.pos += end + 2;
                &rest[1..1 + end]
            }
            _ => self.take_while(|c| !c.is_whitespace() && c != '>'),
        };
        Ok(decode_entities(raw))
    }

    fn close(&mut self, name: String, offset: usize) -> Result<(), MarkupError> {
        self.flush_text();
        let element = self
            .open
            .pop()
            .ok_or_else(|| MarkupError::UnopenedClose(name.clone()))?;
        if element.name != name {
            return Err(MarkupError::MismatchedClose {
                expected: element.name,
                found: name,
                offset,
            });
        }
        self.push_node(Node::Element(element));
        Ok(())
    }

    fn entity(&mut self) {
        let rest = self.rest();
        if let Some(end) = rest[1..].find(';').filter(|&e| e <= 8) {
            if let Some(c) = entity_char(&rest[1..1 + end]) {
                self.text.push(c);
                self.pos += end + 2;
                return;
            }
        }
        self.text.push('&');
        self.pos += 1;
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.push_node(Node::Text(text));
        }
    }

    fn push_node(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

fn entity_char(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';').filter(|&e| e <= 8) {
            Some(end) if entity_char(&after[..end]).is_some() => {
                out.extend(entity_char(&after[..end]));
                rest = &after[end + 1..];
            }
            _ => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(nodes: &[Node], index: usize) -> &Element {
        match &nodes[index] {
            Node::Element(e) => e,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn nested_elements_and_text() {
        let nodes = parse("<summary>Returns <c>true</c> when done.</summary>").unwrap();
        assert_eq!(nodes.len(), 1);
        let summary = element(&nodes, 0);
        assert_eq!(summary.name, "summary");
        assert_eq!(summary.children.len(), 3);
        assert_eq!(summary.text(), "Returns true when done.");
        assert_eq!(summary.child("c").map(Element::text), Some("true".to_string()));
    }

    #[test]
    fn attributes_and_self_closing() {
        let nodes = parse(r#"<see cref="T:Foo.Bar{T}"/><param name='id' extra>x</param>"#).unwrap();
        let see = element(&nodes, 0);
        assert_eq!(see.attr("cref"), Some("T:Foo.Bar{T}"));
        assert!(see.children.is_empty());
        let param = element(&nodes, 1);
        assert_eq!(param.attr("name"), Some("id"));
        assert_eq!(param.attr("extra"), Some(""));
        assert_eq!(param.attr_non_empty("extra"), None);
    }

    #[test]
    fn entities_are_decoded() {
        let nodes = parse("<c>a &lt; b &amp;&amp; c &#65;</c>").unwrap();
        assert_eq!(element(&nodes, 0).text(), "a < b && c A");
    }

    #[test]
    fn stray_angle_and_ampersand_are_text() {
        let nodes = parse("<summary>if a < 3 & b</summary>").unwrap();
        assert_eq!(element(&nodes, 0).text(), "if a < 3 & b");
    }

    #[test]
    fn top_level_text_is_kept() {
        let nodes = parse("Line 1\n<summary>s</summary>").unwrap();
        assert_eq!(nodes[0], Node::Text("Line 1\n".to_string()));
    }

    #[test]
    fn comments_and_cdata() {
        let nodes = parse("<code><![CDATA[if (a < b) {}]]><!-- note --></code>").unwrap();
        assert_eq!(element(&nodes, 0).text(), "if (a < b) {}");
    }

    #[test]
    fn mismatched_close_is_an_error() {
        let err = parse("<summary><c>x</summary>").unwrap_err();
        assert!(matches!(err, MarkupError::MismatchedClose { ref expected, .. } if expected == "c"));
    }

    #[test]
    fn unclosed_tag_is_an_error() {
        assert_eq!(
            parse("<summary>never closed").unwrap_err(),
            MarkupError::Unclosed("summary".to_string())
        );
    }

    #[test]
    fn unopened_close_is_an_error() {
        assert_eq!(
            parse("text</para>").unwrap_err(),
            MarkupError::UnopenedClose("para".to_string())
        );
    }

    #[test]
    fn truncated_tag_is_an_error() {
        assert!(matches!(parse("<see cref=\"x"), Err(MarkupError::MalformedTag(0))));
    }
}
