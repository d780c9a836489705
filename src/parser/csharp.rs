//! C# declaration scanner.
//!
//! Walks C# source once and yields every type and member declaration with
//! its leading documentation comment and attributes. This is not a C# parser:
//! it only tracks enough structure (namespaces, type bodies, string and
//! comment boundaries) to attach comments to the right declarations. Member
//! bodies are skipped wholesale.
//!
//! - `///` lines and `/** */` blocks before a declaration → raw comment
//! - `[Attr(x, Name = y)]` sections → attributes
//! - `class Foo : Base, IFace` → base types
//! - `int a, b;` → one declaration carrying both names

use crate::error::ExtractError;
use crate::model::Attribute;
use regex::Regex;
use std::sync::LazyLock;

static RE_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(class|struct|interface|enum|record(?:\s+class|\s+struct)?)\s+@?([A-Za-z_][A-Za-z0-9_]*)")
        .unwrap()
});

static RE_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@?[A-Za-z_][A-Za-z0-9_]*").unwrap());

static RE_NAMED_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@?([A-Za-z_][A-Za-z0-9_]*)\s*[=:]\s*([^=].*)$").unwrap());

static RE_ATTR_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(assembly|module|field|event|method|param|property|return|type|typevar)\s*:([^:].*)$").unwrap());

/// Syntactic kind of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Class,
    Struct,
    Interface,
    Enum,
    Method,
    Property,
    Field,
}

impl DeclKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Struct => "struct",
            DeclKind::Interface => "interface",
            DeclKind::Enum => "enum",
            DeclKind::Method => "method",
            DeclKind::Property => "property",
            DeclKind::Field => "field",
        }
    }

    /// Declarations whose bodies hold further declarations.
    pub fn is_container(self) -> bool {
        matches!(self, DeclKind::Class | DeclKind::Struct | DeclKind::Interface)
    }
}

/// One declaration as found in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Usually one name; field statements may declare several.
    pub names: Vec<String>,
    pub kind: DeclKind,
    /// Comment text including its `///` or `/** */` decoration.
    pub raw_comment: String,
    pub attributes: Vec<Attribute>,
    pub base_types: Vec<String>,
    /// Index of the enclosing type declaration in the same scan.
    pub parent: Option<usize>,
    /// Dotted namespace, empty for the global namespace.
    pub namespace: String,
}

/// Scan a C# source file.
pub fn scan(source: &str) -> Result<Vec<Declaration>, ExtractError> {
    let mut scanner = Scanner::new(source);
    scanner.run()?;
    Ok(scanner.decls)
}

enum Scope {
    Namespace(String),
    Type { decl: usize, name: String },
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    decls: Vec<Declaration>,
    scopes: Vec<Scope>,
    file_namespace: Option<String>,
    // per-statement state
    header: String,
    doc: Option<String>,
    doc_open: bool,
    /// An attribute section was seen; later doc comments belong to nothing.
    sealed: bool,
    attributes: Vec<Attribute>,
    line_has_content: bool,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            decls: Vec::new(),
            scopes: Vec::new(),
            file_namespace: None,
            header: String::new(),
            doc: None,
            doc_open: false,
            sealed: false,
            attributes: Vec::new(),
            line_has_content: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn run(&mut self) -> Result<(), ExtractError> {
        while let Some(c) = self.peek() {
            let rest = self.rest();
            match c {
                '/' if rest.starts_with("///") && !rest.starts_with("////") => self.doc_line(),
                '/' if rest.starts_with("//") => {
                    self.skip_line();
                    self.doc_open = false;
                }
                '/' if rest.starts_with("/**") && !rest.starts_with("/**/") => self.doc_block()?,
                '/' if rest.starts_with("/*") => {
                    self.block_comment()?;
                    self.doc_open = false;
                }
                '#' if self.header.trim().is_empty() => self.skip_line(),
                '"' | '@' | '$' if at_string_start(rest) => {
                    self.string_literal()?;
                    self.push_header("\"\"");
                }
                '\'' => {
                    self.char_literal()?;
                    self.push_header("''");
                }
                '[' if self.header.trim().is_empty() => self.attribute_section()?,
                '{' => {
                    self.bump();
                    self.open_brace()?;
                }
                ';' => {
                    self.bump();
                    self.semicolon();
                }
                '}' => {
                    self.bump();
                    self.close_brace()?;
                }
                c if c.is_whitespace() => self.whitespace(),
                c => {
                    self.bump();
                    self.header.push(c);
                    self.line_has_content = true;
                }
            }
        }

        if !self.scopes.is_empty() {
            return Err(ExtractError::UnclosedScope(self.scopes.len()));
        }
        Ok(())
    }

    // -- trivia ---------------------------------------------------------------

    fn whitespace(&mut self) {
        if let Some('\n') = self.bump() {
            if !self.line_has_content {
                // a blank line ends a doc block
                self.doc_open = false;
            }
            self.line_has_content = false;
        }
        if !self.header.is_empty() && !self.header.ends_with(' ') {
            self.header.push(' ');
        }
    }

    fn push_header(&mut self, text: &str) {
        self.header.push_str(text);
        self.line_has_content = true;
    }

    /// Consume up to (not including) the next newline.
    fn take_line(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest.find('\n').unwrap_or(rest.len());
        self.pos += end;
        self.line_has_content = true;
        &rest[..end]
    }

    fn skip_line(&mut self) {
        self.take_line();
    }

    fn accepts_doc(&self) -> bool {
        self.header.trim().is_empty() && !self.sealed
    }

    fn doc_line(&mut self) {
        let accepts = self.accepts_doc();
        let text = self.take_line();
        if !accepts {
            return;
        }
        match self.doc {
            None => {
                self.doc = Some(text.to_string());
                self.doc_open = true;
            }
            Some(ref mut doc) if self.doc_open => {
                doc.push('\n');
                doc.push_str(text);
            }
            // only the first doc block counts
            Some(_) => {}
        }
    }

    fn doc_block(&mut self) -> Result<(), ExtractError> {
        let accepts = self.accepts_doc() && self.doc.is_none();
        let text = self.block_comment()?;
        if accepts {
            self.doc = Some(text.to_string());
        }
        self.doc_open = false;
        Ok(())
    }

    fn block_comment(&mut self) -> Result<&'a str, ExtractError> {
        let start = self.pos;
        let line = self.line;
        let end = self.rest()[2..]
            .find("*/")
            .ok_or(ExtractError::Unterminated {
                what: "block comment",
                line,
            })?;
        while self.pos < start + 2 + end + 2 {
            self.bump();
        }
        self.line_has_content = true;
        Ok(&self.src[start..self.pos])
    }

    fn string_literal(&mut self) -> Result<&'a str, ExtractError> {
        let start = self.pos;
        let line = self.line;
        let unterminated = ExtractError::Unterminated {
            what: "string literal",
            line,
        };
        let mut verbatim = false;
        while let Some(c @ ('@' | '$')) = self.peek() {
            verbatim |= c == '@';
            self.bump();
        }

        let quotes = self.rest().chars().take_while(|&c| c == '"').count();
        if quotes >= 3 {
            let fence = "\"".repeat(quotes);
            self.pos += quotes;
            let end = self.rest().find(&fence).ok_or(unterminated)?;
            let stop = self.pos + end + quotes;
            while self.pos < stop {
                self.bump();
            }
            return Ok(&self.src[start..self.pos]);
        }

        self.bump();
        loop {
            match self.bump() {
                None => return Err(unterminated),
                Some('"') if verbatim && self.peek() == Some('"') => {
                    self.bump();
                }
                Some('"') => break,
                Some('\\') if !verbatim => {
                    self.bump();
                }
                Some('\n') if !verbatim => return Err(unterminated),
                Some(_) => {}
            }
        }
        Ok(&self.src[start..self.pos])
    }

    fn char_literal(&mut self) -> Result<(), ExtractError> {
        let line = self.line;
        self.bump();
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some('\'') => return Ok(()),
                None | Some('\n') => {
                    return Err(ExtractError::Unterminated {
                        what: "character literal",
                        line,
                    })
                }
                Some(_) => {}
            }
        }
    }

    /// Skip a brace-delimited body. The opening `{` is already consumed.
    fn skip_block(&mut self) -> Result<(), ExtractError> {
        let line = self.line;
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            let rest = self.rest();
            match c {
                '/' if rest.starts_with("//") => self.skip_line(),
                '/' if rest.starts_with("/*") => {
                    self.block_comment()?;
                }
                '"' | '@' | '$' if at_string_start(rest) => {
                    self.string_literal()?;
                }
                '\'' => self.char_literal()?,
                '{' => {
                    self.bump();
                    depth += 1;
                }
                '}' => {
                    self.bump();
                    depth -= 1;
                    if depth == 0 {
                        self.line_has_content = true;
                        return Ok(());
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
        Err(ExtractError::Unterminated { what: "block", line })
    }

    /// After a property body: consume an `= initializer;` tail if present.
    fn skip_initializer_tail(&mut self) -> Result<(), ExtractError> {
        let ahead = self.rest().trim_start();
        if !ahead.starts_with('=') || ahead.starts_with("==") {
            return Ok(());
        }
        let line = self.line;
        while let Some(c) = self.peek() {
            let rest = self.rest();
            match c {
                '"' | '@' | '$' if at_string_start(rest) => {
                    self.string_literal()?;
                }
                '\'' => self.char_literal()?,
                '{' => {
                    self.bump();
                    self.skip_block()?;
                }
                ';' => {
                    self.bump();
                    return Ok(());
                }
                _ => {
                    self.bump();
                }
            }
        }
        Err(ExtractError::Unterminated {
            what: "property initializer",
            line,
        })
    }

    fn attribute_section(&mut self) -> Result<(), ExtractError> {
        let line = self.line;
        self.bump();
        let start = self.pos;
        let mut depth = 1usize;
        loop {
            let rest = self.rest();
            match self.peek() {
                None => {
                    return Err(ExtractError::Unterminated {
                        what: "attribute section",
                        line,
                    })
                }
                Some('"' | '@' | '$') if at_string_start(rest) => {
                    self.string_literal()?;
                }
                Some('\'') => self.char_literal()?,
                Some('[') => {
                    self.bump();
                    depth += 1;
                }
                Some(']') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        let src = self.src;
        let inner = &src[start..self.pos];
        self.bump();
        self.attributes.extend(parse_attribute_section(inner));
        self.sealed = true;
        self.doc_open = false;
        self.line_has_content = true;
        Ok(())
    }

    // -- statements -----------------------------------------------------------

    fn reset_statement(&mut self) {
        self.header.clear();
        self.doc = None;
        self.doc_open = false;
        self.sealed = false;
        self.attributes.clear();
    }

    fn current_namespace(&self) -> String {
        self.file_namespace
            .iter()
            .map(String::as_str)
            .chain(self.scopes.iter().filter_map(|s| match s {
                Scope::Namespace(name) => Some(name.as_str()),
                Scope::Type { .. } => None,
            }))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Innermost enclosing type: (declaration index, type name).
    fn enclosing_type(&self) -> Option<(usize, String)> {
        match self.scopes.last() {
            Some(Scope::Type { decl, name }) => Some((*decl, name.clone())),
            _ => None,
        }
    }

    fn declare(&mut self, names: Vec<String>, kind: DeclKind, base_types: Vec<String>) -> usize {
        let decl = Declaration {
            names,
            kind,
            raw_comment: self.doc.take().unwrap_or_default(),
            attributes: std::mem::take(&mut self.attributes),
            base_types,
            parent: self.enclosing_type().map(|(index, _)| index),
            namespace: self.current_namespace(),
        };
        self.decls.push(decl);
        self.decls.len() - 1
    }

    fn open_brace(&mut self) -> Result<(), ExtractError> {
        let header = self.header.trim().to_string();

        // `= new Foo { ... }`, `=> x switch { ... }`, lambdas
        if find_assignment(&header).is_some() {
            self.skip_block()?;
            self.header.push_str("{} ");
            return Ok(());
        }

        if let Some(name) = header.strip_prefix("namespace ") {
            self.scopes.push(Scope::Namespace(name.trim().to_string()));
            self.reset_statement();
            return Ok(());
        }

        if let Some(ty) = parse_type_header(&header) {
            let index = self.declare(vec![ty.name.clone()], ty.kind, ty.base_types);
            if ty.kind.is_container() {
                self.scopes.push(Scope::Type {
                    decl: index,
                    name: ty.name,
                });
            } else {
                self.skip_block()?;
            }
            self.reset_statement();
            return Ok(());
        }

        match self.enclosing_type() {
            Some((_, type_name)) if header.contains('(') => {
                if let Some(name) = method_name(&header, &type_name) {
                    self.declare(vec![name], DeclKind::Method, Vec::new());
                }
                self.skip_block()?;
            }
            Some(_) if !header.is_empty() => {
                if let Some(name) = property_name(&header) {
                    self.declare(vec![name], DeclKind::Property, Vec::new());
                }
                self.skip_block()?;
                self.skip_initializer_tail()?;
            }
            _ => self.skip_block()?,
        }
        self.reset_statement();
        Ok(())
    }

    fn semicolon(&mut self) {
        let header = self.header.trim().to_string();
        let first_word = header.split_whitespace().next().unwrap_or("");

        if header.is_empty() || matches!(first_word, "using" | "global" | "extern") {
            self.reset_statement();
            return;
        }

        if let Some(name) = header.strip_prefix("namespace ") {
            self.file_namespace = Some(name.trim().to_string());
        } else if let Some(ty) = parse_type_header(&header) {
            self.declare(vec![ty.name], ty.kind, ty.base_types);
        } else if let Some((_, type_name)) = self.enclosing_type() {
            self.member_statement(&header, &type_name);
        }
        self.reset_statement();
    }

    /// A `;`-terminated statement inside a type body.
    fn member_statement(&mut self, header: &str, type_name: &str) {
        if has_word(header, "event") || has_word(header, "delegate") {
            return;
        }
        let (cut, arrow) = match find_assignment(header) {
            Some((at, arrow)) => (at, arrow),
            None => (header.len(), false),
        };
        let head = &header[..cut];
        if head.contains('(') {
            if let Some(name) = method_name(head, type_name) {
                self.declare(vec![name], DeclKind::Method, Vec::new());
            }
        } else if arrow {
            if let Some(name) = property_name(head) {
                self.declare(vec![name], DeclKind::Property, Vec::new());
            }
        } else {
            let names = field_names(header);
            if !names.is_empty() {
                self.declare(names, DeclKind::Field, Vec::new());
            }
        }
    }

    fn close_brace(&mut self) -> Result<(), ExtractError> {
        if self.scopes.pop().is_none() {
            return Err(ExtractError::UnbalancedBrace(self.line));
        }
        self.reset_statement();
        self.line_has_content = true;
        Ok(())
    }
}

// -- header helpers -----------------------------------------------------------

fn at_string_start(rest: &str) -> bool {
    let prefix = rest.chars().take_while(|&c| c == '@' || c == '$').count();
    prefix <= 3 && rest[prefix..].starts_with('"')
}

fn has_word(text: &str, word: &str) -> bool {
    RE_IDENT.find_iter(text).any(|m| m.as_str() == word)
}

fn last_identifier(text: &str) -> Option<String> {
    RE_IDENT
        .find_iter(text)
        .last()
        .map(|m| m.as_str().trim_start_matches('@').to_string())
}

/// Split on `sep` outside of brackets and string literals.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if let Some(q) = in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => in_string = Some(c),
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth = (depth - 1).max(0),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Position of the first top-level `=` or `=>`, and whether it is an arrow.
fn find_assignment(header: &str) -> Option<(usize, bool)> {
    let bytes = header.as_bytes();
    let mut depth = 0i32;
    let mut in_string = false;
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            in_string = b != b'"';
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'(' | b'[' | b'{' | b'<' => depth += 1,
            b')' | b']' | b'}' => depth = (depth - 1).max(0),
            b'>' if i == 0 || bytes[i - 1] != b'=' => depth = (depth - 1).max(0),
            b'=' if depth == 0 => {
                let prev = if i > 0 { bytes[i - 1] } else { b' ' };
                let next = bytes.get(i + 1).copied().unwrap_or(b' ');
                if next == b'=' || matches!(prev, b'=' | b'!' | b'<' | b'>') {
                    continue;
                }
                return Some((i, next == b'>'));
            }
            _ => {}
        }
    }
    None
}

struct TypeHeader {
    kind: DeclKind,
    name: String,
    base_types: Vec<String>,
}

fn parse_type_header(header: &str) -> Option<TypeHeader> {
    let caps = RE_TYPE.captures(header)?;
    let whole = caps.get(0)?;
    if header.find('(').is_some_and(|paren| paren < whole.start()) {
        return None;
    }
    let keyword = caps[1].split_whitespace().collect::<Vec<_>>();
    let kind = match keyword.as_slice() {
        ["struct"] | ["record", "struct"] => DeclKind::Struct,
        ["interface"] => DeclKind::Interface,
        ["enum"] => DeclKind::Enum,
        _ => DeclKind::Class,
    };
    Some(TypeHeader {
        kind,
        name: caps[2].to_string(),
        base_types: base_list(&header[whole.end()..]),
    })
}

/// Parse `<T>(args) : Base, IFace<T> where T : new()` into base type names.
fn base_list(after_name: &str) -> Vec<String> {
    let mut rest = after_name.trim_start();
    for (open, close) in [('<', '>'), ('(', ')')] {
        if rest.starts_with(open) {
            let mut depth = 0;
            let mut end = rest.len();
            for (i, c) in rest.char_indices() {
                if c == open {
                    depth += 1;
                } else if c == close {
                    depth -= 1;
                    if depth == 0 {
                        end = i + 1;
                        break;
                    }
                }
            }
            rest = rest[end..].trim_start();
        }
    }
    let Some(bases) = rest.strip_prefix(':') else {
        return Vec::new();
    };
    let bases = match RE_IDENT.find_iter(bases).find(|m| m.as_str() == "where") {
        Some(m) => &bases[..m.start()],
        None => bases,
    };
    split_top_level(bases, ',')
        .into_iter()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect()
}

/// Method name from a header like `public static T Get<T>(string key)`.
/// Constructors, finalizers, operators and indexers yield `None`.
fn method_name(header: &str, type_name: &str) -> Option<String> {
    let head = header[..header.find('(')?].trim_end();
    if head.contains('~') || has_word(head, "operator") {
        return None;
    }
    let head = strip_generic_suffix(head);
    let name = last_identifier(head)?;
    if name == type_name || name == "this" {
        return None;
    }
    Some(name)
}

fn property_name(head: &str) -> Option<String> {
    if head.contains("this[") || has_word(head, "event") {
        return None;
    }
    last_identifier(head)
}

fn strip_generic_suffix(head: &str) -> &str {
    if !head.ends_with('>') {
        return head;
    }
    let mut depth = 0;
    for (i, c) in head.char_indices().rev() {
        match c {
            '>' => depth += 1,
            '<' => {
                depth -= 1;
                if depth == 0 {
                    return head[..i].trim_end();
                }
            }
            _ => {}
        }
    }
    head
}

/// Declared names of a field statement: `public int a, b = 2, c;`.
fn field_names(header: &str) -> Vec<String> {
    split_top_level(header, ',')
        .into_iter()
        .filter_map(|declarator| {
            let end = find_assignment(declarator).map_or(declarator.len(), |(at, _)| at);
            let declarator = declarator[..end].trim_end();
            // fixed-size buffer: `fixed byte data[16]`
            let declarator = match declarator.strip_suffix(']') {
                Some(inner) => inner.rfind('[').map_or(declarator, |open| &inner[..open]),
                None => declarator,
            };
            last_identifier(declarator)
        })
        .collect()
}

/// Parse the inside of one `[...]` section into attributes.
fn parse_attribute_section(inner: &str) -> Vec<Attribute> {
    let body = match RE_ATTR_TARGET.captures(inner) {
        Some(caps) if matches!(&caps[1], "assembly" | "module") => return Vec::new(),
        Some(caps) => caps.get(2).map_or(inner, |m| m.as_str()),
        None => inner,
    };

    split_top_level(body, ',')
        .into_iter()
        .map(str::trim)
        .filter(|spec| !spec.is_empty())
        .map(|spec| {
            let (name, args) = match spec.find('(') {
                Some(open) => (
                    spec[..open].trim(),
                    spec[open + 1..].trim_end().strip_suffix(')').unwrap_or(&spec[open + 1..]),
                ),
                None => (spec, ""),
            };
            let mut attribute = Attribute::new(name);
            for arg in split_top_level(args, ',').into_iter().map(str::trim) {
                if arg.is_empty() {
                    continue;
                }
                attribute = match RE_NAMED_ARG.captures(arg) {
                    Some(caps) => attribute.with_argument(&caps[1], caps[2].trim()),
                    None => attribute.with_argument("", arg),
                };
            }
            attribute
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(decls: &[Declaration]) -> Vec<(String, &'static str)> {
        decls
            .iter()
            .map(|d| (d.names.join(","), d.kind.as_str()))
            .collect()
    }

    #[test]
    fn class_with_members() {
        let src = r#"
namespace Game.Core
{
    /// <summary>A player.</summary>
    public class Player : MonoBehaviour, IDamageable
    {
        /// <summary>Health.</summary>
        public int Health = 100;

        /// <summary>Name.</summary>
        public string Name { get; set; } = "Bob";

        /// <summary>Hits the player.</summary>
        public void Hit(int amount = 1) { if (amount > 0) { Health -= amount; } }

        public Player() { }
    }
}
"#;
        let decls = scan(src).unwrap();
        assert_eq!(
            names(&decls),
            vec![
                ("Player".to_string(), "class"),
                ("Health".to_string(), "field"),
                ("Name".to_string(), "property"),
                ("Hit".to_string(), "method"),
            ]
        );
        assert_eq!(decls[0].base_types, vec!["MonoBehaviour", "IDamageable"]);
        assert_eq!(decls[0].namespace, "Game.Core");
        assert_eq!(decls[0].parent, None);
        assert!(decls[1..].iter().all(|d| d.parent == Some(0)));
        assert_eq!(decls[3].raw_comment, "/// <summary>Hits the player.</summary>");
    }

    #[test]
    fn multiple_declarators() {
        let src = "class A {\n/// <summary>xy</summary>\n[Range(0, Max = 10)] public int x, y = 2, z;\n}";
        let decls = scan(src).unwrap();
        assert_eq!(decls[1].names, vec!["x", "y", "z"]);
        assert_eq!(
            decls[1].attributes,
            vec![Attribute::new("Range")
                .with_argument("", "0")
                .with_argument("Max", "10")]
        );
    }

    #[test]
    fn doc_after_attribute_is_ignored() {
        let src = r#"class A {
    /// <summary>Correct</summary>
    [Output]
    /// <summary>Incorrect</summary>
    public string BigTest = "Big";
}"#;
        let decls = scan(src).unwrap();
        assert_eq!(decls[1].raw_comment, "/// <summary>Correct</summary>");
        assert_eq!(decls[1].attributes, vec![Attribute::new("Output")]);
    }

    #[test]
    fn plain_comment_between_doc_and_member() {
        let src = "class A {\n/// <summary>Doc</summary>\n// not docs\npublic string V = \"t\";\n// Input description\n[Input] public string I;\n}";
        let decls = scan(src).unwrap();
        assert_eq!(decls[1].raw_comment, "/// <summary>Doc</summary>");
        assert_eq!(decls[2].raw_comment, "");
    }

    #[test]
    fn nested_types_and_file_scoped_namespace() {
        let src = "namespace Outer.Inner;\n/// <summary>a</summary>\npublic class A {\n  /// <summary>b</summary>\n  public struct B { public int X; }\n  public enum Mode { One, Two }\n  public int After;\n}";
        let decls = scan(src).unwrap();
        assert_eq!(
            names(&decls),
            vec![
                ("A".to_string(), "class"),
                ("B".to_string(), "struct"),
                ("X".to_string(), "field"),
                ("Mode".to_string(), "enum"),
                ("After".to_string(), "field"),
            ]
        );
        assert_eq!(decls[2].parent, Some(1));
        assert_eq!(decls[3].parent, Some(0));
        assert_eq!(decls[4].parent, Some(0));
        assert!(decls.iter().all(|d| d.namespace == "Outer.Inner"));
    }

    #[test]
    fn braces_in_strings_and_initializers() {
        let src = r#"class A {
    public string S = "{ not a block";
    public int[] Values = { 1, 2 };
    public int Computed => Values.Length;
    public char C = '}';
    public abstract void Run();
    public T Get<T>() where T : class { return null; }
}"#;
        let decls = scan(src).unwrap();
        assert_eq!(
            names(&decls),
            vec![
                ("A".to_string(), "class"),
                ("S".to_string(), "field"),
                ("Values".to_string(), "field"),
                ("Computed".to_string(), "property"),
                ("C".to_string(), "field"),
                ("Run".to_string(), "method"),
                ("Get".to_string(), "method"),
            ]
        );
    }

    #[test]
    fn skips_events_operators_and_indexers() {
        let src = "class A {\n public event System.Action Changed;\n public static A operator +(A a, A b) => a;\n public int this[int i] { get { return i; } }\n ~A() { }\n}";
        let decls = scan(src).unwrap();
        assert_eq!(names(&decls), vec![("A".to_string(), "class")]);
    }

    #[test]
    fn block_doc_comment() {
        let src = "/** <summary>Block</summary> */\ninterface IThing { void Do(); }";
        let decls = scan(src).unwrap();
        assert_eq!(decls[0].raw_comment, "/** <summary>Block</summary> */");
        assert_eq!(decls[0].kind, DeclKind::Interface);
        assert_eq!(decls[1].names, vec!["Do"]);
    }

    #[test]
    fn blank_line_ends_doc_block() {
        let src = "class A {\n/// <summary>first</summary>\n\n/// <summary>second</summary>\npublic int X;\n}";
        let decls = scan(src).unwrap();
        assert_eq!(decls[1].raw_comment, "/// <summary>first</summary>");
    }

    #[test]
    fn attribute_targets() {
        let attrs = parse_attribute_section("field: SerializeField, Tooltip(\"a, b\")");
        assert_eq!(
            attrs,
            vec![
                Attribute::new("SerializeField"),
                Attribute::new("Tooltip").with_argument("", "\"a, b\""),
            ]
        );
        assert!(parse_attribute_section("assembly: InternalsVisibleTo(\"X\")").is_empty());
    }

    #[test]
    fn unbalanced_brace_is_an_error() {
        assert_eq!(scan("class A { }\n}"), Err(ExtractError::UnbalancedBrace(2)));
    }

    #[test]
    fn unclosed_scope_is_an_error() {
        assert_eq!(scan("namespace A { class B {"), Err(ExtractError::UnclosedScope(2)));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(matches!(
            scan("class A { string s = \"oops\n; }"),
            Err(ExtractError::Unterminated { what: "string literal", line: 1 })
        ));
    }

    #[test]
    fn record_primary_constructor() {
        let decls = scan("/// <summary>r</summary>\npublic record Point(int X, int Y) : IShape;").unwrap();
        assert_eq!(decls[0].kind, DeclKind::Class);
        assert_eq!(decls[0].names, vec!["Point"]);
        assert_eq!(decls[0].base_types, vec!["IShape"]);
    }
}
