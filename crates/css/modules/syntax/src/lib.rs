//! CSS Syntax Module Level 3 — Parsing and serialization.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
//!
//! Thin adapter over `cssparser` that turns stylesheet text into a flat list of
//! top-level nodes (qualified rules, at-rules and syntax errors). Rule bodies
//! are parsed into declaration blocks; everything else is kept as canonical
//! text produced by [`serialize_tokens`].
use core::fmt;
use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::BasicParseErrorKind;
use cssparser::CowRcStr;
use cssparser::DeclarationParser as CssDeclarationParser;
use cssparser::ParseError;
use cssparser::ParseErrorKind;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::RuleBodyItemParser as CssRuleBodyItemParser;
use cssparser::RuleBodyParser as CssRuleBodyParser;
use cssparser::SourceLocation;
use cssparser::StyleSheetParser;
use cssparser::ToCss as _;
use cssparser::Token;
use log::trace;

/// At-rules whose block holds a list of rules rather than declarations.
const RULE_LIST_AT_RULES: [&str; 7] = [
    "media",
    "supports",
    "container",
    "layer",
    "document",
    "scope",
    "starting-style",
];

/// Position in the source text. Both fields are 1-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    /// Line number.
    pub line: u32,
    /// Column number.
    pub column: u32,
}

impl From<SourceLocation> for Location {
    fn from(location: SourceLocation) -> Self {
        Self {
            line: location.line.saturating_add(1),
            column: location.column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.line, self.column)
    }
}

/// A syntax problem reported by the parser. Never fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    /// Human-readable description.
    pub message: String,
    /// Where the offending construct starts.
    pub location: Location,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} at {}", self.message, self.location)
    }
}

impl SyntaxError {
    fn from_parse_error(error: &ParseError<'_, ()>) -> Self {
        let message = match &error.kind {
            ParseErrorKind::Basic(basic) => describe_basic_error(basic),
            ParseErrorKind::Custom(()) => "invalid declaration value".to_owned(),
        };
        Self {
            message,
            location: error.location.into(),
        }
    }
}

fn describe_basic_error(kind: &BasicParseErrorKind<'_>) -> String {
    match kind {
        BasicParseErrorKind::UnexpectedToken(token) => {
            format!("unexpected token `{}`", token.to_css_string())
        }
        BasicParseErrorKind::EndOfInput => "unexpected end of input".to_owned(),
        BasicParseErrorKind::AtRuleInvalid(name) => format!("invalid at-rule @{}", &**name),
        BasicParseErrorKind::AtRuleBodyInvalid => "invalid at-rule body".to_owned(),
        BasicParseErrorKind::QualifiedRuleInvalid => "invalid rule".to_owned(),
    }
}

/// A single CSS declaration (property: value [!important]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name.
    pub name: String,
    /// Canonical value text (without trailing !important).
    pub value: String,
    /// Whether the declaration was marked as `!important`.
    pub important: bool,
}

/// Declarations of one block, plus the items that failed to parse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeclarationBlock {
    /// Valid declarations in source order.
    pub declarations: Vec<Declaration>,
    /// Invalid items, skipped.
    pub errors: Vec<SyntaxError>,
}

/// A style rule: selector clause plus its declaration block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualifiedRule {
    /// Canonical prelude text (the selector list), trimmed.
    pub prelude: String,
    /// Parsed rule body.
    pub block: DeclarationBlock,
    /// Start of the rule.
    pub location: Location,
}

/// An at-rule kept mostly as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtRule {
    /// Name as written, without the `@`.
    pub name: String,
    /// Canonical prelude text, untrimmed.
    pub prelude: String,
    /// Canonical text of the `{}` body, if the rule has one.
    pub content: Option<String>,
    /// Nested nodes for conditional group rules such as `@media`.
    pub rules: Vec<Node>,
    /// Start of the rule.
    pub location: Location,
}

impl AtRule {
    /// ASCII-lowercased name.
    pub fn keyword(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Prelude with surrounding whitespace removed.
    pub fn prelude_text(&self) -> &str {
        self.prelude.trim()
    }

    /// Render the whole rule back to CSS.
    pub fn to_css(&self) -> String {
        match &self.content {
            Some(content) => format!("@{}{}{{{content}}}", self.name, self.prelude),
            None => format!("@{}{};", self.name, self.prelude),
        }
    }
}

/// A top-level item of a stylesheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A style rule.
    Qualified(QualifiedRule),
    /// An at-rule.
    AtRule(AtRule),
    /// Something that could not be parsed; the parser resumed after it.
    Error(SyntaxError),
}

/// Render every remaining token of `input` back to CSS text.
///
/// Comments are dropped, whitespace is kept as written and nested blocks are
/// always closed, even when the source left them open.
pub fn serialize_tokens(input: &mut Parser<'_, '_>) -> String {
    let mut out = String::new();
    write_tokens(input, &mut out);
    out
}

fn write_tokens(input: &mut Parser<'_, '_>, dest: &mut String) {
    loop {
        let token = match input.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        dest.push_str(&token.to_css_string());
        let closing = match token {
            Token::Function(_) | Token::ParenthesisBlock => ')',
            Token::SquareBracketBlock => ']',
            Token::CurlyBracketBlock => '}',
            _ => continue,
        };
        let nested: Result<(), ParseError<'_, ()>> = input.parse_nested_block(|block| {
            write_tokens(block, dest);
            Ok(())
        });
        if let Err(error) = nested {
            trace!("nested block ended early: {:?}", error.kind);
        }
        dest.push(closing);
    }
}

/// Canonical form of arbitrary CSS text (see [`serialize_tokens`]).
pub fn to_canonical_css(css: &str) -> String {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    serialize_tokens(&mut parser)
}

/// Parse `!important` at the end of a value, returning (`value_without_important`, `important_flag`).
fn split_important_tail(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    let lowered = trimmed.to_ascii_lowercase();
    if let Some(head) = lowered
        .strip_suffix("important")
        .map(str::trim_end)
        .and_then(|head| head.strip_suffix('!'))
        && let Some(prefix) = trimmed.get(..head.len())
    {
        return (prefix.trim_end().to_owned(), true);
    }
    (trimmed.to_owned(), false)
}

/// A declaration parser that records property name and its canonical value.
struct BodyDeclParser;

impl<'input> CssDeclarationParser<'input> for BodyDeclParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'tokens>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, 'tokens>,
        _declaration_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'input, Self::Error>> {
        let raw = serialize_tokens(input);
        let (value, important) = split_important_tail(&raw);
        if value.is_empty() {
            return Err(input.new_custom_error(()));
        }
        Ok(Declaration {
            name: name.to_ascii_lowercase(),
            value,
            important,
        })
    }
}

impl<'input> CssAtRuleParser<'input> for BodyDeclParser {
    type Prelude = ();
    type AtRule = Declaration; // Not produced
    type Error = ();

    #[inline]
    fn parse_prelude<'tokens>(
        &mut self,
        _name: CowRcStr<'input>,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        while input.next().is_ok() {}
        Ok(())
    }

    #[inline]
    fn parse_block<'tokens>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::AtRule, ParseError<'input, Self::Error>> {
        // Nested at-rules have no place in a flat declaration block.
        Err(input.new_error(BasicParseErrorKind::AtRuleBodyInvalid))
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Err(())
    }
}

impl<'input> CssQualifiedRuleParser<'input> for BodyDeclParser {
    type Prelude = ();
    type QualifiedRule = Declaration; // Not produced
    type Error = ();

    #[inline]
    fn parse_prelude<'tokens>(
        &mut self,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }

    #[inline]
    fn parse_block<'tokens>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }
}

impl<'input> CssRuleBodyItemParser<'input, Declaration, ()> for BodyDeclParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Parse declarations from a block using the `cssparser` body parser.
fn parse_declaration_items(block: &mut Parser<'_, '_>) -> DeclarationBlock {
    let mut out = DeclarationBlock::default();
    let mut body = BodyDeclParser;
    for item in CssRuleBodyParser::new(block, &mut body) {
        match item {
            Ok(declaration) => out.declarations.push(declaration),
            Err((error, _slice)) => out.errors.push(SyntaxError::from_parse_error(&error)),
        }
    }
    out
}

/// Parse a declaration list such as the contents of a `style` attribute.
pub fn parse_declaration_list(css: &str) -> DeclarationBlock {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_declaration_items(&mut parser)
}

/// Prelude carried from `parse_prelude` to `parse_block` for at-rules.
struct AtRulePrelude {
    name: String,
    text: String,
}

/// Top-level parser that builds `Node` items.
struct TopLevelParser;

impl<'input> CssAtRuleParser<'input> for TopLevelParser {
    type Prelude = AtRulePrelude;
    type AtRule = Node;
    type Error = ();

    #[inline]
    fn parse_prelude<'tokens>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Ok(AtRulePrelude {
            name: name.to_string(),
            text: serialize_tokens(input),
        })
    }

    #[inline]
    fn parse_block<'tokens>(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::AtRule, ParseError<'input, Self::Error>> {
        let body_start = input.state();
        let content = serialize_tokens(input);
        let rules = if RULE_LIST_AT_RULES.contains(&prelude.name.to_ascii_lowercase().as_str()) {
            input.reset(&body_start);
            parse_rule_list(input)
        } else {
            Vec::new()
        };
        Ok(Node::AtRule(AtRule {
            name: prelude.name,
            prelude: prelude.text,
            content: Some(content),
            rules,
            location: start.source_location().into(),
        }))
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(Node::AtRule(AtRule {
            name: prelude.name,
            prelude: prelude.text,
            content: None,
            rules: Vec::new(),
            location: start.source_location().into(),
        }))
    }
}

impl<'input> CssQualifiedRuleParser<'input> for TopLevelParser {
    type Prelude = String; // canonical selector/prelude
    type QualifiedRule = Node;
    type Error = ();

    #[inline]
    fn parse_prelude<'tokens>(
        &mut self,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Ok(serialize_tokens(input).trim().to_owned())
    }

    #[inline]
    fn parse_block<'tokens>(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        Ok(Node::Qualified(QualifiedRule {
            prelude,
            block: parse_declaration_items(input),
            location: start.source_location().into(),
        }))
    }
}

fn parse_rule_list(input: &mut Parser<'_, '_>) -> Vec<Node> {
    let mut top = TopLevelParser;
    StyleSheetParser::new(input, &mut top)
        .map(|item| match item {
            Ok(node) => node,
            Err((error, _slice)) => Node::Error(SyntaxError::from_parse_error(&error)),
        })
        .collect()
}

/// Parse a full stylesheet into top-level nodes using cssparser.
pub fn parse_stylesheet(css: &str) -> Vec<Node> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_rule_list(&mut parser)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qualified(node: &Node) -> Option<&QualifiedRule> {
        match node {
            Node::Qualified(rule) => Some(rule),
            _ => None,
        }
    }

    fn at_rule(node: &Node) -> Option<&AtRule> {
        match node {
            Node::AtRule(rule) => Some(rule),
            _ => None,
        }
    }

    #[test]
    fn parses_rules_and_lowercases_property_names() {
        let nodes = parse_stylesheet("a, b { COLOR: Red; margin: 0 auto !important }");
        assert_eq!(nodes.len(), 1);
        let rule = qualified(&nodes[0]).unwrap();
        assert_eq!(rule.prelude, "a, b");
        assert_eq!(
            rule.block.declarations,
            vec![
                Declaration {
                    name: "color".into(),
                    value: "Red".into(),
                    important: false,
                },
                Declaration {
                    name: "margin".into(),
                    value: "0 auto".into(),
                    important: true,
                },
            ]
        );
        assert_eq!(rule.location, Location { line: 1, column: 1 });
    }

    #[test]
    fn comments_are_dropped_from_preludes_and_values() {
        let nodes = parse_stylesheet("/* head */ .a /* x */ { color: /* y */ blue; }");
        let rule = nodes.iter().find_map(qualified);
        assert_eq!(rule.map(|found| found.prelude.as_str()), Some(".a"));
        assert_eq!(
            rule.map(|found| found.block.declarations[0].value.as_str()),
            Some("blue")
        );
    }

    #[test]
    fn keeps_function_arguments_and_strings() {
        let block = parse_declaration_list(
            "background: url(\"a,b.png\") no-repeat; width: calc(100% - (2 * 4px))",
        );
        assert!(block.errors.is_empty());
        assert_eq!(block.declarations[0].value, "url(\"a,b.png\") no-repeat");
        assert_eq!(block.declarations[1].value, "calc(100% - (2 * 4px))");
    }

    #[test]
    fn invalid_declarations_are_reported_and_skipped() {
        let block = parse_declaration_list("color red; width: 1px; height: ;");
        assert_eq!(block.declarations.len(), 1);
        assert_eq!(block.declarations[0].name, "width");
        assert_eq!(block.errors.len(), 2);
        assert_eq!(block.errors[0].location.line, 1);
    }

    #[test]
    fn at_rules_keep_their_text() {
        let css = "@import url(base.css);\n@keyframes spin {\n  from { opacity: 0 }\n  to { opacity: 1 }\n}";
        let nodes = parse_stylesheet(css);
        let rules: Vec<&AtRule> = nodes.iter().filter_map(at_rule).collect();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].keyword(), "import");
        assert_eq!(rules[0].content, None);
        assert_eq!(rules[0].to_css(), "@import url(base.css);");
        assert_eq!(rules[1].keyword(), "keyframes");
        assert_eq!(rules[1].prelude_text(), "spin");
        assert_eq!(
            rules[1].to_css(),
            "@keyframes spin {\n  from { opacity: 0 }\n  to { opacity: 1 }\n}"
        );
        assert_eq!(rules[1].location.line, 2);
    }

    #[test]
    fn media_rules_expose_nested_nodes() {
        let nodes = parse_stylesheet("@MEDIA (max-width: 600px) { .a { color: red } .b { } }");
        let media = nodes.iter().find_map(at_rule);
        assert_eq!(media.map(AtRule::keyword).as_deref(), Some("media"));
        let nested: Vec<&QualifiedRule> = media
            .map(|rule| rule.rules.iter().filter_map(qualified).collect())
            .unwrap_or_default();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].prelude, ".a");
        assert!(nested[1].block.declarations.is_empty());
    }

    #[test]
    fn unfinished_trailing_rule_becomes_error_node() {
        let nodes = parse_stylesheet(".a { color: red }\n.b");
        assert_eq!(nodes.len(), 2);
        assert!(matches!(nodes[0], Node::Qualified(_)));
        let Node::Error(error) = &nodes[1] else {
            panic!("expected an error node, got {:?}", nodes[1]);
        };
        assert_eq!(error.location.line, 2);
    }

    #[test]
    fn canonical_text_closes_unterminated_blocks() {
        assert_eq!(to_canonical_css("a[title=x"), "a[title=x]");
        assert_eq!(to_canonical_css("rgb(1, 2 /* c */, 3"), "rgb(1, 2 , 3)");
    }

    #[test]
    fn important_marker_tolerates_spacing_and_case() {
        assert_eq!(split_important_tail("red ! IMPORTANT"), ("red".into(), true));
        assert_eq!(split_important_tail("red"), ("red".into(), false));
        assert_eq!(split_important_tail("important"), ("important".into(), false));
    }
}
