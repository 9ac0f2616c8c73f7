use alloc::sync::Arc;

use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

use super::error::{ParseError, convert_pest_error};
use super::string_literal::unescape;
use super::{
    Argument, ArithOp, CallPosition, CompareOp, EqualityOp, Node, NodeKind, Number, Span, Tree,
};

/// Default maximum nesting depth of a syntax tree.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Parser)]
#[grammar = "syntax/expression.pest"]
pub struct ExpressionParser;

/// Knobs for the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Expressions nested deeper than this, counting brackets and prefix
    /// operators, are rejected with a syntax error.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

type PestError = pest::error::Error<Rule>;

fn custom_error(message: String, span: pest::Span<'_>) -> PestError {
    PestError::new_from_span(pest::error::ErrorVariant::CustomError { message }, span)
}

fn depth_message(max_depth: usize) -> String {
    format!("expression nesting depth exceeds maximum of {max_depth} levels")
}

fn unexpected(pair: &Pair<Rule>) -> PestError {
    custom_error(format!("unexpected {:?}", pair.as_rule()), pair.as_span())
}

// Pulls the next pair out of `pairs`, turning a grammar/converter mismatch
// into an error instead of a panic.
fn next<'i>(pairs: &mut Pairs<'i, Rule>, parent: pest::Span<'i>) -> Result<Pair<'i, Rule>, PestError> {
    pairs
        .next()
        .ok_or_else(|| custom_error("malformed syntax tree".to_string(), parent))
}

fn span_of(first: &Node, last: &Node) -> Span {
    Span::new(first.span.start(), last.span.end())
}

struct Converter;

impl Converter {
    fn parse_start(&self, pair: Pair<Rule>) -> Result<Node, PestError> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let body = self.parse_bool(next(&mut inner, span)?)?;
        Ok(Node::new(NodeKind::Start, span.into(), vec![body]))
    }

    // Boolean layer.

    fn parse_bool(&self, pair: Pair<Rule>) -> Result<Node, PestError> {
        match pair.as_rule() {
            Rule::bool_expr => self.fold_bool(pair, NodeKind::Or),
            Rule::and_expr => self.fold_bool(pair, NodeKind::And),
            Rule::not_expr => self.parse_not(pair),
            Rule::bool_compare => self.parse_bool_compare(pair),
            Rule::membership => self.parse_membership(pair),
            Rule::comparison => self.parse_comparison(pair),
            Rule::bool_function => self.parse_call(pair, CallPosition::Bool),
            Rule::boolean => {
                parse_boolean(&pair).map(|b| Node::leaf(NodeKind::Boolean(b), pair.as_span().into()))
            }
            Rule::bool_variable => Ok(Node::leaf(
                NodeKind::BoolVariable(variable_name(&pair)),
                pair.as_span().into(),
            )),
            Rule::bool_identifier => Ok(Node::leaf(
                NodeKind::BoolIdentifier(pair.as_str().to_string()),
                pair.as_span().into(),
            )),
            Rule::bool_bracket => {
                let span = pair.as_span();
                let mut inner = pair.into_inner();
                let body = self.parse_bool(next(&mut inner, span)?)?;
                Ok(Node::new(NodeKind::BoolBracket, span.into(), vec![body]))
            }
            _ => Err(unexpected(&pair)),
        }
    }

    // `a or b or c` becomes `(a or b) or c`. A single operand is returned as is.
    fn fold_bool(&self, pair: Pair<Rule>, kind: NodeKind) -> Result<Node, PestError> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let mut left = self.parse_bool(next(&mut inner, span)?)?;
        while let Some(_op) = inner.next() {
            let right = self.parse_bool(next(&mut inner, span)?)?;
            left = Node::new(kind.clone(), span_of(&left, &right), vec![left, right]);
        }
        Ok(left)
    }

    fn parse_not(&self, pair: Pair<Rule>) -> Result<Node, PestError> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let first = next(&mut inner, span)?;
        if first.as_rule() != Rule::not_op {
            return self.parse_bool(first);
        }
        let operand = self.parse_bool(next(&mut inner, span)?)?;
        Ok(Node::new(NodeKind::Not, span.into(), vec![operand]))
    }

    fn parse_bool_compare(&self, pair: Pair<Rule>) -> Result<Node, PestError> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let left = self.parse_bool(next(&mut inner, span)?)?;
        let Some(op) = inner.next() else {
            return Ok(left);
        };
        let op = match op.as_rule() {
            Rule::eq => EqualityOp::Eq,
            Rule::neq => EqualityOp::Neq,
            _ => return Err(unexpected(&op)),
        };
        let right = self.parse_bool(next(&mut inner, span)?)?;
        Ok(Node::new(NodeKind::BoolCompare(op), span.into(), vec![left, right]))
    }

    fn parse_membership(&self, pair: Pair<Rule>) -> Result<Node, PestError> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let needle = self.parse_value(next(&mut inner, span)?)?;
        let op = next(&mut inner, span)?;
        let negated = match op.as_rule() {
            Rule::in_op => false,
            Rule::not_in_op => true,
            _ => return Err(unexpected(&op)),
        };
        let list = parse_list(next(&mut inner, span)?)?;
        Ok(Node::new(NodeKind::In { negated }, span.into(), vec![needle, list]))
    }

    fn parse_comparison(&self, pair: Pair<Rule>) -> Result<Node, PestError> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let left = self.parse_value(next(&mut inner, span)?)?;
        let op = next(&mut inner, span)?;
        let op = match op.as_rule() {
            Rule::eq => CompareOp::Eq,
            Rule::neq => CompareOp::Neq,
            Rule::gt => CompareOp::Gt,
            Rule::ge => CompareOp::Ge,
            Rule::lt => CompareOp::Lt,
            Rule::le => CompareOp::Le,
            _ => return Err(unexpected(&op)),
        };
        let right = self.parse_value(next(&mut inner, span)?)?;
        Ok(Node::new(NodeKind::Compare(op), span.into(), vec![left, right]))
    }

    // Value layer.

    fn parse_value(&self, pair: Pair<Rule>) -> Result<Node, PestError> {
        match pair.as_rule() {
            Rule::expr | Rule::term => self.fold_arith(pair),
            Rule::unary => self.parse_unary(pair),
            Rule::value_function => self.parse_call(pair, CallPosition::Value),
            Rule::number => {
                parse_number(&pair).map(|n| Node::leaf(NodeKind::Number(n), pair.as_span().into()))
            }
            Rule::string => {
                parse_string(&pair).map(|s| Node::leaf(NodeKind::String(s), pair.as_span().into()))
            }
            Rule::variable => Ok(Node::leaf(
                NodeKind::Variable(variable_name(&pair)),
                pair.as_span().into(),
            )),
            Rule::identifier => Ok(Node::leaf(
                NodeKind::Identifier(pair.as_str().to_string()),
                pair.as_span().into(),
            )),
            Rule::bracket => {
                let span = pair.as_span();
                let mut inner = pair.into_inner();
                let body = self.parse_value(next(&mut inner, span)?)?;
                Ok(Node::new(NodeKind::Bracket, span.into(), vec![body]))
            }
            _ => Err(unexpected(&pair)),
        }
    }

    fn fold_arith(&self, pair: Pair<Rule>) -> Result<Node, PestError> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let mut left = self.parse_value(next(&mut inner, span)?)?;
        while let Some(op) = inner.next() {
            let kind = match op.as_rule() {
                Rule::add => NodeKind::AddSub(ArithOp::Add),
                Rule::sub => NodeKind::AddSub(ArithOp::Sub),
                Rule::mul => NodeKind::MulDiv(ArithOp::Mul),
                Rule::div => NodeKind::MulDiv(ArithOp::Div),
                _ => return Err(unexpected(&op)),
            };
            let right = self.parse_value(next(&mut inner, span)?)?;
            left = Node::new(kind, span_of(&left, &right), vec![left, right]);
        }
        Ok(left)
    }

    fn parse_unary(&self, pair: Pair<Rule>) -> Result<Node, PestError> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let first = next(&mut inner, span)?;
        if first.as_rule() != Rule::neg {
            return self.parse_value(first);
        }
        let operand = self.parse_value(next(&mut inner, span)?)?;
        Ok(Node::new(NodeKind::SubExpression, span.into(), vec![operand]))
    }

    fn parse_call(&self, pair: Pair<Rule>, position: CallPosition) -> Result<Node, PestError> {
        let span = pair.as_span();
        let mut outer = pair.into_inner();
        let call = next(&mut outer, span)?;
        let mut inner = call.into_inner();
        let name = next(&mut inner, span)?.as_str().to_string();
        let args = inner.map(parse_arg).collect::<Result<Vec<_>, _>>()?;
        Ok(Node::new(
            NodeKind::Function { name, position },
            span.into(),
            args,
        ))
    }
}

// Leaves.

fn variable_name(pair: &Pair<Rule>) -> String {
    let text = pair.as_str();
    text.strip_prefix('$').unwrap_or(text).to_string()
}

fn parse_boolean(pair: &Pair<Rule>) -> Result<bool, PestError> {
    match pair.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(custom_error(
            format!("invalid boolean literal `{other}`"),
            pair.as_span(),
        )),
    }
}

fn parse_number(pair: &Pair<Rule>) -> Result<Number, PestError> {
    let text = pair.as_str();
    if text.contains('.') {
        return match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Number::Float(value)),
            _ => Err(custom_error(
                format!("number literal `{text}` is out of range"),
                pair.as_span(),
            )),
        };
    }
    text.parse::<i64>().map(Number::Int).map_err(|_| {
        custom_error(
            format!("integer literal `{text}` is out of range"),
            pair.as_span(),
        )
    })
}

fn parse_string(pair: &Pair<Rule>) -> Result<String, PestError> {
    unescape(pair.as_str())
        .ok_or_else(|| custom_error("invalid string literal".to_string(), pair.as_span()))
}

fn parse_list(pair: Pair<Rule>) -> Result<Node, PestError> {
    let span = pair.as_span();
    let (kind, items) = match pair.as_rule() {
        Rule::string_list => (
            NodeKind::StringList,
            pair.into_inner()
                .map(|item| {
                    parse_string(&item).map(|s| Node::leaf(NodeKind::String(s), item.as_span().into()))
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Rule::number_list => (
            NodeKind::NumberList,
            pair.into_inner()
                .map(|item| {
                    parse_number(&item).map(|n| Node::leaf(NodeKind::Number(n), item.as_span().into()))
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        _ => return Err(unexpected(&pair)),
    };
    Ok(Node::new(kind, span.into(), items))
}

fn parse_arg(pair: Pair<Rule>) -> Result<Node, PestError> {
    let argument = match pair.as_rule() {
        Rule::variable => Argument::Variable(variable_name(&pair)),
        Rule::boolean => Argument::Boolean(parse_boolean(&pair)?),
        Rule::string => Argument::String(parse_string(&pair)?),
        Rule::number => Argument::Number(parse_number(&pair)?),
        _ => return Err(unexpected(&pair)),
    };
    Ok(Node::leaf(NodeKind::Arg(argument), pair.as_span().into()))
}

/// Rough nesting estimate taken before handing the input to the grammar:
/// open parentheses plus the current run of prefix operators. Returns the
/// byte offset at which `max_depth` is first exceeded.
fn lexical_depth_exceeded(source: &str, max_depth: usize) -> Option<usize> {
    let mut parens = 0usize;
    let mut run = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, c) in source.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '\'' {
                in_string = false;
            }
            continue;
        }
        match c {
            '\'' => {
                in_string = true;
                run = 0;
            }
            '(' => {
                parens += 1;
                run = 0;
            }
            ')' => {
                parens = parens.saturating_sub(1);
                run = 0;
            }
            '!' | '-' => run += 1,
            c if c.is_whitespace() => {}
            _ => run = 0,
        }
        if parens + run > max_depth {
            return Some(offset);
        }
    }
    None
}

// Brackets and prefix operators open a nesting level. Operator chains such
// as `a or b or c` do not, however long they are.
fn opens_level(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Bracket | NodeKind::BoolBracket | NodeKind::Not | NodeKind::SubExpression
    )
}

/// Finds the first node (in pre-order) nested more than `max_depth` levels deep.
fn too_deep(root: &Node, max_depth: usize) -> Option<&Node> {
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        let depth = depth + usize::from(opens_level(&node.kind));
        if depth > max_depth {
            return Some(node);
        }
        stack.extend(node.children.iter().rev().map(|child| (child, depth)));
    }
    None
}

fn depth_error(source: &str, span: Span, max_depth: usize) -> ParseError {
    let (line, column) = line_col(source, span.start());
    ParseError {
        message: depth_message(max_depth),
        span,
        line,
        column,
    }
}

fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |last| last.chars().count())
        + 1;
    (line, column)
}

/// Parses an expression with the default options.
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    parse_with_options(source, &ParseOptions::default())
}

/// Parses an expression into an immutable syntax tree.
///
/// The whole input must match the grammar. Literals are decoded here, so an
/// integer literal that does not fit in 64 bits is a syntax error.
pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<Tree, ParseError> {
    let max_depth = options.max_depth;
    if let Some(offset) = lexical_depth_exceeded(source, max_depth) {
        tracing::debug!(offset, max_depth, "Input rejected before parsing");
        return Err(depth_error(source, Span::new(offset, offset + 1), max_depth));
    }

    let mut pairs = ExpressionParser::parse(Rule::start, source).map_err(|e| {
        tracing::debug!("Pest parser failed with: {:?}", e);
        convert_pest_error(e)
    })?;
    let origin = pest::Position::from_start(source);
    let root = next(&mut pairs, origin.span(&origin))
        .and_then(|pair| Converter.parse_start(pair))
        .map_err(convert_pest_error)?;

    if let Some(node) = too_deep(&root, max_depth) {
        return Err(depth_error(source, node.span.clone(), max_depth));
    }

    tracing::trace!(source, "Parsed expression");
    Ok(Tree::new(Arc::from(source), root))
}
