use core::fmt;

use super::Span;
use super::parser::Rule;

/// A syntax error: the input does not conform to the grammar, a literal
/// could not be decoded, or the expression is nested too deeply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl core::error::Error for ParseError {}

pub(crate) fn convert_pest_error(error: pest::error::Error<Rule>) -> ParseError {
    let error = error.renamed_rules(rule_name);
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => Span::new(pos, pos),
        pest::error::InputLocation::Span((start, end)) => Span::new(start, end),
    };
    let (line, column) = match error.line_col {
        pest::error::LineColLocation::Pos(pos) => pos,
        pest::error::LineColLocation::Span(start, _) => start,
    };
    let message = match &error.variant {
        pest::error::ErrorVariant::CustomError { message } => message.clone(),
        pest::error::ErrorVariant::ParsingError { .. } => error.variant.message().into_owned(),
    };
    ParseError {
        message,
        span,
        line,
        column,
    }
}

fn rule_name(rule: &Rule) -> String {
    let name = match rule {
        Rule::EOI => "end of input",
        Rule::bool_expr | Rule::and_expr | Rule::not_expr | Rule::bool_compare => {
            "boolean expression"
        }
        Rule::expr | Rule::term | Rule::unary => "expression",
        Rule::membership => "membership test",
        Rule::comparison => "comparison",
        Rule::bool_function | Rule::value_function | Rule::call => "function call",
        Rule::function_name => "function name",
        Rule::bool_variable | Rule::variable => "variable",
        Rule::bool_identifier | Rule::identifier => "identifier",
        Rule::bool_bracket | Rule::bracket => "parenthesized expression",
        Rule::string_list | Rule::number_list => "list",
        Rule::list_number | Rule::number => "number",
        Rule::string => "string",
        Rule::boolean => "boolean",
        Rule::or_op => "`or`",
        Rule::and_op => "`and`",
        Rule::not_op => "`!`",
        Rule::in_op => "`in`",
        Rule::not_in_op => "`not in`",
        Rule::eq => "`=`",
        Rule::neq => "`!=`",
        Rule::gt => "`>`",
        Rule::ge => "`>=`",
        Rule::lt => "`<`",
        Rule::le => "`<=`",
        Rule::add => "`+`",
        Rule::sub | Rule::neg => "`-`",
        Rule::mul => "`*`",
        Rule::div => "`/`",
        other => return format!("{other:?}"),
    };
    name.to_string()
}
