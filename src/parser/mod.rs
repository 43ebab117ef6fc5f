//! # Parser
//!
//! This module turns the flat token stream into a forest of AST nodes, one
//! per top level statement. It is a plain recursive descent parser: statements
//! dispatch on their leading keyword, expressions climb an explicit
//! precedence ladder from `||` down to primaries.

pub mod ast;

use std::{error::Error, fmt::Display};

use crate::lexer::{Token, TokenKind, Tokens};
use crate::Ast;

use self::ast::{BinaryOp, Expression, Param, Statement, UnaryOp};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParseError {
    pub message: String,
    pub position: Option<(usize, usize)>,
}

impl ParseError {
    pub fn eof(item: &str) -> ParseError {
        ParseError {
            message: format!("hit EOF while parsing {item}"),
            position: None,
        }
    }

    fn at(message: impl Into<String>, token: &Token) -> ParseError {
        ParseError {
            message: message.into(),
            position: Some((token.line, token.column)),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some((line, column)) = self.position {
            write!(f, "{} at line {line}, column {column}", self.message)
        } else {
            f.write_str(&self.message)
        }
    }
}

impl Error for ParseError {}

fn is_type_keyword(lexeme: &str) -> bool {
    matches!(lexeme, "string" | "int" | "bool" | "float" | "array")
}

pub struct Parser {
    tokens: Tokens,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }

    pub fn parse(mut self) -> Result<Ast, ParseError> {
        let mut statements = vec![];

        while self.tokens.peek().is_some() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.peek()
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.peek().map(|token| token.kind)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let Some(token) = self.tokens.next() else {
            return Err(ParseError::eof(&format!("{kind:?}")));
        };

        if token.kind != kind {
            return Err(ParseError::at(
                format!("Expected {:?}, got {:?}", kind, token.kind),
                &token,
            ));
        }

        Ok(token)
    }

    fn expect_keyword(&mut self, word: &str) -> Result<Token, ParseError> {
        let Some(token) = self.tokens.next() else {
            return Err(ParseError::eof(&format!("'{word}'")));
        };

        if !token.is_keyword(word) {
            return Err(ParseError::at(
                format!("Expected '{}', got '{}'", word, token.lexeme),
                &token,
            ));
        }

        Ok(token)
    }

    /// Statements may carry an optional terminating `;`.
    fn eat_semicolon(&mut self) {
        if self.peek_kind() == Some(TokenKind::Semicolon) {
            self.tokens.next();
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let Some(token) = self.peek() else {
            return Err(ParseError::eof("statement"));
        };

        let statement = match token.kind {
            TokenKind::Keyword => match token.lexeme.as_str() {
                "var" => self.parse_var_declaration()?,
                "func" => self.parse_function_declaration()?,
                "return" => self.parse_return()?,
                "print" => self.parse_print()?,
                "if" => self.parse_if_statement()?,
                "while" => self.parse_while()?,
                "for" => self.parse_for()?,
                "try" => self.parse_try_catch()?,
                "throw" => self.parse_throw()?,
                _ => Statement::Expression(self.parse_expression()?),
            },
            TokenKind::Identifier
                if matches!(
                    self.tokens.peek_nth(1),
                    Some(next) if next.kind == TokenKind::Assign
                ) =>
            {
                self.parse_assignment()?
            }
            _ => Statement::Expression(self.parse_expression()?),
        };

        self.eat_semicolon();

        Ok(statement)
    }

    fn parse_var_declaration(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("var")?;
        let name = self.expect(TokenKind::Identifier)?.lexeme;

        let declared_type = if self.peek_kind() == Some(TokenKind::Colon) {
            self.tokens.next();
            Some(self.parse_type_name()?)
        } else {
            None
        };

        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;

        Ok(Statement::VarDeclaration {
            name,
            declared_type,
            value,
        })
    }

    fn parse_type_name(&mut self) -> Result<String, ParseError> {
        let Some(token) = self.tokens.next() else {
            return Err(ParseError::eof("type name"));
        };

        if token.kind == TokenKind::Keyword && is_type_keyword(&token.lexeme) {
            Ok(token.lexeme)
        } else {
            Err(ParseError::at(
                format!("Expected type name, got '{}'", token.lexeme),
                &token,
            ))
        }
    }

    fn parse_assignment(&mut self) -> Result<Statement, ParseError> {
        let name = self.expect(TokenKind::Identifier)?.lexeme;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;

        Ok(Statement::Assignment { name, value })
    }

    fn parse_function_declaration(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("func")?;
        let name = self.expect(TokenKind::Identifier)?.lexeme;
        let params = self.parse_params()?;

        let return_type = match self.peek() {
            Some(token) if token.kind == TokenKind::Keyword && is_type_keyword(&token.lexeme) => {
                self.tokens.next();
                Some(token.lexeme)
            }
            _ => None,
        };

        let body = self.parse_block()?;

        Ok(Statement::FunctionDeclaration {
            name,
            params,
            return_type,
            body,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut params = vec![];

        while self.peek_kind() != Some(TokenKind::RParen) {
            if !params.is_empty() {
                self.expect(TokenKind::Comma)?;
            }

            let name = self.expect(TokenKind::Identifier)?.lexeme;
            let declared_type = if self.peek_kind() == Some(TokenKind::Colon) {
                self.tokens.next();
                Some(self.parse_type_name()?)
            } else {
                None
            };

            params.push(Param {
                name,
                declared_type,
            });
        }

        self.expect(TokenKind::RParen)?;

        Ok(params)
    }

    fn parse_block(&mut self) -> Result<Vec<Statement>, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut body = vec![];

        loop {
            match self.peek_kind() {
                None => return Err(ParseError::eof("block")),
                Some(TokenKind::RBrace) => break,
                _ => body.push(self.parse_statement()?),
            }
        }

        self.expect(TokenKind::RBrace)?;

        Ok(body)
    }

    fn parse_return(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("return")?;
        let value = self.parse_expression()?;

        Ok(Statement::Return { value })
    }

    fn parse_throw(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("throw")?;
        let value = self.parse_expression()?;

        Ok(Statement::Throw { value })
    }

    fn parse_print(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("print")?;
        let arguments = self.parse_call_arguments()?;

        Ok(Statement::Print { arguments })
    }

    fn parse_if_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("if")?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let then_branch = self.parse_block()?;

        let else_branch = if matches!(self.peek(), Some(token) if token.is_keyword("else")) {
            self.tokens.next();
            self.parse_block()?
        } else {
            vec![]
        };

        Ok(Statement::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("while")?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;

        Ok(Statement::While { condition, body })
    }

    fn parse_for(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("for")?;
        let iterator = self.expect(TokenKind::Identifier)?.lexeme;
        self.expect_keyword("in")?;

        let start = self.parse_expression()?;
        let iterable = if self.peek_kind() == Some(TokenKind::Range) {
            self.tokens.next();
            let end = self.parse_expression()?;
            Expression::Range {
                start: Box::new(start),
                end: Box::new(end),
            }
        } else {
            start
        };

        let body = self.parse_block()?;

        Ok(Statement::For {
            iterator,
            iterable,
            body,
        })
    }

    fn parse_try_catch(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword("try")?;
        let try_body = self.parse_block()?;
        self.expect_keyword("catch")?;
        let catch_name = self.expect(TokenKind::Identifier)?.lexeme;
        let catch_body = self.parse_block()?;

        Ok(Statement::TryCatch {
            try_body,
            catch_name,
            catch_body,
        })
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_logical_or()
    }

    fn parse_logical_or(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.peek_kind() == Some(TokenKind::Or) {
            self.tokens.next();
            let right = self.parse_logical_and()?;
            left = Expression::Binary {
                op: BinaryOp::Or,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_equality()?;

        while self.peek_kind() == Some(TokenKind::And) {
            self.tokens.next();
            let right = self.parse_equality()?;
            left = Expression::Binary {
                op: BinaryOp::And,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_comparison()?;

        while let Some(op) = match self.peek_kind() {
            Some(TokenKind::Equals) => Some(BinaryOp::Equal),
            Some(TokenKind::NotEquals) => Some(BinaryOp::NotEqual),
            _ => None,
        } {
            self.tokens.next();
            let right = self.parse_comparison()?;
            left = Expression::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_additive()?;

        while let Some(op) = match self.peek_kind() {
            Some(TokenKind::Less) => Some(BinaryOp::Less),
            Some(TokenKind::Greater) => Some(BinaryOp::Greater),
            Some(TokenKind::LessEqual) => Some(BinaryOp::LessEqual),
            Some(TokenKind::GreaterEqual) => Some(BinaryOp::GreaterEqual),
            _ => None,
        } {
            self.tokens.next();
            let right = self.parse_additive()?;
            left = Expression::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_multiplicative()?;

        while let Some(op) = match self.peek_kind() {
            Some(TokenKind::Plus) => Some(BinaryOp::Add),
            Some(TokenKind::Minus) => Some(BinaryOp::Sub),
            _ => None,
        } {
            self.tokens.next();
            let right = self.parse_multiplicative()?;
            left = Expression::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(op) = match self.peek_kind() {
            Some(TokenKind::Multiply) => Some(BinaryOp::Mul),
            Some(TokenKind::Divide) => Some(BinaryOp::Div),
            Some(TokenKind::Modulo) => Some(BinaryOp::Mod),
            _ => None,
        } {
            self.tokens.next();
            let right = self.parse_unary()?;
            left = Expression::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        let op = match self.peek_kind() {
            Some(TokenKind::Plus) => Some(UnaryOp::Plus),
            Some(TokenKind::Minus) => Some(UnaryOp::Minus),
            _ => None,
        };

        if let Some(op) = op {
            self.tokens.next();
            let operand = self.parse_unary()?;
            return Ok(Expression::Unary {
                op,
                operand: Box::new(operand),
            });
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let Some(token) = self.peek() else {
            return Err(ParseError::eof("expression"));
        };

        match token.kind {
            TokenKind::Number => {
                self.tokens.next();
                let value = token.lexeme.parse::<f64>().map_err(|_| {
                    ParseError::at(format!("Invalid number literal '{}'", token.lexeme), &token)
                })?;
                Ok(Expression::Number(value))
            }
            TokenKind::String => {
                self.tokens.next();
                Ok(Expression::Str(token.lexeme))
            }
            TokenKind::Keyword if token.lexeme == "true" || token.lexeme == "false" => {
                self.tokens.next();
                Ok(Expression::Boolean(token.lexeme == "true"))
            }
            TokenKind::Keyword if token.lexeme == "if" => self.parse_conditional(),
            TokenKind::Keyword if token.lexeme == "lambda" => self.parse_lambda(),
            TokenKind::Identifier => {
                match self.tokens.peek_nth(1).map(|next| next.kind) {
                    Some(TokenKind::LParen) => {
                        self.tokens.next();
                        let arguments = self.parse_call_arguments()?;
                        Ok(Expression::FunctionCall {
                            name: token.lexeme,
                            arguments,
                        })
                    }
                    Some(TokenKind::LBracket) => self.parse_index_or_slice(),
                    _ => {
                        self.tokens.next();
                        Ok(Expression::Variable { name: token.lexeme })
                    }
                }
            }
            TokenKind::LParen => {
                self.tokens.next();
                let expression = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expression)
            }
            TokenKind::LBracket => self.parse_array_literal(),
            _ => Err(ParseError::at(
                format!("Unexpected token '{}'", token.lexeme),
                &token,
            )),
        }
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Expression>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut arguments = vec![];

        while self.peek_kind() != Some(TokenKind::RParen) {
            if !arguments.is_empty() {
                self.expect(TokenKind::Comma)?;
            }
            arguments.push(self.parse_expression()?);
        }

        self.expect(TokenKind::RParen)?;

        Ok(arguments)
    }

    fn parse_array_literal(&mut self) -> Result<Expression, ParseError> {
        self.expect(TokenKind::LBracket)?;
        let mut elements = vec![];

        while self.peek_kind() != Some(TokenKind::RBracket) {
            if !elements.is_empty() {
                self.expect(TokenKind::Comma)?;
            }
            elements.push(self.parse_expression()?);
        }

        self.expect(TokenKind::RBracket)?;

        Ok(Expression::Array { elements })
    }

    /// Parse `name[index]`, `name[start..end]`, `name[..end]`, `name[start..]`,
    /// or `name[..]` after peeking an identifier followed by `[`.
    fn parse_index_or_slice(&mut self) -> Result<Expression, ParseError> {
        let array = self.expect(TokenKind::Identifier)?.lexeme;
        self.expect(TokenKind::LBracket)?;

        if self.peek_kind() == Some(TokenKind::Range) {
            self.tokens.next();
            let end = self.parse_slice_bound()?;
            self.expect(TokenKind::RBracket)?;
            return Ok(Expression::ArraySlice {
                array,
                start: None,
                end,
            });
        }

        let first = self.parse_expression()?;

        if self.peek_kind() == Some(TokenKind::Range) {
            self.tokens.next();
            let end = self.parse_slice_bound()?;
            self.expect(TokenKind::RBracket)?;
            return Ok(Expression::ArraySlice {
                array,
                start: Some(Box::new(first)),
                end,
            });
        }

        self.expect(TokenKind::RBracket)?;

        Ok(Expression::ArrayAccess {
            array,
            index: Box::new(first),
        })
    }

    fn parse_slice_bound(&mut self) -> Result<Option<Box<Expression>>, ParseError> {
        if self.peek_kind() == Some(TokenKind::RBracket) {
            Ok(None)
        } else {
            Ok(Some(Box::new(self.parse_expression()?)))
        }
    }

    fn parse_conditional(&mut self) -> Result<Expression, ParseError> {
        self.expect_keyword("if")?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let then_expr = self.parse_expression()?;

        let else_expr = if matches!(self.peek(), Some(token) if token.is_keyword("else")) {
            self.tokens.next();
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        Ok(Expression::Conditional {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr,
        })
    }

    fn parse_lambda(&mut self) -> Result<Expression, ParseError> {
        self.expect_keyword("lambda")?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;

        Ok(Expression::Lambda { params, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(input: &str) -> Vec<Statement> {
        let tokens = Lexer::new(input).lex().expect("lexing failed");
        Parser::new(tokens).parse().expect("parsing failed")
    }

    fn parse_expr(input: &str) -> Expression {
        let mut statements = parse(input);
        assert_eq!(statements.len(), 1);
        let Statement::Expression(expression) = statements.remove(0) else {
            panic!("expected an expression statement");
        };
        expression
    }

    fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Expression {
        Expression::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    #[test]
    fn test_parse_multiplicative_precedence() {
        assert_eq!(
            parse_expr("1 + 2 * 3"),
            binary(
                BinaryOp::Add,
                Expression::Number(1.0),
                binary(
                    BinaryOp::Mul,
                    Expression::Number(2.0),
                    Expression::Number(3.0)
                )
            )
        );
    }

    #[test]
    fn test_parse_parens_override_precedence() {
        assert_eq!(
            parse_expr("(1 + 2) * 3"),
            binary(
                BinaryOp::Mul,
                binary(
                    BinaryOp::Add,
                    Expression::Number(1.0),
                    Expression::Number(2.0)
                ),
                Expression::Number(3.0)
            )
        );
    }

    #[test]
    fn test_parse_logical_precedence() {
        let a = Expression::Variable { name: "a".into() };
        let b = Expression::Variable { name: "b".into() };
        let c = Expression::Variable { name: "c".into() };

        assert_eq!(
            parse_expr("a || b && c"),
            binary(BinaryOp::Or, a, binary(BinaryOp::And, b, c))
        );
    }

    #[test]
    fn test_parse_comparison_binds_tighter_than_equality() {
        assert_eq!(
            parse_expr("1 < 2 == true"),
            binary(
                BinaryOp::Equal,
                binary(
                    BinaryOp::Less,
                    Expression::Number(1.0),
                    Expression::Number(2.0)
                ),
                Expression::Boolean(true)
            )
        );
    }

    #[test]
    fn test_parse_unary_minus() {
        assert_eq!(
            parse_expr("-x * 2"),
            binary(
                BinaryOp::Mul,
                Expression::Unary {
                    op: UnaryOp::Minus,
                    operand: Box::new(Expression::Variable { name: "x".into() }),
                },
                Expression::Number(2.0)
            )
        );
    }

    #[test]
    fn test_parse_var_declaration_with_type() {
        assert_eq!(
            parse("var greeting: string = \"hi\";"),
            vec![Statement::VarDeclaration {
                name: "greeting".into(),
                declared_type: Some("string".into()),
                value: Expression::Str("hi".into()),
            }]
        );
    }

    #[test]
    fn test_parse_var_declaration_without_type_or_semicolon() {
        assert_eq!(
            parse("var x = 1"),
            vec![Statement::VarDeclaration {
                name: "x".into(),
                declared_type: None,
                value: Expression::Number(1.0),
            }]
        );
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse("x = x + 1"),
            vec![Statement::Assignment {
                name: "x".into(),
                value: binary(
                    BinaryOp::Add,
                    Expression::Variable { name: "x".into() },
                    Expression::Number(1.0)
                ),
            }]
        );
    }

    #[test]
    fn test_parse_function_declaration() {
        let statements = parse("func add(a: int, b: int) int { return a + b }");

        let [Statement::FunctionDeclaration {
            name,
            params,
            return_type,
            body,
        }] = statements.as_slice()
        else {
            panic!("expected a function declaration");
        };

        assert_eq!(name, "add");
        assert_eq!(
            params,
            &vec![
                Param {
                    name: "a".into(),
                    declared_type: Some("int".into())
                },
                Param {
                    name: "b".into(),
                    declared_type: Some("int".into())
                },
            ]
        );
        assert_eq!(return_type.as_deref(), Some("int"));
        assert!(matches!(body.as_slice(), [Statement::Return { .. }]));
    }

    #[test]
    fn test_parse_function_without_return_type() {
        let statements = parse("func noop() { }");

        assert!(matches!(
            statements.as_slice(),
            [Statement::FunctionDeclaration {
                return_type: None,
                ..
            }]
        ));
    }

    #[test]
    fn test_parse_if_else() {
        let statements = parse("if (x > 0) { print(1) } else { print(2) }");

        let [Statement::If {
            then_branch,
            else_branch,
            ..
        }] = statements.as_slice()
        else {
            panic!("expected an if statement");
        };

        assert_eq!(then_branch.len(), 1);
        assert_eq!(else_branch.len(), 1);
    }

    #[test]
    fn test_parse_for_over_range() {
        let statements = parse("for i in 1..4 { print(i) }");

        let [Statement::For {
            iterator, iterable, ..
        }] = statements.as_slice()
        else {
            panic!("expected a for statement");
        };

        assert_eq!(iterator, "i");
        assert_eq!(
            iterable,
            &Expression::Range {
                start: Box::new(Expression::Number(1.0)),
                end: Box::new(Expression::Number(4.0)),
            }
        );
    }

    #[test]
    fn test_parse_for_over_array_variable() {
        let statements = parse("for item in items { print(item) }");

        assert!(matches!(
            statements.as_slice(),
            [Statement::For {
                iterable: Expression::Variable { .. },
                ..
            }]
        ));
    }

    #[test]
    fn test_parse_try_catch() {
        let statements = parse("try { throw \"boom\" } catch e { print(e) }");

        let [Statement::TryCatch {
            try_body,
            catch_name,
            catch_body,
        }] = statements.as_slice()
        else {
            panic!("expected a try/catch statement");
        };

        assert_eq!(catch_name, "e");
        assert!(matches!(try_body.as_slice(), [Statement::Throw { .. }]));
        assert_eq!(catch_body.len(), 1);
    }

    #[test]
    fn test_parse_array_literal_and_access() {
        assert_eq!(
            parse_expr("[1, 2, 3]"),
            Expression::Array {
                elements: vec![
                    Expression::Number(1.0),
                    Expression::Number(2.0),
                    Expression::Number(3.0),
                ]
            }
        );

        assert_eq!(
            parse_expr("a[-1]"),
            Expression::ArrayAccess {
                array: "a".into(),
                index: Box::new(Expression::Unary {
                    op: UnaryOp::Minus,
                    operand: Box::new(Expression::Number(1.0)),
                }),
            }
        );
    }

    #[test]
    fn test_parse_slices() {
        assert_eq!(
            parse_expr("a[1..3]"),
            Expression::ArraySlice {
                array: "a".into(),
                start: Some(Box::new(Expression::Number(1.0))),
                end: Some(Box::new(Expression::Number(3.0))),
            }
        );

        assert_eq!(
            parse_expr("a[..2]"),
            Expression::ArraySlice {
                array: "a".into(),
                start: None,
                end: Some(Box::new(Expression::Number(2.0))),
            }
        );

        assert_eq!(
            parse_expr("a[1..]"),
            Expression::ArraySlice {
                array: "a".into(),
                start: Some(Box::new(Expression::Number(1.0))),
                end: None,
            }
        );
    }

    #[test]
    fn test_parse_conditional_expression() {
        assert_eq!(
            parse_expr("if (x) 1 else 2"),
            Expression::Conditional {
                condition: Box::new(Expression::Variable { name: "x".into() }),
                then_expr: Box::new(Expression::Number(1.0)),
                else_expr: Some(Box::new(Expression::Number(2.0))),
            }
        );
    }

    #[test]
    fn test_parse_lambda() {
        let statements = parse("var dbl = lambda(x: int) { return x * 2 }");

        let [Statement::VarDeclaration {
            value: Expression::Lambda { params, body },
            ..
        }] = statements.as_slice()
        else {
            panic!("expected a lambda initialization");
        };

        assert_eq!(params.len(), 1);
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn test_parse_call_as_statement() {
        assert_eq!(
            parse("greet(\"world\")"),
            vec![Statement::Expression(Expression::FunctionCall {
                name: "greet".into(),
                arguments: vec![Expression::Str("world".into())],
            })]
        );
    }

    #[test]
    fn test_parse_print_statement() {
        assert_eq!(
            parse("print(1, \"two\");"),
            vec![Statement::Print {
                arguments: vec![Expression::Number(1.0), Expression::Str("two".into())],
            }]
        );
    }

    #[test]
    fn test_parse_unexpected_token() {
        let tokens = Lexer::new("var x = ;").lex().unwrap();
        let result = Parser::new(tokens).parse();

        assert_eq!(
            result,
            Err(ParseError {
                message: "Unexpected token ';'".into(),
                position: Some((1, 9)),
            })
        );
    }

    #[test]
    fn test_parse_unterminated_block() {
        let tokens = Lexer::new("while (true) { print(1)").lex().unwrap();
        let result = Parser::new(tokens).parse();

        assert_eq!(result, Err(ParseError::eof("block")));
    }
}
