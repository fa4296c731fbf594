//! Recursive descent parser for MAL
//!
//! Builds a [`syntax::Ast`](crate::syntax::Ast) from tokens. Each grammar
//! rule is one method; the rule is quoted in the method's doc comment.

use smol_str::SmolStr;

use super::error::ParseError;
use super::lexer::{Lexer, Token, TokenKind};
use crate::base::{LineIndex, Position, TextSize};
use crate::syntax::ast::*;

type ParseResult<T> = Result<T, ParseError>;

/// Parse MAL source code into a syntax tree
pub fn parse(input: &str, file: &str) -> ParseResult<Ast> {
    let mut parser = Parser::new(input, file);
    let ast = parser.parse_file()?;
    tracing::debug!(
        file,
        categories = ast.categories.len(),
        associations = ast.associations.len(),
        defines = ast.defines.len(),
        "parsed MAL source"
    );
    Ok(ast)
}

/// The parser state
pub struct Parser<'a> {
    source: &'a str,
    file: SmolStr,
    line_index: LineIndex,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, file: impl Into<SmolStr>) -> Self {
        Self {
            source,
            file: file.into(),
            line_index: LineIndex::new(source),
            tokens: Lexer::new(source).collect(),
            pos: 0,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    fn current_text(&self) -> &'a str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn at_any(&self, kinds: &[TokenKind]) -> bool {
        self.current_kind().is_some_and(|k| kinds.contains(&k))
    }

    /// Identifier with exactly the given text (`E`, `C`, `I`, `A`).
    fn at_ident(&self, text: &str) -> bool {
        self.at(TokenKind::Ident) && self.current_text() == text
    }

    fn nth(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token<'a>> {
        match self.current() {
            Some(token) if token.kind == kind => {
                let token = token.clone();
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.error_expected(&[kind.describe()])),
        }
    }

    // =========================================================================
    // Positions and errors
    // =========================================================================

    fn position_at(&self, offset: TextSize) -> Position {
        let (line, column) = self.line_index.line_col(self.source, offset);
        Position::new(self.file.clone(), line, column)
    }

    /// Position of the current token, or of the end of input.
    fn position(&self) -> Position {
        let offset = self
            .current()
            .map(|t| t.offset)
            .unwrap_or_else(|| TextSize::new(self.source.len() as u32));
        self.position_at(offset)
    }

    fn found(&self) -> String {
        match self.current() {
            None => "end of file".to_string(),
            Some(t) if t.kind == TokenKind::Error => format!("invalid character '{}'", t.text),
            Some(t) => t.kind.describe().to_string(),
        }
    }

    fn error_expected(&self, expected: &[&str]) -> ParseError {
        ParseError::expected(self.position(), expected, &self.found())
    }

    // =========================================================================
    // Grammar: top level
    // =========================================================================

    /// `<mal> ::= (<category> | <associations> | <include> | <define>)* EOF`
    pub fn parse_file(&mut self) -> ParseResult<Ast> {
        let mut ast = Ast::new();
        loop {
            match self.current_kind() {
                Some(TokenKind::Category) => ast.categories.push(self.parse_category()?),
                Some(TokenKind::Associations) => {
                    ast.associations.extend(self.parse_associations()?)
                }
                Some(TokenKind::Include) => ast.includes.push(self.parse_include()?),
                Some(TokenKind::Hash) => ast.defines.push(self.parse_define()?),
                None => return Ok(ast),
                Some(_) => {
                    return Err(self.error_expected(&[
                        "'category'",
                        "'associations'",
                        "'include'",
                        "'#'",
                    ]));
                }
            }
        }
    }

    fn parse_id(&mut self) -> ParseResult<Id> {
        let pos = self.position();
        let token = self.expect(TokenKind::Ident)?;
        Ok(Id::new(token.text, pos))
    }

    fn parse_string(&mut self) -> ParseResult<String> {
        let token = self.expect(TokenKind::String)?;
        Ok(unescape(token.text))
    }

    fn parse_number(&mut self) -> ParseResult<f64> {
        if !self.at_any(&[TokenKind::Int, TokenKind::Float]) {
            return Err(self.error_expected(&["integer", "float"]));
        }
        let pos = self.position();
        let text = self.current_text();
        let value = text
            .parse::<f64>()
            .map_err(|_| ParseError::new(pos, format!("Invalid number '{text}'")))?;
        self.bump();
        Ok(value)
    }

    /// `<include> ::= INCLUDE STRING`
    fn parse_include(&mut self) -> ParseResult<Include> {
        self.expect(TokenKind::Include)?;
        let pos = self.position();
        let path = self.parse_string()?;
        Ok(Include { pos, path })
    }

    /// `<define> ::= HASH ID COLON STRING`
    fn parse_define(&mut self) -> ParseResult<Define> {
        let pos = self.position();
        self.expect(TokenKind::Hash)?;
        let key = self.parse_id()?;
        self.expect(TokenKind::Colon)?;
        let value = self.parse_string()?;
        Ok(Define { pos, key, value })
    }

    // =========================================================================
    // Grammar: metadata
    // =========================================================================

    fn at_meta(&self) -> bool {
        (self.at(TokenKind::Ident) && self.nth(1) == Some(TokenKind::Info))
            || (self.at(TokenKind::Info) && self.nth(1) == Some(TokenKind::Colon))
    }

    /// `<meta> ::= ID INFO COLON STRING | INFO COLON STRING`
    fn parse_meta(&mut self) -> ParseResult<Meta> {
        let pos = self.position();
        let kind = if self.at(TokenKind::Info) {
            Id::new("info", pos.clone())
        } else {
            self.parse_id()?
        };
        self.parse_meta_value(pos, kind)
    }

    fn parse_meta_value(&mut self, pos: Position, kind: Id) -> ParseResult<Meta> {
        self.expect(TokenKind::Info)?;
        self.expect(TokenKind::Colon)?;
        let value = self.parse_string()?;
        Ok(Meta { pos, kind, value })
    }

    fn parse_meta_list(&mut self) -> ParseResult<Vec<Meta>> {
        let mut meta = Vec::new();
        while self.at_meta() {
            meta.push(self.parse_meta()?);
        }
        Ok(meta)
    }

    // =========================================================================
    // Grammar: categories and assets
    // =========================================================================

    /// `<category> ::= CATEGORY ID <meta>* LCURLY <asset>* RCURLY`
    fn parse_category(&mut self) -> ParseResult<Category> {
        let pos = self.position();
        self.expect(TokenKind::Category)?;
        let name = self.parse_id()?;
        let meta = self.parse_meta_list()?;
        if !self.eat(TokenKind::LBrace) {
            return Err(self.error_expected(&["identifier", "'{'"]));
        }
        let mut assets = Vec::new();
        while self.at_any(&[TokenKind::Abstract, TokenKind::Asset]) {
            assets.push(self.parse_asset()?);
        }
        if !self.eat(TokenKind::RBrace) {
            return Err(self.error_expected(&["'abstract'", "'asset'", "'}'"]));
        }
        Ok(Category {
            pos,
            name,
            meta,
            assets,
        })
    }

    /// `<asset> ::= ABSTRACT? ASSET ID (EXTENDS ID)? <meta>* LCURLY (<attackstep> | <variable>)* RCURLY`
    fn parse_asset(&mut self) -> ParseResult<Asset> {
        let pos = self.position();
        let is_abstract = self.eat(TokenKind::Abstract);
        self.expect(TokenKind::Asset)?;
        let name = self.parse_id()?;
        let parent = if self.eat(TokenKind::Extends) {
            Some(self.parse_id()?)
        } else {
            None
        };
        let meta = self.parse_meta_list()?;
        if !self.eat(TokenKind::LBrace) {
            return Err(self.error_expected(&["identifier", "'{'"]));
        }

        let mut attack_steps = Vec::new();
        let mut variables = Vec::new();
        loop {
            if self.at(TokenKind::Let) {
                variables.push(self.parse_variable()?);
            } else if self.at_attack_step() {
                attack_steps.push(self.parse_attack_step()?);
            } else if self.eat(TokenKind::RBrace) {
                break;
            } else {
                return Err(self.error_expected(&[
                    "'&'", "'|'", "'#'", "'E'", "'!E'", "'let'", "'}'",
                ]));
            }
        }

        Ok(Asset {
            pos,
            is_abstract,
            name,
            parent,
            meta,
            attack_steps,
            variables,
        })
    }

    // =========================================================================
    // Grammar: attack steps
    // =========================================================================

    fn at_attack_step(&self) -> bool {
        self.at_any(&[
            TokenKind::Amp,
            TokenKind::Pipe,
            TokenKind::Hash,
            TokenKind::NotExist,
        ]) || self.at_ident("E")
    }

    /// `<attackstep> ::= <astype> ID <tag>* <cia>? <ttc>? <meta>* <requires>? <reaches>?`
    fn parse_attack_step(&mut self) -> ParseResult<AttackStep> {
        let pos = self.position();
        let kind = match self.current_kind() {
            Some(TokenKind::Amp) => AttackStepKind::All,
            Some(TokenKind::Pipe) => AttackStepKind::Any,
            Some(TokenKind::Hash) => AttackStepKind::Defense,
            Some(TokenKind::NotExist) => AttackStepKind::NotExist,
            Some(TokenKind::Ident) if self.current_text() == "E" => AttackStepKind::Exist,
            _ => return Err(self.error_expected(&["'&'", "'|'", "'#'", "'E'", "'!E'"])),
        };
        self.bump();
        let name = self.parse_id()?;

        let mut tags = Vec::new();
        while self.eat(TokenKind::At) {
            tags.push(self.parse_id()?);
        }
        let cia = if self.at(TokenKind::LBrace) {
            Some(self.parse_cia()?)
        } else {
            None
        };
        let ttc = if self.at(TokenKind::LBracket) {
            Some(self.parse_ttc()?)
        } else {
            None
        };
        let meta = self.parse_meta_list()?;
        let requires = if self.at(TokenKind::Require) {
            Some(self.parse_requires()?)
        } else {
            None
        };
        let reaches = if self.at_any(&[TokenKind::Inherit, TokenKind::Override]) {
            Some(self.parse_reaches()?)
        } else {
            None
        };

        Ok(AttackStep {
            pos,
            kind,
            name,
            tags,
            cia,
            ttc,
            meta,
            requires,
            reaches,
        })
    }

    /// `<cia> ::= LCURLY (<cia-class> (COMMA <cia-class>)*)? RCURLY`
    fn parse_cia(&mut self) -> ParseResult<Vec<Cia>> {
        self.expect(TokenKind::LBrace)?;
        let mut cia = Vec::new();
        if !self.at(TokenKind::RBrace) {
            loop {
                let class = match self.current_text() {
                    "C" if self.at(TokenKind::Ident) => Cia::C,
                    "I" if self.at(TokenKind::Ident) => Cia::I,
                    "A" if self.at(TokenKind::Ident) => Cia::A,
                    _ => return Err(self.error_expected(&["'C'", "'I'", "'A'", "'}'"])),
                };
                self.bump();
                cia.push(class);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(cia)
    }

    /// `<ttc> ::= LBRACKET <ttc-expr>? RBRACKET`; empty brackets mean `Zero`.
    fn parse_ttc(&mut self) -> ParseResult<TtcExpr> {
        self.expect(TokenKind::LBracket)?;
        let expr = if self.at(TokenKind::RBracket) {
            let pos = self.position();
            TtcExpr {
                pos: pos.clone(),
                kind: TtcExprKind::Func {
                    name: Id::new("Zero", pos),
                    params: Vec::new(),
                },
            }
        } else {
            self.parse_ttc_expr()?
        };
        self.expect(TokenKind::RBracket)?;
        Ok(expr)
    }

    fn ttc_binary(pos: &Position, op: TtcOp, lhs: TtcExpr, rhs: TtcExpr) -> TtcExpr {
        TtcExpr {
            pos: pos.clone(),
            kind: TtcExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        }
    }

    /// `<ttc-expr> ::= <ttc-term> ((PLUS | MINUS) <ttc-term>)*`
    fn parse_ttc_expr(&mut self) -> ParseResult<TtcExpr> {
        let pos = self.position();
        let mut lhs = self.parse_ttc_term()?;
        loop {
            let op = match self.current_kind() {
                Some(TokenKind::Plus) => TtcOp::Add,
                Some(TokenKind::Minus) => TtcOp::Sub,
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.parse_ttc_term()?;
            lhs = Self::ttc_binary(&pos, op, lhs, rhs);
        }
    }

    /// `<ttc-term> ::= <ttc-fact> ((STAR | DIVIDE) <ttc-fact>)*`
    fn parse_ttc_term(&mut self) -> ParseResult<TtcExpr> {
        let pos = self.position();
        let mut lhs = self.parse_ttc_fact()?;
        loop {
            let op = match self.current_kind() {
                Some(TokenKind::Star) => TtcOp::Mul,
                Some(TokenKind::Slash) => TtcOp::Div,
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.parse_ttc_fact()?;
            lhs = Self::ttc_binary(&pos, op, lhs, rhs);
        }
    }

    /// `<ttc-fact> ::= <ttc-prim> (POWER <ttc-fact>)?`
    fn parse_ttc_fact(&mut self) -> ParseResult<TtcExpr> {
        let pos = self.position();
        let base = self.parse_ttc_prim()?;
        if self.eat(TokenKind::Caret) {
            let exponent = self.parse_ttc_fact()?;
            return Ok(Self::ttc_binary(&pos, TtcOp::Pow, base, exponent));
        }
        Ok(base)
    }

    /// `<ttc-prim> ::= ID (LPAREN (<number> (COMMA <number>)*)? RPAREN)? | LPAREN <ttc-expr> RPAREN | <number>`
    fn parse_ttc_prim(&mut self) -> ParseResult<TtcExpr> {
        let pos = self.position();
        match self.current_kind() {
            Some(TokenKind::Ident) => {
                let name = self.parse_id()?;
                let mut params = Vec::new();
                if self.eat(TokenKind::LParen) {
                    if self.at_any(&[TokenKind::Int, TokenKind::Float]) {
                        params.push(self.parse_number()?);
                        while self.eat(TokenKind::Comma) {
                            params.push(self.parse_number()?);
                        }
                    }
                    self.expect(TokenKind::RParen)?;
                }
                Ok(TtcExpr {
                    pos,
                    kind: TtcExprKind::Func { name, params },
                })
            }
            Some(TokenKind::LParen) => {
                self.bump();
                let expr = self.parse_ttc_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            Some(TokenKind::Int | TokenKind::Float) => {
                let value = self.parse_number()?;
                Ok(TtcExpr {
                    pos,
                    kind: TtcExprKind::Number(value),
                })
            }
            _ => Err(self.error_expected(&["identifier", "'('", "integer", "float"])),
        }
    }

    /// `<requires> ::= REQUIRE <step-item> (COMMA <step-item>)*`
    fn parse_requires(&mut self) -> ParseResult<Requires> {
        let pos = self.position();
        self.expect(TokenKind::Require)?;
        let (variables, requires) = self.parse_step_items()?;
        Ok(Requires {
            pos,
            variables,
            requires,
        })
    }

    /// `<reaches> ::= (INHERIT | OVERRIDE) <step-item> (COMMA <step-item>)*`
    fn parse_reaches(&mut self) -> ParseResult<Reaches> {
        let pos = self.position();
        let inherits = self.at(TokenKind::Inherit);
        if !self.eat(TokenKind::Inherit) && !self.eat(TokenKind::Override) {
            return Err(self.error_expected(&["'+>'", "'->'"]));
        }
        let (variables, reaches) = self.parse_step_items()?;
        Ok(Reaches {
            pos,
            inherits,
            variables,
            reaches,
        })
    }

    /// `<step-item> ::= <variable> | <expr>`
    ///
    /// A `let` only starts a step-local variable directly after the arrow or
    /// a comma; anywhere else it belongs to the enclosing asset.
    fn parse_step_items(&mut self) -> ParseResult<(Vec<Variable>, Vec<Expr>)> {
        let mut variables = Vec::new();
        let mut exprs = Vec::new();
        loop {
            if self.at(TokenKind::Let) {
                variables.push(self.parse_variable()?);
            } else {
                exprs.push(self.parse_expr()?);
            }
            if !self.eat(TokenKind::Comma) {
                return Ok((variables, exprs));
            }
        }
    }

    // =========================================================================
    // Grammar: step expressions
    // =========================================================================

    /// `<variable> ::= LET ID ASSIGN <expr>`
    fn parse_variable(&mut self) -> ParseResult<Variable> {
        let pos = self.position();
        self.expect(TokenKind::Let)?;
        let name = self.parse_id()?;
        self.expect(TokenKind::Eq)?;
        let expr = self.parse_expr()?;
        Ok(Variable { pos, name, expr })
    }

    /// `<expr> ::= <steps> ((UNION | INTERSECT | MINUS) <steps>)*`
    fn parse_expr(&mut self) -> ParseResult<Expr> {
        let pos = self.position();
        let mut lhs = self.parse_steps()?;
        loop {
            let make: fn(Box<Expr>, Box<Expr>) -> ExprKind = match self.current_kind() {
                Some(TokenKind::Union) => ExprKind::Union,
                Some(TokenKind::Intersect) => ExprKind::Intersection,
                Some(TokenKind::Minus) => ExprKind::Difference,
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.parse_steps()?;
            lhs = Expr::new(pos.clone(), make(Box::new(lhs), Box::new(rhs)));
        }
    }

    /// `<steps> ::= <step> (DOT <step>)*`
    fn parse_steps(&mut self) -> ParseResult<Expr> {
        let pos = self.position();
        let mut lhs = self.parse_step()?;
        while self.eat(TokenKind::Dot) {
            let rhs = self.parse_step()?;
            lhs = Expr::new(pos.clone(), ExprKind::Step(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    /// `<step> ::= (LPAREN <expr> RPAREN | ID (LPAREN RPAREN)?) (STAR | <type>)*`
    fn parse_step(&mut self) -> ParseResult<Expr> {
        let pos = self.position();
        let mut expr = if self.eat(TokenKind::LParen) {
            let inner = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            inner
        } else if self.at(TokenKind::Ident) {
            let id = self.parse_id()?;
            if self.eat(TokenKind::LParen) {
                self.expect(TokenKind::RParen)?;
                Expr::new(pos.clone(), ExprKind::Call(id))
            } else {
                Expr::new(pos.clone(), ExprKind::Id(id))
            }
        } else {
            return Err(self.error_expected(&["'('", "identifier"]));
        };

        loop {
            if self.eat(TokenKind::Star) {
                expr = Expr::new(pos.clone(), ExprKind::Transitive(Box::new(expr)));
            } else if self.at(TokenKind::LBracket) {
                let sub_type = self.parse_type()?;
                expr = Expr::new(
                    pos.clone(),
                    ExprKind::SubType {
                        expr: Box::new(expr),
                        sub_type,
                    },
                );
            } else {
                return Ok(expr);
            }
        }
    }

    /// `<type> ::= LBRACKET ID RBRACKET`
    fn parse_type(&mut self) -> ParseResult<Id> {
        self.expect(TokenKind::LBracket)?;
        let id = self.parse_id()?;
        self.expect(TokenKind::RBracket)?;
        Ok(id)
    }

    // =========================================================================
    // Grammar: associations
    // =========================================================================

    /// `<associations> ::= ASSOCIATIONS LCURLY (ID <association> (ID (<meta> | <association>))*)? RCURLY`
    fn parse_associations(&mut self) -> ParseResult<Vec<Association>> {
        self.expect(TokenKind::Associations)?;
        self.expect(TokenKind::LBrace)?;
        let mut associations = Vec::new();
        if self.at(TokenKind::Ident) {
            let left_asset = self.parse_id()?;
            let mut current = self.parse_association(left_asset)?;
            loop {
                if self.at(TokenKind::Info) {
                    current.meta.push(self.parse_meta()?);
                } else if self.at(TokenKind::Ident) {
                    let id = self.parse_id()?;
                    if self.at(TokenKind::Info) {
                        let pos = id.pos.clone();
                        current.meta.push(self.parse_meta_value(pos, id)?);
                    } else if self.at(TokenKind::LBracket) {
                        associations.push(current);
                        current = self.parse_association(id)?;
                    } else {
                        return Err(self.error_expected(&["'info'", "'['"]));
                    }
                } else {
                    break;
                }
            }
            associations.push(current);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(associations)
    }

    /// `<association> ::= <type> <mult> LARROW ID RARROW <mult> <type> ID`
    fn parse_association(&mut self, left_asset: Id) -> ParseResult<Association> {
        let pos = left_asset.pos.clone();
        let left_field = self.parse_type()?;
        let left_mult = self.parse_multiplicity()?;
        self.expect(TokenKind::LArrow)?;
        let link_name = self.parse_id()?;
        self.expect(TokenKind::RArrow)?;
        let right_mult = self.parse_multiplicity()?;
        let right_field = self.parse_type()?;
        let right_asset = self.parse_id()?;
        Ok(Association {
            pos,
            left_asset,
            left_field,
            left_mult,
            link_name,
            right_mult,
            right_field,
            right_asset,
            meta: Vec::new(),
        })
    }

    /// `<mult> ::= <mult-unit> (RANGE <mult-unit>)?`
    fn parse_multiplicity(&mut self) -> ParseResult<Multiplicity> {
        let pos = self.position();
        let min = self.parse_multiplicity_unit()?;
        if !self.eat(TokenKind::DotDot) {
            return match min {
                MultUnit::Zero => Err(ParseError::new(pos, "Invalid multiplicity '0'")),
                MultUnit::One => Ok(Multiplicity::One),
                MultUnit::Many => Ok(Multiplicity::ZeroOrMore),
            };
        }
        let max = self.parse_multiplicity_unit()?;
        match (min, max) {
            (MultUnit::Zero, MultUnit::One) => Ok(Multiplicity::ZeroOrOne),
            (MultUnit::Zero, MultUnit::Many) => Ok(Multiplicity::ZeroOrMore),
            (MultUnit::One, MultUnit::One) => Ok(Multiplicity::One),
            (MultUnit::One, MultUnit::Many) => Ok(Multiplicity::OneOrMore),
            (min, max) => Err(ParseError::new(
                pos,
                format!("Invalid multiplicity '{}..{}'", min.as_char(), max.as_char()),
            )),
        }
    }

    /// `<mult-unit> ::= '0' | '1' | STAR`
    fn parse_multiplicity_unit(&mut self) -> ParseResult<MultUnit> {
        let unit = match (self.current_kind(), self.current_text()) {
            (Some(TokenKind::Int), "0") => MultUnit::Zero,
            (Some(TokenKind::Int), "1") => MultUnit::One,
            (Some(TokenKind::Star), _) => MultUnit::Many,
            _ => return Err(self.error_expected(&["'0'", "'1'", "'*'"])),
        };
        self.bump();
        Ok(unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MultUnit {
    Zero,
    One,
    Many,
}

impl MultUnit {
    fn as_char(self) -> char {
        match self {
            Self::Zero => '0',
            Self::One => '1',
            Self::Many => '*',
        }
    }
}

/// Strip the surrounding quotes of a string token and resolve escapes.
fn unescape(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
