use crate::{
    tokenizer::{Token, TokenKind},
    types::{FieldDecl, OpaqueShape, SourceFile, TypeDecl, TypeExpr},
    utils::{error, quote},
    error::DtoError,
};

struct Parser<'a> {
    tokens: &'a [Token],
    index:  usize,
}

fn describe(tok: &Token) -> String {
    match tok.kind {
        TokenKind::Eof => "end of file".to_string(),
        TokenKind::Semicolon if tok.text == "\n" => "newline".to_string(),
        _ => quote(&tok.text),
    }
}

fn is_open(tok: &Token) -> bool {
    tok.kind == TokenKind::Operator && matches!(tok.text.as_str(), "(" | "[" | "{")
}

fn is_close(tok: &Token) -> bool {
    tok.kind == TokenKind::Operator && matches!(tok.text.as_str(), ")" | "]" | "}")
}

impl<'a> Parser<'a> {
    fn current_token(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        &tokens[self.index.min(tokens.len() - 1)]
    }

    fn peek(&self, offset: usize) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        &tokens[(self.index + offset).min(tokens.len() - 1)]
    }

    fn at_eof(&self) -> bool {
        self.current_token().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> &'a Token {
        let tok = self.current_token();
        if tok.kind != TokenKind::Eof {
            self.index += 1;
        }
        tok
    }

    fn eat(&mut self, text: &str) -> bool {
        if self.current_token().is(text) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn eat_semicolon(&mut self) -> bool {
        if self.current_token().kind == TokenKind::Semicolon {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, text: &str) -> Result<(), DtoError> {
        if !self.eat(text) {
            let tok = self.current_token();
            return Err(error(
                &format!("Expected {} but found {}", quote(text), describe(tok)),
                tok.line,
                tok.column,
            ));
        }
        Ok(())
    }

    fn expect_ident(&mut self) -> Result<&'a Token, DtoError> {
        let tok = self.current_token();
        if tok.kind != TokenKind::Ident {
            return Err(error(
                &format!("Expected identifier but found {}", describe(tok)),
                tok.line,
                tok.column,
            ));
        }
        self.index += 1;
        Ok(tok)
    }

    /// A declaration ends with a semicolon, or at end of file.
    fn expect_decl_end(&mut self) -> Result<(), DtoError> {
        if self.eat_semicolon() || self.at_eof() {
            Ok(())
        } else {
            let tok = self.current_token();
            Err(error(
                &format!("Expected \";\" but found {}", describe(tok)),
                tok.line,
                tok.column,
            ))
        }
    }

    fn unexpected_token(&self) -> DtoError {
        let tok = self.current_token();
        error(&format!("Unexpected token {}", describe(tok)), tok.line, tok.column)
    }

    /// Consumes an opening bracket and everything up to its matching close.
    fn skip_brackets(&mut self) -> Result<(), DtoError> {
        let open = self.current_token();
        if !is_open(open) {
            return Err(self.unexpected_token());
        }
        let mut depth = 0usize;
        loop {
            let tok = self.advance();
            if tok.kind == TokenKind::Eof {
                return Err(error(
                    &format!("Unclosed {}", quote(&open.text)),
                    open.line,
                    open.column,
                ));
            }
            if is_open(tok) {
                depth += 1;
            } else if is_close(tok) {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
    }

    /// Skips a declaration the extractor has no use for, up to the
    /// semicolon that ends it outside any brackets.
    fn skip_decl(&mut self) -> Result<(), DtoError> {
        loop {
            let tok = self.current_token();
            match tok.kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::Semicolon => {
                    self.index += 1;
                    return Ok(());
                }
                _ if is_open(tok) => self.skip_brackets()?,
                _ if is_close(tok) => return Err(self.unexpected_token()),
                _ => self.index += 1,
            }
        }
    }

    fn parse_type_group(&mut self, decls: &mut Vec<TypeDecl>) -> Result<(), DtoError> {
        if self.eat("(") {
            loop {
                while self.eat_semicolon() {}
                if self.eat(")") {
                    break;
                }
                decls.push(self.parse_type_spec()?);
                if !self.eat_semicolon() && !self.current_token().is(")") {
                    let tok = self.current_token();
                    return Err(error(
                        &format!("Expected \";\" or \")\" but found {}", describe(tok)),
                        tok.line,
                        tok.column,
                    ));
                }
            }
        } else {
            decls.push(self.parse_type_spec()?);
        }
        self.expect_decl_end()
    }

    fn looks_like_type_params(&self) -> bool {
        if !self.current_token().is("[") || self.peek(1).kind != TokenKind::Ident {
            return false;
        }
        let after = self.peek(2);
        match after.kind {
            TokenKind::Ident => true,
            TokenKind::Keyword => matches!(
                after.text.as_str(),
                "interface" | "func" | "map" | "chan" | "struct"
            ),
            TokenKind::Operator => matches!(after.text.as_str(), "," | "~" | "[" | "("),
            _ => false,
        }
    }

    fn parse_type_spec(&mut self) -> Result<TypeDecl, DtoError> {
        let name_tok = self.expect_ident()?;
        if self.looks_like_type_params() {
            self.skip_brackets()?;
        }
        let is_alias = self.eat("=");
        let ty = self.parse_type()?;
        Ok(TypeDecl {
            name:   name_tok.text.clone(),
            line:   name_tok.line,
            column: name_tok.column,
            is_alias,
            ty,
        })
    }

    fn starts_type(tok: &Token) -> bool {
        match tok.kind {
            TokenKind::Ident => true,
            TokenKind::Keyword => matches!(
                tok.text.as_str(),
                "map" | "chan" | "func" | "struct" | "interface"
            ),
            TokenKind::Operator => matches!(tok.text.as_str(), "*" | "[" | "<-"),
            _ => false,
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr, DtoError> {
        let tok = self.current_token();
        match (tok.kind, tok.text.as_str()) {
            (TokenKind::Ident, _) => {
                self.index += 1;
                let mut ty = TypeExpr::Ident(tok.text.clone());
                if self.eat(".") {
                    let sel = self.expect_ident()?;
                    ty = TypeExpr::Selector {
                        base: Box::new(ty),
                        name: sel.text.clone(),
                    };
                }
                if self.current_token().is("[") {
                    return match self.parse_type_args()? {
                        1 => Ok(TypeExpr::Opaque(OpaqueShape::Index)),
                        _ => Ok(TypeExpr::Opaque(OpaqueShape::IndexList)),
                    };
                }
                Ok(ty)
            }
            (TokenKind::Operator, "*") => {
                self.index += 1;
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            (TokenKind::Operator, "[") => {
                if !self.peek(1).is("]") {
                    // Array length is dropped.
                    self.skip_brackets()?;
                } else {
                    self.index += 2;
                }
                Ok(TypeExpr::Sequence(Box::new(self.parse_type()?)))
            }
            (TokenKind::Operator, "(") => {
                self.index += 1;
                self.parse_type()?;
                self.expect(")")?;
                Ok(TypeExpr::Opaque(OpaqueShape::Paren))
            }
            (TokenKind::Operator, "<-") => {
                self.index += 1;
                self.expect("chan")?;
                self.parse_type()?;
                Ok(TypeExpr::Opaque(OpaqueShape::Chan))
            }
            (TokenKind::Keyword, "chan") => {
                self.index += 1;
                self.eat("<-");
                self.parse_type()?;
                Ok(TypeExpr::Opaque(OpaqueShape::Chan))
            }
            (TokenKind::Keyword, "map") => {
                self.index += 1;
                self.expect("[")?;
                self.parse_type()?;
                self.expect("]")?;
                self.parse_type()?;
                Ok(TypeExpr::Opaque(OpaqueShape::Map))
            }
            (TokenKind::Keyword, "func") => {
                self.index += 1;
                self.parse_signature()?;
                Ok(TypeExpr::Opaque(OpaqueShape::Func))
            }
            (TokenKind::Keyword, "interface") => {
                self.index += 1;
                if !self.current_token().is("{") {
                    return Err(self.unexpected_token());
                }
                self.skip_brackets()?;
                Ok(TypeExpr::Opaque(OpaqueShape::Interface))
            }
            (TokenKind::Keyword, "struct") => {
                self.index += 1;
                Ok(TypeExpr::Struct(self.parse_struct_body()?))
            }
            _ => Err(error(
                &format!("Expected type but found {}", describe(tok)),
                tok.line,
                tok.column,
            )),
        }
    }

    /// Consumes `[A, B, ...]` after a generic type name and returns the
    /// number of type arguments.
    fn parse_type_args(&mut self) -> Result<usize, DtoError> {
        self.expect("[")?;
        let mut count = 0;
        while !self.eat("]") {
            self.parse_type()?;
            count += 1;
            if !self.eat(",") && !self.current_token().is("]") {
                let tok = self.current_token();
                return Err(error(
                    &format!("Expected \",\" or \"]\" but found {}", describe(tok)),
                    tok.line,
                    tok.column,
                ));
            }
        }
        Ok(count)
    }

    /// The token following the bracket group that opens at `offset`.
    fn token_after_brackets(&self, offset: usize) -> &'a Token {
        let mut depth = 0usize;
        let mut pos = offset;
        loop {
            let tok = self.peek(pos);
            if tok.kind == TokenKind::Eof {
                return tok;
            }
            if is_open(tok) {
                depth += 1;
            } else if is_close(tok) {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return self.peek(pos + 1);
                }
            }
            pos += 1;
        }
    }

    fn parse_signature(&mut self) -> Result<(), DtoError> {
        if !self.current_token().is("(") {
            return Err(self.unexpected_token());
        }
        self.skip_brackets()?;
        let result = self.current_token();
        if result.is("(") {
            self.skip_brackets()?;
        } else if Self::starts_type(result) {
            self.parse_type()?;
        }
        Ok(())
    }

    fn parse_struct_body(&mut self) -> Result<Vec<FieldDecl>, DtoError> {
        self.expect("{")?;
        let mut fields = Vec::new();
        loop {
            if self.eat_semicolon() {
                continue;
            }
            if self.eat("}") {
                break;
            }
            fields.push(self.parse_field_decl()?);
            if !self.eat_semicolon() && !self.current_token().is("}") {
                let tok = self.current_token();
                return Err(error(
                    &format!("Expected \";\" or \"}}\" but found {}", describe(tok)),
                    tok.line,
                    tok.column,
                ));
            }
        }
        Ok(fields)
    }

    fn parse_field_decl(&mut self) -> Result<FieldDecl, DtoError> {
        let start = self.current_token();
        let mut names = Vec::new();

        let ty = if start.is("*") {
            // Embedded *T
            self.index += 1;
            TypeExpr::Pointer(Box::new(self.parse_type()?))
        } else if start.kind == TokenKind::Ident {
            let ends_field = |tok: &Token| {
                tok.is("}")
                    || matches!(
                        tok.kind,
                        TokenKind::Semicolon | TokenKind::String | TokenKind::RawString
                    )
            };
            let next = self.peek(1);
            // `Base[T]` is embedded when nothing follows the brackets;
            // `A [N]T` names a field.
            let embedded = next.is(".")
                || ends_field(next)
                || (next.is("[") && ends_field(self.token_after_brackets(1)));
            if embedded {
                self.parse_type()?
            } else {
                names.push(self.expect_ident()?.text.clone());
                while self.eat(",") {
                    names.push(self.expect_ident()?.text.clone());
                }
                self.parse_type()?
            }
        } else {
            return Err(error(
                &format!("Expected field name but found {}", describe(start)),
                start.line,
                start.column,
            ));
        };

        let tag_tok = self.current_token();
        let tag = if matches!(tag_tok.kind, TokenKind::String | TokenKind::RawString) {
            self.index += 1;
            Some(tag_tok.text.clone())
        } else {
            None
        };

        Ok(FieldDecl {
            names,
            line: start.line,
            column: start.column,
            ty,
            tag,
        })
    }
}

/// Parses the package clause and every top-level type declaration.
/// Imports, functions, variables and constants are skipped.
pub fn parse_source_file(tokens: &[Token]) -> Result<SourceFile, DtoError> {
    if tokens.is_empty() {
        return Err(error("Expected \"package\" but found end of file", 1, 1));
    }
    let mut parser = Parser { tokens, index: 0 };
    let mut decls  = Vec::new();

    while parser.eat_semicolon() {}
    parser.expect("package")?;
    let package = parser.expect_ident()?.text.clone();
    parser.expect_decl_end()?;

    loop {
        while parser.eat_semicolon() {}
        if parser.at_eof() {
            break;
        }
        let tok = parser.current_token();
        match (tok.kind, tok.text.as_str()) {
            (TokenKind::Keyword, "type") => {
                parser.index += 1;
                parser.parse_type_group(&mut decls)?;
            }
            (TokenKind::Keyword, "import" | "func" | "var" | "const") => {
                parser.index += 1;
                parser.skip_decl()?;
            }
            _ => return Err(parser.unexpected_token()),
        }
    }

    Ok(SourceFile { package, decls })
}
