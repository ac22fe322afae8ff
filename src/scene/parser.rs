//! Text scene parser
//!
//! Files are a sequence of section headers followed by property lines:
//!
//! ```text
//! [gd_scene load_steps=2 format=2]
//!
//! [sub_resource type="TileSet" id=1]
//! 0/name = "wall"
//!
//! [node name="TileMap" type="TileMap" parent="."]
//! tile_set = SubResource( 1 )
//! tile_data = PoolIntArray( 0, 0, 0 )
//! ```
//!
//! Values may span several lines. `;` starts a comment that runs to the
//! end of the line.

use crate::error::{Error, Result};
use super::value::{PropertyMap, Value};
use super::Section;

pub(crate) fn parse_sections(text: &str) -> Result<Vec<Section>> {
    Parser::new(text).parse_file()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, line: 1, column: 1 }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == ';' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn parse_file(mut self) -> Result<Vec<Section>> {
        let mut sections: Vec<Section> = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None => break,
                Some('[') => sections.push(self.parse_section_header()?),
                Some(_) => {
                    let line = self.line;
                    let (key, value) = self.parse_property()?;
                    let Some(section) = sections.last_mut() else {
                        return Err(Error::Parse {
                            line,
                            column: 1,
                            message: format!("property {key:?} outside of a section"),
                        });
                    };
                    section.properties.insert(key, value);
                }
            }
        }
        Ok(sections)
    }

    fn parse_section_header(&mut self) -> Result<Section> {
        let line = self.line;
        self.expect('[')?;
        self.skip_trivia();
        let tag = self.parse_ident()?;

        let mut attributes = PropertyMap::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(']') {
                self.bump();
                break;
            }
            let key = self.parse_ident()?;
            self.skip_trivia();
            self.expect('=')?;
            let value = self.parse_value()?;
            attributes.insert(key, value);
        }

        Ok(Section {
            tag,
            attributes,
            properties: PropertyMap::new(),
            line,
        })
    }

    /// `key = value`, where the key is everything before `=` on the line
    fn parse_property(&mut self) -> Result<(String, Value)> {
        let start = self.pos;
        loop {
            match self.peek() {
                Some('=') => break,
                Some('\n') | None => return Err(self.error("expected '=' after property name")),
                Some(_) => {
                    self.bump();
                }
            }
        }
        let key = self.src[start..self.pos].trim().to_string();
        if key.is_empty() {
            return Err(self.error("empty property name"));
        }
        self.bump();
        let value = self.parse_value()?;
        Ok((key, value))
    }

    fn parse_ident(&mut self) -> Result<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        if start == self.pos {
            return match self.peek() {
                Some(c) => Err(self.error(format!("expected identifier, found '{c}'"))),
                None => Err(self.error("expected identifier, found end of input")),
            };
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_trivia();
        match self.peek() {
            Some('"') => Ok(Value::String(self.parse_string()?)),
            // StringName (&"..") and NodePath (^"..") literals
            Some('&') | Some('^') => {
                self.bump();
                Ok(Value::String(self.parse_string()?))
            }
            Some('[') => self.parse_array(),
            Some('{') => self.parse_dictionary(),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_word(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("expected value, found end of input")),
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            let c = self.bump().ok_or_else(|| self.error("unterminated string"))?;
            match c {
                '"' => break,
                '\\' => {
                    let esc = self.bump().ok_or_else(|| self.error("unterminated string"))?;
                    match esc {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '"' => out.push('"'),
                        '\\' => out.push('\\'),
                        'u' => out.push(self.parse_unicode_escape()?),
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }
        Ok(out)
    }

    fn parse_unicode_escape(&mut self) -> Result<char> {
        let start = self.pos;
        for _ in 0..4 {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.bump();
                }
                _ => return Err(self.error("invalid unicode escape")),
            }
        }
        u32::from_str_radix(&self.src[start..self.pos], 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error("invalid unicode escape"))
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(']') {
                self.bump();
                break;
            }
            items.push(self.parse_value()?);
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                _ => return Err(self.error("expected ',' or ']' in array")),
            }
        }
        Ok(Value::Array(items))
    }

    fn parse_dictionary(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut entries = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some('}') {
                self.bump();
                break;
            }
            let key = self.parse_value()?;
            self.skip_trivia();
            self.expect(':')?;
            let value = self.parse_value()?;
            entries.push((key, value));
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                _ => return Err(self.error("expected ',' or '}' in dictionary")),
            }
        }
        Ok(Value::Dictionary(entries))
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        let (line, column) = (self.line, self.column);
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.bump();
            if self.peek().is_some_and(|c| c.is_alphabetic()) {
                let negative = self.src[start..self.pos].starts_with('-');
                return match self.parse_ident()?.as_str() {
                    "inf" if negative => Ok(Value::Float(f64::NEG_INFINITY)),
                    "inf" => Ok(Value::Float(f64::INFINITY)),
                    other => Err(self.error(format!("invalid number '{other}'"))),
                };
            }
        }
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '-' || c == '+')
                && matches!(self.src[..self.pos].chars().last(), Some('e') | Some('E'));
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || exponent_sign {
                self.bump();
            } else {
                break;
            }
        }

        let text = &self.src[start..self.pos];
        let invalid = || Error::Parse {
            line,
            column,
            message: format!("invalid number '{text}'"),
        };
        if text.contains(['.', 'e', 'E']) {
            text.parse::<f64>().map(Value::Float).map_err(|_| invalid())
        } else {
            text.parse::<i64>().map(Value::Int).map_err(|_| invalid())
        }
    }

    /// Keywords and constructors: `true`, `null`, `Vector2( 1, 2 )`,
    /// `Array[int]([1, 2])`
    fn parse_word(&mut self) -> Result<Value> {
        let mut name = self.parse_ident()?;
        match name.as_str() {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            "null" | "nil" => return Ok(Value::Null),
            "inf" => return Ok(Value::Float(f64::INFINITY)),
            "nan" => return Ok(Value::Float(f64::NAN)),
            _ => {}
        }

        if self.peek() == Some('[') {
            name.push_str(&self.parse_type_suffix()?);
        }

        self.skip_trivia();
        if self.peek() != Some('(') {
            return Err(self.error(format!("unexpected identifier '{name}'")));
        }
        self.bump();

        let mut args = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(')') {
                self.bump();
                break;
            }
            args.push(self.parse_value()?);
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(')') => {}
                _ => return Err(self.error(format!("expected ',' or ')' in {name}"))),
            }
        }
        Ok(Value::Constructor { name, args })
    }

    /// Raw `[...]` element type of a typed container, brackets balanced
    fn parse_type_suffix(&mut self) -> Result<String> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.bump() {
                Some('[') => depth += 1,
                Some(']') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Some(_) => {}
                None => return Err(self.error("unterminated type parameter")),
            }
        }
        Ok(self.src[start..self.pos].to_string())
    }
}
