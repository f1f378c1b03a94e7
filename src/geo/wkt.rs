//! Well-Known Text reading and writing.
//!
//! Output matches what clipping tests compare against: `POLYGON ((0 0,0 5,5 5,5 0,0 0))`,
//! no space after commas, shortest round-trip numbers.

use std::fmt;
use std::str::FromStr;
use regex::Regex;
use thiserror::Error;

use crate::geo::{Coord, Geometry, LineString, Polygon};

#[derive(Debug, Error, PartialEq)]
pub enum WktError {
    #[error("WKT parse error: {0}")]
    ParseError(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    Number(f64),
    LeftParen,
    RightParen,
    Comma,
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Token::Word(word) => write!(f, "{}", word),
            &Token::Number(n) => write!(f, "{}", n),
            &Token::LeftParen => write!(f, "("),
            &Token::RightParen => write!(f, ")"),
            &Token::Comma => write!(f, ","),
        }
    }
}

fn tokenize(s: &str) -> Result<Vec<Token>, WktError> {
    lazy_static! {
        static ref TOKEN: Regex = Regex::new(
            r"^\s*(?:(?P<word>[A-Za-z]+)|(?P<number>[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)|(?P<punct>[(),]))"
        ).unwrap();
        static ref TRAILING: Regex = Regex::new(r"^\s*$").unwrap();
    }

    let mut tokens = Vec::new();
    let mut rest = s;

    while !TRAILING.is_match(rest) {
        let captures = TOKEN.captures(rest)
            .ok_or_else(|| WktError::ParseError(format!("unexpected input at `{}`", truncate(rest))))?;

        if let Some(word) = captures.name("word") {
            tokens.push(Token::Word(word.as_str()));
        } else if let Some(number) = captures.name("number") {
            let n = f64::from_str(number.as_str())
                .map_err(|_| WktError::ParseError(format!("invalid number `{}`", number.as_str())))?;
            tokens.push(Token::Number(n));
        } else if let Some(punct) = captures.name("punct") {
            tokens.push(match punct.as_str() {
                "(" => Token::LeftParen,
                ")" => Token::RightParen,
                _ => Token::Comma,
            });
        }

        rest = &rest[captures.get(0).map_or(rest.len(), |m| m.end())..];
    }

    Ok(tokens)
}

fn truncate(s: &str) -> &str {
    let s = s.trim_start();
    match s.char_indices().nth(20) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).cloned()
    }

    fn next(&mut self) -> Result<Token<'a>, WktError> {
        let token = self.peek().ok_or_else(|| WktError::ParseError("unexpected end of input".to_string()))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), WktError> {
        let token = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(WktError::ParseError(format!("expected `{}`, got `{}`", expected, token)))
        }
    }

    fn number(&mut self) -> Result<f64, WktError> {
        match self.next()? {
            Token::Number(n) => Ok(n),
            token => Err(WktError::ParseError(format!("expected a number, got `{}`", token))),
        }
    }

    /// Consumes `EMPTY` if it's next.
    fn empty(&mut self) -> bool {
        match self.peek() {
            Some(Token::Word(word)) if word.eq_ignore_ascii_case("EMPTY") => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Parses `(a,b,c)` where each element is parsed by `element`.
    fn list<T, F>(&mut self, mut element: F) -> Result<Vec<T>, WktError>
        where F: FnMut(&mut Parser<'a>) -> Result<T, WktError>
    {
        self.expect(Token::LeftParen)?;
        let mut ret = vec![ element(self)? ];
        loop {
            match self.next()? {
                Token::Comma => ret.push(element(self)?),
                Token::RightParen => return Ok(ret),
                token => return Err(WktError::ParseError(format!("expected `,` or `)`, got `{}`", token))),
            }
        }
    }

    fn coord(&mut self) -> Result<Coord, WktError> {
        let x = self.number()?;
        let y = self.number()?;
        // Tolerate a Z or M ordinate by skipping it.
        while let Some(Token::Number(_)) = self.peek() {
            self.pos += 1;
        }
        Ok(Coord::new(x, y))
    }

    fn line_string(&mut self) -> Result<LineString, WktError> {
        if self.empty() {
            return Ok(LineString::new());
        }
        Ok(LineString(self.list(Parser::coord)?))
    }

    fn polygon(&mut self) -> Result<Polygon, WktError> {
        if self.empty() {
            return Ok(Polygon::default());
        }
        let mut rings = self.list(Parser::line_string)?;
        let exterior = rings.remove(0);
        Ok(Polygon::new(exterior, rings))
    }

    /// MULTIPOINT members come both as `1 2` and as `(1 2)`.
    fn multi_point_member(&mut self) -> Result<Coord, WktError> {
        if self.peek() == Some(Token::LeftParen) {
            self.pos += 1;
            let coord = self.coord()?;
            self.expect(Token::RightParen)?;
            Ok(coord)
        } else {
            self.coord()
        }
    }

    fn geometry(&mut self) -> Result<Geometry, WktError> {
        let word = match self.next()? {
            Token::Word(word) => word.to_ascii_uppercase(),
            token => return Err(WktError::ParseError(format!("expected a geometry type, got `{}`", token))),
        };

        match word.as_str() {
            "POINT" => {
                if self.empty() {
                    return Err(WktError::ParseError("POINT EMPTY is not supported".to_string()));
                }
                self.expect(Token::LeftParen)?;
                let coord = self.coord()?;
                self.expect(Token::RightParen)?;
                Ok(Geometry::Point(coord))
            }
            "LINESTRING" => Ok(Geometry::LineString(self.line_string()?)),
            "LINEARRING" => Ok(Geometry::LinearRing(self.line_string()?)),
            "POLYGON" => Ok(Geometry::Polygon(self.polygon()?)),
            "MULTIPOINT" => {
                if self.empty() {
                    return Ok(Geometry::MultiPoint(vec![]));
                }
                Ok(Geometry::MultiPoint(self.list(Parser::multi_point_member)?))
            }
            "MULTILINESTRING" => {
                if self.empty() {
                    return Ok(Geometry::MultiLineString(vec![]));
                }
                Ok(Geometry::MultiLineString(self.list(Parser::line_string)?))
            }
            "MULTIPOLYGON" => {
                if self.empty() {
                    return Ok(Geometry::MultiPolygon(vec![]));
                }
                Ok(Geometry::MultiPolygon(self.list(Parser::polygon)?))
            }
            "GEOMETRYCOLLECTION" => {
                if self.empty() {
                    return Ok(Geometry::empty());
                }
                Ok(Geometry::GeometryCollection(self.list(Parser::geometry)?))
            }
            _ => Err(WktError::ParseError(format!("unknown geometry type `{}`", word))),
        }
    }
}

/// Parses a single WKT geometry.
pub fn parse(s: &str) -> Result<Geometry, WktError> {
    let mut parser = Parser {
        tokens: tokenize(s)?,
        pos: 0,
    };

    let geometry = parser.geometry()?;

    match parser.peek() {
        None => Ok(geometry),
        Some(token) => Err(WktError::ParseError(format!("unexpected `{}` after geometry", token))),
    }
}

impl FromStr for Geometry {
    type Err = WktError;

    fn from_str(s: &str) -> Result<Geometry, WktError> {
        parse(s)
    }
}

/// Writes an f64 the way WKT output wants it: shortest round-trip form, and
/// never `-0`.
pub struct Number(pub f64);

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == 0.0 {
            write!(f, "0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

struct Coords<'a>(&'a [Coord]);

impl<'a> fmt::Display for Coords<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        for (i, coord) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", coord)?;
        }
        write!(f, ")")
    }
}

struct Rings<'a>(&'a Polygon);

impl<'a> fmt::Display for Rings<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}", Coords(&self.0.exterior.0))?;
        for hole in self.0.interiors.iter() {
            write!(f, ",{}", Coords(&hole.0))?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Geometry::Point(ref coord) => write!(f, "POINT ({})", coord),
            &Geometry::LineString(ref line) if line.is_empty() => write!(f, "LINESTRING EMPTY"),
            &Geometry::LineString(ref line) => write!(f, "LINESTRING {}", Coords(&line.0)),
            &Geometry::LinearRing(ref ring) if ring.is_empty() => write!(f, "LINEARRING EMPTY"),
            &Geometry::LinearRing(ref ring) => write!(f, "LINEARRING {}", Coords(&ring.0)),
            &Geometry::Polygon(ref polygon) if polygon.is_empty() => write!(f, "POLYGON EMPTY"),
            &Geometry::Polygon(ref polygon) => write!(f, "POLYGON {}", Rings(polygon)),
            &Geometry::MultiPoint(ref coords) if coords.is_empty() => write!(f, "MULTIPOINT EMPTY"),
            &Geometry::MultiPoint(ref coords) => write!(f, "MULTIPOINT {}", Coords(coords)),
            &Geometry::MultiLineString(ref lines) if lines.is_empty() => write!(f, "MULTILINESTRING EMPTY"),
            &Geometry::MultiLineString(ref lines) => {
                write!(f, "MULTILINESTRING (")?;
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", Coords(&line.0))?;
                }
                write!(f, ")")
            }
            &Geometry::MultiPolygon(ref polygons) if polygons.is_empty() => write!(f, "MULTIPOLYGON EMPTY"),
            &Geometry::MultiPolygon(ref polygons) => {
                write!(f, "MULTIPOLYGON (")?;
                for (i, polygon) in polygons.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", Rings(polygon))?;
                }
                write!(f, ")")
            }
            &Geometry::GeometryCollection(ref geometries) if geometries.is_empty() => write!(f, "GEOMETRYCOLLECTION EMPTY"),
            &Geometry::GeometryCollection(ref geometries) => {
                write!(f, "GEOMETRYCOLLECTION (")?;
                for (i, geometry) in geometries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", geometry)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip(s: &str) -> String {
        parse(s).unwrap().to_string()
    }

    #[test]
    fn test_point() {
        assert_eq!(Geometry::Point(Coord::new(1.0, -2.5)), parse("POINT (1 -2.5)").unwrap());
    }

    #[test]
    fn test_polygon_with_hole() {
        let s = "POLYGON ((0 0,0 5,5 5,5 0,0 0),(3 3,4 2,4 4,3 3))";
        assert_eq!(s, round_trip(s));
    }

    #[test]
    fn test_whitespace_and_case() {
        assert_eq!("LINESTRING (0 5,5 5,9 9)", round_trip("  linestring( 0 5 , 5 5,9   9 ) "));
    }

    #[test]
    fn test_multipoint_both_forms() {
        assert_eq!("MULTIPOINT (1 2,3 4)", round_trip("MULTIPOINT ((1 2),(3 4))"));
        assert_eq!("MULTIPOINT (1 2,3 4)", round_trip("MULTIPOINT (1 2, 3 4)"));
    }

    #[test]
    fn test_nested_collection() {
        let s = "GEOMETRYCOLLECTION (POINT (1 2),MULTILINESTRING ((0 0,1 1),(2 2,3 3)),MULTIPOLYGON (((0 0,0 1,1 1,0 0))))";
        assert_eq!(s, round_trip(s));
    }

    #[test]
    fn test_empty_forms() {
        assert_eq!("GEOMETRYCOLLECTION EMPTY", round_trip("GEOMETRYCOLLECTION EMPTY"));
        assert_eq!("LINESTRING EMPTY", round_trip("LINESTRING EMPTY"));
        assert_eq!("POLYGON EMPTY", round_trip("POLYGON EMPTY"));
        assert_eq!(Geometry::empty(), parse("GEOMETRYCOLLECTION EMPTY").unwrap());
    }

    #[test]
    fn test_numbers() {
        assert_eq!("POINT (0.5 100000)", round_trip("POINT (.5 1e5)"));
        assert_eq!("POINT (0 0)", Geometry::Point(Coord::new(-0.0, 0.0)).to_string());
    }

    #[test]
    fn test_linear_ring() {
        assert_eq!("LINEARRING (0 0,1 0,1 1,0 0)", round_trip("LINEARRING (0 0,1 0,1 1,0 0)"));
    }

    #[test]
    fn test_errors() {
        assert!(parse("POINT (1)").is_err());
        assert!(parse("TRIANGLE ((0 0,1 0,0 1,0 0))").is_err());
        assert!(parse("LINESTRING (0 0,1 1").is_err());
        assert!(parse("LINESTRING (0 0,1 1) x").is_err());
        assert!(parse("LINESTRING (0 0;1 1)").is_err());
    }

    #[test]
    fn test_from_str() {
        let geometry: Geometry = "POINT (3 4)".parse().unwrap();
        assert_eq!(Geometry::Point(Coord::new(3.0, 4.0)), geometry);
    }
}
