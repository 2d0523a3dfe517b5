/// Khronos C header scanner: collects `#define` constants and the features requiring them
use log::{debug, trace, warn};
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{alpha1, alphanumeric1, char, digit1, hex_digit1, one_of, space0, space1},
    combinator::{eof, map, map_res, opt, recognize, rest, value},
    multi::many0_count,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

use crate::enums::EnumConstant;
use crate::error::LogError;

/// Preprocessor line, as far as the scanner cares
#[derive(Debug, Clone, PartialEq)]
enum Directive<'a> {
    IfNotDefined(&'a str),
    If,
    EndIf,
    Define(&'a str, Option<i64>),
    Other,
}

/// C identifier
pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Integer literal as sign and magnitude: decimal or hex with `u`/`l` suffixes
pub fn integer_literal(input: &str) -> IResult<&str, (bool, u64)> {
    let (input, negative) = opt(char('-'))(input)?;
    let (input, magnitude) = alt((
        map_res(preceded(tag_no_case("0x"), hex_digit1), |digits: &str| {
            u64::from_str_radix(digits, 16)
        }),
        map_res(digit1, |digits: &str| digits.parse::<u64>()),
    ))(input)?;
    let (input, _) = many0_count(one_of("uUlL"))(input)?;
    Ok((input, (negative.is_some(), magnitude)))
}

/// Integer literal folded into `i64`
pub fn integer(input: &str) -> IResult<&str, i64> {
    let (input, (negative, magnitude)) = integer_literal(input)?;

    // 64-bit constants such as GL_TIMEOUT_IGNORED wrap into i64
    let value = magnitude as i64;
    Ok((input, if negative { value.wrapping_neg() } else { value }))
}

fn keyword<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(pair(char('#'), space0), tag(name))
}

/// `0x2` or `(0x2)`
fn define_value(input: &str) -> IResult<&str, i64> {
    alt((
        integer,
        delimited(pair(char('('), space0), integer, pair(space0, char(')'))),
    ))(input)
}

fn define(input: &str) -> IResult<&str, Directive<'_>> {
    let (input, name) = preceded(pair(keyword("define"), space1), identifier)(input)?;
    let (input, literal) = opt(preceded(
        space1,
        terminated(define_value, pair(space0, alt((eof, tag("/*"), tag("//"))))),
    ))(input)?;
    Ok((input, Directive::Define(name, literal)))
}

fn directive(input: &str) -> IResult<&str, Directive<'_>> {
    preceded(
        space0,
        alt((
            map(
                preceded(pair(keyword("ifndef"), space1), identifier),
                Directive::IfNotDefined,
            ),
            value(Directive::If, alt((keyword("ifdef"), keyword("if")))),
            value(Directive::EndIf, keyword("endif")),
            define,
            value(Directive::Other, rest),
        )),
    )(input)
}

/// Scan a Khronos API header for enumeration constants.
///
/// A `#ifndef NAME` block opens a feature unless `NAME` starts with `_`
/// (include guards). Every integer `#define` inside feature blocks becomes a
/// constant required by the enclosing features; the feature's own marker
/// define is skipped. Constants outside any feature are returned with no
/// `required_by` entry.
pub fn parse_header(source: &str) -> Result<Vec<EnumConstant>, LogError> {
    // `#ifndef` guards; `None` for other conditionals
    let mut blocks: Vec<Option<&str>> = Vec::new();
    let mut constants = Vec::new();

    for (index, text) in source.lines().enumerate() {
        let line = index + 1;
        let (_, parsed) = directive(text).map_err(|err| LogError::Header {
            line,
            message: err.to_string(),
        })?;

        match parsed {
            Directive::IfNotDefined(guard) => blocks.push(Some(guard)),
            Directive::If => blocks.push(None),
            Directive::EndIf => {
                blocks.pop().ok_or_else(|| LogError::Header {
                    line,
                    message: "#endif without matching #if".to_string(),
                })?;
            }
            Directive::Define(name, Some(value)) => {
                // Guard markers such as `#define GL_VERSION_1_0 1`
                if blocks.iter().flatten().any(|guard| *guard == name) {
                    continue;
                }
                let required_by = blocks
                    .iter()
                    .flatten()
                    .filter(|guard| !guard.starts_with('_'))
                    .map(|feature| feature.to_string())
                    .collect();
                constants.push(EnumConstant {
                    name: name.to_string(),
                    value,
                    required_by,
                    bitmask: None,
                });
            }
            Directive::Define(name, None) => {
                trace!("line {}: {} has no integer value, skipped", line, name);
            }
            Directive::Other => {}
        }
    }

    if !blocks.is_empty() {
        warn!("header ends with {} unterminated conditional block(s)", blocks.len());
    }
    debug!("header scan found {} integer constants", constants.len());
    Ok(constants)
}
