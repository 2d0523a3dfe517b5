/// Raw call trace parser: `glBindTexture(0x0DE1, 3)` and `glGetError() = 0`
use glstate_core::header::{identifier, integer_literal};
use glstate_core::Arg;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, tag_no_case},
    character::complete::{char, digit0, digit1, hex_digit1, one_of, space0},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

/// One decoded trace line
#[derive(Debug, Clone, PartialEq)]
pub struct TraceCall {
    pub name: String,
    pub args: Vec<Arg>,
    pub return_value: Option<Arg>,
}

/// Parse a single trace line
pub fn parse_call(line: &str) -> Result<TraceCall, String> {
    match all_consuming(call)(line) {
        Ok((_, call)) => Ok(call),
        Err(e) => Err(format!("Failed to parse trace line: {:?}", e)),
    }
}

fn call(input: &str) -> IResult<&str, TraceCall> {
    let (input, name) = preceded(space0, identifier)(input)?;
    let (input, args) = delimited(
        tuple((space0, char('('), space0)),
        separated_list0(separator, arg),
        tuple((space0, char(')'))),
    )(input)?;
    let (input, return_value) = opt(preceded(tuple((space0, char('='), space0)), arg))(input)?;
    let (input, _) = space0(input)?;

    Ok((
        input,
        TraceCall {
            name: name.to_string(),
            args,
            return_value,
        },
    ))
}

fn separator(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(input)
}

fn arg(input: &str) -> IResult<&str, Arg> {
    alt((
        value(Arg::Null, tag("null")),
        value(Arg::Bool(true), tag("true")),
        value(Arg::Bool(false), tag("false")),
        pointer,
        string,
        array,
        float,
        integer,
    ))(input)
}

fn pointer(input: &str) -> IResult<&str, Arg> {
    map_res(preceded(tag_no_case("@0x"), hex_digit1), |digits: &str| {
        usize::from_str_radix(digits, 16).map(Arg::Pointer)
    })(input)
}

fn quoted(input: &str) -> IResult<&str, String> {
    let (input, _) = char('"')(input)?;
    let mut text = String::new();
    let mut input = input;
    loop {
        let (rest, chunk) = opt(is_not("\\\""))(input)?;
        if let Some(chunk) = chunk {
            text.push_str(chunk);
        }
        if let Ok((rest, _)) = char::<_, nom::error::Error<&str>>('"')(rest) {
            return Ok((rest, text));
        }
        let (rest, escaped) = preceded(char('\\'), one_of("\\\"n"))(rest)?;
        text.push(if escaped == 'n' { '\n' } else { escaped });
        input = rest;
    }
}

fn string(input: &str) -> IResult<&str, Arg> {
    map(quoted, Arg::Str)(input)
}

fn array(input: &str) -> IResult<&str, Arg> {
    let (input, items) = delimited(
        pair(char('{'), space0),
        separated_list0(separator, arg),
        pair(space0, char('}')),
    )(input)?;

    let strings: Option<Vec<String>> = items
        .iter()
        .map(|item| match item {
            Arg::Str(text) => Some(text.clone()),
            _ => None,
        })
        .collect();

    Ok(match strings {
        Some(strings) if !strings.is_empty() => (input, Arg::StrArray(strings)),
        _ => (input, Arg::Array(items)),
    })
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

/// `1.5`, `2.`, `-0.5e2` or `1e5`
fn float(input: &str) -> IResult<&str, Arg> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            alt((
                recognize(tuple((char('.'), digit0, opt(exponent)))),
                exponent,
            )),
        ))),
        |text: &str| text.parse::<f64>().map(Arg::Float),
    )(input)
}

/// Integers take the narrowest of Int, UInt, Long and ULong that holds them
fn integer(input: &str) -> IResult<&str, Arg> {
    map_res(integer_literal, |(negative, magnitude)| {
        let value = if negative {
            -i128::from(magnitude)
        } else {
            i128::from(magnitude)
        };
        if let Ok(value) = i32::try_from(value) {
            Ok(Arg::Int(value))
        } else if let Ok(value) = u32::try_from(value) {
            Ok(Arg::UInt(value))
        } else if let Ok(value) = i64::try_from(value) {
            Ok(Arg::Long(value))
        } else {
            u64::try_from(value).map(Arg::ULong)
        }
    })(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_call() {
        let call = parse_call("glBindTexture(0x0DE1, 3)").unwrap();
        assert_eq!(call.name, "glBindTexture");
        assert_eq!(call.args, vec![Arg::Int(0x0DE1), Arg::Int(3)]);
        assert_eq!(call.return_value, None);
    }

    #[test]
    fn test_parse_return_value() {
        let call = parse_call("  glGetError ( ) = 0x0500 ").unwrap();
        assert!(call.args.is_empty());
        assert_eq!(call.return_value, Some(Arg::Int(0x0500)));
    }

    #[test]
    fn test_parse_literals() {
        let call = parse_call(
            r#"glTest(null, true, @0x7ffe, "a \"b\"\n", {"x", "y"}, {1, 2.5}, -0.5e2, 0xFFFFFFFF, 0x100000000)"#,
        )
        .unwrap();
        assert_eq!(
            call.args,
            vec![
                Arg::Null,
                Arg::Bool(true),
                Arg::Pointer(0x7ffe),
                Arg::Str("a \"b\"\n".to_string()),
                Arg::StrArray(vec!["x".to_string(), "y".to_string()]),
                Arg::Array(vec![Arg::Int(1), Arg::Float(2.5)]),
                Arg::Float(-50.0),
                Arg::UInt(0xFFFF_FFFF),
                Arg::Long(0x1_0000_0000),
            ]
        );
    }

    #[test]
    fn test_exponent_floats() {
        let call = parse_call("glUniform3d(1e5, -2E-3, 4.e1)").unwrap();
        assert_eq!(
            call.args,
            vec![Arg::Float(1e5), Arg::Float(-2e-3), Arg::Float(40.0)]
        );
    }

    #[test]
    fn test_wide_integers_keep_their_value() {
        let call = parse_call(
            "glClientWaitSync(@0x1, 0, 0xFFFFFFFFFFFFFFFF, -2147483649, 0x8000000000000000)",
        )
        .unwrap();
        assert_eq!(
            call.args,
            vec![
                Arg::Pointer(1),
                Arg::Int(0),
                Arg::ULong(u64::MAX),
                Arg::Long(-2_147_483_649),
                Arg::ULong(0x8000_0000_0000_0000),
            ]
        );
        assert!(parse_call("glTest(-0xFFFFFFFFFFFFFFFF)").is_err());
    }

    #[test]
    fn test_empty_string_and_array() {
        let call = parse_call(r#"glLabel("", {})"#).unwrap();
        assert_eq!(call.args, vec![Arg::Str(String::new()), Arg::Array(vec![])]);
    }

    #[test]
    fn test_reject_garbage() {
        assert!(parse_call("glClear(GL_COLOR_BUFFER_BIT)").is_err());
        assert!(parse_call("not a call").is_err());
    }
}
