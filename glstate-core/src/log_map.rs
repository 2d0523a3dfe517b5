/// Log map: per-command parameter formatting hints and bitmask groups
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, space1},
    combinator::{all_consuming, map, map_res, value},
    multi::many1,
    sequence::{delimited, pair, preceded, separated_pair},
    IResult,
};

use crate::enums::EnumConstant;
use crate::error::LogError;
use crate::header::identifier;

/// How a command parameter is rendered in a log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterFormat {
    Plain,
    /// Integer replaced by its enumeration name
    Enum,
    /// Integer decoded as a combination of the group's bits
    Bitmask(String),
}

static PLAIN: ParameterFormat = ParameterFormat::Plain;

#[derive(Debug, Clone, PartialEq)]
enum Entry<'a> {
    Bitmask(&'a str, Vec<&'a str>),
    Command(&'a str, Vec<(usize, ParameterFormat)>),
}

fn parameter(input: &str) -> IResult<&str, (usize, ParameterFormat)> {
    separated_pair(
        map_res(digit1, |digits: &str| digits.parse::<usize>()),
        char(':'),
        alt((
            value(ParameterFormat::Enum, tag("enum")),
            map(delimited(tag("bitmask("), identifier, char(')')), |group: &str| {
                ParameterFormat::Bitmask(group.to_string())
            }),
        )),
    )(input)
}

fn entry(input: &str) -> IResult<&str, Entry<'_>> {
    alt((
        map(
            preceded(
                pair(tag("bitmask"), space1),
                pair(identifier, many1(preceded(space1, identifier))),
            ),
            |(group, constants)| Entry::Bitmask(group, constants),
        ),
        map(
            preceded(
                pair(tag("command"), space1),
                pair(identifier, many1(preceded(space1, parameter))),
            ),
            |(command, parameters)| Entry::Command(command, parameters),
        ),
    ))(input)
}

/// Formatting hints for logged commands
///
/// The source is line oriented, `#` starts a comment:
///
/// ```text
/// bitmask ClearBufferMask GL_COLOR_BUFFER_BIT GL_DEPTH_BUFFER_BIT
/// command glClear 0:bitmask(ClearBufferMask)
/// command glBindTexture 0:enum
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogMap {
    commands: HashMap<String, HashMap<usize, ParameterFormat>>,
    bitmasks: HashMap<String, String>,
}

impl LogMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(source: &str) -> Result<Self, LogError> {
        let mut map = Self::new();

        for (index, text) in source.lines().enumerate() {
            let text = text
                .split_once('#')
                .map_or(text, |(before, _)| before)
                .trim();
            if text.is_empty() {
                continue;
            }

            let (_, parsed) = all_consuming(entry)(text).map_err(|err| LogError::LogMap {
                line: index + 1,
                message: err.to_string(),
            })?;
            match parsed {
                Entry::Bitmask(group, constants) => {
                    for constant in constants {
                        map.assign_bitmask(group, constant);
                    }
                }
                Entry::Command(command, parameters) => {
                    for (parameter, format) in parameters {
                        map.set_parameter_format(command, parameter, format);
                    }
                }
            }
        }

        debug!(
            "log map: {} commands, {} bitmask members",
            map.commands.len(),
            map.bitmasks.len()
        );
        Ok(map)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    pub fn set_parameter_format(&mut self, command: &str, parameter: usize, format: ParameterFormat) {
        self.commands
            .entry(command.to_string())
            .or_default()
            .insert(parameter, format);
    }

    /// Put `constant` in `group`; the first assignment of a constant wins.
    pub fn assign_bitmask(&mut self, group: &str, constant: &str) {
        self.bitmasks
            .entry(constant.to_string())
            .or_insert_with(|| group.to_string());
    }

    /// Format of the parameter at `index` of `command`; `Plain` if not listed.
    pub fn parameter_format(&self, command: &str, index: usize) -> &ParameterFormat {
        self.commands
            .get(command)
            .and_then(|parameters| parameters.get(&index))
            .unwrap_or(&PLAIN)
    }

    pub fn bitmask_of(&self, constant: &str) -> Option<&str> {
        self.bitmasks.get(constant).map(String::as_str)
    }

    /// Tag constants with the bitmask group this map assigns them to.
    /// Groups already present on a constant are kept.
    pub fn apply_bitmasks(&self, constants: Vec<EnumConstant>) -> Vec<EnumConstant> {
        constants
            .into_iter()
            .map(|mut constant| {
                if constant.bitmask.is_none() {
                    constant.bitmask = self.bitmask_of(&constant.name).map(str::to_string);
                }
                constant
            })
            .collect()
    }
}

/// Format used when no log map is available
pub(crate) fn plain() -> &'static ParameterFormat {
    &PLAIN
}
