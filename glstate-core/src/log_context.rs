/// Khronos log context: decodes enumeration values in logged API calls
use std::fmt;
use std::fs;
use std::path::Path;

use log::warn;

use crate::enums::EnumRegistry;
use crate::error::LogError;
use crate::header::parse_header;
use crate::log_map::{plain, LogMap, ParameterFormat};

/// Argument or return value of a logged command
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Null,
    Bool(bool),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(f64),
    Pointer(usize),
    Str(String),
    StrArray(Vec<String>),
    Array(Vec<Arg>),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Null => write!(f, "null"),
            Arg::Bool(value) => write!(f, "{}", value),
            Arg::Int(value) => write!(f, "{}", value),
            Arg::UInt(value) => write!(f, "{}", value),
            Arg::Long(value) => write!(f, "{}", value),
            Arg::ULong(value) => write!(f, "{}", value),
            Arg::Float(value) => write!(f, "{}", value),
            Arg::Pointer(address) => write!(f, "0x{:08X}", address),
            Arg::Str(value) => write!(f, "{}", value),
            Arg::StrArray(items) => {
                let items: Vec<String> = items.iter().map(|item| item.replace('\n', "\\n")).collect();
                write!(f, "{{{}}}", items.join(","))
            }
            Arg::Array(items) => {
                let items: Vec<String> = items.iter().map(Arg::to_string).collect();
                write!(f, "{{{}}}", items.join(","))
            }
        }
    }
}

/// Enumeration tables and formatting hints for one API
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    registry: EnumRegistry,
    log_map: Option<LogMap>,
}

impl LogContext {
    pub fn new(registry: EnumRegistry) -> Self {
        Self {
            registry,
            log_map: None,
        }
    }

    pub fn with_log_map(mut self, log_map: LogMap) -> Self {
        self.log_map = Some(log_map);
        self
    }

    /// Build a context from an API header and an optional log map.
    ///
    /// A log map that cannot be read or parsed is ignored with a warning; the
    /// context then formats every parameter plainly.
    pub fn load(header: impl AsRef<Path>, log_map: Option<&Path>) -> Result<Self, LogError> {
        let header = header.as_ref();
        let source = fs::read_to_string(header).map_err(|source| LogError::Io {
            path: header.to_path_buf(),
            source,
        })?;
        let constants = parse_header(&source)?;

        let log_map = match log_map.map(LogMap::load).transpose() {
            Ok(log_map) => log_map,
            Err(err) => {
                warn!("ignoring log map: {}", err);
                None
            }
        };

        let constants = match &log_map {
            Some(log_map) => log_map.apply_bitmasks(constants),
            None => constants,
        };

        Ok(Self {
            registry: EnumRegistry::from_constants(constants),
            log_map,
        })
    }

    pub fn registry(&self) -> &EnumRegistry {
        &self.registry
    }

    pub fn log_map(&self) -> Option<&LogMap> {
        self.log_map.as_ref()
    }

    /// Enumeration name of `value`, if it is a known plain enumeration
    pub fn enum_name(&self, value: i64) -> Option<&str> {
        self.registry.enum_name(value)
    }

    /// Format a command invocation as `name(arg, ...) = ret`
    pub fn format_command(
        &self,
        name: &str,
        return_value: Option<&Arg>,
        args: &[Arg],
    ) -> Result<String, LogError> {
        if name.is_empty() {
            return Err(LogError::EmptyCommandName);
        }

        let args: Vec<String> = args
            .iter()
            .enumerate()
            .map(|(index, arg)| self.format_arg(arg, self.parameter_format(name, index)))
            .collect();

        let mut line = format!("{}({})", name, args.join(", "));
        if let Some(return_value) = return_value {
            line.push_str(" = ");
            line.push_str(&self.format_arg(return_value, plain()));
        }
        Ok(line)
    }

    fn parameter_format(&self, name: &str, index: usize) -> &ParameterFormat {
        match &self.log_map {
            Some(log_map) => log_map.parameter_format(name, index),
            None => plain(),
        }
    }

    fn format_arg(&self, arg: &Arg, format: &ParameterFormat) -> String {
        let decoded = match (arg, format) {
            (Arg::Int(value), ParameterFormat::Enum) => {
                self.enum_name(i64::from(*value)).map(str::to_string)
            }
            (Arg::UInt(value), ParameterFormat::Enum) => {
                self.enum_name(i64::from(*value)).map(str::to_string)
            }
            // Masks are unsigned: reinterpret negative ints as their 32 bits
            (Arg::Int(value), ParameterFormat::Bitmask(group)) => {
                self.registry.format_bitmask(group, i64::from(*value as u32))
            }
            (Arg::UInt(value), ParameterFormat::Bitmask(group)) => {
                self.registry.format_bitmask(group, i64::from(*value))
            }
            _ => None,
        };

        decoded.unwrap_or_else(|| arg.to_string())
    }
}
