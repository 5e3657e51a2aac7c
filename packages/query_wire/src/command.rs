use std::fmt;

use crate::escape::escape;

/// Builder for a single command line.
///
/// Arguments are rendered as `key=value` pairs with the value escaped;
/// option flags (including their leading dash) are appended after the
/// arguments.
///
/// ```
/// use query_wire::Command;
///
/// let cmd = Command::new("clientkick")
///     .arg("clid", 5)
///     .arg("reasonmsg", "go away")
///     .flag("-reasonid");
/// assert_eq!(cmd.to_string(), r"clientkick clid=5 reasonmsg=go\saway -reasonid");
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    args: Vec<(String, String)>,
    flags: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            flags: Vec::new(),
        }
    }

    /// Append a `key=value` argument; the value is escaped.
    pub fn arg(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.args.push((key.into(), escape(&value.to_string())));
        self
    }

    /// Append a boolean argument, rendered as `0` or `1`.
    pub fn arg_bool(self, key: impl Into<String>, value: bool) -> Self {
        self.arg(key, if value { 1 } else { 0 })
    }

    /// Append an option flag, e.g. `-uid`. The dash is not added for you.
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (key, value) in &self.args {
            write!(f, " {key}={value}")?;
        }
        for flag in &self.flags {
            write!(f, " {flag}")?;
        }
        Ok(())
    }
}
