//! Configuration file loading.
//!
//! The toolchain reads its configuration from a simple text file of
//! whitespace-separated `key value...` lines with `#` comments and double
//! quotes around values containing whitespace. The available options are a
//! compile-time table: every option is a variant of [`Key`] with a name,
//! an arity, and possibly a default. Loading applies defaults, parses the
//! file, and refuses to come up with any mandatory option left unset, so
//! every later [`get`][Config::get] is infallible.
//!
//! The file is found from the path given by the caller, the `CASN_CONFIG`
//! environment variable, or the compiled-in default location, in that
//! order.

use std::{env, error, fmt, fs, io};
use std::path::Path;
use log::{debug, error};


/// The environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "CASN_CONFIG";

/// The configuration file used when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/casn.conf";


//------------ Key -----------------------------------------------------------

/// The available configuration options.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Key {
    /// Directory the validated cache is kept in.
    CacheDir,

    /// Trust anchor locator files, one or more.
    TrustAnchors,

    /// TCP port the RTR server listens on.
    RtrPort,

    /// Seconds between cache refreshes announced over RTR.
    RtrRefresh,

    /// The rsync command used to update the cache.
    RsyncProgram,
}

/// The shape of one option.
struct OptionEntry {
    key: Key,
    name: &'static str,
    array: bool,
    default: Option<&'static str>,
}

/// All options. An option without a default must appear in the file.
const OPTIONS: &[OptionEntry] = &[
    OptionEntry {
        key: Key::CacheDir, name: "CacheDir",
        array: false, default: Some("/var/cache/casn"),
    },
    OptionEntry {
        key: Key::TrustAnchors, name: "TrustAnchors",
        array: true, default: None,
    },
    OptionEntry {
        key: Key::RtrPort, name: "RtrPort",
        array: false, default: Some("323"),
    },
    OptionEntry {
        key: Key::RtrRefresh, name: "RtrRefresh",
        array: false, default: Some("3600"),
    },
    OptionEntry {
        key: Key::RsyncProgram, name: "RsyncProgram",
        array: false, default: Some("rsync"),
    },
];

impl Key {
    fn entry(self) -> &'static OptionEntry {
        &OPTIONS[self as usize]
    }

    fn from_name(name: &str) -> Option<Self> {
        OPTIONS.iter().find(|entry| entry.name == name).map(|entry| entry.key)
    }
}


//------------ Config --------------------------------------------------------

/// The loaded configuration.
///
/// Values are kept as strings exactly as given; callers parse them into
/// whatever they need. Every key is guaranteed to have at least one value
/// once loading succeeded.
#[derive(Clone, Debug)]
pub struct Config {
    values: Vec<Vec<String>>,
}

impl Config {
    /// Loads the configuration.
    ///
    /// Uses `path` if given, otherwise the `CASN_CONFIG` environment
    /// variable, otherwise the compiled-in default path.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved;
        let path = match path {
            Some(path) => path,
            None => {
                match env::var_os(CONFIG_ENV_VAR) {
                    Some(value) => {
                        resolved = value;
                        debug!(
                            "using configuration file {:?} from \
                             environment variable {}",
                            resolved, CONFIG_ENV_VAR
                        );
                        Path::new(&resolved)
                    }
                    None => {
                        debug!(
                            "using default configuration file \"{}\"",
                            DEFAULT_CONFIG_FILE
                        );
                        Path::new(DEFAULT_CONFIG_FILE)
                    }
                }
            }
        };
        let content = fs::read_to_string(path).map_err(|err| {
            let err = ConfigError::io(path, err);
            error!("{}", err);
            err
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    /// Parses configuration file content.
    ///
    /// The `origin` only appears in diagnostics.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let mut values: Vec<Vec<String>> = OPTIONS.iter().map(|entry| {
            entry.default.map(|value| {
                vec![value.into()]
            }).unwrap_or_default()
        }).collect();

        for (num, line) in content.lines().enumerate() {
            let num = num + 1;
            let mut tokens = match tokenize(line) {
                Ok(tokens) => tokens.into_iter(),
                Err(reason) => {
                    return Err(ConfigError::at(origin, num, reason))
                }
            };
            let name = match tokens.next() {
                Some(name) => name,
                None => continue,
            };
            let key = match Key::from_name(&name) {
                Some(key) => key,
                None => {
                    return Err(ConfigError::at(
                        origin, num,
                        format!("unknown option {}", name)
                    ))
                }
            };
            let given: Vec<String> = tokens.collect();
            if given.is_empty() {
                return Err(ConfigError::at(
                    origin, num,
                    format!("option {} without a value", name)
                ))
            }
            if key.entry().array {
                values[key as usize].extend(given);
            }
            else {
                if given.len() > 1 {
                    return Err(ConfigError::at(
                        origin, num,
                        format!("option {} takes a single value", name)
                    ))
                }
                values[key as usize] = given;
            }
        }

        for entry in OPTIONS {
            if values[entry.key as usize].is_empty() {
                let err = ConfigError::plain(
                    format!("option {} must be set", entry.name)
                );
                error!("{}", err);
                return Err(err)
            }
        }
        Ok(Config { values })
    }

    /// Returns the value of a single-valued option.
    ///
    /// For an array option this is its first value.
    pub fn get(&self, key: Key) -> &str {
        &self.values[key as usize][0]
    }

    /// Returns all values of an option.
    pub fn get_array(&self, key: Key) -> &[String] {
        &self.values[key as usize]
    }

    /// Returns the number of values of an option.
    pub fn get_length(&self, key: Key) -> usize {
        self.values[key as usize].len()
    }
}

/// Splits a line into tokens, honoring quotes and comments.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut res = Vec::new();
    let mut chars = line.chars().peekable();
    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }
        match chars.peek() {
            None | Some('#') => return Ok(res),
            Some('"') => {
                chars.next();
                let mut token = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => token.push(c),
                        None => {
                            return Err("unterminated quote".into())
                        }
                    }
                }
                res.push(token);
            }
            Some(_) => {
                let mut token = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '#' {
                        break
                    }
                    token.push(c);
                    chars.next();
                }
                res.push(token);
            }
        }
    }
}


//------------ ConfigError ---------------------------------------------------

/// Loading the configuration failed.
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn at(origin: &str, line: usize, reason: impl fmt::Display) -> Self {
        ConfigError {
            message: format!("{}:{}: {}", origin, line, reason)
        }
    }

    fn plain(message: String) -> Self {
        ConfigError { message }
    }

    fn io(path: &Path, err: io::Error) -> Self {
        ConfigError {
            message: format!("{}: {}", path.display(), err)
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl error::Error for ConfigError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    const GOOD: &str = "\
        # The cache.\n\
        CacheDir \"/srv/rpki cache\"\n\
        TrustAnchors ta/ripe.tal ta/arin.tal\n\
        TrustAnchors ta/apnic.tal # appended\n\
        RtrPort 8323\n\
    ";

    #[test]
    fn parse_and_get() {
        let config = Config::parse(GOOD, "test.conf").unwrap();
        assert_eq!(config.get(Key::CacheDir), "/srv/rpki cache");
        assert_eq!(config.get(Key::RtrPort), "8323");
        assert_eq!(config.get_length(Key::TrustAnchors), 3);
        assert_eq!(
            config.get_array(Key::TrustAnchors),
            &["ta/ripe.tal", "ta/arin.tal", "ta/apnic.tal"][..]
        );

        // Defaults fill whatever the file leaves out.
        assert_eq!(config.get(Key::RtrRefresh), "3600");
        assert_eq!(config.get(Key::RsyncProgram), "rsync");
    }

    #[test]
    fn mandatory_option() {
        // TrustAnchors has no default and must be present.
        let err = Config::parse("RtrPort 323\n", "test.conf").unwrap_err();
        assert!(err.to_string().contains("TrustAnchors"));
    }

    #[test]
    fn parse_errors() {
        assert!(
            Config::parse("NoSuchOption 1\n", "t").unwrap_err()
                .to_string().contains("unknown option")
        );
        assert!(
            Config::parse("RtrPort\n", "t").unwrap_err()
                .to_string().contains("without a value")
        );
        assert!(
            Config::parse("RtrPort 1 2\n", "t").unwrap_err()
                .to_string().contains("single value")
        );
        assert!(
            Config::parse("CacheDir \"oops\n", "t").unwrap_err()
                .to_string().contains("unterminated")
        );
        // Positions are reported.
        assert!(
            Config::parse("TrustAnchors x\nBogus 1\n", "t").unwrap_err()
                .to_string().starts_with("t:2:")
        );
    }

    #[test]
    fn load_from_file() {
        let path = env::temp_dir().join("casn-config-test.conf");
        fs::write(&path, GOOD).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.get(Key::RtrPort), "8323");
        fs::remove_file(&path).unwrap();

        assert!(Config::load(
            Some(Path::new("/nonexistent/casn.conf"))
        ).is_err());
    }
}
