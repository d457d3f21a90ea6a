use censive_core::{one_char, ConfigError, Dialect, DialectBuilder, OutputMode};

/// Every option that a reader or writer recognizes, as plain data.
///
/// `ReaderBuilder` and `WriterBuilder` are thin wrappers over a `Config`. A
/// `Config` can also be filled in from some external source of options,
/// either key by key with `Config::set`, or in one go through serde when the
/// `serde` feature is enabled. Missing keys take their default values.
///
/// A `Config` is not validated until it is turned into a `Dialect`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Config {
    /// The character between cells. Default `,`.
    pub separator: char,
    /// The character that wraps a cell. Default `"`.
    pub quote: char,
    /// Accept stray quotes. Default off.
    pub relax: bool,
    /// Read and write `="..."` cells. Default off.
    pub excel: bool,
    /// Trim whitespace around every cell that is read. Default off.
    pub strip: bool,
    /// Don't write trailing empty cells. Default off.
    pub drop_trailing_empty: bool,
    /// How much quoting to write. Default compact.
    pub output_mode: OutputMode,
    /// What to write after every row. Default `\n`.
    pub row_terminator: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            separator: ',',
            quote: '"',
            relax: false,
            excel: false,
            strip: false,
            drop_trailing_empty: false,
            output_mode: OutputMode::Compact,
            row_terminator: "\n".to_string(),
        }
    }
}

impl Config {
    /// Create a configuration with every option at its default.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set one option from text.
    ///
    /// Options may be named by their field name or by a short alias:
    /// `sep`, `quote`, `relax`, `excel`, `strip`, `drop`, `mode` and `eol`.
    /// Flags accept `true`, `false`, `yes`, `no`, `1` and `0`.
    ///
    /// # Example
    ///
    /// ```
    /// use censive::Config;
    ///
    /// let mut config = Config::new();
    /// config.set("sep", ";").unwrap();
    /// config.set("relax", "yes").unwrap();
    /// assert_eq!(config.separator, ';');
    /// assert!(config.relax);
    /// assert!(config.set("colour", "blue").is_err());
    /// ```
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "sep" | "separator" => self.separator = one_char(key, value)?,
            "quote" => self.quote = one_char(key, value)?,
            "relax" => self.relax = flag(key, value)?,
            "excel" => self.excel = flag(key, value)?,
            "strip" => self.strip = flag(key, value)?,
            "drop" | "drop_trailing_empty" => {
                self.drop_trailing_empty = flag(key, value)?
            }
            "mode" | "output_mode" => self.output_mode = value.parse()?,
            "eol" | "row_terminator" => {
                if value.is_empty() {
                    return Err(ConfigError::EmptyTerminator);
                }
                self.row_terminator = value.to_string();
            }
            _ => return Err(ConfigError::UnknownOption(key.to_string())),
        }
        Ok(())
    }

    /// Validate this configuration and build the dialect it describes.
    pub fn dialect(&self) -> Result<Dialect, ConfigError> {
        DialectBuilder::new()
            .separator(self.separator)
            .quote(self.quote)
            .relax(self.relax)
            .excel(self.excel)
            .strip(self.strip)
            .drop_trailing_empty(self.drop_trailing_empty)
            .output_mode(self.output_mode)
            .row_terminator(self.row_terminator.as_str())
            .build()
    }
}

fn flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            option: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use censive_core::{ConfigError, OutputMode};

    use super::Config;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.separator, ',');
        assert_eq!(config.quote, '"');
        assert!(!config.relax && !config.excel && !config.strip);
        assert!(!config.drop_trailing_empty);
        assert_eq!(config.output_mode, OutputMode::Compact);
        assert_eq!(config.row_terminator, "\n");
        assert!(config.dialect().is_ok());
    }

    #[test]
    fn set_short_and_long_keys() {
        let mut config = Config::new();
        config.set("sep", "\t").unwrap();
        config.set("quote", "'").unwrap();
        config.set("excel", "1").unwrap();
        config.set("strip", "true").unwrap();
        config.set("drop", "yes").unwrap();
        config.set("mode", "full").unwrap();
        config.set("eol", "\r\n").unwrap();
        config.set("relax", "no").unwrap();

        let mut long = Config::new();
        long.set("separator", "\t").unwrap();
        long.set("quote", "'").unwrap();
        long.set("excel", "yes").unwrap();
        long.set("strip", "1").unwrap();
        long.set("drop_trailing_empty", "true").unwrap();
        long.set("output_mode", "full").unwrap();
        long.set("row_terminator", "\r\n").unwrap();
        assert_eq!(config, long);

        let d = config.dialect().unwrap();
        assert_eq!(d.separator(), '\t');
        assert_eq!(d.quote(), '\'');
        assert_eq!(d.output_mode(), OutputMode::Full);
        assert_eq!(d.row_terminator(), "\r\n");
        assert!(d.excel() && d.strip() && d.drop_trailing_empty());
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut config = Config::new();
        match config.set("sep", ";;") {
            Err(ConfigError::NotOneCharacter { .. }) => {}
            res => panic!("unexpected result: {:?}", res),
        }
        match config.set("quote", "") {
            Err(ConfigError::NotOneCharacter { .. }) => {}
            res => panic!("unexpected result: {:?}", res),
        }
        match config.set("relax", "maybe") {
            Err(ConfigError::InvalidValue { .. }) => {}
            res => panic!("unexpected result: {:?}", res),
        }
        match config.set("mode", "loose") {
            Err(ConfigError::InvalidValue { .. }) => {}
            res => panic!("unexpected result: {:?}", res),
        }
        match config.set("eol", "") {
            Err(ConfigError::EmptyTerminator) => {}
            res => panic!("unexpected result: {:?}", res),
        }
        match config.set("delimiter", ",") {
            Err(ConfigError::UnknownOption(key)) => assert_eq!(key, "delimiter"),
            res => panic!("unexpected result: {:?}", res),
        }
        assert_eq!(config, Config::default());
    }

    #[test]
    fn dialect_validation() {
        let mut config = Config::new();
        config.quote = ',';
        match config.dialect() {
            Err(ConfigError::SameSeparatorAndQuote(',')) => {}
            res => panic!("unexpected result: {:?}", res),
        }
        let mut config = Config::new();
        config.excel = true;
        config.separator = '=';
        assert!(config.dialect().is_err());
        config.excel = false;
        assert!(config.dialect().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_partial() {
        let config: Config =
            serde_json::from_str(r#"{"separator": ";", "output_mode": "full"}"#)
                .unwrap();
        assert_eq!(config.separator, ';');
        assert_eq!(config.output_mode, OutputMode::Full);
        assert_eq!(config.quote, '"');
        assert_eq!(config.row_terminator, "\n");

        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains(r#""output_mode":"compact""#), "{}", json);
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Config::default());
    }
}
