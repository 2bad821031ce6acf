
pub mod files_handling;

use crate::error::{Error, Result};

use serde_json::Value;
use std::fmt::Display;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_WINDOW_SIZE: usize = 10;
pub const DEFAULT_MIN_COUNT: usize = 3;
pub const DEFAULT_POS_PREFIX: &str = "n";

#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub corpus_path: String,
    pub vocab_path: String,
    pub stopwords_path: String,
    pub output_path: String,
    pub ppmi_output_path: String,
    pub window_size: usize,
    pub min_count: usize,
    pub pos_prefix: String,
    pub use_hmm: bool,
    pub pre_segmented: bool,
    pub matrix_output_dir: Option<String>,
}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using parameters:
        corpus_path: {}
        vocab_path: {}
        stopwords_path: {}
        output_path: {}
        ppmi_output_path: {}
        window_size: {}
        min_count: {}
        pos_prefix: {}
        use_hmm: {}
        pre_segmented: {}
        matrix_output_dir: {:?}",
        self.corpus_path, self.vocab_path, self.stopwords_path, self.output_path, self.ppmi_output_path,
        self.window_size, self.min_count, self.pos_prefix, self.use_hmm, self.pre_segmented, self.matrix_output_dir)
    }
}

impl Params {

    // parameters with every optional field at its default
    pub fn new(corpus_path: &str, vocab_path: &str, stopwords_path: &str, output_path: &str, ppmi_output_path: &str) -> Params {
        Self {
            corpus_path: corpus_path.to_owned(),
            vocab_path: vocab_path.to_owned(),
            stopwords_path: stopwords_path.to_owned(),
            output_path: output_path.to_owned(),
            ppmi_output_path: ppmi_output_path.to_owned(),
            window_size: DEFAULT_WINDOW_SIZE,
            min_count: DEFAULT_MIN_COUNT,
            pos_prefix: DEFAULT_POS_PREFIX.to_owned(),
            use_hmm: true,
            pre_segmented: false,
            matrix_output_dir: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size < 1 {
            return Err(Error::Config(format!("window_size must be at least 1, got {}", self.window_size)));
        }
        if self.min_count < 1 {
            return Err(Error::Config(format!("min_count must be at least 1, got {}", self.min_count)));
        }
        if self.pos_prefix.is_empty() {
            return Err(Error::Config("pos_prefix must not be empty".to_string()));
        }
        Ok(())
    }
}

pub struct Config {
    params: Params
}

impl Config {

    pub fn get_params(&self) -> Params {
        self.params.clone()
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let f = File::open(path).map_err(|e| Error::missing("configuration file", path, e))?;
        let json: Value = serde_json::from_reader(BufReader::new(f))?;
        Config::from_json(&json)
    }

    pub fn from_json(json: &Value) -> Result<Config> {

        if !json.is_object() {
            return Err(Error::Config("configuration must be a json object".to_string()));
        }

        // paths have no defaults
        let corpus_path = required_str(json, "corpus_path")?;
        let vocab_path = required_str(json, "vocab_path")?;
        let stopwords_path = required_str(json, "stopwords_path")?;
        let output_path = required_str(json, "output_path")?;
        let ppmi_output_path = required_str(json, "ppmi_output_path")?;

        let mut params = Params::new(&corpus_path, &vocab_path, &stopwords_path, &output_path, &ppmi_output_path);

        // handle default vs input parameters
        if let Some(window_size) = optional_usize(json, "window_size")? {
            params.window_size = window_size;
        }
        if let Some(min_count) = optional_usize(json, "min_count")? {
            params.min_count = min_count;
        }
        if let Some(pos_prefix) = optional_str(json, "pos_prefix")? {
            params.pos_prefix = pos_prefix;
        }
        if let Some(use_hmm) = optional_bool(json, "use_hmm")? {
            params.use_hmm = use_hmm;
        }
        if let Some(pre_segmented) = optional_bool(json, "pre_segmented")? {
            params.pre_segmented = pre_segmented;
        }
        params.matrix_output_dir = optional_str(json, "matrix_output_dir")?;

        params.validate()?;
        Ok(Self { params })
    }

    // command line values win over the file, checked again afterwards
    pub fn with_overrides(mut self, window_size: Option<usize>, min_count: Option<usize>) -> Result<Config> {
        if let Some(window_size) = window_size {
            self.params.window_size = window_size;
        }
        if let Some(min_count) = min_count {
            self.params.min_count = min_count;
        }
        self.params.validate()?;
        Ok(self)
    }
}

fn required_str(json: &Value, key: &str) -> Result<String> {
    optional_str(json, key)?.ok_or_else(|| Error::Config(format!("{} was not supplied through json", key)))
}

fn optional_str(json: &Value, key: &str) -> Result<Option<String>> {
    match json.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.to_owned())),
        Some(other) => Err(Error::Config(format!("{} should be a string, got {}", key, other))),
    }
}

fn optional_usize(json: &Value, key: &str) -> Result<Option<usize>> {
    match json.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match value.as_u64() {
            Some(n) => Ok(Some(n as usize)),
            None => Err(Error::Config(format!("{} should be a non-negative integer, got {}", key, value))),
        },
    }
}

fn optional_bool(json: &Value, key: &str) -> Result<Option<bool>> {
    match json.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(Error::Config(format!("{} should be a boolean, got {}", key, other))),
    }
}
