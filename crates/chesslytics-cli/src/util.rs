use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

/// Destination of a rendered document: a file, or stdout when no path is given.
pub struct Output {
    writer: Box<dyn Write>,
    label: String,
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        serde_json::to_writer_pretty(&mut output.writer, value)
            .with_context(|| format!("Failed to write JSON to {}", output.label))?;
        output.finish(b"\n")
    }

    pub fn save_toml<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let text = toml::to_string_pretty(value).context("Failed to serialize TOML")?;
        Output::from_output_path(output_path)?.finish(text.as_bytes())
    }

    fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = output_path else {
            return Ok(Output {
                writer: Box::new(io::stdout().lock()),
                label: "stdout".to_owned(),
            });
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output {
            writer: Box::new(BufWriter::new(file)),
            label: path.display().to_string(),
        })
    }

    fn finish(mut self, tail: &[u8]) -> anyhow::Result<()> {
        self.writer
            .write_all(tail)
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to write output to {}", self.label))
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Read a TOML file, e.g. an analysis configuration
pub fn read_toml_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {file_kind} file: {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("Failed to parse {file_kind} TOML file: {}", path.display()))
}
