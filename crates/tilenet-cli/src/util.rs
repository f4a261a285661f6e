use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::PathBuf,
};

use anyhow::Context;
use rand::Rng as _;
use tilenet_engine::GameSeed;

/// Destination of a JSON report.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `value` as pretty JSON to `output_path`, or to stdout if no path is given.
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = match output_path {
            Some(path) => {
                let file = File::create(&path).with_context(|| {
                    format!("Failed to create output file: {}", path.display())
                })?;
                Output::File {
                    writer: BufWriter::new(file),
                    path,
                }
            }
            None => Output::Stdout {
                writer: io::stdout().lock(),
            },
        };
        output.write_json(value)
    }

    fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Returns the given seed, or a fresh one from the thread-local generator.
///
/// The chosen seed is logged so that any run can be reproduced with `--seed`.
pub fn resolve_seed(seed: Option<GameSeed>) -> GameSeed {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    eprintln!("Seed: {seed}");
    seed
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_save_json_to_file() {
        let path =
            std::env::temp_dir().join(format!("tilenet-save-json-{}.json", std::process::id()));
        Output::save_json(&vec![3, 1, 2], Some(path.clone())).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        let parsed: Vec<u32> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, vec![3, 1, 2]);
        assert!(written.ends_with('\n'));
    }

    #[test]
    fn test_save_json_reports_missing_directory() {
        let path = std::env::temp_dir()
            .join("tilenet-no-such-dir")
            .join("report.json");
        let err = Output::save_json(&1, Some(path)).unwrap_err();
        assert!(err.to_string().contains("Failed to create output file"), "{err}");
    }
}
