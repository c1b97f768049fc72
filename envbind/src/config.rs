//! Loading whole records from files or from the process environment

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::record::{Record, Target};
use crate::source::ProcessEnv;

/// How a record was last populated.
///
/// A record opts in by declaring one `#[env(mode)]` field of this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Unknown,
    File,
    Environment,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::File => f.write_str("file"),
            Mode::Environment => f.write_str("environment"),
            Mode::Unknown => f.write_str("unknown"),
        }
    }
}

/// Turns raw file contents into a record.
///
/// Any `Fn(&[u8]) -> anyhow::Result<T>` is a decoder.
pub trait Decoder<T> {
    fn decode(&self, data: &[u8]) -> anyhow::Result<T>;
}

impl<T, F> Decoder<T> for F
where
    F: Fn(&[u8]) -> anyhow::Result<T>,
{
    fn decode(&self, data: &[u8]) -> anyhow::Result<T> {
        self(data)
    }
}

/// Decodes JSON files with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl<T: DeserializeOwned> Decoder<T> for JsonDecoder {
    fn decode(&self, data: &[u8]) -> anyhow::Result<T> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Load a record from a file.
///
/// The decoded value replaces the record, which is then marked
/// [`Mode::File`].
///
/// # Errors
///
/// - The target is not a mutable reference, or is null
/// - The file cannot be read
/// - The decoder rejects the file contents
pub fn load_from_file<'a, T, D>(target: T, path: impl AsRef<Path>, decoder: &D) -> Result<(), LoadError>
where
    T: Target<'a>,
    T::Record: Sized,
    D: Decoder<T::Record> + ?Sized,
{
    let record = target.into_record()?;
    let path = path.as_ref();

    let data = fs::read(path).map_err(|source| LoadError::FileRead {
        path: path.display().to_string(),
        source,
    })?;
    let decoded = decoder.decode(&data).map_err(|source| LoadError::FileDecode {
        path: path.display().to_string(),
        source,
    })?;

    *record = decoded;
    record.set_mode(Mode::File);
    tracing::debug!(path = %path.display(), "configuration loaded from file");
    Ok(())
}

/// Bind a record from the process environment and mark it
/// [`Mode::Environment`].
///
/// The mode is only recorded when binding succeeds.
///
/// # Errors
///
/// See [`load_env`](crate::load_env).
pub fn load_from_env<'a, T: Target<'a>>(target: T) -> Result<(), LoadError> {
    let record = target.into_record()?;
    crate::load_env_from(&mut *record, &ProcessEnv)?;
    record.set_mode(Mode::Environment);
    Ok(())
}
