//! Checkpoint persistence for the Q-learning engine.
//!
//! A checkpoint directory holds one `config.json` record and any number of
//! weight blobs (`<name>.msgpack`). The config record is written once, by the
//! first save into the directory, and never replaced afterwards; every save
//! writes a fresh blob.
//!
//! Save writes the config record first and the blob second. The two writes
//! are not atomic as a pair: a failure in between leaves a directory with a
//! config record and no blob for that save.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    Error, Result,
    config::Hyperparameters,
    q_learning::q_table::QTable,
    types::{TABLE_RANK, TableShape},
};

/// File name of the config record inside a checkpoint directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Extension of weight blob files.
pub const WEIGHTS_EXTENSION: &str = "msgpack";

/// Hyperparameter record stored next to the weight blobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// Version of the record format
    pub version: u32,
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub action_space_size: usize,
    /// Labels of the attack-mode actions, in action-index order
    pub attack_actions: Vec<String>,
    /// Labels of the retreat-mode actions, in action-index order
    pub retreat_actions: Vec<String>,
    pub field_resolution: usize,
    pub table_shape: Vec<usize>,
}

impl CheckpointConfig {
    /// Current record format version
    pub const VERSION: u32 = 1;

    pub fn new<S: AsRef<str>>(
        hyperparameters: &Hyperparameters,
        shape: TableShape,
        attack_actions: &[S],
        retreat_actions: &[S],
    ) -> Self {
        Self {
            version: Self::VERSION,
            learning_rate: hyperparameters.learning_rate,
            discount_factor: hyperparameters.discount_factor,
            action_space_size: hyperparameters.action_space_size,
            attack_actions: attack_actions.iter().map(|s| s.as_ref().to_string()).collect(),
            retreat_actions: retreat_actions.iter().map(|s| s.as_ref().to_string()).collect(),
            field_resolution: hyperparameters.field_resolution,
            table_shape: shape.dims().to_vec(),
        }
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            learning_rate: self.learning_rate,
            discount_factor: self.discount_factor,
            action_space_size: self.action_space_size,
            field_resolution: self.field_resolution,
        }
    }

    /// Check the version, the hyperparameter ranges and that `table_shape`
    /// agrees with `action_space_size`.
    pub fn validate(&self) -> Result<TableShape> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        self.hyperparameters().validate()?;

        let shape = TableShape::from_dims(&self.table_shape)?;
        if shape.action_space_size() != self.action_space_size {
            let mut expected = shape.dims();
            expected[TABLE_RANK - 1] = self.action_space_size;
            return Err(Error::ShapeMismatch {
                expected: expected.to_vec(),
                found: self.table_shape.clone(),
            });
        }
        Ok(shape)
    }

    /// Read and parse the record at `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let file = open_existing(path, "config")?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::MalformedConfig {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Outcome of [`write_config_once`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWrite {
    /// No record existed; the given one was written.
    Written,
    /// A record already existed and was left untouched.
    KeptExisting,
}

/// Write-once config policy: the first save into a directory fixes its
/// config record, later saves never overwrite it.
///
/// The file is opened with `create_new`, so two writers racing on one
/// directory still produce exactly one record.
pub fn write_config_once(dir: &Path, config: &CheckpointConfig) -> Result<ConfigWrite> {
    let path = dir.join(CONFIG_FILE_NAME);
    let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(ConfigWrite::KeptExisting);
        }
        Err(source) => {
            return Err(Error::Io {
                operation: format!("create config record {}", path.display()),
                source,
            });
        }
    };

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, config)?;
    writer.flush().map_err(|source| Error::Io {
        operation: format!("write config record {}", path.display()),
        source,
    })?;

    Ok(ConfigWrite::Written)
}

/// Weight blob contents: the table shape followed by its values in
/// row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightBlob {
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

#[derive(Serialize)]
struct WeightBlobRef<'a> {
    shape: &'a [usize],
    values: &'a [f64],
}

pub fn write_weights(path: &Path, table: &QTable) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create weight blob {}", path.display()),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let dims = table.shape().dims();
    let blob = WeightBlobRef {
        shape: &dims,
        values: table.values(),
    };
    rmp_serde::encode::write(&mut writer, &blob).map_err(|e| Error::SerializationContext {
        operation: "serialize Q-table to MessagePack".to_string(),
        message: e.to_string(),
    })?;
    writer.flush().map_err(|source| Error::Io {
        operation: format!("write weight blob {}", path.display()),
        source,
    })?;

    Ok(())
}

pub fn read_weights(path: &Path) -> Result<WeightBlob> {
    let file = open_existing(path, "weight blob")?;
    rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| Error::SerializationContext {
        operation: format!("deserialize weight blob {}", path.display()),
        message: e.to_string(),
    })
}

/// Location of the config record belonging to the blob at `weights_path`.
pub fn config_path_for(weights_path: &Path) -> PathBuf {
    weights_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(CONFIG_FILE_NAME)
}

/// Blob file path for checkpoint `name` inside `dir`.
pub fn weights_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{WEIGHTS_EXTENSION}"))
}

/// Default checkpoint name: the current UNIX time in whole seconds.
pub fn default_checkpoint_name() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
        .to_string()
}

/// Files written by one save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub config_path: PathBuf,
    pub config_write: ConfigWrite,
    pub weights_path: PathBuf,
}

/// Save `table` as checkpoint `name` in `dir`, creating `dir` if needed.
pub(crate) fn save_checkpoint(
    dir: &Path,
    name: &str,
    config: &CheckpointConfig,
    table: &QTable,
) -> Result<SaveOutcome> {
    fs::create_dir_all(dir).map_err(|source| Error::Io {
        operation: format!("create save directory {}", dir.display()),
        source,
    })?;

    let config_path = dir.join(CONFIG_FILE_NAME);
    let config_write = write_config_once(dir, config)?;
    if config_write == ConfigWrite::KeptExisting {
        warn_if_config_differs(&config_path, config);
    }

    let weights_path = weights_path(dir, name);
    write_weights(&weights_path, table)?;

    info!(
        dir = %dir.display(),
        checkpoint = name,
        config = ?config_write,
        "saved Q-table checkpoint"
    );

    Ok(SaveOutcome {
        config_path,
        config_write,
        weights_path,
    })
}

fn warn_if_config_differs(path: &Path, current: &CheckpointConfig) {
    match CheckpointConfig::read(path) {
        Ok(existing) if existing.hyperparameters() != current.hyperparameters() => {
            warn!(
                path = %path.display(),
                existing = ?existing.hyperparameters(),
                current = ?current.hyperparameters(),
                "keeping existing config record; engine hyperparameters differ"
            );
        }
        Ok(_) => {}
        Err(e) => warn!(path = %path.display(), error = %e, "existing config record is unreadable"),
    }
}

/// Config record and table read back from a checkpoint.
pub(crate) struct LoadedCheckpoint {
    pub config: CheckpointConfig,
    pub table: QTable,
}

/// Read the blob at `path` and the config record beside it.
///
/// The blob must carry exactly the shape recorded in the config; a mismatch
/// is an error, never a reshape.
pub(crate) fn load_checkpoint(path: &Path) -> Result<LoadedCheckpoint> {
    let config_path = config_path_for(path);
    let config = CheckpointConfig::read(&config_path)?;
    let shape = config.validate()?;

    let blob = read_weights(path)?;
    if blob.shape != shape.dims() {
        return Err(Error::ShapeMismatch {
            expected: shape.dims().to_vec(),
            found: blob.shape,
        });
    }

    let table = QTable::from_values(
        shape,
        blob.values,
        config.learning_rate,
        config.discount_factor,
    )?;

    info!(
        path = %path.display(),
        shape = ?shape.dims(),
        "loaded Q-table checkpoint"
    );

    Ok(LoadedCheckpoint { config, table })
}

fn open_existing(path: &Path, kind: &'static str) -> Result<File> {
    File::open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            Error::MissingCheckpointFile {
                kind,
                path: path.to_path_buf(),
            }
        } else {
            Error::Io {
                operation: format!("open {kind} {}", path.display()),
                source,
            }
        }
    })
}
