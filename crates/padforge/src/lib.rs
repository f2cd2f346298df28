//! Padforge - sandboxed evaluation of footprint scripts.
//!
//! A footprint script describes the copper pads, outlines and text of an
//! electronic component footprint. [`FootprintBuilder`] compiles a script,
//! runs its `footprint()` entry point against a fixed vocabulary of element
//! constructors and pad layout generators, and returns the flat, ordered list
//! of elements it produced, or the [`Fault`] that stopped it.
//!
//! Every evaluation runs on its own thread with a fresh namespace, under the
//! resource limits of [`config::LimitsConfig`]. Nothing is shared between
//! evaluations, and a failing evaluation never yields partial output.
//!
//! # Examples
//!
//! ```
//! use padforge::FootprintBuilder;
//!
//! let source = r#"
//!     fn footprint() {
//!         return [Reference(), dual(Smd(1, (1.55, 0.25)), 5.6, 0.65, 14)];
//!     }
//! "#;
//!
//! let builder = FootprintBuilder::default();
//! let elements = builder.evaluate(source).expect("valid script");
//! assert_eq!(elements.len(), 15);
//!
//! let json = builder.generate_json("fn footprint() { return 1 / 0; }");
//! assert!(json.contains("division by zero"));
//! ```

pub mod config;

mod error;
mod fault;
mod interpreter;
mod sandbox;
mod value;
mod vocabulary;

pub use padforge_core::{element, flatten, geometry, layer, layout, record};

pub use error::PadforgeError;
pub use fault::{Fault, FaultKind, Frame};
pub use interpreter::ENTRY_POINT;

use std::{
    any::Any,
    fs, io,
    path::Path,
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Duration,
};

use log::{debug, info, warn};

use config::{AppConfig, LimitsConfig};
use element::Element;
use record::Record;

/// Stack size of the evaluation thread; deep but bounded recursion in the
/// interpreter needs far more than the default.
const EVALUATION_STACK_SIZE: usize = 128 * 1024 * 1024;

/// How long past the timeout the caller waits before abandoning a worker
/// that has not reported back.
const TIMEOUT_GRACE: Duration = Duration::from_millis(500);

/// Name shown in diagnostics for scripts that did not come from a file.
const INLINE_SOURCE_NAME: &str = "<script>";

/// Builder for evaluating footprint scripts.
///
/// # Examples
///
/// ```
/// use padforge::{FootprintBuilder, config::{AppConfig, LimitsConfig, OutputConfig}};
///
/// let config = AppConfig::new(LimitsConfig::default(), OutputConfig::new(true));
/// let builder = FootprintBuilder::new(config);
/// let records = builder.generate("fn footprint() { return Model(\"C_0402.wrl\"); }");
/// assert_eq!(records.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct FootprintBuilder {
    config: AppConfig,
}

impl FootprintBuilder {
    /// Create a new footprint builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Evaluate script source and return the flattened elements of its
    /// entry point.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] for syntax errors, a missing or malformed entry
    /// point, runtime faults, results that are not elements, exceeded
    /// resource limits and internal failures.
    pub fn evaluate(&self, source: &str) -> Result<Vec<Element>, Fault> {
        self.evaluate_named(INLINE_SOURCE_NAME, source)
    }

    /// Like [`evaluate`](Self::evaluate), naming the source `name` in
    /// diagnostics.
    pub fn evaluate_named(&self, name: &str, source: &str) -> Result<Vec<Element>, Fault> {
        info!(source_name = name, source_len = source.len(); "Evaluating footprint");

        let limits = *self.config.limits();
        let result = if source.len() > limits.max_source_bytes() {
            Err(oversized(source.len() as u64, &limits))
        } else {
            evaluate_isolated(source, limits)
        };

        match result {
            Ok(elements) => {
                debug!(source_name = name, elements = elements.len(); "Footprint evaluated");
                Ok(elements)
            }
            Err(fault) => {
                warn!(source_name = name, kind = fault.kind().as_str(); "Footprint evaluation failed");
                Err(fault.with_source(name, source))
            }
        }
    }

    /// Read and evaluate the script at `path`.
    ///
    /// # Errors
    ///
    /// In addition to the faults of [`evaluate`](Self::evaluate), returns a
    /// [`FaultKind::Load`] fault if the file cannot be read, is too large or
    /// is not UTF-8.
    pub fn evaluate_file(&self, path: impl AsRef<Path>) -> Result<Vec<Element>, Fault> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let source = read_source(path, self.config.limits()).inspect_err(|fault| {
            warn!(path = name, kind = fault.kind().as_str(); "Footprint could not be loaded");
        })?;
        self.evaluate_named(&name, &source)
    }

    /// Evaluate script source into records: one per element, or a single
    /// error record.
    pub fn generate(&self, source: &str) -> Vec<Record> {
        into_records(self.evaluate(source))
    }

    /// Read and evaluate the script at `path` into records.
    pub fn generate_file(&self, path: impl AsRef<Path>) -> Vec<Record> {
        into_records(self.evaluate_file(path))
    }

    /// Evaluate script source into the JSON text of its records.
    pub fn generate_json(&self, source: &str) -> String {
        let records = self.generate(source);
        to_json(&records, self.config.output().pretty()).unwrap_or_else(|err| {
            serde_json::json!([{ "t": "Error", "message": err.to_string() }]).to_string()
        })
    }

    /// Write records as JSON, pretty-printed if the output configuration
    /// asks for it.
    ///
    /// # Errors
    ///
    /// Returns [`PadforgeError`] if serialization or writing fails.
    pub fn write_json<T>(&self, value: &T, mut writer: impl io::Write) -> Result<(), PadforgeError>
    where
        T: serde::Serialize + ?Sized,
    {
        if self.config.output().pretty() {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

/// Serializes records to a JSON array.
///
/// # Errors
///
/// Returns [`PadforgeError::Json`] if serialization fails.
pub fn to_json(records: &[Record], pretty: bool) -> Result<String, PadforgeError> {
    let json = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    Ok(json)
}

fn into_records(result: Result<Vec<Element>, Fault>) -> Vec<Record> {
    match result {
        Ok(elements) => record::records(&elements),
        Err(fault) => vec![fault.to_record()],
    }
}

fn oversized(len: u64, limits: &LimitsConfig) -> Fault {
    Fault::new(
        FaultKind::Load,
        format!(
            "script is {len} bytes, larger than the limit of {} bytes",
            limits.max_source_bytes()
        ),
    )
}

fn read_source(path: &Path, limits: &LimitsConfig) -> Result<String, Fault> {
    let load_fault = |err: io::Error| {
        Fault::new(
            FaultKind::Load,
            format!("cannot read `{}`: {err}", path.display()),
        )
    };

    let len = fs::metadata(path).map_err(load_fault)?.len();
    if len > limits.max_source_bytes() as u64 {
        return Err(oversized(len, limits));
    }
    let bytes = fs::read(path).map_err(load_fault)?;
    String::from_utf8(bytes).map_err(|err| {
        Fault::new(
            FaultKind::Load,
            format!("`{}` is not valid UTF-8: {err}", path.display()),
        )
    })
}

fn compile_and_run(source: &str, limits: LimitsConfig) -> Result<Vec<Element>, Fault> {
    let script = padforge_parser::parse(source, &limits.parser_config()).map_err(Fault::syntax)?;
    debug!(items = script.items.len(); "Script compiled");
    interpreter::run(&script, limits)
}

/// Runs one evaluation on a dedicated thread.
///
/// The interpreter enforces the timeout itself; the wait here is a backstop.
/// A worker that misses it is detached and reported as timed out.
fn evaluate_isolated(source: &str, limits: LimitsConfig) -> Result<Vec<Element>, Fault> {
    let (sender, receiver) = mpsc::channel();
    let owned_source = source.to_string();
    let worker = thread::Builder::new()
        .name("padforge-eval".to_string())
        .stack_size(EVALUATION_STACK_SIZE)
        .spawn(move || {
            // The receiver is gone only if the caller gave up waiting
            let _ = sender.send(compile_and_run(&owned_source, limits));
        })
        .map_err(|err| Fault::internal(format!("cannot start the evaluation thread: {err}")))?;

    match receiver.recv_timeout(limits.timeout().saturating_add(TIMEOUT_GRACE)) {
        Ok(result) => {
            if worker.join().is_err() {
                warn!("Evaluation thread panicked after reporting its result");
            }
            result
        }
        Err(RecvTimeoutError::Timeout) => {
            warn!(timeout_ms = limits.timeout().as_millis(); "Evaluation thread missed its deadline; detaching it");
            Err(Fault::new(
                FaultKind::Timeout,
                format!(
                    "evaluation exceeded the time limit of {} ms",
                    limits.timeout().as_millis()
                ),
            ))
        }
        Err(RecvTimeoutError::Disconnected) => {
            let message = match worker.join() {
                Err(payload) => panic_message(payload.as_ref()),
                Ok(()) => "the evaluation thread stopped without a result".to_string(),
            };
            Err(Fault::internal(format!("evaluation panicked: {message}")))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
