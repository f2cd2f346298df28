//! padforge CLI library
//!
//! This module contains the core CLI logic: evaluate each footprint script,
//! collect its records and write them out as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use error_adapter::ErrorAdapter;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use indexmap::{IndexMap, IndexSet};
use log::{info, warn};
use serde::Serialize;

use padforge::{
    Fault, FootprintBuilder, PadforgeError,
    config::{AppConfig, OutputConfig},
    element::{self, Element},
    record::{self, Record},
};

/// What a CLI run produced besides its JSON output.
#[derive(Debug, Default)]
pub struct Outcome {
    evaluated: usize,
    faults: Vec<Fault>,
}

impl Outcome {
    /// Number of scripts evaluated
    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    /// Faults of the scripts that produced an error record, in input order
    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn has_faults(&self) -> bool {
        !self.faults.is_empty()
    }
}

/// Run the padforge CLI application
///
/// Evaluates every input script and writes its records as JSON: a single
/// array for one input, an object keyed by input path for several. An input
/// given more than once is evaluated once. A script
/// that fails contributes one error record and is listed in the returned
/// [`Outcome`]; it does not stop the run.
///
/// # Errors
///
/// Returns `PadforgeError` for:
/// - Configuration loading errors
/// - Output file I/O errors
/// - JSON serialization errors
pub fn run(args: &Args) -> Result<Outcome, PadforgeError> {
    info!(
        inputs = args.inputs.len(),
        output_path = args.output.as_deref().unwrap_or("<stdout>");
        "Generating footprints"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.pretty {
        app_config = AppConfig::new(*app_config.limits(), OutputConfig::new(true));
    }
    let builder = FootprintBuilder::new(app_config);

    let mut inputs = IndexSet::with_capacity(args.inputs.len());
    for input in &args.inputs {
        if !inputs.insert(input.as_str()) {
            warn!(path = input; "Input given more than once, evaluating it once");
        }
    }

    let mut outcome = Outcome::default();
    let mut generated: IndexMap<&str, Vec<Record>> = IndexMap::new();
    for input in inputs.iter().copied() {
        let records = match builder.evaluate_file(input) {
            Ok(elements) => {
                info!(
                    path = input,
                    elements = elements.len(),
                    extent = describe_extent(&elements).as_str();
                    "Footprint generated"
                );
                record::records(&elements)
            }
            Err(fault) => {
                warn!(path = input, kind = fault.kind().as_str(); "Footprint produced a fault record");
                let records = vec![fault.to_record()];
                outcome.faults.push(fault);
                records
            }
        };
        outcome.evaluated += 1;
        generated.insert(input, records);
    }

    match generated.values().next() {
        Some(records) if inputs.len() == 1 => write_output(&builder, records, args)?,
        _ => write_output(&builder, &generated, args)?,
    }

    info!(
        evaluated = outcome.evaluated,
        faults = outcome.faults.len();
        "Footprints written"
    );
    Ok(outcome)
}

/// Describes the extent of a footprint for the summary log
fn describe_extent(elements: &[Element]) -> String {
    match element::bounds_of(elements) {
        Some(bounds) => format!(
            "{:.3} x {:.3} from ({:.3}, {:.3}) to ({:.3}, {:.3})",
            bounds.width(),
            bounds.height(),
            bounds.min_x(),
            bounds.min_y(),
            bounds.max_x(),
            bounds.max_y()
        ),
        None => "none".to_string(),
    }
}

fn write_output<T>(builder: &FootprintBuilder, value: &T, args: &Args) -> Result<(), PadforgeError>
where
    T: Serialize + ?Sized,
{
    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            builder.write_json(value, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            builder.write_json(value, &mut stdout)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use padforge::{
        element::{Model, Smd},
        geometry::Size,
    };

    use super::*;

    #[test]
    fn test_describe_extent() {
        let elements = vec![
            Element::from(Smd::new(1i64, Size::new(2.0, 1.0))),
            Element::from(Model::new("a.step")),
        ];
        assert_eq!(
            describe_extent(&elements),
            "2.000 x 1.000 from (-1.000, -0.500) to (1.000, 0.500)"
        );
        assert_eq!(describe_extent(&[Element::from(Model::new("a.step"))]), "none");
    }
}
