use super::{CoverageSummary, PartitionedCoverage};
use crate::discovery::SourceUnit;
use crate::parser::{Declaration, ParsedUnit, Parser, PythonParser};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Merges declarations across units and reduces them to a summary
#[derive(Debug, Clone, Default)]
pub struct CoverageAggregator<P = PythonParser> {
    parser: P,
}

impl CoverageAggregator<PythonParser> {
    pub fn new() -> Self {
        Self {
            parser: PythonParser::new(),
        }
    }
}

impl<P: Parser> CoverageAggregator<P> {
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    /// Aggregate every unit into one summary
    pub fn aggregate(&self, units: &[SourceUnit]) -> CoverageSummary {
        let extracted = self.extract_all(units);
        fold(extracted.iter())
    }

    /// Aggregate once without test units and once over all units, parsing
    /// each unit a single time.
    pub fn aggregate_partitioned(&self, units: &[SourceUnit]) -> PartitionedCoverage {
        let extracted = self.extract_all(units);
        PartitionedCoverage {
            without_tests: fold(extracted.iter().filter(|e| !e.unit.is_test)),
            with_tests: fold(extracted.iter()),
        }
    }

    fn extract_all<'u>(&self, units: &'u [SourceUnit]) -> Vec<Extracted<'u>> {
        units
            .iter()
            .map(|unit| {
                let parsed = match self.parser.parse(unit) {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        warn!("Skipping {}: {}", unit.path.display(), e);
                        None
                    }
                };
                Extracted { unit, parsed }
            })
            .collect()
    }
}

/// A unit with its extraction result; `None` means it was skipped
struct Extracted<'u> {
    unit: &'u SourceUnit,
    parsed: Option<ParsedUnit>,
}

struct Chosen<'e> {
    declaration: &'e Declaration,
    from_stub: bool,
}

/// Pick one declaration per fully-qualified name and sum the counts.
///
/// An occupied name is only ever replaced by a stub record displacing an
/// implementation record, so stubs win regardless of where they sit in the
/// input and nothing can displace a stub afterwards.
fn fold<'e, 'u: 'e>(extracted: impl Iterator<Item = &'e Extracted<'u>>) -> CoverageSummary {
    let mut summary = CoverageSummary::default();
    let mut chosen: HashMap<String, Chosen<'e>> = HashMap::new();

    for item in extracted {
        let Some(parsed) = &item.parsed else {
            summary.skipped_units += 1;
            continue;
        };

        summary.hasattr_calls += parsed.hasattr_calls;
        summary.getattr_default_calls += parsed.getattr_default_calls;

        let from_stub = item.unit.kind.is_stub();
        for declaration in &parsed.declarations {
            let candidate = Chosen {
                declaration,
                from_stub,
            };
            match chosen.entry(declaration.qualified_name()) {
                Entry::Vacant(slot) => {
                    slot.insert(candidate);
                }
                Entry::Occupied(mut slot) => {
                    if from_stub && !slot.get().from_stub {
                        slot.insert(candidate);
                    }
                }
            }
        }
    }

    for Chosen { declaration, .. } in chosen.values() {
        summary.total_functions += 1;
        summary.total_parameters += declaration.parameter_count;
        summary.annotated_parameters += declaration.annotated_parameter_count;

        if !declaration.is_initializer {
            summary.return_eligible_functions += 1;
            if declaration.has_return_annotation {
                summary.annotated_returns += 1;
            }
        }

        if declaration.is_public() {
            summary.surface_area += 1;
        }
    }

    debug!(
        "Aggregated {} functions ({} parameters), {} units skipped",
        summary.total_functions, summary.total_parameters, summary.skipped_units
    );

    summary
}
