//! Generation orchestration: resolve, plan, emit.

use rayon::prelude::*;
use tracing::{debug, info_span};

use ffb_diagnostic::queue::DiagnosticConfig;
use ffb_diagnostic::DiagnosticQueue;
use ffb_emit::{emit_aggregate, emit_interface, ArtifactSink};
use ffb_ir::{Module, NameInterner};
use ffb_plan::{plan_aggregate, plan_interface, AggregatePlan, InterfacePlan};
use ffb_resolve::{Resolver, Target};

/// Options for one generation run.
#[derive(Clone, Debug)]
pub struct GenerateOptions {
    pub target: Target,
    /// Maximum errors kept before further ones are counted but
    /// dropped; 0 means unlimited.
    pub error_limit: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            target: Target::default(),
            error_limit: 0,
        }
    }
}

/// What one run produced.
#[derive(Debug)]
pub struct GenerationOutcome {
    /// Artifacts delivered to the sink.
    pub artifacts: usize,
    /// Artifacts emitted but marked invalid by diagnostics.
    pub invalid_artifacts: usize,
    pub diagnostics: DiagnosticQueue,
}

impl GenerationOutcome {
    pub fn succeeded(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Run the full pipeline over one description graph.
///
/// Aggregate layouts resolve first, in dependency order; planning then
/// runs per declaration with no shared mutable state, so declarations
/// are planned in parallel. Diagnostics and artifacts are delivered in
/// declaration order regardless of worker scheduling.
pub fn generate(
    module: &Module,
    interner: &NameInterner,
    options: &GenerateOptions,
    sink: &mut dyn ArtifactSink,
) -> std::io::Result<GenerationOutcome> {
    let span = info_span!("generate");
    let _guard = span.enter();

    let mut diagnostics = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: options.error_limit,
    });
    let resolver = Resolver::build(module, options.target, &mut diagnostics);

    let aggregate_plans: Vec<(Option<AggregatePlan>, DiagnosticQueue)> = module
        .aggregates
        .par_iter()
        .map(|agg| {
            let mut local = DiagnosticQueue::new();
            let plan = plan_aggregate(&resolver, agg, &mut local);
            (plan, local)
        })
        .collect();

    let interface_plans: Vec<(InterfacePlan, DiagnosticQueue)> = module
        .interfaces
        .par_iter()
        .map(|iface| {
            let mut local = DiagnosticQueue::new();
            let plan = plan_interface(&resolver, iface, &mut local);
            (plan, local)
        })
        .collect();

    let mut artifacts = 0;
    let mut invalid_artifacts = 0;

    for (plan, local) in aggregate_plans {
        diagnostics.absorb(local);
        // Cycle participants have no plan and no artifact.
        let Some(plan) = plan else { continue };
        let artifact = emit_aggregate(&plan, interner);
        debug!(name = %artifact.name, valid = artifact.valid, "aggregate artifact");
        artifacts += 1;
        if !artifact.valid {
            invalid_artifacts += 1;
        }
        sink.accept(artifact)?;
    }

    for (plan, local) in interface_plans {
        diagnostics.absorb(local);
        let artifact = emit_interface(&plan, interner);
        debug!(name = %artifact.name, valid = artifact.valid, "interface artifact");
        artifacts += 1;
        if !artifact.valid {
            invalid_artifacts += 1;
        }
        sink.accept(artifact)?;
    }

    Ok(GenerationOutcome {
        artifacts,
        invalid_artifacts,
        diagnostics,
    })
}
