use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::catalog::EntityCatalog;
use crate::disruption::{generate_side_effects, SideEffects};
use crate::document::{
    create_output_file, render_control_document, render_demand_document, write_control_document,
    write_demand_document,
};
use crate::error::Result;
use crate::routes::RouteTable;
use crate::sampler::{DemandSampler, RouteWeights};
use crate::scenario::config::ScenarioConfig;
use crate::summary::GenerationSummary;
use crate::timeline::{merge_timeline, MergeContext, MergeParams, Timeline};

/// Output of one generation pass: the merged timeline and its disruption side effects.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub catalog: EntityCatalog,
    pub routes: RouteTable,
    pub timeline: Timeline,
    pub side_effects: SideEffects,
    pub summary: GenerationSummary,
}

impl Scenario {
    pub fn demand_xml(&self) -> Result<String> {
        render_demand_document(&self.catalog, &self.routes, &self.timeline)
    }

    pub fn control_xml(&self) -> Result<String> {
        render_control_document(&self.side_effects)
    }

    /// Write both documents. Both are always written, even when some
    /// disruptions were skipped.
    pub fn write_documents(
        &self,
        demand_path: impl AsRef<Path>,
        control_path: impl AsRef<Path>,
    ) -> Result<()> {
        let demand_path = demand_path.as_ref();
        let control_path = control_path.as_ref();

        write_demand_document(
            create_output_file(demand_path)?,
            &self.catalog,
            &self.routes,
            &self.timeline,
        )?;
        write_control_document(create_output_file(control_path)?, &self.side_effects)?;

        info!(
            demand = %demand_path.display(),
            control = %control_path.display(),
            "scenario documents written"
        );
        Ok(())
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Validate the configuration and run one generation pass.
pub fn generate(config: &ScenarioConfig) -> Result<Scenario> {
    config.validate()?;

    let weights = RouteWeights::new(&config.route_weights, &config.routes)?;
    let weights_renormalized = weights.was_renormalized();
    let sampler = DemandSampler::new(weights, config.colors, config.inter_arrival.build()?);

    let ctx = MergeContext {
        params: MergeParams {
            background_count: config.background_count,
            repel_window_secs: config.repel_window_secs,
            repel_offset_secs: config.repel_offset_secs,
        },
        sampler: &sampler,
        routes: &config.routes,
        disruption: &config.disruption,
        background_type: &config.background_type,
    };

    let mut rng = build_rng(config.seed);
    let timeline = merge_timeline(
        &ctx,
        &config.priority_events,
        &config.disruption_events,
        &mut rng,
    );
    let side_effects = generate_side_effects(
        &config.disruption_events,
        &config.routes,
        &config.disruption,
    );

    let mut summary = GenerationSummary::from_timeline(&timeline);
    summary.zones = side_effects.zones.len();
    summary.closures = side_effects.closures.len();
    summary.skipped_disruptions = side_effects.skipped.len();
    summary.weights_renormalized = weights_renormalized;

    Ok(Scenario {
        catalog: config.entity_types.clone(),
        routes: config.routes.clone(),
        timeline,
        side_effects,
        summary,
    })
}
