use anyhow::Result;
use clap::Parser;
use serde_json::to_string_pretty;

use ripple_engine::{
    blocking_animation_query, community_query, critical_paths_query, final_influence_query,
    maximize_query, minimize_query, probability_animation_query, CommunityKind, NegativeSeedSpec,
    QueryContext,
};
use ripple_io::cli::{Cli, Commands, CommonArgs, CommunityKindArg, UuidIds};
use ripple_io::loader::load_graph;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Maximize { common, k, epsilon } => run(&common, |ctx, ids| {
            Ok(to_string_pretty(&maximize_query(ctx, k, epsilon, ids)?)?)
        }),
        Commands::Minimize {
            common,
            budget,
            seed_mode,
            neg_count,
            negative,
            epsilon,
        } => run(&common, |ctx, ids| {
            let spec = NegativeSeedSpec {
                mode: seed_mode.into(),
                count: neg_count,
                manual: negative,
            };
            Ok(to_string_pretty(&minimize_query(
                ctx, budget, &spec, epsilon, ids,
            )?)?)
        }),
        Commands::FinalInfluence {
            common,
            seeds,
            blockers,
        } => run(&common, |ctx, ids| {
            Ok(to_string_pretty(&final_influence_query(
                ctx, &seeds, &blockers, ids,
            )?)?)
        }),
        Commands::ProbabilityAnimation {
            common,
            seeds,
            blockers,
        } => run(&common, |ctx, ids| {
            Ok(to_string_pretty(&probability_animation_query(
                ctx, &seeds, &blockers, ids,
            )?)?)
        }),
        Commands::BlockingAnimation {
            common,
            seeds,
            blockers,
        } => run(&common, |ctx, ids| {
            Ok(to_string_pretty(&blocking_animation_query(
                ctx, &seeds, &blockers, ids,
            )?)?)
        }),
        Commands::Community {
            common,
            kind,
            k,
            l,
            seed_budget,
            seed_mode,
            seeds,
            epsilon,
        } => run(&common, |ctx, ids| {
            let kind = match kind {
                CommunityKindArg::KlCore => CommunityKind::KlCore { k, l },
                CommunityKindArg::KCore => CommunityKind::KCore { k },
                CommunityKindArg::KTruss => CommunityKind::KTruss { k },
            };
            Ok(to_string_pretty(&community_query(
                ctx,
                kind,
                seed_budget,
                seed_mode.into(),
                &seeds,
                epsilon,
                ids,
            )?)?)
        }),
        Commands::CriticalPaths { common, seeds } => run(&common, |ctx, ids| {
            Ok(to_string_pretty(&critical_paths_query(ctx, &seeds, ids)?)?)
        }),
    }
}

/// Load the dataset, run one query against it, write the result.
fn run<F>(common: &CommonArgs, query: F) -> Result<()>
where
    F: FnOnce(&QueryContext<'_>, &mut UuidIds) -> Result<String>,
{
    let graph = load_graph(&common.dataset, common.seed)?;
    let ctx = QueryContext {
        graph: &graph,
        propagation: common.propagation.into(),
        probability: common.probability.into(),
        seed: common.seed,
    };
    let mut ids = UuidIds;
    let json = query(&ctx, &mut ids)?;

    match &common.out {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
