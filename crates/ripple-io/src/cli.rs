//! Command-line surface: one subcommand per query family.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use ripple_core::{NodeId, ProbabilityModel, PropagationModel, SeedMode};
use ripple_engine::ResultIds;

#[derive(Parser)]
#[command(name = "ripple")]
#[command(about = "Influence analysis over directed social graphs")]
#[command(long_about = "Influence maximization/minimization, forward simulation \
and cohesive-community extraction under IC/LT diffusion")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by every query.
#[derive(Args)]
pub struct CommonArgs {
    /// Edge-list dataset, one "u v" pair per line
    #[arg(long)]
    pub dataset: PathBuf,

    /// Propagation model
    #[arg(long, value_enum, default_value = "ic")]
    pub propagation: PropagationArg,

    /// Probability model
    #[arg(long, value_enum, default_value = "wc")]
    pub probability: ProbabilityArg,

    /// Random seed (drives TR assignment and every sampler)
    #[arg(long, default_value = "1234")]
    pub seed: u64,

    /// Write the JSON result here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select k seeds maximizing expected spread
    Maximize {
        #[command(flatten)]
        common: CommonArgs,

        /// Seed budget
        #[arg(short, long)]
        k: usize,

        /// IMM approximation parameter
        #[arg(long, default_value = "0.1")]
        epsilon: f64,
    },

    /// Select k blockers minimizing the spread of negative seeds
    Minimize {
        #[command(flatten)]
        common: CommonArgs,

        /// Blocker budget
        #[arg(long)]
        budget: usize,

        /// How to obtain negative seeds when none are listed
        #[arg(long, value_enum, default_value = "random")]
        seed_mode: SeedModeArg,

        /// Number of negative seeds to synthesize
        #[arg(long, default_value = "1")]
        neg_count: usize,

        /// Explicit negative seeds (overrides seed-mode)
        #[arg(long, value_delimiter = ',')]
        negative: Vec<NodeId>,

        #[arg(long, default_value = "0.1")]
        epsilon: f64,
    },

    /// Converged per-node activation probabilities
    FinalInfluence {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(long, value_delimiter = ',', required = true)]
        seeds: Vec<NodeId>,

        #[arg(long, value_delimiter = ',')]
        blockers: Vec<NodeId>,
    },

    /// Probability-wave animation steps
    ProbabilityAnimation {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(long, value_delimiter = ',', required = true)]
        seeds: Vec<NodeId>,

        #[arg(long, value_delimiter = ',')]
        blockers: Vec<NodeId>,
    },

    /// Blocker-by-blocker recovery animation
    BlockingAnimation {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(long, value_delimiter = ',', required = true)]
        seeds: Vec<NodeId>,

        /// Blockers, applied one per step in the given order
        #[arg(long, value_delimiter = ',', required = true)]
        blockers: Vec<NodeId>,
    },

    /// Cohesive community around the query seeds
    Community {
        #[command(flatten)]
        common: CommonArgs,

        /// Cohesion criterion
        #[arg(long, value_enum)]
        kind: CommunityKindArg,

        /// Minimum internal (in-)degree, or trussness for k-truss
        #[arg(short, long)]
        k: usize,

        /// Minimum internal out-degree ((k,l)-core only)
        #[arg(short, long, default_value = "0")]
        l: usize,

        /// Seeds to synthesize when none are listed
        #[arg(long, default_value = "1")]
        seed_budget: usize,

        #[arg(long, value_enum, default_value = "imm")]
        seed_mode: SeedModeArg,

        /// Explicit query seeds (overrides seed-mode)
        #[arg(long, value_delimiter = ',')]
        seeds: Vec<NodeId>,

        #[arg(long, default_value = "0.1")]
        epsilon: f64,
    },

    /// Deepest propagation path from the seeds
    CriticalPaths {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(long, value_delimiter = ',', required = true)]
        seeds: Vec<NodeId>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PropagationArg {
    #[value(name = "ic")]
    Ic,
    #[value(name = "lt")]
    Lt,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProbabilityArg {
    #[value(name = "wc")]
    Wc,
    #[value(name = "tr")]
    Tr,
    #[value(name = "co")]
    Co,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SeedModeArg {
    #[value(name = "imm")]
    Imm,
    #[value(name = "random")]
    Random,
    #[value(name = "degree")]
    Degree,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CommunityKindArg {
    #[value(name = "kl-core")]
    KlCore,
    #[value(name = "k-core")]
    KCore,
    #[value(name = "k-truss")]
    KTruss,
}

impl From<PropagationArg> for PropagationModel {
    fn from(arg: PropagationArg) -> Self {
        match arg {
            PropagationArg::Ic => PropagationModel::Ic,
            PropagationArg::Lt => PropagationModel::Lt,
        }
    }
}

impl From<ProbabilityArg> for ProbabilityModel {
    fn from(arg: ProbabilityArg) -> Self {
        match arg {
            ProbabilityArg::Wc => ProbabilityModel::Wc,
            ProbabilityArg::Tr => ProbabilityModel::Tr,
            ProbabilityArg::Co => ProbabilityModel::Co,
        }
    }
}

impl From<SeedModeArg> for SeedMode {
    fn from(arg: SeedModeArg) -> Self {
        match arg {
            SeedModeArg::Imm => SeedMode::Imm,
            SeedModeArg::Random => SeedMode::Random,
            SeedModeArg::Degree => SeedMode::Degree,
        }
    }
}

/// UUID-backed result ids for the CLI.
pub struct UuidIds;

impl ResultIds for UuidIds {
    fn next(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}
