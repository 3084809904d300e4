use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use merkle_tree::HashAlgorithm;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "merkle", version, about = "Build Merkle trees and check inclusion proofs")]
pub struct Cli {
    /// Hash function: blake3, sha256 or rolling
    #[arg(long, global = true, default_value = "blake3")]
    pub hash: HashAlgorithm,

    /// Log level (logs go to stderr)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every level of the tree as JSON
    Summary(ItemsArgs),
    /// Draw the tree level by level
    Render {
        #[command(flatten)]
        items: ItemsArgs,
        /// Also draw the proof for this leaf
        #[arg(long)]
        proof_for: Option<usize>,
    },
    /// Produce an inclusion proof for one leaf
    Prove {
        #[command(flatten)]
        items: ItemsArgs,
        #[command(flatten)]
        target: ProofTarget,
        /// Output encoding
        #[arg(long, value_enum, default_value_t = Encoding::Json)]
        encoding: Encoding,
    },
    /// Check a proof without the tree
    Verify {
        /// Proof file, or `-` for stdin
        #[arg(long)]
        proof: PathBuf,
        /// Encoding of the proof file
        #[arg(long, value_enum, default_value_t = Encoding::Json)]
        encoding: Encoding,
        /// Item the proof is claimed to cover
        #[arg(long)]
        item: Option<String>,
        /// Hex root the proof must commit to
        #[arg(long)]
        root: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ItemsArgs {
    /// Items, one leaf each
    #[arg(required_unless_present = "items_file")]
    pub items: Vec<String>,
    /// Read items from a file, one per line
    #[arg(long, conflicts_with = "items")]
    pub items_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ProofTarget {
    /// Leaf index
    #[arg(long)]
    pub index: Option<usize>,
    /// Leaf item (first match)
    #[arg(long)]
    pub item: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Pretty JSON, digests as hex
    Json,
    /// Hex of the bincode encoding
    Hex,
}
