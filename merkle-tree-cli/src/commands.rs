use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, bail};
use merkle_tree::{
    Digest, HashAlgorithm, MerkleTree, Proof,
    visualize::{Drawer, Visualize},
};
use tracing::{debug, info};

use crate::cli::{Cli, Command, Encoding, ItemsArgs, ProofTarget};

/// Run one command, writing its output to `out`.
///
/// Returns `false` when a proof failed verification.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<bool> {
    match &cli.command {
        Command::Summary(items) => {
            let tree = load_tree(items, cli.hash)?;
            serde_json::to_writer_pretty(&mut *out, &tree.summary())?;
            writeln!(out)?;
        }
        Command::Render { items, proof_for } => {
            let tree = load_tree(items, cli.hash)?;
            let mut drawer = tree.visualize(Drawer::new(&mut *out))?;
            if let Some(index) = proof_for {
                drawer = tree.prove_by_index(*index)?.visualize(drawer)?;
            }
            drawer.flush()?;
        }
        Command::Prove {
            items,
            target,
            encoding,
        } => {
            let tree = load_tree(items, cli.hash)?;
            let proof = prove(&tree, target)?;
            info!(
                leaf_index = proof.leaf_index,
                path_len = proof.path.len(),
                estimated_size = proof.estimated_size(tree.hasher()),
                "generated proof"
            );
            write_proof(&proof, *encoding, out)?;
        }
        Command::Verify {
            proof,
            encoding,
            item,
            root,
        } => {
            let proof = read_proof(proof, *encoding)?;
            let valid = verify(&proof, cli.hash, item.as_deref(), root.as_deref())?;
            writeln!(out, "{}", if valid { "valid" } else { "invalid" })?;
            return Ok(valid);
        }
    }
    Ok(true)
}

fn load_tree(args: &ItemsArgs, hash: HashAlgorithm) -> Result<MerkleTree<HashAlgorithm>> {
    let items = match &args.items_file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading items from {}", path.display()))?;
            text.lines().map(str::to_owned).collect()
        }
        None => args.items.clone(),
    };
    debug!(count = items.len(), %hash, "building tree");
    MerkleTree::from_items_with_hasher(items, hash).context("building tree")
}

fn prove(tree: &MerkleTree<HashAlgorithm>, target: &ProofTarget) -> Result<Proof> {
    match (target.index, &target.item) {
        (Some(index), _) => Ok(tree.prove_by_index(index)?),
        (None, Some(item)) => Ok(tree.prove_by_item(item.as_bytes())?),
        (None, None) => bail!("either --index or --item is required"),
    }
}

fn write_proof<W: Write>(proof: &Proof, encoding: Encoding, out: &mut W) -> Result<()> {
    match encoding {
        Encoding::Json => serde_json::to_writer_pretty(&mut *out, proof)?,
        Encoding::Hex => write!(out, "{}", hex::encode(proof.encode_to_vec()?))?,
    }
    writeln!(out)?;
    Ok(())
}

fn read_proof(path: &Path, encoding: Encoding) -> Result<Proof> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading proof from stdin")?;
        text
    } else {
        fs::read_to_string(path).with_context(|| format!("reading proof from {}", path.display()))?
    };
    parse_proof(&text, encoding)
}

pub(crate) fn parse_proof(text: &str, encoding: Encoding) -> Result<Proof> {
    match encoding {
        Encoding::Json => serde_json::from_str(text).context("parsing JSON proof"),
        Encoding::Hex => {
            let bytes = hex::decode(text.trim()).context("decoding hex proof")?;
            Ok(Proof::decode_from_slice(&bytes)?)
        }
    }
}

fn verify(proof: &Proof, hash: HashAlgorithm, item: Option<&str>, root: Option<&str>) -> Result<bool> {
    let root = root
        .map(|root| Digest::from_hex(root).context("parsing --root"))
        .transpose()?;
    Ok(match (item, root) {
        (Some(item), Some(root)) => proof.verify_item_against_root(&hash, item.as_bytes(), &root),
        (Some(item), None) => proof.verify_item(&hash, item.as_bytes()),
        (None, Some(root)) => proof.verify_against_root(&hash, &root),
        (None, None) => proof.verify(&hash),
    })
}
