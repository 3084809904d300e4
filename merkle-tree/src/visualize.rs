//! Human-readable rendering of trees, summaries and proofs.

use std::io::{self, Write};

use itertools::Itertools;

use crate::{HashFunction, MerkleTree, NodeSummary, Proof, TreeSummary};

/// Bytes of each digest shown in per-node labels.
const LABEL_BYTES: usize = 8;
/// Hex characters kept at each end by [`to_hex`].
const HEX_LEN: usize = 8;
const INDENT_SPACES: usize = 2;

/// Pretty rendering into a [`Drawer`].
pub trait Visualize {
    /// Draw `self` and hand the drawer back.
    fn visualize<W: Write>(&self, drawer: Drawer<W>) -> io::Result<Drawer<W>>;
}

/// An `io::Write` proxy that indents every line by the current nesting depth.
pub struct Drawer<W: Write> {
    depth: usize,
    at_line_start: bool,
    write: W,
}

impl<W: Write> Drawer<W> {
    /// Wrap a writer.
    pub fn new(write: W) -> Self {
        Drawer {
            depth: 0,
            at_line_start: true,
            write,
        }
    }

    /// Indent following lines one step further.
    pub fn down(&mut self) {
        self.depth += 1;
    }

    /// Undo one [`down`](Self::down).
    pub fn up(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Write text, indenting each new line.
    pub fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        for (i, chunk) in buf.split(|c| *c == b'\n').enumerate() {
            if i > 0 {
                self.write.write_all(b"\n")?;
                self.at_line_start = true;
            }
            if chunk.is_empty() {
                continue;
            }
            if self.at_line_start {
                self.write
                    .write_all(" ".repeat(INDENT_SPACES * self.depth).as_bytes())?;
                self.at_line_start = false;
            }
            self.write.write_all(chunk)?;
        }
        Ok(())
    }

    /// Write text followed by a newline.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        self.write(text.as_bytes())?;
        self.write(b"\n")
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.write.flush()
    }
}

/// Hex with the middle elided for long inputs: `0123abcd..89abcdef`.
pub fn to_hex(bytes: &[u8]) -> String {
    let encoded = hex::encode(bytes);
    let remaining = encoded.len().saturating_sub(HEX_LEN);
    if remaining > HEX_LEN {
        format!("{}..{}", &encoded[..HEX_LEN], &encoded[remaining..])
    } else {
        encoded
    }
}

impl<H: HashFunction> Visualize for MerkleTree<H> {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> io::Result<Drawer<W>> {
        drawer.line("Merkle Tree Structure:")?;
        for (level, digests) in self.levels().iter().enumerate() {
            let kind = if level == 0 { "Leaf" } else { "Internal" };
            let row = digests
                .iter()
                .map(|digest| format!("{}[{}]", kind, digest.short_hex(LABEL_BYTES)))
                .join(" | ");
            drawer.line(&format!("Level {}: {}", level, row))?;
        }
        match self.root_digest() {
            Some(root) => drawer.line(&format!("Root Hash: {}", root))?,
            None => drawer.line("Root Hash: <empty tree>")?,
        }
        Ok(drawer)
    }
}

impl Visualize for TreeSummary {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> io::Result<Drawer<W>> {
        let root = self
            .root_digest
            .as_ref()
            .map(|root| to_hex(root.as_bytes()))
            .unwrap_or_else(|| "none".to_owned());
        drawer.line(&format!(
            "tree: {} leaves, depth {}, root {}",
            self.leaf_count, self.depth, root
        ))?;
        drawer.down();
        for (level, nodes) in self.levels.iter().enumerate().rev() {
            drawer.line(&format!("level {}:", level))?;
            drawer.down();
            for node in nodes {
                drawer.line(&node_label(node))?;
            }
            drawer.up();
        }
        drawer.up();
        Ok(drawer)
    }
}

fn node_label(node: &NodeSummary) -> String {
    match &node.item {
        Some(item) => format!(
            "[{}] {} {}",
            node.position,
            to_hex(node.digest.as_bytes()),
            item_label(item)
        ),
        None => format!("[{}] {}", node.position, to_hex(node.digest.as_bytes())),
    }
}

fn item_label(item: &[u8]) -> String {
    match std::str::from_utf8(item) {
        Ok(text) => format!("{:?}", text),
        Err(_) => format!("0x{}", hex::encode(item)),
    }
}

impl Visualize for Proof {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> io::Result<Drawer<W>> {
        drawer.line(&format!("proof for leaf {}", self.leaf_index))?;
        drawer.down();
        drawer.line(&format!("leaf: {}", to_hex(self.leaf_digest.as_bytes())))?;
        for (i, step) in self.path.iter().enumerate() {
            drawer.line(&format!(
                "{}. {:<5} {}",
                i + 1,
                step.side,
                to_hex(step.digest.as_bytes())
            ))?;
        }
        drawer.line(&format!("root: {}", to_hex(self.root_digest.as_bytes())))?;
        drawer.up();
        Ok(drawer)
    }
}

/// Render into a byte vector.
pub fn visualize_to_vec<T: Visualize + ?Sized>(v: &mut Vec<u8>, value: &T) {
    let drawer = Drawer::new(v);
    value
        .visualize(drawer)
        .expect("writing into a Vec cannot fail");
}

/// Render into a `String`.
pub fn visualize_to_string<T: Visualize + ?Sized>(value: &T) -> String {
    let mut v = Vec::new();
    visualize_to_vec(&mut v, value);
    String::from_utf8_lossy(&v).into_owned()
}

/// Render straight to stdout.
pub fn visualize_stdout<T: Visualize + ?Sized>(value: &T) -> io::Result<()> {
    let mut out = io::stdout().lock();
    value.visualize(Drawer::new(&mut out))?.flush()
}
