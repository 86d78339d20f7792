//! Rendering BDDs as boolean expressions and Graphviz graphs

use super::{Bdd, FALSE_NODE, NodeId, TRUE_NODE};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

impl Bdd {
    /// Extract cubes (product terms) from the BDD
    ///
    /// Returns a vector of cubes, where each cube is a map from variable name to
    /// its literal value (true for positive literal, false for negative literal).
    /// Each cube represents one path from the root to the TRUE terminal.
    pub fn to_cubes(&self) -> Vec<BTreeMap<Arc<str>, bool>> {
        let mut results = Vec::new();
        let mut current_path = BTreeMap::new();
        self.extract_cubes(self.root, &mut current_path, &mut results);
        results
    }

    /// Extract cubes recursively by traversing the BDD
    fn extract_cubes(
        &self,
        node: NodeId,
        current_path: &mut BTreeMap<Arc<str>, bool>,
        results: &mut Vec<BTreeMap<Arc<str>, bool>>,
    ) {
        // Acquire lock, extract needed data, then release before recursing.
        // This is safe because NodeIds are stable (nodes are never removed/reordered).
        let node_info = {
            let inner = self.manager.read().unwrap();
            inner.decision(node).map(|(var, low, high)| {
                let name = inner
                    .var_name(var)
                    .expect("invalid variable ID during cube extraction");
                (Arc::clone(name), low, high)
            })
        };

        match node_info {
            None => {
                // Terminal: a path to TRUE contributes its literals as a cube
                if node == TRUE_NODE {
                    results.push(current_path.clone());
                }
            }
            Some((var_name, low, high)) => {
                current_path.insert(Arc::clone(&var_name), false);
                self.extract_cubes(low, current_path, results);
                current_path.remove(&var_name);

                current_path.insert(Arc::clone(&var_name), true);
                self.extract_cubes(high, current_path, results);
                current_path.remove(&var_name);
            }
        }
    }

    /// Render this BDD as a sum-of-products expression string
    ///
    /// Uses the same operator alphabet as the input language (`!`, `&`, `|`), so the
    /// output of a check can be pasted back into a LAW section.
    pub fn to_expr_string(&self) -> String {
        if self.is_true() {
            return "TRUE".to_string();
        }
        if self.is_false() {
            return "FALSE".to_string();
        }

        let cubes = self.to_cubes();
        let terms: Vec<String> = cubes
            .iter()
            .map(|cube| {
                let literals: Vec<String> = cube
                    .iter()
                    .map(|(name, &positive)| {
                        if positive {
                            name.to_string()
                        } else {
                            format!("!{}", name)
                        }
                    })
                    .collect();
                if literals.len() == 1 {
                    literals.into_iter().next().unwrap()
                } else {
                    literals.join(" & ")
                }
            })
            .collect();

        if terms.len() == 1 {
            terms.into_iter().next().unwrap()
        } else {
            terms.join(" | ")
        }
    }

    /// Write this BDD as a Graphviz digraph
    ///
    /// Dashed edges are low (false) branches, solid edges high (true) branches.
    pub fn write_dot<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "digraph bdd {{")?;

        let mut stack = vec![self.root];
        let mut seen = std::collections::HashSet::new();
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            let node_info = {
                let inner = self.manager.read().unwrap();
                inner.decision(node).map(|(var, low, high)| {
                    let name = inner.var_name(var).expect("invalid variable ID in dump");
                    (Arc::clone(name), low, high)
                })
            };
            match node_info {
                None => {
                    let label = if node == FALSE_NODE { "0" } else { "1" };
                    writeln!(writer, "    n{} [shape=box, label=\"{}\"];", node, label)?;
                }
                Some((name, low, high)) => {
                    writeln!(writer, "    n{} [shape=circle, label=\"{}\"];", node, name)?;
                    writeln!(writer, "    n{} -> n{} [style=dashed];", node, low)?;
                    writeln!(writer, "    n{} -> n{};", node, high)?;
                    stack.push(low);
                    stack.push(high);
                }
            }
        }

        writeln!(writer, "}}")
    }

    /// Persist this BDD as a Graphviz file at `path`
    pub fn dump_dot<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_dot(&mut writer)
    }
}

impl fmt::Display for Bdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_expr_string())
    }
}
