//! Binary Decision Diagram (BDD) backend for the symbolic model checker
//!
//! This module provides a canonical representation of boolean functions using reduced ordered
//! binary decision diagrams (ROBDDs). Everything the checker manipulates — state sets, the
//! law, transition relations, evaluated formulas — is a [`Bdd`] handle into a shared
//! [`Manager`]:
//!
//! - **Canonical representation**: equivalent functions have identical node graphs, so
//!   equality (and therefore fixpoint detection) is a root-id comparison
//! - **Efficient operations**: NOT, AND, OR, XOR are all derived from a memoized ITE
//! - **Named variables**: variables are declared by name; the checker's primed (`v'`) and
//!   temporary (`vT`) column conventions are plain names to this layer
//!
//! # Implementation Details
//!
//! - **Per-model manager**: each Kripke model owns one manager created by its builder.
//!   Handles from different managers must never be mixed.
//! - **Hash consing**: a unique table keeps node representation canonical
//! - **Operation caching**: ITE results are memoized for the life of the manager
//! - **Variable ordering**: declaration order (builders declare a variable and its primed
//!   copy back-to-back so related columns stay adjacent)

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

mod display;
mod ops;
mod quantify;

/// Node identifier in the BDD
pub type NodeId = usize;

/// Variable identifier (index in variable ordering)
pub type VarId = usize;

/// Terminal node for FALSE
pub const FALSE_NODE: NodeId = 0;

/// Terminal node for TRUE
pub const TRUE_NODE: NodeId = 1;

/// A node in the shared graph: a constant, or a test on one variable
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum BddNode {
    Terminal(bool),
    /// Branches to `low` when `var` is false, to `high` when it is true
    Decision {
        var: VarId,
        low: NodeId,
        high: NodeId,
    },
}

/// The node store behind every [`Bdd`] handle of one model
///
/// The node table is append-only: an id handed out once stays valid for the manager's
/// whole lifetime, which is what lets traversals drop the lock between recursive steps
/// and lets handles be plain `(manager, id)` pairs. The unique table guarantees one
/// node per `(var, low, high)` triple, so function equality is id equality.
#[derive(Debug)]
pub(crate) struct BddManager {
    /// Append-only node table; the two constants sit at ids 0 and 1
    nodes: Vec<BddNode>,
    /// One canonical id per `(var, low, high)` triple
    unique_table: HashMap<(VarId, NodeId, NodeId), NodeId>,
    /// Declared name to variable id; ids assign the variable order
    var_to_id: HashMap<Arc<str>, VarId>,
    /// Variable id back to its name
    id_to_var: Vec<Arc<str>>,
    /// Memoized ite results, keyed by the operand triple
    ite_cache: HashMap<(NodeId, NodeId, NodeId), NodeId>,
}

impl BddManager {
    fn new() -> Self {
        BddManager {
            nodes: vec![
                BddNode::Terminal(false), // FALSE_NODE = 0
                BddNode::Terminal(true),  // TRUE_NODE = 1
            ],
            unique_table: HashMap::new(),
            var_to_id: HashMap::new(),
            id_to_var: Vec::new(),
            ite_cache: HashMap::new(),
        }
    }

    /// Get or create a variable ID for a variable name
    fn get_or_create_var(&mut self, name: &str) -> VarId {
        if let Some(&id) = self.var_to_id.get(name) {
            id
        } else {
            let key: Arc<str> = Arc::from(name);
            let id = self.id_to_var.len();
            self.var_to_id.insert(Arc::clone(&key), id);
            self.id_to_var.push(key);
            id
        }
    }

    /// Get variable name from ID
    fn var_name(&self, id: VarId) -> Option<&Arc<str>> {
        self.id_to_var.get(id)
    }

    /// Canonical decision node for `(var, low, high)`
    ///
    /// Applies both ROBDD reduction rules: a test whose branches coincide disappears,
    /// and a triple already present in the unique table is reused rather than
    /// allocated, so equal functions always share one node.
    fn make_node(&mut self, var: VarId, low: NodeId, high: NodeId) -> NodeId {
        if low == high {
            return low;
        }
        let key = (var, low, high);
        if let Some(&existing) = self.unique_table.get(&key) {
            return existing;
        }
        let id = self.nodes.len();
        self.nodes.push(BddNode::Decision { var, low, high });
        self.unique_table.insert(key, id);
        id
    }

    /// If-then-else over node ids, the one operation every connective reduces to
    ///
    /// After the terminal shortcuts, Shannon-expands all three operands on the
    /// smallest variable id among them, so each subproblem stays ordered. Results are
    /// memoized in the manager-wide cache.
    fn ite(&mut self, cond: NodeId, then_node: NodeId, else_node: NodeId) -> NodeId {
        match (cond, then_node, else_node) {
            (TRUE_NODE, t, _) => return t,
            (FALSE_NODE, _, e) => return e,
            (c, TRUE_NODE, FALSE_NODE) => return c,
            (_, t, e) if t == e => return t,
            _ => {}
        }

        let key = (cond, then_node, else_node);
        if let Some(&hit) = self.ite_cache.get(&key) {
            return hit;
        }

        let split = [cond, then_node, else_node]
            .iter()
            .filter_map(|&node| self.decision(node).map(|(var, _, _)| var))
            .min()
            .expect("an all-terminal ite is resolved by the shortcuts");

        let (cond_lo, cond_hi) = self.cofactor(cond, split);
        let (then_lo, then_hi) = self.cofactor(then_node, split);
        let (else_lo, else_hi) = self.cofactor(else_node, split);

        let low = self.ite(cond_lo, then_lo, else_lo);
        let high = self.ite(cond_hi, then_hi, else_hi);
        let result = self.make_node(split, low, high);

        self.ite_cache.insert(key, result);
        result
    }

    /// Both cofactors of a node with respect to `var`
    ///
    /// A terminal, or a node testing a variable further down the order, is constant
    /// in `var`: both cofactors are the node itself.
    fn cofactor(&self, node: NodeId, var: VarId) -> (NodeId, NodeId) {
        match self.decision(node) {
            Some((node_var, low, high)) if node_var == var => (low, high),
            _ => (node, node),
        }
    }

    /// Decompose a decision node into (var, low, high); None for terminals
    fn decision(&self, id: NodeId) -> Option<(VarId, NodeId, NodeId)> {
        match self.nodes.get(id) {
            Some(BddNode::Decision { var, low, high }) => Some((*var, *low, *high)),
            _ => None,
        }
    }
}

/// Handle to a BDD manager
///
/// Cheap to clone; all clones refer to the same node table. Each Kripke model creates one
/// manager and threads it through every BDD it builds. Dropping the last handle (and the
/// last [`Bdd`] pointing into it) frees the whole node table at once.
#[derive(Debug, Clone)]
pub struct Manager {
    inner: Arc<RwLock<BddManager>>,
}

impl Manager {
    /// Create a fresh manager with no declared variables
    pub fn new() -> Self {
        Manager {
            inner: Arc::new(RwLock::new(BddManager::new())),
        }
    }

    /// Declare a variable by name (idempotent) and return it as a BDD
    ///
    /// Variable order is declaration order; re-declaring an existing name returns the
    /// original variable unchanged.
    pub fn declare(&self, name: &str) -> Bdd {
        let mut mgr = self.inner.write().unwrap();
        let var_id = mgr.get_or_create_var(name);
        let node = mgr.make_node(var_id, FALSE_NODE, TRUE_NODE);
        drop(mgr);
        Bdd {
            manager: Arc::clone(&self.inner),
            root: node,
        }
    }

    /// Look up a previously declared variable; `None` if the name is unknown
    pub fn var(&self, name: &str) -> Option<Bdd> {
        let mut mgr = self.inner.write().unwrap();
        let &var_id = mgr.var_to_id.get(name)?;
        let node = mgr.make_node(var_id, FALSE_NODE, TRUE_NODE);
        drop(mgr);
        Some(Bdd {
            manager: Arc::clone(&self.inner),
            root: node,
        })
    }

    /// Check whether a variable name has been declared
    pub fn is_declared(&self, name: &str) -> bool {
        self.inner.read().unwrap().var_to_id.contains_key(name)
    }

    /// Create a BDD representing a constant
    pub fn constant(&self, value: bool) -> Bdd {
        Bdd {
            manager: Arc::clone(&self.inner),
            root: if value { TRUE_NODE } else { FALSE_NODE },
        }
    }

    /// All declared variable names, in declaration (= variable) order
    pub fn declared_names(&self) -> Vec<Arc<str>> {
        self.inner.read().unwrap().id_to_var.clone()
    }

    /// Number of declared variables
    pub fn var_count(&self) -> usize {
        self.inner.read().unwrap().id_to_var.len()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Manager::new()
    }
}

/// Binary Decision Diagram
///
/// Represents a boolean function in canonical form over the variables of one [`Manager`].
/// Handles are cheap to clone (an `Arc` bump plus a node id) and compare by structural
/// identity, which for a canonical ROBDD is function equality.
#[derive(Debug, Clone)]
pub struct Bdd {
    manager: Arc<RwLock<BddManager>>,
    root: NodeId,
}

impl Bdd {
    /// Check if this BDD is a terminal (constant)
    pub fn is_terminal(&self) -> bool {
        self.root == TRUE_NODE || self.root == FALSE_NODE
    }

    /// Check if this BDD represents TRUE
    pub fn is_true(&self) -> bool {
        self.root == TRUE_NODE
    }

    /// Check if this BDD represents FALSE
    pub fn is_false(&self) -> bool {
        self.root == FALSE_NODE
    }

    /// Get the number of nodes in this BDD
    pub fn node_count(&self) -> usize {
        let mut visited = std::collections::HashSet::new();
        self.count_reachable_nodes(self.root, &mut visited)
    }

    /// Count reachable nodes from a given root
    fn count_reachable_nodes(
        &self,
        node: NodeId,
        visited: &mut std::collections::HashSet<NodeId>,
    ) -> usize {
        if !visited.insert(node) {
            return 0;
        }

        // Acquire lock, extract needed data, then release before recursing.
        // This is safe because NodeIds are stable (nodes are never removed/reordered).
        let children = {
            let inner = self.manager.read().unwrap();
            inner.decision(node).map(|(_, low, high)| (low, high))
        };

        match children {
            None => 1,
            Some((low, high)) => {
                1 + self.count_reachable_nodes(low, visited)
                    + self.count_reachable_nodes(high, visited)
            }
        }
    }

    /// The set of variable names occurring in this BDD, sorted by name
    pub fn support(&self) -> BTreeSet<Arc<str>> {
        let mut var_ids = std::collections::HashSet::new();
        let mut visited = std::collections::HashSet::new();
        self.collect_vars(self.root, &mut var_ids, &mut visited);

        let mgr = self.manager.read().unwrap();
        var_ids
            .into_iter()
            .filter_map(|id| mgr.var_name(id).cloned())
            .collect()
    }

    /// Collect all variable IDs reachable from a node
    fn collect_vars(
        &self,
        node: NodeId,
        vars: &mut std::collections::HashSet<VarId>,
        visited: &mut std::collections::HashSet<NodeId>,
    ) {
        if !visited.insert(node) {
            return;
        }

        // Acquire lock, extract needed data, then release before recursing.
        let node_info = {
            let inner = self.manager.read().unwrap();
            inner.decision(node)
        };

        if let Some((var, low, high)) = node_info {
            vars.insert(var);
            self.collect_vars(low, vars, visited);
            self.collect_vars(high, vars, visited);
        }
    }

    /// `true` iff this function implies `other` everywhere
    ///
    /// The validity check used by the per-state queries: `cube → result` must be a
    /// tautology for the state to satisfy the formula.
    pub fn implies_everywhere(&self, other: &Bdd) -> bool {
        self.implies(other).is_true()
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }
}

impl PartialEq for Bdd {
    fn eq(&self, other: &Self) -> bool {
        // BDDs are equal if they share the same manager and have the same root node;
        // hash consing makes the root id canonical for the function
        Arc::ptr_eq(&self.manager, &other.manager) && self.root == other.root
    }
}

impl Eq for Bdd {}
