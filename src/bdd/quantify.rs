//! Variable renaming, quantifier elimination, and the restrict operator
//!
//! These are the relational operations the evaluator builds modalities and composition
//! from: renaming moves a function between the base, primed, and temporary variable
//! columns; existential/universal quantification projects a column away; restrict
//! minimizes a relation against a care set (the model's law).

use super::{Bdd, BddManager, FALSE_NODE, NodeId, TRUE_NODE, VarId};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

impl BddManager {
    /// Simultaneous variable substitution, bottom-up
    ///
    /// Each decision node is rebuilt through ITE on the (possibly renamed) variable, so
    /// the result is well-ordered even when a renamed variable sits elsewhere in the
    /// variable order.
    fn rename_node(
        &mut self,
        node: NodeId,
        map: &HashMap<VarId, VarId>,
        memo: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        let Some((var, low, high)) = self.decision(node) else {
            return node;
        };
        if let Some(&cached) = memo.get(&node) {
            return cached;
        }

        let lo = self.rename_node(low, map, memo);
        let hi = self.rename_node(high, map, memo);
        let target = map.get(&var).copied().unwrap_or(var);
        let var_bdd = self.make_node(target, FALSE_NODE, TRUE_NODE);
        let result = self.ite(var_bdd, hi, lo);

        memo.insert(node, result);
        result
    }

    /// Existential quantification over a fixed variable set
    fn exists_node(
        &mut self,
        node: NodeId,
        vars: &HashSet<VarId>,
        memo: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        let Some((var, low, high)) = self.decision(node) else {
            return node;
        };
        if let Some(&cached) = memo.get(&node) {
            return cached;
        }

        let lo = self.exists_node(low, vars, memo);
        let hi = self.exists_node(high, vars, memo);
        let result = if vars.contains(&var) {
            // or(lo, hi): the variable may take either value
            self.ite(lo, TRUE_NODE, hi)
        } else {
            self.make_node(var, lo, hi)
        };

        memo.insert(node, result);
        result
    }

    /// Universal quantification over a fixed variable set
    fn forall_node(
        &mut self,
        node: NodeId,
        vars: &HashSet<VarId>,
        memo: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        let Some((var, low, high)) = self.decision(node) else {
            return node;
        };
        if let Some(&cached) = memo.get(&node) {
            return cached;
        }

        let lo = self.forall_node(low, vars, memo);
        let hi = self.forall_node(high, vars, memo);
        let result = if vars.contains(&var) {
            // and(lo, hi): the function must hold for both values
            self.ite(lo, hi, FALSE_NODE)
        } else {
            self.make_node(var, lo, hi)
        };

        memo.insert(node, result);
        result
    }

    /// Coudert-Madre restrict (sibling substitution)
    ///
    /// Returns a function that agrees with `f` wherever `c` holds; outside the care set
    /// the value is unspecified, which lets whole branches collapse.
    fn restrict_node(
        &mut self,
        f: NodeId,
        c: NodeId,
        memo: &mut HashMap<(NodeId, NodeId), NodeId>,
    ) -> NodeId {
        if c == TRUE_NODE || c == FALSE_NODE || f == TRUE_NODE || f == FALSE_NODE {
            return f;
        }
        if let Some(&cached) = memo.get(&(f, c)) {
            return cached;
        }

        let (f_var, f_low, f_high) = self.decision(f).expect("non-terminal checked above");
        let (c_var, c_low, c_high) = self.decision(c).expect("non-terminal checked above");

        let result = if c_var < f_var {
            // The care set's top variable does not occur in f: project it out of c
            let c_any = self.ite(c_low, TRUE_NODE, c_high);
            self.restrict_node(f, c_any, memo)
        } else {
            let (c_lo, c_hi) = if c_var == f_var { (c_low, c_high) } else { (c, c) };
            if c_lo == FALSE_NODE {
                // Low branch is outside the care set: substitute the sibling
                self.restrict_node(f_high, c_hi, memo)
            } else if c_hi == FALSE_NODE {
                self.restrict_node(f_low, c_lo, memo)
            } else {
                let low = self.restrict_node(f_low, c_lo, memo);
                let high = self.restrict_node(f_high, c_hi, memo);
                self.make_node(f_var, low, high)
            }
        };

        memo.insert((f, c), result);
        result
    }

    /// Resolve a set of variable names to ids, skipping names never declared
    fn resolve_vars(&self, names: &[Arc<str>]) -> HashSet<VarId> {
        names
            .iter()
            .filter_map(|name| self.var_to_id.get(name.as_ref()).copied())
            .collect()
    }
}

impl Bdd {
    /// Simultaneous substitution by name map
    ///
    /// Every occurrence of a key variable is replaced by its value variable; target
    /// names are declared on the fly if needed. Names absent from this BDD's support
    /// are ignored.
    pub fn rename(&self, map: &BTreeMap<Arc<str>, Arc<str>>) -> Bdd {
        if map.is_empty() || self.is_terminal() {
            return self.clone();
        }

        let manager = Arc::clone(&self.manager);
        let result = {
            let mut mgr = manager.write().unwrap();
            let mut id_map = HashMap::new();
            for (from, to) in map {
                if let Some(&from_id) = mgr.var_to_id.get(from.as_ref()) {
                    let to_id = mgr.get_or_create_var(to.as_ref());
                    id_map.insert(from_id, to_id);
                }
            }
            let mut memo = HashMap::new();
            mgr.rename_node(self.root, &id_map, &mut memo)
        };
        Bdd {
            manager,
            root: result,
        }
    }

    /// Existentially quantify the named variables away
    pub fn exists(&self, names: &[Arc<str>]) -> Bdd {
        let manager = Arc::clone(&self.manager);
        let result = {
            let mut mgr = manager.write().unwrap();
            let vars = mgr.resolve_vars(names);
            let mut memo = HashMap::new();
            mgr.exists_node(self.root, &vars, &mut memo)
        };
        Bdd {
            manager,
            root: result,
        }
    }

    /// Universally quantify the named variables away
    pub fn forall(&self, names: &[Arc<str>]) -> Bdd {
        let manager = Arc::clone(&self.manager);
        let result = {
            let mut mgr = manager.write().unwrap();
            let vars = mgr.resolve_vars(names);
            let mut memo = HashMap::new();
            mgr.forall_node(self.root, &vars, &mut memo)
        };
        Bdd {
            manager,
            root: result,
        }
    }

    /// Minimize this function against a care set
    ///
    /// The result agrees with `self` wherever `care` holds and is unspecified elsewhere,
    /// typically shrinking the graph. Used to trim transition relations down to the
    /// model's legal states.
    pub fn restrict(&self, care: &Bdd) -> Bdd {
        debug_assert!(Arc::ptr_eq(&self.manager, &care.manager));
        let manager = Arc::clone(&self.manager);
        let result = {
            let mut mgr = manager.write().unwrap();
            let mut memo = HashMap::new();
            mgr.restrict_node(self.root, care.root, &mut memo)
        };
        Bdd {
            manager,
            root: result,
        }
    }
}
