//! Boolean operations and operator overloading for BDD handles
//!
//! All connectives are derived from the manager's memoized ITE operation.

use super::{Bdd, FALSE_NODE, TRUE_NODE};
use std::ops::{BitAnd, BitOr, BitXor, Not};
use std::sync::Arc;

impl Bdd {
    /// Logical NOT
    ///
    /// `not(f) = ite(f, false, true)`
    pub fn not(&self) -> Bdd {
        let manager = Arc::clone(&self.manager);
        let result = manager
            .write()
            .unwrap()
            .ite(self.root, FALSE_NODE, TRUE_NODE);
        Bdd {
            manager,
            root: result,
        }
    }

    /// Logical AND
    ///
    /// `and(f, g) = ite(f, g, false)`
    pub fn and(&self, other: &Bdd) -> Bdd {
        debug_assert!(Arc::ptr_eq(&self.manager, &other.manager));
        let manager = Arc::clone(&self.manager);
        let result = manager
            .write()
            .unwrap()
            .ite(self.root, other.root, FALSE_NODE);
        Bdd {
            manager,
            root: result,
        }
    }

    /// Logical OR
    ///
    /// `or(f, g) = ite(f, true, g)`
    pub fn or(&self, other: &Bdd) -> Bdd {
        debug_assert!(Arc::ptr_eq(&self.manager, &other.manager));
        let manager = Arc::clone(&self.manager);
        let result = manager
            .write()
            .unwrap()
            .ite(self.root, TRUE_NODE, other.root);
        Bdd {
            manager,
            root: result,
        }
    }

    /// Logical implication
    ///
    /// `implies(f, g) = ite(f, g, true)`
    pub fn implies(&self, other: &Bdd) -> Bdd {
        debug_assert!(Arc::ptr_eq(&self.manager, &other.manager));
        let manager = Arc::clone(&self.manager);
        let result = manager
            .write()
            .unwrap()
            .ite(self.root, other.root, TRUE_NODE);
        Bdd {
            manager,
            root: result,
        }
    }

    /// Exclusive OR
    ///
    /// `xor(f, g) = ite(f, !g, g)`
    pub fn xor(&self, other: &Bdd) -> Bdd {
        debug_assert!(Arc::ptr_eq(&self.manager, &other.manager));
        let manager = Arc::clone(&self.manager);
        let result = {
            let mut mgr = manager.write().unwrap();
            let not_g = mgr.ite(other.root, FALSE_NODE, TRUE_NODE);
            mgr.ite(self.root, not_g, other.root)
        };
        Bdd {
            manager,
            root: result,
        }
    }

    /// Biconditional, `iff(f, g) = !(f ^ g)`
    pub fn iff(&self, other: &Bdd) -> Bdd {
        self.xor(other).not()
    }
}

/// Logical AND operator for references: `&a & &b`
impl BitAnd for &Bdd {
    type Output = Bdd;

    fn bitand(self, rhs: &Bdd) -> Bdd {
        self.and(rhs)
    }
}

/// Logical AND operator: `a & b` (delegates to reference version)
impl BitAnd for Bdd {
    type Output = Bdd;

    fn bitand(self, rhs: Bdd) -> Bdd {
        self.and(&rhs)
    }
}

/// Logical OR operator for references: `&a | &b`
impl BitOr for &Bdd {
    type Output = Bdd;

    fn bitor(self, rhs: &Bdd) -> Bdd {
        self.or(rhs)
    }
}

/// Logical OR operator: `a | b` (delegates to reference version)
impl BitOr for Bdd {
    type Output = Bdd;

    fn bitor(self, rhs: Bdd) -> Bdd {
        self.or(&rhs)
    }
}

/// Exclusive OR operator for references: `&a ^ &b`
impl BitXor for &Bdd {
    type Output = Bdd;

    fn bitxor(self, rhs: &Bdd) -> Bdd {
        self.xor(rhs)
    }
}

/// Exclusive OR operator: `a ^ b` (delegates to reference version)
impl BitXor for Bdd {
    type Output = Bdd;

    fn bitxor(self, rhs: Bdd) -> Bdd {
        self.xor(&rhs)
    }
}

/// Logical NOT operator for references: `!&a`
impl Not for &Bdd {
    type Output = Bdd;

    fn not(self) -> Bdd {
        Bdd::not(self)
    }
}

/// Logical NOT operator: `!a` (delegates to reference version)
impl Not for Bdd {
    type Output = Bdd;

    fn not(self) -> Bdd {
        Bdd::not(&self)
    }
}
