//! Key classification.
//!
//! Every key is classified before it is read or written. The exact key is
//! looked up in the mutator table first, so a mutator literally named
//! `"a.b.c"` shadows the nested path `a` → `b` → `c`.

use std::sync::Arc;

use crate::mutator::{Mutator, MutatorTable};
use crate::path::AttrPath;

/// Which side of the access pipeline is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Read,
    Write,
}

/// How a key is accessed.
#[derive(Debug)]
pub(crate) enum Access {
    /// A mutator intercepts this role for the exact key.
    Mutator(Arc<Mutator>),
    /// The key addresses a value inside a container attribute.
    Nested(AttrPath),
    /// Direct store access.
    Plain,
}

pub(crate) fn classify(mutators: &MutatorTable, key: &str, role: Role, separator: char) -> Access {
    if let Some(mutator) = mutators.get(key) {
        let intercepts = match role {
            Role::Read => mutator.has_getter(),
            Role::Write => mutator.has_setter(),
        };
        if intercepts {
            return Access::Mutator(Arc::clone(mutator));
        }
    }

    match AttrPath::parse(key, separator) {
        Some(path) => Access::Nested(path),
        None => Access::Plain,
    }
}
