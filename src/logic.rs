use itertools::Itertools;
use varisat::{Lit, Var};

use crate::backend::{fails, holds, ClauseSink};

/// At least one var is true; A + B + C + ...
pub(crate) fn at_least_one(vars: impl IntoIterator<Item = Var>) -> Vec<Lit> {
    vars.into_iter().map(holds).collect_vec()
}

/// A and B are not both true; !A + !B
#[inline]
pub(crate) fn not_both(a: Var, b: Var) -> Vec<Lit> {
    vec![fails(a), fails(b)]
}

/// No two are true; (!A + !B) * (!A + !C) * ...
pub(crate) fn at_most_one(vars: &[Var]) -> impl Iterator<Item = Vec<Lit>> + '_ {
    vars.iter()
        .tuple_combinations::<(_, _)>()
        .map(|(a, b)| not_both(*a, *b))
}

/// Submit `clause`, emitting it as a trace record first.
pub(crate) fn submit(sink: &mut impl ClauseSink, kind: &str, clause: &[Lit]) {
    log::trace!("{kind}: {}", clause.iter().map(|lit| lit.to_dimacs()).join(" "));
    sink.add_clause(clause);
}
