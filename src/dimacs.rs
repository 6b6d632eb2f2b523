use std::io::Write;

use itertools::Itertools;
use varisat::CnfFormula;

/// Write `formula` in DIMACS CNF: a `p cnf <variables> <clauses>` header, then each clause as 1-based signed literals ending in `0`.
///
/// Encode a problem into a [`CnfFormula`] (it implements [`ClauseSink`](crate::backend::ClauseSink)) to export it; solving is a separate step.
pub fn write_dimacs(formula: &CnfFormula, mut target: impl Write) -> std::io::Result<()> {
    writeln!(target, "p cnf {} {}", formula.var_count(), formula.len())?;
    for clause in formula.iter() {
        writeln!(target, "{} 0", clause.iter().map(|lit| lit.to_dimacs()).join(" "))?;
    }
    target.flush()
}
