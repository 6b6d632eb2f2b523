#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::num::NonZero;

    use itertools::Itertools;
    use proptest::prelude::*;
    use varisat::{CnfFormula, Var};

    use crate::backend::{fails, holds, ClauseSink, ModelValue, SatBackend, Satisfiability, VarisatBackend};
    use crate::coloring::{Coloring, ColoringProblem};
    use crate::dimacs::write_dimacs;
    use crate::encoding::VarGrid;
    use crate::enumerate::{Assignment, Enumerator};
    use crate::graph::{Edge, Graph};
    use crate::pigeonhole::Pigeonhole;
    use crate::sudoku::{ParseSudokuError, Sudoku};

    fn nz(n: usize) -> NonZero<usize> {
        NonZero::new(n).unwrap()
    }

    fn triangle() -> Graph {
        Graph::from_edges(3, [(0, 1), (0, 2), (1, 2)])
    }

    fn petersen() -> Graph {
        let outer = (0..5).map(|i| (i, (i + 1) % 5));
        let spokes = (0..5).map(|i| (i, i + 5));
        let inner = (0..5).map(|i| (i + 5, (i + 2) % 5 + 5));
        Graph::from_edges(10, outer.chain(spokes).chain(inner))
    }

    fn colorable(graph: &Graph, colors: usize) -> bool {
        ColoringProblem::new(graph, nz(colors))
            .is_colorable(&mut VarisatBackend::new())
            .unwrap()
    }

    fn all_colorings(graph: &Graph, colors: usize) -> Vec<Coloring> {
        ColoringProblem::new(graph, nz(colors))
            .all_colorings(&mut VarisatBackend::new())
            .unwrap()
    }

    #[test]
    fn graph_canonicalises_edges() {
        let mut graph = Graph::with_nodes(4);
        assert_eq!(graph.add_edge((2, 0)), Edge { low: 0, high: 2 });
        graph.add_edge((0, 2));
        graph.add_edge((3, 1));

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges(), vec![Edge { low: 0, high: 2 }, Edge { low: 1, high: 3 }]);
        assert_eq!(graph.edges_from(0), vec![Edge { low: 0, high: 2 }]);
        assert!(graph.edges_from(2).is_empty());
        assert!(graph.contains_edge(2, 0));
    }

    #[test]
    fn graph_keeps_isolated_nodes() {
        let graph = Graph::with_nodes(5);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.neighbors(4).count(), 0);
    }

    #[test]
    #[should_panic]
    fn graph_rejects_out_of_range_edge() {
        Graph::with_nodes(3).add_edge((1, 3));
    }

    #[test]
    #[should_panic]
    fn graph_rejects_self_loop() {
        Graph::with_nodes(3).add_edge((1, 1));
    }

    #[test]
    fn var_grid_is_a_bijection() {
        let grid = VarGrid::new(4, 3);
        let vars = grid.rows().cartesian_product(grid.cols())
            .map(|(row, col)| grid.var(row, col))
            .collect_vec();

        assert_eq!(vars.iter().map(|var| var.index()).collect_vec(), (0..12).collect_vec());
        for (row, col) in grid.rows().cartesian_product(grid.cols()) {
            assert_eq!(grid.locate(grid.var(row, col)), (row, col));
        }
        assert_eq!(grid.var(2, 1), Var::from_index(2 * 3 + 1));
    }

    #[test]
    #[should_panic]
    fn var_grid_rejects_out_of_range_color() {
        VarGrid::new(4, 3).var(0, 3);
    }

    #[test]
    #[should_panic]
    fn encoding_needs_fresh_session() {
        let graph = triangle();
        let mut formula = CnfFormula::new();
        formula.new_variable();
        ColoringProblem::new(&graph, nz(3)).encode(&mut formula);
    }

    #[test]
    fn polarity_round_trips_through_model_values() {
        let var = Var::from_index(7);
        assert_eq!(ModelValue::of(holds(var)), ModelValue::True);
        assert_eq!(ModelValue::of(fails(var)), ModelValue::False);
        assert_eq!(holds(var), !fails(var));
    }

    #[test]
    fn model_is_forgotten_after_adding_clauses() {
        let mut backend = VarisatBackend::new();
        let var = backend.new_variable();
        assert_eq!(backend.model_value(var), ModelValue::Unknown);

        backend.add_clause(&[holds(var)]);
        assert_eq!(backend.solve().unwrap(), Satisfiability::Satisfiable);
        assert_eq!(backend.model_value(var), ModelValue::True);

        backend.add_clause(&[holds(var)]);
        assert_eq!(backend.model_value(var), ModelValue::Unknown);
    }

    #[test]
    fn triangle_needs_three_colors() {
        assert!(!colorable(&triangle(), 2));
        assert!(colorable(&triangle(), 3));
    }

    #[test]
    fn petersen_graph_is_three_chromatic() {
        assert!(!colorable(&petersen(), 2));

        let graph = petersen();
        let coloring = ColoringProblem::new(&graph, nz(3))
            .solve(&mut VarisatBackend::new())
            .unwrap()
            .unwrap();
        assert!(coloring.is_proper(&graph, 3));
    }

    #[test]
    fn odd_cycles_are_not_bipartite() {
        assert!(!colorable(&Graph::cycle(5), 2));
        assert!(colorable(&Graph::cycle(6), 2));
    }

    #[test]
    fn complete_graph_needs_as_many_colors_as_nodes() {
        assert!(!colorable(&Graph::complete(5), 4));
        assert!(colorable(&Graph::complete(5), 5));
    }

    #[test]
    fn unsatisfiable_solve_gives_none() {
        let graph = triangle();
        let solved = ColoringProblem::new(&graph, nz(2)).solve(&mut VarisatBackend::new()).unwrap();
        assert_eq!(solved, None);
    }

    #[test]
    fn triangle_has_six_colorings() {
        let graph = triangle();
        let first = all_colorings(&graph, 3);
        assert_eq!(first.len(), 6);
        assert!(first.iter().all(|coloring| coloring.is_proper(&graph, 3)));

        let permutations = (0..3).permutations(3).collect::<HashSet<_>>();
        let found = first.iter().map(|coloring| coloring.as_slice().to_vec()).collect::<HashSet<_>>();
        assert_eq!(found, permutations);

        let second = all_colorings(&graph, 3);
        assert_eq!(first.into_iter().collect::<HashSet<_>>(), second.into_iter().collect::<HashSet<_>>());
    }

    #[test]
    fn two_colored_triangle_has_no_colorings() {
        assert!(all_colorings(&triangle(), 2).is_empty());
    }

    #[test]
    fn path_and_isolated_nodes_count_colorings() {
        // a path on 3 nodes with 2 colors alternates, starting from either color
        assert_eq!(all_colorings(&Graph::from_edges(3, [(0, 1), (1, 2)]), 2).len(), 2);
        // unconstrained nodes multiply
        assert_eq!(all_colorings(&Graph::with_nodes(2), 3).len(), 9);
    }

    #[test]
    fn empty_graph_has_exactly_the_empty_coloring() {
        let colorings = all_colorings(&Graph::with_nodes(0), 2);
        assert_eq!(colorings.len(), 1);
        assert_eq!(colorings[0].node_count(), 0);
    }

    #[test]
    fn fixed_nodes_keep_their_color() {
        let graph = triangle();
        let mut problem = ColoringProblem::new(&graph, nz(3));
        problem.fix(0, 2);

        let colorings = problem.all_colorings(&mut VarisatBackend::new()).unwrap();
        assert_eq!(colorings.len(), 2);
        assert!(colorings.iter().all(|coloring| coloring.color_of(0) == 2));
    }

    #[test]
    fn enumerator_never_repeats_an_assignment() {
        let graph = petersen();
        let problem = ColoringProblem::new(&graph, nz(3));
        let mut backend = VarisatBackend::new();
        problem.encode(&mut backend);

        let mut enumerator = Enumerator::new(&mut backend);
        let assignments = enumerator.by_ref().collect::<crate::Result<Vec<_>>>().unwrap();
        assert!(enumerator.is_exhausted());
        assert_eq!(enumerator.found(), assignments.len());
        assert_eq!(enumerator.next().map(|next| next.is_ok()), None);

        // the Petersen graph has 120 proper 3-colorings
        assert_eq!(assignments.len(), 120);
        assert_eq!(assignments.iter().collect::<HashSet<_>>().len(), assignments.len());
    }

    #[test]
    fn blocking_clause_negates_every_variable() {
        let mut backend = VarisatBackend::new();
        let a = backend.new_variable();
        let b = backend.new_variable();
        backend.add_clause(&[holds(a)]);
        backend.add_clause(&[fails(b)]);
        backend.solve().unwrap();

        let assignment = Assignment::snapshot(&backend).unwrap();
        assert!(assignment.value(a));
        assert!(!assignment.value(b));
        assert_eq!(assignment.blocking_clause(), vec![fails(a), holds(b)]);
    }

    #[test]
    fn coloring_encoding_is_deterministic() {
        let graph = petersen();
        let problem = ColoringProblem::new(&graph, nz(3));

        let mut first = CnfFormula::new();
        let mut second = CnfFormula::new();
        problem.encode(&mut first);
        problem.encode(&mut second);

        assert_eq!(first, second);
        assert_eq!(first.var_count(), 30);
        // 10 nodes * (1 + 3 pairs) + 15 edges * 3 colors
        assert_eq!(first.len(), 85);
        assert_eq!(first.len(), problem.clause_count());
    }

    #[test]
    fn pigeonhole_with_too_many_pigeons_is_unsatisfiable() {
        for (pigeons, holes) in [(2, 1), (3, 2), (5, 4), (6, 3)] {
            let solved = Pigeonhole::new(nz(pigeons), nz(holes))
                .is_satisfiable(&mut VarisatBackend::new())
                .unwrap();
            assert!(!solved, "{pigeons} pigeons should not fit in {holes} holes");
        }
    }

    #[test]
    fn pigeonhole_placements_use_distinct_holes() {
        for (pigeons, holes) in [(1, 1), (3, 3), (4, 6), (7, 7)] {
            let placement = Pigeonhole::new(nz(pigeons), nz(holes))
                .solve(&mut VarisatBackend::new())
                .unwrap()
                .unwrap();

            let assignment = placement.assignment();
            assert_eq!(assignment.len(), pigeons);
            assert!(assignment.iter().all(|hole| *hole < holes));
            assert_eq!(assignment.iter().unique().count(), pigeons);
        }
    }

    #[test]
    fn pigeonhole_clause_count() {
        let problem = Pigeonhole::new(nz(4), nz(3));
        let mut formula = CnfFormula::new();
        problem.encode(&mut formula);

        assert_eq!(formula.var_count(), 12);
        // 4 placement clauses + 3 holes * 6 pigeon pairs
        assert_eq!(formula.len(), 22);
        assert_eq!(formula.len(), problem.clause_count());
    }

    /// RELAXATION: nothing stops a pigeon from occupying several holes at once.
    /// Infeasibility answers are unaffected, but models may list extra holes; tightening this is a deliberate design change.
    #[test]
    fn pigeonhole_allows_a_pigeon_in_several_holes() {
        let problem = Pigeonhole::new(nz(1), nz(2));
        let mut backend = VarisatBackend::new();
        problem.encode(&mut backend);

        let placements = Enumerator::new(&mut backend)
            .map(|assignment| problem.decode(&assignment.unwrap()).unwrap())
            .map(|placement| placement.holes_of(0).to_vec())
            .collect::<HashSet<_>>();

        assert_eq!(placements, HashSet::from([vec![0], vec![1], vec![0, 1]]));
    }

    #[test]
    fn placement_display_lists_pigeons() {
        let placement = Pigeonhole::new(nz(1), nz(1))
            .solve(&mut VarisatBackend::new())
            .unwrap()
            .unwrap();
        assert_eq!(format!("{}", placement), "Pigeon 0 in hole 0\n");
    }

    #[test]
    fn dimacs_export() {
        let graph = triangle();
        let mut formula = CnfFormula::new();
        ColoringProblem::new(&graph, nz(2)).encode(&mut formula);

        let mut out = Vec::new();
        write_dimacs(&formula, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect_vec();

        assert_eq!(lines[0], "p cnf 6 12");
        assert_eq!(lines[1], "1 2 0");
        assert_eq!(lines[2], "-1 -2 0");
        assert_eq!(lines.len(), 13);
        assert!(lines[1..].iter().all(|line| line.ends_with(" 0")));
    }

    #[test]
    fn dimacs_export_to_file() {
        let problem = Pigeonhole::new(nz(3), nz(2));
        let mut formula = CnfFormula::new();
        problem.encode(&mut formula);

        let file = tempfile::NamedTempFile::new().unwrap();
        write_dimacs(&formula, file.as_file()).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.starts_with("p cnf 6 9\n"));
        assert_eq!(text.lines().count(), 10);
    }

    const PUZZLE: &str = "
        53..7....
        6..195...
        .98....6.
        8...6...3
        4..8.3..1
        7...2...6
        .6....28.
        ...419..5
        ....8..79";

    const SOLUTION: &str = "534678912
672195348
198342567
859761423
426853791
713924856
961537284
287419635
345286179
";

    #[test]
    fn sudoku_round_trips_text() {
        let sudoku = PUZZLE.parse::<Sudoku>().unwrap();
        assert_eq!(sudoku.get(0, 0), 5);
        assert_eq!(sudoku.get(0, 2), 0);
        assert!(!sudoku.is_complete());
        assert_eq!(format!("{}", sudoku).lines().next(), Some("53..7...."));
    }

    #[test]
    fn sudoku_rejects_bad_text() {
        assert_eq!("123".parse::<Sudoku>(), Err(ParseSudokuError::WrongCellCount(3)));
        assert_eq!("x".repeat(81).parse::<Sudoku>(), Err(ParseSudokuError::InvalidCell('x')));
        assert_eq!(ParseSudokuError::WrongCellCount(3).to_string(), "expected 81 cells, found 3");
    }

    #[test]
    fn sudoku_constraint_graph_has_twenty_peers_per_cell() {
        let graph = Sudoku::constraint_graph();
        assert_eq!(graph.node_count(), 81);
        assert_eq!(graph.edge_count(), 81 * 20 / 2);
        assert!(graph.nodes().all(|node| graph.neighbors(node).count() == 20));
    }

    #[test]
    fn sudoku_solves() {
        let puzzle = PUZZLE.parse::<Sudoku>().unwrap();
        let solved = puzzle.solve(&mut VarisatBackend::new()).unwrap().unwrap();

        assert!(solved.is_complete());
        assert_eq!(format!("{}", solved), SOLUTION);
    }

    #[test]
    fn sudoku_decodes_a_separately_solved_session() {
        let puzzle = PUZZLE.parse::<Sudoku>().unwrap();
        let mut backend = VarisatBackend::new();
        puzzle.encode(&mut backend);
        assert_eq!(backend.var_count(), 81 * 9);

        assert_eq!(backend.solve().unwrap(), Satisfiability::Satisfiable);
        let solved = puzzle.decode(&Assignment::snapshot(&backend).unwrap()).unwrap();
        assert_eq!(format!("{}", solved), SOLUTION);
    }

    #[test]
    fn sudoku_with_clashing_givens_has_no_solution() {
        let mut text = ".".repeat(81);
        text.replace_range(0..2, "55");
        let puzzle = text.parse::<Sudoku>().unwrap();
        assert_eq!(puzzle.solve(&mut VarisatBackend::new()).unwrap(), None);
    }

    fn small_graph() -> impl Strategy<Value = Graph> {
        (1usize..6).prop_flat_map(|nodes| {
            prop::collection::vec((0..nodes, 0..nodes), 0..12)
                .prop_map(move |pairs| Graph::from_edges(nodes, pairs.into_iter().filter(|(a, b)| a != b)))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn one_color_per_node_always_suffices(graph in small_graph(), extra in 0usize..3) {
            prop_assert!(colorable(&graph, graph.node_count() + extra));
        }

        #[test]
        fn every_enumerated_coloring_is_proper(graph in small_graph()) {
            prop_assume!(graph.node_count() <= 4);
            let colorings = all_colorings(&graph, 3);
            prop_assert!(colorings.iter().all(|coloring| coloring.is_proper(&graph, 3)));
            prop_assert_eq!(colorings.iter().unique().count(), colorings.len());
            prop_assert_eq!(colorable(&graph, 3), !colorings.is_empty());
        }

        #[test]
        fn encoding_twice_gives_identical_clauses(graph in small_graph(), colors in 1usize..5) {
            let problem = ColoringProblem::new(&graph, nz(colors));
            let mut first = CnfFormula::new();
            let mut second = CnfFormula::new();
            problem.encode(&mut first);
            problem.encode(&mut second);

            prop_assert_eq!(first.var_count(), graph.node_count() * colors);
            prop_assert_eq!(first.len(), problem.clause_count());
            prop_assert_eq!(first, second);
        }
    }
}
