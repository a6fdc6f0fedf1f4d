use criterion::{Criterion, criterion_group, criterion_main};
use dlx_solver::dlx::column_selection::{ColumnSelection, FirstActive, MinCount, Random};
use dlx_solver::sudoku::grid::Grid;
use dlx_solver::sudoku::solver::SudokuSolver;
use std::hint::black_box;

const CLASSIC: &str = "\
53..7....
6..195...
.98....6.
8...6...3
4..8.3..1
7...2...6
.6....28.
...419..5
....8..79
";

// Inkala's 2012 puzzle, a stress test for backtracking solvers.
const HARD: &str = "\
8........
..36.....
.7..9.2..
.5...7...
....457..
...1...3.
..1....68
..85...1.
.9....4..
";

fn solve_with<S: ColumnSelection>(text: &str, selector: S) -> Grid {
    let grid: Grid = text.parse().expect("benchmark grid parses");
    let mut solver = SudokuSolver::with_selector(&grid, selector).expect("benchmark grid preloads");
    solver.solve().expect("benchmark grid solves")
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");

    group.bench_function("empty_grid", |b| {
        b.iter(|| {
            let mut solver = SudokuSolver::new(black_box(&Grid::empty())).unwrap();
            solver.solve().unwrap()
        });
    });

    group.bench_function("classic", |b| {
        b.iter(|| solve_with(black_box(CLASSIC), MinCount));
    });

    group.bench_function("hard", |b| {
        b.iter(|| solve_with(black_box(HARD), MinCount));
    });

    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");

    group.bench_function("min_count", |b| {
        b.iter(|| solve_with(black_box(CLASSIC), MinCount));
    });

    group.bench_function("first_active", |b| {
        b.iter(|| solve_with(black_box(CLASSIC), FirstActive));
    });

    group.bench_function("random", |b| {
        b.iter(|| solve_with(black_box(CLASSIC), Random::with_seed(0xD1CE)));
    });

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let grid: Grid = CLASSIC.parse().unwrap();

    c.bench_function("build_and_preload", |b| {
        b.iter(|| SudokuSolver::new(black_box(&grid)).unwrap());
    });
}

criterion_group!(benches, bench_solve, bench_selection, bench_build);
criterion_main!(benches);
