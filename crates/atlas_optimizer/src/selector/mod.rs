pub mod solution_comparator;
