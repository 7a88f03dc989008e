mod outcomes_tests;
mod search_tree_tests;
