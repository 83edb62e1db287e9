pub mod accept_solution;
pub mod schrimpf_acceptor;
pub mod solution_acceptor;
pub mod threshold_acceptor;
