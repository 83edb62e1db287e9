pub mod capacity;
pub mod distance_method;
pub mod fleet;
pub mod job;
pub mod job_location_index;
pub mod location;
pub mod service;
pub mod shipment;
pub mod time_window;
pub mod travel_cost_matrix;
pub mod vehicle;
pub mod vehicle_routing_problem;
pub mod vehicle_type;
