use schemars::schema_for;

use crate::json::{solution, types};

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(types::JsonVehicleRoutingProblem))
}

pub fn generate_solution_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(solution::JsonProblemWithSolution))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_schema_lists_jobs() {
        let schema = generate_json_schema().unwrap();

        assert!(schema.contains("\"services\""));
        assert!(schema.contains("\"shipments\""));
        assert!(schema.contains("\"vehicle_types\""));
    }
}
