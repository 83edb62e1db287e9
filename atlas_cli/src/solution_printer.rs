use atlas_optimizer::json::{
    solution::{JsonProblemWithSolution, JsonSolutionActivity, JsonSolutionRoute},
    types::JsonVehicleRoutingProblem,
};
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Print {
    Concise,
    Verbose,
}

fn format_number(value: f64) -> String {
    format!("{value:.2}")
}

fn format_load(load: &[f64]) -> String {
    load.iter()
        .map(|value| format_number(*value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn problem_table(problem: &JsonVehicleRoutingProblem) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["problem", "value"]);

    table.add_row(vec![
        Cell::new("jobs"),
        Cell::new(problem.services.len() + problem.shipments.len()),
    ]);
    table.add_row(vec![Cell::new("services"), Cell::new(problem.services.len())]);
    table.add_row(vec![
        Cell::new("shipments"),
        Cell::new(problem.shipments.len()),
    ]);
    table.add_row(vec![Cell::new("vehicles"), Cell::new(problem.vehicles.len())]);
    table.add_row(vec![
        Cell::new("fleet size"),
        Cell::new(format!("{:?}", problem.fleet_size.unwrap_or_default())),
    ]);

    table
}

fn solution_table(document: &JsonProblemWithSolution) -> Table {
    let solution = &document.solution;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["solution", "value"]);

    table.add_row(vec![
        Cell::new("costs"),
        Cell::new(format_number(solution.total_cost)),
    ]);
    table.add_row(vec![
        Cell::new("transport costs"),
        Cell::new(format_number(solution.transport_cost)),
    ]);
    table.add_row(vec![
        Cell::new("fixed costs"),
        Cell::new(format_number(solution.fixed_cost)),
    ]);
    table.add_row(vec![
        Cell::new("distance"),
        Cell::new(format_number(solution.distance)),
    ]);
    table.add_row(vec![
        Cell::new("vehicles"),
        Cell::new(solution.vehicles_used),
    ]);
    table.add_row(vec![
        Cell::new("unassigned jobs"),
        Cell::new(solution.unassigned_jobs.len()),
    ]);

    table
}

fn route_rows(route_number: usize, route: &JsonSolutionRoute, table: &mut Table) {
    let start_time = route.activities.first().map(|activity| match activity {
        JsonSolutionActivity::Start(start) => start.time,
        JsonSolutionActivity::Service(activity)
        | JsonSolutionActivity::Pickup(activity)
        | JsonSolutionActivity::Delivery(activity) => activity.arrival_time,
        JsonSolutionActivity::End(end) => end.time,
    });
    let elapsed = |time: jiff::Timestamp| {
        start_time.map_or(0.0, |start_time| time.duration_since(start_time).as_secs_f64())
    };

    for activity in &route.activities {
        let (name, job_id, arrival, departure, load) = match activity {
            JsonSolutionActivity::Start(start) => {
                ("start", "-", None, Some(start.time), start.load.iter().collect::<Vec<_>>())
            }
            JsonSolutionActivity::Service(activity) => (
                "service",
                activity.job_id.as_str(),
                Some(activity.arrival_time),
                Some(activity.departure_time),
                activity.load.iter().collect(),
            ),
            JsonSolutionActivity::Pickup(activity) => (
                "pickup",
                activity.job_id.as_str(),
                Some(activity.arrival_time),
                Some(activity.departure_time),
                activity.load.iter().collect(),
            ),
            JsonSolutionActivity::Delivery(activity) => (
                "delivery",
                activity.job_id.as_str(),
                Some(activity.arrival_time),
                Some(activity.departure_time),
                activity.load.iter().collect(),
            ),
            JsonSolutionActivity::End(end) => {
                ("end", "-", Some(end.time), None, end.load.iter().collect())
            }
        };

        table.add_row(vec![
            Cell::new(route_number),
            Cell::new(&route.vehicle_id),
            Cell::new(name),
            Cell::new(job_id),
            Cell::new(arrival.map_or(String::from("undef"), |time| format_number(elapsed(time))))
                .set_alignment(CellAlignment::Right),
            Cell::new(departure.map_or(String::from("undef"), |time| format_number(elapsed(time))))
                .set_alignment(CellAlignment::Right),
            Cell::new(format_load(&load)),
        ]);
    }

    table.add_row(vec![
        Cell::new(route_number),
        Cell::new(&route.vehicle_id),
        Cell::new("total"),
        Cell::new("-"),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!(
            "cost {} / distance {}",
            format_number(route.total_cost),
            format_number(route.distance)
        )),
    ]);
}

fn routes_table(document: &JsonProblemWithSolution) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "route", "vehicle", "activity", "job", "arrTime", "endTime", "load",
    ]);

    for (index, route) in document.solution.routes.iter().enumerate() {
        route_rows(index + 1, route, &mut table);
    }

    table
}

fn unassigned_table(document: &JsonProblemWithSolution) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["unassigned jobs"]);

    for job_id in &document.solution.unassigned_jobs {
        table.add_row(vec![job_id]);
    }

    table
}

/// Tables describing the problem and its solution, routes and unassigned
/// jobs included when verbose.
pub fn solution_report(document: &JsonProblemWithSolution, print: Print) -> Vec<Table> {
    let mut tables = vec![problem_table(&document.problem), solution_table(document)];

    if print == Print::Verbose {
        tables.push(routes_table(document));

        if !document.solution.unassigned_jobs.is_empty() {
            tables.push(unassigned_table(document));
        }
    }

    tables
}

pub fn print_solution(document: &JsonProblemWithSolution, print: Print) {
    for table in solution_report(document, print) {
        println!("{table}");
    }
}
