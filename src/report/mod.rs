use std::error::Error;
use std::fs;
use std::path::Path;

use colored::Colorize;
use csv::Writer;
use tracing::info;

use crate::domain::solution::Solution;

const MAX_LISTED_POINTS: usize = 15;

/// Print a human-readable summary of a solution: status, cost breakdown
/// and a per-facility coverage report.
pub fn print_solution(solution: &Solution) {
    println!("\n{}", "=".repeat(80));
    println!("CFLP SOLUTION - {}", solution.solver_name.to_uppercase());
    println!("{}", "=".repeat(80));

    let status = if solution.is_feasible() {
        solution.status.green()
    } else {
        solution.status.red()
    };
    println!("Solution status: {}", status);
    println!("Objective value: {:.2}", solution.objective_value);
    println!("Processing time: {:.3} seconds", solution.processing_time);
    match solution.gap {
        Some(gap) => println!("Optimality gap: {:.4}%", gap),
        None => println!("Optimality gap: N/A (heuristic)"),
    }
    println!("Total fixed cost: {:.2}", solution.total_fixed_cost);
    println!("Total variable cost: {:.2}", solution.total_variable_cost);
    if !solution.is_feasible() {
        println!(
            "{}",
            format!("Unserved demand: {:.2}", solution.unserved_demand).red()
        );
    }

    if solution.facilities_opened.is_empty() {
        println!("\nFacilities opened: 0 (infeasible or no sites)");
        println!("{}", "-".repeat(80));
        println!("\n{}", "=".repeat(80));
        return;
    }

    println!("\nFacilities opened: {}", solution.facilities_opened.len());
    println!("{}", "-".repeat(80));

    for facility in &solution.facilities_opened {
        // Pull this facility's slices back out of the per-demand map.
        let mut covered = 0.0;
        let mut variable_cost = 0.0;
        let mut served: Vec<String> = Vec::new();
        for (demand_id, records) in &solution.assignments {
            for record in records {
                if record.facility == facility.location {
                    covered += record.assigned_demand;
                    variable_cost += record.variable_cost;
                    served.push(format!("{}({:.1})", demand_id, record.assigned_demand));
                }
            }
        }

        println!(
            "\n  - Location: {} | Tier: {} | Coordinates: ({}, {}) | Fixed cost: {:.2}",
            facility.location,
            facility.tier,
            facility.coordinates.0,
            facility.coordinates.1,
            facility.fixed_cost
        );
        println!("    Demand covered: {:.2}", covered);
        println!("    Variable cost: {:.2}", variable_cost);
        println!("    Demand points served: {}", served.len());

        if !served.is_empty() {
            let extra = served.len().saturating_sub(MAX_LISTED_POINTS);
            let mut listed = served;
            listed.truncate(MAX_LISTED_POINTS);
            let mut points_str = listed.join(", ");
            if extra > 0 {
                points_str.push_str(&format!(", ... (+{} more)", extra));
            }
            println!("    Demand points: {}", points_str);
        }
    }

    println!("\n{}", "=".repeat(80));
}

/// Compare labelled solutions (e.g. this heuristic against exact-solver
/// output sharing the same schema).
pub fn print_comparison(solutions: &[(&str, &Solution)]) {
    println!("\n{}", "=".repeat(80));
    println!("SOLVER COMPARISON");
    println!("{}", "=".repeat(80));

    if solutions.is_empty() {
        println!("No solutions to compare.");
        println!("{}", "=".repeat(80));
        return;
    }

    println!(
        "{:<15} {:<15} {:<15} {:<12} {:<12}",
        "Solver", "Status", "Objective", "Time(s)", "Gap(%)"
    );
    println!("{}", "-".repeat(80));
    for (name, solution) in solutions {
        let gap_str = solution
            .gap
            .map(|g| format!("{:.4}", g))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "{:<15} {:<15} {:<15.2} {:<12.3} {:<12}",
            name, solution.status, solution.objective_value, solution.processing_time, gap_str
        );
    }
    println!("{}", "-".repeat(80));

    if let Some((best_name, best)) = best_solution(solutions) {
        println!(
            "Best solution: {} (objective = {:.2})",
            best_name, best.objective_value
        );
        for (name, solution) in solutions {
            if *name == best_name {
                continue;
            }
            let diff = solution.objective_value - best.objective_value;
            let pct = if best.objective_value != 0.0 {
                diff / best.objective_value * 100.0
            } else {
                0.0
            };
            println!(
                "  {}: {:.2} (difference: {:+.2}, {:+.2}%)",
                name, solution.objective_value, diff, pct
            );
        }
    }

    println!("{}", "=".repeat(80));
}

/// Feasible solution with the lowest objective, if any.
pub fn best_solution<'a>(solutions: &'a [(&'a str, &'a Solution)]) -> Option<(&'a str, &'a Solution)> {
    solutions
        .iter()
        .filter(|(_, s)| s.is_feasible())
        .min_by(|(_, a), (_, b)| a.objective_value.total_cmp(&b.objective_value))
        .copied()
}

/// Export the full solution schema for downstream tooling (plotting).
pub fn save_solution_json(solution: &Solution, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(solution)?;
    fs::write(path, json)?;
    info!("Saved solution to {}", path.display());
    Ok(())
}

/// Export one row per assignment record.
pub fn save_assignments_csv(solution: &Solution, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record([
        "demand_id",
        "facility_id",
        "assigned_demand",
        "fraction",
        "variable_cost",
    ])?;

    for (demand_id, records) in &solution.assignments {
        for record in records {
            wtr.write_record([
                demand_id.clone(),
                record.facility.clone(),
                record.assigned_demand.to_string(),
                record.fraction.to_string(),
                record.variable_cost.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    info!("Saved assignments to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::solution::{AssignmentRecord, OpenedFacilitySummary};

    fn sample_solution(status: &str, objective: f64, unserved: f64) -> Solution {
        let mut assignments = BTreeMap::new();
        assignments.insert(
            "1".to_string(),
            vec![AssignmentRecord {
                facility: "A".to_string(),
                fraction: 1.0,
                assigned_demand: 100.0,
                variable_cost: 250.0,
            }],
        );
        Solution {
            status: status.to_string(),
            solver_name: "heuristic".to_string(),
            facilities_opened: vec![OpenedFacilitySummary {
                location: "A".to_string(),
                tier: "small".to_string(),
                coordinates: (1.0, 2.0),
                fixed_cost: 90_000.0,
            }],
            assignments,
            total_fixed_cost: 90_000.0,
            total_variable_cost: 250.0,
            objective_value: objective,
            unserved_demand: unserved,
            processing_time: 0.01,
            gap: None,
        }
    }

    #[test]
    fn best_solution_ignores_infeasible_entries() {
        let cheap_but_infeasible = sample_solution("infeasible", 100.0, 50.0);
        let feasible = sample_solution("heuristic", 90_250.0, 0.0);
        let solutions = vec![
            ("broken", &cheap_but_infeasible),
            ("heuristic", &feasible),
        ];

        let (name, best) = best_solution(&solutions).unwrap();
        assert_eq!(name, "heuristic");
        assert_eq!(best.objective_value, 90_250.0);
    }

    #[test]
    fn best_solution_of_nothing_is_none() {
        assert!(best_solution(&[]).is_none());
    }

    #[test]
    fn csv_export_writes_one_row_per_record() {
        let solution = sample_solution("heuristic", 90_250.0, 0.0);
        let path = std::env::temp_dir().join("cflp_report_test_assignments.csv");

        save_assignments_csv(&solution, &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "demand_id,facility_id,assigned_demand,fraction,variable_cost"
        );
        assert_eq!(lines.next().unwrap(), "1,A,100,1,250");
        assert!(lines.next().is_none());
    }

    #[test]
    fn json_export_round_trips_the_schema() {
        let solution = sample_solution("heuristic", 90_250.0, 0.0);
        let path = std::env::temp_dir().join("cflp_report_test_solution.json");

        save_solution_json(&solution, &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["status"], "heuristic");
        assert_eq!(parsed["facilities_opened"][0]["location"], "A");
        assert_eq!(parsed["assignments"]["1"][0]["assigned_demand"], 100.0);
    }
}
