use fleet_core::{AllocationPolicy, FleetConfig, NodeId};
use fleetgrid_health::HealthEvaluator;
use fleetgrid_scheduler::{DispatchReport, Dispatcher};
use serde::Serialize;

use super::{build_registry, load_config};

/// Everything one `fleet run` observed.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub policy: AllocationPolicy,
    pub unhealthy_nodes: Vec<NodeId>,
    pub dispatch: DispatchReport,
}

pub fn run(
    config_path: Option<&str>,
    policy: Option<AllocationPolicy>,
    format: &str,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let summary = execute(&config, policy)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => print_text(&summary),
    }
    Ok(())
}

/// One health-check pass followed by one dispatch batch.
pub fn execute(
    config: &FleetConfig,
    policy: Option<AllocationPolicy>,
) -> anyhow::Result<RunSummary> {
    let registry = build_registry(config)?;
    let evaluator = HealthEvaluator::from_config(registry.clone(), &config.health);
    evaluator.run_health_check_pass();

    let dispatcher = Dispatcher::new(registry, policy.unwrap_or(config.dispatch.policy));
    let dispatch = dispatcher.distribute_tasks(&config.tasks);

    Ok(RunSummary {
        policy: dispatcher.policy(),
        unhealthy_nodes: evaluator.unhealthy_nodes(),
        dispatch,
    })
}

fn print_text(summary: &RunSummary) {
    println!("Unhealthy nodes: {:?}", summary.unhealthy_nodes);

    if let Some(condition) = summary.dispatch.condition() {
        eprintln!("{condition}");
        return;
    }

    println!("Policy: {}", summary.policy);
    for a in &summary.dispatch.assignments {
        println!(
            "✓ Task {} assigned to node {} ({} remaining)",
            a.task_id, a.node_id, a.remaining_capacity
        );
    }
    for u in &summary.dispatch.unallocated {
        eprintln!("✗ Task {} could not be allocated: {}", u.task_id, u.reason);
    }
}
