use fleetgrid_health::HealthEvaluator;

use super::{build_registry, load_config};

pub fn health(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = build_registry(&config)?;

    let evaluator = HealthEvaluator::from_config(registry.clone(), &config.health);
    evaluator.run_health_check_pass();

    for node in registry.nodes() {
        match evaluator.status(&node.id) {
            Some(status) => println!(
                "Node {}: {:?} (capacity {}, heartbeat age {})",
                node.id, status, node.available_capacity, node.heartbeat_age
            ),
            None => eprintln!("Node {}: not evaluated", node.id),
        }
    }
    println!("Unhealthy nodes: {:?}", evaluator.unhealthy_nodes());
    Ok(())
}
