use std::env;
use std::sync::Arc;

use the_projector::config::ProjectorBuilder;
use the_projector::engine::Projection;
use the_projector::errors::ProjectionResult;
use the_projector::traits::Mixin;
use the_projector::types::Value;

/// Orders events by start time
struct StartTimeOrder;

impl Mixin for StartTimeOrder {
    fn capabilities(&self) -> Vec<String> {
        vec!["Comparable".to_string()]
    }

    fn invoke(&self, receiver: &Projection, _method: &str, args: &[Value]) -> ProjectionResult<Value> {
        let other = args.first().and_then(Value::as_projection);
        let ours = receiver.get("getStartTime")?.as_i64().unwrap_or_default();
        let theirs = match other {
            Some(other) => other.get("getStartTime")?.as_i64().unwrap_or_default(),
            None => return Ok(Value::Int(1)),
        };
        Ok(Value::Int(ours.cmp(&theirs) as i32))
    }
}

/// Demo: project a receiver EPG event document onto the `Event` interface
/// Usage: cargo run --example projection_demo [config_file] [document_file]
fn run_projection_demo(config_file: &str, document_file: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Event Projection Demo ===\n");

    println!("Loading interfaces from {}...", config_file);
    let projector = ProjectorBuilder::from_config_file(config_file)?.build_validated()?;
    println!("Projector ready: {:?}", projector);

    println!("\nReading {}...", document_file);
    let event = projector.io().file(document_file).read("Event")?;

    for method in [
        "getId",
        "getTitle",
        "getDescription",
        "getStartTime",
        "getDurationInMinutes",
        "getCurrentTime",
        "getServiceName",
        "getServiceReference",
    ] {
        println!("- {:<22} {}", method, event.get(method)?);
    }

    println!("\n=== Mixins ===");
    projector
        .mixins()
        .add_projection_mixin("Event", Arc::new(StartTimeOrder))?;
    let copy = projector.parse(&event.as_string(), "Event")?;
    println!("Copy equals original: {}", copy == event);
    println!(
        "compareTo(copy): {}",
        event.invoke("compareTo", &[Value::Projection(copy.clone())])?
    );

    println!("\n=== Writing ===");
    let returned = copy.invoke("setTitle", &[Value::from("Tagesthemen")])?;
    println!("setTitle returned: {}", returned);
    println!("Title now: {}", copy.get("getTitle")?);
    println!("Copy equals original: {}", copy == event);

    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let config_file = args.get(1).map(String::as_str).unwrap_or("configs/event.yaml");
    let document_file = args.get(2).map(String::as_str).unwrap_or("demos/event.xml");

    if let Err(e) = run_projection_demo(config_file, document_file) {
        eprintln!("Error running projection demo: {}", e);
        std::process::exit(1);
    }
}
