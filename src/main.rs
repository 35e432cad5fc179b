// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use the_projector::config::ProjectorBuilder;
use the_projector::types::{TypeConverter, Value};

const WRITE_BACK_FLAG: &str = "--write-back";

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} <config.yaml> <document.xml> <Interface> <method> [args...] [{}]",
        program, WRITE_BACK_FLAG
    );
    eprintln!(
        "Example: {} configs/library.yaml demos/library.xml Library getBookCount",
        program
    );
    eprintln!(
        "Example: {} configs/library.yaml demos/library.xml Library getBook b2",
        program
    );
    eprintln!(
        "Example: {} configs/event.yaml demos/event.xml Event setTitle \"Late News\" {}",
        program, WRITE_BACK_FLAG
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,the_projector=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().collect();
    let write_back = match args.iter().position(|a| a == WRITE_BACK_FLAG) {
        Some(index) => {
            args.remove(index);
            true
        }
        None => false,
    };
    if args.len() < 5 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let config_file = &args[1];
    let document_file = &args[2];
    let interface = &args[3];
    let method = &args[4];
    let raw_args = &args[5..];

    let projector = ProjectorBuilder::from_config_file(config_file)
        .with_context(|| format!("loading {}", config_file))?
        .build();
    let descriptor = projector
        .interface(interface)
        .ok_or_else(|| anyhow!("{} declares no interface '{}'", config_file, interface))?;

    // Command line arguments are text; convert them to the declared parameter types
    let converter = TypeConverter::new();
    let call_args = match descriptor.method(method) {
        Some(declared) => {
            if declared.params.len() != raw_args.len() {
                bail!(
                    "{}.{} takes {} arguments, got {}",
                    interface,
                    method,
                    declared.params.len(),
                    raw_args.len()
                );
            }
            declared
                .params
                .iter()
                .zip(raw_args)
                .map(|(param, raw)| converter.to_host_value(raw, &param.ty))
                .collect::<Result<Vec<Value>, _>>()?
        }
        None => raw_args.iter().map(|raw| Value::from(raw.as_str())).collect(),
    };

    let io = projector.io();
    let file = io.file(document_file);
    let projection = file
        .read(interface)
        .with_context(|| format!("reading {}", document_file))?;

    let start = Instant::now();
    let result = projection.invoke(method, &call_args)?;
    let elapsed = start.elapsed();

    match &result {
        Value::Projection(p) => println!("{}", p),
        Value::List(items) if items.iter().any(|i| i.as_projection().is_some()) => {
            for item in items {
                println!("{}", item);
            }
        }
        other => println!("{}", serde_json::to_string_pretty(&other.to_json())?),
    }

    if write_back {
        file.write(&projection)
            .with_context(|| format!("writing {}", document_file))?;
        eprintln!("Wrote {}", document_file);
    }
    eprintln!("{}.{} finished in {:.2?}", interface, method, elapsed);

    Ok(())
}
