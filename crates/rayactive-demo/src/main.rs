#![forbid(unsafe_code)]

//! RayActive demo binary.
//!
//! Mounts a name/age card on an in-memory document, dispatches clicks on its
//! button and prints the root markup after every render.

mod cli;

use std::rc::Rc;

use rayactive::prelude::*;
use rayactive::Result;
use tracing_subscriber::EnvFilter;

use cli::{Ids, Opts, Parsed};

const TEMPLATE: &str = "<div><div>name: {{name}}</div><div>age: {{age}}</div>\
<button @click=\"handleClick\">click</button></div>";

fn view_model() -> ViewModel {
    ViewModel::new(TEMPLATE)
        .with_data("name", "Ray")
        .with_data("age", 18)
        .with_method("handleClick", |this| {
            this.set("name", "jack")?;
            this.set("age", 24)?;
            Ok(())
        })
}

fn config(opts: &Opts) -> Result<EngineConfig> {
    let config = EngineConfig::from_env()?.with_root_id(opts.root_id.clone());
    Ok(match opts.ids {
        Ids::Random => config.with_ids(IdStrategy::Random),
        Ids::Sequential => config.with_sequential_ids(rayactive::DEFAULT_ID_PREFIX),
    })
}

/// Pretty-printed JSON of the current data.
fn snapshot_json(engine: &RayActive) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&engine.data().snapshot().to_json())
}

fn print_step(label: &str, engine: &RayActive, json: bool) {
    println!("[{label}] renders={} {}", engine.render_count(), engine.markup());
    if json {
        match snapshot_json(engine) {
            Ok(text) => println!("{text}"),
            Err(error) => tracing::warn!(%error, "data snapshot not serializable"),
        }
    }
}

fn run(opts: &Opts) -> Result<()> {
    let host = Rc::new(MemoryHost::new().with_element(opts.root_id.clone()));
    let engine = RayActive::with_config(view_model(), host.clone(), config(opts)?)?;
    print_step("mount", &engine, opts.json);

    for click in 1..=opts.clicks {
        let Some(target) = engine.bindings().latest_id().map(str::to_owned) else {
            break;
        };
        host.dispatch(&engine.root(), "click", &target)?;
        print_step(&format!("click {click}"), &engine, opts.json);
    }

    tracing::info!(
        renders = engine.render_count(),
        bindings = engine.bindings().len(),
        "demo finished"
    );
    Ok(())
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init();

    let opts = match Opts::parse() {
        Ok(Parsed::Run(opts)) => opts,
        Ok(Parsed::Help) => {
            println!("{}", cli::HELP_TEXT);
            return;
        }
        Ok(Parsed::Version) => {
            println!("{}", cli::version_line());
            return;
        }
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    if let Err(error) = run(&opts) {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
