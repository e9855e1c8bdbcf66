use anyhow::Context;
use colored::Colorize;
use orc_reconcile::{ObjectReconciler, ReconcileError};
use orc_store::LocalObjectClient;
use orc_types::ObjectDeclaration;
use serde_json::json;

use crate::cli::*;
use crate::config::{CliConfig, Manifest};

type Reconciler = ObjectReconciler<LocalObjectClient>;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let root = config.store_root(cli.store.as_deref());
    let client = LocalObjectClient::open(&root)
        .with_context(|| format!("opening store at {}", root.display()))?;
    tracing::debug!(root = %root.display(), "store opened");
    let reconciler = ObjectReconciler::with_config(client, config.reconciler);
    let out = Output { format: cli.format };

    match cli.command {
        Command::Create(args) => cmd_create(&reconciler, &out, args),
        Command::Update(args) => cmd_update(&reconciler, &out, args),
        Command::Read(args) => cmd_read(&reconciler, &out, args),
        Command::Exists(args) => cmd_exists(&reconciler, &out, args),
        Command::Delete(args) => cmd_delete(&reconciler, &out, args),
        Command::Apply(args) => cmd_apply(&reconciler, &out, args),
        Command::Container(args) => cmd_container(&reconciler, &out, args),
    }
}

struct Output {
    format: OutputFormat,
}

impl Output {
    fn emit(&self, value: serde_json::Value, text: impl FnOnce()) {
        match self.format {
            OutputFormat::Json => println!("{value}"),
            OutputFormat::Text => text(),
        }
    }
}

fn declaration(args: WriteArgs) -> ObjectDeclaration {
    ObjectDeclaration {
        name: args.object.name,
        container_name: args.object.container,
        source_file: args.source,
        contents: args.contents,
    }
}

fn target(args: &ObjectArgs) -> ObjectDeclaration {
    ObjectDeclaration::new(&args.container, &args.name)
}

fn cmd_create(r: &Reconciler, out: &Output, args: WriteArgs) -> anyhow::Result<()> {
    let id = r.create(&declaration(args))?;
    out.emit(json!({ "id": id, "action": "created" }), || {
        println!("{} Created {}", "✓".green().bold(), id.to_string().cyan());
    });
    Ok(())
}

fn cmd_update(r: &Reconciler, out: &Output, args: WriteArgs) -> anyhow::Result<()> {
    let decl = declaration(args);
    r.update(&decl)?;
    let id = decl.identity();
    out.emit(json!({ "id": id, "action": "updated" }), || {
        println!("{} Updated {}", "✓".green().bold(), id.to_string().cyan());
    });
    Ok(())
}

fn cmd_read(r: &Reconciler, out: &Output, args: ObjectArgs) -> anyhow::Result<()> {
    let decl = target(&args);
    let contents = r.read(&decl)?;
    out.emit(json!({ "id": decl.identity(), "contents": contents }), || {
        print!("{contents}");
    });
    Ok(())
}

fn cmd_exists(r: &Reconciler, out: &Output, args: ExistsArgs) -> anyhow::Result<()> {
    let decl = target(&args.object);
    let exists = if args.strict {
        r.probe(&decl)?
    } else {
        r.exists(&decl)
    };
    out.emit(json!({ "id": decl.identity(), "exists": exists }), || {
        if exists {
            println!("{} {}", decl.identity().to_string().cyan(), "exists".green());
        } else {
            println!("{} {}", decl.identity().to_string().cyan(), "absent".yellow());
        }
    });
    Ok(())
}

fn cmd_delete(r: &Reconciler, out: &Output, args: ObjectArgs) -> anyhow::Result<()> {
    let decl = target(&args);
    r.delete(&decl)?;
    out.emit(json!({ "id": decl.identity(), "action": "deleted" }), || {
        println!("{} Deleted {}", "✓".green().bold(), decl.identity().to_string().cyan());
    });
    Ok(())
}

fn cmd_apply(r: &Reconciler, out: &Output, args: ApplyArgs) -> anyhow::Result<()> {
    let manifest = Manifest::load(&args.manifest)?;
    let mut failures: Vec<ReconcileError> = Vec::new();
    let mut results = Vec::new();

    for decl in &manifest.objects {
        match r.create(decl) {
            Ok(id) => {
                results.push(json!({ "id": id, "ok": true }));
                if matches!(out.format, OutputFormat::Text) {
                    println!("  {} {}", "✓".green(), id.to_string().cyan());
                }
            }
            Err(e) => {
                results.push(json!({ "id": e.id(), "ok": false, "error": e.to_string() }));
                if matches!(out.format, OutputFormat::Text) {
                    println!("  {} {}: {}", "✗".red(), e.id().cyan(), e);
                }
                failures.push(e);
            }
        }
    }

    let applied = manifest.objects.len() - failures.len();
    out.emit(json!({ "objects": results }), || {
        println!(
            "Applied {} of {} objects",
            applied.to_string().bold(),
            manifest.objects.len()
        );
    });
    if !failures.is_empty() {
        anyhow::bail!("{} of {} objects failed", failures.len(), manifest.objects.len());
    }
    Ok(())
}

fn cmd_container(r: &Reconciler, out: &Output, args: ContainerArgs) -> anyhow::Result<()> {
    r.client().create_container(&args.name)?;
    out.emit(json!({ "container": args.name, "action": "created" }), || {
        println!("{} Container {}", "✓".green().bold(), args.name.yellow());
    });
    Ok(())
}
