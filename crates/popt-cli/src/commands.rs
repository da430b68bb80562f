use std::path::PathBuf;

use anyhow::{bail, Context};
use colored::Colorize;
use popt_sdk::{snapshots, Config, Entry, OptimizeRequest, Optimizer, Template, Timestamp};
use popt_server::{PoptServer, ServerConfig};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::cli::*;
use crate::render;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let format = cli.format;
    debug!(
        config = %cli.config.display(),
        data_dir = %config.data_dir.display(),
        model = %config.completion.model,
        "loaded configuration"
    );

    match cli.command {
        Command::Config => cmd_config(&config, format),
        Command::Serve(args) => cmd_serve(&config, args).await,
        command => {
            let optimizer = Optimizer::open(&config)
                .with_context(|| format!("opening {}", config.data_dir.display()))?;
            match command {
                Command::Optimize(args) => cmd_optimize(&optimizer, args, format).await,
                Command::History(args) => cmd_history(&optimizer, args.action, format),
                Command::Template(args) => cmd_template(&optimizer, args.action, format),
                Command::Config | Command::Serve(_) => Ok(()),
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Find an entry by exact id or by a unique id prefix.
fn resolve_entry(optimizer: &Optimizer, id: &str) -> anyhow::Result<Entry> {
    let history = optimizer.history();
    if let Some(entry) = history.iter().find(|e| e.id == id) {
        return Ok(entry.clone());
    }
    let mut matches = history.into_iter().filter(|e| e.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(entry), None) if !id.is_empty() => Ok(entry),
        (Some(_), Some(_)) => bail!("id prefix {id} is ambiguous"),
        _ => bail!("entry not found: {id}"),
    }
}

async fn cmd_optimize(
    optimizer: &Optimizer,
    args: OptimizeArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let entry_id = match &args.entry {
        Some(id) => Some(resolve_entry(optimizer, id)?.id),
        None => None,
    };
    let request = OptimizeRequest {
        prompt: args.prompt.unwrap_or_default(),
        entry_id,
        tags: (!args.tags.is_empty()).then_some(args.tags),
        template_id: args.template,
    };
    let entry = optimizer.optimize(request).await?;

    if format == OutputFormat::Json {
        return print_json(&entry);
    }
    let verb = if entry.versions.is_empty() { "Saved" } else { "Updated" };
    println!("{} {} entry {}", "✓".green().bold(), verb, popt_sdk::short_id(&entry.id).yellow());
    println!("  {}", render::score(entry.score));
    println!("\n{}\n", entry.optimized);
    if !entry.explanation.is_empty() {
        println!("{} {}", "Why:".bold(), entry.explanation);
    }
    for related in &entry.related {
        println!("  {} {}", "→".cyan(), related);
    }
    Ok(())
}

fn cmd_history(
    optimizer: &Optimizer,
    action: HistoryAction,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        HistoryAction::List { limit } => print_entries(optimizer.history(), limit, format),
        HistoryAction::Search { query, limit } => {
            print_entries(optimizer.search(&query), limit, format)
        }
        HistoryAction::Show { id } => {
            let entry = resolve_entry(optimizer, &id)?;
            if format == OutputFormat::Json {
                return print_json(&entry);
            }
            print!("{}", render::entry_detail(&entry, &snapshots(&entry)));
            Ok(())
        }
        HistoryAction::Delete { id } => {
            let entry = resolve_entry(optimizer, &id)?;
            optimizer.delete_entry(&entry.id)?;
            println!("Deleted entry {}", popt_sdk::short_id(&entry.id).yellow());
            Ok(())
        }
        HistoryAction::Export { output, stdout } => {
            let doc = optimizer.export()?;
            if stdout {
                println!("{}", doc.body);
                return Ok(());
            }
            let path = output.unwrap_or_else(|| PathBuf::from(&doc.file_name));
            std::fs::write(&path, &doc.body)
                .with_context(|| format!("writing {}", path.display()))?;
            println!(
                "{} Exported {} entries to {}",
                "✓".green().bold(),
                optimizer.history().len(),
                path.display().to_string().bold()
            );
            Ok(())
        }
        HistoryAction::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let report = optimizer.import(&text)?;
            if format == OutputFormat::Json {
                return print_json(&json!({
                    "imported": report.imported,
                    "dropped": report.dropped,
                    "total": report.total,
                }));
            }
            println!("{} Imported {} entries", "✓".green().bold(), report.imported);
            if report.dropped > 0 {
                println!("  {} {} invalid records skipped", "!".yellow(), report.dropped);
            }
            println!("  History now holds {} entries", report.total);
            Ok(())
        }
        HistoryAction::Compare { id, from, to } => {
            let entry = resolve_entry(optimizer, &id)?;
            let range = from.zip(to);
            let cmp = optimizer.compare(&entry.id, range)?;
            if format == OutputFormat::Json {
                return print_json(&cmp);
            }
            let current = entry.versions.len();
            println!(
                "Comparing {} → {}",
                render::version_label(cmp.from_index, current).bold(),
                render::version_label(cmp.to_index, current).bold()
            );
            println!("  {}  →  {}", render::score(cmp.from_score), render::score(cmp.to_score));
            if let Some(delta) = cmp.score_delta {
                let delta_text = format!("{delta:+}");
                let colored = match delta {
                    d if d > 0 => delta_text.green(),
                    d if d < 0 => delta_text.red(),
                    _ => delta_text.normal(),
                };
                println!("  Change: {colored}");
            }
            println!(
                "  {} added, {} removed\n",
                cmp.diff.additions().to_string().green(),
                cmp.diff.deletions().to_string().red()
            );
            if cmp.diff.is_unchanged() {
                println!("{}", "No differences.".dimmed());
            } else {
                println!("{}", render::diff(&cmp.diff));
            }
            Ok(())
        }
    }
}

fn print_entries(entries: Vec<Entry>, limit: usize, format: OutputFormat) -> anyhow::Result<()> {
    let total = entries.len();
    let shown: Vec<Entry> = entries.into_iter().take(limit).collect();
    if format == OutputFormat::Json {
        return print_json(&shown);
    }
    if shown.is_empty() {
        println!("No entries.");
        return Ok(());
    }
    for entry in &shown {
        println!("{}", render::entry_line(entry));
    }
    if total > shown.len() {
        println!("{}", format!("... {} more", total - shown.len()).dimmed());
    }
    Ok(())
}

fn cmd_template(
    optimizer: &Optimizer,
    action: TemplateAction,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        TemplateAction::List => {
            let templates = optimizer.list_templates();
            if format == OutputFormat::Json {
                return print_json(&templates);
            }
            if templates.is_empty() {
                println!("No templates.");
            }
            for t in &templates {
                println!("{}", render::template_line(t));
            }
            Ok(())
        }
        TemplateAction::Show { id } => {
            let template = optimizer.template(&id)?;
            if format == OutputFormat::Json {
                return print_json(&template);
            }
            println!("{} {}", template.name.bold(), format!("({})", template.id).dimmed());
            println!("{}", template.content);
            Ok(())
        }
        TemplateAction::Add { content, name } => {
            let template = match name {
                Some(name) => {
                    if content.trim().is_empty() {
                        bail!("template content is empty");
                    }
                    let t = Template::new(name, content, Timestamp::now());
                    optimizer.save_template(&t)?;
                    t
                }
                None => optimizer.save_as_template(&content)?,
            };
            if format == OutputFormat::Json {
                return print_json(&template);
            }
            println!("{} Saved template {} ({})", "✓".green().bold(), template.name.bold(), template.id.yellow());
            Ok(())
        }
        TemplateAction::Delete { id } => {
            if optimizer.delete_template(&id)? {
                println!("Deleted template {}", id.yellow());
                Ok(())
            } else {
                bail!("template not found: {id}")
            }
        }
    }
}

async fn cmd_serve(config: &Config, args: ServeArgs) -> anyhow::Result<()> {
    let mut server_config = ServerConfig::from(&config.server);
    if let Some(bind) = args.bind {
        server_config.bind_addr = bind;
    }
    let optimizer = Optimizer::open(config)
        .with_context(|| format!("opening {}", config.data_dir.display()))?;
    println!(
        "{} popt server on {} (data: {})",
        "✓".green().bold(),
        server_config.bind_addr.to_string().bold(),
        config.data_dir.display()
    );
    PoptServer::new(server_config, optimizer).serve().await?;
    Ok(())
}

fn cmd_config(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(config);
    }
    print!("{}", config.to_toml()?);
    let key_state = if config.api_key().is_some() {
        "set".green()
    } else {
        "not set".red()
    };
    println!("\n# {} is {}", config.api_key_env.bold(), key_state);
    Ok(())
}
