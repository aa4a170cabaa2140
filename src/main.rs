use clap::Parser;
use module_access::config::{CliConfig, Command, SubjectArgs};
use module_access::utils::{logger, validation::Validate};
use module_access::{AccessConfig, AccessResolver, AccessSubject, Module};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match AccessConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load access policy: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    };

    match &cli.command {
        Command::Validate => run_validate(&config, cli.json)?,
        Command::Modules(args) => {
            let resolver = build_resolver(config);
            let access = resolver.resolve(&subject_from(args));
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&access)?);
            } else {
                println!("Default route: {}", access.default_route);
                print_modules(&access.modules);
            }
        }
        Command::Check { subject, module } => {
            let resolver = build_resolver(config);
            let allowed = resolver.permits(&subject_from(subject), module);
            if cli.json {
                println!("{}", json!({ "module": module, "allowed": allowed }));
            } else {
                println!("{}: {}", module, if allowed { "allowed" } else { "denied" });
            }
            if !allowed {
                std::process::exit(1);
            }
        }
        Command::Route { department, user } => {
            let resolver = build_resolver(config);
            let route = resolver.default_route(department.as_deref(), user.as_deref());
            if cli.json {
                println!("{}", json!({ "default_route": route }));
            } else {
                println!("{}", route);
            }
        }
        Command::Catalog => {
            let resolver = build_resolver(config);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(resolver.catalog().modules())?);
            } else {
                print_modules(resolver.catalog().modules());
            }
        }
        Command::Matrix => print_matrix(&build_resolver(config), cli.json)?,
    }

    Ok(())
}

fn build_resolver(config: AccessConfig) -> AccessResolver {
    match config.into_resolver() {
        Ok(resolver) => resolver,
        Err(e) => {
            tracing::error!("❌ Access policy validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    }
}

fn subject_from(args: &SubjectArgs) -> AccessSubject {
    let subject = AccessSubject::new(args.department.as_deref()).elevated(args.elevated);
    match &args.user {
        Some(user) => subject.with_user(user.clone()),
        None => subject,
    }
}

fn print_modules(modules: &[Module]) {
    if modules.is_empty() {
        println!("  (no modules)");
        return;
    }

    let id_width = modules.iter().map(|m| m.id.chars().count()).max().unwrap_or(0);
    let title_width = modules.iter().map(|m| m.title.chars().count()).max().unwrap_or(0);
    for module in modules {
        println!(
            "  {:<id_width$}  {:<title_width$}  {}",
            module.id,
            module.title,
            module.path,
            id_width = id_width,
            title_width = title_width
        );
    }
}

/// Label for the row covering departments the policy does not name.
const OTHER_DEPARTMENTS: &str = "(other)";

fn print_matrix(resolver: &AccessResolver, as_json: bool) -> anyhow::Result<()> {
    let module_ids = |department: Option<&str>| -> Vec<String> {
        resolver
            .resolve_allowed_modules(department, false, None)
            .into_iter()
            .map(|m| m.id)
            .collect()
    };

    let mut rows: Vec<(String, Vec<String>)> = resolver
        .policy()
        .departments
        .departments()
        .into_iter()
        .map(|department| (department.to_string(), module_ids(Some(department))))
        .collect();
    rows.push((OTHER_DEPARTMENTS.to_string(), module_ids(None)));

    if as_json {
        let map: serde_json::Map<String, serde_json::Value> = rows
            .into_iter()
            .map(|(department, ids)| (department, json!(ids)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    let width = rows.iter().map(|(d, _)| d.chars().count()).max().unwrap_or(0);
    for (department, ids) in &rows {
        println!("{:<width$}  {}", department, ids.join(", "), width = width);
    }
    Ok(())
}

fn run_validate(config: &AccessConfig, as_json: bool) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Access policy validation failed: {}", e);
        if as_json {
            println!("{}", json!({ "valid": false, "error": e.to_string() }));
        } else {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
        }
        std::process::exit(2);
    }

    let drift = config.drift_report()?;
    if as_json {
        println!("{}", json!({ "valid": true, "drift": drift }));
    } else if drift.is_empty() {
        println!("✅ Access policy is valid");
    } else {
        println!("✅ Access policy is valid, with unknown module ids:");
        for finding in &drift {
            println!("  ⚠️ {}: {}", finding.source, finding.module_id);
        }
    }
    Ok(())
}
