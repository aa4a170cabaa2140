use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "module-access")]
#[command(about = "Resolve department and user module access")]
pub struct CliConfig {
    /// Access policy file (TOML). The built-in policy is used when omitted.
    #[arg(short, long, global = true, env = "MODULE_ACCESS_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Print results as JSON")]
    pub json: bool,

    #[arg(long, global = true, help = "Write logs as JSON lines to stderr")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the modules a user may reach and their landing route
    Modules(SubjectArgs),
    /// Check whether a user may open one module (exit code 1 when denied)
    Check {
        #[command(flatten)]
        subject: SubjectArgs,

        #[arg(short, long)]
        module: String,
    },
    /// Print the landing route for a non-elevated user
    Route {
        #[arg(short, long)]
        department: Option<String>,

        #[arg(short, long)]
        user: Option<String>,
    },
    /// Print the module catalog
    Catalog,
    /// Print the resolved modules of every configured department
    Matrix,
    /// Validate the policy and report ids missing from the catalog
    Validate,
}

#[derive(Debug, Clone, Args)]
pub struct SubjectArgs {
    #[arg(short, long)]
    pub department: Option<String>,

    #[arg(short, long)]
    pub user: Option<String>,

    #[arg(short, long)]
    pub elevated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_command() {
        let config = CliConfig::try_parse_from([
            "module-access",
            "--json",
            "check",
            "--department",
            "Sales",
            "--module",
            "crm",
            "--user",
            "u1",
        ])
        .unwrap();

        assert!(config.json);
        match config.command {
            Command::Check { subject, module } => {
                assert_eq!(subject.department.as_deref(), Some("Sales"));
                assert_eq!(subject.user.as_deref(), Some("u1"));
                assert!(!subject.elevated);
                assert_eq!(module, "crm");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_requires_module() {
        assert!(CliConfig::try_parse_from(["module-access", "check"]).is_err());
    }
}
