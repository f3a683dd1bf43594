use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

pub struct CliOptions {
    pub log_level: Option<String>,
    pub version: bool,
    pub api_url: Option<String>,
    pub requests_per_second: Option<f64>,
}

impl CliOptions {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            log_level: m.get_one::<String>("log-level").cloned(),
            version: m.get_flag("version"),
            api_url: m.get_one::<String>("api-url").cloned(),
            requests_per_second: m.get_one::<f64>("requests-per-second").copied(),
        }
    }
}

pub fn build_cli() -> Command {
    Command::new("gh-rest-mcp")
        .about("GitHub REST MCP server (stdio JSON-RPC)")
        .disable_version_flag(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .num_args(1)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .num_args(1)
                .help("GitHub REST base URL (overrides GITHUB_API_URL)"),
        )
        .arg(
            Arg::new("requests-per-second")
                .long("requests-per-second")
                .num_args(1)
                .value_parser(value_parser!(f64))
                .help("Dispatch ceiling (overrides GITHUB_RATE_LIMIT_RPS)"),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .help("Print version and exit")
                .action(ArgAction::SetTrue),
        )
}

pub fn init_logging(level: Option<&str>) {
    // Explicit level wins, then RUST_LOG, then info. Logs go to stderr; stdout is the protocol.
    let env = env_logger::Env::default().default_filter_or(level.unwrap_or("info"));
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(lvl) = level {
        builder.parse_filters(lvl);
    }
    builder.target(env_logger::Target::Stderr).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let m = build_cli().get_matches_from([
            "gh-rest-mcp",
            "--api-url",
            "http://localhost:1234",
            "--requests-per-second",
            "2.5",
        ]);
        let opts = CliOptions::from_matches(&m);
        assert_eq!(opts.api_url.as_deref(), Some("http://localhost:1234"));
        assert_eq!(opts.requests_per_second, Some(2.5));
        assert!(!opts.version);
        assert!(opts.log_level.is_none());
    }
}
