//! Server configuration: defaults, then environment variables, then command-line flags.
//! Values that fail to parse are ignored and the previous layer's value is kept.

use std::path::PathBuf;

pub const DEFAULT_HTTP_PORT: u16 = 3344;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

pub const ENV_HTTP_PORT: &str = "BOURSE_HTTP_PORT";
pub const ENV_BIND_HOST: &str = "BOURSE_BIND_HOST";
pub const ENV_SEED_DEMO: &str = "BOURSE_SEED_DEMO";
pub const ENV_FIXTURES: &str = "BOURSE_FIXTURES";

pub const USAGE: &str = "bourse server\n\nUSAGE:\n  bourse_server [--http-port N] [--bind-host HOST] [--fixtures PATH] [--seed|--no-seed]\n\nOPTIONS:\n  --http-port N       HTTP API port (env: BOURSE_HTTP_PORT, default 3344)\n  --bind-host HOST    Interface to bind (env: BOURSE_BIND_HOST, default 0.0.0.0)\n  --fixtures PATH     JSON market data fixture (env: BOURSE_FIXTURES)\n  --seed              Load the demo securities at startup (env: BOURSE_SEED_DEMO, default on)\n  --no-seed           Start with an empty directory.\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub http_port: u16,
    pub bind_host: String,
    pub seed_demo_data: bool,
    pub fixtures_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            bind_host: DEFAULT_BIND_HOST.to_string(),
            seed_demo_data: true,
            fixtures_path: None,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let i = args.iter().position(|a| a == flag)?;
    args.get(i + 1).map(String::as_str).filter(|v| !v.starts_with("--"))
}

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

impl ServerConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::default().with_env(|name| std::env::var(name).ok())
    }

    /// Defaults, then environment, then `args` (as from `std::env::args`).
    pub fn from_env_and_args(args: &[String]) -> Self {
        Self::from_env().with_args(args)
    }

    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_HTTP_PORT).and_then(|v| v.trim().parse::<u16>().ok()) {
            self.http_port = port;
        }
        if let Some(host) = lookup(ENV_BIND_HOST).filter(|v| !v.trim().is_empty()) {
            self.bind_host = host.trim().to_string();
        }
        if let Some(seed) = lookup(ENV_SEED_DEMO).as_deref().and_then(parse_bool) {
            self.seed_demo_data = seed;
        }
        if let Some(path) = lookup(ENV_FIXTURES).filter(|v| !v.trim().is_empty()) {
            self.fixtures_path = Some(PathBuf::from(path.trim()));
        }
        self
    }

    pub fn with_args(mut self, args: &[String]) -> Self {
        if let Some(port) = arg_value(args, "--http-port").and_then(|v| v.parse::<u16>().ok()) {
            self.http_port = port;
        }
        if let Some(host) = arg_value(args, "--bind-host") {
            self.bind_host = host.to_string();
        }
        if let Some(path) = arg_value(args, "--fixtures") {
            self.fixtures_path = Some(PathBuf::from(path));
        }
        // Explicit disable wins over enable when both are passed.
        if has_flag(args, "--seed") {
            self.seed_demo_data = true;
        }
        if has_flag(args, "--no-seed") {
            self.seed_demo_data = false;
        }
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.http_port, 3344);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:3344");
        assert!(cfg.seed_demo_data);
        assert!(cfg.fixtures_path.is_none());
    }

    #[test]
    fn env_overrides_defaults() {
        let cfg = ServerConfig::default().with_env(env(&[
            (ENV_HTTP_PORT, "8080"),
            (ENV_BIND_HOST, "127.0.0.1"),
            (ENV_SEED_DEMO, "off"),
            (ENV_FIXTURES, "/tmp/md.json"),
        ]));
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        assert!(!cfg.seed_demo_data);
        assert_eq!(cfg.fixtures_path, Some(PathBuf::from("/tmp/md.json")));
    }

    #[test]
    fn unparsable_values_are_ignored() {
        let cfg = ServerConfig::default()
            .with_env(env(&[(ENV_HTTP_PORT, "eighty"), (ENV_SEED_DEMO, "maybe")]))
            .with_args(&args(&["bourse", "--http-port", "99999"]));
        assert_eq!(cfg, ServerConfig::default());
    }

    #[test]
    fn args_override_env() {
        let cfg = ServerConfig::default()
            .with_env(env(&[(ENV_HTTP_PORT, "8080"), (ENV_SEED_DEMO, "false")]))
            .with_args(&args(&["bourse", "--http-port", "9000", "--seed", "--fixtures", "fx.json"]));
        assert_eq!(cfg.http_port, 9000);
        assert!(cfg.seed_demo_data);
        assert_eq!(cfg.fixtures_path, Some(PathBuf::from("fx.json")));
    }

    #[test]
    fn flag_without_value_is_ignored() {
        let cfg = ServerConfig::default().with_args(&args(&["bourse", "--bind-host", "--no-seed"]));
        assert_eq!(cfg.bind_host, DEFAULT_BIND_HOST);
        assert!(!cfg.seed_demo_data);
    }
}
