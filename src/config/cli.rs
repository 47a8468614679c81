use crate::config::toml_config::TomlConfig;
use crate::config::RentalConfig;
use crate::core::session::Role;
use crate::domain::model::{BoundaryPolicy, StatusPolicy};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "car-rental")]
#[command(about = "Browse, book and manage rental cars against the rental API")]
pub struct CliConfig {
    /// Base URL of the rental API (overrides the config file)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    /// Allow a rental to start on the day another one ends
    #[arg(long, global = true)]
    pub same_day_turnover: bool,

    /// Count completed and cancelled reservations as blocking
    #[arg(long, global = true)]
    pub include_terminal: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List cars free for a date range
    Available {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Book a car for a date range
    Book {
        #[arg(long)]
        customer: u64,
        #[arg(long)]
        car: u64,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// List a customer's bookings
    MyBookings {
        #[arg(long)]
        customer: u64,
    },
    /// Cancel one of your own bookings
    Cancel {
        #[arg(long)]
        customer: u64,
        #[arg(long)]
        booking: u64,
    },
    /// Register a new customer account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        mobile: String,
    },
    Login {
        #[arg(long, value_enum)]
        role: Role,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum AdminCommand {
    /// List every booking
    Bookings,
    /// Mark a booking as completed
    Complete { booking: u64 },
    /// Cancel a booking
    Cancel { booking: u64 },
    AddCar {
        #[arg(long)]
        model: String,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        price: f64,
    },
    AddAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

impl CliConfig {
    /// Loads the config file if given, then applies command line overrides.
    pub fn resolve(&self) -> Result<RentalConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                RentalConfig::from_toml(&TomlConfig::from_file(path)?)?
            }
            None => RentalConfig::default(),
        };

        if let Some(api_base) = &self.api_base {
            config.api_base = api_base.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }
        if self.same_day_turnover {
            config.boundary = BoundaryPolicy::SameDayTurnover;
        }
        if self.include_terminal {
            config.status_policy = StatusPolicy::AllReservations;
        }
        config.log_json |= self.log_json;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_available_command() {
        let cli = CliConfig::try_parse_from([
            "car-rental",
            "available",
            "--start",
            "2024-06-01",
            "--end",
            "2024-06-03",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Available { start, end } => {
                assert_eq!(start.as_deref(), Some("2024-06-01"));
                assert_eq!(end.as_deref(), Some("2024-06-03"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_admin_subcommand() {
        let cli = CliConfig::try_parse_from(["car-rental", "admin", "complete", "12"]).unwrap();
        assert!(matches!(cli.command, Command::Admin(AdminCommand::Complete { booking: 12 })));
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nbase_url = \"http://file-host:5000\"\ntimeout_seconds = 30\n")
            .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from([
            "car-rental",
            "--config",
            path.as_str(),
            "--api-base",
            "http://flag-host:5000",
            "--same-day-turnover",
            "admin",
            "bookings",
        ])
        .unwrap();
        let config = cli.resolve().unwrap();

        assert_eq!(config.api_base, "http://flag-host:5000");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.boundary, BoundaryPolicy::SameDayTurnover);
        assert_eq!(config.status_policy, StatusPolicy::ActiveOnly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_login_requires_known_role() {
        assert!(CliConfig::try_parse_from([
            "car-rental", "login", "--role", "guest", "--email", "a@b.c", "--password", "x"
        ])
        .is_err());
    }
}
