use clap::Parser;
use sqlx::postgres::PgConnectOptions;

/// Employers loaded when no explicit list is configured. These are the
/// hh.ru ids of a handful of large, stable Russian tech employers.
pub const DEFAULT_EMPLOYER_IDS: &str =
    "1455,78638,15478,4192670,370481,24109,921364,1122466,641729,2180";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "vacancydb",
    about = "HeadHunter vacancy loader and analytical console"
)]
pub struct Config {
    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database name (created on startup if missing)
    #[arg(long, env = "DB_NAME", default_value = "hh_vacancies")]
    pub db_name: String,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", default_value = "password")]
    pub db_password: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value = "5432")]
    pub db_port: u16,

    /// Base URL of the hh.ru API
    #[arg(long, env = "HH_API_URL", default_value = "https://api.hh.ru")]
    pub api_base_url: String,

    /// Employer ids to ingest, comma-separated
    #[arg(
        long,
        env = "EMPLOYER_IDS",
        value_delimiter = ',',
        default_value = DEFAULT_EMPLOYER_IDS
    )]
    pub employer_ids: Vec<i64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch the configured employers and their vacancies into the database
    Ingest,
    /// Open the interactive query menu without ingesting
    Menu,
    /// Search hh.ru employers by name
    SearchEmployers {
        /// Search text
        query: String,
    },
}

impl Config {
    /// Connection options for the application database.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }

    /// Connection options for the administrative `postgres` database,
    /// used only to create the application database when it is missing.
    pub fn admin_connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database("postgres")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::parse_from(["vacancydb"]);
        assert_eq!(config.db_host, "localhost");
        assert_eq!(config.db_name, "hh_vacancies");
        assert_eq!(config.db_user, "postgres");
        assert_eq!(config.db_port, 5432);
        assert_eq!(config.api_base_url, "https://api.hh.ru");
        assert_eq!(config.employer_ids.len(), 10);
        assert_eq!(config.employer_ids[0], 1455);
    }

    #[test]
    fn employer_ids_parse_from_comma_list() {
        let config = Config::parse_from(["vacancydb", "--employer-ids", "1,2,3"]);
        assert_eq!(config.employer_ids, vec![1, 2, 3]);
    }
}
