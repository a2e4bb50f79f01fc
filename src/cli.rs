use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::models::SystemReport;
use crate::output::{self, PollProgress};
use crate::providers::bitbucket::{BitbucketClient, BitbucketStatusProvider};
use crate::providers::StatusProvider;

#[derive(Parser)]
#[command(name = "devops-observer")]
#[command(author, version, about = "Bitbucket pipeline status for DevOps dashboards", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./devops-observer.{toml,json,yaml,yml})
    #[arg(short, long, global = true, env = "DEVOPS_OBSERVER_CONFIG")]
    config: Option<PathBuf>,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the latest pipeline status of every observed repository
    Status {
        /// Only poll the system with this guid
        #[arg(short, long)]
        system: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Requests in flight per system (overrides the configuration)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// List configured systems and observed repositories
    Systems,

    /// Write a starter configuration file
    Init {
        #[arg(default_value = "devops-observer.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

impl Cli {
    async fn execute_status(
        &self,
        system: Option<&str>,
        format: OutputFormat,
        concurrency: Option<usize>,
    ) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let systems = config.select_systems(system)?;
        if systems.is_empty() {
            warn!("No systems configured, nothing to poll");
        }

        let client = BitbucketClient::new(
            &config.settings.user_agent,
            Duration::from_secs(config.settings.timeout_secs),
        )?;
        let provider = BitbucketStatusProvider::new(client, config.credential_store())
            .with_max_concurrent_requests(
                concurrency.unwrap_or(config.settings.max_concurrent_requests),
            );

        let mut reports = Vec::with_capacity(systems.len());
        for system in systems {
            let progress =
                PollProgress::start(system.display_name(), system.observed_automations.len());
            let records = provider.get_status_list(system).await;
            progress.finish(system.display_name(), records.len());

            reports.push(SystemReport {
                system: system.display_name().to_string(),
                guid: system.guid.clone(),
                tenant: system.tenant.clone(),
                server_type: provider.server_type().to_string(),
                collected_at: Utc::now(),
                records,
            });
        }

        match format {
            OutputFormat::Json => {
                let json_output = if self.pretty {
                    serde_json::to_string_pretty(&reports)?
                } else {
                    serde_json::to_string(&reports)?
                };
                self.write_output(&json_output)
            }
            OutputFormat::Table => match &self.output {
                Some(_) => {
                    console::set_colors_enabled(false);
                    let rendered = reports
                        .iter()
                        .map(|report| output::render_report(report, false))
                        .collect::<Vec<_>>()
                        .join("\n");
                    self.write_output(&rendered)
                }
                None => {
                    output::print_reports(&reports);
                    Ok(())
                }
            },
        }
    }

    fn execute_systems(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let styled = self.output.is_none();
        if !styled {
            console::set_colors_enabled(false);
        }
        let rendered = output::render_systems(&config.systems, styled);
        self.write_output(rendered.trim_end())
    }

    fn execute_init(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }

        Config::sample().save(path)?;
        info!("Sample configuration written to: {}", path.display());
        Ok(())
    }

    fn write_output(&self, contents: &str) -> Result<()> {
        if let Some(output_path) = &self.output {
            std::fs::write(output_path, contents)?;
            info!("Output written to: {}", output_path.display());
        } else {
            println!("{contents}");
        }

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Status {
                system,
                format,
                concurrency,
            } => {
                self.execute_status(system.as_deref(), *format, *concurrency)
                    .await
            }
            Commands::Systems => self.execute_systems(),
            Commands::Init { path, force } => Self::execute_init(path, *force),
        }
    }
}
