//! metaportal CLI - Main entry point.

use anyhow::Context;
use metaportal::changelog::{ChangeFilter, ChangeType};
use metaportal::cli::output::{self, OutputFormat};
use metaportal::cli::{Cli, Commands};
use metaportal::config::PortalConfig;
use metaportal::lineage::LineageFilter;
use metaportal::seed::seed_demo;
use metaportal::setup::ProjectSetupRequest;
use metaportal::types::TableRef;
use metaportal::Portal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let mut config = match &cli.config {
        Some(path) => PortalConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PortalConfig::default(),
    };
    cli.apply_overrides(&mut config);
    metaportal::observability::init(&config.observability)?;

    let portal = Portal::open(config).await?;
    seed_demo(&portal).await?;

    if let Err(e) = run(&portal, cli.command, cli.output).await {
        output::error(&e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(portal: &Portal, command: Commands, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        Commands::Schemas => {
            let schemas = portal.schemas().await;
            output::print_list(&schemas, format, |r| output::SchemaRow::from(r))?;
        }

        Commands::Tables { schema } => {
            let tables = portal.tables(schema.as_deref()).await;
            output::print_list(&tables, format, |r| output::TableRow::from(r))?;
        }

        Commands::Columns { schema, table } => {
            let table = schema.zip(table).map(|(s, t)| TableRef::new(s, t));
            let columns = portal.columns(table.as_ref()).await;
            output::print_list(&columns, format, |r| output::ColumnRow::from(r))?;
        }

        Commands::Lineage {
            schema,
            table,
            column,
            change_ref,
        } => {
            let filter = LineageFilter {
                schema,
                table,
                column,
                change_ref,
            };
            let mappings = portal.lineage(&filter).await;
            output::print_list(&mappings, format, |r| output::LineageRow::from(r))?;
        }

        Commands::Projects => {
            let projects = portal.projects().await;
            output::print_list(&projects, format, |r| output::ProjectRow::from(r))?;
        }

        Commands::Changes {
            project,
            search,
            table,
            column,
            change_type,
            change_ref,
        } => {
            let change_type = change_type
                .map(|t| t.parse::<ChangeType>())
                .transpose()?;
            let filter = ChangeFilter {
                search,
                table,
                column,
                change_type,
                change_ref,
            };
            let changes = portal.changes(project, &filter).await?;
            output::print_list(&changes, format, |r| output::ChangeRow::from(r))?;
        }

        Commands::Stats { project } => {
            let stats = portal.stats_for_project(project).await?;
            match format {
                OutputFormat::Json => output::print_single(&stats)?,
                OutputFormat::Table => {
                    output::print_header(&format!("Project {}", project));
                    output::print_kv("Total tables", stats.total_tables);
                    output::print_kv("Total columns", stats.total_columns);
                    output::print_kv("Lineage mappings", stats.lineage_mappings);
                    output::print_kv("Recent changes", stats.recent_changes);
                }
            }
        }

        Commands::Coverage => {
            let report = portal.coverage_report().await;
            output::print_list(&report, format, |r| output::CoverageRow::from(r))?;
            if matches!(format, OutputFormat::Table) {
                output::print_kv("Overall", format!("{}%", metaportal::reports::overall_coverage(&report)));
            }
        }

        Commands::Impact => {
            let report = portal.impact_report().await;
            output::print_list(&report, format, |r| output::ImpactRow::from(r))?;
        }

        Commands::Setup {
            name,
            description,
            database_type,
            connection_string,
        } => {
            let request = ProjectSetupRequest::new(&name, database_type, &connection_string)
                .description(&description);
            let record = portal.setup_project(request).await?;
            match format {
                OutputFormat::Json => output::print_single(&record)?,
                OutputFormat::Table => {
                    output::success(format!("Project {} set up", record.project_name));
                    for table in &record.tables {
                        output::print_kv("Created", table);
                    }
                }
            }
        }

        Commands::Reset { yes } => {
            if !yes {
                anyhow::bail!("reset removes the project configuration; pass --yes to confirm");
            }
            portal.reset_project().await?;
            output::success("Project configuration removed");
        }

        Commands::Login { username, password } => {
            portal.login(&username, &password).await?;
            output::success(format!("Logged in as {}", username.trim()));
        }

        Commands::Logout => {
            portal.logout().await?;
            output::success("Logged out");
        }

        Commands::Settings {
            notifications,
            auto_save,
            compact_view,
            date_format,
            time_format,
            language,
            page_size,
        } => {
            let mut settings = portal.display_settings().await?;
            let before = settings.clone();
            if let Some(v) = notifications {
                settings.notifications = v;
            }
            if let Some(v) = auto_save {
                settings.auto_save = v;
            }
            if let Some(v) = compact_view {
                settings.compact_view = v;
            }
            if let Some(v) = date_format {
                settings.date_format = v;
            }
            if let Some(v) = time_format {
                settings.time_format = v;
            }
            if let Some(v) = language {
                settings.language = v;
            }
            if let Some(v) = page_size {
                settings.page_size = v;
            }
            if settings != before {
                portal.save_display_settings(&settings).await?;
            }
            output::print_single(&settings)?;
        }
    }

    Ok(())
}
