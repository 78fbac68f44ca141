//! Organization CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use orgdal_core::config::AppConfig;
use orgdal_core::error::AppError;
use orgdal_core::types::filter::{Filter, FilterValue};
use orgdal_core::types::pagination::PageResponse;
use orgdal_dal::common;
use orgdal_database::PgOrganizationModel;
use orgdal_entity::organization::model::PARENT_ORGANIZATION_FIELD;
use orgdal_entity::organization::{CreateOrganization, Organization, UpdateOrganization};

/// Arguments for organization commands
#[derive(Debug, Args)]
pub struct OrgArgs {
    /// Organization subcommand
    #[command(subcommand)]
    pub command: OrgCommand,
}

/// Paging flags shared by list commands
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: u64,
    /// Rows per page (defaults to `pagination.default_page_size`)
    #[arg(short, long)]
    pub limit: Option<u64>,
}

/// Organization subcommands
#[derive(Debug, Subcommand)]
pub enum OrgCommand {
    /// List organizations
    List {
        /// Only organizations with this exact name
        #[arg(long)]
        name: Option<String>,
        /// Only direct children of this organization
        #[arg(long, conflicts_with = "roots")]
        parent_id: Option<Uuid>,
        /// Only top-level organizations
        #[arg(long)]
        roots: bool,
        #[command(flatten)]
        paging: PageArgs,
    },
    /// Show one organization
    Get {
        /// Organization ID
        id: Uuid,
    },
    /// Create an organization
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Parent organization ID (omit for top-level)
        #[arg(long)]
        parent_id: Option<Uuid>,
    },
    /// Update an organization
    Update {
        /// Organization ID
        id: Uuid,
        /// New display name
        #[arg(short, long)]
        name: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New parent organization ID
        #[arg(long, conflicts_with = "clear_parent")]
        parent_id: Option<Uuid>,
        /// Make the organization top-level
        #[arg(long)]
        clear_parent: bool,
    },
    /// Delete an organization
    Delete {
        /// Organization ID
        id: Uuid,
    },
    /// Count organizations
    Count {
        /// Only direct children of this organization
        #[arg(long)]
        parent_id: Option<Uuid>,
        /// Count distinct organizations
        #[arg(long)]
        distinct: bool,
    },
    /// List direct children of an organization
    Children {
        /// Parent organization ID
        id: Uuid,
        #[command(flatten)]
        paging: PageArgs,
    },
    /// Show the parent of an organization
    Parent {
        /// Child organization ID
        id: Uuid,
    },
}

/// Organization display row
#[derive(Debug, Serialize, Tabled)]
struct OrganizationRow {
    /// Organization ID
    id: String,
    /// Name
    name: String,
    /// Parent ID
    parent: String,
    /// Description
    description: String,
    /// Created at
    created_at: String,
}

impl From<&Organization> for OrganizationRow {
    fn from(o: &Organization) -> Self {
        Self {
            id: o.id.to_string(),
            name: o.name.clone(),
            parent: o
                .parent_organization_id
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            description: o.description.clone().unwrap_or_default(),
            created_at: o.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Build the list filter from command flags.
fn list_filter(name: Option<&str>, parent_id: Option<Uuid>, roots: bool) -> Filter {
    let mut filter = Filter::new();
    if let Some(name) = name {
        filter = filter.eq("name", name);
    }
    if let Some(parent_id) = parent_id {
        filter = filter.eq(PARENT_ORGANIZATION_FIELD, parent_id);
    } else if roots {
        filter = filter.eq(PARENT_ORGANIZATION_FIELD, FilterValue::Null);
    }
    filter
}

fn print_page(page: &PageResponse<Organization>, page_size: u64, format: OutputFormat) {
    let rows: Vec<OrganizationRow> = page.rows.iter().map(OrganizationRow::from).collect();
    output::print_list(&rows, format);
    if format == OutputFormat::Table {
        output::print_kv("Total", &page.count.to_string());
        output::print_kv("Pages", &page.total_pages(page_size).to_string());
    }
}

/// Execute organization commands
pub async fn execute(
    args: &OrgArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = super::connect(config).await?;
    let model = PgOrganizationModel::new(db.pool().clone());
    let default_limit = config.pagination.default_page_size;

    match &args.command {
        OrgCommand::List {
            name,
            parent_id,
            roots,
            paging,
        } => {
            let limit = paging.limit.unwrap_or(default_limit);
            let filter = list_filter(name.as_deref(), *parent_id, *roots);
            let page = common::list(&model, filter, paging.page, limit).await?;
            print_page(&page, limit, format);
        }
        OrgCommand::Get { id } => {
            let organization = common::get_by_id(&model, *id).await?;
            output::print_item(&OrganizationRow::from(&organization), format);
        }
        OrgCommand::Create {
            name,
            description,
            parent_id,
        } => {
            let data = CreateOrganization {
                name: name.clone(),
                description: description.clone(),
                parent_organization_id: *parent_id,
            };
            let organization = common::create(&model, data).await?;
            output::print_item(&OrganizationRow::from(&organization), format);
        }
        OrgCommand::Update {
            id,
            name,
            description,
            parent_id,
            clear_parent,
        } => {
            let parent_organization_id = if *clear_parent {
                Some(None)
            } else {
                parent_id.map(Some)
            };
            let patch = UpdateOrganization {
                id: *id,
                name: name.clone(),
                description: description.clone().map(Some),
                parent_organization_id,
            };
            let result = common::update_by_id(&model, patch).await?;
            match format {
                OutputFormat::Json => output::print_json(&result),
                OutputFormat::Table => output::print_success(&format!(
                    "Updated organization {} ({} row(s) affected)",
                    result.id, result.rows_affected
                )),
            }
        }
        OrgCommand::Delete { id } => {
            let deleted = common::delete_by_id(&model, *id).await?;
            output::print_success(&format!("Deleted organization {deleted}"));
        }
        OrgCommand::Count {
            parent_id,
            distinct,
        } => {
            let filter = list_filter(None, *parent_id, false);
            let count = common::total(&model, filter, *distinct).await?;
            println!("{count}");
        }
        OrgCommand::Children { id, paging } => {
            let limit = paging.limit.unwrap_or(default_limit);
            let page = common::get_children(&model, *id, paging.page, limit).await?;
            print_page(&page, limit, format);
        }
        OrgCommand::Parent { id } => {
            let parent = common::get_parent(&model, *id).await?;
            output::print_item(&OrganizationRow::from(&parent), format);
        }
    }

    db.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::commands::{Cli, Commands};

    #[test]
    fn test_list_filter() {
        let parent = Uuid::new_v4();
        let filter = list_filter(Some("Acme"), Some(parent), true);
        assert_eq!(filter.get("name"), Some(&FilterValue::String("Acme".into())));
        assert_eq!(
            filter.get(PARENT_ORGANIZATION_FIELD),
            Some(&FilterValue::Uuid(parent))
        );

        let roots = list_filter(None, None, true);
        assert_eq!(roots.get(PARENT_ORGANIZATION_FIELD), Some(&FilterValue::Null));
        assert!(list_filter(None, None, false).is_empty());
    }

    #[test]
    fn test_parse_children_command() {
        let id = Uuid::new_v4();
        let id_arg = id.to_string();
        let cli = Cli::try_parse_from([
            "orgdal",
            "--format",
            "json",
            "org",
            "children",
            id_arg.as_str(),
            "--page",
            "2",
        ])
        .expect("parse");

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Org(OrgArgs {
                command: OrgCommand::Children { id: parsed, paging },
            }) => {
                assert_eq!(parsed, id);
                assert_eq!(paging.page, 2);
                assert_eq!(paging.limit, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_update_parent_flags_conflict() {
        let id = Uuid::new_v4().to_string();
        let parent = Uuid::new_v4().to_string();
        let result = Cli::try_parse_from([
            "orgdal",
            "org",
            "update",
            id.as_str(),
            "--parent-id",
            parent.as_str(),
            "--clear-parent",
        ]);
        assert!(result.is_err());
    }
}
